//! Qualified type names.

use std::fmt;
use std::sync::Arc;

/// Package plus package-relative name, e.g. `core.collections` + `List`.
///
/// Nested classes keep their dots in the relative part (`Map.Entry`).
/// The registry keys nominal types by this value.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    package: Arc<str>,
    relative: Arc<str>,
}

impl QualifiedName {
    pub fn new(package: &str, relative: &str) -> Self {
        Self {
            package: Arc::from(package),
            relative: Arc::from(relative),
        }
    }

    /// Split a dotted path at its last segment.
    ///
    /// `"core.collections.List"` becomes package `core.collections`, relative
    /// `List`; a path without dots has an empty package.
    pub fn parse(path: &str) -> Self {
        match path.rsplit_once('.') {
            Some((package, relative)) => Self::new(package, relative),
            None => Self::new("", path),
        }
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn relative(&self) -> &str {
        &self.relative
    }

    /// Last segment of the relative name.
    pub fn simple_name(&self) -> &str {
        self.relative
            .rsplit_once('.')
            .map_or(&*self.relative, |(_, simple)| simple)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.package.is_empty() {
            f.write_str(&self.relative)
        } else {
            write!(f, "{}.{}", self.package, self.relative)
        }
    }
}

impl fmt::Debug for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{self}`")
    }
}

impl From<&str> for QualifiedName {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}
