//! Runtime configuration.
//!
//! Defaults suit an AOT binary whose types are all known at startup but
//! which may still load plugins later. Embedders override fields directly
//! or read them from the environment:
//!
//! | Variable | Values | Field |
//! |----------|--------|-------|
//! | `KRT_SIBLING_ORDER` | `registration`, `name` | `hierarchy.sibling_order` |
//! | `KRT_LATE_LOADING` | `0`, `1`, `true`, `false` | `allow_late_loading` |
//! | `KRT_LOG` | an `EnvFilter` directive | `log_filter` |

use std::env;

use krt_types::{HierarchyConfig, SiblingOrder};

pub const ENV_SIBLING_ORDER: &str = "KRT_SIBLING_ORDER";
pub const ENV_LATE_LOADING: &str = "KRT_LATE_LOADING";
pub const ENV_LOG: &str = "KRT_LOG";

/// Invalid configuration value.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid value `{value}` for {variable}: expected {expected}")]
pub struct ConfigError {
    pub variable: &'static str,
    pub value: String,
    pub expected: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub hierarchy: HierarchyConfig,
    /// Accept module loads after the first publication. When `false`, the
    /// runtime is sealed once constructed.
    pub allow_late_loading: bool,
    /// Tracing filter; `None` leaves logging off unless `RUST_LOG` is set.
    pub log_filter: Option<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            hierarchy: HierarchyConfig::default(),
            allow_late_loading: true,
            log_filter: None,
        }
    }
}

impl RuntimeConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read the configuration through `lookup`; unset or empty variables
    /// keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(value) = get(ENV_SIBLING_ORDER) {
            config.hierarchy.sibling_order = match value.trim().to_ascii_lowercase().as_str() {
                "registration" => SiblingOrder::Registration,
                "name" => SiblingOrder::Name,
                _ => {
                    return Err(ConfigError {
                        variable: ENV_SIBLING_ORDER,
                        value,
                        expected: "`registration` or `name`",
                    })
                }
            };
        }

        if let Some(value) = get(ENV_LATE_LOADING) {
            config.allow_late_loading = parse_bool(&value).ok_or_else(|| ConfigError {
                variable: ENV_LATE_LOADING,
                value: value.clone(),
                expected: "`0`, `1`, `true` or `false`",
            })?;
        }

        config.log_filter = get(ENV_LOG);
        Ok(config)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    let value = value.trim();
    if value == "1" || value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value == "0" || value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
