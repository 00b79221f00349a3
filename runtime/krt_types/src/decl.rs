//! Type declarations supplied by the module loader.
//!
//! Modules are compiled separately, so a declaration names its supertypes
//! rather than holding `TypeId`s. The registry resolves the names when the
//! module is loaded.

use crate::{ElementKind, InstanceLayout, QualifiedName, TypeFlags, TypeId};

/// Reference to a type from inside a declaration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// An already-known descriptor (well-known types, previously loaded types).
    Id(TypeId),
    /// A nominal type, declared in this module or an earlier one.
    Named(QualifiedName),
    /// Array of references to the inner type.
    ArrayOf(Box<TypeRef>),
    /// A primitive array.
    PrimitiveArray(ElementKind),
}

impl TypeRef {
    pub fn named(path: &str) -> Self {
        Self::Named(QualifiedName::parse(path))
    }

    pub fn array_of(element: TypeRef) -> Self {
        Self::ArrayOf(Box::new(element))
    }
}

impl From<TypeId> for TypeRef {
    fn from(id: TypeId) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for TypeRef {
    fn from(path: &str) -> Self {
        Self::named(path)
    }
}

/// Declared shape. Arrays are never declared; they are interned on demand
/// from `TypeRef::ArrayOf`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeclShape {
    Class(InstanceLayout),
    Interface,
    ForeignWrapper,
}

/// One nominal type as declared by a module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDecl {
    pub name: QualifiedName,
    pub shape: DeclShape,
    /// `None` extends the root type; the root itself has no superclass.
    pub superclass: Option<TypeRef>,
    pub interfaces: Vec<TypeRef>,
    pub flags: TypeFlags,
}

impl TypeDecl {
    fn new(name: &str, shape: DeclShape) -> Self {
        Self {
            name: QualifiedName::parse(name),
            shape,
            superclass: None,
            interfaces: Vec::new(),
            flags: TypeFlags::empty(),
        }
    }

    pub fn class(name: &str, layout: InstanceLayout) -> Self {
        Self::new(name, DeclShape::Class(layout))
    }

    pub fn interface(name: &str) -> Self {
        Self::new(name, DeclShape::Interface)
    }

    pub fn foreign_wrapper(name: &str) -> Self {
        Self::new(name, DeclShape::ForeignWrapper)
    }

    #[must_use]
    pub fn extends(mut self, superclass: impl Into<TypeRef>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    #[must_use]
    pub fn implements(mut self, interface: impl Into<TypeRef>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: TypeFlags) -> Self {
        self.flags |= flags.declared();
        self
    }
}

/// The batch of declarations one module contributes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModuleTypes {
    pub module: String,
    pub decls: Vec<TypeDecl>,
}

impl ModuleTypes {
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            decls: Vec::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, decl: TypeDecl) -> Self {
        self.decls.push(decl);
        self
    }

    pub fn push(&mut self, decl: TypeDecl) {
        self.decls.push(decl);
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}
