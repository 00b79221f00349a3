//! Published type descriptors.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::{ArrayElement, ClassRange, InstanceLayout, QualifiedName, TypeFlags, TypeId, TypeKind};

/// Transitive set of interfaces a type implements.
///
/// Reflexive for interface descriptors: an interface is a member of its own
/// closure, so `is_sub_interface(I, I)` holds without a special case.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InterfaceClosure(FxHashSet<TypeId>);

impl InterfaceClosure {
    pub(crate) fn from_set(set: FxHashSet<TypeId>) -> Self {
        Self(set)
    }

    #[inline]
    pub fn contains(&self, interface: TypeId) -> bool {
        self.0.contains(&interface)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.0.iter().copied()
    }
}

/// Immutable metadata for one published type.
///
/// Owned by a `TypeUniverse`; other descriptors are referenced by `TypeId`.
#[derive(Clone, Debug)]
pub struct TypeDescriptor {
    pub(crate) id: TypeId,
    pub(crate) name: QualifiedName,
    pub(crate) kind: TypeKind,
    pub(crate) superclass: Option<TypeId>,
    pub(crate) interfaces: SmallVec<[TypeId; 4]>,
    pub(crate) closure: InterfaceClosure,
    pub(crate) range: Option<ClassRange>,
    pub(crate) flags: TypeFlags,
    pub(crate) module: std::sync::Arc<str>,
}

impl TypeDescriptor {
    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &QualifiedName {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    /// Nominal superclass; `None` only for the root.
    #[inline]
    pub fn superclass(&self) -> Option<TypeId> {
        self.superclass
    }

    /// Directly implemented (or, for interfaces, extended) interfaces.
    pub fn interfaces(&self) -> &[TypeId] {
        &self.interfaces
    }

    #[inline]
    pub fn closure(&self) -> &InterfaceClosure {
        &self.closure
    }

    /// Hierarchy index range; `None` for interfaces.
    #[inline]
    pub fn range(&self) -> Option<ClassRange> {
        self.range
    }

    #[inline]
    pub fn flags(&self) -> TypeFlags {
        self.flags
    }

    /// Module that first declared this type.
    pub fn module(&self) -> &str {
        &self.module
    }

    #[inline]
    pub fn is_array(&self) -> bool {
        self.flags.is_array()
    }

    #[inline]
    pub fn is_interface(&self) -> bool {
        self.flags.is_interface()
    }

    pub fn layout(&self) -> Option<&InstanceLayout> {
        self.kind.layout()
    }

    pub fn element(&self) -> Option<ArrayElement> {
        self.kind.element()
    }

    /// Width of one array payload slot, for array kinds.
    pub fn element_size(&self) -> Option<usize> {
        self.element().map(ArrayElement::size)
    }
}
