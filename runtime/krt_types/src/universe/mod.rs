//! Published, immutable type universe.
//!
//! A `TypeUniverse` is one complete snapshot of every descriptor together
//! with the hierarchy index and interface closures. Nothing in it changes
//! after publication, so any number of threads can read it without locks.
//! Loading more types produces a new universe; it never edits this one.

use rustc_hash::FxHashMap;

use crate::hierarchy::HierarchyIndex;
use crate::registry::TypeEntry;
use crate::{
    ArrayElement, InterfaceClosure, QualifiedName, TypeDescriptor, TypeFlags, TypeId, TypeKind,
};

/// Immutable snapshot of all published descriptors.
#[derive(Debug)]
pub struct TypeUniverse {
    /// Indexed by `TypeId`.
    descriptors: Box<[TypeDescriptor]>,
    by_name: FxHashMap<QualifiedName, TypeId>,
    arrays: FxHashMap<TypeId, TypeId>,
    index: HierarchyIndex,
    revision: u64,
}

impl TypeUniverse {
    pub(crate) fn assemble(
        entries: &[TypeEntry],
        index: HierarchyIndex,
        closures: Vec<InterfaceClosure>,
        by_name: FxHashMap<QualifiedName, TypeId>,
        arrays: FxHashMap<TypeId, TypeId>,
        revision: u64,
    ) -> Self {
        let descriptors = entries
            .iter()
            .zip(closures)
            .enumerate()
            .map(|(position, (entry, closure))| {
                // Entry count was bounded by `TypeId` when the registry grew.
                #[expect(clippy::cast_possible_truncation, reason = "bounded by registry")]
                let id = TypeId::from_raw(position as u32);
                TypeDescriptor {
                    id,
                    name: entry.name.clone(),
                    kind: entry.kind.clone(),
                    superclass: entry.superclass,
                    interfaces: entry.interfaces.clone(),
                    closure,
                    range: index.range(id),
                    flags: entry.flags.declared() | TypeFlags::for_kind(&entry.kind),
                    module: entry.module.clone(),
                }
            })
            .collect();

        Self {
            descriptors,
            by_name,
            arrays,
            index,
            revision,
        }
    }

    /// Descriptor of a published type.
    ///
    /// # Panics
    ///
    /// If `id` was not published in this universe. Generated code only
    /// holds ids of loaded types, so this is a broken runtime invariant.
    #[inline]
    pub fn descriptor(&self, id: TypeId) -> &TypeDescriptor {
        match self.descriptors.get(id.index()) {
            Some(descriptor) => descriptor,
            None => unpublished_type(id, self.descriptors.len()),
        }
    }

    /// Descriptor of `id`, or `None` if it is not published here.
    #[inline]
    pub fn get(&self, id: TypeId) -> Option<&TypeDescriptor> {
        self.descriptors.get(id.index())
    }

    pub fn lookup(&self, name: &QualifiedName) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    /// Look up a nominal type by dotted path.
    pub fn lookup_str(&self, path: &str) -> Option<TypeId> {
        self.lookup(&QualifiedName::parse(path))
    }

    /// Object-array type over `element`, if one was interned before
    /// publication. Interning only happens in the registry.
    pub fn array_of(&self, element: TypeId) -> Option<TypeId> {
        self.arrays.get(&element).copied()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.descriptors.iter()
    }

    /// Registry revision this universe was published from.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn index(&self) -> &HierarchyIndex {
        &self.index
    }

    /// Number of published non-array class-tree members.
    pub fn class_count(&self) -> usize {
        self.descriptors
            .iter()
            .filter(|d| matches!(d.kind, TypeKind::Class(_) | TypeKind::ForeignWrapper))
            .count()
    }

    pub fn interface_count(&self) -> usize {
        self.descriptors.iter().filter(|d| d.is_interface()).count()
    }

    /// Type-level subtyping: every value of `sub` is a value of `sup`.
    ///
    /// - Class and foreign-wrapper targets: range containment. An interface
    ///   is a subtype of the root only.
    /// - Interface targets: closure membership.
    /// - Object-array targets: covariant in the element type.
    /// - Primitive-array targets: identity only.
    pub fn is_subtype(&self, sub: TypeId, sup: TypeId) -> bool {
        if sub == sup {
            return true;
        }
        let target = self.descriptor(sup);
        let actual = self.descriptor(sub);
        match target.kind {
            TypeKind::Class(_) | TypeKind::ForeignWrapper => match (target.range, actual.range) {
                (Some(target), Some(actual)) => target.contains(actual),
                // Interfaces carry no range but still sit under the root.
                (_, None) => actual.is_interface() && sup.is_any(),
                (None, Some(_)) => false,
            },
            TypeKind::Interface => actual.closure.contains(sup),
            TypeKind::ObjectArray { element: expected } => match actual.element() {
                Some(ArrayElement::Object(element)) => self.is_subtype(element, expected),
                _ => false,
            },
            TypeKind::PrimitiveArray(_) => false,
        }
    }

    /// `true` iff `b` is in the interface closure of `a`.
    #[inline]
    pub fn is_sub_interface(&self, a: TypeId, b: TypeId) -> bool {
        self.descriptor(a).closure.contains(b)
    }
}

#[cold]
#[inline(never)]
fn unpublished_type(id: TypeId, published: usize) -> ! {
    tracing::error!(?id, published, "query for unpublished type");
    panic!("type {id:?} is not published ({published} types in this universe)")
}
