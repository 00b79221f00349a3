//! The fixed table of well-known types.
//!
//! Other runtime subsystems (allocator fast paths, exception machinery,
//! string operations) name these by `TypeId` constant. They are registered
//! before any module so their ids never move.

use std::sync::Arc;

use smallvec::SmallVec;

use crate::layout::POINTER_SIZE;
use crate::registry::TypeEntry;
use crate::{ElementKind, InstanceLayout, QualifiedName, TypeFlags, TypeId, TypeKind};

/// Package of the well-known types.
pub const CORE_PACKAGE: &str = "core";

/// Module name recorded for runtime-provided descriptors.
pub const RUNTIME_MODULE: &str = "<runtime>";

/// Whether `name` belongs to the runtime's own package.
///
/// Array names render with a dotted element (`core.Array<zoo.Dog>`), so a
/// parsed path can put the split inside the brackets.
pub(crate) fn is_reserved(name: &QualifiedName) -> bool {
    let package = name.package();
    package == CORE_PACKAGE || package.starts_with("core.Array<")
}

/// Name given to the object array of `element`.
pub(crate) fn array_name(element: &QualifiedName) -> QualifiedName {
    QualifiedName::new(CORE_PACKAGE, &format!("Array<{element}>"))
}

/// Registry entries for every well-known type, in `TypeId` order.
pub(crate) fn entries() -> Vec<TypeEntry> {
    let module: Arc<str> = Arc::from(RUNTIME_MODULE);
    let entry = |relative: &str, kind: TypeKind, flags: TypeFlags| TypeEntry {
        name: QualifiedName::new(CORE_PACKAGE, relative),
        kind,
        superclass: Some(TypeId::ANY),
        interfaces: SmallVec::new(),
        flags,
        module: Arc::clone(&module),
    };

    let mut entries = Vec::with_capacity(TypeId::WELL_KNOWN_COUNT as usize);

    let mut any = entry(
        "Any",
        TypeKind::Class(InstanceLayout::header_only()),
        TypeFlags::empty(),
    );
    any.superclass = None;
    entries.push(any);

    entries.push(entry(
        "Unit",
        TypeKind::Class(InstanceLayout::header_only()),
        TypeFlags::IMMUTABLE | TypeFlags::ACYCLIC,
    ));
    // Character storage is owned by the string subsystem.
    entries.push(entry(
        "String",
        TypeKind::Class(InstanceLayout::new(16, &[])),
        TypeFlags::IMMUTABLE | TypeFlags::ACYCLIC,
    ));
    // message, cause
    entries.push(entry(
        "Throwable",
        TypeKind::Class(InstanceLayout::new(
            8 + 2 * POINTER_SIZE,
            &[8, 8 + POINTER_SIZE],
        )),
        TypeFlags::empty(),
    ));
    entries.push(entry(
        "OpaqueFunction",
        TypeKind::Class(InstanceLayout::new(8 + POINTER_SIZE, &[])),
        TypeFlags::IMMUTABLE | TypeFlags::ACYCLIC,
    ));
    entries.push(entry(
        "ForeignObject",
        TypeKind::ForeignWrapper,
        TypeFlags::HAS_FINALIZER,
    ));

    let any_name = entries[TypeId::ANY.index()].name.clone();
    let mut array = entry("", TypeKind::ObjectArray { element: TypeId::ANY }, TypeFlags::empty());
    array.name = array_name(&any_name);
    entries.push(array);

    for kind in ElementKind::ALL {
        entries.push(entry(
            &format!("{}Array", kind.name()),
            TypeKind::PrimitiveArray(kind),
            TypeFlags::ACYCLIC,
        ));
    }

    let mut wrapper = entry(
        "ForeignObjectWrapper",
        TypeKind::ForeignWrapper,
        TypeFlags::HAS_FINALIZER,
    );
    wrapper.superclass = Some(TypeId::FOREIGN_OBJECT);
    entries.push(wrapper);

    // value
    entries.push(entry(
        "FreezableAtomicReference",
        TypeKind::Class(InstanceLayout::new(8 + POINTER_SIZE, &[8])),
        TypeFlags::empty(),
    ));
    // Both hold a native handle, not a managed reference.
    entries.push(entry(
        "WorkerBoundReference",
        TypeKind::Class(InstanceLayout::new(8 + POINTER_SIZE, &[])),
        TypeFlags::IMMUTABLE | TypeFlags::HAS_FINALIZER,
    ));
    entries.push(entry(
        "CleanerImpl",
        TypeKind::Class(InstanceLayout::new(8 + POINTER_SIZE, &[])),
        TypeFlags::HAS_FINALIZER,
    ));

    debug_assert_eq!(entries.len(), TypeId::WELL_KNOWN_COUNT as usize);
    entries
}
