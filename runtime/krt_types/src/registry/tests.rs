use pretty_assertions::assert_eq;

use super::*;
use crate::{DeclShape, ElementKind, InstanceLayout, TypeDecl, TypeRef};

fn animals() -> ModuleTypes {
    ModuleTypes::new("zoo")
        .with(TypeDecl::interface("zoo.Named"))
        .with(TypeDecl::class("zoo.Animal", InstanceLayout::header_only()).implements("zoo.Named"))
        .with(TypeDecl::class("zoo.Dog", InstanceLayout::header_only()).extends("zoo.Animal"))
}

#[test]
fn new_registry_holds_well_known_types() {
    let registry = TypeRegistry::new();

    assert_eq!(registry.len(), TypeId::WELL_KNOWN_COUNT as usize);
    assert_eq!(registry.revision(), 0);
    assert_eq!(
        registry.lookup(&QualifiedName::new("core", "String")),
        Some(TypeId::STRING)
    );
    assert_eq!(
        registry.lookup(&QualifiedName::new("core", "IntArray")),
        Some(TypeId::INT_ARRAY)
    );
    assert_eq!(
        registry.lookup(&QualifiedName::new("core", "CleanerImpl")),
        Some(TypeId::CLEANER_IMPL)
    );
    assert_eq!(
        registry.kind_of(TypeId::ARRAY),
        Some(&TypeKind::ObjectArray {
            element: TypeId::ANY
        })
    );
}

#[test]
fn load_assigns_dynamic_ids_in_declaration_order() {
    let mut registry = TypeRegistry::new();
    let ids = registry.load_module(&animals()).unwrap();

    let first = TypeId::FIRST_DYNAMIC;
    assert_eq!(
        ids,
        vec![
            TypeId::from_raw(first),
            TypeId::from_raw(first + 1),
            TypeId::from_raw(first + 2),
        ]
    );
    assert_eq!(registry.revision(), 1);
    assert_eq!(
        registry.name_of(ids[2]).map(ToString::to_string),
        Some("zoo.Dog".to_owned())
    );
}

#[test]
fn forward_references_resolve_within_a_module() {
    let module = ModuleTypes::new("fwd")
        .with(TypeDecl::class("fwd.Child", InstanceLayout::header_only()).extends("fwd.Parent"))
        .with(TypeDecl::class("fwd.Parent", InstanceLayout::header_only()));
    let mut registry = TypeRegistry::new();
    let ids = registry.load_module(&module).unwrap();

    assert_eq!(registry.entries[ids[0].index()].superclass, Some(ids[1]));
}

#[test]
fn identical_redeclaration_is_idempotent() {
    let mut registry = TypeRegistry::new();
    let first = registry.load_module(&animals()).unwrap();
    let len = registry.len();

    let mut again = animals();
    again.module = "zoo-copy".to_owned();
    let second = registry.load_module(&again).unwrap();

    assert_eq!(first, second);
    assert_eq!(registry.len(), len);
    assert_eq!(registry.revision(), 2);
}

#[test]
fn redeclaring_a_well_known_type_identically_is_accepted() {
    let module = ModuleTypes::new("m").with(TypeDecl::class("core.Any", InstanceLayout::header_only()));
    let mut registry = TypeRegistry::new();
    assert_eq!(registry.load_module(&module).unwrap(), vec![TypeId::ANY]);
}

#[test]
fn conflicting_redeclaration_is_rejected() {
    let mut registry = TypeRegistry::new();
    registry.load_module(&animals()).unwrap();

    let clash = ModuleTypes::new("other").with(TypeDecl::interface("zoo.Dog"));
    let err = registry.load_module(&clash).unwrap_err();

    match err {
        LoadError::Conflict {
            name,
            existing_module,
            module,
            existing,
            incoming,
        } => {
            assert_eq!(name.to_string(), "zoo.Dog");
            assert_eq!(existing_module, "zoo");
            assert_eq!(module, "other");
            assert_eq!(existing, "class (size 8, 0 refs) extends zoo.Animal");
            assert_eq!(incoming, "interface");
        }
        other => panic!("expected a conflict, got {other:?}"),
    }
}

#[test]
fn conflicting_duplicate_within_one_module_is_rejected() {
    let module = ModuleTypes::new("dup")
        .with(TypeDecl::class("dup.A", InstanceLayout::header_only()))
        .with(TypeDecl::class("dup.A", InstanceLayout::new(16, &[])));
    let err = TypeRegistry::new().load_module(&module).unwrap_err();
    assert!(matches!(err, LoadError::Conflict { .. }), "{err:?}");
}

#[test]
fn root_cannot_change_shape() {
    let module = ModuleTypes::new("evil").with(TypeDecl::interface("core.Any"));
    let err = TypeRegistry::new().load_module(&module).unwrap_err();
    assert_eq!(
        err,
        LoadError::RootRedeclared {
            name: QualifiedName::new("core", "Any"),
            module: "evil".to_owned(),
        }
    );

    let with_parent = ModuleTypes::new("evil")
        .with(TypeDecl::class("core.Any", InstanceLayout::header_only()).extends(TypeId::STRING));
    assert!(matches!(
        TypeRegistry::new().load_module(&with_parent),
        Err(LoadError::RootRedeclared { .. })
    ));
}

#[test]
fn runtime_names_cannot_be_shadowed() {
    let mut registry = TypeRegistry::new();

    let ints = ModuleTypes::new("evil")
        .with(TypeDecl::class("core.IntArray", InstanceLayout::header_only()));
    let err = registry.load_module(&ints).unwrap_err();
    assert!(matches!(err, LoadError::Conflict { .. }), "{err:?}");

    let fresh = ModuleTypes::new("evil")
        .with(TypeDecl::class("core.Sneaky", InstanceLayout::header_only()));
    assert_eq!(
        registry.load_module(&fresh).unwrap_err(),
        LoadError::ReservedName {
            name: QualifiedName::new("core", "Sneaky"),
            module: "evil".to_owned(),
        }
    );

    let array = ModuleTypes::new("evil")
        .with(TypeDecl::class("core.Array<core.Any>", InstanceLayout::header_only()));
    assert!(matches!(
        registry.load_module(&array),
        Err(LoadError::ReservedName { .. })
    ));

    assert_eq!(registry.len(), TypeId::WELL_KNOWN_COUNT as usize);
    let universe = registry.publish(&HierarchyConfig::default()).unwrap();
    assert_eq!(universe.lookup_str("core.IntArray"), Some(TypeId::INT_ARRAY));
    assert_eq!(
        universe
            .iter()
            .filter(|d| d.name().to_string() == "core.IntArray")
            .count(),
        1
    );
}

#[test]
fn failed_load_leaves_registry_unchanged() {
    let mut registry = TypeRegistry::new();
    registry.load_module(&animals()).unwrap();
    let len = registry.len();

    let broken = ModuleTypes::new("broken")
        .with(TypeDecl::class("broken.Fine", InstanceLayout::header_only()))
        .with(TypeDecl::class("broken.Bad", InstanceLayout::header_only()).extends("broken.Missing"));
    let err = registry.load_module(&broken).unwrap_err();

    assert_eq!(
        err,
        LoadError::Unresolved {
            from: QualifiedName::parse("broken.Bad"),
            target: "broken.Missing".to_owned(),
        }
    );
    assert_eq!(registry.len(), len);
    assert_eq!(registry.revision(), 1);
    assert_eq!(registry.lookup(&QualifiedName::parse("broken.Fine")), None);
}

#[test]
fn superclass_must_be_extensible() {
    let module = ModuleTypes::new("m")
        .with(TypeDecl::interface("m.I"))
        .with(TypeDecl::class("m.C", InstanceLayout::header_only()).extends("m.I"));
    let err = TypeRegistry::new().load_module(&module).unwrap_err();
    assert_eq!(
        err,
        LoadError::InvalidSuperclass {
            name: QualifiedName::parse("m.C"),
            superclass: QualifiedName::parse("m.I"),
            kind: "interface",
        }
    );

    let from_array = ModuleTypes::new("m").with(
        TypeDecl::class("m.D", InstanceLayout::header_only())
            .extends(TypeRef::PrimitiveArray(ElementKind::Int)),
    );
    assert!(matches!(
        TypeRegistry::new().load_module(&from_array),
        Err(LoadError::InvalidSuperclass { kind: "primitive array", .. })
    ));
}

#[test]
fn interfaces_cannot_extend_classes() {
    let module = ModuleTypes::new("m").with(TypeDecl::interface("m.I").extends(TypeId::STRING));
    assert!(matches!(
        TypeRegistry::new().load_module(&module),
        Err(LoadError::InvalidSuperclass { kind: "class", .. })
    ));
}

#[test]
fn listed_interfaces_must_be_interfaces() {
    let module = ModuleTypes::new("m")
        .with(TypeDecl::class("m.C", InstanceLayout::header_only()).implements(TypeId::STRING));
    let err = TypeRegistry::new().load_module(&module).unwrap_err();
    assert_eq!(
        err,
        LoadError::NotAnInterface {
            name: QualifiedName::parse("m.C"),
            listed: QualifiedName::new("core", "String"),
            kind: "class",
        }
    );
}

#[test]
fn invalid_layout_is_rejected() {
    let module = ModuleTypes::new("m").with(TypeDecl::class("m.C", InstanceLayout::new(16, &[4])));
    let err = TypeRegistry::new().load_module(&module).unwrap_err();
    assert_eq!(
        err,
        LoadError::InvalidLayout {
            name: QualifiedName::parse("m.C"),
            violation: crate::LayoutViolation::InsideHeader { offset: 4 },
        }
    );
}

#[test]
fn superclass_cycles_are_rejected() {
    let module = ModuleTypes::new("m")
        .with(TypeDecl::class("m.A", InstanceLayout::header_only()).extends("m.B"))
        .with(TypeDecl::class("m.B", InstanceLayout::header_only()).extends("m.A"));
    assert!(matches!(
        TypeRegistry::new().load_module(&module),
        Err(LoadError::InheritanceCycle { .. })
    ));

    let self_loop = ModuleTypes::new("m")
        .with(TypeDecl::class("m.A", InstanceLayout::header_only()).extends("m.A"));
    assert!(matches!(
        TypeRegistry::new().load_module(&self_loop),
        Err(LoadError::InheritanceCycle { .. })
    ));
}

#[test]
fn interface_extension_cycles_are_rejected() {
    let module = ModuleTypes::new("m")
        .with(TypeDecl::interface("m.I").implements("m.J"))
        .with(TypeDecl::interface("m.J").implements("m.I"));
    assert!(matches!(
        TypeRegistry::new().load_module(&module),
        Err(LoadError::InheritanceCycle { .. })
    ));
}

#[test]
fn unknown_ids_are_rejected() {
    let module = ModuleTypes::new("m").with(
        TypeDecl::class("m.C", InstanceLayout::header_only()).extends(TypeId::from_raw(1000)),
    );
    assert!(matches!(
        TypeRegistry::new().load_module(&module),
        Err(LoadError::UnknownId { .. })
    ));
}

#[test]
fn object_arrays_are_interned_structurally() {
    let mut registry = TypeRegistry::new();
    let ids = registry.load_module(&animals()).unwrap();
    let dog = ids[2];

    let dogs = registry.array_of(dog).unwrap();
    assert_eq!(registry.array_of(dog).unwrap(), dogs);
    assert_eq!(registry.array_of(TypeId::ANY).unwrap(), TypeId::ARRAY);
    assert_eq!(
        registry.name_of(dogs).map(ToString::to_string),
        Some("core.Array<zoo.Dog>".to_owned())
    );

    let nested = registry.array_of(dogs).unwrap();
    assert_eq!(
        registry.kind_of(nested),
        Some(&TypeKind::ObjectArray { element: dogs })
    );
    assert!(registry.array_of(TypeId::from_raw(1000)).is_err());
}

#[test]
fn array_refs_in_declarations_intern_arrays() {
    let module = ModuleTypes::new("m")
        .with(TypeDecl::interface("m.I"))
        .with(
            TypeDecl::class("m.Holder", InstanceLayout::header_only())
                .implements("m.I"),
        );
    let mut registry = TypeRegistry::new();
    let ids = registry.load_module(&module).unwrap();
    let before = registry.len();

    let bad = ModuleTypes::new("n").with(
        TypeDecl::class("n.X", InstanceLayout::header_only())
            .implements(TypeRef::array_of(TypeRef::named("m.Holder"))),
    );
    let err = registry.load_module(&bad).unwrap_err();
    assert!(matches!(err, LoadError::NotAnInterface { kind: "object array", .. }), "{err:?}");
    assert_eq!(registry.len(), before, "staged array must not leak");
    assert_eq!(registry.arrays.get(&ids[1]), None);
}

#[test]
fn declared_flags_are_masked() {
    let module = ModuleTypes::new("m").with(
        TypeDecl::class("m.C", InstanceLayout::header_only())
            .with_flags(TypeFlags::IMMUTABLE | TypeFlags::IS_ARRAY),
    );
    let mut registry = TypeRegistry::new();
    let ids = registry.load_module(&module).unwrap();
    assert_eq!(registry.entries[ids[0].index()].flags, TypeFlags::IMMUTABLE);
}

#[test]
fn publish_does_not_consume_the_registry() {
    let mut registry = TypeRegistry::new();
    registry.load_module(&animals()).unwrap();
    let first = registry.publish(&HierarchyConfig::default()).unwrap();

    let more = ModuleTypes::new("more").with(
        TypeDecl::class("more.Cat", InstanceLayout::header_only()).extends("zoo.Animal"),
    );
    registry.load_module(&more).unwrap();
    let second = registry.publish(&HierarchyConfig::default()).unwrap();

    assert_eq!(first.len() + 1, second.len());
    assert_eq!(first.revision(), 1);
    assert_eq!(second.revision(), 2);
    assert!(first.lookup_str("more.Cat").is_none());
    assert!(second.lookup_str("more.Cat").is_some());
}

#[test]
fn foreign_wrappers_can_be_extended() {
    let module = ModuleTypes::new("ffi").with(
        TypeDecl {
            name: QualifiedName::parse("ffi.NSObjectWrapper"),
            shape: DeclShape::ForeignWrapper,
            superclass: Some(TypeRef::Id(TypeId::FOREIGN_OBJECT)),
            interfaces: Vec::new(),
            flags: TypeFlags::HAS_FINALIZER,
        },
    );
    let mut registry = TypeRegistry::new();
    let ids = registry.load_module(&module).unwrap();
    assert_eq!(
        registry.entries[ids[0].index()].superclass,
        Some(TypeId::FOREIGN_OBJECT)
    );
}

#[test]
fn rollback_forgets_later_types() {
    let mut registry = TypeRegistry::new();
    let ids = registry.load_module(&animals()).unwrap();
    let checkpoint = registry.checkpoint();
    let len = registry.len();

    let more = ModuleTypes::new("more").with(
        TypeDecl::class("more.Cat", InstanceLayout::header_only()).extends("zoo.Animal"),
    );
    registry.load_module(&more).unwrap();
    registry.array_of(ids[2]).unwrap();
    assert_eq!(registry.revision(), 2);

    registry.rollback(checkpoint);
    assert_eq!(registry.len(), len);
    assert_eq!(registry.revision(), 1);
    assert_eq!(registry.lookup(&QualifiedName::parse("more.Cat")), None);
    assert_eq!(registry.arrays.get(&ids[2]), None);
    assert_eq!(registry.lookup(&QualifiedName::parse("zoo.Dog")), Some(ids[2]));

    // Ids are handed out again from the checkpoint.
    let again = registry.load_module(&more).unwrap();
    assert_eq!(again[0].index(), len);
}

#[test]
fn cycles_in_a_later_module_are_rejected() {
    let mut registry = TypeRegistry::new();
    registry.load_module(&animals()).unwrap();
    let len = registry.len();

    let looped = ModuleTypes::new("late")
        .with(TypeDecl::interface("late.I").implements("late.J").implements("zoo.Named"))
        .with(TypeDecl::interface("late.J").implements("late.I"))
        .with(TypeDecl::class("late.C", InstanceLayout::header_only()).implements("late.I"));
    assert!(matches!(
        registry.load_module(&looped),
        Err(LoadError::InheritanceCycle { .. })
    ));
    assert_eq!(registry.len(), len);
    assert_eq!(registry.revision(), 1);
    assert_eq!(registry.lookup(&QualifiedName::parse("late.C")), None);

    let chain = ModuleTypes::new("late")
        .with(TypeDecl::class("late.A", InstanceLayout::header_only()).extends("late.B"))
        .with(TypeDecl::class("late.B", InstanceLayout::header_only()).extends("zoo.Dog"));
    let ids = registry.load_module(&chain).unwrap();
    let universe = registry.publish(&HierarchyConfig::default()).unwrap();
    let named = universe.lookup_str("zoo.Named").unwrap();
    assert!(universe.is_subtype(ids[0], named));
}
