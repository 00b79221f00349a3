//! Property tests for the hierarchy index and interface closures.
//!
//! Random class trees and interface DAGs are loaded through the public
//! registry API, then every answer is compared against a naive walk of the
//! declared supertypes.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::cast_possible_truncation,
    clippy::needless_pass_by_value,
    reason = "Proptest macros generate code with these patterns"
)]

use krt_types::{
    HierarchyConfig, InstanceLayout, ModuleTypes, SiblingOrder, TypeDecl, TypeId, TypeRegistry,
    TypeUniverse,
};
use proptest::prelude::*;
use proptest::sample::Index;

/// A random hierarchy: `parents[i]` is `None` for a child of the root or
/// `Some(j)` with `j < i`; `extends[k]` lists interfaces `< k` that
/// interface `k` extends; `implements[i]` lists interfaces class `i`
/// implements.
#[derive(Clone, Debug)]
struct Shape {
    parents: Vec<Option<usize>>,
    extends: Vec<Vec<usize>>,
    implements: Vec<Vec<usize>>,
}

fn shape_strategy() -> impl Strategy<Value = Shape> {
    (1usize..40, 0usize..8).prop_flat_map(|(classes, interfaces)| {
        let parents = prop::collection::vec(any::<Index>(), classes).prop_map(|picks| {
            picks
                .iter()
                .enumerate()
                .map(|(i, pick)| {
                    // Slot 0 means the root.
                    let slot = pick.index(i + 1);
                    slot.checked_sub(1)
                })
                .collect::<Vec<_>>()
        });
        let extends = prop::collection::vec(
            prop::collection::vec(any::<Index>(), 0..3),
            interfaces,
        )
        .prop_map(|rows| {
            rows.iter()
                .enumerate()
                .map(|(k, picks)| {
                    let mut row: Vec<usize> = if k == 0 {
                        Vec::new()
                    } else {
                        picks.iter().map(|p| p.index(k)).collect()
                    };
                    row.sort_unstable();
                    row.dedup();
                    row
                })
                .collect::<Vec<_>>()
        });
        let implements = prop::collection::vec(
            prop::collection::vec(any::<Index>(), 0..3),
            classes,
        )
        .prop_map(move |rows| {
            rows.iter()
                .map(|picks| {
                    if interfaces == 0 {
                        return Vec::new();
                    }
                    let mut row: Vec<usize> = picks.iter().map(|p| p.index(interfaces)).collect();
                    row.sort_unstable();
                    row.dedup();
                    row
                })
                .collect::<Vec<_>>()
        });
        (parents, extends, implements).prop_map(|(parents, extends, implements)| Shape {
            parents,
            extends,
            implements,
        })
    })
}

fn class_name(i: usize) -> String {
    format!("gen.C{i}")
}

fn interface_name(k: usize) -> String {
    format!("gen.I{k}")
}

/// Declarations for `shape`, emitted in the order given by `order`
/// (a permutation of class indices). Interfaces always come last.
fn module(shape: &Shape, order: &[usize]) -> ModuleTypes {
    let mut module = ModuleTypes::new("gen");
    for &i in order {
        let mut decl = TypeDecl::class(&class_name(i), InstanceLayout::header_only());
        if let Some(parent) = shape.parents[i] {
            decl = decl.extends(class_name(parent).as_str());
        }
        for &k in &shape.implements[i] {
            decl = decl.implements(interface_name(k).as_str());
        }
        module.push(decl);
    }
    for (k, extends) in shape.extends.iter().enumerate() {
        let mut decl = TypeDecl::interface(&interface_name(k));
        for &j in extends {
            decl = decl.implements(interface_name(j).as_str());
        }
        module.push(decl);
    }
    module
}

fn publish(shape: &Shape, order: &[usize], sibling_order: SiblingOrder) -> TypeUniverse {
    let mut registry = TypeRegistry::new();
    registry.load_module(&module(shape, order)).unwrap();
    registry
        .publish(&HierarchyConfig { sibling_order })
        .unwrap()
}

fn class_id(universe: &TypeUniverse, i: usize) -> TypeId {
    universe.lookup_str(&class_name(i)).unwrap()
}

fn interface_id(universe: &TypeUniverse, k: usize) -> TypeId {
    universe.lookup_str(&interface_name(k)).unwrap()
}

/// `a` is `b` or an ancestor of `b`, by walking `b`'s parent chain.
fn is_ancestor_naive(shape: &Shape, a: usize, b: usize) -> bool {
    let mut current = Some(b);
    while let Some(c) = current {
        if c == a {
            return true;
        }
        current = shape.parents[c];
    }
    false
}

/// Every interface reachable from class `i` through parents and extension.
fn interfaces_naive(shape: &Shape, i: usize) -> Vec<bool> {
    let mut seen = vec![false; shape.extends.len()];
    let mut stack: Vec<usize> = Vec::new();
    let mut current = Some(i);
    while let Some(c) = current {
        stack.extend(&shape.implements[c]);
        current = shape.parents[c];
    }
    while let Some(k) = stack.pop() {
        if !seen[k] {
            seen[k] = true;
            stack.extend(&shape.extends[k]);
        }
    }
    seen
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn ranges_encode_ancestry(shape in shape_strategy()) {
        let order: Vec<usize> = (0..shape.parents.len()).collect();
        let universe = publish(&shape, &order, SiblingOrder::Registration);
        let root = universe.descriptor(TypeId::ANY).range().unwrap();

        for a in 0..shape.parents.len() {
            let ra = universe.descriptor(class_id(&universe, a)).range().unwrap();
            prop_assert!(ra.lo <= ra.hi);
            prop_assert!(root.contains(ra));
            for b in 0..shape.parents.len() {
                let rb = universe.descriptor(class_id(&universe, b)).range().unwrap();
                let expected = is_ancestor_naive(&shape, a, b);
                prop_assert_eq!(ra.contains(rb), expected, "C{} vs C{}", a, b);
                if expected {
                    prop_assert!(ra.lo <= rb.lo && rb.hi <= ra.hi);
                } else if !is_ancestor_naive(&shape, b, a) {
                    prop_assert!(ra.is_disjoint(rb), "C{} and C{} overlap", a, b);
                }
            }
        }
    }

    #[test]
    fn subtype_matches_naive_walk(shape in shape_strategy()) {
        let order: Vec<usize> = (0..shape.parents.len()).collect();
        let universe = publish(&shape, &order, SiblingOrder::Registration);

        for i in 0..shape.parents.len() {
            let id = class_id(&universe, i);
            let reachable = interfaces_naive(&shape, i);
            for (k, &expected) in reachable.iter().enumerate() {
                let interface = interface_id(&universe, k);
                prop_assert_eq!(universe.is_subtype(id, interface), expected);
            }
            prop_assert!(universe.is_subtype(id, TypeId::ANY));
        }

        for k in 0..shape.extends.len() {
            let a = interface_id(&universe, k);
            prop_assert!(universe.is_sub_interface(a, a));
            prop_assert!(universe.is_subtype(a, TypeId::ANY));
            for &j in &shape.extends[k] {
                prop_assert!(universe.is_sub_interface(a, interface_id(&universe, j)));
            }
        }
    }

    #[test]
    fn name_order_is_independent_of_declaration_order(
        shape in shape_strategy(),
        seed in any::<u64>(),
    ) {
        let forward: Vec<usize> = (0..shape.parents.len()).collect();
        let mut shuffled = forward.clone();
        // Deterministic shuffle from the seed.
        let mut state = seed | 1;
        for i in (1..shuffled.len()).rev() {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let j = (state % (i as u64 + 1)) as usize;
            shuffled.swap(i, j);
        }

        let a = publish(&shape, &forward, SiblingOrder::Name);
        let b = publish(&shape, &shuffled, SiblingOrder::Name);
        for i in 0..shape.parents.len() {
            prop_assert_eq!(
                a.descriptor(class_id(&a, i)).range(),
                b.descriptor(class_id(&b, i)).range()
            );
        }
    }
}
