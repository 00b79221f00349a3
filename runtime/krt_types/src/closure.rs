//! Transitive interface closures.
//!
//! Interfaces allow multiple inheritance and diamonds, so there is no
//! interval encoding for them. Each descriptor instead gets the full set of
//! interfaces it satisfies, paid for once at publication:
//!
//! ```text
//! closure(T) = direct(T) ∪ closure(direct...) ∪ closure(superclass(T)) ∪ {T if interface}
//! ```

use rustc_hash::FxHashSet;

use crate::registry::TypeEntry;
use crate::{InterfaceClosure, LoadError, TypeId};

#[derive(Copy, Clone, PartialEq, Eq)]
enum Visit {
    New,
    InProgress,
    Done,
}

/// Supertypes whose closures feed into `entry`'s.
fn supertypes(entry: &TypeEntry) -> impl Iterator<Item = TypeId> + '_ {
    entry.superclass.into_iter().chain(entry.interfaces.iter().copied())
}

/// Compute the closure of every entry, memoised, in one pass.
///
/// Fails on a cycle through superclass or interface edges.
pub(crate) fn compute_all(entries: &[TypeEntry]) -> Result<Vec<InterfaceClosure>, LoadError> {
    let count = entries.len();
    let mut sets: Vec<FxHashSet<TypeId>> = vec![FxHashSet::default(); count];

    walk(entries, 0, |index| {
        let entry = &entries[index];
        let mut set = FxHashSet::default();
        if entry.kind.is_interface() {
            set.insert(TypeId::from_raw(
                u32::try_from(index).map_err(|_| LoadError::Overflow { count })?,
            ));
        }
        for parent in supertypes(entry) {
            set.extend(sets[parent.index()].iter().copied());
        }
        sets[index] = set;
        Ok(())
    })?;

    tracing::debug!(types = count, "computed interface closures");
    Ok(sets.into_iter().map(InterfaceClosure::from_set).collect())
}

/// Reject cycles among the entries from `first_new` on.
///
/// Entries before `first_new` were checked when they were loaded and never
/// point at later ones, so a new cycle can only run through new entries.
pub(crate) fn check_acyclic(entries: &[TypeEntry], first_new: usize) -> Result<(), LoadError> {
    walk(entries, first_new, |_| Ok(()))
}

/// Post-order walk over supertype edges of every entry from `from` on.
///
/// Edges into entries before `from` are not followed. `finish` runs once
/// per entry, after all of its followed supertypes.
fn walk(
    entries: &[TypeEntry],
    from: usize,
    mut finish: impl FnMut(usize) -> Result<(), LoadError>,
) -> Result<(), LoadError> {
    let mut state = vec![Visit::New; entries.len().saturating_sub(from)];
    let slot = |index: usize| index - from;

    let cycle = |index: usize| LoadError::InheritanceCycle {
        name: entries[index].name.clone(),
    };

    for start in from..entries.len() {
        if state[slot(start)] == Visit::Done {
            continue;
        }
        // (entry index, all supertypes finished)
        let mut stack: Vec<(usize, bool)> = vec![(start, false)];

        while let Some((index, finished)) = stack.pop() {
            if finished {
                finish(index)?;
                state[slot(index)] = Visit::Done;
                continue;
            }

            match state[slot(index)] {
                Visit::Done => continue,
                Visit::InProgress => return Err(cycle(index)),
                Visit::New => {}
            }
            state[slot(index)] = Visit::InProgress;
            stack.push((index, true));

            for parent in supertypes(&entries[index]).map(TypeId::index) {
                if parent < from {
                    continue;
                }
                match state[slot(parent)] {
                    Visit::Done => {}
                    Visit::InProgress => return Err(cycle(parent)),
                    Visit::New => stack.push((parent, false)),
                }
            }
        }
    }
    Ok(())
}
