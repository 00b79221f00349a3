//! Interval numbering of the class tree.
//!
//! One depth-first walk assigns each tree member `lo` on entry and, on exit,
//! `hi` = the largest `lo` in its subtree. Then for classes A and B:
//!
//! ```text
//! A is B or an ancestor of B  <=>  A.lo <= B.lo <= A.hi
//! ```
//!
//! Sibling ranges are disjoint and every range contains its descendants'.
//! The index is rebuilt from scratch whenever tree membership changes;
//! there is no incremental update.

use smallvec::SmallVec;

use crate::registry::TypeEntry;
use crate::{LoadError, TypeId};

/// Order in which siblings are numbered.
///
/// Not observable through subtype queries; it only affects the concrete
/// numbers, which some embedders want reproducible across processes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SiblingOrder {
    /// Registration order (ascending `TypeId`).
    #[default]
    Registration,
    /// Lexicographic by qualified name, independent of load order.
    Name,
}

/// Hierarchy construction settings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HierarchyConfig {
    pub sibling_order: SiblingOrder,
}

/// Depth-first interval of one tree member.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ClassRange {
    pub lo: i32,
    pub hi: i32,
}

impl ClassRange {
    /// `true` iff `other` is this type or one of its descendants.
    #[inline]
    pub const fn contains(self, other: ClassRange) -> bool {
        self.contains_lo(other.lo)
    }

    /// The fast-path comparison generated code performs with constant bounds.
    #[inline]
    pub const fn contains_lo(self, lo: i32) -> bool {
        self.lo <= lo && lo <= self.hi
    }

    /// `true` iff neither range contains the other's entry point.
    #[inline]
    pub const fn is_disjoint(self, other: ClassRange) -> bool {
        self.hi < other.lo || other.hi < self.lo
    }
}

/// Ranges for every tree member, indexed by `TypeId`.
#[derive(Clone, Debug, Default)]
pub struct HierarchyIndex {
    ranges: Vec<Option<ClassRange>>,
    members: usize,
}

impl HierarchyIndex {
    /// Number the class tree rooted at `TypeId::ANY`.
    ///
    /// Fails if a tree member cannot be reached from the root, which only
    /// happens when a superclass chain loops.
    pub(crate) fn build(entries: &[TypeEntry], config: &HierarchyConfig) -> Result<Self, LoadError> {
        let count = entries.len();
        let mut children: Vec<SmallVec<[TypeId; 4]>> = vec![SmallVec::new(); count];
        let mut members = 0usize;

        for (index, entry) in entries.iter().enumerate() {
            if !entry.kind.in_class_tree() {
                continue;
            }
            members += 1;
            if let Some(parent) = entry.superclass {
                let child = TypeId::from_raw(
                    u32::try_from(index).map_err(|_| LoadError::Overflow { count })?,
                );
                children[parent.index()].push(child);
            }
        }

        if config.sibling_order == SiblingOrder::Name {
            for siblings in &mut children {
                siblings.sort_by(|a, b| entries[a.index()].name.cmp(&entries[b.index()].name));
            }
        }

        let mut ranges: Vec<Option<ClassRange>> = vec![None; count];
        let mut next: i32 = 0;
        // (node, exiting)
        let mut stack: Vec<(TypeId, bool)> = vec![(TypeId::ANY, false)];

        while let Some((id, exiting)) = stack.pop() {
            if exiting {
                if let Some(range) = ranges[id.index()].as_mut() {
                    range.hi = next - 1;
                }
                continue;
            }
            ranges[id.index()] = Some(ClassRange { lo: next, hi: next });
            next = next
                .checked_add(1)
                .ok_or(LoadError::Overflow { count })?;
            stack.push((id, true));
            // Reverse so the first sibling is numbered first.
            stack.extend(children[id.index()].iter().rev().map(|&child| (child, false)));
        }

        let numbered = usize::try_from(next).unwrap_or(usize::MAX);
        if numbered != members {
            let orphan = entries
                .iter()
                .enumerate()
                .find(|(index, entry)| entry.kind.in_class_tree() && ranges[*index].is_none())
                .map(|(_, entry)| entry.name.clone());
            if let Some(name) = orphan {
                return Err(LoadError::InheritanceCycle { name });
            }
        }

        tracing::debug!(members, "numbered class tree");
        Ok(Self { ranges, members })
    }

    /// Range of a tree member; `None` for interfaces and unknown ids.
    #[inline]
    pub fn range(&self, id: TypeId) -> Option<ClassRange> {
        self.ranges.get(id.index()).copied().flatten()
    }

    /// `true` iff `ancestor` is `descendant` or one of its superclasses.
    pub fn is_ancestor(&self, ancestor: TypeId, descendant: TypeId) -> bool {
        match (self.range(ancestor), self.range(descendant)) {
            (Some(a), Some(d)) => a.contains(d),
            _ => false,
        }
    }

    /// Number of types that received a range.
    pub fn len(&self) -> usize {
        self.members
    }

    pub fn is_empty(&self) -> bool {
        self.members == 0
    }
}
