//! The single-writer type registry.
//!
//! The registry is the mutable half of the type layer: module loads append
//! to it, and `publish` turns its current contents into an immutable
//! `TypeUniverse` that queries run against.
//!
//! # Design
//!
//! - Append-only: ids are never reused and entries never removed
//! - Interning: one id per qualified name, one id per object-array element
//! - Atomic loads: a failed module load leaves the registry untouched
//! - Conflicting redeclarations are errors, never silently merged

mod resolve;

use std::sync::Arc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::hierarchy::{HierarchyConfig, HierarchyIndex};
use crate::{
    closure, well_known, LoadError, ModuleTypes, QualifiedName, TypeFlags, TypeId, TypeKind,
    TypeUniverse,
};

/// A registered type before publication.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TypeEntry {
    pub name: QualifiedName,
    pub kind: TypeKind,
    pub superclass: Option<TypeId>,
    pub interfaces: SmallVec<[TypeId; 4]>,
    /// Declared flags only; category flags are derived at publication.
    pub flags: TypeFlags,
    pub module: Arc<str>,
}

impl TypeEntry {
    /// Same metadata, ignoring which module declared it and interface order.
    fn same_metadata(&self, other: &TypeEntry) -> bool {
        if self.kind != other.kind
            || self.superclass != other.superclass
            || self.flags != other.flags
            || self.interfaces.len() != other.interfaces.len()
        {
            return false;
        }
        let mut mine = self.interfaces.clone();
        let mut theirs = other.interfaces.clone();
        mine.sort_unstable();
        theirs.sort_unstable();
        mine == theirs
    }
}

/// Registry contents at a point in time, for `TypeRegistry::rollback`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Checkpoint {
    len: usize,
    revision: u64,
}

/// Registry of every type the runtime knows about.
#[derive(Clone, Debug)]
pub struct TypeRegistry {
    /// Indexed by `TypeId`.
    entries: Vec<TypeEntry>,
    /// Nominal types and well-known primitive arrays by qualified name.
    by_name: FxHashMap<QualifiedName, TypeId>,
    /// Object-array types by element type.
    arrays: FxHashMap<TypeId, TypeId>,
    /// Number of successful module loads.
    revision: u64,
}

impl TypeRegistry {
    /// Create a registry holding only the well-known types.
    pub fn new() -> Self {
        let entries = well_known::entries();
        let mut by_name = FxHashMap::default();
        let mut arrays = FxHashMap::default();
        for (index, entry) in entries.iter().enumerate() {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "the well-known table is fixed and small"
            )]
            let id = TypeId::from_raw(index as u32);
            if let TypeKind::ObjectArray { element } = entry.kind {
                arrays.insert(element, id);
            } else {
                by_name.insert(entry.name.clone(), id);
            }
        }
        Self {
            entries,
            by_name,
            arrays,
            revision: 0,
        }
    }

    /// Number of registered types, well-known ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`: the well-known types are registered at creation.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of successful module loads so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Look up a nominal type.
    pub fn lookup(&self, name: &QualifiedName) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    /// Name of a registered type.
    pub fn name_of(&self, id: TypeId) -> Option<&QualifiedName> {
        self.entries.get(id.index()).map(|e| &e.name)
    }

    /// Kind of a registered type.
    pub fn kind_of(&self, id: TypeId) -> Option<&TypeKind> {
        self.entries.get(id.index()).map(|e| &e.kind)
    }

    /// Intern the object-array type with the given element type.
    pub fn array_of(&mut self, element: TypeId) -> Result<TypeId, LoadError> {
        if element.index() >= self.entries.len() {
            return Err(LoadError::UnknownId {
                from: QualifiedName::new(well_known::CORE_PACKAGE, "Array"),
                id: element,
            });
        }
        self.intern_array(element)
    }

    /// Register every declaration of a module.
    ///
    /// Returns the ids of the declared types, in declaration order. Either
    /// the whole module is registered or, on error, nothing is.
    #[tracing::instrument(level = "debug", skip_all, fields(module = %module.module, decls = module.len()))]
    pub fn load_module(&mut self, module: &ModuleTypes) -> Result<Vec<TypeId>, LoadError> {
        let checkpoint = self.checkpoint();
        match self.load_in_place(module) {
            Ok(ids) => {
                tracing::debug!(types = self.entries.len(), revision = self.revision, "module registered");
                Ok(ids)
            }
            Err(err) => {
                self.rollback(checkpoint);
                Err(err)
            }
        }
    }

    /// Mark the current contents so a later change can be undone.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            len: self.entries.len(),
            revision: self.revision,
        }
    }

    /// Forget everything registered after `checkpoint` was taken.
    ///
    /// Loads only append entries and never edit existing ones, so dropping
    /// the newer ids restores the earlier contents exactly.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        if self.entries.len() > checkpoint.len {
            let len = checkpoint.len;
            self.entries.truncate(len);
            self.by_name.retain(|_, id| id.index() < len);
            self.arrays.retain(|_, id| id.index() < len);
        }
        self.revision = checkpoint.revision;
    }

    /// Build the hierarchy index and interface closures and freeze the
    /// current contents into a universe.
    ///
    /// The registry itself is unchanged and can keep accepting modules; a
    /// later publish produces a new, complete universe.
    #[tracing::instrument(level = "debug", skip_all, fields(types = self.entries.len(), revision = self.revision))]
    pub fn publish(&self, config: &HierarchyConfig) -> Result<TypeUniverse, LoadError> {
        let index = HierarchyIndex::build(&self.entries, config)?;
        let closures = closure::compute_all(&self.entries)?;
        let universe = TypeUniverse::assemble(
            &self.entries,
            index,
            closures,
            self.by_name.clone(),
            self.arrays.clone(),
            self.revision,
        );
        tracing::debug!(
            classes = universe.class_count(),
            interfaces = universe.interface_count(),
            "published type universe"
        );
        Ok(universe)
    }

    fn push_entry(&mut self, entry: TypeEntry) -> Result<TypeId, LoadError> {
        let raw = u32::try_from(self.entries.len())
            .ok()
            .filter(|&raw| raw != TypeId::NONE.raw())
            .ok_or(LoadError::Overflow {
                count: self.entries.len(),
            })?;
        self.entries.push(entry);
        Ok(TypeId::from_raw(raw))
    }

    fn intern_array(&mut self, element: TypeId) -> Result<TypeId, LoadError> {
        if let Some(&id) = self.arrays.get(&element) {
            return Ok(id);
        }
        let element_entry = &self.entries[element.index()];
        let entry = TypeEntry {
            name: well_known::array_name(&element_entry.name),
            kind: TypeKind::ObjectArray { element },
            superclass: Some(TypeId::ANY),
            interfaces: SmallVec::new(),
            flags: TypeFlags::empty(),
            module: Arc::clone(&element_entry.module),
        };
        let id = self.push_entry(entry)?;
        self.arrays.insert(element, id);
        Ok(id)
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
