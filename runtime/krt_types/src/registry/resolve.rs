//! Module loading: name interning, reference resolution, validation.
//!
//! A module is loaded in two phases. Phase one interns every declared name,
//! so declarations may reference each other in any order. Phase two resolves
//! each declaration's supertypes and checks it against what the registry
//! already holds.

use std::fmt::Write as _;
use std::sync::Arc;

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use super::{TypeEntry, TypeRegistry};
use crate::decl::{DeclShape, ModuleTypes, TypeDecl, TypeRef};
use crate::{closure, well_known, LoadError, QualifiedName, TypeId, TypeKind};

impl TypeRegistry {
    /// Load `module` directly into `self`.
    ///
    /// On error `self` is left half-updated; callers roll back to a
    /// checkpoint taken before the call.
    pub(super) fn load_in_place(&mut self, module: &ModuleTypes) -> Result<Vec<TypeId>, LoadError> {
        let module_name: Arc<str> = Arc::from(module.module.as_str());
        let first_new = self.entries.len();

        // Phase 1: intern every declared name.
        let mut ids = Vec::with_capacity(module.decls.len());
        for decl in &module.decls {
            let id = match self.by_name.get(&decl.name) {
                Some(&id) => id,
                None if well_known::is_reserved(&decl.name) => {
                    tracing::warn!(name = %decl.name, module = %module_name, "reserved name declared");
                    return Err(LoadError::ReservedName {
                        name: decl.name.clone(),
                        module: module.module.clone(),
                    });
                }
                None => {
                    let id = self.push_entry(TypeEntry {
                        name: decl.name.clone(),
                        kind: shape_kind(&decl.shape),
                        superclass: Some(TypeId::ANY),
                        interfaces: SmallVec::new(),
                        flags: decl.flags.declared(),
                        module: Arc::clone(&module_name),
                    })?;
                    self.by_name.insert(decl.name.clone(), id);
                    id
                }
            };
            ids.push(id);
        }

        // Phase 2: resolve, then either fill a fresh entry or check the
        // declaration against the one already registered.
        let mut filled: FxHashSet<TypeId> = FxHashSet::default();
        for (decl, &id) in module.decls.iter().zip(&ids) {
            let resolved = self.resolve_decl(decl, id, &module_name)?;
            if id.index() >= first_new && filled.insert(id) {
                self.entries[id.index()] = resolved;
            } else {
                self.check_compatible(id, &resolved)?;
            }
        }

        closure::check_acyclic(&self.entries, first_new)?;
        self.revision += 1;
        Ok(ids)
    }

    fn resolve_decl(
        &mut self,
        decl: &TypeDecl,
        id: TypeId,
        module: &Arc<str>,
    ) -> Result<TypeEntry, LoadError> {
        let kind = shape_kind(&decl.shape);
        if let TypeKind::Class(layout) = &kind {
            layout
                .validate()
                .map_err(|violation| LoadError::InvalidLayout {
                    name: decl.name.clone(),
                    violation,
                })?;
        }

        let superclass = if id.is_any() {
            match &decl.superclass {
                None => None,
                Some(_) => {
                    return Err(LoadError::RootRedeclared {
                        name: decl.name.clone(),
                        module: module.to_string(),
                    })
                }
            }
        } else {
            Some(self.resolve_superclass(decl, id)?)
        };

        let mut interfaces: SmallVec<[TypeId; 4]> = SmallVec::new();
        for reference in &decl.interfaces {
            let interface = self.resolve_ref(reference, &decl.name)?;
            let kind = &self.entries[interface.index()].kind;
            if !kind.is_interface() {
                return Err(LoadError::NotAnInterface {
                    name: decl.name.clone(),
                    listed: self.entries[interface.index()].name.clone(),
                    kind: kind.label(),
                });
            }
            if !interfaces.contains(&interface) {
                interfaces.push(interface);
            }
        }

        Ok(TypeEntry {
            name: decl.name.clone(),
            kind,
            superclass,
            interfaces,
            flags: decl.flags.declared(),
            module: Arc::clone(module),
        })
    }

    /// Interfaces always sit directly under the root; classes default to it.
    fn resolve_superclass(&mut self, decl: &TypeDecl, id: TypeId) -> Result<TypeId, LoadError> {
        let Some(reference) = &decl.superclass else {
            return Ok(TypeId::ANY);
        };
        let superclass = self.resolve_ref(reference, &decl.name)?;
        if superclass == id {
            return Err(LoadError::InheritanceCycle {
                name: decl.name.clone(),
            });
        }

        let target = &self.entries[superclass.index()];
        let allowed = if matches!(decl.shape, DeclShape::Interface) {
            superclass.is_any()
        } else {
            target.kind.can_be_superclass()
        };
        if !allowed {
            return Err(LoadError::InvalidSuperclass {
                name: decl.name.clone(),
                superclass: target.name.clone(),
                kind: target.kind.label(),
            });
        }
        Ok(superclass)
    }

    fn resolve_ref(&mut self, reference: &TypeRef, from: &QualifiedName) -> Result<TypeId, LoadError> {
        match reference {
            TypeRef::Id(id) => {
                if id.index() < self.entries.len() {
                    Ok(*id)
                } else {
                    Err(LoadError::UnknownId {
                        from: from.clone(),
                        id: *id,
                    })
                }
            }
            TypeRef::Named(name) => self.lookup(name).ok_or_else(|| LoadError::Unresolved {
                from: from.clone(),
                target: name.to_string(),
            }),
            TypeRef::ArrayOf(element) => {
                let element = self.resolve_ref(element, from)?;
                self.intern_array(element)
            }
            TypeRef::PrimitiveArray(kind) => Ok(kind.array_type()),
        }
    }

    /// A redeclaration must match the registered entry exactly.
    fn check_compatible(&self, id: TypeId, incoming: &TypeEntry) -> Result<(), LoadError> {
        let existing = &self.entries[id.index()];
        if existing.same_metadata(incoming) {
            return Ok(());
        }
        if id.is_any() {
            tracing::warn!(module = %incoming.module, "root type redeclared");
            return Err(LoadError::RootRedeclared {
                name: existing.name.clone(),
                module: incoming.module.to_string(),
            });
        }
        tracing::warn!(
            name = %existing.name,
            existing_module = %existing.module,
            module = %incoming.module,
            "conflicting type declaration"
        );
        Err(LoadError::Conflict {
            name: existing.name.clone(),
            existing_module: existing.module.to_string(),
            module: incoming.module.to_string(),
            existing: self.summary(existing),
            incoming: self.summary(incoming),
        })
    }

    /// One-line description used in conflict diagnostics.
    fn summary(&self, entry: &TypeEntry) -> String {
        let mut out = String::from(entry.kind.label());
        if let Some(layout) = entry.kind.layout() {
            let _ = write!(
                out,
                " (size {}, {} refs)",
                layout.size(),
                layout.ref_offsets().len()
            );
        }
        if let Some(superclass) = entry.superclass.filter(|s| !s.is_any()) {
            let _ = write!(out, " extends {}", self.entries[superclass.index()].name);
        }
        if !entry.interfaces.is_empty() {
            let names: Vec<String> = entry
                .interfaces
                .iter()
                .map(|i| self.entries[i.index()].name.to_string())
                .collect();
            let _ = write!(out, " implements [{}]", names.join(", "));
        }
        if !entry.flags.is_empty() {
            let _ = write!(out, " flags {:?}", entry.flags);
        }
        out
    }
}

fn shape_kind(shape: &DeclShape) -> TypeKind {
    match shape {
        DeclShape::Class(layout) => TypeKind::Class(layout.clone()),
        DeclShape::Interface => TypeKind::Interface,
        DeclShape::ForeignWrapper => TypeKind::ForeignWrapper,
    }
}
