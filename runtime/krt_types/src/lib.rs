//! Runtime type descriptors and the class hierarchy index.
//!
//! Every heap object carries a `TypeId` naming its descriptor. This crate
//! owns those descriptors:
//!
//! - `TypeRegistry`: the single writer. Module loads intern names, resolve
//!   supertypes, and reject conflicting redeclarations.
//! - `TypeUniverse`: an immutable published snapshot with the hierarchy
//!   index (interval ranges for the class tree) and interface closures.
//!
//! # Subtyping strategy
//!
//! Classes form a single-inheritance tree and are answered with two integer
//! compares against depth-first ranges. Interfaces allow diamonds and are
//! answered by membership in a precomputed transitive closure. The two
//! strategies are deliberately kept separate.

mod closure;
mod decl;
mod descriptor;
mod error;
mod flags;
pub mod hierarchy;
mod id;
mod kind;
pub mod layout;
mod name;
mod registry;
mod universe;
mod well_known;

pub use decl::{DeclShape, ModuleTypes, TypeDecl, TypeRef};
pub use descriptor::{InterfaceClosure, TypeDescriptor};
pub use error::LoadError;
pub use flags::TypeFlags;
pub use hierarchy::{ClassRange, HierarchyConfig, HierarchyIndex, SiblingOrder};
pub use id::TypeId;
pub use kind::{ArrayElement, ElementKind, TypeKind};
pub use layout::{InstanceLayout, LayoutViolation};
pub use name::QualifiedName;
pub use registry::{Checkpoint, TypeRegistry};
pub use universe::TypeUniverse;
pub use well_known::{CORE_PACKAGE, RUNTIME_MODULE};

// Readers share one universe across threads.
const _: () = {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TypeUniverse>();
};
