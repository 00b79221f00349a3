//! Load-time errors.
//!
//! Every variant is fatal for the module being loaded: a descriptor that
//! disagrees with an earlier one, or that points at something that is not
//! there, would make later memory interpretation wrong.

use crate::{LayoutViolation, QualifiedName, TypeId};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// Two modules declared the same nominal type with different metadata.
    #[error("conflicting declarations of `{name}`: `{existing_module}` has {existing}, `{module}` has {incoming}")]
    Conflict {
        name: QualifiedName,
        existing_module: String,
        module: String,
        existing: String,
        incoming: String,
    },

    /// The root type was redeclared with a different shape.
    #[error("module `{module}` redeclares the root type `{name}`")]
    RootRedeclared { name: QualifiedName, module: String },

    /// A new declaration claims a name reserved for runtime-provided types.
    #[error("module `{module}` declares `{name}` in the reserved runtime package")]
    ReservedName { name: QualifiedName, module: String },

    /// A declaration references a type that is not registered.
    #[error("`{from}` references unknown type `{target}`")]
    Unresolved { from: QualifiedName, target: String },

    /// A reference by id that the registry never handed out.
    #[error("`{from}` references unregistered {id:?}")]
    UnknownId { from: QualifiedName, id: TypeId },

    /// The declared superclass cannot be extended.
    #[error("`{name}` cannot extend `{superclass}`: it is a {kind}")]
    InvalidSuperclass {
        name: QualifiedName,
        superclass: QualifiedName,
        kind: &'static str,
    },

    /// A listed supertype is not an interface.
    #[error("`{name}` lists `{listed}` as an interface, but it is a {kind}")]
    NotAnInterface {
        name: QualifiedName,
        listed: QualifiedName,
        kind: &'static str,
    },

    /// The class's instance layout is malformed.
    #[error("invalid instance layout for `{name}`: {violation}")]
    InvalidLayout {
        name: QualifiedName,
        violation: LayoutViolation,
    },

    /// A superclass chain or interface graph loops back on itself.
    #[error("inheritance cycle through `{name}`")]
    InheritanceCycle { name: QualifiedName },

    /// More types than the 32-bit id or range space can number.
    #[error("type registry overflow: {count} types")]
    Overflow { count: usize },
}
