//! Per-descriptor flags.
//!
//! Declared flags come from the module that defines the type. Category flags
//! are derived from the kind once at publication so the query path can test
//! a bit instead of matching on the kind.

use bitflags::bitflags;

use crate::TypeKind;

bitflags! {
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct TypeFlags: u32 {
        // === Declared (bits 0-7) ===

        /// Instances are deeply immutable after construction.
        const IMMUTABLE = 1 << 0;
        /// Instances can never participate in a reference cycle.
        const ACYCLIC = 1 << 1;
        /// Instances need a finalizer run by the collector.
        const HAS_FINALIZER = 1 << 2;
        /// The type is a suspend-function reference.
        const SUSPEND_FUNCTION = 1 << 3;

        // === Category (bits 8-15) ===

        const IS_INTERFACE = 1 << 8;
        const IS_ARRAY = 1 << 9;
        const IS_PRIMITIVE_ARRAY = 1 << 10;
        const IS_FOREIGN = 1 << 11;
        /// Has a range in the hierarchy index.
        const IN_CLASS_TREE = 1 << 12;
    }
}

impl TypeFlags {
    /// Flags a module may declare.
    pub const DECLARED_MASK: Self = Self::from_bits_truncate(
        Self::IMMUTABLE.bits()
            | Self::ACYCLIC.bits()
            | Self::HAS_FINALIZER.bits()
            | Self::SUSPEND_FUNCTION.bits(),
    );

    /// Category flags implied by a kind.
    pub fn for_kind(kind: &TypeKind) -> Self {
        let mut flags = match kind {
            TypeKind::Class(_) => Self::empty(),
            TypeKind::Interface => Self::IS_INTERFACE,
            TypeKind::ObjectArray { .. } => Self::IS_ARRAY,
            TypeKind::PrimitiveArray(_) => Self::IS_ARRAY | Self::IS_PRIMITIVE_ARRAY,
            TypeKind::ForeignWrapper => Self::IS_FOREIGN,
        };
        if kind.in_class_tree() {
            flags |= Self::IN_CLASS_TREE;
        }
        flags
    }

    /// Only the declared part of these flags.
    #[inline]
    pub const fn declared(self) -> Self {
        self.intersection(Self::DECLARED_MASK)
    }

    #[inline]
    pub const fn is_array(self) -> bool {
        self.contains(Self::IS_ARRAY)
    }

    #[inline]
    pub const fn is_interface(self) -> bool {
        self.contains(Self::IS_INTERFACE)
    }
}
