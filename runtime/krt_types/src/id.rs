//! Type descriptor handle.
//!
//! `TypeId` is how every other part of the runtime names a descriptor.
//! Descriptors live in a published `TypeUniverse` and are referenced by
//! their 32-bit index.
//!
//! # Design
//!
//! - Well-known types have fixed indices (0-20) so generated code and other
//!   runtime subsystems can name them without a lookup
//! - Handle equality is descriptor identity: the registry interns every
//!   nominal and structural type exactly once
//! - Copy, 4 bytes, fits in an object header next to collector bits

use std::fmt;

/// A 32-bit index into the published type universe.
///
/// Two `TypeId`s are equal iff they name the same descriptor.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeId(u32);

impl TypeId {
    // === Well-known classes (0-5) ===

    /// The root of the class tree.
    pub const ANY: Self = Self(0);
    /// The unit type.
    pub const UNIT: Self = Self(1);
    /// The string type.
    pub const STRING: Self = Self(2);
    /// The root of all throwable types.
    pub const THROWABLE: Self = Self(3);
    /// Opaque function references handed to native code.
    pub const OPAQUE_FUNCTION: Self = Self(4);
    /// The root of foreign-object wrappers.
    pub const FOREIGN_OBJECT: Self = Self(5);

    // === Well-known arrays (6-16) ===

    /// Array of `Any` references.
    pub const ARRAY: Self = Self(6);
    /// `BooleanArray` (1-byte elements).
    pub const BOOLEAN_ARRAY: Self = Self(7);
    /// `ByteArray` (1-byte elements).
    pub const BYTE_ARRAY: Self = Self(8);
    /// `CharArray` (2-byte UTF-16 code units).
    pub const CHAR_ARRAY: Self = Self(9);
    /// `ShortArray` (2-byte elements).
    pub const SHORT_ARRAY: Self = Self(10);
    /// `IntArray` (4-byte elements).
    pub const INT_ARRAY: Self = Self(11);
    /// `LongArray` (8-byte elements).
    pub const LONG_ARRAY: Self = Self(12);
    /// `FloatArray` (4-byte elements).
    pub const FLOAT_ARRAY: Self = Self(13);
    /// `DoubleArray` (8-byte elements).
    pub const DOUBLE_ARRAY: Self = Self(14);
    /// `NativePtrArray` (pointer-width elements).
    pub const NATIVE_PTR_ARRAY: Self = Self(15);
    /// `Vector128Array` (16-byte SIMD elements).
    pub const VECTOR128_ARRAY: Self = Self(16);

    // === Runtime support classes (17-20) ===

    /// Wrapper around a foreign-runtime object, under `ForeignObject`.
    pub const FOREIGN_OBJECT_WRAPPER: Self = Self(17);
    /// Atomic reference cell shared across threads.
    pub const FREEZABLE_ATOMIC_REFERENCE: Self = Self(18);
    /// Reference pinned to the worker that created it.
    pub const WORKER_BOUND_REFERENCE: Self = Self(19);
    /// Cleanup action run after its owner is collected.
    pub const CLEANER_IMPL: Self = Self(20);

    /// Number of pre-registered well-known types.
    pub const WELL_KNOWN_COUNT: u32 = 21;

    /// First index handed out to module-loaded types.
    pub const FIRST_DYNAMIC: u32 = Self::WELL_KNOWN_COUNT;

    /// Sentinel value indicating no type.
    pub const NONE: Self = Self(u32::MAX);

    /// Create a handle from a raw u32 value.
    ///
    /// The handle is only meaningful for a universe that published it.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Index into descriptor storage.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Check if this is one of the fixed well-known types.
    #[inline]
    pub const fn is_well_known(self) -> bool {
        self.0 < Self::WELL_KNOWN_COUNT
    }

    /// Check if this is the NONE sentinel.
    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// Check if this is the root type.
    #[inline]
    pub const fn is_any(self) -> bool {
        self.0 == Self::ANY.0
    }

    /// Short name for well-known types, `None` for module-loaded ones.
    #[inline]
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("Any"),
            1 => Some("Unit"),
            2 => Some("String"),
            3 => Some("Throwable"),
            4 => Some("OpaqueFunction"),
            5 => Some("ForeignObject"),
            6 => Some("Array"),
            7 => Some("BooleanArray"),
            8 => Some("ByteArray"),
            9 => Some("CharArray"),
            10 => Some("ShortArray"),
            11 => Some("IntArray"),
            12 => Some("LongArray"),
            13 => Some("FloatArray"),
            14 => Some("DoubleArray"),
            15 => Some("NativePtrArray"),
            16 => Some("Vector128Array"),
            17 => Some("ForeignObjectWrapper"),
            18 => Some("FreezableAtomicReference"),
            19 => Some("WorkerBoundReference"),
            20 => Some("CleanerImpl"),
            _ => None,
        }
    }
}

impl From<TypeId> for u32 {
    fn from(id: TypeId) -> Self {
        id.0
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name(), *self) {
            (Some(name), _) => write!(f, "TypeId::{name}"),
            (None, Self::NONE) => write!(f, "TypeId::NONE"),
            (None, _) => write!(f, "TypeId({})", self.0),
        }
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name(), *self) {
            (Some(name), _) => f.write_str(name),
            (None, Self::NONE) => f.write_str("<none>"),
            (None, _) => write!(f, "type#{}", self.0),
        }
    }
}

// Object headers store this inline.
const _: () = assert!(std::mem::size_of::<TypeId>() == 4);
