//! Type kind: the closed set of shapes a descriptor can have.
//!
//! The hot query path dispatches on `TypeKind` with a plain `match`; the set
//! of kinds is fixed, so there is no trait object anywhere in the dispatch.

use std::fmt;
use std::mem::size_of;

use crate::{InstanceLayout, TypeId};

/// Element kind of a primitive array.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ElementKind {
    Boolean = 0,
    Byte = 1,
    Char = 2,
    Short = 3,
    Int = 4,
    Long = 5,
    Float = 6,
    Double = 7,
    NativePtr = 8,
    /// 128-bit SIMD vector (four packed floats).
    Vector128 = 9,
}

impl ElementKind {
    /// Every primitive element kind, in well-known id order.
    pub const ALL: [Self; 10] = [
        Self::Boolean,
        Self::Byte,
        Self::Char,
        Self::Short,
        Self::Int,
        Self::Long,
        Self::Float,
        Self::Double,
        Self::NativePtr,
        Self::Vector128,
    ];

    /// Width of one element in bytes.
    #[inline]
    pub const fn size(self) -> usize {
        match self {
            Self::Boolean | Self::Byte => 1,
            Self::Char | Self::Short => 2,
            Self::Int | Self::Float => 4,
            Self::Long | Self::Double => 8,
            Self::NativePtr => size_of::<usize>(),
            Self::Vector128 => 16,
        }
    }

    /// The well-known array type holding elements of this kind.
    #[inline]
    pub const fn array_type(self) -> TypeId {
        TypeId::from_raw(TypeId::BOOLEAN_ARRAY.raw() + self as u32)
    }

    /// Inverse of [`ElementKind::array_type`].
    pub fn from_array_type(id: TypeId) -> Option<Self> {
        let offset = id.raw().checked_sub(TypeId::BOOLEAN_ARRAY.raw())?;
        Self::ALL.get(usize::try_from(offset).ok()?).copied()
    }

    /// Name of the element type.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Boolean => "Boolean",
            Self::Byte => "Byte",
            Self::Char => "Char",
            Self::Short => "Short",
            Self::Int => "Int",
            Self::Long => "Long",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::NativePtr => "NativePtr",
            Self::Vector128 => "Vector128",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What an array holds.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ArrayElement {
    /// References to objects of the given type (or its subtypes).
    Object(TypeId),
    /// Inline primitive values.
    Primitive(ElementKind),
}

impl ArrayElement {
    /// Width of one payload slot in bytes.
    #[inline]
    pub const fn size(self) -> usize {
        match self {
            Self::Object(_) => size_of::<usize>(),
            Self::Primitive(kind) => kind.size(),
        }
    }
}

/// Shape of a type descriptor.
///
/// The payload varies per kind: classes carry their instance layout, arrays
/// carry their element information.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum TypeKind {
    /// A class in the single-inheritance tree.
    Class(InstanceLayout),
    /// An interface; participates in multiple inheritance only.
    Interface,
    /// Array of object references.
    ObjectArray { element: TypeId },
    /// Array of inline primitive values.
    PrimitiveArray(ElementKind),
    /// A class whose instances wrap a foreign object handle.
    ForeignWrapper,
}

impl TypeKind {
    /// Short label used in diagnostics.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Class(_) => "class",
            Self::Interface => "interface",
            Self::ObjectArray { .. } => "object array",
            Self::PrimitiveArray(_) => "primitive array",
            Self::ForeignWrapper => "foreign wrapper",
        }
    }

    #[inline]
    pub const fn is_interface(&self) -> bool {
        matches!(self, Self::Interface)
    }

    #[inline]
    pub const fn is_array(&self) -> bool {
        matches!(self, Self::ObjectArray { .. } | Self::PrimitiveArray(_))
    }

    /// Whether descriptors of this kind may be another type's superclass.
    #[inline]
    pub const fn can_be_superclass(&self) -> bool {
        matches!(self, Self::Class(_) | Self::ForeignWrapper)
    }

    /// Whether descriptors of this kind get a range in the hierarchy index.
    ///
    /// Arrays are numbered as leaves beneath their nominal superclass;
    /// interfaces never receive a range.
    #[inline]
    pub const fn in_class_tree(&self) -> bool {
        !self.is_interface()
    }

    /// Element information for array kinds.
    #[inline]
    pub const fn element(&self) -> Option<ArrayElement> {
        match *self {
            Self::ObjectArray { element } => Some(ArrayElement::Object(element)),
            Self::PrimitiveArray(kind) => Some(ArrayElement::Primitive(kind)),
            _ => None,
        }
    }

    /// Instance layout for class kinds.
    #[inline]
    pub const fn layout(&self) -> Option<&InstanceLayout> {
        match self {
            Self::Class(layout) => Some(layout),
            _ => None,
        }
    }
}
