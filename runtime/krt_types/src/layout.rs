//! Instance layout of class descriptors.
//!
//! The allocator and collector consume this; the type layer only carries it
//! and validates it at load time so a bad module cannot hand the collector
//! reference offsets outside the object.

use std::mem::size_of;

/// Size of an object reference slot.
pub const POINTER_SIZE: u32 = size_of::<usize>() as u32;

/// Size in bytes of every object header.
pub const OBJ_HEADER_SIZE: u32 = 8;

/// Size and reference-field offsets of a class's instances.
///
/// Offsets are measured from the start of the object header.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InstanceLayout {
    size: u32,
    ref_offsets: Box<[u32]>,
}

/// Why an instance layout was rejected.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LayoutViolation {
    /// Instances are smaller than an object header.
    TooSmall { size: u32 },
    /// A reference slot extends past the end of the instance.
    OutOfBounds { offset: u32, size: u32 },
    /// A reference slot overlaps the object header.
    InsideHeader { offset: u32 },
    /// A reference slot is not pointer aligned.
    Misaligned { offset: u32 },
}

impl InstanceLayout {
    /// Layout of a class with no fields.
    pub fn header_only() -> Self {
        Self {
            size: OBJ_HEADER_SIZE,
            ref_offsets: Box::default(),
        }
    }

    /// Create a layout; offsets are sorted and deduplicated.
    pub fn new(size: u32, ref_offsets: &[u32]) -> Self {
        let mut offsets = ref_offsets.to_vec();
        offsets.sort_unstable();
        offsets.dedup();
        Self {
            size,
            ref_offsets: offsets.into_boxed_slice(),
        }
    }

    /// Instance size in bytes, header included.
    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Offsets of reference fields.
    #[inline]
    pub fn ref_offsets(&self) -> &[u32] {
        &self.ref_offsets
    }

    /// Check the layout against the object model.
    pub fn validate(&self) -> Result<(), LayoutViolation> {
        if self.size < OBJ_HEADER_SIZE {
            return Err(LayoutViolation::TooSmall { size: self.size });
        }
        for &offset in self.ref_offsets.iter() {
            if offset < OBJ_HEADER_SIZE {
                return Err(LayoutViolation::InsideHeader { offset });
            }
            if offset % POINTER_SIZE != 0 {
                return Err(LayoutViolation::Misaligned { offset });
            }
            if u64::from(offset) + u64::from(POINTER_SIZE) > u64::from(self.size) {
                return Err(LayoutViolation::OutOfBounds {
                    offset,
                    size: self.size,
                });
            }
        }
        Ok(())
    }
}

impl Default for InstanceLayout {
    fn default() -> Self {
        Self::header_only()
    }
}

impl std::fmt::Display for LayoutViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::TooSmall { size } => {
                write!(f, "instance size {size} is smaller than the object header")
            }
            Self::OutOfBounds { offset, size } => {
                write!(f, "reference at offset {offset} runs past instance size {size}")
            }
            Self::InsideHeader { offset } => {
                write!(f, "reference at offset {offset} overlaps the object header")
            }
            Self::Misaligned { offset } => {
                write!(f, "reference at offset {offset} is not pointer aligned")
            }
        }
    }
}
