//! Heap object headers.
//!
//! Every object starts with an `ObjHeader`; arrays extend it with an element
//! count and are followed by their inline payload. The allocator and collector
//! create and destroy headers; this crate only reads the type reference.
//!
//! ```text
//! object:  | type_info: u32 | meta: u32 | fields ...
//! array:   | type_info: u32 | meta: u32 | count: u32 | reserved: u32 | payload (16-aligned) ...
//! ```

use std::mem::{align_of, size_of};

use krt_types::TypeId;

/// Header prefixed to every heap object.
#[repr(C, align(8))]
#[derive(Debug)]
pub struct ObjHeader {
    type_info: TypeId,
    /// Collector bits. Never read or written by the type layer.
    meta: u32,
}

impl ObjHeader {
    #[inline]
    pub const fn new(type_info: TypeId) -> Self {
        Self { type_info, meta: 0 }
    }

    /// The object's runtime type. Fixed for the object's lifetime.
    #[inline]
    pub const fn type_info(&self) -> TypeId {
        self.type_info
    }

    /// Collector-owned word, exposed for layout tests and debugging.
    #[inline]
    pub const fn meta(&self) -> u32 {
        self.meta
    }
}

/// Header of an array object; the payload follows immediately.
#[repr(C, align(16))]
#[derive(Debug)]
pub struct ArrayHeader {
    obj: ObjHeader,
    count: u32,
    _reserved: u32,
}

impl ArrayHeader {
    #[inline]
    pub const fn new(type_info: TypeId, count: u32) -> Self {
        Self {
            obj: ObjHeader::new(type_info),
            count,
            _reserved: 0,
        }
    }

    /// The embedded object header.
    #[inline]
    pub const fn as_object(&self) -> &ObjHeader {
        &self.obj
    }

    /// View an object header as the array header containing it.
    ///
    /// # Safety
    ///
    /// `obj` must be the header of an object allocated as an array, i.e. its
    /// `type_info` names an array descriptor.
    #[inline]
    pub unsafe fn from_object(obj: &ObjHeader) -> &ArrayHeader {
        // SAFETY: `obj` is the first field of a `#[repr(C)]` ArrayHeader per
        // the caller's contract, so the addresses coincide.
        unsafe { &*std::ptr::from_ref(obj).cast::<ArrayHeader>() }
    }

    /// Number of elements. Never changes after allocation.
    #[inline]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Payload size in bytes for elements of `element_size` bytes.
    #[inline]
    pub const fn payload_size(&self, element_size: usize) -> usize {
        self.count as usize * element_size
    }

    /// Start of the inline payload.
    #[inline]
    pub fn payload_ptr(&self) -> *const u8 {
        std::ptr::from_ref(self).wrapping_add(1).cast::<u8>()
    }

    /// Address of element `index`, or `None` when out of bounds.
    #[inline]
    pub fn element_address(&self, index: u32, element_size: usize) -> Option<*const u8> {
        if index >= self.count {
            return None;
        }
        Some(self.payload_ptr().wrapping_add(index as usize * element_size))
    }
}

const _: () = assert!(size_of::<ObjHeader>() == 8);
const _: () = assert!(align_of::<ObjHeader>() == 8);
const _: () = assert!(size_of::<ArrayHeader>() == 16);
const _: () = assert!(align_of::<ArrayHeader>() == 16);
