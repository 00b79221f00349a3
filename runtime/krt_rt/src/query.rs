//! Subtype queries against one published universe.
//!
//! Every query is a bounded read: a descriptor lookup plus either two
//! integer compares (class targets) or one hash probe (interface targets).
//! Nothing here allocates or logs on the success path.

use krt_types::{ArrayElement, TypeDescriptor, TypeId, TypeUniverse};

use crate::header::{ArrayHeader, ObjHeader};

/// Failed `check_cast`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{actual} cannot be cast to {expected}")]
pub struct TypeMismatch {
    /// Qualified name of the object's runtime type, or `null`.
    pub actual: String,
    /// Qualified name of the cast target.
    pub expected: String,
}

/// Stateless query engine borrowing one universe snapshot.
#[derive(Copy, Clone, Debug)]
pub struct TypeQueryEngine<'u> {
    universe: &'u TypeUniverse,
}

impl<'u> TypeQueryEngine<'u> {
    pub fn new(universe: &'u TypeUniverse) -> Self {
        Self { universe }
    }

    pub fn universe(&self) -> &'u TypeUniverse {
        self.universe
    }

    /// Descriptor of the object's runtime type.
    #[inline]
    pub fn type_of(&self, obj: &ObjHeader) -> &'u TypeDescriptor {
        self.universe.descriptor(obj.type_info())
    }

    /// Whether `obj` is an instance of `target`. Null is an instance of
    /// nothing.
    #[inline]
    pub fn is_instance(&self, obj: Option<&ObjHeader>, target: TypeId) -> bool {
        match obj {
            Some(obj) => self.universe.is_subtype(obj.type_info(), target),
            None => false,
        }
    }

    /// Class check against a range the compiler baked into generated code.
    ///
    /// Only valid for class targets whose range is stable in this universe.
    #[inline]
    pub fn is_instance_of_class_fast(&self, obj: Option<&ObjHeader>, lo: i32, hi: i32) -> bool {
        let Some(obj) = obj else {
            return false;
        };
        match self.type_of(obj).range() {
            Some(range) => lo <= range.lo && range.lo <= hi,
            None => false,
        }
    }

    /// Succeeds iff `obj` is a non-null instance of `target`.
    pub fn check_cast(&self, obj: Option<&ObjHeader>, target: TypeId) -> Result<(), TypeMismatch> {
        if self.is_instance(obj, target) {
            return Ok(());
        }
        Err(self.mismatch(obj, target))
    }

    /// Like `check_cast`, but null passes: the cast target is nullable.
    pub fn check_cast_nullable(
        &self,
        obj: Option<&ObjHeader>,
        target: TypeId,
    ) -> Result<(), TypeMismatch> {
        match obj {
            None => Ok(()),
            Some(_) => self.check_cast(obj, target),
        }
    }

    /// Whether `obj` is an array of any kind.
    #[inline]
    pub fn is_array(&self, obj: Option<&ObjHeader>) -> bool {
        obj.is_some_and(|obj| self.type_of(obj).is_array())
    }

    /// Element kind of an array object; `None` for null and non-arrays.
    pub fn element_kind(&self, obj: Option<&ObjHeader>) -> Option<ArrayElement> {
        obj.and_then(|obj| self.type_of(obj).element())
    }

    /// The array header of `obj`, if it is an array.
    pub fn array_header<'o>(&self, obj: &'o ObjHeader) -> Option<&'o ArrayHeader> {
        if !self.type_of(obj).is_array() {
            return None;
        }
        // SAFETY: the descriptor says the object was allocated as an array.
        Some(unsafe { ArrayHeader::from_object(obj) })
    }

    /// Whether interface `a` extends `b` (reflexive).
    #[inline]
    pub fn is_sub_interface(&self, a: TypeId, b: TypeId) -> bool {
        self.universe.is_sub_interface(a, b)
    }

    #[cold]
    fn mismatch(&self, obj: Option<&ObjHeader>, target: TypeId) -> TypeMismatch {
        let actual = obj.map_or_else(
            || "null".to_owned(),
            |obj| self.type_of(obj).name().to_string(),
        );
        let expected = self.universe.descriptor(target).name().to_string();
        tracing::trace!(%actual, %expected, "cast failed");
        TypeMismatch { actual, expected }
    }
}
