//! C-ABI entry points for generated code.
//!
//! All functions query the installed global runtime. Type arguments are raw
//! `TypeId` values; object arguments point at object headers or are null.
//! Calling any of these before `Runtime::install` is a fatal error.

use std::panic;

use krt_types::TypeId;

use crate::header::ObjHeader;
use crate::query::{TypeMismatch, TypeQueryEngine};
use crate::runtime::Runtime;

/// Unwind payload of a failed `krt_check_cast`.
///
/// Raised with `std::panic::panic_any` so compiled `invoke`/`landingpad`
/// pairs run their cleanups; the embedding entry point catches it with
/// `catch_unwind`.
#[derive(Debug)]
pub struct CastFailure {
    pub mismatch: TypeMismatch,
}

fn runtime() -> &'static Runtime {
    match Runtime::global() {
        Ok(runtime) => runtime,
        Err(err) => crate::fatal::fatal("type query before runtime install", &err),
    }
}

fn with_queries<R>(f: impl FnOnce(TypeQueryEngine<'_>) -> R) -> R {
    runtime().queries(f)
}

/// Convert a header pointer from generated code.
fn object<'a>(obj: *const ObjHeader) -> Option<&'a ObjHeader> {
    // SAFETY: generated code passes null or a pointer to a live object header.
    unsafe { obj.as_ref() }
}

/// `obj is T`. Null is an instance of nothing.
#[no_mangle]
pub extern "C" fn krt_is_instance(obj: *const ObjHeader, type_info: u32) -> bool {
    with_queries(|q| q.is_instance(object(obj), TypeId::from_raw(type_info)))
}

/// Class check against compile-time range bounds.
#[no_mangle]
pub extern "C" fn krt_is_instance_of_class_fast(obj: *const ObjHeader, lo: i32, hi: i32) -> bool {
    with_queries(|q| q.is_instance_of_class_fast(object(obj), lo, hi))
}

/// `obj as T`. Unwinds with a `CastFailure` payload when the cast fails.
#[no_mangle]
pub extern "C-unwind" fn krt_check_cast(obj: *const ObjHeader, type_info: u32) {
    let result = with_queries(|q| q.check_cast(object(obj), TypeId::from_raw(type_info)));
    if let Err(mismatch) = result {
        tracing::debug!(%mismatch, "raising cast failure");
        panic::panic_any(CastFailure { mismatch });
    }
}

#[no_mangle]
pub extern "C" fn krt_is_array(obj: *const ObjHeader) -> bool {
    with_queries(|q| q.is_array(object(obj)))
}

#[no_mangle]
pub extern "C" fn krt_is_sub_interface(a: u32, b: u32) -> bool {
    with_queries(|q| q.is_sub_interface(TypeId::from_raw(a), TypeId::from_raw(b)))
}

/// Id of well-known table entry `slot`, or `u32::MAX` past the end.
#[no_mangle]
pub extern "C" fn krt_well_known(slot: u32) -> u32 {
    if slot < TypeId::WELL_KNOWN_COUNT {
        TypeId::from_raw(slot).raw()
    } else {
        TypeId::NONE.raw()
    }
}
