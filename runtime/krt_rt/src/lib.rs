//! Runtime type queries (`libkrt_rt`).
//!
//! This crate answers the questions compiled code asks about objects at run
//! time: `is`, `as`, "is this an array", "does this interface extend that
//! one". It reads object headers, looks their `TypeId` up in the published
//! `TypeUniverse` from `krt_types`, and compares ranges or closure sets.
//!
//! # Build Modes
//!
//! - **rlib**: for Rust embedders and tests
//! - **staticlib**: for AOT linking (`libkrt_rt.a`)
//!
//! # Entry Points
//!
//! - **Rust**: `Runtime` (load, publish, snapshot) and `TypeQueryEngine`
//! - **C ABI**: `krt_is_instance`, `krt_is_instance_of_class_fast`,
//!   `krt_check_cast`, `krt_is_array`, `krt_is_sub_interface`,
//!   `krt_well_known`
//!
//! # Safety
//!
//! The C entry points take raw header pointers from generated code, which
//! guarantees they are null or point at live objects. They are not marked
//! `unsafe` because they are FFI entry points, not Rust API functions.

#![warn(clippy::allow_attributes_without_reason)]
#![allow(
    unsafe_code,
    reason = "C-ABI entry points and array header views dereference raw pointers"
)]
#![allow(
    clippy::not_unsafe_ptr_arg_deref,
    reason = "FFI entry points receive pointers from generated code which guarantees validity"
)]

pub mod abi;
pub mod config;
pub mod fatal;
pub mod header;
pub mod query;
pub mod runtime;
pub mod tracing_setup;

pub use abi::CastFailure;
pub use config::{ConfigError, RuntimeConfig};
pub use header::{ArrayHeader, ObjHeader};
pub use query::{TypeMismatch, TypeQueryEngine};
pub use runtime::{Runtime, RuntimeError};
