//! Unrecoverable runtime errors.
//!
//! A conflicting or malformed type declaration means later memory
//! interpretation could be wrong, so the process stops rather than
//! continuing with a partial universe.

use std::fmt::Display;

/// Log `error` and abort the process.
#[cold]
#[inline(never)]
pub fn fatal(context: &str, error: &dyn Display) -> ! {
    tracing::error!(%error, "{context}");
    eprintln!("krt fatal: {context}: {error}");
    std::process::abort()
}
