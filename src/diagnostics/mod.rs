//! Diagnostics module for the compiler.
//!
//! This module defines the diagnostic machinery shared by every phase:
//!
//! - The diagnostic kinds and their message catalogue
//! - The append-only sink the phases report into
//! - Batch rendering with source excerpts and column carets
//! - Edit-distance suggestions for misspelled identifiers

pub mod diagnostics;

#[cfg(test)]
mod tests;
