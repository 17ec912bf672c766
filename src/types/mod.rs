//! Type system module for the compiler.
//!
//! This module defines the value types of the language and the rules
//! that govern them:
//!
//! - The scalar type lattice and the implicit widening order
//! - Truthiness narrowing for condition positions
//! - Operand resolution for binary and unary operators
//! - Descriptors for arrays, decayed array parameters and function
//!   signatures

pub mod types;

#[cfg(test)]
mod tests;
