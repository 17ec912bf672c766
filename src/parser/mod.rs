//! Recursive-descent parser.
//!
//! Transforms the token stream into the tree in [`crate::ast`]. The
//! grammar needs two tokens of lookahead in exactly one place, the
//! identifier-`=` split at the start of an expression statement; the
//! rest is plain LL(1):
//!
//! - Top-level declarations (globals, arrays, prototypes, functions)
//! - Blocks with declarations before statements
//! - Tiered expression productions encoding precedence
//!
//! Failed productions report to the shared diagnostics sink and
//! return `None`; the top-level loop recovers at the next declaration
//! start.

pub mod decl;
pub mod expr;
pub mod parser;
pub mod stmt;
