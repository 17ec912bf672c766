//! Semantic analysis and IR lowering.
//!
//! A single pass walks the tree, resolving names against the scope
//! table and checking types while it emits LLVM IR through inkwell.
//! There is no separate typed tree; a construct that fails a check
//! reports a diagnostic and simply contributes no IR, so analysis of
//! the rest of the unit continues and one run surfaces every error it
//! can find. The module that comes out is only meaningful when the
//! diagnostics sink stayed empty.

pub mod analyzer;
pub mod expr;
pub mod stmt;
