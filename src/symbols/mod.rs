//! Symbol table module for the compiler.
//!
//! One mutable table serves the whole translation unit. Functions and
//! data share a single namespace; block scoping is handled with an
//! explicit stack of frames that the analyzer pushes and pops as it
//! walks the AST.

pub mod table;
