//! AST (Abstract Syntax Tree) module.
//!
//! Every node the parser can produce is a variant of one of the closed
//! enums defined here, so analysis passes dispatch with an exhaustive
//! `match` instead of downcasting.
//!
//! Submodules:
//! - expr: expression nodes and operator enums
//! - stmt: statement and declaration nodes

pub mod expr;
pub mod stmt;
