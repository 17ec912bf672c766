//! Lexical analysis module for the compiler.
//!
//! Turns source text into the token stream the parser reads. The lexer
//! is a table of regex patterns tried in order at the current position,
//! each paired with a handler that pushes a token and advances:
//!
//! - Keywords, identifiers, number literals, operators, punctuation
//! - `//` comments and whitespace, skipped with line/column tracking
//! - Unknown characters, reported to the diagnostics sink and skipped
//!
//! `TokenStream` wraps the output with next / peek / push-back access.

pub mod lexer;
pub mod tokens;
