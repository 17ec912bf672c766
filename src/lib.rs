#![allow(clippy::module_inception)]

pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod sema;
pub mod symbols;
pub mod types;

extern crate regex;

/// A point in the source text, 1-based in both coordinates.
///
/// Line 0 marks a synthesized location with no source counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: u32,
    pub column: u32,
}

impl Span {
    pub fn new(line: u32, column: u32) -> Self {
        Span { line, column }
    }

    pub fn null() -> Self {
        Span { line: 0, column: 0 }
    }
}

/// Returns the text of the 1-based `line`, without its line terminator.
pub fn get_source_line(source: &str, line: u32) -> Option<&str> {
    if line == 0 {
        return None;
    }

    source
        .split('\n')
        .nth(line as usize - 1)
        .map(|text| text.strip_suffix('\r').unwrap_or(text))
}

pub fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}
