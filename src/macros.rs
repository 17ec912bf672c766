//! Helper macros for the lexer's pattern table.
//!
//! `MK_TOKEN!` assembles a `Token` from its parts; `MK_DEFAULT_HANDLER!`
//! expands to a pattern handler for tokens whose lexeme is a fixed
//! string, which covers every operator and punctuation mark.

/// Assembles a `Token` from a kind, its lexeme and a source span.
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::Number, String::from("42"), span);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $span:expr) => {
        Token {
            kind: $kind,
            value: $value,
            span: $span,
        }
    };
}

/// Expands to a handler for a fixed-lexeme pattern: pushes one token of
/// the given kind at the current position and steps past the lexeme.
///
/// ```ignore
/// RegexPattern {
///     regex: Regex::new(r"\+").unwrap(),
///     handler: MK_DEFAULT_HANDLER!(TokenKind::Plus, "+"),
/// }
/// ```
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr, $value:literal) => {
        |lexer: &mut Lexer, _regex: &Regex| {
            let span = lexer.current_span();
            lexer.push(MK_TOKEN!($kind, String::from($value), span));
            lexer.advance_n($value.len());
        }
    };
}
