//! Unit tests for the diagnostics module.
//!
//! Covers edit-distance suggestions, sink bookkeeping, and batch
//! rendering with carets and kind grouping.

use super::diagnostics::*;
use crate::Span;

#[test]
fn test_levenshtein_distance() {
    assert_eq!(levenshtein("count", "count"), 0);
    assert_eq!(levenshtein("count", "cuont"), 2);
    assert_eq!(levenshtein("count", "coun"), 1);
    assert_eq!(levenshtein("count", "counts"), 1);
    assert_eq!(levenshtein("", "abc"), 3);
    assert_eq!(levenshtein("abc", ""), 3);
    assert_eq!(levenshtein("kitten", "sitting"), 3);
}

#[test]
fn test_suggest_picks_closest_candidate() {
    let candidates = ["count", "total", "index"];
    let suggestion = suggest("cuont", candidates.iter().copied());
    assert_eq!(suggestion, Some(String::from("count")));
}

#[test]
fn test_suggest_respects_distance_threshold() {
    // `max(1, len / 3)` for a 3-character name is 1; "xyz" is nowhere
    // near any candidate.
    let candidates = ["count", "total"];
    assert_eq!(suggest("xyz", candidates.iter().copied()), None);

    // An exact match is not a suggestion.
    assert_eq!(suggest("count", candidates.iter().copied()), None);

    // Short names only get a suggestion at distance 1.
    assert_eq!(
        suggest("cnt", ["cn", "abcdef"].iter().copied()),
        Some(String::from("cn"))
    );
}

#[test]
fn test_sink_counts_by_kind() {
    let mut diagnostics = Diagnostics::new();
    assert!(diagnostics.is_empty());

    diagnostics.error(
        DiagnosticKind::Syntax,
        DiagMessage::EmptyStatement,
        Span::new(1, 1),
    );
    diagnostics.error(
        DiagnosticKind::Type,
        DiagMessage::TypeMismatch {
            expected: String::from("int"),
            received: String::from("float"),
        },
        Span::new(2, 5),
    );
    diagnostics.error_no_span(DiagnosticKind::Scope, DiagMessage::MissingMain);

    assert_eq!(diagnostics.len(), 3);
    assert_eq!(diagnostics.count_of(DiagnosticKind::Syntax), 1);
    assert_eq!(diagnostics.count_of(DiagnosticKind::Type), 1);
    assert_eq!(diagnostics.count_of(DiagnosticKind::Scope), 1);
    assert_eq!(diagnostics.count_of(DiagnosticKind::Lexical), 0);
}

#[test]
fn test_render_includes_source_line_and_caret() {
    let source = "int main() {\n    x = 1;\n}\n";
    let mut diagnostics = Diagnostics::new();
    diagnostics.error(
        DiagnosticKind::Scope,
        DiagMessage::NotDeclared {
            name: String::from("x"),
        },
        Span::new(2, 5),
    );

    let rendered = diagnostics.render("demo.mc", source);

    assert!(rendered.contains("Scope error: variable `x` has not been declared"));
    assert!(rendered.contains("-> demo.mc:2:5"));
    assert!(rendered.contains("2 | x = 1;"));
    // Leading indentation is stripped, so the caret lands on column 1
    // of the trimmed line.
    assert!(rendered.contains("| ^"));
}

#[test]
fn test_render_caret_offset() {
    let source = "x = y;\n";
    let mut diagnostics = Diagnostics::new();
    diagnostics.error(
        DiagnosticKind::Scope,
        DiagMessage::NotDeclared {
            name: String::from("y"),
        },
        Span::new(1, 5),
    );

    let rendered = diagnostics.render("demo.mc", source);

    assert!(rendered.contains("1 | x = y;"));
    assert!(rendered.contains("| ----^"));
}

#[test]
fn test_render_groups_by_kind_in_fixed_order() {
    let source = "int x;\n";
    let mut diagnostics = Diagnostics::new();

    // Inserted out of display order on purpose.
    diagnostics.error_no_span(DiagnosticKind::Scope, DiagMessage::MissingMain);
    diagnostics.error(
        DiagnosticKind::Syntax,
        DiagMessage::EmptyStatement,
        Span::new(1, 1),
    );
    diagnostics.error(
        DiagnosticKind::Lexical,
        DiagMessage::UnrecognisedCharacter { character: '@' },
        Span::new(1, 1),
    );

    let rendered = diagnostics.render("demo.mc", source);

    let lexical = rendered.find("Lexical error").unwrap();
    let syntax = rendered.find("Syntax error").unwrap();
    let scope = rendered.find("Scope error").unwrap();
    assert!(lexical < syntax);
    assert!(syntax < scope);
}

#[test]
fn test_render_context_follows_message() {
    let source = "cuont = 1;\n";
    let mut diagnostics = Diagnostics::new();
    diagnostics.error_with_context(
        DiagnosticKind::Scope,
        DiagMessage::NotDeclared {
            name: String::from("cuont"),
        },
        Span::new(1, 1),
        String::from("did you mean `count`?"),
    );

    let rendered = diagnostics.render("demo.mc", source);

    assert!(rendered
        .contains("Scope error: variable `cuont` has not been declared (did you mean `count`?)"));
}

#[test]
fn test_render_without_span_skips_source_excerpt() {
    let mut diagnostics = Diagnostics::new();
    diagnostics.error_no_span(DiagnosticKind::Scope, DiagMessage::MissingMain);

    let rendered = diagnostics.render("demo.mc", "int x;\n");

    assert!(rendered.contains("Scope error: no function named `main` is defined"));
    assert!(rendered.contains("-> demo.mc"));
    assert!(!rendered.contains("|"));
}
