//! Statement and block parsing.
//!
//! Blocks follow the C89 shape: all local declarations come first,
//! then statements. A type keyword seen after the first statement is
//! its own diagnostic rather than a generic unexpected token.

use crate::{
    ast::{
        expr::Expr,
        stmt::{ArrayDecl, Block, LocalDecl, Stmt, VarDecl},
    },
    diagnostics::diagnostics::{DiagMessage, DiagnosticKind},
    lexer::tokens::TokenKind,
    parser::{
        decl::{parse_array_dims, parse_type_keyword},
        expr::{parse_expression, parse_or_expression},
        parser::Parser,
    },
};

/// Parses `{ declarations... statements... }`.
pub fn parse_block(parser: &mut Parser) -> Option<Block> {
    let start = parser.expect(TokenKind::OpenCurly)?.span;

    let mut declarations = vec![];
    while parser.current_token_kind().is_type_keyword() {
        declarations.push(parse_local_declaration(parser)?);
    }

    let mut statements = vec![];
    while parser.has_tokens() && parser.current_token_kind() != TokenKind::CloseCurly {
        if parser.current_token_kind().is_type_keyword() {
            parser.error(
                DiagnosticKind::Syntax,
                DiagMessage::DeclarationAfterStatement,
                parser.current_span(),
            );
            return None;
        }

        statements.push(parse_statement(parser)?);
    }

    parser.expect(TokenKind::CloseCurly)?;

    Some(Block {
        declarations,
        statements,
        span: start,
    })
}

/// A local variable or array declaration. Local functions do not
/// exist, so `(` after the name falls through to the generic error.
pub fn parse_local_declaration(parser: &mut Parser) -> Option<LocalDecl> {
    let (ty, _) = parse_type_keyword(parser)?;
    let name = parser.expect(TokenKind::Identifier)?;

    match parser.current_token_kind() {
        TokenKind::Semicolon => {
            parser.advance();
            Some(LocalDecl::Var(VarDecl {
                name: name.value,
                ty,
                span: name.span,
            }))
        }
        TokenKind::OpenBracket => {
            let dims = parse_array_dims(parser)?;
            parser.expect(TokenKind::Semicolon)?;
            Some(LocalDecl::Array(ArrayDecl {
                name: name.value,
                ty,
                dims,
                span: name.span,
            }))
        }
        _ => {
            let found = parser.current_token().value.clone();
            parser.error(
                DiagnosticKind::Syntax,
                DiagMessage::UnexpectedToken {
                    expected: String::from("`;` or `[`"),
                    found,
                },
                parser.current_span(),
            );
            None
        }
    }
}

pub fn parse_statement(parser: &mut Parser) -> Option<Stmt> {
    match parser.current_token_kind() {
        TokenKind::OpenCurly => Some(Stmt::Block(parse_block(parser)?)),
        TokenKind::If => parse_if_statement(parser),
        TokenKind::While => parse_while_statement(parser),
        TokenKind::Return => parse_return_statement(parser),
        TokenKind::Semicolon => {
            parser.error(
                DiagnosticKind::Syntax,
                DiagMessage::EmptyStatement,
                parser.current_span(),
            );
            None
        }
        _ => {
            let span = parser.current_span();
            let expression = parse_expression(parser)?;
            parser.expect(TokenKind::Semicolon)?;
            Some(Stmt::Expression { expression, span })
        }
    }
}

/// `if (cond) { ... }` with an optional `else { ... }`. Both branches
/// must be blocks; `else if` chains are spelled with explicit braces.
fn parse_if_statement(parser: &mut Parser) -> Option<Stmt> {
    let start = parser.advance().span;

    parser.expect(TokenKind::OpenParen)?;
    let condition = parse_condition(parser)?;
    parser.expect(TokenKind::CloseParen)?;

    let then_body = parse_block(parser)?;

    let else_body = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        Some(parse_block(parser)?)
    } else {
        None
    };

    Some(Stmt::If {
        condition,
        then_body,
        else_body,
        span: start,
    })
}

/// `while (cond) body`. Unlike `if`, the body is any single
/// statement.
fn parse_while_statement(parser: &mut Parser) -> Option<Stmt> {
    let start = parser.advance().span;

    parser.expect(TokenKind::OpenParen)?;
    let condition = parse_condition(parser)?;
    parser.expect(TokenKind::CloseParen)?;

    let body = parse_statement(parser)?;

    Some(Stmt::While {
        condition,
        body: Box::new(body),
        span: start,
    })
}

fn parse_return_statement(parser: &mut Parser) -> Option<Stmt> {
    let start = parser.advance().span;

    if parser.current_token_kind() == TokenKind::Semicolon {
        parser.advance();
        return Some(Stmt::Return {
            value: None,
            span: start,
        });
    }

    let value = parse_or_expression(parser)?;
    parser.expect(TokenKind::Semicolon)?;

    Some(Stmt::Return {
        value: Some(value),
        span: start,
    })
}

/// The body of a parenthesised condition. The full expression
/// production runs first so that `if (x = 1)` is reported as an
/// assignment used as a condition instead of a stray `=`.
fn parse_condition(parser: &mut Parser) -> Option<Expr> {
    let expression = parse_expression(parser)?;

    if expression.is_assignment() {
        parser.error(
            DiagnosticKind::Syntax,
            DiagMessage::AssignmentAsCondition,
            expression.span(),
        );
        return None;
    }

    Some(expression)
}
