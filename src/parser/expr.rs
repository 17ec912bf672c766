//! Expression parsing.
//!
//! Precedence is encoded as a ladder of tiered productions, loosest
//! binding first:
//!
//! - `||`
//! - `&&`
//! - `==` `!=`
//! - `<` `<=` `>` `>=`
//! - `+` `-`
//! - `*` `/` `%`
//! - unary `-` `!`
//! - primaries
//!
//! Each binary tier is left associative. Assignment is not part of
//! the ladder; it only exists at the top-level production, so `=`
//! anywhere deeper is a syntax error.

use crate::{
    ast::expr::{BinaryOp, Expr, UnaryOp},
    diagnostics::diagnostics::{DiagMessage, DiagnosticKind},
    lexer::tokens::TokenKind,
    parser::parser::Parser,
};

/// Top-level expression production.
///
/// Two tokens of lookahead decide between an assignment and a plain
/// expression: an identifier directly followed by `=` starts a scalar
/// assignment. An array assignment cannot be decided that early, so
/// the subscripts are parsed as an ordinary array access first and
/// the node is rebuilt as an assignment when `=` follows.
pub fn parse_expression(parser: &mut Parser) -> Option<Expr> {
    if parser.current_token_kind() == TokenKind::Identifier
        && parser.peek_kind(1) == TokenKind::Assignment
    {
        let name = parser.advance();
        parser.advance(); // `=`
        let value = parse_or_expression(parser)?;

        return Some(Expr::Assign {
            name: name.value,
            value: Box::new(value),
            span: name.span,
        });
    }

    let expression = parse_or_expression(parser)?;

    if parser.current_token_kind() == TokenKind::Assignment {
        if let Expr::ArrayAccess {
            name,
            subscripts,
            span,
        } = expression
        {
            parser.advance(); // `=`
            let value = parse_or_expression(parser)?;

            return Some(Expr::ArrayAssign {
                name,
                subscripts,
                value: Box::new(value),
                span,
            });
        }

        // A stray `=` after anything else is left in the stream; the
        // caller trips over it with a precise expectation.
        return Some(expression);
    }

    Some(expression)
}

pub fn parse_or_expression(parser: &mut Parser) -> Option<Expr> {
    let mut left = parse_and_expression(parser)?;

    while parser.current_token_kind() == TokenKind::Or {
        let op_token = parser.advance();
        let right = parse_and_expression(parser)?;
        left = Expr::Binary {
            op: BinaryOp::Or,
            left: Box::new(left),
            right: Box::new(right),
            span: op_token.span,
        };
    }

    Some(left)
}

fn parse_and_expression(parser: &mut Parser) -> Option<Expr> {
    let mut left = parse_equality_expression(parser)?;

    while parser.current_token_kind() == TokenKind::And {
        let op_token = parser.advance();
        let right = parse_equality_expression(parser)?;
        left = Expr::Binary {
            op: BinaryOp::And,
            left: Box::new(left),
            right: Box::new(right),
            span: op_token.span,
        };
    }

    Some(left)
}

fn parse_equality_expression(parser: &mut Parser) -> Option<Expr> {
    let mut left = parse_relational_expression(parser)?;

    loop {
        let op = match parser.current_token_kind() {
            TokenKind::Equals => BinaryOp::Equals,
            TokenKind::NotEquals => BinaryOp::NotEquals,
            _ => break,
        };

        let op_token = parser.advance();
        let right = parse_relational_expression(parser)?;
        left = Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            span: op_token.span,
        };
    }

    Some(left)
}

fn parse_relational_expression(parser: &mut Parser) -> Option<Expr> {
    let mut left = parse_additive_expression(parser)?;

    loop {
        let op = match parser.current_token_kind() {
            TokenKind::Less => BinaryOp::Less,
            TokenKind::LessEquals => BinaryOp::LessEquals,
            TokenKind::Greater => BinaryOp::Greater,
            TokenKind::GreaterEquals => BinaryOp::GreaterEquals,
            _ => break,
        };

        let op_token = parser.advance();
        let right = parse_additive_expression(parser)?;
        left = Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            span: op_token.span,
        };
    }

    Some(left)
}

fn parse_additive_expression(parser: &mut Parser) -> Option<Expr> {
    let mut left = parse_multiplicative_expression(parser)?;

    loop {
        let op = match parser.current_token_kind() {
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Dash => BinaryOp::Sub,
            _ => break,
        };

        let op_token = parser.advance();
        let right = parse_multiplicative_expression(parser)?;
        left = Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            span: op_token.span,
        };
    }

    Some(left)
}

fn parse_multiplicative_expression(parser: &mut Parser) -> Option<Expr> {
    let mut left = parse_unary_expression(parser)?;

    loop {
        let op = match parser.current_token_kind() {
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Percent => BinaryOp::Rem,
            _ => break,
        };

        let op_token = parser.advance();
        let right = parse_unary_expression(parser)?;
        left = Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            span: op_token.span,
        };
    }

    Some(left)
}

fn parse_unary_expression(parser: &mut Parser) -> Option<Expr> {
    let op = match parser.current_token_kind() {
        TokenKind::Dash => UnaryOp::Neg,
        TokenKind::Not => UnaryOp::Not,
        _ => return parse_primary_expression(parser),
    };

    let op_token = parser.advance();
    let operand = parse_unary_expression(parser)?;

    Some(Expr::Unary {
        op,
        operand: Box::new(operand),
        span: op_token.span,
    })
}

fn parse_primary_expression(parser: &mut Parser) -> Option<Expr> {
    match parser.current_token_kind() {
        TokenKind::Number => parse_number_literal(parser),
        TokenKind::True | TokenKind::False => {
            let token = parser.advance();
            Some(Expr::BoolLiteral {
                value: token.kind == TokenKind::True,
                span: token.span,
            })
        }
        TokenKind::OpenParen => {
            parser.advance();
            let expression = parse_or_expression(parser)?;
            parser.expect(TokenKind::CloseParen)?;
            Some(expression)
        }
        TokenKind::Identifier => parse_identifier_expression(parser),
        _ => {
            let found = parser.current_token().value.clone();
            parser.error(
                DiagnosticKind::Syntax,
                DiagMessage::UnexpectedToken {
                    expected: String::from("an expression"),
                    found,
                },
                parser.current_span(),
            );
            None
        }
    }
}

/// Splits the shared number token into an int or float literal. Float
/// literals keep their double-width value in the AST; emission
/// narrows them.
fn parse_number_literal(parser: &mut Parser) -> Option<Expr> {
    let token = parser.advance();

    if token.value.contains('.') {
        return match token.value.parse::<f64>() {
            Ok(value) => Some(Expr::FloatLiteral {
                value,
                span: token.span,
            }),
            Err(_) => {
                parser.error(
                    DiagnosticKind::Lexical,
                    DiagMessage::MalformedLiteral {
                        literal: token.value.clone(),
                    },
                    token.span,
                );
                None
            }
        };
    }

    match token.value.parse::<i32>() {
        Ok(value) => Some(Expr::IntLiteral {
            value,
            span: token.span,
        }),
        Err(_) => {
            parser.error(
                DiagnosticKind::Lexical,
                DiagMessage::MalformedLiteral {
                    literal: token.value.clone(),
                },
                token.span,
            );
            None
        }
    }
}

/// An identifier in expression position: a call when `(` follows, an
/// array access when `[` follows, otherwise a plain variable read.
fn parse_identifier_expression(parser: &mut Parser) -> Option<Expr> {
    let name = parser.advance();

    match parser.current_token_kind() {
        TokenKind::OpenParen => {
            parser.advance();

            let mut arguments = vec![];
            if parser.current_token_kind() != TokenKind::CloseParen {
                loop {
                    arguments.push(parse_or_expression(parser)?);
                    if parser.current_token_kind() != TokenKind::Comma {
                        break;
                    }
                    parser.advance();
                }
            }
            parser.expect(TokenKind::CloseParen)?;

            Some(Expr::Call {
                callee: name.value,
                arguments,
                span: name.span,
            })
        }
        TokenKind::OpenBracket => {
            let mut subscripts = vec![];
            while parser.current_token_kind() == TokenKind::OpenBracket {
                parser.advance();
                subscripts.push(parse_or_expression(parser)?);
                parser.expect(TokenKind::CloseBracket)?;
            }

            Some(Expr::ArrayAccess {
                name: name.value,
                subscripts,
                span: name.span,
            })
        }
        _ => Some(Expr::Variable {
            name: name.value,
            span: name.span,
        }),
    }
}
