//! Top-level declaration parsing: global variables, global arrays,
//! prototypes and function definitions.

use crate::{
    ast::stmt::{ArrayDecl, Decl, Function, Param, Prototype, VarDecl},
    diagnostics::diagnostics::{DiagMessage, DiagnosticKind},
    lexer::tokens::{Token, TokenKind},
    parser::{parser::Parser, stmt::parse_block},
    types::types::Ty,
};

/// Parses one top-level declaration. The shape is decided after the
/// name: `;` closes a variable, `[` starts array dimensions and `(`
/// starts a parameter list.
pub fn parse_declaration(parser: &mut Parser) -> Option<Decl> {
    let is_extern = if parser.current_token_kind() == TokenKind::Extern {
        parser.advance();
        true
    } else {
        false
    };

    let (ty, _) = parse_type_keyword(parser)?;
    let name = parser.expect(TokenKind::Identifier)?;

    if is_extern && parser.current_token_kind() != TokenKind::OpenParen {
        let found = parser.current_token().value.clone();
        parser.error(
            DiagnosticKind::Syntax,
            DiagMessage::UnexpectedToken {
                expected: String::from("`(`"),
                found,
            },
            parser.current_span(),
        );
        return None;
    }

    match parser.current_token_kind() {
        TokenKind::Semicolon => {
            parser.advance();
            Some(Decl::Var(VarDecl {
                name: name.value,
                ty,
                span: name.span,
            }))
        }
        TokenKind::OpenBracket => {
            let dims = parse_array_dims(parser)?;
            parser.expect(TokenKind::Semicolon)?;
            Some(Decl::Array(ArrayDecl {
                name: name.value,
                ty,
                dims,
                span: name.span,
            }))
        }
        TokenKind::OpenParen => parse_function(parser, ty, name, is_extern),
        _ => {
            let found = parser.current_token().value.clone();
            parser.error(
                DiagnosticKind::Syntax,
                DiagMessage::UnexpectedToken {
                    expected: String::from("`;`, `[` or `(`"),
                    found,
                },
                parser.current_span(),
            );
            None
        }
    }
}

/// Consumes a type keyword and maps it to its semantic type.
pub fn parse_type_keyword(parser: &mut Parser) -> Option<(Ty, Token)> {
    let ty = match parser.current_token_kind() {
        TokenKind::Int => Ty::Int,
        TokenKind::Float => Ty::Float,
        TokenKind::Bool => Ty::Bool,
        TokenKind::Void => Ty::Void,
        _ => {
            let found = parser.current_token().value.clone();
            parser.error(
                DiagnosticKind::Syntax,
                DiagMessage::UnexpectedToken {
                    expected: String::from("a type keyword"),
                    found,
                },
                parser.current_span(),
            );
            return None;
        }
    };

    Some((ty, parser.advance()))
}

/// Parses `[N][M]...` after a declared array name. At most three
/// dimensions are accepted and each must be a positive integer
/// literal.
pub fn parse_array_dims(parser: &mut Parser) -> Option<Vec<u32>> {
    let mut dims = vec![];

    while parser.current_token_kind() == TokenKind::OpenBracket {
        if dims.len() == 3 {
            parser.error(
                DiagnosticKind::Syntax,
                DiagMessage::TooManyDimensions,
                parser.current_span(),
            );
            return None;
        }

        parser.advance();
        dims.push(parse_dimension_value(parser)?);
        parser.expect(TokenKind::CloseBracket)?;
    }

    Some(dims)
}

/// A single dimension size. Zero, fractional and out-of-range values
/// are all rejected here rather than later in analysis.
fn parse_dimension_value(parser: &mut Parser) -> Option<u32> {
    let token = parser.expect(TokenKind::Number)?;

    if !token.value.contains('.') {
        if let Ok(value) = token.value.parse::<u32>() {
            if value >= 1 {
                return Some(value);
            }
        }
    }

    parser.error(
        DiagnosticKind::Syntax,
        DiagMessage::InvalidDimension {
            value: token.value.clone(),
        },
        token.span,
    );
    None
}

/// Parses the parameter list and body (or closing `;`) of a function.
/// Reaching this point with `extern` set means the declaration must
/// end as a prototype.
fn parse_function(parser: &mut Parser, return_ty: Ty, name: Token, is_extern: bool) -> Option<Decl> {
    parser.advance(); // `(`

    let mut params = vec![];
    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            params.push(parse_param(parser)?);
            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }
            parser.advance();
        }
    }
    parser.expect(TokenKind::CloseParen)?;

    match parser.current_token_kind() {
        TokenKind::Semicolon => {
            parser.advance();
            Some(Decl::Prototype(Prototype {
                name: name.value,
                return_ty,
                params,
                is_extern,
                span: name.span,
            }))
        }
        TokenKind::OpenCurly => {
            if is_extern {
                parser.error(
                    DiagnosticKind::Syntax,
                    DiagMessage::ExternWithBody,
                    parser.current_span(),
                );
                return None;
            }

            let body = parse_block(parser)?;
            Some(Decl::Function(Function {
                name: name.value,
                return_ty,
                params,
                body,
                span: name.span,
            }))
        }
        _ => {
            let found = parser.current_token().value.clone();
            parser.error(
                DiagnosticKind::Syntax,
                DiagMessage::UnexpectedToken {
                    expected: String::from("`;` or `{`"),
                    found,
                },
                parser.current_span(),
            );
            None
        }
    }
}

/// One parameter: a type, a name, and optionally array brackets. The
/// first bracket pair may carry a size but it is discarded, arrays
/// decay to an element pointer at the call boundary. Any further
/// bracket pairs must be sized and are kept as the inner dimensions.
fn parse_param(parser: &mut Parser) -> Option<Param> {
    let (ty, _) = parse_type_keyword(parser)?;
    let name = parser.expect(TokenKind::Identifier)?;

    let mut inner_dims = None;
    if parser.current_token_kind() == TokenKind::OpenBracket {
        parser.advance();
        if parser.current_token_kind() == TokenKind::Number {
            parse_dimension_value(parser)?;
        }
        parser.expect(TokenKind::CloseBracket)?;

        let mut dims = vec![];
        while parser.current_token_kind() == TokenKind::OpenBracket {
            if dims.len() == 2 {
                parser.error(
                    DiagnosticKind::Syntax,
                    DiagMessage::TooManyDimensions,
                    parser.current_span(),
                );
                return None;
            }

            parser.advance();
            dims.push(parse_dimension_value(parser)?);
            parser.expect(TokenKind::CloseBracket)?;
        }

        inner_dims = Some(dims);
    }

    Some(Param {
        name: name.value,
        ty,
        inner_dims,
        span: name.span,
    })
}
