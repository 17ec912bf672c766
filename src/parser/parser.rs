use crate::{
    ast::stmt::Program,
    diagnostics::diagnostics::{DiagMessage, DiagnosticKind, Diagnostics},
    lexer::tokens::{Token, TokenKind, TokenStream},
    parser::decl::parse_declaration,
    Span,
};

/// The parser state: the token stream plus the shared diagnostics
/// sink.
///
/// Productions do not return errors. A production that cannot make
/// sense of its input reports a syntax diagnostic and yields `None`;
/// the caller abandons the surrounding statement or declaration and
/// recovery happens at the top-level declaration loop.
pub struct Parser<'d> {
    tokens: TokenStream,
    diagnostics: &'d mut Diagnostics,
}

impl<'d> Parser<'d> {
    pub fn new(tokens: TokenStream, diagnostics: &'d mut Diagnostics) -> Self {
        Parser {
            tokens,
            diagnostics,
        }
    }

    /// Returns the current token without consuming it.
    pub fn current_token(&self) -> &Token {
        self.tokens.peek(0)
    }

    pub fn current_token_kind(&self) -> TokenKind {
        self.tokens.peek(0).kind
    }

    /// Looks `k` tokens past the current one. `peek_kind(1)` is the
    /// second token of lookahead.
    pub fn peek_kind(&self, k: usize) -> TokenKind {
        self.tokens.peek(k).kind
    }

    pub fn current_span(&self) -> Span {
        self.tokens.peek(0).span
    }

    /// Consumes and returns the current token.
    pub fn advance(&mut self) -> Token {
        self.tokens.next()
    }

    /// Net number of tokens consumed. The recovery loop compares this
    /// before and after a failed declaration to guarantee progress.
    pub fn position(&self) -> usize {
        self.tokens.position()
    }

    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    pub fn error(&mut self, kind: DiagnosticKind, message: DiagMessage, span: Span) {
        self.diagnostics.error(kind, message, span);
    }

    /// Consumes the current token when it has the expected kind.
    /// Otherwise reports a syntax diagnostic naming both sides and
    /// yields `None`.
    pub fn expect(&mut self, expected: TokenKind) -> Option<Token> {
        if self.current_token_kind() == expected {
            return Some(self.advance());
        }

        let found = self.current_token().value.clone();
        let span = self.current_span();
        self.error(
            DiagnosticKind::Syntax,
            DiagMessage::UnexpectedToken {
                expected: String::from(expected.describe()),
                found,
            },
            span,
        );
        None
    }

    pub fn at_declaration_start(&self) -> bool {
        let kind = self.current_token_kind();
        kind.is_type_keyword() || kind == TokenKind::Extern
    }

    /// Skips tokens until the next plausible top-level declaration
    /// start, so one run can surface several independent diagnostics.
    pub fn synchronize_to_declaration(&mut self) {
        while self.has_tokens() && !self.at_declaration_start() {
            self.advance();
        }
    }
}

/// Parses a whole translation unit.
///
/// Declarations that fail to parse are dropped from the AST; the loop
/// resynchronizes on the next type keyword or `extern` and continues.
/// When a declaration fails without consuming anything (the offending
/// token is itself a declaration start) one token is force-skipped
/// first, so the loop always terminates.
pub fn parse(tokens: Vec<Token>, diagnostics: &mut Diagnostics) -> Program {
    let mut parser = Parser::new(TokenStream::new(tokens), diagnostics);
    let mut declarations = vec![];

    while parser.has_tokens() {
        let before = parser.position();

        match parse_declaration(&mut parser) {
            Some(declaration) => declarations.push(declaration),
            None => {
                if parser.position() == before {
                    parser.advance();
                }
                parser.synchronize_to_declaration();
            }
        }
    }

    Program { declarations }
}
