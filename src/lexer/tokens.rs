use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("int", TokenKind::Int);
        map.insert("float", TokenKind::Float);
        map.insert("bool", TokenKind::Bool);
        map.insert("void", TokenKind::Void);
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("while", TokenKind::While);
        map.insert("return", TokenKind::Return);
        map.insert("extern", TokenKind::Extern);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Number,
    Identifier,

    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Assignment, // =
    Equals,     // ==
    Not,        // !
    NotEquals,  // !=

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Or,
    And,

    Semicolon,
    Comma,

    Plus,
    Dash,
    Slash,
    Star,
    Percent,

    // Reserved
    Int,
    Float,
    Bool,
    Void,
    If,
    Else,
    While,
    Return,
    Extern,
    True,
    False,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl TokenKind {
    /// Human-readable description used in syntax diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::EOF => "end of input",
            TokenKind::Number => "a number",
            TokenKind::Identifier => "an identifier",
            TokenKind::OpenBracket => "`[`",
            TokenKind::CloseBracket => "`]`",
            TokenKind::OpenCurly => "`{`",
            TokenKind::CloseCurly => "`}`",
            TokenKind::OpenParen => "`(`",
            TokenKind::CloseParen => "`)`",
            TokenKind::Assignment => "`=`",
            TokenKind::Equals => "`==`",
            TokenKind::Not => "`!`",
            TokenKind::NotEquals => "`!=`",
            TokenKind::Less => "`<`",
            TokenKind::LessEquals => "`<=`",
            TokenKind::Greater => "`>`",
            TokenKind::GreaterEquals => "`>=`",
            TokenKind::Or => "`||`",
            TokenKind::And => "`&&`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Comma => "`,`",
            TokenKind::Plus => "`+`",
            TokenKind::Dash => "`-`",
            TokenKind::Slash => "`/`",
            TokenKind::Star => "`*`",
            TokenKind::Percent => "`%`",
            TokenKind::Int => "`int`",
            TokenKind::Float => "`float`",
            TokenKind::Bool => "`bool`",
            TokenKind::Void => "`void`",
            TokenKind::If => "`if`",
            TokenKind::Else => "`else`",
            TokenKind::While => "`while`",
            TokenKind::Return => "`return`",
            TokenKind::Extern => "`extern`",
            TokenKind::True => "`true`",
            TokenKind::False => "`false`",
        }
    }

    /// Type keywords start every declaration.
    pub fn is_type_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Int | TokenKind::Float | TokenKind::Bool | TokenKind::Void
        )
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token {{\nkind: {},\nvalue: {}}}", self.kind, self.value)
    }
}

impl Token {
    fn is_one_of_many(&self, tokens: Vec<TokenKind>) -> bool {
        for token in tokens {
            if token == self.kind {
                return true;
            }
        }

        false
    }

    pub fn debug(&self) {
        if self.is_one_of_many(vec![TokenKind::Identifier, TokenKind::Number]) {
            println!("{} ({})", self.kind, self.value);
        } else {
            println!("{} ()", self.kind);
        }
    }
}

/// Token supply for the parser.
///
/// Wraps the lexer output and provides the three operations the parser
/// works with: take the next token, peek an arbitrary distance ahead,
/// and return a taken token for re-reading. Once the trailing EOF token
/// has been taken, further reads keep yielding it.
#[derive(Debug)]
pub struct TokenStream {
    tokens: Vec<Token>,
    pos: usize,
    pushed_back: Vec<Token>,
}

impl TokenStream {
    /// The token vector must end with an EOF token, which `tokenize`
    /// guarantees.
    pub fn new(tokens: Vec<Token>) -> Self {
        TokenStream {
            tokens,
            pos: 0,
            pushed_back: Vec::new(),
        }
    }

    pub fn next(&mut self) -> Token {
        if let Some(token) = self.pushed_back.pop() {
            return token;
        }

        if self.pos < self.tokens.len() {
            let token = self.tokens[self.pos].clone();
            self.pos += 1;
            return token;
        }

        self.tokens.last().unwrap().clone()
    }

    /// Peeks `k` tokens ahead without consuming anything. `peek(0)` is
    /// the token `next` would return.
    pub fn peek(&self, k: usize) -> &Token {
        if k < self.pushed_back.len() {
            return &self.pushed_back[self.pushed_back.len() - 1 - k];
        }

        let index = self.pos + (k - self.pushed_back.len());
        if index < self.tokens.len() {
            &self.tokens[index]
        } else {
            self.tokens.last().unwrap()
        }
    }

    /// Returns a token taken with `next` so it can be read again.
    /// Tokens are handed back in most-recently-pushed order.
    pub fn push_back(&mut self, token: Token) {
        self.pushed_back.push(token);
    }

    /// Number of tokens consumed so far, net of push-backs. Used by the
    /// parser to guarantee forward progress during error recovery.
    pub fn position(&self) -> usize {
        self.pos - self.pushed_back.len()
    }
}
