use std::fmt::Display;

use crate::Span;

/// Binary operators, in the shape the parser's precedence tiers produce
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Equals,
    NotEquals,

    And,
    Or,
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Less => "<",
            BinaryOp::LessEquals => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEquals => ">=",
            BinaryOp::Equals => "==",
            BinaryOp::NotEquals => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        };
        write!(f, "{}", symbol)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        };
        write!(f, "{}", symbol)
    }
}

/// Expression nodes.
///
/// Float literals hold the full double-width value as written; the
/// analyzer narrows them to single precision when it emits IR.
/// `Assign` and `ArrayAssign` are only produced by the top-level
/// expression production, so they can never appear nested inside an
/// operand.
#[derive(Debug, Clone)]
pub enum Expr {
    IntLiteral {
        value: i32,
        span: Span,
    },
    FloatLiteral {
        value: f64,
        span: Span,
    },
    BoolLiteral {
        value: bool,
        span: Span,
    },
    Variable {
        name: String,
        span: Span,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        span: Span,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },
    ArrayAccess {
        name: String,
        subscripts: Vec<Expr>,
        span: Span,
    },
    Call {
        callee: String,
        arguments: Vec<Expr>,
        span: Span,
    },
    Assign {
        name: String,
        value: Box<Expr>,
        span: Span,
    },
    ArrayAssign {
        name: String,
        subscripts: Vec<Expr>,
        value: Box<Expr>,
        span: Span,
    },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::IntLiteral { span, .. } => *span,
            Expr::FloatLiteral { span, .. } => *span,
            Expr::BoolLiteral { span, .. } => *span,
            Expr::Variable { span, .. } => *span,
            Expr::Unary { span, .. } => *span,
            Expr::Binary { span, .. } => *span,
            Expr::ArrayAccess { span, .. } => *span,
            Expr::Call { span, .. } => *span,
            Expr::Assign { span, .. } => *span,
            Expr::ArrayAssign { span, .. } => *span,
        }
    }

    pub fn is_assignment(&self) -> bool {
        matches!(self, Expr::Assign { .. } | Expr::ArrayAssign { .. })
    }
}
