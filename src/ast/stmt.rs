use crate::{ast::expr::Expr, types::types::Ty, Span};

/// A scalar variable declaration, local or global.
#[derive(Debug, Clone)]
pub struct VarDecl {
    pub name: String,
    pub ty: Ty,
    pub span: Span,
}

/// An array declaration with 1 to 3 sized dimensions, outermost first.
#[derive(Debug, Clone)]
pub struct ArrayDecl {
    pub name: String,
    pub ty: Ty,
    pub dims: Vec<u32>,
    pub span: Span,
}

/// A declaration permitted at the head of a block.
#[derive(Debug, Clone)]
pub enum LocalDecl {
    Var(VarDecl),
    Array(ArrayDecl),
}

/// A formal parameter.
///
/// `inner_dims` is `None` for a scalar parameter. For an array
/// parameter it holds the sized dimensions after the first; the first
/// dimension decays away regardless of whether a size was written.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: Ty,
    pub inner_dims: Option<Vec<u32>>,
    pub span: Span,
}

/// A function prototype, optionally marked `extern`.
#[derive(Debug, Clone)]
pub struct Prototype {
    pub name: String,
    pub return_ty: Ty,
    pub params: Vec<Param>,
    pub is_extern: bool,
    pub span: Span,
}

/// A function definition.
#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub return_ty: Ty,
    pub params: Vec<Param>,
    pub body: Block,
    pub span: Span,
}

/// A brace-delimited block: declarations first, then statements.
#[derive(Debug, Clone)]
pub struct Block {
    pub declarations: Vec<LocalDecl>,
    pub statements: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Block(Block),
    If {
        condition: Expr,
        then_body: Block,
        else_body: Option<Block>,
        span: Span,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
        span: Span,
    },
    Return {
        value: Option<Expr>,
        span: Span,
    },
    Expression {
        expression: Expr,
        span: Span,
    },
}

/// A top-level declaration.
#[derive(Debug, Clone)]
pub enum Decl {
    Var(VarDecl),
    Array(ArrayDecl),
    Prototype(Prototype),
    Function(Function),
}

/// The root of the AST: one source file's declarations in order.
#[derive(Debug, Clone)]
pub struct Program {
    pub declarations: Vec<Decl>,
}
