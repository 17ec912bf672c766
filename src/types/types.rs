use std::fmt::Display;

use crate::ast::expr::{BinaryOp, Expr, UnaryOp};

/// The scalar value types. `Bool < Int < Float` is the implicit
/// widening order; `Void` only occurs as a function return type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ty {
    Void,
    Bool,
    Int,
    Float,
}

impl Display for Ty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Ty::Void => "void",
            Ty::Bool => "bool",
            Ty::Int => "int",
            Ty::Float => "float",
        };
        write!(f, "{}", name)
    }
}

impl Ty {
    /// True when a value of `self` converts to `target` without losing
    /// information. Widening is always implicit.
    pub fn widens_to(self, target: Ty) -> bool {
        matches!(
            (self, target),
            (Ty::Bool, Ty::Int) | (Ty::Bool, Ty::Float) | (Ty::Int, Ty::Float)
        )
    }

    /// Assignment compatibility: identical or widening.
    pub fn assignable_to(self, target: Ty) -> bool {
        self == target || self.widens_to(target)
    }
}

/// How a value of one type may become another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    Identity,
    Widening,
    /// Lossy; only condition positions and logical operands perform it,
    /// as truthiness narrowing.
    Narrowing,
    /// No conversion exists (anything involving `void`).
    Forbidden,
}

pub fn classify_conversion(from: Ty, to: Ty) -> Conversion {
    if from == to {
        Conversion::Identity
    } else if from.widens_to(to) {
        Conversion::Widening
    } else if to.widens_to(from) {
        Conversion::Narrowing
    } else {
        Conversion::Forbidden
    }
}

/// The shape of a declared name: a plain scalar, a sized array, or a
/// decayed array parameter whose first dimension is unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDesc {
    Scalar(Ty),
    Array { elem: Ty, dims: Vec<u32> },
    ArrayParam { elem: Ty, inner_dims: Vec<u32> },
}

impl TypeDesc {
    /// The scalar type of a fully subscripted element, or of the value
    /// itself for scalars.
    pub fn elem_ty(&self) -> Ty {
        match self {
            TypeDesc::Scalar(ty) => *ty,
            TypeDesc::Array { elem, .. } => *elem,
            TypeDesc::ArrayParam { elem, .. } => *elem,
        }
    }

    /// Number of subscripts a full element access takes. Zero for
    /// scalars.
    pub fn dim_count(&self) -> usize {
        match self {
            TypeDesc::Scalar(_) => 0,
            TypeDesc::Array { dims, .. } => dims.len(),
            TypeDesc::ArrayParam { inner_dims, .. } => inner_dims.len() + 1,
        }
    }

    pub fn is_array(&self) -> bool {
        !matches!(self, TypeDesc::Scalar(_))
    }
}

impl Display for TypeDesc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeDesc::Scalar(ty) => write!(f, "{}", ty),
            TypeDesc::Array { elem, dims } => {
                write!(f, "{}", elem)?;
                for dim in dims {
                    write!(f, "[{}]", dim)?;
                }
                Ok(())
            }
            TypeDesc::ArrayParam { elem, inner_dims } => {
                write!(f, "{}[]", elem)?;
                for dim in inner_dims {
                    write!(f, "[{}]", dim)?;
                }
                Ok(())
            }
        }
    }
}

/// A function signature as recorded at its first declaration. Parameter
/// names are not part of the signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FnSig {
    pub return_ty: Ty,
    pub params: Vec<TypeDesc>,
}

/// The resolved typing of a binary operator application: the common
/// type both operands convert to and the type of the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryRule {
    pub operand: Ty,
    pub result: Ty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryTypeError {
    /// Arithmetic and ordered comparison reject `bool` operands before
    /// any promotion is considered.
    BoolOperand,
    /// `+ - * /` never mix `int` and `float` directly.
    MixedOperands,
    /// `%` needs both operands to resolve to `int`.
    RemRequiresInt,
    VoidOperand,
}

/// Resolves operand and result types for `op` applied to `left` and
/// `right`.
///
/// The rules, in the order they apply:
/// 1. `void` operands are always invalid.
/// 2. `+ - * / < <= > >=` reject `bool` operands outright.
/// 3. `+ - * /` require both operands to already agree; `int` with
///    `float` is an error, not a promotion.
/// 4. Ordered comparison and equality promote `int` to `float` when
///    mixed; equality additionally widens a `bool` operand to match.
/// 5. `%` widens `bool` to `int` and rejects `float`.
/// 6. `&&` and `||` accept any value type; both operands narrow to
///    `bool` through truthiness.
pub fn resolve_binary(op: BinaryOp, left: Ty, right: Ty) -> Result<BinaryRule, BinaryTypeError> {
    if left == Ty::Void || right == Ty::Void {
        return Err(BinaryTypeError::VoidOperand);
    }

    match op {
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => {
            if left == Ty::Bool || right == Ty::Bool {
                return Err(BinaryTypeError::BoolOperand);
            }
            if left != right {
                return Err(BinaryTypeError::MixedOperands);
            }
            Ok(BinaryRule {
                operand: left,
                result: left,
            })
        }
        BinaryOp::Rem => {
            let left = if left == Ty::Bool { Ty::Int } else { left };
            let right = if right == Ty::Bool { Ty::Int } else { right };
            if left != Ty::Int || right != Ty::Int {
                return Err(BinaryTypeError::RemRequiresInt);
            }
            Ok(BinaryRule {
                operand: Ty::Int,
                result: Ty::Int,
            })
        }
        BinaryOp::Less | BinaryOp::LessEquals | BinaryOp::Greater | BinaryOp::GreaterEquals => {
            if left == Ty::Bool || right == Ty::Bool {
                return Err(BinaryTypeError::BoolOperand);
            }
            let operand = if left == right { left } else { Ty::Float };
            Ok(BinaryRule {
                operand,
                result: Ty::Bool,
            })
        }
        BinaryOp::Equals | BinaryOp::NotEquals => {
            let operand = if left == right {
                left
            } else if left.widens_to(right) {
                right
            } else {
                left
            };
            Ok(BinaryRule {
                operand,
                result: Ty::Bool,
            })
        }
        BinaryOp::And | BinaryOp::Or => Ok(BinaryRule {
            operand: Ty::Bool,
            result: Ty::Bool,
        }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryTypeError {
    /// Unary `-` does not apply to `bool`.
    BoolOperand,
    VoidOperand,
}

pub fn resolve_unary(op: UnaryOp, operand: Ty) -> Result<Ty, UnaryTypeError> {
    if operand == Ty::Void {
        return Err(UnaryTypeError::VoidOperand);
    }

    match op {
        UnaryOp::Neg => {
            if operand == Ty::Bool {
                return Err(UnaryTypeError::BoolOperand);
            }
            Ok(operand)
        }
        // `!` is a truthiness position and accepts any value type.
        UnaryOp::Not => Ok(Ty::Bool),
    }
}

/// True for a literal zero divisor, including one wrapped in unary
/// minus. Runtime zero divisors are not the front end's concern.
pub fn is_const_zero(expr: &Expr) -> bool {
    match expr {
        Expr::IntLiteral { value, .. } => *value == 0,
        Expr::FloatLiteral { value, .. } => *value == 0.0,
        Expr::Unary {
            op: UnaryOp::Neg,
            operand,
            ..
        } => is_const_zero(operand),
        _ => false,
    }
}
