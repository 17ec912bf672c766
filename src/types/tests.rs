//! Unit tests for the type system module.
//!
//! Covers the widening order, conversion classification, binary and
//! unary operand resolution, and constant-zero divisor detection.

use super::types::*;
use crate::{
    ast::expr::{BinaryOp, Expr, UnaryOp},
    Span,
};

#[test]
fn test_widening_order() {
    assert!(Ty::Bool.widens_to(Ty::Int));
    assert!(Ty::Bool.widens_to(Ty::Float));
    assert!(Ty::Int.widens_to(Ty::Float));

    assert!(!Ty::Int.widens_to(Ty::Bool));
    assert!(!Ty::Float.widens_to(Ty::Int));
    assert!(!Ty::Float.widens_to(Ty::Bool));
    assert!(!Ty::Int.widens_to(Ty::Int));
    assert!(!Ty::Void.widens_to(Ty::Int));
    assert!(!Ty::Bool.widens_to(Ty::Void));
}

#[test]
fn test_classify_conversion() {
    assert_eq!(classify_conversion(Ty::Int, Ty::Int), Conversion::Identity);
    assert_eq!(classify_conversion(Ty::Bool, Ty::Float), Conversion::Widening);
    assert_eq!(classify_conversion(Ty::Float, Ty::Int), Conversion::Narrowing);
    assert_eq!(classify_conversion(Ty::Float, Ty::Bool), Conversion::Narrowing);
    assert_eq!(classify_conversion(Ty::Int, Ty::Bool), Conversion::Narrowing);
    assert_eq!(classify_conversion(Ty::Void, Ty::Int), Conversion::Forbidden);
    assert_eq!(classify_conversion(Ty::Int, Ty::Void), Conversion::Forbidden);
}

#[test]
fn test_arithmetic_requires_matching_operands() {
    let rule = resolve_binary(BinaryOp::Add, Ty::Int, Ty::Int).unwrap();
    assert_eq!(rule.operand, Ty::Int);
    assert_eq!(rule.result, Ty::Int);

    let rule = resolve_binary(BinaryOp::Mul, Ty::Float, Ty::Float).unwrap();
    assert_eq!(rule.operand, Ty::Float);
    assert_eq!(rule.result, Ty::Float);

    // Direct int/float mixing is an error, not a promotion.
    assert_eq!(
        resolve_binary(BinaryOp::Add, Ty::Int, Ty::Float),
        Err(BinaryTypeError::MixedOperands)
    );
    assert_eq!(
        resolve_binary(BinaryOp::Div, Ty::Float, Ty::Int),
        Err(BinaryTypeError::MixedOperands)
    );
}

#[test]
fn test_arithmetic_rejects_bool() {
    assert_eq!(
        resolve_binary(BinaryOp::Add, Ty::Bool, Ty::Int),
        Err(BinaryTypeError::BoolOperand)
    );
    assert_eq!(
        resolve_binary(BinaryOp::Sub, Ty::Int, Ty::Bool),
        Err(BinaryTypeError::BoolOperand)
    );
    assert_eq!(
        resolve_binary(BinaryOp::Mul, Ty::Bool, Ty::Bool),
        Err(BinaryTypeError::BoolOperand)
    );
}

#[test]
fn test_comparison_promotes_mixed_operands() {
    let rule = resolve_binary(BinaryOp::Less, Ty::Int, Ty::Float).unwrap();
    assert_eq!(rule.operand, Ty::Float);
    assert_eq!(rule.result, Ty::Bool);

    let rule = resolve_binary(BinaryOp::GreaterEquals, Ty::Float, Ty::Int).unwrap();
    assert_eq!(rule.operand, Ty::Float);
    assert_eq!(rule.result, Ty::Bool);

    let rule = resolve_binary(BinaryOp::Greater, Ty::Int, Ty::Int).unwrap();
    assert_eq!(rule.operand, Ty::Int);
    assert_eq!(rule.result, Ty::Bool);
}

#[test]
fn test_comparison_rejects_bool() {
    assert_eq!(
        resolve_binary(BinaryOp::Less, Ty::Bool, Ty::Int),
        Err(BinaryTypeError::BoolOperand)
    );
    assert_eq!(
        resolve_binary(BinaryOp::Greater, Ty::Bool, Ty::Bool),
        Err(BinaryTypeError::BoolOperand)
    );
}

#[test]
fn test_equality_widens_bool() {
    let rule = resolve_binary(BinaryOp::Equals, Ty::Bool, Ty::Int).unwrap();
    assert_eq!(rule.operand, Ty::Int);
    assert_eq!(rule.result, Ty::Bool);

    let rule = resolve_binary(BinaryOp::NotEquals, Ty::Float, Ty::Bool).unwrap();
    assert_eq!(rule.operand, Ty::Float);
    assert_eq!(rule.result, Ty::Bool);

    let rule = resolve_binary(BinaryOp::Equals, Ty::Bool, Ty::Bool).unwrap();
    assert_eq!(rule.operand, Ty::Bool);

    let rule = resolve_binary(BinaryOp::Equals, Ty::Int, Ty::Float).unwrap();
    assert_eq!(rule.operand, Ty::Float);
}

#[test]
fn test_rem_requires_int_operands() {
    let rule = resolve_binary(BinaryOp::Rem, Ty::Int, Ty::Int).unwrap();
    assert_eq!(rule.operand, Ty::Int);
    assert_eq!(rule.result, Ty::Int);

    // A bool operand widens to int first.
    let rule = resolve_binary(BinaryOp::Rem, Ty::Bool, Ty::Int).unwrap();
    assert_eq!(rule.operand, Ty::Int);

    assert_eq!(
        resolve_binary(BinaryOp::Rem, Ty::Float, Ty::Int),
        Err(BinaryTypeError::RemRequiresInt)
    );
    assert_eq!(
        resolve_binary(BinaryOp::Rem, Ty::Int, Ty::Float),
        Err(BinaryTypeError::RemRequiresInt)
    );
}

#[test]
fn test_logical_operators_accept_any_value_type() {
    for left in [Ty::Bool, Ty::Int, Ty::Float] {
        for right in [Ty::Bool, Ty::Int, Ty::Float] {
            let rule = resolve_binary(BinaryOp::And, left, right).unwrap();
            assert_eq!(rule.operand, Ty::Bool);
            assert_eq!(rule.result, Ty::Bool);
        }
    }

    assert_eq!(
        resolve_binary(BinaryOp::Or, Ty::Void, Ty::Bool),
        Err(BinaryTypeError::VoidOperand)
    );
}

#[test]
fn test_void_operands_always_rejected() {
    for op in [BinaryOp::Add, BinaryOp::Equals, BinaryOp::Less, BinaryOp::Rem] {
        assert_eq!(
            resolve_binary(op, Ty::Void, Ty::Int),
            Err(BinaryTypeError::VoidOperand)
        );
        assert_eq!(
            resolve_binary(op, Ty::Int, Ty::Void),
            Err(BinaryTypeError::VoidOperand)
        );
    }
}

#[test]
fn test_unary_resolution() {
    assert_eq!(resolve_unary(UnaryOp::Neg, Ty::Int), Ok(Ty::Int));
    assert_eq!(resolve_unary(UnaryOp::Neg, Ty::Float), Ok(Ty::Float));
    assert_eq!(
        resolve_unary(UnaryOp::Neg, Ty::Bool),
        Err(UnaryTypeError::BoolOperand)
    );
    assert_eq!(
        resolve_unary(UnaryOp::Neg, Ty::Void),
        Err(UnaryTypeError::VoidOperand)
    );

    assert_eq!(resolve_unary(UnaryOp::Not, Ty::Bool), Ok(Ty::Bool));
    assert_eq!(resolve_unary(UnaryOp::Not, Ty::Int), Ok(Ty::Bool));
    assert_eq!(resolve_unary(UnaryOp::Not, Ty::Float), Ok(Ty::Bool));
    assert_eq!(
        resolve_unary(UnaryOp::Not, Ty::Void),
        Err(UnaryTypeError::VoidOperand)
    );
}

#[test]
fn test_type_desc_display() {
    assert_eq!(TypeDesc::Scalar(Ty::Int).to_string(), "int");
    assert_eq!(
        TypeDesc::Array {
            elem: Ty::Float,
            dims: vec![4, 2]
        }
        .to_string(),
        "float[4][2]"
    );
    assert_eq!(
        TypeDesc::ArrayParam {
            elem: Ty::Int,
            inner_dims: vec![3]
        }
        .to_string(),
        "int[][3]"
    );
}

#[test]
fn test_type_desc_dim_count() {
    assert_eq!(TypeDesc::Scalar(Ty::Int).dim_count(), 0);
    assert_eq!(
        TypeDesc::Array {
            elem: Ty::Int,
            dims: vec![5, 3, 2]
        }
        .dim_count(),
        3
    );
    assert_eq!(
        TypeDesc::ArrayParam {
            elem: Ty::Int,
            inner_dims: vec![3]
        }
        .dim_count(),
        2
    );
}

#[test]
fn test_is_const_zero() {
    let zero = Expr::IntLiteral {
        value: 0,
        span: Span::null(),
    };
    let one = Expr::IntLiteral {
        value: 1,
        span: Span::null(),
    };
    let float_zero = Expr::FloatLiteral {
        value: 0.0,
        span: Span::null(),
    };
    let negated_zero = Expr::Unary {
        op: UnaryOp::Neg,
        operand: Box::new(Expr::IntLiteral {
            value: 0,
            span: Span::null(),
        }),
        span: Span::null(),
    };
    let variable = Expr::Variable {
        name: String::from("x"),
        span: Span::null(),
    };

    assert!(is_const_zero(&zero));
    assert!(is_const_zero(&float_zero));
    assert!(is_const_zero(&negated_zero));
    assert!(!is_const_zero(&one));
    // A runtime zero in a variable is not the front end's problem.
    assert!(!is_const_zero(&variable));
}
