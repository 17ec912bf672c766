use inkwell::{
    values::{BasicMetadataValueEnum, BasicValueEnum, IntValue, PointerValue},
    FloatPredicate, IntPredicate,
};

use crate::{
    ast::expr::{BinaryOp, Expr, UnaryOp},
    diagnostics::diagnostics::{suggest, DiagMessage, DiagnosticKind},
    sema::analyzer::Analyzer,
    types::types::{is_const_zero, resolve_binary, resolve_unary},
    types::types::{BinaryTypeError, Ty, TypeDesc, UnaryTypeError},
    Span,
};

/// Emits IR for `expression` and returns the value with its semantic
/// type. `None` means a diagnostic was reported somewhere below and
/// the enclosing statement should give up quietly.
pub fn gen_expression<'ctx>(
    analyzer: &mut Analyzer<'ctx, '_>,
    expression: &Expr,
) -> Option<(BasicValueEnum<'ctx>, Ty)> {
    match expression {
        Expr::IntLiteral { value, .. } => Some((
            analyzer
                .context
                .i32_type()
                .const_int(*value as u64, false)
                .into(),
            Ty::Int,
        )),
        // Literals are parsed at full precision and narrowed here.
        Expr::FloatLiteral { value, .. } => Some((
            analyzer.context.f32_type().const_float(*value).into(),
            Ty::Float,
        )),
        Expr::BoolLiteral { value, .. } => Some((
            analyzer
                .context
                .bool_type()
                .const_int(*value as u64, false)
                .into(),
            Ty::Bool,
        )),
        Expr::Variable { name, span } => gen_variable(analyzer, name, *span),
        Expr::ArrayAccess {
            name,
            subscripts,
            span,
        } => {
            let (pointer, elem_ty) = element_pointer(analyzer, name, subscripts, *span)?;
            let value = analyzer.builder.build_load(pointer, name).unwrap();
            Some((value, elem_ty))
        }
        Expr::Unary { op, operand, span } => gen_unary(analyzer, *op, operand, *span),
        Expr::Binary {
            op,
            left,
            right,
            span,
        } => gen_binary(analyzer, *op, left, right, *span),
        Expr::Call {
            callee,
            arguments,
            span,
        } => match gen_call(analyzer, callee, arguments, *span)? {
            (Some(value), ty) if ty != Ty::Void => Some((value, ty)),
            _ => {
                analyzer
                    .diagnostics
                    .error(DiagnosticKind::Type, DiagMessage::VoidValue, *span);
                None
            }
        },
        Expr::Assign { span, .. } | Expr::ArrayAssign { span, .. } => {
            analyzer.diagnostics.error(
                DiagnosticKind::Other,
                DiagMessage::Internal {
                    message: String::from("assignment parsed in operand position"),
                },
                *span,
            );
            None
        }
    }
}

fn gen_variable<'ctx>(
    analyzer: &mut Analyzer<'ctx, '_>,
    name: &str,
    span: Span,
) -> Option<(BasicValueEnum<'ctx>, Ty)> {
    let (slot, desc) = match analyzer.symbols.lookup(name) {
        Some(symbol) => (symbol.slot, symbol.desc.clone()),
        None => {
            report_unknown_variable(analyzer, name, span);
            return None;
        }
    };

    match desc {
        TypeDesc::Scalar(ty) => {
            let pointer = analyzer.slots[slot];
            let value = analyzer.builder.build_load(pointer, name).unwrap();
            Some((value, ty))
        }
        _ => {
            analyzer.diagnostics.error(
                DiagnosticKind::Type,
                DiagMessage::ArrayAsValue {
                    name: String::from(name),
                },
                span,
            );
            None
        }
    }
}

fn gen_unary<'ctx>(
    analyzer: &mut Analyzer<'ctx, '_>,
    op: UnaryOp,
    operand: &Expr,
    span: Span,
) -> Option<(BasicValueEnum<'ctx>, Ty)> {
    let (value, ty) = gen_expression(analyzer, operand)?;

    let result_ty = match resolve_unary(op, ty) {
        Ok(result_ty) => result_ty,
        Err(error) => {
            let message = match error {
                UnaryTypeError::BoolOperand => DiagMessage::BoolOperand {
                    operator: op.to_string(),
                },
                UnaryTypeError::VoidOperand => DiagMessage::VoidValue,
            };
            analyzer.diagnostics.error(DiagnosticKind::Type, message, span);
            return None;
        }
    };

    let value: BasicValueEnum<'ctx> = match op {
        UnaryOp::Neg => {
            if ty == Ty::Float {
                analyzer
                    .builder
                    .build_float_neg(value.into_float_value(), "")
                    .unwrap()
                    .into()
            } else {
                analyzer
                    .builder
                    .build_int_neg(value.into_int_value(), "")
                    .unwrap()
                    .into()
            }
        }
        UnaryOp::Not => {
            let truth = analyzer.truthy(value, ty);
            analyzer.builder.build_not(truth, "").unwrap().into()
        }
    };

    Some((value, result_ty))
}

fn gen_binary<'ctx>(
    analyzer: &mut Analyzer<'ctx, '_>,
    op: BinaryOp,
    left: &Expr,
    right: &Expr,
    span: Span,
) -> Option<(BasicValueEnum<'ctx>, Ty)> {
    if matches!(op, BinaryOp::Div | BinaryOp::Rem) && is_const_zero(right) {
        analyzer.diagnostics.error(
            DiagnosticKind::Type,
            DiagMessage::DivisionByConstantZero {
                operator: op.to_string(),
            },
            span,
        );
        return None;
    }

    let (left_value, left_ty) = gen_expression(analyzer, left)?;
    let (right_value, right_ty) = gen_expression(analyzer, right)?;

    let rule = match resolve_binary(op, left_ty, right_ty) {
        Ok(rule) => rule,
        Err(error) => {
            let message = match error {
                BinaryTypeError::BoolOperand => DiagMessage::BoolOperand {
                    operator: op.to_string(),
                },
                BinaryTypeError::MixedOperands => DiagMessage::MixedOperands {
                    operator: op.to_string(),
                },
                BinaryTypeError::RemRequiresInt => DiagMessage::RemRequiresInt {
                    left: left_ty.to_string(),
                    right: right_ty.to_string(),
                },
                BinaryTypeError::VoidOperand => DiagMessage::VoidValue,
            };
            analyzer.diagnostics.error(DiagnosticKind::Type, message, span);
            return None;
        }
    };

    // Logical operators narrow through truthiness instead of widening,
    // and both sides are always evaluated.
    if matches!(op, BinaryOp::And | BinaryOp::Or) {
        let lhs = analyzer.truthy(left_value, left_ty);
        let rhs = analyzer.truthy(right_value, right_ty);
        let value = match op {
            BinaryOp::And => analyzer.builder.build_and(lhs, rhs, "").unwrap(),
            _ => analyzer.builder.build_or(lhs, rhs, "").unwrap(),
        };
        return Some((value.into(), Ty::Bool));
    }

    let lhs = analyzer.widen_value(left_value, left_ty, rule.operand);
    let rhs = analyzer.widen_value(right_value, right_ty, rule.operand);

    let value: BasicValueEnum<'ctx> = match op {
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => {
            if rule.operand == Ty::Float {
                let lhs = lhs.into_float_value();
                let rhs = rhs.into_float_value();
                match op {
                    BinaryOp::Add => analyzer.builder.build_float_add(lhs, rhs, ""),
                    BinaryOp::Sub => analyzer.builder.build_float_sub(lhs, rhs, ""),
                    BinaryOp::Mul => analyzer.builder.build_float_mul(lhs, rhs, ""),
                    _ => analyzer.builder.build_float_div(lhs, rhs, ""),
                }
                .unwrap()
                .into()
            } else {
                let lhs = lhs.into_int_value();
                let rhs = rhs.into_int_value();
                match op {
                    BinaryOp::Add => analyzer.builder.build_int_add(lhs, rhs, ""),
                    BinaryOp::Sub => analyzer.builder.build_int_sub(lhs, rhs, ""),
                    BinaryOp::Mul => analyzer.builder.build_int_mul(lhs, rhs, ""),
                    _ => analyzer.builder.build_int_signed_div(lhs, rhs, ""),
                }
                .unwrap()
                .into()
            }
        }
        BinaryOp::Rem => analyzer
            .builder
            .build_int_signed_rem(lhs.into_int_value(), rhs.into_int_value(), "")
            .unwrap()
            .into(),
        BinaryOp::Less
        | BinaryOp::LessEquals
        | BinaryOp::Greater
        | BinaryOp::GreaterEquals
        | BinaryOp::Equals
        | BinaryOp::NotEquals => {
            if rule.operand == Ty::Float {
                analyzer
                    .builder
                    .build_float_compare(
                        float_predicate(op),
                        lhs.into_float_value(),
                        rhs.into_float_value(),
                        "",
                    )
                    .unwrap()
                    .into()
            } else {
                analyzer
                    .builder
                    .build_int_compare(
                        int_predicate(op),
                        lhs.into_int_value(),
                        rhs.into_int_value(),
                        "",
                    )
                    .unwrap()
                    .into()
            }
        }
        BinaryOp::And | BinaryOp::Or => unreachable!(),
    };

    Some((value, rule.result))
}

/// `name = value`. The target must be a declared scalar and the value
/// must convert without narrowing.
pub fn gen_assignment<'ctx>(
    analyzer: &mut Analyzer<'ctx, '_>,
    name: &str,
    value: &Expr,
    span: Span,
) -> Option<()> {
    let (slot, desc) = match analyzer.symbols.lookup(name) {
        Some(symbol) => (symbol.slot, symbol.desc.clone()),
        None => {
            report_unknown_variable(analyzer, name, span);
            return None;
        }
    };

    let target_ty = match desc {
        TypeDesc::Scalar(ty) => ty,
        _ => {
            analyzer.diagnostics.error(
                DiagnosticKind::Type,
                DiagMessage::AssignToArray {
                    name: String::from(name),
                },
                span,
            );
            return None;
        }
    };

    let (value_ir, value_ty) = gen_expression(analyzer, value)?;
    let converted = analyzer.coerce_value(value_ir, value_ty, target_ty, value.span())?;

    analyzer
        .builder
        .build_store(analyzer.slots[slot], converted)
        .unwrap();
    Some(())
}

pub fn gen_array_assignment<'ctx>(
    analyzer: &mut Analyzer<'ctx, '_>,
    name: &str,
    subscripts: &[Expr],
    value: &Expr,
    span: Span,
) -> Option<()> {
    let (pointer, elem_ty) = element_pointer(analyzer, name, subscripts, span)?;

    let (value_ir, value_ty) = gen_expression(analyzer, value)?;
    let converted = analyzer.coerce_value(value_ir, value_ty, elem_ty, value.span())?;

    analyzer.builder.build_store(pointer, converted).unwrap();
    Some(())
}

/// Emits a call. The returned type is the declared return type; the
/// value is absent for `void`.
pub fn gen_call<'ctx>(
    analyzer: &mut Analyzer<'ctx, '_>,
    callee: &str,
    arguments: &[Expr],
    span: Span,
) -> Option<(Option<BasicValueEnum<'ctx>>, Ty)> {
    let sig = match analyzer.symbols.lookup_function(callee) {
        Some(entry) => entry.sig.clone(),
        None => {
            report_unknown_function(analyzer, callee, span);
            return None;
        }
    };

    if arguments.len() != sig.params.len() {
        let message = if arguments.len() > sig.params.len() {
            DiagMessage::UnexpectedArguments {
                function: String::from(callee),
                expected: sig.params.len(),
                received: arguments.len(),
            }
        } else {
            DiagMessage::MissingArguments {
                function: String::from(callee),
                expected: sig.params.len(),
                received: arguments.len(),
            }
        };
        analyzer.diagnostics.error(DiagnosticKind::Type, message, span);
        return None;
    }

    let mut call_args: Vec<BasicMetadataValueEnum<'ctx>> = vec![];
    for (argument, param) in arguments.iter().zip(sig.params.iter()) {
        call_args.push(gen_argument(analyzer, callee, argument, param)?);
    }

    let function = analyzer
        .module
        .get_function(callee)
        .unwrap_or_else(|| panic!("function `{}` missing from module", callee));

    let result = analyzer
        .builder
        .build_call(function, &call_args, "")
        .unwrap()
        .try_as_basic_value()
        .left();

    Some((result, sig.return_ty))
}

fn gen_argument<'ctx>(
    analyzer: &mut Analyzer<'ctx, '_>,
    callee: &str,
    argument: &Expr,
    param: &TypeDesc,
) -> Option<BasicMetadataValueEnum<'ctx>> {
    // An array name in argument position decays to a pointer instead
    // of being read as a value.
    if let Expr::Variable { name, span } = argument {
        let symbol = analyzer
            .symbols
            .lookup(name)
            .map(|symbol| (symbol.slot, symbol.desc.clone()));
        if let Some((slot, desc)) = symbol {
            if desc.is_array() {
                return gen_array_argument(analyzer, callee, name, slot, &desc, param, *span);
            }
        }
    }

    match param {
        TypeDesc::Scalar(expected) => {
            let (value, ty) = gen_expression(analyzer, argument)?;
            if !ty.assignable_to(*expected) {
                analyzer.diagnostics.error(
                    DiagnosticKind::Type,
                    DiagMessage::ArgumentTypeMismatch {
                        function: String::from(callee),
                        expected: expected.to_string(),
                        received: ty.to_string(),
                    },
                    argument.span(),
                );
                return None;
            }
            Some(analyzer.widen_value(value, ty, *expected).into())
        }
        _ => {
            let (_, ty) = gen_expression(analyzer, argument)?;
            analyzer.diagnostics.error(
                DiagnosticKind::Type,
                DiagMessage::ArgumentTypeMismatch {
                    function: String::from(callee),
                    expected: param.to_string(),
                    received: ty.to_string(),
                },
                argument.span(),
            );
            None
        }
    }
}

/// Checks an array argument against an array parameter and produces
/// the decayed pointer. The element types must match exactly and the
/// dimensions after the first must agree.
fn gen_array_argument<'ctx>(
    analyzer: &mut Analyzer<'ctx, '_>,
    callee: &str,
    name: &str,
    slot: usize,
    desc: &TypeDesc,
    param: &TypeDesc,
    span: Span,
) -> Option<BasicMetadataValueEnum<'ctx>> {
    let compatible = match (desc, param) {
        (
            TypeDesc::Array { elem, dims },
            TypeDesc::ArrayParam {
                elem: expected,
                inner_dims,
            },
        ) => elem == expected && dims[1..] == inner_dims[..],
        (
            TypeDesc::ArrayParam { elem, inner_dims },
            TypeDesc::ArrayParam {
                elem: expected,
                inner_dims: expected_dims,
            },
        ) => elem == expected && inner_dims == expected_dims,
        _ => false,
    };

    if !compatible {
        analyzer.diagnostics.error(
            DiagnosticKind::Type,
            DiagMessage::ArgumentTypeMismatch {
                function: String::from(callee),
                expected: param.to_string(),
                received: desc.to_string(),
            },
            span,
        );
        return None;
    }

    let pointer = match desc {
        TypeDesc::Array { .. } => {
            let base = analyzer.slots[slot];
            let zero = analyzer.context.i32_type().const_zero();
            unsafe { analyzer.builder.build_gep(base, &[zero, zero], "").unwrap() }
        }
        _ => analyzer
            .builder
            .build_load(analyzer.slots[slot], name)
            .unwrap()
            .into_pointer_value(),
    };

    Some(pointer.into())
}

/// Resolves `name[..]` to the address of an element and its type.
/// Subscript counts are checked in full for declared arrays and
/// decayed parameters alike.
pub fn element_pointer<'ctx>(
    analyzer: &mut Analyzer<'ctx, '_>,
    name: &str,
    subscripts: &[Expr],
    span: Span,
) -> Option<(PointerValue<'ctx>, Ty)> {
    let (slot, desc) = match analyzer.symbols.lookup(name) {
        Some(symbol) => (symbol.slot, symbol.desc.clone()),
        None => {
            report_unknown_variable(analyzer, name, span);
            return None;
        }
    };

    if !desc.is_array() {
        analyzer.diagnostics.error(
            DiagnosticKind::Type,
            DiagMessage::NotAnArray {
                name: String::from(name),
            },
            span,
        );
        return None;
    }

    if subscripts.len() != desc.dim_count() {
        analyzer.diagnostics.error(
            DiagnosticKind::Type,
            DiagMessage::DimensionMismatch {
                name: String::from(name),
                expected: desc.dim_count(),
                received: subscripts.len(),
            },
            span,
        );
        return None;
    }

    let mut indices = vec![];
    for subscript in subscripts {
        indices.push(gen_subscript(analyzer, subscript)?);
    }

    // A declared array is addressed through the aggregate itself, so
    // the indices start with a zero step through the pointer. A
    // parameter's slot holds the decayed pointer; it is loaded and
    // indexed directly.
    let is_param = matches!(desc, TypeDesc::ArrayParam { .. });
    let base = if is_param {
        analyzer
            .builder
            .build_load(analyzer.slots[slot], name)
            .unwrap()
            .into_pointer_value()
    } else {
        analyzer.slots[slot]
    };

    let gep_indices = if is_param {
        indices
    } else {
        let mut with_step = vec![analyzer.context.i32_type().const_zero()];
        with_step.extend(indices);
        with_step
    };

    let pointer = unsafe { analyzer.builder.build_gep(base, &gep_indices, "").unwrap() };
    Some((pointer, desc.elem_ty()))
}

fn gen_subscript<'ctx>(
    analyzer: &mut Analyzer<'ctx, '_>,
    subscript: &Expr,
) -> Option<IntValue<'ctx>> {
    let (value, ty) = gen_expression(analyzer, subscript)?;

    match ty {
        Ty::Int => Some(value.into_int_value()),
        Ty::Bool => Some(
            analyzer
                .builder
                .build_int_z_extend(value.into_int_value(), analyzer.context.i32_type(), "")
                .unwrap(),
        ),
        _ => {
            analyzer.diagnostics.error(
                DiagnosticKind::Type,
                DiagMessage::SubscriptNotInt {
                    found: ty.to_string(),
                },
                subscript.span(),
            );
            None
        }
    }
}

fn report_unknown_variable(analyzer: &mut Analyzer<'_, '_>, name: &str, span: Span) {
    if analyzer.symbols.is_function(name) {
        analyzer.diagnostics.error(
            DiagnosticKind::Scope,
            DiagMessage::FunctionAsVariable {
                name: String::from(name),
            },
            span,
        );
        return;
    }

    let message = DiagMessage::NotDeclared {
        name: String::from(name),
    };
    let names = analyzer.symbols.visible_names();
    match suggest(name, names.iter().map(|candidate| candidate.as_str())) {
        Some(candidate) => analyzer.diagnostics.error_with_context(
            DiagnosticKind::Scope,
            message,
            span,
            format!("did you mean `{candidate}`?"),
        ),
        None => analyzer.diagnostics.error(DiagnosticKind::Scope, message, span),
    }
}

fn report_unknown_function(analyzer: &mut Analyzer<'_, '_>, callee: &str, span: Span) {
    if analyzer.symbols.lookup(callee).is_some() {
        analyzer.diagnostics.error(
            DiagnosticKind::Type,
            DiagMessage::NotAFunction {
                name: String::from(callee),
            },
            span,
        );
        return;
    }

    let message = DiagMessage::FunctionNotDeclared {
        name: String::from(callee),
    };
    let names = analyzer.symbols.function_names();
    match suggest(callee, names.iter().map(|candidate| candidate.as_str())) {
        Some(candidate) => analyzer.diagnostics.error_with_context(
            DiagnosticKind::Scope,
            message,
            span,
            format!("did you mean `{candidate}`?"),
        ),
        None => analyzer.diagnostics.error(DiagnosticKind::Scope, message, span),
    }
}

fn int_predicate(op: BinaryOp) -> IntPredicate {
    match op {
        BinaryOp::Less => IntPredicate::SLT,
        BinaryOp::LessEquals => IntPredicate::SLE,
        BinaryOp::Greater => IntPredicate::SGT,
        BinaryOp::GreaterEquals => IntPredicate::SGE,
        BinaryOp::Equals => IntPredicate::EQ,
        _ => IntPredicate::NE,
    }
}

fn float_predicate(op: BinaryOp) -> FloatPredicate {
    match op {
        BinaryOp::Less => FloatPredicate::OLT,
        BinaryOp::LessEquals => FloatPredicate::OLE,
        BinaryOp::Greater => FloatPredicate::OGT,
        BinaryOp::GreaterEquals => FloatPredicate::OGE,
        BinaryOp::Equals => FloatPredicate::OEQ,
        _ => FloatPredicate::ONE,
    }
}
