use crate::{
    ast::expr::Expr,
    ast::stmt::{ArrayDecl, Block, LocalDecl, Stmt, VarDecl},
    diagnostics::diagnostics::{DiagMessage, DiagnosticKind},
    sema::analyzer::Analyzer,
    sema::expr::{gen_array_assignment, gen_assignment, gen_call, gen_expression},
    symbols::table::{StorageClass, SymbolEntry},
    types::types::{Ty, TypeDesc},
    Span,
};

/// Analyzes a block in a fresh scope frame. The frame is popped on
/// every path out, including ones where statements failed.
pub fn gen_block(analyzer: &mut Analyzer<'_, '_>, block: &Block) {
    analyzer.symbols.push_frame();

    for declaration in &block.declarations {
        match declaration {
            LocalDecl::Var(decl) => declare_local_scalar(analyzer, decl),
            LocalDecl::Array(decl) => declare_local_array(analyzer, decl),
        }
    }

    for statement in &block.statements {
        gen_statement(analyzer, statement);
    }

    analyzer.symbols.pop_frame();
}

pub fn gen_statement(analyzer: &mut Analyzer<'_, '_>, statement: &Stmt) {
    analyzer.ensure_open_block();

    match statement {
        Stmt::Block(block) => gen_block(analyzer, block),
        Stmt::If {
            condition,
            then_body,
            else_body,
            ..
        } => gen_if(analyzer, condition, then_body, else_body.as_ref()),
        Stmt::While {
            condition, body, ..
        } => gen_while(analyzer, condition, body),
        Stmt::Return { value, span } => gen_return(analyzer, value.as_ref(), *span),
        Stmt::Expression { expression, .. } => gen_expression_statement(analyzer, expression),
    }
}

fn declare_local_scalar(analyzer: &mut Analyzer<'_, '_>, decl: &VarDecl) {
    if decl.ty == Ty::Void {
        analyzer.diagnostics.error(
            DiagnosticKind::Type,
            DiagMessage::VoidDeclaration {
                name: decl.name.clone(),
            },
            decl.span,
        );
        return;
    }

    let function = analyzer.current_function();
    let ty = analyzer.convert_type(decl.ty);
    let alloca = analyzer.create_entry_alloca(function, ty, &decl.name);

    let slot = analyzer.slots.len();
    let entry = SymbolEntry {
        name: decl.name.clone(),
        desc: TypeDesc::Scalar(decl.ty),
        storage: StorageClass::Local,
        declared_at: decl.span,
        slot,
    };

    match analyzer.symbols.declare_local(entry) {
        Ok(()) => analyzer.slots.push(alloca),
        Err(error) => analyzer.report_scope_error(error, decl.span),
    }
}

fn declare_local_array(analyzer: &mut Analyzer<'_, '_>, decl: &ArrayDecl) {
    if decl.ty == Ty::Void {
        analyzer.diagnostics.error(
            DiagnosticKind::Type,
            DiagMessage::VoidDeclaration {
                name: decl.name.clone(),
            },
            decl.span,
        );
        return;
    }

    let function = analyzer.current_function();
    let ty = analyzer.array_type(decl.ty, &decl.dims);
    let alloca = analyzer.create_entry_alloca(function, ty.into(), &decl.name);

    let slot = analyzer.slots.len();
    let entry = SymbolEntry {
        name: decl.name.clone(),
        desc: TypeDesc::Array {
            elem: decl.ty,
            dims: decl.dims.clone(),
        },
        storage: StorageClass::Local,
        declared_at: decl.span,
        slot,
    };

    match analyzer.symbols.declare_local(entry) {
        Ok(()) => analyzer.slots.push(alloca),
        Err(error) => analyzer.report_scope_error(error, decl.span),
    }
}

/// Assignments only exist in statement position, and a call in
/// statement position is the one place a `void` function can be used.
fn gen_expression_statement(analyzer: &mut Analyzer<'_, '_>, expression: &Expr) {
    match expression {
        Expr::Assign { name, value, .. } => {
            let _ = gen_assignment(analyzer, name, value, expression.span());
        }
        Expr::ArrayAssign {
            name,
            subscripts,
            value,
            ..
        } => {
            let _ = gen_array_assignment(analyzer, name, subscripts, value, expression.span());
        }
        Expr::Call {
            callee, arguments, ..
        } => {
            let _ = gen_call(analyzer, callee, arguments, expression.span());
        }
        other => {
            let _ = gen_expression(analyzer, other);
        }
    }
}

fn gen_if(
    analyzer: &mut Analyzer<'_, '_>,
    condition: &Expr,
    then_body: &Block,
    else_body: Option<&Block>,
) {
    let Some((value, ty)) = gen_expression(analyzer, condition) else {
        return;
    };
    let condition_value = analyzer.truthy(value, ty);

    let function = analyzer.current_function();
    let then_block = analyzer.context.append_basic_block(function, "then");
    let else_block = else_body.map(|_| analyzer.context.append_basic_block(function, "else"));
    let end_block = analyzer.context.append_basic_block(function, "end");

    analyzer
        .builder
        .build_conditional_branch(condition_value, then_block, else_block.unwrap_or(end_block))
        .unwrap();

    analyzer.builder.position_at_end(then_block);
    gen_block(analyzer, then_body);
    if analyzer.block_is_open() {
        analyzer
            .builder
            .build_unconditional_branch(end_block)
            .unwrap();
    }

    if let (Some(else_block), Some(else_body)) = (else_block, else_body) {
        analyzer.builder.position_at_end(else_block);
        gen_block(analyzer, else_body);
        if analyzer.block_is_open() {
            analyzer
                .builder
                .build_unconditional_branch(end_block)
                .unwrap();
        }
    }

    analyzer.builder.position_at_end(end_block);
}

fn gen_while(analyzer: &mut Analyzer<'_, '_>, condition: &Expr, body: &Stmt) {
    let function = analyzer.current_function();
    let condition_block = analyzer.context.append_basic_block(function, "cond");
    let body_block = analyzer.context.append_basic_block(function, "body");
    let end_block = analyzer.context.append_basic_block(function, "end");

    analyzer
        .builder
        .build_unconditional_branch(condition_block)
        .unwrap();

    // The condition lives in its own block; every iteration branches
    // back here to re-evaluate it.
    analyzer.builder.position_at_end(condition_block);
    let Some((value, ty)) = gen_expression(analyzer, condition) else {
        analyzer.builder.position_at_end(end_block);
        return;
    };
    let condition_value = analyzer.truthy(value, ty);
    analyzer
        .builder
        .build_conditional_branch(condition_value, body_block, end_block)
        .unwrap();

    analyzer.builder.position_at_end(body_block);
    gen_statement(analyzer, body);
    if analyzer.block_is_open() {
        analyzer
            .builder
            .build_unconditional_branch(condition_block)
            .unwrap();
    }

    analyzer.builder.position_at_end(end_block);
}

fn gen_return(analyzer: &mut Analyzer<'_, '_>, value: Option<&Expr>, span: Span) {
    let return_ty = analyzer
        .current_return
        .expect("return statement outside a function body");

    match value {
        None => {
            if return_ty != Ty::Void {
                analyzer.diagnostics.error(
                    DiagnosticKind::Type,
                    DiagMessage::MissingReturnValue {
                        expected: return_ty.to_string(),
                    },
                    span,
                );
                return;
            }
            analyzer.builder.build_return(None).unwrap();
        }
        Some(expression) => {
            if return_ty == Ty::Void {
                analyzer
                    .diagnostics
                    .error(DiagnosticKind::Type, DiagMessage::ReturnValueInVoid, span);
                return;
            }

            let Some((value, ty)) = gen_expression(analyzer, expression) else {
                return;
            };
            let Some(value) = analyzer.coerce_value(value, ty, return_ty, expression.span()) else {
                return;
            };
            analyzer.builder.build_return(Some(&value)).unwrap();
        }
    }
}
