//! Integration tests for end-to-end compilation.
//!
//! These tests drive the complete pipeline from source text through
//! tokenization, parsing and semantic analysis to the printed LLVM
//! module, covering both accepted programs and the diagnostic batch
//! that broken programs produce.

use inkwell::context::Context;
use minicc::{
    diagnostics::diagnostics::{DiagMessage, DiagnosticKind, Diagnostics},
    lexer::lexer::tokenize,
    parser::parser::parse,
    sema::analyzer::analyze,
};

/// Runs the whole pipeline and returns the printed module alongside
/// whatever diagnostics accumulated. Analysis always runs, so error
/// tests can still look at the partially built module.
fn compile(source: &str) -> (String, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let tokens = tokenize(source, &mut diagnostics);
    let program = parse(tokens, &mut diagnostics);

    let context = Context::create();
    let module = analyze(&program, &context, "test", &mut diagnostics);
    let ir = module.print_to_string().to_str().unwrap().to_string();

    (ir, diagnostics)
}

fn first_message(diagnostics: &Diagnostics) -> DiagMessage {
    diagnostics
        .iter()
        .next()
        .expect("expected at least one diagnostic")
        .message
        .clone()
}

#[test]
fn test_compile_add_program() {
    let source = "
        int add(int a, int b) {
            return a + b;
        }

        int main() {
            return add(2, 3);
        }
    ";
    let (ir, diagnostics) = compile(source);
    assert!(diagnostics.is_empty(), "compilation should succeed");
    assert!(ir.contains("define i32 @add(i32"));
    assert!(ir.contains("call i32 @add(i32 2, i32 3)"));
}

#[test]
fn test_bool_widens_through_int_assignment() {
    let source = "
        int main() {
            bool b;
            int x;
            b = true;
            x = b;
            return x;
        }
    ";
    let (ir, diagnostics) = compile(source);
    assert!(diagnostics.is_empty(), "compilation should succeed");
    assert!(ir.contains("zext i1"));
}

#[test]
fn test_int_widens_to_float_assignment() {
    let source = "
        int main() {
            float f;
            int x;
            x = 3;
            f = x;
            return 0;
        }
    ";
    let (ir, diagnostics) = compile(source);
    assert!(diagnostics.is_empty(), "compilation should succeed");
    assert!(ir.contains("sitofp i32"));
}

#[test]
fn test_float_to_int_assignment_rejected() {
    let source = "
        int main() {
            float f;
            int x;
            f = 3.5;
            x = f;
            return 0;
        }
    ";
    let (_, diagnostics) = compile(source);
    assert_eq!(diagnostics.count_of(DiagnosticKind::Type), 1);
    assert_eq!(
        first_message(&diagnostics),
        DiagMessage::TypeMismatch {
            expected: String::from("int"),
            received: String::from("float"),
        }
    );
}

#[test]
fn test_matrix_element_round_trip() {
    let source = "
        int main() {
            int a[3][2];
            a[1][1] = 7;
            return a[1][1];
        }
    ";
    let (ir, diagnostics) = compile(source);
    assert!(diagnostics.is_empty(), "compilation should succeed");
    assert!(ir.contains("alloca [3 x [2 x i32]]"));
    assert!(ir.contains("getelementptr [3 x [2 x i32]]"));
}

#[test]
fn test_subscript_count_mismatch_rejected() {
    let source = "
        int main() {
            int a[3][2];
            a[1][1] = 7;
            return a[1][1][0];
        }
    ";
    let (_, diagnostics) = compile(source);
    assert_eq!(diagnostics.count_of(DiagnosticKind::Type), 1);
    assert_eq!(
        first_message(&diagnostics),
        DiagMessage::DimensionMismatch {
            name: String::from("a"),
            expected: 2,
            received: 3,
        }
    );
}

#[test]
fn test_constant_condition_branches() {
    let source = "
        int main() {
            if (1) {
                return 1;
            } else {
                return 0;
            }
        }
    ";
    let (ir, diagnostics) = compile(source);
    assert!(diagnostics.is_empty(), "compilation should succeed");
    assert!(ir.contains("then:"));
    assert!(ir.contains("else:"));
}

#[test]
fn test_duplicate_in_same_block_rejected() {
    let source = "
        int main() {
            int x;
            int x;
            return 0;
        }
    ";
    let (_, diagnostics) = compile(source);
    assert_eq!(diagnostics.count_of(DiagnosticKind::Scope), 1);
}

#[test]
fn test_shadowing_in_inner_block_accepted() {
    let source = "
        int main() {
            int x;
            {
                int x;
            }
            return 0;
        }
    ";
    let (_, diagnostics) = compile(source);
    assert!(diagnostics.is_empty(), "inner blocks open a fresh scope");
}

#[test]
fn test_missing_main_reported() {
    let source = "
        int tick() {
            return 1;
        }
    ";
    let (_, diagnostics) = compile(source);
    assert_eq!(diagnostics.count_of(DiagnosticKind::Scope), 1);
    assert_eq!(first_message(&diagnostics), DiagMessage::MissingMain);
}

#[test]
fn test_empty_source_still_reports_missing_main() {
    let (_, diagnostics) = compile("");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(first_message(&diagnostics), DiagMessage::MissingMain);
}

#[test]
fn test_prototype_and_extern_resolve_calls() {
    let source = "
        extern int getchar();
        int twice(int x);

        int main() {
            int c;
            c = getchar();
            return twice(c);
        }

        int twice(int x) {
            return x + x;
        }
    ";
    let (ir, diagnostics) = compile(source);
    assert!(diagnostics.is_empty(), "compilation should succeed");
    assert!(ir.contains("declare i32 @getchar()"));
    assert!(ir.contains("define i32 @twice(i32"));
    assert!(ir.contains("call i32 @twice(i32"));
}

#[test]
fn test_full_program_compiles() {
    let source = "
        int limit;
        float history[8];

        int fib(int n) {
            if (n < 2) {
                return n;
            }
            return fib(n - 1) + fib(n - 2);
        }

        float average(int values[], int count) {
            int i;
            int total;
            i = 0;
            total = 0;
            while (i < count) {
                total = total + values[i];
                i = i + 1;
            }
            return total / count;
        }

        int main() {
            int data[6];
            int i;
            i = 0;
            while (i < 6) {
                data[i] = fib(i);
                history[i] = average(data, i + 1);
                i = i + 1;
            }
            limit = 4;
            if (history[5] < limit && !(limit == 0)) {
                return 0;
            }
            return 1;
        }
    ";
    let (ir, diagnostics) = compile(source);
    assert!(diagnostics.is_empty(), "compilation should succeed");
    assert!(ir.contains("@limit = global i32 0"));
    assert!(ir.contains("@history = global [8 x float] zeroinitializer"));
    assert!(ir.contains("define i32 @fib(i32"));
    assert!(ir.contains("define float @average(i32*"));
    assert!(ir.contains("call i32 @fib(i32"));
    assert!(ir.contains("sitofp i32"));
    assert!(ir.contains(" and i1"));
}

#[test]
fn test_lexical_error_does_not_stop_analysis() {
    let source = "
        int main() {
            int @x;
            return x;
        }
    ";
    let (ir, diagnostics) = compile(source);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics.count_of(DiagnosticKind::Lexical), 1);
    assert!(
        ir.contains("define i32 @main()"),
        "later phases should still run"
    );
}

#[test]
fn test_syntax_recovery_continues_with_later_declarations() {
    let source = "
        int f( {
            return 1;
        }

        int g() {
            return 2;
        }

        int main() {
            return g();
        }
    ";
    let (ir, diagnostics) = compile(source);
    assert_eq!(diagnostics.count_of(DiagnosticKind::Syntax), 1);
    assert!(ir.contains("define i32 @g()"));
    assert!(ir.contains("define i32 @main()"));
    assert!(!ir.contains("@f"));
}

#[test]
fn test_widening_is_composable() {
    let source = "
        float direct(bool flag) {
            return flag;
        }

        float stepped(bool flag) {
            int i;
            float f;
            i = flag;
            f = i;
            return f;
        }

        int main() {
            float a;
            float b;
            a = direct(true);
            b = stepped(false);
            return a == b;
        }
    ";
    let (ir, diagnostics) = compile(source);
    assert!(diagnostics.is_empty(), "both widening paths are legal");
    assert!(ir.contains("uitofp i1"));
    assert!(ir.contains("zext i1"));
    assert!(ir.contains("sitofp i32"));
}

#[test]
fn test_render_groups_diagnostics_by_kind() {
    let source = "int main() {\n    int x;\n    y = 2;\n    x = 1.5;\n    return 0;\n}\n";
    let (_, diagnostics) = compile(source);
    assert_eq!(diagnostics.count_of(DiagnosticKind::Type), 1);
    assert_eq!(diagnostics.count_of(DiagnosticKind::Scope), 1);

    let rendered = diagnostics.render("test.mc", source);
    assert!(rendered.contains("Type error: types do not match: expected `int`, received `float`"));
    assert!(
        rendered.contains("Scope error: variable `y` has not been declared (did you mean `x`?)")
    );
    assert!(rendered.contains("-> test.mc:4:"));
    assert!(rendered.contains("-> test.mc:3:"));
    assert!(rendered.contains("^"));

    // The scope error comes first in the source but the batch is
    // grouped by kind, with type errors ahead of scope errors.
    let type_at = rendered.find("Type error:").unwrap();
    let scope_at = rendered.find("Scope error:").unwrap();
    assert!(type_at < scope_at);
}
