use std::fmt::Display;

use thiserror::Error;

use crate::{get_source_line, remove_starting_whitespace, Span};

/// The phase a diagnostic belongs to. Batch output is grouped in the
/// order the variants are listed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    Lexical,
    Syntax,
    Type,
    Scope,
    Other,
}

impl Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DiagnosticKind::Lexical => "Lexical",
            DiagnosticKind::Syntax => "Syntax",
            DiagnosticKind::Type => "Type",
            DiagnosticKind::Scope => "Scope",
            DiagnosticKind::Other => "Other",
        };
        write!(f, "{}", name)
    }
}

const KIND_ORDER: [DiagnosticKind; 5] = [
    DiagnosticKind::Lexical,
    DiagnosticKind::Syntax,
    DiagnosticKind::Type,
    DiagnosticKind::Scope,
    DiagnosticKind::Other,
];

/// Every message the compiler can report.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiagMessage {
    // Lexical
    #[error("unrecognised character: `{character}`")]
    UnrecognisedCharacter { character: char },
    #[error("malformed literal: `{literal}`")]
    MalformedLiteral { literal: String },

    // Syntax
    #[error("unexpected token: `{found}`, expected {expected}")]
    UnexpectedToken { expected: String, found: String },
    #[error("empty statement: `;` on its own is not allowed")]
    EmptyStatement,
    #[error("an assignment cannot be used as a condition")]
    AssignmentAsCondition,
    #[error("arrays are limited to 3 dimensions")]
    TooManyDimensions,
    #[error("array dimension must be a positive integer, found `{value}`")]
    InvalidDimension { value: String },
    #[error("declarations must come before the first statement of a block")]
    DeclarationAfterStatement,
    #[error("an `extern` declaration cannot have a body")]
    ExternWithBody,

    // Type
    #[error("types do not match: expected `{expected}`, received `{received}`")]
    TypeMismatch { expected: String, received: String },
    #[error("operator `{operator}` does not accept `bool` operands")]
    BoolOperand { operator: String },
    #[error("operator `{operator}` cannot mix `int` and `float` operands")]
    MixedOperands { operator: String },
    #[error("operator `%` requires `int` operands, found `{left}` and `{right}`")]
    RemRequiresInt { left: String, right: String },
    #[error("right operand of `{operator}` is a constant zero")]
    DivisionByConstantZero { operator: String },
    #[error("a `void` value cannot be used here")]
    VoidValue,
    #[error("`return` without a value in a function returning `{expected}`")]
    MissingReturnValue { expected: String },
    #[error("`return` with a value in a `void` function")]
    ReturnValueInVoid,
    #[error("too many arguments to `{function}`: expected {expected}, received {received}")]
    UnexpectedArguments {
        function: String,
        expected: usize,
        received: usize,
    },
    #[error("too few arguments to `{function}`: expected {expected}, received {received}")]
    MissingArguments {
        function: String,
        expected: usize,
        received: usize,
    },
    #[error("argument to `{function}` does not match: expected `{expected}`, received `{received}`")]
    ArgumentTypeMismatch {
        function: String,
        expected: String,
        received: String,
    },
    #[error("array subscript must be an `int`, found `{found}`")]
    SubscriptNotInt { found: String },
    #[error("`{name}` has {expected} dimension(s) but {received} subscript(s) were given")]
    DimensionMismatch {
        name: String,
        expected: usize,
        received: usize,
    },
    #[error("`{name}` is not an array")]
    NotAnArray { name: String },
    #[error("array `{name}` cannot be used as a value")]
    ArrayAsValue { name: String },
    #[error("array `{name}` cannot be assigned as a whole")]
    AssignToArray { name: String },
    #[error("`{name}` cannot be declared `void`")]
    VoidDeclaration { name: String },
    #[error("declaration of `{function}` does not match its earlier declaration")]
    PrototypeMismatch { function: String },
    #[error("`{name}` is not a function")]
    NotAFunction { name: String },

    // Scope
    #[error("variable `{name}` has not been declared")]
    NotDeclared { name: String },
    #[error("function `{name}` has not been declared")]
    FunctionNotDeclared { name: String },
    #[error("`{name}` is already declared in this block")]
    DuplicateInBlock { name: String },
    #[error("parameter `{name}` is declared twice")]
    DuplicateParameter { name: String },
    #[error("`{name}` is already declared as a function")]
    CollidesWithFunction { name: String },
    #[error("`{name}` shadows a parameter of the enclosing function")]
    ShadowsParameter { name: String },
    #[error("global `{name}` is already declared")]
    GlobalRedeclared { name: String },
    #[error("function `{function}` is defined more than once")]
    FunctionRedefined { function: String },
    #[error("`{name}` is a function, not a variable")]
    FunctionAsVariable { name: String },
    #[error("no function named `main` is defined")]
    MissingMain,

    // Other
    #[error("internal error: {message}")]
    Internal { message: String },
    #[error("module verification failed: {message}")]
    VerifierRejected { message: String },
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: DiagMessage,
    pub span: Option<Span>,
    pub context: Option<String>,
}

/// The append-only sink every phase reports into. Compilation fails
/// exactly when the sink is non-empty at the end of the run.
#[derive(Debug, Default)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics {
            diagnostics: Vec::new(),
        }
    }

    pub fn error(&mut self, kind: DiagnosticKind, message: DiagMessage, span: Span) {
        self.diagnostics.push(Diagnostic {
            kind,
            message,
            span: Some(span),
            context: None,
        });
    }

    pub fn error_with_context(
        &mut self,
        kind: DiagnosticKind,
        message: DiagMessage,
        span: Span,
        context: String,
    ) {
        self.diagnostics.push(Diagnostic {
            kind,
            message,
            span: Some(span),
            context: Some(context),
        });
    }

    /// For problems with no single source location, such as a missing
    /// `main`.
    pub fn error_no_span(&mut self, kind: DiagnosticKind, message: DiagMessage) {
        self.diagnostics.push(Diagnostic {
            kind,
            message,
            span: None,
            context: None,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind == kind).count()
    }

    /// Renders the whole batch, grouped by kind in a fixed order and in
    /// insertion order within each group.
    ///
    /// ```text
    /// Type error: types do not match: expected `int`, received `float`
    /// -> demo.mc:4:9
    ///    |
    ///  4 | x = f;
    ///    | ----^
    /// ```
    pub fn render(&self, file: &str, source: &str) -> String {
        let mut blocks = Vec::new();

        for kind in KIND_ORDER {
            for diagnostic in self.diagnostics.iter().filter(|d| d.kind == kind) {
                blocks.push(render_diagnostic(diagnostic, file, source));
            }
        }

        let mut output = blocks.join("\n\n");
        if !output.is_empty() {
            output.push('\n');
        }
        output
    }
}

fn render_diagnostic(diagnostic: &Diagnostic, file: &str, source: &str) -> String {
    let mut block = String::new();

    match &diagnostic.context {
        Some(context) => block.push_str(&format!(
            "{} error: {} ({})",
            diagnostic.kind, diagnostic.message, context
        )),
        None => block.push_str(&format!("{} error: {}", diagnostic.kind, diagnostic.message)),
    }

    let span = match diagnostic.span {
        Some(span) => span,
        None => {
            block.push_str(&format!("\n-> {}", file));
            return block;
        }
    };

    block.push_str(&format!("\n-> {}:{}:{}", file, span.line, span.column));

    let line_text = match get_source_line(source, span.line) {
        Some(text) => text,
        None => return block,
    };

    let line_string = span.line.to_string();
    let padding = line_string.len() + 2;

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(line_text);

    let column = span.column as usize;
    let arrows = if column > removed_whitespace {
        column - removed_whitespace
    } else {
        1
    };

    block.push_str(&format!("\n{:>padding$}", "|"));
    block.push_str(&format!("\n{} | {}", line_string, line_text_removed.trim()));
    block.push_str(&format!("\n{:>padding$} {:->arrows$}", "|", "^"));

    block
}

/// Edit distance between two identifiers, used for did-you-mean
/// suggestions.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;

        for (j, cb) in b.iter().enumerate() {
            let substitution = if ca == cb { 0 } else { 1 };
            current[j + 1] = (previous[j] + substitution)
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
        }

        previous.copy_from_slice(&current);
    }

    previous[b.len()]
}

/// Picks the closest candidate to `name`, if any is close enough to be
/// worth suggesting. The threshold scales with the identifier length:
/// `max(1, len / 3)`.
pub fn suggest<'a>(name: &str, candidates: impl Iterator<Item = &'a str>) -> Option<String> {
    let mut best: Option<(usize, &str)> = None;

    for candidate in candidates {
        let distance = levenshtein(name, candidate);
        if best.is_none() || distance < best.unwrap().0 {
            best = Some((distance, candidate));
        }
    }

    let limit = (name.len() / 3).max(1);
    match best {
        Some((distance, candidate)) if distance > 0 && distance <= limit => {
            Some(String::from(candidate))
        }
        _ => None,
    }
}
