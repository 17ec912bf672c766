use std::{
    env,
    fs::{self, create_dir},
    path::PathBuf,
    process::exit,
    time::Instant,
};

use inkwell::context::Context;
use minicc::{
    diagnostics::diagnostics::Diagnostics, lexer::lexer::tokenize, parser::parser::parse,
    sema::analyzer::analyze,
};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: minicc <source.mc> [-v | -vv]");
        exit(1);
    }

    let file_path: &str = &args[1];
    let verbosity = match args.get(2).map(|flag| flag.as_str()) {
        None => 0,
        Some("-v") => 1,
        Some("-vv") => 2,
        Some(flag) => {
            eprintln!("Unknown flag `{}`", flag);
            eprintln!("Usage: minicc <source.mc> [-v | -vv]");
            exit(1);
        }
    };

    let file_name = if file_path.contains('/') {
        file_path.split('/').last().unwrap()
    } else {
        file_path
    };

    let source = match fs::read_to_string(file_path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Failed to read `{}`: {}", file_path, error);
            exit(1);
        }
    };

    prepare_build_dir();

    let mut diagnostics = Diagnostics::new();
    let start = Instant::now();

    let tokens = tokenize(&source, &mut diagnostics);
    if verbosity >= 1 {
        println!("Tokenized in {:?}", start.elapsed());
    }
    if verbosity >= 2 {
        for token in &tokens {
            token.debug();
        }
    }

    let parse_start = Instant::now();
    let program = parse(tokens, &mut diagnostics);
    if verbosity >= 1 {
        println!("Parsed in {:?}", parse_start.elapsed());
    }

    // Analysis runs even when earlier phases reported errors, so a
    // single run surfaces everything it can still find.
    let analyze_start = Instant::now();
    let context = Context::create();
    let module = analyze(&program, &context, file_name, &mut diagnostics);
    if verbosity >= 1 {
        println!("Analyzed in {:?}", analyze_start.elapsed());
        println!("Total time for IR generation: {:?}", start.elapsed());
    }

    if !diagnostics.is_empty() {
        eprintln!("{}", diagnostics.render(file_name, &source));
        eprintln!("Compilation failed with {} error(s)", diagnostics.len());
        exit(1);
    }

    if let Err(message) = module.print_to_file("build/out.ll") {
        eprintln!("Failed to write build/out.ll: {}", message);
        exit(1);
    }

    println!("Wrote build/out.ll");
}

/// The output directory is fixed. A fresh run starts from an empty one
/// so a failed compile never leaves a stale module behind.
fn prepare_build_dir() {
    if !PathBuf::from("build").exists() {
        create_dir("build").unwrap();
        return;
    }

    for entry in fs::read_dir("build").unwrap() {
        let entry = entry.unwrap();
        fs::remove_file(entry.path()).unwrap();
    }
}
