use std::collections::HashMap;

use crate::{
    types::types::{FnSig, TypeDesc},
    Span,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageClass {
    Global,
    Local,
    Parameter,
}

/// A declared variable, array or parameter.
///
/// `slot` indexes the analyzer's table of storage pointers; the symbol
/// table itself stays free of code generation types.
#[derive(Debug, Clone)]
pub struct SymbolEntry {
    pub name: String,
    pub desc: TypeDesc,
    pub storage: StorageClass,
    pub declared_at: Span,
    pub slot: usize,
}

/// A function known to the unit, from a prototype or a definition.
#[derive(Debug, Clone)]
pub struct FnEntry {
    pub sig: FnSig,
    pub declared_at: Span,
    pub defined: bool,
}

/// Why a declaration was rejected. Each variant carries the site of the
/// earlier declaration it clashed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeError {
    DuplicateInBlock { name: String, original: Span },
    DuplicateParameter { name: String, original: Span },
    CollidesWithFunction { name: String, original: Span },
    ShadowsParameter { name: String, original: Span },
    GlobalRedeclared { name: String, original: Span },
    FunctionRedefined { name: String, original: Span },
}

/// The scope structure of the unit being analyzed.
///
/// Lookup resolves innermost block frame first, then the enclosing
/// frames, then the current function's parameters, then globals.
/// Every `push_frame` must be matched by a `pop_frame` on all exit
/// paths, including failed analysis of the frame's block.
#[derive(Debug, Default)]
pub struct SymbolTable {
    globals: HashMap<String, SymbolEntry>,
    functions: HashMap<String, FnEntry>,
    parameters: HashMap<String, SymbolEntry>,
    frames: Vec<HashMap<String, SymbolEntry>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    pub fn push_frame(&mut self) {
        self.frames.push(HashMap::new());
    }

    pub fn pop_frame(&mut self) {
        self.frames.pop();
    }

    /// Begins a function body: parameters from the previous function
    /// are dropped.
    pub fn enter_function(&mut self) {
        self.parameters.clear();
    }

    pub fn exit_function(&mut self) {
        self.parameters.clear();
    }

    pub fn declare_global(&mut self, entry: SymbolEntry) -> Result<(), ScopeError> {
        if let Some(function) = self.functions.get(&entry.name) {
            return Err(ScopeError::CollidesWithFunction {
                name: entry.name,
                original: function.declared_at,
            });
        }

        if let Some(existing) = self.globals.get(&entry.name) {
            return Err(ScopeError::GlobalRedeclared {
                name: entry.name,
                original: existing.declared_at,
            });
        }

        self.globals.insert(entry.name.clone(), entry);
        Ok(())
    }

    pub fn declare_parameter(&mut self, entry: SymbolEntry) -> Result<(), ScopeError> {
        if let Some(function) = self.functions.get(&entry.name) {
            return Err(ScopeError::CollidesWithFunction {
                name: entry.name,
                original: function.declared_at,
            });
        }

        if let Some(existing) = self.parameters.get(&entry.name) {
            return Err(ScopeError::DuplicateParameter {
                name: entry.name,
                original: existing.declared_at,
            });
        }

        self.parameters.insert(entry.name.clone(), entry);
        Ok(())
    }

    /// Declares a local in the innermost frame. Shadowing an outer
    /// block or a global is fine; shadowing a parameter of the
    /// enclosing function or reusing a name within the block is not.
    pub fn declare_local(&mut self, entry: SymbolEntry) -> Result<(), ScopeError> {
        if let Some(function) = self.functions.get(&entry.name) {
            return Err(ScopeError::CollidesWithFunction {
                name: entry.name,
                original: function.declared_at,
            });
        }

        if let Some(parameter) = self.parameters.get(&entry.name) {
            return Err(ScopeError::ShadowsParameter {
                name: entry.name,
                original: parameter.declared_at,
            });
        }

        let frame = self.frames.last_mut().unwrap();
        if let Some(existing) = frame.get(&entry.name) {
            return Err(ScopeError::DuplicateInBlock {
                name: entry.name,
                original: existing.declared_at,
            });
        }

        frame.insert(entry.name.clone(), entry);
        Ok(())
    }

    /// Records a function. Repeated prototypes are allowed; signature
    /// agreement between declarations is the analyzer's job. A second
    /// definition is rejected here.
    pub fn declare_function(
        &mut self,
        name: &str,
        sig: FnSig,
        span: Span,
        defined: bool,
    ) -> Result<(), ScopeError> {
        if let Some(global) = self.globals.get(name) {
            return Err(ScopeError::GlobalRedeclared {
                name: String::from(name),
                original: global.declared_at,
            });
        }

        if let Some(existing) = self.functions.get_mut(name) {
            if defined && existing.defined {
                return Err(ScopeError::FunctionRedefined {
                    name: String::from(name),
                    original: existing.declared_at,
                });
            }
            if defined {
                existing.defined = true;
            }
            return Ok(());
        }

        self.functions.insert(
            String::from(name),
            FnEntry {
                sig,
                declared_at: span,
                defined,
            },
        );
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&SymbolEntry> {
        for frame in self.frames.iter().rev() {
            if let Some(entry) = frame.get(name) {
                return Some(entry);
            }
        }

        if let Some(entry) = self.parameters.get(name) {
            return Some(entry);
        }

        self.globals.get(name)
    }

    pub fn lookup_function(&self, name: &str) -> Option<&FnEntry> {
        self.functions.get(name)
    }

    pub fn is_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Every data name visible from the current position, for
    /// did-you-mean suggestions.
    pub fn visible_names(&self) -> Vec<String> {
        let mut names = Vec::new();

        for frame in self.frames.iter().rev() {
            names.extend(frame.keys().cloned());
        }
        names.extend(self.parameters.keys().cloned());
        names.extend(self.globals.keys().cloned());

        names
    }

    pub fn function_names(&self) -> Vec<String> {
        self.functions.keys().cloned().collect()
    }
}
