use inkwell::{
    attributes::{Attribute, AttributeLoc},
    builder::Builder,
    context::Context,
    module::{Linkage, Module},
    targets::{CodeModel, InitializationConfig, RelocMode, Target, TargetMachine},
    types::{ArrayType, BasicMetadataTypeEnum, BasicType, BasicTypeEnum, FunctionType},
    values::{BasicValueEnum, FunctionValue, IntValue, PointerValue},
    AddressSpace, FloatPredicate, IntPredicate, OptimizationLevel,
};

use crate::{
    ast::stmt::{ArrayDecl, Decl, Function, Param, Program, Prototype, VarDecl},
    diagnostics::diagnostics::{DiagMessage, DiagnosticKind, Diagnostics},
    sema::stmt::gen_block,
    symbols::table::{ScopeError, StorageClass, SymbolEntry, SymbolTable},
    types::types::{classify_conversion, Conversion, FnSig, Ty, TypeDesc},
    Span,
};

/// Walks a parsed program, reports every semantic error it finds and
/// returns the module that was built along the way. The module is
/// verified only when no diagnostic was raised, since error recovery
/// intentionally leaves blocks unterminated.
pub fn analyze<'ctx>(
    program: &Program,
    context: &'ctx Context,
    module_name: &str,
    diagnostics: &mut Diagnostics,
) -> Module<'ctx> {
    Target::initialize_all(&InitializationConfig::default());

    let target_triple = TargetMachine::get_default_triple();
    let target = Target::from_triple(&target_triple).unwrap();
    let target_machine = target
        .create_target_machine(
            &target_triple,
            "generic",
            "",
            OptimizationLevel::Aggressive,
            RelocMode::PIC,
            CodeModel::Default,
        )
        .unwrap();

    let module = context.create_module(module_name);
    module.set_triple(&target_triple);
    module.set_data_layout(&target_machine.get_target_data().get_data_layout());

    let mut analyzer = Analyzer {
        context,
        module,
        builder: context.create_builder(),
        symbols: SymbolTable::new(),
        slots: vec![],
        diagnostics,
        current_return: None,
    };

    for declaration in &program.declarations {
        match declaration {
            Decl::Var(decl) => analyzer.declare_global_scalar(decl),
            Decl::Array(decl) => analyzer.declare_global_array(decl),
            Decl::Prototype(prototype) => analyzer.declare_prototype(prototype),
            Decl::Function(function) => analyzer.define_function(function),
        }
    }

    match analyzer.symbols.lookup_function("main") {
        Some(entry) if entry.defined => {}
        _ => analyzer
            .diagnostics
            .error_no_span(DiagnosticKind::Scope, DiagMessage::MissingMain),
    }

    if analyzer.diagnostics.is_empty() {
        if let Err(message) = analyzer.module.verify() {
            analyzer.diagnostics.error_no_span(
                DiagnosticKind::Other,
                DiagMessage::VerifierRejected {
                    message: message.to_string(),
                },
            );
        }
    }

    analyzer.module
}

/// Shared state for the analysis pass.
///
/// Variables do not carry LLVM handles in the scope table; each entry
/// holds an index into `slots`, which maps it to the alloca or global
/// backing it. The table stays a plain data structure and everything
/// IR-flavoured lives here.
pub struct Analyzer<'ctx, 'd> {
    pub context: &'ctx Context,
    pub module: Module<'ctx>,
    pub builder: Builder<'ctx>,
    pub symbols: SymbolTable,
    pub slots: Vec<PointerValue<'ctx>>,
    pub diagnostics: &'d mut Diagnostics,
    pub current_return: Option<Ty>,
}

impl<'ctx, 'd> Analyzer<'ctx, 'd> {
    fn declare_global_scalar(&mut self, decl: &VarDecl) {
        if decl.ty == Ty::Void {
            self.diagnostics.error(
                DiagnosticKind::Type,
                DiagMessage::VoidDeclaration {
                    name: decl.name.clone(),
                },
                decl.span,
            );
            return;
        }

        let slot = self.slots.len();
        let entry = SymbolEntry {
            name: decl.name.clone(),
            desc: TypeDesc::Scalar(decl.ty),
            storage: StorageClass::Global,
            declared_at: decl.span,
            slot,
        };

        if let Err(error) = self.symbols.declare_global(entry) {
            self.report_scope_error(error, decl.span);
            return;
        }

        let global = self
            .module
            .add_global(self.convert_type(decl.ty), None, &decl.name);
        global.set_initializer(&self.zero_value(decl.ty));
        self.slots.push(global.as_pointer_value());
    }

    fn declare_global_array(&mut self, decl: &ArrayDecl) {
        if decl.ty == Ty::Void {
            self.diagnostics.error(
                DiagnosticKind::Type,
                DiagMessage::VoidDeclaration {
                    name: decl.name.clone(),
                },
                decl.span,
            );
            return;
        }

        let slot = self.slots.len();
        let entry = SymbolEntry {
            name: decl.name.clone(),
            desc: TypeDesc::Array {
                elem: decl.ty,
                dims: decl.dims.clone(),
            },
            storage: StorageClass::Global,
            declared_at: decl.span,
            slot,
        };

        if let Err(error) = self.symbols.declare_global(entry) {
            self.report_scope_error(error, decl.span);
            return;
        }

        let array_ty = self.array_type(decl.ty, &decl.dims);
        let global = self.module.add_global(array_ty, None, &decl.name);
        global.set_initializer(&array_ty.const_zero());
        self.slots.push(global.as_pointer_value());
    }

    fn declare_prototype(&mut self, prototype: &Prototype) {
        let Some(sig) = self.build_signature(prototype.return_ty, &prototype.params) else {
            return;
        };

        if let Some(existing) = self.symbols.lookup_function(&prototype.name) {
            let previous_line = existing.declared_at.line;
            if existing.sig != sig {
                self.diagnostics.error_with_context(
                    DiagnosticKind::Type,
                    DiagMessage::PrototypeMismatch {
                        function: prototype.name.clone(),
                    },
                    prototype.span,
                    format!("first declared on line {previous_line}"),
                );
                return;
            }
        }

        if let Err(error) =
            self.symbols
                .declare_function(&prototype.name, sig.clone(), prototype.span, false)
        {
            self.report_scope_error(error, prototype.span);
            return;
        }

        if self.module.get_function(&prototype.name).is_none() {
            self.module.add_function(
                &prototype.name,
                self.function_type(&sig),
                Some(Linkage::External),
            );
        }
    }

    /// Checks a definition against any earlier declaration, then emits
    /// its body. Parameters are spilled to entry block allocas so that
    /// every variable is addressed the same way.
    fn define_function(&mut self, function: &Function) {
        let Some(sig) = self.build_signature(function.return_ty, &function.params) else {
            return;
        };

        if let Some(existing) = self.symbols.lookup_function(&function.name) {
            let previous_line = existing.declared_at.line;
            if !existing.defined && existing.sig != sig {
                self.diagnostics.error_with_context(
                    DiagnosticKind::Type,
                    DiagMessage::PrototypeMismatch {
                        function: function.name.clone(),
                    },
                    function.span,
                    format!("first declared on line {previous_line}"),
                );
                return;
            }
        }

        if let Err(error) =
            self.symbols
                .declare_function(&function.name, sig.clone(), function.span, true)
        {
            self.report_scope_error(error, function.span);
            return;
        }

        let llvm_function = match self.module.get_function(&function.name) {
            Some(declared) => declared,
            None => self.module.add_function(
                &function.name,
                self.function_type(&sig),
                Some(Linkage::External),
            ),
        };

        for name in ["uwtable", "nounwind"] {
            let attribute = self
                .context
                .create_enum_attribute(Attribute::get_named_enum_kind_id(name), 0);
            llvm_function.add_attribute(AttributeLoc::Function, attribute);
        }

        let entry = self.context.append_basic_block(llvm_function, "entry");
        self.builder.position_at_end(entry);

        self.symbols.enter_function();
        self.current_return = Some(function.return_ty);

        if self.bind_parameters(&function.params, llvm_function) {
            gen_block(self, &function.body);

            // A body may fall off the end; give it the return LLVM
            // requires, zero-valued when the function yields one.
            if self.block_is_open() {
                match function.return_ty {
                    Ty::Void => self.builder.build_return(None).unwrap(),
                    ty => {
                        let zero = self.zero_value(ty);
                        self.builder.build_return(Some(&zero)).unwrap()
                    }
                };
            }
        }

        self.symbols.exit_function();
        self.current_return = None;
        self.builder.clear_insertion_position();
    }

    fn bind_parameters(&mut self, params: &[Param], llvm_function: FunctionValue<'ctx>) -> bool {
        for (param, value) in params.iter().zip(llvm_function.get_param_iter()) {
            let (desc, llvm_ty) = match &param.inner_dims {
                None => (TypeDesc::Scalar(param.ty), self.convert_type(param.ty)),
                Some(inner_dims) => (
                    TypeDesc::ArrayParam {
                        elem: param.ty,
                        inner_dims: inner_dims.clone(),
                    },
                    self.param_type(param.ty, inner_dims),
                ),
            };

            let alloca = self.builder.build_alloca(llvm_ty, &param.name).unwrap();
            self.builder.build_store(alloca, value).unwrap();

            let slot = self.slots.len();
            let entry = SymbolEntry {
                name: param.name.clone(),
                desc,
                storage: StorageClass::Parameter,
                declared_at: param.span,
                slot,
            };

            if let Err(error) = self.symbols.declare_parameter(entry) {
                self.report_scope_error(error, param.span);
                return false;
            }
            self.slots.push(alloca);
        }

        true
    }

    /// Builds the semantic signature for a function head. A `void`
    /// parameter is reported and poisons the whole signature.
    fn build_signature(&mut self, return_ty: Ty, params: &[Param]) -> Option<FnSig> {
        let mut descs = vec![];
        for param in params {
            if param.ty == Ty::Void {
                self.diagnostics.error(
                    DiagnosticKind::Type,
                    DiagMessage::VoidDeclaration {
                        name: param.name.clone(),
                    },
                    param.span,
                );
                return None;
            }

            descs.push(match &param.inner_dims {
                None => TypeDesc::Scalar(param.ty),
                Some(inner_dims) => TypeDesc::ArrayParam {
                    elem: param.ty,
                    inner_dims: inner_dims.clone(),
                },
            });
        }

        Some(FnSig {
            return_ty,
            params: descs,
        })
    }

    fn function_type(&self, sig: &FnSig) -> FunctionType<'ctx> {
        let params: Vec<BasicMetadataTypeEnum<'ctx>> = sig
            .params
            .iter()
            .map(|desc| match desc {
                TypeDesc::Scalar(ty) => self.convert_type(*ty).into(),
                TypeDesc::ArrayParam { elem, inner_dims } => {
                    self.param_type(*elem, inner_dims).into()
                }
                TypeDesc::Array { .. } => panic!("whole arrays are never passed by value"),
            })
            .collect();

        match sig.return_ty {
            Ty::Void => self.context.void_type().fn_type(&params, false),
            ty => self.convert_type(ty).fn_type(&params, false),
        }
    }

    /// Maps a scalar semantic type onto its LLVM representation.
    pub fn convert_type(&self, ty: Ty) -> BasicTypeEnum<'ctx> {
        match ty {
            Ty::Int => self.context.i32_type().into(),
            Ty::Float => self.context.f32_type().into(),
            Ty::Bool => self.context.bool_type().into(),
            Ty::Void => panic!("void has no value representation"),
        }
    }

    /// Nested LLVM array type for a declared array, outermost
    /// dimension first.
    pub fn array_type(&self, elem: Ty, dims: &[u32]) -> ArrayType<'ctx> {
        let mut ty = self.convert_type(elem).array_type(dims[dims.len() - 1]);
        for dim in dims[..dims.len() - 1].iter().rev() {
            ty = ty.array_type(*dim);
        }
        ty
    }

    /// The type an array parameter is passed as: a pointer to the row
    /// described by the inner dimensions, or to the element itself
    /// when there are none.
    pub fn param_type(&self, elem: Ty, inner_dims: &[u32]) -> BasicTypeEnum<'ctx> {
        if inner_dims.is_empty() {
            self.convert_type(elem)
                .ptr_type(AddressSpace::default())
                .into()
        } else {
            self.array_type(elem, inner_dims)
                .ptr_type(AddressSpace::default())
                .into()
        }
    }

    pub fn zero_value(&self, ty: Ty) -> BasicValueEnum<'ctx> {
        match ty {
            Ty::Int => self.context.i32_type().const_zero().into(),
            Ty::Float => self.context.f32_type().const_float(0.0).into(),
            Ty::Bool => self.context.bool_type().const_zero().into(),
            Ty::Void => panic!("void has no zero value"),
        }
    }

    /// Builds an alloca in the entry block of `function`, ahead of any
    /// instruction already there, so locals declared in nested blocks
    /// still live in the entry block.
    pub fn create_entry_alloca(
        &self,
        function: FunctionValue<'ctx>,
        ty: BasicTypeEnum<'ctx>,
        name: &str,
    ) -> PointerValue<'ctx> {
        let entry = function.get_first_basic_block().unwrap();
        let builder = self.context.create_builder();
        match entry.get_first_instruction() {
            Some(first) => builder.position_before(&first),
            None => builder.position_at_end(entry),
        }
        builder.build_alloca(ty, name).unwrap()
    }

    pub fn current_function(&self) -> FunctionValue<'ctx> {
        self.builder
            .get_insert_block()
            .unwrap()
            .get_parent()
            .unwrap()
    }

    pub fn block_is_open(&self) -> bool {
        match self.builder.get_insert_block() {
            Some(block) => block.get_terminator().is_none(),
            None => false,
        }
    }

    /// Statements behind a `return` still get analyzed. When the
    /// current block is already terminated, emission continues into a
    /// fresh unreachable block.
    pub fn ensure_open_block(&mut self) {
        if let Some(block) = self.builder.get_insert_block() {
            if block.get_terminator().is_some() {
                let function = block.get_parent().unwrap();
                let dead = self.context.append_basic_block(function, "dead");
                self.builder.position_at_end(dead);
            }
        }
    }

    /// Emits the implicit widening conversion. Callers have already
    /// established that `from` widens to `to`.
    pub fn widen_value(
        &self,
        value: BasicValueEnum<'ctx>,
        from: Ty,
        to: Ty,
    ) -> BasicValueEnum<'ctx> {
        if from == to {
            return value;
        }

        match (from, to) {
            (Ty::Bool, Ty::Int) => self
                .builder
                .build_int_z_extend(value.into_int_value(), self.context.i32_type(), "")
                .unwrap()
                .into(),
            (Ty::Bool, Ty::Float) => self
                .builder
                .build_unsigned_int_to_float(value.into_int_value(), self.context.f32_type(), "")
                .unwrap()
                .into(),
            (Ty::Int, Ty::Float) => self
                .builder
                .build_signed_int_to_float(value.into_int_value(), self.context.f32_type(), "")
                .unwrap()
                .into(),
            _ => panic!("no widening from `{from}` to `{to}`"),
        }
    }

    /// Converts `value` to `target` where the conversion is identity
    /// or widening; narrowing and void conversions are type mismatches
    /// at `span`.
    pub fn coerce_value(
        &mut self,
        value: BasicValueEnum<'ctx>,
        from: Ty,
        target: Ty,
        span: Span,
    ) -> Option<BasicValueEnum<'ctx>> {
        match classify_conversion(from, target) {
            Conversion::Identity => Some(value),
            Conversion::Widening => Some(self.widen_value(value, from, target)),
            Conversion::Narrowing | Conversion::Forbidden => {
                self.diagnostics.error(
                    DiagnosticKind::Type,
                    DiagMessage::TypeMismatch {
                        expected: target.to_string(),
                        received: from.to_string(),
                    },
                    span,
                );
                None
            }
        }
    }

    /// Narrows a value to an `i1` by comparing it against zero. The
    /// truth contexts are the only places `int` and `float` convert
    /// downwards.
    pub fn truthy(&self, value: BasicValueEnum<'ctx>, ty: Ty) -> IntValue<'ctx> {
        match ty {
            Ty::Bool => value.into_int_value(),
            Ty::Int => self
                .builder
                .build_int_compare(
                    IntPredicate::NE,
                    value.into_int_value(),
                    self.context.i32_type().const_zero(),
                    "",
                )
                .unwrap(),
            Ty::Float => self
                .builder
                .build_float_compare(
                    FloatPredicate::UNE,
                    value.into_float_value(),
                    self.context.f32_type().const_zero(),
                    "",
                )
                .unwrap(),
            Ty::Void => panic!("void has no truth value"),
        }
    }

    pub fn report_scope_error(&mut self, error: ScopeError, span: Span) {
        let (message, original) = match error {
            ScopeError::DuplicateInBlock { name, original } => {
                (DiagMessage::DuplicateInBlock { name }, original)
            }
            ScopeError::DuplicateParameter { name, original } => {
                (DiagMessage::DuplicateParameter { name }, original)
            }
            ScopeError::CollidesWithFunction { name, original } => {
                (DiagMessage::CollidesWithFunction { name }, original)
            }
            ScopeError::ShadowsParameter { name, original } => {
                (DiagMessage::ShadowsParameter { name }, original)
            }
            ScopeError::GlobalRedeclared { name, original } => {
                (DiagMessage::GlobalRedeclared { name }, original)
            }
            ScopeError::FunctionRedefined { name, original } => {
                (DiagMessage::FunctionRedefined { function: name }, original)
            }
        };

        if original.line > 0 {
            self.diagnostics.error_with_context(
                DiagnosticKind::Scope,
                message,
                span,
                format!("first declared on line {}", original.line),
            );
        } else {
            self.diagnostics.error(DiagnosticKind::Scope, message, span);
        }
    }
}
