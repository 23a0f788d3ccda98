//! WASM backend.
//!
//! Lowers a bound [`HirProgram`] into a wasm module using `wasm-encoder`.
//! Module layout:
//!
//! - imports `env.print` and `env.println` (function indices 0 and 1)
//! - one function per user function, in declaration order
//! - an initializer function storing every global, registered as the
//!   start function (only if there are globals)
//! - one mutable global per global variable
//! - one memory, exported as `memory`, holding the string literals
//! - `main` exported as the entry point

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::{debug, trace};
use wasm_encoder::{
    BlockType, CodeSection, ConstExpr, DataSection, EntityType, ExportKind, ExportSection,
    Function, FunctionSection, GlobalSection, GlobalType, ImportSection, Instruction,
    MemorySection, MemoryType, Module, StartSection, TypeSection, ValType,
};

use crate::builtins::{BUILTINS, HOST_MODULE};
use crate::diagnostic::{Diagnostic, DiagnosticBag};
use crate::error::CoreError;
use crate::hir::{Constant, HirBlock, HirExpr, HirExprKind, HirIfClause, HirProgram, HirStmt};
use crate::operators::{BinaryOp, UnaryOp};
use crate::span::Span;
use crate::symbols::{FunctionId, FunctionSymbol, SymbolTable, VariableId, VariableKind};
use crate::types::Type;

/// Name of the user function used as the entry point.
pub const ENTRY_POINT: &str = "main";

/// Name under which the linear memory is exported.
pub const MEMORY_EXPORT: &str = "memory";

/// First byte used for string literals; address 0 is never a string.
const STRING_BASE: u32 = 8;

const PAGE_SIZE: u32 = 65536;

/// A generated wasm module plus a description of its layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WasmArtifact {
    pub wasm: Vec<u8>,
    /// Global variable names, by wasm global index.
    pub globals: Vec<String>,
    /// User function names, by wasm function index minus the imports.
    pub functions: Vec<String>,
    /// Function index of the start function, if any.
    pub initializer: Option<u32>,
    /// Function index of `main`.
    pub entry_point: u32,
}

impl WasmArtifact {
    /// Write the module to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), CoreError> {
        if path.file_name().is_none() {
            return Err(CoreError::InvalidArtifactPath(path.to_path_buf()));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| CoreError::PersistArtifact {
                path: path.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, &self.wasm).map_err(|source| CoreError::PersistArtifact {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug)]
pub struct CodegenResult {
    /// `None` if a fatal diagnostic was reported.
    pub artifact: Option<WasmArtifact>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Generate a wasm module for a bound program.
///
/// The program is expected to be free of binding errors.
pub fn generate_wasm(program: &HirProgram) -> CodegenResult {
    let mut diagnostics = DiagnosticBag::new();
    let symbols = &program.symbols;

    // Signature pass: fix every global and function index before lowering
    // any body, so calls may target functions declared later.
    let mut ctx = ModuleContext {
        symbols,
        globals: HashMap::new(),
        functions: HashMap::new(),
        strings: StringPool::default(),
    };

    let mut global_names = Vec::new();
    for stmt in &program.globals {
        if let HirStmt::VariableDeclaration { variable, .. } = stmt {
            ctx.globals.insert(*variable, global_names.len() as u32);
            global_names.push(symbols.variable(*variable).name.clone());
        }
    }

    let import_count = BUILTINS.len() as u32;
    let mut function_names = Vec::new();
    let mut entry_index = None;
    for &function in program.functions.keys() {
        let index = import_count + function_names.len() as u32;
        let symbol = symbols.function(function);
        if entry_index.is_none() && is_entry_point(symbol) {
            entry_index = Some(index);
        }
        ctx.functions.insert(function, index);
        function_names.push(symbol.name.clone());
    }

    let Some(entry_index) = entry_index else {
        diagnostics.report(
            "EMT001",
            Span::empty(0),
            "Missing entry point: main : i32 ().",
        );
        return CodegenResult {
            artifact: None,
            diagnostics: diagnostics.into_vec(),
        };
    };
    let initializer = (!global_names.is_empty())
        .then(|| import_count + function_names.len() as u32);

    let mut types = TypeTable::default();
    let mut type_section = TypeSection::new();

    let mut imports = ImportSection::new();
    for descriptor in BUILTINS {
        let params: Vec<ValType> = descriptor
            .parameters
            .iter()
            .filter_map(|&(_, ty)| val_type(ty))
            .collect();
        let results: Vec<ValType> = val_type(descriptor.return_type).into_iter().collect();
        let type_index = types.intern(&mut type_section, params, results);
        imports.import(HOST_MODULE, descriptor.name, EntityType::Function(type_index));
    }

    let mut function_section = FunctionSection::new();
    for &function in program.functions.keys() {
        let params = symbols
            .parameter_types(function)
            .into_iter()
            .filter_map(val_type)
            .collect();
        let results = val_type(symbols.function(function).return_type)
            .into_iter()
            .collect();
        function_section.function(types.intern(&mut type_section, params, results));
    }
    if initializer.is_some() {
        function_section.function(types.intern(&mut type_section, Vec::new(), Vec::new()));
    }

    let mut global_section = GlobalSection::new();
    for stmt in &program.globals {
        if let HirStmt::VariableDeclaration { variable, .. } = stmt {
            let ty = symbols.variable(*variable).ty;
            let val_type = val_type(ty).unwrap_or(ValType::I32);
            global_section.global(
                GlobalType {
                    val_type,
                    mutable: true,
                    shared: false,
                },
                &zero_const_expr(val_type),
            );
        }
    }

    // Body pass.
    let mut code = CodeSection::new();
    for (&function, body) in &program.functions {
        let emitter = FunctionEmitter::for_function(&mut ctx, function);
        code.function(&emitter.finish_function(function, body));
    }
    if initializer.is_some() {
        let mut emitter = FunctionEmitter::new(&mut ctx, 0, None);
        for stmt in &program.globals {
            emitter.emit_stmt(stmt);
        }
        trace!(
            "lowered static initializer: {} instructions",
            emitter.instructions.len()
        );
        code.function(&emitter.finish());
    }

    let mut memory = MemorySection::new();
    memory.memory(MemoryType {
        minimum: u64::from(ctx.strings.end.div_ceil(PAGE_SIZE).max(1)),
        maximum: None,
        memory64: false,
        shared: false,
        page_size_log2: None,
    });

    let mut exports = ExportSection::new();
    exports.export(ENTRY_POINT, ExportKind::Func, entry_index);
    exports.export(MEMORY_EXPORT, ExportKind::Memory, 0);

    let mut data = DataSection::new();
    for (offset, bytes) in &ctx.strings.segments {
        data.active(0, &ConstExpr::i32_const(*offset as i32), bytes.iter().copied());
    }

    let mut module = Module::new();
    module.section(&type_section);
    module.section(&imports);
    module.section(&function_section);
    module.section(&memory);
    if !global_names.is_empty() {
        module.section(&global_section);
    }
    module.section(&exports);
    if let Some(function_index) = initializer {
        module.section(&StartSection { function_index });
    }
    module.section(&code);
    if !ctx.strings.segments.is_empty() {
        module.section(&data);
    }

    let wasm = module.finish();
    debug!(
        "generated wasm module: {} bytes, {} functions, {} globals, {} strings",
        wasm.len(),
        function_names.len(),
        global_names.len(),
        ctx.strings.segments.len()
    );

    CodegenResult {
        artifact: Some(WasmArtifact {
            wasm,
            globals: global_names,
            functions: function_names,
            initializer,
            entry_point: entry_index,
        }),
        diagnostics: diagnostics.into_vec(),
    }
}

fn is_entry_point(symbol: &FunctionSymbol) -> bool {
    symbol.name == ENTRY_POINT && symbol.parameters.is_empty() && symbol.return_type == Type::I32
}

/// Wasm value type of a Simple type; `None` for `void`.
fn val_type(ty: Type) -> Option<ValType> {
    match ty {
        Type::F64 => Some(ValType::F64),
        Type::Void => None,
        // Booleans, chars and string addresses are all i32.
        Type::I32 | Type::Bool | Type::Char | Type::String | Type::Error => Some(ValType::I32),
    }
}

fn zero_const_expr(val_type: ValType) -> ConstExpr {
    match val_type {
        ValType::F64 => ConstExpr::f64_const(0.0_f64.into()),
        _ => ConstExpr::i32_const(0),
    }
}

/// Deduplicated function signatures.
#[derive(Default)]
struct TypeTable {
    signatures: Vec<(Vec<ValType>, Vec<ValType>)>,
}

impl TypeTable {
    fn intern(
        &mut self,
        section: &mut TypeSection,
        params: Vec<ValType>,
        results: Vec<ValType>,
    ) -> u32 {
        if let Some(index) = self
            .signatures
            .iter()
            .position(|(p, r)| *p == params && *r == results)
        {
            return index as u32;
        }
        section
            .ty()
            .function(params.iter().copied(), results.iter().copied());
        self.signatures.push((params, results));
        (self.signatures.len() - 1) as u32
    }
}

/// String literals laid out in linear memory as a little-endian `u32`
/// byte length followed by the UTF-8 bytes, each entry 4-byte aligned.
struct StringPool {
    addresses: HashMap<String, u32>,
    segments: Vec<(u32, Vec<u8>)>,
    end: u32,
}

impl Default for StringPool {
    fn default() -> Self {
        StringPool {
            addresses: HashMap::new(),
            segments: Vec::new(),
            end: STRING_BASE,
        }
    }
}

impl StringPool {
    fn intern(&mut self, value: &str) -> u32 {
        if let Some(&address) = self.addresses.get(value) {
            return address;
        }
        let address = self.end;
        let mut bytes = Vec::with_capacity(4 + value.len());
        bytes.extend_from_slice(&(value.len() as u32).to_le_bytes());
        bytes.extend_from_slice(value.as_bytes());
        self.end = (address + bytes.len() as u32).next_multiple_of(4);
        self.segments.push((address, bytes));
        self.addresses.insert(value.to_string(), address);
        address
    }
}

struct ModuleContext<'p> {
    symbols: &'p SymbolTable,
    globals: HashMap<VariableId, u32>,
    functions: HashMap<FunctionId, u32>,
    strings: StringPool,
}

/// Structured control labels, innermost last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    Plain,
    /// Branching here leaves the loop.
    Break,
    /// Branching here starts the next iteration.
    Continue,
}

enum Storage {
    Global(u32),
    Local(u32),
}

struct FunctionEmitter<'c, 'p> {
    ctx: &'c mut ModuleContext<'p>,
    param_count: u32,
    result: Option<ValType>,
    locals: HashMap<VariableId, u32>,
    local_types: Vec<ValType>,
    instructions: Vec<Instruction<'static>>,
    labels: Vec<Label>,
}

impl<'c, 'p> FunctionEmitter<'c, 'p> {
    fn new(ctx: &'c mut ModuleContext<'p>, param_count: u32, result: Option<ValType>) -> Self {
        FunctionEmitter {
            ctx,
            param_count,
            result,
            locals: HashMap::new(),
            local_types: Vec::new(),
            instructions: Vec::new(),
            labels: Vec::new(),
        }
    }

    fn for_function(ctx: &'c mut ModuleContext<'p>, function: FunctionId) -> Self {
        let symbol = ctx.symbols.function(function);
        let param_count = symbol.parameters.len() as u32;
        let result = val_type(symbol.return_type);
        FunctionEmitter::new(ctx, param_count, result)
    }

    fn finish_function(mut self, function: FunctionId, body: &HirBlock) -> Function {
        self.emit_block(body);
        // Default return; unreachable if the body already returned.
        match self.result {
            Some(ValType::F64) => self.push(Instruction::F64Const(0.0_f64.into())),
            Some(_) => self.push(Instruction::I32Const(0)),
            None => {}
        }
        trace!(
            "lowered function '{}': {} locals, {} instructions",
            self.ctx.symbols.function(function).name,
            self.local_types.len(),
            self.instructions.len()
        );
        self.finish()
    }

    fn finish(self) -> Function {
        let mut function = Function::new_with_locals_types(self.local_types.iter().copied());
        for instruction in &self.instructions {
            function.instruction(instruction);
        }
        function.instruction(&Instruction::End);
        function
    }

    fn push(&mut self, instruction: Instruction<'static>) {
        self.instructions.push(instruction);
    }

    fn new_local(&mut self, ty: ValType) -> u32 {
        let index = self.param_count + self.local_types.len() as u32;
        self.local_types.push(ty);
        index
    }

    /// Globals first, then this function's locals, then its parameters.
    /// Locals get a slot the first time they are seen.
    fn storage(&mut self, variable: VariableId) -> Storage {
        if let Some(&index) = self.ctx.globals.get(&variable) {
            return Storage::Global(index);
        }
        if let Some(&index) = self.locals.get(&variable) {
            return Storage::Local(index);
        }
        let symbol = self.ctx.symbols.variable(variable);
        match symbol.kind {
            VariableKind::Parameter { ordinal } => Storage::Local(ordinal),
            VariableKind::Local | VariableKind::Global => {
                let ty = val_type(symbol.ty).unwrap_or(ValType::I32);
                let index = self.new_local(ty);
                self.locals.insert(variable, index);
                Storage::Local(index)
            }
        }
    }

    fn emit_load(&mut self, variable: VariableId) {
        match self.storage(variable) {
            Storage::Global(index) => self.push(Instruction::GlobalGet(index)),
            Storage::Local(index) => self.push(Instruction::LocalGet(index)),
        }
    }

    fn emit_store(&mut self, variable: VariableId) {
        match self.storage(variable) {
            Storage::Global(index) => self.push(Instruction::GlobalSet(index)),
            Storage::Local(index) => self.push(Instruction::LocalSet(index)),
        }
    }

    /// Relative depth of the innermost label of `kind`.
    fn branch_depth(&self, kind: Label) -> u32 {
        let position = self
            .labels
            .iter()
            .rposition(|&label| label == kind)
            .unwrap_or(0);
        (self.labels.len() - 1 - position) as u32
    }

    fn open(&mut self, instruction: Instruction<'static>, label: Label) {
        self.push(instruction);
        self.labels.push(label);
    }

    fn close(&mut self) {
        self.labels.pop();
        self.push(Instruction::End);
    }

    // -----------------------------------------------------------------
    // Statements
    // -----------------------------------------------------------------

    fn emit_block(&mut self, block: &HirBlock) {
        for stmt in &block.statements {
            self.emit_stmt(stmt);
        }
    }

    fn emit_stmt(&mut self, stmt: &HirStmt) {
        match stmt {
            HirStmt::Block(block) => self.emit_block(block),
            HirStmt::VariableDeclaration {
                variable,
                initializer,
            } => {
                self.emit_expr(initializer);
                self.emit_store(*variable);
            }
            HirStmt::Assignment { variable, value } => {
                self.emit_expr(value);
                self.emit_store(*variable);
            }
            HirStmt::Expression(expr) => {
                self.emit_expr(expr);
                if !expr.ty.is_void() {
                    self.push(Instruction::Drop);
                }
            }
            HirStmt::Return(value) => {
                if let Some(value) = value {
                    self.emit_expr(value);
                }
                self.push(Instruction::Return);
            }
            HirStmt::If { condition, body } => {
                self.emit_expr(condition);
                self.open(Instruction::If(BlockType::Empty), Label::Plain);
                self.emit_block(body);
                self.close();
            }
            HirStmt::IfChain { clauses } => self.emit_if_chain(clauses),
            HirStmt::While { condition, body } => {
                self.open(Instruction::Block(BlockType::Empty), Label::Break);
                self.open(Instruction::Loop(BlockType::Empty), Label::Continue);
                self.emit_exit_unless(condition);
                self.emit_block(body);
                self.push(Instruction::Br(0));
                self.close();
                self.close();
            }
            HirStmt::For {
                initializer,
                condition,
                increment,
                body,
            } => {
                if let Some(initializer) = initializer {
                    self.emit_stmt(initializer);
                }
                self.open(Instruction::Block(BlockType::Empty), Label::Break);
                self.open(Instruction::Loop(BlockType::Empty), Label::Plain);
                self.emit_exit_unless(condition);
                // `skip` leaves this block, so the increment still runs.
                self.open(Instruction::Block(BlockType::Empty), Label::Continue);
                self.emit_block(body);
                self.close();
                if let Some(increment) = increment {
                    self.emit_stmt(increment);
                }
                self.push(Instruction::Br(0));
                self.close();
                self.close();
            }
            HirStmt::Break => {
                let depth = self.branch_depth(Label::Break);
                self.push(Instruction::Br(depth));
            }
            HirStmt::Skip => {
                let depth = self.branch_depth(Label::Continue);
                self.push(Instruction::Br(depth));
            }
        }
    }

    /// `cond; i32.eqz; br_if <loop exit>`
    fn emit_exit_unless(&mut self, condition: &HirExpr) {
        self.emit_expr(condition);
        self.push(Instruction::I32Eqz);
        let depth = self.branch_depth(Label::Break);
        self.push(Instruction::BrIf(depth));
    }

    fn emit_if_chain(&mut self, clauses: &[HirIfClause]) {
        let Some((first, rest)) = clauses.split_first() else {
            return;
        };
        let Some(condition) = &first.condition else {
            self.emit_block(&first.body);
            return;
        };

        self.emit_expr(condition);
        self.open(Instruction::If(BlockType::Empty), Label::Plain);
        self.emit_block(&first.body);
        if !rest.is_empty() {
            self.push(Instruction::Else);
            self.emit_if_chain(rest);
        }
        self.close();
    }

    // -----------------------------------------------------------------
    // Expressions
    // -----------------------------------------------------------------

    fn emit_expr(&mut self, expr: &HirExpr) {
        match &expr.kind {
            HirExprKind::Literal(constant) => self.emit_constant(constant),
            HirExprKind::Variable(variable) => self.emit_load(*variable),
            HirExprKind::Unary { op, operand } => match (op.op, operand.ty) {
                (UnaryOp::Identity, _) => self.emit_expr(operand),
                (UnaryOp::Negate, Type::F64) => {
                    self.emit_expr(operand);
                    self.push(Instruction::F64Neg);
                }
                (UnaryOp::Negate, _) => {
                    self.push(Instruction::I32Const(0));
                    self.emit_expr(operand);
                    self.push(Instruction::I32Sub);
                }
                (UnaryOp::LogicalNot, _) => {
                    self.emit_expr(operand);
                    self.push(Instruction::I32Eqz);
                }
            },
            HirExprKind::Binary { left, op, right } => match op.op {
                BinaryOp::LogicalAnd => {
                    self.emit_expr(left);
                    self.push(Instruction::If(BlockType::Result(ValType::I32)));
                    self.emit_expr(right);
                    self.push(Instruction::Else);
                    self.push(Instruction::I32Const(0));
                    self.push(Instruction::End);
                }
                BinaryOp::LogicalOr => {
                    self.emit_expr(left);
                    self.push(Instruction::If(BlockType::Result(ValType::I32)));
                    self.push(Instruction::I32Const(1));
                    self.push(Instruction::Else);
                    self.emit_expr(right);
                    self.push(Instruction::End);
                }
                BinaryOp::Rem if op.left == Type::F64 => self.emit_f64_rem(left, right),
                _ => {
                    self.emit_expr(left);
                    self.emit_expr(right);
                    self.emit_binary_op(op.op, op.left == Type::F64);
                }
            },
            HirExprKind::Call { function, args } => {
                for arg in args {
                    self.emit_expr(arg);
                }
                let symbol = self.ctx.symbols.function(*function);
                let index = match symbol.builtin {
                    Some(builtin) => Some(builtin.import_index()),
                    None => self.ctx.functions.get(function).copied(),
                };
                match index {
                    Some(index) => self.push(Instruction::Call(index)),
                    // Only functions with a bound body have an index.
                    None => self.push(Instruction::Unreachable),
                }
            }
            HirExprKind::Error => self.push(Instruction::Unreachable),
        }
    }

    fn emit_constant(&mut self, constant: &Constant) {
        let instruction = match constant {
            Constant::I32(value) => Instruction::I32Const(*value),
            Constant::F64(value) => Instruction::F64Const((*value).into()),
            Constant::Bool(value) => Instruction::I32Const(i32::from(*value)),
            Constant::Char(value) => Instruction::I32Const(*value as i32),
            Constant::String(value) => Instruction::I32Const(self.ctx.strings.intern(value) as i32),
        };
        self.push(instruction);
    }

    fn emit_binary_op(&mut self, op: BinaryOp, float: bool) {
        use Instruction as I;

        // (instruction, negate result)
        let (instruction, negate) = if float {
            match op {
                BinaryOp::Add => (I::F64Add, false),
                BinaryOp::Sub => (I::F64Sub, false),
                BinaryOp::Mul => (I::F64Mul, false),
                BinaryOp::Div => (I::F64Div, false),
                BinaryOp::Equal => (I::F64Eq, false),
                BinaryOp::NotEqual => (I::F64Eq, true),
                BinaryOp::Less => (I::F64Lt, false),
                BinaryOp::LessEqual => (I::F64Gt, true),
                BinaryOp::Greater => (I::F64Gt, false),
                BinaryOp::GreaterEqual => (I::F64Lt, true),
                _ => (I::Unreachable, false),
            }
        } else {
            match op {
                BinaryOp::Add => (I::I32Add, false),
                BinaryOp::Sub => (I::I32Sub, false),
                BinaryOp::Mul => (I::I32Mul, false),
                BinaryOp::Div => (I::I32DivS, false),
                BinaryOp::Rem => (I::I32RemS, false),
                BinaryOp::Equal => (I::I32Eq, false),
                BinaryOp::NotEqual => (I::I32Eq, true),
                BinaryOp::Less => (I::I32LtS, false),
                BinaryOp::LessEqual => (I::I32GtS, true),
                BinaryOp::Greater => (I::I32GtS, false),
                BinaryOp::GreaterEqual => (I::I32LtS, true),
                BinaryOp::BitAnd => (I::I32And, false),
                BinaryOp::BitOr => (I::I32Or, false),
                BinaryOp::BitXor => (I::I32Xor, false),
                BinaryOp::ShiftLeft => (I::I32Shl, false),
                BinaryOp::ShiftRight => (I::I32ShrS, false),
                _ => (I::Unreachable, false),
            }
        };

        self.push(instruction);
        if negate {
            self.push(I::I32Eqz);
        }
    }

    /// `a - trunc(a / b) * b`
    fn emit_f64_rem(&mut self, left: &HirExpr, right: &HirExpr) {
        let a = self.new_local(ValType::F64);
        let b = self.new_local(ValType::F64);
        self.emit_expr(left);
        self.push(Instruction::LocalSet(a));
        self.emit_expr(right);
        self.push(Instruction::LocalSet(b));

        self.push(Instruction::LocalGet(a));
        self.push(Instruction::LocalGet(a));
        self.push(Instruction::LocalGet(b));
        self.push(Instruction::F64Div);
        self.push(Instruction::F64Trunc);
        self.push(Instruction::LocalGet(b));
        self.push(Instruction::F64Mul);
        self.push(Instruction::F64Sub);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::bind_program;
    use crate::parser::parse;

    fn generate(source: &str) -> CodegenResult {
        let parsed = parse(source);
        assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
        let bound = bind_program(&parsed.program);
        assert!(bound.diagnostics.is_empty(), "{:?}", bound.diagnostics);
        generate_wasm(&bound.program)
    }

    #[test]
    fn reports_missing_entry_point() {
        for source in [
            "helper : i32 () { return 1 }",
            "main : void () { }",
            "main : i32 (x : i32) { return x }",
        ] {
            let result = generate(source);
            assert!(result.artifact.is_none(), "{source}");
            let codes: Vec<_> = result.diagnostics.iter().map(|d| d.code).collect();
            assert_eq!(codes, ["EMT001"], "{source}");
        }
    }

    #[test]
    fn lays_out_imports_functions_and_initializer() {
        let result = generate(
            "limit : i32 = 10
             helper : i32 (x : i32) { return x + limit }
             main : i32 () { return helper(1) }",
        );
        let artifact = result.artifact.expect("artifact");
        assert_eq!(artifact.globals, ["limit"]);
        assert_eq!(artifact.functions, ["helper", "main"]);
        assert_eq!(artifact.entry_point, 3);
        assert_eq!(artifact.initializer, Some(4));
        assert_eq!(&artifact.wasm[..4], b"\0asm");
    }

    #[test]
    fn call_to_function_without_index_traps() {
        let mut symbols = SymbolTable::new();
        let ghost = symbols.add_function(FunctionSymbol {
            name: "ghost".to_string(),
            parameters: Vec::new(),
            return_type: Type::I32,
            builtin: None,
        });
        let main = symbols.add_function(FunctionSymbol {
            name: "main".to_string(),
            parameters: Vec::new(),
            return_type: Type::I32,
            builtin: None,
        });
        let call = HirExpr {
            kind: HirExprKind::Call {
                function: ghost,
                args: Vec::new(),
            },
            ty: Type::I32,
            span: Span::empty(0),
        };
        let program = HirProgram {
            symbols,
            globals: Vec::new(),
            functions: [(
                main,
                HirBlock {
                    statements: vec![HirStmt::Return(Some(call))],
                },
            )]
            .into_iter()
            .collect(),
        };

        let artifact = generate_wasm(&program).artifact.expect("artifact");
        wasmparser::Validator::new()
            .validate_all(&artifact.wasm)
            .expect("valid module");

        let (mut calls, mut traps) = (0, 0);
        for payload in wasmparser::Parser::new(0).parse_all(&artifact.wasm) {
            if let wasmparser::Payload::CodeSectionEntry(body) = payload.expect("payload") {
                let mut reader = body.get_operators_reader().expect("operators");
                while !reader.eof() {
                    match reader.read().expect("operator") {
                        wasmparser::Operator::Call { .. } => calls += 1,
                        wasmparser::Operator::Unreachable => traps += 1,
                        _ => {}
                    }
                }
            }
        }
        assert_eq!((calls, traps), (0, 1));
    }

    #[test]
    fn no_initializer_without_globals() {
        let artifact = generate("main : i32 () { return 0 }")
            .artifact
            .expect("artifact");
        assert_eq!(artifact.initializer, None);
        assert_eq!(artifact.entry_point, 2);
    }

    #[test]
    fn interns_strings_once_and_aligned() {
        let mut pool = StringPool::default();
        let hi = pool.intern("hi");
        let again = pool.intern("hi");
        let other = pool.intern("there");
        assert_eq!(hi, STRING_BASE);
        assert_eq!(again, hi);
        assert_eq!(other, STRING_BASE + 8);
        assert_eq!(pool.segments[0].1, [2, 0, 0, 0, b'h', b'i']);
        assert_eq!(pool.end % 4, 0);
    }

    #[test]
    fn dedupes_signatures() {
        let mut section = TypeSection::new();
        let mut types = TypeTable::default();
        let a = types.intern(&mut section, vec![ValType::I32], vec![]);
        let b = types.intern(&mut section, vec![], vec![ValType::I32]);
        let c = types.intern(&mut section, vec![ValType::I32], vec![]);
        assert_eq!((a, b, c), (0, 1, 0));
    }

    #[test]
    fn save_creates_parent_directories() {
        let artifact = generate("main : i32 () { return 0 }")
            .artifact
            .expect("artifact");
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested/out/program.wasm");
        artifact.save(&path).expect("save");
        assert_eq!(std::fs::read(&path).expect("read back"), artifact.wasm);
    }

    #[test]
    fn save_rejects_paths_without_file_name() {
        let artifact = generate("main : i32 () { return 0 }")
            .artifact
            .expect("artifact");
        let err = artifact.save(Path::new("..")).unwrap_err();
        assert!(matches!(err, CoreError::InvalidArtifactPath(_)));
    }
}
