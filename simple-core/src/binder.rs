//! Binder: name resolution and type checking.
//!
//! Binding runs in two passes over the top-level declarations. The first
//! declares every global variable and function so that bodies may refer to
//! symbols declared later in the file. The second binds global
//! initializers and function bodies into HIR.
//!
//! Every error is reported as a diagnostic and replaced by an
//! `Error`-typed placeholder. Nothing in here fails.

use std::collections::{BTreeMap, HashSet};

use log::{debug, trace};

use crate::ast::{
    self, Assignment, Block, ClauseGuard, Declaration, Expr, ExprKind, ForStatement, IfChain,
    ProcedureDeclaration, ReturnStatement, Stmt, VariableDeclaration,
};
use crate::builtins::BUILTINS;
use crate::diagnostic::{Diagnostic, DiagnosticBag};
use crate::hir::{Constant, HirBlock, HirExpr, HirExprKind, HirIfClause, HirProgram, HirStmt};
use crate::lexer::{LiteralValue, Token, TokenKind};
use crate::operators::{bind_binary, bind_unary};
use crate::scope::ScopeChain;
use crate::span::Span;
use crate::symbols::{
    FunctionId, FunctionSymbol, Symbol, SymbolTable, VariableId, VariableKind, VariableSymbol,
};
use crate::types::Type;

#[derive(Debug)]
pub struct BindResult {
    pub program: HirProgram,
    pub diagnostics: Vec<Diagnostic>,
}

/// Bind a parsed program.
pub fn bind_program(program: &ast::Program) -> BindResult {
    let mut binder = Binder::new();

    // Pass 1: declare.
    let mut declared = Vec::new();
    for declaration in &program.declarations {
        match declaration {
            Declaration::Variable(decl) => {
                if let Some(variable) = binder.declare_global(decl) {
                    declared.push((declaration, Symbol::Variable(variable)));
                }
            }
            Declaration::Procedure(decl) => {
                if let Some(function) = binder.declare_function(decl) {
                    declared.push((declaration, Symbol::Function(function)));
                }
            }
        }
    }

    trace!(
        "global scope: {:?}",
        binder
            .scopes
            .current_symbols()
            .map(|(name, _)| name)
            .collect::<Vec<_>>()
    );

    // Pass 2: bind initializers and bodies.
    let mut globals = Vec::new();
    let mut functions = BTreeMap::new();
    for (declaration, symbol) in declared {
        match (declaration, symbol) {
            (Declaration::Variable(decl), Symbol::Variable(variable)) => {
                let initializer = binder.bind_expr(&decl.initializer);
                let ty = binder.symbols.variable(variable).ty;
                if !ty.accepts(initializer.ty) {
                    binder.diagnostics.report(
                        "BND001",
                        decl.initializer.span,
                        "Initializer type does not match variable type.",
                    );
                }
                globals.push(HirStmt::VariableDeclaration {
                    variable,
                    initializer,
                });
            }
            (Declaration::Procedure(decl), Symbol::Function(function)) => {
                let body = binder.bind_function_body(function, decl);
                functions.insert(function, body);
            }
            _ => {}
        }
    }

    debug!(
        "bound {} globals and {} functions with {} diagnostics",
        globals.len(),
        functions.len(),
        binder.diagnostics.len()
    );

    BindResult {
        program: HirProgram {
            symbols: binder.symbols,
            globals,
            functions,
        },
        diagnostics: binder.diagnostics.into_vec(),
    }
}

struct Binder {
    symbols: SymbolTable,
    scopes: ScopeChain,
    diagnostics: DiagnosticBag,
    current_function: Option<FunctionId>,
    loop_depth: u32,
}

impl Binder {
    fn new() -> Self {
        let mut binder = Binder {
            symbols: SymbolTable::new(),
            scopes: ScopeChain::new(),
            diagnostics: DiagnosticBag::new(),
            current_function: None,
            loop_depth: 0,
        };
        binder.declare_builtins();
        binder
    }

    fn declare_builtins(&mut self) {
        for descriptor in BUILTINS {
            let parameters = descriptor
                .parameters
                .iter()
                .enumerate()
                .map(|(ordinal, &(name, ty))| {
                    self.symbols.add_variable(VariableSymbol {
                        name: name.to_string(),
                        ty,
                        read_only: true,
                        kind: VariableKind::Parameter {
                            ordinal: ordinal as u32,
                        },
                    })
                })
                .collect();
            let function = self.symbols.add_function(FunctionSymbol {
                name: descriptor.name.to_string(),
                parameters,
                return_type: descriptor.return_type,
                builtin: Some(descriptor.builtin),
            });
            self.scopes
                .declare(descriptor.name, Symbol::Function(function));
        }
    }

    // -----------------------------------------------------------------
    // Declarations
    // -----------------------------------------------------------------

    fn declare_global(&mut self, decl: &VariableDeclaration) -> Option<VariableId> {
        let name = &decl.name.text;
        let ty = self.bind_storage_type(&decl.type_name, name);
        if self.scopes.lookup_current(name).is_some() {
            self.diagnostics.report(
                "BND002",
                decl.name.span,
                format!("Variable '{name}' already declared."),
            );
            return None;
        }

        let variable = self.symbols.add_variable(VariableSymbol {
            name: name.clone(),
            ty,
            read_only: decl.is_read_only(),
            kind: VariableKind::Global,
        });
        self.scopes.declare(name, Symbol::Variable(variable));
        Some(variable)
    }

    fn declare_function(&mut self, decl: &ProcedureDeclaration) -> Option<FunctionId> {
        let name = &decl.name.text;

        let mut seen = HashSet::new();
        let mut parameters = Vec::with_capacity(decl.parameters.len());
        for (ordinal, param) in decl.parameters.iter().enumerate() {
            let param_name = &param.name.text;
            if !seen.insert(param_name.as_str()) {
                self.diagnostics.report(
                    "BND022",
                    param.name.span,
                    format!("Parameter '{param_name}' already declared."),
                );
            }
            let ty = self.bind_storage_type(&param.type_name, param_name);
            parameters.push(self.symbols.add_variable(VariableSymbol {
                name: param_name.clone(),
                ty,
                read_only: param.is_read_only(),
                kind: VariableKind::Parameter {
                    ordinal: ordinal as u32,
                },
            }));
        }
        let return_type = self.bind_type(&decl.return_type);

        if self.scopes.lookup_current(name).is_some() {
            self.diagnostics.report(
                "BND003",
                decl.name.span,
                format!("Procedure '{name}' already declared."),
            );
            return None;
        }

        let function = self.symbols.add_function(FunctionSymbol {
            name: name.clone(),
            parameters,
            return_type,
            builtin: None,
        });
        self.scopes.declare(name, Symbol::Function(function));
        Some(function)
    }

    fn bind_function_body(&mut self, function: FunctionId, decl: &ProcedureDeclaration) -> HirBlock {
        let previous = self.current_function.replace(function);
        self.scopes.push();

        let parameters = self.symbols.function(function).parameters.clone();
        for param in parameters {
            let name = self.symbols.variable(param).name.clone();
            // Duplicates were reported while declaring the function.
            self.scopes.declare(&name, Symbol::Variable(param));
        }
        let body = self.bind_block(&decl.body);

        self.scopes.pop();
        self.current_function = previous;
        body
    }

    fn bind_type(&mut self, type_name: &Token) -> Type {
        match Type::from_name(&type_name.text) {
            Some(ty) => ty,
            None => {
                self.diagnostics.report(
                    "BND021",
                    type_name.span,
                    format!("Unknown type '{}'.", type_name.text),
                );
                Type::Error
            }
        }
    }

    /// Type of a variable or parameter; `void` is rejected.
    fn bind_storage_type(&mut self, type_name: &Token, name: &str) -> Type {
        match self.bind_type(type_name) {
            Type::Void => {
                self.diagnostics.report(
                    "BND023",
                    type_name.span,
                    format!("'{name}' cannot have type 'void'."),
                );
                Type::Error
            }
            ty => ty,
        }
    }

    // -----------------------------------------------------------------
    // Statements
    // -----------------------------------------------------------------

    fn bind_block(&mut self, block: &Block) -> HirBlock {
        self.scopes.push();
        let statements = block
            .statements
            .iter()
            .map(|stmt| self.bind_stmt(stmt))
            .collect();
        self.scopes.pop();
        HirBlock { statements }
    }

    fn bind_stmt(&mut self, stmt: &Stmt) -> HirStmt {
        match stmt {
            Stmt::Block(block) => HirStmt::Block(self.bind_block(block)),
            Stmt::VariableDeclaration(decl) => self.bind_local_declaration(decl),
            Stmt::Assignment(assign) => self.bind_assignment(assign),
            Stmt::Expression(expr) => HirStmt::Expression(self.bind_expr(expr)),
            Stmt::Return(ret) => self.bind_return(ret),
            Stmt::If(stmt) => {
                let condition = self.bind_condition(&stmt.condition, "BND013", "If");
                HirStmt::If {
                    condition,
                    body: self.bind_block(&stmt.body),
                }
            }
            Stmt::IfChain(chain) => self.bind_if_chain(chain),
            Stmt::While(stmt) => {
                let condition = self.bind_condition(&stmt.condition, "BND033", "While");
                let body = self.bind_loop_body(&stmt.body);
                HirStmt::While { condition, body }
            }
            Stmt::For(stmt) => self.bind_for(stmt),
            Stmt::Break(token) => {
                if self.loop_depth == 0 {
                    self.diagnostics.report(
                        "BND035",
                        token.span,
                        "break is only valid inside a loop.",
                    );
                }
                HirStmt::Break
            }
            Stmt::Skip(token) => {
                if self.loop_depth == 0 {
                    self.diagnostics.report(
                        "BND036",
                        token.span,
                        "skip is only valid inside a loop.",
                    );
                }
                HirStmt::Skip
            }
        }
    }

    fn bind_local_declaration(&mut self, decl: &VariableDeclaration) -> HirStmt {
        let name = &decl.name.text;
        let ty = self.bind_storage_type(&decl.type_name, name);
        let variable = self.symbols.add_variable(VariableSymbol {
            name: name.clone(),
            ty,
            read_only: decl.is_read_only(),
            kind: VariableKind::Local,
        });

        // Declared before the initializer is bound, so the initializer sees it.
        if !self.scopes.declare(name, Symbol::Variable(variable)) {
            self.diagnostics.report(
                "BND004",
                decl.name.span,
                format!("Variable '{name}' already declared."),
            );
        }
        let initializer = self.bind_expr(&decl.initializer);
        if !ty.accepts(initializer.ty) {
            self.diagnostics.report(
                "BND005",
                decl.initializer.span,
                "Initializer type does not match variable type.",
            );
        }

        HirStmt::VariableDeclaration {
            variable,
            initializer,
        }
    }

    fn bind_assignment(&mut self, assign: &Assignment) -> HirStmt {
        let name = &assign.target.text;
        let Some(Symbol::Variable(variable)) = self.scopes.lookup(name) else {
            self.diagnostics.report(
                "BND006",
                assign.target.span,
                format!("Variable '{name}' is not declared."),
            );
            return HirStmt::Expression(HirExpr::error(assign.span));
        };

        let symbol = self.symbols.variable(variable);
        let (read_only, ty) = (symbol.read_only, symbol.ty);
        if read_only {
            self.diagnostics.report(
                "BND007",
                assign.target.span,
                format!("Cannot assign to read-only variable '{name}'."),
            );
        }
        if assign.operator.kind != TokenKind::Equal {
            self.diagnostics.report(
                "BND008",
                assign.operator.span,
                format!(
                    "Compound assignment '{}' is not supported; use '='.",
                    assign.operator.text
                ),
            );
        }

        let value = self.bind_expr(&assign.value);
        if !ty.accepts(value.ty) {
            self.diagnostics
                .report("BND009", assign.value.span, "Assignment type mismatch.");
        }

        HirStmt::Assignment { variable, value }
    }

    fn bind_return(&mut self, ret: &ReturnStatement) -> HirStmt {
        let expected = self
            .current_function
            .map(|function| self.symbols.function(function).return_type)
            .unwrap_or(Type::Void);

        let Some(expr) = &ret.value else {
            if !expected.is_void() && !expected.is_error() {
                self.diagnostics
                    .report("BND010", ret.span, "Return expression required.");
            }
            return HirStmt::Return(None);
        };

        let value = self.bind_expr(expr);
        if expected.is_void() {
            self.diagnostics.report(
                "BND011",
                expr.span,
                "Return expression not allowed in void procedure.",
            );
        } else if !expected.accepts(value.ty) {
            self.diagnostics
                .report("BND012", expr.span, "Return type mismatch.");
        }

        HirStmt::Return(Some(value))
    }

    fn bind_if_chain(&mut self, chain: &IfChain) -> HirStmt {
        let mut clauses = Vec::with_capacity(chain.clauses.len());
        let mut saw_default = false;

        for clause in &chain.clauses {
            let condition = match &clause.guard {
                ClauseGuard::Default(_) => {
                    if saw_default {
                        self.diagnostics.report(
                            "BND030",
                            clause.span,
                            "Only one default clause is allowed.",
                        );
                    }
                    saw_default = true;
                    None
                }
                ClauseGuard::Condition(expr) => {
                    if saw_default {
                        self.diagnostics.report(
                            "BND031",
                            clause.span,
                            "Default clause must be last.",
                        );
                    }
                    Some(self.bind_condition(expr, "BND032", "If-else chain"))
                }
            };
            clauses.push(HirIfClause {
                condition,
                body: self.bind_block(&clause.body),
            });
        }

        HirStmt::IfChain { clauses }
    }

    fn bind_for(&mut self, stmt: &ForStatement) -> HirStmt {
        self.scopes.push();

        let initializer = stmt
            .initializer
            .as_deref()
            .map(|init| Box::new(self.bind_stmt(init)));

        let condition = match &stmt.condition {
            Some(expr) => self.bind_condition(expr, "BND034", "For"),
            None => HirExpr::literal(Constant::Bool(true), stmt.second_semi.span),
        };

        let increment = stmt
            .increment
            .as_deref()
            .map(|incr| Box::new(self.bind_stmt(incr)));
        let body = self.bind_loop_body(&stmt.body);

        self.scopes.pop();

        HirStmt::For {
            initializer,
            condition,
            increment,
            body,
        }
    }

    fn bind_loop_body(&mut self, body: &Block) -> HirBlock {
        self.loop_depth += 1;
        let body = self.bind_block(body);
        self.loop_depth -= 1;
        body
    }

    fn bind_condition(&mut self, expr: &Expr, code: &'static str, construct: &str) -> HirExpr {
        let condition = self.bind_expr(expr);
        if !Type::Bool.accepts(condition.ty) {
            self.diagnostics.report(
                code,
                expr.span,
                format!("{construct} condition must be bool, found '{}'.", condition.ty),
            );
        }
        condition
    }

    // -----------------------------------------------------------------
    // Expressions
    // -----------------------------------------------------------------

    fn bind_expr(&mut self, expr: &Expr) -> HirExpr {
        match &expr.kind {
            ExprKind::Literal(token) => bind_literal(token),
            ExprKind::Name(token) => self.bind_name(token),
            ExprKind::Unary { operator, operand } => {
                let operand = self.bind_expr(operand);
                if operand.ty.is_error() {
                    return HirExpr::error(expr.span);
                }
                let Some(op) = bind_unary(operator.kind, operand.ty) else {
                    self.diagnostics.report(
                        "BND015",
                        operator.span,
                        format!(
                            "Unary operator '{}' is not defined for type '{}'.",
                            operator.text, operand.ty
                        ),
                    );
                    return HirExpr::error(expr.span);
                };
                HirExpr {
                    kind: HirExprKind::Unary {
                        op,
                        operand: Box::new(operand),
                    },
                    ty: op.result,
                    span: expr.span,
                }
            }
            ExprKind::Binary {
                left,
                operator,
                right,
            } => {
                let left = self.bind_expr(left);
                let right = self.bind_expr(right);
                if left.ty.is_error() || right.ty.is_error() {
                    return HirExpr::error(expr.span);
                }
                let Some(op) = bind_binary(operator.kind, left.ty, right.ty) else {
                    self.diagnostics.report(
                        "BND016",
                        operator.span,
                        format!(
                            "Binary operator '{}' is not defined for types '{}' and '{}'.",
                            operator.text, left.ty, right.ty
                        ),
                    );
                    return HirExpr::error(expr.span);
                };
                HirExpr {
                    kind: HirExprKind::Binary {
                        left: Box::new(left),
                        op,
                        right: Box::new(right),
                    },
                    ty: op.result,
                    span: expr.span,
                }
            }
            ExprKind::Call { callee, args, .. } => self.bind_call(expr.span, callee, args),
            ExprKind::Parenthesized { inner, .. } => self.bind_expr(inner),
        }
    }

    fn bind_name(&mut self, token: &Token) -> HirExpr {
        match self.scopes.lookup(&token.text) {
            Some(Symbol::Variable(variable)) => HirExpr {
                kind: HirExprKind::Variable(variable),
                ty: self.symbols.variable(variable).ty,
                span: token.span,
            },
            _ => {
                self.diagnostics.report(
                    "BND014",
                    token.span,
                    format!("Unknown identifier '{}'.", token.text),
                );
                HirExpr::error(token.span)
            }
        }
    }

    fn bind_call(&mut self, span: Span, callee: &Expr, args: &[Expr]) -> HirExpr {
        let ExprKind::Name(name) = &callee.kind else {
            self.diagnostics.report(
                "BND017",
                callee.span,
                "Only calls to a named procedure are supported.",
            );
            return HirExpr::error(span);
        };

        let Some(Symbol::Function(function)) = self.scopes.lookup(&name.text) else {
            self.diagnostics.report(
                "BND018",
                callee.span,
                format!("Unknown procedure '{}'.", name.text),
            );
            return HirExpr::error(span);
        };

        let parameter_types = self.symbols.parameter_types(function);
        if args.len() != parameter_types.len() {
            self.diagnostics.report(
                "BND019",
                callee.span,
                format!(
                    "Procedure '{}' expects {} argument(s) but got {}.",
                    name.text,
                    parameter_types.len(),
                    args.len()
                ),
            );
        }

        let mut bound_args = Vec::with_capacity(args.len());
        for (index, arg) in args.iter().enumerate() {
            let bound = self.bind_expr(arg);
            if let Some(&expected) = parameter_types.get(index) {
                if !expected.accepts(bound.ty) {
                    self.diagnostics.report(
                        "BND020",
                        arg.span,
                        format!(
                            "Argument type mismatch: expected '{expected}', found '{}'.",
                            bound.ty
                        ),
                    );
                }
            }
            bound_args.push(bound);
        }

        HirExpr {
            kind: HirExprKind::Call {
                function,
                args: bound_args,
            },
            ty: self.symbols.function(function).return_type,
            span,
        }
    }
}

fn bind_literal(token: &Token) -> HirExpr {
    let constant = match &token.value {
        // Integer literals are 64-bit in source and truncate to i32.
        Some(LiteralValue::Int(value)) => Constant::I32(*value as i32),
        Some(LiteralValue::Float(value)) => Constant::F64(*value),
        Some(LiteralValue::Bool(value)) => Constant::Bool(*value),
        Some(LiteralValue::String(value)) => Constant::String(value.clone()),
        Some(LiteralValue::Char(value)) => Constant::Char(*value),
        None => return HirExpr::error(token.span),
    };
    HirExpr::literal(constant, token.span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn bind_source(source: &str) -> BindResult {
        let parsed = parse(source);
        assert!(
            parsed.diagnostics.is_empty(),
            "parse diagnostics: {:?}",
            parsed.diagnostics
        );
        bind_program(&parsed.program)
    }

    fn codes(source: &str) -> Vec<&'static str> {
        bind_source(source)
            .diagnostics
            .iter()
            .map(|d| d.code)
            .collect()
    }

    #[test]
    fn binds_print_call_without_diagnostics() {
        let result = bind_source("main : i32 () { print(\"hi\"); return 0 }");
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        assert_eq!(result.program.functions.len(), 1);
    }

    #[test]
    fn global_initializer_mismatch() {
        assert_eq!(codes("x : i32 = 3.14"), ["BND001"]);
    }

    #[test]
    fn redeclarations_are_reported() {
        assert_eq!(codes("x : i32 = 1\nx : i32 = 2"), ["BND002"]);
        assert_eq!(codes("f : void () { }\nf : void () { }"), ["BND003"]);
        assert_eq!(codes("print : void (s : string) { }"), ["BND003"]);
        assert_eq!(codes("f : void (a : i32, a : i32) { }"), ["BND022"]);
        assert_eq!(
            codes("main : i32 () { x : i32 = 1; x : i32 = 2; return x }"),
            ["BND004"]
        );
    }

    #[test]
    fn duplicate_is_excluded_from_second_pass() {
        let result = bind_source("x : i32 = 1\nx : i32 = true");
        let codes: Vec<_> = result.diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(codes, ["BND002"]);
        assert_eq!(result.program.globals.len(), 1);
    }

    #[test]
    fn functions_may_be_called_before_their_declaration() {
        let result = bind_source(
            "main : i32 () { return twice(21) }
             twice : i32 (n : i32) { return n * 2 }",
        );
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn assignment_rules() {
        assert_eq!(codes("f : void () { y = 1 }"), ["BND006"]);
        assert_eq!(codes("f : void () { y :: i32 = 1; y = 2 }"), ["BND007"]);
        assert_eq!(codes("f : void () { y : i32 = 1; y += 2 }"), ["BND008"]);
        assert_eq!(codes("f : void () { y : i32 = 1; y = true }"), ["BND009"]);
    }

    #[test]
    fn return_rules() {
        assert_eq!(codes("f : i32 () { return }"), ["BND010"]);
        assert_eq!(codes("f : void () { return 1 }"), ["BND011"]);
        assert_eq!(codes("f : i32 () { return 1.5 }"), ["BND012"]);
        assert!(codes("f : void () { return }").is_empty());
    }

    #[test]
    fn conditions_must_be_bool() {
        assert_eq!(codes("f : void () { 1 { } }"), ["BND013"]);
        assert_eq!(codes("f : void () { while 1 { } }"), ["BND033"]);
        assert_eq!(codes("f : void () { for (; 1; ) { } }"), ["BND034"]);
        assert_eq!(codes("f : void () { |> 1 { } }"), ["BND032"]);
        assert!(codes("f : void () { for (;;) { break } }").is_empty());
    }

    #[test]
    fn if_chain_default_rules() {
        assert_eq!(
            codes("f : void () { |> default { } |> default { } }"),
            ["BND030"]
        );
        assert_eq!(
            codes("f : void () { |> default { } |> true { } }"),
            ["BND031"]
        );
    }

    #[test]
    fn loop_control_outside_loops() {
        assert_eq!(codes("f : void () { break }"), ["BND035"]);
        assert_eq!(codes("f : void () { skip }"), ["BND036"]);
        assert!(codes("f : void () { while true { skip } }").is_empty());
    }

    #[test]
    fn loop_depth_does_not_leak_into_nested_functions() {
        assert_eq!(
            codes("f : void () { while true { } break }"),
            ["BND035"]
        );
    }

    #[test]
    fn expression_rules() {
        assert_eq!(codes("f : void () { print(x) }"), ["BND014"]);
        assert_eq!(codes("x : bool = !1"), ["BND015"]);
        assert_eq!(codes("x : i32 = 1 + 2.0"), ["BND016"]);
        assert_eq!(codes("f : void () { (print)(\"a\") }"), ["BND017"]);
        assert_eq!(codes("f : void () { g() }"), ["BND018"]);
        assert_eq!(codes("f : void () { print() }"), ["BND019"]);
        assert_eq!(codes("f : void () { print(1) }"), ["BND020"]);
        assert_eq!(codes("x : i64 = 1"), ["BND021"]);
        assert_eq!(codes("x : void = 1"), ["BND023"]);
    }

    #[test]
    fn error_type_absorbs_follow_up_diagnostics() {
        // Only the unknown name is reported, not the '+' or the mismatch.
        assert_eq!(codes("x : i32 = y + 1"), ["BND014"]);
        assert_eq!(codes("x : foo = 1.5"), ["BND021"]);
    }

    #[test]
    fn block_scopes_allow_shadowing() {
        let result = bind_source(
            "main : i32 () {
                x : i32 = 1
                { x : f64 = 2.0 }
                return x
            }",
        );
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn local_initializer_sees_the_new_variable() {
        assert!(codes("main : i32 () { x : f64 = 1.0 { x : i32 = x } return 0 }").is_empty());
        assert!(codes("main : i32 () { x : i32 = x; return x }").is_empty());

        let result = bind_source("f : void () { y : i32 = y }");
        let body = result.program.functions.values().next().expect("one body");
        let HirStmt::VariableDeclaration {
            variable,
            initializer,
        } = &body.statements[0]
        else {
            panic!("expected variable declaration");
        };
        assert_eq!(initializer.kind, HirExprKind::Variable(*variable));
    }

    #[test]
    fn for_initializer_is_scoped_to_the_loop() {
        assert_eq!(
            codes("f : i32 () { for (i : i32 = 0; i < 3; i = i + 1) { } return i }"),
            ["BND014"]
        );
    }

    #[test]
    fn missing_for_condition_is_true() {
        let result = bind_source("f : void () { for (;;) { break } }");
        let body = result.program.functions.values().next().expect("one body");
        let HirStmt::For { condition, .. } = &body.statements[0] else {
            panic!("expected for statement");
        };
        assert_eq!(condition.kind, HirExprKind::Literal(Constant::Bool(true)));
    }

    #[test]
    fn binding_is_idempotent() {
        let parsed = parse(
            "count : i32 = 3
             main : i32 () {
                 total : i32 = 0
                 for (i : i32 = 0; i < count; i = i + 1) { total = total + i }
                 return total + missing
             }",
        );
        let first = bind_program(&parsed.program);
        let second = bind_program(&parsed.program);
        assert_eq!(first.diagnostics, second.diagnostics);
        assert_eq!(first.program, second.program);
    }
}
