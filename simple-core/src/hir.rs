//! Bound (typed) tree produced by the binder.
//!
//! HIR mirrors the syntax tree, but names are resolved to symbols and every
//! expression carries its type. The code generator only ever sees HIR.

use std::collections::BTreeMap;

use crate::operators::{BinaryOperator, UnaryOperator};
use crate::span::Span;
use crate::symbols::{FunctionId, SymbolTable, VariableId};
use crate::types::Type;

/// The output of binding a whole program.
#[derive(Debug, Clone, PartialEq)]
pub struct HirProgram {
    pub symbols: SymbolTable,
    /// Global variable declarations in source order.
    pub globals: Vec<HirStmt>,
    /// Body of every successfully declared user function.
    pub functions: BTreeMap<FunctionId, HirBlock>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HirBlock {
    pub statements: Vec<HirStmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HirStmt {
    Block(HirBlock),
    VariableDeclaration {
        variable: VariableId,
        initializer: HirExpr,
    },
    /// Always plain `=`; compound operators are reported and bound as `=`.
    Assignment {
        variable: VariableId,
        value: HirExpr,
    },
    Expression(HirExpr),
    Return(Option<HirExpr>),
    If {
        condition: HirExpr,
        body: HirBlock,
    },
    IfChain {
        clauses: Vec<HirIfClause>,
    },
    While {
        condition: HirExpr,
        body: HirBlock,
    },
    For {
        initializer: Option<Box<HirStmt>>,
        /// A missing condition is bound as literal `true`.
        condition: HirExpr,
        increment: Option<Box<HirStmt>>,
        body: HirBlock,
    },
    Break,
    Skip,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HirIfClause {
    /// `None` for the default clause.
    pub condition: Option<HirExpr>,
    pub body: HirBlock,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    I32(i32),
    F64(f64),
    Bool(bool),
    String(String),
    Char(char),
}

/// Expression node in HIR.
///
/// `HirExpr` always has a `Type` and a `Span`.
#[derive(Debug, Clone, PartialEq)]
pub struct HirExpr {
    pub kind: HirExprKind,
    pub ty: Type,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HirExprKind {
    Literal(Constant),
    Variable(VariableId),
    Unary {
        op: UnaryOperator,
        operand: Box<HirExpr>,
    },
    Binary {
        left: Box<HirExpr>,
        op: BinaryOperator,
        right: Box<HirExpr>,
    },
    Call {
        function: FunctionId,
        args: Vec<HirExpr>,
    },
    /// Placeholder for anything that failed to bind.
    Error,
}

impl HirExpr {
    pub fn error(span: Span) -> HirExpr {
        HirExpr {
            kind: HirExprKind::Error,
            ty: Type::Error,
            span,
        }
    }

    pub fn literal(constant: Constant, span: Span) -> HirExpr {
        let ty = match &constant {
            Constant::I32(_) => Type::I32,
            Constant::F64(_) => Type::F64,
            Constant::Bool(_) => Type::Bool,
            Constant::String(_) => Type::String,
            Constant::Char(_) => Type::Char,
        };
        HirExpr {
            kind: HirExprKind::Literal(constant),
            ty,
            span,
        }
    }
}
