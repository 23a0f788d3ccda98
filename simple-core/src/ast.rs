//! Syntax tree produced by the parser.
//!
//! Nodes keep the tokens they were parsed from. Every composite node
//! stores the span covering its first and last token or child, so a
//! parent span always contains the spans of its children.

use crate::lexer::{Token, TokenKind};
use crate::span::Span;

/// A whole compilation unit: the top-level declarations in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub declarations: Vec<Declaration>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Variable(VariableDeclaration),
    Procedure(ProcedureDeclaration),
}

impl Declaration {
    pub fn name(&self) -> &Token {
        match self {
            Declaration::Variable(decl) => &decl.name,
            Declaration::Procedure(decl) => &decl.name,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Declaration::Variable(decl) => decl.span,
            Declaration::Procedure(decl) => decl.span,
        }
    }
}

/// `name : type = init` (or `::` for read-only). Used both at top level
/// and as a statement.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    pub name: Token,
    /// `:` or `::`.
    pub marker: Token,
    pub type_name: Token,
    pub equals: Token,
    pub initializer: Expr,
    pub span: Span,
}

impl VariableDeclaration {
    pub fn is_read_only(&self) -> bool {
        self.marker.kind == TokenKind::DoubleColon
    }
}

/// `name : return_type (params) { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureDeclaration {
    pub name: Token,
    pub marker: Token,
    pub return_type: Token,
    pub open_paren: Token,
    pub parameters: Vec<Parameter>,
    pub close_paren: Token,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: Token,
    pub marker: Token,
    pub type_name: Token,
    pub span: Span,
}

impl Parameter {
    pub fn is_read_only(&self) -> bool {
        self.marker.kind == TokenKind::DoubleColon
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub open_brace: Token,
    pub statements: Vec<Stmt>,
    pub close_brace: Token,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Block(Block),
    VariableDeclaration(VariableDeclaration),
    Assignment(Assignment),
    Expression(Expr),
    Return(ReturnStatement),
    /// `cond { ... }`, the implicit if.
    If(IfStatement),
    /// `|> cond { ... } |> default { ... }`
    IfChain(IfChain),
    While(WhileStatement),
    For(ForStatement),
    Break(Token),
    /// `skip`, the continue statement.
    Skip(Token),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Block(block) => block.span,
            Stmt::VariableDeclaration(decl) => decl.span,
            Stmt::Assignment(assign) => assign.span,
            Stmt::Expression(expr) => expr.span,
            Stmt::Return(ret) => ret.span,
            Stmt::If(stmt) => stmt.span,
            Stmt::IfChain(chain) => chain.span,
            Stmt::While(stmt) => stmt.span,
            Stmt::For(stmt) => stmt.span,
            Stmt::Break(token) | Stmt::Skip(token) => token.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub target: Token,
    pub operator: Token,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub keyword: Token,
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub condition: Expr,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfChain {
    pub clauses: Vec<IfClause>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfClause {
    /// The `|>` token.
    pub arrow: Token,
    pub guard: ClauseGuard,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClauseGuard {
    Condition(Expr),
    Default(Token),
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    pub keyword: Token,
    pub condition: Expr,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStatement {
    pub keyword: Token,
    pub open_paren: Token,
    pub initializer: Option<Box<Stmt>>,
    pub first_semi: Token,
    pub condition: Option<Expr>,
    pub second_semi: Token,
    pub increment: Option<Box<Stmt>>,
    pub close_paren: Token,
    pub body: Block,
    pub span: Span,
}

/// Expression node. The span always covers every sub-expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(Token),
    Name(Token),
    Unary {
        operator: Token,
        operand: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        open_paren: Token,
        args: Vec<Expr>,
        close_paren: Token,
    },
    Parenthesized {
        open_paren: Token,
        inner: Box<Expr>,
        close_paren: Token,
    },
}

impl Expr {
    pub fn literal(token: Token) -> Self {
        Expr {
            span: token.span,
            kind: ExprKind::Literal(token),
        }
    }

    pub fn name(token: Token) -> Self {
        Expr {
            span: token.span,
            kind: ExprKind::Name(token),
        }
    }

    pub fn unary(operator: Token, operand: Expr) -> Self {
        Expr {
            span: operator.span.cover(operand.span),
            kind: ExprKind::Unary {
                operator,
                operand: Box::new(operand),
            },
        }
    }

    pub fn binary(left: Expr, operator: Token, right: Expr) -> Self {
        Expr {
            span: left.span.cover(right.span),
            kind: ExprKind::Binary {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            },
        }
    }

    pub fn call(callee: Expr, open_paren: Token, args: Vec<Expr>, close_paren: Token) -> Self {
        Expr {
            span: callee.span.cover(close_paren.span),
            kind: ExprKind::Call {
                callee: Box::new(callee),
                open_paren,
                args,
                close_paren,
            },
        }
    }

    pub fn parenthesized(open_paren: Token, inner: Expr, close_paren: Token) -> Self {
        Expr {
            span: open_paren.span.cover(close_paren.span),
            kind: ExprKind::Parenthesized {
                open_paren,
                inner: Box::new(inner),
                close_paren,
            },
        }
    }

    /// Direct sub-expressions, in source order.
    pub fn children(&self) -> Vec<&Expr> {
        match &self.kind {
            ExprKind::Literal(_) | ExprKind::Name(_) => Vec::new(),
            ExprKind::Unary { operand, .. } => vec![operand],
            ExprKind::Binary { left, right, .. } => vec![left, right],
            ExprKind::Call { callee, args, .. } => {
                let mut children = vec![callee.as_ref()];
                children.extend(args.iter());
                children
            }
            ExprKind::Parenthesized { inner, .. } => vec![inner],
        }
    }
}
