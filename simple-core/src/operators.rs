//! Operator resolution tables.
//!
//! An operator binds only if the table has an exact entry for the token and
//! the operand types. There are no implicit conversions.

use crate::lexer::TokenKind;
use crate::types::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Identity,
    Negate,
    LogicalNot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    BitAnd,
    BitOr,
    BitXor,
    ShiftLeft,
    ShiftRight,
    LogicalAnd,
    LogicalOr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnaryOperator {
    pub token: TokenKind,
    pub op: UnaryOp,
    pub operand: Type,
    pub result: Type,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryOperator {
    pub token: TokenKind,
    pub op: BinaryOp,
    pub left: Type,
    pub right: Type,
    pub result: Type,
}

const fn unary(token: TokenKind, op: UnaryOp, operand: Type, result: Type) -> UnaryOperator {
    UnaryOperator {
        token,
        op,
        operand,
        result,
    }
}

/// Entry whose operands share one type.
const fn binary(token: TokenKind, op: BinaryOp, operands: Type, result: Type) -> BinaryOperator {
    BinaryOperator {
        token,
        op,
        left: operands,
        right: operands,
        result,
    }
}

static UNARY_OPERATORS: &[UnaryOperator] = &[
    unary(TokenKind::Plus, UnaryOp::Identity, Type::I32, Type::I32),
    unary(TokenKind::Minus, UnaryOp::Negate, Type::I32, Type::I32),
    unary(TokenKind::Plus, UnaryOp::Identity, Type::F64, Type::F64),
    unary(TokenKind::Minus, UnaryOp::Negate, Type::F64, Type::F64),
    unary(TokenKind::Bang, UnaryOp::LogicalNot, Type::Bool, Type::Bool),
];

static BINARY_OPERATORS: &[BinaryOperator] = &[
    // i32 arithmetic
    binary(TokenKind::Plus, BinaryOp::Add, Type::I32, Type::I32),
    binary(TokenKind::Minus, BinaryOp::Sub, Type::I32, Type::I32),
    binary(TokenKind::Star, BinaryOp::Mul, Type::I32, Type::I32),
    binary(TokenKind::Slash, BinaryOp::Div, Type::I32, Type::I32),
    binary(TokenKind::Percent, BinaryOp::Rem, Type::I32, Type::I32),
    // f64 arithmetic
    binary(TokenKind::Plus, BinaryOp::Add, Type::F64, Type::F64),
    binary(TokenKind::Minus, BinaryOp::Sub, Type::F64, Type::F64),
    binary(TokenKind::Star, BinaryOp::Mul, Type::F64, Type::F64),
    binary(TokenKind::Slash, BinaryOp::Div, Type::F64, Type::F64),
    binary(TokenKind::Percent, BinaryOp::Rem, Type::F64, Type::F64),
    // i32 comparisons
    binary(TokenKind::EqualEqual, BinaryOp::Equal, Type::I32, Type::Bool),
    binary(TokenKind::BangEqual, BinaryOp::NotEqual, Type::I32, Type::Bool),
    binary(TokenKind::Less, BinaryOp::Less, Type::I32, Type::Bool),
    binary(TokenKind::LessEqual, BinaryOp::LessEqual, Type::I32, Type::Bool),
    binary(TokenKind::Greater, BinaryOp::Greater, Type::I32, Type::Bool),
    binary(TokenKind::GreaterEqual, BinaryOp::GreaterEqual, Type::I32, Type::Bool),
    // f64 comparisons
    binary(TokenKind::EqualEqual, BinaryOp::Equal, Type::F64, Type::Bool),
    binary(TokenKind::BangEqual, BinaryOp::NotEqual, Type::F64, Type::Bool),
    binary(TokenKind::Less, BinaryOp::Less, Type::F64, Type::Bool),
    binary(TokenKind::LessEqual, BinaryOp::LessEqual, Type::F64, Type::Bool),
    binary(TokenKind::Greater, BinaryOp::Greater, Type::F64, Type::Bool),
    binary(TokenKind::GreaterEqual, BinaryOp::GreaterEqual, Type::F64, Type::Bool),
    // bool and char equality
    binary(TokenKind::EqualEqual, BinaryOp::Equal, Type::Bool, Type::Bool),
    binary(TokenKind::BangEqual, BinaryOp::NotEqual, Type::Bool, Type::Bool),
    binary(TokenKind::EqualEqual, BinaryOp::Equal, Type::Char, Type::Bool),
    binary(TokenKind::BangEqual, BinaryOp::NotEqual, Type::Char, Type::Bool),
    // logical
    binary(TokenKind::AmpAmp, BinaryOp::LogicalAnd, Type::Bool, Type::Bool),
    binary(TokenKind::PipePipe, BinaryOp::LogicalOr, Type::Bool, Type::Bool),
    // i32 bitwise
    binary(TokenKind::Amp, BinaryOp::BitAnd, Type::I32, Type::I32),
    binary(TokenKind::Pipe, BinaryOp::BitOr, Type::I32, Type::I32),
    binary(TokenKind::Caret, BinaryOp::BitXor, Type::I32, Type::I32),
    binary(TokenKind::LessLess, BinaryOp::ShiftLeft, Type::I32, Type::I32),
    binary(TokenKind::GreaterGreater, BinaryOp::ShiftRight, Type::I32, Type::I32),
];

pub fn bind_unary(token: TokenKind, operand: Type) -> Option<UnaryOperator> {
    UNARY_OPERATORS
        .iter()
        .find(|entry| entry.token == token && entry.operand == operand)
        .copied()
}

pub fn bind_binary(token: TokenKind, left: Type, right: Type) -> Option<BinaryOperator> {
    BINARY_OPERATORS
        .iter()
        .find(|entry| entry.token == token && entry.left == left && entry.right == right)
        .copied()
}
