//! Core compiler pipeline for the Simple language.
//!
//! The pipeline is:
//!
//!   source text
//!     -> lexer        (tokens)
//!     -> parser       (syntax tree)
//!     -> binder       (scopes, symbols, types -> HIR)
//!     -> codegen_wasm (wasm-encoder)
//!
//! Every phase reports problems as [`Diagnostic`]s and keeps going. Only
//! host failures (I/O) surface as [`CoreError`]. Front ends such as the
//! CLI should go through [`Compilation`] rather than calling the phases
//! one by one.

// ---------------------------------------------------------------------
// Text, diagnostics and errors
// ---------------------------------------------------------------------

pub mod span;
pub mod text;
pub mod diagnostic;
pub mod error;

// ---------------------------------------------------------------------
// Front-end: lexing and parsing
// ---------------------------------------------------------------------

pub mod lexer;
pub mod ast;
pub mod parser;

// ---------------------------------------------------------------------
// Semantic layers: types, symbols, scopes, operators, binding, HIR
// ---------------------------------------------------------------------

pub mod types;
pub mod symbols;
pub mod scope;
pub mod builtins;
pub mod operators;
pub mod hir;
pub mod binder;

// ---------------------------------------------------------------------
// Back-end: code generation and compiler orchestration
// ---------------------------------------------------------------------

pub mod codegen_wasm;
pub mod compiler;

// ---------------------------------------------------------------------
// Public API re-exports
// ---------------------------------------------------------------------

pub use binder::{BindResult, bind_program};
pub use codegen_wasm::{ENTRY_POINT, MEMORY_EXPORT, WasmArtifact, generate_wasm};
pub use compiler::{Compilation, EmitResult, check};
pub use diagnostic::{Diagnostic, DiagnosticBag, Phase};
pub use error::CoreError;
pub use parser::{ParseResult, SyntaxTree, parse};
pub use span::Span;
pub use text::SourceText;
