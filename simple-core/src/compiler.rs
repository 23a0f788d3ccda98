//! Compilation: the entry point tying the phases together.
//!
//! `parse -> bind -> generate`. Code generation only runs when parsing
//! and binding produced no diagnostics at all.

use std::fs;
use std::path::Path;

use log::{debug, info};

use crate::binder::{BindResult, bind_program};
use crate::codegen_wasm::{WasmArtifact, generate_wasm};
use crate::diagnostic::{Diagnostic, DiagnosticBag};
use crate::error::CoreError;
use crate::hir::HirProgram;
use crate::parser::SyntaxTree;
use crate::span::Span;
use crate::text::SourceText;

/// Outcome of [`Compilation::emit`] and [`Compilation::compile_wasm`].
#[derive(Debug)]
pub struct EmitResult {
    pub success: bool,
    pub diagnostics: Vec<Diagnostic>,
    /// Present only when `success` is true.
    pub artifact: Option<WasmArtifact>,
}

/// One source file on its way to a wasm module.
#[derive(Debug)]
pub struct Compilation {
    tree: SyntaxTree,
}

impl Compilation {
    pub fn new(tree: SyntaxTree) -> Self {
        Compilation { tree }
    }

    /// Parse `text` and start a compilation from it.
    pub fn create(text: impl Into<SourceText>) -> Self {
        Compilation::new(SyntaxTree::parse(text))
    }

    /// Read and parse a source file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let text = fs::read_to_string(path.as_ref())?;
        Ok(Compilation::create(text))
    }

    pub fn syntax_tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn text(&self) -> &SourceText {
        &self.tree.text
    }

    /// Parse and bind diagnostics, in that order.
    pub fn check(&self) -> Vec<Diagnostic> {
        self.analyze().1.into_vec()
    }

    /// Bind the tree. Binding is pure, so this can be called repeatedly.
    pub fn bind(&self) -> BindResult {
        bind_program(&self.tree.root)
    }

    /// Generate the module and write it to `path`.
    pub fn emit(&self, path: impl AsRef<Path>) -> EmitResult {
        let path = path.as_ref();
        let mut result = self.compile_wasm();
        let saved = match &result.artifact {
            Some(artifact) => artifact.save(path).map(|()| artifact.wasm.len()),
            None => return result,
        };

        match saved {
            Ok(len) => {
                info!("wrote {len} bytes to {}", path.display());
            }
            Err(err) => {
                result.diagnostics.push(Diagnostic::new(
                    "EMT002",
                    Span::empty(0),
                    format!("Failed to persist artifact: {err}"),
                ));
                result.success = false;
                result.artifact = None;
            }
        }
        result
    }

    /// Generate the module in memory.
    pub fn compile_wasm(&self) -> EmitResult {
        let (program, mut diagnostics) = self.analyze();
        if !diagnostics.is_empty() {
            debug!(
                "skipping code generation: {} diagnostics",
                diagnostics.len()
            );
            return EmitResult {
                success: false,
                diagnostics: diagnostics.into_vec(),
                artifact: None,
            };
        }

        let generated = generate_wasm(&program);
        diagnostics.extend(generated.diagnostics);
        EmitResult {
            success: generated.artifact.is_some() && diagnostics.is_empty(),
            diagnostics: diagnostics.into_vec(),
            artifact: generated.artifact,
        }
    }

    fn analyze(&self) -> (HirProgram, DiagnosticBag) {
        let mut diagnostics = DiagnosticBag::new();
        diagnostics.extend(self.tree.diagnostics.iter().cloned());
        let bound = self.bind();
        diagnostics.extend(bound.diagnostics);
        (bound.program, diagnostics)
    }
}

/// Parse and bind `source`, returning every diagnostic.
pub fn check(source: &str) -> Vec<Diagnostic> {
    Compilation::create(source).check()
}
