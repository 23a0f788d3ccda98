//! Symbol arena.
//!
//! Every variable, parameter and function the binder declares lives in a
//! [`SymbolTable`]; the bound tree refers to them by id.

use crate::builtins::Builtin;
use crate::types::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionId(pub u32);

/// Anything a name can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Variable(VariableId),
    Function(FunctionId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Global,
    Local,
    /// Position in the owning function's parameter list.
    Parameter { ordinal: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableSymbol {
    pub name: String,
    pub ty: Type,
    pub read_only: bool,
    pub kind: VariableKind,
}

impl VariableSymbol {
    pub fn is_global(&self) -> bool {
        self.kind == VariableKind::Global
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSymbol {
    pub name: String,
    pub parameters: Vec<VariableId>,
    pub return_type: Type,
    /// `Some` for host-provided functions.
    pub builtin: Option<Builtin>,
}

impl FunctionSymbol {
    pub fn is_builtin(&self) -> bool {
        self.builtin.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    variables: Vec<VariableSymbol>,
    functions: Vec<FunctionSymbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    pub fn add_variable(&mut self, symbol: VariableSymbol) -> VariableId {
        let id = VariableId(self.variables.len() as u32);
        self.variables.push(symbol);
        id
    }

    pub fn add_function(&mut self, symbol: FunctionSymbol) -> FunctionId {
        let id = FunctionId(self.functions.len() as u32);
        self.functions.push(symbol);
        id
    }

    pub fn variable(&self, id: VariableId) -> &VariableSymbol {
        &self.variables[id.0 as usize]
    }

    pub fn function(&self, id: FunctionId) -> &FunctionSymbol {
        &self.functions[id.0 as usize]
    }

    /// Type of a parameter list, in declaration order.
    pub fn parameter_types(&self, id: FunctionId) -> Vec<Type> {
        self.function(id)
            .parameters
            .iter()
            .map(|&param| self.variable(param).ty)
            .collect()
    }
}
