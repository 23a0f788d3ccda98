//! Host-provided functions visible from Simple code.
//!
//! The binder declares these in the global scope before any user symbol;
//! the code generator lowers calls to them as wasm imports from the `env`
//! module.

use crate::types::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// `print(value: string): void`
    Print,
    /// `println(value: string): void`
    Println,
}

/// Metadata about a single builtin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinDescriptor {
    pub builtin: Builtin,
    /// Name at the language level, also the wasm import field name.
    pub name: &'static str,
    pub parameters: &'static [(&'static str, Type)],
    pub return_type: Type,
}

/// Every builtin, in declaration order. Import indices follow this order.
pub const BUILTINS: &[BuiltinDescriptor] = &[
    BuiltinDescriptor {
        builtin: Builtin::Print,
        name: "print",
        parameters: &[("value", Type::String)],
        return_type: Type::Void,
    },
    BuiltinDescriptor {
        builtin: Builtin::Println,
        name: "println",
        parameters: &[("value", Type::String)],
        return_type: Type::Void,
    },
];

/// Wasm module name every builtin is imported from.
pub const HOST_MODULE: &str = "env";

impl Builtin {
    pub fn descriptor(self) -> &'static BuiltinDescriptor {
        match self {
            Builtin::Print => &BUILTINS[0],
            Builtin::Println => &BUILTINS[1],
        }
    }

    /// Function index of the wasm import for this builtin.
    pub fn import_index(self) -> u32 {
        match self {
            Builtin::Print => 0,
            Builtin::Println => 1,
        }
    }
}
