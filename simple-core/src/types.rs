//! The fixed set of Simple types.
//!
//! There are no user-defined types; `Error` is the placeholder given to
//! anything that failed to bind and is compatible with every other type.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Type {
    I32,
    F64,
    Bool,
    String,
    Char,
    Void,
    /// Absorbing placeholder; never causes a secondary diagnostic.
    Error,
}

impl Type {
    /// Resolve a type name as written in source.
    pub fn from_name(name: &str) -> Option<Type> {
        match name {
            "i32" => Some(Type::I32),
            "f64" => Some(Type::F64),
            "bool" => Some(Type::Bool),
            "string" => Some(Type::String),
            "char" => Some(Type::Char),
            "void" => Some(Type::Void),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Type::I32 => "i32",
            Type::F64 => "f64",
            Type::Bool => "bool",
            Type::String => "string",
            Type::Char => "char",
            Type::Void => "void",
            Type::Error => "?",
        }
    }

    pub fn is_error(self) -> bool {
        self == Type::Error
    }

    pub fn is_void(self) -> bool {
        self == Type::Void
    }

    /// Type equality with `Error` absorbing on either side.
    pub fn accepts(self, other: Type) -> bool {
        self == other || self.is_error() || other.is_error()
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_every_source_name() {
        for ty in [
            Type::I32,
            Type::F64,
            Type::Bool,
            Type::String,
            Type::Char,
            Type::Void,
        ] {
            assert_eq!(Type::from_name(ty.name()), Some(ty));
        }
        assert_eq!(Type::from_name("i64"), None);
        assert_eq!(Type::from_name("?"), None);
    }

    #[test]
    fn error_is_absorbing() {
        assert!(Type::Error.accepts(Type::I32));
        assert!(Type::String.accepts(Type::Error));
        assert!(Type::Bool.accepts(Type::Bool));
        assert!(!Type::I32.accepts(Type::F64));
    }
}
