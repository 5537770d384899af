//! The static type algebra used by expression inference.
//!
//! `Mixed` is the top type and the conservative answer for everything the
//! resolver cannot narrow. Unions are represented by `Compound`, which is
//! only ever built through [`Type::compound`] so that non-canonical values
//! (duplicates, nested compounds, unions containing `Mixed`) cannot exist.

use super::fqn::Fqn;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub enum Type {
    Mixed,
    Boolean,
    Integer,
    Float,
    String,
    Null,
    Void,
    Callable,
    /// `None` is an anonymous class instance.
    Object(Option<Fqn>),
    Array {
        value: Box<Type>,
        key: Box<Type>,
    },
    /// Unordered set of alternatives. Never empty, never a single element,
    /// never contains `Mixed` or another `Compound`.
    Compound(Vec<Type>),
}

/// `Compound` alternatives are an unordered set; equality ignores order.
impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Type::Object(a), Type::Object(b)) => a == b,
            (
                Type::Array {
                    value: v1,
                    key: k1,
                },
                Type::Array {
                    value: v2,
                    key: k2,
                },
            ) => v1 == v2 && k1 == k2,
            (Type::Compound(a), Type::Compound(b)) => {
                a.len() == b.len() && a.iter().all(|t| b.contains(t))
            }
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl Type {
    pub fn array(value: Type, key: Type) -> Type {
        Type::Array {
            value: Box::new(value),
            key: Box::new(key),
        }
    }

    pub fn object(fqn: Fqn) -> Type {
        Type::Object(Some(fqn))
    }

    /// Normalizing union constructor: flattens nested compounds, drops
    /// duplicates, unwraps single alternatives, and collapses to `Mixed`
    /// when `Mixed` is among the alternatives (or none are given).
    pub fn compound(alternatives: impl IntoIterator<Item = Type>) -> Type {
        let mut flat: Vec<Type> = Vec::new();
        for ty in alternatives {
            match ty {
                Type::Mixed => return Type::Mixed,
                Type::Compound(inner) => {
                    for t in inner {
                        if t == Type::Mixed {
                            return Type::Mixed;
                        }
                        if !flat.contains(&t) {
                            flat.push(t);
                        }
                    }
                }
                other => {
                    if !flat.contains(&other) {
                        flat.push(other);
                    }
                }
            }
        }
        match flat.len() {
            0 => Type::Mixed,
            1 => flat.pop().expect("len checked"),
            _ => Type::Compound(flat),
        }
    }

    /// The class FQN when this type is a named object.
    pub fn object_fqn(&self) -> Option<&Fqn> {
        match self {
            Type::Object(Some(fqn)) => Some(fqn),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Mixed => f.write_str("mixed"),
            Type::Boolean => f.write_str("bool"),
            Type::Integer => f.write_str("int"),
            Type::Float => f.write_str("float"),
            Type::String => f.write_str("string"),
            Type::Null => f.write_str("null"),
            Type::Void => f.write_str("void"),
            Type::Callable => f.write_str("callable"),
            Type::Object(Some(fqn)) => write!(f, "{}", fqn),
            Type::Object(None) => f.write_str("object"),
            Type::Array { value, key } => write!(f, "array<{}, {}>", key, value),
            Type::Compound(types) => {
                for (i, ty) in types.iter().enumerate() {
                    if i > 0 {
                        f.write_str("|")?;
                    }
                    write!(f, "{}", ty)?;
                }
                Ok(())
            }
        }
    }
}
