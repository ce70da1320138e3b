//! The typed value tree FHiCL documents resolve into.
//!
//! A single sum type (`Value`) is threaded through every pipeline stage —
//! the grammar's raw output, the tree builder's partially-resolved tables,
//! and the resolver's final tree all share this type. Matching on the
//! variant drives rendering, comparison, and navigation uniformly.

use std::fmt;

use indexmap::IndexMap;
use num_bigint::BigInt;
use smol_str::SmolStr;

/// An insertion-ordered mapping from name to `Value`.
///
/// Built on `indexmap` rather than a plain `HashMap` because the data model
/// requires stable insertion order (later bindings of the same key replace
/// in place rather than moving to the end) and the output renderer walks
/// keys in source order.
pub type Table = IndexMap<SmolStr, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Pos,
    Neg,
    Unsigned,
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sign::Pos => write!(f, "+"),
            Sign::Neg => write!(f, "-"),
            Sign::Unsigned => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    Local,
    Db,
}

impl fmt::Display for RefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefKind::Local => write!(f, "@local::"),
            RefKind::Db => write!(f, "@db::"),
        }
    }
}

/// A floating-point literal with the source's original digits-after-point
/// precision preserved, so `1.50` round-trips as `1.50`, not `1.5`.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatLit {
    pub value: f64,
    pub precision: u8,
}

impl FloatLit {
    pub fn new(value: f64, precision: u8) -> Self {
        Self { value, precision }
    }
}

impl fmt::Display for FloatLit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.*}", self.precision as usize, self.value)
    }
}

/// The real/imaginary components of a `Complex` value. Each component is
/// either an `Int` or a `Float`, per the `complex = "(" simple "," simple ")"`
/// grammar production.
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    Int(BigInt),
    Float(FloatLit),
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{i}"),
            Number::Float(fl) => write!(f, "{fl}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(BigInt),
    Float(FloatLit),
    /// Verbatim original lexeme, e.g. `"0x1A"`. Conversion to integer is
    /// deferred to the consumer.
    Hex(String),
    /// Canonicalised scientific-notation text: no `+` after `E`; rendered
    /// as a plain integer string if the value is exactly integral.
    Sci(String),
    Complex(Number, Number),
    Infinity(Sign),
    /// Unquoted body — surrounding quotes already stripped.
    Str(String),
    /// Unresolved reference. Never survives past the resolver.
    Ref(RefKind, String),
    Seq(Vec<Value>),
    Table(Table),
}

impl Value {
    pub fn is_ref(&self) -> bool {
        matches!(self, Value::Ref(..))
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_table_mut(&mut self) -> Option<&mut Table> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_seq_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Seq(s) => Some(s),
            _ => None,
        }
    }

    /// True if no `Ref` variant survives anywhere in this subtree.
    pub fn is_fully_resolved(&self) -> bool {
        match self {
            Value::Ref(..) => false,
            Value::Seq(items) => items.iter().all(Value::is_fully_resolved),
            Value::Table(t) => t.values().all(Value::is_fully_resolved),
            _ => true,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(fl) => write!(f, "{fl}"),
            Value::Hex(s) => write!(f, "{s}"),
            Value::Sci(s) => write!(f, "{s}"),
            Value::Complex(re, im) => write!(f, "({re},{im})"),
            Value::Infinity(sign) => write!(f, "{sign}Infinity"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Ref(kind, target) => write!(f, "{kind}{target}"),
            Value::Seq(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Table(t) => {
                write!(f, "{{")?;
                for (i, (k, v)) in t.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{k}:{v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}
