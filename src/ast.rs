//! Raw parse output of the grammar stage — distinct from the typed `Value`
//! tree the tree builder produces. Associations here may repeat keys
//! (later bindings override earlier ones; the tree builder applies that),
//! and table groups are plain association lists rather than deduplicated
//! maps.

use crate::name::Hname;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum RawKey {
    Name(String),
    Hname(Hname, String),
}

impl RawKey {
    /// The literal source text of the key, used as the map key text during
    /// tree building (hname keys are looked up/deleted by this text).
    pub fn text(&self) -> &str {
        match self {
            RawKey::Name(n) => n,
            RawKey::Hname(_, raw) => raw,
        }
    }

    pub fn is_hname(&self) -> bool {
        matches!(self, RawKey::Hname(..))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// A leaf value with no further table/sequence structure: any `Value`
    /// variant except `Table`/`Seq`.
    Atom(Value),
    Seq(Vec<RawValue>),
    Table(Vec<RawAssoc>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawAssoc {
    pub key: RawKey,
    pub value: RawValue,
}
