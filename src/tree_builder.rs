//! §4.4 — turns the grammar's raw association list into the typed,
//! resolved `Table` the driver returns. The resolver (§4.5) runs inline,
//! association by association, so references only ever see the part of
//! the current table already bound.

use crate::ast::{RawAssoc, RawKey, RawValue};
use crate::error::FhiclResult;
use crate::name::check_key;
use crate::resolver;
use crate::value::{Table, Value};

/// Builds a `Table` from `assocs`, against the given immutable prolog
/// scope `p` (pass an empty `Table` when there is no prolog).
pub fn build(assocs: &[RawAssoc], p: &Table) -> FhiclResult<Table> {
    let mut d = Table::new();
    for assoc in assocs {
        let lead = match &assoc.key {
            RawKey::Name(n) => n.as_str(),
            RawKey::Hname(hname, _) => hname.lead.as_str(),
        };
        check_key(lead)?;

        let value = build_value(&assoc.value, &d, p)?;

        match &assoc.key {
            RawKey::Name(name) => {
                log::debug!("tree builder: binding '{name}'");
                d.insert(name.as_str().into(), value);
            }
            RawKey::Hname(hname, raw) => {
                log::debug!("tree builder: hname override '{raw}'");
                resolver::apply_hname_override(hname, value, &mut d, p);
            }
        }
    }
    Ok(d)
}

/// A table value gets its own fresh scope; a sequence's elements resolve
/// references against the *enclosing* table's `D`, except elements that
/// are themselves tables, which again get their own scope.
fn build_value(raw: &RawValue, d: &Table, p: &Table) -> FhiclResult<Value> {
    match raw {
        RawValue::Table(inner) => Ok(Value::Table(build(inner, p)?)),
        RawValue::Seq(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(build_value(item, d, p)?);
            }
            Ok(Value::Seq(out))
        }
        RawValue::Atom(v) => resolve_atom(v.clone(), d, p),
    }
}

fn resolve_atom(v: Value, d: &Table, p: &Table) -> FhiclResult<Value> {
    match v {
        Value::Ref(_, target) => resolver::resolve_ref(&target, d, p),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::parse_document;
    use num_bigint::BigInt;

    fn build_doc(src: &str) -> Table {
        let assocs = parse_document(src).unwrap();
        build(&assocs, &Table::new()).unwrap()
    }

    #[test]
    fn builds_flat_table() {
        let t = build_doc("a: 1 b: \"x\"");
        assert_eq!(t.get("a"), Some(&Value::Int(BigInt::from(1))));
        assert_eq!(t.get("b"), Some(&Value::Str("x".into())));
    }

    #[test]
    fn duplicate_keys_keep_position_but_take_later_value() {
        let t = build_doc("a: 1 b: 2 a: 3");
        let keys: Vec<_> = t.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(t.get("a"), Some(&Value::Int(BigInt::from(3))));
    }

    #[test]
    fn resolves_local_reference_within_same_table() {
        let t = build_doc("a: 1 b: @local::a");
        assert_eq!(t.get("b"), Some(&Value::Int(BigInt::from(1))));
    }

    #[test]
    fn forward_reference_to_not_yet_bound_key_fails() {
        let assocs = parse_document("a: @local::b b: 1").unwrap();
        assert!(build(&assocs, &Table::new()).is_err());
    }

    #[test]
    fn hname_key_never_appears_in_output() {
        let t = build_doc("tab: { a: 1 } tab.a: 2");
        assert!(!t.contains_key("tab.a"));
        assert_eq!(t.get("tab").unwrap().as_table().unwrap().get("a"), Some(&Value::Int(BigInt::from(2))));
    }

    #[test]
    fn seq_element_table_gets_its_own_scope() {
        let t = build_doc("outer: 9 seq: [ {a: 1}, {b: 2} ]");
        let seq = t.get("seq").unwrap().as_seq().unwrap();
        assert_eq!(seq.len(), 2);
        assert_eq!(seq[0].as_table().unwrap().get("a"), Some(&Value::Int(BigInt::from(1))));
    }

    #[test]
    fn seq_element_reference_resolves_against_enclosing_table() {
        let t = build_doc("a: 5 seq: [ @local::a ]");
        let seq = t.get("seq").unwrap().as_seq().unwrap();
        assert_eq!(seq[0], Value::Int(BigInt::from(5)));
    }

    #[test]
    fn prolog_binding_is_visible_but_not_emitted() {
        let prolog_assocs = parse_document("p: 10").unwrap();
        let prolog = build(&prolog_assocs, &Table::new()).unwrap();
        let body_assocs = parse_document("q: @local::p").unwrap();
        let body = build(&body_assocs, &prolog).unwrap();
        assert_eq!(body.get("q"), Some(&Value::Int(BigInt::from(10))));
        assert!(!body.contains_key("p"));
    }

    #[test]
    fn body_entry_shadows_prolog_entry_of_same_name() {
        let prolog_assocs = parse_document("p: 10").unwrap();
        let prolog = build(&prolog_assocs, &Table::new()).unwrap();
        let body_assocs = parse_document("p: 20 r: @local::p").unwrap();
        let body = build(&body_assocs, &prolog).unwrap();
        assert_eq!(body.get("p"), Some(&Value::Int(BigInt::from(20))));
        assert_eq!(body.get("r"), Some(&Value::Int(BigInt::from(20))));
    }
}
