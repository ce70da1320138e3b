//! Top-level pipeline orchestration: `text -> Table`.
//!
//! Preprocessor → OrderGuard → PrologSplitter → Grammar (prolog, then
//! body) → TreeBuilder (which runs the Resolver inline). An empty,
//! comments-only, or prolog-only document yields an empty mapping.

use crate::error::FhiclResult;
use crate::grammar;
use crate::order_guard;
use crate::preprocess::{self, FileLoader};
use crate::tree_builder;
use crate::value::Table;

pub fn parse(text: &str, loader: &dyn FileLoader) -> FhiclResult<Table> {
    let expanded = preprocess::expand(text, loader)?;
    log::info!("preprocessor: expanded to {} bytes", expanded.len());

    order_guard::check_order(&expanded)?;
    let (prolog_text, body_text) = order_guard::split_prolog(&expanded);
    log::info!("order guard: split into {}-byte prolog, {}-byte body", prolog_text.len(), body_text.len());

    let prolog_assocs = grammar::parse_document(&prolog_text)?;
    log::info!("grammar: parsed {} prolog association(s)", prolog_assocs.len());
    let prolog = tree_builder::build(&prolog_assocs, &Table::new())?;
    log::info!("tree builder: prolog resolved to {} top-level binding(s)", prolog.len());

    let body_assocs = grammar::parse_document(&body_text)?;
    log::info!("grammar: parsed {} body association(s)", body_assocs.len());
    let result = tree_builder::build(&body_assocs, &prolog);
    if let Ok(ref table) = result {
        log::info!("tree builder: body resolved to {} top-level binding(s)", table.len());
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocess::FileLoader;
    use crate::value::Value;
    use num_bigint::BigInt;

    struct NoIncludes;
    impl FileLoader for NoIncludes {
        fn load(&self, filename: &str) -> FhiclResult<String> {
            Err(crate::error::FhiclError::invalid_include(format!("no loader configured for {filename}")))
        }
    }

    fn parse_ok(src: &str) -> Table {
        parse(src, &NoIncludes).unwrap()
    }

    #[test]
    fn empty_document_yields_empty_mapping() {
        assert!(parse_ok("").is_empty());
    }

    #[test]
    fn comments_only_document_yields_empty_mapping() {
        assert!(parse_ok("# just a comment\n// another\n").is_empty());
    }

    #[test]
    fn prolog_only_document_yields_empty_mapping() {
        assert!(parse_ok("BEGIN_PROLOG p: 10 END_PROLOG\n").is_empty());
    }

    #[test]
    fn prolog_value_is_reachable_but_hidden_from_output() {
        let t = parse_ok("BEGIN_PROLOG p: 10 END_PROLOG\nq: @local::p\n");
        assert_eq!(t.get("q"), Some(&Value::Int(BigInt::from(10))));
        assert!(!t.contains_key("p"));
    }

    #[test]
    fn body_shadows_prolog_of_same_name() {
        let t = parse_ok("BEGIN_PROLOG p: 10 END_PROLOG\np: 20\nr: @local::p\n");
        assert_eq!(t.get("p"), Some(&Value::Int(BigInt::from(20))));
        assert_eq!(t.get("r"), Some(&Value::Int(BigInt::from(20))));
    }

    #[test]
    fn illegal_statement_before_prolog_is_rejected() {
        let err = parse("a: 1\nBEGIN_PROLOG p:2 END_PROLOG\n", &NoIncludes).unwrap_err();
        assert!(matches!(err, crate::error::FhiclError::IllegalStatement { .. }));
    }

    #[test]
    fn missing_include_surfaces_as_invalid_include() {
        let err = parse("#include \"missingquote.fcl\"\n", &NoIncludes).unwrap_err();
        assert!(matches!(err, crate::error::FhiclError::InvalidInclude { .. }));
    }

    #[test]
    fn unknown_reference_propagates() {
        let err = parse("a: @local::nope\n", &NoIncludes).unwrap_err();
        assert!(matches!(err, crate::error::FhiclError::UnknownReference { .. }));
    }

    #[test]
    fn nested_table_and_sequence_end_to_end() {
        let t = parse_ok("detector: { gain: 1.5 channels: [0, 1, 2] } label: foo\n");
        let detector = t.get("detector").unwrap().as_table().unwrap();
        assert_eq!(detector.get("channels").unwrap().as_seq().unwrap().len(), 3);
        assert_eq!(t.get("label"), Some(&Value::Str("foo".into())));
    }

    #[test]
    fn hname_override_rewrites_nested_value_and_is_not_itself_a_key() {
        let t = parse_ok("detector: { gain: 1.5 }\ndetector.gain: 2.5\n");
        let detector = t.get("detector").unwrap().as_table().unwrap();
        assert_eq!(detector.get("gain").unwrap().to_string(), "2.5");
        assert!(!t.contains_key("detector.gain"));
    }
}
