//! End-to-end scenarios straight from the component design document:
//! §8's numbered positive and negative cases.

use fhicl::error::FhiclError;
use fhicl::preprocess::FileLoader;
use fhicl::value::Value;
use indoc::indoc;
use num_bigint::BigInt;

struct NoIncludes;
impl FileLoader for NoIncludes {
    fn load(&self, filename: &str) -> Result<String, FhiclError> {
        Err(FhiclError::invalid_include(format!("no loader configured for {filename}")))
    }
}

fn parse(src: &str) -> fhicl::Table {
    fhicl::parse(src, &NoIncludes).unwrap()
}

#[test]
fn scenario_1_flat_table() {
    let t = parse("a: 1 b: 2");
    assert_eq!(t.get("a"), Some(&Value::Int(BigInt::from(1))));
    assert_eq!(t.get("b"), Some(&Value::Int(BigInt::from(2))));
}

#[test]
fn scenario_2_reference_into_nested_table() {
    let t = parse("tab: { a:1 b:2 }  x: @local::tab.a");
    let tab = t.get("tab").unwrap().as_table().unwrap();
    assert_eq!(tab.get("a"), Some(&Value::Int(BigInt::from(1))));
    assert_eq!(tab.get("b"), Some(&Value::Int(BigInt::from(2))));
    assert_eq!(t.get("x"), Some(&Value::Int(BigInt::from(1))));
}

#[test]
fn scenario_3_hname_override_applies_before_reference_reads_it() {
    let t = parse("tab: { a:1 } tab.a: 2 y: @local::tab.a");
    let tab = t.get("tab").unwrap().as_table().unwrap();
    assert_eq!(tab.get("a"), Some(&Value::Int(BigInt::from(2))));
    assert_eq!(t.get("y"), Some(&Value::Int(BigInt::from(2))));
    assert!(!t.contains_key("tab.a"));
}

#[test]
fn scenario_4_reference_through_sequence_index_and_field() {
    let t = parse("seq: [ {a:1 b:2}, {c:3 d:4} ]  v: @local::seq[1].c");
    let seq = t.get("seq").unwrap().as_seq().unwrap();
    assert_eq!(seq.len(), 2);
    assert_eq!(t.get("v"), Some(&Value::Int(BigInt::from(3))));
}

#[test]
fn scenario_5_prolog_consulted_but_hidden() {
    let t = parse("BEGIN_PROLOG p: 10 END_PROLOG q: @local::p");
    assert_eq!(t.get("q"), Some(&Value::Int(BigInt::from(10))));
    assert!(!t.contains_key("p"));
}

#[test]
fn scenario_6_body_shadows_prolog() {
    let t = parse("BEGIN_PROLOG p: 10 END_PROLOG p: 20 r: @local::p");
    assert_eq!(t.get("p"), Some(&Value::Int(BigInt::from(20))));
    assert_eq!(t.get("r"), Some(&Value::Int(BigInt::from(20))));
}

#[test]
fn negative_leading_digit_key() {
    let err = fhicl::parse("1abc: 5", &NoIncludes).unwrap_err();
    assert!(matches!(err, FhiclError::InvalidToken { .. }));
}

#[test]
fn negative_association_with_no_value() {
    let err = fhicl::parse("a: ", &NoIncludes).unwrap_err();
    assert!(matches!(err, FhiclError::InvalidAssociation { .. }));
}

#[test]
fn negative_statement_before_prolog() {
    let err = fhicl::parse("a: 1 BEGIN_PROLOG p:2 END_PROLOG", &NoIncludes).unwrap_err();
    match err {
        FhiclError::IllegalStatement { line, .. } => assert_eq!(line, 1),
        other => panic!("expected IllegalStatement, got {other:?}"),
    }
}

#[test]
fn negative_unknown_reference() {
    let err = fhicl::parse("x: @local::missing", &NoIncludes).unwrap_err();
    assert!(matches!(err, FhiclError::UnknownReference { .. }));
}

#[test]
fn negative_malformed_include() {
    let err = fhicl::parse("#include missingquote.fcl", &NoIncludes).unwrap_err();
    assert!(matches!(err, FhiclError::InvalidInclude { .. }));
}

#[test]
fn invariant_no_refs_survive_resolution() {
    let t = parse("a: 1 b: @local::a");
    assert!(Value::Table(t).is_fully_resolved());
}

#[test]
fn invariant_no_hname_keys_in_output() {
    let t = parse("tab: { a: 1 } tab.a: 2");
    for key in t.keys() {
        assert!(!key.contains('.') && !key.contains('['));
    }
}

#[test]
fn invariant_float_exact_integer_reduces_to_int() {
    let t = parse("a: 5.00");
    assert_eq!(t.get("a"), Some(&Value::Int(BigInt::from(5))));
}

#[test]
fn multi_block_document_with_prolog_and_nested_tables() {
    let src = indoc! {r#"
        BEGIN_PROLOG
        default_gain: 1.0
        END_PROLOG

        detector: {
            gain: @local::default_gain
            channels: [0, 1, 2]
        }
        detector.gain: 2.5
        label: muon_detector
    "#};
    let t = parse(src);
    let detector = t.get("detector").unwrap().as_table().unwrap();
    assert_eq!(detector.get("gain").unwrap().to_string(), "2.5");
    assert_eq!(detector.get("channels").unwrap().as_seq().unwrap().len(), 3);
    assert_eq!(t.get("label"), Some(&Value::Str("muon_detector".into())));
    assert!(!t.contains_key("default_gain"));
}

#[test]
fn include_expansion_via_in_memory_loader() {
    use std::collections::HashMap;

    struct MapLoader(HashMap<String, String>);
    impl FileLoader for MapLoader {
        fn load(&self, filename: &str) -> Result<String, FhiclError> {
            self.0.get(filename).cloned().ok_or_else(|| FhiclError::invalid_include(filename))
        }
    }

    let mut files = HashMap::new();
    files.insert("detector.fcl".to_string(), "gain: 1.5\n".to_string());
    let loader = MapLoader(files);
    let t = fhicl::parse("#include \"detector.fcl\"\nlabel: muon\n", &loader).unwrap();
    assert_eq!(t.get("gain").unwrap().to_string(), "1.5");
    assert_eq!(t.get("label"), Some(&Value::Str("muon".into())));
}
