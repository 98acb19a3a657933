use std::fs;

use fanout::bindings::{load_bindings_file, parse_assignment, parse_bindings, parse_range};
use fanout::error::Error;
use fanout::value::Value;
use tempfile::TempDir;

#[test]
fn test_parse_json_bindings() {
    let bindings = parse_bindings(
        r#"{
            "module": "Racer",
            "args": ["size", "color", "speed"],
            "i": {"$range": "1..20"},
            "j": {"$range": [0, 19]},
            "ratio": 0.5,
            "character": null,
            "critters": {"cat": {"attributes": ["glorious"]}}
        }"#,
    )
    .unwrap();

    let keys: Vec<_> = bindings.keys().cloned().collect();
    assert_eq!(
        keys,
        vec!["module", "args", "i", "j", "ratio", "character", "critters"]
    );
    assert_eq!(bindings["module"], Value::from("Racer"));
    assert_eq!(bindings["i"], Value::Range(1..=20));
    assert_eq!(bindings["j"], Value::Range(0..=19));
    assert_eq!(bindings["ratio"], Value::Float(0.5));
    assert_eq!(bindings["character"], Value::Null);
    assert!(bindings["args"].is_enumerable());
    assert!(matches!(bindings["critters"], Value::Map(_)));
}

#[test]
fn test_parse_yaml_bindings() {
    let bindings = parse_bindings(
        "string:\n  - \"1\"\n  - \"10\"\nchap_count:\n  $range: 1..=3\nauthor: Spittleman\n",
    )
    .unwrap();

    assert_eq!(bindings["string"], Value::from(vec!["1", "10"]));
    assert_eq!(bindings["chap_count"], Value::Range(1..=3));
    assert_eq!(bindings["author"], Value::from("Spittleman"));
}

#[test]
fn test_range_needs_bounds() {
    let result = parse_bindings(r#"{"i": {"$range": "a..b"}}"#);
    assert!(matches!(result, Err(Error::ConfigError(_))));

    let result = parse_bindings(r#"{"i": {"$range": [1]}}"#);
    assert!(matches!(result, Err(Error::ConfigError(_))));
}

#[test]
fn test_map_with_range_key_and_more_is_a_map() {
    let bindings = parse_bindings(r#"{"i": {"$range": "1..2", "other": 1}}"#).unwrap();
    assert!(matches!(bindings["i"], Value::Map(_)));
}

#[test]
fn test_integer_beyond_i64_is_rejected() {
    let result = parse_bindings(r#"{"n": 18446744073709551615}"#);
    assert!(matches!(result, Err(Error::ConfigError(_))));

    let bindings = parse_bindings(r#"{"n": 9223372036854775807, "f": 1e300}"#).unwrap();
    assert_eq!(bindings["n"], Value::Int(i64::MAX));
    assert_eq!(bindings["f"], Value::Float(1e300));
}

#[test]
fn test_invalid_bindings() {
    let result = parse_bindings("- just\n- a list\n");
    assert!(matches!(result, Err(Error::ConfigError(_))));
}

#[test]
fn test_load_bindings_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("vars.yml");
    fs::write(&path, "class: Car\n").unwrap();

    let bindings = load_bindings_file(&path).unwrap();
    assert_eq!(bindings["class"], Value::from("Car"));

    let missing = load_bindings_file(temp_dir.path().join("missing.yml"));
    assert!(matches!(missing, Err(Error::ConfigError(_))));
}

#[test]
fn test_parse_range() {
    assert_eq!(parse_range("1..20"), Some(1..=20));
    assert_eq!(parse_range("0..=19"), Some(0..=19));
    assert_eq!(parse_range("-2..2"), Some(-2..=2));
    assert_eq!(parse_range("1..x"), None);
    assert_eq!(parse_range("12"), None);
}

#[test]
fn test_parse_assignment() {
    assert_eq!(
        parse_assignment("chap_count=1..20").unwrap(),
        ("chap_count".to_string(), Value::Range(1..=20))
    );
    assert_eq!(
        parse_assignment("n=3").unwrap(),
        ("n".to_string(), Value::Int(3))
    );
    assert_eq!(
        parse_assignment(r#"tags=["a","b"]"#).unwrap(),
        ("tags".to_string(), Value::from(vec!["a", "b"]))
    );
    assert_eq!(
        parse_assignment("name=Bongo the monkey").unwrap(),
        ("name".to_string(), Value::from("Bongo the monkey"))
    );
    assert_eq!(
        parse_assignment("empty=").unwrap(),
        ("empty".to_string(), Value::from(""))
    );
    assert!(matches!(parse_assignment("novalue"), Err(Error::ConfigError(_))));
    assert!(matches!(parse_assignment("=x"), Err(Error::ConfigError(_))));
}
