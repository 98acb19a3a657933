use clap::Parser;
use fanout::cli::Args;
use fanout::renderer::RenderErrorPolicy;
use fanout::tree::UnboundPlaceholderPolicy;
use fanout::value::Value;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn make_args(args: &[&str]) -> Vec<OsString> {
    let mut res = vec![OsString::from("fanout")];
    res.extend(args.iter().map(OsString::from));
    res
}

#[test]
fn test_basic_args() {
    let args = make_args(&["./template", "./output"]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.template, PathBuf::from("./template"));
    assert_eq!(parsed.output_dir, PathBuf::from("./output"));
    assert!(!parsed.force);
    assert!(!parsed.verbose);
    assert!(!parsed.strict_placeholders);
    assert_eq!(parsed.on_render_error, RenderErrorPolicy::Embed);
    assert!(parsed.bindings.is_empty());
}

#[test]
fn test_all_flags() {
    let args = make_args(&[
        "--force",
        "--verbose",
        "--strict-placeholders",
        "--on-render-error",
        "abort",
        "--suffix",
        ".j2",
        "--bindings",
        "vars.yml",
        "--data",
        "i=1..3",
        "./template",
        "./output",
    ]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert!(parsed.force);
    assert!(parsed.verbose);
    assert_eq!(parsed.on_render_error, RenderErrorPolicy::Abort);
    assert_eq!(parsed.bindings, vec![PathBuf::from("vars.yml")]);
    assert_eq!(parsed.data, vec!["i=1..3".to_string()]);

    let options = parsed.generate_options();
    assert_eq!(options.tree.template_suffixes, vec![".j2".to_string()]);
    assert_eq!(
        options.tree.unbound_placeholders,
        UnboundPlaceholderPolicy::Strict
    );
    assert_eq!(options.on_render_error, RenderErrorPolicy::Abort);
}

#[test]
fn test_short_flags() {
    let args = make_args(&["-f", "-v", "-d", "x=1", "-b", "a.json", "./template", "./output"]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert!(parsed.force);
    assert!(parsed.verbose);
    assert_eq!(parsed.data.len(), 1);
    assert_eq!(parsed.bindings.len(), 1);
}

#[test]
fn test_default_suffixes() {
    let parsed = Args::try_parse_from(make_args(&["./template", "./output"])).unwrap();
    let options = parsed.generate_options();
    assert_eq!(
        options.tree.template_suffixes,
        vec![".template".to_string(), ".fwtemplate".to_string()]
    );
}

#[test]
fn test_load_bindings_data_overrides_files() {
    let temp_dir = TempDir::new().unwrap();
    let first = temp_dir.path().join("first.json");
    let second = temp_dir.path().join("second.yml");
    fs::write(&first, r#"{"a": "from-first", "b": "from-first"}"#).unwrap();
    fs::write(&second, "b: from-second\nc: from-second\n").unwrap();

    let args = make_args(&[
        "-b",
        first.to_str().unwrap(),
        "-b",
        second.to_str().unwrap(),
        "-d",
        "c=from-data",
        "./template",
        "./output",
    ]);
    let bindings = Args::try_parse_from(args).unwrap().load_bindings().unwrap();

    assert_eq!(bindings["a"], Value::from("from-first"));
    assert_eq!(bindings["b"], Value::from("from-second"));
    assert_eq!(bindings["c"], Value::from("from-data"));
}

#[test]
fn test_invalid_render_error_policy() {
    let args = make_args(&["--on-render-error", "ignore", "./template", "./output"]);
    assert!(Args::try_parse_from(args).is_err());
}

#[test]
fn test_missing_args() {
    let args = make_args(&["./template"]);
    assert!(Args::try_parse_from(args).is_err());
}

#[test]
fn test_too_many_args() {
    let args = make_args(&["./template", "./output", "extra"]);
    assert!(Args::try_parse_from(args).is_err());
}
