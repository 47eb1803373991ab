use crate::fixtures::*;
use relsql::{dialect_from_settings, to_sql_from_file};
use relsql_common::config::{GeneratorConfig, NullCollationSetting};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(yaml: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file
}

#[test]
fn test_yaml_settings() {
    let config = GeneratorConfig::from_yaml_str(
        r#"
dialect:
  product: oracle
  null_collation: first
  max_varchar_length: 200
pretty: true
indent: "\t"
redact_literals: false
"#,
    )
    .unwrap();
    assert_eq!(config.dialect.null_collation, Some(NullCollationSetting::First));
    assert!(config.pretty);
    assert!(!config.redact_literals);

    let dialect = dialect_from_settings(&config.dialect);
    assert_eq!(dialect.product(), Product::Oracle);
    assert_eq!(dialect.null_ordering(), NullCollation::First);

    let plan = emp()
        .project(vec![(RexNode::cast(RexNode::input(1), SqlType::varchar(1000)), "name")])
        .build();
    assert_sql_contains!(plan, dialect, "CAST(\"ename\" AS VARCHAR(200)) \"name\"");
}

#[test]
fn test_invalid_documents_are_rejected() {
    assert!(GeneratorConfig::from_yaml_str("indent: \"--\"\n").is_err());
    assert!(GeneratorConfig::from_yaml_str("dialect:\n  null_collation: middle\n").is_err());
    assert!(GeneratorConfig::from_yaml_str("dialect:\n  product: \"\"\n").is_err());
    assert!(GeneratorConfig::from_yaml_str("max_recursion_depth: 5000\n").is_err());
}

#[test]
fn test_render_from_file() {
    let file = write_config("dialect:\n  product: hive\n");
    let sql = to_sql_from_file(&crate::common::test_plan(), file.path().to_str().unwrap()).unwrap();
    assert_eq!(sql, "SELECT ename\nFROM emp\nWHERE empno > 10");
}

#[test]
fn test_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.yaml");
    let sql = to_sql_from_file(&crate::common::test_plan(), path.to_str().unwrap()).unwrap();
    assert_eq!(sql, "SELECT \"ename\"\nFROM \"emp\"\nWHERE \"empno\" > 10");
}

#[test]
fn test_file_errors_carry_context() {
    let file = write_config("max_recursion_depth: 1\n");
    let err = to_sql_from_file(&crate::common::test_plan(), file.path().to_str().unwrap()).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to generate SQL"), "{:#}", err);
}
