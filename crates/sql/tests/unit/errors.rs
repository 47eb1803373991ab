use crate::fixtures::*;
use relsql::to_sql;
use relsql_error::{ErrorCategory, ErrorCode, ErrorContext};

#[test]
fn test_unsupported_construct_context() {
    let plan = emp()
        .join_on(JoinKind::Full, dept().build(), "deptno", "deptno")
        .build();
    let err = to_sql(&plan, &latest(Product::Mysql)).unwrap_err();
    assert_eq!(err.code, ErrorCode::UnsupportedConstruct);
    assert_eq!(err.category(), ErrorCategory::Unsupported);
    assert!(!err.is_programming_error());
    match err.context {
        Some(ErrorContext::UnsupportedConstruct { dialect, .. }) => assert_eq!(dialect, "mysql"),
        other => panic!("unexpected context {:?}", other),
    }
}

#[test]
fn test_error_json_uses_stable_codes() {
    let plan = emp()
        .aggregate_sets(&[2, 3], vec![vec![2, 4]], vec![])
        .build();
    let err = to_sql(&plan, &ansi()).unwrap_err();
    assert_eq!(err.code, ErrorCode::MalformedGroupingSets);
    assert!(err.is_programming_error());
    let json: serde_json::Value = serde_json::from_str(&err.to_json()).unwrap();
    assert_eq!(json["code"], "RELSQL-5002");
}

#[test]
fn test_generation_logs_with_subscriber() {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .finish();
    let plan = emp()
        .filter(RexNode::eq(RexNode::input(1), RexNode::string("secret")))
        .build();
    let sql = tracing::subscriber::with_default(subscriber, || to_sql(&plan, &ansi()));
    assert_eq!(
        sql.unwrap(),
        "SELECT *\nFROM \"emp\"\nWHERE \"ename\" = 'secret'"
    );
}
