use super::*;

fn snowflake() -> SqlDialect {
    latest(Product::Snowflake)
}

#[test]
fn test_string_agg_becomes_listagg() {
    let plan = emp()
        .project(vec![(
            RexNode::func("string_agg", vec![RexNode::input(1), RexNode::string(",")]),
            "names",
        )])
        .build();
    assert_sql!(
        plan,
        snowflake(),
        "SELECT LISTAGG(\"ename\", ',') AS \"names\"\nFROM \"emp\""
    );
}

#[test]
fn test_floor_uses_date_trunc() {
    assert_sql_contains!(
        floor_hire_date(TimeUnit::Day),
        snowflake(),
        "DATE_TRUNC('DAY', \"hire_date\") AS \"bucket\""
    );
}

#[test]
fn test_limit_offset() {
    assert!(render(&top_salaries(Some(10), Some(5)), &snowflake())
        .ends_with("\nORDER BY \"sal\"\nLIMIT 5\nOFFSET 10"));
}

#[test]
fn test_unknown_function_keeps_its_name() {
    let plan = emp()
        .project(vec![(RexNode::func("initcap", vec![RexNode::input(1)]), "nice")])
        .build();
    assert_sql_contains!(plan, snowflake(), "INITCAP(\"ename\") AS \"nice\"");
}
