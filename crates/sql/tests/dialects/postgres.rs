use super::*;

fn postgres() -> SqlDialect {
    latest(Product::Postgres)
}

#[test]
fn test_floor_uses_date_trunc() {
    assert_sql!(
        floor_hire_date(TimeUnit::Month),
        postgres(),
        "SELECT DATE_TRUNC('MONTH', \"hire_date\") AS \"bucket\"\nFROM \"hires\""
    );
}

#[test]
fn test_nvl_becomes_coalesce() {
    let plan = emp()
        .project(vec![(
            RexNode::func("nvl", vec![RexNode::input(5), RexNode::int(0)]),
            "bonus",
        )])
        .build();
    assert_sql_contains!(plan, postgres(), "COALESCE(\"comm\", 0) AS \"bonus\"");
}

#[test]
fn test_limit_offset() {
    assert!(render(&top_salaries(Some(10), Some(5)), &postgres()).ends_with("\nLIMIT 5\nOFFSET 10"));
}

#[test]
fn test_redshift_has_no_filter_clause() {
    let plan = emp()
        .aggregate(
            &[],
            vec![AggCall::count_star().filter(4)],
        )
        .build();
    assert_sql_contains!(plan, postgres(), "FILTER (WHERE");
    let sql = render(&plan, &latest(Product::Redshift));
    assert!(!sql.contains("FILTER"), "{}", sql);
}
