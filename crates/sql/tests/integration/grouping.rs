use crate::fixtures::*;

fn count_by(group: &[usize], sets: Vec<Vec<usize>>) -> RelNode {
    emp()
        .aggregate_sets(group, sets, vec![AggCall::count_star()])
        .build()
}

#[test]
fn test_group_by_with_having() {
    let plan = emp()
        .aggregate(&[3], vec![AggCall::new(AggFunction::Sum, vec![4])])
        .filter(RexNode::gt(RexNode::input(1), RexNode::int(1000)))
        .build();
    assert_sql!(
        plan,
        ansi(),
        "SELECT \"deptno\", SUM(\"sal\")\nFROM \"emp\"\nGROUP BY \"deptno\"\nHAVING SUM(\"sal\") > 1000"
    );
}

#[test]
fn test_named_call_is_aliased() {
    let plan = emp()
        .aggregate(
            &[3],
            vec![AggCall::new(AggFunction::Max, vec![4]).named("top_sal")],
        )
        .build();
    assert_sql!(
        plan,
        ansi(),
        "SELECT \"deptno\", MAX(\"sal\") AS \"top_sal\"\nFROM \"emp\"\nGROUP BY \"deptno\""
    );
}

#[test]
fn test_single_column_cube_equals_rollup() {
    let rollup = count_by(&[3], vec![vec![3], vec![]]);
    let cube = count_by(&[3], vec![vec![], vec![3]]);
    for product in Product::ALL {
        let dialect = latest(product);
        let (Ok(a), Ok(b)) = (try_render(&rollup, &dialect), try_render(&cube, &dialect)) else {
            continue;
        };
        assert_eq!(a, b, "{}", product.name());
    }
    assert_sql!(
        rollup,
        ansi(),
        "SELECT \"deptno\", COUNT(*)\nFROM \"emp\"\nGROUP BY ROLLUP(\"deptno\")"
    );
}

#[test]
fn test_rollup_key_order_follows_sets() {
    let plan = count_by(&[2, 3], vec![vec![2, 3], vec![3], vec![]]);
    assert_sql_contains!(plan, ansi(), "\nGROUP BY ROLLUP(\"deptno\", \"job\")");
}

#[test]
fn test_cube() {
    let plan = count_by(&[2, 3], vec![vec![2, 3], vec![2], vec![3], vec![]]);
    assert_sql!(
        plan,
        ansi(),
        "SELECT \"job\", \"deptno\", COUNT(*)\nFROM \"emp\"\nGROUP BY CUBE(\"job\", \"deptno\")"
    );
    assert_sql_err!(
        plan,
        dialect_for(Product::Mysql, 8, 0, None),
        SqlGenError::UnsupportedConstruct { .. }
    );
}

#[test]
fn test_grouping_sets() {
    let plan = count_by(&[2, 3], vec![vec![2], vec![3]]);
    assert_sql_contains!(plan, ansi(), "\nGROUP BY GROUPING SETS(\"job\", \"deptno\")");
    assert_sql_err!(
        plan,
        latest(Product::Mysql),
        SqlGenError::UnsupportedConstruct { .. }
    );
}

#[test]
fn test_malformed_grouping_sets() {
    let plan = count_by(&[3], vec![vec![3], vec![2]]);
    let err = try_render(&plan, &ansi()).unwrap_err();
    assert!(err.is_programming_error());
    assert!(matches!(err, SqlGenError::MalformedGroupingSets { .. }));
}

#[test]
fn test_with_rollup_on_old_mysql() {
    let mysql5 = dialect_for(Product::Mysql, 5, 7, None);
    let plan = count_by(&[3], vec![vec![3], vec![]]);
    let expected = "SELECT `deptno`, COUNT(*)\nFROM `emp`\nGROUP BY `deptno` WITH ROLLUP";
    assert_sql!(plan, mysql5, expected);

    // Ascending order on the rollup keys is implied
    let sorted = PlanBuilder::from_node(plan.clone())
        .sort(vec![SortKey::asc(0)])
        .build();
    assert_sql!(sorted, mysql5, expected);

    let descending = PlanBuilder::from_node(plan)
        .sort(vec![SortKey::desc(0)])
        .build();
    let sql = render(&descending, &mysql5);
    assert!(sql.contains("WITH ROLLUP) AS `t`\nORDER BY `deptno` DESC"), "{}", sql);
}

#[test]
fn test_distinct_for_key_only_aggregate() {
    let plan = emp()
        .project_fields(&["deptno", "job"])
        .aggregate(&[0, 1], vec![])
        .build();
    assert_sql!(plan, ansi(), "SELECT DISTINCT \"deptno\", \"job\"\nFROM \"emp\"");
}

#[test]
fn test_nested_aggregate_folds_where_supported() {
    let plan = emp()
        .aggregate(&[3], vec![AggCall::new(AggFunction::Sum, vec![4])])
        .aggregate(&[], vec![AggCall::new(AggFunction::Max, vec![1])])
        .build();
    assert_sql!(
        plan,
        ansi(),
        "SELECT MAX(SUM(\"sal\"))\nFROM \"emp\"\nGROUP BY \"deptno\""
    );
    assert_sql!(
        plan,
        latest(Product::Postgres),
        "SELECT MAX(\"$f1\")\nFROM (SELECT \"deptno\", SUM(\"sal\") AS \"$f1\"\n\
         FROM \"emp\"\nGROUP BY \"deptno\") AS \"t\""
    );
}

#[test]
fn test_filter_clause_emulated_with_case() {
    let plan = emp()
        .project(vec![
            (RexNode::input(3), "deptno"),
            (RexNode::gt(RexNode::input(4), RexNode::int(1000)), "rich"),
        ])
        .aggregate(&[0], vec![AggCall::count_star().filter(1)])
        .build();
    assert_sql_contains!(plan, ansi(), "COUNT(*) FILTER (WHERE \"rich\")");
    assert_sql_contains!(
        plan,
        latest(Product::Oracle),
        "COUNT(CASE WHEN \"rich\" THEN 1 END)"
    );
}

#[test]
fn test_sum0_coalesces() {
    let plan = emp()
        .aggregate(&[3], vec![AggCall::new(AggFunction::Sum0, vec![5])])
        .build();
    assert_sql_contains!(plan, ansi(), "COALESCE(SUM(\"comm\"), 0)");
}
