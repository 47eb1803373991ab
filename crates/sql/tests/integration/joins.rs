use crate::fixtures::*;

#[test]
fn test_left_join() {
    let plan = emp()
        .join_on(JoinKind::Left, dept().build(), "deptno", "deptno")
        .build();
    assert_sql!(
        plan,
        ansi(),
        "SELECT *\nFROM \"emp\"\nLEFT JOIN \"dept\" ON \"emp\".\"deptno\" = \"dept\".\"deptno\""
    );
}

#[test]
fn test_cross_join_syntax() {
    let plan = emp()
        .join(JoinKind::Inner, dept().build(), RexNode::boolean(true))
        .build();
    assert_sql!(plan, ansi(), "SELECT *\nFROM \"emp\",\n\"dept\"");
    assert_sql!(
        plan,
        latest(Product::Mysql),
        "SELECT *\nFROM `emp`\nCROSS JOIN `dept`"
    );
}

#[test]
fn test_full_join_needs_support() {
    let plan = emp()
        .join_on(JoinKind::Full, dept().build(), "deptno", "deptno")
        .build();
    assert_sql_contains!(plan, ansi(), "\nFULL JOIN \"dept\" ON ");
    assert_sql_err!(
        plan,
        latest(Product::Mysql),
        SqlGenError::UnsupportedConstruct { .. }
    );
}

#[test]
fn test_filtered_side_becomes_derived_table() {
    let boston = dept()
        .filter(RexNode::eq(RexNode::input(2), RexNode::string("BOSTON")))
        .build();
    let plan = emp()
        .join_on(JoinKind::Inner, boston, "deptno", "deptno")
        .build();
    assert_sql!(
        plan,
        ansi(),
        "SELECT *\nFROM \"emp\"\n\
         INNER JOIN (SELECT *\nFROM \"dept\"\nWHERE \"loc\" = 'BOSTON') AS \"t\" \
         ON \"emp\".\"deptno\" = \"t\".\"deptno\""
    );
}

#[test]
fn test_three_way_join_chains_left() {
    let plan = emp()
        .join_on(JoinKind::Inner, dept().build(), "deptno", "deptno")
        .join_on(JoinKind::Inner, emp().build(), "empno", "empno")
        .build();
    let sql = render(&plan, &ansi());
    assert!(sql.contains(
        "\nINNER JOIN \"dept\" ON \"emp\".\"deptno\" = \"dept\".\"deptno\"\n\
         INNER JOIN \"emp\" AS \"emp0\" ON \"emp\".\"empno\" = \"emp0\".\"empno\""
    ));
}

#[test]
fn test_filter_over_join_folds_into_where() {
    let plan = emp()
        .join_on(JoinKind::Inner, dept().build(), "deptno", "deptno")
        .filter(RexNode::gt(RexNode::input(4), RexNode::int(1000)))
        .build();
    assert!(render(&plan, &ansi()).ends_with("\nWHERE \"emp\".\"sal\" > 1000"));
}

#[test]
fn test_projection_over_join_qualifies_columns() {
    let joined = emp().join_on(JoinKind::Inner, dept().build(), "deptno", "deptno");
    let plan = joined.project(vec![(RexNode::input(1), "ename"), (RexNode::input(7), "dname")]);
    assert_sql_contains!(
        plan.build(),
        ansi(),
        "SELECT \"emp\".\"ename\", \"dept\".\"dname\"\nFROM \"emp\"\n"
    );
}
