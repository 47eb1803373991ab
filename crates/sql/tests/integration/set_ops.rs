use crate::fixtures::*;

fn ids(table: PlanBuilder, field: &str) -> RelNode {
    table.project_fields(&[field]).build()
}

#[test]
fn test_union_all() {
    let plan = emp()
        .project_fields(&["deptno"])
        .union(true, ids(dept(), "deptno"))
        .build();
    assert_sql!(
        plan,
        ansi(),
        "SELECT \"deptno\"\nFROM \"emp\"\nUNION ALL\nSELECT \"deptno\"\nFROM \"dept\""
    );
}

#[test]
fn test_distinct_set_operators() {
    let union = emp()
        .project_fields(&["deptno"])
        .union(false, ids(dept(), "deptno"))
        .build();
    assert_sql_contains!(union, ansi(), "\nUNION\n");

    let except = emp()
        .project_fields(&["deptno"])
        .set_op(SetOpKind::Except, false, vec![ids(dept(), "deptno")])
        .build();
    assert_sql_contains!(except, ansi(), "\nEXCEPT\n");
    assert_sql_contains!(except, latest(Product::Oracle), "\nMINUS\n");

    let intersect = emp()
        .project_fields(&["deptno"])
        .set_op(SetOpKind::Intersect, false, vec![ids(dept(), "deptno")])
        .build();
    assert_sql_contains!(intersect, ansi(), "\nINTERSECT\n");
}

#[test]
fn test_limited_branches_are_parenthesized() {
    let top = || {
        emp()
            .sort(vec![SortKey::desc(4)])
            .limit(None, Some(3))
            .build()
    };
    let plan = PlanBuilder::from_node(top()).union(true, top()).build();
    let branch = |from: &str| {
        format!(
            "(SELECT *\nFROM {}\nORDER BY \"sal\" DESC\nFETCH NEXT 3 ROWS ONLY)",
            from
        )
    };
    assert_sql!(
        plan,
        ansi(),
        format!(
            "{}\nUNION ALL\n{}",
            branch("\"emp\""),
            branch("\"emp\" AS \"emp0\"")
        )
    );
}

#[test]
fn test_branches_take_distinct_aliases() {
    let plan = emp()
        .union(true, emp().build())
        .union(true, emp().build())
        .build();
    let sql = render(&plan, &ansi());
    assert!(sql.contains("FROM \"emp\"\nUNION ALL"), "{}", sql);
    assert!(sql.contains("FROM \"emp\" AS \"emp0\""), "{}", sql);
    assert!(sql.contains("FROM \"emp\" AS \"emp1\""), "{}", sql);
}

#[test]
fn test_wrapped_branches_and_outer_wrapper_get_distinct_aliases() {
    let wrapped = || {
        emp()
            .limit(None, Some(3))
            .filter(RexNode::gt(RexNode::input(4), RexNode::int(1000)))
            .project_fields(&["empno"])
            .build()
    };
    let plan = PlanBuilder::from_node(wrapped())
        .union(true, wrapped())
        .sort(vec![SortKey::asc(0)])
        .build();
    let sql = render(&plan, &ansi());
    for alias in ["\"t\"", "\"t0\"", "\"t1\""] {
        assert_eq!(sql.matches(&format!(") AS {}", alias)).count(), 1, "{}", sql);
    }
}

#[test]
fn test_filter_over_union_selects_from_it() {
    let plan = emp()
        .project_fields(&["deptno"])
        .union(true, ids(dept(), "deptno"))
        .filter(RexNode::gt(RexNode::input(0), RexNode::int(10)))
        .build();
    let sql = render(&plan, &ansi());
    assert!(sql.starts_with("SELECT *\nFROM (SELECT \"deptno\"\nFROM \"emp\"\nUNION ALL\n"));
    assert!(sql.ends_with(") AS \"t\"\nWHERE \"deptno\" > 10"));
}
