use crate::fixtures::*;

#[test]
fn test_filter_project_sort_fold_into_one_select() {
    let plan = emp()
        .filter(RexNode::gt(RexNode::input(4), RexNode::int(1000)))
        .project(vec![
            (RexNode::input(1), "ename"),
            (RexNode::plus(RexNode::input(4), RexNode::int(100)), "raised"),
        ])
        .sort(vec![SortKey::desc(1)])
        .limit(None, Some(5))
        .build();
    assert_sql!(
        plan,
        ansi(),
        "SELECT \"ename\", \"sal\" + 100 AS \"raised\"\nFROM \"emp\"\n\
         WHERE \"sal\" > 1000\nORDER BY \"raised\" DESC\nFETCH NEXT 5 ROWS ONLY"
    );
}

#[test]
fn test_project_over_computed_project_wraps() {
    let plan = emp()
        .project(vec![(
            RexNode::plus(RexNode::input(4), RexNode::int(100)),
            "raised",
        )])
        .project(vec![(
            RexNode::plus(RexNode::input(0), RexNode::int(1)),
            "again",
        )])
        .build();
    assert_sql!(
        plan,
        ansi(),
        "SELECT \"raised\" + 1 AS \"again\"\n\
         FROM (SELECT \"sal\" + 100 AS \"raised\"\nFROM \"emp\") AS \"t\""
    );
}

#[test]
fn test_filter_after_limit_wraps() {
    let plan = emp()
        .limit(None, Some(10))
        .filter(RexNode::gt(RexNode::input(4), RexNode::int(1000)))
        .build();
    assert_sql!(
        plan,
        ansi(),
        "SELECT *\nFROM (SELECT *\nFROM \"emp\"\nFETCH NEXT 10 ROWS ONLY) AS \"t\"\n\
         WHERE \"sal\" > 1000"
    );
}

#[test]
fn test_consecutive_filters_combine() {
    let plan = emp()
        .filter(RexNode::gt(RexNode::input(4), RexNode::int(1000)))
        .filter(RexNode::is_null(RexNode::input(5)))
        .build();
    assert_sql!(
        plan,
        ansi(),
        "SELECT *\nFROM \"emp\"\nWHERE \"sal\" > 1000 AND \"comm\" IS NULL"
    );
}

#[test]
fn test_renaming_projection_keeps_names() {
    let plan = emp()
        .project(vec![(RexNode::input(1), "name"), (RexNode::input(0), "id")])
        .limit(Some(20), Some(10))
        .build();
    assert_sql!(
        plan,
        ansi(),
        "SELECT \"ename\" AS \"name\", \"empno\" AS \"id\"\nFROM \"emp\"\n\
         OFFSET 20 ROWS\nFETCH NEXT 10 ROWS ONLY"
    );
}

#[test]
fn test_exists_subquery() {
    let plan = emp()
        .filter(RexNode::exists(dept().build()))
        .build();
    assert_sql!(
        plan,
        ansi(),
        "SELECT *\nFROM \"emp\"\nWHERE EXISTS (SELECT *\nFROM \"dept\")"
    );
}

#[test]
fn test_correlated_exists() {
    let dept_of_emp = dept()
        .filter(RexNode::eq(
            RexNode::input(0),
            RexNode::CorrelVariable { id: 0, field: 3 },
        ))
        .build();
    let plan = emp()
        .filter_correlated(vec![0], RexNode::exists(dept_of_emp))
        .build();
    assert_sql!(
        plan,
        ansi(),
        "SELECT *\nFROM \"emp\"\nWHERE EXISTS (SELECT *\nFROM \"dept\"\n\
         WHERE \"deptno\" = \"emp\".\"deptno\")"
    );
}

#[test]
fn test_unbound_correlation_is_programming_error() {
    let orphan = dept()
        .filter(RexNode::eq(
            RexNode::input(0),
            RexNode::CorrelVariable { id: 7, field: 0 },
        ))
        .build();
    let plan = emp().filter(RexNode::exists(orphan)).build();
    let err = try_render(&plan, &ansi()).unwrap_err();
    assert!(matches!(err, SqlGenError::UnresolvedCorrelation { id: 7, .. }));
    assert!(err.is_programming_error());
}

#[test]
fn test_sibling_subqueries_get_distinct_aliases() {
    let wrapped = || {
        dept()
            .limit(None, Some(1))
            .filter(RexNode::gt(RexNode::input(0), RexNode::int(10)))
            .build()
    };
    let plan = emp()
        .filter(RexNode::and(vec![
            RexNode::exists(wrapped()),
            RexNode::exists(wrapped()),
        ]))
        .build();
    let sql = render(&plan, &ansi());
    assert!(sql.contains(") AS \"t\"\nWHERE"), "{}", sql);
    assert!(sql.contains(") AS \"t0\"\nWHERE"), "{}", sql);
}

#[test]
fn test_in_subquery() {
    let plan = emp()
        .filter(RexNode::in_subquery(
            vec![RexNode::input(3)],
            dept().project_fields(&["deptno"]).build(),
        ))
        .build();
    assert_sql_contains!(
        plan,
        ansi(),
        "\nWHERE \"deptno\" IN (SELECT \"deptno\"\nFROM \"dept\")"
    );
}

#[test]
fn test_subquery_aliases_do_not_leak() {
    let plan = emp()
        .filter(RexNode::exists(emp().build()))
        .join_on(JoinKind::Inner, emp().build(), "empno", "empno")
        .build();
    let sql = render(&plan, &ansi());
    assert!(sql.contains("EXISTS (SELECT *\nFROM \"emp\" AS \"emp0\")"), "{}", sql);
    assert!(sql.contains("INNER JOIN \"emp\" AS \"emp1\""), "{}", sql);
}

#[test]
fn test_sort_over_union_wraps() {
    let plan = emp()
        .project_fields(&["empno"])
        .union(true, dept().project_fields(&["deptno"]).build())
        .sort(vec![SortKey::asc(0)])
        .build();
    assert_sql!(
        plan,
        ansi(),
        "SELECT *\nFROM (SELECT \"empno\"\nFROM \"emp\"\nUNION ALL\nSELECT \"deptno\"\nFROM \"dept\") AS \"t\"\n\
         ORDER BY \"empno\""
    );
}

#[test]
fn test_pretty_layout_indents_derived_tables() {
    let plan = emp()
        .limit(None, Some(10))
        .filter(RexNode::gt(RexNode::input(4), RexNode::int(1000)))
        .build();
    let dialect = ansi();
    let options = relsql::UnparseOptions {
        pretty: true,
        indent: "  ".to_string(),
    };
    let sql = SqlGenerator::new(&dialect).generate(&plan, &options).unwrap();
    assert!(sql.contains("FROM (\n  SELECT *\n  FROM \"emp\"\n"), "{}", sql);
}

fn raised_sorted() -> PlanBuilder {
    emp()
        .project(vec![
            (RexNode::plus(RexNode::input(4), RexNode::int(1)), "s1"),
            (RexNode::input(0), "empno"),
        ])
        .sort(vec![SortKey::asc(0)])
}

#[test]
fn test_projection_dropping_sort_alias_wraps() {
    let plan = raised_sorted()
        .project(vec![(RexNode::input(1), "empno")])
        .build();
    assert_sql!(
        plan,
        ansi(),
        "SELECT \"empno\"\nFROM (SELECT \"sal\" + 1 AS \"s1\", \"empno\"\nFROM \"emp\"\n\
         ORDER BY \"s1\") AS \"t\""
    );
}

#[test]
fn test_projection_keeping_sort_alias_folds() {
    let plan = raised_sorted()
        .project(vec![(RexNode::input(0), "s1")])
        .build();
    assert_sql!(
        plan,
        ansi(),
        "SELECT \"sal\" + 1 AS \"s1\"\nFROM \"emp\"\nORDER BY \"s1\""
    );
}
