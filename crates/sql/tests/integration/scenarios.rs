use crate::fixtures::*;

#[test]
fn test_bare_scan_selects_star() {
    let plan = product().build();
    assert_sql!(plan, ansi(), "SELECT *\nFROM \"foodmart\".\"product\"");
}

#[test]
fn test_count_star_without_group_by() {
    let plan = product().aggregate(&[], vec![AggCall::count_star()]).build();
    assert_sql!(plan, ansi(), "SELECT COUNT(*)\nFROM \"foodmart\".\"product\"");
    assert_sql!(
        plan,
        latest(Product::Mysql),
        "SELECT COUNT(*)\nFROM `foodmart`.`product`"
    );
}

#[test]
fn test_nulls_first_emulated_on_low_collation() {
    let plan = emp().sort(vec![SortKey::desc(5).nulls_first()]).build();
    assert_sql!(
        plan,
        latest(Product::Mysql),
        "SELECT *\nFROM `emp`\nORDER BY `comm` IS NULL DESC, `comm` DESC"
    );
    // High collation already puts NULLs first when descending
    assert_sql!(plan, ansi(), "SELECT *\nFROM \"emp\"\nORDER BY \"comm\" DESC");
}

#[test]
fn test_matching_default_needs_no_emulation() {
    let plan = emp().sort(vec![SortKey::desc(5).nulls_last()]).build();
    assert_sql!(
        plan,
        latest(Product::Mysql),
        "SELECT *\nFROM `emp`\nORDER BY `comm` DESC"
    );
}

#[test]
fn test_self_join_aliases_do_not_collide() {
    let plan = emp()
        .join_on(JoinKind::Inner, emp().build(), "deptno", "deptno")
        .build();
    assert_sql!(
        plan,
        latest(Product::Db2),
        "SELECT *\nFROM \"emp\" AS \"emp\"\n\
         INNER JOIN \"emp\" AS \"emp0\" ON \"emp\".\"deptno\" = \"emp0\".\"deptno\""
    );
    assert_sql!(
        plan,
        ansi(),
        "SELECT *\nFROM \"emp\"\n\
         INNER JOIN \"emp\" AS \"emp0\" ON \"emp\".\"deptno\" = \"emp0\".\"deptno\""
    );
}

#[test]
fn test_huge_disjunction() {
    let predicates = (0..9999)
        .map(|i| RexNode::eq(RexNode::input(0), RexNode::int(i)))
        .collect();
    let plan = emp().filter(RexNode::or(predicates)).build();
    let sql = render(&plan, &ansi());

    assert!(sql.starts_with("SELECT *\nFROM \"emp\"\nWHERE \"empno\" = 0 OR "));
    assert_eq!(sql.matches(" OR ").count(), 9998);
    assert_eq!(sql.matches("\"empno\" = ").count(), 9999);

    let mut depth: i64 = 0;
    for c in sql.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                assert!(depth >= 0, "unbalanced parentheses");
            }
            _ => {}
        }
    }
    assert_eq!(depth, 0);
}

#[test]
fn test_values_without_values_clause() {
    let row_type = RowType::of(&[("a", SqlType::integer()), ("b", SqlType::varchar(10))]);
    let rows = vec![
        vec![Literal::Integer(1), Literal::String("x".to_string())],
        vec![Literal::Integer(2), Literal::String("y".to_string())],
    ];
    let plan = PlanBuilder::values(row_type, rows).build();
    assert_sql!(
        plan,
        latest(Product::Hive),
        "SELECT 1 AS a, 'x' AS b\nUNION ALL\nSELECT 2 AS a, 'y' AS b"
    );
    assert_sql!(
        plan,
        latest(Product::Mysql),
        "SELECT 1 AS `a`, 'x' AS `b`\nUNION ALL\nSELECT 2 AS `a`, 'y' AS `b`"
    );
}
