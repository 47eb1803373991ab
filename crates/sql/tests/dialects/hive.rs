use super::*;

#[test]
fn test_plain_identifiers_stay_bare() {
    let sql = render(&crate::common::test_plan(), &latest(Product::Hive));
    assert_eq!(sql, "SELECT ename\nFROM emp\nWHERE empno > 10");
}

#[test]
fn test_reserved_word_is_quoted() {
    let plan = PlanBuilder::scan(
        &["events"],
        RowType::of(&[
            ("id", SqlType::integer()),
            ("date", SqlType::new(TypeName::Date)),
        ]),
    )
    .project_fields(&["date"])
    .build();
    assert_sql!(plan, latest(Product::Hive), "SELECT `date`\nFROM events");
}

#[test]
fn test_backslash_escapes_quotes() {
    let plan = emp()
        .filter(RexNode::eq(RexNode::input(1), RexNode::string("O'Brien")))
        .build();
    assert_sql_contains!(plan, latest(Product::Hive), "WHERE ename = 'O\\'Brien'");
    assert_sql_contains!(plan, ansi(), "WHERE \"ename\" = 'O''Brien'");
}

#[test]
fn test_position_becomes_instr() {
    assert_sql_contains!(position_of_a(), latest(Product::Spark), "INSTR(ename, 'A') AS pos");
}

#[test]
fn test_null_emulation_before_2_1() {
    let plan = emp().sort(vec![SortKey::asc(5).nulls_last()]).build();
    assert_sql!(
        plan,
        dialect_for(Product::Hive, 2, 0, None),
        "SELECT *\nFROM emp\nORDER BY comm IS NULL, comm"
    );
    assert_sql!(
        plan,
        dialect_for(Product::Hive, 2, 1, None),
        "SELECT *\nFROM emp\nORDER BY comm NULLS LAST"
    );
}
