use super::*;

fn upper_emp() -> PlanBuilder {
    PlanBuilder::scan(
        &["EMP"],
        RowType::of(&[("EMPNO", SqlType::integer()), ("ENAME", SqlType::varchar(10))]),
    )
}

#[test]
fn test_db2_aliases_every_table() {
    let plan = upper_emp().project_fields(&["ENAME"]).build();
    assert_sql_contains!(plan, latest(Product::Db2), "FROM EMP AS EMP", "EMP.ENAME");
}

#[test]
fn test_lower_case_names_are_quoted() {
    assert_sql_contains!(emp().build(), latest(Product::Db2), "FROM \"emp\" AS \"emp\"");
    assert_sql!(emp().build(), latest(Product::Hsqldb), "SELECT *\nFROM \"emp\"");
    assert_sql!(upper_emp().build(), latest(Product::Hsqldb), "SELECT *\nFROM EMP");
}

#[test]
fn test_substring_becomes_substr() {
    let plan = upper_emp()
        .project(vec![(
            RexNode::func("substring", vec![RexNode::input(1), RexNode::int(2)]),
            "TAIL",
        )])
        .build();
    assert_sql_contains!(plan, latest(Product::Db2), "SUBSTR(EMP.ENAME, 2) AS TAIL");
}
