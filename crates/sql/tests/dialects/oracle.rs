use super::*;

fn oracle() -> SqlDialect {
    latest(Product::Oracle)
}

#[test]
fn test_substring_becomes_substr() {
    let plan = emp()
        .project(vec![(
            RexNode::func("substring", vec![RexNode::input(1), RexNode::int(1), RexNode::int(3)]),
            "part",
        )])
        .build();
    assert_sql!(plan, oracle(), "SELECT SUBSTR(\"ename\", 1, 3) \"part\"\nFROM \"emp\"");
}

#[test]
fn test_position_swaps_into_instr() {
    assert_sql_contains!(position_of_a(), oracle(), "INSTR(\"ename\", 'A') \"pos\"");
}

#[test]
fn test_datetime_literals_use_functions() {
    assert_sql_contains!(
        hired_after_2020(),
        oracle(),
        "WHERE \"hire_date\" > TO_DATE('2020-01-01', 'YYYY-MM-DD')"
    );
}

#[test]
fn test_floor_to_unit_truncates() {
    assert_sql_contains!(
        floor_hire_date(TimeUnit::Month),
        oracle(),
        "TRUNC(\"hire_date\", 'MONTH') \"bucket\""
    );
}

#[test]
fn test_no_as_before_table_alias() {
    let plan = emp()
        .join_on(JoinKind::Inner, emp().build(), "deptno", "deptno")
        .build();
    assert_sql_contains!(plan, oracle(), "INNER JOIN \"emp\" \"emp0\" ON ");
}

#[test]
fn test_integer_cast_target() {
    let plan = emp()
        .project(vec![(RexNode::cast(RexNode::input(4), SqlType::integer()), "whole")])
        .build();
    assert_sql_contains!(plan, oracle(), "CAST(\"sal\" AS NUMBER(10)) \"whole\"");
}
