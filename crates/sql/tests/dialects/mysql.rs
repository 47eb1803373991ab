use super::*;

fn mysql() -> SqlDialect {
    dialect_for(Product::Mysql, 8, 0, None)
}

#[test]
fn test_offset_only_gets_maximum_limit() {
    assert!(render(&top_salaries(Some(10), None), &mysql())
        .ends_with("\nORDER BY `sal`\nLIMIT 18446744073709551615\nOFFSET 10"));
}

#[test]
fn test_limit_then_offset() {
    assert!(render(&top_salaries(Some(10), Some(5)), &mysql()).ends_with("\nLIMIT 5\nOFFSET 10"));
}

#[test]
fn test_integer_cast_is_signed() {
    let plan = emp()
        .project(vec![(RexNode::cast(RexNode::input(4), SqlType::integer()), "whole")])
        .build();
    assert_sql_contains!(plan, mysql(), "CAST(`sal` AS SIGNED) AS `whole`");
}

#[test]
fn test_floor_uses_date_format() {
    assert_sql_contains!(
        floor_hire_date(TimeUnit::Day),
        mysql(),
        "DATE_FORMAT(`hire_date`, '%Y-%m-%d') AS `bucket`"
    );
    assert_sql_err!(
        floor_hire_date(TimeUnit::Quarter),
        mysql(),
        SqlGenError::UnsupportedConstruct { .. }
    );
}

#[test]
fn test_backtick_in_name_is_doubled() {
    let plan = PlanBuilder::scan(&["odd`name"], RowType::of(&[("id", SqlType::integer())])).build();
    assert_sql!(plan, mysql(), "SELECT *\nFROM `odd``name`");
}
