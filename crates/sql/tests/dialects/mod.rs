use crate::fixtures::*;
use relsql::types::{TimeUnit, TypeName};

mod db2;
mod hive;
mod mysql;
mod oracle;
mod postgres;
mod snowflake;

/// `hire_id, hire_date`
fn hires() -> PlanBuilder {
    PlanBuilder::scan(
        &["hires"],
        RowType::of(&[
            ("hire_id", SqlType::integer()),
            ("hire_date", SqlType::new(TypeName::Date)),
        ]),
    )
}

/// `SELECT FLOOR(hire_date TO unit) AS bucket FROM hires`
fn floor_hire_date(unit: TimeUnit) -> RelNode {
    hires()
        .project(vec![(
            RexNode::call(Operator::Floor, vec![RexNode::input(1), RexNode::unit(unit)]),
            "bucket",
        )])
        .build()
}

/// `SELECT * FROM hires WHERE hire_date > DATE '2020-01-01'`
fn hired_after_2020() -> RelNode {
    hires()
        .filter(RexNode::gt(
            RexNode::input(1),
            RexNode::Literal(Literal::Date("2020-01-01".to_string())),
        ))
        .build()
}

/// `SELECT POSITION('A' IN ename) AS pos FROM emp`
fn position_of_a() -> RelNode {
    emp()
        .project(vec![(
            RexNode::call(Operator::Position, vec![RexNode::string("A"), RexNode::input(1)]),
            "pos",
        )])
        .build()
}

/// Top five salaries, skipping `offset` rows.
fn top_salaries(offset: Option<u64>, fetch: Option<u64>) -> RelNode {
    emp().sort(vec![SortKey::asc(4)]).limit(offset, fetch).build()
}

#[test]
fn test_ansi_reference_forms() {
    assert_sql!(
        floor_hire_date(TimeUnit::Month),
        ansi(),
        "SELECT FLOOR(\"hire_date\" TO MONTH) AS \"bucket\"\nFROM \"hires\""
    );
    assert_sql_contains!(hired_after_2020(), ansi(), "\"hire_date\" > DATE '2020-01-01'");
    assert_sql_contains!(position_of_a(), ansi(), "POSITION('A' IN \"ename\") AS \"pos\"");
}
