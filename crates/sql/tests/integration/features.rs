use crate::fixtures::*;
use relsql::plan::{
    FrameBound, FrameUnits, MatchRecognize, PatternNode, WindowCall, WindowFrame, WindowFunction,
    WindowGroup,
};

fn ranked(frame: Option<WindowFrame>) -> RelNode {
    emp()
        .project_fields(&["deptno", "sal"])
        .window(vec![WindowGroup {
            partition_keys: vec![0],
            order_keys: vec![SortKey::desc(1)],
            frame,
            calls: vec![
                WindowCall::new(WindowFunction::Rank, vec![], "rnk"),
                WindowCall::new(
                    WindowFunction::Aggregate(AggFunction::Sum),
                    vec![RexNode::input(1)],
                    "running",
                ),
            ],
        }])
        .build()
}

#[test]
fn test_window_functions() {
    assert_sql!(
        ranked(None),
        ansi(),
        "SELECT \"deptno\", \"sal\", \
         RANK() OVER (PARTITION BY \"deptno\" ORDER BY \"sal\" DESC) AS \"rnk\", \
         SUM(\"sal\") OVER (PARTITION BY \"deptno\" ORDER BY \"sal\" DESC \
         RANGE BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW) AS \"running\"\n\
         FROM \"emp\""
    );
}

#[test]
fn test_explicit_window_frame() {
    let frame = WindowFrame {
        units: FrameUnits::Rows,
        start: FrameBound::Preceding(2),
        end: FrameBound::Following(2),
    };
    assert_sql_contains!(
        ranked(Some(frame)),
        ansi(),
        "ORDER BY \"sal\" DESC ROWS BETWEEN 2 PRECEDING AND 2 FOLLOWING) AS \"running\""
    );
    assert_sql_err!(
        ranked(Some(frame)),
        dialect_for(Product::Mssql, 10, 0, None),
        SqlGenError::UnsupportedConstruct { .. }
    );
}

#[test]
fn test_filter_over_window_wraps() {
    let plan = PlanBuilder::from_node(ranked(None))
        .filter(RexNode::eq(RexNode::input(2), RexNode::int(1)))
        .build();
    let sql = render(&plan, &ansi());
    assert!(sql.starts_with("SELECT *\nFROM (SELECT \"deptno\", \"sal\", RANK() OVER"), "{}", sql);
    assert!(sql.ends_with(") AS \"t\"\nWHERE \"rnk\" = 1"), "{}", sql);
}

#[test]
fn test_values_clause() {
    let row_type = RowType::of(&[("a", SqlType::integer()), ("b", SqlType::varchar(10))]);
    let plan = PlanBuilder::values(
        row_type,
        vec![
            vec![Literal::Integer(1), Literal::String("x".to_string())],
            vec![Literal::Integer(2), Literal::Null],
        ],
    )
    .build();
    assert_sql!(
        plan,
        ansi(),
        "SELECT *\nFROM (VALUES  (1, 'x'),\n (2, NULL)) AS \"t\" (\"a\", \"b\")"
    );
}

#[test]
fn test_single_row_from_dual() {
    let row_type = RowType::of(&[("one", SqlType::integer())]);
    let plan = PlanBuilder::values(row_type, vec![vec![Literal::Integer(1)]]).build();
    assert_sql!(plan, latest(Product::Oracle), "SELECT 1 \"one\"\nFROM \"DUAL\"");
}

#[test]
fn test_lateral_correlate() {
    let dept_of_emp = dept()
        .filter(RexNode::eq(
            RexNode::input(0),
            RexNode::CorrelVariable { id: 0, field: 3 },
        ))
        .build();
    let plan = emp()
        .correlate(CorrelateKind::Inner, dept_of_emp.clone(), 0)
        .build();
    assert_sql!(
        plan,
        ansi(),
        "SELECT *\nFROM \"emp\" AS \"$cor0\",\nLATERAL (SELECT *\nFROM \"dept\"\n\
         WHERE \"deptno\" = \"$cor0\".\"deptno\") AS \"t\""
    );
    assert_sql_contains!(
        plan,
        latest(Product::Mssql),
        "\nCROSS APPLY (SELECT *\nFROM [dept]\nWHERE [deptno] = [$cor0].[deptno]) AS [t]"
    );
    assert_sql_contains!(
        plan,
        latest(Product::Postgres),
        "\nLATERAL (SELECT *\nFROM \"dept\"\n"
    );
    assert_sql_err!(
        plan,
        latest(Product::Redshift),
        SqlGenError::UnsupportedConstruct { .. }
    );
}

#[test]
fn test_match_recognize() {
    let pattern = PatternNode::Concat(vec![
        PatternNode::var("STRT"),
        PatternNode::var("DOWN").plus(),
        PatternNode::var("UP").plus(),
    ]);
    let mut mr = MatchRecognize::new(product().build(), pattern);
    mr.partition_keys = vec![0];
    mr.order_keys = vec![SortKey::asc(1)];
    mr.strict_start = true;
    mr.measures = vec![("START_ID".to_string(), RexNode::pattern_ref("STRT", 1))];
    mr.definitions = vec![(
        "DOWN".to_string(),
        RexNode::lt(
            RexNode::pattern_ref("DOWN", 3),
            RexNode::call(
                Operator::Prev,
                vec![RexNode::pattern_ref("DOWN", 3), RexNode::int(1)],
            ),
        ),
    )];
    let plan = RelNode::MatchRecognize(Box::new(mr));
    assert_sql!(
        plan,
        ansi(),
        "SELECT *\n\
         FROM (SELECT *\nFROM \"foodmart\".\"product\") MATCH_RECOGNIZE(\n\
         PARTITION BY \"product_class_id\"\n\
         ORDER BY \"product_id\"\n\
         MEASURES FINAL \"STRT\".\"product_id\" AS \"START_ID\"\n\
         ONE ROW PER MATCH\n\
         AFTER MATCH SKIP TO NEXT ROW\n\
         PATTERN (^ \"STRT\" \"DOWN\" + \"UP\" +)\n\
         DEFINE \"DOWN\" AS PREV(\"DOWN\".\"net_weight\", 0) < PREV(\"DOWN\".\"net_weight\", 1))"
    );
}

#[test]
fn test_cast_clamps_precision() {
    let plan = emp()
        .project(vec![(
            RexNode::cast(RexNode::input(1), SqlType::varchar(10_000)),
            "name",
        )])
        .build();
    assert_sql_contains!(
        plan,
        latest(Product::Oracle),
        "CAST(\"ename\" AS VARCHAR(4000)) \"name\""
    );
}

#[test]
fn test_table_function_call() {
    use relsql::plan::TableFunctionArg;

    let ramp = RelNode::TableFunctionCall {
        function: "ramp".to_string(),
        args: vec![TableFunctionArg::Scalar(RexNode::int(3))],
        row_type: RowType::of(&[("i", SqlType::integer())]),
    };
    assert_sql!(ramp, ansi(), "SELECT *\nFROM TABLE(RAMP(3))");

    let dedup = RelNode::TableFunctionCall {
        function: "dedup".to_string(),
        args: vec![
            TableFunctionArg::Cursor(Box::new(emp().build())),
            TableFunctionArg::Scalar(RexNode::string("ename")),
        ],
        row_type: RowType::of(&[("ename", SqlType::varchar(20))]),
    };
    assert_sql!(
        dedup,
        ansi(),
        "SELECT *\nFROM TABLE(DEDUP(CURSOR ((SELECT *\nFROM \"emp\")), 'ename'))"
    );
}
