use crate::fixtures::*;
use relsql::{to_sql, to_sql_with_config};
use relsql_common::config::GeneratorConfig;
use relsql_error::ErrorCode;

/// A plan that exercises most node kinds in one tree.
fn busy_plan() -> RelNode {
    let dept_of_emp = dept()
        .filter(RexNode::eq(
            RexNode::input(0),
            RexNode::CorrelVariable { id: 0, field: 3 },
        ))
        .build();
    emp()
        .filter_correlated(vec![0], RexNode::exists(dept_of_emp))
        .join_on(JoinKind::Inner, emp().build(), "deptno", "deptno")
        .aggregate(
            &[3],
            vec![
                AggCall::count_star(),
                AggCall::new(AggFunction::Sum, vec![4]).named("total"),
            ],
        )
        .filter(RexNode::gt(RexNode::input(2), RexNode::int(100)))
        .sort(vec![SortKey::desc(2).nulls_last()])
        .limit(None, Some(10))
        .build()
}

#[test]
fn test_deterministic_for_every_product() {
    let plan = busy_plan();
    for product in Product::ALL {
        let dialect = latest(product);
        let first = try_render(&plan, &dialect);
        for _ in 0..3 {
            assert_eq!(try_render(&plan, &dialect), first, "{}", product.name());
        }
    }
}

#[test]
fn test_recursion_limit() {
    let mut builder = emp();
    for i in 0..200 {
        builder = builder.filter(RexNode::gt(RexNode::input(0), RexNode::int(i)));
    }
    let plan = builder.build();
    let dialect = ansi();

    let err = SqlGenerator::new(&dialect)
        .with_max_depth(64)
        .plan_to_query(&plan)
        .unwrap_err();
    assert_eq!(err, SqlGenError::MaxRecursion(64));

    let sql = SqlGenerator::new(&dialect)
        .with_max_depth(256)
        .generate(&plan, &Default::default())
        .unwrap();
    assert_eq!(sql.matches(" AND ").count(), 199);
}

#[test]
fn test_deep_plans_convert_up_to_the_configured_depth() {
    let mut builder = emp();
    for i in 0..300 {
        builder = builder
            .limit(None, Some(1000))
            .filter(RexNode::gt(RexNode::input(0), RexNode::int(i)));
    }
    let plan = builder.build();

    let config = GeneratorConfig::from_yaml_str("max_recursion_depth: 1024\n").unwrap();
    let sql = to_sql_with_config(&plan, &config).unwrap();
    assert_eq!(sql.matches("FETCH NEXT 1000 ROWS ONLY").count(), 300);

    let config = GeneratorConfig::from_yaml_str("max_recursion_depth: 500\n").unwrap();
    let err = to_sql_with_config(&plan, &config).unwrap_err();
    assert_eq!(err.code, ErrorCode::RecursionLimit);
}

#[test]
fn test_errors_map_to_codes() {
    let cube = emp()
        .aggregate_sets(&[2, 3], vec![vec![2, 3], vec![2], vec![3], vec![]], vec![])
        .build();
    let err = to_sql(&cube, &latest(Product::Mysql)).unwrap_err();
    assert_eq!(err.code, ErrorCode::UnsupportedConstruct);
    assert!(err.message.contains("CUBE"), "{}", err.message);

    let orphan = emp()
        .filter(RexNode::exists(
            dept()
                .filter(RexNode::eq(
                    RexNode::input(0),
                    RexNode::CorrelVariable { id: 3, field: 0 },
                ))
                .build(),
        ))
        .build();
    let err = to_sql(&orphan, &ansi()).unwrap_err();
    assert_eq!(err.code, ErrorCode::UnresolvedCorrelation);
}

#[test]
fn test_input_ref_out_of_range() {
    let plan = emp().sort(vec![SortKey::asc(42)]).build();
    assert_sql_err!(
        plan,
        ansi(),
        SqlGenError::InputRefOutOfRange {
            index: 42,
            width: 6,
            ..
        }
    );
}

#[test]
fn test_no_partial_output_on_failure() {
    let plan = emp()
        .join_on(JoinKind::Full, dept().build(), "deptno", "deptno")
        .build();
    assert!(to_sql(&plan, &latest(Product::Mysql)).is_err());
}

#[test]
fn test_config_document_drives_generation() {
    let config = GeneratorConfig::from_yaml_str(
        r#"
dialect:
  product: mysql
  major_version: 5
  minor_version: 7
max_recursion_depth: 32
"#,
    )
    .unwrap();
    let plan = emp()
        .aggregate_sets(&[3], vec![vec![3], vec![]], vec![AggCall::count_star()])
        .build();
    assert_eq!(
        to_sql_with_config(&plan, &config).unwrap(),
        "SELECT `deptno`, COUNT(*)\nFROM `emp`\nGROUP BY `deptno` WITH ROLLUP"
    );
}

#[test]
fn test_config_rejects_zero_depth() {
    let result = GeneratorConfig::from_yaml_str("max_recursion_depth: 0\n");
    assert!(result.is_err());
}
