use relsql::plan::{PlanBuilder, RelNode, RowType};
use relsql::rex::RexNode;
use relsql::sql_generator::SqlGenError;
use relsql::types::{SqlType, TypeName};
use relsql::unparser::{unparse, UnparseOptions};
use relsql::{SqlDialect, SqlGenerator};

/// `empno, ename, job, deptno, sal, comm`
#[allow(dead_code)]
pub fn emp_row() -> RowType {
    RowType::of(&[
        ("empno", SqlType::integer()),
        ("ename", SqlType::varchar(10)),
        ("job", SqlType::varchar(9)),
        ("deptno", SqlType::integer()),
        ("sal", SqlType::decimal(7, 2)),
        ("comm", SqlType::decimal(7, 2)),
    ])
}

#[allow(dead_code)]
pub fn emp() -> PlanBuilder {
    PlanBuilder::scan(&["emp"], emp_row())
}

/// `deptno, dname, loc`
#[allow(dead_code)]
pub fn dept() -> PlanBuilder {
    PlanBuilder::scan(
        &["dept"],
        RowType::of(&[
            ("deptno", SqlType::integer()),
            ("dname", SqlType::varchar(14)),
            ("loc", SqlType::varchar(13)),
        ]),
    )
}

#[allow(dead_code)]
pub fn product() -> PlanBuilder {
    PlanBuilder::scan(
        &["foodmart", "product"],
        RowType::of(&[
            ("product_class_id", SqlType::integer()),
            ("product_id", SqlType::integer()),
            ("brand_name", SqlType::varchar(60)),
            ("net_weight", SqlType::new(TypeName::Double)),
        ]),
    )
}

/// `SELECT ename FROM emp WHERE empno > 10`
#[allow(dead_code)]
pub fn test_plan() -> RelNode {
    emp()
        .filter(RexNode::gt(RexNode::input(0), RexNode::int(10)))
        .project_fields(&["ename"])
        .build()
}

/// Convert and render with default layout, keeping the generator error.
#[allow(dead_code)]
pub fn try_render(plan: &RelNode, dialect: &SqlDialect) -> Result<String, SqlGenError> {
    let mut gen = SqlGenerator::new(dialect);
    let query = gen.plan_to_query(plan)?;
    unparse(&query, dialect, &UnparseOptions::default())
}

#[allow(dead_code)]
pub fn render(plan: &RelNode, dialect: &SqlDialect) -> String {
    match try_render(plan, dialect) {
        Ok(sql) => sql,
        Err(e) => panic!("failed to render for {}: {}", dialect.name(), e),
    }
}
