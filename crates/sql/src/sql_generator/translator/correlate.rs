use super::{Clause, Converted, Frame, SqlGenerator};
use crate::ast::{JoinOperator, Select, SqlExpr, TableRef};
use crate::plan::{CorrelateKind, RelNode};
use crate::rex::CorrelationId;
use crate::sql_generator::context::CorrelationBinding;
use crate::sql_generator::dialect::LateralSyntax;
use crate::sql_generator::error::SqlGenError;
use std::collections::BTreeSet;

/// `left, LATERAL (right) AS t`, where `right` sees the current row of
/// `left` through `correlation_id`.
pub(crate) fn handle_correlate(
    gen: &mut SqlGenerator,
    plan: &RelNode,
    left: &RelNode,
    right: &RelNode,
    correlation_id: CorrelationId,
    kind: CorrelateKind,
) -> Result<Converted, SqlGenError> {
    let syntax = gen.dialect.lateral_syntax();
    if syntax == LateralSyntax::Unsupported {
        return Err(SqlGenError::unsupported("LATERAL", gen.dialect.name()));
    }

    let converted = gen.convert(left)?;
    let cor_alias = gen.context.fresh_alias(&format!("$cor{}", correlation_id));
    let (left_ref, mut columns) = correlated_item(converted, &cor_alias);

    let token = gen.context.enter_scope("correlate");
    gen.context.bind_correlation(
        correlation_id,
        CorrelationBinding {
            alias: cor_alias.clone(),
            columns: columns.clone().into(),
        },
    );
    let right_query = gen.convert(right).map(|c| c.into_query(true));
    gen.context.exit_scope(token);
    let right_query = right_query?;

    let right_alias = gen.context.fresh_alias("t");
    columns.extend(
        right
            .row_type()
            .names()
            .into_iter()
            .map(|name| SqlExpr::Identifier(vec![right_alias.clone(), name])),
    );
    let right_ref = TableRef::Derived {
        query: Box::new(right_query),
        alias: Some(right_alias),
        columns: Vec::new(),
        lateral: syntax == LateralSyntax::Lateral,
    };

    let (op, condition) = match (syntax, kind) {
        (LateralSyntax::Apply, CorrelateKind::Inner) => (JoinOperator::CrossApply, None),
        (LateralSyntax::Apply, CorrelateKind::Left) => (JoinOperator::OuterApply, None),
        (_, CorrelateKind::Inner) => (JoinOperator::Comma, None),
        (_, CorrelateKind::Left) => (JoinOperator::Left, Some(SqlExpr::raw("TRUE"))),
    };

    let table = TableRef::Join {
        op,
        left: Box::new(left_ref),
        right: Box::new(right_ref),
        condition,
    };
    Ok(Converted::Frame(Frame {
        select: Select::from(table),
        clauses: BTreeSet::from([Clause::From]),
        columns,
        names: plan.row_type().names(),
        from_alias: None,
        rollup_keys: None,
    }))
}

/// The left input under the correlation alias: a bare table is re-aliased,
/// anything else becomes a derived table.
fn correlated_item(converted: Converted, alias: &str) -> (TableRef, Vec<SqlExpr>) {
    let (table, names) = match converted {
        Converted::Frame(frame) => {
            let bare = frame.clauses.len() == 1
                && frame.select.items.is_empty()
                && !frame.select.distinct;
            match (bare, &frame.select.from) {
                (true, Some(TableRef::Table { path, .. })) => (
                    TableRef::Table {
                        path: path.clone(),
                        alias: Some(alias.to_string()),
                    },
                    frame.names,
                ),
                _ => {
                    let names = frame.names.clone();
                    (derived(frame.finish(true), alias), names)
                }
            }
        }
        Converted::Query { query, names } => (derived(query, alias), names),
    };
    let columns = names
        .into_iter()
        .map(|name| SqlExpr::Identifier(vec![alias.to_string(), name]))
        .collect();
    (table, columns)
}

fn derived(query: crate::ast::SqlQuery, alias: &str) -> TableRef {
    TableRef::Derived {
        query: Box::new(query),
        alias: Some(alias.to_string()),
        columns: Vec::new(),
        lateral: false,
    }
}
