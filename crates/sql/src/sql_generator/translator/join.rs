use super::{Clause, Converted, Frame, SqlGenerator};
use crate::ast::{JoinOperator, Select, SqlExpr, TableRef};
use crate::plan::{JoinKind, RelNode, RowType};
use crate::rex::{Literal, RexNode};
use crate::sql_generator::context::GeneratorContext;
use crate::sql_generator::dialect::CrossJoinSyntax;
use crate::sql_generator::error::SqlGenError;
use crate::sql_generator::expr::ExprTranslator;
use std::collections::BTreeSet;

pub(crate) fn handle_join(
    gen: &mut SqlGenerator,
    kind: JoinKind,
    left: &RelNode,
    right: &RelNode,
    condition: &RexNode,
) -> Result<Converted, SqlGenError> {
    if kind == JoinKind::Full && !gen.dialect.supports_full_join() {
        return Err(SqlGenError::unsupported("FULL JOIN", gen.dialect.name()));
    }

    let left_converted = gen.convert(left)?;
    let (left_ref, mut columns) = from_item(&mut gen.context, left_converted, true);
    let right_converted = gen.convert(right)?;
    let (right_ref, right_columns) = from_item(&mut gen.context, right_converted, false);
    columns.extend(right_columns);

    let names = RowType::join(&left.row_type(), &right.row_type()).names();

    let always_true = matches!(condition, RexNode::Literal(Literal::Boolean(true)));
    let (op, condition) = match kind {
        JoinKind::Inner if always_true => {
            let op = match gen.dialect.cross_join {
                CrossJoinSyntax::Comma => JoinOperator::Comma,
                CrossJoinSyntax::CrossJoin => JoinOperator::Cross,
            };
            (op, None)
        }
        _ => {
            let on = ExprTranslator::new(gen, &columns, &names, "Join").translate(condition)?;
            let op = match kind {
                JoinKind::Inner => JoinOperator::Inner,
                JoinKind::Left => JoinOperator::Left,
                JoinKind::Right => JoinOperator::Right,
                JoinKind::Full => JoinOperator::Full,
            };
            (op, Some(on))
        }
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
        names,
        from_alias: None,
        rollup_keys: None,
    }))
}

/// The FROM item for one side of a join, with its columns qualified.
///
/// A bare table, derived table or (on the left) an earlier join is used
/// directly; anything else becomes a derived table first.
pub(crate) fn from_item(
    ctx: &mut GeneratorContext,
    converted: Converted,
    allow_join: bool,
) -> (TableRef, Vec<SqlExpr>) {
    let frame = match converted {
        Converted::Frame(frame) => frame,
        Converted::Query { query, names } => Frame::derived(ctx, query, names),
    };
    let bare = frame.clauses.len() == 1
        && frame.has(Clause::From)
        && frame.select.items.is_empty()
        && !frame.select.distinct;

    if bare {
        let reusable = match &frame.select.from {
            Some(TableRef::Table { .. }) | Some(TableRef::Derived { alias: Some(_), .. }) => {
                frame.qualified_columns()
            }
            Some(TableRef::Join { .. }) if allow_join => Some(frame.columns.clone()),
            _ => None,
        };
        if let (Some(columns), Some(table)) = (reusable, frame.select.from.clone()) {
            return (table, columns);
        }
    }

    let alias = ctx.fresh_alias("t");
    let columns = frame
        .names
        .iter()
        .map(|name| SqlExpr::Identifier(vec![alias.clone(), name.clone()]))
        .collect();
    let table = TableRef::Derived {
        query: Box::new(frame.finish(true)),
        alias: Some(alias),
        columns: Vec::new(),
        lateral: false,
    };
    (table, columns)
}
