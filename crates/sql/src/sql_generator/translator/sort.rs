use super::{Clause, Converted, Frame, SqlGenerator};
use crate::ast::{NullsOrder, OrderItem, PostfixOp, SqlExpr};
use crate::plan::{Direction, NullDirection, RelNode, SortKey};
use crate::sql_generator::dialect::{NullEmulation, SqlDialect};
use crate::sql_generator::error::SqlGenError;

pub(crate) fn handle_sort(
    gen: &mut SqlGenerator,
    input: &RelNode,
    keys: &[SortKey],
    offset: Option<u64>,
    fetch: Option<u64>,
) -> Result<Converted, SqlGenError> {
    let converted = gen.convert(input)?;

    // WITH ROLLUP output is already ordered by its keys, and the emulated
    // form cannot be combined with ORDER BY.
    let (converted, keys) = match converted {
        Converted::Frame(frame) if frame.rollup_keys.is_some() && !keys.is_empty() => {
            if orders_like_rollup(&frame, keys) {
                tracing::trace!(target: "sql_generator", "Dropping ORDER BY implied by WITH ROLLUP");
                (Converted::Frame(frame), &[][..])
            } else {
                (Converted::Frame(frame.wrap(&mut gen.context)), keys)
            }
        }
        other => (other, keys),
    };

    let mut wanted = Vec::with_capacity(3);
    if !keys.is_empty() {
        wanted.push(Clause::OrderBy);
    }
    if offset.is_some() {
        wanted.push(Clause::Offset);
    }
    if fetch.is_some() {
        wanted.push(Clause::Fetch);
    }
    if wanted.is_empty() {
        return Ok(converted);
    }

    let mut frame = converted.into_frame(&mut gen.context, &wanted);
    let mut order_by = Vec::with_capacity(keys.len());
    for key in keys {
        let expr = frame
            .columns
            .get(key.field)
            .cloned()
            .ok_or(SqlGenError::InputRefOutOfRange {
                index: key.field,
                width: frame.columns.len(),
                node_type: "Sort",
            })?;
        let null_test = emulation_operand(&frame, key.field).unwrap_or_else(|| expr.clone());
        order_by.extend(sort_key_items(gen.dialect, expr, null_test, key));
    }

    frame.select.order_by = order_by;
    frame.select.offset = offset;
    frame.select.fetch = fetch;
    frame.clauses.extend(wanted);
    Ok(Converted::Frame(frame))
}

fn orders_like_rollup(frame: &Frame, keys: &[SortKey]) -> bool {
    let Some(rollup) = &frame.rollup_keys else {
        return false;
    };
    keys.len() <= rollup.len()
        && keys.iter().zip(rollup).all(|(key, rollup_expr)| {
            key.direction == Direction::Asc
                && key.nulls == NullDirection::Unspecified
                && frame.columns.get(key.field) == Some(rollup_expr)
        })
}

/// Select-list aliases cannot appear inside ORDER BY expressions on every
/// target, so the emulation key tests the aliased expression itself.
fn emulation_operand(frame: &Frame, field: usize) -> Option<SqlExpr> {
    if !frame.has(Clause::Select) {
        return None;
    }
    let item = frame.select.items.get(field)?;
    item.alias.as_ref().map(|_| item.expr.clone())
}

/// ORDER BY items for one key, with an emulation key in front when the
/// requested NULL placement is neither the default nor expressible.
pub(crate) fn sort_key_items(
    dialect: &SqlDialect,
    expr: SqlExpr,
    null_test: SqlExpr,
    key: &SortKey,
) -> Vec<OrderItem> {
    let desc = key.direction == Direction::Desc;
    let item = OrderItem {
        expr,
        desc,
        nulls: None,
    };
    let nulls_first = match key.nulls {
        NullDirection::Unspecified => return vec![item],
        NullDirection::First => true,
        NullDirection::Last => false,
    };
    if dialect.null_ordering().is_default_order(nulls_first, desc) {
        return vec![item];
    }

    let is_null = SqlExpr::Postfix {
        op: PostfixOp::IsNull,
        expr: Box::new(null_test),
    };
    match dialect.null_emulation() {
        NullEmulation::Keyword => vec![OrderItem {
            nulls: Some(if nulls_first {
                NullsOrder::First
            } else {
                NullsOrder::Last
            }),
            ..item
        }],
        NullEmulation::IsNull => vec![
            OrderItem {
                expr: is_null,
                desc: nulls_first,
                nulls: None,
            },
            item,
        ],
        NullEmulation::Case => {
            let (null_rank, value_rank) = if nulls_first { ("0", "1") } else { ("1", "0") };
            vec![
                OrderItem::asc(SqlExpr::Case {
                    whens: vec![(is_null, SqlExpr::raw(null_rank))],
                    else_result: Some(Box::new(SqlExpr::raw(value_rank))),
                }),
                item,
            ]
        }
    }
}
