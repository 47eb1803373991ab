use super::clause::item_alias;
use super::{Clause, Converted, Frame, SqlGenerator};
use crate::ast::{Function, GroupBy, SelectItem, SqlExpr};
use crate::plan::{AggCall, AggFunction, RelNode};
use crate::sql_generator::dialect::{RollupSyntax, SqlDialect};
use crate::sql_generator::error::SqlGenError;
use std::collections::BTreeSet;

/// Largest key count for which a CUBE is recognised from its grouping sets.
const MAX_CUBE_KEYS: usize = 16;

/// What a list of grouping sets amounts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum GroupingShape {
    /// One set equal to the group key
    Plain,
    /// Keys in rollup order
    Rollup(Vec<usize>),
    Cube,
    Sets(Vec<Vec<usize>>),
}

pub(crate) fn handle_aggregate(
    gen: &mut SqlGenerator,
    plan: &RelNode,
    input: &RelNode,
    group_set: &[usize],
    grouping_sets: Option<&[Vec<usize>]>,
    calls: &[AggCall],
) -> Result<Converted, SqlGenError> {
    let shape = match grouping_sets {
        Some(sets) => classify(group_set, sets)?,
        None => GroupingShape::Plain,
    };
    let names = plan.row_type().names();
    let converted = gen.convert(input)?;

    if shape == GroupingShape::Plain && group_set.is_empty() {
        if let Converted::Frame(frame) = &converted {
            if gen.dialect.supports_nested_aggregates() && can_nest(frame, calls) {
                tracing::trace!(target: "sql_generator", "Folding aggregate over aggregate");
                let frame = frame.clone();
                return nest(gen.dialect, frame, calls, names).map(Converted::Frame);
            }
        }
    }

    let mut frame = converted.into_frame(&mut gen.context, &[Clause::GroupBy]);
    let width = frame.columns.len();
    let keys = group_set
        .iter()
        .map(|&i| column(&frame.columns, i))
        .collect::<Result<Vec<_>, _>>()?;

    let covers_input =
        group_set.iter().copied().collect::<BTreeSet<_>>() == (0..width).collect::<BTreeSet<_>>();
    if calls.is_empty() && shape == GroupingShape::Plain && !group_set.is_empty() && covers_input {
        frame.select.distinct = true;
        frame.select.items = select_items(&keys, &names);
        frame.columns = keys;
        frame.names = names;
        frame.clauses.insert(Clause::Select);
        return Ok(Converted::Frame(frame));
    }

    let call_exprs = calls
        .iter()
        .map(|call| aggregate_call(gen.dialect, call, &frame.columns))
        .collect::<Result<Vec<_>, _>>()?;

    let (group_by, rollup_keys) = group_by(gen.dialect, &shape, group_set, &keys, &frame.columns, calls)?;

    let mut columns = keys;
    columns.extend(call_exprs);
    frame.select.items = select_items(&columns, &names);
    frame.select.group_by = group_by;
    frame.rollup_keys = rollup_keys;
    frame.columns = columns;
    frame.names = names;
    frame.clauses.insert(Clause::GroupBy);
    Ok(Converted::Frame(frame))
}

fn column(columns: &[SqlExpr], index: usize) -> Result<SqlExpr, SqlGenError> {
    columns
        .get(index)
        .cloned()
        .ok_or(SqlGenError::InputRefOutOfRange {
            index,
            width: columns.len(),
            node_type: "Aggregate",
        })
}

fn select_items(exprs: &[SqlExpr], names: &[String]) -> Vec<SelectItem> {
    exprs
        .iter()
        .zip(names)
        .map(|(expr, name)| SelectItem {
            expr: expr.clone(),
            alias: item_alias(expr, name),
        })
        .collect()
}

fn group_by(
    dialect: &SqlDialect,
    shape: &GroupingShape,
    group_set: &[usize],
    keys: &[SqlExpr],
    columns: &[SqlExpr],
    calls: &[AggCall],
) -> Result<(Option<GroupBy>, Option<Vec<SqlExpr>>), SqlGenError> {
    let exprs_of = |fields: &[usize]| -> Result<Vec<SqlExpr>, SqlGenError> {
        fields.iter().map(|&i| column(columns, i)).collect()
    };
    let emulated = dialect.rollup_syntax() == RollupSyntax::Emulated;

    match shape {
        GroupingShape::Plain if group_set.is_empty() => {
            Ok((calls.is_empty().then(|| GroupBy::Exprs(Vec::new())), None))
        }
        GroupingShape::Plain => Ok((Some(GroupBy::Exprs(keys.to_vec())), None)),
        GroupingShape::Rollup(order) => {
            let exprs = exprs_of(order)?;
            if emulated {
                Ok((Some(GroupBy::WithRollup(exprs.clone())), Some(exprs)))
            } else {
                Ok((Some(GroupBy::Rollup(exprs)), None))
            }
        }
        GroupingShape::Cube => {
            if !dialect.supports_cube() {
                return Err(SqlGenError::unsupported("CUBE", dialect.name()));
            }
            if emulated {
                Ok((Some(GroupBy::WithCube(keys.to_vec())), None))
            } else {
                Ok((Some(GroupBy::Cube(keys.to_vec())), None))
            }
        }
        GroupingShape::Sets(sets) => {
            if !dialect.supports_grouping_sets() {
                return Err(SqlGenError::unsupported("GROUPING SETS", dialect.name()));
            }
            let sets = sets
                .iter()
                .map(|set| exprs_of(set))
                .collect::<Result<Vec<_>, _>>()?;
            Ok((Some(GroupBy::GroupingSets(sets)), None))
        }
    }
}

/// Recognise ROLLUP and CUBE from the grouping sets; ROLLUP wins when both
/// fit, so a one-key CUBE becomes ROLLUP.
pub(crate) fn classify(
    group_set: &[usize],
    sets: &[Vec<usize>],
) -> Result<GroupingShape, SqlGenError> {
    let key: BTreeSet<usize> = group_set.iter().copied().collect();
    let normalized: Vec<BTreeSet<usize>> = sets
        .iter()
        .map(|s| s.iter().copied().collect())
        .collect();
    if let Some((i, _)) = normalized
        .iter()
        .enumerate()
        .find(|(_, set)| !set.is_subset(&key))
    {
        return Err(SqlGenError::MalformedGroupingSets {
            group_key: group_set.to_vec(),
            offending_set: sets[i].clone(),
        });
    }

    if normalized.len() == 1 && normalized[0] == key {
        return Ok(GroupingShape::Plain);
    }
    if let Some(order) = rollup_order(&key, &normalized) {
        return Ok(GroupingShape::Rollup(order));
    }
    if is_cube(&key, &normalized) {
        return Ok(GroupingShape::Cube);
    }
    Ok(GroupingShape::Sets(
        normalized
            .into_iter()
            .map(|s| s.into_iter().collect())
            .collect(),
    ))
}

/// Key order if the sets are the prefixes of some ordering of `key`.
fn rollup_order(key: &BTreeSet<usize>, sets: &[BTreeSet<usize>]) -> Option<Vec<usize>> {
    if sets.len() != key.len() + 1 {
        return None;
    }
    let mut chain: Vec<&BTreeSet<usize>> = sets.iter().collect();
    chain.sort_by_key(|s| std::cmp::Reverse(s.len()));
    if chain[0] != key {
        return None;
    }
    let mut order = Vec::with_capacity(key.len());
    for pair in chain.windows(2).rev() {
        let (larger, smaller) = (pair[0], pair[1]);
        if larger.len() != smaller.len() + 1 || !smaller.is_subset(larger) {
            return None;
        }
        order.extend(larger.difference(smaller).copied());
    }
    Some(order)
}

fn is_cube(key: &BTreeSet<usize>, sets: &[BTreeSet<usize>]) -> bool {
    if key.len() > MAX_CUBE_KEYS || sets.len() != 1 << key.len() {
        return false;
    }
    let distinct: BTreeSet<&BTreeSet<usize>> = sets.iter().collect();
    distinct.len() == sets.len()
}

pub(crate) fn aggregate_call(
    dialect: &SqlDialect,
    call: &AggCall,
    columns: &[SqlExpr],
) -> Result<SqlExpr, SqlGenError> {
    let mut args = call
        .args
        .iter()
        .map(|&i| column(columns, i))
        .collect::<Result<Vec<_>, _>>()?;
    let mut filter = call.filter.map(|i| column(columns, i)).transpose()?;
    if args.is_empty() && call.function == AggFunction::Count {
        args.push(SqlExpr::Star);
    }

    if !dialect.supports_filter() {
        if let Some(condition) = filter.take() {
            args = args
                .into_iter()
                .map(|arg| {
                    let value = if arg == SqlExpr::Star {
                        SqlExpr::raw("1")
                    } else {
                        arg
                    };
                    SqlExpr::Case {
                        whens: vec![(condition.clone(), value)],
                        else_result: None,
                    }
                })
                .collect();
        }
    }

    let name = match &call.function {
        AggFunction::Other(name) => dialect.rewrite_function(name, args.len()),
        function => function.name().to_string(),
    };
    let mut function = Function::new(name, args);
    function.distinct = call.distinct;
    function.filter = filter.map(Box::new);
    let expr = SqlExpr::Function(function);

    if call.function == AggFunction::Sum0 {
        return Ok(SqlExpr::func("COALESCE", vec![expr, SqlExpr::raw("0")]));
    }
    Ok(expr)
}

const NESTABLE: [&str; 5] = ["COUNT", "SUM", "MIN", "MAX", "AVG"];

/// An empty-key aggregate whose calls each take one aggregated column of a
/// grouped input can be written as `SUM(SUM(x))`.
fn can_nest(frame: &Frame, calls: &[AggCall]) -> bool {
    let grouped = matches!(&frame.select.group_by, Some(GroupBy::Exprs(keys)) if !keys.is_empty());
    grouped
        && frame.has(Clause::GroupBy)
        && !frame.has(Clause::Select)
        && !calls.is_empty()
        && calls.iter().all(|call| {
            !call.distinct
                && call.filter.is_none()
                && NESTABLE.contains(&call.function.name())
                && matches!(call.args.as_slice(), [arg] if is_plain_aggregate(frame.columns.get(*arg)))
        })
}

fn is_plain_aggregate(expr: Option<&SqlExpr>) -> bool {
    matches!(
        expr,
        Some(SqlExpr::Function(f))
            if f.over.is_none() && f.filter.is_none() && NESTABLE.contains(&f.name.as_str())
    )
}

fn nest(
    dialect: &SqlDialect,
    mut frame: Frame,
    calls: &[AggCall],
    names: Vec<String>,
) -> Result<Frame, SqlGenError> {
    let exprs = calls
        .iter()
        .map(|call| aggregate_call(dialect, call, &frame.columns))
        .collect::<Result<Vec<_>, _>>()?;
    frame.select.items = select_items(&exprs, &names);
    frame.columns = exprs;
    frame.names = names;
    frame.clauses.insert(Clause::Select);
    Ok(frame)
}
