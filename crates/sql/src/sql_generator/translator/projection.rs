use super::clause::item_alias;
use super::{Clause, Converted, Frame, SqlGenerator};
use crate::ast::{BinaryOp, SelectItem, SqlExpr};
use crate::plan::RelNode;
use crate::rex::{CorrelationId, RexNode};
use crate::sql_generator::context::CorrelationBinding;
use crate::sql_generator::error::SqlGenError;
use crate::sql_generator::expr::ExprTranslator;

pub(crate) fn handle_filter(
    gen: &mut SqlGenerator,
    input: &RelNode,
    condition: &RexNode,
    variables_set: &[CorrelationId],
) -> Result<Converted, SqlGenError> {
    let converted = gen.convert(input)?;
    let clause = match &converted {
        Converted::Frame(frame) if frame.has(Clause::GroupBy) => Clause::Having,
        _ => Clause::Where,
    };
    let mut frame = converted.into_frame(&mut gen.context, &[clause]);
    let clause = if frame.has(Clause::GroupBy) {
        Clause::Having
    } else {
        Clause::Where
    };

    let predicate = if variables_set.is_empty() {
        ExprTranslator::new(gen, &frame.columns, &frame.names, "Filter").translate(condition)?
    } else {
        let token = gen.context.enter_scope("correlated filter");
        bind_correlations(gen, &frame, variables_set);
        let result =
            ExprTranslator::new(gen, &frame.columns, &frame.names, "Filter").translate(condition);
        gen.context.exit_scope(token);
        result?
    };

    let slot = if clause == Clause::Having {
        &mut frame.select.having
    } else {
        &mut frame.select.selection
    };
    *slot = Some(match slot.take() {
        Some(existing) => SqlExpr::binary(BinaryOp::And, existing, predicate),
        None => predicate,
    });
    frame.clauses.insert(clause);
    Ok(Converted::Frame(frame))
}

/// Make the frame's row visible to subqueries through `ids`.
fn bind_correlations(gen: &mut SqlGenerator, frame: &Frame, ids: &[CorrelationId]) {
    let columns = frame
        .qualified_columns()
        .unwrap_or_else(|| frame.columns.clone());
    let binding = CorrelationBinding {
        alias: frame.from_alias.clone().unwrap_or_default(),
        columns: columns.into(),
    };
    for id in ids {
        gen.context.bind_correlation(*id, binding.clone());
    }
}

pub(crate) fn handle_project(
    gen: &mut SqlGenerator,
    input: &RelNode,
    exprs: &[RexNode],
    names: &[String],
) -> Result<Converted, SqlGenError> {
    let converted = gen.convert(input)?;

    let identity = exprs.len() == converted.names().len()
        && exprs.iter().enumerate().all(|(i, e)| e.is_input_ref(i))
        && names == converted.names();
    if identity {
        return Ok(converted);
    }

    let refs: Option<Vec<usize>> = exprs
        .iter()
        .map(|e| match e {
            RexNode::InputRef(i) => Some(*i),
            _ => None,
        })
        .collect();
    if let Some(refs) = refs {
        let mut frame = converted.into_frame(&mut gen.context, &[]);
        if drops_sort_alias(&frame, &refs, names) {
            frame = frame.wrap(&mut gen.context);
        }
        if !frame.select.distinct {
            return reselect(frame, &refs, names).map(Converted::Frame);
        }
        return compute(gen, Converted::Frame(frame), exprs, names);
    }
    compute(gen, converted, exprs, names)
}

/// Whether picking `refs` would drop or rename a select-list alias that the
/// statement's ORDER BY may refer to.
fn drops_sort_alias(frame: &Frame, refs: &[usize], names: &[String]) -> bool {
    if !frame.has(Clause::OrderBy) || !frame.has(Clause::Select) {
        return false;
    }
    frame
        .select
        .items
        .iter()
        .filter_map(|item| item.alias.as_deref())
        .any(|alias| {
            !refs.iter().zip(names).any(|(&i, name)| {
                name == alias
                    && frame.select.items.get(i).and_then(|it| it.alias.as_deref()) == Some(alias)
            })
        })
}

/// A projection that only picks and renames fields; it rewrites the select
/// list in place without adding a clause.
fn reselect(mut frame: Frame, refs: &[usize], names: &[String]) -> Result<Frame, SqlGenError> {
    let width = frame.columns.len();
    let out_of_range = |index: usize| SqlGenError::InputRefOutOfRange {
        index,
        width,
        node_type: "Project",
    };
    let computed = frame.has(Clause::Select);

    let mut items = Vec::with_capacity(refs.len());
    let mut columns = Vec::with_capacity(refs.len());
    for (&i, name) in refs.iter().zip(names) {
        let column = frame.columns.get(i).ok_or_else(|| out_of_range(i))?;
        let expr = if frame.select.items.is_empty() {
            column.clone()
        } else {
            frame
                .select
                .items
                .get(i)
                .ok_or_else(|| out_of_range(i))?
                .expr
                .clone()
        };
        let alias = item_alias(&expr, name);
        columns.push(match (&alias, computed) {
            (Some(alias), true) => SqlExpr::ident(alias.clone()),
            (None, true) => expr.clone(),
            (_, false) => column.clone(),
        });
        items.push(SelectItem { expr, alias });
    }

    frame.select.items = items;
    frame.columns = columns;
    frame.names = names.to_vec();
    Ok(frame)
}

fn compute(
    gen: &mut SqlGenerator,
    converted: Converted,
    exprs: &[RexNode],
    names: &[String],
) -> Result<Converted, SqlGenError> {
    let mut frame = converted.into_frame(&mut gen.context, &[Clause::Select]);
    let translated =
        ExprTranslator::new(gen, &frame.columns, &frame.names, "Project").translate_all(exprs)?;

    let mut items = Vec::with_capacity(translated.len());
    let mut columns = Vec::with_capacity(translated.len());
    for (expr, name) in translated.into_iter().zip(names) {
        let alias = item_alias(&expr, name);
        columns.push(match &alias {
            Some(alias) => SqlExpr::ident(alias.clone()),
            None => expr.clone(),
        });
        items.push(SelectItem { expr, alias });
    }

    frame.select.items = items;
    frame.columns = columns;
    frame.names = names.to_vec();
    frame.clauses.insert(Clause::Select);
    Ok(Converted::Frame(frame))
}
