use super::sort::sort_key_items;
use super::{Converted, Frame, SqlGenerator};
use crate::ast::{MatchRecognizeClause, SqlExpr, TableRef};
use crate::plan::{MatchRecognize, RelNode};
use crate::rex::{Operator, RexNode};
use crate::sql_generator::error::SqlGenError;
use crate::sql_generator::expr::{ExprTranslator, PatternMode};
use crate::sql_generator::literal::literal_to_sql;

pub(crate) fn handle_match_recognize(
    gen: &mut SqlGenerator,
    plan: &RelNode,
    mr: &MatchRecognize,
) -> Result<Converted, SqlGenError> {
    let input = gen.nested("match input", &mr.input, true)?;
    let names = mr.input.row_type().names();
    let columns: Vec<SqlExpr> = names.iter().cloned().map(SqlExpr::ident).collect();
    let column = |index: usize| {
        columns
            .get(index)
            .cloned()
            .ok_or(SqlGenError::InputRefOutOfRange {
                index,
                width: columns.len(),
                node_type: "MatchRecognize",
            })
    };

    let partition_by = mr
        .partition_keys
        .iter()
        .map(|&i| column(i))
        .collect::<Result<Vec<_>, _>>()?;
    let mut order_by = Vec::with_capacity(mr.order_keys.len());
    for key in &mr.order_keys {
        let expr = column(key.field)?;
        order_by.extend(sort_key_items(gen.dialect, expr.clone(), expr, key));
    }

    let default_semantics = if mr.all_rows { "RUNNING" } else { "FINAL" };
    let mut measures = Vec::with_capacity(mr.measures.len());
    for (name, measure) in &mr.measures {
        let expr = ExprTranslator::new(gen, &columns, &names, "MatchRecognize")
            .with_pattern_mode(PatternMode::Measure)
            .translate(measure)?;
        let expr = match measure {
            RexNode::Call {
                op: Operator::Running | Operator::Final,
                ..
            } => expr,
            _ => SqlExpr::Prefixed {
                keyword: default_semantics,
                expr: Box::new(expr),
            },
        };
        measures.push((expr, name.clone()));
    }

    let mut definitions = Vec::with_capacity(mr.definitions.len());
    for (var, condition) in &mr.definitions {
        let expr = ExprTranslator::new(gen, &columns, &names, "MatchRecognize")
            .with_pattern_mode(PatternMode::Define)
            .translate(condition)?;
        definitions.push((var.clone(), expr));
    }

    let within = mr
        .interval
        .as_ref()
        .map(|interval| literal_to_sql(interval, gen.dialect))
        .transpose()?;
    let subsets = mr
        .subsets
        .iter()
        .map(|(name, vars)| (name.clone(), vars.iter().cloned().collect()))
        .collect();

    let clause = MatchRecognizeClause {
        partition_by,
        order_by,
        measures,
        all_rows: mr.all_rows,
        after: mr.after.clone(),
        strict_start: mr.strict_start,
        strict_end: mr.strict_end,
        pattern: mr.pattern.clone(),
        within,
        subsets,
        definitions,
    };
    let table = TableRef::MatchRecognize {
        input: Box::new(input),
        clause: Box::new(clause),
    };
    Ok(Converted::Frame(Frame::over(
        table,
        plan.row_type().names(),
        None,
    )))
}
