use super::clause::item_alias;
use super::sort::sort_key_items;
use super::{Clause, Converted, SqlGenerator};
use crate::ast::{Function, SelectItem, SqlExpr, WindowSpec};
use crate::plan::{
    AggFunction, FrameBound, FrameUnits, RelNode, WindowCall, WindowFrame, WindowFunction,
    WindowGroup,
};
use crate::sql_generator::error::SqlGenError;
use crate::sql_generator::expr::ExprTranslator;

const CUMULATIVE_FRAME: &str = "RANGE BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW";

pub(crate) fn handle_window(
    gen: &mut SqlGenerator,
    plan: &RelNode,
    input: &RelNode,
    groups: &[WindowGroup],
) -> Result<Converted, SqlGenError> {
    let converted = gen.convert(input)?;
    let mut frame = converted.into_frame(&mut gen.context, &[Clause::Select]);
    let names = plan.row_type().names();

    let mut exprs = frame.columns.clone();
    for group in groups {
        let spec = window_spec(gen, &frame.columns, group)?;
        for call in &group.calls {
            exprs.push(window_call(gen, &frame.columns, &frame.names, call, &spec)?);
        }
    }

    let mut items = Vec::with_capacity(exprs.len());
    let mut columns = Vec::with_capacity(exprs.len());
    for (expr, name) in exprs.into_iter().zip(&names) {
        let alias = item_alias(&expr, name);
        columns.push(match &alias {
            Some(alias) => SqlExpr::ident(alias.clone()),
            None => expr.clone(),
        });
        items.push(SelectItem { expr, alias });
    }

    frame.select.items = items;
    frame.columns = columns;
    frame.names = names;
    frame.clauses.insert(Clause::Select);
    Ok(Converted::Frame(frame))
}

fn window_spec(
    gen: &SqlGenerator,
    columns: &[SqlExpr],
    group: &WindowGroup,
) -> Result<WindowSpec, SqlGenError> {
    let column = |index: usize| {
        columns
            .get(index)
            .cloned()
            .ok_or(SqlGenError::InputRefOutOfRange {
                index,
                width: columns.len(),
                node_type: "Window",
            })
    };

    let partition_by = group
        .partition_keys
        .iter()
        .map(|&i| column(i))
        .collect::<Result<Vec<_>, _>>()?;
    let mut order_by = Vec::with_capacity(group.order_keys.len());
    for key in &group.order_keys {
        let expr = column(key.field)?;
        order_by.extend(sort_key_items(gen.dialect, expr.clone(), expr, key));
    }

    let frame = match &group.frame {
        Some(frame) if !gen.dialect.supports_window_frames() => {
            return Err(SqlGenError::unsupported_because(
                "window frame",
                gen.dialect.name(),
                format!("cannot express {}", frame_text(frame)),
            ));
        }
        Some(frame) => Some(frame_text(frame)),
        None => None,
    };
    Ok(WindowSpec {
        partition_by,
        order_by,
        frame,
    })
}

fn window_call(
    gen: &mut SqlGenerator,
    columns: &[SqlExpr],
    names: &[String],
    call: &WindowCall,
    spec: &WindowSpec,
) -> Result<SqlExpr, SqlGenError> {
    let mut args = ExprTranslator::new(gen, columns, names, "Window").translate_all(&call.args)?;
    if args.is_empty() && call.function == WindowFunction::Aggregate(AggFunction::Count) {
        args.push(SqlExpr::Star);
    }

    let name = match &call.function {
        WindowFunction::Aggregate(AggFunction::Other(name)) => {
            gen.dialect.rewrite_function(name, args.len())
        }
        function => function.name().to_string(),
    };

    let mut spec = spec.clone();
    let cumulative = spec.frame.is_none()
        && !spec.order_by.is_empty()
        && !call.function.is_frame_insensitive()
        && gen.dialect.supports_window_frames();
    if cumulative {
        spec.frame = Some(CUMULATIVE_FRAME.to_string());
    }

    let mut function = Function::new(name, args);
    function.distinct = call.distinct;
    function.over = Some(spec);
    let expr = SqlExpr::Function(function);
    if call.function == WindowFunction::Aggregate(AggFunction::Sum0) {
        return Ok(SqlExpr::func("COALESCE", vec![expr, SqlExpr::raw("0")]));
    }
    Ok(expr)
}

fn frame_text(frame: &WindowFrame) -> String {
    let units = match frame.units {
        FrameUnits::Rows => "ROWS",
        FrameUnits::Range => "RANGE",
    };
    format!(
        "{} BETWEEN {} AND {}",
        units,
        bound_text(frame.start),
        bound_text(frame.end)
    )
}

fn bound_text(bound: FrameBound) -> String {
    match bound {
        FrameBound::UnboundedPreceding => "UNBOUNDED PRECEDING".to_string(),
        FrameBound::Preceding(n) => format!("{} PRECEDING", n),
        FrameBound::CurrentRow => "CURRENT ROW".to_string(),
        FrameBound::Following(n) => format!("{} FOLLOWING", n),
        FrameBound::UnboundedFollowing => "UNBOUNDED FOLLOWING".to_string(),
    }
}
