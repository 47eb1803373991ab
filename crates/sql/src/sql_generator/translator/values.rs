use super::{Clause, Converted, Frame, SqlGenerator};
use crate::ast::{BinaryOp, Select, SelectItem, SetOperator, SqlExpr, SqlQuery, TableRef};
use crate::plan::RowType;
use crate::rex::Literal;
use crate::sql_generator::dialect::ValuesSyntax;
use crate::sql_generator::error::SqlGenError;
use crate::sql_generator::literal::literal_to_sql;
use std::collections::BTreeSet;

pub(crate) fn handle_values(
    gen: &mut SqlGenerator,
    row_type: &RowType,
    rows: &[Vec<Literal>],
) -> Result<Converted, SqlGenError> {
    let names = row_type.names();
    let empty = rows.is_empty();

    let mut sql_rows = rows
        .iter()
        .map(|row| {
            if row.len() != names.len() {
                return Err(SqlGenError::UnsupportedPlan {
                    message: format!(
                        "row of {} values for {} columns",
                        row.len(),
                        names.len()
                    ),
                    node_type: "Values",
                });
            }
            row.iter()
                .map(|literal| literal_to_sql(literal, gen.dialect))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;
    // No rows: one row of NULLs that a false condition removes
    if empty {
        sql_rows.push(vec![SqlExpr::raw("NULL"); names.len()]);
    }

    let converted = match gen.dialect.values_syntax() {
        ValuesSyntax::Values => {
            let alias = gen.context.fresh_alias("t");
            let table = TableRef::Derived {
                query: Box::new(SqlQuery::Values(sql_rows)),
                alias: Some(alias.clone()),
                columns: names.clone(),
                lateral: false,
            };
            Converted::Frame(Frame::over(table, names, Some(alias)))
        }
        syntax => {
            let dual = syntax == ValuesSyntax::FromDual;
            let selects: Vec<Frame> = sql_rows
                .into_iter()
                .map(|row| row_select(row, &names, dual))
                .collect();
            match <[Frame; 1]>::try_from(selects) {
                Ok([frame]) => Converted::Frame(frame),
                Err(selects) => Converted::Query {
                    query: SqlQuery::SetOp {
                        op: SetOperator::Union,
                        all: true,
                        inputs: selects.into_iter().map(|f| f.finish(false)).collect(),
                    },
                    names,
                },
            }
        }
    };

    if !empty {
        return Ok(converted);
    }
    let mut frame = converted.into_frame(&mut gen.context, &[Clause::Where]);
    frame.select.selection = Some(SqlExpr::binary(
        BinaryOp::Eq,
        SqlExpr::raw("1"),
        SqlExpr::raw("0"),
    ));
    frame.clauses.insert(Clause::Where);
    Ok(Converted::Frame(frame))
}

/// `SELECT 1 AS "a", 'x' AS "b"`, optionally `FROM "DUAL"`.
fn row_select(row: Vec<SqlExpr>, names: &[String], dual: bool) -> Frame {
    let items: Vec<SelectItem> = row
        .into_iter()
        .zip(names)
        .map(|(expr, name)| SelectItem {
            expr,
            alias: Some(name.clone()),
        })
        .collect();
    let mut clauses = BTreeSet::from([Clause::Select]);
    let from = dual.then(|| {
        clauses.insert(Clause::From);
        TableRef::Table {
            path: vec!["DUAL".to_string()],
            alias: None,
        }
    });
    Frame {
        select: Select {
            items,
            from,
            ..Default::default()
        },
        clauses,
        columns: names.iter().cloned().map(SqlExpr::ident).collect(),
        names: names.to_vec(),
        from_alias: None,
        rollup_keys: None,
    }
}
