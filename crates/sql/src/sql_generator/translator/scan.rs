use super::{Converted, Frame, SqlGenerator};
use crate::ast::{SqlExpr, TableRef};
use crate::plan::{RowType, TableFunctionArg};
use crate::sql_generator::error::SqlGenError;
use crate::sql_generator::expr::ExprTranslator;

pub(crate) fn handle_scan(
    gen: &mut SqlGenerator,
    path: &[String],
    row_type: &RowType,
) -> Result<Converted, SqlGenError> {
    let Some(table_name) = path.last() else {
        return Err(SqlGenError::UnsupportedPlan {
            message: "scan without a table name".to_string(),
            node_type: "Scan",
        });
    };

    let alias = gen.context.fresh_alias(table_name);
    let explicit = gen.dialect.requires_table_alias();
    let table = TableRef::Table {
        path: path.to_vec(),
        alias: (explicit || &alias != table_name).then(|| alias.clone()),
    };

    let mut frame = Frame::over(table, row_type.names(), Some(alias));
    if explicit {
        if let Some(qualified) = frame.qualified_columns() {
            frame.columns = qualified;
        }
    }
    Ok(Converted::Frame(frame))
}

/// `TABLE(F(args))` as a FROM item.
pub(crate) fn handle_table_function(
    gen: &mut SqlGenerator,
    function: &str,
    args: &[TableFunctionArg],
    row_type: &RowType,
) -> Result<Converted, SqlGenError> {
    let mut sql_args = Vec::with_capacity(args.len());
    for arg in args {
        let expr = match arg {
            TableFunctionArg::Scalar(rex) => {
                ExprTranslator::new(gen, &[], &[], "TableFunctionCall").translate(rex)?
            }
            TableFunctionArg::Cursor(plan) => {
                SqlExpr::Cursor(Box::new(gen.nested("cursor", plan, true)?))
            }
        };
        sql_args.push(expr);
    }

    let name = gen.dialect.rewrite_function(function, sql_args.len());
    let table = TableRef::Function {
        call: SqlExpr::func(name, sql_args),
        alias: None,
    };
    Ok(Converted::Frame(Frame::over(table, row_type.names(), None)))
}
