use super::{Converted, SqlGenerator};
use crate::ast::{SetOperator, SqlQuery};
use crate::plan::{RelNode, SetOpKind};
use crate::sql_generator::error::SqlGenError;

pub(crate) fn handle_set_op(
    gen: &mut SqlGenerator,
    kind: SetOpKind,
    all: bool,
    inputs: &[RelNode],
) -> Result<Converted, SqlGenError> {
    let Some(first) = inputs.first() else {
        return Err(SqlGenError::UnsupportedPlan {
            message: "set operation without inputs".to_string(),
            node_type: "SetOp",
        });
    };
    let names = first.row_type().names();

    // Every branch is its own statement; aliases name the output columns
    // positionally so the branches line up.
    let branches = inputs
        .iter()
        .map(|input| gen.nested("union branch", input, true))
        .collect::<Result<Vec<_>, _>>()?;

    let op = match kind {
        SetOpKind::Union => SetOperator::Union,
        SetOpKind::Intersect => SetOperator::Intersect,
        SetOpKind::Except => SetOperator::Except,
    };
    Ok(Converted::Query {
        query: SqlQuery::SetOp {
            op,
            all,
            inputs: branches,
        },
        names,
    })
}
