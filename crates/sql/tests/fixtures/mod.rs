#![allow(dead_code, unused_imports)]

#[macro_use]
pub mod macros;

pub use relsql::dialects::dialect_for;
pub use relsql::plan::{
    AggCall, AggFunction, CorrelateKind, JoinKind, PlanBuilder, RelNode, RowType, SetOpKind,
    SortKey,
};
pub use relsql::rex::{Literal, Operator, RexNode};
pub use relsql::sql_generator::{NullCollation, Product, SqlDialect, SqlGenError, SqlGenerator};
pub use relsql::types::SqlType;

pub use crate::common::{dept, emp, product, render, try_render};

/// Latest version of `product` with its default NULL collation.
pub fn latest(product: Product) -> SqlDialect {
    dialect_for(product, 0, 0, None)
}

pub fn ansi() -> SqlDialect {
    SqlDialect::ansi_baseline()
}
