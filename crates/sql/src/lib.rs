//! Compiles logical relational plans into SQL text for a chosen database
//! product.
//!
//! - **Plans**: [`plan::RelNode`] trees over positional [`rex::RexNode`]
//!   expressions, built with [`plan::PlanBuilder`].
//! - **Dialects**: per-product descriptors ([`dialects`]), looked up by name
//!   through [`dialect_router`].
//! - **Generation**: the plan walker in [`sql_generator`] builds an [`ast`]
//!   which [`unparser`] renders to text.
//!
//! [`sql_gen`] ties these together.
pub mod ast;
pub mod dialect_router;
pub mod dialects;
pub mod plan;
pub mod rex;
pub mod sql_gen;
pub mod sql_generator;
pub mod types;
pub mod unparser;

pub use plan::{PlanBuilder, RelNode, RowType};
pub use rex::RexNode;
pub use sql_gen::{dialect_from_settings, to_sql, to_sql_from_file, to_sql_with_config};
pub use sql_generator::{NullCollation, Product, SqlDialect, SqlGenError, SqlGenerator};
pub use unparser::UnparseOptions;
