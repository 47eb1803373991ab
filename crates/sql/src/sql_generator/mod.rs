//! Plan-to-SQL generation.
//!
//! [`SqlGenerator`] walks a [`crate::plan::RelNode`] tree and builds the
//! syntax tree of [`crate::ast`]; [`crate::unparser`] renders it.

pub mod context;
pub mod dialect;
pub mod error;
pub mod expr;
pub mod literal;
pub mod translator;

pub use self::translator::{decide, Clause, ScopeDecision, SqlGenerator, MAX_RECURSION_DEPTH};
pub use context::{CorrelationBinding, GeneratorContext};
pub use dialect::{NullCollation, Product, SqlDialect};
pub use error::SqlGenError;
