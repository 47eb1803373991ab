//! Snowflake Dialect
//!
//! Double-quoted upper-case identifiers, LIMIT/OFFSET and DATE_TRUNC.

use super::{date_trunc, positional, FunctionMapper};
use crate::sql_generator::dialect::{LimitSyntax, Product, SqlDialect};

pub fn dialect() -> SqlDialect {
    SqlDialect {
        product: Product::Snowflake,
        supports_filter: false,
        limit: LimitSyntax::LimitOffset,
        max_varchar_length: 16_777_216,
        max_char_length: 16_777_216,
        max_decimal_precision: 38,
        functions: snowflake_function_rules(),
        ..SqlDialect::ansi_baseline()
    }
}

/// Snowflake-specific function translation rules
fn snowflake_function_rules() -> FunctionMapper {
    FunctionMapper::new()
        .transform("substring", positional("SUBSTR"))
        .rename("char_length", "LENGTH")
        .rename("string_agg", "LISTAGG")
        .rename("from_unixtime", "TO_TIMESTAMP")
        .rename("now", "CURRENT_TIMESTAMP")
        .transform_arity("floor", 2, date_trunc)
}
