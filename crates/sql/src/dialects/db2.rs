//! DB2 and HSQLDB Dialects
//!
//! Upper-case identifiers that stay unquoted when they are plain words, and
//! FLOOR to a time unit as `TRUNC(x, 'fmt')`.

use super::{positional, trunc_with, FunctionMapper};
use crate::sql_generator::dialect::{IntervalStyle, Product, QuotePolicy, SqlDialect};

fn trunc_format(unit: &str) -> Option<&'static str> {
    match unit {
        "YEAR" => Some("YYYY"),
        "MONTH" => Some("MM"),
        "WEEK" => Some("WW"),
        "DAY" => Some("DD"),
        "HOUR" => Some("HH24"),
        "MINUTE" => Some("MI"),
        "SECOND" => Some("SS"),
        _ => None,
    }
}

pub fn db2() -> SqlDialect {
    SqlDialect {
        product: Product::Db2,
        quote_policy: QuotePolicy::WhenNeeded,
        supports_filter: false,
        requires_table_alias: true,
        interval: IntervalStyle::Db2,
        max_varchar_length: 32672,
        max_char_length: 254,
        max_decimal_precision: 31,
        functions: db2_function_rules(),
        ..SqlDialect::ansi_baseline()
    }
}

pub fn hsqldb() -> SqlDialect {
    SqlDialect {
        product: Product::Hsqldb,
        quote_policy: QuotePolicy::WhenNeeded,
        supports_filter: false,
        max_decimal_precision: 128,
        functions: hsqldb_function_rules(),
        ..SqlDialect::ansi_baseline()
    }
}

/// DB2 function translation rules
fn db2_function_rules() -> FunctionMapper {
    FunctionMapper::new()
        .rename("substring", "SUBSTR")
        .transform("position", positional("LOCATE"))
        .rename("char_length", "LENGTH")
        .transform_arity("floor", 2, trunc_with("TRUNC", trunc_format))
}

/// HSQLDB function translation rules
fn hsqldb_function_rules() -> FunctionMapper {
    FunctionMapper::new().transform_arity("floor", 2, trunc_with("TRUNC", trunc_format))
}
