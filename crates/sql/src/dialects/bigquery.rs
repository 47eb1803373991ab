//! BigQuery Dialect
//!
//! Backtick identifiers quoted only when needed, backslash string escaping,
//! single-unit integer intervals and explicit `UNION DISTINCT`.

use super::{swapped, FunctionMapper};
use crate::ast::SqlExpr;
use crate::sql_generator::dialect::{
    Casing, IntervalStyle, LateralSyntax, LimitSyntax, NullCollation, NullEmulation, Product,
    QuotePolicy, SqlDialect, StringEscape, TypeMapper, ValuesSyntax,
};
use crate::types::{SqlType, TypeName};
use std::sync::Arc;

pub fn dialect() -> SqlDialect {
    SqlDialect {
        product: Product::BigQuery,
        quote_start: '`',
        quote_end: '`',
        quote_policy: QuotePolicy::WhenNeeded,
        unquoted_casing: Casing::Preserve,
        null_collation: NullCollation::Low,
        null_emulation: NullEmulation::IsNull,
        supports_cube: false,
        supports_grouping_sets: false,
        supports_nested_aggregates: false,
        supports_filter: false,
        limit: LimitSyntax::LimitOffset,
        values: ValuesSyntax::UnionAll,
        lateral: LateralSyntax::Unsupported,
        explicit_set_distinct: true,
        string_escape: StringEscape::Backslash,
        interval: IntervalStyle::BigQuery,
        max_decimal_precision: 38,
        types: Arc::new(BigQueryTypes),
        functions: bigquery_function_rules(),
        ..SqlDialect::ansi_baseline()
    }
}

#[derive(Debug)]
struct BigQueryTypes;

impl TypeMapper for BigQueryTypes {
    fn map_type(&self, ty: &SqlType) -> Option<String> {
        let mapped = match ty.name {
            n if n.is_integer() => "INT64",
            TypeName::Real | TypeName::Float | TypeName::Double => "FLOAT64",
            TypeName::Decimal => "NUMERIC",
            TypeName::Char | TypeName::Varchar => "STRING",
            TypeName::Binary | TypeName::Varbinary => "BYTES",
            TypeName::Boolean => "BOOL",
            _ => return None,
        };
        Some(mapped.to_string())
    }
}

/// FLOOR(x TO unit) as `TIMESTAMP_TRUNC(x, UNIT)`.
fn timestamp_trunc(args: &[SqlExpr]) -> Result<SqlExpr, String> {
    match args {
        [x, unit] => Ok(SqlExpr::func("TIMESTAMP_TRUNC", vec![x.clone(), unit.clone()])),
        _ => Err("FLOOR to unit expects two arguments".to_string()),
    }
}

/// TRIM(flag chars FROM x) as `TRIM(x, chars)`, `LTRIM(x, chars)` or `RTRIM(x, chars)`.
fn trim(args: &[SqlExpr]) -> Result<SqlExpr, String> {
    let [flag, chars, x] = args else {
        return Err("TRIM expects three arguments".to_string());
    };
    let name = match FunctionMapper::unit_of(flag) {
        Some("LEADING") => "LTRIM",
        Some("TRAILING") => "RTRIM",
        _ => "TRIM",
    };
    Ok(SqlExpr::func(name, vec![x.clone(), chars.clone()]))
}

/// BigQuery function translation rules
fn bigquery_function_rules() -> FunctionMapper {
    FunctionMapper::new()
        // ========================================
        // String functions
        // ========================================
        .rename("substring", "SUBSTR")
        .transform("position", swapped("STRPOS"))
        .transform("trim", trim)
        // ========================================
        // Datetime functions
        // ========================================
        .transform_arity("floor", 2, timestamp_trunc)
}
