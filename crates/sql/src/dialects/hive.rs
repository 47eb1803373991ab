//! Hive and Spark SQL Dialects
//!
//! Backtick identifiers quoted only when needed, `WITH ROLLUP`/`WITH CUBE`
//! grouping, infix `%` and INSTR for string search.

use super::{date_trunc, is_space, positional, swapped, trunc_with, FunctionMapper};
use crate::ast::{BinaryOp, SqlExpr};
use crate::sql_generator::dialect::{
    Casing, LateralSyntax, LimitSyntax, NullCollation, NullEmulation, Product, QuotePolicy,
    RollupSyntax, SqlDialect, StringEscape, TypeMapper, ValuesSyntax,
};
use crate::types::{SqlType, TypeName};
use std::sync::Arc;

fn base() -> SqlDialect {
    SqlDialect {
        quote_start: '`',
        quote_end: '`',
        quote_policy: QuotePolicy::WhenNeeded,
        unquoted_casing: Casing::Preserve,
        null_collation: NullCollation::Low,
        rollup: RollupSyntax::Emulated,
        supports_nested_aggregates: false,
        supports_filter: false,
        limit: LimitSyntax::LimitOffset,
        string_escape: StringEscape::Backslash,
        max_varchar_length: 65535,
        max_char_length: 255,
        max_decimal_precision: 38,
        types: Arc::new(HiveTypes),
        ..SqlDialect::ansi_baseline()
    }
}

/// NULLS FIRST/LAST are understood from Hive 2.1.
pub fn hive(major_version: u32, minor_version: u32) -> SqlDialect {
    let keyword_nulls = major_version == 0 || (major_version, minor_version) >= (2, 1);
    SqlDialect {
        product: Product::Hive,
        null_emulation: if keyword_nulls {
            NullEmulation::Keyword
        } else {
            NullEmulation::IsNull
        },
        values: ValuesSyntax::UnionAll,
        lateral: LateralSyntax::Unsupported,
        functions: hive_function_rules(),
        ..base()
    }
}

pub fn spark() -> SqlDialect {
    SqlDialect {
        product: Product::Spark,
        null_emulation: NullEmulation::Keyword,
        functions: spark_function_rules(),
        ..base()
    }
}

#[derive(Debug)]
struct HiveTypes;

impl TypeMapper for HiveTypes {
    fn map_type(&self, ty: &SqlType) -> Option<String> {
        match ty.name {
            TypeName::Integer => Some("INT".to_string()),
            _ => None,
        }
    }
}

fn hive_trunc_format(unit: &str) -> Option<&'static str> {
    match unit {
        "YEAR" => Some("YEAR"),
        "MONTH" => Some("MONTH"),
        _ => None,
    }
}

/// TRIM of spaces; Hive has no form for other characters.
fn trim(args: &[SqlExpr]) -> Result<SqlExpr, String> {
    let [flag, chars, x] = args else {
        return Err("TRIM expects three arguments".to_string());
    };
    if !is_space(chars) {
        return Err("only spaces can be trimmed".to_string());
    }
    let name = match FunctionMapper::unit_of(flag) {
        Some("LEADING") => "LTRIM",
        Some("TRAILING") => "RTRIM",
        _ => "TRIM",
    };
    Ok(SqlExpr::func(name, vec![x.clone()]))
}

fn common_rules() -> FunctionMapper {
    FunctionMapper::new()
        .transform("substring", positional("SUBSTRING"))
        .transform("position", swapped("INSTR"))
        .transform("trim", trim)
        .transform("mod", |args| FunctionMapper::infix(BinaryOp::Modulo, args))
        .rename("char_length", "LENGTH")
}

/// Hive function translation rules
fn hive_function_rules() -> FunctionMapper {
    common_rules().transform_arity("floor", 2, trunc_with("TRUNC", hive_trunc_format))
}

/// Spark function translation rules
fn spark_function_rules() -> FunctionMapper {
    common_rules().transform_arity("floor", 2, date_trunc)
}
