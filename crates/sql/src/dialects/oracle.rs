//! Oracle Dialect
//!
//! Double-quoted upper-case identifiers, no `AS` before aliases, `FROM "DUAL"`
//! row sources and `TO_DATE`/`TO_TIMESTAMP` datetime literals.

use super::{swapped, trunc_with, FunctionMapper};
use crate::sql_generator::dialect::{
    DatetimeStyle, Product, SqlDialect, TypeMapper, ValuesSyntax,
};
use crate::types::{SqlType, TypeName};
use std::sync::Arc;

pub fn dialect() -> SqlDialect {
    SqlDialect {
        product: Product::Oracle,
        table_alias_as: false,
        column_alias_as: false,
        values: ValuesSyntax::FromDual,
        except_keyword: "MINUS",
        supports_filter: false,
        datetime: DatetimeStyle::OracleFunctions,
        max_varchar_length: 4000,
        max_char_length: 2000,
        max_decimal_precision: 38,
        types: Arc::new(OracleTypes),
        functions: oracle_function_rules(),
        ..SqlDialect::ansi_baseline()
    }
}

#[derive(Debug)]
struct OracleTypes;

impl TypeMapper for OracleTypes {
    fn map_type(&self, ty: &SqlType) -> Option<String> {
        let mapped = match ty.name {
            TypeName::TinyInt => "NUMBER(3)".to_string(),
            TypeName::SmallInt => "NUMBER(5)".to_string(),
            TypeName::Integer => "NUMBER(10)".to_string(),
            TypeName::BigInt => "NUMBER(19)".to_string(),
            TypeName::Boolean => "NUMBER(1)".to_string(),
            TypeName::Double => "DOUBLE PRECISION".to_string(),
            TypeName::Varchar => match ty.precision {
                Some(p) => format!("VARCHAR({})", p),
                None => "VARCHAR(4000)".to_string(),
            },
            _ => return None,
        };
        Some(mapped)
    }
}

fn trunc_format(unit: &str) -> Option<&'static str> {
    match unit {
        "YEAR" => Some("YEAR"),
        "QUARTER" => Some("QUARTER"),
        "MONTH" => Some("MONTH"),
        "WEEK" => Some("WEEK"),
        "DAY" => Some("DAY"),
        "HOUR" => Some("HOUR"),
        "MINUTE" => Some("MINUTE"),
        "SECOND" => Some("SECOND"),
        _ => None,
    }
}

/// Oracle function translation rules
fn oracle_function_rules() -> FunctionMapper {
    FunctionMapper::new()
        // ========================================
        // String functions
        // ========================================
        .rename("substring", "SUBSTR")
        .rename("char_length", "LENGTH")
        .rename("character_length", "LENGTH")
        .transform("position", swapped("INSTR"))
        // ========================================
        // Datetime functions
        // ========================================
        .transform_arity("floor", 2, trunc_with("TRUNC", trunc_format))
        .rename("current_timestamp", "SYSTIMESTAMP")
}
