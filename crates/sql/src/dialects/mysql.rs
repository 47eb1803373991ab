//! MySQL Dialect
//!
//! Backtick identifiers, LIMIT/OFFSET, NULLs sorted low with `IS NULL`
//! emulation, and `WITH ROLLUP` before version 8.

use super::FunctionMapper;
use crate::ast::SqlExpr;
use crate::sql_generator::dialect::{
    Casing, CrossJoinSyntax, IntervalStyle, LimitSyntax, NullCollation, NullEmulation, Product,
    RollupSyntax, SqlDialect, TypeMapper, ValuesSyntax,
};
use crate::types::{SqlType, TypeName};
use std::sync::Arc;

pub fn dialect(major_version: u32) -> SqlDialect {
    let rollup = if major_version != 0 && major_version < 8 {
        RollupSyntax::Emulated
    } else {
        RollupSyntax::Keyword
    };
    SqlDialect {
        product: Product::Mysql,
        quote_start: '`',
        quote_end: '`',
        unquoted_casing: Casing::Preserve,
        null_collation: NullCollation::Low,
        null_emulation: NullEmulation::IsNull,
        rollup,
        supports_cube: false,
        supports_grouping_sets: false,
        supports_nested_aggregates: false,
        supports_filter: false,
        limit: LimitSyntax::LimitOffset,
        offset_requires_limit: true,
        supports_full_join: false,
        cross_join: CrossJoinSyntax::CrossJoin,
        values: ValuesSyntax::UnionAll,
        interval: IntervalStyle::Mysql,
        max_varchar_length: 65535,
        max_char_length: 255,
        max_decimal_precision: 65,
        types: Arc::new(MysqlTypes),
        functions: mysql_function_rules(),
        ..SqlDialect::ansi_baseline()
    }
}

#[derive(Debug)]
struct MysqlTypes;

impl TypeMapper for MysqlTypes {
    fn map_type(&self, ty: &SqlType) -> Option<String> {
        let mapped = match ty.name {
            n if n.is_integer() => "SIGNED".to_string(),
            TypeName::Varchar | TypeName::Char => match ty.precision {
                Some(p) => format!("CHAR({})", p),
                None => "CHAR".to_string(),
            },
            TypeName::Varbinary | TypeName::Binary => match ty.precision {
                Some(p) => format!("BINARY({})", p),
                None => "BINARY".to_string(),
            },
            TypeName::Timestamp => "DATETIME".to_string(),
            TypeName::Real | TypeName::Float => "DOUBLE".to_string(),
            _ => return None,
        };
        Some(mapped)
    }
}

fn date_format(unit: &str) -> Option<&'static str> {
    match unit {
        "YEAR" => Some("%Y-01-01"),
        "MONTH" => Some("%Y-%m-01"),
        "DAY" => Some("%Y-%m-%d"),
        "HOUR" => Some("%Y-%m-%d %H:00:00"),
        "MINUTE" => Some("%Y-%m-%d %H:%i:00"),
        "SECOND" => Some("%Y-%m-%d %H:%i:%s"),
        _ => None,
    }
}

/// FLOOR(x TO unit) via DATE_FORMAT; WEEK goes through STR_TO_DATE.
fn floor_to_unit(args: &[SqlExpr]) -> Result<SqlExpr, String> {
    let [x, unit] = args else {
        return Err("FLOOR to unit expects two arguments".to_string());
    };
    let unit = FunctionMapper::unit_of(unit).unwrap_or_default();
    if unit == "WEEK" {
        let week = SqlExpr::func(
            "DATE_FORMAT",
            vec![x.clone(), FunctionMapper::lit("%x%v-1")],
        );
        return Ok(SqlExpr::func(
            "STR_TO_DATE",
            vec![week, FunctionMapper::lit("%x%v-%w")],
        ));
    }
    let fmt = date_format(unit).ok_or_else(|| format!("cannot truncate to {}", unit))?;
    Ok(SqlExpr::func(
        "DATE_FORMAT",
        vec![x.clone(), FunctionMapper::lit(fmt)],
    ))
}

/// MySQL function translation rules
fn mysql_function_rules() -> FunctionMapper {
    FunctionMapper::new()
        // ========================================
        // Datetime functions
        // ========================================
        .transform_arity("floor", 2, floor_to_unit)
        // ========================================
        // String functions
        // ========================================
        .rename("character_length", "CHAR_LENGTH")
}
