//! SQL Server and Sybase Dialects
//!
//! Both sort NULLs low and emulate placement with a CASE key, use TOP for
//! row limits (SQL Server from version 11 uses OFFSET/FETCH) and express
//! datetime arithmetic through DATEADD.

use super::{positional, trim_with_ltrim_rtrim, FunctionMapper};
use crate::ast::{BinaryOp, SqlExpr, UnaryOp};
use crate::sql_generator::dialect::{
    Casing, DatetimeStyle, IntervalStyle, LateralSyntax, LimitSyntax, NullCollation,
    NullEmulation, Product, QuotePolicy, SqlDialect, TypeMapper, ValuesSyntax,
};
use crate::types::{SqlType, TypeName};
use std::sync::Arc;

pub fn mssql(major_version: u32) -> SqlDialect {
    let legacy = major_version != 0 && major_version < 11;
    SqlDialect {
        product: Product::Mssql,
        quote_start: '[',
        quote_end: ']',
        unquoted_casing: Casing::Preserve,
        null_collation: NullCollation::Low,
        null_emulation: NullEmulation::Case,
        supports_nested_aggregates: false,
        supports_filter: false,
        limit: if legacy {
            LimitSyntax::Top
        } else {
            LimitSyntax::FetchOffset
        },
        fetch_requires_offset: true,
        supports_window_frames: !legacy,
        lateral: LateralSyntax::Apply,
        interval: IntervalStyle::DateAdd,
        datetime: DatetimeStyle::PlainString,
        max_varchar_length: 8000,
        max_char_length: 8000,
        max_decimal_precision: 38,
        types: Arc::new(MssqlTypes),
        functions: mssql_function_rules(),
        ..SqlDialect::ansi_baseline()
    }
}

pub fn sybase() -> SqlDialect {
    SqlDialect {
        product: Product::Sybase,
        quote_policy: QuotePolicy::WhenNeeded,
        unquoted_casing: Casing::Preserve,
        null_collation: NullCollation::Low,
        null_emulation: NullEmulation::Case,
        supports_nested_aggregates: false,
        supports_filter: false,
        limit: LimitSyntax::Top,
        supports_window_frames: false,
        values: ValuesSyntax::UnionAll,
        lateral: LateralSyntax::Unsupported,
        interval: IntervalStyle::DateAdd,
        datetime: DatetimeStyle::PlainString,
        max_varchar_length: 16384,
        max_char_length: 16384,
        max_decimal_precision: 38,
        types: Arc::new(MssqlTypes),
        functions: mssql_function_rules(),
        ..SqlDialect::ansi_baseline()
    }
}

#[derive(Debug)]
struct MssqlTypes;

impl TypeMapper for MssqlTypes {
    fn map_type(&self, ty: &SqlType) -> Option<String> {
        let mapped = match ty.name {
            TypeName::Double => "FLOAT",
            TypeName::Boolean => "BIT",
            TypeName::Timestamp => "DATETIME2",
            _ => return None,
        };
        Some(mapped.to_string())
    }
}

/// `CONVERT(VARCHAR(n), x, 126)`: ISO-8601 text cut after `n` characters.
fn iso_prefix(x: &SqlExpr, n: u32) -> SqlExpr {
    SqlExpr::func(
        "CONVERT",
        vec![
            SqlExpr::raw(format!("VARCHAR({})", n)),
            x.clone(),
            SqlExpr::raw("126"),
        ],
    )
}

fn to_datetime(text: SqlExpr) -> SqlExpr {
    SqlExpr::func("CONVERT", vec![SqlExpr::raw("DATETIME"), text])
}

fn padded(prefix: SqlExpr, suffix: &str) -> SqlExpr {
    SqlExpr::binary(BinaryOp::Plus, prefix, FunctionMapper::lit(suffix))
}

fn floor_to_unit(args: &[SqlExpr]) -> Result<SqlExpr, String> {
    let [x, unit] = args else {
        return Err("FLOOR to unit expects two arguments".to_string());
    };
    let expr = match FunctionMapper::unit_of(unit).unwrap_or_default() {
        "YEAR" => to_datetime(padded(iso_prefix(x, 4), "-01-01")),
        "QUARTER" => SqlExpr::func(
            "DATEADD",
            vec![
                SqlExpr::raw("QUARTER"),
                SqlExpr::func(
                    "DATEDIFF",
                    vec![SqlExpr::raw("QUARTER"), SqlExpr::raw("0"), x.clone()],
                ),
                SqlExpr::raw("0"),
            ],
        ),
        "MONTH" => to_datetime(padded(iso_prefix(x, 7), "-01")),
        "WEEK" => {
            // back up to the start of the week, then drop the time part
            let weekday = SqlExpr::func("DATEPART", vec![SqlExpr::raw("WEEKDAY"), x.clone()]);
            let shift = SqlExpr::binary(
                BinaryOp::Modulo,
                SqlExpr::Unary {
                    op: UnaryOp::Minus,
                    expr: Box::new(SqlExpr::binary(BinaryOp::Plus, SqlExpr::raw("6"), weekday)),
                },
                SqlExpr::raw("7"),
            );
            let start = SqlExpr::func("DATEADD", vec![SqlExpr::raw("DAY"), shift, x.clone()]);
            to_datetime(iso_prefix(&start, 10))
        }
        "DAY" => to_datetime(iso_prefix(x, 10)),
        "HOUR" => to_datetime(padded(iso_prefix(x, 13), ":00:00")),
        "MINUTE" => to_datetime(padded(iso_prefix(x, 16), ":00")),
        "SECOND" => to_datetime(iso_prefix(x, 19)),
        other => return Err(format!("cannot truncate to {}", other)),
    };
    Ok(expr)
}

fn substring(args: &[SqlExpr]) -> Result<SqlExpr, String> {
    match args {
        [_, _, _] => Ok(SqlExpr::func("SUBSTRING", args.to_vec())),
        _ => Err("SUBSTRING requires both start and length".to_string()),
    }
}

/// SQL Server / Sybase function translation rules
fn mssql_function_rules() -> FunctionMapper {
    FunctionMapper::new()
        // ========================================
        // String functions
        // ========================================
        .transform("substring", substring)
        .transform("position", positional("CHARINDEX"))
        .rename("char_length", "LEN")
        .rename("character_length", "LEN")
        .transform("trim", trim_with_ltrim_rtrim)
        // ========================================
        // Numeric functions
        // ========================================
        .transform("mod", |args| FunctionMapper::infix(BinaryOp::Modulo, args))
        .rename("ceil", "CEILING")
        // ========================================
        // Datetime functions
        // ========================================
        .transform_arity("floor", 2, floor_to_unit)
        .rename("current_timestamp", "GETDATE")
}
