//! Per-product dialect descriptors.
//!
//! Each module starts from [`SqlDialect::ansi_baseline`] and overrides what
//! its product does differently, including its function rewrite rules and
//! CAST type names.

pub mod bigquery;
pub mod db2;
pub mod function_mapper;
pub mod hive;
pub mod mssql;
pub mod mysql;
pub mod oracle;
pub mod postgres;
pub mod snowflake;

pub use function_mapper::{FunctionMapper, Translation, TransformFn};

use crate::ast::SqlExpr;
use crate::sql_generator::dialect::{NullCollation, Product, SqlDialect};

/// Build the descriptor for `product` at the given version.
///
/// `null_collation` overrides the product's default NULL sort placement.
pub fn dialect_for(
    product: Product,
    major_version: u32,
    minor_version: u32,
    null_collation: Option<NullCollation>,
) -> SqlDialect {
    let mut dialect = match product {
        Product::Ansi => SqlDialect::ansi_baseline(),
        Product::BigQuery => bigquery::dialect(),
        Product::Db2 => db2::db2(),
        Product::Hsqldb => db2::hsqldb(),
        Product::Hive => hive::hive(major_version, minor_version),
        Product::Spark => hive::spark(),
        Product::Mssql => mssql::mssql(major_version),
        Product::Sybase => mssql::sybase(),
        Product::Mysql => mysql::dialect(major_version),
        Product::Oracle => oracle::dialect(),
        Product::Postgres => postgres::postgres(),
        Product::Redshift => postgres::redshift(),
        Product::Snowflake => snowflake::dialect(),
    };
    dialect.major_version = major_version;
    dialect.minor_version = minor_version;
    if let Some(collation) = null_collation {
        dialect.null_collation = collation;
    }
    dialect
}

// ========================================
// Shared rewrite shapes
// ========================================

/// `NAME(b, a)` from `(a, b)`, e.g. POSITION(needle IN haystack) → INSTR(haystack, needle).
pub(crate) fn swapped(name: &'static str) -> impl Fn(&[SqlExpr]) -> Result<SqlExpr, String> {
    move |args| match args {
        [a, b] => Ok(SqlExpr::func(name, vec![b.clone(), a.clone()])),
        _ => Err(format!("{} expects two arguments", name)),
    }
}

/// Plain positional call under a new name, keeping argument order.
pub(crate) fn positional(name: &'static str) -> impl Fn(&[SqlExpr]) -> Result<SqlExpr, String> {
    move |args| Ok(SqlExpr::func(name, args.to_vec()))
}

/// FLOOR(x TO unit) as `NAME(x, 'fmt')` via a unit → format table.
pub(crate) fn trunc_with(
    name: &'static str,
    format: fn(&str) -> Option<&'static str>,
) -> impl Fn(&[SqlExpr]) -> Result<SqlExpr, String> {
    move |args| {
        let [x, unit] = args else {
            return Err("FLOOR to unit expects two arguments".to_string());
        };
        let unit = FunctionMapper::unit_of(unit).unwrap_or_default();
        let fmt = format(unit).ok_or_else(|| format!("cannot truncate to {}", unit))?;
        Ok(SqlExpr::func(name, vec![x.clone(), FunctionMapper::lit(fmt)]))
    }
}

/// FLOOR(x TO unit) as `DATE_TRUNC('UNIT', x)`.
pub(crate) fn date_trunc(args: &[SqlExpr]) -> Result<SqlExpr, String> {
    let [x, unit] = args else {
        return Err("FLOOR to unit expects two arguments".to_string());
    };
    let unit = FunctionMapper::unit_of(unit).unwrap_or_default();
    Ok(SqlExpr::func(
        "DATE_TRUNC",
        vec![FunctionMapper::lit(unit), x.clone()],
    ))
}

/// True when a TRIM character argument is a single space.
pub(crate) fn is_space(arg: &SqlExpr) -> bool {
    matches!(arg, SqlExpr::StringLiteral(s) if s == " ")
}

/// TRIM of spaces as LTRIM/RTRIM; other characters cannot be expressed.
pub(crate) fn trim_with_ltrim_rtrim(args: &[SqlExpr]) -> Result<SqlExpr, String> {
    let [flag, chars, x] = args else {
        return Err("TRIM expects three arguments".to_string());
    };
    if !is_space(chars) {
        return Err("only spaces can be trimmed".to_string());
    }
    let x = x.clone();
    Ok(match FunctionMapper::unit_of(flag) {
        Some("LEADING") => SqlExpr::func("LTRIM", vec![x]),
        Some("TRAILING") => SqlExpr::func("RTRIM", vec![x]),
        _ => SqlExpr::func("LTRIM", vec![SqlExpr::func("RTRIM", vec![x])]),
    })
}
