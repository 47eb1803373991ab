//! Literal rendering.
//!
//! Numbers are rendered to text here. Strings stay structured
//! ([`SqlExpr::StringLiteral`]) so the writer can escape them relative to
//! whatever quotes enclose them, except on backslash-escaping dialects
//! where the finished text is produced up front.

use crate::ast::SqlExpr;
use crate::rex::Literal;
use crate::sql_generator::dialect::{DatetimeStyle, IntervalStyle, SqlDialect, StringEscape};
use crate::sql_generator::error::SqlGenError;
use crate::types::{IntervalQualifier, TimeUnit};

pub fn literal_to_sql(literal: &Literal, dialect: &SqlDialect) -> Result<SqlExpr, SqlGenError> {
    let expr = match literal {
        Literal::Null => SqlExpr::raw("NULL"),
        Literal::Boolean(true) => SqlExpr::raw("TRUE"),
        Literal::Boolean(false) => SqlExpr::raw("FALSE"),
        Literal::Integer(i) => SqlExpr::raw(i.to_string()),
        Literal::Decimal { unscaled, scale } => SqlExpr::raw(format_decimal(*unscaled, *scale)),
        Literal::Double(d) => SqlExpr::raw(format_double(*d)),
        Literal::String(s) => string_literal(s, dialect),
        Literal::Date(s) => datetime_literal("DATE", "TO_DATE", "YYYY-MM-DD", s, dialect),
        Literal::Time(s) => datetime_literal("TIME", "TO_TIME", "HH24:MI:SS", s, dialect),
        Literal::Timestamp(s) => {
            let format = if s.contains('.') {
                "YYYY-MM-DD HH24:MI:SS.FF"
            } else {
                "YYYY-MM-DD HH24:MI:SS"
            };
            datetime_literal("TIMESTAMP", "TO_TIMESTAMP", format, s, dialect)
        }
        Literal::Interval {
            value,
            negative,
            qualifier,
        } => interval_literal(value, *negative, qualifier, dialect)?,
        Literal::TimeUnit(unit) => SqlExpr::raw(unit.as_str()),
    };
    Ok(expr)
}

pub fn string_literal(value: &str, dialect: &SqlDialect) -> SqlExpr {
    match dialect.string_escape() {
        StringEscape::Double => SqlExpr::StringLiteral(value.to_string()),
        StringEscape::Backslash => {
            let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
            SqlExpr::EscapedLiteral(format!("'{}'", escaped))
        }
    }
}

fn datetime_literal(
    keyword: &'static str,
    function: &str,
    format: &str,
    value: &str,
    dialect: &SqlDialect,
) -> SqlExpr {
    let text = string_literal(value, dialect);
    match dialect.datetime_style() {
        DatetimeStyle::Ansi => SqlExpr::Prefixed {
            keyword,
            expr: Box::new(text),
        },
        DatetimeStyle::OracleFunctions => {
            SqlExpr::func(function, vec![text, string_literal(format, dialect)])
        }
        DatetimeStyle::PlainString => text,
    }
}

fn interval_literal(
    value: &str,
    negative: bool,
    qualifier: &IntervalQualifier,
    dialect: &SqlDialect,
) -> Result<SqlExpr, SqlGenError> {
    let sign = if negative { "-" } else { "" };
    match dialect.interval_style() {
        IntervalStyle::Ansi => Ok(SqlExpr::Interval {
            negative,
            value: value.to_string(),
            qualifier: qualifier.to_string(),
        }),
        IntervalStyle::Mysql => Ok(SqlExpr::Interval {
            negative: false,
            value: format!("{}{}", sign, value),
            qualifier: mysql_qualifier(qualifier),
        }),
        IntervalStyle::Db2 => {
            let unit = single_unit(value, qualifier, dialect)?;
            numeric_amount(value, qualifier, dialect)?;
            Ok(SqlExpr::raw(format!("{}{} {}", sign, value, unit)))
        }
        IntervalStyle::BigQuery => {
            let unit = single_unit(value, qualifier, dialect)?;
            numeric_amount(value, qualifier, dialect)?;
            Ok(SqlExpr::raw(format!("INTERVAL {}{} {}", sign, value, unit)))
        }
        IntervalStyle::DateAdd => Err(SqlGenError::unsupported_because(
            format!("INTERVAL '{}' {}", value, qualifier),
            dialect.name(),
            "intervals only appear as DATEADD arguments",
        )),
    }
}

/// The unit of a single-unit interval, or an unsupported-construct error.
pub(crate) fn single_unit(
    value: &str,
    qualifier: &IntervalQualifier,
    dialect: &SqlDialect,
) -> Result<TimeUnit, SqlGenError> {
    if qualifier.is_single_unit() {
        Ok(qualifier.start)
    } else {
        Err(SqlGenError::unsupported_because(
            format!("INTERVAL '{}' {}", value, qualifier),
            dialect.name(),
            "multi-unit interval",
        ))
    }
}

/// Interval amounts written outside quotes must be plain unsigned numbers.
pub(crate) fn numeric_amount(
    value: &str,
    qualifier: &IntervalQualifier,
    dialect: &SqlDialect,
) -> Result<(), SqlGenError> {
    let mut parts = value.splitn(2, '.');
    let whole = parts.next().unwrap_or_default();
    let fraction = parts.next().unwrap_or_default();
    let numeric = !whole.is_empty()
        && whole.chars().all(|c| c.is_ascii_digit())
        && fraction.chars().all(|c| c.is_ascii_digit());
    if numeric {
        Ok(())
    } else {
        Err(SqlGenError::unsupported_because(
            format!("INTERVAL '{}' {}", value, qualifier),
            dialect.name(),
            "interval amount is not a plain number",
        ))
    }
}

fn mysql_qualifier(qualifier: &IntervalQualifier) -> String {
    match qualifier.end {
        Some(end) if end != qualifier.start => format!("{}_{}", qualifier.start, end),
        _ => qualifier.start.to_string(),
    }
}

/// Plain notation unless the scale is negative or the adjusted exponent is
/// below -6, e.g. `-1.23E-8`.
pub fn format_decimal(unscaled: i128, scale: i32) -> String {
    let sign = if unscaled < 0 { "-" } else { "" };
    let digits = unscaled.unsigned_abs().to_string();
    let n = digits.len() as i64;
    let adjusted = n - 1 - i64::from(scale);

    if scale >= 0 && adjusted >= -6 {
        let scale = scale as usize;
        let plain = if scale == 0 {
            digits
        } else if digits.len() > scale {
            let (int, frac) = digits.split_at(digits.len() - scale);
            format!("{}.{}", int, frac)
        } else {
            format!("0.{}{}", "0".repeat(scale - digits.len()), digits)
        };
        return format!("{}{}", sign, plain);
    }

    let (head, tail) = digits.split_at(1);
    let mantissa = if tail.is_empty() {
        head.to_string()
    } else {
        format!("{}.{}", head, tail)
    };
    let exp_sign = if adjusted < 0 { "-" } else { "+" };
    format!("{}{}E{}{}", sign, mantissa, exp_sign, adjusted.abs())
}

/// Scientific notation for magnitudes below 1e-6 or from 1e16 up.
pub fn format_double(value: f64) -> String {
    let magnitude = value.abs();
    if value != 0.0 && (magnitude < 1e-6 || magnitude >= 1e16) {
        format!("{:E}", value)
    } else {
        format!("{:?}", value)
    }
}
