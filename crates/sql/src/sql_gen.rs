//! SQL generation entry points.
//!
//! Resolves the configured dialect, converts a plan and renders it. The
//! generated text is logged at debug level, with string literals redacted
//! unless the configuration turns redaction off.

use anyhow::{Context, Result};
use relsql_common::config::{DialectSettings, GeneratorConfig, NullCollationSetting};
use relsql_common::scrubber;
use relsql_error::RelSqlError;

use crate::dialect_router::route_dialect;
use crate::plan::RelNode;
use crate::sql_generator::{NullCollation, SqlDialect, SqlGenerator};
use crate::unparser::UnparseOptions;

/// Renders `plan` for `dialect` on a single line per clause.
pub fn to_sql(plan: &RelNode, dialect: &SqlDialect) -> Result<String, RelSqlError> {
    let sql = SqlGenerator::new(dialect).generate(plan, &UnparseOptions::default())?;
    log_sql(dialect, &sql, true);
    Ok(sql)
}

/// Renders `plan` with the dialect, limits and layout from `config`.
pub fn to_sql_with_config(plan: &RelNode, config: &GeneratorConfig) -> Result<String, RelSqlError> {
    let dialect = dialect_from_settings(&config.dialect);
    let options = UnparseOptions {
        pretty: config.pretty,
        indent: config.indent.clone(),
    };
    let sql = SqlGenerator::new(&dialect)
        .with_max_depth(config.max_recursion_depth)
        .generate(plan, &options)?;
    log_sql(&dialect, &sql, config.redact_literals);
    Ok(sql)
}

/// Loads the configuration at `path` (plus `RELSQL__*` overrides) and
/// renders `plan` with it.
pub fn to_sql_from_file(plan: &RelNode, path: &str) -> Result<String> {
    let config = GeneratorConfig::from_file(path)
        .with_context(|| format!("Failed to load generator config from {}", path))?;
    to_sql_with_config(plan, &config).context("Failed to generate SQL")
}

/// Builds the descriptor named by the settings. An unset version means the
/// latest one the product descriptor knows.
pub fn dialect_from_settings(settings: &DialectSettings) -> SqlDialect {
    let null_collation = settings.null_collation.map(|setting| match setting {
        NullCollationSetting::High => NullCollation::High,
        NullCollationSetting::Low => NullCollation::Low,
        NullCollationSetting::First => NullCollation::First,
        NullCollationSetting::Last => NullCollation::Last,
    });
    let dialect = route_dialect(
        &settings.product,
        settings.major_version.unwrap_or(0),
        settings.minor_version.unwrap_or(0),
        null_collation,
    );
    match settings.max_varchar_length {
        Some(length) => dialect.with_max_varchar_length(length),
        None => dialect,
    }
}

fn log_sql(dialect: &SqlDialect, sql: &str, redact: bool) {
    if !tracing::enabled!(target: "sql_generator", tracing::Level::DEBUG) {
        return;
    }
    let shown = if redact {
        scrubber::scrub(sql)
    } else {
        sql.to_string()
    };
    tracing::debug!(
        target: "sql_generator",
        dialect = %dialect.name(),
        sql = %shown,
        "Generated SQL"
    );
}
