//! Router from product names to dialect descriptors.
//!
//! Callers name their target the way it appears in connection settings
//! (`postgres`, `pg`, `sqlserver`, `mariadb`, ...). The router maps such a
//! name onto a [`Product`] and builds the descriptor for it.
//!
//! # Fallback
//!
//! Unknown names render with the ANSI baseline. A warning is logged, with
//! the closest known name when one is near enough to be a typo.

use crate::dialects::dialect_for;
use crate::sql_generator::dialect::{NullCollation, Product, SqlDialect};
use relsql_error::closest_match;

/// Names accepted by [`route_product`], for suggestions.
const KNOWN_NAMES: &[&str] = &[
    "ansi",
    "bigquery",
    "db2",
    "hive",
    "hsqldb",
    "mssql",
    "mysql",
    "oracle",
    "postgres",
    "redshift",
    "snowflake",
    "spark",
    "sybase",
];

/// Routes a product name to its [`Product`], if known.
pub fn route_product(name: &str) -> Option<Product> {
    let product = match name.trim().to_lowercase().as_str() {
        "ansi" | "calcite" | "default" | "generic" => Product::Ansi,
        "bigquery" | "bq" => Product::BigQuery,
        "db2" | "ibm db2" => Product::Db2,
        "hive" => Product::Hive,
        "hsqldb" | "hsql" => Product::Hsqldb,
        "mssql" | "sqlserver" | "sql server" | "microsoft sql server" => Product::Mssql,
        "mysql" | "mariadb" => Product::Mysql,
        "oracle" => Product::Oracle,
        "postgres" | "postgresql" | "pg" => Product::Postgres,
        "redshift" => Product::Redshift,
        "snowflake" => Product::Snowflake,
        "spark" | "sparksql" | "databricks" => Product::Spark,
        "sybase" | "sybase ase" => Product::Sybase,
        _ => return None,
    };
    Some(product)
}

/// Resolve `name` to a product, falling back to ANSI for unknown names.
pub fn resolve_product(name: &str) -> Product {
    match route_product(name) {
        Some(product) => product,
        None => {
            let suggestion = closest_match(&name.to_lowercase(), KNOWN_NAMES);
            tracing::warn!(
                target: "sql_generator",
                product = %name,
                suggestion = ?suggestion,
                "Unknown dialect product, falling back to ANSI"
            );
            Product::Ansi
        }
    }
}

/// Build the descriptor for a product name and version.
pub fn route_dialect(
    name: &str,
    major_version: u32,
    minor_version: u32,
    null_collation: Option<NullCollation>,
) -> SqlDialect {
    dialect_for(
        resolve_product(name),
        major_version,
        minor_version,
        null_collation,
    )
}

/// Returns the baseline descriptor used when no product is configured.
pub fn default_dialect() -> SqlDialect {
    SqlDialect::ansi_baseline()
}
