//! PostgreSQL and Redshift Dialects

use super::{date_trunc, FunctionMapper};
use crate::sql_generator::dialect::{
    Casing, LateralSyntax, LimitSyntax, Product, SqlDialect, TypeMapper,
};
use crate::types::{SqlType, TypeName};
use std::sync::Arc;

pub fn postgres() -> SqlDialect {
    SqlDialect {
        product: Product::Postgres,
        unquoted_casing: Casing::Lower,
        supports_nested_aggregates: false,
        limit: LimitSyntax::LimitOffset,
        max_varchar_length: 10_485_760,
        max_char_length: 10_485_760,
        max_decimal_precision: 1000,
        types: Arc::new(PostgresTypes),
        functions: postgres_function_rules(),
        ..SqlDialect::ansi_baseline()
    }
}

/// Redshift: PostgreSQL 8 syntax without FILTER or LATERAL.
pub fn redshift() -> SqlDialect {
    SqlDialect {
        product: Product::Redshift,
        supports_filter: false,
        lateral: LateralSyntax::Unsupported,
        max_varchar_length: 65535,
        max_char_length: 4096,
        max_decimal_precision: 38,
        ..postgres()
    }
}

#[derive(Debug)]
struct PostgresTypes;

impl TypeMapper for PostgresTypes {
    fn map_type(&self, ty: &SqlType) -> Option<String> {
        let mapped = match ty.name {
            TypeName::TinyInt => "SMALLINT",
            TypeName::Double => "DOUBLE PRECISION",
            TypeName::Binary | TypeName::Varbinary => "BYTEA",
            _ => return None,
        };
        Some(mapped.to_string())
    }
}

/// PostgreSQL function translation rules
fn postgres_function_rules() -> FunctionMapper {
    FunctionMapper::new()
        .transform_arity("floor", 2, date_trunc)
        .rename("ifnull", "COALESCE")
        .rename("nvl", "COALESCE")
}
