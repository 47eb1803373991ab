use crate::fixtures::*;
use relsql::dialect_router::{default_dialect, resolve_product, route_dialect, route_product};

#[test]
fn test_connection_names_route_to_products() {
    let cases = [
        ("postgresql", Product::Postgres),
        ("MariaDB", Product::Mysql),
        ("Microsoft SQL Server", Product::Mssql),
        ("databricks", Product::Spark),
        ("bq", Product::BigQuery),
        ("calcite", Product::Ansi),
    ];
    for (name, product) in cases {
        assert_eq!(route_product(name), Some(product), "{}", name);
    }
}

#[test]
fn test_typo_falls_back_to_ansi() {
    assert_eq!(route_product("snowflak"), None);
    assert_eq!(resolve_product("snowflak"), Product::Ansi);
    assert_eq!(route_dialect("snowflak", 0, 0, None).product(), Product::Ansi);
}

#[test]
fn test_routed_dialect_renders_like_direct_lookup() {
    let plan = crate::common::test_plan();
    for product in Product::ALL {
        assert_eq!(
            try_render(&plan, &route_dialect(product.name(), 0, 0, None)),
            try_render(&plan, &latest(product)),
            "{}",
            product.name()
        );
    }
}

#[test]
fn test_collation_override_through_router() {
    let plan = emp().sort(vec![SortKey::asc(5).nulls_last()]).build();
    // MySQL sorts NULLs low; asking for LAST makes the requested order the default
    let dialect = route_dialect("mysql", 8, 0, Some(NullCollation::Last));
    assert_sql!(plan, dialect, "SELECT *\nFROM `emp`\nORDER BY `comm`");
}

#[test]
fn test_default_dialect_is_ansi() {
    assert_eq!(default_dialect().product(), Product::Ansi);
    assert_eq!(default_dialect().name(), "ansi");
}
