use crate::fixtures::*;
use relsql::plan::{Direction, NullDirection};

const COLLATIONS: [NullCollation; 4] = [
    NullCollation::High,
    NullCollation::Low,
    NullCollation::First,
    NullCollation::Last,
];

/// Whether `collation` already sorts NULLs where the key asks for them.
fn already_default(collation: NullCollation, desc: bool, nulls_first: bool) -> bool {
    match (collation, desc, nulls_first) {
        (NullCollation::High, false, false) | (NullCollation::High, true, true) => true,
        (NullCollation::Low, false, true) | (NullCollation::Low, true, false) => true,
        (NullCollation::First, _, true) => true,
        (NullCollation::Last, _, false) => true,
        _ => false,
    }
}

fn key(desc: bool, nulls_first: bool) -> SortKey {
    let key = if desc { SortKey::desc(5) } else { SortKey::asc(5) };
    if nulls_first {
        key.nulls_first()
    } else {
        key.nulls_last()
    }
}

fn order_by(sql: &str) -> &str {
    match sql.split_once("\nORDER BY ") {
        Some((_, order)) => order,
        None => panic!("no ORDER BY in {}", sql),
    }
}

#[test]
fn test_is_null_emulation_matrix() {
    for collation in COLLATIONS {
        let dialect = dialect_for(Product::Mysql, 8, 0, Some(collation));
        for desc in [false, true] {
            for nulls_first in [false, true] {
                let plan = emp().sort(vec![key(desc, nulls_first)]).build();
                let sql = render(&plan, &dialect);
                let value = if desc { "`comm` DESC" } else { "`comm`" };
                let expected = if already_default(collation, desc, nulls_first) {
                    value.to_string()
                } else if nulls_first {
                    format!("`comm` IS NULL DESC, {}", value)
                } else {
                    format!("`comm` IS NULL, {}", value)
                };
                assert_eq!(
                    order_by(&sql),
                    expected,
                    "collation {:?}, desc {}, nulls first {}",
                    collation,
                    desc,
                    nulls_first
                );
            }
        }
    }
}

#[test]
fn test_keyword_emulation_matrix() {
    for collation in COLLATIONS {
        let dialect = ansi().with_null_collation(collation);
        for desc in [false, true] {
            for nulls_first in [false, true] {
                let plan = emp().sort(vec![key(desc, nulls_first)]).build();
                let sql = render(&plan, &dialect);
                let mut expected = if desc {
                    "\"comm\" DESC".to_string()
                } else {
                    "\"comm\"".to_string()
                };
                if !already_default(collation, desc, nulls_first) {
                    expected.push_str(if nulls_first {
                        " NULLS FIRST"
                    } else {
                        " NULLS LAST"
                    });
                }
                assert_eq!(order_by(&sql), expected);
            }
        }
    }
}

#[test]
fn test_case_emulation_on_sql_server() {
    let plan = emp().sort(vec![SortKey::asc(5).nulls_last()]).build();
    let sql = render(&plan, &latest(Product::Mssql));
    assert_eq!(
        order_by(&sql),
        "CASE WHEN [comm] IS NULL THEN 1 ELSE 0 END, [comm]"
    );
}

#[test]
fn test_unspecified_nulls_emit_nothing() {
    for product in Product::ALL {
        let plan = emp().sort(vec![SortKey::desc(5)]).build();
        let sql = render(&plan, &latest(product));
        assert!(!sql.contains("IS NULL"), "{}: {}", product.name(), sql);
        assert!(!sql.contains("NULLS"), "{}: {}", product.name(), sql);
    }
}

#[test]
fn test_emulation_key_uses_aliased_expression() {
    let plan = emp()
        .project(vec![(
            RexNode::plus(RexNode::input(4), RexNode::input(5)),
            "total",
        )])
        .sort(vec![SortKey::asc(0).nulls_last()])
        .build();
    let sql = render(&plan, &latest(Product::Mysql));
    assert_eq!(
        order_by(&sql),
        "`sal` + `comm` IS NULL, `total`"
    );
}

#[test]
fn test_sort_key_fields() {
    let key = SortKey::desc(2).nulls_first();
    assert_eq!(key.field, 2);
    assert_eq!(key.direction, Direction::Desc);
    assert_eq!(key.nulls, NullDirection::First);
}
