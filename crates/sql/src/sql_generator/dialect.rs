//! Dialect descriptor: an immutable value describing what SQL surface a
//! target product and version accept.
//!
//! Descriptors are built by [`crate::dialects::dialect_for`] and never
//! mutated afterwards, so one instance can be shared across conversions and
//! threads.

use crate::dialects::FunctionMapper;
use crate::sql_generator::error::SqlGenError;
use crate::types::{SqlType, TypeName};
use relsql_common::config::NullCollationSetting;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Product {
    Ansi,
    BigQuery,
    Db2,
    Hive,
    Hsqldb,
    Mssql,
    Mysql,
    Oracle,
    Postgres,
    Redshift,
    Snowflake,
    Spark,
    Sybase,
}

impl Product {
    pub const ALL: [Product; 13] = [
        Product::Ansi,
        Product::BigQuery,
        Product::Db2,
        Product::Hive,
        Product::Hsqldb,
        Product::Mssql,
        Product::Mysql,
        Product::Oracle,
        Product::Postgres,
        Product::Redshift,
        Product::Snowflake,
        Product::Spark,
        Product::Sybase,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Product::Ansi => "ansi",
            Product::BigQuery => "bigquery",
            Product::Db2 => "db2",
            Product::Hive => "hive",
            Product::Hsqldb => "hsqldb",
            Product::Mssql => "mssql",
            Product::Mysql => "mysql",
            Product::Oracle => "oracle",
            Product::Postgres => "postgres",
            Product::Redshift => "redshift",
            Product::Snowflake => "snowflake",
            Product::Spark => "spark",
            Product::Sybase => "sybase",
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How unquoted identifiers are folded by the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Casing {
    Upper,
    Lower,
    Preserve,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotePolicy {
    Always,
    /// Only identifiers that are not plain words survive unquoted
    WhenNeeded,
}

/// Where the target sorts NULLs when no placement is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullCollation {
    /// NULLs compare greater than any value
    High,
    /// NULLs compare smaller than any value
    Low,
    /// NULLs first regardless of direction
    First,
    /// NULLs last regardless of direction
    Last,
}

impl NullCollation {
    /// Whether the dialect already places NULLs as requested.
    pub fn is_default_order(&self, nulls_first: bool, desc: bool) -> bool {
        match self {
            NullCollation::First => nulls_first,
            NullCollation::Last => !nulls_first,
            NullCollation::Low => nulls_first != desc,
            NullCollation::High => nulls_first == desc,
        }
    }
}

impl From<NullCollationSetting> for NullCollation {
    fn from(setting: NullCollationSetting) -> Self {
        match setting {
            NullCollationSetting::High => NullCollation::High,
            NullCollationSetting::Low => NullCollation::Low,
            NullCollationSetting::First => NullCollation::First,
            NullCollationSetting::Last => NullCollation::Last,
        }
    }
}

/// How a requested NULL placement is rendered when it differs from the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullEmulation {
    /// `x NULLS FIRST`
    Keyword,
    /// `x IS NULL DESC, x`
    IsNull,
    /// `CASE WHEN x IS NULL THEN 0 ELSE 1 END, x`
    Case,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollupSyntax {
    /// `GROUP BY ROLLUP(a, b)`
    Keyword,
    /// `GROUP BY a, b WITH ROLLUP`
    Emulated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitSyntax {
    FetchOffset,
    LimitOffset,
    Top,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValuesSyntax {
    /// `(VALUES (..), (..)) AS t (a, b)`
    Values,
    /// `SELECT .. UNION ALL SELECT ..`
    UnionAll,
    /// `SELECT .. FROM "DUAL"` per row
    FromDual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossJoinSyntax {
    Comma,
    CrossJoin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LateralSyntax {
    Lateral,
    /// `CROSS APPLY` / `OUTER APPLY`
    Apply,
    Unsupported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringEscape {
    /// `'it''s'`
    Double,
    /// `'it\'s'`
    Backslash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalStyle {
    /// `INTERVAL '1-2' YEAR TO MONTH`
    Ansi,
    /// `INTERVAL '1-2' YEAR_MONTH`
    Mysql,
    /// `19800 SECOND`
    Db2,
    /// `INTERVAL 19800 SECOND`
    BigQuery,
    /// `DATEADD(SECOND, 19800, x)`
    DateAdd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatetimeStyle {
    /// `DATE '2020-01-01'`
    Ansi,
    /// `TO_DATE('2020-01-01', 'YYYY-MM-DD')`
    OracleFunctions,
    /// `'2020-01-01'`
    PlainString,
}

/// Dialect-specific CAST targets. Returning `None` keeps the standard name.
pub trait TypeMapper: Send + Sync + fmt::Debug {
    fn map_type(&self, ty: &SqlType) -> Option<String>;
}

#[derive(Debug, Default)]
pub struct StandardTypes;

impl TypeMapper for StandardTypes {
    fn map_type(&self, _ty: &SqlType) -> Option<String> {
        None
    }
}

const RESERVED_WORDS: &[&str] = &[
    "ALL", "AND", "AS", "ASC", "BETWEEN", "BY", "CASE", "CAST", "CROSS", "CURRENT", "DATE",
    "DEFAULT", "DESC", "DISTINCT", "ELSE", "END", "EXCEPT", "EXISTS", "FALSE", "FETCH", "FOR",
    "FROM", "FULL", "GROUP", "HAVING", "IN", "INNER", "INTERSECT", "INTERVAL", "INTO", "IS",
    "JOIN", "LATERAL", "LEFT", "LIKE", "LIMIT", "NOT", "NULL", "OFFSET", "ON", "OR", "ORDER",
    "OUTER", "OVER", "PARTITION", "RANGE", "RIGHT", "ROW", "ROWS", "SELECT", "SET", "TABLE",
    "THEN", "TIME", "TIMESTAMP", "TO", "TRUE", "UNION", "USER", "USING", "VALUES", "WHEN",
    "WHERE", "WINDOW", "WITH",
];

#[derive(Debug, Clone)]
pub struct SqlDialect {
    pub(crate) product: Product,
    pub(crate) major_version: u32,
    pub(crate) minor_version: u32,

    // Identifiers
    pub(crate) quote_start: char,
    pub(crate) quote_end: char,
    pub(crate) quote_policy: QuotePolicy,
    pub(crate) unquoted_casing: Casing,

    // Ordering
    pub(crate) null_collation: NullCollation,
    pub(crate) null_emulation: NullEmulation,

    // Grouping
    pub(crate) rollup: RollupSyntax,
    pub(crate) supports_cube: bool,
    pub(crate) supports_grouping_sets: bool,
    pub(crate) supports_nested_aggregates: bool,
    pub(crate) supports_filter: bool,

    // Limits
    pub(crate) limit: LimitSyntax,
    /// FETCH without OFFSET is rejected; emit `OFFSET 0 ROWS`
    pub(crate) fetch_requires_offset: bool,
    /// OFFSET without LIMIT is rejected; emit the maximum row count
    pub(crate) offset_requires_limit: bool,

    // FROM clause
    pub(crate) supports_full_join: bool,
    pub(crate) cross_join: CrossJoinSyntax,
    pub(crate) values: ValuesSyntax,
    pub(crate) lateral: LateralSyntax,
    pub(crate) requires_table_alias: bool,
    pub(crate) table_alias_as: bool,
    pub(crate) column_alias_as: bool,
    pub(crate) explicit_set_distinct: bool,
    pub(crate) except_keyword: &'static str,

    // Literals
    pub(crate) string_escape: StringEscape,
    pub(crate) interval: IntervalStyle,
    pub(crate) datetime: DatetimeStyle,

    pub(crate) supports_window_frames: bool,

    // Types
    pub(crate) max_varchar_length: u32,
    pub(crate) max_char_length: u32,
    pub(crate) max_decimal_precision: u32,
    pub(crate) types: Arc<dyn TypeMapper>,

    pub(crate) functions: FunctionMapper,
}

impl Default for SqlDialect {
    fn default() -> Self {
        Self::ansi_baseline()
    }
}

impl SqlDialect {
    /// The baseline every product starts from.
    pub fn ansi_baseline() -> Self {
        Self {
            product: Product::Ansi,
            major_version: 0,
            minor_version: 0,
            quote_start: '"',
            quote_end: '"',
            quote_policy: QuotePolicy::Always,
            unquoted_casing: Casing::Upper,
            null_collation: NullCollation::High,
            null_emulation: NullEmulation::Keyword,
            rollup: RollupSyntax::Keyword,
            supports_cube: true,
            supports_grouping_sets: true,
            supports_nested_aggregates: true,
            supports_filter: true,
            limit: LimitSyntax::FetchOffset,
            fetch_requires_offset: false,
            offset_requires_limit: false,
            supports_full_join: true,
            cross_join: CrossJoinSyntax::Comma,
            values: ValuesSyntax::Values,
            lateral: LateralSyntax::Lateral,
            requires_table_alias: false,
            table_alias_as: true,
            column_alias_as: true,
            explicit_set_distinct: false,
            except_keyword: "EXCEPT",
            string_escape: StringEscape::Double,
            interval: IntervalStyle::Ansi,
            datetime: DatetimeStyle::Ansi,
            supports_window_frames: true,
            max_varchar_length: 65536,
            max_char_length: 65536,
            max_decimal_precision: 19,
            types: Arc::new(StandardTypes),
            functions: FunctionMapper::new(),
        }
    }

    pub fn product(&self) -> Product {
        self.product
    }

    pub fn name(&self) -> &'static str {
        self.product.name()
    }

    pub fn version(&self) -> (u32, u32) {
        (self.major_version, self.minor_version)
    }

    pub fn null_ordering(&self) -> NullCollation {
        self.null_collation
    }

    pub fn null_emulation(&self) -> NullEmulation {
        self.null_emulation
    }

    pub fn rollup_syntax(&self) -> RollupSyntax {
        self.rollup
    }

    pub fn limit_syntax(&self) -> LimitSyntax {
        self.limit
    }

    pub fn values_syntax(&self) -> ValuesSyntax {
        self.values
    }

    pub fn lateral_syntax(&self) -> LateralSyntax {
        self.lateral
    }

    pub fn supports_nested_aggregates(&self) -> bool {
        self.supports_nested_aggregates
    }

    pub fn supports_full_join(&self) -> bool {
        self.supports_full_join
    }

    pub fn supports_cube(&self) -> bool {
        self.supports_cube
    }

    pub fn supports_grouping_sets(&self) -> bool {
        self.supports_grouping_sets
    }

    pub fn supports_filter(&self) -> bool {
        self.supports_filter
    }

    pub fn supports_window_frames(&self) -> bool {
        self.supports_window_frames
    }

    pub fn requires_table_alias(&self) -> bool {
        self.requires_table_alias
    }

    pub fn string_escape(&self) -> StringEscape {
        self.string_escape
    }

    pub fn interval_style(&self) -> IntervalStyle {
        self.interval
    }

    pub fn datetime_style(&self) -> DatetimeStyle {
        self.datetime
    }

    pub fn quote_start(&self) -> char {
        self.quote_start
    }

    pub fn functions(&self) -> &FunctionMapper {
        &self.functions
    }

    /// Override the default NULL collation.
    pub fn with_null_collation(mut self, collation: NullCollation) -> Self {
        self.null_collation = collation;
        self
    }

    /// Lower the advertised maximum for character types.
    pub fn with_max_varchar_length(mut self, length: u32) -> Self {
        self.max_varchar_length = self.max_varchar_length.min(length);
        self.max_char_length = self.max_char_length.min(length);
        self
    }

    /// Whether `identifier` must be delimited to survive as written.
    pub fn needs_quote(&self, identifier: &str) -> bool {
        match self.quote_policy {
            QuotePolicy::Always => true,
            QuotePolicy::WhenNeeded => !self.is_plain(identifier),
        }
    }

    fn is_plain(&self, identifier: &str) -> bool {
        let mut chars = identifier.chars();
        let starts_ok = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        if !starts_ok || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return false;
        }
        let folded_same = match self.unquoted_casing {
            Casing::Upper => identifier == identifier.to_ascii_uppercase(),
            Casing::Lower => identifier == identifier.to_ascii_lowercase(),
            Casing::Preserve => true,
        };
        folded_same && !RESERVED_WORDS.contains(&identifier.to_ascii_uppercase().as_str())
    }

    /// Identifier as it appears in output text, delimited and escaped when needed.
    pub fn quote(&self, identifier: &str) -> String {
        if !self.needs_quote(identifier) {
            return identifier.to_string();
        }
        let mut out = String::with_capacity(identifier.len() + 2);
        out.push(self.quote_start);
        for c in identifier.chars() {
            if c == self.quote_end {
                out.push(c);
            }
            out.push(c);
        }
        out.push(self.quote_end);
        out
    }

    /// Name to emit for function `name` called with `argc` arguments.
    pub fn rewrite_function(&self, name: &str, argc: usize) -> String {
        self.functions
            .rewrite_name(name, argc)
            .map(str::to_string)
            .unwrap_or_else(|| name.to_uppercase())
    }

    /// Advertised maximum precision (length for character types).
    pub fn max_precision(&self, name: TypeName) -> Option<u32> {
        match name {
            TypeName::Varchar | TypeName::Varbinary => Some(self.max_varchar_length),
            TypeName::Char | TypeName::Binary => Some(self.max_char_length),
            TypeName::Decimal => Some(self.max_decimal_precision),
            _ => None,
        }
    }

    /// `ty` with precision clamped to the advertised maximum.
    pub fn clamp(&self, ty: SqlType) -> SqlType {
        let Some(max) = self.max_precision(ty.name) else {
            return ty;
        };
        match ty.precision {
            Some(p) if p > max => SqlType {
                precision: Some(max),
                scale: ty.scale.map(|s| s.min(max)),
                ..ty
            },
            _ => ty,
        }
    }

    /// Type name to write after `CAST(x AS ...)`.
    pub fn cast_target(&self, ty: SqlType) -> Result<String, SqlGenError> {
        let ty = self.clamp(ty);
        if matches!(ty.name, TypeName::Null | TypeName::Any) {
            return Err(SqlGenError::unsupported_because(
                format!("CAST AS {}", ty),
                self.name(),
                "not a concrete type",
            ));
        }
        Ok(self.types.map_type(&ty).unwrap_or_else(|| ty.to_string()))
    }
}
