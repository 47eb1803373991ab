//! SQL data types carried by row types, literals and CAST targets.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeName {
    Boolean,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Decimal,
    Real,
    Float,
    Double,
    Char,
    Varchar,
    Binary,
    Varbinary,
    Date,
    Time,
    Timestamp,
    IntervalYearMonth,
    IntervalDayTime,
    Null,
    Any,
}

impl TypeName {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeName::Boolean => "BOOLEAN",
            TypeName::TinyInt => "TINYINT",
            TypeName::SmallInt => "SMALLINT",
            TypeName::Integer => "INTEGER",
            TypeName::BigInt => "BIGINT",
            TypeName::Decimal => "DECIMAL",
            TypeName::Real => "REAL",
            TypeName::Float => "FLOAT",
            TypeName::Double => "DOUBLE",
            TypeName::Char => "CHAR",
            TypeName::Varchar => "VARCHAR",
            TypeName::Binary => "BINARY",
            TypeName::Varbinary => "VARBINARY",
            TypeName::Date => "DATE",
            TypeName::Time => "TIME",
            TypeName::Timestamp => "TIMESTAMP",
            TypeName::IntervalYearMonth => "INTERVAL YEAR TO MONTH",
            TypeName::IntervalDayTime => "INTERVAL DAY TO SECOND",
            TypeName::Null => "NULL",
            TypeName::Any => "ANY",
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            TypeName::TinyInt | TypeName::SmallInt | TypeName::Integer | TypeName::BigInt
        )
    }

    pub fn is_character(&self) -> bool {
        matches!(self, TypeName::Char | TypeName::Varchar)
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, TypeName::Binary | TypeName::Varbinary)
    }

    pub fn is_datetime(&self) -> bool {
        matches!(self, TypeName::Date | TypeName::Time | TypeName::Timestamp)
    }
}

/// A type with optional precision (length for character/binary types) and scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SqlType {
    pub name: TypeName,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
}

impl SqlType {
    pub const fn new(name: TypeName) -> Self {
        Self {
            name,
            precision: None,
            scale: None,
        }
    }

    pub const fn with_precision(name: TypeName, precision: u32) -> Self {
        Self {
            name,
            precision: Some(precision),
            scale: None,
        }
    }

    pub const fn decimal(precision: u32, scale: u32) -> Self {
        Self {
            name: TypeName::Decimal,
            precision: Some(precision),
            scale: Some(scale),
        }
    }

    pub const fn integer() -> Self {
        Self::new(TypeName::Integer)
    }

    pub const fn varchar(length: u32) -> Self {
        Self::with_precision(TypeName::Varchar, length)
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.as_str())?;
        match (self.precision, self.scale) {
            (Some(p), Some(s)) => write!(f, "({}, {})", p, s),
            (Some(p), None) => write!(f, "({})", p),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimeUnit {
    Year,
    Quarter,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
}

impl TimeUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeUnit::Year => "YEAR",
            TimeUnit::Quarter => "QUARTER",
            TimeUnit::Month => "MONTH",
            TimeUnit::Week => "WEEK",
            TimeUnit::Day => "DAY",
            TimeUnit::Hour => "HOUR",
            TimeUnit::Minute => "MINUTE",
            TimeUnit::Second => "SECOND",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `start [TO end]`, e.g. `YEAR TO MONTH` or `DAY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntervalQualifier {
    pub start: TimeUnit,
    pub end: Option<TimeUnit>,
}

impl IntervalQualifier {
    pub const fn single(unit: TimeUnit) -> Self {
        Self {
            start: unit,
            end: None,
        }
    }

    pub const fn range(start: TimeUnit, end: TimeUnit) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    pub fn is_single_unit(&self) -> bool {
        self.end.is_none_or(|end| end == self.start)
    }

    pub fn is_year_month(&self) -> bool {
        matches!(self.start, TimeUnit::Year | TimeUnit::Quarter | TimeUnit::Month)
    }
}

impl fmt::Display for IntervalQualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) if end != self.start => write!(f, "{} TO {}", self.start, end),
            _ => write!(f, "{}", self.start),
        }
    }
}
