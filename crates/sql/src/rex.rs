//! Scalar row expressions.
//!
//! Expressions reference their input row positionally (`InputRef`). Joins
//! reference the concatenation of the left and right row types.

use crate::plan::RelNode;
use crate::types::{IntervalQualifier, SqlType, TimeUnit, TypeName};

/// Identifies the row variable introduced by a correlating operator.
pub type CorrelationId = u32;

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Boolean(bool),
    Integer(i64),
    /// Exact decimal `unscaled * 10^-scale`
    Decimal {
        unscaled: i128,
        scale: i32,
    },
    Double(f64),
    String(String),
    /// `yyyy-MM-dd`
    Date(String),
    /// `HH:mm:ss[.fff]`
    Time(String),
    /// `yyyy-MM-dd HH:mm:ss[.fff]`
    Timestamp(String),
    Interval {
        /// Unsigned interval text, e.g. `1-2` for `YEAR TO MONTH`
        value: String,
        negative: bool,
        qualifier: IntervalQualifier,
    },
    /// Time-unit flag operand of FLOOR/CEIL and EXTRACT
    TimeUnit(TimeUnit),
}

impl Literal {
    pub fn sql_type(&self) -> SqlType {
        match self {
            Literal::Null => SqlType::new(TypeName::Null),
            Literal::Boolean(_) => SqlType::new(TypeName::Boolean),
            Literal::Integer(_) => SqlType::integer(),
            Literal::Decimal { unscaled, scale } => {
                let digits = unscaled.unsigned_abs().to_string().len() as u32;
                SqlType::decimal(digits.max(1), (*scale).max(0) as u32)
            }
            Literal::Double(_) => SqlType::new(TypeName::Double),
            Literal::String(s) => SqlType::with_precision(TypeName::Char, s.chars().count() as u32),
            Literal::Date(_) => SqlType::new(TypeName::Date),
            Literal::Time(_) => SqlType::new(TypeName::Time),
            Literal::Timestamp(_) => SqlType::new(TypeName::Timestamp),
            Literal::Interval { qualifier, .. } => {
                if qualifier.is_year_month() {
                    SqlType::new(TypeName::IntervalYearMonth)
                } else {
                    SqlType::new(TypeName::IntervalDayTime)
                }
            }
            Literal::TimeUnit(_) => SqlType::new(TypeName::Any),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimFlag {
    Both,
    Leading,
    Trailing,
}

impl TrimFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrimFlag::Both => "BOTH",
            TrimFlag::Leading => "LEADING",
            TrimFlag::Trailing => "TRAILING",
        }
    }
}

/// Scalar operators. Operand conventions are noted where they are not obvious.
#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
    Not,
    Plus,
    Minus,
    Times,
    Divide,
    Mod,
    UnaryMinus,
    IsNull,
    IsNotNull,
    Like,
    NotLike,
    /// `[needle, v1, v2, ...]`; a ROW needle compares against ROW values
    In,
    NotIn,
    Row,
    /// `[when1, then1, when2, then2, ..., else]`
    Case,
    Cast(SqlType),
    /// `[x]` or `[x, TimeUnit]`
    Floor,
    Ceil,
    /// `[x, from]` or `[x, from, for]`
    Substring,
    /// `[needle, haystack]`
    Position,
    /// `[characters, x]`
    Trim(TrimFlag),
    /// `[TimeUnit, x]`
    Extract,
    Coalesce,
    /// `[datetime, interval]`
    DatetimePlus,
    DatetimeMinus,
    /// Any other function, by name
    Function(String),

    // Row-pattern navigation, only valid inside MATCH_RECOGNIZE
    Prev,
    Next,
    First,
    Last,
    Classifier,
    MatchNumber,
    Running,
    Final,
}

impl Operator {
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Operator::Eq
                | Operator::NotEq
                | Operator::Lt
                | Operator::LtEq
                | Operator::Gt
                | Operator::GtEq
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubqueryKind {
    Exists,
    /// `needles IN (subquery)`
    In(Vec<RexNode>),
    Scalar,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RexNode {
    InputRef(usize),
    Literal(Literal),
    Call {
        op: Operator,
        operands: Vec<RexNode>,
    },
    /// Field `field` of the row bound to correlation `id`
    CorrelVariable {
        id: CorrelationId,
        field: usize,
    },
    Subquery {
        kind: SubqueryKind,
        plan: Box<RelNode>,
    },
    /// `"VAR"."column"` inside a MATCH_RECOGNIZE definition or measure
    PatternFieldRef {
        var: String,
        index: usize,
    },
}

impl RexNode {
    pub fn call(op: Operator, operands: Vec<RexNode>) -> Self {
        RexNode::Call { op, operands }
    }

    pub fn input(index: usize) -> Self {
        RexNode::InputRef(index)
    }

    pub fn null() -> Self {
        RexNode::Literal(Literal::Null)
    }

    pub fn boolean(value: bool) -> Self {
        RexNode::Literal(Literal::Boolean(value))
    }

    pub fn int(value: i64) -> Self {
        RexNode::Literal(Literal::Integer(value))
    }

    pub fn decimal(unscaled: i128, scale: i32) -> Self {
        RexNode::Literal(Literal::Decimal { unscaled, scale })
    }

    pub fn string(value: impl Into<String>) -> Self {
        RexNode::Literal(Literal::String(value.into()))
    }

    pub fn unit(unit: TimeUnit) -> Self {
        RexNode::Literal(Literal::TimeUnit(unit))
    }

    pub fn eq(left: RexNode, right: RexNode) -> Self {
        Self::call(Operator::Eq, vec![left, right])
    }

    pub fn gt(left: RexNode, right: RexNode) -> Self {
        Self::call(Operator::Gt, vec![left, right])
    }

    pub fn lt(left: RexNode, right: RexNode) -> Self {
        Self::call(Operator::Lt, vec![left, right])
    }

    pub fn plus(left: RexNode, right: RexNode) -> Self {
        Self::call(Operator::Plus, vec![left, right])
    }

    pub fn and(operands: Vec<RexNode>) -> Self {
        Self::call(Operator::And, operands)
    }

    pub fn or(operands: Vec<RexNode>) -> Self {
        Self::call(Operator::Or, operands)
    }

    pub fn not(operand: RexNode) -> Self {
        Self::call(Operator::Not, vec![operand])
    }

    pub fn is_null(operand: RexNode) -> Self {
        Self::call(Operator::IsNull, vec![operand])
    }

    pub fn cast(operand: RexNode, ty: SqlType) -> Self {
        Self::call(Operator::Cast(ty), vec![operand])
    }

    pub fn func(name: impl Into<String>, operands: Vec<RexNode>) -> Self {
        Self::call(Operator::Function(name.into()), operands)
    }

    pub fn exists(plan: RelNode) -> Self {
        RexNode::Subquery {
            kind: SubqueryKind::Exists,
            plan: Box::new(plan),
        }
    }

    pub fn in_subquery(needles: Vec<RexNode>, plan: RelNode) -> Self {
        RexNode::Subquery {
            kind: SubqueryKind::In(needles),
            plan: Box::new(plan),
        }
    }

    pub fn scalar_subquery(plan: RelNode) -> Self {
        RexNode::Subquery {
            kind: SubqueryKind::Scalar,
            plan: Box::new(plan),
        }
    }

    pub fn pattern_ref(var: impl Into<String>, index: usize) -> Self {
        RexNode::PatternFieldRef {
            var: var.into(),
            index,
        }
    }

    /// True if the expression is a direct reference to input field `index`.
    pub fn is_input_ref(&self, index: usize) -> bool {
        matches!(self, RexNode::InputRef(i) if *i == index)
    }

    /// Best-effort result type given the input row's field types.
    pub fn derive_type(&self, input: &[SqlType]) -> SqlType {
        match self {
            RexNode::InputRef(i) => input
                .get(*i)
                .copied()
                .unwrap_or(SqlType::new(TypeName::Any)),
            RexNode::Literal(lit) => lit.sql_type(),
            RexNode::Call { op, operands } => match op {
                Operator::Cast(ty) => *ty,
                op if op.is_comparison() => SqlType::new(TypeName::Boolean),
                Operator::And
                | Operator::Or
                | Operator::Not
                | Operator::IsNull
                | Operator::IsNotNull
                | Operator::Like
                | Operator::NotLike
                | Operator::In
                | Operator::NotIn => SqlType::new(TypeName::Boolean),
                Operator::Position | Operator::Extract | Operator::MatchNumber => {
                    SqlType::new(TypeName::BigInt)
                }
                Operator::Classifier => SqlType::new(TypeName::Varchar),
                Operator::Case => operands
                    .get(1)
                    .map(|o| o.derive_type(input))
                    .unwrap_or(SqlType::new(TypeName::Any)),
                _ => operands
                    .first()
                    .map(|o| o.derive_type(input))
                    .unwrap_or(SqlType::new(TypeName::Any)),
            },
            RexNode::Subquery { kind, plan } => match kind {
                SubqueryKind::Scalar => plan
                    .row_type()
                    .fields
                    .first()
                    .map(|f| f.ty)
                    .unwrap_or(SqlType::new(TypeName::Any)),
                _ => SqlType::new(TypeName::Boolean),
            },
            RexNode::CorrelVariable { .. } | RexNode::PatternFieldRef { .. } => {
                SqlType::new(TypeName::Any)
            }
        }
    }
}
