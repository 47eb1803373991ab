//! Intermediate SQL syntax tree produced by the plan walker and rendered by
//! [`crate::unparser`].
//!
//! Nodes carry no dialect decisions beyond what the walker already made;
//! quoting, alias keywords, limit syntax and string escaping are applied at
//! emission time.

use crate::plan::{AfterMatch, PatternNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Like,
    NotLike,
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Or => "OR",
            BinaryOp::And => "AND",
            BinaryOp::Eq => "=",
            BinaryOp::NotEq => "<>",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::Like => "LIKE",
            BinaryOp::NotLike => "NOT LIKE",
            BinaryOp::Plus => "+",
            BinaryOp::Minus => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
        }
    }

    /// Binding strength; all binary operators are left-associative.
    pub fn precedence(&self) -> u8 {
        match self {
            BinaryOp::Or => 22,
            BinaryOp::And => 24,
            BinaryOp::Eq
            | BinaryOp::NotEq
            | BinaryOp::Lt
            | BinaryOp::LtEq
            | BinaryOp::Gt
            | BinaryOp::GtEq => 30,
            BinaryOp::Like | BinaryOp::NotLike => 32,
            BinaryOp::Plus | BinaryOp::Minus => 40,
            BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::Modulo => 60,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostfixOp {
    IsNull,
    IsNotNull,
}

pub const PREC_NOT: u8 = 26;
pub const PREC_POSTFIX: u8 = 28;
pub const PREC_IN: u8 = 32;
pub const PREC_UNARY_MINUS: u8 = 80;
pub const PREC_ATOM: u8 = 100;

#[derive(Debug, Clone, PartialEq)]
pub enum SqlExpr {
    /// Possibly qualified name; each part is quoted per dialect
    Identifier(Vec<String>),
    Star,
    /// Text written as-is: numbers, keywords, pre-rendered fragments
    Raw(String),
    /// Quote-doubled through the writer
    StringLiteral(String),
    /// Already escaped and quoted (backslash-escaping dialects)
    EscapedLiteral(String),
    Binary {
        op: BinaryOp,
        left: Box<SqlExpr>,
        right: Box<SqlExpr>,
    },
    Unary {
        op: UnaryOp,
        expr: Box<SqlExpr>,
    },
    Postfix {
        op: PostfixOp,
        expr: Box<SqlExpr>,
    },
    Function(Function),
    /// Call whose arguments are separated by keywords, e.g.
    /// `SUBSTRING(x FROM 2 FOR 3)` or `TRIM(BOTH ' ' FROM x)`
    KeywordCall {
        name: String,
        prefix: Option<String>,
        first: Box<SqlExpr>,
        rest: Vec<(String, SqlExpr)>,
    },
    Case {
        whens: Vec<(SqlExpr, SqlExpr)>,
        else_result: Option<Box<SqlExpr>>,
    },
    InList {
        expr: Box<SqlExpr>,
        list: Vec<SqlExpr>,
        negated: bool,
    },
    InSubquery {
        expr: Box<SqlExpr>,
        query: Box<SqlQuery>,
        negated: bool,
    },
    Exists(Box<SqlQuery>),
    Subquery(Box<SqlQuery>),
    /// `ROW(a, b)`
    Row(Vec<SqlExpr>),
    Interval {
        negative: bool,
        value: String,
        qualifier: String,
    },
    /// `CURSOR ((SELECT ...))`
    Cursor(Box<SqlQuery>),
    /// `RUNNING x` / `FINAL x`
    Prefixed {
        keyword: &'static str,
        expr: Box<SqlExpr>,
    },
}

impl SqlExpr {
    pub fn ident(name: impl Into<String>) -> Self {
        SqlExpr::Identifier(vec![name.into()])
    }

    pub fn raw(text: impl Into<String>) -> Self {
        SqlExpr::Raw(text.into())
    }

    pub fn binary(op: BinaryOp, left: SqlExpr, right: SqlExpr) -> Self {
        SqlExpr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn func(name: impl Into<String>, args: Vec<SqlExpr>) -> Self {
        SqlExpr::Function(Function::new(name, args))
    }

    pub fn precedence(&self) -> u8 {
        match self {
            SqlExpr::Binary { op, .. } => op.precedence(),
            SqlExpr::Unary { op: UnaryOp::Not, .. } => PREC_NOT,
            SqlExpr::Unary {
                op: UnaryOp::Minus, ..
            } => PREC_UNARY_MINUS,
            SqlExpr::Postfix { .. } => PREC_POSTFIX,
            SqlExpr::InList { .. } | SqlExpr::InSubquery { .. } => PREC_IN,
            _ => PREC_ATOM,
        }
    }

    /// Last identifier part, if this is an identifier.
    pub fn simple_name(&self) -> Option<&str> {
        match self {
            SqlExpr::Identifier(parts) => parts.last().map(String::as_str),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub args: Vec<SqlExpr>,
    pub distinct: bool,
    pub filter: Option<Box<SqlExpr>>,
    pub over: Option<WindowSpec>,
}

impl Function {
    pub fn new(name: impl Into<String>, args: Vec<SqlExpr>) -> Self {
        Self {
            name: name.into(),
            args,
            distinct: false,
            filter: None,
            over: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullsOrder {
    First,
    Last,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub expr: SqlExpr,
    pub desc: bool,
    pub nulls: Option<NullsOrder>,
}

impl OrderItem {
    pub fn asc(expr: SqlExpr) -> Self {
        Self {
            expr,
            desc: false,
            nulls: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WindowSpec {
    pub partition_by: Vec<SqlExpr>,
    pub order_by: Vec<OrderItem>,
    /// Rendered frame, e.g. `ROWS BETWEEN 3 PRECEDING AND CURRENT ROW`
    pub frame: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectItem {
    pub expr: SqlExpr,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GroupBy {
    /// Plain list; empty renders as `()`
    Exprs(Vec<SqlExpr>),
    Rollup(Vec<SqlExpr>),
    Cube(Vec<SqlExpr>),
    GroupingSets(Vec<Vec<SqlExpr>>),
    /// `a, b WITH ROLLUP`
    WithRollup(Vec<SqlExpr>),
    WithCube(Vec<SqlExpr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOperator {
    Inner,
    Left,
    Right,
    Full,
    /// `a,\nb`
    Comma,
    Cross,
    CrossApply,
    OuterApply,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableRef {
    Table {
        path: Vec<String>,
        alias: Option<String>,
    },
    Derived {
        query: Box<SqlQuery>,
        alias: Option<String>,
        columns: Vec<String>,
        lateral: bool,
    },
    Join {
        op: JoinOperator,
        left: Box<TableRef>,
        right: Box<TableRef>,
        condition: Option<SqlExpr>,
    },
    /// `TABLE(F(args))`
    Function {
        call: SqlExpr,
        alias: Option<String>,
    },
    MatchRecognize {
        input: Box<SqlQuery>,
        clause: Box<MatchRecognizeClause>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecognizeClause {
    pub partition_by: Vec<SqlExpr>,
    pub order_by: Vec<OrderItem>,
    pub measures: Vec<(SqlExpr, String)>,
    pub all_rows: bool,
    pub after: AfterMatch,
    pub strict_start: bool,
    pub strict_end: bool,
    pub pattern: PatternNode,
    pub within: Option<SqlExpr>,
    pub subsets: Vec<(String, Vec<String>)>,
    pub definitions: Vec<(String, SqlExpr)>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Select {
    pub distinct: bool,
    /// Empty means `*`
    pub items: Vec<SelectItem>,
    pub from: Option<TableRef>,
    pub selection: Option<SqlExpr>,
    pub group_by: Option<GroupBy>,
    pub having: Option<SqlExpr>,
    pub order_by: Vec<OrderItem>,
    pub offset: Option<u64>,
    pub fetch: Option<u64>,
}

impl Select {
    pub fn from(table: TableRef) -> Self {
        Self {
            from: Some(table),
            ..Default::default()
        }
    }

    pub fn has_limit(&self) -> bool {
        !self.order_by.is_empty() || self.offset.is_some() || self.fetch.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOperator {
    Union,
    Intersect,
    Except,
}

impl SetOperator {
    pub fn precedence(&self) -> u8 {
        match self {
            SetOperator::Union | SetOperator::Except => 14,
            SetOperator::Intersect => 18,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SqlQuery {
    Select(Box<Select>),
    SetOp {
        op: SetOperator,
        all: bool,
        inputs: Vec<SqlQuery>,
    },
    /// `VALUES  (..),\n (..)`
    Values(Vec<Vec<SqlExpr>>),
}

impl SqlQuery {
    pub fn select(select: Select) -> Self {
        SqlQuery::Select(Box::new(select))
    }

    pub fn precedence(&self) -> u8 {
        match self {
            SqlQuery::SetOp { op, .. } => op.precedence(),
            _ => PREC_ATOM,
        }
    }
}
