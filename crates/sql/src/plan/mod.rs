//! Logical relational plan consumed by the SQL generator.
//!
//! Nodes own their inputs. Row types are derived on demand from the inputs
//! and never stored, except on leaves (`Scan`, `Values`, `TableFunctionCall`).

pub mod builder;

pub use builder::PlanBuilder;

use crate::rex::{CorrelationId, Literal, RexNode};
use crate::types::{SqlType, TypeName};
use std::collections::{BTreeMap, BTreeSet, HashSet};

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: SqlType,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: SqlType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowType {
    pub fields: Vec<Field>,
}

impl RowType {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Shorthand for tests and fixtures: `[("id", INTEGER), ...]`.
    pub fn of(fields: &[(&str, SqlType)]) -> Self {
        Self {
            fields: fields.iter().map(|(n, t)| Field::new(*n, *t)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    pub fn types(&self) -> Vec<SqlType> {
        self.fields.iter().map(|f| f.ty).collect()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Concatenate two row types, suffixing clashing names on the right
    /// (`product_id`, `product_id0`, ...).
    pub fn join(left: &RowType, right: &RowType) -> RowType {
        let mut fields = left.fields.clone();
        fields.extend(right.fields.iter().cloned());
        RowType::new(fields).uniquify()
    }

    pub(crate) fn uniquify(self) -> RowType {
        let mut taken: HashSet<String> = HashSet::new();
        let fields = self
            .fields
            .into_iter()
            .map(|f| {
                let name = unique_name(&f.name, &taken);
                taken.insert(name.clone());
                Field::new(name, f.ty)
            })
            .collect();
        RowType { fields }
    }
}

/// `base`, or `base0`, `base1`, ... whichever is first absent from `taken`.
pub(crate) fn unique_name(base: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }
    (0..)
        .map(|i| format!("{}{}", base, i))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOpKind {
    Union,
    Intersect,
    Except,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullDirection {
    First,
    Last,
    Unspecified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: usize,
    pub direction: Direction,
    pub nulls: NullDirection,
}

impl SortKey {
    pub fn asc(field: usize) -> Self {
        Self {
            field,
            direction: Direction::Asc,
            nulls: NullDirection::Unspecified,
        }
    }

    pub fn desc(field: usize) -> Self {
        Self {
            field,
            direction: Direction::Desc,
            nulls: NullDirection::Unspecified,
        }
    }

    pub fn nulls_first(mut self) -> Self {
        self.nulls = NullDirection::First;
        self
    }

    pub fn nulls_last(mut self) -> Self {
        self.nulls = NullDirection::Last;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggFunction {
    Count,
    Sum,
    /// SUM that yields 0 instead of NULL on empty input
    Sum0,
    Min,
    Max,
    Avg,
    Grouping,
    Other(String),
}

impl AggFunction {
    pub fn name(&self) -> &str {
        match self {
            AggFunction::Count => "COUNT",
            AggFunction::Sum | AggFunction::Sum0 => "SUM",
            AggFunction::Min => "MIN",
            AggFunction::Max => "MAX",
            AggFunction::Avg => "AVG",
            AggFunction::Grouping => "GROUPING",
            AggFunction::Other(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggCall {
    pub function: AggFunction,
    pub distinct: bool,
    /// Input field ordinals; empty for `COUNT(*)`
    pub args: Vec<usize>,
    /// Boolean input field restricting the rows fed to the call
    pub filter: Option<usize>,
    pub name: Option<String>,
}

impl AggCall {
    pub fn new(function: AggFunction, args: Vec<usize>) -> Self {
        Self {
            function,
            distinct: false,
            args,
            filter: None,
            name: None,
        }
    }

    pub fn count_star() -> Self {
        Self::new(AggFunction::Count, vec![])
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn filter(mut self, field: usize) -> Self {
        self.filter = Some(field);
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    fn result_type(&self, input: &[SqlType]) -> SqlType {
        match self.function {
            AggFunction::Count | AggFunction::Grouping => SqlType::new(TypeName::BigInt),
            AggFunction::Avg => SqlType::new(TypeName::Double),
            _ => self
                .args
                .first()
                .and_then(|i| input.get(*i).copied())
                .unwrap_or(SqlType::new(TypeName::Any)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowFunction {
    Aggregate(AggFunction),
    RowNumber,
    Rank,
    DenseRank,
    PercentRank,
    CumeDist,
    Ntile,
    Lead,
    Lag,
    FirstValue,
    LastValue,
}

impl WindowFunction {
    pub fn name(&self) -> &str {
        match self {
            WindowFunction::Aggregate(agg) => agg.name(),
            WindowFunction::RowNumber => "ROW_NUMBER",
            WindowFunction::Rank => "RANK",
            WindowFunction::DenseRank => "DENSE_RANK",
            WindowFunction::PercentRank => "PERCENT_RANK",
            WindowFunction::CumeDist => "CUME_DIST",
            WindowFunction::Ntile => "NTILE",
            WindowFunction::Lead => "LEAD",
            WindowFunction::Lag => "LAG",
            WindowFunction::FirstValue => "FIRST_VALUE",
            WindowFunction::LastValue => "LAST_VALUE",
        }
    }

    /// Ranking and offset functions ignore the frame, so none is synthesized.
    pub fn is_frame_insensitive(&self) -> bool {
        matches!(
            self,
            WindowFunction::RowNumber
                | WindowFunction::Rank
                | WindowFunction::DenseRank
                | WindowFunction::PercentRank
                | WindowFunction::CumeDist
                | WindowFunction::Ntile
                | WindowFunction::Lead
                | WindowFunction::Lag
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowCall {
    pub function: WindowFunction,
    pub args: Vec<RexNode>,
    pub distinct: bool,
    pub name: String,
}

impl WindowCall {
    pub fn new(function: WindowFunction, args: Vec<RexNode>, name: impl Into<String>) -> Self {
        Self {
            function,
            args,
            distinct: false,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameUnits {
    Rows,
    Range,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameBound {
    UnboundedPreceding,
    Preceding(u64),
    CurrentRow,
    Following(u64),
    UnboundedFollowing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowFrame {
    pub units: FrameUnits,
    pub start: FrameBound,
    pub end: FrameBound,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowGroup {
    pub partition_keys: Vec<usize>,
    pub order_keys: Vec<SortKey>,
    pub frame: Option<WindowFrame>,
    pub calls: Vec<WindowCall>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrelateKind {
    Inner,
    Left,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableFunctionArg {
    Scalar(RexNode),
    Cursor(Box<RelNode>),
}

/// Row pattern of a MATCH_RECOGNIZE clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternNode {
    Var(String),
    Concat(Vec<PatternNode>),
    Alternation(Vec<PatternNode>),
    Quantified {
        node: Box<PatternNode>,
        min: u32,
        max: Option<u32>,
        reluctant: bool,
    },
    /// `{- ... -}`: matched rows are excluded from the output
    Exclude(Box<PatternNode>),
    /// Any ordering of the operands
    Permute(Vec<PatternNode>),
}

impl PatternNode {
    pub fn var(name: impl Into<String>) -> Self {
        PatternNode::Var(name.into())
    }

    pub fn quantified(self, min: u32, max: Option<u32>) -> Self {
        PatternNode::Quantified {
            node: Box::new(self),
            min,
            max,
            reluctant: false,
        }
    }

    pub fn plus(self) -> Self {
        self.quantified(1, None)
    }

    pub fn star(self) -> Self {
        self.quantified(0, None)
    }

    pub fn optional(self) -> Self {
        self.quantified(0, Some(1))
    }

    pub fn reluctant(self) -> Self {
        match self {
            PatternNode::Quantified { node, min, max, .. } => PatternNode::Quantified {
                node,
                min,
                max,
                reluctant: true,
            },
            other => other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AfterMatch {
    SkipToNextRow,
    SkipPastLastRow,
    SkipToFirst(String),
    SkipToLast(String),
    SkipTo(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecognize {
    pub input: RelNode,
    pub pattern: PatternNode,
    pub strict_start: bool,
    pub strict_end: bool,
    pub definitions: Vec<(String, RexNode)>,
    pub measures: Vec<(String, RexNode)>,
    pub after: AfterMatch,
    pub subsets: BTreeMap<String, BTreeSet<String>>,
    pub all_rows: bool,
    pub partition_keys: Vec<usize>,
    pub order_keys: Vec<SortKey>,
    /// `WITHIN` interval
    pub interval: Option<Literal>,
}

impl MatchRecognize {
    pub fn new(input: RelNode, pattern: PatternNode) -> Self {
        Self {
            input,
            pattern,
            strict_start: false,
            strict_end: false,
            definitions: Vec::new(),
            measures: Vec::new(),
            after: AfterMatch::SkipToNextRow,
            subsets: BTreeMap::new(),
            all_rows: false,
            partition_keys: Vec::new(),
            order_keys: Vec::new(),
            interval: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RelNode {
    Scan {
        /// Qualified table name, e.g. `["foodmart", "product"]`
        path: Vec<String>,
        row_type: RowType,
    },
    Filter {
        input: Box<RelNode>,
        condition: RexNode,
        /// Correlation ids that subqueries in `condition` may reference
        variables_set: Vec<CorrelationId>,
    },
    Project {
        input: Box<RelNode>,
        exprs: Vec<RexNode>,
        names: Vec<String>,
    },
    Aggregate {
        input: Box<RelNode>,
        group_set: Vec<usize>,
        /// `None` means the single grouping set `group_set`
        grouping_sets: Option<Vec<Vec<usize>>>,
        calls: Vec<AggCall>,
    },
    Join {
        kind: JoinKind,
        left: Box<RelNode>,
        right: Box<RelNode>,
        condition: RexNode,
    },
    SetOp {
        kind: SetOpKind,
        all: bool,
        inputs: Vec<RelNode>,
    },
    Sort {
        input: Box<RelNode>,
        keys: Vec<SortKey>,
        offset: Option<u64>,
        fetch: Option<u64>,
    },
    Values {
        row_type: RowType,
        rows: Vec<Vec<Literal>>,
    },
    Window {
        input: Box<RelNode>,
        groups: Vec<WindowGroup>,
    },
    Correlate {
        left: Box<RelNode>,
        right: Box<RelNode>,
        correlation_id: CorrelationId,
        kind: CorrelateKind,
    },
    MatchRecognize(Box<MatchRecognize>),
    TableFunctionCall {
        function: String,
        args: Vec<TableFunctionArg>,
        row_type: RowType,
    },
}

impl RelNode {
    pub fn kind_name(&self) -> &'static str {
        match self {
            RelNode::Scan { .. } => "Scan",
            RelNode::Filter { .. } => "Filter",
            RelNode::Project { .. } => "Project",
            RelNode::Aggregate { .. } => "Aggregate",
            RelNode::Join { .. } => "Join",
            RelNode::SetOp { .. } => "SetOp",
            RelNode::Sort { .. } => "Sort",
            RelNode::Values { .. } => "Values",
            RelNode::Window { .. } => "Window",
            RelNode::Correlate { .. } => "Correlate",
            RelNode::MatchRecognize(_) => "MatchRecognize",
            RelNode::TableFunctionCall { .. } => "TableFunctionCall",
        }
    }

    /// Output row type, derived from the inputs.
    pub fn row_type(&self) -> RowType {
        match self {
            RelNode::Scan { row_type, .. }
            | RelNode::Values { row_type, .. }
            | RelNode::TableFunctionCall { row_type, .. } => row_type.clone(),
            RelNode::Filter { input, .. } | RelNode::Sort { input, .. } => input.row_type(),
            RelNode::Project { input, exprs, names } => {
                let input_types = input.row_type().types();
                RowType::new(
                    exprs
                        .iter()
                        .zip(names)
                        .map(|(e, n)| Field::new(n.clone(), e.derive_type(&input_types)))
                        .collect(),
                )
            }
            RelNode::Aggregate {
                input,
                group_set,
                calls,
                ..
            } => {
                let input_row = input.row_type();
                let input_types = input_row.types();
                let mut fields: Vec<Field> = group_set
                    .iter()
                    .filter_map(|i| input_row.fields.get(*i).cloned())
                    .collect();
                for (i, call) in calls.iter().enumerate() {
                    let name = call
                        .name
                        .clone()
                        .unwrap_or_else(|| format!("$f{}", group_set.len() + i));
                    fields.push(Field::new(name, call.result_type(&input_types)));
                }
                RowType::new(fields).uniquify()
            }
            RelNode::Join { left, right, .. } | RelNode::Correlate { left, right, .. } => {
                RowType::join(&left.row_type(), &right.row_type())
            }
            RelNode::SetOp { inputs, .. } => inputs
                .first()
                .map(|i| i.row_type())
                .unwrap_or_default(),
            RelNode::Window { input, groups } => {
                let mut row = input.row_type();
                let input_types = row.types();
                for call in groups.iter().flat_map(|g| &g.calls) {
                    let ty = match call.function {
                        WindowFunction::Aggregate(AggFunction::Avg) => {
                            SqlType::new(TypeName::Double)
                        }
                        WindowFunction::Aggregate(AggFunction::Count)
                        | WindowFunction::RowNumber
                        | WindowFunction::Rank
                        | WindowFunction::DenseRank
                        | WindowFunction::Ntile => SqlType::new(TypeName::BigInt),
                        WindowFunction::PercentRank | WindowFunction::CumeDist => {
                            SqlType::new(TypeName::Double)
                        }
                        _ => call
                            .args
                            .first()
                            .map(|a| a.derive_type(&input_types))
                            .unwrap_or(SqlType::new(TypeName::Any)),
                    };
                    row.fields.push(Field::new(call.name.clone(), ty));
                }
                row.uniquify()
            }
            RelNode::MatchRecognize(mr) => {
                let input_row = mr.input.row_type();
                let input_types = input_row.types();
                let mut fields: Vec<Field> = if mr.all_rows {
                    input_row.fields.clone()
                } else {
                    mr.partition_keys
                        .iter()
                        .filter_map(|i| input_row.fields.get(*i).cloned())
                        .collect()
                };
                for (name, measure) in &mr.measures {
                    fields.push(Field::new(name.clone(), measure.derive_type(&input_types)));
                }
                RowType::new(fields).uniquify()
            }
        }
    }
}
