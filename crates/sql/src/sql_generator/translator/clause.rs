//! Clause bookkeeping for the plan walker.
//!
//! A [`Frame`] is the SELECT statement under construction together with the
//! clauses already filled in. Each node asks [`decide`] whether the clauses
//! it needs can still be added to the current statement in SQL's evaluation
//! order; if not, the statement is closed off as a derived table and a new
//! one is started on top of it.

use crate::ast::{SelectItem, Select, SqlExpr, SqlQuery, TableRef};
use crate::sql_generator::context::GeneratorContext;
use std::collections::BTreeSet;

/// SELECT clauses in the order SQL evaluates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Clause {
    From,
    Where,
    GroupBy,
    Having,
    Select,
    SetOp,
    OrderBy,
    Offset,
    Fetch,
}

impl Clause {
    /// WHERE and HAVING conditions combine with AND.
    fn repeatable(self) -> bool {
        matches!(self, Clause::Where | Clause::Having)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeDecision {
    /// Add the clauses to the current statement
    Fold,
    /// Close the current statement and select from it
    Wrap,
}

/// Whether `wanted` can still be added to a statement that has `existing`.
pub fn decide(existing: &BTreeSet<Clause>, wanted: &[Clause]) -> ScopeDecision {
    let Some(min_wanted) = wanted.iter().min() else {
        return ScopeDecision::Fold;
    };
    let later = existing.iter().any(|c| c > min_wanted);
    let repeated = wanted
        .iter()
        .any(|c| existing.contains(c) && !c.repeatable());
    if later || repeated {
        ScopeDecision::Wrap
    } else {
        ScopeDecision::Fold
    }
}

/// Names the generator makes up for unnamed expressions; never worth an alias.
pub(crate) fn is_generated_name(name: &str) -> bool {
    name.starts_with("EXPR$")
        || name
            .strip_prefix("$f")
            .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}

/// Alias for a select item producing field `name`, if one is needed.
pub(crate) fn item_alias(expr: &SqlExpr, name: &str) -> Option<String> {
    if expr.simple_name() == Some(name) || is_generated_name(name) {
        None
    } else {
        Some(name.to_string())
    }
}

/// A SELECT statement under construction.
#[derive(Debug, Clone)]
pub(crate) struct Frame {
    pub select: Select,
    pub clauses: BTreeSet<Clause>,
    /// How each output field is referenced by clauses folded into this
    /// statement
    pub columns: Vec<SqlExpr>,
    pub names: Vec<String>,
    /// Alias of the single FROM item; None for joins and FROM-less selects
    pub from_alias: Option<String>,
    /// Keys of a `WITH ROLLUP` grouping, which already orders its output
    pub rollup_keys: Option<Vec<SqlExpr>>,
}

/// Result of converting one plan node.
#[derive(Debug, Clone)]
pub(crate) enum Converted {
    Frame(Frame),
    /// Set operations and multi-row VALUES: nothing folds into them
    Query { query: SqlQuery, names: Vec<String> },
}

impl Converted {
    pub fn names(&self) -> &[String] {
        match self {
            Converted::Frame(frame) => &frame.names,
            Converted::Query { names, .. } => names,
        }
    }

    /// A frame that can take `wanted`, wrapping if it cannot.
    pub fn into_frame(self, ctx: &mut GeneratorContext, wanted: &[Clause]) -> Frame {
        match self {
            Converted::Frame(frame) => match decide(&frame.clauses, wanted) {
                ScopeDecision::Fold => frame,
                ScopeDecision::Wrap => {
                    tracing::trace!(
                        target: "sql_generator",
                        existing = ?frame.clauses,
                        wanted = ?wanted,
                        "Wrapping scope as derived table"
                    );
                    frame.wrap(ctx)
                }
            },
            Converted::Query { query, names } => Frame::derived(ctx, query, names),
        }
    }

    /// The finished statement; `aliased` adds aliases for every field whose
    /// name the expression does not already carry.
    pub fn into_query(self, aliased: bool) -> SqlQuery {
        match self {
            Converted::Frame(frame) => frame.finish(aliased),
            Converted::Query { query, .. } => query,
        }
    }
}

impl Frame {
    /// `SELECT * FROM item`, where the item exposes `names` as plain columns.
    pub fn over(table: TableRef, names: Vec<String>, from_alias: Option<String>) -> Self {
        Self {
            select: Select::from(table),
            clauses: BTreeSet::from([Clause::From]),
            columns: names.iter().cloned().map(SqlExpr::ident).collect(),
            names,
            from_alias,
            rollup_keys: None,
        }
    }

    /// `SELECT * FROM (query) AS t`.
    pub fn derived(ctx: &mut GeneratorContext, query: SqlQuery, names: Vec<String>) -> Self {
        let alias = ctx.fresh_alias("t");
        let table = TableRef::Derived {
            query: Box::new(query),
            alias: Some(alias.clone()),
            columns: Vec::new(),
            lateral: false,
        };
        Frame::over(table, names, Some(alias))
    }

    /// Close this statement off and select from it.
    pub fn wrap(self, ctx: &mut GeneratorContext) -> Frame {
        let names = self.names.clone();
        let query = self.finish(true);
        Frame::derived(ctx, query, names)
    }

    pub fn has(&self, clause: Clause) -> bool {
        self.clauses.contains(&clause)
    }

    /// Columns qualified through the FROM alias, when every column is a
    /// plain reference to it.
    pub fn qualified_columns(&self) -> Option<Vec<SqlExpr>> {
        let alias = self.from_alias.as_ref()?;
        self.columns
            .iter()
            .map(|c| match c {
                SqlExpr::Identifier(parts) if parts.len() == 1 => Some(SqlExpr::Identifier(
                    vec![alias.clone(), parts[0].clone()],
                )),
                SqlExpr::Identifier(parts) if parts.first() == Some(alias) => Some(c.clone()),
                _ => None,
            })
            .collect()
    }

    /// Whether `SELECT *` yields exactly `names`.
    fn star_matches(&self) -> bool {
        let mut seen = BTreeSet::new();
        self.columns
            .iter()
            .zip(&self.names)
            .all(|(c, n)| c.simple_name() == Some(n.as_str()) && seen.insert(n.as_str()))
    }

    pub fn finish(self, aliased: bool) -> SqlQuery {
        let star = self.star_matches();
        let mut select = self.select;
        if select.items.is_empty() {
            if aliased && !star {
                select.items = self
                    .columns
                    .into_iter()
                    .zip(&self.names)
                    .map(|(expr, name)| SelectItem {
                        alias: (expr.simple_name() != Some(name.as_str())).then(|| name.clone()),
                        expr,
                    })
                    .collect();
            }
        } else if aliased {
            for (item, name) in select.items.iter_mut().zip(&self.names) {
                if item.alias.is_none() && item.expr.simple_name() != Some(name.as_str()) {
                    item.alias = Some(name.clone());
                }
            }
        }
        SqlQuery::select(select)
    }
}
