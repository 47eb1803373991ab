use crate::ast::SqlQuery;
use crate::plan::RelNode;
use crate::sql_generator::context::GeneratorContext;
use crate::sql_generator::dialect::SqlDialect;
use crate::sql_generator::error::SqlGenError;
use crate::unparser::{unparse, UnparseOptions};
use relsql_error::RelSqlError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub(crate) mod aggregate;
pub(crate) mod clause;
pub(crate) mod correlate;
pub(crate) mod join;
pub(crate) mod match_recognize;
pub(crate) mod projection;
pub(crate) mod scan;
pub(crate) mod set_ops;
pub(crate) mod sort;
pub(crate) mod values;
pub(crate) mod window;

pub use clause::{decide, Clause, ScopeDecision};
pub(crate) use clause::{Converted, Frame};

pub const MAX_RECURSION_DEPTH: usize = 128;

/// Depths up to this run on the caller's stack.
const INLINE_DEPTH: usize = 64;
/// Stack reserved per allowed plan level when converting on a worker thread.
const STACK_PER_LEVEL: usize = 64 * 1024;
const STACK_BASE: usize = 1024 * 1024;

/// Walks a plan bottom-up and builds the SQL syntax tree for one dialect.
///
/// A generator holds the alias state of a single conversion; create a new
/// one per plan.
pub struct SqlGenerator<'a> {
    pub context: GeneratorContext,
    pub dialect: &'a SqlDialect,
    max_depth: usize,
    pub(crate) recursion_level: Arc<AtomicUsize>,
}

impl<'a> SqlGenerator<'a> {
    pub fn new(dialect: &'a SqlDialect) -> Self {
        Self {
            context: GeneratorContext::new(),
            dialect,
            max_depth: MAX_RECURSION_DEPTH,
            recursion_level: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Limit on nested plan nodes, subqueries included.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Convert `plan` and render it.
    pub fn generate(
        &mut self,
        plan: &RelNode,
        options: &UnparseOptions,
    ) -> Result<String, RelSqlError> {
        tracing::debug!(
            target: "sql_generator",
            dialect = %self.dialect.name(),
            root = %plan.kind_name(),
            "Generating SQL from plan"
        );
        let dialect_name = self.dialect.name();
        self.with_stack(|gen| {
            let query = gen.convert(plan)?.into_query(false);
            unparse(&query, gen.dialect, options)
        })
        .map_err(|e| e.to_relsql_error(dialect_name))
    }

    /// The syntax tree for `plan`, before rendering.
    pub fn plan_to_query(&mut self, plan: &RelNode) -> Result<SqlQuery, SqlGenError> {
        self.with_stack(|gen| Ok(gen.convert(plan)?.into_query(false)))
    }

    /// Run `f` on a stack deep enough for `max_depth` nested plan nodes.
    ///
    /// Small limits run inline; larger ones move to a scoped worker thread
    /// sized for the limit, carrying the caller's tracing dispatcher along.
    fn with_stack<T, F>(&mut self, f: F) -> Result<T, SqlGenError>
    where
        T: Send,
        F: FnOnce(&mut Self) -> Result<T, SqlGenError> + Send,
    {
        if self.max_depth <= INLINE_DEPTH {
            return f(self);
        }

        let max_depth = self.max_depth;
        let stack_size = max_depth
            .saturating_mul(STACK_PER_LEVEL)
            .saturating_add(STACK_BASE);
        let dispatch = tracing::dispatcher::get_default(|d| d.clone());
        std::thread::scope(|scope| {
            let worker = std::thread::Builder::new()
                .name("sql-generator".to_string())
                .stack_size(stack_size)
                .spawn_scoped(scope, || tracing::dispatcher::with_default(&dispatch, || f(self)));
            match worker {
                Ok(handle) => handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic)),
                Err(e) => {
                    tracing::warn!(
                        target: "sql_generator",
                        stack_size,
                        error = %e,
                        "Could not reserve a conversion stack"
                    );
                    Err(SqlGenError::MaxRecursion(max_depth))
                }
            }
        })
    }

    pub(crate) fn convert(&mut self, plan: &RelNode) -> Result<Converted, SqlGenError> {
        let _guard = RecursionGuard::new(self.recursion_level.clone(), self.max_depth)?;

        tracing::trace!(
            target: "sql_generator",
            node = %plan.kind_name(),
            depth = self.recursion_level.load(Ordering::SeqCst),
            "Translating plan node"
        );

        match plan {
            RelNode::Scan { path, row_type } => scan::handle_scan(self, path, row_type),
            RelNode::Filter {
                input,
                condition,
                variables_set,
            } => projection::handle_filter(self, input, condition, variables_set),
            RelNode::Project {
                input,
                exprs,
                names,
            } => projection::handle_project(self, input, exprs, names),
            RelNode::Aggregate {
                input,
                group_set,
                grouping_sets,
                calls,
            } => aggregate::handle_aggregate(
                self,
                plan,
                input,
                group_set,
                grouping_sets.as_deref(),
                calls,
            ),
            RelNode::Join {
                kind,
                left,
                right,
                condition,
            } => join::handle_join(self, *kind, left, right, condition),
            RelNode::SetOp { kind, all, inputs } => {
                set_ops::handle_set_op(self, *kind, *all, inputs)
            }
            RelNode::Sort {
                input,
                keys,
                offset,
                fetch,
            } => sort::handle_sort(self, input, keys, *offset, *fetch),
            RelNode::Values { row_type, rows } => values::handle_values(self, row_type, rows),
            RelNode::Window { input, groups } => window::handle_window(self, plan, input, groups),
            RelNode::Correlate {
                left,
                right,
                correlation_id,
                kind,
            } => correlate::handle_correlate(self, plan, left, right, *correlation_id, *kind),
            RelNode::MatchRecognize(mr) => match_recognize::handle_match_recognize(self, plan, mr),
            RelNode::TableFunctionCall {
                function,
                args,
                row_type,
            } => scan::handle_table_function(self, function, args, row_type),
        }
    }

    /// Convert `plan` inside a nested scope, e.g. a subquery expression or
    /// one branch of a set operation. Correlations bound inside are dropped
    /// afterwards; aliases stay taken for the rest of the conversion.
    pub(crate) fn nested(
        &mut self,
        label: &str,
        plan: &RelNode,
        aliased: bool,
    ) -> Result<SqlQuery, SqlGenError> {
        let token = self.context.enter_scope(label);
        let result = self.convert(plan).map(|c| c.into_query(aliased));
        self.context.exit_scope(token);
        result
    }

    /// A subquery expression: `EXISTS (...)`, `IN (...)` or scalar.
    pub(crate) fn subquery(&mut self, plan: &RelNode) -> Result<SqlQuery, SqlGenError> {
        self.nested("subquery", plan, false)
    }
}

struct RecursionGuard {
    level: Arc<AtomicUsize>,
}

impl RecursionGuard {
    fn new(level: Arc<AtomicUsize>, max_depth: usize) -> Result<Self, SqlGenError> {
        let current = level.fetch_add(1, Ordering::SeqCst);
        if current >= max_depth {
            level.fetch_sub(1, Ordering::SeqCst);
            return Err(SqlGenError::MaxRecursion(max_depth));
        }
        Ok(Self { level })
    }
}

impl Drop for RecursionGuard {
    fn drop(&mut self) {
        self.level.fetch_sub(1, Ordering::SeqCst);
    }
}
