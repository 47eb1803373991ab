use crate::ast::SqlExpr;
use crate::plan::unique_name;
use crate::rex::CorrelationId;
use crate::sql_generator::error::SqlGenError;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

/// The outer row a correlation id refers to.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationBinding {
    /// FROM-item alias the row comes from, e.g. `$cor0` or `product`
    pub alias: String,
    /// Expression for each field of the row, as seen from nested queries
    pub columns: Arc<[SqlExpr]>,
}

#[derive(Debug, Clone)]
pub struct Scope {
    /// Label for diagnostics, e.g. "subquery" or "union branch"
    pub label: String,
    /// Aliases introduced in this scope, base name → times requested
    pub aliases: HashMap<String, usize>,
    pub correlations: BTreeMap<CorrelationId, CorrelationBinding>,
}

impl Scope {
    fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            aliases: HashMap::new(),
            correlations: BTreeMap::new(),
        }
    }

    fn owns(&self, alias: &str) -> bool {
        self.aliases.contains_key(alias)
    }
}

/// Alias and correlation bookkeeping for one conversion.
///
/// The bottom scope lives for the whole conversion; nested queries push
/// their own. Aliases are never handed out twice in one conversion, so
/// neither enclosing nor sibling queries share a FROM-item name.
pub struct GeneratorContext {
    scope_stack: Vec<Scope>,
    issued: HashSet<String>,
}

/// Handed out by [`GeneratorContext::enter_scope`]; give it back to
/// [`GeneratorContext::exit_scope`] when the nested query is done.
#[must_use = "a scope token must be returned to exit_scope"]
pub struct ScopeToken {
    expected_label: String,
    depth: usize,
}

/// Represents a state in the scope stack that can be rolled back to.
pub struct Checkpoint {
    pub(crate) stack_len: usize,
}

impl Default for GeneratorContext {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneratorContext {
    pub fn new() -> Self {
        Self {
            scope_stack: vec![Scope::new("root")],
            issued: HashSet::new(),
        }
    }

    fn is_live(&self, alias: &str) -> bool {
        self.scope_stack.iter().any(|s| s.owns(alias))
    }

    /// Reserve an alias derived from `base`: `t`, `t0`, `t1`, ...
    pub fn fresh_alias(&mut self, base: &str) -> String {
        let alias = unique_name(base, &self.issued);
        self.issued.insert(alias.clone());
        if let Some(scope) = self.scope_stack.last_mut() {
            *scope.aliases.entry(alias.clone()).or_insert(0) += 1;
        }
        tracing::trace!(target: "sql_generator", base = %base, alias = %alias, "Assigned alias");
        alias
    }

    /// Whether `alias` belongs to a FROM item of a query still open on the stack.
    pub fn alias_in_use(&self, alias: &str) -> bool {
        self.is_live(alias)
    }

    /// Enter a nested query scope.
    pub fn enter_scope(&mut self, label: impl Into<String>) -> ScopeToken {
        let scope = Scope::new(label);
        let token = ScopeToken {
            expected_label: scope.label.clone(),
            depth: self.scope_stack.len(),
        };
        self.scope_stack.push(scope);
        tracing::trace!(
            target: "sql_generator",
            label = %token.expected_label,
            depth = self.scope_stack.len(),
            "Pushed scope"
        );
        token
    }

    /// Leave the scope opened by `token`, together with anything an error
    /// path left above it.
    pub fn exit_scope(&mut self, token: ScopeToken) {
        match self.scope_stack.get(token.depth) {
            Some(scope) if scope.label == token.expected_label => {}
            other => {
                let actual = other.map(|s| s.label.as_str()).unwrap_or("<none>");
                tracing::error!(
                    target: "sql_generator",
                    expected = %token.expected_label,
                    actual = %actual,
                    "Scope stack corruption detected"
                );
                #[cfg(debug_assertions)]
                panic!(
                    "Scope stack corruption: expected {}, got {}",
                    token.expected_label, actual
                );
            }
        }
        self.rollback(Checkpoint {
            stack_len: token.depth.max(1),
        });
    }

    /// Bind correlation `id` in the innermost scope.
    pub fn bind_correlation(&mut self, id: CorrelationId, binding: CorrelationBinding) {
        tracing::trace!(
            target: "sql_generator",
            id = id,
            alias = %binding.alias,
            "Bound correlation variable"
        );
        if let Some(scope) = self.scope_stack.last_mut() {
            scope.correlations.insert(id, binding);
        }
    }

    /// The innermost binding of correlation `id`.
    pub fn resolve_correlation(&self, id: CorrelationId) -> Result<&CorrelationBinding, SqlGenError> {
        self.scope_stack
            .iter()
            .rev()
            .find_map(|s| s.correlations.get(&id))
            .ok_or_else(|| SqlGenError::UnresolvedCorrelation {
                id,
                visible: self.visible_correlations(),
            })
    }

    fn visible_correlations(&self) -> Vec<CorrelationId> {
        let mut ids: Vec<CorrelationId> = self
            .scope_stack
            .iter()
            .flat_map(|s| s.correlations.keys().copied())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Get the current (top) scope
    pub fn current_scope(&self) -> Option<&Scope> {
        self.scope_stack.last()
    }

    pub fn scope_stack_len(&self) -> usize {
        self.scope_stack.len()
    }

    /// Create a checkpoint of the current scope stack state.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            stack_len: self.scope_stack.len(),
        }
    }

    /// Roll back the scope stack to a previously created checkpoint.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        if self.scope_stack.len() > checkpoint.stack_len {
            let diff = self.scope_stack.len() - checkpoint.stack_len;
            tracing::trace!(target: "sql_generator", count = diff, "Rolling back scopes");
            self.scope_stack.truncate(checkpoint.stack_len);
        }
    }
}
