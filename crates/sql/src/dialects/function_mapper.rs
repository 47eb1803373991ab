//! Function Mapper
//!
//! Declarative registry of per-dialect function rewrites, keyed by function
//! name and optionally by argument count. A rule either renames the call or
//! rebuilds it into a different shape from the already-translated arguments.

use crate::ast::{BinaryOp, SqlExpr};
use std::collections::HashMap;
use std::sync::Arc;

/// Rewrite closure. `Err` carries the reason the call cannot be expressed.
pub type TransformFn = Arc<dyn Fn(&[SqlExpr]) -> Result<SqlExpr, String> + Send + Sync>;

/// A translation rule for converting a function to target dialect
pub enum Translation {
    /// Simple rename: "POSITION" → "INSTR"
    Rename(&'static str),
    /// Custom transform with access to arguments
    Transform(TransformFn),
}

impl Clone for Translation {
    fn clone(&self) -> Self {
        match self {
            Translation::Rename(s) => Translation::Rename(s),
            Translation::Transform(f) => Translation::Transform(Arc::clone(f)),
        }
    }
}

/// `None` arity matches any argument count.
type RuleKey = (String, Option<usize>);

pub struct FunctionMapper {
    rules: HashMap<RuleKey, Translation>,
}

impl std::fmt::Debug for FunctionMapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionMapper")
            .field("rules_count", &self.rules.len())
            .finish()
    }
}

impl Clone for FunctionMapper {
    fn clone(&self) -> Self {
        Self {
            rules: self
                .rules
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }
}

impl Default for FunctionMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionMapper {
    pub fn new() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Add a simple rename rule
    pub fn rename(mut self, from: &str, to: &'static str) -> Self {
        self.rules
            .insert((from.to_uppercase(), None), Translation::Rename(to));
        self
    }

    /// Add a custom transform rule for any arity
    pub fn transform<F>(mut self, from: &str, f: F) -> Self
    where
        F: Fn(&[SqlExpr]) -> Result<SqlExpr, String> + Send + Sync + 'static,
    {
        self.rules
            .insert((from.to_uppercase(), None), Translation::Transform(Arc::new(f)));
        self
    }

    /// Add a custom transform rule for exactly `argc` arguments
    pub fn transform_arity<F>(mut self, from: &str, argc: usize, f: F) -> Self
    where
        F: Fn(&[SqlExpr]) -> Result<SqlExpr, String> + Send + Sync + 'static,
    {
        self.rules.insert(
            (from.to_uppercase(), Some(argc)),
            Translation::Transform(Arc::new(f)),
        );
        self
    }

    fn lookup(&self, func: &str, argc: usize) -> Option<&Translation> {
        let name = func.to_uppercase();
        self.rules
            .get(&(name.clone(), Some(argc)))
            .or_else(|| self.rules.get(&(name, None)))
    }

    /// Translate a function call to target dialect syntax.
    /// Returns None if no rule exists (use default rendering).
    pub fn translate(&self, func: &str, args: &[SqlExpr]) -> Option<Result<SqlExpr, String>> {
        match self.lookup(func, args.len())? {
            Translation::Rename(new_name) => Some(Ok(Self::build_func(new_name, args.to_vec()))),
            Translation::Transform(f) => Some(f(args)),
        }
    }

    /// Target name when the rule is a plain rename.
    pub fn rewrite_name(&self, func: &str, argc: usize) -> Option<&'static str> {
        match self.lookup(func, argc)? {
            Translation::Rename(new_name) => Some(new_name),
            Translation::Transform(_) => None,
        }
    }

    /// Check if a function has a translation rule
    pub fn has_rule(&self, func: &str, argc: usize) -> bool {
        self.lookup(func, argc).is_some()
    }

    pub fn build_func(name: &str, args: Vec<SqlExpr>) -> SqlExpr {
        SqlExpr::func(name, args)
    }

    /// `'text'` as a string literal argument.
    pub fn lit(text: &str) -> SqlExpr {
        SqlExpr::StringLiteral(text.to_string())
    }

    pub fn infix(op: BinaryOp, args: &[SqlExpr]) -> Result<SqlExpr, String> {
        match args {
            [l, r] => Ok(SqlExpr::binary(op, l.clone(), r.clone())),
            _ => Err(format!("{} expects two operands", op.as_str())),
        }
    }

    /// The unit keyword carried by a time-unit argument.
    pub fn unit_of(arg: &SqlExpr) -> Option<&str> {
        match arg {
            SqlExpr::Raw(unit) => Some(unit.as_str()),
            _ => None,
        }
    }
}
