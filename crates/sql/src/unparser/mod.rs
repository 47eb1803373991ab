//! Emitter from [`crate::ast`] to SQL text.
//!
//! Clause order is fixed; dialect decisions left to emission time are
//! identifier quoting, alias keywords, the limit clause flavour and set
//! operator keywords. All text goes through a [`StackWriter`] so quotes
//! written inside other quotes are escaped by the doubling rule.

pub mod writer;

use crate::ast::{
    GroupBy, JoinOperator, MatchRecognizeClause, NullsOrder, OrderItem, PostfixOp, Select,
    SelectItem, SetOperator, SqlExpr, SqlQuery, TableRef, UnaryOp, WindowSpec, PREC_ATOM,
    PREC_IN, PREC_UNARY_MINUS,
};
use crate::plan::{AfterMatch, PatternNode};
use crate::sql_generator::dialect::{LimitSyntax, SqlDialect};
use crate::sql_generator::error::SqlGenError;
pub use writer::{Directive, StackWriter};

/// MySQL's documented "no limit" row count.
const MAX_ROW_COUNT: &str = "18446744073709551615";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnparseOptions {
    /// Indent derived tables on their own lines
    pub pretty: bool,
    pub indent: String,
}

impl Default for UnparseOptions {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: "  ".to_string(),
        }
    }
}

/// Render `query` as text for `dialect`.
pub fn unparse(
    query: &SqlQuery,
    dialect: &SqlDialect,
    options: &UnparseOptions,
) -> Result<String, SqlGenError> {
    let mut unparser = Unparser::new(dialect, options);
    unparser.query(query)?;
    unparser.finish()
}

/// Render a single expression, mainly for tests and diagnostics.
pub fn unparse_expr(expr: &SqlExpr, dialect: &SqlDialect) -> Result<String, SqlGenError> {
    let mut unparser = Unparser::new(dialect, &UnparseOptions::default());
    unparser.expr(expr)?;
    unparser.finish()
}

pub struct Unparser<'a> {
    dialect: &'a SqlDialect,
    pretty: bool,
    w: StackWriter,
}

impl<'a> Unparser<'a> {
    pub fn new(dialect: &'a SqlDialect, options: &UnparseOptions) -> Self {
        Self {
            dialect,
            pretty: options.pretty,
            w: StackWriter::new(&options.indent),
        }
    }

    pub fn finish(self) -> Result<String, SqlGenError> {
        self.w.finish()
    }

    // ========================================
    // Queries
    // ========================================

    pub fn query(&mut self, query: &SqlQuery) -> Result<(), SqlGenError> {
        match query {
            SqlQuery::Select(select) => self.select(select),
            SqlQuery::SetOp { op, all, inputs } => self.set_op(*op, *all, inputs),
            SqlQuery::Values(rows) => self.values(rows),
        }
    }

    fn set_op(&mut self, op: SetOperator, all: bool, inputs: &[SqlQuery]) -> Result<(), SqlGenError> {
        let prec = op.precedence();
        let keyword = match op {
            SetOperator::Union => "UNION",
            SetOperator::Intersect => "INTERSECT",
            SetOperator::Except => self.dialect.except_keyword,
        };
        for (i, input) in inputs.iter().enumerate() {
            if i > 0 {
                self.w.write_str("\n");
                self.w.write_str(keyword);
                if all {
                    self.w.write_str(" ALL");
                } else if self.dialect.explicit_set_distinct {
                    self.w.write_str(" DISTINCT");
                }
                self.w.write_str("\n");
            }
            let limited = matches!(input, SqlQuery::Select(s) if s.has_limit());
            let wrap = limited
                || if i == 0 {
                    input.precedence() < prec
                } else {
                    input.precedence() <= prec
                };
            if wrap {
                self.w.write_str("(");
                self.query(input)?;
                self.w.write_str(")");
            } else {
                self.query(input)?;
            }
        }
        Ok(())
    }

    fn values(&mut self, rows: &[Vec<SqlExpr>]) -> Result<(), SqlGenError> {
        self.w.write_str("VALUES ");
        for (i, row) in rows.iter().enumerate() {
            if i > 0 {
                self.w.write_str(",\n");
            }
            self.w.write_str(" (");
            self.expr_list(row)?;
            self.w.write_str(")");
        }
        Ok(())
    }

    fn select(&mut self, select: &Select) -> Result<(), SqlGenError> {
        let limit = self.dialect.limit_syntax();
        self.w.write_str("SELECT ");
        if select.distinct {
            self.w.write_str("DISTINCT ");
        }
        if limit == LimitSyntax::Top {
            if select.offset.is_some() {
                return Err(SqlGenError::unsupported_because(
                    "OFFSET",
                    self.dialect.name(),
                    "only TOP is available",
                ));
            }
            if let Some(fetch) = select.fetch {
                self.w.write_str(&format!("TOP ({}) ", fetch));
            }
        }
        if select.items.is_empty() {
            self.w.write_str("*");
        } else {
            for (i, item) in select.items.iter().enumerate() {
                if i > 0 {
                    self.w.write_str(", ");
                }
                self.select_item(item)?;
            }
        }
        if let Some(from) = &select.from {
            self.w.write_str("\nFROM ");
            self.table_ref(from)?;
        }
        if let Some(selection) = &select.selection {
            self.w.write_str("\nWHERE ");
            self.expr(selection)?;
        }
        if let Some(group_by) = &select.group_by {
            self.w.write_str("\nGROUP BY ");
            self.group_by(group_by)?;
        }
        if let Some(having) = &select.having {
            self.w.write_str("\nHAVING ");
            self.expr(having)?;
        }
        if !select.order_by.is_empty() {
            self.w.write_str("\nORDER BY ");
            self.order_items(&select.order_by)?;
        }
        self.limit_clause(limit, select.offset, select.fetch);
        Ok(())
    }

    fn limit_clause(&mut self, limit: LimitSyntax, offset: Option<u64>, fetch: Option<u64>) {
        match limit {
            LimitSyntax::FetchOffset => {
                match offset {
                    Some(offset) => self.w.write_str(&format!("\nOFFSET {} ROWS", offset)),
                    None if fetch.is_some() && self.dialect.fetch_requires_offset => {
                        self.w.write_str("\nOFFSET 0 ROWS")
                    }
                    None => {}
                }
                if let Some(fetch) = fetch {
                    self.w.write_str(&format!("\nFETCH NEXT {} ROWS ONLY", fetch));
                }
            }
            LimitSyntax::LimitOffset => {
                match fetch {
                    Some(fetch) => self.w.write_str(&format!("\nLIMIT {}", fetch)),
                    None if offset.is_some() && self.dialect.offset_requires_limit => {
                        self.w.write_str(&format!("\nLIMIT {}", MAX_ROW_COUNT))
                    }
                    None => {}
                }
                if let Some(offset) = offset {
                    self.w.write_str(&format!("\nOFFSET {}", offset));
                }
            }
            // Written in the SELECT list
            LimitSyntax::Top => {}
        }
    }

    fn select_item(&mut self, item: &SelectItem) -> Result<(), SqlGenError> {
        self.expr(&item.expr)?;
        if let Some(alias) = &item.alias {
            self.w
                .write_str(if self.dialect.column_alias_as { " AS " } else { " " });
            self.ident(alias)?;
        }
        Ok(())
    }

    fn group_by(&mut self, group_by: &GroupBy) -> Result<(), SqlGenError> {
        match group_by {
            GroupBy::Exprs(exprs) if exprs.is_empty() => self.w.write_str("()"),
            GroupBy::Exprs(exprs) => self.expr_list(exprs)?,
            GroupBy::Rollup(exprs) => {
                self.w.write_str("ROLLUP(");
                self.expr_list(exprs)?;
                self.w.write_str(")");
            }
            GroupBy::Cube(exprs) => {
                self.w.write_str("CUBE(");
                self.expr_list(exprs)?;
                self.w.write_str(")");
            }
            GroupBy::GroupingSets(sets) => {
                self.w.write_str("GROUPING SETS(");
                for (i, set) in sets.iter().enumerate() {
                    if i > 0 {
                        self.w.write_str(", ");
                    }
                    if set.len() == 1 {
                        self.expr(&set[0])?;
                    } else {
                        self.w.write_str("(");
                        self.expr_list(set)?;
                        self.w.write_str(")");
                    }
                }
                self.w.write_str(")");
            }
            GroupBy::WithRollup(exprs) => {
                self.expr_list(exprs)?;
                self.w.write_str(" WITH ROLLUP");
            }
            GroupBy::WithCube(exprs) => {
                self.expr_list(exprs)?;
                self.w.write_str(" WITH CUBE");
            }
        }
        Ok(())
    }

    fn order_items(&mut self, items: &[OrderItem]) -> Result<(), SqlGenError> {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.w.write_str(", ");
            }
            self.expr(&item.expr)?;
            if item.desc {
                self.w.write_str(" DESC");
            }
            match item.nulls {
                Some(NullsOrder::First) => self.w.write_str(" NULLS FIRST"),
                Some(NullsOrder::Last) => self.w.write_str(" NULLS LAST"),
                None => {}
            }
        }
        Ok(())
    }

    // ========================================
    // FROM items
    // ========================================

    fn table_ref(&mut self, table: &TableRef) -> Result<(), SqlGenError> {
        match table {
            TableRef::Table { path, alias } => {
                self.compound_ident(path)?;
                self.table_alias(alias.as_deref())?;
            }
            TableRef::Derived {
                query,
                alias,
                columns,
                lateral,
            } => {
                if *lateral {
                    self.w.write_str("LATERAL ");
                }
                self.parenthesized_query(query)?;
                self.table_alias(alias.as_deref())?;
                if !columns.is_empty() {
                    self.w.write_str(" (");
                    for (i, column) in columns.iter().enumerate() {
                        if i > 0 {
                            self.w.write_str(", ");
                        }
                        self.ident(column)?;
                    }
                    self.w.write_str(")");
                }
            }
            TableRef::Join {
                op,
                left,
                right,
                condition,
            } => {
                self.table_ref(left)?;
                self.w.write_str(match op {
                    JoinOperator::Comma => ",\n",
                    JoinOperator::Cross => "\nCROSS JOIN ",
                    JoinOperator::Inner => "\nINNER JOIN ",
                    JoinOperator::Left => "\nLEFT JOIN ",
                    JoinOperator::Right => "\nRIGHT JOIN ",
                    JoinOperator::Full => "\nFULL JOIN ",
                    JoinOperator::CrossApply => "\nCROSS APPLY ",
                    JoinOperator::OuterApply => "\nOUTER APPLY ",
                });
                if matches!(right.as_ref(), TableRef::Join { .. }) {
                    self.w.write_str("(");
                    self.table_ref(right)?;
                    self.w.write_str(")");
                } else {
                    self.table_ref(right)?;
                }
                if let Some(condition) = condition {
                    self.w.write_str(" ON ");
                    self.expr(condition)?;
                }
            }
            TableRef::Function { call, alias } => {
                self.w.write_str("TABLE(");
                self.expr(call)?;
                self.w.write_str(")");
                self.table_alias(alias.as_deref())?;
            }
            TableRef::MatchRecognize { input, clause } => {
                self.parenthesized_query(input)?;
                self.w.write_str(" MATCH_RECOGNIZE(\n");
                self.match_recognize(clause)?;
                self.w.write_str(")");
            }
        }
        Ok(())
    }

    fn table_alias(&mut self, alias: Option<&str>) -> Result<(), SqlGenError> {
        if let Some(alias) = alias {
            self.w
                .write_str(if self.dialect.table_alias_as { " AS " } else { " " });
            self.ident(alias)?;
        }
        Ok(())
    }

    fn parenthesized_query(&mut self, query: &SqlQuery) -> Result<(), SqlGenError> {
        self.w.write_str("(");
        if self.pretty {
            self.w.directive(Directive::Indent)?;
            self.w.write_str("\n");
            self.query(query)?;
            self.w.directive(Directive::Outdent)?;
        } else {
            self.query(query)?;
        }
        self.w.write_str(")");
        Ok(())
    }

    fn match_recognize(&mut self, mr: &MatchRecognizeClause) -> Result<(), SqlGenError> {
        if !mr.partition_by.is_empty() {
            self.w.write_str("PARTITION BY ");
            self.expr_list(&mr.partition_by)?;
            self.w.write_str("\n");
        }
        if !mr.order_by.is_empty() {
            self.w.write_str("ORDER BY ");
            self.order_items(&mr.order_by)?;
            self.w.write_str("\n");
        }
        if !mr.measures.is_empty() {
            self.w.write_str("MEASURES ");
            for (i, (expr, name)) in mr.measures.iter().enumerate() {
                if i > 0 {
                    self.w.write_str(", ");
                }
                self.expr(expr)?;
                self.w.write_str(" AS ");
                self.ident(name)?;
            }
            self.w.write_str("\n");
        }
        self.w.write_str(if mr.all_rows {
            "ALL ROWS PER MATCH\n"
        } else {
            "ONE ROW PER MATCH\n"
        });
        self.w.write_str("AFTER MATCH ");
        match &mr.after {
            AfterMatch::SkipToNextRow => self.w.write_str("SKIP TO NEXT ROW"),
            AfterMatch::SkipPastLastRow => self.w.write_str("SKIP PAST LAST ROW"),
            AfterMatch::SkipToFirst(var) => {
                self.w.write_str("SKIP TO FIRST ");
                self.ident(var)?;
            }
            AfterMatch::SkipToLast(var) => {
                self.w.write_str("SKIP TO LAST ");
                self.ident(var)?;
            }
            AfterMatch::SkipTo(var) => {
                self.w.write_str("SKIP TO ");
                self.ident(var)?;
            }
        }
        self.w.write_str("\nPATTERN (");
        if mr.strict_start {
            self.w.write_str("^ ");
        }
        self.pattern(&mr.pattern)?;
        if mr.strict_end {
            self.w.write_str(" $");
        }
        self.w.write_str(")");
        if let Some(within) = &mr.within {
            self.w.write_str(" WITHIN ");
            self.expr(within)?;
        }
        self.w.write_str("\n");
        if !mr.subsets.is_empty() {
            self.w.write_str("SUBSET ");
            for (i, (name, vars)) in mr.subsets.iter().enumerate() {
                if i > 0 {
                    self.w.write_str(", ");
                }
                self.ident(name)?;
                self.w.write_str(" = (");
                for (j, var) in vars.iter().enumerate() {
                    if j > 0 {
                        self.w.write_str(", ");
                    }
                    self.ident(var)?;
                }
                self.w.write_str(")");
            }
            self.w.write_str("\n");
        }
        self.w.write_str("DEFINE ");
        for (i, (var, condition)) in mr.definitions.iter().enumerate() {
            if i > 0 {
                self.w.write_str(", ");
            }
            self.ident(var)?;
            self.w.write_str(" AS ");
            self.expr(condition)?;
        }
        Ok(())
    }

    fn pattern(&mut self, node: &PatternNode) -> Result<(), SqlGenError> {
        match node {
            PatternNode::Var(name) => self.ident(name)?,
            PatternNode::Concat(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.w.write_str(" ");
                    }
                    if matches!(item, PatternNode::Alternation(_)) {
                        self.w.write_str("(");
                        self.pattern(item)?;
                        self.w.write_str(")");
                    } else {
                        self.pattern(item)?;
                    }
                }
            }
            PatternNode::Alternation(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.w.write_str(" | ");
                    }
                    self.pattern(item)?;
                }
            }
            PatternNode::Quantified {
                node,
                min,
                max,
                reluctant,
            } => {
                if matches!(
                    node.as_ref(),
                    PatternNode::Concat(_) | PatternNode::Alternation(_)
                ) {
                    self.w.write_str("(");
                    self.pattern(node)?;
                    self.w.write_str(")");
                } else {
                    self.pattern(node)?;
                }
                let quantifier = match (*min, *max) {
                    (1, None) => "+".to_string(),
                    (0, None) => "*".to_string(),
                    (0, Some(1)) => "?".to_string(),
                    (n, Some(m)) if n == m => format!("{{ {} }}", n),
                    (n, None) => format!("{{ {}, }}", n),
                    (0, Some(m)) => format!("{{ , {} }}", m),
                    (n, Some(m)) => format!("{{ {}, {} }}", n, m),
                };
                self.w.write_str(" ");
                self.w.write_str(&quantifier);
                if *reluctant {
                    self.w.write_str(" ?");
                }
            }
            PatternNode::Exclude(inner) => {
                self.w.write_str("{- ");
                self.pattern(inner)?;
                self.w.write_str(" -}");
            }
            PatternNode::Permute(items) => {
                self.w.write_str("PERMUTE(");
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.w.write_str(", ");
                    }
                    self.pattern(item)?;
                }
                self.w.write_str(")");
            }
        }
        Ok(())
    }

    // ========================================
    // Expressions
    // ========================================

    pub fn expr(&mut self, expr: &SqlExpr) -> Result<(), SqlGenError> {
        match expr {
            SqlExpr::Identifier(parts) => self.compound_ident(parts)?,
            SqlExpr::Star => self.w.write_str("*"),
            SqlExpr::Raw(text) => self.w.write_str(text),
            SqlExpr::StringLiteral(value) => {
                self.w.directive(Directive::OpenStringLiteral)?;
                self.w.write_str(value);
                self.w.directive(Directive::CloseStringLiteral)?;
            }
            SqlExpr::EscapedLiteral(text) => self.w.write_verbatim(text),
            SqlExpr::Binary { op, left, right } => {
                let prec = op.precedence();
                self.child(left, left.precedence() < prec)?;
                self.w.write_str(" ");
                self.w.write_str(op.as_str());
                self.w.write_str(" ");
                self.child(right, right.precedence() <= prec)?;
            }
            SqlExpr::Unary {
                op: UnaryOp::Not,
                expr,
            } => {
                self.w.write_str("NOT ");
                self.child(expr, expr.precedence() < PREC_ATOM)?;
            }
            SqlExpr::Unary {
                op: UnaryOp::Minus,
                expr,
            } => {
                self.w.write_str("-");
                let leading_minus = matches!(expr.as_ref(), SqlExpr::Raw(t) if t.starts_with('-'))
                    || matches!(
                        expr.as_ref(),
                        SqlExpr::Unary {
                            op: UnaryOp::Minus,
                            ..
                        }
                    );
                self.child(expr, leading_minus || expr.precedence() < PREC_UNARY_MINUS)?;
            }
            SqlExpr::Postfix { op, expr } => {
                self.child(expr, expr.precedence() <= PREC_IN)?;
                self.w.write_str(match op {
                    PostfixOp::IsNull => " IS NULL",
                    PostfixOp::IsNotNull => " IS NOT NULL",
                });
            }
            SqlExpr::Function(f) => {
                self.w.write_str(&f.name);
                self.w.write_str("(");
                if f.distinct {
                    self.w.write_str("DISTINCT ");
                }
                self.expr_list(&f.args)?;
                self.w.write_str(")");
                if let Some(filter) = &f.filter {
                    self.w.write_str(" FILTER (WHERE ");
                    self.expr(filter)?;
                    self.w.write_str(")");
                }
                if let Some(over) = &f.over {
                    self.w.write_str(" OVER ");
                    self.window_spec(over)?;
                }
            }
            SqlExpr::KeywordCall {
                name,
                prefix,
                first,
                rest,
            } => {
                self.w.write_str(name);
                self.w.write_str("(");
                if let Some(prefix) = prefix {
                    self.w.write_str(prefix);
                    self.w.write_str(" ");
                }
                self.expr(first)?;
                for (keyword, arg) in rest {
                    self.w.write_str(" ");
                    self.w.write_str(keyword);
                    self.w.write_str(" ");
                    self.expr(arg)?;
                }
                self.w.write_str(")");
            }
            SqlExpr::Case { whens, else_result } => {
                self.w.write_str("CASE");
                for (when, then) in whens {
                    self.w.write_str(" WHEN ");
                    self.expr(when)?;
                    self.w.write_str(" THEN ");
                    self.expr(then)?;
                }
                if let Some(else_result) = else_result {
                    self.w.write_str(" ELSE ");
                    self.expr(else_result)?;
                }
                self.w.write_str(" END");
            }
            SqlExpr::InList {
                expr,
                list,
                negated,
            } => {
                self.child(expr, expr.precedence() < PREC_IN)?;
                self.w
                    .write_str(if *negated { " NOT IN (" } else { " IN (" });
                self.expr_list(list)?;
                self.w.write_str(")");
            }
            SqlExpr::InSubquery {
                expr,
                query,
                negated,
            } => {
                self.child(expr, expr.precedence() < PREC_IN)?;
                self.w
                    .write_str(if *negated { " NOT IN " } else { " IN " });
                self.parenthesized_query(query)?;
            }
            SqlExpr::Exists(query) => {
                self.w.write_str("EXISTS ");
                self.parenthesized_query(query)?;
            }
            SqlExpr::Subquery(query) => self.parenthesized_query(query)?,
            SqlExpr::Row(items) => {
                self.w.write_str("ROW(");
                self.expr_list(items)?;
                self.w.write_str(")");
            }
            SqlExpr::Interval {
                negative,
                value,
                qualifier,
            } => {
                self.w.write_str("INTERVAL ");
                if *negative {
                    self.w.write_str("-");
                }
                self.w.directive(Directive::OpenStringLiteral)?;
                self.w.write_str(value);
                self.w.directive(Directive::CloseStringLiteral)?;
                self.w.write_str(" ");
                self.w.write_str(qualifier);
            }
            SqlExpr::Cursor(query) => {
                self.w.write_str("CURSOR (");
                self.parenthesized_query(query)?;
                self.w.write_str(")");
            }
            SqlExpr::Prefixed { keyword, expr } => {
                self.w.write_str(keyword);
                self.w.write_str(" ");
                self.child(expr, expr.precedence() < PREC_ATOM)?;
            }
        }
        Ok(())
    }

    fn child(&mut self, expr: &SqlExpr, parenthesize: bool) -> Result<(), SqlGenError> {
        if parenthesize {
            self.w.write_str("(");
            self.expr(expr)?;
            self.w.write_str(")");
            Ok(())
        } else {
            self.expr(expr)
        }
    }

    fn expr_list(&mut self, exprs: &[SqlExpr]) -> Result<(), SqlGenError> {
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                self.w.write_str(", ");
            }
            self.expr(expr)?;
        }
        Ok(())
    }

    fn window_spec(&mut self, spec: &WindowSpec) -> Result<(), SqlGenError> {
        self.w.write_str("(");
        let mut first = true;
        if !spec.partition_by.is_empty() {
            self.w.write_str("PARTITION BY ");
            self.expr_list(&spec.partition_by)?;
            first = false;
        }
        if !spec.order_by.is_empty() {
            if !first {
                self.w.write_str(" ");
            }
            self.w.write_str("ORDER BY ");
            self.order_items(&spec.order_by)?;
            first = false;
        }
        if let Some(frame) = &spec.frame {
            if !first {
                self.w.write_str(" ");
            }
            self.w.write_str(frame);
        }
        self.w.write_str(")");
        Ok(())
    }

    // ========================================
    // Identifiers
    // ========================================

    fn compound_ident(&mut self, parts: &[String]) -> Result<(), SqlGenError> {
        for (i, part) in parts.iter().enumerate() {
            if i > 0 {
                self.w.write_str(".");
            }
            if part == "*" {
                self.w.write_str("*");
            } else {
                self.ident(part)?;
            }
        }
        Ok(())
    }

    fn ident(&mut self, name: &str) -> Result<(), SqlGenError> {
        if !self.dialect.needs_quote(name) {
            self.w.write_str(name);
            return Ok(());
        }
        let open = self.dialect.quote_start();
        self.w.directive(Directive::OpenIdentifier(open))?;
        self.w.write_str(name);
        self.w.directive(Directive::CloseIdentifier(open))?;
        Ok(())
    }
}
