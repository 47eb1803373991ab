//! Scalar expression translation.
//!
//! [`ExprTranslator`] turns a [`RexNode`] into a [`SqlExpr`] against the
//! columns of the scope it is evaluated in. Dialect differences enter
//! through literal rendering, the CAST type table and the function mapper;
//! precedence is left to the unparser.

use super::translator::SqlGenerator;
use crate::ast::{BinaryOp, PostfixOp, SqlExpr, UnaryOp};
use crate::rex::{Literal, Operator, RexNode, SubqueryKind};
use crate::sql_generator::dialect::{IntervalStyle, SqlDialect};
use crate::sql_generator::error::SqlGenError;
use crate::sql_generator::literal::{literal_to_sql, numeric_amount, single_unit};

/// How pattern field references are rendered inside MATCH_RECOGNIZE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternMode {
    /// Not inside MATCH_RECOGNIZE
    Off,
    /// DEFINE conditions: a bare reference means the current row, `PREV(x, 0)`
    Define,
    /// MEASURES: bare references stay bare
    Measure,
}

pub struct ExprTranslator<'g, 'a> {
    gen: &'g mut SqlGenerator<'a>,
    input: &'g [SqlExpr],
    names: &'g [String],
    node_type: &'static str,
    pattern: PatternMode,
    /// Inside PREV: references are not re-wrapped
    in_navigation: bool,
    /// Inside FIRST/LAST: every reference becomes `FIRST(ref, n)`
    ref_wrap: Option<(&'static str, SqlExpr)>,
}

impl<'g, 'a> ExprTranslator<'g, 'a> {
    /// `input[i]` is how field `i` of the input row is written in the
    /// current scope; `names` are the field names, used by pattern refs.
    pub fn new(
        gen: &'g mut SqlGenerator<'a>,
        input: &'g [SqlExpr],
        names: &'g [String],
        node_type: &'static str,
    ) -> Self {
        Self {
            gen,
            input,
            names,
            node_type,
            pattern: PatternMode::Off,
            in_navigation: false,
            ref_wrap: None,
        }
    }

    pub fn with_pattern_mode(mut self, mode: PatternMode) -> Self {
        self.pattern = mode;
        self
    }

    fn dialect(&self) -> &'a SqlDialect {
        self.gen.dialect
    }

    pub fn translate_all(&mut self, exprs: &[RexNode]) -> Result<Vec<SqlExpr>, SqlGenError> {
        exprs.iter().map(|e| self.translate(e)).collect()
    }

    pub fn translate(&mut self, rex: &RexNode) -> Result<SqlExpr, SqlGenError> {
        match rex {
            RexNode::InputRef(index) => self.input_ref(*index),
            RexNode::Literal(literal) => literal_to_sql(literal, self.dialect()),
            RexNode::Call { op, operands } => self.call(op, operands),
            RexNode::CorrelVariable { id, field } => {
                let binding = self.gen.context.resolve_correlation(*id)?;
                binding
                    .columns
                    .get(*field)
                    .cloned()
                    .ok_or(SqlGenError::InputRefOutOfRange {
                        index: *field,
                        width: binding.columns.len(),
                        node_type: "Correlate",
                    })
            }
            RexNode::Subquery { kind, plan } => {
                let query = Box::new(self.gen.subquery(plan)?);
                match kind {
                    SubqueryKind::Exists => Ok(SqlExpr::Exists(query)),
                    SubqueryKind::Scalar => Ok(SqlExpr::Subquery(query)),
                    SubqueryKind::In(needles) => {
                        let mut needles = self.translate_all(needles)?;
                        let expr = if needles.len() == 1 {
                            needles.remove(0)
                        } else {
                            SqlExpr::Row(needles)
                        };
                        Ok(SqlExpr::InSubquery {
                            expr: Box::new(expr),
                            query,
                            negated: false,
                        })
                    }
                }
            }
            RexNode::PatternFieldRef { var, index } => self.pattern_ref(var, *index),
        }
    }

    fn input_ref(&self, index: usize) -> Result<SqlExpr, SqlGenError> {
        self.input
            .get(index)
            .cloned()
            .ok_or(SqlGenError::InputRefOutOfRange {
                index,
                width: self.input.len(),
                node_type: self.node_type,
            })
    }

    fn pattern_ref(&mut self, var: &str, index: usize) -> Result<SqlExpr, SqlGenError> {
        if self.pattern == PatternMode::Off {
            return Err(SqlGenError::UnsupportedPlan {
                message: format!("pattern reference {}.${} outside MATCH_RECOGNIZE", var, index),
                node_type: self.node_type,
            });
        }
        let column = self
            .names
            .get(index)
            .ok_or(SqlGenError::InputRefOutOfRange {
                index,
                width: self.names.len(),
                node_type: self.node_type,
            })?;
        let reference = SqlExpr::Identifier(vec![var.to_string(), column.clone()]);
        if let Some((name, offset)) = &self.ref_wrap {
            return Ok(SqlExpr::func(*name, vec![reference, offset.clone()]));
        }
        if self.pattern == PatternMode::Define && !self.in_navigation {
            return Ok(SqlExpr::func("PREV", vec![reference, SqlExpr::raw("0")]));
        }
        Ok(reference)
    }

    fn call(&mut self, op: &Operator, operands: &[RexNode]) -> Result<SqlExpr, SqlGenError> {
        match op {
            Operator::And => self.junction(Operator::And, BinaryOp::And, operands),
            Operator::Or => self.junction(Operator::Or, BinaryOp::Or, operands),
            Operator::Eq => self.binary(BinaryOp::Eq, operands),
            Operator::NotEq => self.binary(BinaryOp::NotEq, operands),
            Operator::Lt => self.binary(BinaryOp::Lt, operands),
            Operator::LtEq => self.binary(BinaryOp::LtEq, operands),
            Operator::Gt => self.binary(BinaryOp::Gt, operands),
            Operator::GtEq => self.binary(BinaryOp::GtEq, operands),
            Operator::Plus => self.binary(BinaryOp::Plus, operands),
            Operator::Minus => self.binary(BinaryOp::Minus, operands),
            Operator::Times => self.binary(BinaryOp::Multiply, operands),
            Operator::Divide => self.binary(BinaryOp::Divide, operands),
            Operator::Like => self.binary(BinaryOp::Like, operands),
            Operator::NotLike => self.binary(BinaryOp::NotLike, operands),
            Operator::Not => Ok(SqlExpr::Unary {
                op: UnaryOp::Not,
                expr: Box::new(self.single(op, operands)?),
            }),
            Operator::UnaryMinus => Ok(SqlExpr::Unary {
                op: UnaryOp::Minus,
                expr: Box::new(self.single(op, operands)?),
            }),
            Operator::IsNull => Ok(SqlExpr::Postfix {
                op: PostfixOp::IsNull,
                expr: Box::new(self.single(op, operands)?),
            }),
            Operator::IsNotNull => Ok(SqlExpr::Postfix {
                op: PostfixOp::IsNotNull,
                expr: Box::new(self.single(op, operands)?),
            }),
            Operator::In | Operator::NotIn => self.in_list(*op == Operator::NotIn, operands),
            Operator::Row => Ok(SqlExpr::Row(self.translate_all(operands)?)),
            Operator::Case => self.case(operands),
            Operator::Cast(ty) => {
                let expr = self.single(op, operands)?;
                let target = self.dialect().cast_target(*ty)?;
                Ok(SqlExpr::KeywordCall {
                    name: "CAST".to_string(),
                    prefix: None,
                    first: Box::new(expr),
                    rest: vec![("AS".to_string(), SqlExpr::raw(target))],
                })
            }
            Operator::Mod => {
                let args = self.translate_all(operands)?;
                self.mapped("MOD", args, |args| SqlExpr::func("MOD", args))
            }
            Operator::Floor | Operator::Ceil => {
                let name = if *op == Operator::Floor { "FLOOR" } else { "CEIL" };
                let args = self.translate_all(operands)?;
                self.mapped(name, args, |mut args| {
                    if args.len() == 2 {
                        let unit = args.remove(1);
                        let x = args.remove(0);
                        SqlExpr::KeywordCall {
                            name: name.to_string(),
                            prefix: None,
                            first: Box::new(x),
                            rest: vec![("TO".to_string(), unit)],
                        }
                    } else {
                        SqlExpr::func(name, args)
                    }
                })
            }
            Operator::Substring => {
                let args = self.translate_all(operands)?;
                self.mapped("SUBSTRING", args, |args| {
                    let mut it = args.into_iter();
                    let first = it.next().unwrap_or(SqlExpr::raw("NULL"));
                    let rest = ["FROM", "FOR"]
                        .iter()
                        .zip(it)
                        .map(|(k, a)| (k.to_string(), a))
                        .collect();
                    SqlExpr::KeywordCall {
                        name: "SUBSTRING".to_string(),
                        prefix: None,
                        first: Box::new(first),
                        rest,
                    }
                })
            }
            Operator::Position => {
                let args = self.translate_all(operands)?;
                if args.len() != 2 {
                    return Err(self.arity(op, 2, args.len()));
                }
                self.mapped("POSITION", args, |mut args| {
                    let haystack = args.remove(1);
                    let needle = args.remove(0);
                    SqlExpr::KeywordCall {
                        name: "POSITION".to_string(),
                        prefix: None,
                        first: Box::new(needle),
                        rest: vec![("IN".to_string(), haystack)],
                    }
                })
            }
            Operator::Trim(flag) => {
                let [chars, x] = operands else {
                    return Err(self.arity(op, 2, operands.len()));
                };
                let args = vec![
                    SqlExpr::raw(flag.as_str()),
                    self.translate(chars)?,
                    self.translate(x)?,
                ];
                self.mapped("TRIM", args, |mut args| {
                    let x = args.remove(2);
                    let chars = args.remove(1);
                    SqlExpr::KeywordCall {
                        name: "TRIM".to_string(),
                        prefix: Some(flag.as_str().to_string()),
                        first: Box::new(chars),
                        rest: vec![("FROM".to_string(), x)],
                    }
                })
            }
            Operator::Extract => {
                let args = self.translate_all(operands)?;
                if args.len() != 2 {
                    return Err(self.arity(op, 2, args.len()));
                }
                self.mapped("EXTRACT", args, |mut args| {
                    let x = args.remove(1);
                    let unit = args.remove(0);
                    SqlExpr::KeywordCall {
                        name: "EXTRACT".to_string(),
                        prefix: None,
                        first: Box::new(unit),
                        rest: vec![("FROM".to_string(), x)],
                    }
                })
            }
            Operator::Coalesce => {
                let args = self.translate_all(operands)?;
                self.mapped("COALESCE", args, |args| SqlExpr::func("COALESCE", args))
            }
            Operator::DatetimePlus | Operator::DatetimeMinus => {
                self.datetime_arithmetic(*op == Operator::DatetimeMinus, operands)
            }
            Operator::Function(name) => {
                let args = self.translate_all(operands)?;
                let upper = name.to_uppercase();
                self.mapped(&upper.clone(), args, move |args| SqlExpr::func(upper, args))
            }
            Operator::Prev | Operator::Next | Operator::First | Operator::Last => {
                self.navigation(op, operands)
            }
            Operator::Classifier => {
                self.require_pattern(op)?;
                Ok(SqlExpr::raw("CLASSIFIER()"))
            }
            Operator::MatchNumber => {
                self.require_pattern(op)?;
                Ok(SqlExpr::raw("MATCH_NUMBER ()"))
            }
            Operator::Running | Operator::Final => {
                self.require_pattern(op)?;
                let keyword = if *op == Operator::Running {
                    "RUNNING"
                } else {
                    "FINAL"
                };
                Ok(SqlExpr::Prefixed {
                    keyword,
                    expr: Box::new(self.single(op, operands)?),
                })
            }
        }
    }

    /// Apply the dialect's rewrite rule for `name`, or build the default shape.
    fn mapped(
        &self,
        name: &str,
        args: Vec<SqlExpr>,
        default: impl FnOnce(Vec<SqlExpr>) -> SqlExpr,
    ) -> Result<SqlExpr, SqlGenError> {
        let dialect = self.dialect();
        match dialect.functions().translate(name, &args) {
            Some(Ok(expr)) => Ok(expr),
            Some(Err(reason)) => Err(SqlGenError::unsupported_because(
                name,
                dialect.name(),
                reason,
            )),
            None => Ok(default(args)),
        }
    }

    fn single(&mut self, op: &Operator, operands: &[RexNode]) -> Result<SqlExpr, SqlGenError> {
        match operands {
            [operand] => self.translate(operand),
            _ => Err(self.arity(op, 1, operands.len())),
        }
    }

    fn binary(&mut self, op: BinaryOp, operands: &[RexNode]) -> Result<SqlExpr, SqlGenError> {
        match operands {
            [left, right] => Ok(SqlExpr::binary(
                op,
                self.translate(left)?,
                self.translate(right)?,
            )),
            _ => Err(SqlGenError::UnsupportedPlan {
                message: format!("{} expects two operands, got {}", op.as_str(), operands.len()),
                node_type: self.node_type,
            }),
        }
    }

    fn arity(&self, op: &Operator, expected: usize, got: usize) -> SqlGenError {
        SqlGenError::UnsupportedPlan {
            message: format!("{:?} expects {} operands, got {}", op, expected, got),
            node_type: self.node_type,
        }
    }

    fn require_pattern(&self, op: &Operator) -> Result<(), SqlGenError> {
        if self.pattern == PatternMode::Off {
            return Err(SqlGenError::UnsupportedPlan {
                message: format!("{:?} outside MATCH_RECOGNIZE", op),
                node_type: self.node_type,
            });
        }
        Ok(())
    }

    /// AND/OR over any number of operands, nested chains included, as a
    /// balanced tree.
    fn junction(
        &mut self,
        op: Operator,
        binary: BinaryOp,
        operands: &[RexNode],
    ) -> Result<SqlExpr, SqlGenError> {
        let leaves = flatten(&op, operands);
        let translated = leaves
            .into_iter()
            .map(|leaf| self.translate(leaf))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(balance(binary, translated).unwrap_or_else(|| {
            SqlExpr::raw(if binary == BinaryOp::And { "TRUE" } else { "FALSE" })
        }))
    }

    fn in_list(&mut self, negated: bool, operands: &[RexNode]) -> Result<SqlExpr, SqlGenError> {
        let Some((needle, values)) = operands.split_first() else {
            return Err(SqlGenError::UnsupportedPlan {
                message: "IN without operands".to_string(),
                node_type: self.node_type,
            });
        };
        let needle = self.translate(needle)?;
        let mut list = self.translate_all(values)?;
        if list.len() == 1 {
            let op = if negated { BinaryOp::NotEq } else { BinaryOp::Eq };
            return Ok(SqlExpr::binary(op, needle, list.remove(0)));
        }
        Ok(SqlExpr::InList {
            expr: Box::new(needle),
            list,
            negated,
        })
    }

    fn case(&mut self, operands: &[RexNode]) -> Result<SqlExpr, SqlGenError> {
        let mut translated = self.translate_all(operands)?;
        let else_result = if translated.len() % 2 == 1 {
            translated.pop().map(Box::new)
        } else {
            None
        };
        let mut whens = Vec::with_capacity(translated.len() / 2);
        let mut it = translated.into_iter();
        while let (Some(when), Some(then)) = (it.next(), it.next()) {
            whens.push((when, then));
        }
        if whens.is_empty() {
            return Err(SqlGenError::UnsupportedPlan {
                message: "CASE without WHEN branches".to_string(),
                node_type: self.node_type,
            });
        }
        Ok(SqlExpr::Case { whens, else_result })
    }

    fn datetime_arithmetic(
        &mut self,
        minus: bool,
        operands: &[RexNode],
    ) -> Result<SqlExpr, SqlGenError> {
        let [datetime, interval] = operands else {
            let op = if minus {
                Operator::DatetimeMinus
            } else {
                Operator::DatetimePlus
            };
            return Err(self.arity(&op, 2, operands.len()));
        };
        let dialect = self.dialect();
        let x = self.translate(datetime)?;
        if dialect.interval_style() != IntervalStyle::DateAdd {
            let op = if minus { BinaryOp::Minus } else { BinaryOp::Plus };
            return Ok(SqlExpr::binary(op, x, self.translate(interval)?));
        }

        let RexNode::Literal(Literal::Interval {
            value,
            negative,
            qualifier,
        }) = interval
        else {
            return Err(SqlGenError::unsupported_because(
                "datetime arithmetic",
                dialect.name(),
                "DATEADD needs a literal interval",
            ));
        };
        let unit = single_unit(value, qualifier, dialect)?;
        numeric_amount(value, qualifier, dialect)?;
        let sign = if *negative != minus { "-" } else { "" };
        Ok(SqlExpr::func(
            "DATEADD",
            vec![
                SqlExpr::raw(unit.as_str()),
                SqlExpr::raw(format!("{}{}", sign, value)),
                x,
            ],
        ))
    }

    /// PREV/NEXT/FIRST/LAST with their offsets made explicit.
    fn navigation(&mut self, op: &Operator, operands: &[RexNode]) -> Result<SqlExpr, SqlGenError> {
        self.require_pattern(op)?;
        let (target, offset) = match operands {
            [target] => (target, None),
            [target, offset] => (target, Some(offset)),
            _ => return Err(self.arity(op, 2, operands.len())),
        };
        let default_offset = match op {
            Operator::Prev | Operator::Next => "1",
            _ => "0",
        };
        let offset = match offset {
            Some(offset) => self.translate(offset)?,
            None => SqlExpr::raw(default_offset),
        };

        match op {
            Operator::First | Operator::Last => {
                let name = if *op == Operator::First { "FIRST" } else { "LAST" };
                let saved = self.ref_wrap.replace((name, offset));
                let result = self.translate(target);
                self.ref_wrap = saved;
                result
            }
            Operator::Prev => {
                let saved = std::mem::replace(&mut self.in_navigation, true);
                let result = self.translate(target);
                self.in_navigation = saved;
                Ok(SqlExpr::func("PREV", vec![result?, offset]))
            }
            _ => {
                let target = self.translate(target)?;
                Ok(SqlExpr::func("NEXT", vec![target, offset]))
            }
        }
    }
}

/// Operands of nested `op` calls in order, without recursion.
fn flatten<'r>(op: &Operator, operands: &'r [RexNode]) -> Vec<&'r RexNode> {
    let mut leaves = Vec::with_capacity(operands.len());
    let mut stack: Vec<&RexNode> = operands.iter().rev().collect();
    while let Some(node) = stack.pop() {
        match node {
            RexNode::Call {
                op: inner,
                operands,
            } if inner == op => stack.extend(operands.iter().rev()),
            leaf => leaves.push(leaf),
        }
    }
    leaves
}

/// Fold `items` into a tree of depth `log2(n)`, splitting at `n / 2`.
pub(crate) fn balance(op: BinaryOp, mut items: Vec<SqlExpr>) -> Option<SqlExpr> {
    match items.len() {
        0 => None,
        1 => items.pop(),
        n => {
            let right = items.split_off(n / 2);
            Some(SqlExpr::binary(op, balance(op, items)?, balance(op, right)?))
        }
    }
}
