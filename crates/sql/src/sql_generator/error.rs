use relsql_error::{ErrorCode, ErrorContext, RelSqlError};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SqlGenError {
    #[error("Unsupported construct for {dialect}: {construct}{}", fmt_reason(.reason))]
    UnsupportedConstruct {
        construct: String,
        dialect: String,
        reason: Option<String>,
    },

    #[error("Unsupported plan: {message} (node: {node_type})")]
    UnsupportedPlan {
        message: String,
        node_type: &'static str,
    },

    #[error("Unresolved correlation variable $cor{id}; bound: {visible:?}")]
    UnresolvedCorrelation { id: u32, visible: Vec<u32> },

    #[error("Grouping set {offending_set:?} is not a subset of group key {group_key:?}")]
    MalformedGroupingSets {
        group_key: Vec<usize>,
        offending_set: Vec<usize>,
    },

    #[error("Input reference ${index} out of range for {node_type} with {width} fields")]
    InputRefOutOfRange {
        index: usize,
        width: usize,
        node_type: &'static str,
    },

    #[error("Mismatched quotes: {0}")]
    MismatchedQuotes(String),

    #[error("Maximum recursion depth ({0}) exceeded")]
    MaxRecursion(usize),
}

fn fmt_reason(reason: &Option<String>) -> String {
    reason
        .as_ref()
        .map(|r| format!(" ({})", r))
        .unwrap_or_default()
}

impl SqlGenError {
    pub fn unsupported(construct: impl Into<String>, dialect: &str) -> Self {
        SqlGenError::UnsupportedConstruct {
            construct: construct.into(),
            dialect: dialect.to_string(),
            reason: None,
        }
    }

    pub fn unsupported_because(
        construct: impl Into<String>,
        dialect: &str,
        reason: impl Into<String>,
    ) -> Self {
        SqlGenError::UnsupportedConstruct {
            construct: construct.into(),
            dialect: dialect.to_string(),
            reason: Some(reason.into()),
        }
    }

    /// Failures caused by a defective plan rather than a dialect limitation.
    pub fn is_programming_error(&self) -> bool {
        matches!(
            self,
            SqlGenError::UnresolvedCorrelation { .. }
                | SqlGenError::MalformedGroupingSets { .. }
                | SqlGenError::InputRefOutOfRange { .. }
        )
    }

    pub fn to_relsql_error(self, dialect_name: &str) -> RelSqlError {
        match self {
            SqlGenError::UnsupportedConstruct {
                construct,
                dialect,
                reason,
            } => RelSqlError::new(
                ErrorCode::UnsupportedConstruct,
                format!("'{}' cannot be expressed in {}", construct, dialect),
            )
            .with_context(ErrorContext::UnsupportedConstruct {
                construct,
                dialect,
                reason,
            })
            .with_hint("Rewrite the plan to avoid this construct or choose another dialect"),
            SqlGenError::UnsupportedPlan { message, node_type } => {
                let mut data = HashMap::new();
                data.insert(
                    "node_type".to_string(),
                    serde_json::Value::String(node_type.to_string()),
                );
                data.insert(
                    "dialect".to_string(),
                    serde_json::Value::String(dialect_name.to_string()),
                );

                RelSqlError::new(
                    ErrorCode::UnsupportedPlan,
                    format!(
                        "Plan node '{}' cannot be rendered for {}: {}",
                        node_type, dialect_name, message
                    ),
                )
                .with_context(ErrorContext::Generic { data })
            }
            SqlGenError::UnresolvedCorrelation { id, visible } => RelSqlError::new(
                ErrorCode::UnresolvedCorrelation,
                format!("Correlation variable $cor{} has no enclosing binding", id),
            )
            .with_context(ErrorContext::Correlation {
                correlation_id: format!("$cor{}", id),
                visible: visible.iter().map(|v| format!("$cor{}", v)).collect(),
            })
            .with_hint("The plan producer referenced a correlation id outside its Correlate or Filter"),
            SqlGenError::MalformedGroupingSets {
                group_key,
                offending_set,
            } => RelSqlError::new(
                ErrorCode::MalformedGroupingSets,
                format!(
                    "Grouping set {:?} is not a subset of group key {:?}",
                    offending_set, group_key
                ),
            )
            .with_context(ErrorContext::GroupingSets {
                group_key,
                offending_set,
            }),
            SqlGenError::InputRefOutOfRange {
                index,
                width,
                node_type,
            } => {
                let mut data = HashMap::new();
                data.insert("index".to_string(), serde_json::json!(index));
                data.insert("width".to_string(), serde_json::json!(width));
                data.insert(
                    "node_type".to_string(),
                    serde_json::Value::String(node_type.to_string()),
                );

                RelSqlError::new(
                    ErrorCode::InternalInvariant,
                    format!(
                        "Input reference ${} out of range for {} with {} fields",
                        index, node_type, width
                    ),
                )
                .with_context(ErrorContext::Generic { data })
                .with_hint("This usually indicates a malformed plan")
            }
            SqlGenError::MismatchedQuotes(detail) => RelSqlError::new(
                ErrorCode::InternalInvariant,
                format!("Mismatched quotes in SQL writer: {}", detail),
            ),
            SqlGenError::MaxRecursion(depth) => RelSqlError::new(
                ErrorCode::RecursionLimit,
                format!("Maximum recursion depth ({}) exceeded", depth),
            )
            .with_hint("Raise max_recursion_depth or flatten the plan"),
        }
    }
}
