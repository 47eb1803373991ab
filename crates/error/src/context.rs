//! # Error Contexts
//!
//! Structured metadata attached to errors for programmatic handling.

use serde::{Deserialize, Serialize};

/// Structured context for errors.
///
/// Each variant provides specific fields relevant to that error type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ErrorContext {
    /// Context for RELSQL-2001/2002/2003 (unsupported by dialect)
    UnsupportedConstruct {
        construct: String,
        dialect: String,
        reason: Option<String>,
    },

    /// Context for RELSQL-5001 (UnresolvedCorrelation)
    Correlation {
        correlation_id: String,
        /// Correlation ids bound at the failure point
        visible: Vec<String>,
    },

    /// Context for RELSQL-5002 (MalformedGroupingSets)
    GroupingSets {
        group_key: Vec<usize>,
        offending_set: Vec<usize>,
    },

    /// Context for RELSQL-3001/3002 (config errors)
    Config {
        file_path: Option<String>,
        field: Option<String>,
    },

    /// Generic key-value context for extensibility
    Generic {
        #[serde(flatten)]
        data: std::collections::HashMap<String, serde_json::Value>,
    },
}
