use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric error codes following RELSQL-XXXX format.
///
/// ## Code Ranges
/// - **2000-2999**: Unsupported by the target dialect
/// - **3000-3999**: Configuration errors
/// - **5000-5999**: Programming/Internal errors
///
/// Codes are stable across versions (semver contract).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
#[non_exhaustive]
pub enum ErrorCode {
    // === Unsupported (2000-2999) ===
    /// RELSQL-2001: Scalar or relational construct has no syntax in the dialect
    UnsupportedConstruct = 2001,
    /// RELSQL-2002: Plan shape cannot be rendered
    UnsupportedPlan = 2002,
    /// RELSQL-2003: Type has no cast target in the dialect
    UnsupportedType = 2003,

    // === Configuration Errors (3000-3999) ===
    /// RELSQL-3001: Config file could not be read or parsed
    InvalidConfigFile = 3001,
    /// RELSQL-3002: Config validation failed
    SchemaViolation = 3002,

    // === Programming/Internal Errors (5000-5999) ===
    /// RELSQL-5001: Correlation variable has no enclosing binding
    UnresolvedCorrelation = 5001,
    /// RELSQL-5002: Grouping sets are not subsets of the group key
    MalformedGroupingSets = 5002,
    /// RELSQL-5003: Unexpected internal state
    InternalInvariant = 5003,
    /// RELSQL-5004: Plan nesting exceeds the configured depth
    RecursionLimit = 5004,
    /// RELSQL-5005: Serialization/deserialization failed
    SerializationFailed = 5005,

    /// RELSQL-9999: Unknown/unclassified error
    Unknown = 9999,
}

impl ErrorCode {
    /// Get the numeric code value
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Get the formatted code string (e.g., "RELSQL-2001")
    pub fn as_str(&self) -> String {
        format!("RELSQL-{:04}", self.as_u16())
    }

    /// Get the error category
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnresolvedCorrelation | Self::MalformedGroupingSets => {
                ErrorCategory::Programming
            }
            _ => match self.as_u16() {
                2000..=2999 => ErrorCategory::Unsupported,
                3000..=3999 => ErrorCategory::Config,
                _ => ErrorCategory::Internal,
            },
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<ErrorCode> for String {
    fn from(code: ErrorCode) -> String {
        code.as_str()
    }
}

impl TryFrom<String> for ErrorCode {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        // Parse "RELSQL-XXXX" format
        let num: u16 = s
            .strip_prefix("RELSQL-")
            .and_then(|n| n.parse().ok())
            .ok_or_else(|| "Invalid format".to_string())?;
        Self::try_from(num).map_err(|_| "Unknown code".to_string())
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = String;

    fn try_from(n: u16) -> std::result::Result<Self, Self::Error> {
        match n {
            2001 => Ok(Self::UnsupportedConstruct),
            2002 => Ok(Self::UnsupportedPlan),
            2003 => Ok(Self::UnsupportedType),
            3001 => Ok(Self::InvalidConfigFile),
            3002 => Ok(Self::SchemaViolation),
            5001 => Ok(Self::UnresolvedCorrelation),
            5002 => Ok(Self::MalformedGroupingSets),
            5003 => Ok(Self::InternalInvariant),
            5004 => Ok(Self::RecursionLimit),
            5005 => Ok(Self::SerializationFailed),
            9999 => Ok(Self::Unknown),
            _ => Err(format!("Unknown error code: {}", n)),
        }
    }
}

/// High-level error category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ErrorCategory {
    /// The dialect cannot express the construct; not retried
    Unsupported,
    /// Defect in the plan producer; fatal
    Programming,
    Config,
    Internal,
}
