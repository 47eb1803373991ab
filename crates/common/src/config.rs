use anyhow::{Context, Result};
use serde::Deserialize;
use validator::Validate;

// Default constants
pub const DEFAULT_PRODUCT: &str = "ansi";
pub const DEFAULT_MAX_RECURSION_DEPTH: usize = 128;
pub const DEFAULT_INDENT: &str = "    ";
pub const DEFAULT_PRETTY: bool = false;
pub const DEFAULT_REDACT_LITERALS: bool = true;

/// Null collation override, applied on top of the product's default.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NullCollationSetting {
    High,
    Low,
    First,
    Last,
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct DialectSettings {
    #[serde(default = "default_product")]
    #[validate(length(min = 1))]
    pub product: String,

    #[serde(default)]
    pub major_version: Option<u32>,

    #[serde(default)]
    pub minor_version: Option<u32>,

    #[serde(default)]
    pub null_collation: Option<NullCollationSetting>,

    /// Caps the VARCHAR/CHAR precision below the product's own maximum
    #[serde(default)]
    #[validate(range(min = 1))]
    pub max_varchar_length: Option<u32>,
}

impl Default for DialectSettings {
    fn default() -> Self {
        Self {
            product: default_product(),
            major_version: None,
            minor_version: None,
            null_collation: None,
            max_varchar_length: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct GeneratorConfig {
    #[serde(default)]
    #[validate(nested)]
    pub dialect: DialectSettings,

    #[serde(default = "default_max_recursion_depth")]
    #[validate(range(min = 1, max = 1024))]
    pub max_recursion_depth: usize,

    /// Indent derived tables instead of emitting them flush-left
    #[serde(default = "default_pretty")]
    pub pretty: bool,

    #[serde(default = "default_indent")]
    #[validate(custom(function = "validate_indent"))]
    pub indent: String,

    /// Replace string literals with '?' when logging generated SQL
    #[serde(default = "default_redact_literals")]
    pub redact_literals: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            dialect: DialectSettings::default(),
            max_recursion_depth: default_max_recursion_depth(),
            pretty: default_pretty(),
            indent: default_indent(),
            redact_literals: default_redact_literals(),
        }
    }
}

fn default_product() -> String {
    DEFAULT_PRODUCT.to_string()
}

fn default_max_recursion_depth() -> usize {
    DEFAULT_MAX_RECURSION_DEPTH
}

fn default_pretty() -> bool {
    DEFAULT_PRETTY
}

fn default_indent() -> String {
    DEFAULT_INDENT.to_string()
}

fn default_redact_literals() -> bool {
    DEFAULT_REDACT_LITERALS
}

fn validate_indent(indent: &str) -> Result<(), validator::ValidationError> {
    if indent.chars().all(|c| c == ' ' || c == '\t') {
        Ok(())
    } else {
        Err(validator::ValidationError::new("indent_not_whitespace"))
    }
}

// Config implementation
impl GeneratorConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let builder = config::Config::builder();

        let builder = if std::path::Path::new(path).exists() {
            builder.add_source(config::File::with_name(path))
        } else {
            builder
        };

        Self::build(builder)
    }

    /// Load from an inline YAML document, still honouring environment overrides.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::from_str(yaml, config::FileFormat::Yaml));
        Self::build(builder)
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self> {
        // Map RELSQL__DIALECT__PRODUCT to dialect.product, etc.
        let builder = builder.add_source(
            config::Environment::with_prefix("RELSQL")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build().context("Failed to build configuration")?;

        let generator_config: GeneratorConfig = cfg
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        generator_config
            .validate()
            .map_err(|e| anyhow::anyhow!("Configuration validation failed: {:?}", e))?;

        Ok(generator_config)
    }
}
