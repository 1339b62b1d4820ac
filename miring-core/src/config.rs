//! Configuration and payload format selection.
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Environment variable that overrides the validator origin.
pub const BASE_URL_ENV: &str = "MIRING_VALIDATOR_BASE_URL";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/miring-validator/";
pub const DEFAULT_CONTACT: &str = "bioinformatics-web@nmdp.org";

pub const VALIDATOR_PATH: &str = "validator/ValidateMiring/";
pub const SAMPLE_PATH: &str = "hml/hml_1_0_1_example_miring.xml";
pub const RULES_PATH: &str = "rules/Rules.csv";

/// How the document and schema version are laid out in the form body.
/// - Versioned: `xml[]=<document>&xml[]=<version>`, the form encoding of a
///   `[document, version]` pair.
/// - DocumentOnly: `xml=<document>`, as accepted by validators that predate
///   schema versions.
///
/// # Examples
/// ```rust
/// use std::str::FromStr;
/// use miring_core::config::PayloadFormat;
///
/// let format = PayloadFormat::from_str("document-only")?;
/// assert_eq!(format, PayloadFormat::DocumentOnly);
/// # Ok::<(), miring_core::config::PayloadFormatParseError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PayloadFormat {
    #[default]
    Versioned,
    DocumentOnly,
}

/// Error returned when parsing a [`PayloadFormat`] from a string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadFormatParseError {
    #[error("invalid payload format: {input}")]
    Invalid { input: String },
}

impl FromStr for PayloadFormat {
    type Err = PayloadFormatParseError;
    fn from_str(format: &str) -> Result<PayloadFormat, PayloadFormatParseError> {
        match format.to_ascii_lowercase().as_str() {
            "versioned" => Ok(PayloadFormat::Versioned),
            "document-only" | "document_only" => Ok(PayloadFormat::DocumentOnly),
            _ => Err(PayloadFormatParseError::Invalid {
                input: format.to_string(),
            }),
        }
    }
}

impl PayloadFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayloadFormat::Versioned => "versioned",
            PayloadFormat::DocumentOnly => "document-only",
        }
    }
}

/// Configuration for the validator client.
///
/// The origin always ends with `/` so resource paths can be appended directly.
///
/// # Examples
/// ```rust
/// use miring_core::config::Config;
///
/// let config = Config::new("http://validator.example.org/miring");
/// assert_eq!(config.base_url(), "http://validator.example.org/miring/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    base_url: String,
    contact: String,
    payload_format: PayloadFormat,
}

impl Config {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            contact: DEFAULT_CONTACT.to_string(),
            payload_format: PayloadFormat::default(),
        }
    }

    /// Default configuration with the origin taken from [`BASE_URL_ENV`] when set.
    pub fn from_env() -> Self {
        match std::env::var(BASE_URL_ENV) {
            Ok(value) if !value.trim().is_empty() => Self::new(value),
            _ => Self::default(),
        }
    }

    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = contact.into();
        self
    }

    pub fn with_payload_format(mut self, payload_format: PayloadFormat) -> Self {
        self.payload_format = payload_format;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn contact(&self) -> &str {
        &self.contact
    }

    pub fn payload_format(&self) -> PayloadFormat {
        self.payload_format
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new(DEFAULT_BASE_URL)
    }
}

fn normalize_base_url(value: String) -> String {
    if value.ends_with('/') {
        value
    } else {
        format!("{value}/")
    }
}
