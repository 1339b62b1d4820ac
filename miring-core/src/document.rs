//! Input documents and schema version selection.
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while acquiring input or selecting a version.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Please select a version number")]
    VersionRequired,
    #[error("Failed to load file {path}: {source}")]
    FileLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where the current input text came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    File(PathBuf),
    Sample,
    Manual,
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::File(path) => write!(f, "file {}", path.display()),
            InputSource::Sample => f.write_str("sample"),
            InputSource::Manual => f.write_str("manual entry"),
        }
    }
}

/// Raw HML text to be submitted, never parsed on the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDocument {
    text: String,
    source: InputSource,
}

impl InputDocument {
    pub fn new(text: impl Into<String>, source: InputSource) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }

    pub fn manual(text: impl Into<String>) -> Self {
        Self::new(text, InputSource::Manual)
    }

    /// Read a whole file as text.
    ///
    /// # Errors
    /// Returns [`DocumentError::FileLoad`] if the file is missing, unreadable or not UTF-8.
    pub fn from_file(path: &Path) -> Result<Self, DocumentError> {
        let text = std::fs::read_to_string(path).map_err(|source| DocumentError::FileLoad {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(text, InputSource::File(path.to_path_buf())))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> &InputSource {
        &self.source
    }

}

/// Schema version chosen by the user.
///
/// `"0"` is the placeholder of an unselected version picker and is refused,
/// along with any other spelling of numeric zero and empty or blank values.
///
/// # Examples
/// ```rust
/// use miring_core::document::SchemaVersion;
///
/// assert!(SchemaVersion::new("1.0.1").is_ok());
/// assert!(SchemaVersion::new("0").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaVersion(String);

impl SchemaVersion {
    /// # Errors
    /// Returns [`DocumentError::VersionRequired`] for empty, blank or zero selections.
    pub fn new(value: impl Into<String>) -> Result<Self, DocumentError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.parse::<f64>().is_ok_and(|v| v == 0.0) {
            return Err(DocumentError::VersionRequired);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Validate an optional selection, as handed over by a form or a CLI flag.
    pub fn require(value: Option<&str>) -> Result<Self, DocumentError> {
        value.map_or(Err(DocumentError::VersionRequired), Self::new)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for SchemaVersion {
    type Err = DocumentError;
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::new(value)
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
