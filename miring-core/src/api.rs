//! HTTP client for the validator service and its static resources.
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    config::{Config, PayloadFormat, RULES_PATH, SAMPLE_PATH, VALIDATOR_PATH},
    document::{InputDocument, InputSource, SchemaVersion},
    report::ValidationReport,
};

/// Errors returned by the validator client.
#[derive(Error, Debug)]
pub enum ValidatorError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Validator answered with status {status}")]
    Server { status: StatusCode, body: String },
    #[error("Problem getting {resource} from the server (status {status})")]
    ResourceUnavailable {
        resource: &'static str,
        status: StatusCode,
    },
}

impl ValidatorError {
    /// Body text worth showing to the user, if the server sent one.
    pub fn body(&self) -> &str {
        match self {
            ValidatorError::Server { body, .. } => body.as_str(),
            ValidatorError::Network(_) | ValidatorError::ResourceUnavailable { .. } => "",
        }
    }
}

/// Validator API client.
///
/// No request timeout is configured; a hung validator keeps the caller
/// waiting.
///
/// # Examples
/// ```rust,no_run
/// use miring_core::api::{ValidatorClient, ValidatorError};
/// use miring_core::config::Config;
///
/// let client = ValidatorClient::new(Config::from_env())?;
/// # let _ = client;
/// # Ok::<(), ValidatorError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ValidatorClient {
    config: Config,
    client: Client,
}

impl ValidatorClient {
    /// # Errors
    /// Returns [`ValidatorError::Network`] if the HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self, ValidatorError> {
        let client = Client::builder().build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Submit a document for MIRING validation.
    ///
    /// Success statuses yield the percent-decoded report. Anything else is a
    /// [`ValidatorError::Server`] carrying the raw body.
    ///
    /// # Errors
    /// Returns [`ValidatorError`] for transport failures and non-success statuses.
    pub async fn submit(
        &self,
        document: &InputDocument,
        version: &SchemaVersion,
    ) -> Result<ValidationReport, ValidatorError> {
        let url = self.config.endpoint(VALIDATOR_PATH);
        let form = form_fields(self.config.payload_format(), document.text(), version.as_str());
        debug!(
            %url,
            source = %document.source(),
            version = %version,
            format = self.config.payload_format().as_str(),
            length = document.text().len(),
            "submitting document"
        );

        let response = self.client.post(url).form(&form).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "validator rejected submission");
            return Err(ValidatorError::Server { status, body });
        }
        let body = response.text().await?;
        debug!(%status, length = body.len(), "received report");
        Ok(ValidationReport::from_response_body(&body))
    }

    /// Fetch the bundled sample HML document.
    ///
    /// # Errors
    /// Returns [`ValidatorError`] unless the server answers 200.
    pub async fn fetch_sample(&self) -> Result<InputDocument, ValidatorError> {
        let text = self.fetch_resource(SAMPLE_PATH, "hml_1_0_1_example_miring.xml").await?;
        Ok(InputDocument::new(text, InputSource::Sample))
    }

    /// Fetch the rules CSV.
    ///
    /// # Errors
    /// Returns [`ValidatorError`] unless the server answers 200.
    pub async fn fetch_rules(&self) -> Result<String, ValidatorError> {
        self.fetch_resource(RULES_PATH, "Rules.csv").await
    }
}

// Private API
impl ValidatorClient {
    async fn fetch_resource(
        &self,
        path: &str,
        resource: &'static str,
    ) -> Result<String, ValidatorError> {
        let url = self.config.endpoint(path);
        debug!(%url, "fetching resource");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            warn!(%status, resource, "resource unavailable");
            return Err(ValidatorError::ResourceUnavailable { resource, status });
        }
        Ok(response.text().await?)
    }
}

fn form_fields<'a>(
    format: PayloadFormat,
    document: &'a str,
    version: &'a str,
) -> Vec<(&'static str, &'a str)> {
    match format {
        PayloadFormat::Versioned => vec![("xml[]", document), ("xml[]", version)],
        PayloadFormat::DocumentOnly => vec![("xml", document)],
    }
}
