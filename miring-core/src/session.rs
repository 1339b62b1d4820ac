//! UI state of one validation session.
//!
//! [`Session`] owns everything the validation page displays: the input text,
//! the results text and the indicator flags. Rendering is a projection of
//! this state; nothing else holds display state.
use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};

use crate::{
    api::{ValidatorClient, ValidatorError},
    diagnostic::failure_message,
    document::{DocumentError, InputDocument, SchemaVersion},
    download::Download,
    report::{IndicatorSet, ValidationReport, VerdictState, compute_verdict_state},
    summary::{ReportSummary, summarize},
};

/// Errors surfaced to the user by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Document(#[from] DocumentError),
    /// The results text holds a diagnostic for this failure.
    #[error("Error.  Something wrong happened: Check in results text area")]
    Submission(#[source] ValidatorError),
    #[error(transparent)]
    Fetch(#[from] ValidatorError),
}

#[derive(Debug, Default)]
pub struct Session {
    input: Option<InputDocument>,
    results: String,
    report: Option<ValidationReport>,
    verdict: Option<VerdictState>,
    indicators: IndicatorSet,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input_text(&self) -> &str {
        self.input.as_ref().map_or("", InputDocument::text)
    }

    pub fn input(&self) -> Option<&InputDocument> {
        self.input.as_ref()
    }

    /// Last report text, or the diagnostic of a failed submission.
    pub fn results_text(&self) -> &str {
        &self.results
    }

    pub fn report(&self) -> Option<&ValidationReport> {
        self.report.as_ref()
    }

    pub fn verdict(&self) -> Option<&VerdictState> {
        self.verdict.as_ref()
    }

    pub fn indicators(&self) -> IndicatorSet {
        self.indicators
    }

    pub fn summary(&self) -> Option<ReportSummary> {
        self.report.as_ref().map(summarize)
    }

    /// Replace the input with typed or pasted text.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = Some(InputDocument::manual(text));
    }

    /// Replace the input with the contents of a file.
    ///
    /// # Errors
    /// Returns [`SessionError::Document`] if the file cannot be read; the
    /// previous input is kept.
    pub fn load_file(&mut self, path: &Path) -> Result<(), SessionError> {
        let document = InputDocument::from_file(path).inspect_err(|e| {
            warn!(error = %e, "failed to load file");
        })?;
        self.input = Some(document);
        Ok(())
    }

    /// Replace the input with the sample document from the server.
    ///
    /// # Errors
    /// Returns [`SessionError::Fetch`] unless the sample is served with status 200.
    pub async fn load_sample(&mut self, client: &ValidatorClient) -> Result<(), SessionError> {
        let document = client.fetch_sample().await?;
        self.input = Some(document);
        Ok(())
    }

    /// Submit the current input and display the verdicts.
    ///
    /// A missing or zero `version` fails before any request is made. When the
    /// validator fails, the session is cleared and the results text replaced
    /// by a diagnostic naming `contact` from the client configuration.
    ///
    /// # Errors
    /// Returns [`SessionError::Document`] for a missing version and
    /// [`SessionError::Submission`] when the validator cannot be reached or fails.
    pub async fn submit(
        &mut self,
        client: &ValidatorClient,
        version: Option<&str>,
    ) -> Result<&VerdictState, SessionError> {
        let version = SchemaVersion::require(version).inspect_err(|_| {
            warn!("submission refused, no version selected");
        })?;
        let document = self
            .input
            .clone()
            .unwrap_or_else(|| InputDocument::manual(""));

        match client.submit(&document, &version).await {
            Ok(report) => Ok(self.show_report(report)),
            Err(e) => {
                warn!(error = %e, "submission failed");
                self.clear_text();
                self.results = failure_message(client.config().contact(), e.body());
                Err(SessionError::Submission(e))
            }
        }
    }

    /// Read a file and submit it.
    ///
    /// # Errors
    /// See [`Session::load_file`] and [`Session::submit`].
    pub async fn validate_file(
        &mut self,
        client: &ValidatorClient,
        path: &Path,
        version: Option<&str>,
    ) -> Result<&VerdictState, SessionError> {
        self.load_file(path)?;
        self.submit(client, version).await
    }

    /// Fetch the sample document and submit it.
    ///
    /// # Errors
    /// See [`Session::load_sample`] and [`Session::submit`].
    pub async fn validate_sample(
        &mut self,
        client: &ValidatorClient,
        version: Option<&str>,
    ) -> Result<&VerdictState, SessionError> {
        self.load_sample(client).await?;
        self.submit(client, version).await
    }

    /// Display `report`, replacing whatever was shown before.
    pub fn show_report(&mut self, report: ValidationReport) -> &VerdictState {
        let verdict = compute_verdict_state(&report);
        info!(
            miring = verdict.miring().as_token(),
            hml = verdict.hml().as_token(),
            "verdict"
        );
        self.results = report.text().to_string();
        self.indicators = verdict.indicators();
        self.report = Some(report);
        self.verdict.insert(verdict)
    }

    /// Empty the input and results and hide every indicator.
    pub fn clear_text(&mut self) {
        self.input = None;
        self.results.clear();
        self.report = None;
        self.verdict = None;
        self.indicators = IndicatorSet::hidden();
    }

    /// Current results text as a `MiringResultsReport.xml` download.
    pub fn download_results(&self) -> Download {
        Download::new(self.results.clone())
    }
}
