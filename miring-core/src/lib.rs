//! Client toolkit for the MIRING HML validation service (submission, verdicts, reports).
//!
//! # Examples
//! ```rust,no_run
//! use miring_core::{api::ValidatorClient, config::Config, session::Session};
//!
//! # async fn run() -> Result<(), miring_core::Error> {
//! let client = ValidatorClient::new(Config::from_env())?;
//! let mut session = Session::new();
//! session.set_input("<hml xmlns=\"http://schemas.nmdp.org/spec/hml/1.0.1\"/>");
//! let verdict = session.submit(&client, Some("1.0.1")).await?;
//! println!("{:?}", verdict.indicators().visible());
//! # Ok(())
//! # }
//! ```
pub mod api;
pub mod config;
pub mod diagnostic;
pub mod document;
pub mod download;
pub mod report;
pub mod rules;
pub mod session;
pub mod summary;

use thiserror::Error;

/// Top-level error wrapper for core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Document(#[from] document::DocumentError),
    #[error(transparent)]
    Validator(#[from] api::ValidatorError),
    #[error(transparent)]
    Session(#[from] session::SessionError),
    #[error(transparent)]
    PayloadFormat(#[from] config::PayloadFormatParseError),
}
