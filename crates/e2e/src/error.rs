//! Error types for polling helpers

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PollError {
    /// The condition never held within the wait budget.
    #[error("After {} seconds, {}", .timeout.as_secs_f64(), .reason)]
    Timeout {
        timeout: Duration,
        elapsed: Duration,
        attempts: usize,
        reason: String,
    },

    /// The predicate observed a state that retrying cannot fix.
    #[error("{0}")]
    Unrecoverable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Page error: {0}")]
    Page(#[from] PageError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl PollError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, PollError::Timeout { .. })
    }

    pub fn is_unrecoverable(&self) -> bool {
        matches!(self, PollError::Unrecoverable(_))
    }
}

/// Errors raised by a [`Page`](crate::page::Page) implementation
#[derive(Error, Debug)]
pub enum PageError {
    /// The assertion did not hold. Pollers treat this as "not yet".
    #[error("Expectation not met: {0}")]
    NotMet(String),

    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Browser driver error: {0}")]
    Driver(String),
}

pub type PollResult<T> = Result<T, PollError>;
