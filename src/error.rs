//! Error types shared by the calculator and the suggestion client

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Invalid plan: {field} {reason}")]
    InvalidPlan { field: &'static str, reason: String },

    #[error("Invalid wizard step: {0}")]
    InvalidStep(String),

    #[error("No numeric suggestion found in response")]
    NoSuggestion,

    #[error("Suggestion endpoint returned {status}")]
    Endpoint { status: u16 },

    #[error("Suggestion stream error: {0}")]
    Stream(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl PlannerError {
    pub fn invalid_plan(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidPlan { field, reason: reason.into() }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;
