use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Simulation service returned HTTP {status}")]
    Status { status: u16 },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid simulation response: {reason}")]
    InvalidResponse { reason: String },

    #[error("Invalid generator configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("API base URL not configured (set API_BASE_URL)")]
    ApiNotConfigured,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SimError {
    pub fn invalid_response(reason: impl Into<String>) -> Self {
        Self::InvalidResponse { reason: reason.into() }
    }

    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig { reason: reason.into() }
    }
}

pub type SimResult<T> = Result<T, SimError>;
