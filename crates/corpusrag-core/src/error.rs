use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("{service} request failed{}: {message}", status_suffix(.status))]
    Provider {
        service: String,
        status: Option<u16>,
        message: String,
    },

    #[error("Malformed knowledge graph: {0}")]
    MalformedGraph(String),
}

impl Error {
    pub fn provider(service: impl Into<String>, status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Provider { service: service.into(), status, message: message.into() }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" with status {s}")).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, Error>;
