use thiserror::Error;

/// Why an upstream interpretation could not be used. Never leaves
/// [`crate::Interpreter::interpret`]; every variant ends in the fallback text.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("missing API key (set {0})")]
    MissingCredentials(String),
    #[error("no interpretation provider configured")]
    NoProvider,
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("upstream returned no content")]
    EmptyContent,
    #[error("malformed interpretation: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for OracleError {
    fn from(err: serde_json::Error) -> Self {
        OracleError::Malformed(err.to_string())
    }
}
