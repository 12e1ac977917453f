use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdError {
    #[error("not initialized: run 'idforge init'")]
    NotInitialized,

    #[error("persona not found: {0}")]
    PersonaNotFound(String),

    #[error("persona already exists: {0}")]
    PersonaExists(String),

    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("session already exists: {0}")]
    SessionExists(String),

    #[error("activity not found: {0}")]
    ActivityNotFound(String),

    #[error("invalid slug '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidSlug(String),

    #[error("invalid step: {0}")]
    InvalidStep(String),

    #[error("invalid modality '{0}': expected onsite, virtual, or hybrid")]
    InvalidModality(String),

    #[error("invalid 4C phase: {0}")]
    InvalidPhase(String),

    #[error("invalid transition from {from} to {to}: {reason}")]
    InvalidTransition {
        from: String,
        to: String,
        reason: String,
    },

    #[error("missing field '{field}' required to {action}")]
    MissingField { field: String, action: String },

    #[error("API key not found: set {0}")]
    MissingApiKey(String),

    #[error("AI request failed: {0}")]
    Ai(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, IdError>;
