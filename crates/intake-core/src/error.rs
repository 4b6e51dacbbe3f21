use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("unknown field '{0}': expected one of title, category, description, location, budget, timeline")]
    UnknownField(String),

    #[error("unknown media kind: {0}")]
    UnknownMediaKind(String),

    #[error("unknown service category: {0}")]
    UnknownCategory(String),

    #[error("unknown account type '{0}': expected buyer or provider")]
    UnknownAccountType(String),

    #[error("unknown sort order: {0}")]
    UnknownSort(String),

    #[error("invalid {kind} record '{id}': {reason}")]
    InvalidRecord {
        kind: &'static str,
        id: String,
        reason: String,
    },

    #[error("no message from {0} to respond to yet")]
    NothingToRespondTo(String),

    #[error("scheduled task failed: {0}")]
    TaskFailed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, IntakeError>;
