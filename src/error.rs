/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Catalog rejected the request: {0}")]
    Query(String),

    #[error("Invalid {facet} filter pattern: {source}")]
    FilterSpec {
        facet: &'static str,
        source: regex::Error,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;
