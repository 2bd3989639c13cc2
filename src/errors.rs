use thiserror::Error;

/// Failures at the configuration and input boundaries.
///
/// Parsing, lookup and building are total; these only surface when option
/// text or JSON input handed to the crate cannot be understood.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("option assignment `{0}` is missing `=`")]
    MalformedAssignment(String),

    #[error("invalid value `{value}` for option `{name}`")]
    InvalidOptionValue { name: String, value: String },

    #[error("params must be a JSON object or an array of [name, value] pairs, got {0}")]
    InvalidParams(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, QueryError>;
