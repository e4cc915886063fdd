use thiserror::Error;

#[derive(Error, Debug)]
pub enum MoodlogError {
    #[error("No database at {0}. Run 'moodlog init' first.")]
    NotInitialized(String),

    #[error("Database already exists at {0}.")]
    AlreadyInitialized(String),

    #[error("{0}")]
    Validation(String),

    #[error("Entry id {0} doesn't exist.")]
    NotFound(i64),

    #[error("You are not the author of this entry.")]
    Forbidden,

    #[error("Login required.")]
    Unauthorized,

    #[error("User {0} is already registered.")]
    UserExists(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Invalid month '{0}'. Expected YYYY-MM")]
    InvalidMonth(String),

    #[error("Invalid collision policy '{0}'. Expected 'earliest' or 'latest'")]
    InvalidCollisionPolicy(String),

    #[error("Invalid listen address '{0}'")]
    InvalidAddress(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MoodlogError>;
