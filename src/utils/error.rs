use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReorderError {
    #[error("Index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Entity not found in list: {id}")]
    UnknownEntity { id: String },

    #[error("A commit is already in progress")]
    CommitInProgress,

    #[error("Commit ticket #{ticket} is not the one in flight")]
    StaleCommitTicket { ticket: u64 },

    #[error("Network request failed: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Server rejected request ({status}): {message}")]
    ServerRejection { status: u16, message: String },

    #[error("Response decode error: {message}")]
    DecodeError { message: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl ReorderError {
    /// 可由使用者重試或忽略的錯誤
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ReorderError::CommitInProgress
                | ReorderError::NetworkFailure(_)
                | ReorderError::ServerRejection { .. }
        )
    }

    /// 顯示在通知中的訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            ReorderError::CommitInProgress => "Order is already being saved".to_string(),
            ReorderError::NetworkFailure(e) if e.is_timeout() => {
                "Saving the order timed out, please try again".to_string()
            }
            ReorderError::NetworkFailure(_) => {
                "Could not reach the server, please try again".to_string()
            }
            ReorderError::ServerRejection { message, .. } => {
                format!("Could not save the order: {}", message)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReorderError>;
