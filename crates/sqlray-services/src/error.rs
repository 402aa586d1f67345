use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service-level errors with user-friendly messages
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("Report serialization failed: {0}")]
    SerializationFailed(String),
}
