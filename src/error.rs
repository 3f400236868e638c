//! Error types and handling for EdgePlan

use thiserror::Error;

/// Result type alias for EdgePlan operations
pub type Result<T> = std::result::Result<T, Error>;

/// EdgePlan error types
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("Unknown component: {0}")]
    UnknownComponent(String),

    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    #[error("No feasible solution found")]
    NoFeasibleSolution,

    #[error("Regressor error: {0}")]
    Regressor(String),
}

impl Error {
    /// Exit code reported by the CLI for this error kind
    pub fn exit_code(&self) -> i32 {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_carry_context() {
        let err = Error::Config("Seed does not exist".to_string());
        assert_eq!(err.to_string(), "Configuration error: Seed does not exist");

        let err = Error::UnknownResource("VM7".to_string());
        assert!(err.to_string().contains("VM7"));
    }

    #[test]
    fn io_errors_convert() {
        fn read_missing() -> Result<String> {
            Ok(std::fs::read_to_string("/nonexistent/edgeplan-test")?)
        }
        assert!(matches!(read_missing(), Err(Error::Io(_))));
    }
}
