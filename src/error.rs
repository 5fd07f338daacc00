use thiserror::Error;

/// Result type for mlops-quickstart operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a dataset error
    pub fn dataset(msg: impl Into<String>) -> Self {
        Error::Dataset(msg.into())
    }

    /// Create a training error
    pub fn training(msg: impl Into<String>) -> Self {
        Error::Training(msg.into())
    }

    /// Create a startup error
    pub fn startup(msg: impl Into<String>) -> Self {
        Error::Startup(msg.into())
    }

    /// Create a lifecycle error
    pub fn lifecycle(msg: impl Into<String>) -> Self {
        Error::Lifecycle(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Create a logging error
    pub fn logging(msg: impl Into<String>) -> Self {
        Error::Logging(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Error::Internal(msg.into())
    }
}

/// Error context trait for adding context to errors
pub trait WithErrorContext {
    fn with_context(self, context: impl Into<String>) -> Self;
}

impl<T> WithErrorContext for Result<T> {
    fn with_context(self, context: impl Into<String>) -> Self {
        self.map_err(|e| {
            let context_str = context.into();
            match e {
                Error::Config(msg) => Error::Config(format!("{}: {}", context_str, msg)),
                Error::Dataset(msg) => Error::Dataset(format!("{}: {}", context_str, msg)),
                Error::Training(msg) => Error::Training(format!("{}: {}", context_str, msg)),
                Error::Startup(msg) => Error::Startup(format!("{}: {}", context_str, msg)),
                Error::Lifecycle(msg) => Error::Lifecycle(format!("{}: {}", context_str, msg)),
                Error::InvalidInput(msg) => Error::InvalidInput(format!("{}: {}", context_str, msg)),
                Error::Logging(msg) => Error::Logging(format!("{}: {}", context_str, msg)),
                Error::Serialization(msg) => Error::Serialization(format!("{}: {}", context_str, msg)),
                Error::Internal(msg) => Error::Internal(format!("{}: {}", context_str, msg)),
                Error::Io(err) => Error::Internal(format!("{}: I/O error: {}", context_str, err)),
            }
        })
    }
}

/// Main error type for mlops-quickstart
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The bundled dataset could not be loaded
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Numerical failure while fitting the model
    #[error("Training error: {0}")]
    Training(String),

    /// The service could not reach the ready state
    #[error("Startup failure: {0}")]
    Startup(String),

    /// Invalid lifecycle transition
    #[error("Lifecycle error: {0}")]
    Lifecycle(String),

    /// Invalid input or parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Logger setup errors
    #[error("Logging error: {0}")]
    Logging(String),

    /// Serialization/Deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Dataset(err.to_string())
    }
}

impl From<ndarray::ShapeError> for Error {
    fn from(err: ndarray::ShapeError) -> Self {
        Error::Dataset(format!("shape mismatch: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_context_prefixes_message() {
        let result: Result<()> = Err(Error::training("loss is NaN"));
        let err = result.with_context("fit logistic regression").unwrap_err();
        assert_eq!(err.to_string(), "Training error: fit logistic regression: loss is NaN");
    }

    #[test]
    fn test_io_error_context_becomes_internal() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let result: Result<()> = Err(Error::from(io));
        match result.with_context("read config") {
            Err(Error::Internal(msg)) => assert!(msg.starts_with("read config: I/O error")),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
