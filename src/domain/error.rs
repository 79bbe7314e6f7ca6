use std::fmt;

#[derive(Debug)]
pub enum AppError {
    ConfigError(String),
    ValidationError(String),
    IoError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ConfigError(msg) => write!(f, "Config error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Failures the relay endpoint turns into HTTP responses.
///
/// Every variant maps to exactly one response shape; see
/// `interfaces::http::problem` for the wire format.
#[derive(Debug)]
pub enum RelayError {
    /// No `file` part in the request, or the part was empty.
    NoFileUploaded,
    /// The analysis service answered with a non-success status. The status and
    /// body stay in the relay's logs and never reach the caller.
    Downstream,
    /// Reading the upload, reaching the analysis service, or decoding its
    /// answer failed. Carries the raw error text.
    Transport(String),
}

impl RelayError {
    pub fn transport(err: impl std::error::Error) -> Self {
        RelayError::Transport(error_chain(&err))
    }
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayError::NoFileUploaded => write!(f, "No file uploaded"),
            RelayError::Downstream => write!(f, "ML service error"),
            RelayError::Transport(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for RelayError {}

/// Joins an error with all of its sources, e.g.
/// `error sending request: client error (Connect): Connection refused`.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Outer(std::io::Error);

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "error sending request")
        }
    }

    impl std::error::Error for Outer {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_error_chain_includes_sources() {
        let err = Outer(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "Connection refused",
        ));
        assert_eq!(
            error_chain(&err),
            "error sending request: Connection refused"
        );
    }

    #[test]
    fn test_relay_error_messages() {
        assert_eq!(RelayError::NoFileUploaded.to_string(), "No file uploaded");
        assert_eq!(RelayError::Downstream.to_string(), "ML service error");
        assert_eq!(
            RelayError::Transport("boom".to_string()).to_string(),
            "boom"
        );
    }
}
