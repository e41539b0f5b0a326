use std::fmt;

/// Result type for scanlens-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the runtime layer
#[derive(Debug)]
pub enum Error {
    /// IO operation failed
    Io(std::io::Error),

    /// Snapshot or scenario JSON could not be parsed
    Json(serde_json::Error),

    /// Snapshot links do not form a tree
    Snapshot(String),

    /// Configuration error
    Config(String),

    /// Host refused to install an event listener
    Listener(String),

    /// Host interaction source refused a subscription
    Source(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Json(err) => write!(f, "JSON error: {}", err),
            Error::Snapshot(msg) => write!(f, "Invalid snapshot: {}", msg),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Listener(msg) => write!(f, "Listener setup failed: {}", msg),
            Error::Source(msg) => write!(f, "Interaction source unavailable: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Json(err) => Some(err),
            Error::Snapshot(_) | Error::Config(_) | Error::Listener(_) | Error::Source(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}
