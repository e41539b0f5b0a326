use std::fmt;

/// Result type for scanlens-types operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the types layer
#[derive(Debug)]
pub enum Error {
    /// A handle string could not be parsed
    InvalidHandle(String),

    /// Unknown filter category name
    UnknownCategory(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidHandle(raw) => write!(f, "Invalid handle: {}", raw),
            Error::UnknownCategory(name) => write!(
                f,
                "Unknown filter category '{}' (expected one of: providers, hocs, containers, minified, utilities, boundaries)",
                name
            ),
        }
    }
}

impl std::error::Error for Error {}
