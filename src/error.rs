use std::fmt;

#[derive(Debug)]
pub enum ServerError {
    Dataset(String),
    InvalidColor(String),
    InvalidArgument(String),
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dataset(msg) => write!(f, "Failed to load tokens: {msg}"),
            Self::InvalidColor(msg) => f.write_str(msg),
            Self::InvalidArgument(msg) => f.write_str(msg),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Json(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<std::io::Error> for ServerError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ServerError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}
