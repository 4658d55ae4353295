use crate::MoreId;

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Fetching more children failed: {0}")]
    FetchFailed(String),

    #[error("Failed parsing remote payload: {0}")]
    ParseFailed(String),

    #[error("Unknown sort mode {0:?}")]
    UnknownSortMode(String),

    #[error("Null byte in string is not allowed {0:?}")]
    NullByteInString(String),

    #[error("Placeholder {0:?} is not in the tree")]
    UnknownPlaceholder(MoreId),
}

impl Error {
    /// Stable tag for this error, suitable for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            Error::FetchFailed(_) => "fetch-failed",
            Error::ParseFailed(_) => "parse-failed",
            Error::UnknownSortMode(_) => "unknown-sort-mode",
            Error::NullByteInString(_) => "null-byte",
            Error::UnknownPlaceholder(_) => "unknown-placeholder",
        }
    }

    /// Whether retrying the same request later could succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::FetchFailed(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::ParseFailed(err.to_string())
    }
}
