use std::path::PathBuf;

use thiserror::Error;

/// Failures reported by the history store and the clipboard bridge.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("i/o error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid history document {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode history: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(String),

    #[error("index {index} out of range (history has {len} entries)")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("clipboard error: {0}")]
    Clipboard(String),
}

impl HistoryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, HistoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_error_message() {
        let err = HistoryError::IndexOutOfRange { index: 3, len: 2 };
        assert_eq!(
            err.to_string(),
            "index 3 out of range (history has 2 entries)"
        );
    }

    #[test]
    fn test_io_error_names_path() {
        let err = HistoryError::io(
            "/nope/history.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let message = err.to_string();
        assert!(message.contains("/nope/history.json"));
        assert!(message.contains("denied"));
    }
}
