use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FixtureError {
    /// The reference tokenizer failed to load, encode or decode.
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A token named in the tokenizer config has no id in the vocabulary.
    #[error("Token {token:?} ({role}) is not in the vocabulary")]
    MissingToken { role: &'static str, token: String },

    #[error("Required token {0} is not configured")]
    Unconfigured(&'static str),

    /// A generated document broke one of the fixture invariants.
    #[error("Fixture check failed for case {case}: {reason}")]
    Check { case: String, reason: String },

    #[error("Case {case}: {source}")]
    Case {
        case: String,
        #[source]
        source: Box<FixtureError>,
    },
}

impl FixtureError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Attach the catalog case name to an error raised while processing it.
    pub(crate) fn in_case(self, case: &str) -> Self {
        Self::Case {
            case: case.to_string(),
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, FixtureError>;
