#![forbid(unsafe_code)]

use std::path::PathBuf;

use lingo_i18n::{ConfigError, LanguagePackError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("settings: {0}")]
    Config(#[from] ConfigError),

    #[error("language packs: {0}")]
    Language(#[from] LanguagePackError),

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("write failed: {0}")]
    Output(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("rendering reported {count} issue(s)")]
    RenderIssues { count: usize },

    #[error("{count} character(s) missing from every font")]
    MissingGlyphs { count: usize },
}

impl CliError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument { .. } => 2,
            Self::RenderIssues { .. } => 3,
            Self::MissingGlyphs { .. } => 4,
            _ => 1,
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CliError;

    #[test]
    fn exit_codes_by_kind() {
        assert_eq!(CliError::invalid("bad id").exit_code(), 2);
        assert_eq!(CliError::RenderIssues { count: 2 }.exit_code(), 3);
        assert_eq!(CliError::MissingGlyphs { count: 1 }.exit_code(), 4);
        let err = CliError::from(lingo_i18n::LanguagePackError::NoLanguagePacks {
            searched: Vec::new(),
        });
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn invalid_argument_message() {
        assert_eq!(
            CliError::invalid("bad id").to_string(),
            "invalid argument: bad id"
        );
    }
}
