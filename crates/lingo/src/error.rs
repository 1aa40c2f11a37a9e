#![forbid(unsafe_code)]

//! Top-level error type.
//!
//! Rendering never fails; recovered problems travel with the text as
//! [`RenderIssue`](lingo_format::RenderIssue)s. What remains are the
//! start-up failures: unreadable settings and missing language packs.

use lingo_i18n::{ConfigError, LanguagePackError};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Language(#[from] LanguagePackError),
}

/// Standard result type for lingo APIs.
pub type Result<T> = std::result::Result<T, Error>;
