#![forbid(unsafe_code)]

//! lingo public facade crate.
//!
//! Re-exports the types most callers need from the member crates and
//! offers a prelude. Anything more specialised lives in the crates
//! themselves, reachable through [`core`], [`i18n`], [`format`] and
//! [`glyph`].
//!
//! ```
//! use lingo::prelude::*;
//!
//! let mut pack = LanguagePack::new(LanguageMetadata::default());
//! pack.insert(StringId::from_raw(1), "{STRING1} arrives on {DATE_LONG}").unwrap();
//! pack.insert(StringId::from_raw(2), "Train {COMMA}").unwrap();
//! let mut engine = StringEngine::new(
//!     TemplateStore::new(std::sync::Arc::new(pack)),
//!     LocaleSettings::default(),
//! );
//!
//! engine.set_param(0, StringId::from_raw(2));
//! engine.set_param(1, 1024u64);
//! engine.set_param(2, GameDate(712_223));
//! assert_eq!(
//!     engine.get_string(StringId::from_raw(1)).text,
//!     "Train 1,024 arrives on 1st Jan 1950"
//! );
//! ```

pub mod error;

pub use error::{Error, Result};

// --- Core re-exports -------------------------------------------------------

pub use lingo_core::{
    Colour, ControlCode, GameDate, ParamError, ParamKind, Parameter, ParameterStack, StringId,
    StringSource, TextDirection,
};

// --- Language re-exports ---------------------------------------------------

pub use lingo_i18n::{
    LanguageMetadata, LanguagePack, LanguagePackError, LocaleSettings, PluralRule, Template,
    TemplateStore, UnitSystem,
};

// --- Rendering re-exports --------------------------------------------------

pub use lingo_format::{FormatInterpreter, RenderIssue, Rendered, StringEngine};

// --- Glyph re-exports ------------------------------------------------------

#[cfg(feature = "glyph")]
pub use lingo_glyph::{
    FontGlyphSet, FontSize, GlyphCoverageChecker, LanguagePackSearcher, MissingGlyphSearcher,
    check_for_missing_glyphs,
};

/// Load settings from `path` and start an engine over the language packs
/// they point at.
///
/// # Errors
///
/// [`Error::Config`] when the settings are unreadable or invalid,
/// [`Error::Language`] when no language pack loads.
pub fn start(path: &std::path::Path) -> Result<StringEngine> {
    let settings = LocaleSettings::from_toml_file(path)?;
    let errors = settings.validate();
    if !errors.is_empty() {
        return Err(lingo_i18n::ConfigError::Validation(errors).into());
    }
    Ok(StringEngine::initialize(settings)?)
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Error, GameDate, LanguageMetadata, LanguagePack, LocaleSettings, Parameter,
        ParameterStack, Rendered, Result, StringEngine, StringId, TemplateStore, TextDirection,
    };

    #[cfg(feature = "glyph")]
    pub use crate::{FontGlyphSet, MissingGlyphSearcher, check_for_missing_glyphs};

    pub use crate::{core, format, i18n};

    #[cfg(feature = "glyph")]
    pub use crate::glyph;
}

pub use lingo_core as core;
pub use lingo_format as format;
#[cfg(feature = "glyph")]
pub use lingo_glyph as glyph;
pub use lingo_i18n as i18n;
