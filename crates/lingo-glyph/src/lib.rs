#![forbid(unsafe_code)]

//! Glyph coverage for lingo.
//!
//! # Role in lingo
//! Before a language is shown, every string it can draw is probed against
//! the configured font. [`GlyphCoverageChecker`] runs that scan as a small
//! state machine over a [`MissingGlyphSearcher`]; when glyphs are missing,
//! [`check_for_missing_glyphs`] asks a [`FallbackFontProvider`] for a font
//! that covers the language and produces an untranslated warning if none
//! does.
//!
//! # How it fits in the system
//! Strings come from `lingo-i18n` templates ([`LanguagePackSearcher`]) or
//! are rendered through `lingo-format` ([`RenderedSearcher`]). Rasterising
//! glyphs is left to the drawing layer; a font is modelled only by the set
//! of codepoints it covers ([`FontGlyphSet`]).

pub mod checker;
pub mod fallback;
pub mod font;
pub mod searcher;

pub use checker::{
    CheckerState, CoverageReport, GlyphCoverageChecker, Step, StringCoverage, is_probed, probe,
};
pub use fallback::{
    CandidateFonts, FallbackFontProvider, FontOutcome, GlyphCheck, MISSING_GLYPHS_WARNING,
    check_for_missing_glyphs, missing_glyphs_warning,
};
pub use font::{FontGlyphSet, FontSettings, FontSize};
pub use searcher::{
    LanguagePackSearcher, MissingGlyphSearcher, RenderedSearcher, StringListSearcher,
};
