#![forbid(unsafe_code)]

//! Fallback-font selection after a failed coverage scan.

use lingo_core::{Colour, ControlCode};
use lingo_i18n::LanguageMetadata;
use tracing::{debug, info, warn};

use crate::checker::{GlyphCoverageChecker, StringCoverage};
use crate::font::{FontGlyphSet, FontSettings, FontSize};
use crate::searcher::MissingGlyphSearcher;

/// Shown when no font can draw the language. Deliberately untranslated.
pub const MISSING_GLYPHS_WARNING: &str = "The current font is missing some of the characters \
     used in the texts for this language. Read the readme to see how to solve this.";

/// Finds and loads fonts for the drawing layer.
pub trait FallbackFontProvider {
    /// Look for a font that draws every string of `searcher` for
    /// `language`, naming it in `settings` through
    /// [`MissingGlyphSearcher::set_font_names`]. Returns whether one was
    /// found and loaded.
    fn set_fallback_font(
        &mut self,
        settings: &mut FontSettings,
        language: &LanguageMetadata,
        searcher: &mut dyn MissingGlyphSearcher,
    ) -> bool;

    /// Reload the fonts named in `settings`.
    fn reload(&mut self, settings: &FontSettings, monospace: bool);
}

/// Which font ended up in use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontOutcome {
    /// The configured font covers the language.
    BaseFont,
    /// A fallback font was loaded.
    Fallback,
    /// No fallback worked; the configured font was reloaded.
    KeptBaseFont,
    /// Neither the fallback nor a base font is usable.
    Missing,
}

/// Result of [`check_for_missing_glyphs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphCheck {
    pub outcome: FontOutcome,
    /// The first string found with a missing glyph, if the base font was
    /// scanned.
    pub first_missing: Option<StringCoverage>,
    /// Untranslated warning for the user, yellow, when glyphs stay missing.
    pub warning: Option<String>,
}

/// The warning text with its colour prefix.
#[must_use]
pub fn missing_glyphs_warning() -> String {
    let mut text = String::with_capacity(MISSING_GLYPHS_WARNING.len() + 3);
    text.push(ControlCode::Colour(Colour::Yellow).to_char());
    text.push_str(MISSING_GLYPHS_WARNING);
    text
}

/// Check `font` against `searcher` and fall back to another font if
/// glyphs are missing.
///
/// With `base_font` false the configured font is not scanned and a
/// fallback is always sought. `settings` is restored afterwards; only the
/// provider's loaded faces change.
pub fn check_for_missing_glyphs(
    base_font: bool,
    font: &FontGlyphSet,
    settings: &mut FontSettings,
    language: &LanguageMetadata,
    searcher: &mut dyn MissingGlyphSearcher,
    provider: &mut dyn FallbackFontProvider,
) -> GlyphCheck {
    let first_missing = if base_font {
        GlyphCoverageChecker::new(font).find_missing_glyphs(searcher)
    } else {
        None
    };
    if base_font && first_missing.is_none() {
        debug!(isocode = %language.isocode, "font covers the language");
        return GlyphCheck {
            outcome: FontOutcome::BaseFont,
            first_missing,
            warning: None,
        };
    }

    let backup = settings.clone();
    let found = provider.set_fallback_font(settings, language, searcher);
    *settings = backup;

    let outcome = match (found, base_font) {
        (true, _) => {
            info!(isocode = %language.isocode, "loaded fallback font");
            FontOutcome::Fallback
        }
        (false, true) => {
            provider.reload(settings, searcher.monospace());
            FontOutcome::KeptBaseFont
        }
        (false, false) => FontOutcome::Missing,
    };
    let warning = (outcome != FontOutcome::Fallback).then(|| {
        warn!(isocode = %language.isocode, "no font covers the language");
        missing_glyphs_warning()
    });
    GlyphCheck {
        outcome,
        first_missing,
        warning,
    }
}

/// A fixed list of installed fonts, tried in order.
#[derive(Debug, Clone, Default)]
pub struct CandidateFonts {
    candidates: Vec<(String, FontGlyphSet)>,
    loaded: Option<String>,
}

impl CandidateFonts {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_font(mut self, name: impl Into<String>, glyphs: FontGlyphSet) -> Self {
        self.candidates.push((name.into(), glyphs));
        self
    }

    /// Name of the font loaded last, by fallback or reload.
    #[must_use]
    pub fn loaded(&self) -> Option<&str> {
        self.loaded.as_deref()
    }
}

impl FallbackFontProvider for CandidateFonts {
    fn set_fallback_font(
        &mut self,
        settings: &mut FontSettings,
        language: &LanguageMetadata,
        searcher: &mut dyn MissingGlyphSearcher,
    ) -> bool {
        for (name, glyphs) in &self.candidates {
            let covered = GlyphCoverageChecker::new(glyphs)
                .find_missing_glyphs(searcher)
                .is_none();
            debug!(font = %name, isocode = %language.isocode, covered, "probed fallback font");
            if covered {
                searcher.set_font_names(settings, name);
                self.loaded = Some(name.clone());
                return true;
            }
        }
        false
    }

    fn reload(&mut self, settings: &FontSettings, monospace: bool) {
        let size = if monospace { FontSize::Mono } else { FontSize::Normal };
        self.loaded = Some(settings.name(size).to_string());
    }
}
