#![forbid(unsafe_code)]

//! Sources of strings to probe against a font.
//!
//! A [`MissingGlyphSearcher`] is a restartable sequence of strings plus the
//! size class they are drawn in. [`LanguagePackSearcher`] walks every
//! template a [`TemplateStore`] can reach; [`StringListSearcher`] walks a
//! fixed list; [`RenderedSearcher`] renders chosen strings through a
//! [`StringEngine`] so parameters and nested strings are expanded first.

use std::sync::Arc;

use lingo_core::{ParameterStack, StringId};
use lingo_format::StringEngine;
use lingo_i18n::{Quantity, Template, TemplateStore, UnitSystem};

use crate::font::{FontSettings, FontSize};

/// A restartable sequence of strings to check for missing glyphs.
pub trait MissingGlyphSearcher {
    /// Rewind to the first string.
    fn reset(&mut self);

    /// The next string, or `None` once the sequence is exhausted.
    fn next_string(&mut self) -> Option<String>;

    /// Size class of the string last returned by [`next_string`].
    ///
    /// [`next_string`]: MissingGlyphSearcher::next_string
    fn default_size(&self) -> FontSize;

    /// Whether the strings are drawn with the monospace face.
    fn monospace(&self) -> bool;

    /// Point the faces this searcher draws with at `font_name`.
    fn set_font_names(&self, settings: &mut FontSettings, font_name: &str);
}

fn set_proportional(settings: &mut FontSettings, font_name: &str) {
    for size in FontSize::PROPORTIONAL {
        settings.set_name(size, font_name);
    }
}

// ---------------------------------------------------------------------------
// LanguagePackSearcher
// ---------------------------------------------------------------------------

/// Every template of the active language: the string table, runtime
/// script and data-pack strings, unit templates and calendar names.
///
/// Templates are probed by their literal text and choice alternatives;
/// parameters are not expanded.
#[derive(Debug, Clone)]
pub struct LanguagePackSearcher {
    templates: Vec<Arc<Template>>,
    names: Vec<String>,
    cursor: usize,
}

impl LanguagePackSearcher {
    #[must_use]
    pub fn new(store: &TemplateStore) -> Self {
        let pack = store.active();
        let mut templates: Vec<Arc<Template>> = pack
            .ids()
            .into_iter()
            .filter_map(|id| pack.get(id).cloned())
            .collect();
        templates.extend(store.dynamic_templates().cloned());
        for quantity in Quantity::ALL {
            for system in UnitSystem::ALL {
                templates.push(Arc::clone(pack.units().get(quantity, system)));
            }
        }

        let calendar = pack.calendar();
        let names = calendar
            .months
            .iter()
            .chain(&calendar.months_short)
            .chain(&calendar.day_ordinals)
            .cloned()
            .collect();
        Self {
            templates,
            names,
            cursor: 0,
        }
    }

    /// Number of strings in one pass.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len() + self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MissingGlyphSearcher for LanguagePackSearcher {
    fn reset(&mut self) {
        self.cursor = 0;
    }

    fn next_string(&mut self) -> Option<String> {
        let i = self.cursor;
        let text = match self.templates.get(i) {
            Some(template) => template.glyph_text(),
            None => self.names.get(i - self.templates.len())?.clone(),
        };
        self.cursor += 1;
        Some(text)
    }

    fn default_size(&self) -> FontSize {
        FontSize::Normal
    }

    fn monospace(&self) -> bool {
        false
    }

    fn set_font_names(&self, settings: &mut FontSettings, font_name: &str) {
        set_proportional(settings, font_name);
    }
}

// ---------------------------------------------------------------------------
// StringListSearcher
// ---------------------------------------------------------------------------

/// A fixed list of strings drawn in one size class.
#[derive(Debug, Clone)]
pub struct StringListSearcher {
    strings: Vec<String>,
    size: FontSize,
    cursor: usize,
}

impl StringListSearcher {
    #[must_use]
    pub fn new<I, S>(strings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            strings: strings.into_iter().map(Into::into).collect(),
            size: FontSize::Normal,
            cursor: 0,
        }
    }

    /// Draw the strings in `size`. [`FontSize::Mono`] makes this a
    /// monospace searcher.
    #[must_use]
    pub fn with_size(mut self, size: FontSize) -> Self {
        self.size = size;
        self
    }
}

impl MissingGlyphSearcher for StringListSearcher {
    fn reset(&mut self) {
        self.cursor = 0;
    }

    fn next_string(&mut self) -> Option<String> {
        let text = self.strings.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(text)
    }

    fn default_size(&self) -> FontSize {
        self.size
    }

    fn monospace(&self) -> bool {
        self.size == FontSize::Mono
    }

    fn set_font_names(&self, settings: &mut FontSettings, font_name: &str) {
        if self.monospace() {
            settings.set_name(FontSize::Mono, font_name);
        } else {
            set_proportional(settings, font_name);
        }
    }
}

// ---------------------------------------------------------------------------
// RenderedSearcher
// ---------------------------------------------------------------------------

/// Chosen strings rendered with sample parameters, so generated names,
/// numbers and nested strings are probed as they will be drawn.
#[derive(Debug, Clone)]
pub struct RenderedSearcher {
    engine: StringEngine,
    requests: Vec<(StringId, ParameterStack)>,
    cursor: usize,
}

impl RenderedSearcher {
    #[must_use]
    pub fn new(engine: StringEngine, requests: Vec<(StringId, ParameterStack)>) -> Self {
        Self {
            engine,
            requests,
            cursor: 0,
        }
    }
}

impl MissingGlyphSearcher for RenderedSearcher {
    fn reset(&mut self) {
        self.cursor = 0;
    }

    fn next_string(&mut self) -> Option<String> {
        let (id, params) = self.requests.get(self.cursor)?;
        self.cursor += 1;
        Some(self.engine.get_string_with_args(*id, params, 0, false).text)
    }

    fn default_size(&self) -> FontSize {
        FontSize::Normal
    }

    fn monospace(&self) -> bool {
        false
    }

    fn set_font_names(&self, settings: &mut FontSettings, font_name: &str) {
        set_proportional(settings, font_name);
    }
}
