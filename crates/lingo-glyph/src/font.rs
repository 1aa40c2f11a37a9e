#![forbid(unsafe_code)]

//! Font size classes and the glyph coverage of a font.

use std::fmt;

use ahash::AHashSet;

/// A font size class. Each class is backed by its own face, so coverage is
/// tracked per class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FontSize {
    Normal,
    Small,
    Large,
    Mono,
}

impl FontSize {
    pub const ALL: [Self; 4] = [Self::Normal, Self::Small, Self::Large, Self::Mono];

    /// Classes drawn with the proportional face.
    pub const PROPORTIONAL: [Self; 3] = [Self::Normal, Self::Small, Self::Large];

    const fn slot(self) -> usize {
        match self {
            Self::Normal => 0,
            Self::Small => 1,
            Self::Large => 2,
            Self::Mono => 3,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Small => "small",
            Self::Large => "large",
            Self::Mono => "mono",
        }
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The codepoints a font can draw, per size class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontGlyphSet {
    sizes: [AHashSet<char>; 4],
}

impl FontGlyphSet {
    /// A font with no glyphs at all.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A font drawing every character of `text` in every size class.
    #[must_use]
    pub fn covering(text: &str) -> Self {
        let mut set = Self::new();
        for size in FontSize::ALL {
            set.extend(size, text.chars());
        }
        set
    }

    /// A font drawing every character of `text` in `size` only.
    #[must_use]
    pub fn with_size(mut self, size: FontSize, text: &str) -> Self {
        self.extend(size, text.chars());
        self
    }

    pub fn insert(&mut self, size: FontSize, ch: char) {
        self.sizes[size.slot()].insert(ch);
    }

    pub fn extend(&mut self, size: FontSize, chars: impl IntoIterator<Item = char>) {
        self.sizes[size.slot()].extend(chars);
    }

    /// Drop `ch` from every size class.
    pub fn remove(&mut self, ch: char) {
        for set in &mut self.sizes {
            set.remove(&ch);
        }
    }

    #[must_use]
    pub fn contains(&self, size: FontSize, ch: char) -> bool {
        self.sizes[size.slot()].contains(&ch)
    }

    /// Number of glyphs in `size`.
    #[must_use]
    pub fn len(&self, size: FontSize) -> usize {
        self.sizes[size.slot()].len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sizes.iter().all(|s| s.is_empty())
    }
}

/// Configured font names, one per size class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontSettings {
    pub small: String,
    pub medium: String,
    pub large: String,
    pub mono: String,
}

impl FontSettings {
    #[must_use]
    pub fn name(&self, size: FontSize) -> &str {
        match size {
            FontSize::Normal => &self.medium,
            FontSize::Small => &self.small,
            FontSize::Large => &self.large,
            FontSize::Mono => &self.mono,
        }
    }

    pub fn set_name(&mut self, size: FontSize, name: &str) {
        let slot = match size {
            FontSize::Normal => &mut self.medium,
            FontSize::Small => &mut self.small,
            FontSize::Large => &mut self.large,
            FontSize::Mono => &mut self.mono,
        };
        name.clone_into(slot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coverage_is_per_size() {
        let font = FontGlyphSet::new()
            .with_size(FontSize::Normal, "abc")
            .with_size(FontSize::Mono, "a");
        assert!(font.contains(FontSize::Normal, 'c'));
        assert!(!font.contains(FontSize::Mono, 'c'));
        assert!(!font.contains(FontSize::Small, 'a'));
        assert_eq!(font.len(FontSize::Normal), 3);
    }

    #[test]
    fn remove_clears_every_size() {
        let mut font = FontGlyphSet::covering("xy");
        font.remove('x');
        assert!(FontSize::ALL.iter().all(|&s| !font.contains(s, 'x')));
        assert!(font.contains(FontSize::Large, 'y'));
        assert!(!font.is_empty());
    }

    #[test]
    fn settings_names_by_size() {
        let mut settings = FontSettings::default();
        settings.set_name(FontSize::Normal, "Sans");
        settings.set_name(FontSize::Mono, "Mono");
        assert_eq!(settings.medium, "Sans");
        assert_eq!(settings.name(FontSize::Mono), "Mono");
        assert_eq!(settings.name(FontSize::Small), "");
    }
}
