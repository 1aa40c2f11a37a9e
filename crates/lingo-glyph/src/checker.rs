#![forbid(unsafe_code)]

//! The glyph coverage scan.
//!
//! [`GlyphCoverageChecker`] pulls strings from a [`MissingGlyphSearcher`]
//! one at a time and probes each codepoint against a [`FontGlyphSet`]:
//!
//! ```text
//!   Idle ──step──▶ Scanning ──next string──▶ Probing ──probed──▶ Scanning
//!                     │
//!                     └──exhausted──▶ Done
//! ```
//!
//! `reset` returns to the start of `Scanning` from any state. Each
//! [`step`](GlyphCoverageChecker::step) performs one transition, so a scan
//! can be spread across frames.

use ahash::AHashSet;
use lingo_core::{ControlCode, is_control_char, is_direction_char};
use tracing::debug;
use unicode_width::UnicodeWidthChar;

use crate::font::{FontGlyphSet, FontSize};
use crate::searcher::MissingGlyphSearcher;

/// Where the checker is in its scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckerState {
    /// Not started.
    Idle,
    /// Waiting to pull the next string.
    Scanning,
    /// Holding a string that has not been probed yet.
    Probing,
    /// The searcher is exhausted.
    Done,
}

/// Result of one transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// The searcher was rewound.
    Started,
    /// String `index` was pulled and awaits probing.
    Pulled { index: usize },
    /// A string was probed.
    Probed(StringCoverage),
    /// Nothing left to scan.
    Finished,
}

/// Codepoints of one string missing from the font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringCoverage {
    /// Position of the string in the searcher's sequence.
    pub index: usize,
    pub text: String,
    /// Missing codepoints with the size class they were needed in, in
    /// order of first appearance.
    pub missing: Vec<(FontSize, char)>,
}

impl StringCoverage {
    #[must_use]
    pub fn is_covered(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Outcome of a full scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageReport {
    /// Strings probed.
    pub strings: usize,
    /// Strings with at least one missing glyph.
    pub flagged: Vec<StringCoverage>,
}

impl CoverageReport {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.flagged.is_empty()
    }

    /// Every missing codepoint, sorted.
    #[must_use]
    pub fn missing_chars(&self) -> Vec<char> {
        let set: AHashSet<char> = self
            .flagged
            .iter()
            .flat_map(|s| s.missing.iter().map(|&(_, c)| c))
            .collect();
        let mut chars: Vec<char> = set.into_iter().collect();
        chars.sort_unstable();
        chars
    }
}

/// Whether the drawing layer would ever look `ch` up in a font.
#[must_use]
pub fn is_probed(ch: char) -> bool {
    !is_control_char(ch) && !is_direction_char(ch) && ch != '?' && ch.width().is_some()
}

/// Codepoints of `text` that `font` cannot draw.
///
/// Proportional text starts in `size` and follows `TINY_FONT`/`BIG_FONT`
/// switches; monospace text is probed in [`FontSize::Mono`] only.
#[must_use]
pub fn probe(
    text: &str,
    size: FontSize,
    monospace: bool,
    font: &FontGlyphSet,
) -> Vec<(FontSize, char)> {
    let mut size = if monospace { FontSize::Mono } else { size };
    let mut missing = Vec::new();
    for ch in text.chars() {
        match ControlCode::from_char(ch) {
            Some(ControlCode::TinyFont) if !monospace => size = FontSize::Small,
            Some(ControlCode::BigFont) if !monospace => size = FontSize::Large,
            _ => {}
        }
        if is_probed(ch) && !font.contains(size, ch) && !missing.contains(&(size, ch)) {
            missing.push((size, ch));
        }
    }
    missing
}

struct Pending {
    index: usize,
    text: String,
    size: FontSize,
}

/// Scans a searcher's strings against one font.
pub struct GlyphCoverageChecker<'f> {
    font: &'f FontGlyphSet,
    state: CheckerState,
    pending: Option<Pending>,
    pulled: usize,
    report: CoverageReport,
}

impl<'f> GlyphCoverageChecker<'f> {
    #[must_use]
    pub fn new(font: &'f FontGlyphSet) -> Self {
        Self {
            font,
            state: CheckerState::Idle,
            pending: None,
            pulled: 0,
            report: CoverageReport::default(),
        }
    }

    #[must_use]
    pub fn state(&self) -> CheckerState {
        self.state
    }

    /// The report so far.
    #[must_use]
    pub fn report(&self) -> &CoverageReport {
        &self.report
    }

    /// Rewind the searcher and start a fresh scan.
    pub fn reset(&mut self, searcher: &mut dyn MissingGlyphSearcher) {
        searcher.reset();
        self.state = CheckerState::Scanning;
        self.pending = None;
        self.pulled = 0;
        self.report = CoverageReport::default();
    }

    /// Perform one transition.
    pub fn step(&mut self, searcher: &mut dyn MissingGlyphSearcher) -> Step {
        match self.state {
            CheckerState::Idle => {
                self.reset(searcher);
                Step::Started
            }
            CheckerState::Scanning => match searcher.next_string() {
                Some(text) => {
                    let index = self.pulled;
                    self.pulled += 1;
                    self.pending = Some(Pending {
                        index,
                        text,
                        size: searcher.default_size(),
                    });
                    self.state = CheckerState::Probing;
                    Step::Pulled { index }
                }
                None => {
                    self.state = CheckerState::Done;
                    Step::Finished
                }
            },
            CheckerState::Probing => {
                self.state = CheckerState::Scanning;
                let Some(Pending { index, text, size }) = self.pending.take() else {
                    return self.step(searcher);
                };
                let missing = probe(&text, size, searcher.monospace(), self.font);
                let coverage = StringCoverage {
                    index,
                    text,
                    missing,
                };
                self.report.strings += 1;
                if !coverage.is_covered() {
                    debug!(
                        index,
                        missing = coverage.missing.len(),
                        "string has glyphs missing from the font"
                    );
                    self.report.flagged.push(coverage.clone());
                }
                Step::Probed(coverage)
            }
            CheckerState::Done => Step::Finished,
        }
    }

    /// Scan every string from the start.
    pub fn run(&mut self, searcher: &mut dyn MissingGlyphSearcher) -> &CoverageReport {
        self.reset(searcher);
        while self.step(searcher) != Step::Finished {}
        &self.report
    }

    /// Scan from the start until the first string with a missing glyph and
    /// return it. The scan stops there; `None` means the font covers
    /// everything.
    pub fn find_missing_glyphs(
        &mut self,
        searcher: &mut dyn MissingGlyphSearcher,
    ) -> Option<StringCoverage> {
        self.reset(searcher);
        loop {
            match self.step(searcher) {
                Step::Probed(coverage) if !coverage.is_covered() => return Some(coverage),
                Step::Finished => return None,
                _ => {}
            }
        }
    }
}
