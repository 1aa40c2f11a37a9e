#![forbid(unsafe_code)]

use std::fmt;

/// Base writing direction of a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

impl TextDirection {
    /// Decode the header byte of a language file (0 = LTR, 1 = RTL).
    #[must_use]
    pub const fn from_header(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Ltr),
            1 => Some(Self::Rtl),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_rtl(self) -> bool {
        matches!(self, Self::Rtl)
    }
}

impl fmt::Display for TextDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
        })
    }
}

/// Whether `ch` is a bidi control (marks, embeddings, overrides, isolates).
#[must_use]
pub fn is_direction_char(ch: char) -> bool {
    matches!(ch, '\u{200E}' | '\u{200F}' | '\u{202A}'..='\u{202E}' | '\u{2066}'..='\u{2069}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_decoding() {
        assert_eq!(TextDirection::from_header(0), Some(TextDirection::Ltr));
        assert_eq!(TextDirection::from_header(1), Some(TextDirection::Rtl));
        assert_eq!(TextDirection::from_header(2), None);
    }

    #[test]
    fn direction_marks() {
        assert!(is_direction_char('\u{200F}'));
        assert!(is_direction_char('\u{2067}'));
        assert!(!is_direction_char('a'));
    }
}
