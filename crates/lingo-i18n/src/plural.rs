#![forbid(unsafe_code)]

//! Plural form selection.
//!
//! A language file names one of fourteen numbered plural rules. Each rule
//! maps the absolute value of a count to a form index in
//! `0..rule.form_count()`. Form order follows the language file, which is
//! not always "ascending": Latvian lists its zero form last.

use std::fmt;

/// Number of known plural rules; valid header values are `0..MAX_PLURAL_FORMS`.
pub const MAX_PLURAL_FORMS: u8 = 14;

/// One of the numbered plural rules a language can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PluralRule {
    /// Singular for one only (English, German, Dutch, Spanish, ...).
    #[default]
    OneOther,
    /// A single form (Hungarian, Japanese, Korean, Turkish).
    Invariant,
    /// Singular for zero and one (French, Brazilian Portuguese).
    ZeroOneOther,
    /// Ends in 1 but not 11, non-zero, zero (Latvian).
    Latvian,
    /// 1, 2, 0 and 3-6, 7-10, other (Irish).
    Irish,
    /// Ends in 1 but not 11, ends in 2-9 but not 12-19, other (Lithuanian).
    Lithuanian,
    /// Ends in 1 but not 11, ends in 2-4 but not 12-14, other (Russian,
    /// Ukrainian, Croatian).
    EastSlavic,
    /// 1, ends in 2-4 but not 12-14, other (Polish).
    Polish,
    /// Ends in 01, 02, 03-04, other (Slovenian).
    Slovenian,
    /// Ends in 1 but not 11, other (Icelandic).
    Icelandic,
    /// 1, 2-4, other (Czech, Slovak).
    Czech,
    /// Particle choice by the last digit's pronunciation (Korean).
    KoreanParticle,
    /// 1, 0 or ends in 02-10, ends in 11-19, other (Maltese).
    Maltese,
    /// 1 and 11, 2 and 12, 3-10 and 13-19, other (Scottish Gaelic).
    ScottishGaelic,
}

impl PluralRule {
    /// All rules, in header-index order.
    pub const ALL: [Self; MAX_PLURAL_FORMS as usize] = [
        Self::OneOther,
        Self::Invariant,
        Self::ZeroOneOther,
        Self::Latvian,
        Self::Irish,
        Self::Lithuanian,
        Self::EastSlavic,
        Self::Polish,
        Self::Slovenian,
        Self::Icelandic,
        Self::Czech,
        Self::KoreanParticle,
        Self::Maltese,
        Self::ScottishGaelic,
    ];

    /// Rule for a language-file header value.
    #[must_use]
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }

    /// Header value of this rule.
    #[must_use]
    pub fn index(self) -> u8 {
        // ALL is in declaration order.
        self as u8
    }

    /// How many alternatives a `{P ...}` list needs under this rule.
    #[must_use]
    pub const fn form_count(self) -> usize {
        match self {
            Self::Invariant => 1,
            Self::OneOther | Self::ZeroOneOther | Self::Icelandic | Self::KoreanParticle => 2,
            Self::Latvian
            | Self::Lithuanian
            | Self::EastSlavic
            | Self::Polish
            | Self::Czech => 3,
            Self::Slovenian | Self::Maltese | Self::ScottishGaelic => 4,
            Self::Irish => 5,
        }
    }

    /// Select the form index for `count`. Only the absolute value matters.
    #[must_use]
    pub fn select(self, count: i64) -> usize {
        let n = count.unsigned_abs();
        let n10 = n % 10;
        let n100 = n % 100;
        let ends_in_one = n10 == 1 && n100 != 11;
        let teen = (10..20).contains(&n100);
        match self {
            Self::OneOther => usize::from(n != 1),
            Self::Invariant => 0,
            Self::ZeroOneOther => usize::from(n > 1),
            Self::Latvian => {
                if ends_in_one {
                    0
                } else if n != 0 {
                    1
                } else {
                    2
                }
            }
            Self::Irish => match n {
                1 => 0,
                2 => 1,
                0 | 3..=6 => 2,
                7..=10 => 3,
                _ => 4,
            },
            Self::Lithuanian => {
                if ends_in_one {
                    0
                } else if n10 >= 2 && !teen {
                    1
                } else {
                    2
                }
            }
            Self::EastSlavic => {
                if ends_in_one {
                    0
                } else if (2..=4).contains(&n10) && !teen {
                    1
                } else {
                    2
                }
            }
            Self::Polish => {
                if n == 1 {
                    0
                } else if (2..=4).contains(&n10) && !teen {
                    1
                } else {
                    2
                }
            }
            Self::Slovenian => match n100 {
                1 => 0,
                2 => 1,
                3 | 4 => 2,
                _ => 3,
            },
            Self::Icelandic => usize::from(!ends_in_one),
            Self::Czech => match n {
                1 => 0,
                2..=4 => 1,
                _ => 2,
            },
            // yeong, il, sam, yuk, chil, pal end in a consonant.
            Self::KoreanParticle => usize::from(matches!(n10, 2 | 4 | 5 | 9)),
            Self::Maltese => {
                if n == 1 {
                    0
                } else if n == 0 || (2..=10).contains(&n100) {
                    1
                } else if (11..=19).contains(&n100) {
                    2
                } else {
                    3
                }
            }
            Self::ScottishGaelic => match n {
                1 | 11 => 0,
                2 | 12 => 1,
                3..=10 | 13..=19 => 2,
                _ => 3,
            },
        }
    }

    /// Best-guess rule for an ISO code such as `"ru_RU"` or `"pt-BR"`.
    ///
    /// Unknown codes fall back to [`PluralRule::OneOther`].
    #[must_use]
    pub fn for_locale(isocode: &str) -> Self {
        let normalized = isocode.replace('-', "_");
        if normalized.eq_ignore_ascii_case("pt_BR") {
            return Self::ZeroOneOther;
        }
        let lang = normalized
            .split('_')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match lang.as_str() {
            "hu" | "ja" | "tr" | "zh" | "id" | "vi" | "th" => Self::Invariant,
            "ko" => Self::KoreanParticle,
            "fr" => Self::ZeroOneOther,
            "lv" => Self::Latvian,
            "ga" => Self::Irish,
            "lt" => Self::Lithuanian,
            "ru" | "uk" | "hr" | "be" | "sr" => Self::EastSlavic,
            "pl" => Self::Polish,
            "sl" => Self::Slovenian,
            "is" => Self::Icelandic,
            "cs" | "sk" => Self::Czech,
            "mt" => Self::Maltese,
            "gd" => Self::ScottishGaelic,
            _ => Self::OneOther,
        }
    }
}

impl fmt::Display for PluralRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?} (#{})", self.index())
    }
}
