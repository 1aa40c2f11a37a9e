#![forbid(unsafe_code)]

//! Partitioned string identifiers.
//!
//! A [`StringId`] is a 16-bit handle split into a 5-bit table number and an
//! 11-bit index within that table:
//!
//! ```text
//!   15        11 10                    0
//!  +------------+-----------------------+
//!  |    tab     |         index         |
//!  +------------+-----------------------+
//! ```
//!
//! The table number decides where the template comes from. Most tables are
//! plain language-pack tables; a few ranges are reserved for dynamically
//! generated names, game-script text, and data-pack (NewGRF) text. See
//! [`StringSource`].

use std::fmt;
use std::str::FromStr;

/// Bit offset of the index part.
pub const TAB_SIZE_OFFSET: u32 = 0;
/// Number of bits of the index part.
pub const TAB_SIZE_BITS: u32 = 11;
/// Entries per table.
pub const TAB_SIZE: usize = 1 << TAB_SIZE_BITS;
/// Bit offset of the table part.
pub const TAB_COUNT_OFFSET: u32 = TAB_SIZE_BITS;
/// Number of bits of the table part.
pub const TAB_COUNT_BITS: u32 = 5;
/// Number of tables.
pub const TAB_COUNT: usize = 1 << TAB_COUNT_BITS;

/// Table holding the procedurally generated town names (upper part only).
pub const TOWN_NAME_TAB: u8 = 4;
/// First index in [`TOWN_NAME_TAB`] that is generated rather than stored.
pub const TOWN_NAME_FIRST_INDEX: u16 = 0xC0;
/// Table holding special generated names (upper part only).
pub const SPECIAL_NAME_TAB: u8 = 14;
/// First index in [`SPECIAL_NAME_TAB`] that is generated rather than stored.
pub const SPECIAL_NAME_FIRST_INDEX: u16 = 0xE4;
/// Old table for custom names; no longer produced.
pub const CUSTOM_NAME_TAB: u8 = 15;
/// Table for strings supplied by a game script.
pub const GAME_TEXT_TAB: u8 = 18;
/// Old table for converted data-pack ids; never valid at render time.
pub const CONVERTED_TAB: u8 = 26;
/// First of the three data-pack (NewGRF) tables.
pub const NEWGRF_FIRST_TAB: u8 = 28;
/// Last of the three data-pack (NewGRF) tables.
pub const NEWGRF_LAST_TAB: u8 = 30;

/// Where a [`StringId`] gets its template from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringSource {
    /// Direct lookup in the active language pack.
    LanguagePack { tab: u8, index: u16 },
    /// Generated town name; the value is the name-style index.
    TownName(u16),
    /// Generated special name (company, president, language, resolution).
    /// The value is relative to [`SPECIAL_NAME_FIRST_INDEX`].
    SpecialName(u16),
    /// Game-script supplied text.
    GameScript(u16),
    /// Data-pack supplied text; index spans all three NewGRF tables.
    NewGrf(u16),
    /// A retired range that no longer maps to any template.
    Obsolete,
}

impl StringSource {
    /// Whether this source is produced by a generator callback.
    #[must_use]
    pub const fn is_generated(self) -> bool {
        matches!(self, Self::TownName(_) | Self::SpecialName(_))
    }
}

/// Numeric handle naming a localizable message template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct StringId(u16);

impl StringId {
    /// The empty identifier; renders the "undefined string" placeholder.
    pub const NULL: Self = Self(0);
    /// Marker for "no string"; also renders the placeholder.
    pub const INVALID: Self = Self(0xFFFF);

    /// Wrap a raw 16-bit value.
    #[must_use]
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// Build an identifier from a table number and index.
    ///
    /// Out-of-range parts are masked to their field width.
    #[must_use]
    pub const fn new(tab: u8, index: u16) -> Self {
        let tab = (tab as u16) & ((1 << TAB_COUNT_BITS) - 1);
        let index = index & ((1 << TAB_SIZE_BITS) - 1);
        Self((tab << TAB_COUNT_OFFSET) | index)
    }

    /// Build a game-script identifier.
    #[must_use]
    pub const fn game_script(index: u16) -> Self {
        Self::new(GAME_TEXT_TAB, index)
    }

    /// Raw 16-bit value.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Table number.
    #[must_use]
    pub const fn tab(self) -> u8 {
        (self.0 >> TAB_COUNT_OFFSET) as u8
    }

    /// Index within the table.
    #[must_use]
    pub const fn index(self) -> u16 {
        self.0 & ((1 << TAB_SIZE_BITS) - 1)
    }

    /// Whether this is [`StringId::NULL`] or [`StringId::INVALID`].
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == Self::NULL.0 || self.0 == Self::INVALID.0
    }

    /// Whether the identifier lives in the game-script table.
    #[must_use]
    pub const fn is_game_script(self) -> bool {
        self.tab() == GAME_TEXT_TAB
    }

    /// Classify the identifier by provenance.
    #[must_use]
    pub const fn source(self) -> StringSource {
        let tab = self.tab();
        let index = self.index();
        match tab {
            TOWN_NAME_TAB if index >= TOWN_NAME_FIRST_INDEX => {
                StringSource::TownName(index - TOWN_NAME_FIRST_INDEX)
            }
            SPECIAL_NAME_TAB if index >= SPECIAL_NAME_FIRST_INDEX => {
                StringSource::SpecialName(index - SPECIAL_NAME_FIRST_INDEX)
            }
            CUSTOM_NAME_TAB | CONVERTED_TAB => StringSource::Obsolete,
            GAME_TEXT_TAB => StringSource::GameScript(index),
            NEWGRF_FIRST_TAB..=NEWGRF_LAST_TAB => {
                StringSource::NewGrf(index + (tab - NEWGRF_FIRST_TAB) as u16 * TAB_SIZE as u16)
            }
            _ => StringSource::LanguagePack { tab, index },
        }
    }
}

impl From<u16> for StringId {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl From<StringId> for u16 {
    fn from(id: StringId) -> Self {
        id.0
    }
}

impl fmt::Display for StringId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04X}", self.0)
    }
}

/// Error returned when parsing a [`StringId`] from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid string id '{0}': expected a 16-bit decimal or 0x-prefixed hex value")]
pub struct ParseStringIdError(pub String);

impl FromStr for StringId {
    type Err = ParseStringIdError;

    /// Accepts `0x1A2B`, `0X1a2b`, or decimal `6699`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parsed = match trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            Some(hex) => u16::from_str_radix(hex, 16),
            None => trimmed.parse::<u16>(),
        };
        parsed
            .map(Self)
            .map_err(|_| ParseStringIdError(s.to_string()))
    }
}
