#![forbid(unsafe_code)]

//! Private-use control characters embedded in rendered text.
//!
//! The drawing layer interprets these to switch font size and text colour.
//! They occupy a small block at the start of the Unicode private-use area
//! so they survive any UTF-8 round trip but never collide with printable
//! text.

/// First codepoint of the control block. Also marks an encoded
/// game-script string.
pub const CONTROL_START: u32 = 0xE000;
/// One past the last codepoint of the control block.
pub const CONTROL_END: u32 = 0xE020 + 1;

const FIRST_COLOUR: u32 = 0xE010;

/// Named text colours, in palette order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Colour {
    Blue,
    Silver,
    Gold,
    Red,
    Purple,
    LightBrown,
    Orange,
    Green,
    Yellow,
    DarkGreen,
    Cream,
    Brown,
    White,
    LightBlue,
    Grey,
    DarkBlue,
    Black,
}

impl Colour {
    /// All colours, in palette order.
    pub const ALL: [Self; 17] = [
        Self::Blue,
        Self::Silver,
        Self::Gold,
        Self::Red,
        Self::Purple,
        Self::LightBrown,
        Self::Orange,
        Self::Green,
        Self::Yellow,
        Self::DarkGreen,
        Self::Cream,
        Self::Brown,
        Self::White,
        Self::LightBlue,
        Self::Grey,
        Self::DarkBlue,
        Self::Black,
    ];

    /// Directive name used in templates, e.g. `LTBLUE`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Blue => "BLUE",
            Self::Silver => "SILVER",
            Self::Gold => "GOLD",
            Self::Red => "RED",
            Self::Purple => "PURPLE",
            Self::LightBrown => "LTBROWN",
            Self::Orange => "ORANGE",
            Self::Green => "GREEN",
            Self::Yellow => "YELLOW",
            Self::DarkGreen => "DKGREEN",
            Self::Cream => "CREAM",
            Self::Brown => "BROWN",
            Self::White => "WHITE",
            Self::LightBlue => "LTBLUE",
            Self::Grey => "GREY",
            Self::DarkBlue => "DKBLUE",
            Self::Black => "BLACK",
        }
    }

    /// Look up a colour by its directive name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

/// A control instruction for the drawing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlCode {
    /// Marks the start of an encoded game-script string.
    Encoded,
    TinyFont,
    BigFont,
    NormalFont,
    MonoFont,
    PushColour,
    PopColour,
    Colour(Colour),
}

impl ControlCode {
    /// The codepoint representing this control.
    #[must_use]
    pub const fn to_char(self) -> char {
        let cp = match self {
            Self::Encoded => 0xE000,
            Self::TinyFont => 0xE001,
            Self::BigFont => 0xE002,
            Self::NormalFont => 0xE003,
            Self::MonoFont => 0xE004,
            Self::PushColour => 0xE00E,
            Self::PopColour => 0xE00F,
            Self::Colour(c) => FIRST_COLOUR + c as u32,
        };
        // Every arm above is a private-use scalar value.
        match char::from_u32(cp) {
            Some(ch) => ch,
            None => char::REPLACEMENT_CHARACTER,
        }
    }

    /// Decode a control character, if `ch` is one.
    #[must_use]
    pub fn from_char(ch: char) -> Option<Self> {
        let cp = ch as u32;
        Some(match cp {
            0xE000 => Self::Encoded,
            0xE001 => Self::TinyFont,
            0xE002 => Self::BigFont,
            0xE003 => Self::NormalFont,
            0xE004 => Self::MonoFont,
            0xE00E => Self::PushColour,
            0xE00F => Self::PopColour,
            _ if (FIRST_COLOUR..CONTROL_END).contains(&cp) => {
                Self::Colour(Colour::ALL[(cp - FIRST_COLOUR) as usize])
            }
            _ => return None,
        })
    }
}

/// Whether `ch` lies in the control block, assigned or not.
#[must_use]
pub fn is_control_char(ch: char) -> bool {
    (CONTROL_START..CONTROL_END).contains(&(ch as u32))
}

/// Remove every control character from `text`.
#[must_use]
pub fn strip_controls(text: &str) -> String {
    text.chars().filter(|&c| !is_control_char(c)).collect()
}
