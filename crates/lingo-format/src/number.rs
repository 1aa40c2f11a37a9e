#![forbid(unsafe_code)]

//! Integer, decimal, hexadecimal and byte-size formatting.

/// Largest number of fractional digits `{DECIMAL}` honours.
pub const MAX_FRACTIONAL_DIGITS: u32 = 19;
/// Largest width `{ZEROFILL_NUM}` honours.
pub const MAX_ZEROFILL: u32 = 20;

const IEC_PREFIXES: [&str; 7] = ["", "Ki", "Mi", "Gi", "Ti", "Pi", "Ei"];
const NBSP: char = '\u{A0}';

/// Separators used when formatting numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Separators<'a> {
    /// Inserted between groups of three integer digits.
    pub group: &'a str,
    /// Between the integer and fractional digits.
    pub decimal: &'a str,
}

impl Separators<'_> {
    /// No grouping, `.` as decimal separator.
    pub const PLAIN: Separators<'static> = Separators {
        group: "",
        decimal: ".",
    };
}

/// Format `value` with at least `min_digits` integer digits (zero padded)
/// and `fractional_digits` digits after the decimal separator. The value is
/// in units of `10^-fractional_digits`.
///
/// ```
/// use lingo_format::number::{Separators, format_number};
///
/// let seps = Separators { group: ",", decimal: "." };
/// assert_eq!(format_number(-1234567, 1, 2, seps), "-12,345.67");
/// assert_eq!(format_number(42, 5, 0, Separators::PLAIN), "00042");
/// ```
#[must_use]
pub fn format_number(value: i64, min_digits: u32, fractional_digits: u32, seps: Separators<'_>) -> String {
    let fractional = fractional_digits.min(MAX_FRACTIONAL_DIGITS) as usize;
    let min_digits = min_digits.clamp(1, MAX_ZEROFILL) as usize;

    let mut digits = value.unsigned_abs().to_string();
    let width = min_digits + fractional;
    if digits.len() < width {
        digits.insert_str(0, &"0".repeat(width - digits.len()));
    }
    let (int_part, frac_part) = digits.split_at(digits.len() - fractional);

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * seps.group.len() + 2);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push_str(seps.group);
        }
        out.push(ch);
    }
    if !frac_part.is_empty() {
        out.push_str(seps.decimal);
        out.push_str(frac_part);
    }
    out
}

/// `0x` followed by upper-case hex digits.
#[must_use]
pub fn format_hex(value: u64) -> String {
    format!("0x{value:X}")
}

/// A byte count with an IEC prefix: `1023\u{A0}B`, `1.50\u{A0}KiB`,
/// `12.3\u{A0}MiB`, `512\u{A0}GiB`.
#[must_use]
pub fn format_bytes(bytes: u64, decimal: &str) -> String {
    let mut number = bytes;
    let mut prefix = 1;
    while number >= 1024 * 1024 {
        number /= 1024;
        prefix += 1;
    }

    let mut out = if number < 1024 {
        prefix = 0;
        number.to_string()
    } else if number < 1024 * 10 {
        format!("{}{decimal}{:02}", number / 1024, (number % 1024) * 100 / 1024)
    } else if number < 1024 * 100 {
        format!("{}{decimal}{}", number / 1024, (number % 1024) * 10 / 1024)
    } else {
        (number / 1024).to_string()
    };
    out.push(NBSP);
    out.push_str(IEC_PREFIXES[prefix.min(IEC_PREFIXES.len() - 1)]);
    out.push('B');
    out
}
