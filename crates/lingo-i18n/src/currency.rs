#![forbid(unsafe_code)]

//! Currency display specifications.

use serde::{Deserialize, Serialize};

/// Where the currency symbol goes relative to the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolPosition {
    #[default]
    Prefix,
    Suffix,
    Both,
}

impl SymbolPosition {
    #[must_use]
    pub const fn has_prefix(self) -> bool {
        !matches!(self, Self::Suffix)
    }

    #[must_use]
    pub const fn has_suffix(self) -> bool {
        !matches!(self, Self::Prefix)
    }
}

/// How amounts of money are displayed.
///
/// Amounts are stored in the base currency (pounds sterling) and multiplied
/// by `rate` before formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencySpec {
    /// Three-letter code, informational only.
    pub code: String,
    /// Exchange rate from the base currency.
    pub rate: u16,
    /// Digit group separator; empty means "use the language's".
    pub separator: String,
    pub prefix: String,
    pub suffix: String,
    pub symbol_pos: SymbolPosition,
}

impl Default for CurrencySpec {
    fn default() -> Self {
        builtin_currency("GBP").unwrap_or_else(|| Self::new("GBP", 1, "\u{A3}", "", SymbolPosition::Prefix))
    }
}

impl CurrencySpec {
    fn new(code: &str, rate: u16, prefix: &str, suffix: &str, symbol_pos: SymbolPosition) -> Self {
        Self {
            code: code.to_string(),
            rate,
            separator: String::new(),
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
            symbol_pos,
        }
    }
}

const NBSP: &str = "\u{A0}";

/// Look up one of the built-in currencies by code, ignoring case.
#[must_use]
pub fn builtin_currency(code: &str) -> Option<CurrencySpec> {
    use SymbolPosition::{Prefix, Suffix};

    let code = code.to_ascii_uppercase();
    let (rate, prefix, suffix, pos) = match code.as_str() {
        "GBP" => (1, "\u{A3}".to_string(), String::new(), Prefix),
        "USD" => (2, "$".to_string(), String::new(), Prefix),
        "EUR" => (2, "\u{20AC}".to_string(), String::new(), Prefix),
        "JPY" => (220, "\u{A5}".to_string(), String::new(), Prefix),
        "CHF" => (2, format!("CHF{NBSP}"), String::new(), Prefix),
        "CZK" => (41, String::new(), format!("{NBSP}K\u{10D}"), Suffix),
        "DKK" => (11, String::new(), format!("{NBSP}kr"), Suffix),
        "HUF" => (378, String::new(), format!("{NBSP}Ft"), Suffix),
        "ISK" => (130, String::new(), format!("{NBSP}Kr"), Suffix),
        "NOK" => (12, String::new(), format!("{NBSP}Kr"), Suffix),
        "PLN" => (6, String::new(), format!("{NBSP}z\u{142}"), Suffix),
        "RON" => (5, String::new(), format!("{NBSP}Lei"), Suffix),
        "RUR" => (50, String::new(), format!("{NBSP}p"), Suffix),
        "SEK" => (13, String::new(), format!("{NBSP}Kr"), Suffix),
        "TRY" => (3, String::new(), format!("{NBSP}TL"), Suffix),
        "BRL" => (4, format!("R${NBSP}"), String::new(), Prefix),
        "KRW" => (1850, "\u{20A9}".to_string(), String::new(), Prefix),
        "ZAR" => (13, format!("R{NBSP}"), String::new(), Prefix),
        "GEL" => (3, String::new(), format!("{NBSP}GEL"), Suffix),
        "IRR" => (4901, String::new(), format!("{NBSP}Rls"), Suffix),
        _ => return None,
    };
    Some(CurrencySpec::new(&code, rate, &prefix, &suffix, pos))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_pounds() {
        let spec = CurrencySpec::default();
        assert_eq!(spec.code, "GBP");
        assert_eq!(spec.rate, 1);
        assert_eq!(spec.prefix, "£");
    }

    #[test]
    fn lookup_ignores_case() {
        let spec = builtin_currency("sek").expect("known currency");
        assert_eq!(spec.symbol_pos, SymbolPosition::Suffix);
        assert_eq!(spec.suffix, "\u{A0}Kr");
        assert!(builtin_currency("XYZ").is_none());
    }

    #[test]
    fn symbol_positions() {
        assert!(SymbolPosition::Both.has_prefix() && SymbolPosition::Both.has_suffix());
        assert!(!SymbolPosition::Suffix.has_prefix());
        assert!(!SymbolPosition::Prefix.has_suffix());
    }
}
