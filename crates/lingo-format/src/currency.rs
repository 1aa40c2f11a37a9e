#![forbid(unsafe_code)]

//! Money amounts in the configured currency.

use lingo_core::{Colour, ControlCode};
use lingo_i18n::CurrencySpec;

use crate::number::{Separators, format_number};

/// Format `amount` (in the base currency) with `spec`.
///
/// Negative amounts are wrapped in a red colour switch that is popped
/// after the suffix. With `compact` set, amounts of a million and above
/// are shown in thousands (`k`) and amounts near a billion and above in
/// millions (`M`).
#[must_use]
pub fn format_currency(amount: i64, spec: &CurrencySpec, group: &str, compact: bool) -> String {
    let mut out = String::new();
    let mut number = i128::from(amount) * i128::from(spec.rate);
    let negative = number < 0;
    if negative {
        out.push(ControlCode::Colour(Colour::Red).to_char());
        out.push('-');
        number = -number;
    }
    if spec.symbol_pos.has_prefix() {
        out.push_str(&spec.prefix);
    }

    let mut multiplier = "";
    if compact {
        if number >= 1_000_000_000 - 500 {
            number = (number + 500_000) / 1_000_000;
            multiplier = "\u{A0}M";
        } else if number >= 1_000_000 {
            number = (number + 500) / 1000;
            multiplier = "\u{A0}k";
        }
    }

    let seps = Separators { group, decimal: "" };
    let shown = i64::try_from(number).unwrap_or(i64::MAX);
    out.push_str(&format_number(shown, 1, 0, seps));
    out.push_str(multiplier);

    if spec.symbol_pos.has_suffix() {
        out.push_str(&spec.suffix);
    }
    if negative {
        out.push(ControlCode::PopColour.to_char());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingo_i18n::builtin_currency;

    fn pounds() -> CurrencySpec {
        CurrencySpec::default()
    }

    #[test]
    fn long_form_groups_digits() {
        assert_eq!(format_currency(1_234_567, &pounds(), ",", false), "\u{A3}1,234,567");
        assert_eq!(format_currency(0, &pounds(), ",", false), "\u{A3}0");
    }

    #[test]
    fn negative_amounts_are_red() {
        let red = ControlCode::Colour(Colour::Red).to_char();
        let pop = ControlCode::PopColour.to_char();
        assert_eq!(
            format_currency(-50, &pounds(), ",", false),
            format!("{red}-\u{A3}50{pop}")
        );
    }

    #[test]
    fn compact_rounding() {
        assert_eq!(format_currency(999_999, &pounds(), ",", true), "\u{A3}999,999");
        assert_eq!(format_currency(1_000_000, &pounds(), ",", true), "\u{A3}1,000\u{A0}k");
        assert_eq!(format_currency(1_499_500, &pounds(), ",", true), "\u{A3}1,500\u{A0}k");
        // Never "1,000,000 k".
        assert_eq!(format_currency(999_999_500, &pounds(), ",", true), "\u{A3}1,000\u{A0}M");
        assert_eq!(format_currency(2_500_000_000, &pounds(), ",", true), "\u{A3}2,500\u{A0}M");
    }

    #[test]
    fn rate_and_suffix() {
        let sek = builtin_currency("SEK").expect("known currency");
        assert_eq!(format_currency(1000, &sek, ".", false), "13.000\u{A0}Kr");
    }

    #[test]
    fn huge_rates_do_not_overflow() {
        let krw = builtin_currency("KRW").expect("known currency");
        let text = format_currency(i64::MAX, &krw, "", false);
        assert!(text.ends_with(&i64::MAX.to_string()));
    }
}
