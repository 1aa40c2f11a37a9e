#![forbid(unsafe_code)]

//! Parameter arguments.
//!
//! `--param` takes `kind:value` with kind `u`, `i`, `s`, `id` or `date`
//! (`YYYY-MM-DD`, or a raw day count). A bare value is an unsigned or
//! signed integer when it parses as one and text otherwise.

use lingo_core::{GameDate, Parameter, StringId};
use lingo_format::YearMonthDay;

use crate::error::{CliError, Result};

pub fn parse_param(arg: &str) -> Result<Parameter> {
    let bad = |what: &str| CliError::invalid(format!("parameter '{arg}': {what}"));
    let Some((kind, value)) = arg.split_once(':') else {
        return Ok(bare(arg));
    };
    Ok(match kind {
        "u" => Parameter::Unsigned(value.parse().map_err(|_| bad("not an unsigned integer"))?),
        "i" => Parameter::Signed(value.parse().map_err(|_| bad("not an integer"))?),
        "s" => Parameter::Text(value.to_string()),
        "id" => Parameter::StringRef(
            value
                .parse::<StringId>()
                .map_err(|err| CliError::invalid(err.to_string()))?,
        ),
        "date" => Parameter::Date(parse_date(value).ok_or_else(|| bad("not a date"))?),
        _ => bare(arg),
    })
}

fn bare(arg: &str) -> Parameter {
    if let Ok(n) = arg.parse::<u64>() {
        Parameter::Unsigned(n)
    } else if let Ok(n) = arg.parse::<i64>() {
        Parameter::Signed(n)
    } else {
        Parameter::Text(arg.to_string())
    }
}

fn parse_date(value: &str) -> Option<GameDate> {
    if let Ok(days) = value.parse::<i32>() {
        return Some(GameDate(days));
    }
    let mut parts = value.splitn(3, '-');
    let year = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    let day = parts.next()?.parse().ok()?;
    YearMonthDay::to_date(year, month.checked_sub(1)?, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_values() {
        assert_eq!(parse_param("u:7").ok(), Some(Parameter::Unsigned(7)));
        assert_eq!(parse_param("i:-7").ok(), Some(Parameter::Signed(-7)));
        assert_eq!(parse_param("s:a:b").ok(), Some(Parameter::Text("a:b".into())));
        assert_eq!(
            parse_param("id:0x0801").ok(),
            Some(Parameter::StringRef(StringId::from_raw(0x0801)))
        );
        assert_eq!(
            parse_param("date:1950-01-01").ok(),
            Some(Parameter::Date(GameDate(712_223)))
        );
    }

    #[test]
    fn bare_values() {
        assert_eq!(parse_param("42").ok(), Some(Parameter::Unsigned(42)));
        assert_eq!(parse_param("-42").ok(), Some(Parameter::Signed(-42)));
        assert_eq!(parse_param("Paris").ok(), Some(Parameter::Text("Paris".into())));
        assert_eq!(parse_param("x:y").ok(), Some(Parameter::Text("x:y".into())));
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert_eq!(parse_param("u:-1").map_err(|e| e.exit_code()).err(), Some(2));
        assert!(parse_param("date:1950-13-01").is_err());
        assert!(parse_param("id:0x1FFFF").is_err());
    }
}
