#![forbid(unsafe_code)]

//! Calendar dates.
//!
//! A [`GameDate`] counts days since 0000-01-01 in the proleptic Gregorian
//! calendar. Dates are broken into parts with `chrono` and rendered
//! through the language's calendar templates, which receive the parts as
//! parameters.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use lingo_core::{GameDate, Parameter, ParameterStack};
use lingo_i18n::{Calendar, Template};

/// Days from 0000-01-01 to 0001-01-01 (year 0 is a leap year), minus the
/// one-based offset of `from_num_days_from_ce`.
const CE_OFFSET: i32 = 365;

/// A date broken into parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearMonthDay {
    pub year: i32,
    /// Zero-based month.
    pub month: u32,
    /// One-based day of month.
    pub day: u32,
}

impl YearMonthDay {
    /// Split a day count into parts; `None` outside chrono's range.
    #[must_use]
    pub fn from_date(date: GameDate) -> Option<Self> {
        let days = date.days().checked_sub(CE_OFFSET)?;
        let d = NaiveDate::from_num_days_from_ce_opt(days)?;
        Some(Self {
            year: d.year(),
            month: d.month0(),
            day: d.day(),
        })
    }

    /// The day count of a calendar date, if the date exists.
    #[must_use]
    pub fn to_date(year: i32, month: u32, day: u32) -> Option<GameDate> {
        let d = NaiveDate::from_ymd_opt(year, month.checked_add(1)?, day)?;
        d.num_days_from_ce().checked_add(CE_OFFSET).map(GameDate)
    }
}

/// The layout a date directive asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateStyle {
    /// "1st Jan 1950".
    Long,
    /// "January 1950".
    Short,
    /// "01-01-1950".
    Tiny,
    /// "1950-01-01".
    Iso,
}

impl DateStyle {
    /// The calendar template and the parameters it expects for `ymd`.
    #[must_use]
    pub fn layout(self, calendar: &Calendar, ymd: YearMonthDay) -> (Arc<Template>, ParameterStack) {
        let year = Parameter::Signed(i64::from(ymd.year));
        let month = ymd.month as usize;
        let (template, params) = match self {
            Self::Long => (
                &calendar.long,
                vec![
                    Parameter::Text(calendar.day_ordinal(ymd.day as usize).to_string()),
                    Parameter::Text(calendar.month_short(month).to_string()),
                    year,
                ],
            ),
            Self::Short => (
                &calendar.short,
                vec![Parameter::Text(calendar.month(month).to_string()), year],
            ),
            Self::Tiny | Self::Iso => (
                if self == Self::Tiny { &calendar.tiny } else { &calendar.iso },
                vec![
                    Parameter::Text(format!("{:02}", ymd.day)),
                    Parameter::Text(format!("{:02}", ymd.month + 1)),
                    year,
                ],
            ),
        };
        (Arc::clone(template), ParameterStack::from_params(params))
    }
}
