//! Locale-aware date rendering for project timestamps and schedule dates.
//!
//! Inputs that are empty or cannot be read as a date render as an empty
//! string; [`DateDisplay`] substitutes a placeholder for those. All values
//! are rendered in UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use tracing::debug;

/// Something that may denote a point in time.
pub trait AsInstant {
    fn instant(&self) -> Option<DateTime<Utc>>;
}

impl AsInstant for DateTime<Utc> {
    fn instant(&self) -> Option<DateTime<Utc>> {
        Some(*self)
    }
}

impl AsInstant for str {
    fn instant(&self) -> Option<DateTime<Utc>> {
        let s = self.trim();
        if s.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(dt.and_utc());
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }
}

impl AsInstant for String {
    fn instant(&self) -> Option<DateTime<Utc>> {
        self.as_str().instant()
    }
}

impl<T: AsInstant> AsInstant for Option<T> {
    fn instant(&self) -> Option<DateTime<Utc>> {
        self.as_ref().and_then(AsInstant::instant)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Locale {
    #[default]
    EnUs,
    EnGb,
    /// Any locale without its own patterns renders ISO 8601.
    Iso,
}

impl Locale {
    pub fn from_tag(tag: &str) -> Locale {
        match tag.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "en-us" | "en" => Locale::EnUs,
            "en-gb" => Locale::EnGb,
            other => {
                debug!(locale = other, "no date patterns for locale, using ISO 8601");
                Locale::Iso
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DateFormat {
    #[default]
    Short,
    Medium,
    Long,
}

fn pattern(locale: Locale, format: DateFormat) -> &'static str {
    match (locale, format) {
        (Locale::EnUs, DateFormat::Short) => "%m/%d/%Y",
        (Locale::EnUs, DateFormat::Medium) => "%b %-d, %Y",
        (Locale::EnUs, DateFormat::Long) => "%A, %B %-d, %Y",
        (Locale::EnGb, DateFormat::Short) => "%d/%m/%Y",
        (Locale::EnGb, DateFormat::Medium) => "%-d %b %Y",
        (Locale::EnGb, DateFormat::Long) => "%A %-d %B %Y",
        (Locale::Iso, _) => "%Y-%m-%d",
    }
}

pub fn format_date(input: &(impl AsInstant + ?Sized), locale: Locale, format: DateFormat) -> String {
    input
        .instant()
        .map(|dt| dt.format(pattern(locale, format)).to_string())
        .unwrap_or_default()
}

pub fn format_date_time(
    input: &(impl AsInstant + ?Sized),
    locale: Locale,
    include_time: bool,
) -> String {
    if !include_time {
        return format_date(input, locale, DateFormat::Short);
    }
    let pattern = match locale {
        Locale::EnUs => "%m/%d/%Y, %I:%M %p",
        Locale::EnGb => "%d/%m/%Y, %H:%M",
        Locale::Iso => "%Y-%m-%d %H:%M",
    };
    input
        .instant()
        .map(|dt| dt.format(pattern).to_string())
        .unwrap_or_default()
}

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const MONTH: i64 = 30 * DAY;

/// Coarse age of `input` as seen at `now`. Anything a month or older is
/// shown as a short en-US date instead.
pub fn relative_time(input: &(impl AsInstant + ?Sized), now: DateTime<Utc>) -> String {
    let Some(dt) = input.instant() else {
        return String::new();
    };
    let seconds = (now - dt).num_seconds();
    if seconds < MINUTE {
        "Just now".to_owned()
    } else if seconds < HOUR {
        format!("{} minutes ago", seconds / MINUTE)
    } else if seconds < DAY {
        format!("{} hours ago", seconds / HOUR)
    } else if seconds < MONTH {
        format!("{} days ago", seconds / DAY)
    } else {
        format_date(&dt, Locale::EnUs, DateFormat::Short)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DisplayFormat {
    #[default]
    Short,
    Medium,
    Long,
    Relative,
    #[value(name = "datetime")]
    DateTime,
}

/// Renders a date for display, falling back to a placeholder when the
/// value is missing or unreadable.
#[derive(Clone, Debug)]
pub struct DateDisplay {
    pub format: DisplayFormat,
    pub locale: Locale,
    pub fallback: String,
}

impl Default for DateDisplay {
    fn default() -> Self {
        DateDisplay {
            format: DisplayFormat::Short,
            locale: Locale::EnUs,
            fallback: "--".to_owned(),
        }
    }
}

impl DateDisplay {
    pub fn render(&self, input: &(impl AsInstant + ?Sized), now: DateTime<Utc>) -> String {
        let formatted = match self.format {
            DisplayFormat::Short => format_date(input, self.locale, DateFormat::Short),
            DisplayFormat::Medium => format_date(input, self.locale, DateFormat::Medium),
            DisplayFormat::Long => format_date(input, self.locale, DateFormat::Long),
            DisplayFormat::Relative => relative_time(input, now),
            DisplayFormat::DateTime => format_date_time(input, self.locale, true),
        };
        if formatted.is_empty() {
            self.fallback.clone()
        } else {
            formatted
        }
    }
}
