//! Date input → ordinal show id resolution.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::dataset::Dataset;

/// Show id reported for a date with no show. Never used for lookups.
pub const SENTINEL_SHOW_ID: i64 = 1;

/// A date resolved against the track table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedShow {
    pub date: NaiveDate,
    pub show_id: i64,
    /// Whether the date matched any track row.
    pub played: bool,
}

/// The (year, month, day) triple does not name a calendar date.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{year:04}-{month:02}-{day:02} is not a calendar date")]
pub struct InvalidDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl Dataset {
    /// Resolve a (year, month, day) triple to a show.
    pub fn resolve_show(&self, year: i32, month: u32, day: u32) -> Result<ResolvedShow, InvalidDate> {
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or(InvalidDate { year, month, day })?;
        Ok(self.resolve_date(date))
    }

    /// Resolve a calendar date by exact match. Every row of a show carries the
    /// same id, so the first match is as good as any.
    pub fn resolve_date(&self, date: NaiveDate) -> ResolvedShow {
        match self.tracks().iter().find(|t| t.date == date) {
            Some(track) => ResolvedShow {
                date,
                show_id: track.show_id,
                played: true,
            },
            None => {
                log::debug!("No show on {date}");
                ResolvedShow {
                    date,
                    show_id: SENTINEL_SHOW_ID,
                    played: false,
                }
            }
        }
    }
}

// YYYY-MM-DD
static ISO_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<year>\d{4})-(?P<month>\d{1,2})-(?P<day>\d{1,2})$").unwrap()
});

// M/D/YYYY, month first like the show listings
static US_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<month>\d{1,2})/(?P<day>\d{1,2})/(?P<year>\d{4})$").unwrap()
});

/// Split user date input into numeric (year, month, day) components.
///
/// Only the shape is checked here: `2020-02-30` splits fine and is rejected
/// later by [`Dataset::resolve_show`].
pub fn parse_date_input(input: &str) -> Option<(i32, u32, u32)> {
    let input = input.trim();
    let caps = ISO_DATE_RE
        .captures(input)
        .or_else(|| US_DATE_RE.captures(input))?;
    let year = caps["year"].parse().ok()?;
    let month = caps["month"].parse().ok()?;
    let day = caps["day"].parse().ok()?;
    Some((year, month, day))
}
