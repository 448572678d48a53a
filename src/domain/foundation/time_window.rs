//! Time window framework.
//!
//! Resolves a reference date and window length into a concrete date range
//! and filters dated records into it. Short history never fails here;
//! detectors downstream mark their signal groups incomplete instead.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Supported trailing window lengths.
///
/// Assignments are computed independently for the 30-day and 180-day
/// windows; there is no cross-window influence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum WindowDays {
    Thirty,
    OneEighty,
}

impl WindowDays {
    /// Returns the window length in days.
    pub fn as_i64(&self) -> i64 {
        match self {
            WindowDays::Thirty => 30,
            WindowDays::OneEighty => 180,
        }
    }

    /// Returns the window length in months (30-day months).
    pub fn as_months(&self) -> f64 {
        self.as_i64() as f64 / 30.0
    }
}

impl TryFrom<u32> for WindowDays {
    type Error = ValidationError;

    fn try_from(days: u32) -> Result<Self, Self::Error> {
        match days {
            30 => Ok(WindowDays::Thirty),
            180 => Ok(WindowDays::OneEighty),
            other => Err(ValidationError::invalid_format(
                "window_days",
                format!("supported windows are 30 and 180 days, got {}", other),
            )),
        }
    }
}

impl From<WindowDays> for u32 {
    fn from(window: WindowDays) -> Self {
        window.as_i64() as u32
    }
}

impl fmt::Display for WindowDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d", self.as_i64())
    }
}

/// A record that occurred on a calendar date.
pub trait Dated {
    fn occurred_on(&self) -> NaiveDate;
}

/// A concrete trailing date range derived from a reference date.
///
/// Derived, never persisted independently; the assignment row carries a
/// copy of the resolved range for audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub reference_date: NaiveDate,
    pub window_days: WindowDays,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl TimeWindow {
    /// Resolves a reference date and window length into a date range.
    ///
    /// The range is `(reference_date - window_days, reference_date]`:
    /// the start date is exclusive, the end date inclusive.
    pub fn resolve(reference_date: NaiveDate, window_days: WindowDays) -> Self {
        Self {
            reference_date,
            window_days,
            start_date: reference_date - Duration::days(window_days.as_i64()),
            end_date: reference_date,
        }
    }

    /// Checks whether a date falls inside the window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date > self.start_date && date <= self.end_date
    }

    /// Returns the subset of records that fall inside the window.
    ///
    /// If available history is shorter than the window this simply
    /// returns what exists; completeness is the detectors' concern.
    pub fn filter<'a, T: Dated>(&self, records: &'a [T]) -> Vec<&'a T> {
        records
            .iter()
            .filter(|r| self.contains(r.occurred_on()))
            .collect()
    }

    /// Returns a window with the same end date but a longer trailing
    /// lookback, used by detectors that need more history than the
    /// assignment window itself (e.g. recurrence detection).
    pub fn with_lookback_days(&self, days: i64) -> TimeWindow {
        TimeWindow {
            reference_date: self.reference_date,
            window_days: self.window_days,
            start_date: self.end_date - Duration::days(days),
            end_date: self.end_date,
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ending {}",
            self.window_days, self.end_date
        )
    }
}
