//! Monday-anchored week bucketing.
//!
//! Every weekly count in the crate goes through [`week_key`]. The key is the
//! Monday that opens the week, computed directly from the weekday index
//! (Monday = 0 ... Sunday = 6), so Sunday always lands in the week that
//! started six days earlier and year boundaries need no special handling.
//! SQL range filters are derived from [`WeekKey::monday`] and
//! [`WeekKey::sunday`] rather than reimplemented in queries.

use crate::errors::{Error, Result};
use chrono::{Datelike, Days, IsoWeek, NaiveDate};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

const KEY_FORMAT: &str = "%Y-%m-%d";

/// Identifies one Monday-to-Sunday week by its Monday.
///
/// Ordering follows the calendar. Renders as the ISO date of the Monday
/// (e.g. `2024-11-04`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct WeekKey(NaiveDate);

/// Returns the key of the week containing `date`.
#[must_use]
pub fn week_key(date: NaiveDate) -> WeekKey {
    let offset = u64::from(date.weekday().num_days_from_monday());
    // No Monday to step back to near NaiveDate::MIN; clamp so the function stays total.
    WeekKey(date.checked_sub_days(Days::new(offset)).unwrap_or(NaiveDate::MIN))
}

impl WeekKey {
    /// First day of the week.
    #[must_use]
    pub const fn monday(self) -> NaiveDate {
        self.0
    }

    /// Last day of the week.
    #[must_use]
    pub fn sunday(self) -> NaiveDate {
        self.0.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX)
    }

    /// Whether `date` belongs to this week.
    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        week_key(date) == self
    }

    /// The following week.
    #[must_use]
    pub fn next(self) -> Self {
        week_key(self.0.checked_add_days(Days::new(7)).unwrap_or(NaiveDate::MAX))
    }

    /// The preceding week.
    #[must_use]
    pub fn previous(self) -> Self {
        week_key(self.0.checked_sub_days(Days::new(7)).unwrap_or(NaiveDate::MIN))
    }

    /// ISO-8601 year and week number, for display only.
    #[must_use]
    pub fn iso_week(self) -> IsoWeek {
        self.0.iso_week()
    }

    /// All seven days, Monday first.
    pub fn days(self) -> impl Iterator<Item = NaiveDate> {
        self.0.iter_days().take(7)
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(KEY_FORMAT))
    }
}

impl FromStr for WeekKey {
    type Err = Error;

    /// Parses an ISO date; any day of the week normalises to its Monday.
    fn from_str(s: &str) -> Result<Self> {
        NaiveDate::parse_from_str(s.trim(), KEY_FORMAT)
            .map(week_key)
            .map_err(|e| Error::validation(format!("Invalid week key '{s}': {e}")))
    }
}

impl From<WeekKey> for String {
    fn from(key: WeekKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for WeekKey {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}
