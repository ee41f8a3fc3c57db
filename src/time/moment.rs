//! Moment - calendar instant used as a record key

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};

use crate::{Error, Result};

use super::Period;

/// Token that resolves to the current instant wherever a moment is expected.
pub const NOW_TOKEN: &str = "now";

const SECONDS_PER_DAY: f64 = 86_400.0;
const DATE_FORMAT: &str = "%m/%d/%Y";

/// Calendar instant at whole-second resolution.
///
/// The text form is `MM/DD/YYYY@HH:MM:SS.s`; fractional seconds are accepted
/// on input and truncated, so the stored value always round-trips. Ordering
/// and equality follow the underlying timestamp exactly, which makes a
/// `Moment` usable as a unique map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Moment(DateTime<Utc>);

impl Moment {
    /// The current instant, truncated to whole seconds.
    #[must_use]
    pub fn now() -> Self {
        let now = Utc::now();
        DateTime::from_timestamp(now.timestamp(), 0).map_or(Self(now), Self)
    }

    /// Seconds since the Unix epoch.
    #[must_use]
    pub fn timestamp(&self) -> i64 {
        self.0.timestamp()
    }

    /// Parse a moment token, the literal [`NOW_TOKEN`] (case-insensitive)
    /// resolving to the current instant.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedToken`] if the token is neither the now
    /// token nor a valid `MM/DD/YYYY@HH:MM:SS.s` literal.
    pub fn parse_with_now(token: &str) -> Result<Self> {
        if token.eq_ignore_ascii_case(NOW_TOKEN) {
            return Ok(Self::now());
        }
        token.parse()
    }
}

impl fmt::Display for Moment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let time = Period::from_seconds(f64::from(self.0.time().num_seconds_from_midnight()));
        write!(f, "{}@{}", self.0.format(DATE_FORMAT), time)
    }
}

impl FromStr for Moment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || Error::MalformedToken {
            context: "moment".to_string(),
            token: s.to_string(),
        };
        let (day, time) = s.split_once('@').ok_or_else(malformed)?;
        let date = NaiveDate::parse_from_str(day, DATE_FORMAT).map_err(|_| malformed())?;
        let period: Period = time.parse().map_err(|_| malformed())?;
        let seconds = period.seconds();
        if !(0.0..SECONDS_PER_DAY).contains(&seconds) {
            return Err(malformed());
        }
        // truncate sub-second input; moments live at whole-second resolution
        let time = NaiveTime::from_num_seconds_from_midnight_opt(seconds as u32, 0)
            .ok_or_else(malformed)?;
        Ok(Self(date.and_time(time).and_utc()))
    }
}
