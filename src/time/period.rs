//! Period - signed duration at tenth-of-a-second resolution

use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

use crate::{Error, Result};

const SECONDS_PER_MINUTE: i64 = 60;
const MINUTES_PER_HOUR: i64 = 60;
const SECONDS_PER_HOUR: i64 = SECONDS_PER_MINUTE * MINUTES_PER_HOUR;

/// Signed duration of elapsed time.
///
/// Stored as fractional seconds; the text form is fixed-width `HH:MM:SS.s`
/// (one decimal digit), so values written to disk are faithful at tenth
/// resolution. Supports addition and subtraction with other periods, scalar
/// multiply/divide, and total comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Period {
    seconds: f64,
}

impl Period {
    /// The additive identity.
    pub const ZERO: Self = Self { seconds: 0.0 };

    /// Period from raw elapsed seconds.
    #[must_use]
    pub const fn from_seconds(seconds: f64) -> Self {
        Self { seconds }
    }

    /// Period composed from hour, minute, and second components.
    #[must_use]
    pub fn from_parts(hours: i64, minutes: i64, seconds: f64) -> Self {
        Self::from_seconds(seconds + (minutes * SECONDS_PER_MINUTE + hours * SECONDS_PER_HOUR) as f64)
    }

    /// Elapsed seconds.
    #[must_use]
    pub const fn seconds(&self) -> f64 {
        self.seconds
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.seconds.abs();
        let hours = (total as i64) / SECONDS_PER_HOUR;
        let minutes = ((total as i64) / SECONDS_PER_MINUTE) % MINUTES_PER_HOUR;
        let seconds = total - ((hours * SECONDS_PER_HOUR + minutes * SECONDS_PER_MINUTE) as f64);
        let sign = if self.seconds < 0.0 { "-" } else { "" };
        write!(f, "{sign}{hours:02}:{minutes:02}:{seconds:04.1}")
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || Error::MalformedToken {
            context: "period".to_string(),
            token: s.to_string(),
        };
        let (negative, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let mut parts = body.split(':');
        let (Some(h), Some(m), Some(sec), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };
        let hours: i64 = h.parse().map_err(|_| malformed())?;
        let minutes: i64 = m.parse().map_err(|_| malformed())?;
        let seconds: f64 = sec.parse().map_err(|_| malformed())?;
        if hours < 0 || minutes < 0 || !(0.0..).contains(&seconds) {
            return Err(malformed());
        }
        let period = Self::from_parts(hours, minutes, seconds);
        Ok(if negative { -period } else { period })
    }
}

impl Add for Period {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::from_seconds(self.seconds + rhs.seconds)
    }
}

impl Sub for Period {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::from_seconds(self.seconds - rhs.seconds)
    }
}

impl Mul<f64> for Period {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::from_seconds(self.seconds * rhs)
    }
}

impl Div<f64> for Period {
    type Output = Self;
    fn div(self, rhs: f64) -> Self {
        Self::from_seconds(self.seconds / rhs)
    }
}

impl Div for Period {
    type Output = f64;
    fn div(self, rhs: Self) -> f64 {
        self.seconds / rhs.seconds
    }
}

impl Neg for Period {
    type Output = Self;
    fn neg(self) -> Self {
        Self::from_seconds(-self.seconds)
    }
}

impl AddAssign for Period {
    fn add_assign(&mut self, rhs: Self) {
        self.seconds += rhs.seconds;
    }
}

impl SubAssign for Period {
    fn sub_assign(&mut self, rhs: Self) {
        self.seconds -= rhs.seconds;
    }
}

impl MulAssign<f64> for Period {
    fn mul_assign(&mut self, rhs: f64) {
        self.seconds *= rhs;
    }
}

impl DivAssign<f64> for Period {
    fn div_assign(&mut self, rhs: f64) {
        self.seconds /= rhs;
    }
}
