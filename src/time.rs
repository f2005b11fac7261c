//! Wall-clock time representation.
//!
//! Schedule times are day-local `HH:MM` strings with no date or timezone
//! component — the date-only model lives in the compiler's inputs.
//! [`ClockTime`] stores minutes since midnight and serializes as the
//! `HH:MM` string the data-access collaborator exchanges.
//!
//! # Range
//! `00:00..=24:00`. The upper bound `24:00` is a valid *end* time
//! ("works until end of day") and lets an hour-granular range like
//! 23:00–24:00 be expressed without wrapping.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// A day-local wall-clock time, minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u16);

impl ClockTime {
    /// Minutes in a full day; also the maximum representable value (`24:00`).
    pub const MINUTES_PER_DAY: u16 = 24 * 60;

    /// Midnight (`00:00`).
    pub const MIDNIGHT: ClockTime = ClockTime(0);

    /// End of day (`24:00`).
    pub const END_OF_DAY: ClockTime = ClockTime(Self::MINUTES_PER_DAY);

    /// Creates a time from hour and minute components.
    ///
    /// Returns `None` outside `00:00..=24:00` (`24:00` only as `24, 0`).
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        let total = u16::from(hour) * 60 + u16::from(minute);
        if minute < 60 && total <= Self::MINUTES_PER_DAY {
            Some(ClockTime(total))
        } else {
            None
        }
    }

    /// Creates an on-the-hour time. Returns `None` for hours above 24.
    pub fn from_hour(hour: u8) -> Option<Self> {
        Self::new(hour, 0)
    }

    /// Creates a time from total minutes since midnight.
    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes <= Self::MINUTES_PER_DAY).then_some(ClockTime(minutes))
    }

    /// Hour component (0..=24).
    #[inline]
    pub fn hour(&self) -> u8 {
        (self.0 / 60) as u8
    }

    /// Minute component (0..=59).
    #[inline]
    pub fn minute(&self) -> u8 {
        (self.0 % 60) as u8
    }

    /// Total minutes since midnight.
    #[inline]
    pub fn total_minutes(&self) -> u16 {
        self.0
    }

    /// Whether this time falls exactly on the hour.
    #[inline]
    pub fn is_on_hour(&self) -> bool {
        self.0 % 60 == 0
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ScheduleError::InvalidTime {
            value: s.to_string(),
        };

        let (h, m) = s.split_once(':').ok_or_else(invalid)?;
        if h.len() != 2 || m.len() != 2 {
            return Err(invalid());
        }
        let hour: u8 = h.parse().map_err(|_| invalid())?;
        let minute: u8 = m.parse().map_err(|_| invalid())?;
        ClockTime::new(hour, minute).ok_or_else(invalid)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = ScheduleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(t: ClockTime) -> String {
        t.to_string()
    }
}
