//! Crate error type.
//!
//! The core logic is pure and reports almost everything through normal
//! return values: absence as `Option`, scheduling problems as collected
//! [`validation`](crate::validation) reports, double-bookings as conflict
//! flags on output items. `ScheduleError` only covers failures to construct
//! the vocabulary types in the first place (malformed time or weekday input
//! from the data-access layer).

use thiserror::Error;

/// Errors produced while building schedule inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// A wall-clock time string was not `HH:MM` within `00:00..=24:00`.
    #[error("invalid wall-clock time '{value}': expected HH:MM between 00:00 and 24:00")]
    InvalidTime { value: String },

    /// A weekday name was not one of the seven lowercase English names.
    #[error("invalid weekday name '{0}'")]
    InvalidWeekday(String),
}
