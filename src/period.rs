// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Time intervals.
//!
//! - [`Interval<T>`]: closed interval over any [`TimeInstant`]
//! - [`Period<S>`]: scale-based alias for `Interval<Time<S>>`
//! - [`UtcPeriod`]: civil interval, used for rise/set windows

use super::{Time, TimeInstant, TimeScale};
use chrono::{DateTime, Utc};
use std::fmt;

/// An interval between two instants.
///
/// # Examples
///
/// ```
/// use almanac_cache::{Interval, JulianDate};
///
/// let start = JulianDate::new(2451545.0);
/// let end = JulianDate::new(2451546.5);
/// let period = Interval::new(start, end);
/// assert_eq!(period.duration().value(), 1.5);
/// assert!(period.contains(&JulianDate::new(2451546.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval<T: TimeInstant> {
    pub start: T,
    pub end: T,
}

/// Time-scale period alias.
pub type Period<S> = Interval<Time<S>>;

/// UTC interval alias.
pub type UtcPeriod = Interval<DateTime<Utc>>;

impl<T: TimeInstant> Interval<T> {
    /// Creates a new interval between two instants.
    pub fn new(start: T, end: T) -> Self {
        Interval { start, end }
    }

    /// `end - start`.
    pub fn duration(&self) -> T::Duration {
        self.end.difference(&self.start)
    }

    /// Whether `instant` lies in `[start, end]`, both ends inclusive.
    pub fn contains(&self, instant: &T) -> bool {
        self.start <= *instant && *instant <= self.end
    }

    /// True when `start` is strictly before `end`.
    pub fn is_forward(&self) -> bool {
        self.start < self.end
    }
}

impl<T: TimeInstant + fmt::Display> fmt::Display for Interval<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

impl<S: TimeScale> Interval<Time<S>> {
    /// Converts both endpoints to UTC.
    ///
    /// Returns `None` if either endpoint is outside chrono's range.
    pub fn to_utc(&self) -> Option<UtcPeriod> {
        Some(Interval::new(self.start.to_utc()?, self.end.to_utc()?))
    }
}

impl Interval<DateTime<Utc>> {
    /// Returns the duration in whole seconds.
    pub fn duration_seconds(&self) -> i64 {
        self.duration().num_seconds()
    }
}
