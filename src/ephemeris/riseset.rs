// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Rising and setting searches.
//!
//! A body rises or sets when the top of its disc crosses the horizon,
//! i.e. its airless altitude passes `-(34′ + semidiameter)`. The search
//! samples the altitude every ten minutes over two days on one side of the
//! reference instant, then bisects the first bracketing step.

use super::{Body, Observer};
use crate::error::{Error, Result};
use crate::JulianDate;
use qtty::Days;

/// Standard horizontal refraction, degrees.
const HORIZON_REFRACTION: f64 = 34.0 / 60.0;

/// Sampling step, minutes.
const STEP_MINUTES: f64 = 10.0;

/// Search span on either side of the reference instant, days. A body with
/// no crossing inside it counts as always up or never up.
const SEARCH_DAYS: f64 = 2.0;

const BISECTIONS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Crossing {
    Rising,
    Setting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

impl Observer {
    /// Height of the upper limb above the apparent horizon, degrees.
    /// Positive while the body is up.
    fn limb_height(&self, body: Body, at: JulianDate) -> f64 {
        let (h, semidiameter) = self.airless(body, at);
        h.altitude + HORIZON_REFRACTION + semidiameter
    }

    fn search(
        &self,
        body: Body,
        at: JulianDate,
        crossing: Crossing,
        direction: Direction,
    ) -> Result<JulianDate> {
        let step = match direction {
            Direction::Forward => STEP_MINUTES,
            Direction::Backward => -STEP_MINUTES,
        };
        let steps = (SEARCH_DAYS * 1_440.0 / STEP_MINUTES) as usize;

        let start_height = self.limb_height(body, at);
        let mut prev_t = at;
        let mut prev_h = start_height;
        for _ in 0..steps {
            let t = prev_t.plus_minutes(step);
            let h = self.limb_height(body, t);

            // Order the bracket chronologically before testing direction.
            let (early, early_h, late, late_h) = match direction {
                Direction::Forward => (prev_t, prev_h, t, h),
                Direction::Backward => (t, h, prev_t, prev_h),
            };
            let found = match crossing {
                Crossing::Rising => early_h < 0.0 && late_h >= 0.0,
                Crossing::Setting => early_h >= 0.0 && late_h < 0.0,
            };
            if found {
                return Ok(self.bisect(body, early, early_h, late));
            }
            prev_t = t;
            prev_h = h;
        }

        if start_height >= 0.0 {
            Err(Error::AlwaysUp(body))
        } else {
            Err(Error::NeverUp(body))
        }
    }

    fn bisect(
        &self,
        body: Body,
        mut early: JulianDate,
        early_h: f64,
        mut late: JulianDate,
    ) -> JulianDate {
        let early_up = early_h >= 0.0;
        for _ in 0..BISECTIONS {
            let mid = early + Days::new((late - early).value() / 2.0);
            if (self.limb_height(body, mid) >= 0.0) == early_up {
                early = mid;
            } else {
                late = mid;
            }
        }
        early + Days::new((late - early).value() / 2.0)
    }

    /// Last rising of `body` before `at`.
    pub fn previous_rising(&self, body: Body, at: JulianDate) -> Result<JulianDate> {
        self.search(body, at, Crossing::Rising, Direction::Backward)
    }

    /// Last setting of `body` before `at`.
    pub fn previous_setting(&self, body: Body, at: JulianDate) -> Result<JulianDate> {
        self.search(body, at, Crossing::Setting, Direction::Backward)
    }

    /// First rising of `body` after `at`.
    pub fn next_rising(&self, body: Body, at: JulianDate) -> Result<JulianDate> {
        self.search(body, at, Crossing::Rising, Direction::Forward)
    }

    /// First setting of `body` after `at`.
    pub fn next_setting(&self, body: Body, at: JulianDate) -> Result<JulianDate> {
        self.search(body, at, Crossing::Setting, Direction::Forward)
    }

    /// Whether `body`'s upper limb is above the horizon at `at`.
    pub fn is_up(&self, body: Body, at: JulianDate) -> bool {
        self.limb_height(body, at) >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dallas() -> Observer {
        Observer::new(32.9, -96.8)
    }

    #[test]
    fn moon_rises_and_sets_within_two_days() {
        let at = JulianDate::new(2_461_000.5);
        let observer = dallas();
        let rise = observer.next_rising(Body::Moon, at).expect("moon rises");
        let set = observer.next_setting(Body::Moon, at).expect("moon sets");
        assert!(rise > at && set > at);
        assert!((rise - at).value() < 1.1);
        assert!((set - at).value() < 1.1);
        assert!(observer.limb_height(Body::Moon, rise).abs() < 0.01);
    }

    #[test]
    fn previous_events_precede_reference() {
        let at = JulianDate::new(2_461_000.5);
        let observer = dallas();
        let rise = observer.previous_rising(Body::Moon, at).expect("moon rose");
        let set = observer.previous_setting(Body::Moon, at).expect("moon set");
        assert!(rise < at && set < at);
        assert!((at - rise).value() < 1.1);
        assert!((at - set).value() < 1.1);
    }

    #[test]
    fn body_is_up_between_rise_and_set() {
        let at = JulianDate::new(2_461_000.5);
        let observer = dallas();
        let rise = observer.next_rising(Body::Jupiter, at).expect("rises");
        let set = observer.next_setting(Body::Jupiter, rise).expect("sets");
        let mid = rise + Days::new((set - rise).value() / 2.0);
        assert!(observer.is_up(Body::Jupiter, mid));
        assert!(!observer.is_up(Body::Jupiter, rise.plus_minutes(-30.0)));
    }

    #[test]
    fn polar_observer_reports_circumpolar_condition() {
        // Near the pole the Moon stays on one side of the horizon for days.
        let observer = Observer::new(89.9, 0.0);
        let at = JulianDate::new(2_461_000.5);
        match observer.next_rising(Body::Moon, at) {
            Err(err) => assert!(err.is_circumpolar()),
            Ok(t) => assert!((t - at).value() <= SEARCH_DAYS),
        }
        let up = observer.is_up(Body::Moon, at);
        let outcome = observer.next_setting(Body::Moon, at);
        if let Err(err) = outcome {
            match err {
                Error::AlwaysUp(Body::Moon) => assert!(up),
                Error::NeverUp(Body::Moon) => assert!(!up),
                other => panic!("unexpected error {other}"),
            }
        }
    }
}
