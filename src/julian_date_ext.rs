// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Julian Date (`Time<JD>`) specific extensions.

use chrono::{TimeZone, Utc};
use qtty::*;

use super::instant::Time;
use super::scales::{JD, UT};

impl Time<JD> {
    /// J2000.0 epoch: 2000-01-01T12:00:00 TT  (JD 2 451 545.0).
    pub const J2000: Self = Self::new(2_451_545.0);

    /// One Julian year expressed in days.
    pub const JULIAN_YEAR: Days = Days::new(365.25);

    /// One Julian century expressed in days.
    pub const JULIAN_CENTURY: Days = Days::new(36_525.0);

    /// Julian centuries since J2000.0 (nutation, precession, Meeus series).
    #[inline]
    pub fn julian_centuries(&self) -> Centuries {
        Centuries::new((*self - Self::J2000).value() / Self::JULIAN_CENTURY.value())
    }

    /// Julian centuries since J2000.0 measured on the UT axis.
    ///
    /// Sidereal time is a function of Earth rotation, so its polynomial
    /// takes UT rather than TT.
    #[inline]
    pub fn julian_centuries_ut(&self) -> f64 {
        (self.to::<UT>().value() - Self::J2000.value()) / Self::JULIAN_CENTURY.value()
    }

    /// Approximate decimal year on the TT axis (`2000.0` at J2000).
    #[inline]
    pub fn decimal_year(&self) -> f64 {
        2000.0 + (*self - Self::J2000).value() / Self::JULIAN_YEAR.value()
    }

    /// 00:00 UTC on January 1st of `year`, on the TT axis.
    ///
    /// Returns `None` for years chrono cannot represent.
    pub fn new_year(year: i32) -> Option<Self> {
        Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0)
            .single()
            .map(Self::from_utc)
    }

    /// Adds a number of minutes.
    #[inline]
    pub fn plus_minutes(self, minutes: f64) -> Self {
        self + Seconds::new(minutes * 60.0).to::<Day>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centuries_since_j2000() {
        let jd = Time::<JD>::J2000 + Days::new(36_525.0 * 3.0);
        assert!((jd.julian_centuries().value() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn new_year_is_midnight_utc() {
        let jd = Time::<JD>::new_year(2026).expect("representable");
        let utc = jd.to_utc().expect("to_utc");
        let expected = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert!((utc - expected).num_milliseconds().abs() < 1);
    }

    #[test]
    fn decimal_year_tracks_calendar() {
        let jd = Time::<JD>::new_year(2026).expect("representable");
        assert!((jd.decimal_year() - 2026.0).abs() < 0.01);
    }

    #[test]
    fn plus_minutes_moves_one_minute() {
        let jd = Time::<JD>::J2000.plus_minutes(1.0);
        let step = (jd - Time::<JD>::J2000).to::<Second>();
        assert!((step - Seconds::new(60.0)).abs() < Seconds::new(1e-4));
    }

    #[test]
    fn ut_centuries_lag_tt_by_delta_t() {
        let jd = Time::<JD>::J2000;
        let lag_days = (jd.julian_centuries().value() - jd.julian_centuries_ut())
            * Time::<JD>::JULIAN_CENTURY.value();
        assert!((lag_days * 86_400.0 - 63.86).abs() < 0.5);
    }
}
