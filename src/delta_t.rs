// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! # ΔT (Delta T) — UT↔TT correction
//!
//! Piecewise polynomials for **ΔT = TT − UT** from Espenak & Meeus,
//! *Five Millennium Canon of Solar Eclipses* (NASA/TP-2006-214141),
//! covering 1900–2150, with the Morrison & Stephenson long-term parabola
//! outside that range.
//!
//! The correction is applied automatically by the [`UT`](super::UT) scale,
//! so callers going through [`Time::from_utc`](super::Time::from_utc) never
//! touch this module directly.
//!
//! Accuracy is a few seconds for the current decade, which moves the Moon
//! by well under an arcsecond.

use super::instant::Time;
use super::scales::UT;
use super::JulianDate;
use qtty::Seconds;

/// Decimal year for a Julian Day on the UT axis.
#[inline]
fn decimal_year(jd_ut: JulianDate) -> f64 {
    2000.0 + (jd_ut - JulianDate::J2000).value() / JulianDate::JULIAN_YEAR.value()
}

/// Horner evaluation, lowest order first.
#[inline]
fn poly(t: f64, coeffs: &[f64]) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, c| acc * t + c)
}

/// Long-term parabola, `-20 + 32 u²` with `u` in centuries from 1820.
#[inline]
fn delta_t_long_term(y: f64) -> f64 {
    let u = (y - 1820.0) / 100.0;
    -20.0 + 32.0 * u * u
}

fn delta_t_polynomial(y: f64) -> f64 {
    match y {
        y if y < 1900.0 => delta_t_long_term(y),
        y if y < 1920.0 => poly(
            y - 1900.0,
            &[-2.79, 1.494119, -0.0598939, 0.0061966, -0.000197],
        ),
        y if y < 1941.0 => poly(y - 1920.0, &[21.20, 0.84493, -0.076100, 0.0020936]),
        y if y < 1961.0 => poly(y - 1950.0, &[29.07, 0.407, -1.0 / 233.0, 1.0 / 2547.0]),
        y if y < 1986.0 => poly(y - 1975.0, &[45.45, 1.067, -1.0 / 260.0, -1.0 / 718.0]),
        y if y < 2005.0 => poly(
            y - 2000.0,
            &[
                63.86,
                0.3345,
                -0.060374,
                0.0017275,
                0.000651814,
                0.00002373599,
            ],
        ),
        y if y < 2050.0 => poly(y - 2000.0, &[62.92, 0.32217, 0.005589]),
        y if y < 2150.0 => delta_t_long_term(y) - 0.5628 * (2150.0 - y),
        y => delta_t_long_term(y),
    }
}

/// Returns **ΔT** in seconds for a Julian Day on the **UT** axis.
#[inline]
pub(crate) fn delta_t_seconds_from_ut(jd_ut: JulianDate) -> Seconds {
    Seconds::new(delta_t_polynomial(decimal_year(jd_ut)))
}

impl Time<UT> {
    /// Returns **ΔT = TT − UT** in seconds for this UT epoch.
    #[inline]
    pub fn delta_t(&self) -> Seconds {
        delta_t_seconds_from_ut(JulianDate::from_days(self.quantity()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_t_at_j2000() {
        let dt = delta_t_seconds_from_ut(JulianDate::J2000);
        assert!((dt - Seconds::new(63.86)).abs() < Seconds::new(0.1));
    }

    #[test]
    fn delta_t_mid_century() {
        assert!((delta_t_polynomial(1950.0) - 29.07).abs() < 1e-9);
        assert!((delta_t_polynomial(1975.0) - 45.45).abs() < 1e-9);
    }

    #[test]
    fn segments_meet_at_2005() {
        let before = delta_t_polynomial(2005.0 - 1e-9);
        let after = delta_t_polynomial(2005.0);
        assert!((before - after).abs() < 0.1, "{before} vs {after}");
    }

    #[test]
    fn segments_meet_at_2050() {
        let before = delta_t_polynomial(2050.0 - 1e-9);
        let after = delta_t_polynomial(2050.0);
        assert!((before - after).abs() < 0.1, "{before} vs {after}");
    }

    #[test]
    fn delta_t_grows_through_the_2020s() {
        let a = delta_t_polynomial(2020.0);
        let b = delta_t_polynomial(2030.0);
        assert!(a > 60.0 && b > a && b < 90.0);
    }

    #[test]
    fn ut_convenience_accessor() {
        let ut = Time::<UT>::new(2_451_545.0);
        assert!((ut.delta_t() - Seconds::new(63.86)).abs() < Seconds::new(0.1));
    }
}
