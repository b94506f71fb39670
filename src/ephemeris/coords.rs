// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Coordinate frames and the transforms between them.
//!
//! All angles are `f64` degrees.  Formulas follow Meeus, *Astronomical
//! Algorithms* (2nd ed.): obliquity (22.2), low-accuracy nutation (ch. 22),
//! ecliptic→equatorial (13.3/13.4), rigorous precession (21.2–21.4),
//! sidereal time (12.4) and equatorial→horizontal (13.5/13.6).

use crate::JulianDate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Wraps an angle into `[0, 360)`.
#[inline]
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs.
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Mean obliquity of the ecliptic (Meeus 22.2), `t` in Julian centuries TT.
#[inline]
pub fn mean_obliquity(t: f64) -> f64 {
    23.439_291_111 - (46.8150 * t + 0.00059 * t * t - 0.001_813 * t * t * t) / 3600.0
}

/// Nutation in longitude and obliquity, degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nutation {
    pub longitude: f64,
    pub obliquity: f64,
}

impl Nutation {
    /// Low-accuracy nutation (0.5″ in Δψ, 0.1″ in Δε), `t` in Julian
    /// centuries TT.
    pub fn at(t: f64) -> Self {
        let omega = (125.044_52 - 1_934.136_261 * t).to_radians();
        let sun = (280.4665 + 36_000.7698 * t).to_radians();
        let moon = (218.3165 + 481_267.8813 * t).to_radians();
        let dpsi = -17.20 * omega.sin() - 1.32 * (2.0 * sun).sin() - 0.23 * (2.0 * moon).sin()
            + 0.21 * (2.0 * omega).sin();
        let deps = 9.20 * omega.cos() + 0.57 * (2.0 * sun).cos() + 0.10 * (2.0 * moon).cos()
            - 0.09 * (2.0 * omega).cos();
        Nutation {
            longitude: dpsi / 3600.0,
            obliquity: deps / 3600.0,
        }
    }
}

/// Ecliptic longitude/latitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ecliptic {
    pub longitude: f64,
    pub latitude: f64,
}

impl Ecliptic {
    /// Rotates into the equatorial frame for the given obliquity.
    pub fn to_equatorial(&self, obliquity: f64) -> Equatorial {
        let (sl, cl) = self.longitude.to_radians().sin_cos();
        let (sb, cb) = self.latitude.to_radians().sin_cos();
        let (se, ce) = obliquity.to_radians().sin_cos();
        let ra = (sl * ce * cb - sb * se).atan2(cl * cb);
        let dec = (sb * ce + cb * se * sl).clamp(-1.0, 1.0).asin();
        Equatorial {
            right_ascension: normalize_degrees(ra.to_degrees()),
            declination: dec.to_degrees(),
        }
    }
}

/// Right ascension / declination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Equatorial {
    pub right_ascension: f64,
    pub declination: f64,
}

impl Equatorial {
    /// Precesses J2000.0 mean coordinates to the mean equinox of `t`
    /// (Julian centuries TT from J2000).
    pub fn precess_from_j2000(&self, t: f64) -> Equatorial {
        let zeta = (2_306.2181 * t + 0.30188 * t * t + 0.017_998 * t * t * t) / 3600.0;
        let z = (2_306.2181 * t + 1.09468 * t * t + 0.018_203 * t * t * t) / 3600.0;
        let theta = (2_004.3109 * t - 0.42665 * t * t - 0.041_833 * t * t * t) / 3600.0;

        let (sd, cd) = self.declination.to_radians().sin_cos();
        let (sa, ca) = (self.right_ascension + zeta).to_radians().sin_cos();
        let (st, ct) = theta.to_radians().sin_cos();

        let a = cd * sa;
        let b = ct * cd * ca - st * sd;
        let c = st * cd * ca + ct * sd;
        Equatorial {
            right_ascension: normalize_degrees(a.atan2(b).to_degrees() + z),
            declination: c.clamp(-1.0, 1.0).asin().to_degrees(),
        }
    }

    /// Horizontal coordinates for an observer at `latitude` given the local
    /// apparent sidereal time. Azimuth runs N=0, E=90.
    pub fn to_horizontal(&self, latitude: f64, local_sidereal: f64) -> Horizontal {
        let hour_angle = (local_sidereal - self.right_ascension).to_radians();
        let (sh, ch) = hour_angle.sin_cos();
        let (sd, cd) = self.declination.to_radians().sin_cos();
        let (sp, cp) = latitude.to_radians().sin_cos();

        // Meeus measures azimuth from the south; shift by 180° to north-based.
        let az_south = (sh * cd).atan2(ch * cd * sp - sd * cp);
        let alt = (sp * sd + cp * cd * ch).clamp(-1.0, 1.0).asin();
        Horizontal {
            azimuth: normalize_degrees(az_south.to_degrees() + 180.0),
            altitude: alt.to_degrees(),
        }
    }
}

/// Azimuth (N=0, E=90) and altitude above the horizon.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Horizontal {
    pub azimuth: f64,
    pub altitude: f64,
}

impl Horizontal {
    /// Horizon-arc theta: E=0, S=90, W=180, N=270.
    #[inline]
    pub fn theta(&self) -> f64 {
        azimuth_to_theta(self.azimuth)
    }
}

/// Maps azimuth (N=0, E=90, S=180, W=270) onto the horizon-arc convention
/// used by the widget: E→0, S→90, W→180, wrapped into `[0, 360)`.
#[inline]
pub fn azimuth_to_theta(azimuth: f64) -> f64 {
    normalize_degrees(azimuth - 90.0)
}

/// Greenwich apparent sidereal time in degrees (Meeus 12.4 + equation of
/// the equinoxes).
pub fn apparent_sidereal_time(jd: JulianDate) -> f64 {
    let t_ut = jd.julian_centuries_ut();
    let days_ut = t_ut * JulianDate::JULIAN_CENTURY.value();
    let mean = 280.460_618_37 + 360.985_647_366_29 * days_ut + 0.000_387_933 * t_ut * t_ut
        - t_ut * t_ut * t_ut / 38_710_000.0;

    let t = jd.julian_centuries().value();
    let nutation = Nutation::at(t);
    let true_obliquity = mean_obliquity(t) + nutation.obliquity;
    normalize_degrees(mean + nutation.longitude * true_obliquity.to_radians().cos())
}

/// Atmospheric refraction in degrees for a true (airless) altitude,
/// Saemundsson's formula at 1010 hPa / 10 °C.
///
/// Below −1° the body is out of sight anyway and no correction is applied.
pub fn refraction(true_altitude: f64) -> f64 {
    if true_altitude < -1.0 {
        return 0.0;
    }
    let arg = true_altitude + 10.3 / (true_altitude + 5.11);
    1.02 / arg.to_radians().tan() / 60.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_wraps_both_ways() {
        assert_eq!(normalize_degrees(370.0), 10.0);
        assert_eq!(normalize_degrees(-10.0), 350.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert!(normalize_degrees(-1e-18) < 360.0);
    }

    #[test]
    fn theta_matches_widget_convention() {
        assert_eq!(azimuth_to_theta(90.0), 0.0);
        assert_eq!(azimuth_to_theta(180.0), 90.0);
        assert_eq!(azimuth_to_theta(270.0), 180.0);
        assert_eq!(azimuth_to_theta(0.0), 270.0);
        assert_eq!(azimuth_to_theta(45.0), 315.0);
    }

    #[test]
    fn obliquity_at_j2000() {
        assert!((mean_obliquity(0.0) - 23.439_291).abs() < 1e-6);
    }

    #[test]
    fn equatorial_of_ecliptic_origin_is_origin() {
        let eq = Ecliptic {
            longitude: 0.0,
            latitude: 0.0,
        }
        .to_equatorial(23.44);
        assert!(eq.right_ascension.abs() < 1e-9 || (eq.right_ascension - 360.0).abs() < 1e-9);
        assert!(eq.declination.abs() < 1e-9);
    }

    #[test]
    fn solstice_point_reaches_obliquity() {
        let eq = Ecliptic {
            longitude: 90.0,
            latitude: 0.0,
        }
        .to_equatorial(23.44);
        assert!((eq.right_ascension - 90.0).abs() < 1e-9);
        assert!((eq.declination - 23.44).abs() < 1e-9);
    }

    #[test]
    fn horizontal_rising_due_east_at_equator() {
        let star = Equatorial {
            right_ascension: 90.0,
            declination: 0.0,
        };
        // Hour angle −90°: six hours before transit.
        let h = star.to_horizontal(0.0, 0.0);
        assert!((h.azimuth - 90.0).abs() < 1e-9, "{h:?}");
        assert!(h.altitude.abs() < 1e-9);
    }

    #[test]
    fn horizontal_transit_is_due_south() {
        let star = Equatorial {
            right_ascension: 120.0,
            declination: 10.0,
        };
        let h = star.to_horizontal(40.0, 120.0);
        assert!((h.azimuth - 180.0).abs() < 1e-9, "{h:?}");
        assert!((h.altitude - 60.0).abs() < 1e-9);
    }

    #[test]
    fn zenith_when_declination_equals_latitude() {
        let star = Equatorial {
            right_ascension: 15.0,
            declination: 32.9,
        };
        let h = star.to_horizontal(32.9, 15.0);
        assert!((h.altitude - 90.0).abs() < 1e-6);
    }

    #[test]
    fn precession_over_a_century_is_about_1_4_degrees() {
        let eq = Equatorial {
            right_ascension: 0.0,
            declination: 0.0,
        };
        let moved = eq.precess_from_j2000(1.0);
        // General precession in RA at the equinox: ~3.07 s/yr → ~1.28°/century.
        assert!((moved.right_ascension - 1.28).abs() < 0.05, "{moved:?}");
        assert!((moved.declination - 0.557).abs() < 0.01, "{moved:?}");
    }

    #[test]
    fn sidereal_time_at_j2000() {
        // Meeus example 12.a neighbourhood: GMST at 2000-01-01 12h UT ≈ 280.46°.
        let jd = JulianDate::from_utc(
            chrono::DateTime::from_timestamp(946_728_000, 0).expect("valid timestamp"),
        );
        let gast = apparent_sidereal_time(jd);
        assert!((gast - 280.46).abs() < 0.01, "{gast}");
    }

    #[test]
    fn refraction_near_horizon() {
        let r = refraction(0.0) * 60.0;
        assert!((r - 29.0).abs() < 1.0, "{r}");
        assert!(refraction(45.0) * 60.0 < 1.1);
        assert_eq!(refraction(-5.0), 0.0);
    }
}
