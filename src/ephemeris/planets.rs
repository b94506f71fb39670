// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Planetary positions from Keplerian elements.
//!
//! Elements and rates are E. M. Standish, "Keplerian Elements for
//! Approximate Positions of the Major Planets" (JPL), table 1, valid
//! 1800–2050. Positions are referred to the mean ecliptic and equinox of
//! J2000 and precessed to date at the end.

use super::coords::{normalize_degrees, Equatorial};
use crate::JulianDate;

/// Light time for one astronomical unit, in days.
const LIGHT_TIME_PER_AU: f64 = 0.005_775_518_3;

/// Obliquity of the J2000 ecliptic, degrees.
const OBLIQUITY_J2000: f64 = 23.439_28;

/// Planets with a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Planet {
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
}

/// Osculating elements at J2000 with their linear rates per Julian century.
///
/// Each entry is `(value, rate)`. Angles in degrees, `a` in AU.
struct Elements {
    semi_major_axis: (f64, f64),
    eccentricity: (f64, f64),
    inclination: (f64, f64),
    mean_longitude: (f64, f64),
    perihelion_longitude: (f64, f64),
    node_longitude: (f64, f64),
}

#[rustfmt::skip]
const MERCURY: Elements = Elements {
    semi_major_axis:      (0.387_099_27,   0.000_000_37),
    eccentricity:         (0.205_635_93,   0.000_019_06),
    inclination:          (7.004_979_02,  -0.005_947_49),
    mean_longitude:       (252.250_323_50, 149_472.674_111_75),
    perihelion_longitude: (77.457_796_28,  0.160_476_89),
    node_longitude:       (48.330_765_93, -0.125_340_81),
};

#[rustfmt::skip]
const VENUS: Elements = Elements {
    semi_major_axis:      (0.723_335_66,   0.000_003_90),
    eccentricity:         (0.006_776_72,  -0.000_041_07),
    inclination:          (3.394_676_05,  -0.000_788_90),
    mean_longitude:       (181.979_099_50, 58_517.815_387_29),
    perihelion_longitude: (131.602_467_18, 0.002_683_29),
    node_longitude:       (76.679_842_55, -0.277_694_18),
};

#[rustfmt::skip]
const EARTH_MOON_BARYCENTRE: Elements = Elements {
    semi_major_axis:      (1.000_002_61,   0.000_005_62),
    eccentricity:         (0.016_711_23,  -0.000_043_92),
    inclination:          (-0.000_015_31, -0.012_946_68),
    mean_longitude:       (100.464_571_66, 35_999.372_449_81),
    perihelion_longitude: (102.937_681_93, 0.323_273_64),
    node_longitude:       (0.0,            0.0),
};

#[rustfmt::skip]
const MARS: Elements = Elements {
    semi_major_axis:      (1.523_710_34,   0.000_018_47),
    eccentricity:         (0.093_394_10,   0.000_078_82),
    inclination:          (1.849_691_42,  -0.008_131_31),
    mean_longitude:       (-4.553_432_05,  19_140.302_684_99),
    perihelion_longitude: (-23.943_629_59, 0.444_410_88),
    node_longitude:       (49.559_538_91, -0.292_573_43),
};

#[rustfmt::skip]
const JUPITER: Elements = Elements {
    semi_major_axis:      (5.202_887_00,  -0.000_116_07),
    eccentricity:         (0.048_386_24,  -0.000_132_53),
    inclination:          (1.304_396_95,  -0.001_837_14),
    mean_longitude:       (34.396_440_51,  3_034.746_127_75),
    perihelion_longitude: (14.728_479_83,  0.212_526_68),
    node_longitude:       (100.473_909_09, 0.204_691_06),
};

#[rustfmt::skip]
const SATURN: Elements = Elements {
    semi_major_axis:      (9.536_675_94,  -0.001_250_60),
    eccentricity:         (0.053_861_79,  -0.000_509_91),
    inclination:          (2.485_991_87,   0.001_936_09),
    mean_longitude:       (49.954_244_23,  1_222.493_622_01),
    perihelion_longitude: (92.598_878_31, -0.418_972_16),
    node_longitude:       (113.662_424_48, -0.288_677_94),
};

impl Planet {
    fn elements(self) -> &'static Elements {
        match self {
            Planet::Mercury => &MERCURY,
            Planet::Venus => &VENUS,
            Planet::Mars => &MARS,
            Planet::Jupiter => &JUPITER,
            Planet::Saturn => &SATURN,
        }
    }
}

/// Rectangular coordinates in AU.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector {
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    fn minus(&self, other: &Vector) -> Vector {
        Vector {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }

    /// Angle between two vectors in degrees.
    pub fn separation(&self, other: &Vector) -> f64 {
        let dot = self.x * other.x + self.y * other.y + self.z * other.z;
        (dot / (self.norm() * other.norm())).clamp(-1.0, 1.0).acos().to_degrees()
    }

    /// Rotates a J2000 ecliptic vector into the J2000 equatorial frame.
    fn ecliptic_to_equatorial(&self) -> Vector {
        let (se, ce) = OBLIQUITY_J2000.to_radians().sin_cos();
        Vector {
            x: self.x,
            y: ce * self.y - se * self.z,
            z: se * self.y + ce * self.z,
        }
    }

    fn to_spherical(&self) -> Equatorial {
        let ra = self.y.atan2(self.x).to_degrees();
        let dec = (self.z / self.norm()).clamp(-1.0, 1.0).asin().to_degrees();
        Equatorial {
            right_ascension: normalize_degrees(ra),
            declination: dec,
        }
    }
}

/// Solves Kepler's equation `E - e sin E = M` (radians).
fn eccentric_anomaly(mean_anomaly: f64, eccentricity: f64) -> f64 {
    let mut e_anom = mean_anomaly + eccentricity * mean_anomaly.sin();
    for _ in 0..30 {
        let delta = (e_anom - eccentricity * e_anom.sin() - mean_anomaly)
            / (1.0 - eccentricity * e_anom.cos());
        e_anom -= delta;
        if delta.abs() < 1e-12 {
            break;
        }
    }
    e_anom
}

/// Heliocentric J2000 ecliptic position for elements at `t` centuries TT.
fn heliocentric(elements: &Elements, t: f64) -> Vector {
    let at = |(value, rate): (f64, f64)| value + rate * t;
    let a = at(elements.semi_major_axis);
    let e = at(elements.eccentricity);
    let incl = at(elements.inclination).to_radians();
    let mean_long = at(elements.mean_longitude);
    let peri = at(elements.perihelion_longitude);
    let node = at(elements.node_longitude);

    let omega = (peri - node).to_radians();
    let node = node.to_radians();
    // Wrap M into (-180, 180] before solving.
    let mut m = normalize_degrees(mean_long - peri);
    if m > 180.0 {
        m -= 360.0;
    }
    let big_e = eccentric_anomaly(m.to_radians(), e);

    let xp = a * (big_e.cos() - e);
    let yp = a * (1.0 - e * e).sqrt() * big_e.sin();

    let (sw, cw) = omega.sin_cos();
    let (sn, cn) = node.sin_cos();
    let (si, ci) = incl.sin_cos();
    Vector {
        x: (cw * cn - sw * sn * ci) * xp + (-sw * cn - cw * sn * ci) * yp,
        y: (cw * sn + sw * cn * ci) * xp + (-sw * sn + cw * cn * ci) * yp,
        z: (sw * si) * xp + (cw * si) * yp,
    }
}

/// Heliocentric J2000 ecliptic position of the Earth–Moon barycentre.
pub fn earth_heliocentric(jd: JulianDate) -> Vector {
    heliocentric(&EARTH_MOON_BARYCENTRE, jd.julian_centuries().value())
}

/// Heliocentric J2000 ecliptic position of `planet`.
pub fn heliocentric_position(planet: Planet, jd: JulianDate) -> Vector {
    heliocentric(planet.elements(), jd.julian_centuries().value())
}

/// Geocentric J2000 ecliptic vector, corrected for light time.
pub fn geocentric_position(planet: Planet, jd: JulianDate) -> Vector {
    let t = jd.julian_centuries().value();
    let earth = heliocentric(&EARTH_MOON_BARYCENTRE, t);
    let mut geo = heliocentric(planet.elements(), t).minus(&earth);
    // One iteration is plenty at planetary speeds.
    let tau = LIGHT_TIME_PER_AU * geo.norm();
    let t_emitted = t - tau / JulianDate::JULIAN_CENTURY.value();
    geo = heliocentric(planet.elements(), t_emitted).minus(&earth);
    geo
}

/// Geocentric right ascension/declination referred to the mean equinox of
/// date.
pub fn equatorial_of_date(planet: Planet, jd: JulianDate) -> Equatorial {
    geocentric_position(planet, jd)
        .ecliptic_to_equatorial()
        .to_spherical()
        .precess_from_j2000(jd.julian_centuries().value())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elongation(planet: Planet, jd: JulianDate) -> f64 {
        let earth = earth_heliocentric(jd);
        let sun = Vector {
            x: -earth.x,
            y: -earth.y,
            z: -earth.z,
        };
        geocentric_position(planet, jd).separation(&sun)
    }

    #[test]
    fn kepler_solver_satisfies_equation() {
        for &(m, e) in &[(0.3, 0.2), (3.0, 0.05), (-2.0, 0.0934)] {
            let big_e = eccentric_anomaly(m, e);
            assert!((big_e - e * big_e.sin() - m).abs() < 1e-10);
        }
    }

    #[test]
    fn earth_stays_near_one_au() {
        let mut jd = JulianDate::new(2_451_545.0);
        for _ in 0..24 {
            let r = earth_heliocentric(jd).norm();
            assert!((0.982..=1.018).contains(&r), "r = {r}");
            jd += qtty::Days::new(15.25);
        }
    }

    #[test]
    fn inferior_planets_keep_to_their_elongations() {
        let mut jd = JulianDate::new(2_460_000.5);
        for _ in 0..60 {
            assert!(elongation(Planet::Venus, jd) < 48.5);
            assert!(elongation(Planet::Mercury, jd) < 28.5);
            jd += qtty::Days::new(13.0);
        }
    }

    #[test]
    fn meeus_example_33a_venus() {
        // 1992 Dec 20, 0h TD: α = 316.17291°, δ = −18.88801° (apparent).
        let eq = equatorial_of_date(Planet::Venus, JulianDate::new(2_448_976.5));
        assert!((eq.right_ascension - 316.172_9).abs() < 0.05, "{eq:?}");
        assert!((eq.declination - -18.888).abs() < 0.05, "{eq:?}");
    }

    #[test]
    fn outer_planets_have_plausible_distances() {
        let jd = JulianDate::new(2_461_000.5);
        let jupiter = geocentric_position(Planet::Jupiter, jd).norm();
        let saturn = geocentric_position(Planet::Saturn, jd).norm();
        let mars = geocentric_position(Planet::Mars, jd).norm();
        assert!((3.9..=6.5).contains(&jupiter), "{jupiter}");
        assert!((7.9..=11.1).contains(&saturn), "{saturn}");
        assert!((0.3..=2.7).contains(&mars), "{mars}");
        assert!(heliocentric_position(Planet::Saturn, jd).norm() > 9.0);
    }
}
