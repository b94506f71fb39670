// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! # Lunar position and phases
//!
//! Position: Meeus ch. 47 (ELP-2000/82 truncated to the 60 + 60 terms of
//! tables 47.A/47.B), good to ~10″ in longitude and 4″ in latitude.
//!
//! Phases: Meeus ch. 49 mean phases plus periodic and planetary
//! corrections, good to a few seconds of time for the current era.

use super::coords::{mean_obliquity, normalize_degrees, Ecliptic, Equatorial, Nutation};
use crate::JulianDate;

/// Mean synodic month in days.
pub const SYNODIC_MONTH: f64 = 29.530_588_861;

/// Equatorial radius of the Earth, km.
pub const EARTH_RADIUS_KM: f64 = 6_378.14;

/// Geocentric lunar position, mean equinox of date (no nutation).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LunarPosition {
    pub ecliptic: Ecliptic,
    pub distance_km: f64,
}

impl LunarPosition {
    /// Equatorial horizontal parallax, degrees.
    pub fn parallax(&self) -> f64 {
        (EARTH_RADIUS_KM / self.distance_km).asin().to_degrees()
    }

    /// Apparent angular semidiameter, degrees.
    pub fn semidiameter(&self) -> f64 {
        358_473_400.0 / self.distance_km / 3600.0
    }
}

// Columns: D, M, M', F, Σl (1e-6 deg), Σr (1e-3 km).
#[rustfmt::skip]
const LONGITUDE_DISTANCE_TERMS: [(i8, i8, i8, i8, f64, f64); 60] = [
    (0,  0,  1,  0, 6_288_774.0, -20_905_355.0),
    (2,  0, -1,  0, 1_274_027.0,  -3_699_111.0),
    (2,  0,  0,  0,   658_314.0,  -2_955_968.0),
    (0,  0,  2,  0,   213_618.0,    -569_925.0),
    (0,  1,  0,  0,  -185_116.0,      48_888.0),
    (0,  0,  0,  2,  -114_332.0,      -3_149.0),
    (2,  0, -2,  0,    58_793.0,     246_158.0),
    (2, -1, -1,  0,    57_066.0,    -152_138.0),
    (2,  0,  1,  0,    53_322.0,    -170_733.0),
    (2, -1,  0,  0,    45_758.0,    -204_586.0),
    (0,  1, -1,  0,   -40_923.0,    -129_620.0),
    (1,  0,  0,  0,   -34_720.0,     108_743.0),
    (0,  1,  1,  0,   -30_383.0,     104_755.0),
    (2,  0,  0, -2,    15_327.0,      10_321.0),
    (0,  0,  1,  2,   -12_528.0,           0.0),
    (0,  0,  1, -2,    10_980.0,      79_661.0),
    (4,  0, -1,  0,    10_675.0,     -34_782.0),
    (0,  0,  3,  0,    10_034.0,     -23_210.0),
    (4,  0, -2,  0,     8_548.0,     -21_636.0),
    (2,  1, -1,  0,    -7_888.0,      24_208.0),
    (2,  1,  0,  0,    -6_766.0,      30_824.0),
    (1,  0, -1,  0,    -5_163.0,      -8_379.0),
    (1,  1,  0,  0,     4_987.0,     -16_675.0),
    (2, -1,  1,  0,     4_036.0,     -12_831.0),
    (2,  0,  2,  0,     3_994.0,     -10_445.0),
    (4,  0,  0,  0,     3_861.0,     -11_650.0),
    (2,  0, -3,  0,     3_665.0,      14_403.0),
    (0,  1, -2,  0,    -2_689.0,      -7_003.0),
    (2,  0, -1,  2,    -2_602.0,           0.0),
    (2, -1, -2,  0,     2_390.0,      10_056.0),
    (1,  0,  1,  0,    -2_348.0,       6_322.0),
    (2, -2,  0,  0,     2_236.0,      -9_884.0),
    (0,  1,  2,  0,    -2_120.0,       5_751.0),
    (0,  2,  0,  0,    -2_069.0,           0.0),
    (2, -2, -1,  0,     2_048.0,      -4_950.0),
    (2,  0,  1, -2,    -1_773.0,       4_130.0),
    (2,  0,  0,  2,    -1_595.0,           0.0),
    (4, -1, -1,  0,     1_215.0,      -3_958.0),
    (0,  0,  2,  2,    -1_110.0,           0.0),
    (3,  0, -1,  0,      -892.0,       3_258.0),
    (2,  1,  1,  0,      -810.0,       2_616.0),
    (4, -1, -2,  0,       759.0,      -1_897.0),
    (0,  2, -1,  0,      -713.0,      -2_117.0),
    (2,  2, -1,  0,      -700.0,       2_354.0),
    (2,  1, -2,  0,       691.0,           0.0),
    (2, -1,  0, -2,       596.0,           0.0),
    (4,  0,  1,  0,       549.0,      -1_423.0),
    (0,  0,  4,  0,       537.0,      -1_117.0),
    (4, -1,  0,  0,       520.0,      -1_571.0),
    (1,  0, -2,  0,      -487.0,      -1_739.0),
    (2,  1,  0, -2,      -399.0,           0.0),
    (0,  0,  2, -2,      -381.0,      -4_421.0),
    (1,  1,  1,  0,       351.0,           0.0),
    (3,  0, -2,  0,      -340.0,           0.0),
    (4,  0, -3,  0,       330.0,           0.0),
    (2, -1,  2,  0,       327.0,           0.0),
    (0,  2,  1,  0,      -323.0,       1_165.0),
    (1,  1, -1,  0,       299.0,           0.0),
    (2,  0,  3,  0,       294.0,           0.0),
    (2,  0, -1, -2,         0.0,       8_752.0),
];

// Columns: D, M, M', F, Σb (1e-6 deg).
#[rustfmt::skip]
const LATITUDE_TERMS: [(i8, i8, i8, i8, f64); 60] = [
    (0,  0,  0,  1, 5_128_122.0),
    (0,  0,  1,  1,   280_602.0),
    (0,  0,  1, -1,   277_693.0),
    (2,  0,  0, -1,   173_237.0),
    (2,  0, -1,  1,    55_413.0),
    (2,  0, -1, -1,    46_271.0),
    (2,  0,  0,  1,    32_573.0),
    (0,  0,  2,  1,    17_198.0),
    (2,  0,  1, -1,     9_266.0),
    (0,  0,  2, -1,     8_822.0),
    (2, -1,  0, -1,     8_216.0),
    (2,  0, -2, -1,     4_324.0),
    (2,  0,  1,  1,     4_200.0),
    (2,  1,  0, -1,    -3_359.0),
    (2, -1, -1,  1,     2_463.0),
    (2, -1,  0,  1,     2_211.0),
    (2, -1, -1, -1,     2_065.0),
    (0,  1, -1, -1,    -1_870.0),
    (4,  0, -1, -1,     1_828.0),
    (0,  1,  0,  1,    -1_794.0),
    (0,  0,  0,  3,    -1_749.0),
    (0,  1, -1,  1,    -1_565.0),
    (1,  0,  0,  1,    -1_491.0),
    (0,  1,  1,  1,    -1_475.0),
    (0,  1,  1, -1,    -1_410.0),
    (0,  1,  0, -1,    -1_344.0),
    (1,  0,  0, -1,    -1_335.0),
    (0,  0,  3,  1,     1_107.0),
    (4,  0,  0, -1,     1_021.0),
    (4,  0, -1,  1,       833.0),
    (0,  0,  1, -3,       777.0),
    (4,  0, -2,  1,       671.0),
    (2,  0,  0, -3,       607.0),
    (2,  0,  2, -1,       596.0),
    (2, -1,  1, -1,       491.0),
    (2,  0, -2,  1,      -451.0),
    (0,  0,  3, -1,       439.0),
    (2,  0,  2,  1,       422.0),
    (2,  0, -3, -1,       421.0),
    (2,  1, -1,  1,      -366.0),
    (2,  1,  0,  1,      -351.0),
    (4,  0,  0,  1,       331.0),
    (2, -1,  1,  1,       315.0),
    (2, -2,  0, -1,       302.0),
    (0,  0,  1,  3,      -283.0),
    (2,  1,  1, -1,      -229.0),
    (1,  1,  0, -1,       223.0),
    (1,  1,  0,  1,       223.0),
    (0,  1, -2, -1,      -220.0),
    (2,  1, -1, -1,      -220.0),
    (1,  0,  1,  1,      -185.0),
    (2, -1, -2, -1,       181.0),
    (0,  1,  2,  1,      -177.0),
    (4,  0, -2, -1,       176.0),
    (4, -1, -1, -1,       166.0),
    (1,  0,  1, -1,      -164.0),
    (4,  0,  1, -1,       132.0),
    (1,  0, -1, -1,      -119.0),
    (4, -1,  0, -1,       115.0),
    (2, -2,  0,  1,       107.0),
];

/// Eccentricity factor applied to terms containing the solar anomaly.
#[inline]
fn eccentricity_factor(m: i8, e: f64) -> f64 {
    match m.abs() {
        0 => 1.0,
        1 => e,
        _ => e * e,
    }
}

/// Geocentric position of the Moon at `jd` (TT).
pub fn position(jd: JulianDate) -> LunarPosition {
    let t = jd.julian_centuries().value();
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;

    let l_prime = 218.316_447_7 + 481_267.881_234_21 * t - 0.001_578_6 * t2 + t3 / 538_841.0
        - t4 / 65_194_000.0;
    let d = 297.850_192_1 + 445_267.111_403_4 * t - 0.001_881_9 * t2 + t3 / 545_868.0
        - t4 / 113_065_000.0;
    let m = 357.529_109_2 + 35_999.050_290_9 * t - 0.000_153_6 * t2 + t3 / 24_490_000.0;
    let m_prime = 134.963_396_4 + 477_198.867_505_5 * t + 0.008_741_4 * t2 + t3 / 69_699.0
        - t4 / 14_712_000.0;
    let f = 93.272_095_0 + 483_202.017_523_3 * t - 0.003_653_9 * t2 - t3 / 3_526_000.0
        + t4 / 863_310_000.0;

    let a1 = (119.75 + 131.849 * t).to_radians();
    let a2 = (53.09 + 479_264.290 * t).to_radians();
    let a3 = (313.45 + 481_266.484 * t).to_radians();
    let e = 1.0 - 0.002_516 * t - 0.000_007_4 * t2;

    let (d_r, m_r, mp_r, f_r) = (
        normalize_degrees(d).to_radians(),
        normalize_degrees(m).to_radians(),
        normalize_degrees(m_prime).to_radians(),
        normalize_degrees(f).to_radians(),
    );
    let lp_r = normalize_degrees(l_prime).to_radians();
    let argument = |cd: i8, cm: i8, cmp: i8, cf: i8| {
        f64::from(cd) * d_r + f64::from(cm) * m_r + f64::from(cmp) * mp_r + f64::from(cf) * f_r
    };

    let (mut sum_l, mut sum_r) = (0.0, 0.0);
    for &(cd, cm, cmp, cf, coeff_l, coeff_r) in LONGITUDE_DISTANCE_TERMS.iter() {
        let arg = argument(cd, cm, cmp, cf);
        let scale = eccentricity_factor(cm, e);
        sum_l += coeff_l * scale * arg.sin();
        sum_r += coeff_r * scale * arg.cos();
    }

    let mut sum_b = 0.0;
    for &(cd, cm, cmp, cf, coeff_b) in LATITUDE_TERMS.iter() {
        sum_b += coeff_b * eccentricity_factor(cm, e) * argument(cd, cm, cmp, cf).sin();
    }

    // Venus, Jupiter and Earth-flattening terms.
    sum_l += 3_958.0 * a1.sin() + 1_962.0 * (lp_r - f_r).sin() + 318.0 * a2.sin();
    sum_b += -2_235.0 * lp_r.sin()
        + 382.0 * a3.sin()
        + 175.0 * (a1 - f_r).sin()
        + 175.0 * (a1 + f_r).sin()
        + 127.0 * (lp_r - mp_r).sin()
        - 115.0 * (lp_r + mp_r).sin();

    LunarPosition {
        ecliptic: Ecliptic {
            longitude: normalize_degrees(l_prime + sum_l / 1_000_000.0),
            latitude: sum_b / 1_000_000.0,
        },
        distance_km: 385_000.56 + sum_r / 1_000.0,
    }
}

/// Apparent geocentric right ascension/declination of the Moon, plus its
/// mean-of-date position (for distance, parallax and semidiameter).
pub fn apparent_equatorial(jd: JulianDate) -> (Equatorial, LunarPosition) {
    let t = jd.julian_centuries().value();
    let geometric = position(jd);
    let nutation = Nutation::at(t);
    let apparent = Ecliptic {
        longitude: normalize_degrees(geometric.ecliptic.longitude + nutation.longitude),
        latitude: geometric.ecliptic.latitude,
    };
    let obliquity = mean_obliquity(t) + nutation.obliquity;
    (apparent.to_equatorial(obliquity), geometric)
}

/// The four principal lunar phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    New,
    FirstQuarter,
    Full,
    LastQuarter,
}

impl Phase {
    pub const ALL: [Phase; 4] = [
        Phase::New,
        Phase::FirstQuarter,
        Phase::Full,
        Phase::LastQuarter,
    ];

    /// Fraction of the lunation at which the phase occurs.
    fn offset(self) -> f64 {
        match self {
            Phase::New => 0.0,
            Phase::FirstQuarter => 0.25,
            Phase::Full => 0.5,
            Phase::LastQuarter => 0.75,
        }
    }

    /// Calendar label as written to the event cache.
    pub fn label(self) -> &'static str {
        match self {
            Phase::New => "New Moon",
            Phase::FirstQuarter => "First Quarter",
            Phase::Full => "Full Moon",
            Phase::LastQuarter => "Last Quarter",
        }
    }
}

/// Instant (TT) of the phase belonging to lunation `k`, where `k` is an
/// integer counted from the new moon of 2000-01-06 and the fractional part
/// is implied by `phase`.
pub fn phase_instant(lunation: i64, phase: Phase) -> JulianDate {
    let k = lunation as f64 + phase.offset();
    let t = k / 1_236.85;
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;

    let mean = 2_451_550.097_66 + SYNODIC_MONTH * k + 0.000_154_37 * t2 - 0.000_000_150 * t3
        + 0.000_000_000_73 * t4;

    let e = 1.0 - 0.002_516 * t - 0.000_007_4 * t2;
    let m = (2.5534 + 29.105_356_70 * k - 0.000_001_4 * t2 - 0.000_000_11 * t3).to_radians();
    let mp = (201.5643 + 385.816_935_28 * k + 0.010_758_2 * t2 + 0.000_012_38 * t3
        - 0.000_000_058 * t4)
        .to_radians();
    let f = (160.7108 + 390.670_502_84 * k - 0.001_611_8 * t2 - 0.000_002_27 * t3
        + 0.000_000_011 * t4)
        .to_radians();
    let omega = (124.7746 - 1.563_755_88 * k + 0.002_067_2 * t2 + 0.000_002_15 * t3).to_radians();

    let periodic = match phase {
        Phase::New => syzygy_correction(NEW_MOON, e, m, mp, f, omega),
        Phase::Full => syzygy_correction(FULL_MOON, e, m, mp, f, omega),
        Phase::FirstQuarter | Phase::LastQuarter => {
            let w = 0.003_06 - 0.000_38 * e * m.cos() + 0.000_26 * mp.cos()
                - 0.000_02 * (mp - m).cos()
                + 0.000_02 * (mp + m).cos()
                + 0.000_02 * (2.0 * f).cos();
            let w = if phase == Phase::FirstQuarter { w } else { -w };
            quarter_correction(e, m, mp, f, omega) + w
        }
    };

    JulianDate::new(mean + periodic + planetary_correction(k, t2))
}

/// Coefficients of the first fourteen new/full moon terms; the tail shared
/// by both tables is applied in [`syzygy_correction`].
const NEW_MOON: [f64; 14] = [
    -0.407_20, 0.172_41, 0.016_08, 0.010_39, 0.007_39, -0.005_14, 0.002_08, -0.001_11, -0.000_57,
    0.000_56, -0.000_42, 0.000_42, 0.000_38, -0.000_24,
];
const FULL_MOON: [f64; 14] = [
    -0.406_14, 0.173_02, 0.016_14, 0.010_43, 0.007_34, -0.005_15, 0.002_09, -0.001_11, -0.000_57,
    0.000_56, -0.000_42, 0.000_42, 0.000_38, -0.000_24,
];

fn syzygy_correction(c: [f64; 14], e: f64, m: f64, mp: f64, f: f64, omega: f64) -> f64 {
    c[0] * mp.sin()
        + c[1] * e * m.sin()
        + c[2] * (2.0 * mp).sin()
        + c[3] * (2.0 * f).sin()
        + c[4] * e * (mp - m).sin()
        + c[5] * e * (mp + m).sin()
        + c[6] * e * e * (2.0 * m).sin()
        + c[7] * (mp - 2.0 * f).sin()
        + c[8] * (mp + 2.0 * f).sin()
        + c[9] * e * (2.0 * mp + m).sin()
        + c[10] * (3.0 * mp).sin()
        + c[11] * e * (m + 2.0 * f).sin()
        + c[12] * e * (m - 2.0 * f).sin()
        + c[13] * e * (2.0 * mp - m).sin()
        - 0.000_17 * omega.sin()
        - 0.000_07 * (mp + 2.0 * m).sin()
        + 0.000_04 * (2.0 * mp - 2.0 * f).sin()
        + 0.000_04 * (3.0 * m).sin()
        + 0.000_03 * (mp + m - 2.0 * f).sin()
        + 0.000_03 * (2.0 * mp + 2.0 * f).sin()
        - 0.000_03 * (mp + m + 2.0 * f).sin()
        + 0.000_03 * (mp - m + 2.0 * f).sin()
        - 0.000_02 * (mp - m - 2.0 * f).sin()
        - 0.000_02 * (3.0 * mp + m).sin()
        + 0.000_02 * (4.0 * mp).sin()
}

fn quarter_correction(e: f64, m: f64, mp: f64, f: f64, omega: f64) -> f64 {
    -0.628_01 * mp.sin() + 0.171_72 * e * m.sin() - 0.011_83 * e * (mp + m).sin()
        + 0.008_62 * (2.0 * mp).sin()
        + 0.008_04 * (2.0 * f).sin()
        + 0.004_54 * e * (mp - m).sin()
        + 0.002_04 * e * e * (2.0 * m).sin()
        - 0.001_80 * (mp - 2.0 * f).sin()
        - 0.000_70 * (mp + 2.0 * f).sin()
        - 0.000_40 * (3.0 * mp).sin()
        - 0.000_34 * e * (2.0 * mp - m).sin()
        + 0.000_32 * e * (m + 2.0 * f).sin()
        + 0.000_32 * e * (m - 2.0 * f).sin()
        - 0.000_28 * e * e * (mp + 2.0 * m).sin()
        + 0.000_27 * e * (2.0 * mp + m).sin()
        - 0.000_17 * omega.sin()
        - 0.000_05 * (mp - m - 2.0 * f).sin()
        + 0.000_04 * (2.0 * mp + 2.0 * f).sin()
        - 0.000_04 * (mp + m + 2.0 * f).sin()
        + 0.000_04 * (mp - 2.0 * m).sin()
        + 0.000_03 * (mp + m - 2.0 * f).sin()
        + 0.000_03 * (3.0 * m).sin()
        + 0.000_02 * (2.0 * mp - 2.0 * f).sin()
        + 0.000_02 * (mp - m + 2.0 * f).sin()
        - 0.000_02 * (3.0 * mp + m).sin()
}

// Columns: amplitude (days), argument at k=0 (deg), rate per lunation (deg).
#[rustfmt::skip]
const PLANETARY_ARGUMENTS: [(f64, f64, f64); 14] = [
    (0.000_325, 299.77,  0.107_408),
    (0.000_165, 251.88,  0.016_321),
    (0.000_164, 251.83, 26.651_886),
    (0.000_126, 349.42, 36.412_478),
    (0.000_110,  84.66, 18.206_239),
    (0.000_062, 141.74, 53.303_771),
    (0.000_060, 207.14,  2.453_732),
    (0.000_056, 154.84,  7.306_860),
    (0.000_047,  34.52, 27.261_239),
    (0.000_042, 207.19,  0.121_824),
    (0.000_040, 291.34,  1.844_379),
    (0.000_037, 161.72, 24.198_154),
    (0.000_035, 239.56, 25.513_099),
    (0.000_023, 331.55,  3.592_518),
];

fn planetary_correction(k: f64, t2: f64) -> f64 {
    PLANETARY_ARGUMENTS
        .iter()
        .enumerate()
        .map(|(i, &(amplitude, base, rate))| {
            // A1 carries a small quadratic term.
            let quadratic = if i == 0 { -0.009_173 * t2 } else { 0.0 };
            amplitude * (base + rate * k + quadratic).to_radians().sin()
        })
        .sum()
}

/// First occurrence of `phase` strictly after `after` (TT).
pub fn next_phase(after: JulianDate, phase: Phase) -> JulianDate {
    let mut lunation = lunation_near(after) - 1;
    loop {
        let candidate = phase_instant(lunation, phase);
        if candidate > after {
            return candidate;
        }
        lunation += 1;
    }
}

/// Lunation number (k, zero at the January 2000 new moon) nearest to `at`.
pub fn lunation_near(at: JulianDate) -> i64 {
    ((at - JulianDate::new(2_451_550.097_66)).value() / SYNODIC_MONTH).round() as i64
}
