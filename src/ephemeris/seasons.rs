// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Equinoxes and solstices (Meeus ch. 27, years 1000–3000).
//!
//! Mean instants from table 27.B corrected by the 24 periodic terms of
//! table 27.C; accuracy is about a minute for the present era.

use crate::JulianDate;

/// The four cardinal points of the solar year (northern-hemisphere naming
/// follows the calendar month).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    MarchEquinox,
    JuneSolstice,
    SeptemberEquinox,
    DecemberSolstice,
}

impl Season {
    pub const ALL: [Season; 4] = [
        Season::MarchEquinox,
        Season::JuneSolstice,
        Season::SeptemberEquinox,
        Season::DecemberSolstice,
    ];

    pub fn is_equinox(self) -> bool {
        matches!(self, Season::MarchEquinox | Season::SeptemberEquinox)
    }

    /// Mean-instant polynomial coefficients in `Y = (year - 2000) / 1000`.
    fn coefficients(self) -> [f64; 5] {
        match self {
            Season::MarchEquinox => [2_451_623.809_84, 365_242.374_04, 0.051_69, -0.004_11, -0.000_57],
            Season::JuneSolstice => [2_451_716.567_67, 365_241.626_03, 0.003_25, 0.008_88, -0.000_30],
            Season::SeptemberEquinox => {
                [2_451_810.217_15, 365_242.017_67, -0.115_75, 0.003_37, 0.000_78]
            }
            Season::DecemberSolstice => {
                [2_451_900.059_52, 365_242.740_49, -0.062_23, -0.008_23, 0.000_32]
            }
        }
    }
}

// Columns: A, B (deg), C (deg per century).
#[rustfmt::skip]
const PERIODIC_TERMS: [(f64, f64, f64); 24] = [
    (485.0, 324.96,   1_934.136),
    (203.0, 337.23,  32_964.467),
    (199.0, 342.08,      20.186),
    (182.0,  27.85, 445_267.112),
    (156.0,  73.14,  45_036.886),
    (136.0, 171.52,  22_518.443),
    ( 77.0, 222.54,  65_928.934),
    ( 74.0, 296.72,   3_034.906),
    ( 70.0, 243.58,   9_037.513),
    ( 58.0, 119.81,  33_718.147),
    ( 52.0, 297.17,     150.678),
    ( 50.0,  21.02,   2_281.232),
    ( 45.0, 247.54,  29_929.562),
    ( 44.0, 325.15,  31_555.956),
    ( 29.0,  60.93,   4_443.417),
    ( 18.0, 155.12,  67_555.328),
    ( 17.0, 288.79,   4_562.452),
    ( 16.0, 198.04,  62_894.029),
    ( 14.0, 199.76,  31_436.921),
    ( 12.0,  95.39,  14_577.848),
    ( 12.0, 287.11,  31_931.756),
    ( 12.0, 320.81,  34_777.259),
    (  9.0, 227.73,   1_222.114),
    (  8.0,  15.45,  16_859.074),
];

/// Instant (TT) of `season` in `year`.
pub fn season_instant(year: i32, season: Season) -> JulianDate {
    let y = (f64::from(year) - 2000.0) / 1000.0;
    let c = season.coefficients();
    let jde0 = c[0] + y * (c[1] + y * (c[2] + y * (c[3] + y * c[4])));

    let t = (jde0 - JulianDate::J2000.value()) / JulianDate::JULIAN_CENTURY.value();
    let w = (35_999.373 * t - 2.47).to_radians();
    let dlambda = 1.0 + 0.0334 * w.cos() + 0.0007 * (2.0 * w).cos();
    let s: f64 = PERIODIC_TERMS
        .iter()
        .map(|&(a, b, rate)| a * (b + rate * t).to_radians().cos())
        .sum();

    JulianDate::new(jde0 + 0.000_01 * s / dlambda)
}

pub fn march_equinox(year: i32) -> JulianDate {
    season_instant(year, Season::MarchEquinox)
}

pub fn june_solstice(year: i32) -> JulianDate {
    season_instant(year, Season::JuneSolstice)
}

pub fn september_equinox(year: i32) -> JulianDate {
    season_instant(year, Season::SeptemberEquinox)
}

pub fn december_solstice(year: i32) -> JulianDate {
    season_instant(year, Season::DecemberSolstice)
}

/// Earliest event of the given kinds strictly after `after`.
fn next_of(after: JulianDate, kinds: [Season; 2]) -> JulianDate {
    // decimal_year is approximate near Jan 1; look one year either side.
    let year = after.decimal_year().floor() as i32;
    let mut best: Option<JulianDate> = None;
    for y in (year - 1)..=(year + 1) {
        for kind in kinds {
            let candidate = season_instant(y, kind);
            if candidate > after && best.map_or(true, |b| candidate < b) {
                best = Some(candidate);
            }
        }
    }
    // Unreachable in practice: the year after always has a later event.
    best.unwrap_or_else(|| season_instant(year + 2, kinds[0]))
}

/// Next March or September equinox after `after`.
pub fn next_equinox(after: JulianDate) -> JulianDate {
    next_of(after, [Season::MarchEquinox, Season::SeptemberEquinox])
}

/// Next June or December solstice after `after`.
pub fn next_solstice(after: JulianDate) -> JulianDate {
    next_of(after, [Season::JuneSolstice, Season::DecemberSolstice])
}
