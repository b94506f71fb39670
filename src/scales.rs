// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Time-scale markers.
//!
//! | Marker | Axis | Used for |
//! |--------|------|----------|
//! | [`JD`] | Julian Date on TT | every ephemeris formula (JDE) |
//! | [`UT`] | Julian Date on UT | sidereal time, civil timestamps |

use super::instant::TimeScale;
use qtty::Days;

/// Julian Date on the uniform TT axis — the identity scale.
///
/// Meeus' "JDE" values are numerically JD(TT), so ephemeris results are
/// returned directly as `Time<JD>`.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct JD;

impl TimeScale for JD {
    const LABEL: &'static str = "JD(TT)";

    #[inline(always)]
    fn to_jd_tt(value: Days) -> Days {
        value
    }

    #[inline(always)]
    fn from_jd_tt(jd_tt: Days) -> Days {
        jd_tt
    }
}

/// Universal Time — Julian Date tied to Earth's rotation.
///
/// Converting to [`JD`] adds ΔT(UT); the inverse solves
/// `ut + ΔT(ut) = tt` by fixed-point iteration (dΔT/dJD ≈ 10⁻⁸, three
/// rounds are plenty).
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct UT;

impl TimeScale for UT {
    const LABEL: &'static str = "UT";

    #[inline]
    fn to_jd_tt(ut_value: Days) -> Days {
        let jd_ut = super::instant::Time::<JD>::from_days(ut_value);
        let dt_secs = super::delta_t::delta_t_seconds_from_ut(jd_ut);
        ut_value + dt_secs.to::<qtty::Day>()
    }

    #[inline]
    fn from_jd_tt(jd_tt: Days) -> Days {
        let mut ut = jd_tt;
        for _ in 0..3 {
            let jd_ut = super::instant::Time::<JD>::from_days(ut);
            let dt_days = super::delta_t::delta_t_seconds_from_ut(jd_ut).to::<qtty::Day>();
            ut = jd_tt - dt_days;
        }
        ut
    }
}

impl From<super::instant::Time<JD>> for super::instant::Time<UT> {
    #[inline]
    fn from(t: super::instant::Time<JD>) -> Self {
        t.to::<UT>()
    }
}

impl From<super::instant::Time<UT>> for super::instant::Time<JD> {
    #[inline]
    fn from(t: super::instant::Time<UT>) -> Self {
        t.to::<JD>()
    }
}
