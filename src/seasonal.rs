// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Seasonal variable cache (`seasonal.vars`): this year's equinoxes,
//! solstices and DST transitions.

use std::time::SystemTime;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::cache::{self, Refresh};
use crate::config::SeasonalSettings;
use crate::ephemeris::{next_equinox, next_solstice};
use crate::error::{Error, Result};
use crate::vars::VarFile;
use crate::{zone, JulianDate};

/// Variable prefixes in output order.
pub const SEASON_KEYS: [&str; 4] = ["SPRING_EQ", "SUMMER_SOL", "AUTUMN_EQ", "WINTER_SOL"];

/// The four seasonal instants of `year`, chained from January 1st 00:00 UT.
pub fn season_instants(year: i32) -> Option<[JulianDate; 4]> {
    let start = JulianDate::new_year(year)?;
    let spring = next_equinox(start);
    let summer = next_solstice(spring);
    let autumn = next_equinox(summer);
    let winter = next_solstice(autumn);
    Some([spring, summer, autumn, winter])
}

/// Builds the variable file for `year`.
pub fn build(year: i32, tz: Tz, now: DateTime<Utc>) -> Result<VarFile> {
    let instants = season_instants(year).ok_or(Error::OutOfRange)?;

    let mut vars = VarFile::new();
    vars.push("YEAR", year);
    for (key, instant) in SEASON_KEYS.iter().zip(instants) {
        let ts = instant.unix_seconds().ok_or(Error::OutOfRange)?;
        let truncated = DateTime::from_timestamp(ts, 0).ok_or(Error::OutOfRange)?;
        vars.push(format!("{key}_DATE"), zone::local_date(truncated, tz));
        vars.push(format!("{key}_TS"), ts);
    }

    let dst = zone::dst_transitions(year, tz);
    for (key, date) in [("DST_START", dst.start), ("DST_END", dst.end)] {
        let Some(date) = date else { continue };
        let Some(ts) = zone::local_noon_timestamp(date, tz) else {
            continue;
        };
        vars.push(format!("{key}_DATE"), date);
        vars.push(format!("{key}_TS"), ts);
    }

    vars.push("UPDATED_TS", now.timestamp());
    Ok(vars)
}

/// Regenerates the seasonal cache unless it is still fresh.
pub fn refresh(settings: &SeasonalSettings, force: bool, now: DateTime<Utc>) -> Result<Refresh> {
    let path = &settings.cache_path;
    if !force && cache::is_fresh(path, settings.ttl_secs, SystemTime::from(now)) {
        tracing::info!(builder = "seasonal", path = %path.display(), ttl_secs = settings.ttl_secs, "cache fresh");
        return Ok(Refresh::Fresh(path.clone()));
    }

    let tz = zone::resolve_zone(settings.zone.as_deref());
    let year = zone::local_year(now, tz);
    let vars = build(year, tz, now)?;
    cache::write_atomic(path, &vars.render())?;
    tracing::info!(builder = "seasonal", path = %path.display(), year, "cache written");
    Ok(Refresh::Written(path.clone()))
}
