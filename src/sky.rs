// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Sky snapshot cache (`sky.vars`).
//!
//! Azimuth, altitude and horizon-arc theta of the Moon and five planets
//! for an observer, plus the Moon's rise/set window. Always recomputed.

use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::cache::{self, Refresh};
use crate::config::SuiteEnv;
use crate::ephemeris::{Body, Horizontal, Observer};
use crate::error::{Error, Result};
use crate::vars::VarFile;
use crate::{JulianDate, UtcPeriod};

/// Longest rise-to-set span accepted as a moon window, seconds.
pub const MAX_WINDOW_SECS: i64 = 18 * 3_600;

/// Printed on stdout when no coordinates can be found.
pub const LOCATION_ERROR_LINES: [&str; 2] = [
    "ERROR: Couldn't determine LAT/LON.",
    "Fix: ensure scripts/station_latlon.sh outputs lat lon, or run with LAT=.. LON=..",
];

/// First two float tokens of the helper's output, with `,` and `=`
/// treated as separators (`32.9 -96.8`, `LAT=32.9 LON=-96.8`,
/// `32.9,-96.8`).
pub fn parse_location_output(output: &str) -> Option<(f64, f64)> {
    let normalized = output.replace([',', '='], " ");
    let mut floats = normalized
        .split_whitespace()
        .filter_map(|tok| tok.parse::<f64>().ok());
    Some((floats.next()?, floats.next()?))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Runs `$SUITE_DIR/scripts/station_latlon.sh` if it is executable.
pub fn run_location_helper(env: &SuiteEnv) -> Option<(f64, f64)> {
    let helper = env.location_helper();
    if !is_executable(&helper) {
        tracing::debug!(helper = %helper.display(), "location helper not available");
        return None;
    }
    let output = match Command::new(&helper).envs(env.published()).output() {
        Ok(output) => output,
        Err(err) => {
            tracing::warn!(helper = %helper.display(), error = %err, "location helper failed to start");
            return None;
        }
    };
    if !output.status.success() {
        tracing::warn!(helper = %helper.display(), status = %output.status, "location helper failed");
        return None;
    }
    let parsed = parse_location_output(&String::from_utf8_lossy(&output.stdout));
    if parsed.is_none() {
        tracing::warn!(helper = %helper.display(), "location helper printed no coordinates");
    }
    parsed
}

/// `LAT` and `LON` from the environment; both must parse.
pub fn location_from_env(env: &SuiteEnv) -> Option<(f64, f64)> {
    let lat = env.var("LAT")?.trim().parse().ok()?;
    let lon = env.var("LON")?.trim().parse().ok()?;
    Some((lat, lon))
}

/// Observer from the helper, else from `LAT`/`LON`.
pub fn resolve_location(env: &SuiteEnv) -> Result<Observer> {
    let (lat, lon) = run_location_helper(env)
        .or_else(|| location_from_env(env))
        .ok_or(Error::LocationUnavailable)?;
    Ok(Observer::new(lat, lon))
}

/// Previous/next moon risings and settings around an instant, truncated
/// to whole seconds. `None` when the Moon is always up or never up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoonEvents {
    pub previous_rising: Option<DateTime<Utc>>,
    pub previous_setting: Option<DateTime<Utc>>,
    pub next_rising: Option<DateTime<Utc>>,
    pub next_setting: Option<DateTime<Utc>>,
}

fn event_instant(result: Result<JulianDate>, what: &str) -> Option<DateTime<Utc>> {
    match result {
        Ok(jd) => {
            let utc = jd.to_utc()?;
            DateTime::from_timestamp(utc.timestamp(), 0)
        }
        Err(err) if err.is_circumpolar() => {
            tracing::debug!(event = what, error = %err, "moon event unavailable");
            None
        }
        Err(err) => {
            tracing::warn!(event = what, error = %err, "moon event search failed");
            None
        }
    }
}

impl MoonEvents {
    pub fn search(observer: &Observer, at: JulianDate) -> Self {
        MoonEvents {
            previous_rising: event_instant(
                observer.previous_rising(Body::Moon, at),
                "previous_rising",
            ),
            previous_setting: event_instant(
                observer.previous_setting(Body::Moon, at),
                "previous_setting",
            ),
            next_rising: event_instant(observer.next_rising(Body::Moon, at), "next_rising"),
            next_setting: event_instant(observer.next_setting(Body::Moon, at), "next_setting"),
        }
    }
}

fn span_ok(window: &UtcPeriod) -> bool {
    let span = window.duration_seconds();
    span > 0 && span <= MAX_WINDOW_SECS
}

/// Picks the moon's rise/set window relative to `now`:
///
/// 1. `[previous rising, next setting]` when it brackets `now` (Moon up);
/// 2. else `[next rising, next setting]` when the rising comes first;
/// 3. else `[previous rising, previous setting]` when it brackets `now`.
///
/// Every candidate must span more than zero and at most 18 hours.
pub fn select_moon_window(events: &MoonEvents, now: DateTime<Utc>) -> Option<UtcPeriod> {
    let candidate = |rise: Option<DateTime<Utc>>, set: Option<DateTime<Utc>>| {
        Some(UtcPeriod::new(rise?, set?)).filter(span_ok)
    };

    let up_now = candidate(events.previous_rising, events.next_setting)
        .filter(|w| w.contains(&now));
    let upcoming = || {
        candidate(events.next_rising, events.next_setting).filter(UtcPeriod::is_forward)
    };
    let earlier = || {
        candidate(events.previous_rising, events.previous_setting)
            .filter(|w| w.is_forward() && w.contains(&now))
    };
    up_now.or_else(upcoming).or_else(earlier)
}

/// Apparent position of one body.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BodyPosition {
    pub body: Body,
    pub azimuth: f64,
    pub altitude: f64,
    pub theta: f64,
}

impl BodyPosition {
    fn new(body: Body, h: Horizontal) -> Self {
        BodyPosition {
            body,
            azimuth: h.azimuth,
            altitude: h.altitude,
            theta: h.theta(),
        }
    }
}

/// Everything written to `sky.vars` for one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct SkySnapshot {
    pub observer: Observer,
    pub at: DateTime<Utc>,
    pub positions: Vec<BodyPosition>,
    pub moon_events: MoonEvents,
    pub moon_window: Option<UtcPeriod>,
}

impl SkySnapshot {
    pub fn compute(observer: Observer, now: DateTime<Utc>) -> Self {
        let jd = JulianDate::from_utc(now);
        let positions = Body::ALL
            .iter()
            .map(|&body| BodyPosition::new(body, observer.position(body, jd)))
            .collect();
        let moon_events = MoonEvents::search(&observer, jd);
        let moon_window = select_moon_window(&moon_events, now);
        SkySnapshot {
            observer,
            at: now,
            positions,
            moon_events,
            moon_window,
        }
    }

    pub fn to_vars(&self) -> VarFile {
        let mut vars = VarFile::new();
        vars.push("LAT", format!("{:?}", self.observer.latitude));
        vars.push("LON", format!("{:?}", self.observer.longitude));
        vars.push("TS", self.at.timestamp());

        for pos in &self.positions {
            let key = pos.body.key();
            vars.push_fixed3(format!("{key}_AZ"), pos.azimuth);
            vars.push_fixed3(format!("{key}_ALT"), pos.altitude);
            vars.push_fixed3(format!("{key}_THETA"), pos.theta);

            if pos.body == Body::Moon {
                if let Some(window) = &self.moon_window {
                    vars.push("MOON_RISE_TS", window.start.timestamp());
                    vars.push("MOON_SET_TS", window.end.timestamp());
                }
                if let Some(prev_set) = self.moon_events.previous_setting {
                    vars.push("MOON_SET_PREV_TS", prev_set.timestamp());
                }
            }
        }
        vars
    }
}

/// `$CACHE_DIR/sky.vars`.
pub fn cache_path(env: &SuiteEnv) -> PathBuf {
    env.cache_dir().join("sky.vars")
}

/// Computes and writes the sky cache for `observer` at `now`.
pub fn refresh(env: &SuiteEnv, observer: Observer, now: DateTime<Utc>) -> Result<Refresh> {
    let path = cache_path(env);
    let snapshot = SkySnapshot::compute(observer, now);
    cache::write_atomic(&path, &snapshot.to_vars().render())?;
    tracing::info!(
        builder = "sky",
        path = %path.display(),
        lat = observer.latitude,
        lon = observer.longitude,
        moon_window = snapshot.moon_window.is_some(),
        "cache written"
    );
    Ok(Refresh::Written(path))
}
