// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Civil time zones: resolution, local dates and DST transitions.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use chrono_tz::{OffsetComponents, Tz};

/// Resolves an IANA zone name, falling back to the system zone.
pub fn resolve_zone(name: Option<&str>) -> Tz {
    if let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) {
        match name.parse::<Tz>() {
            Ok(tz) => return tz,
            Err(err) => {
                tracing::warn!(zone = name, error = %err, "unknown time zone, using system zone")
            }
        }
    }
    system_zone()
}

/// The host's local zone, or UTC when it cannot be determined.
pub fn system_zone() -> Tz {
    match iana_time_zone::get_timezone() {
        Ok(name) => name.parse::<Tz>().unwrap_or_else(|_| {
            tracing::warn!(zone = %name, "system zone not in tz database, using UTC");
            Tz::UTC
        }),
        Err(err) => {
            tracing::warn!(error = %err, "cannot determine system zone, using UTC");
            Tz::UTC
        }
    }
}

/// Calendar date of `instant` in `tz`.
pub fn local_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Calendar year of `instant` in `tz`.
pub fn local_year(instant: DateTime<Utc>, tz: Tz) -> i32 {
    local_date(instant, tz).year()
}

/// Unix seconds of 12:00 local time on `date`.
pub fn local_noon_timestamp(date: NaiveDate, tz: Tz) -> Option<i64> {
    let noon = date.and_hms_opt(12, 0, 0)?;
    tz.from_local_datetime(&noon)
        .earliest()
        .map(|dt| dt.timestamp())
}

/// Whether daylight-saving time is in effect at 12:00 local on `date`.
pub fn is_dst_at_noon(date: NaiveDate, tz: Tz) -> bool {
    date.and_hms_opt(12, 0, 0)
        .and_then(|noon| tz.from_local_datetime(&noon).earliest())
        .is_some_and(|dt| dt.offset().dst_offset() != chrono::Duration::zero())
}

/// First DST start and first DST end dates within a year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DstTransitions {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Scans every day of `year` at local noon and records the first day the
/// DST flag turns on and the first day it turns off.
pub fn dst_transitions(year: i32, tz: Tz) -> DstTransitions {
    let mut found = DstTransitions::default();
    let Some(jan1) = NaiveDate::from_ymd_opt(year, 1, 1) else {
        return found;
    };

    let mut prev: Option<bool> = None;
    for date in jan1.iter_days().take_while(|d| d.year() == year) {
        let cur = is_dst_at_noon(date, tz);
        if let Some(was) = prev {
            if !was && cur && found.start.is_none() {
                found.start = Some(date);
            }
            if was && !cur && found.end.is_none() {
                found.end = Some(date);
            }
        }
        prev = Some(cur);
    }
    found
}
