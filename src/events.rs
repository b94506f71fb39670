// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Event calendar cache (`events_cache.txt`).
//!
//! One `date|name|category` line per event, sorted by date, then name,
//! then category. Events cover the previous, current and next year in the
//! configured zone:
//!
//! - equinoxes and solstices
//! - the four principal moon phases
//! - DST start/end
//! - user entries from the extra-events file

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::cache::{self, Refresh};
use crate::config::EventSettings;
use crate::ephemeris::{next_equinox, next_phase, next_solstice, Phase};
use crate::error::Result;
use crate::{zone, JulianDate};

pub const CATEGORY_EQUINOX: &str = "Equinox";
pub const CATEGORY_SOLSTICE: &str = "Solstice";
pub const CATEGORY_MOON_PHASE: &str = "Moon Phase";
pub const CATEGORY_DST: &str = "DST";

/// A calendar entry. Ordering is by date, then name, then category.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventRecord {
    pub date: String,
    pub name: String,
    pub category: String,
}

impl EventRecord {
    pub fn new(
        date: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        EventRecord {
            date: date.into(),
            name: name.into(),
            category: category.into(),
        }
    }
}

impl fmt::Display for EventRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.category.is_empty() {
            write!(f, "{}|{}", self.date, self.name)
        } else {
            write!(f, "{}|{}|{}", self.date, self.name, self.category)
        }
    }
}

/// Deduplicated, sorted collection of events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventStore {
    records: BTreeSet<EventRecord>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an event; records without a date or name are ignored.
    /// Returns whether the record was new.
    pub fn add(&mut self, date: &str, name: &str, category: &str) -> bool {
        if date.is_empty() || name.is_empty() {
            return false;
        }
        self.records.insert(EventRecord::new(date, name, category))
    }

    fn add_instant(&mut self, at: JulianDate, tz: Tz, name: &str, category: &str) {
        match at.to_utc() {
            Some(utc) => {
                self.add(&zone::local_date(utc, tz).to_string(), name, category);
            }
            None => tracing::warn!(event = name, "event instant out of calendar range"),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventRecord> {
        self.records.iter()
    }

    /// Cache file contents, one newline-terminated line per record.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for record in &self.records {
            out.push_str(&record.to_string());
            out.push('\n');
        }
        out
    }
}

/// Vernal equinox, summer solstice, autumnal equinox and winter solstice
/// of `year`, found by chained searches from January 1st 00:00 UT.
pub fn seasonal_events(year: i32, tz: Tz, store: &mut EventStore) {
    let Some(start) = JulianDate::new_year(year) else {
        return;
    };
    let spring = next_equinox(start);
    let summer = next_solstice(spring);
    let autumn = next_equinox(summer);
    let winter = next_solstice(autumn);

    store.add_instant(spring, tz, "Vernal Equinox", CATEGORY_EQUINOX);
    store.add_instant(summer, tz, "Summer Solstice", CATEGORY_SOLSTICE);
    store.add_instant(autumn, tz, "Autumnal Equinox", CATEGORY_EQUINOX);
    store.add_instant(winter, tz, "Winter Solstice", CATEGORY_SOLSTICE);
}

/// Every principal moon phase falling in `[Jan 1, Jan 1 next year)` UT.
pub fn moon_phase_events(year: i32, tz: Tz, store: &mut EventStore) {
    let (Some(start), Some(end)) = (JulianDate::new_year(year), JulianDate::new_year(year + 1))
    else {
        return;
    };
    for phase in Phase::ALL {
        let mut cursor = start;
        loop {
            let next = next_phase(cursor, phase);
            if next >= end {
                break;
            }
            store.add_instant(next, tz, phase.label(), CATEGORY_MOON_PHASE);
            cursor = next.plus_minutes(1.0);
        }
    }
}

/// DST start/end dates of `year` in `tz`, if the zone observes DST.
pub fn dst_events(year: i32, tz: Tz, store: &mut EventStore) {
    let dst = zone::dst_transitions(year, tz);
    if let Some(start) = dst.start {
        store.add(&start.to_string(), "DST Start", CATEGORY_DST);
    }
    if let Some(end) = dst.end {
        store.add(&end.to_string(), "DST End", CATEGORY_DST);
    }
}

fn is_date_shaped(date: &str) -> bool {
    let chars: Vec<char> = date.chars().collect();
    chars.len() == 10 && chars[4] == '-' && chars[7] == '-'
}

/// Parses `date|name[|category]` lines. Comments (`#`) are stripped;
/// lines with fewer than two fields or a malformed date are skipped.
/// Returns the number of lines accepted.
pub fn parse_extra_events(content: &str, store: &mut EventStore) -> usize {
    let mut accepted = 0;
    for raw in content.lines() {
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.split('|').map(str::trim).collect();
        if parts.len() < 2 {
            continue;
        }
        let (date, name) = (parts[0], parts[1]);
        let category = parts.get(2).copied().unwrap_or_default();
        if !is_date_shaped(date) {
            tracing::debug!(line = raw, "skipping extra event with malformed date");
            continue;
        }
        if !name.is_empty() {
            store.add(date, name, category);
            accepted += 1;
        }
    }
    accepted
}

/// Merges the extra-events file at `path`; a missing file adds nothing.
pub fn load_extra_events(path: &Path, store: &mut EventStore) -> usize {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_extra_events(&content, store),
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "no extra events");
            0
        }
    }
}

/// Computes the full event set for the years around `now`.
pub fn build(now: DateTime<Utc>, tz: Tz, extra_path: &Path) -> EventStore {
    let year = zone::local_year(now, tz);
    let mut store = EventStore::new();
    for y in [year - 1, year, year + 1] {
        seasonal_events(y, tz, &mut store);
        moon_phase_events(y, tz, &mut store);
        dst_events(y, tz, &mut store);
    }
    let extras = load_extra_events(extra_path, &mut store);
    tracing::debug!(zone = %tz, year, extras, records = store.len(), "events computed");
    store
}

/// Regenerates the event cache unless it is still fresh.
pub fn refresh(settings: &EventSettings, force: bool, now: DateTime<Utc>) -> Result<Refresh> {
    let path = &settings.cache_path;
    if !force && cache::is_fresh(path, settings.ttl_secs, SystemTime::from(now)) {
        tracing::info!(builder = "events", path = %path.display(), ttl_secs = settings.ttl_secs, "cache fresh");
        return Ok(Refresh::Fresh(path.clone()));
    }

    let tz = zone::resolve_zone(settings.zone.as_deref());
    let store = build(now, tz, &settings.extra_path);
    cache::write_atomic(path, &store.render())?;
    tracing::info!(builder = "events", path = %path.display(), records = store.len(), "cache written");
    Ok(Refresh::Written(path.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn record_rendering() {
        assert_eq!(
            EventRecord::new("2026-03-20", "Vernal Equinox", "Equinox").to_string(),
            "2026-03-20|Vernal Equinox|Equinox"
        );
        assert_eq!(
            EventRecord::new("2026-07-04", "Picnic", "").to_string(),
            "2026-07-04|Picnic"
        );
    }

    #[test]
    fn store_sorts_and_dedups() {
        let mut store = EventStore::new();
        assert!(store.add("2026-05-01", "B", "x"));
        assert!(store.add("2026-05-01", "A", "y"));
        assert!(store.add("2026-01-01", "Z", ""));
        assert!(!store.add("2026-05-01", "B", "x"));
        assert!(store.add("2026-05-01", "B", "w"));
        assert!(!store.add("", "nameless", ""));
        assert!(!store.add("2026-01-02", "", "c"));
        assert_eq!(
            store.render(),
            "2026-01-01|Z\n2026-05-01|A|y\n2026-05-01|B|w\n2026-05-01|B|x\n"
        );
    }

    #[test]
    fn extra_event_parsing() {
        let content = "\
# birthdays
2026-07-04 | Picnic
2026-12-25|Christmas|Holiday   # trailing
2026/12/31|Bad separators|x
26-1-1|Short|x
2026-01-01
2026-02-02||Nameless

2026-03-03|Three|Cat|Extra
";
        let mut store = EventStore::new();
        assert_eq!(parse_extra_events(content, &mut store), 3);
        let lines: Vec<String> = store.iter().map(|r| r.to_string()).collect();
        assert_eq!(
            lines,
            [
                "2026-03-03|Three|Cat",
                "2026-07-04|Picnic",
                "2026-12-25|Christmas|Holiday",
            ]
        );
    }

    #[test]
    fn missing_extra_file_adds_nothing() {
        let mut store = EventStore::new();
        assert_eq!(load_extra_events(Path::new("/nonexistent/extra.txt"), &mut store), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn one_year_of_markers_in_utc() {
        let mut store = EventStore::new();
        seasonal_events(2026, Tz::UTC, &mut store);
        let seasonal: Vec<String> = store.iter().map(|r| r.to_string()).collect();
        assert_eq!(
            seasonal,
            [
                "2026-03-20|Vernal Equinox|Equinox",
                "2026-06-21|Summer Solstice|Solstice",
                "2026-09-23|Autumnal Equinox|Equinox",
                "2026-12-21|Winter Solstice|Solstice",
            ]
        );
    }

    #[test]
    fn moon_phases_stay_within_the_year() {
        let mut store = EventStore::new();
        moon_phase_events(2026, Tz::UTC, &mut store);
        for phase in Phase::ALL {
            let dates: Vec<&str> = store
                .iter()
                .filter(|r| r.name == phase.label())
                .map(|r| r.date.as_str())
                .collect();
            assert!((12..=13).contains(&dates.len()), "{phase:?}: {dates:?}");
            assert!(dates.iter().all(|d| d.starts_with("2026-")));
        }
        assert!(store.iter().all(|r| r.category == CATEGORY_MOON_PHASE));
    }

    #[test]
    fn dst_records_for_chicago() {
        let mut store = EventStore::new();
        dst_events(2026, chrono_tz::America::Chicago, &mut store);
        assert_eq!(store.render(), "2026-03-08|DST Start|DST\n2026-11-01|DST End|DST\n");

        let mut none = EventStore::new();
        dst_events(2026, Tz::UTC, &mut none);
        assert!(none.is_empty());
    }

    #[test]
    fn build_covers_three_years() {
        let now = Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap();
        let store = build(now, Tz::UTC, Path::new("/nonexistent"));
        let equinoxes = store.iter().filter(|r| r.category == CATEGORY_EQUINOX).count();
        assert_eq!(equinoxes, 6);
        let first = store.iter().next().unwrap();
        let last = store.iter().last().unwrap();
        assert!(first.date.starts_with("2025-"));
        assert!(last.date.starts_with("2027-"));
    }
}
