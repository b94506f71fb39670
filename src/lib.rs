// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Almanac caches for desktop widgets.
//!
//! Three builders precompute calendar and sky data into flat text files
//! that a widget reads back:
//!
//! | Builder | Binary | File |
//! |---------|--------|------|
//! | [`events`] | `event-update` | `events_cache.txt` (`date\|name\|category`) |
//! | [`seasonal`] | `seasonal-update` | `seasonal.vars` (`KEY=value`) |
//! | [`sky`] | `sky-update` | `sky.vars` (`KEY=value`) |
//!
//! Each run loads `owm.vars` ([`config`]), skips work while the cache is
//! within its TTL ([`cache::is_fresh`]), computes, replaces the file
//! atomically and prints its path.
//!
//! # Time
//!
//! Astronomy runs on [`Time<S>`] instants:
//!
//! - [`JulianDate`] (`Time<JD>`): Julian Date on the TT axis, the input
//!   of every ephemeris formula.
//! - `Time<UT>`: Earth-rotation time; converting to [`JD`] adds ΔT
//!   ([`Time::<UT>::delta_t()`](Time::delta_t)).
//!
//! Civil instants enter through [`Time::from_utc`] and leave through
//! [`Time::to_utc`].
//!
//! # Ephemeris
//!
//! [`ephemeris`] provides equinoxes and solstices, lunar phases, lunar and
//! planetary positions, horizontal coordinates and rise/set searches.

mod delta_t;
pub(crate) mod instant;
mod julian_date_ext;
mod period;
pub(crate) mod scales;

pub mod cache;
pub mod cli;
pub mod config;
pub mod ephemeris;
pub mod error;
pub mod events;
pub mod logging;
pub mod seasonal;
pub mod sky;
pub mod vars;
pub mod zone;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use error::{Error, Result};
pub use instant::{Time, TimeInstant, TimeScale};
pub use period::{Interval, Period, UtcPeriod};
pub use scales::{JD, UT};

/// Julian Date on the TT axis.
pub type JulianDate = Time<JD>;

/// Universal Time, Earth-rotation civil scale.
pub type UniversalTime = Time<UT>;
