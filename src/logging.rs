// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Diagnostics on stderr.
//!
//! Stdout is reserved for the cache path the widget reads back, so every
//! log line goes to stderr. Events carry structured fields:
//!
//! - `builder`: `events`, `seasonal` or `sky`
//! - `path`: cache file
//! - `ttl_secs`, `records`, `year`: builder-specific details
//!
//! # Environment
//!
//! - `RUST_LOG`: filter directives (default `warn`)
//! - `ALMANAC_LOG_FORMAT`: `pretty`, `compact` or `json`
//!
//! ```bash
//! RUST_LOG=almanac_cache=debug event-update --force
//! ALMANAC_LOG_FORMAT=json sky-update
//! ```

use std::{fmt as std_fmt, io};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{
    fmt::{self, format::Writer},
    prelude::*,
    EnvFilter, Layer,
};

/// Environment variable selecting the output format.
pub const FORMAT_VAR: &str = "ALMANAC_LOG_FORMAT";

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "warn";

/// One line per event, tagged with the binary name.
struct AlmanacFormatter {
    tag: &'static str,
    with_ansi: bool,
}

impl<S, N> FormatEvent<S, N> for AlmanacFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std_fmt::Result {
        let meta = event.metadata();

        write!(
            writer,
            "{} ",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )?;

        if self.with_ansi {
            let level_style = match *meta.level() {
                tracing::Level::ERROR => "\x1b[31m",
                tracing::Level::WARN => "\x1b[33m",
                tracing::Level::INFO => "\x1b[32m",
                tracing::Level::DEBUG => "\x1b[34m",
                tracing::Level::TRACE => "\x1b[35m",
            };
            write!(writer, "{}{:5}({})\x1b[0m: ", level_style, meta.level(), self.tag)?;
        } else {
            write!(writer, "{:5}({}): ", meta.level(), self.tag)?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Log format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Coloured, for terminals.
    Pretty,
    /// Plain text, for conky's exec logs and cron mail.
    Compact,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format name; anything unrecognised is `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "pretty" => Some(Self::Pretty),
            "compact" => Some(Self::Compact),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Reads [`FORMAT_VAR`], defaulting to compact.
    pub fn from_env() -> Self {
        std::env::var(FORMAT_VAR)
            .ok()
            .and_then(|v| Self::parse(&v))
            .unwrap_or(Self::Compact)
    }
}

/// Plain-text layer: no escape codes in the line prefix or the fields.
fn compact_layer<S, W>(tag: &'static str, writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .with_ansi(false)
        .event_format(AlmanacFormatter {
            tag,
            with_ansi: false,
        })
        .with_writer(writer)
}

/// Installs the global subscriber for a binary. Safe to call more than
/// once; later calls are ignored.
pub fn init(tag: &'static str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let result = match LogFormat::from_env() {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .event_format(AlmanacFormatter {
                        tag,
                        with_ansi: true,
                    })
                    .with_writer(io::stderr),
            )
            .try_init(),
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(compact_layer(tag, io::stderr))
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_file(false)
                    .with_line_number(false)
                    .with_ansi(false)
                    .with_writer(io::stderr)
                    .json(),
            )
            .try_init(),
    };
    if result.is_err() {
        tracing::debug!("subscriber already installed");
    }
}
