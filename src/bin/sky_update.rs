// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! `sky-update`: write current Moon/planet positions for the observer and
//! print the cache path. Exits with status 2 when no location is known.

use std::process::ExitCode;

use almanac_cache::cli::RefreshArgs;
use almanac_cache::config::SuiteEnv;
use almanac_cache::{logging, sky};
use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;

fn main() -> Result<ExitCode> {
    logging::init("sky-update");
    // --force is accepted for symmetry; the sky cache is always rebuilt.
    let _args = RefreshArgs::parse();

    let env = SuiteEnv::from_process();
    let observer = match sky::resolve_location(&env) {
        Ok(observer) => observer,
        Err(err) => {
            tracing::error!(builder = "sky", error = %err, "no observer location");
            for line in sky::LOCATION_ERROR_LINES {
                println!("{line}");
            }
            return Ok(ExitCode::from(2));
        }
    };

    let outcome = sky::refresh(&env, observer, Utc::now())
        .with_context(|| format!("refreshing {}", sky::cache_path(&env).display()))?;

    println!("{}", outcome.path().display());
    Ok(ExitCode::SUCCESS)
}
