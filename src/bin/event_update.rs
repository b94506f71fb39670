// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! `event-update`: refresh the event calendar cache and print its path.

use almanac_cache::cli::RefreshArgs;
use almanac_cache::config::{EventSettings, SuiteEnv};
use almanac_cache::{events, logging};
use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;

fn main() -> Result<()> {
    logging::init("event-update");
    let args = RefreshArgs::parse();

    let env = SuiteEnv::from_process();
    let settings = EventSettings::resolve(&env.load_config(), &env);
    let outcome = events::refresh(&settings, args.force, Utc::now())
        .with_context(|| format!("refreshing {}", settings.cache_path.display()))?;

    println!("{}", outcome.path().display());
    Ok(())
}
