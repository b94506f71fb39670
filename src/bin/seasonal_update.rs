// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! `seasonal-update`: refresh this year's seasonal variables and print the
//! cache path.

use almanac_cache::cli::RefreshArgs;
use almanac_cache::config::{SeasonalSettings, SuiteEnv};
use almanac_cache::{logging, seasonal};
use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;

fn main() -> Result<()> {
    logging::init("seasonal-update");
    let args = RefreshArgs::parse();

    let env = SuiteEnv::from_process();
    let settings = SeasonalSettings::resolve(&env.load_config(), &env);
    let outcome = seasonal::refresh(&settings, args.force, Utc::now())
        .with_context(|| format!("refreshing {}", settings.cache_path.display()))?;

    println!("{}", outcome.path().display());
    Ok(())
}
