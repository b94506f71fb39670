// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Command-line arguments shared by the three builders.

use clap::Parser;

/// Arguments accepted by every cache builder.
#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Refresh an almanac cache file and print its path", long_about = None)]
pub struct RefreshArgs {
    /// Regenerate even if the cache is within its TTL
    #[arg(short, long)]
    pub force: bool,
}
