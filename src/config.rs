// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Suite directories and the `owm.vars` configuration file.
//!
//! # Environment
//!
//! | Variable | Default |
//! |----------|---------|
//! | `CONKY_SUITE_DIR` | `~/.config/conky/gtex62-tech-hud` |
//! | `CONKY_CACHE_DIR` | `${XDG_CACHE_HOME:-~/.cache}/conky` |
//!
//! The resolved directories are published back into the variable set seen
//! by value expansion and by the location helper, so `$CONKY_CACHE_DIR`
//! works in `owm.vars` even when the user never exported it.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Default time-to-live of the event cache, seconds.
pub const DEFAULT_EVENT_TTL: i64 = 86_400;

/// Default time-to-live of the seasonal cache, seconds (one year).
pub const DEFAULT_SEASONAL_TTL: i64 = 31_536_000;

pub const SUITE_DIR_VAR: &str = "CONKY_SUITE_DIR";
pub const CACHE_DIR_VAR: &str = "CONKY_CACHE_DIR";

/// Snapshot of the process environment plus the resolved suite and cache
/// directories.
#[derive(Debug, Clone)]
pub struct SuiteEnv {
    vars: BTreeMap<String, String>,
    home: Option<PathBuf>,
    suite_dir: PathBuf,
    cache_dir: PathBuf,
}

impl SuiteEnv {
    /// Reads the current process environment.
    pub fn from_process() -> Self {
        Self::from_vars(std::env::vars(), dirs::home_dir())
    }

    /// Builds from an explicit variable set; `home` backs `~` expansion.
    pub fn from_vars<I, K, V>(vars: I, home: Option<PathBuf>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut vars: BTreeMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let home_or_cwd = home.clone().unwrap_or_else(|| PathBuf::from("."));

        let suite_dir = non_empty(&vars, SUITE_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                home_or_cwd
                    .join(".config")
                    .join("conky")
                    .join("gtex62-tech-hud")
            });
        let cache_dir = non_empty(&vars, CACHE_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                non_empty(&vars, "XDG_CACHE_HOME")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| home_or_cwd.join(".cache"))
                    .join("conky")
            });

        vars.entry(SUITE_DIR_VAR.to_string())
            .or_insert_with(|| suite_dir.display().to_string());
        vars.entry(CACHE_DIR_VAR.to_string())
            .or_insert_with(|| cache_dir.display().to_string());

        SuiteEnv {
            vars,
            home,
            suite_dir,
            cache_dir,
        }
    }

    pub fn suite_dir(&self) -> &Path {
        &self.suite_dir
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// `$SUITE_DIR/config/owm.vars`.
    pub fn config_path(&self) -> PathBuf {
        self.suite_dir.join("config").join("owm.vars")
    }

    /// `$SUITE_DIR/config/events_extra.txt`.
    pub fn default_extra_path(&self) -> PathBuf {
        self.suite_dir.join("config").join("events_extra.txt")
    }

    /// `$SUITE_DIR/scripts/station_latlon.sh`.
    pub fn location_helper(&self) -> PathBuf {
        self.suite_dir.join("scripts").join("station_latlon.sh")
    }

    /// Looks up a variable, including the published suite/cache dirs.
    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Variables to pass to a child process on top of the inherited
    /// environment.
    pub fn published(&self) -> [(&'static str, &str); 2] {
        [
            (SUITE_DIR_VAR, self.var(SUITE_DIR_VAR).unwrap_or_default()),
            (CACHE_DIR_VAR, self.var(CACHE_DIR_VAR).unwrap_or_default()),
        ]
    }

    /// Shell-style expansion: `$VAR` and `${VAR}` first, then a leading
    /// `~` or `~/`. Unknown variables and `~user` forms are left as written.
    pub fn expand(&self, value: &str) -> String {
        self.expand_tilde(&self.expand_vars(value))
    }

    fn expand_vars(&self, content: &str) -> String {
        let mut result = String::with_capacity(content.len());
        let mut rest = content;

        while let Some(pos) = rest.find('$') {
            result.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];

            if let Some(braced) = after.strip_prefix('{') {
                // ${NAME}: left verbatim when unterminated or unknown.
                match braced.find('}') {
                    Some(end) => {
                        let name = &braced[..end];
                        match self.vars.get(name) {
                            Some(value) => result.push_str(value),
                            None => result.push_str(&rest[pos..pos + 3 + end]),
                        }
                        rest = &braced[end + 1..];
                    }
                    None => {
                        result.push_str(&rest[pos..]);
                        rest = "";
                    }
                }
                continue;
            }

            let name_len = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            if name_len == 0 {
                result.push('$');
                rest = after;
                continue;
            }
            let name = &after[..name_len];
            match self.vars.get(name) {
                Some(value) => result.push_str(value),
                None => {
                    result.push('$');
                    result.push_str(name);
                }
            }
            rest = &after[name_len..];
        }
        result.push_str(rest);
        result
    }

    fn expand_tilde(&self, value: &str) -> String {
        let Some(home) = &self.home else {
            return value.to_string();
        };
        if value == "~" {
            return home.display().to_string();
        }
        match value.strip_prefix("~/") {
            Some(tail) => home.join(tail).display().to_string(),
            None => value.to_string(),
        }
    }

    /// Loads `owm.vars`; a missing or unreadable file yields no settings.
    pub fn load_config(&self) -> ConfigVars {
        ConfigVars::load(&self.config_path(), self)
    }
}

fn non_empty<'a>(vars: &'a BTreeMap<String, String>, name: &str) -> Option<&'a str> {
    vars.get(name).map(String::as_str).filter(|v| !v.is_empty())
}

/// Parsed `KEY=value` settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigVars {
    values: HashMap<String, String>,
}

impl ConfigVars {
    /// Parses `KEY=value` lines. `#` starts a comment anywhere on the
    /// line; later duplicates win.
    pub fn parse(content: &str, env: &SuiteEnv) -> Self {
        let mut values = HashMap::new();
        for raw in content.lines() {
            let line = raw.split('#').next().unwrap_or_default().trim();
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            values.insert(key.trim().to_string(), env.expand(value.trim()));
        }
        ConfigVars { values }
    }

    pub fn load(path: &Path, env: &SuiteEnv) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content, env),
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "config not readable, using defaults");
                ConfigVars::default()
            }
        }
    }

    /// Value for `key`; empty values count as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn path(&self, key: &str) -> Option<PathBuf> {
        self.get(key).map(PathBuf::from)
    }

    /// Integer seconds for `key`, falling back to `default` when unset or
    /// not an integer.
    pub fn ttl(&self, key: &str, default: i64) -> i64 {
        let Some(raw) = self.values.get(key) else {
            return default;
        };
        match raw.trim().parse::<i64>() {
            Ok(ttl) => ttl,
            Err(_) => {
                tracing::warn!(key, value = %raw, default, "invalid TTL, using default");
                default
            }
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Settings of the event cache builder.
#[derive(Debug, Clone, PartialEq)]
pub struct EventSettings {
    pub cache_path: PathBuf,
    pub ttl_secs: i64,
    pub extra_path: PathBuf,
    pub zone: Option<String>,
}

impl EventSettings {
    pub fn resolve(config: &ConfigVars, env: &SuiteEnv) -> Self {
        let cache_path = config
            .path("EVENT_CACHE")
            .or_else(|| config.path("EVENTS_CACHE"))
            .unwrap_or_else(|| env.cache_dir().join("events_cache.txt"));
        EventSettings {
            cache_path,
            ttl_secs: config.ttl("EVENT_TTL", DEFAULT_EVENT_TTL),
            extra_path: config
                .path("EVENT_EXTRA")
                .unwrap_or_else(|| env.default_extra_path()),
            zone: config.get("TZ").map(str::to_string),
        }
    }
}

/// Settings of the seasonal cache builder.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalSettings {
    pub cache_path: PathBuf,
    pub ttl_secs: i64,
    pub zone: Option<String>,
}

impl SeasonalSettings {
    pub fn resolve(config: &ConfigVars, env: &SuiteEnv) -> Self {
        SeasonalSettings {
            cache_path: config
                .path("SEASONAL_CACHE")
                .unwrap_or_else(|| env.cache_dir().join("seasonal.vars")),
            ttl_secs: config.ttl("SEASONAL_TTL", DEFAULT_SEASONAL_TTL),
            zone: config.get("TZ").map(str::to_string),
        }
    }
}
