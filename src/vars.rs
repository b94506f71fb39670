// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Flat `KEY=value` variable files read by the widget.

use std::fmt;

/// An ordered list of `KEY=value` lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VarFile {
    entries: Vec<(String, String)>,
}

impl VarFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `key=value`.
    pub fn push(&mut self, key: impl Into<String>, value: impl fmt::Display) {
        self.entries.push((key.into(), value.to_string()));
    }

    /// Appends a value with three decimals.
    pub fn push_fixed3(&mut self, key: impl Into<String>, value: f64) {
        self.push(key, format!("{value:.3}"));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// File contents: one line per entry, newline-terminated.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for VarFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.entries {
            writeln!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_in_insertion_order() {
        let mut vars = VarFile::new();
        vars.push("YEAR", 2026);
        vars.push("SPRING_EQ_DATE", "2026-03-20");
        vars.push_fixed3("MOON_AZ", 123.456_78);
        vars.push_fixed3("MOON_ALT", -4.0);
        assert_eq!(
            vars.render(),
            "YEAR=2026\nSPRING_EQ_DATE=2026-03-20\nMOON_AZ=123.457\nMOON_ALT=-4.000\n"
        );
        assert_eq!(vars.get("MOON_AZ"), Some("123.457"));
        assert_eq!(vars.keys().next(), Some("YEAR"));
        assert_eq!(vars.len(), 4);
    }

    #[test]
    fn empty_file_renders_nothing() {
        assert_eq!(VarFile::new().render(), "");
        assert!(VarFile::new().is_empty());
    }
}
