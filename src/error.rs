// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

use std::path::PathBuf;

use crate::ephemeris::Body;

/// Errors surfaced by the library.
///
/// Most cache-builder failures degrade to defaults instead of reaching
/// this type; the variants here are the conditions a caller has to act on.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The body stays above the rise/set altitude for the whole search window.
    #[error("{0} is always above the horizon")]
    AlwaysUp(Body),

    /// The body stays below the rise/set altitude for the whole search window.
    #[error("{0} never rises above the horizon")]
    NeverUp(Body),

    /// Neither the location helper nor `LAT`/`LON` produced coordinates.
    #[error("couldn't determine observer latitude/longitude")]
    LocationUnavailable,

    /// An instant fell outside chrono's representable range.
    #[error("instant outside the representable calendar range")]
    OutOfRange,

    /// Filesystem failure with the offending path attached.
    #[error("{action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// Whether this is one of the circumpolar rise/set conditions.
    pub fn is_circumpolar(&self) -> bool {
        matches!(self, Error::AlwaysUp(_) | Error::NeverUp(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_body() {
        assert_eq!(
            Error::AlwaysUp(Body::Moon).to_string(),
            "Moon is always above the horizon"
        );
        assert!(Error::NeverUp(Body::Moon).is_circumpolar());
        assert!(!Error::LocationUnavailable.is_circumpolar());
    }

    #[test]
    fn io_errors_carry_path() {
        let err = Error::io(
            "writing",
            "/tmp/sky.vars",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "writing /tmp/sky.vars: denied");
    }
}
