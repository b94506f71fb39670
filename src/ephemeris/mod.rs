// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! In-crate ephemeris.
//!
//! Everything here is a pure function of a [`JulianDate`] (TT) and, for
//! horizon quantities, an [`Observer`].
//!
//! | Module | Provides |
//! |--------|----------|
//! | [`coords`] | frames, nutation, precession, sidereal time, refraction |
//! | [`seasons`] | equinoxes and solstices |
//! | [`moon`] | lunar position and principal phases |
//! | [`planets`] | Mercury through Saturn from Keplerian elements |
//!
//! Rise/set searches live on [`Observer`].

pub mod coords;
pub mod moon;
pub mod planets;
mod riseset;
pub mod seasons;

use std::fmt;

pub use coords::{azimuth_to_theta, Equatorial, Horizontal};
pub use moon::{next_phase, Phase};
pub use planets::Planet;
pub use seasons::{next_equinox, next_solstice, Season};

use crate::JulianDate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Bodies tracked by the sky cache, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Body {
    Moon,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Mercury,
}

impl Body {
    pub const ALL: [Body; 6] = [
        Body::Moon,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Mercury,
    ];

    /// Upper-case key prefix used in variable files (`MOON`, `VENUS`, ...).
    pub fn key(self) -> &'static str {
        match self {
            Body::Moon => "MOON",
            Body::Venus => "VENUS",
            Body::Mars => "MARS",
            Body::Jupiter => "JUPITER",
            Body::Saturn => "SATURN",
            Body::Mercury => "MERCURY",
        }
    }

    pub fn planet(self) -> Option<Planet> {
        match self {
            Body::Moon => None,
            Body::Venus => Some(Planet::Venus),
            Body::Mars => Some(Planet::Mars),
            Body::Jupiter => Some(Planet::Jupiter),
            Body::Saturn => Some(Planet::Saturn),
            Body::Mercury => Some(Planet::Mercury),
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Body::Moon => "Moon",
            Body::Venus => "Venus",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Mercury => "Mercury",
        };
        f.write_str(name)
    }
}

/// A place on the Earth's surface. Degrees; longitude positive east.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observer {
    pub latitude: f64,
    pub longitude: f64,
}

impl Observer {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Observer {
            latitude,
            longitude,
        }
    }

    /// Local apparent sidereal time, degrees.
    pub fn local_sidereal_time(&self, at: JulianDate) -> f64 {
        coords::normalize_degrees(coords::apparent_sidereal_time(at) + self.longitude)
    }

    /// Airless altitude/azimuth, with lunar parallax applied. The second
    /// element is the body's apparent semidiameter in degrees (zero for
    /// planets, whose discs are negligible at this precision).
    fn airless(&self, body: Body, at: JulianDate) -> (Horizontal, f64) {
        let lst = self.local_sidereal_time(at);
        match body.planet() {
            Some(planet) => {
                let eq = planets::equatorial_of_date(planet, at);
                (eq.to_horizontal(self.latitude, lst), 0.0)
            }
            None => {
                let (eq, lunar) = moon::apparent_equatorial(at);
                let mut h = eq.to_horizontal(self.latitude, lst);
                let parallax = lunar.parallax().to_radians();
                h.altitude -= (parallax.sin() * h.altitude.to_radians().cos())
                    .asin()
                    .to_degrees();
                (h, lunar.semidiameter())
            }
        }
    }

    /// Azimuth and refracted (apparent) altitude of `body` at `at`.
    pub fn position(&self, body: Body, at: JulianDate) -> Horizontal {
        let (mut h, _) = self.airless(body, at);
        h.altitude += coords::refraction(h.altitude);
        h
    }
}
