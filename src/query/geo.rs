use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Coordinates { lat, lng }
    }
}

/// Parses a `"lat,lng"` viewer position.
impl FromStr for Coordinates {
    type Err = anyhow::Error;

    fn from_str(arg: &str) -> Result<Self> {
        let (lat, lng) = arg.split_once(',').context("expected \"lat,lng\"")?;
        let lat: f64 = lat.trim().parse().context("invalid latitude")?;
        let lng: f64 = lng.trim().parse().context("invalid longitude")?;
        anyhow::ensure!((-90.0..=90.0).contains(&lat), "latitude out of range");
        anyhow::ensure!((-180.0..=180.0).contains(&lng), "longitude out of range");
        Ok(Coordinates::new(lat, lng))
    }
}

/// Haversine great-circle distance in kilometers.
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Location name → coordinates, in file order. Order matters: the fuzzy
/// fallback in `resolve` takes the first entry that matches.
#[derive(Debug, Clone, Default)]
pub struct CoordinateTable {
    entries: Vec<(String, Coordinates)>,
}

impl CoordinateTable {
    pub fn new(entries: Vec<(String, Coordinates)>) -> Self {
        CoordinateTable { entries }
    }

    /// Parse the `{ "name": { "lat": .., "lng": .. } }` side table.
    /// Entries without usable coordinates are skipped.
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: Map<String, Value> =
            serde_json::from_str(text).context("Coordinate table is not a JSON object")?;
        let entries = raw
            .into_iter()
            .filter_map(|(name, value)| match serde_json::from_value::<Coordinates>(value) {
                Ok(c) => Some((name, c)),
                Err(e) => {
                    warn!(location = %name, "ignoring coordinate entry: {}", e);
                    None
                }
            })
            .collect();
        Ok(CoordinateTable { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact name first, then the first key that contains or is contained in
    /// the name. Short keys can match the wrong location; the first hit wins.
    pub fn resolve(&self, name: &str) -> Option<Coordinates> {
        if name.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|(key, _)| name.contains(key.as_str()) || key.contains(name))
            })
            .map(|(_, c)| *c)
    }
}

// ── Tests ──
