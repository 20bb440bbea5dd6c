pub mod geo;

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::model::{Document, Location};
use geo::{haversine_km, CoordinateTable, Coordinates};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ItemFilter {
    #[default]
    All,
    Named(String),
}

impl ItemFilter {
    /// `None`, blank and `"all"` all mean no item constraint.
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg.map(str::trim) {
            None | Some("") | Some("all") => ItemFilter::All,
            Some(name) => ItemFilter::Named(name.to_string()),
        }
    }
}

/// User-controlled query parameters. The engine never derives any of these
/// from the document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    /// Empty means "no status constraint".
    pub statuses: BTreeSet<String>,
    pub item: ItemFilter,
    pub sort_by_distance: bool,
    pub viewer: Option<Coordinates>,
}

impl FilterState {
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.statuses.insert(status.into());
        self
    }

    pub fn with_item(mut self, item: ItemFilter) -> Self {
        self.item = item;
        self
    }

    pub fn sorted_near(mut self, viewer: Option<Coordinates>) -> Self {
        self.sort_by_distance = true;
        self.viewer = viewer;
        self
    }

    fn matches_item(&self, location: &Location) -> bool {
        match &self.item {
            ItemFilter::All => true,
            ItemFilter::Named(name) => location.has_item(name),
        }
    }

    fn matches_status(&self, location: &Location) -> bool {
        self.statuses.is_empty() || location.statuses().any(|s| self.statuses.contains(s))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Match<'a> {
    pub location: &'a Location,
    /// Set only when distance sorting ran and the location resolved.
    pub distance_km: Option<f64>,
}

/// Filter by item, then by status, then optionally order by distance.
///
/// A missing document behaves as an empty one. Distance sorting needs both a
/// viewer position and a coordinate table; without either, sheet order is kept.
pub fn run<'a>(
    document: Option<&'a Document>,
    filter: &FilterState,
    coordinates: Option<&CoordinateTable>,
) -> Vec<Match<'a>> {
    let Some(document) = document else {
        return Vec::new();
    };

    let mut matches: Vec<Match<'a>> = document
        .locations
        .iter()
        .filter(|l| filter.matches_item(l))
        .filter(|l| filter.matches_status(l))
        .map(|location| Match {
            location,
            distance_km: None,
        })
        .collect();

    let sort = (filter.sort_by_distance, filter.viewer, coordinates);
    if let (true, Some(viewer), Some(table)) = sort {
        for m in &mut matches {
            m.distance_km = table
                .resolve(&m.location.name)
                .map(|c| haversine_km(viewer, c));
        }
        // Stable: unresolved locations keep sheet order after the resolved ones.
        matches.sort_by(|a, b| by_distance(a.distance_km, b.distance_km));
    }

    matches
}

fn by_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sorted, de-duplicated item names across the whole document.
pub fn item_catalogue(document: Option<&Document>) -> Vec<String> {
    let names: BTreeSet<&str> = document
        .into_iter()
        .flat_map(|d| &d.locations)
        .flat_map(|l| l.items())
        .map(|i| i.name.as_str())
        .collect();
    names.into_iter().map(String::from).collect()
}

// ── Tests ──
