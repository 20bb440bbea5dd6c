pub mod csv;
pub mod header;
pub mod rows;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::model::{Document, Location};
use crate::settings::Layout;
use header::SheetHeader;

pub struct Extraction {
    pub header: SheetHeader,
    pub locations: Vec<Location>,
}

/// Three-step pipeline: text → grid → header → locations.
pub fn extract(text: &str, layout: &Layout) -> Extraction {
    let grid = csv::tokenize(text, ',');
    let header = header::read_header(&grid, layout);
    let locations = rows::map_rows(&grid, &header, layout);
    Extraction { header, locations }
}

impl Extraction {
    pub fn category_names(&self) -> Vec<&str> {
        self.header
            .categories
            .iter()
            .map(|c| c.name.as_str())
            .collect()
    }

    pub fn into_document(
        self,
        generated_at: DateTime<Utc>,
        notification: Option<String>,
    ) -> Document {
        Document {
            last_update: generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            notification: notification.filter(|n| !n.trim().is_empty()),
            locations: self.locations,
        }
    }
}

// ── Tests ──
