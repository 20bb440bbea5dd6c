use tracing::debug;

use super::csv::{cell, RawGrid};
use super::header::SheetHeader;
use crate::model::{CategoryItems, ItemStatus, Location, Volunteer};
use crate::settings::Layout;
use crate::status::Status;

/// One location per named data row, in sheet order.
pub fn map_rows(grid: &RawGrid, header: &SheetHeader, layout: &Layout) -> Vec<Location> {
    grid.iter()
        .enumerate()
        .skip(layout.first_data_row)
        .filter_map(|(idx, row)| {
            let location = map_row(row, header, layout);
            if location.is_none() {
                debug!(row = idx + 1, "skipping row without location name");
            }
            location
        })
        .collect()
}

/// `None` when the name cell is blank. A named row with no recognized
/// statuses still yields a location.
pub fn map_row(row: &[String], header: &SheetHeader, layout: &Layout) -> Option<Location> {
    let name = cell(row, layout.name_col);
    if name.is_empty() {
        return None;
    }

    let overall = cell(row, layout.overall_col);
    let overall_status = (!overall.is_empty()).then(|| overall.to_string());

    let categories = header
        .categories
        .iter()
        .filter_map(|category| {
            let items: Vec<ItemStatus> = category
                .items
                .iter()
                .filter_map(|item| {
                    recognized(row, item.column).map(|status| ItemStatus {
                        name: item.name.clone(),
                        status,
                    })
                })
                .collect();
            (!items.is_empty()).then(|| CategoryItems {
                name: category.name.clone(),
                items,
            })
        })
        .collect();

    let volunteers = header
        .volunteers
        .iter()
        .filter_map(|v| {
            recognized(row, v.column).map(|status| Volunteer {
                kind: v.kind.clone(),
                status,
            })
        })
        .collect();

    Some(Location {
        name: name.to_string(),
        overall_status,
        categories,
        volunteers,
    })
}

fn recognized(row: &[String], col: usize) -> Option<String> {
    let value = cell(row, col);
    Status::is_recognized(value).then(|| value.to_string())
}

// ── Tests ──
