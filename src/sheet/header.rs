use std::ops::Range;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use tracing::debug;

use super::csv::{cell, RawGrid};
use crate::settings::Layout;

/// Item-header keywords that mark a volunteer-need column.
const VOLUNTEER_KEYWORDS: &[&str] = &[
    "一般義工",
    "General volunteers",
    "醫護人員",
    "medic",
    "社工",
    "social worker",
    "心理輔導員",
    "psychological counselor",
    "車手",
    "driver",
];

static VOLUNTEER_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = VOLUNTEER_KEYWORDS
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    RegexBuilder::new(&alternation)
        .case_insensitive(true)
        .build()
        .unwrap()
});

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub name: String,
    /// Half-open: ends where the next category header starts.
    pub columns: Range<usize>,
    pub items: Vec<ItemColumn>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemColumn {
    pub name: String,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VolunteerColumn {
    pub kind: String,
    pub column: usize,
}

/// Everything the row mapper needs to know about the sheet's columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetHeader {
    pub categories: Vec<Category>,
    pub volunteers: Vec<VolunteerColumn>,
}

pub fn read_header(grid: &RawGrid, layout: &Layout) -> SheetHeader {
    let empty = Vec::new();
    let category_row = grid.get(layout.category_header_row).unwrap_or(&empty);
    let item_row = grid.get(layout.item_header_row).unwrap_or(&empty);

    let mut categories = scan_categories(category_row, layout.category_start_col);
    attach_items(&mut categories, item_row, layout.item_start_col);
    let volunteers = volunteer_columns(item_row, layout.category_start_col);

    SheetHeader {
        categories,
        volunteers,
    }
}

/// Each non-empty header cell opens a category; the previous one closes just
/// before it. The last category runs to the end of the header row.
pub fn scan_categories(row: &[String], start_col: usize) -> Vec<Category> {
    let mut categories: Vec<Category> = Vec::new();

    for col in start_col..row.len() {
        let name = cell(row, col);
        if name.is_empty() {
            continue;
        }
        if let Some(prev) = categories.last_mut() {
            prev.columns.end = col;
        }
        categories.push(Category {
            name: name.to_string(),
            columns: col..row.len(),
            items: Vec::new(),
        });
    }

    categories
}

/// Linear scan, first match wins. Ranges never overlap so it is also the only match.
pub fn category_index(categories: &[Category], col: usize) -> Option<usize> {
    categories.iter().position(|c| c.columns.contains(&col))
}

pub fn attach_items(categories: &mut [Category], item_row: &[String], start_col: usize) {
    for col in start_col..item_row.len() {
        let name = cell(item_row, col);
        if name.is_empty() {
            continue;
        }
        match category_index(categories, col) {
            Some(idx) => categories[idx].items.push(ItemColumn {
                name: name.to_string(),
                column: col,
            }),
            None => debug!(column = col, item = name, "item outside every category"),
        }
    }
}

pub fn is_volunteer_header(header: &str) -> bool {
    VOLUNTEER_RE.is_match(header)
}

pub fn volunteer_columns(item_row: &[String], start_col: usize) -> Vec<VolunteerColumn> {
    (start_col..item_row.len())
        .filter_map(|col| {
            let header = cell(item_row, col);
            is_volunteer_header(header).then(|| VolunteerColumn {
                kind: header.to_string(),
                column: col,
            })
        })
        .collect()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn ranges_partition_header_row() {
        let header = row(&[
            "",
            "",
            "食物 Food",
            "",
            "",
            "水 Water",
            "",
            "義工 Volunteers",
            "",
        ]);
        let cats = scan_categories(&header, 2);
        let ranges: Vec<_> = cats.iter().map(|c| c.columns.clone()).collect();
        assert_eq!(ranges, vec![2..5, 5..7, 7..9]);

        // Contiguous from the first header cell to the end of the row.
        assert_eq!(ranges.first().unwrap().start, 2);
        assert_eq!(ranges.last().unwrap().end, header.len());
        for pair in ranges.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn header_before_start_col_ignored() {
        let header = row(&["Location", "All", "Food", "Water"]);
        let cats = scan_categories(&header, 2);
        assert_eq!(cats.len(), 2);
        assert_eq!(cats[0].name, "Food");
    }

    #[test]
    fn empty_or_missing_header_row() {
        assert!(scan_categories(&[], 2).is_empty());
        assert!(scan_categories(&row(&["a", "b"]), 2).is_empty());
    }

    #[test]
    fn items_land_in_exactly_one_category() {
        let mut cats = scan_categories(&row(&["", "", "Food", "", "Water", ""]), 2);
        let items = row(&["", "", "Hot meals", "Rice", "Bottled", "Bulk", "Stray"]);
        attach_items(&mut cats, &items, 3);

        let food: Vec<_> = cats[0].items.iter().map(|i| i.name.as_str()).collect();
        let water: Vec<_> = cats[1].items.iter().map(|i| i.name.as_str()).collect();
        // Column 2 precedes the item start column.
        assert_eq!(food, vec!["Rice"]);
        // Column 6 is past the header row, so no category owns it.
        assert_eq!(water, vec!["Bottled", "Bulk"]);

        for cat in &cats {
            for item in &cat.items {
                let owners = cats
                    .iter()
                    .filter(|c| c.columns.contains(&item.column))
                    .count();
                assert_eq!(owners, 1);
            }
        }
    }

    #[test]
    fn category_without_items_still_bounds_lookups() {
        let mut cats = scan_categories(&row(&["", "", "Food", "Empty", "Water"]), 2);
        attach_items(&mut cats, &row(&["", "", "", "", "Bottled"]), 3);
        assert!(cats[1].items.is_empty());
        assert_eq!(category_index(&cats, 3), Some(1));
        assert_eq!(cats[2].items[0].name, "Bottled");
    }

    #[test]
    fn volunteer_headers_match_case_insensitively() {
        assert!(is_volunteer_header("一般義工 General Volunteers"));
        assert!(is_volunteer_header("醫護人員 Medical staff"));
        assert!(is_volunteer_header("Social Worker"));
        assert!(is_volunteer_header("DRIVERS"));
        assert!(!is_volunteer_header("Bottled water"));
        assert!(!is_volunteer_header(""));
    }

    #[test]
    fn volunteer_columns_scan_from_category_start() {
        let items = row(&["", "", "車手 Driver", "Rice", "社工 social worker"]);
        let cols = volunteer_columns(&items, 2);
        assert_eq!(
            cols,
            vec![
                VolunteerColumn {
                    kind: "車手 Driver".into(),
                    column: 2,
                },
                VolunteerColumn {
                    kind: "社工 social worker".into(),
                    column: 4,
                },
            ]
        );
    }

    #[test]
    fn short_grid_yields_empty_header() {
        let grid = vec![row(&["title"])];
        assert_eq!(read_header(&grid, &Layout::default()), SheetHeader::default());
    }
}
