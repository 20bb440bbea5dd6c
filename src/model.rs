use serde::{Deserialize, Serialize};

/// The published artifact: everything the query side ever sees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub last_update: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification: Option<String>,
    #[serde(default)]
    pub locations: Vec<Location>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    /// Column B, "所有物品 All Items". Not checked against the whitelist.
    #[serde(rename = "allItems", alias = "overallStatus", default)]
    pub overall_status: Option<String>,
    #[serde(default)]
    pub categories: Vec<CategoryItems>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volunteers: Vec<Volunteer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryItems {
    pub name: String,
    pub items: Vec<ItemStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStatus {
    pub name: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volunteer {
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
}

impl Location {
    pub fn items(&self) -> impl Iterator<Item = &ItemStatus> {
        self.categories.iter().flat_map(|c| &c.items)
    }

    pub fn has_item(&self, name: &str) -> bool {
        self.items().any(|i| i.name == name)
    }

    /// Every status string attached to this location: overall, items, volunteers.
    pub fn statuses(&self) -> impl Iterator<Item = &str> {
        self.overall_status
            .as_deref()
            .into_iter()
            .chain(self.items().map(|i| i.status.as_str()))
            .chain(self.volunteers.iter().map(|v| v.status.as_str()))
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_published_field_names() {
        let loc = Location {
            name: "Shelter A".into(),
            overall_status: None,
            categories: vec![],
            volunteers: vec![],
        };
        let json = serde_json::to_value(&loc).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "name": "Shelter A", "allItems": null, "categories": [] })
        );
    }

    #[test]
    fn volunteers_keep_type_key() {
        let loc = Location {
            name: "Hall".into(),
            overall_status: Some("✅ 充足 Enough".into()),
            categories: vec![],
            volunteers: vec![Volunteer {
                kind: "車手 driver".into(),
                status: "‼️ 急需 Urgent".into(),
            }],
        };
        let json = serde_json::to_value(&loc).unwrap();
        assert_eq!(json["volunteers"][0]["type"], "車手 driver");
    }

    #[test]
    fn reads_overall_status_alias_and_missing_fields() {
        let doc: Document = serde_json::from_str(
            r#"{"lastUpdate":"2025-11-27T09:30:00.000Z",
                "locations":[{"name":"Hall","overallStatus":"✅ 充足 Enough"}]}"#,
        )
        .unwrap();
        assert!(doc.notification.is_none());
        let loc = &doc.locations[0];
        assert_eq!(loc.overall_status.as_deref(), Some("✅ 充足 Enough"));
        assert!(loc.categories.is_empty());
        assert!(loc.volunteers.is_empty());
    }

    #[test]
    fn statuses_cover_all_sources() {
        let loc = Location {
            name: "Hall".into(),
            overall_status: Some("a".into()),
            categories: vec![CategoryItems {
                name: "Food".into(),
                items: vec![ItemStatus {
                    name: "Rice".into(),
                    status: "b".into(),
                }],
            }],
            volunteers: vec![Volunteer {
                kind: "medic".into(),
                status: "c".into(),
            }],
        };
        assert_eq!(loc.statuses().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert!(loc.has_item("Rice"));
        assert!(!loc.has_item("rice"));
    }
}
