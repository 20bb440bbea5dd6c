/// Marker-bearing status values understood by the extractor and the
/// query engine. A cell counts as "set" only if it contains one of these
/// markers; the sheet editors use the same list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Urgent,
    StillNeed,
    Enough,
    NoData,
    GovHandled,
    Paused,
}

impl Status {
    /// Lookup order for `recognize`: first marker found wins.
    pub const ALL: [Status; 6] = [
        Status::Urgent,
        Status::StillNeed,
        Status::Enough,
        Status::NoData,
        Status::GovHandled,
        Status::Paused,
    ];

    pub fn marker(self) -> &'static str {
        match self {
            Status::Urgent => "‼️",
            Status::StillNeed => "⚠️",
            Status::Enough => "✅",
            Status::NoData => "🤨",
            Status::GovHandled => "🙅🏻",
            Status::Paused => "暫停",
        }
    }

    /// The label the sheet uses for this status, verbatim.
    pub fn label(self) -> &'static str {
        match self {
            Status::Urgent => "‼️ 急需 Urgent",
            Status::StillNeed => "⚠️ 尚需 Still Need",
            Status::Enough => "✅ 充足 Enough",
            Status::NoData => "🤨 無資料 No Data",
            Status::GovHandled => "🙅🏻 政府已接手 不需義工物資 Gov has taken control",
            Status::Paused => "暫停接收物資（現場提供）",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Status::Urgent => "urgent",
            Status::StillNeed => "still-need",
            Status::Enough => "enough",
            Status::NoData => "no-data",
            Status::GovHandled => "gov",
            Status::Paused => "paused",
        }
    }

    pub fn recognize(cell: &str) -> Option<Status> {
        Status::ALL.into_iter().find(|s| cell.contains(s.marker()))
    }

    pub fn is_recognized(cell: &str) -> bool {
        Status::recognize(cell).is_some()
    }

    pub fn from_key(key: &str) -> Option<Status> {
        let key = key.trim();
        Status::ALL
            .into_iter()
            .find(|s| s.key().eq_ignore_ascii_case(key))
    }
}

/// Resolve a user-supplied status argument to the string compared against
/// cells: CLI keys map to their canonical label, anything else is literal.
pub fn resolve_filter_value(arg: &str) -> String {
    match Status::from_key(arg) {
        Some(status) => status.label().to_string(),
        None => arg.trim().to_string(),
    }
}

// ── Tests ──
