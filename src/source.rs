use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use thiserror::Error;
use tracing::{info, warn};

use crate::model::Document;
use crate::query::geo::CoordinateTable;
use crate::settings::Settings;

/// The one failure callers see at the fetch boundary. Distinct from a
/// successful load that matches nothing.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("data unavailable from {origin}: {reason}")]
    Unavailable { origin: String, reason: String },
}

impl SourceError {
    fn unavailable(origin: &Origin, reason: impl fmt::Display) -> Self {
        SourceError::Unavailable {
            origin: origin.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    File(PathBuf),
    Url(String),
}

impl Origin {
    pub fn parse(arg: &str) -> Origin {
        if arg.starts_with("http://") || arg.starts_with("https://") {
            Origin::Url(arg.to_string())
        } else {
            Origin::File(PathBuf::from(arg))
        }
    }

    /// Sheet export to extract: `--url`, then `--input`, then the configured
    /// `sheet_url`, then the configured `input` path.
    pub fn for_sheet(settings: &Settings, input: Option<PathBuf>, url: Option<String>) -> Origin {
        match (url, input, &settings.sheet_url) {
            (Some(url), _, _) => Origin::Url(url),
            (None, Some(path), _) => Origin::File(path),
            (None, None, Some(url)) => Origin::Url(url.clone()),
            (None, None, None) => Origin::File(settings.input.clone()),
        }
    }

    /// Published document to query: `--data` (path or URL), else the configured output.
    pub fn for_document(settings: &Settings, data: Option<String>) -> Origin {
        data.map(|d| Origin::parse(&d))
            .unwrap_or_else(|| Origin::File(settings.output.clone()))
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::File(p) => write!(f, "{}", p.display()),
            Origin::Url(u) => f.write_str(u),
        }
    }
}

pub async fn read_text(origin: &Origin) -> Result<String, SourceError> {
    match origin {
        Origin::File(path) => tokio::fs::read_to_string(path)
            .await
            .map_err(|e| SourceError::unavailable(origin, e)),
        Origin::Url(url) => {
            let spinner = fetch_spinner(url);
            let result = fetch(url).await;
            spinner.finish_and_clear();
            result.map_err(|e| SourceError::unavailable(origin, e))
        }
    }
}

async fn fetch(url: &str) -> reqwest::Result<String> {
    reqwest::get(url).await?.error_for_status()?.text().await
}

fn fetch_spinner(url: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(format!("Fetching {}", url));
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Fetch and parse a published document. Transport and parse failures both
/// surface as `Unavailable`.
pub async fn load_document(origin: &Origin) -> Result<Document, SourceError> {
    let text = read_text(origin).await?;
    let doc: Document =
        serde_json::from_str(&text).map_err(|e| SourceError::unavailable(origin, e))?;
    info!(origin = %origin, locations = doc.locations.len(), "Loaded document");
    Ok(doc)
}

/// The coordinate side table is optional: any failure disables distance
/// sorting instead of failing the query.
pub async fn load_coordinates(path: &Path) -> Option<CoordinateTable> {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(t) => t,
        Err(e) => {
            warn!(path = %path.display(), "coordinate table unavailable: {}", e);
            return None;
        }
    };
    match CoordinateTable::from_json(&text) {
        Ok(table) => {
            info!(entries = table.len(), "Loaded coordinate table");
            Some(table)
        }
        Err(e) => {
            warn!(path = %path.display(), "coordinate table unreadable: {:#}", e);
            None
        }
    }
}

/// Write the document pretty-printed, creating parent directories.
pub fn write_document(path: &Path, doc: &Document) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    }
    let json = serde_json::to_string_pretty(doc)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {:?}", path))?;
    Ok(())
}

// ── Tests ──
