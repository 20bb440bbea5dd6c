use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_NAME: &str = "relief-supply";
const ENV_PREFIX: &str = "RELIEF";

/// Fixed row/column offsets of the shared sheet (all 0-based).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub category_header_row: usize,
    pub item_header_row: usize,
    pub first_data_row: usize,
    pub category_start_col: usize,
    pub item_start_col: usize,
    pub name_col: usize,
    pub overall_col: usize,
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            category_header_row: 5,
            item_header_row: 6,
            first_data_row: 8,
            category_start_col: 2,
            item_start_col: 3,
            name_col: 0,
            overall_col: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub layout: Layout,
    pub input: PathBuf,
    pub sheet_url: Option<String>,
    pub output: PathBuf,
    pub coordinates: PathBuf,
    pub notification: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            layout: Layout::default(),
            input: PathBuf::from("sheet.csv"),
            sheet_url: None,
            output: PathBuf::from("public/data/locations.json"),
            coordinates: PathBuf::from("public/data/coordinates.json"),
            notification: None,
        }
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl Settings {
    /// Defaults, then the config file, then `RELIEF_*` environment variables
    /// (nested keys use `__`, e.g. `RELIEF_LAYOUT__FIRST_DATA_ROW`).
    pub fn load(path: Option<&Path>) -> Result<Settings> {
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };
        let cfg = Config::builder()
            .add_source(file)
            .add_source(environment())
            .build()
            .context("Failed to read configuration")?;
        Settings::from_config(cfg)
    }

    pub fn from_config(cfg: Config) -> Result<Settings> {
        cfg.try_deserialize().context("Invalid configuration")
    }
}

// ── Tests ──
