use clap::Parser;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{BikeshareError, Result};
use crate::formatting::DurationFormat;
use crate::models::{City, DayFilter, MonthFilter};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Explore US bikeshare trip data
#[derive(Parser, Debug, Clone)]
#[command(
    name = "bikeshare",
    about = "Explore US bikeshare trip data",
    version
)]
pub struct Settings {
    /// Directory holding the city CSV files
    #[arg(long, default_value = ".", env = "BIKESHARE_DATA_DIR")]
    pub data_dir: PathBuf,

    /// JSON file mapping city names to CSV files
    #[arg(long)]
    pub city_config: Option<PathBuf>,

    /// City to analyse (prompted for when omitted)
    #[arg(long)]
    pub city: Option<String>,

    /// Month filter, January to June or "all" (prompted for when omitted)
    #[arg(long)]
    pub month: Option<String>,

    /// Day filter, Monday to Sunday or "all" (prompted for when omitted)
    #[arg(long)]
    pub day: Option<String>,

    /// Run a single analysis pass, skipping the raw-data and restart prompts
    #[arg(long)]
    pub once: bool,

    /// Rows shown per raw-data window (1-100)
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u32).range(1..=100))]
    pub page_size: u32,

    /// How total and mean trip durations render past 24 hours
    #[arg(long, default_value = "unbounded", value_parser = ["unbounded", "clock"])]
    pub duration_format: String,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

/// Filter answers supplied on the command line. `None` fields are prompted
/// for interactively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PresetSelection {
    pub city: Option<City>,
    pub month: Option<MonthFilter>,
    pub day: Option<DayFilter>,
}

impl Settings {
    /// Parse the process arguments and apply `--debug`.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os())
    }

    /// Same as [`Settings::load`] over an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut settings = Settings::parse_from(args);
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Validate `--city`, `--month` and `--day`.
    pub fn preset_selection(&self) -> Result<PresetSelection> {
        Ok(PresetSelection {
            city: self.city.as_deref().map(str::parse).transpose()?,
            month: self.month.as_deref().map(str::parse).transpose()?,
            day: self.day.as_deref().map(str::parse).transpose()?,
        })
    }

    pub fn duration_format(&self) -> DurationFormat {
        self.duration_format.parse().unwrap_or_default()
    }

    pub fn page_size(&self) -> usize {
        self.page_size as usize
    }
}

// ── City file mapping ──────────────────────────────────────────────────────────

/// On-disk shape of a city configuration file.
///
/// ```json
/// {
///   "data_dir": "/srv/bikeshare",
///   "cities": { "chicago": "chicago.csv", "washington": "dc/2017.csv" }
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct CityConfigFile {
    /// Base for relative paths; overrides `--data-dir` when present.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    pub cities: BTreeMap<String, PathBuf>,
}

/// Immutable mapping from city to the CSV file holding its trips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityFiles {
    files: BTreeMap<City, PathBuf>,
}

impl CityFiles {
    /// `chicago.csv`, `new_york_city.csv` and `washington.csv` under
    /// `data_dir`.
    pub fn with_defaults(data_dir: &Path) -> Self {
        Self::from_entries(
            City::ALL
                .into_iter()
                .map(|city| (city, data_dir.join(city.default_file_name()))),
        )
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (City, PathBuf)>) -> Self {
        Self {
            files: entries.into_iter().collect(),
        }
    }

    /// Parse a JSON city configuration. The file replaces the default mapping
    /// entirely; cities it leaves out are unavailable.
    pub fn from_json_str(content: &str, data_dir: &Path) -> Result<Self> {
        let parsed: CityConfigFile = serde_json::from_str(content)?;
        let base = parsed.data_dir.as_deref().unwrap_or(data_dir);

        let mut files = BTreeMap::new();
        for (name, path) in parsed.cities {
            let city: City = name.parse().map_err(|_| {
                BikeshareError::Config(format!("unknown city \"{}\" in city config", name))
            })?;
            let resolved = if path.is_absolute() {
                path
            } else {
                base.join(path)
            };
            files.insert(city, resolved);
        }

        if files.is_empty() {
            return Err(BikeshareError::Config(
                "city config does not list any cities".to_string(),
            ));
        }
        Ok(Self { files })
    }

    pub fn from_json_file(path: &Path, data_dir: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| BikeshareError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let files = Self::from_json_str(&content, data_dir)?;
        tracing::debug!(
            "Loaded {} city mappings from {}",
            files.files.len(),
            path.display()
        );
        Ok(files)
    }

    /// Path of `city`'s trip file, or [`BikeshareError::UnknownCity`].
    pub fn path_for(&self, city: City) -> Result<&Path> {
        self.files
            .get(&city)
            .map(PathBuf::as_path)
            .ok_or_else(|| BikeshareError::UnknownCity(city.key().to_string()))
    }

    /// Configured cities, in `City` order.
    pub fn cities(&self) -> impl Iterator<Item = City> + '_ {
        self.files.keys().copied()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
