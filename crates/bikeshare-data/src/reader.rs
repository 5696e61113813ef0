//! CSV loading for city trip files.
//!
//! Reads a city's trip table, parses its timestamps, derives the calendar
//! fields used by the reports and applies the analyst's month/day filter.

use std::io::Read;
use std::path::Path;

use bikeshare_core::error::{BikeshareError, Result};
use bikeshare_core::models::{
    DatasetColumns, DayFilter, FilterSelection, MonthFilter, Trip, TripDataset, TripRecord,
};
use bikeshare_core::settings::CityFiles;
use bikeshare_core::time_utils::parse_naive_timestamp;
use chrono::NaiveDateTime;
use tracing::{debug, warn};

pub const START_TIME: &str = "Start Time";
pub const END_TIME: &str = "End Time";
pub const TRIP_DURATION: &str = "Trip Duration";
pub const START_STATION: &str = "Start Station";
pub const END_STATION: &str = "End Station";
pub const USER_TYPE: &str = "User Type";
pub const GENDER: &str = "Gender";
pub const BIRTH_YEAR: &str = "Birth Year";

/// Every row of a trip file, before filtering.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub trips: Vec<Trip>,
    pub columns: DatasetColumns,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load `selection.city` through `files` and apply the month/day filter.
///
/// Fails fast: a single malformed cell aborts the whole load.
pub fn load_dataset(files: &CityFiles, selection: &FilterSelection) -> Result<TripDataset> {
    let path = files.path_for(selection.city)?;
    load_dataset_from_path(path, selection)
}

/// Same as [`load_dataset`] for an explicit file path.
pub fn load_dataset_from_path(path: &Path, selection: &FilterSelection) -> Result<TripDataset> {
    let file = std::fs::File::open(path).map_err(|source| {
        warn!("Failed to open {}: {}", path.display(), source);
        BikeshareError::FileRead {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let table = read_trips(file, &path.display().to_string())?;
    let rows_read = table.trips.len();
    let trips = apply_filters(table.trips, selection);

    debug!(
        "File {}: {} rows read, {} retained for {}",
        path.display(),
        rows_read,
        trips.len(),
        selection,
    );

    Ok(TripDataset {
        selection: *selection,
        columns: table.columns,
        rows_read,
        trips,
    })
}

/// Parse a trip table from any reader. `source` names the input in errors.
///
/// Header names are matched case-insensitively after trimming; unknown
/// columns are ignored. Row numbers in errors count data rows from 1.
pub fn read_trips<R: Read>(reader: R, source: &str) -> Result<LoadedTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let index = ColumnIndex::resolve(&headers, source)?;

    let mut trips = Vec::new();
    for (i, result) in csv_reader.records().enumerate() {
        let record = result?;
        trips.push(Trip::from_record(index.parse_row(&record, i + 1)?));
    }

    Ok(LoadedTable {
        trips,
        columns: DatasetColumns {
            gender: index.gender.is_some(),
            birth_year: index.birth_year.is_some(),
        },
    })
}

/// Keep the trips matching the selection's month and day, preserving row
/// order.
pub fn apply_filters(trips: Vec<Trip>, selection: &FilterSelection) -> Vec<Trip> {
    if selection.month == MonthFilter::All && selection.day == DayFilter::All {
        return trips;
    }
    trips
        .into_iter()
        .filter(|trip| selection.matches(trip))
        .collect()
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Positions of the known columns within a header row.
#[derive(Debug)]
struct ColumnIndex {
    start_time: usize,
    end_time: usize,
    trip_duration: usize,
    start_station: usize,
    end_station: usize,
    user_type: usize,
    gender: Option<usize>,
    birth_year: Option<usize>,
}

impl ColumnIndex {
    fn resolve(headers: &csv::StringRecord, source: &str) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
        let require = |name: &str| {
            find(name).ok_or_else(|| BikeshareError::MissingColumn {
                path: source.to_string(),
                column: name.to_string(),
            })
        };

        Ok(Self {
            start_time: require(START_TIME)?,
            end_time: require(END_TIME)?,
            trip_duration: require(TRIP_DURATION)?,
            start_station: require(START_STATION)?,
            end_station: require(END_STATION)?,
            user_type: require(USER_TYPE)?,
            gender: find(GENDER),
            birth_year: find(BIRTH_YEAR),
        })
    }

    fn parse_row(&self, record: &csv::StringRecord, row: usize) -> Result<TripRecord> {
        Ok(TripRecord {
            start_time: timestamp(record, self.start_time, row, START_TIME)?,
            end_time: timestamp(record, self.end_time, row, END_TIME)?,
            trip_duration: number(record, self.trip_duration, row, TRIP_DURATION)?,
            start_station: text(record, self.start_station),
            end_station: text(record, self.end_station),
            user_type: text(record, self.user_type),
            gender: self.gender.and_then(|idx| text(record, idx)),
            birth_year: match self.birth_year {
                Some(idx) => number(record, idx, row, BIRTH_YEAR)?,
                None => None,
            },
        })
    }
}

fn cell(record: &csv::StringRecord, idx: usize) -> &str {
    record.get(idx).unwrap_or("")
}

fn timestamp(
    record: &csv::StringRecord,
    idx: usize,
    row: usize,
    column: &str,
) -> Result<NaiveDateTime> {
    let raw = cell(record, idx);
    parse_naive_timestamp(raw).ok_or_else(|| BikeshareError::TimestampParse {
        row,
        column: column.to_string(),
        value: raw.to_string(),
    })
}

/// Empty cells are missing values; anything else must parse as a number.
fn number(
    record: &csv::StringRecord,
    idx: usize,
    row: usize,
    column: &str,
) -> Result<Option<f64>> {
    let raw = cell(record, idx);
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(Some)
        .ok_or_else(|| BikeshareError::NumberParse {
            row,
            column: column.to_string(),
            value: raw.to_string(),
        })
}

fn text(record: &csv::StringRecord, idx: usize) -> Option<String> {
    let raw = cell(record, idx);
    (!raw.is_empty()).then(|| raw.to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
