//! Descriptive statistics over a filtered trip dataset.
//!
//! Four report groups (time, station, duration, user), each a pure function
//! of a [`TripDataset`]. A report over zero rows fails with
//! [`BikeshareError::EmptyResult`] rather than returning a placeholder.

use std::collections::HashMap;
use std::hash::Hash;

use bikeshare_core::error::{BikeshareError, Result};
use bikeshare_core::formatting::{format_hms, DurationFormat};
use bikeshare_core::models::{Trip, TripDataset};
use chrono::{Month, Weekday};

// ── Report types ──────────────────────────────────────────────────────────────

/// Most frequent times of travel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporalStats {
    pub month: Month,
    pub weekday: Weekday,
    pub start_hour: u32,
    pub end_hour: u32,
}

/// Most popular stations and trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationStats {
    pub start_station: String,
    pub end_station: String,
    /// `"<start> to <end>"`.
    pub route: String,
}

/// Total and mean trip duration, in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct DurationStats {
    pub total_seconds: f64,
    pub mean_seconds: f64,
    /// Trips with a recorded duration.
    pub trips_counted: usize,
}

impl DurationStats {
    pub fn total_hms(&self, style: DurationFormat) -> String {
        format_hms(self.total_seconds, style)
    }

    pub fn mean_hms(&self, style: DurationFormat) -> String {
        format_hms(self.mean_seconds, style)
    }
}

/// Result for a column that some cities do not publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnStat<T> {
    Available(T),
    /// The column is absent from the file, or has no values in the
    /// selected rows.
    NoData,
}

impl<T> ColumnStat<T> {
    pub fn as_available(&self) -> Option<&T> {
        match self {
            ColumnStat::Available(v) => Some(v),
            ColumnStat::NoData => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, ColumnStat::NoData)
    }
}

/// Earliest, most recent and most common birth year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthYearStats {
    pub earliest: i32,
    pub most_recent: i32,
    pub most_common: i32,
}

/// Who rode: user-type counts plus the optional demographic columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStats {
    /// Count per user type, most frequent first.
    pub user_types: Vec<(String, usize)>,
    pub gender: ColumnStat<Vec<(String, usize)>>,
    pub birth_year: ColumnStat<BirthYearStats>,
}

// ── Report functions ──────────────────────────────────────────────────────────

/// Most common month, weekday, start hour and end hour.
pub fn temporal_stats(dataset: &TripDataset) -> Result<TemporalStats> {
    ensure_rows(dataset, "time statistics")?;
    let trips = &dataset.trips;

    Ok(TemporalStats {
        month: mode_of(trips.iter().map(|t| t.month), "most common month")?,
        weekday: mode_of(trips.iter().map(|t| t.weekday), "most common day")?,
        start_hour: mode_of(trips.iter().map(|t| t.start_hour), "most common start hour")?,
        end_hour: mode_of(trips.iter().map(|t| t.end_hour), "most common end hour")?,
    })
}

/// Most common start station, end station and start-to-end route.
pub fn station_stats(dataset: &TripDataset) -> Result<StationStats> {
    ensure_rows(dataset, "station statistics")?;
    let trips = &dataset.trips;

    let start = mode_of(
        trips.iter().filter_map(|t| t.record.start_station.as_deref()),
        "most common start station",
    )?;
    let end = mode_of(
        trips.iter().filter_map(|t| t.record.end_station.as_deref()),
        "most common end station",
    )?;
    let route = mode_of(
        trips.iter().filter_map(|t| t.route.as_deref()),
        "most common trip",
    )?;

    Ok(StationStats {
        start_station: start.to_string(),
        end_station: end.to_string(),
        route: route.to_string(),
    })
}

/// Sum and arithmetic mean of trip duration.
pub fn duration_stats(dataset: &TripDataset) -> Result<DurationStats> {
    ensure_rows(dataset, "trip duration statistics")?;

    let durations: Vec<f64> = dataset
        .trips
        .iter()
        .filter_map(|t| t.record.trip_duration)
        .collect();
    if durations.is_empty() {
        return Err(BikeshareError::empty("trip duration"));
    }

    let total: f64 = durations.iter().sum();
    Ok(DurationStats {
        total_seconds: total,
        mean_seconds: total / durations.len() as f64,
        trips_counted: durations.len(),
    })
}

/// User-type counts, gender counts and birth-year statistics.
///
/// Gender and birth year report [`ColumnStat::NoData`] instead of failing
/// when the city does not publish them.
pub fn user_stats(dataset: &TripDataset) -> Result<UserStats> {
    ensure_rows(dataset, "user statistics")?;
    let trips = &dataset.trips;

    let user_types = owned_counts(value_counts(
        trips.iter().filter_map(|t| t.record.user_type.as_deref()),
    ));

    let gender = if dataset.columns.gender {
        let counts = owned_counts(value_counts(
            trips.iter().filter_map(|t| t.record.gender.as_deref()),
        ));
        if counts.is_empty() {
            ColumnStat::NoData
        } else {
            ColumnStat::Available(counts)
        }
    } else {
        ColumnStat::NoData
    };

    let birth_year = if dataset.columns.birth_year {
        birth_year_stats(trips).map_or(ColumnStat::NoData, ColumnStat::Available)
    } else {
        ColumnStat::NoData
    };

    Ok(UserStats {
        user_types,
        gender,
        birth_year,
    })
}

/// Earliest, most recent and most common birth year among `trips`.
///
/// Years are truncated to integers before the mode is taken.
pub fn birth_year_stats(trips: &[Trip]) -> Result<BirthYearStats> {
    let years: Vec<i32> = trips
        .iter()
        .filter_map(|t| t.record.birth_year)
        .map(|y| y as i32)
        .collect();

    let earliest = years.iter().copied().min();
    let most_recent = years.iter().copied().max();
    match (earliest, most_recent) {
        (Some(earliest), Some(most_recent)) => Ok(BirthYearStats {
            earliest,
            most_recent,
            most_common: mode_of(years.iter().copied(), "most common birth year")?,
        }),
        _ => Err(BikeshareError::empty("birth year")),
    }
}

// ── Generic helpers ───────────────────────────────────────────────────────────

/// Most frequent value. Ties go to the value seen first.
///
/// Returns `None` for an empty input.
pub fn stable_mode<T, I>(values: I) -> Option<T>
where
    I: IntoIterator<Item = T>,
    T: Eq + Hash,
{
    tally(values)
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(value, _)| value)
}

/// Occurrences of each distinct value, most frequent first. Equal counts
/// keep first-seen order.
pub fn value_counts<T, I>(values: I) -> Vec<(T, usize)>
where
    I: IntoIterator<Item = T>,
    T: Eq + Hash,
{
    let mut counted: Vec<(T, (usize, usize))> = tally(values).into_iter().collect();
    counted.sort_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
        count_b.cmp(count_a).then(first_a.cmp(first_b))
    });
    counted
        .into_iter()
        .map(|(value, (count, _))| (value, count))
        .collect()
}

/// Map each value to `(count, index of first occurrence)`.
fn tally<T, I>(values: I) -> HashMap<T, (usize, usize)>
where
    I: IntoIterator<Item = T>,
    T: Eq + Hash,
{
    let mut map: HashMap<T, (usize, usize)> = HashMap::new();
    for (idx, value) in values.into_iter().enumerate() {
        map.entry(value).or_insert((0, idx)).0 += 1;
    }
    map
}

fn mode_of<T, I>(values: I, what: &str) -> Result<T>
where
    I: IntoIterator<Item = T>,
    T: Eq + Hash,
{
    stable_mode(values).ok_or_else(|| BikeshareError::empty(what))
}

fn owned_counts(counts: Vec<(&str, usize)>) -> Vec<(String, usize)> {
    counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect()
}

fn ensure_rows(dataset: &TripDataset, what: &str) -> Result<()> {
    if dataset.is_empty() {
        return Err(BikeshareError::empty(format!(
            "{} in {}",
            what, dataset.selection
        )));
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
