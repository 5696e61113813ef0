use chrono::{Datelike, Month, NaiveDateTime, Timelike, Weekday};
use std::fmt;
use std::str::FromStr;

use crate::error::{BikeshareError, Result};
use crate::time_utils::{month_of, weekday_name, FILTERABLE_MONTHS, WEEKDAYS};

/// Joins start and end station names into a single route label.
pub const ROUTE_SEPARATOR: &str = " to ";

// ── City ──────────────────────────────────────────────────────────────────────

/// A city with a published trip dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

impl City {
    pub const ALL: [City; 3] = [City::Chicago, City::NewYorkCity, City::Washington];

    /// Lowercase key used in prompts and configuration files.
    pub fn key(self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYorkCity => "new york city",
            City::Washington => "washington",
        }
    }

    /// Default file name of the city's dataset.
    pub fn default_file_name(self) -> &'static str {
        match self {
            City::Chicago => "chicago.csv",
            City::NewYorkCity => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            City::Chicago => "Chicago",
            City::NewYorkCity => "New York City",
            City::Washington => "Washington",
        };
        f.write_str(name)
    }
}

impl FromStr for City {
    type Err = BikeshareError;

    /// Case-insensitive; `new york city`, `new_york_city` and
    /// `new-york-city` are all accepted.
    fn from_str(s: &str) -> Result<Self> {
        let normalised = normalise_choice(&s.replace(['_', '-'], " "));
        City::ALL
            .into_iter()
            .find(|city| city.key() == normalised)
            .ok_or_else(|| BikeshareError::InvalidChoice {
                field: "city",
                value: s.trim().to_string(),
                expected: City::ALL.map(City::key).join(", "),
            })
    }
}

// ── Month / day filters ───────────────────────────────────────────────────────

/// Month restriction applied at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthFilter {
    All,
    Only(Month),
}

impl MonthFilter {
    pub fn matches(self, month: Month) -> bool {
        match self {
            MonthFilter::All => true,
            MonthFilter::Only(wanted) => wanted == month,
        }
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => f.write_str("all"),
            MonthFilter::Only(month) => f.write_str(month.name()),
        }
    }
}

impl FromStr for MonthFilter {
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self> {
        let normalised = normalise_choice(s);
        if normalised == "all" {
            return Ok(MonthFilter::All);
        }
        FILTERABLE_MONTHS
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(&normalised))
            .map(MonthFilter::Only)
            .ok_or_else(|| BikeshareError::InvalidChoice {
                field: "month",
                value: s.trim().to_string(),
                expected: choices(FILTERABLE_MONTHS.iter().map(|m| m.name())),
            })
    }
}

/// Day-of-week restriction applied at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayFilter {
    All,
    Only(Weekday),
}

impl DayFilter {
    pub fn matches(self, day: Weekday) -> bool {
        match self {
            DayFilter::All => true,
            DayFilter::Only(wanted) => wanted == day,
        }
    }
}

impl fmt::Display for DayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayFilter::All => f.write_str("all"),
            DayFilter::Only(day) => f.write_str(weekday_name(*day)),
        }
    }
}

impl FromStr for DayFilter {
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self> {
        let normalised = normalise_choice(s);
        if normalised == "all" {
            return Ok(DayFilter::All);
        }
        WEEKDAYS
            .into_iter()
            .find(|d| weekday_name(*d).eq_ignore_ascii_case(&normalised))
            .map(DayFilter::Only)
            .ok_or_else(|| BikeshareError::InvalidChoice {
                field: "day",
                value: s.trim().to_string(),
                expected: choices(WEEKDAYS.iter().map(|d| weekday_name(*d))),
            })
    }
}

/// A validated `(city, month, day)` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSelection {
    pub city: City,
    pub month: MonthFilter,
    pub day: DayFilter,
}

impl FilterSelection {
    /// Selection covering every row of `city`.
    pub fn unfiltered(city: City) -> Self {
        Self {
            city,
            month: MonthFilter::All,
            day: DayFilter::All,
        }
    }

    pub fn matches(&self, trip: &Trip) -> bool {
        self.month.matches(trip.month) && self.day.matches(trip.weekday)
    }
}

impl fmt::Display for FilterSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (month: {}, day: {})", self.city, self.month, self.day)
    }
}

/// Validate a yes/no answer. Accepts `yes`, `y`, `no` and `n` in any case.
pub fn parse_yes_no(s: &str) -> Result<bool> {
    match normalise_choice(s).as_str() {
        "yes" | "y" => Ok(true),
        "no" | "n" => Ok(false),
        _ => Err(BikeshareError::InvalidChoice {
            field: "answer",
            value: s.trim().to_string(),
            expected: "yes, no".to_string(),
        }),
    }
}

fn normalise_choice(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn choices<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names
        .map(str::to_lowercase)
        .chain(std::iter::once("all".to_string()))
        .collect::<Vec<_>>()
        .join(", ")
}

// ── Trips ─────────────────────────────────────────────────────────────────────

/// One row of a city's trip table, as read from disk.
///
/// Empty cells are stored as `None` and skipped by every statistic.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    /// Trip length in seconds.
    pub trip_duration: Option<f64>,
    pub start_station: Option<String>,
    pub end_station: Option<String>,
    pub user_type: Option<String>,
    /// Always `None` when the source file has no gender column.
    pub gender: Option<String>,
    /// Always `None` when the source file has no birth-year column.
    pub birth_year: Option<f64>,
}

/// A trip record together with the calendar fields derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub record: TripRecord,
    pub month: Month,
    pub weekday: Weekday,
    pub start_hour: u32,
    pub end_hour: u32,
    /// `"<start> to <end>"`, or `None` when either station is missing.
    pub route: Option<String>,
}

impl Trip {
    pub fn from_record(record: TripRecord) -> Self {
        let route = match (&record.start_station, &record.end_station) {
            (Some(start), Some(end)) => Some(format!("{start}{ROUTE_SEPARATOR}{end}")),
            _ => None,
        };
        Self {
            month: month_of(&record.start_time),
            weekday: record.start_time.weekday(),
            start_hour: record.start_time.hour(),
            end_hour: record.end_time.hour(),
            route,
            record,
        }
    }
}

/// Which optional columns the source header carried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatasetColumns {
    pub gender: bool,
    pub birth_year: bool,
}

/// The trips of one city after month/day filtering.
///
/// Owned by a single analysis pass and never mutated after load.
#[derive(Debug, Clone)]
pub struct TripDataset {
    pub selection: FilterSelection,
    pub columns: DatasetColumns,
    /// Rows in the source file before filtering.
    pub rows_read: usize,
    /// Retained trips in source row order.
    pub trips: Vec<Trip>,
}

impl TripDataset {
    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
