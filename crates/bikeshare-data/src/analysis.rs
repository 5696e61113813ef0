//! Report pipeline for one filter selection.
//!
//! Runs the four report groups over a loaded [`TripDataset`], timing each
//! one. A failing group does not stop the others: its error is kept in the
//! group's slot so the console can print it in place of the figures.

use std::time::{Duration, Instant};

use bikeshare_core::error::Result;
use bikeshare_core::models::{FilterSelection, TripDataset};
use bikeshare_core::settings::CityFiles;
use tracing::{debug, info};

use crate::aggregator::{
    duration_stats, station_stats, temporal_stats, user_stats, DurationStats, StationStats,
    TemporalStats, UserStats,
};
use crate::reader::load_dataset;

// ── Public types ──────────────────────────────────────────────────────────────

/// Outcome of one report group and how long it took.
#[derive(Debug)]
pub struct GroupResult<T> {
    pub result: Result<T>,
    pub elapsed: Duration,
}

impl<T> GroupResult<T> {
    fn timed(f: impl FnOnce() -> Result<T>) -> Self {
        let start = Instant::now();
        let result = f();
        Self {
            result,
            elapsed: start.elapsed(),
        }
    }
}

/// Metadata produced alongside the reports.
#[derive(Debug, Clone)]
pub struct AnalysisMetadata {
    pub selection: FilterSelection,
    /// Rows in the city file before filtering.
    pub rows_read: usize,
    /// Rows that matched the month/day filter.
    pub rows_selected: usize,
    /// Wall-clock seconds spent loading, when [`load_and_analyze`] was used.
    pub load_time_seconds: Option<f64>,
}

/// The four report groups for one selection.
#[derive(Debug)]
pub struct AnalysisReport {
    pub temporal: GroupResult<TemporalStats>,
    pub stations: GroupResult<StationStats>,
    pub durations: GroupResult<DurationStats>,
    pub users: GroupResult<UserStats>,
    pub metadata: AnalysisMetadata,
}

impl AnalysisReport {
    /// Number of groups that produced figures.
    pub fn groups_succeeded(&self) -> usize {
        [
            self.temporal.result.is_ok(),
            self.stations.result.is_ok(),
            self.durations.result.is_ok(),
            self.users.result.is_ok(),
        ]
        .into_iter()
        .filter(|ok| *ok)
        .count()
    }
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Run every report group over `dataset` in order: time, station, duration,
/// user.
pub fn analyze(dataset: &TripDataset) -> AnalysisReport {
    let temporal = GroupResult::timed(|| temporal_stats(dataset));
    let stations = GroupResult::timed(|| station_stats(dataset));
    let durations = GroupResult::timed(|| duration_stats(dataset));
    let users = GroupResult::timed(|| user_stats(dataset));

    let report = AnalysisReport {
        temporal,
        stations,
        durations,
        users,
        metadata: AnalysisMetadata {
            selection: dataset.selection,
            rows_read: dataset.rows_read,
            rows_selected: dataset.len(),
            load_time_seconds: None,
        },
    };

    debug!(
        selection = %dataset.selection,
        groups_ok = report.groups_succeeded(),
        "Analysis complete"
    );
    report
}

/// Load the city file for `selection` and analyze it.
///
/// Load failures are returned as-is. The dataset is returned too so the
/// caller can page through its raw rows.
pub fn load_and_analyze(
    files: &CityFiles,
    selection: &FilterSelection,
) -> Result<(TripDataset, AnalysisReport)> {
    let load_start = Instant::now();
    let dataset = load_dataset(files, selection)?;
    let load_time = load_start.elapsed().as_secs_f64();

    info!(
        selection = %selection,
        rows = dataset.len(),
        load_time_seconds = load_time,
        "Loaded trip data"
    );

    let mut report = analyze(&dataset);
    report.metadata.load_time_seconds = Some(load_time);
    Ok((dataset, report))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::ColumnStat;
    use bikeshare_core::error::ErrorKind;
    use bikeshare_core::formatting::DurationFormat;
    use bikeshare_core::models::{City, DayFilter, MonthFilter};
    use chrono::{Month, Weekday};
    use std::io::Write;
    use tempfile::TempDir;

    const WASHINGTON_CSV: &str = "\
Start Time,End Time,Trip Duration,Start Station,End Station,User Type
2017-01-02 09:00:00,2017-01-02 09:10:00,600,Lincoln Memorial,Union Station,Subscriber
2017-01-09 09:05:00,2017-01-09 10:06:01,3661,Lincoln Memorial,Union Station,Subscriber
2017-02-06 17:30:00,2017-02-06 17:45:00,900,Union Station,Lincoln Memorial,Customer
2017-01-03 09:15:00,2017-01-03 09:20:00,300,Union Station,Union Station,Subscriber
";

    fn write_city_file(dir: &std::path::Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{}", content).unwrap();
        path
    }

    fn washington_files(dir: &TempDir) -> CityFiles {
        let path = write_city_file(dir.path(), "washington.csv", WASHINGTON_CSV);
        CityFiles::from_entries([(City::Washington, path)])
    }

    // ── load_and_analyze ──────────────────────────────────────────────────────

    #[test]
    fn test_washington_january_mondays() {
        let dir = TempDir::new().unwrap();
        let files = washington_files(&dir);
        let selection = FilterSelection {
            city: City::Washington,
            month: MonthFilter::Only(Month::January),
            day: DayFilter::Only(Weekday::Mon),
        };

        let (dataset, report) = load_and_analyze(&files, &selection).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(report.metadata.rows_read, 4);
        assert_eq!(report.metadata.rows_selected, 2);
        assert!(report.metadata.load_time_seconds.is_some());

        let temporal = report.temporal.result.as_ref().unwrap();
        assert_eq!(temporal.month, Month::January);
        assert_eq!(temporal.weekday, Weekday::Mon);
        assert_eq!(temporal.start_hour, 9);

        let stations = report.stations.result.as_ref().unwrap();
        assert_eq!(stations.route, "Lincoln Memorial to Union Station");

        let durations = report.durations.result.as_ref().unwrap();
        assert_eq!(durations.total_hms(DurationFormat::Unbounded), "01:11:01");

        let users = report.users.result.as_ref().unwrap();
        assert_eq!(users.user_types, vec![("Subscriber".to_string(), 2)]);
        assert_eq!(users.gender, ColumnStat::NoData);
        assert_eq!(users.birth_year, ColumnStat::NoData);
        assert_eq!(report.groups_succeeded(), 4);
    }

    #[test]
    fn test_washington_all_months_all_days() {
        let dir = TempDir::new().unwrap();
        let files = washington_files(&dir);
        let (dataset, report) =
            load_and_analyze(&files, &FilterSelection::unfiltered(City::Washington)).unwrap();

        assert_eq!(dataset.len(), 4);
        assert_eq!(report.metadata.rows_selected, 4);
        assert_eq!(report.groups_succeeded(), 4);

        let temporal = report.temporal.result.as_ref().unwrap();
        assert_eq!(temporal.month, Month::January);
        assert_eq!(temporal.weekday, Weekday::Mon);
        assert_eq!(temporal.start_hour, 9);

        let stations = report.stations.result.as_ref().unwrap();
        assert_eq!(stations.start_station, "Lincoln Memorial");
        assert_eq!(stations.end_station, "Union Station");
        assert_eq!(stations.route, "Lincoln Memorial to Union Station");

        let durations = report.durations.result.as_ref().unwrap();
        assert_eq!(durations.trips_counted, 4);
        assert_eq!(durations.total_hms(DurationFormat::Unbounded), "01:31:01");

        let users = report.users.result.as_ref().unwrap();
        assert_eq!(
            users.user_types,
            vec![("Subscriber".to_string(), 3), ("Customer".to_string(), 1)]
        );
        assert_eq!(users.gender, ColumnStat::NoData);
        assert_eq!(users.birth_year, ColumnStat::NoData);
    }

    #[test]
    fn test_selection_with_no_rows_reports_empty_groups() {
        let dir = TempDir::new().unwrap();
        let files = washington_files(&dir);
        let selection = FilterSelection {
            city: City::Washington,
            month: MonthFilter::Only(Month::June),
            day: DayFilter::All,
        };

        let (dataset, report) = load_and_analyze(&files, &selection).unwrap();

        assert!(dataset.is_empty());
        assert_eq!(report.groups_succeeded(), 0);
        let err = report.durations.result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyResult);
    }

    #[test]
    fn test_unmapped_city_fails_to_load() {
        let dir = TempDir::new().unwrap();
        let files = washington_files(&dir);
        let err = load_and_analyze(&files, &FilterSelection::unfiltered(City::Chicago)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_missing_city_file_fails_to_load() {
        let dir = TempDir::new().unwrap();
        let files = CityFiles::from_entries([(City::Washington, dir.path().join("absent.csv"))]);
        let err =
            load_and_analyze(&files, &FilterSelection::unfiltered(City::Washington)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    // ── analyze ───────────────────────────────────────────────────────────────

    #[test]
    fn test_analyze_without_load_has_no_load_time() {
        let dir = TempDir::new().unwrap();
        let path = write_city_file(dir.path(), "washington.csv", WASHINGTON_CSV);
        let dataset = crate::reader::load_dataset_from_path(
            &path,
            &FilterSelection::unfiltered(City::Washington),
        )
        .unwrap();

        let report = analyze(&dataset);
        assert!(report.metadata.load_time_seconds.is_none());
        assert_eq!(report.metadata.selection.city, City::Washington);
    }

    #[test]
    fn test_one_failing_group_does_not_block_the_others() {
        let csv = "\
Start Time,End Time,Trip Duration,Start Station,End Station,User Type
2017-03-01 08:00:00,2017-03-01 08:10:00,,A,B,Subscriber
";
        let dir = TempDir::new().unwrap();
        let path = write_city_file(dir.path(), "washington.csv", csv);
        let files = CityFiles::from_entries([(City::Washington, path)]);

        let (_, report) =
            load_and_analyze(&files, &FilterSelection::unfiltered(City::Washington)).unwrap();

        assert!(report.durations.result.is_err());
        assert!(report.temporal.result.is_ok());
        assert!(report.users.result.is_ok());
        assert_eq!(report.groups_succeeded(), 3);
    }
}
