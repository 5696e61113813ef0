//! Console rendering of reports and raw-data windows.

use std::io::{self, Write};

use bikeshare_core::formatting::{format_count, format_number, DurationFormat};
use bikeshare_core::models::{DatasetColumns, Trip};
use bikeshare_core::time_utils::weekday_name;
use bikeshare_data::aggregator::{
    ColumnStat, DurationStats, StationStats, TemporalStats, UserStats,
};
use bikeshare_data::analysis::{AnalysisMetadata, AnalysisReport, GroupResult};
use bikeshare_data::pagination::RawWindow;
use bikeshare_data::reader::{
    BIRTH_YEAR, END_STATION, END_TIME, GENDER, START_STATION, START_TIME, TRIP_DURATION, USER_TYPE,
};
use unicode_width::UnicodeWidthStr;

const RULE_WIDTH: usize = 40;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn rule<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))
}

// ── Reports ───────────────────────────────────────────────────────────────────

/// Print every report group in order, each closed by its timing line and a
/// rule.
pub fn render_report<W: Write>(
    out: &mut W,
    report: &AnalysisReport,
    style: DurationFormat,
) -> io::Result<()> {
    render_metadata(out, &report.metadata)?;
    render_group(
        out,
        "Calculating The Most Frequent Times of Travel...",
        &report.temporal,
        render_temporal,
    )?;
    render_group(
        out,
        "Calculating The Most Popular Stations and Trip...",
        &report.stations,
        render_stations,
    )?;
    render_group(out, "Calculating Trip Duration...", &report.durations, |out, stats| {
        render_durations(out, stats, style)
    })?;
    render_group(out, "Calculating User Stats...", &report.users, render_users)
}

fn render_metadata<W: Write>(out: &mut W, metadata: &AnalysisMetadata) -> io::Result<()> {
    writeln!(
        out,
        "\nExploring {}: {} of {} trips selected.",
        metadata.selection,
        format_count(metadata.rows_selected),
        format_count(metadata.rows_read)
    )?;
    if let Some(seconds) = metadata.load_time_seconds {
        writeln!(out, "Loaded in {} seconds.", format_number(seconds, 6))?;
    }
    rule(out)
}

fn render_group<W: Write, T>(
    out: &mut W,
    heading: &str,
    group: &GroupResult<T>,
    body: impl FnOnce(&mut W, &T) -> io::Result<()>,
) -> io::Result<()> {
    writeln!(out, "\n{}\n", heading)?;
    match &group.result {
        Ok(stats) => body(out, stats)?,
        Err(err) => writeln!(out, "{}", err)?,
    }
    writeln!(
        out,
        "\nThis took {} seconds.",
        format_number(group.elapsed.as_secs_f64(), 6)
    )?;
    rule(out)
}

pub fn render_temporal<W: Write>(out: &mut W, stats: &TemporalStats) -> io::Result<()> {
    writeln!(out, "The Most Common Month: {}", stats.month.name())?;
    writeln!(out, "The Most Common Day: {}", weekday_name(stats.weekday))?;
    writeln!(out, "The Most Common Start Hour: {}", stats.start_hour)?;
    writeln!(out, "The Most Common End Hour: {}", stats.end_hour)
}

pub fn render_stations<W: Write>(out: &mut W, stats: &StationStats) -> io::Result<()> {
    writeln!(out, "Most Common Start Station: {}", stats.start_station)?;
    writeln!(out, "Most Common End Station: {}", stats.end_station)?;
    writeln!(out, "Most Common Trip: {}", stats.route)
}

pub fn render_durations<W: Write>(
    out: &mut W,
    stats: &DurationStats,
    style: DurationFormat,
) -> io::Result<()> {
    writeln!(out, "Total Travel Time: {}", stats.total_hms(style))?;
    writeln!(out, "Mean Travel Time: {}", stats.mean_hms(style))?;
    writeln!(
        out,
        "Trips With A Recorded Duration: {}",
        format_count(stats.trips_counted)
    )
}

pub fn render_users<W: Write>(out: &mut W, stats: &UserStats) -> io::Result<()> {
    writeln!(out, "Counts of User Type:")?;
    render_counts(out, &stats.user_types)?;

    match &stats.gender {
        ColumnStat::Available(counts) => {
            writeln!(out, "\nCounts of Gender:")?;
            render_counts(out, counts)?;
        }
        ColumnStat::NoData => writeln!(out, "\nNo Data For Gender")?,
    }

    match &stats.birth_year {
        ColumnStat::Available(years) => {
            writeln!(out, "\nEarliest Birth Year: {}", years.earliest)?;
            writeln!(out, "Most Recent Birth Year: {}", years.most_recent)?;
            writeln!(out, "Most Common Birth Year: {}", years.most_common)
        }
        ColumnStat::NoData => writeln!(out, "\nNo Data For Birth Year"),
    }
}

fn render_counts<W: Write>(out: &mut W, counts: &[(String, usize)]) -> io::Result<()> {
    for (name, count) in counts {
        writeln!(out, "  {}: {}", name, format_count(*count))?;
    }
    Ok(())
}

// ── Raw data ──────────────────────────────────────────────────────────────────

/// Print one raw-data window as an aligned table.
///
/// The first column is the row's position in the filtered selection. Gender
/// and birth year only appear when the city file has them.
pub fn render_raw_window<W: Write>(
    out: &mut W,
    window: &RawWindow<'_>,
    columns: DatasetColumns,
) -> io::Result<()> {
    if window.is_empty() {
        return writeln!(out, "No more raw data to display.");
    }

    let mut header = vec![
        String::new(),
        START_TIME.to_string(),
        END_TIME.to_string(),
        TRIP_DURATION.to_string(),
        START_STATION.to_string(),
        END_STATION.to_string(),
        USER_TYPE.to_string(),
    ];
    if columns.gender {
        header.push(GENDER.to_string());
    }
    if columns.birth_year {
        header.push(BIRTH_YEAR.to_string());
    }

    let rows: Vec<Vec<String>> = window
        .rows
        .iter()
        .enumerate()
        .map(|(i, trip)| raw_cells(window.cursor + i, trip, columns))
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|col| {
            std::iter::once(&header)
                .chain(rows.iter())
                .map(|row| row[col].width())
                .max()
                .unwrap_or(0)
        })
        .collect();

    write_row(out, &header, &widths)?;
    for row in &rows {
        write_row(out, row, &widths)?;
    }
    Ok(())
}

fn raw_cells(position: usize, trip: &Trip, columns: DatasetColumns) -> Vec<String> {
    let record = &trip.record;
    let text = |value: &Option<String>| value.clone().unwrap_or_default();

    let mut cells = vec![
        position.to_string(),
        record.start_time.format(TIMESTAMP_FORMAT).to_string(),
        record.end_time.format(TIMESTAMP_FORMAT).to_string(),
        record
            .trip_duration
            .map(|d| format_number(d, 1))
            .unwrap_or_default(),
        text(&record.start_station),
        text(&record.end_station),
        text(&record.user_type),
    ];
    if columns.gender {
        cells.push(text(&record.gender));
    }
    if columns.birth_year {
        cells.push(
            record
                .birth_year
                .map(|y| (y as i32).to_string())
                .unwrap_or_default(),
        );
    }
    cells
}

fn write_row<W: Write>(out: &mut W, cells: &[String], widths: &[usize]) -> io::Result<()> {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| {
            let pad = width.saturating_sub(cell.width());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(out, "{}", line.trim_end())
}
