use chrono::{Datelike, Month, NaiveDateTime, Weekday};

// ── Calendar tables ───────────────────────────────────────────────────────────

/// All calendar months, indexed by zero-based month number.
pub const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// Months covered by the trip data. Month filters outside this range are
/// rejected during selection.
pub const FILTERABLE_MONTHS: [Month; 6] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
];

/// Weekdays in the order they are offered to the analyst.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Calendar month of a timestamp.
pub fn month_of(ts: &NaiveDateTime) -> Month {
    MONTHS[ts.month0() as usize]
}

/// Full English name of a weekday, e.g. `"Monday"`.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

// ── Timestamp parsing ─────────────────────────────────────────────────────────

/// Parse a naive local date-time as written in the trip files.
///
/// Handles:
/// * `2017-01-01 09:07:57` with an optional fractional second,
/// * the ISO `T`-separated variant,
/// * US-style `01/01/2017 09:07[:57]`.
///
/// No timezone is attached; the value is interpreted as wall-clock time.
/// Returns `None` for empty strings or unrecognised formats.
pub fn parse_naive_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    const FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%m/%d/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M",
    ];

    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
