use std::fmt;
use std::str::FromStr;

use crate::error::BikeshareError;

// ── Duration formatting ───────────────────────────────────────────────────────

/// How hour counts of 24 or more are rendered by [`format_hms`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurationFormat {
    /// Print the full hour count, e.g. `25:00:00`.
    #[default]
    Unbounded,
    /// Calendar-clock rendering: hours wrap modulo 24, so `25h` prints as
    /// `01:00:00` and the day count is silently lost.
    Clock,
}

impl fmt::Display for DurationFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DurationFormat::Unbounded => f.write_str("unbounded"),
            DurationFormat::Clock => f.write_str("clock"),
        }
    }
}

impl FromStr for DurationFormat {
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "unbounded" => Ok(DurationFormat::Unbounded),
            "clock" => Ok(DurationFormat::Clock),
            _ => Err(BikeshareError::InvalidChoice {
                field: "duration format",
                value: s.to_string(),
                expected: "unbounded, clock".to_string(),
            }),
        }
    }
}

/// Format a number of seconds as `HH:MM:SS`.
///
/// Fractional seconds are truncated and negative or non-finite input is
/// treated as zero.
///
/// # Examples
///
/// ```
/// use bikeshare_core::formatting::{format_hms, DurationFormat};
///
/// assert_eq!(format_hms(3661.0, DurationFormat::Unbounded), "01:01:01");
/// assert_eq!(format_hms(90000.0, DurationFormat::Unbounded), "25:00:00");
/// assert_eq!(format_hms(90000.0, DurationFormat::Clock), "01:00:00");
/// ```
pub fn format_hms(seconds: f64, style: DurationFormat) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.trunc() as u64
    } else {
        0
    };

    let mut hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if style == DurationFormat::Clock {
        hours %= 24;
    }

    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

// ── Number formatting ─────────────────────────────────────────────────────────

/// Format an integer count with thousands separators.
///
/// # Examples
///
/// ```
/// use bikeshare_core::formatting::format_count;
///
/// assert_eq!(format_count(5), "5");
/// assert_eq!(format_count(1234567), "1,234,567");
/// ```
pub fn format_count(value: usize) -> String {
    group_thousands(&value.to_string())
}

/// Format a floating-point number with thousands separators and a fixed
/// number of decimal places.
pub fn format_number(value: f64, decimals: u32) -> String {
    let negative = value < 0.0;
    let abs_value = value.abs();

    // Nudge exact midpoints so 1.005 rounds up at two decimals.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let grouped = group_thousands(&(rounded.trunc() as u64).to_string());

    let result = if decimals == 0 {
        grouped
    } else {
        let frac_str = format!("{:.prec$}", rounded.fract(), prec = decimals as usize);
        // `frac_str` is "0.xx"; keep the ".xx" part.
        format!("{}{}", grouped, &frac_str[1..])
    };

    if negative {
        format!("-{}", result)
    } else {
        result
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let remainder = s.len() % 3;
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
