//! Sequential fixed-size windows over the filtered trip rows.

use bikeshare_core::models::Trip;

/// Rows shown per request when no page size is configured.
pub const DEFAULT_WINDOW_SIZE: usize = 5;

/// One window of raw rows and the cursor for the next request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawWindow<'a> {
    pub rows: &'a [Trip],
    /// Offset of the first row in this window.
    pub cursor: usize,
    /// Always `cursor + size`, even past the end.
    pub next_cursor: usize,
    /// Total rows available.
    pub total: usize,
}

impl RawWindow<'_> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `true` once no rows remain after this window.
    pub fn is_last(&self) -> bool {
        self.next_cursor >= self.total
    }
}

/// Window of [`DEFAULT_WINDOW_SIZE`] rows starting at `cursor`.
pub fn next_window(trips: &[Trip], cursor: usize) -> RawWindow<'_> {
    window_at(trips, cursor, DEFAULT_WINDOW_SIZE)
}

/// Rows `[cursor, cursor + size)` clipped to the data. A cursor past the
/// end yields an empty window. A `size` of zero is treated as one so the
/// cursor always advances.
pub fn window_at(trips: &[Trip], cursor: usize, size: usize) -> RawWindow<'_> {
    let size = size.max(1);
    let start = cursor.min(trips.len());
    let end = cursor.saturating_add(size).min(trips.len());
    RawWindow {
        rows: &trips[start..end],
        cursor,
        next_cursor: cursor.saturating_add(size),
        total: trips.len(),
    }
}
