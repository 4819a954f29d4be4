//! Astronomy Picture of the Day query modes.

use chrono::NaiveDate;

/// The upstream accepts exactly one of these modes per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApodQuery {
    /// Today's picture.
    Today,
    /// The picture for a single date.
    Date(NaiveDate),
    /// `n` randomly chosen pictures.
    Count(u32),
    /// Every picture from `start` through `end` (or through today).
    Range {
        start: NaiveDate,
        end: Option<NaiveDate>,
    },
}
