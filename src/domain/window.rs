//! Month-granularity reporting window.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{BudgetError, BudgetResult};

const LABEL_FORMAT: &str = "%B %Y";

/// Start/end month pair defining the active reporting horizon.
///
/// Both bounds are stored as the first day of their month and `start <= end` always holds.
/// Deserialized windows go through the same correction as [`PeriodWindow::new`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "RawWindow")]
pub struct PeriodWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl PeriodWindow {
    /// Builds a window, correcting an inverted range to the single month at `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        let mut window = Self {
            start: first_of_month(start),
            end: first_of_month(start),
        };
        window.set_range(start, end);
        window
    }

    /// Twelve months starting at January of `year`.
    pub fn calendar_year(year: i32) -> Self {
        let start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or_default();
        let end = NaiveDate::from_ymd_opt(year, 12, 1).unwrap_or(start);
        Self::new(start, end)
    }

    pub fn set_range(&mut self, start: NaiveDate, end: NaiveDate) {
        let start = first_of_month(start);
        let mut end = first_of_month(end);
        if end < start {
            warn!(%start, %end, "inverted window, clamping end to start");
            end = start;
        }
        self.start = start;
        self.end = end;
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Inclusive number of months covered by the window.
    pub fn month_count(&self) -> usize {
        (month_index(self.end) - month_index(self.start) + 1) as usize
    }

    /// First day of every month in the window, in order.
    pub fn months(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        let base = month_index(self.start);
        (0..self.month_count() as i32).filter_map(move |offset| from_month_index(base + offset))
    }

    /// Human readable labels such as `January 2025`.
    pub fn month_labels(&self) -> Vec<String> {
        self.months()
            .map(|month| month.format(LABEL_FORMAT).to_string())
            .collect()
    }

    /// Position of `month` inside the window, if covered.
    pub fn index_of(&self, month: NaiveDate) -> Option<usize> {
        let offset = month_index(month) - month_index(self.start);
        if offset < 0 || offset as usize >= self.month_count() {
            None
        } else {
            Some(offset as usize)
        }
    }
}

#[derive(Deserialize)]
struct RawWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl From<RawWindow> for PeriodWindow {
    fn from(raw: RawWindow) -> Self {
        Self::new(raw.start, raw.end)
    }
}

impl Default for PeriodWindow {
    fn default() -> Self {
        Self::calendar_year(2025)
    }
}

impl fmt::Display for PeriodWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.start.format("%Y-%m"),
            self.end.format("%Y-%m")
        )
    }
}

/// Parses a `YYYY-MM` (or full `YYYY-MM-DD`) string into the first day of that month.
pub fn parse_month(input: &str) -> BudgetResult<NaiveDate> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(&format!("{}-01", trimmed), "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"))
        .map(first_of_month)
        .map_err(|_| BudgetError::InvalidMonth(input.to_string()))
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn month_index(date: NaiveDate) -> i32 {
    date.year() * 12 + date.month() as i32 - 1
}

fn from_month_index(index: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(index.div_euclid(12), index.rem_euclid(12) as u32 + 1, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(year: i32, month: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, 1).unwrap()
    }

    #[test]
    fn default_window_is_one_year() {
        let window = PeriodWindow::default();
        assert_eq!(window.month_count(), 12);
        assert_eq!(window.start(), ym(2025, 1));
        assert_eq!(window.end(), ym(2025, 12));
    }

    #[test]
    fn month_count_spans_year_boundary() {
        let window = PeriodWindow::new(ym(2024, 11), ym(2025, 2));
        assert_eq!(window.month_count(), 4);
        let months: Vec<_> = window.months().collect();
        assert_eq!(months, vec![ym(2024, 11), ym(2024, 12), ym(2025, 1), ym(2025, 2)]);
    }

    #[test]
    fn days_are_normalised_to_month_start() {
        let window = PeriodWindow::new(
            NaiveDate::from_ymd_opt(2025, 3, 17).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
        );
        assert_eq!(window.start(), ym(2025, 3));
        assert_eq!(window.month_count(), 1);
    }

    #[test]
    fn inverted_range_collapses_to_start() {
        let window = PeriodWindow::new(ym(2025, 6), ym(2025, 2));
        assert_eq!(window.start(), ym(2025, 6));
        assert_eq!(window.end(), ym(2025, 6));
        assert_eq!(window.month_count(), 1);
    }

    #[test]
    fn labels_use_full_month_names() {
        let window = PeriodWindow::new(ym(2025, 1), ym(2025, 2));
        assert_eq!(window.month_labels(), vec!["January 2025", "February 2025"]);
    }

    #[test]
    fn index_of_rejects_months_outside_window() {
        let window = PeriodWindow::new(ym(2025, 1), ym(2025, 3));
        assert_eq!(window.index_of(ym(2025, 3)), Some(2));
        assert_eq!(window.index_of(ym(2024, 12)), None);
        assert_eq!(window.index_of(ym(2025, 4)), None);
    }

    #[test]
    fn deserialized_window_is_clamped_and_normalised() {
        let inverted: PeriodWindow =
            serde_json::from_str(r#"{"start":"2025-06-01","end":"2025-01-01"}"#).unwrap();
        assert_eq!(inverted.end(), ym(2025, 6));
        assert_eq!(inverted.month_count(), 1);

        let mid_month: PeriodWindow =
            serde_json::from_str(r#"{"start":"2025-01-31","end":"2025-03-15"}"#).unwrap();
        assert_eq!(mid_month.start(), ym(2025, 1));
        assert_eq!(mid_month.end(), ym(2025, 3));
        assert_eq!(mid_month.month_count(), 3);
    }

    #[test]
    fn parse_month_accepts_short_and_full_forms() {
        assert_eq!(parse_month("2025-04").unwrap(), ym(2025, 4));
        assert_eq!(parse_month("2025-04-30").unwrap(), ym(2025, 4));
        assert!(matches!(
            parse_month("April"),
            Err(BudgetError::InvalidMonth(_))
        ));
    }
}
