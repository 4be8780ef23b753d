//! Rolling time-window filtering for date-keyed count series.
//!
//! Series arrive as maps of ISO `YYYY-MM-DD` keys to counts. Filtering is
//! relative to "today" at local midnight; the pure `*_at` variants take an
//! explicit reference date so behavior is reproducible in tests.

use chrono::{Duration, Local, Months, NaiveDate};
use indexmap::IndexMap;

/// Rolling window selector for the messages-per-day chart.
///
/// Unknown selector strings behave as [`RangeSelector::All`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSelector {
    Days7,
    Days30,
    Months3,
    Months6,
    Year1,
    All,
}

impl RangeSelector {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "7d" => RangeSelector::Days7,
            "30d" => RangeSelector::Days30,
            "3m" => RangeSelector::Months3,
            "6m" => RangeSelector::Months6,
            "1y" => RangeSelector::Year1,
            _ => RangeSelector::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RangeSelector::Days7 => "7d",
            RangeSelector::Days30 => "30d",
            RangeSelector::Months3 => "3m",
            RangeSelector::Months6 => "6m",
            RangeSelector::Year1 => "1y",
            RangeSelector::All => "all",
        }
    }

    /// Earliest date retained by this window, relative to `today`.
    /// `None` means no cutoff (keep everything).
    pub fn cutoff(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            RangeSelector::Days7 => Some(today - Duration::days(6)),
            RangeSelector::Days30 => Some(today - Duration::days(29)),
            RangeSelector::Months3 => today.checked_sub_months(Months::new(3)),
            RangeSelector::Months6 => today.checked_sub_months(Months::new(6)),
            RangeSelector::Year1 => today.checked_sub_months(Months::new(12)),
            RangeSelector::All => None,
        }
    }
}

/// Two parallel ordered sequences ready to use as chart axes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilteredSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl FilteredSeries {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }
}

/// Filters a date-keyed series to the selected window, using local today.
pub fn filter_series(series: &IndexMap<String, f64>, range: RangeSelector) -> FilteredSeries {
    filter_series_at(series, range, Local::now().date_naive())
}

/// Filters a date-keyed series to the selected window relative to `today`.
///
/// Keys that do not parse as `YYYY-MM-DD` are dropped silently. Surviving
/// entries are sorted ascending by date; when the window has a cutoff only
/// entries in `[cutoff, today]` (inclusive) are retained. Empty input yields
/// two empty sequences.
pub fn filter_series_at(
    series: &IndexMap<String, f64>,
    range: RangeSelector,
    today: NaiveDate,
) -> FilteredSeries {
    let mut entries: Vec<(NaiveDate, &str, f64)> = series
        .iter()
        .filter_map(|(label, &value)| {
            let date = NaiveDate::parse_from_str(label, "%Y-%m-%d").ok()?;
            Some((date, label.as_str(), value))
        })
        .collect();

    if entries.is_empty() {
        return FilteredSeries::default();
    }

    entries.sort_by_key(|(date, _, _)| *date);

    let cutoff = range.cutoff(today);
    let retained = entries
        .into_iter()
        .filter(|(date, _, _)| match cutoff {
            Some(cutoff) => *date >= cutoff && *date <= today,
            None => true,
        });

    let mut filtered = FilteredSeries::default();
    for (_, label, value) in retained {
        filtered.labels.push(label.to_string());
        filtered.values.push(value);
    }
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(entries: &[(&str, f64)]) -> IndexMap<String, f64> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn test_parse_selector() {
        assert_eq!(RangeSelector::parse("7d"), RangeSelector::Days7);
        assert_eq!(RangeSelector::parse("30d"), RangeSelector::Days30);
        assert_eq!(RangeSelector::parse("3m"), RangeSelector::Months3);
        assert_eq!(RangeSelector::parse("6m"), RangeSelector::Months6);
        assert_eq!(RangeSelector::parse("1y"), RangeSelector::Year1);
        assert_eq!(RangeSelector::parse("all"), RangeSelector::All);
        // Unknown values fall back to no filtering
        assert_eq!(RangeSelector::parse("fortnight"), RangeSelector::All);
        assert_eq!(RangeSelector::parse(""), RangeSelector::All);
    }

    #[test]
    fn test_seven_day_window_is_inclusive() {
        let data = series(&[
            ("2024-06-08", 1.0),
            ("2024-06-09", 2.0),
            ("2024-06-15", 3.0),
            ("2024-06-16", 4.0), // future entry, outside [cutoff, today]
        ]);
        let filtered = filter_series_at(&data, RangeSelector::Days7, today());
        assert_eq!(filtered.labels, vec!["2024-06-09", "2024-06-15"]);
        assert_eq!(filtered.values, vec![2.0, 3.0]);
    }

    #[test]
    fn test_all_keeps_everything_sorted() {
        let data = series(&[
            ("2024-06-10", 5.0),
            ("2023-01-01", 1.0),
            ("2024-06-20", 9.0),
        ]);
        let filtered = filter_series_at(&data, RangeSelector::All, today());
        assert_eq!(
            filtered.labels,
            vec!["2023-01-01", "2024-06-10", "2024-06-20"]
        );
        assert_eq!(filtered.values, vec![1.0, 5.0, 9.0]);
    }

    #[test]
    fn test_unparseable_keys_are_dropped() {
        let data = series(&[
            ("not-a-date", 7.0),
            ("2024-13-40", 8.0),
            ("2024-06-14", 2.0),
        ]);
        let filtered = filter_series_at(&data, RangeSelector::All, today());
        assert_eq!(filtered.labels, vec!["2024-06-14"]);
        assert_eq!(filtered.values, vec![2.0]);
    }

    #[test]
    fn test_empty_input_yields_empty_sequences() {
        let filtered = filter_series_at(&IndexMap::new(), RangeSelector::Days7, today());
        assert!(filtered.is_empty());
        assert!(filtered.values.is_empty());
    }

    #[test]
    fn test_calendar_month_cutoffs() {
        assert_eq!(
            RangeSelector::Months3.cutoff(today()),
            Some(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
        );
        assert_eq!(
            RangeSelector::Months6.cutoff(today()),
            Some(NaiveDate::from_ymd_opt(2023, 12, 15).unwrap())
        );
        assert_eq!(
            RangeSelector::Year1.cutoff(today()),
            Some(NaiveDate::from_ymd_opt(2023, 6, 15).unwrap())
        );
        assert_eq!(RangeSelector::All.cutoff(today()), None);
    }

    #[test]
    fn test_day_window_cutoffs() {
        assert_eq!(
            RangeSelector::Days7.cutoff(today()),
            Some(NaiveDate::from_ymd_opt(2024, 6, 9).unwrap())
        );
        assert_eq!(
            RangeSelector::Days30.cutoff(today()),
            Some(NaiveDate::from_ymd_opt(2024, 5, 17).unwrap())
        );
    }
}
