//! Employment date parsing and interval union.
//!
//! Dates resolve to a month index (`year * 12 + month0`). A span covers the
//! half-open range `[start, end)`, so "2019-01 – 2021-01" is 24 months.
//! Concurrent roles count once: the total is the length of the union.

use std::str::FromStr;

use chrono::{Datelike, Month, NaiveDate};

use crate::models::EmploymentSpan;

const OPEN_END_MARKERS: &[&str] = &["present", "current", "now", "today", "ongoing", "date"];

/// Parsed employment interval in month indices, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MonthRange {
    pub start: i32,
    pub end: i32,
}

impl MonthRange {
    pub fn months(&self) -> i32 {
        self.end - self.start
    }
}

/// Result of resolving a set of employment spans.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperienceSummary {
    pub ranges: Vec<MonthRange>,
    /// Spans whose dates could not be parsed, or that ended before they began.
    pub rejected: Vec<String>,
}

impl ExperienceSummary {
    /// Total years covered by the union of all ranges.
    pub fn union_years(&self) -> f64 {
        union_months(&self.ranges) as f64 / 12.0
    }
}

pub fn month_index(date: NaiveDate) -> i32 {
    date.year() * 12 + date.month0() as i32
}

/// Parses a single date token into a month index. `as_of` resolves
/// open-ended markers such as "Present".
pub fn parse_month(raw: &str, as_of: NaiveDate) -> Option<i32> {
    let text = raw.trim().trim_end_matches('.').to_lowercase();
    if text.is_empty() {
        return None;
    }
    // "Present", "till date", "up to now": the marker is always the last word.
    let last_word = text.split_whitespace().last().unwrap_or_default();
    if OPEN_END_MARKERS.contains(&last_word) {
        return Some(month_index(as_of));
    }

    if let Ok(date) = NaiveDate::parse_from_str(&text, "%Y-%m-%d") {
        return Some(month_index(date));
    }

    let numeric: Vec<&str> = text.split(['-', '/', '.']).map(str::trim).collect();
    match numeric.as_slice() {
        [year] => {
            if let Some(year) = parse_year(year) {
                return Some(year * 12);
            }
        }
        [a, b] => {
            // YYYY-MM or MM/YYYY
            if let (Some(year), Some(month)) = (parse_year(a), parse_month_number(b)) {
                return Some(year * 12 + month - 1);
            }
            if let (Some(month), Some(year)) = (parse_month_number(a), parse_year(b)) {
                return Some(year * 12 + month - 1);
            }
        }
        _ => {}
    }

    // "Mar 2019", "March 2019", "Sept. 2019"
    let words: Vec<&str> = text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|w| !w.is_empty())
        .collect();
    if let [month, year] = words.as_slice() {
        let month = month.trim_end_matches('.');
        let month = if month == "sept" { "sep" } else { month };
        if let (Ok(month), Some(year)) = (Month::from_str(month), parse_year(year)) {
            return Some(year * 12 + month.number_from_month() as i32 - 1);
        }
    }

    None
}

fn parse_year(raw: &str) -> Option<i32> {
    if raw.len() != 4 {
        return None;
    }
    raw.parse::<i32>().ok().filter(|y| (1900..=2200).contains(y))
}

fn parse_month_number(raw: &str) -> Option<i32> {
    if raw.is_empty() || raw.len() > 2 {
        return None;
    }
    raw.parse::<i32>().ok().filter(|m| (1..=12).contains(m))
}

/// Resolves spans into month ranges. A missing end means "still employed".
pub fn resolve_spans(spans: &[EmploymentSpan], as_of: NaiveDate) -> ExperienceSummary {
    let mut ranges = Vec::new();
    let mut rejected = Vec::new();

    for span in spans {
        let start = parse_month(&span.start, as_of);
        let end = match span.end.as_deref() {
            Some(end) if !end.trim().is_empty() => parse_month(end, as_of),
            _ => Some(month_index(as_of)),
        };
        match (start, end) {
            (Some(start), Some(end)) if end >= start => ranges.push(MonthRange { start, end }),
            _ => rejected.push(format!(
                "{} – {}",
                span.start,
                span.end.as_deref().unwrap_or("present")
            )),
        }
    }

    ExperienceSummary { ranges, rejected }
}

/// Length in months of the union of all ranges.
pub fn union_months(ranges: &[MonthRange]) -> i32 {
    let mut sorted: Vec<MonthRange> = ranges.iter().copied().filter(|r| r.months() > 0).collect();
    sorted.sort();

    let mut total = 0;
    let mut current: Option<MonthRange> = None;
    for range in sorted {
        current = match current {
            Some(mut open) if range.start <= open.end => {
                open.end = open.end.max(range.end);
                Some(open)
            }
            Some(open) => {
                total += open.months();
                Some(range)
            }
            None => Some(range),
        };
    }
    total + current.map(|r| r.months()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn span(start: &str, end: Option<&str>) -> EmploymentSpan {
        EmploymentSpan {
            title: None,
            start: start.to_string(),
            end: end.map(String::from),
        }
    }

    #[test]
    fn test_parse_month_formats() {
        let expected = 2019 * 12 + 2; // March 2019
        assert_eq!(parse_month("2019-03", as_of()), Some(expected));
        assert_eq!(parse_month("2019/03", as_of()), Some(expected));
        assert_eq!(parse_month("03/2019", as_of()), Some(expected));
        assert_eq!(parse_month("2019-03-20", as_of()), Some(expected));
        assert_eq!(parse_month("Mar 2019", as_of()), Some(expected));
        assert_eq!(parse_month("March 2019", as_of()), Some(expected));
        assert_eq!(parse_month("2019", as_of()), Some(2019 * 12));
    }

    #[test]
    fn test_parse_month_open_end() {
        assert_eq!(parse_month("Present", as_of()), Some(month_index(as_of())));
        assert_eq!(parse_month("till date", as_of()), Some(month_index(as_of())));
        assert_eq!(parse_month("up to now", as_of()), Some(month_index(as_of())));
    }

    #[test]
    fn test_open_end_marker_must_be_whole_word() {
        assert_eq!(parse_month("unknown", as_of()), None);
        assert_eq!(parse_month("update", as_of()), None);
        assert_eq!(parse_month("Mandate", as_of()), None);
    }

    #[test]
    fn test_parse_month_garbage() {
        assert_eq!(parse_month("sometime", as_of()), None);
        assert_eq!(parse_month("13/2019", as_of()), None);
        assert_eq!(parse_month("", as_of()), None);
    }

    #[test]
    fn test_fully_overlapping_spans_count_once() {
        let spans = vec![
            span("2020-01", Some("2022-01")),
            span("2020-01", Some("2022-01")),
        ];
        let summary = resolve_spans(&spans, as_of());
        assert!((summary.union_years() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_partially_overlapping_spans_union() {
        // 2018-01..2020-01 and 2019-01..2021-01 → 2018-01..2021-01 = 3 years
        let spans = vec![
            span("2018-01", Some("2020-01")),
            span("2019-01", Some("2021-01")),
        ];
        let summary = resolve_spans(&spans, as_of());
        assert!((summary.union_years() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_disjoint_spans_sum() {
        let spans = vec![span("2015", Some("2017")), span("2019", Some("2020"))];
        let summary = resolve_spans(&spans, as_of());
        assert!((summary.union_years() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_open_ended_span_runs_to_as_of() {
        let spans = vec![span("2024-01", None)];
        let summary = resolve_spans(&spans, as_of());
        assert_eq!(summary.ranges[0].months(), 5);
    }

    #[test]
    fn test_inverted_or_unparseable_spans_rejected() {
        let spans = vec![span("2022-01", Some("2020-01")), span("soon", Some("later"))];
        let summary = resolve_spans(&spans, as_of());
        assert!(summary.ranges.is_empty());
        assert_eq!(summary.rejected.len(), 2);
        assert_eq!(summary.union_years(), 0.0);
    }

    #[test]
    fn test_union_of_nested_ranges() {
        let ranges = vec![
            MonthRange { start: 0, end: 36 },
            MonthRange { start: 12, end: 24 },
        ];
        assert_eq!(union_months(&ranges), 36);
    }
}
