//! Bounded point and label selection for fixed-width performance charts.
//!
//! Everything here is pure: inputs are read-only slices of an already
//! fetched series and outputs are fresh vectors.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::models::AxisTick;

/// Decimates `series` to at most `max_points` by keeping every k-th element.
///
/// Values are kept exactly as they are; nothing is averaged. A series that
/// already fits, or a `max_points` of 0, is returned unchanged.
pub fn sample_points<T: Clone>(series: &[T], max_points: usize) -> Vec<T> {
    if max_points == 0 || series.len() <= max_points {
        return series.to_vec();
    }
    let stride = series.len().div_ceil(max_points);
    series.iter().step_by(stride).cloned().collect()
}

/// Indices of up to `max_labels` evenly spread labels out of `len`.
///
/// The `len % (max_labels + 1)` leftover slots are handed to the earliest
/// picks one each, so gaps differ by at most one.
pub fn sample_label_indices(len: usize, max_labels: usize) -> Vec<usize> {
    if len <= max_labels {
        return (0..len).collect();
    }
    let slots = max_labels + 1;
    let quotient = len / slots;
    let remainder = len % slots;

    (1..=max_labels)
        .map(|i| quotient * i + (i - 1).min(remainder))
        .collect()
}

pub fn sample_labels<T: Clone>(labels: &[T], max_labels: usize) -> Vec<T> {
    sample_label_indices(labels.len(), max_labels)
        .into_iter()
        .map(|i| labels[i].clone())
        .collect()
}

/// Formats sampled date labels for the x axis.
///
/// Month granularity (`"Jan 2024"`) is used unless two labels would read the
/// same, in which case every label switches to day granularity
/// (`"5 Jan 2024"`). Labels that are not dates are shown verbatim.
pub fn format_axis_labels<S: AsRef<str>>(labels: &[S]) -> Vec<String> {
    let dates: Vec<Option<NaiveDate>> = labels.iter().map(|l| parse_label_date(l.as_ref())).collect();

    let render = |pattern: &str| -> Vec<String> {
        labels
            .iter()
            .zip(&dates)
            .map(|(raw, date)| match date {
                Some(d) => d.format(pattern).to_string(),
                None => raw.as_ref().to_string(),
            })
            .collect()
    };

    let months = render("%b %Y");
    let distinct: HashSet<&String> = months.iter().collect();
    if distinct.len() != months.len() {
        render("%-d %b %Y")
    } else {
        months
    }
}

pub fn parse_label_date(label: &str) -> Option<NaiveDate> {
    let label = label.trim();
    if let Ok(date) = NaiveDate::parse_from_str(label, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(label) {
        return Some(ts.date_naive());
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(label, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(ts.date());
    }
    NaiveDate::parse_from_str(&format!("{}-01", label), "%Y-%m-%d").ok()
}

/// Horizontal position of `index` in a series of `len` points, in `[0, 1]`.
pub fn x_position(index: usize, len: usize) -> f64 {
    let last = len.saturating_sub(1).max(1);
    index as f64 / last as f64
}

/// Min/max of `values` folded from zero, padded by 10% of `|max|` each side.
pub fn value_range<I>(values: I) -> [f64; 2]
where
    I: IntoIterator<Item = f64>,
{
    let (min, max) = values
        .into_iter()
        .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let pad = 0.1 * max.abs();
    [min - pad, max + pad]
}

/// `count` evenly spaced y-axis ticks from the bottom to the top of `range`.
pub fn axis_ticks(range: [f64; 2], count: usize) -> Vec<AxisTick> {
    let [min, max] = range;
    let span = if max - min == 0.0 { 1.0 } else { max - min };
    let steps = count.saturating_sub(1).max(1) as f64;

    (0..count)
        .map(|i| {
            let value = min + span * i as f64 / steps;
            AxisTick { value, y: (value - min) / span }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_series_is_returned_unchanged() {
        let series = vec![1, 2, 3];
        assert_eq!(sample_points(&series, 50), series);
        assert_eq!(sample_points(&[42], 50), vec![42]);
        assert!(sample_points::<i32>(&[], 50).is_empty());
    }

    #[test]
    fn test_long_series_is_decimated_by_stride() {
        let series: Vec<usize> = (0..120).collect();
        let sampled = sample_points(&series, 50);

        assert_eq!(sampled.len(), 40);
        assert_eq!(sampled.first(), Some(&0));
        assert_eq!(sampled.last(), Some(&117));
        assert!(sampled.iter().all(|v| v % 3 == 0));
    }

    #[test]
    fn test_output_may_be_shorter_than_limit() {
        // stride ceil(101 / 50) = 3 -> 34 points
        let series: Vec<usize> = (0..101).collect();
        assert_eq!(sample_points(&series, 50).len(), 34);
    }

    #[test]
    fn test_zero_limit_means_unbounded() {
        let series: Vec<usize> = (0..10).collect();
        assert_eq!(sample_points(&series, 0), series);
    }

    #[test]
    fn test_label_indices_for_twelve_months() {
        assert_eq!(sample_label_indices(12, 3), vec![3, 6, 9]);
    }

    #[test]
    fn test_label_remainder_goes_to_early_picks() {
        // q = 3, r = 2
        assert_eq!(sample_label_indices(14, 3), vec![3, 7, 11]);
        // q = 2, r = 3
        assert_eq!(sample_label_indices(11, 3), vec![2, 5, 8]);
    }

    #[test]
    fn test_labels_degenerate_inputs() {
        assert!(sample_label_indices(0, 3).is_empty());
        assert_eq!(sample_label_indices(2, 3), vec![0, 1]);
        assert!(sample_label_indices(5, 0).is_empty());
    }

    #[test]
    fn test_sample_labels_returns_original_values() {
        let labels: Vec<String> = (1..=12).map(|m| format!("2024-{:02}", m)).collect();
        assert_eq!(sample_labels(&labels, 3), vec!["2024-04", "2024-07", "2024-10"]);
    }

    #[test]
    fn test_month_format_when_distinct() {
        let formatted = format_axis_labels(&["2024-01-15", "2024-04-15", "2024-07-15"]);
        assert_eq!(formatted, vec!["Jan 2024", "Apr 2024", "Jul 2024"]);
    }

    #[test]
    fn test_day_format_for_whole_set_on_collision() {
        let formatted = format_axis_labels(&["2024-01-03", "2024-01-17", "2024-02-01"]);
        assert_eq!(formatted, vec!["3 Jan 2024", "17 Jan 2024", "1 Feb 2024"]);
    }

    #[test]
    fn test_label_parsing_variants() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5);
        assert_eq!(parse_label_date("2024-03-05"), expected);
        assert_eq!(parse_label_date("2024-03-05T10:00:00Z"), expected);
        assert_eq!(parse_label_date("2024-03-05T10:00:00.000"), expected);
        assert_eq!(parse_label_date("2024-03"), NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(parse_label_date("yesterday"), None);
        assert_eq!(format_axis_labels(&["yesterday"]), vec!["yesterday"]);
    }

    #[test]
    fn test_x_position_handles_single_point() {
        assert_eq!(x_position(0, 1), 0.0);
        assert_eq!(x_position(0, 0), 0.0);
        assert_eq!(x_position(2, 5), 0.5);
        assert_eq!(x_position(4, 5), 1.0);
    }

    #[test]
    fn test_value_range_starts_from_zero_and_pads() {
        let range = value_range([0.1, 0.5, 0.2]);
        assert!((range[0] - -0.05).abs() < 1e-12);
        assert!((range[1] - 0.55).abs() < 1e-12);

        let negative = value_range([-0.2, -0.1]);
        assert_eq!(negative, [-0.2, 0.0]);
        assert_eq!(value_range(std::iter::empty()), [0.0, 0.0]);
    }

    #[test]
    fn test_ticks_cover_range() {
        let ticks = axis_ticks([0.0, 0.3], 4);
        assert_eq!(ticks.len(), 4);
        assert_eq!(ticks[0].y, 0.0);
        assert!((ticks[3].value - 0.3).abs() < 1e-12);
        assert!((ticks[3].y - 1.0).abs() < 1e-12);

        let flat = axis_ticks([0.0, 0.0], 4);
        assert_eq!(flat[1].value, 1.0 / 3.0);
        assert_eq!(axis_ticks([0.0, 1.0], 1).len(), 1);
    }
}
