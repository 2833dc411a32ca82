use chrono::{DateTime, Utc};
use serde::Serialize;

pub const CHART_WIDTH: f64 = 400.0;
pub const CHART_HEIGHT: f64 = 120.0;
pub const CHART_PADDING: f64 = 10.0;

/// How many of the most recent readings feed one chart.
pub const CHART_WINDOW: i64 = 24;

#[derive(Debug, Clone, Serialize)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
    pub time_formatted: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ChartData {
    pub points: Vec<ChartPoint>,
    pub min: f64,
    pub max: f64,
    pub line_path: String,
    pub area_path: String,
}

/// Build SVG-ready geometry from a newest-first window of samples.
///
/// Points come out oldest-first. `min`/`max` in the result are the true
/// bounds of the series; the 10% range padding (1.0 for a flat series)
/// only widens the scaling bounds and is not reported.
pub fn build_chart(samples: &[(f64, DateTime<Utc>)]) -> ChartData {
    if samples.is_empty() {
        return ChartData::default();
    }

    // Storage hands us newest-first; charts read left to right.
    let mut points: Vec<ChartPoint> = samples
        .iter()
        .rev()
        .map(|&(value, timestamp)| ChartPoint {
            x: 0.0,
            y: 0.0,
            value,
            timestamp,
            time_formatted: timestamp.format("%b %-d %H:%M").to_string(),
        })
        .collect();

    let mut min_val = points[0].value;
    let mut max_val = points[0].value;
    for p in &points {
        min_val = min_val.min(p.value);
        max_val = max_val.max(p.value);
    }

    let mut padding = (max_val - min_val) * 0.1;
    if padding == 0.0 {
        padding = 1.0;
    }
    let plot_min = min_val - padding;
    let plot_max = max_val + padding;

    let n = points.len();
    for (i, p) in points.iter_mut().enumerate() {
        // A single sample has no horizontal extent; center it.
        p.x = if n == 1 {
            CHART_WIDTH / 2.0
        } else {
            CHART_PADDING + (i as f64 / (n - 1) as f64) * (CHART_WIDTH - 2.0 * CHART_PADDING)
        };
        let normalized = (p.value - plot_min) / (plot_max - plot_min);
        p.y = CHART_HEIGHT - CHART_PADDING - normalized * (CHART_HEIGHT - 2.0 * CHART_PADDING);
    }

    let baseline = CHART_HEIGHT - CHART_PADDING;
    let mut line_path = format!("M{:.1},{:.1}", points[0].x, points[0].y);
    let mut area_path = format!(
        "M{:.1},{:.1}L{:.1},{:.1}",
        points[0].x, baseline, points[0].x, points[0].y
    );
    for p in &points[1..] {
        line_path.push_str(&format!("L{:.1},{:.1}", p.x, p.y));
        area_path.push_str(&format!("L{:.1},{:.1}", p.x, p.y));
    }
    area_path.push_str(&format!("L{:.1},{:.1}Z", points[n - 1].x, baseline));

    ChartData {
        points,
        min: min_val,
        max: max_val,
        line_path,
        area_path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap() + chrono::Duration::seconds(secs)
    }

    #[test]
    fn test_empty_series() {
        let chart = build_chart(&[]);
        assert!(chart.points.is_empty());
        assert_eq!(chart.min, 0.0);
        assert_eq!(chart.max, 0.0);
        assert!(chart.line_path.is_empty());
        assert!(chart.area_path.is_empty());
    }

    #[test]
    fn test_points_come_out_chronological() {
        // Newest-first input, as the storage query returns it.
        let chart = build_chart(&[(12.0, ts(120)), (20.0, ts(60)), (10.0, ts(0))]);
        let times: Vec<_> = chart.points.iter().map(|p| p.timestamp).collect();
        assert!(times.windows(2).all(|w| w[0] < w[1]));
        let values: Vec<_> = chart.points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![10.0, 20.0, 12.0]);
    }

    #[test]
    fn test_reported_bounds_are_unpadded() {
        let chart = build_chart(&[(12.0, ts(120)), (20.0, ts(60)), (10.0, ts(0))]);
        assert_eq!(chart.min, 10.0);
        assert_eq!(chart.max, 20.0);
    }

    #[test]
    fn test_three_point_geometry() {
        // padding = 1.0, scaling bounds [9, 21], span 12
        let chart = build_chart(&[(12.0, ts(120)), (20.0, ts(60)), (10.0, ts(0))]);
        let xs: Vec<_> = chart.points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![10.0, 200.0, 390.0]);

        let ys: Vec<_> = chart.points.iter().map(|p| p.y).collect();
        assert!((ys[0] - (110.0 - 100.0 / 12.0)).abs() < 1e-9);
        assert!((ys[1] - (110.0 - 100.0 * 11.0 / 12.0)).abs() < 1e-9);
        assert!((ys[2] - 85.0).abs() < 1e-9);

        assert_eq!(chart.line_path, "M10.0,101.7L200.0,18.3L390.0,85.0");
        assert_eq!(
            chart.area_path,
            "M10.0,110.0L10.0,101.7L200.0,18.3L390.0,85.0L390.0,110.0Z"
        );
    }

    #[test]
    fn test_flat_series_gets_unit_padding() {
        // All values equal: without the 1.0 fallback every y would be NaN.
        let chart = build_chart(&[(5.0, ts(60)), (5.0, ts(0))]);
        assert_eq!(chart.min, 5.0);
        assert_eq!(chart.max, 5.0);
        for p in &chart.points {
            assert_eq!(p.y, 60.0);
        }
    }

    #[test]
    fn test_single_point_is_centered() {
        let chart = build_chart(&[(22.5, ts(0))]);
        assert_eq!(chart.points.len(), 1);
        assert_eq!(chart.points[0].x, 200.0);
        assert_eq!(chart.points[0].y, 60.0);
        assert_eq!(chart.line_path, "M200.0,60.0");
        assert_eq!(chart.area_path, "M200.0,110.0L200.0,60.0L200.0,110.0Z");
    }

    #[test]
    fn test_path_shape() {
        let chart = build_chart(&[(1.0, ts(60)), (2.0, ts(0))]);
        assert!(chart.line_path.starts_with(&format!(
            "M{:.1},{:.1}",
            chart.points[0].x, chart.points[0].y
        )));
        assert!(chart.area_path.starts_with("M10.0,110.0"));
        assert!(chart.area_path.ends_with("L390.0,110.0Z"));
    }

    #[test]
    fn test_higher_values_plot_higher() {
        let chart = build_chart(&[(30.0, ts(60)), (10.0, ts(0))]);
        // SVG y grows downward.
        assert!(chart.points[1].y < chart.points[0].y);
    }

    #[test]
    fn test_time_labels() {
        let chart = build_chart(&[(1.0, ts(0))]);
        assert_eq!(chart.points[0].time_formatted, "Jun 1 12:00");
    }
}
