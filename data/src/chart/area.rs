//! Area fill behind the time brush.

use super::brush::TimeScale;
use crate::source::SummaryRow;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo((f32, f32)),
    LineTo((f32, f32)),
    CubicTo {
        c1: (f32, f32),
        c2: (f32, f32),
        to: (f32, f32),
    },
    Close,
}

/// Summary column plotted under the brush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SummaryMetric {
    #[default]
    EndPrice,
    MeanPrice,
    MedianPrice,
    SumPrice,
    SdPrice,
}

impl SummaryMetric {
    pub const ALL: [SummaryMetric; 5] = [
        SummaryMetric::EndPrice,
        SummaryMetric::MeanPrice,
        SummaryMetric::MedianPrice,
        SummaryMetric::SumPrice,
        SummaryMetric::SdPrice,
    ];

    pub fn value(self, row: &SummaryRow) -> f32 {
        match self {
            SummaryMetric::EndPrice => row.end_price,
            SummaryMetric::MeanPrice => row.mean_price,
            SummaryMetric::MedianPrice => row.median_price,
            SummaryMetric::SumPrice => row.sum_price,
            SummaryMetric::SdPrice => row.sd_price,
        }
    }
}

impl std::fmt::Display for SummaryMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SummaryMetric::EndPrice => "End price",
            SummaryMetric::MeanPrice => "Mean price",
            SummaryMetric::MedianPrice => "Median price",
            SummaryMetric::SumPrice => "Total price",
            SummaryMetric::SdPrice => "Price deviation",
        };
        write!(f, "{label}")
    }
}

/// Uniform cubic B-spline through `points`, clamped to the first and last
/// point, expressed as Bézier segments.
pub fn basis_curve(points: &[(f32, f32)]) -> Vec<PathSegment> {
    match points {
        [] => vec![],
        [only] => vec![PathSegment::MoveTo(*only)],
        [a, b] => vec![PathSegment::MoveTo(*a), PathSegment::LineTo(*b)],
        [first, second, ..] => {
            let mut segments = Vec::with_capacity(points.len() + 2);

            segments.push(PathSegment::MoveTo(*first));
            segments.push(PathSegment::LineTo((
                (5.0 * first.0 + second.0) / 6.0,
                (5.0 * first.1 + second.1) / 6.0,
            )));

            for window in points.windows(3) {
                segments.push(bezier(window[0], window[1], window[2]));
            }

            let n = points.len();
            let (prev, last) = (points[n - 2], points[n - 1]);
            segments.push(bezier(prev, last, last));
            segments.push(PathSegment::LineTo(last));

            segments
        }
    }
}

fn bezier(a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> PathSegment {
    PathSegment::CubicTo {
        c1: ((2.0 * a.0 + b.0) / 3.0, (2.0 * a.1 + b.1) / 3.0),
        c2: ((a.0 + 2.0 * b.0) / 3.0, (a.1 + 2.0 * b.1) / 3.0),
        to: ((a.0 + 4.0 * b.0 + c.0) / 6.0, (a.1 + 4.0 * b.1 + c.1) / 6.0),
    }
}

/// Closed outline of `metric` over time, baseline at `height`.
pub fn area_path(
    rows: &[SummaryRow],
    metric: SummaryMetric,
    scale: &TimeScale,
    height: f32,
) -> Vec<PathSegment> {
    if rows.is_empty() {
        return vec![];
    }

    let max = rows.iter().map(|row| metric.value(row)).fold(0.0, f32::max);
    let y = |value: f32| {
        if max > 0.0 {
            height - value.max(0.0) / max * height
        } else {
            height
        }
    };

    let top: Vec<(f32, f32)> = rows
        .iter()
        .map(|row| (scale.x(row.departure), y(metric.value(row))))
        .collect();

    let mut segments = basis_curve(&top);

    let (first_x, last_x) = (top[0].0, top[top.len() - 1].0);
    segments.push(PathSegment::LineTo((last_x, height)));
    segments.push(PathSegment::LineTo((first_x, height)));
    segments.push(PathSegment::Close);

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn row(day: u32, end_price: f32) -> SummaryRow {
        SummaryRow {
            departure: Utc.with_ymd_and_hms(2019, 6, day, 0, 0, 0).unwrap(),
            arrival: None,
            departure_rounded: None,
            mean_price: end_price / 2.0,
            median_price: 0.0,
            sum_price: 0.0,
            sd_price: 0.0,
            end_price,
        }
    }

    #[test]
    fn basis_curve_matches_b_spline_construction() {
        let segments = basis_curve(&[(0.0, 0.0), (6.0, 6.0), (12.0, 0.0)]);

        assert_eq!(
            segments,
            vec![
                PathSegment::MoveTo((0.0, 0.0)),
                PathSegment::LineTo((1.0, 1.0)),
                PathSegment::CubicTo {
                    c1: (2.0, 2.0),
                    c2: (4.0, 4.0),
                    to: (6.0, 4.0),
                },
                PathSegment::CubicTo {
                    c1: (8.0, 4.0),
                    c2: (10.0, 2.0),
                    to: (11.0, 1.0),
                },
                PathSegment::LineTo((12.0, 0.0)),
            ]
        );
    }

    #[test]
    fn short_inputs_degrade_to_lines() {
        assert!(basis_curve(&[]).is_empty());
        assert_eq!(
            basis_curve(&[(1.0, 2.0), (3.0, 4.0)]),
            vec![
                PathSegment::MoveTo((1.0, 2.0)),
                PathSegment::LineTo((3.0, 4.0))
            ]
        );
    }

    #[test]
    fn area_is_closed_along_the_baseline() {
        let rows = [row(1, 100.0), row(2, 50.0), row(3, 0.0)];
        let scale = TimeScale::from_extent(rows.iter().map(|r| r.departure), 200.0)
            .expect("non-empty extent");

        let segments = area_path(&rows, SummaryMetric::EndPrice, &scale, 100.0);

        assert_eq!(segments[0], PathSegment::MoveTo((0.0, 0.0)));
        let tail = &segments[segments.len() - 3..];
        assert_eq!(
            tail,
            [
                PathSegment::LineTo((200.0, 100.0)),
                PathSegment::LineTo((0.0, 100.0)),
                PathSegment::Close,
            ]
        );
    }

    #[test]
    fn all_zero_metric_lies_flat_on_baseline() {
        let rows = [row(1, 0.0), row(2, 0.0)];
        let scale = TimeScale::from_extent(rows.iter().map(|r| r.departure), 100.0)
            .expect("non-empty extent");

        let segments = area_path(&rows, SummaryMetric::EndPrice, &scale, 40.0);

        assert_eq!(segments[0], PathSegment::MoveTo((0.0, 40.0)));
        assert_eq!(segments[1], PathSegment::LineTo((100.0, 40.0)));
    }

    #[test]
    fn metric_selects_column() {
        let r = row(1, 80.0);
        assert_eq!(SummaryMetric::EndPrice.value(&r), 80.0);
        assert_eq!(SummaryMetric::MeanPrice.value(&r), 40.0);
    }
}
