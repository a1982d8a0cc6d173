pub mod brush;
pub mod radial;

use data::chart::area::PathSegment;

use chrono::{DateTime, TimeDelta, Timelike, Utc};
use iced::Point;
use iced::widget::canvas;

fn day_tick_candidates() -> &'static [i64] {
    &[1, 2, 7, 14, 30, 91, 182, 365]
}

/// "%b %d" while ticks are at most two weeks apart, coarser after that.
fn format_day_label(day: DateTime<Utc>, step_days: i64) -> String {
    if step_days < 30 {
        day.format("%b %d").to_string()
    } else if step_days < 365 {
        day.format("%Y-%m").to_string()
    } else {
        day.format("%Y").to_string()
    }
}

/// Midnight-aligned ticks between `start` and `end`, spaced at least `min_px` apart.
fn day_ticks(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    px_per_day: f32,
    min_px: f32,
) -> (Vec<DateTime<Utc>>, i64) {
    let candidates = day_tick_candidates();
    let step = candidates
        .iter()
        .copied()
        .find(|days| *days as f32 * px_per_day >= min_px)
        .unwrap_or(candidates[candidates.len() - 1]);

    let Some(midnight) = start
        .with_hour(0)
        .and_then(|t| t.with_minute(0))
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
    else {
        return (vec![], step);
    };
    let first = if midnight < start {
        midnight + TimeDelta::days(1)
    } else {
        midnight
    };

    let mut out = Vec::new();
    let mut t = first;
    for _ in 0..=2000 {
        if t > end {
            break;
        }
        out.push(t);
        t += TimeDelta::days(step);
    }
    (out, step)
}

/// A tick position on the brush axis and its label.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub x: f32,
    pub label: String,
}

pub fn axis_ticks(scale: &data::chart::brush::TimeScale, min_px: f32) -> Vec<AxisTick> {
    let (start, end) = scale.domain();
    let days = (end - start).num_milliseconds() as f32 / 86_400_000.0;
    let px_per_day = scale.width() / days.max(f32::EPSILON);

    let (ticks, step) = day_ticks(start, end, px_per_day, min_px);

    ticks
        .into_iter()
        .map(|t| AxisTick {
            x: scale.x(t),
            label: format_day_label(t, step),
        })
        .collect()
}

pub fn build_path(segments: &[PathSegment]) -> canvas::Path {
    let mut builder = canvas::path::Builder::new();

    for segment in segments {
        match *segment {
            PathSegment::MoveTo((x, y)) => builder.move_to(Point::new(x, y)),
            PathSegment::LineTo((x, y)) => builder.line_to(Point::new(x, y)),
            PathSegment::CubicTo { c1, c2, to } => builder.bezier_curve_to(
                Point::new(c1.0, c1.1),
                Point::new(c2.0, c2.1),
                Point::new(to.0, to.1),
            ),
            PathSegment::Close => builder.close(),
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn ticks_start_at_next_midnight() {
        let start = Utc.with_ymd_and_hms(2019, 6, 1, 7, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2019, 6, 4, 18, 0, 0).unwrap();

        let (ticks, step) = day_ticks(start, end, 100.0, 80.0);

        assert_eq!(step, 1);
        assert_eq!(
            ticks,
            vec![
                Utc.with_ymd_and_hms(2019, 6, 2, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2019, 6, 3, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2019, 6, 4, 0, 0, 0).unwrap(),
            ]
        );
        assert_eq!(format_day_label(ticks[0], step), "Jun 02");
    }

    #[test]
    fn dense_axis_uses_wider_steps() {
        let start = Utc.with_ymd_and_hms(2019, 6, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2019, 9, 1, 0, 0, 0).unwrap();

        let (ticks, step) = day_ticks(start, end, 5.0, 80.0);

        assert_eq!(step, 30);
        assert_eq!(ticks[0], start);
        assert_eq!(format_day_label(ticks[1], step), "2019-07");
    }
}
