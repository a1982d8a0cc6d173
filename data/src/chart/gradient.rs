use crate::config::theme::{LinePalette, Tone, mix};

use iced_core::Color;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Color,
}

/// Three-stop gradient centered at the chart origin, spanning one line's own
/// radius range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialGradient {
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub stops: [ColorStop; 3],
}

impl RadialGradient {
    /// Color at `radius`, padded with the first and last stop outside the range.
    pub fn color_at(&self, radius: f32) -> Color {
        let span = self.outer_radius - self.inner_radius;
        let offset = if span > 0.0 {
            ((radius - self.inner_radius) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let [first, .., last] = self.stops;
        if offset <= first.offset {
            return first.color;
        }
        if offset >= last.offset {
            return last.color;
        }

        for pair in self.stops.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            if offset <= to.offset {
                let width = to.offset - from.offset;
                if width <= f32::EPSILON {
                    return to.color;
                }
                return mix(from.color, to.color, (offset - from.offset) / width);
            }
        }

        last.color
    }

    pub fn middle_stop(&self) -> f32 {
        self.stops[1].offset
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineColor {
    Solid(Color),
    Radial(RadialGradient),
}

impl LineColor {
    pub fn at_radius(&self, radius: f32) -> Color {
        match self {
            LineColor::Solid(color) => *color,
            LineColor::Radial(gradient) => gradient.color_at(radius),
        }
    }

    pub fn is_solid(&self) -> bool {
        matches!(self, LineColor::Solid(_))
    }
}

/// Where the day-one radius sits between the line's extremes, within `[0, 1]`.
/// A degenerate range gives `0.0`.
pub fn middle_stop(min_radius: f32, max_radius: f32, end_radius: f32) -> f32 {
    let span = max_radius - min_radius;
    if span.is_nan() || span <= 0.0 {
        return 0.0;
    }

    let ratio = (end_radius - min_radius) / span;
    if ratio.is_nan() {
        return 0.0;
    }

    ratio.clamp(0.0, 1.0)
}

pub fn classify(
    min_radius: f32,
    max_radius: f32,
    end_radius: f32,
    palette: &LinePalette,
) -> LineColor {
    let span = max_radius - min_radius;
    if span.is_nan() || span <= 0.0 {
        return LineColor::Solid(palette[Tone::Neutral]);
    }

    let middle = middle_stop(min_radius, max_radius, end_radius);

    LineColor::Radial(RadialGradient {
        inner_radius: min_radius,
        outer_radius: max_radius,
        stops: [
            ColorStop {
                offset: 0.0,
                color: palette[Tone::Low],
            },
            ColorStop {
                offset: middle,
                color: palette[Tone::Middle],
            },
            ColorStop {
                offset: 1.0,
                color: palette[Tone::High],
            },
        ],
    })
}
