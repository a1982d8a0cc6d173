use super::FlightGeometry;
use super::gradient::LineColor;
use crate::config::Settings;
use crate::config::theme::LinePalette;
use crate::layout::Viewport;

use iced_core::Color;

/// Line ends. Adjacent gradient pieces meet with `Butt` so their
/// translucent strokes never overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cap {
    #[default]
    Round,
    Butt,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pen {
    pub color: Color,
    pub width: f32,
    pub cap: Cap,
}

/// Whatever the flight lines end up on. Coordinates are relative to the
/// chart origin.
pub trait Surface {
    fn clear(&mut self);

    fn stroke_path(&mut self, points: &[(f32, f32)], pen: Pen);

    fn fill_dot(&mut self, center: (f32, f32), radius: f32, color: Color);
}

/// Everything the renderer needs besides the flights. Built once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext {
    pub viewport: Viewport,
    pub palette: LinePalette,
    pub line_width: f32,
    pub alpha: f32,
    pub gradient_steps: usize,
}

impl RenderContext {
    pub fn new(viewport: Viewport, settings: &Settings) -> Self {
        Self {
            viewport,
            palette: settings.palette.resolve(),
            line_width: settings.line_width,
            alpha: settings.line_alpha,
            gradient_steps: settings.gradient_steps.max(1),
        }
    }

    pub fn stroke_width(&self) -> f32 {
        self.line_width * self.viewport.size_factor
    }
}

/// Clears `surface` and draws every flight in the given order.
pub fn render<S: Surface>(surface: &mut S, ctx: &RenderContext, flights: &[FlightGeometry]) {
    surface.clear();

    let width = ctx.stroke_width();
    for flight in flights {
        draw_flight(surface, ctx, flight, width);
    }
}

fn draw_flight<S: Surface>(surface: &mut S, ctx: &RenderContext, flight: &FlightGeometry, width: f32) {
    match flight.points.as_slice() {
        [] => {}
        [only] => {
            let color = flight.color.at_radius(only.radius).scale_alpha(ctx.alpha);
            surface.fill_dot(only.position(), width / 2.0, color);
        }
        points => match flight.color {
            LineColor::Solid(color) => {
                let path: Vec<(f32, f32)> = points.iter().map(|p| p.position()).collect();
                surface.stroke_path(
                    &path,
                    Pen {
                        color: color.scale_alpha(ctx.alpha),
                        width,
                        cap: Cap::Round,
                    },
                );
            }
            LineColor::Radial(gradient) => {
                let steps = ctx.gradient_steps.max(1);
                let last_segment = points.len() - 2;

                for (segment, pair) in points.windows(2).enumerate() {
                    let (from, to) = (pair[0].position(), pair[1].position());

                    for i in 0..steps {
                        let t0 = i as f32 / steps as f32;
                        let t1 = (i + 1) as f32 / steps as f32;
                        let start = lerp(from, to, t0);
                        let end = lerp(from, to, t1);
                        let mid = lerp(from, to, (t0 + t1) / 2.0);

                        let color = gradient
                            .color_at(mid.0.hypot(mid.1))
                            .scale_alpha(ctx.alpha);

                        let line_end = (segment == 0 && i == 0)
                            || (segment == last_segment && i + 1 == steps);
                        let cap = if line_end { Cap::Round } else { Cap::Butt };

                        surface.stroke_path(&[start, end], Pen { color, width, cap });
                    }
                }
            }
        },
    }
}

fn lerp(from: (f32, f32), to: (f32, f32), t: f32) -> (f32, f32) {
    (from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t)
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Stroke { points: Vec<(f32, f32)>, pen: Pen },
    Dot { center: (f32, f32), radius: f32, color: Color },
}

/// Surface that records draw calls instead of rasterizing them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayList {
    pub ops: Vec<DrawOp>,
    pub clears: usize,
}

impl Surface for DisplayList {
    fn clear(&mut self) {
        self.ops.clear();
        self.clears += 1;
    }

    fn stroke_path(&mut self, points: &[(f32, f32)], pen: Pen) {
        self.ops.push(DrawOp::Stroke {
            points: points.to_vec(),
            pen,
        });
    }

    fn fill_dot(&mut self, center: (f32, f32), radius: f32, color: Color) {
        self.ops.push(DrawOp::Dot {
            center,
            radius,
            color,
        });
    }
}
