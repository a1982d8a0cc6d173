use crate::layout::Viewport;

use std::f32::consts::{FRAC_PI_2, TAU};

/// Days of lead time covered by one full turn around the chart.
pub const DAYS_PER_TURN: f32 = 30.0 * 1.15;

/// Linear map from price onto the ring between `inner` and `outer`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceScale {
    pub max_price: f32,
    pub inner: f32,
    pub outer: f32,
}

impl PriceScale {
    pub fn new(max_price: f32, inner: f32, outer: f32) -> Self {
        Self {
            max_price,
            inner,
            outer,
        }
    }

    pub fn for_viewport(max_price: f32, viewport: &Viewport) -> Self {
        let (inner, outer) = viewport.radius_range();
        Self::new(max_price, inner, outer)
    }

    pub fn radius(&self, price: f32) -> f32 {
        if !self.max_price.is_finite() || self.max_price <= 0.0 {
            return (self.inner + self.outer) / 2.0;
        }
        let t = price / self.max_price;
        self.inner * (1.0 - t) + self.outer * t
    }

    pub fn range(&self) -> (f32, f32) {
        (self.inner, self.outer)
    }
}

/// Angle of a lead time, in radians. Day one sits at zero and later days
/// run counter-clockwise.
pub fn angle(days_to_departure: u32) -> f32 {
    -TAU * (days_to_departure as f32 - 1.0) / DAYS_PER_TURN
}

/// Center-relative pixel position, measured from twelve o'clock and
/// truncated toward zero.
pub fn to_pixel(angle: f32, radius: f32) -> (i32, i32) {
    let theta = angle - FRAC_PI_2;
    (
        (0.5 + theta.cos() * radius) as i32,
        (0.5 + theta.sin() * radius) as i32,
    )
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarPoint {
    pub days_to_departure: u32,
    pub angle: f32,
    pub radius: f32,
    pub x: i32,
    pub y: i32,
}

impl PolarPoint {
    pub fn project(days_to_departure: u32, price: f32, scale: &PriceScale) -> Self {
        let angle = angle(days_to_departure);
        let radius = scale.radius(price);
        let (x, y) = to_pixel(angle, radius);

        Self {
            days_to_departure,
            angle,
            radius,
            x,
            y,
        }
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x as f32, self.y as f32)
    }
}
