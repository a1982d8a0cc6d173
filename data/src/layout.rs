/// Width the stroke sizes are tuned for; other widths scale relative to it.
pub const BASE_WIDTH: f32 = 1600.0;

/// Drawing surface dimensions, computed once at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub size_factor: f32,
}

impl Viewport {
    /// The surface takes the full window width and is never shorter than
    /// two thirds of it, so the rings are not clipped on wide, short windows.
    pub fn from_window(width: f32, height: f32) -> Self {
        let width = width.max(1.0);
        let height = height.max(width / 1.5);

        Self {
            width,
            height,
            size_factor: width / BASE_WIDTH,
        }
    }

    /// Inner and outer radius the price scale maps onto.
    pub fn radius_range(&self) -> (f32, f32) {
        (self.width / 15.0, self.width * 0.4)
    }

    /// Chart origin in surface coordinates.
    pub fn center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_never_drops_below_two_thirds_of_width() {
        let viewport = Viewport::from_window(1500.0, 600.0);

        assert_eq!(viewport.height, 1000.0);
        assert_eq!(viewport.center(), (750.0, 500.0));
    }

    #[test]
    fn size_factor_and_radii_follow_width() {
        let viewport = Viewport::from_window(800.0, 900.0);

        assert_eq!(viewport.height, 900.0);
        assert_eq!(viewport.size_factor, 0.5);

        let (inner, outer) = viewport.radius_range();
        assert!((inner - 800.0 / 15.0).abs() < 1e-4);
        assert!((outer - 320.0).abs() < 1e-4);
    }
}
