//! Time brush: the axis under the radial chart and the redraw policy driven
//! by dragging a window across it.

use super::FlightGeometry;
use super::scene::{self, RenderContext, Surface};

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use std::ops::Range;
use std::sync::Arc;

/// Linear map from a departure time range onto `[0, width]` pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    width: f32,
}

impl TimeScale {
    /// An empty or inverted domain is widened to one day past `start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, width: f32) -> Self {
        let (start, end) = if end < start { (end, start) } else { (start, end) };
        let end = if end == start {
            start + TimeDelta::days(1)
        } else {
            end
        };

        Self {
            start,
            end,
            width: width.max(1.0),
        }
    }

    pub fn from_extent<I>(times: I, width: f32) -> Option<Self>
    where
        I: IntoIterator<Item = DateTime<Utc>>,
    {
        let (lo, hi) = times.into_iter().fold(None, |acc, t| match acc {
            None => Some((t, t)),
            Some((lo, hi)) => Some((t.min(lo), t.max(hi))),
        })?;

        Some(Self::new(lo, hi, width))
    }

    fn span_ms(&self) -> f64 {
        (self.end - self.start).num_milliseconds() as f64
    }

    pub fn x(&self, time: DateTime<Utc>) -> f32 {
        let offset = (time - self.start).num_milliseconds() as f64;
        (offset / self.span_ms() * f64::from(self.width)) as f32
    }

    /// Time under pixel `x`, clamped to the domain.
    pub fn invert(&self, x: f32) -> DateTime<Utc> {
        let ratio = (f64::from(x) / f64::from(self.width)).clamp(0.0, 1.0);
        self.start + TimeDelta::milliseconds((self.span_ms() * ratio).round() as i64)
    }

    pub fn domain(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.start, self.end)
    }

    pub fn width(&self) -> f32 {
        self.width
    }
}

/// Selected departure range, always ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrushWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl BrushWindow {
    pub fn new(a: DateTime<Utc>, b: DateTime<Utc>) -> Self {
        if b < a {
            Self { start: b, end: a }
        } else {
            Self { start: a, end: b }
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Overlap with `domain`, if any.
    pub fn clamp_to(&self, domain: (DateTime<Utc>, DateTime<Utc>)) -> Option<Self> {
        let start = self.start.max(domain.0);
        let end = self.end.min(domain.1);
        (start <= end).then_some(Self { start, end })
    }
}

/// UTC departure day of every flight, in flight order.
#[derive(Debug, Clone, PartialEq)]
pub struct DepartureIndex {
    keys: Vec<NaiveDate>,
}

impl DepartureIndex {
    pub fn new(flights: &[FlightGeometry]) -> Self {
        Self {
            keys: flights.iter().map(|f| f.departure.date_naive()).collect(),
        }
    }

    /// Flights from the first one departing on the window's start day to the
    /// last one departing on its end day. A day without flights falls back to
    /// the nearest flight inside the window. `None` when nothing is inside.
    pub fn resolve(&self, window: &BrushWindow) -> Option<Range<usize>> {
        let first_day = window.start.date_naive();
        let last_day = window.end.date_naive();

        let start = self
            .keys
            .iter()
            .position(|day| *day == first_day)
            .or_else(|| self.keys.iter().position(|day| *day >= first_day))?;
        let stop = self
            .keys
            .iter()
            .rposition(|day| *day == last_day)
            .or_else(|| self.keys.iter().rposition(|day| *day <= last_day))?;

        (start <= stop).then_some(start..stop + 1)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The window moved while the pointer is still held.
    Progress,
    /// The pointer was released.
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Dragging,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redraw {
    Render(Range<usize>),
    /// Too many flights to redraw on every drag frame.
    Deferred { span: usize },
}

/// Owns the brush window and decides which flights are drawn.
#[derive(Debug, Clone)]
pub struct BrushController {
    flights: Arc<[FlightGeometry]>,
    context: Arc<RenderContext>,
    scale: TimeScale,
    index: DepartureIndex,
    window: BrushWindow,
    visible: Range<usize>,
    phase: Phase,
    preview_limit: usize,
}

impl BrushController {
    pub fn new(
        flights: Arc<[FlightGeometry]>,
        context: Arc<RenderContext>,
        scale: TimeScale,
        preview_limit: usize,
        default_window: BrushWindow,
    ) -> Self {
        let window = initial_window(default_window, scale.domain());

        let mut controller = Self {
            index: DepartureIndex::new(&flights),
            flights,
            context,
            scale,
            window,
            visible: 0..0,
            phase: Phase::Idle,
            preview_limit,
        };
        controller.handle(Trigger::End, window);

        controller
    }

    pub fn handle(&mut self, trigger: Trigger, window: BrushWindow) -> Redraw {
        self.window = window;

        let candidate = match self.index.resolve(&window) {
            Some(range) => range,
            None => {
                log::debug!(
                    "No flights between {} and {}",
                    window.start.date_naive(),
                    window.end.date_naive()
                );
                0..0
            }
        };

        match trigger {
            Trigger::Progress => {
                self.phase = Phase::Dragging;

                if candidate.len() > self.preview_limit {
                    log::trace!("Deferring redraw of {} flights", candidate.len());
                    return Redraw::Deferred {
                        span: candidate.len(),
                    };
                }
            }
            Trigger::End => {
                self.phase = Phase::Idle;
            }
        }

        log::trace!("Redrawing flights {candidate:?}");
        self.visible = candidate.clone();
        Redraw::Render(candidate)
    }

    pub fn visible_flights(&self) -> &[FlightGeometry] {
        self.flights.get(self.visible.clone()).unwrap_or(&[])
    }

    pub fn visible_range(&self) -> Range<usize> {
        self.visible.clone()
    }

    pub fn flight_count(&self) -> usize {
        self.flights.len()
    }

    pub fn redraw<S: Surface>(&self, surface: &mut S) {
        scene::render(surface, &self.context, self.visible_flights());
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    pub fn window(&self) -> BrushWindow {
        self.window
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn scale(&self) -> &TimeScale {
        &self.scale
    }

    pub fn selection_px(&self) -> (f32, f32) {
        (self.scale.x(self.window.start), self.scale.x(self.window.end))
    }

    pub fn window_from_px(&self, x0: f32, x1: f32) -> BrushWindow {
        BrushWindow::new(self.scale.invert(x0), self.scale.invert(x1))
    }
}

/// The configured window cut down to the data; the first week of the data
/// when they do not overlap.
fn initial_window(default: BrushWindow, domain: (DateTime<Utc>, DateTime<Utc>)) -> BrushWindow {
    match default.clamp_to(domain) {
        Some(window) => window,
        None => {
            let end = (domain.0 + TimeDelta::days(7)).min(domain.1);
            log::info!(
                "Default window {} - {} is outside the data, showing {} - {}",
                default.start.date_naive(),
                default.end.date_naive(),
                domain.0.date_naive(),
                end.date_naive()
            );
            BrushWindow::new(domain.0, end)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::gradient::LineColor;
    use crate::config::Settings;
    use crate::layout::Viewport;
    use chrono::TimeZone;
    use iced_core::Color;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2019, 6, day, 12, 0, 0).unwrap()
    }

    fn flight(day: u32) -> FlightGeometry {
        FlightGeometry {
            flight_id: format!("F{day}"),
            departure: at(day),
            points: vec![],
            min_radius: 0.0,
            max_radius: 0.0,
            end_radius: 0.0,
            middle_stop: 0.0,
            color: LineColor::Solid(Color::WHITE),
        }
    }

    fn controller(days: &[u32], limit: usize, default: BrushWindow) -> BrushController {
        let flights: Arc<[FlightGeometry]> = days.iter().map(|d| flight(*d)).collect();
        let scale = TimeScale::from_extent(flights.iter().map(|f| f.departure), 300.0)
            .expect("flights present");
        let context = Arc::new(RenderContext::new(
            Viewport::from_window(1600.0, 1000.0),
            &Settings::default(),
        ));

        BrushController::new(flights, context, scale, limit, default)
    }

    #[test]
    fn time_scale_maps_and_inverts() {
        let scale = TimeScale::new(at(1), at(11), 100.0);

        assert_eq!(scale.x(at(1)), 0.0);
        assert_eq!(scale.x(at(6)), 50.0);
        assert_eq!(scale.invert(50.0), at(6));
        assert_eq!(scale.invert(-20.0), at(1));
        assert_eq!(scale.invert(500.0), at(11));
    }

    #[test]
    fn single_instant_domain_is_widened() {
        let scale = TimeScale::new(at(3), at(3), 100.0);
        assert_eq!(scale.domain(), (at(3), at(4)));
    }

    #[test]
    fn window_is_ordered_and_clamped() {
        let window = BrushWindow::new(at(9), at(2));
        assert_eq!((window.start(), window.end()), (at(2), at(9)));

        let clamped = window.clamp_to((at(4), at(20))).expect("overlap");
        assert_eq!((clamped.start(), clamped.end()), (at(4), at(9)));
        assert!(window.clamp_to((at(10), at(12))).is_none());
    }

    #[test]
    fn index_uses_first_and_last_match() {
        let flights: Vec<_> = [1, 2, 2, 3, 3, 5].into_iter().map(flight).collect();
        let index = DepartureIndex::new(&flights);

        assert_eq!(index.resolve(&BrushWindow::new(at(2), at(3))), Some(1..5));
        assert_eq!(index.resolve(&BrushWindow::new(at(1), at(5))), Some(0..6));
    }

    #[test]
    fn index_falls_back_inside_window() {
        let flights: Vec<_> = [1, 2, 5, 6].into_iter().map(flight).collect();
        let index = DepartureIndex::new(&flights);

        // neither the 3rd nor the 4th has a flight
        assert_eq!(index.resolve(&BrushWindow::new(at(3), at(4))), None);
        assert_eq!(index.resolve(&BrushWindow::new(at(3), at(9))), Some(2..4));
        assert_eq!(index.resolve(&BrushWindow::new(at(1), at(4))), Some(0..2));
        assert_eq!(DepartureIndex::new(&[]).resolve(&BrushWindow::new(at(1), at(2))), None);
    }

    #[test]
    fn default_window_outside_data_uses_first_week() {
        let default = BrushWindow::new(
            Utc.with_ymd_and_hms(2018, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2018, 1, 8, 0, 0, 0).unwrap(),
        );
        let controller = controller(&[1, 3, 9, 20], 60, default);

        assert_eq!(controller.window().start(), at(1));
        assert_eq!(controller.window().end(), at(8));
        assert_eq!(controller.visible_range(), 0..2);
    }

    #[test]
    fn progress_respects_preview_limit() {
        let mut controller = controller(&[1, 2, 3, 4, 5], 2, BrushWindow::new(at(1), at(1)));
        assert_eq!(controller.visible_range(), 0..1);

        let narrow = BrushWindow::new(at(2), at(3));
        assert_eq!(controller.handle(Trigger::Progress, narrow), Redraw::Render(1..3));
        assert_eq!(controller.phase(), Phase::Dragging);

        let wide = BrushWindow::new(at(1), at(5));
        assert_eq!(
            controller.handle(Trigger::Progress, wide),
            Redraw::Deferred { span: 5 }
        );
        assert_eq!(controller.visible_range(), 1..3);
        assert_eq!(controller.window(), wide);

        assert_eq!(controller.handle(Trigger::End, wide), Redraw::Render(0..5));
        assert_eq!(controller.phase(), Phase::Idle);
        assert_eq!(controller.visible_flights().len(), 5);
    }

    #[test]
    fn empty_selection_renders_nothing() {
        let mut controller = controller(&[1, 2, 8], 60, BrushWindow::new(at(1), at(2)));

        let gap = BrushWindow::new(at(4), at(6));
        assert_eq!(controller.handle(Trigger::End, gap), Redraw::Render(0..0));
        assert!(controller.visible_flights().is_empty());
    }

    #[test]
    fn pixels_round_trip_through_window() {
        let controller = controller(&[1, 11], 60, BrushWindow::new(at(1), at(11)));

        assert_eq!(controller.selection_px(), (0.0, 300.0));
        let window = controller.window_from_px(150.0, 30.0);
        assert_eq!((window.start(), window.end()), (at(2), at(6)));
    }
}
