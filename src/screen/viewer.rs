use crate::widget::chart::brush::{BrushEvent, TimeBrush};
use crate::widget::chart::radial::RadialChart;
use crate::widget::chart::{self, AxisTick};

use data::chart::area::{self, PathSegment, SummaryMetric};
use data::chart::brush::{BrushController, Redraw, TimeScale, Trigger};
use data::chart::scene::RenderContext;
use data::chart::{FlightGeometry, build_geometries};
use data::config::theme::Tone;
use data::{PricePoint, Settings, SummaryRow, Viewport};

use iced::widget::{column, container, scrollable, text};
use iced::{Color, Element, Length};

use std::sync::Arc;

const MIN_TICK_PX: f32 = 80.0;

#[derive(Debug, Clone, Copy)]
pub enum Message {
    Brush(BrushEvent),
}

impl From<BrushEvent> for Message {
    fn from(event: BrushEvent) -> Self {
        Message::Brush(event)
    }
}

pub struct Viewer {
    controller: BrushController,
    metric: SummaryMetric,
    area: Vec<PathSegment>,
    ticks: Vec<AxisTick>,
    brush_height: f32,
    fill: Color,
    version: u64,
}

impl Viewer {
    pub fn new(prices: Vec<PricePoint>, summary: Vec<SummaryRow>, settings: &Settings) -> Self {
        let viewport = Viewport::from_window(settings.window.width, settings.window.height);
        let context = Arc::new(RenderContext::new(viewport, settings));

        let flights: Arc<[FlightGeometry]> =
            build_geometries(prices, &viewport, &context.palette).into();

        let scale = time_scale(&summary, &flights, viewport.width, settings);
        let area = area::area_path(&summary, settings.brush_metric, &scale, settings.brush_height);
        let ticks = chart::axis_ticks(&scale, MIN_TICK_PX);
        let fill = context.palette[Tone::Middle].scale_alpha(0.8);

        let controller = BrushController::new(
            flights,
            context,
            scale,
            settings.preview_limit,
            settings.default_window.into(),
        );

        log::info!(
            "Chart ready: {} flights, {} summary rows, {} visible",
            controller.flight_count(),
            summary.len(),
            controller.visible_flights().len()
        );

        Self {
            controller,
            metric: settings.brush_metric,
            area,
            ticks,
            brush_height: settings.brush_height,
            fill,
            version: 1,
        }
    }

    pub fn update(&mut self, message: Message) {
        match message {
            Message::Brush(BrushEvent::Moved(x0, x1)) => self.apply(Trigger::Progress, x0, x1),
            Message::Brush(BrushEvent::Ended(x0, x1)) => self.apply(Trigger::End, x0, x1),
        }
    }

    fn apply(&mut self, trigger: Trigger, x0: f32, x1: f32) {
        let window = self.controller.window_from_px(x0, x1);

        match self.controller.handle(trigger, window) {
            Redraw::Render(range) => {
                log::debug!("{trigger:?}: drawing flights {range:?}");
                self.version = self.version.wrapping_add(1);
            }
            Redraw::Deferred { span } => {
                log::trace!("{trigger:?}: {span} flights, waiting for release");
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let viewport = self.controller.context().viewport;
        let window = self.controller.window();

        let header = text(format!(
            "{} to {} | {} of {} flights | {}",
            window.start().format("%Y-%m-%d"),
            window.end().format("%Y-%m-%d"),
            self.controller.visible_flights().len(),
            self.controller.flight_count(),
            self.metric,
        ))
        .size(13);

        let brush: Element<'_, Message> =
            TimeBrush::new(&self.area, &self.ticks, viewport.width, self.brush_height)
                .selection(self.controller.selection_px())
                .fill(self.fill)
                .into();

        let radial: Element<'_, Message> = RadialChart::new(&self.controller)
            .version(self.version)
            .into();

        scrollable(
            column![
                container(header).padding([4, 8]),
                brush,
                radial
            ]
            .spacing(8),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
    }
}

/// Axis over the summary departures, or the flights' when there is no summary.
fn time_scale(
    summary: &[SummaryRow],
    flights: &[FlightGeometry],
    width: f32,
    settings: &Settings,
) -> TimeScale {
    TimeScale::from_extent(summary.iter().map(|row| row.departure), width)
        .or_else(|| {
            log::warn!("Summary is empty, using flight departures for the brush axis");
            TimeScale::from_extent(flights.iter().map(|f| f.departure), width)
        })
        .unwrap_or_else(|| {
            let window = settings.default_window;
            TimeScale::new(window.start, window.end, width)
        })
}
