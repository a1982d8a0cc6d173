use data::chart::brush::BrushController;
use data::chart::scene::{Cap, Pen, Surface};

use iced::advanced::widget::tree::{self, Tree};
use iced::advanced::{Clipboard, Layout, Shell, Widget, layout, renderer};
use iced::widget::canvas::{self, LineCap, LineJoin, Path, Stroke};
use iced::{Color, Element, Event, Length, Point, Rectangle, Renderer, Size, Theme, Vector};
use iced::{mouse, window};

#[derive(Default)]
struct State {
    cache: canvas::Cache,
    last_cache_rev: u64,
}

/// Draws the visible flights of a [`BrushController`] around the chart origin.
pub struct RadialChart<'a> {
    controller: &'a BrushController,
    version: u64,
}

impl<'a> RadialChart<'a> {
    pub fn new(controller: &'a BrushController) -> Self {
        Self {
            controller,
            version: 0,
        }
    }

    /// Bump to make the next frame re-tessellate the flight lines.
    pub fn version(mut self, rev: u64) -> Self {
        self.version = rev;
        self
    }
}

/// Adapts a canvas frame to the renderer's [`Surface`].
struct FrameSurface<'a> {
    frame: &'a mut canvas::Frame,
}

impl Surface for FrameSurface<'_> {
    // The cache hands out a fresh frame for every redraw.
    fn clear(&mut self) {}

    fn stroke_path(&mut self, points: &[(f32, f32)], pen: Pen) {
        let Some(((x0, y0), rest)) = points.split_first() else {
            return;
        };

        let path = Path::new(|builder| {
            builder.move_to(Point::new(*x0, *y0));
            for (x, y) in rest {
                builder.line_to(Point::new(*x, *y));
            }
        });

        self.frame.stroke(
            &path,
            Stroke::default()
                .with_color(pen.color)
                .with_width(pen.width)
                .with_line_cap(match pen.cap {
                    Cap::Round => LineCap::Round,
                    Cap::Butt => LineCap::Butt,
                })
                .with_line_join(LineJoin::Round),
        );
    }

    fn fill_dot(&mut self, center: (f32, f32), radius: f32, color: Color) {
        self.frame
            .fill(&Path::circle(Point::new(center.0, center.1), radius), color);
    }
}

impl<Message> Widget<Message, Theme, Renderer> for RadialChart<'_> {
    fn tag(&self) -> tree::Tag {
        tree::Tag::of::<State>()
    }

    fn state(&self) -> tree::State {
        tree::State::new(State::default())
    }

    fn size(&self) -> Size<Length> {
        let viewport = self.controller.context().viewport;
        Size {
            width: Length::Fixed(viewport.width),
            height: Length::Fixed(viewport.height),
        }
    }

    fn layout(
        &mut self,
        _tree: &mut Tree,
        _renderer: &Renderer,
        limits: &layout::Limits,
    ) -> layout::Node {
        let viewport = self.controller.context().viewport;
        layout::atomic(limits, viewport.width, viewport.height)
    }

    fn update(
        &mut self,
        tree: &mut Tree,
        event: &Event,
        _layout: Layout<'_>,
        _cursor: mouse::Cursor,
        _renderer: &Renderer,
        _clipboard: &mut dyn Clipboard,
        _shell: &mut Shell<'_, Message>,
        _viewport: &Rectangle,
    ) {
        if let Event::Window(window::Event::RedrawRequested(_)) = event {
            let state = tree.state.downcast_mut::<State>();

            if state.last_cache_rev != self.version {
                state.cache.clear();
                state.last_cache_rev = self.version;
            }
        }
    }

    fn draw(
        &self,
        tree: &Tree,
        renderer: &mut Renderer,
        _theme: &Theme,
        _style: &renderer::Style,
        layout: Layout<'_>,
        _cursor: mouse::Cursor,
        _viewport: &Rectangle,
    ) {
        use iced::advanced::Renderer as _;
        use iced::advanced::graphics::geometry::Renderer as _;

        let state = tree.state.downcast_ref::<State>();
        let bounds = layout.bounds();
        let (cx, cy) = self.controller.context().viewport.center();

        let geometry = state.cache.draw(renderer, bounds.size(), |frame| {
            frame.translate(Vector::new(cx, cy));
            self.controller.redraw(&mut FrameSurface { frame });
        });

        renderer.with_translation(Vector::new(bounds.x, bounds.y), |r| {
            r.draw_geometry(geometry);
        });
    }
}

impl<'a, Message> From<RadialChart<'a>> for Element<'a, Message, Theme, Renderer>
where
    Message: 'a,
{
    fn from(chart: RadialChart<'a>) -> Self {
        Element::new(chart)
    }
}
