use super::{AxisTick, build_path};
use crate::style;

use data::chart::area::PathSegment;

use iced::advanced::widget::tree::{self, Tree};
use iced::advanced::{self, Clipboard, Layout, Shell, Widget, layout, renderer};
use iced::widget::canvas::{self, Path, Stroke};
use iced::{Color, Element, Event, Length, Point, Rectangle, Renderer, Size, Theme, Vector};
use iced::mouse;

pub const AXIS_HEIGHT: f32 = 20.0;
const HANDLE_PX: f32 = 6.0;
const TEXT_SIZE: f32 = 11.0;
const CHAR_W: f32 = TEXT_SIZE * 0.64;
/// Narrower selections made by a plain click are dropped.
const MIN_SELECTION_PX: f32 = 1.0;

/// Selection edges in pixels, emitted while dragging and on release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BrushEvent {
    Moved(f32, f32),
    Ended(f32, f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Grip {
    Move { anchor: f32, from: (f32, f32) },
    West { fixed: f32 },
    East { fixed: f32 },
    New { origin: f32, previous: (f32, f32) },
}

impl Grip {
    fn hit(x: f32, (x0, x1): (f32, f32)) -> Self {
        if (x - x0).abs() <= HANDLE_PX {
            Grip::West { fixed: x1 }
        } else if (x - x1).abs() <= HANDLE_PX {
            Grip::East { fixed: x0 }
        } else if x > x0 && x < x1 {
            Grip::Move {
                anchor: x,
                from: (x0, x1),
            }
        } else {
            Grip::New {
                origin: x,
                previous: (x0, x1),
            }
        }
    }

    fn apply(self, x: f32, width: f32) -> (f32, f32) {
        let x = x.clamp(0.0, width);

        match self {
            Grip::Move { anchor, from } => {
                let dx = (x - anchor).clamp(-from.0, width - from.1);
                (from.0 + dx, from.1 + dx)
            }
            Grip::West { fixed } | Grip::East { fixed } => (x.min(fixed), x.max(fixed)),
            Grip::New { origin, .. } => (x.min(origin), x.max(origin)),
        }
    }
}

/// Cursor x relative to `bounds`, kept while the cursor leaves them so a drag
/// can run past either end of the axis.
fn drag_x(cursor: mouse::Cursor, bounds: Rectangle) -> Option<f32> {
    cursor.position().map(|position| position.x - bounds.x)
}

#[derive(Default)]
struct State {
    area_cache: canvas::Cache,
    drag: Option<Grip>,
    current: Option<(f32, f32)>,
}

/// Departure-time axis with the summary area behind a draggable selection.
pub struct TimeBrush<'a> {
    area: &'a [PathSegment],
    ticks: &'a [AxisTick],
    selection: (f32, f32),
    width: f32,
    height: f32,
    fill: Color,
}

impl<'a> TimeBrush<'a> {
    pub fn new(area: &'a [PathSegment], ticks: &'a [AxisTick], width: f32, height: f32) -> Self {
        Self {
            area,
            ticks,
            selection: (0.0, 0.0),
            width,
            height,
            fill: Color::WHITE,
        }
    }

    pub fn selection(mut self, selection: (f32, f32)) -> Self {
        self.selection = selection;
        self
    }

    pub fn fill(mut self, color: Color) -> Self {
        self.fill = color;
        self
    }

    fn fill_area(&self, frame: &mut canvas::Frame, theme: &Theme) {
        let palette = theme.extended_palette();

        if !self.area.is_empty() {
            frame.fill(&build_path(self.area), self.fill);
        }

        frame.fill_rectangle(
            Point::new(0.0, self.height),
            Size::new(self.width, 1.0),
            palette.background.strong.color,
        );

        let mut last_right = f32::NEG_INFINITY;
        for tick in self.ticks {
            let x = tick.x.clamp(0.0, self.width);
            let est_w = tick.label.len() as f32 * CHAR_W + 8.0;
            let left = x - est_w * 0.5;

            if left <= last_right {
                continue;
            }

            frame.fill_rectangle(
                Point::new(x, self.height),
                Size::new(1.0, 4.0),
                palette.background.strong.color,
            );
            frame.fill_text(canvas::Text {
                content: tick.label.clone(),
                position: Point::new(x, self.height + AXIS_HEIGHT * 0.5 + 2.0),
                color: palette.background.base.text,
                size: TEXT_SIZE.into(),
                font: style::AXIS_FONT,
                align_x: iced::Alignment::Center.into(),
                align_y: iced::Alignment::Center.into(),
                ..Default::default()
            });

            last_right = x + est_w * 0.5;
        }
    }

    fn fill_selection(&self, frame: &mut canvas::Frame, theme: &Theme, (x0, x1): (f32, f32)) {
        let palette = theme.extended_palette();
        let edge = palette.background.base.text;

        frame.fill_rectangle(
            Point::new(x0, 0.0),
            Size::new((x1 - x0).max(0.0), self.height),
            edge.scale_alpha(0.15),
        );

        let outline = Path::rectangle(Point::new(x0, 0.0), Size::new(x1 - x0, self.height));
        frame.stroke(
            &outline,
            Stroke::default()
                .with_color(edge.scale_alpha(0.6))
                .with_width(1.0),
        );

        for x in [x0, x1] {
            frame.fill_rectangle(
                Point::new(x - 1.5, self.height * 0.25),
                Size::new(3.0, self.height * 0.5),
                edge,
            );
        }
    }
}

impl<M> Widget<M, Theme, Renderer> for TimeBrush<'_>
where
    M: Clone + From<BrushEvent>,
{
    fn tag(&self) -> tree::Tag {
        tree::Tag::of::<State>()
    }

    fn state(&self) -> tree::State {
        tree::State::new(State::default())
    }

    fn size(&self) -> Size<Length> {
        Size {
            width: Length::Fixed(self.width),
            height: Length::Fixed(self.height + AXIS_HEIGHT),
        }
    }

    fn layout(
        &mut self,
        _tree: &mut Tree,
        _renderer: &Renderer,
        limits: &layout::Limits,
    ) -> layout::Node {
        layout::atomic(limits, self.width, self.height + AXIS_HEIGHT)
    }

    fn update(
        &mut self,
        tree: &mut Tree,
        event: &Event,
        layout: Layout<'_>,
        cursor: mouse::Cursor,
        _renderer: &Renderer,
        _clipboard: &mut dyn Clipboard,
        shell: &mut Shell<'_, M>,
        _viewport: &Rectangle,
    ) {
        let state = tree.state.downcast_mut::<State>();
        let bounds = layout.bounds();

        match event {
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if shell.is_event_captured() {
                    return;
                }
                let Some(pos) = cursor.position_in(bounds) else {
                    return;
                };

                let grip = Grip::hit(pos.x, self.selection);
                state.drag = Some(grip);
                state.current = Some(match grip {
                    Grip::New { origin, .. } => (origin, origin),
                    _ => self.selection,
                });

                shell.capture_event();
                shell.request_redraw();
            }
            Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                let Some(grip) = state.drag else {
                    return;
                };
                let Some(x) = drag_x(cursor, bounds) else {
                    return;
                };

                let (x0, x1) = grip.apply(x, self.width);
                if state.current == Some((x0, x1)) {
                    return;
                }
                state.current = Some((x0, x1));

                shell.publish(M::from(BrushEvent::Moved(x0, x1)));
                shell.request_redraw();
            }
            Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                let Some(grip) = state.drag.take() else {
                    return;
                };
                let (x0, x1) = state.current.take().unwrap_or(self.selection);

                let (x0, x1) = match grip {
                    Grip::New { previous, .. } if x1 - x0 < MIN_SELECTION_PX => previous,
                    _ => (x0, x1),
                };

                shell.publish(M::from(BrushEvent::Ended(x0, x1)));
                shell.request_redraw();
            }
            _ => {}
        }
    }

    fn draw(
        &self,
        tree: &Tree,
        renderer: &mut Renderer,
        theme: &Theme,
        _style: &renderer::Style,
        layout: Layout<'_>,
        _cursor: mouse::Cursor,
        _viewport: &Rectangle,
    ) {
        use advanced::Renderer as _;
        use iced::advanced::graphics::geometry::Renderer as _;

        let state = tree.state.downcast_ref::<State>();
        let bounds = layout.bounds();

        let area = state.area_cache.draw(renderer, bounds.size(), |frame| {
            self.fill_area(frame, theme);
        });

        let mut frame = canvas::Frame::new(renderer, bounds.size());
        self.fill_selection(
            &mut frame,
            theme,
            state.current.unwrap_or(self.selection),
        );
        let selection = frame.into_geometry();

        renderer.with_translation(Vector::new(bounds.x, bounds.y), |r| {
            r.draw_geometry(area);
            r.draw_geometry(selection);
        });
    }

    fn mouse_interaction(
        &self,
        tree: &Tree,
        layout: Layout<'_>,
        cursor: mouse::Cursor,
        _viewport: &Rectangle,
        _renderer: &Renderer,
    ) -> mouse::Interaction {
        let state = tree.state.downcast_ref::<State>();

        match state.drag {
            Some(Grip::Move { .. }) => return mouse::Interaction::Grabbing,
            Some(_) => return mouse::Interaction::ResizingHorizontally,
            None => {}
        }

        let Some(pos) = cursor.position_in(layout.bounds()) else {
            return mouse::Interaction::default();
        };

        match Grip::hit(pos.x, self.selection) {
            Grip::West { .. } | Grip::East { .. } => mouse::Interaction::ResizingHorizontally,
            Grip::Move { .. } => mouse::Interaction::Grab,
            Grip::New { .. } => mouse::Interaction::Crosshair,
        }
    }
}

impl<'a, M> From<TimeBrush<'a>> for Element<'a, M, Theme, Renderer>
where
    M: Clone + 'a + From<BrushEvent>,
{
    fn from(brush: TimeBrush<'a>) -> Self {
        Element::new(brush)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_near_edge_resizes() {
        assert_eq!(Grip::hit(103.0, (100.0, 200.0)), Grip::West { fixed: 200.0 });
        assert_eq!(Grip::hit(196.0, (100.0, 200.0)), Grip::East { fixed: 100.0 });
        assert!(matches!(Grip::hit(150.0, (100.0, 200.0)), Grip::Move { .. }));
        assert!(matches!(Grip::hit(20.0, (100.0, 200.0)), Grip::New { .. }));
    }

    #[test]
    fn moving_keeps_width_inside_axis() {
        let grip = Grip::Move {
            anchor: 150.0,
            from: (100.0, 200.0),
        };

        assert_eq!(grip.apply(170.0, 400.0), (120.0, 220.0));
        assert_eq!(grip.apply(500.0, 400.0), (300.0, 400.0));
        assert_eq!(grip.apply(-50.0, 400.0), (0.0, 100.0));
    }

    #[test]
    fn drag_follows_cursor_outside_bounds() {
        let bounds = Rectangle::new(Point::new(100.0, 40.0), Size::new(400.0, 120.0));

        let inside = mouse::Cursor::Available(Point::new(250.0, 80.0));
        let past_east = mouse::Cursor::Available(Point::new(620.0, 300.0));

        assert_eq!(drag_x(inside, bounds), Some(150.0));
        assert_eq!(drag_x(past_east, bounds), Some(520.0));
        assert_eq!(drag_x(mouse::Cursor::Unavailable, bounds), None);
    }

    #[test]
    fn resizing_past_fixed_edge_flips() {
        let grip = Grip::West { fixed: 200.0 };
        assert_eq!(grip.apply(260.0, 400.0), (200.0, 260.0));
    }
}
