use crate::style;

use iced::widget::{button, column, container, opaque, row, space, text};
use iced::{Alignment, Center, Element, Fill, Length, Theme, padding};

pub const MAX_TOAST_WIDTH: f32 = 280.0;
pub const MAX_TOAST_BODY_HEIGHT: f32 = 160.0;

fn danger_header(theme: &Theme) -> container::Style {
    let pair = theme.extended_palette().danger.weak;

    container::Style {
        background: Some(pair.color.into()),
        text_color: Some(pair.text),
        border: iced::Border {
            width: 1.0,
            color: pair.color,
            radius: 2.0.into(),
        },
        ..Default::default()
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    title: String,
    body: String,
}

impl Toast {
    pub fn error(body: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            body: body.into(),
        }
    }

    fn card<'a, Message>(&'a self, on_close: Message) -> Element<'a, Message>
    where
        Message: Clone + 'a,
    {
        let header = container(
            row![
                text(self.title.as_str()),
                space::horizontal(),
                button("X")
                    .on_press(on_close)
                    .style(style::button::transparent)
                    .padding(padding::right(6).left(6).top(2).bottom(2))
            ]
            .align_y(Center),
        )
        .style(danger_header)
        .width(Fill)
        .padding(4);

        let body = container(
            text(self.body.as_str())
                .wrapping(iced::widget::text::Wrapping::Word)
                .width(Fill),
        )
        .width(Fill)
        .max_height(MAX_TOAST_BODY_HEIGHT)
        .clip(true)
        .padding(4);

        container(column![header, body])
            .style(style::toast_card)
            .padding(4)
            .max_width(MAX_TOAST_WIDTH)
            .into()
    }
}

/// Lays `toasts` over the top-right corner of `base`.
pub fn stack_toasts<'a, Message>(
    base: impl Into<Element<'a, Message>>,
    toasts: &'a [Toast],
    on_close: impl Fn(usize) -> Message,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    if toasts.is_empty() {
        return base.into();
    }

    let cards = column(
        toasts
            .iter()
            .enumerate()
            .map(|(index, toast)| toast.card(on_close(index))),
    )
    .spacing(10)
    .width(Length::Shrink);

    iced::widget::stack![
        base.into(),
        container(opaque(cards))
            .width(Fill)
            .padding(16)
            .align_x(Alignment::End)
    ]
    .into()
}
