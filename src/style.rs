use iced::widget::container;
use iced::{Border, Font, Theme};

pub const AXIS_FONT: Font = Font::MONOSPACE;

pub mod button {
    use iced::widget::button::{Status, Style};
    use iced::{Border, Theme};

    pub fn transparent(theme: &Theme, status: Status) -> Style {
        let palette = theme.extended_palette();

        Style {
            text_color: palette.background.base.text,
            border: Border {
                radius: 3.0.into(),
                ..Default::default()
            },
            background: match status {
                Status::Hovered | Status::Pressed => {
                    Some(palette.background.weak.color.scale_alpha(0.6).into())
                }
                _ => None,
            },
            ..Default::default()
        }
    }
}

pub fn toast_card(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();

    container::Style {
        text_color: Some(palette.background.base.text),
        background: Some(palette.background.weakest.color.into()),
        border: Border {
            width: 1.0,
            color: palette.background.strong.color,
            radius: 4.0.into(),
        },
        ..Default::default()
    }
}

pub fn failure_panel(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();

    container::Style {
        text_color: Some(palette.danger.base.color),
        background: Some(palette.background.weak.color.into()),
        border: Border {
            width: 1.0,
            color: palette.danger.weak.color,
            radius: 4.0.into(),
        },
        ..Default::default()
    }
}
