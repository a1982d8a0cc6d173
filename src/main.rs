mod logger;
mod screen;
mod style;
mod widget;

use screen::{BootError, Screen, viewer};
use widget::toast::{self, Toast};

use data::{PricePoint, Settings, SummaryRow};

use iced::widget::{center, column, container, text};
use iced::{Element, Size, Task, Theme};

fn main() -> iced::Result {
    if let Err(err) = logger::setup(cfg!(debug_assertions)) {
        eprintln!("Failed to set up logging: {err}");
    }

    let settings = Settings::load();
    let window = Size::new(settings.window.width, settings.window.height);

    iced::application(
        move || Flyhigh::new(settings.clone()),
        Flyhigh::update,
        Flyhigh::view,
    )
    .title("Flyhigh")
    .theme(Flyhigh::theme)
    .window_size(window)
    .run()
}

#[derive(Debug, Clone)]
enum Message {
    PricesLoaded(Result<Vec<PricePoint>, BootError>),
    SummaryLoaded(Result<Vec<SummaryRow>, BootError>),
    Viewer(viewer::Message),
    ToastClosed(usize),
}

struct Flyhigh {
    screen: Screen,
    toasts: Vec<Toast>,
    settings: Settings,
}

impl Flyhigh {
    fn new(settings: Settings) -> (Self, Task<Message>) {
        log::info!("Loading flight data from {}", settings.data_dir.display());

        let load = Task::batch([
            Task::perform(
                screen::load_prices(settings.data_dir.clone()),
                Message::PricesLoaded,
            ),
            Task::perform(
                screen::load_summary(settings.data_dir.clone()),
                Message::SummaryLoaded,
            ),
        ]);

        (
            Self {
                screen: Screen::loading(),
                toasts: vec![],
                settings,
            },
            load,
        )
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PricesLoaded(result) => match result {
                Ok(prices) => {
                    if let Screen::Loading(pending) = &mut self.screen {
                        pending.set_prices(prices);
                    }
                    self.screen.boot(&self.settings);
                }
                Err(err) => self.fail(err),
            },
            Message::SummaryLoaded(result) => match result {
                Ok(summary) => {
                    if let Screen::Loading(pending) = &mut self.screen {
                        pending.set_summary(summary);
                    }
                    self.screen.boot(&self.settings);
                }
                Err(err) => self.fail(err),
            },
            Message::Viewer(message) => {
                if let Screen::Ready(viewer) = &mut self.screen {
                    viewer.update(message);
                }
            }
            Message::ToastClosed(index) => {
                if index < self.toasts.len() {
                    self.toasts.remove(index);
                }
            }
        }

        Task::none()
    }

    /// Either input failing ends the session on the failure screen.
    fn fail(&mut self, err: BootError) {
        log::error!("{err}");

        if !matches!(self.screen, Screen::Failed(_)) {
            self.toasts.push(Toast::error(err.to_string()));
            self.screen = Screen::Failed(err);
        }
    }

    fn view(&self) -> Element<'_, Message> {
        let content: Element<'_, Message> = match &self.screen {
            Screen::Loading(_) => center(text("Loading flight prices...")).into(),
            Screen::Ready(viewer) => viewer.view().map(Message::Viewer),
            Screen::Failed(err) => center(
                container(column![
                    text("Could not build the chart").size(16),
                    text(err.to_string()).size(13),
                ]
                .spacing(8))
                .padding(16)
                .style(style::failure_panel),
            )
            .into(),
        };

        toast::stack_toasts(content, &self.toasts, Message::ToastClosed)
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }
}
