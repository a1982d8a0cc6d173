pub mod viewer;

use data::source::{FLIGHT_INFO_FILE, LoadError, PRICE_HISTORY_FILE};
use data::{PricePoint, Settings, SummaryRow};

use std::path::PathBuf;

#[derive(thiserror::Error, Debug, Clone)]
pub enum BootError {
    #[error("Failed to load {file}: {reason}")]
    Load { file: &'static str, reason: String },
    #[error("No usable rows in {0}")]
    Empty(&'static str),
    #[error("Background task failed: {0}")]
    Task(String),
}

impl BootError {
    fn load(file: &'static str, err: LoadError) -> Self {
        BootError::Load {
            file,
            reason: err.to_string(),
        }
    }
}

pub async fn load_prices(dir: PathBuf) -> Result<Vec<PricePoint>, BootError> {
    let points = tokio::task::spawn_blocking(move || data::source::load_price_points(&dir))
        .await
        .map_err(|err| BootError::Task(err.to_string()))?
        .map_err(|err| BootError::load(PRICE_HISTORY_FILE, err))?;

    if points.is_empty() {
        return Err(BootError::Empty(PRICE_HISTORY_FILE));
    }
    Ok(points)
}

pub async fn load_summary(dir: PathBuf) -> Result<Vec<SummaryRow>, BootError> {
    tokio::task::spawn_blocking(move || data::source::load_summary_rows(&dir))
        .await
        .map_err(|err| BootError::Task(err.to_string()))?
        .map_err(|err| BootError::load(FLIGHT_INFO_FILE, err))
}

/// Collects both inputs; the chart is built only once both have arrived.
#[derive(Debug, Default)]
pub struct Pending {
    prices: Option<Vec<PricePoint>>,
    summary: Option<Vec<SummaryRow>>,
}

impl Pending {
    pub fn set_prices(&mut self, prices: Vec<PricePoint>) {
        self.prices = Some(prices);
    }

    pub fn set_summary(&mut self, summary: Vec<SummaryRow>) {
        self.summary = Some(summary);
    }

    /// Takes both inputs once they are present.
    pub fn take_ready(&mut self) -> Option<(Vec<PricePoint>, Vec<SummaryRow>)> {
        if self.prices.is_some() && self.summary.is_some() {
            self.prices.take().zip(self.summary.take())
        } else {
            None
        }
    }
}

pub enum Screen {
    Loading(Pending),
    Ready(Box<viewer::Viewer>),
    Failed(BootError),
}

impl Screen {
    pub fn loading() -> Self {
        Screen::Loading(Pending::default())
    }

    pub fn boot(&mut self, settings: &Settings) {
        let Screen::Loading(pending) = self else {
            return;
        };
        let Some((prices, summary)) = pending.take_ready() else {
            return;
        };

        *self = Screen::Ready(Box::new(viewer::Viewer::new(prices, summary, settings)));
    }
}
