pub mod chart;
pub mod config;
pub mod layout;
pub mod source;
pub mod util;

pub use config::Settings;
pub use layout::Viewport;
pub use source::{PricePoint, SummaryRow};
