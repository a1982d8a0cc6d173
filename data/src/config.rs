pub mod settings;
pub mod theme;

pub use settings::{DefaultWindow, Settings, SettingsError, WindowSpec};
