//! egui front-end for the conversation client.

pub mod app;
pub mod components;
pub mod state;
pub mod theme;

pub use app::NatterApp;
pub use state::AppState;
pub use theme::Theme;
