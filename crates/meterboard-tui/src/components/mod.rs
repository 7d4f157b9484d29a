//! Reusable TUI components

pub mod loading;
pub mod toast;

pub use loading::{LoadingOverlay, Spinner};
pub use toast::render_toasts;
