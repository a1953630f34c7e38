//! Terminal front end.
//!
//! Draws a session's output with ratatui/crossterm and routes key presses
//! back into the session.

pub mod app;
pub mod crt;
pub mod theme;
pub mod view;

pub use app::{handle_key, InputResult, SiteApp};
pub use theme::Theme;
