//! Terminal UI components
//!
//! Built with ratatui. Keyboard-first navigation throughout.

pub mod filters;
pub mod table;
pub mod theme;
pub mod toolbar;

pub use theme::Theme;
