//! streambrowse - terminal browser for streaming-media listings
//!
//! Pluggable providers supply rows of media items, a generic data table
//! renders them, and a toolbar of filters narrows or re-queries the
//! listing.
//!
//! # Modules
//!
//! - `models` - Columns, listing rows, highlight rules
//! - `provider` - Provider trait, registry, built-in providers
//! - `ui` - Filter controls, toolbar, listing table, theme
//! - `session` - Toolbar/table wiring per provider
//! - `app` - Application state and key routing

pub mod app;
pub mod cli;
pub mod config;
pub mod models;
pub mod provider;
pub mod session;
pub mod ui;

// Re-export commonly used types
pub use app::{App, Focus};
pub use config::Config;
pub use models::{Column, ColumnAlign, HighlightRules, Listing, Payload};
pub use provider::registry::{ProviderRegistry, RegistryError};
pub use provider::{FilterSpec, FilterValue, FilterValues, ListingStream, Provider, ProviderError};
pub use session::BrowsingSession;
pub use ui::table::{ListingTable, StreamStatus, TableCommand};
pub use ui::toolbar::{FilterChange, FilterToolbar};
