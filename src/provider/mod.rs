//! Provider abstraction
//!
//! A provider is a pluggable source of media listings: it declares table
//! columns and toolbar filters, produces rows through a lazy failable
//! stream, and services refresh/download commands. The browsing core only
//! ever talks to the [`Provider`] trait.

pub mod files;
pub mod registry;
pub mod sample;

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::{Column, HighlightRules, Listing, Payload};

// =============================================================================
// Errors
// =============================================================================

/// Domain errors a provider may raise
///
/// These never cross the core boundary: the table truncates the row stream
/// and logs, and command failures surface only in the status line.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("listing source unavailable: {0}")]
    Unavailable(String),

    #[error("listing read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("download failed: {0}")]
    Download(String),
}

// =============================================================================
// Filter Declarations
// =============================================================================

/// Current value of a toolbar filter, merged into query arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Integer(i64),
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Text(s) => write!(f, "{}", s),
            FilterValue::Integer(n) => write!(f, "{}", n),
        }
    }
}

/// Provider-declared description of one toolbar filter control
///
/// `auto_refresh` controls re-query on every edit; the rest only on an
/// explicit commit (enter).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterSpec {
    Text {
        default: String,
        auto_refresh: bool,
    },
    Integer {
        default: i64,
        minimum: Option<i64>,
        maximum: Option<i64>,
        big_step: i64,
        auto_refresh: bool,
    },
}

impl FilterSpec {
    /// A commit-on-enter text filter
    pub fn text(default: impl Into<String>) -> Self {
        FilterSpec::Text {
            default: default.into(),
            auto_refresh: false,
        }
    }

    /// A live (auto-refresh) bounded integer filter
    pub fn integer(default: i64, minimum: Option<i64>, maximum: Option<i64>) -> Self {
        FilterSpec::Integer {
            default,
            minimum,
            maximum,
            big_step: 10,
            auto_refresh: true,
        }
    }
}

/// Ordered name → value mapping passed to [`Provider::listings`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterValues(Vec<(String, FilterValue)>);

impl FilterValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, replacing any previous value under the same name
    pub fn set(&mut self, name: impl Into<String>, value: FilterValue) {
        let name = name.into();
        if let Some(slot) = self.0.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.0.push((name, value));
        }
    }

    pub fn get(&self, name: &str) -> Option<&FilterValue> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Text value lookup, `None` if absent or not a text filter
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(FilterValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// Integer value lookup, `None` if absent or not an integer filter
    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.get(name) {
            Some(FilterValue::Integer(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v))
    }
}

// =============================================================================
// Provider Trait
// =============================================================================

/// Lazy, failable sequence of listing rows
///
/// Iteration may yield an error mid-stream; consumers treat that as the end
/// of the sequence after logging it.
pub type ListingStream = Box<dyn Iterator<Item = Result<Listing, ProviderError>> + Send>;

/// Capability set the browsing core consumes from a content source
pub trait Provider: Send {
    /// Registry name
    fn name(&self) -> &'static str;

    /// Ordered table columns with render hints
    fn attributes(&self) -> Vec<Column>;

    /// Ordered toolbar filters; order fixes the cycle slots
    fn filters(&self) -> Vec<(String, FilterSpec)>;

    /// Produce a fresh row stream for the given filter values
    fn listings(&self, filters: &FilterValues) -> ListingStream;

    /// Re-read the underlying listing source
    fn refresh(&mut self) -> Result<(), ProviderError> {
        Ok(())
    }

    /// Fetch the selected row's media; returns the local destination
    fn download(&self, payload: &Payload) -> Result<PathBuf, ProviderError>;

    /// Maximum rows materialized per query
    fn limit(&self) -> usize {
        50
    }

    /// Highlight rules applied to the title column
    fn highlight(&self) -> HighlightRules {
        HighlightRules::none()
    }
}

impl std::fmt::Debug for dyn Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider")
            .field("name", &self.name())
            .finish_non_exhaustive()
    }
}
