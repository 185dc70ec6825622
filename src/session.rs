//! Browsing session
//!
//! One session pairs a provider with its filter toolbar and listing table
//! and owns the wiring between them: toolbar filter changes merge into the
//! query arguments and restart the table's row stream; table commands are
//! dispatched back to the provider. Switching providers tears the whole
//! session down and builds a fresh one through the registry.

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::provider::registry::{ProviderRegistry, RegistryError};
use crate::provider::{FilterValues, Provider};
use crate::ui::table::{ListingTable, TableCommand};
use crate::ui::toolbar::{FilterChange, FilterToolbar};
use crossterm::event::KeyEvent;

/// Provider + toolbar + table, wired together
pub struct BrowsingSession {
    provider: Box<dyn Provider>,
    pub toolbar: FilterToolbar,
    pub table: ListingTable,
    filters: FilterValues,
}

impl std::fmt::Debug for BrowsingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowsingSession")
            .field("provider", &self.provider.name())
            .field("filters", &self.filters)
            .finish_non_exhaustive()
    }
}

impl BrowsingSession {
    /// Construct a session for a named provider
    ///
    /// Fails when the name is unregistered or the provider rejects its
    /// configuration; both are fatal to session construction. On success
    /// the initial query is already started.
    pub fn open(
        registry: &ProviderRegistry,
        name: &str,
        config: &Config,
    ) -> Result<Self, RegistryError> {
        let provider = registry.get(name, config)?;
        let toolbar = FilterToolbar::new(&provider.filters());
        let mut table = ListingTable::new(provider.as_ref());
        let filters = toolbar.values();
        table.begin_query(provider.listings(&filters));
        Ok(Self {
            provider,
            toolbar,
            table,
            filters,
        })
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Current merged query arguments
    pub fn filters(&self) -> &FilterValues {
        &self.filters
    }

    /// Restart the table's stream with the current filter values
    fn requery(&mut self) {
        self.table
            .begin_query(self.provider.listings(&self.filters));
    }

    /// Merge a toolbar change into the query arguments and re-query
    pub fn apply_filter_change(&mut self, change: FilterChange) {
        debug!(name = %change.name, value = %change.value, "filter changed");
        self.filters.set(change.name, change.value);
        self.requery();
    }

    /// Route a keypress to the toolbar
    pub fn handle_toolbar_key(&mut self, key: KeyEvent) {
        if let Some(change) = self.toolbar.keypress(key) {
            self.apply_filter_change(change);
        }
    }

    /// Route a keypress to the table, dispatching any resulting command
    ///
    /// Returns a human-readable outcome for the status line, if the key
    /// amounted to a command.
    pub fn handle_table_key(&mut self, key: KeyEvent) -> Option<String> {
        match self.table.keypress(key)? {
            TableCommand::Refresh => match self.provider.refresh() {
                Ok(()) => {
                    self.requery();
                    Some(format!("{} refreshed", self.provider.name()))
                }
                Err(e) => {
                    warn!(error = %e, "provider refresh failed");
                    Some(format!("refresh failed: {}", e))
                }
            },
            TableCommand::Download(payload) => match self.provider.download(&payload) {
                Ok(dest) => {
                    info!(title = %payload.title, dest = %dest.display(), "download complete");
                    Some(format!("downloaded {} -> {}", payload.title, dest.display()))
                }
                Err(e) => {
                    warn!(title = %payload.title, error = %e, "download failed");
                    Some(format!("download failed: {}", e))
                }
            },
            TableCommand::CycleFilter { index, step } => {
                if let Some(change) = self.toolbar.cycle_filter(index, step) {
                    self.apply_filter_change(change);
                }
                None
            }
            TableCommand::Inspect(payload) => {
                info!(detail = %payload.detail, "inspect");
                Some(payload.detail)
            }
        }
    }

    /// Pull up to `budget` rows from the live stream
    pub fn poll(&mut self, budget: usize) -> usize {
        self.table.poll(budget)
    }
}
