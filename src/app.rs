//! App state and core application logic
//!
//! Routes keyboard input between the filter toolbar and the listing
//! table, drives the session's row polling, and handles provider
//! switching through the registry.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::error;

use crate::config::Config;
use crate::provider::registry::ProviderRegistry;
use crate::session::BrowsingSession;

/// Rows pulled from the live stream per event-loop tick
const POLL_BUDGET: usize = 64;

// =============================================================================
// Focus
// =============================================================================

/// Which pane receives non-global keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// The listing table (default)
    #[default]
    Table,
    /// The filter toolbar strip
    Toolbar,
}

// =============================================================================
// Main Application State
// =============================================================================

/// Main application state
pub struct App {
    registry: ProviderRegistry,
    config: Config,
    session: BrowsingSession,
    /// Which pane has keyboard focus
    pub focus: Focus,
    /// Whether the app is running
    pub running: bool,
    /// Transient status line message
    pub status: Option<String>,
}

impl App {
    /// Build the app, opening the initial provider session
    ///
    /// Provider choice: CLI/config preference first, else the first
    /// registered provider. A lookup or configuration failure here is
    /// fatal and propagates to the caller.
    pub fn new(registry: ProviderRegistry, config: Config, provider: Option<&str>) -> Result<Self> {
        let name = provider
            .map(str::to_string)
            .or_else(|| config.default_provider.clone())
            .or_else(|| registry.default_name().map(str::to_string))
            .ok_or_else(|| anyhow::anyhow!("no providers registered"))?;
        let session = BrowsingSession::open(&registry, &name, &config)?;
        Ok(Self {
            registry,
            config,
            session,
            focus: Focus::Table,
            running: true,
            status: None,
        })
    }

    pub fn session(&self) -> &BrowsingSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut BrowsingSession {
        &mut self.session
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Tear down the current session and open the named provider
    ///
    /// On failure the old session stays active and the failure lands in
    /// the status line.
    pub fn switch_provider(&mut self, name: &str) {
        match BrowsingSession::open(&self.registry, name, &self.config) {
            Ok(session) => {
                self.session = session;
                self.focus = Focus::Table;
                self.status = Some(format!("provider: {}", name));
            }
            Err(e) => {
                error!(provider = name, error = %e, "provider switch failed");
                self.status = Some(e.to_string());
            }
        }
    }

    /// Switch to the next registered provider, wrapping around
    pub fn next_provider(&mut self) {
        if let Some(name) = self.registry.next_after(self.session.provider_name()) {
            if name != self.session.provider_name() {
                self.switch_provider(name);
            }
        }
    }

    /// Per-tick work: pull rows from the live stream
    pub fn tick(&mut self) {
        self.session.poll(POLL_BUDGET);
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle a keyboard event
    pub fn handle_key(&mut self, key: KeyEvent) {
        self.status = None;

        // Global shortcuts
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => {
                self.quit();
                return;
            }
            KeyCode::Char('p') if ctrl => {
                self.next_provider();
                return;
            }
            KeyCode::Esc => {
                self.focus = Focus::Table;
                return;
            }
            // '/' jumps into the toolbar, like focusing a search box
            KeyCode::Char('/') if self.focus == Focus::Table => {
                self.focus = Focus::Toolbar;
                return;
            }
            KeyCode::Char('q') if self.focus == Focus::Table => {
                self.quit();
                return;
            }
            KeyCode::Tab if self.focus == Focus::Table => {
                self.focus = Focus::Toolbar;
                return;
            }
            _ => {}
        }

        match self.focus {
            Focus::Toolbar => self.session.handle_toolbar_key(key),
            Focus::Table => {
                if let Some(outcome) = self.session.handle_table_key(key) {
                    self.status = Some(outcome);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::CONTROL)
    }

    fn app() -> App {
        App::new(ProviderRegistry::with_builtins(), Config::default(), None).unwrap()
    }

    #[test]
    fn test_new_opens_default_provider() {
        let app = app();
        assert_eq!(app.session().provider_name(), "sample");
        assert!(app.running);
    }

    #[test]
    fn test_explicit_provider_wins_over_default() {
        let config = Config {
            default_provider: Some("files".into()),
            media_dir: Some(std::env::temp_dir()),
            ..Config::default()
        };
        let app = App::new(ProviderRegistry::with_builtins(), config.clone(), Some("sample"))
            .unwrap();
        assert_eq!(app.session().provider_name(), "sample");

        let app = App::new(ProviderRegistry::with_builtins(), config, None).unwrap();
        assert_eq!(app.session().provider_name(), "files");
    }

    #[test]
    fn test_unknown_provider_is_fatal() {
        let result = App::new(ProviderRegistry::with_builtins(), Config::default(), Some("ghost"));
        assert!(result.is_err());
    }

    #[test]
    fn test_quit_keys() {
        let mut first = app();
        first.handle_key(key(KeyCode::Char('q')));
        assert!(!first.running);

        let mut second = app();
        second.handle_key(ctrl(KeyCode::Char('c')));
        assert!(!second.running);
    }

    #[test]
    fn test_q_types_into_focused_toolbar() {
        let mut app = app();
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.focus, Focus::Toolbar);

        // 'q' is not a digit; the page filter rejects it and the app keeps running
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.running);
    }

    #[test]
    fn test_esc_returns_to_table() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('/')));
        assert_eq!(app.focus, Focus::Toolbar);
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.focus, Focus::Table);
    }

    #[test]
    fn test_provider_cycling() {
        let mut app = App::new(
            ProviderRegistry::with_builtins(),
            Config {
                media_dir: Some(std::env::temp_dir()),
                ..Config::default()
            },
            None,
        )
        .unwrap();
        assert_eq!(app.session().provider_name(), "sample");

        app.handle_key(ctrl(KeyCode::Char('p')));
        assert_eq!(app.session().provider_name(), "files");

        app.handle_key(ctrl(KeyCode::Char('p')));
        assert_eq!(app.session().provider_name(), "sample");
    }

    #[test]
    fn test_switch_to_broken_provider_keeps_session() {
        let mut app = app();
        app.switch_provider("ghost");
        assert_eq!(app.session().provider_name(), "sample");
        assert!(app.status.as_deref().unwrap().contains("ghost"));
    }

    #[test]
    fn test_tick_pulls_rows() {
        let mut app = app();
        assert!(app.session().table.rows().is_empty());
        app.tick();
        assert!(!app.session().table.rows().is_empty());
    }
}
