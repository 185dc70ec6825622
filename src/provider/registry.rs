//! Provider registry
//!
//! An explicit catalog of provider factories, passed into the session
//! constructor, so tests can supply fakes. Lookup of an unregistered name
//! fails loudly; construction problems surface as configuration errors
//! rather than silent defaults.

use thiserror::Error;

use crate::config::Config;
use crate::provider::Provider;

/// Errors surfaced by provider lookup and construction
///
/// Unlike provider domain errors, these are fatal to session construction
/// and propagate to the caller.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("unknown provider '{0}'")]
    Unknown(String),

    #[error("provider '{name}' configuration invalid: {reason}")]
    Config { name: String, reason: String },
}

type Factory = Box<dyn Fn(&Config) -> Result<Box<dyn Provider>, RegistryError> + Send + Sync>;

/// Catalog of named provider factories
///
/// Registration order is preserved: the first registered provider is the
/// default, and provider cycling follows this order.
pub struct ProviderRegistry {
    factories: Vec<(&'static str, Factory)>,
}

impl ProviderRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self {
            factories: Vec::new(),
        }
    }

    /// The registry with all built-in providers
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(super::sample::NAME, |config| {
            Ok(Box::new(super::sample::SampleProvider::new(config)))
        });
        registry.register(super::files::NAME, |config| {
            super::files::FilesProvider::new(config).map(|p| Box::new(p) as Box<dyn Provider>)
        });
        registry
    }

    /// Register a factory under a unique name; a repeated name replaces
    /// the earlier registration
    pub fn register(
        &mut self,
        name: &'static str,
        factory: impl Fn(&Config) -> Result<Box<dyn Provider>, RegistryError> + Send + Sync + 'static,
    ) {
        if let Some(slot) = self.factories.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = Box::new(factory);
        } else {
            self.factories.push((name, Box::new(factory)));
        }
    }

    /// Instantiate a provider by name
    pub fn get(&self, name: &str, config: &Config) -> Result<Box<dyn Provider>, RegistryError> {
        let (_, factory) = self
            .factories
            .iter()
            .find(|(n, _)| *n == name)
            .ok_or_else(|| RegistryError::Unknown(name.to_string()))?;
        factory(config)
    }

    /// Registered names in registration order
    pub fn names(&self) -> Vec<&'static str> {
        self.factories.iter().map(|(n, _)| *n).collect()
    }

    /// First registered provider, used when no preference is configured
    pub fn default_name(&self) -> Option<&'static str> {
        self.factories.first().map(|(n, _)| *n)
    }

    /// Next provider after `name` in registration order, wrapping around
    pub fn next_after(&self, name: &str) -> Option<&'static str> {
        let idx = self.factories.iter().position(|(n, _)| *n == name)?;
        let next = (idx + 1) % self.factories.len();
        self.factories.get(next).map(|(n, _)| *n)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
