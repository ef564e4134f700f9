//! Map view builder for fluent configuration
//!
//! `MapViewBuilder` assembles a `MapView` from a provider, a store, an
//! optional host and a configuration profile.

use crate::{
    core::{
        config::{ContainerSize, MapViewConfig, MapViewProfile, ReplacePolicy},
        view::MapView,
    },
    host::ViewHost,
    providers::MapProvider,
    store::MapStore,
    MapError, Result,
};

/// Builder for creating and configuring MapView instances
pub struct MapViewBuilder<P: MapProvider> {
    provider: P,
    store: Option<Box<dyn MapStore>>,
    host: Option<Box<dyn ViewHost>>,
    profile: MapViewProfile,
    container_size: Option<ContainerSize>,
    replace_policy: Option<ReplacePolicy>,
    log_to_store: Option<bool>,
}

impl<P: MapProvider> MapViewBuilder<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            store: None,
            host: None,
            profile: MapViewProfile::default(),
            container_size: None,
            replace_policy: None,
            log_to_store: None,
        }
    }

    /// Set the store the view seeds from and dispatches to (required)
    pub fn with_store(mut self, store: impl MapStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    pub fn with_host(mut self, host: impl ViewHost + 'static) -> Self {
        self.host = Some(Box::new(host));
        self
    }

    /// Set the base profile; individual settings below override it
    pub fn with_profile(mut self, profile: MapViewProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_config(self, config: MapViewConfig) -> Self {
        self.with_profile(MapViewProfile::Custom(config))
    }

    pub fn with_container_size(mut self, size: ContainerSize) -> Self {
        self.container_size = Some(size);
        self
    }

    pub fn with_replace_policy(mut self, policy: ReplacePolicy) -> Self {
        self.replace_policy = Some(policy);
        self
    }

    pub fn with_store_logging(mut self, enabled: bool) -> Self {
        self.log_to_store = Some(enabled);
        self
    }

    /// Build the view, validating the resolved configuration
    pub fn build(self) -> Result<MapView<P>> {
        let store = self
            .store
            .ok_or_else(|| MapError::Config("a store is required".to_string()))?;

        let mut config = self.profile.resolve();
        if let Some(size) = self.container_size {
            config.container_size = size;
        }
        if let Some(policy) = self.replace_policy {
            config.replace_policy = policy;
        }
        if let Some(enabled) = self.log_to_store {
            config.log_to_store = enabled;
        }
        config.validate()?;

        let mut view = MapView::with_config(self.provider, store, config);
        if let Some(host) = self.host {
            view.set_host(host);
        }
        Ok(view)
    }
}
