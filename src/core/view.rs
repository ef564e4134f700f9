use crate::{
    core::{
        config::{MapViewConfig, ReplacePolicy},
        geo::LatLng,
        state::MapState,
    },
    events::{ClickEmitter, MarkerClickStream},
    host::{Container, ViewHost},
    markers::{registry::MarkerRegistry, MarkerEntry, MarkerSpec},
    providers::MapProvider,
    store::{LogLevel, LogRecord, MapStore, StoreMessage},
    MapError, Result,
};

/// Coordinates a map backend with the application store.
///
/// The view is the single source of truth for whether the map is ready and
/// which markers are displayed. Every mutation reaches the provider before
/// the resulting state is dispatched to the store, so observers never see a
/// state update ahead of the change that caused it.
pub struct MapView<P: MapProvider> {
    provider: P,
    store: Box<dyn MapStore>,
    host: Option<Box<dyn ViewHost>>,
    config: MapViewConfig,
    map: Option<P::Map>,
    container_id: Option<String>,
    state: MapState,
    markers: MarkerRegistry<P::MarkerHandle>,
    clicks: ClickEmitter,
}

impl<P: MapProvider> MapView<P> {
    pub fn new(provider: P, store: Box<dyn MapStore>) -> Self {
        Self::with_config(provider, store, MapViewConfig::default())
    }

    pub fn with_config(provider: P, store: Box<dyn MapStore>, config: MapViewConfig) -> Self {
        Self {
            provider,
            store,
            host: None,
            config,
            map: None,
            container_id: None,
            state: MapState::default(),
            markers: MarkerRegistry::new(),
            clicks: ClickEmitter::new(),
        }
    }

    /// Attaches the host the view is placed in
    pub fn set_host(&mut self, host: Box<dyn ViewHost>) {
        self.host = Some(host);
    }

    /// True while a provider map exists: after `load_map` succeeds and until `remove_map`
    pub fn is_initialized(&self) -> bool {
        self.map.is_some()
    }

    pub fn state(&self) -> &MapState {
        &self.state
    }

    pub fn config(&self) -> &MapViewConfig {
        &self.config
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Container the current map was loaded into
    pub fn container_id(&self) -> Option<&str> {
        self.container_id.as_deref()
    }

    pub fn has_marker(&self, name: &str) -> bool {
        self.markers.contains(name)
    }

    /// Reference names of the displayed markers, in no particular order
    pub fn marker_names(&self) -> Vec<String> {
        self.markers.names()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Subscribes to marker clicks.
    ///
    /// Only clicks reported after subscribing are delivered. The stream ends
    /// when the map is removed.
    pub fn marker_clicked(&self) -> MarkerClickStream {
        self.clicks.subscribe()
    }

    /// Loads the provider map into `container_id`.
    ///
    /// The view's state is seeded from the store first. On failure the
    /// provider's error is returned unchanged and the view is left as it was.
    pub async fn load_map(&mut self, container_id: &str) -> Result<()> {
        if self.is_initialized() {
            return Err(MapError::AlreadyInitialized.into());
        }

        let size = self.config.container_size;
        let container = match self.host.as_mut() {
            Some(host) => host
                .container(container_id, size)
                .ok_or_else(|| MapError::ContainerNotFound(container_id.to_string()))?,
            None => Container::new(container_id, size),
        };

        let seed = self.store.current_map_state();
        match self.provider.load(&container, &seed).await {
            Ok(mut map) => {
                let sink = self.clicks.open();
                self.provider.on_marker_click(&mut map, sink);
                self.map = Some(map);
                self.state = seed;
                self.container_id = Some(container.id);

                let message = format!("Created map obj {}", self.provider.name());
                self.emit_log(LogRecord::new(LogLevel::Debug, message));
                Ok(())
            }
            Err(err) => {
                let message = format!("Error creating map obj {}", self.provider.name());
                self.emit_log(
                    LogRecord::new(LogLevel::Error, message)
                        .with_data(serde_json::Value::String(err.to_string())),
                );
                Err(err)
            }
        }
    }

    /// Recenters the map. Out-of-range or NaN coordinates are rejected
    /// before the provider or the store sees them.
    pub fn set_center_coordinates(&mut self, position: LatLng) -> Result<()> {
        let map = self.map.as_mut().ok_or(MapError::NotInitialized)?;
        if !position.is_valid() {
            return Err(MapError::InvalidCoordinates {
                lat: position.lat,
                lng: position.lng,
            }
            .into());
        }
        self.state.center = position;
        self.provider.set_center(map, position);
        self.refresh();
        Ok(())
    }

    pub fn set_zoom(&mut self, zoom: f64) -> Result<()> {
        let map = self.map.as_mut().ok_or(MapError::NotInitialized)?;
        self.state.zoom = zoom;
        self.provider.set_zoom(map, zoom);
        self.refresh();
        Ok(())
    }

    /// Adds one marker and publishes the new state
    pub fn add_marker(&mut self, name: &str, spec: &MarkerSpec) -> Result<()> {
        self.place_marker(name, spec)?;
        self.refresh();
        Ok(())
    }

    /// Adds one marker of a batch; state is published only for the last one
    pub fn stream_add_marker(&mut self, name: &str, spec: &MarkerSpec, is_last: bool) -> Result<()> {
        self.place_marker(name, spec)?;
        if is_last {
            log::debug!("marker batch committed ({} markers)", self.markers.len());
            self.refresh();
        }
        Ok(())
    }

    /// Adds every entry in order, publishing state once at the end.
    ///
    /// An empty batch still publishes once.
    pub fn add_markers<I>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = MarkerEntry>,
    {
        self.ensure_initialized()?;
        for entry in entries {
            self.place_marker(&entry.name, &entry.spec)?;
        }
        self.refresh();
        Ok(())
    }

    /// Removes the named marker. Unknown names are ignored.
    pub fn remove_marker(&mut self, name: &str) -> Result<()> {
        if self.destroy_marker(name)? {
            self.refresh();
        }
        Ok(())
    }

    /// Removes every marker, publishing state once
    pub fn remove_all_markers(&mut self) -> Result<()> {
        let map = self.map.as_mut().ok_or(MapError::NotInitialized)?;
        for (name, handle) in self.markers.drain() {
            log::trace!("removing marker '{}'", name);
            self.provider.remove_marker(map, handle);
        }
        self.refresh();
        Ok(())
    }

    /// Removes all markers, tears down the provider map and detaches from the host
    pub fn remove_map(&mut self) -> Result<()> {
        self.remove_all_markers()?;
        if let Some(map) = self.map.take() {
            self.provider.remove_map(map);
        }
        self.clicks.close();

        if let Some(id) = self.container_id.take() {
            if let Some(host) = self.host.as_mut() {
                host.detach(&id);
            }
            log::debug!("map view '{}' removed", id);
        }
        Ok(())
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(MapError::NotInitialized.into())
        }
    }

    /// Creates the provider marker and registers its handle, without publishing
    fn place_marker(&mut self, name: &str, spec: &MarkerSpec) -> Result<()> {
        let map = self.map.as_mut().ok_or(MapError::NotInitialized)?;

        if self.config.replace_policy == ReplacePolicy::DestroyThenReplace {
            if let Some(previous) = self.markers.take(name) {
                log::trace!("replacing marker '{}'", name);
                self.provider.remove_marker(map, previous);
            }
        }

        let handle = self.provider.add_marker(map, name, spec);
        if self.markers.insert(name, handle).is_some() {
            log::warn!("marker '{}' overwritten without removal", name);
        }
        log::trace!("added marker '{}' at ({}, {})", name, spec.position.lat, spec.position.lng);
        Ok(())
    }

    /// Removes a registered marker. Returns whether anything was removed.
    fn destroy_marker(&mut self, name: &str) -> Result<bool> {
        let map = self.map.as_mut().ok_or(MapError::NotInitialized)?;
        match self.markers.take(name) {
            Some(handle) => {
                self.provider.remove_marker(map, handle);
                log::trace!("removed marker '{}'", name);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Lets the provider fold its displayed state in, then pushes a copy to the store
    fn refresh(&mut self) {
        if let Some(map) = self.map.as_ref() {
            self.provider.refresh_state(map, &mut self.state);
        }
        self.store
            .dispatch(StoreMessage::UpdateMapState(self.state.clone()));
    }

    /// Logs locally and, unless disabled, forwards the record to the store
    fn emit_log(&self, record: LogRecord) {
        let level = log::Level::from(record.level);
        match &record.data {
            Some(data) => log::log!(level, "{}: {}", record.message, data),
            None => log::log!(level, "{}", record.message),
        }
        if self.config.log_to_store {
            self.store.dispatch(StoreMessage::NewLog(record));
        }
    }
}

impl<P: MapProvider> Drop for MapView<P> {
    fn drop(&mut self) {
        if self.is_initialized() {
            if let Err(e) = self.remove_map() {
                log::warn!("failed to remove map on drop: {}", e);
            }
        }
    }
}

#[cfg(all(test, feature = "headless"))]
mod tests {
    use super::*;
    use crate::{
        providers::headless::{HeadlessError, HeadlessProvider},
        store::ChannelStore,
    };

    fn spec(title: &str, lat: f64, lng: f64) -> MarkerSpec {
        MarkerSpec::new(title, LatLng::new(lat, lng))
    }

    #[test]
    fn test_operations_require_load() {
        let (store, rx) = ChannelStore::new(MapState::default());
        let mut view = MapView::new(HeadlessProvider::new(), Box::new(store));

        assert!(!view.is_initialized());
        for err in [
            view.set_zoom(3.0).unwrap_err(),
            view.add_marker("a", &spec("A", 0.0, 0.0)).unwrap_err(),
            view.add_markers(Vec::new()).unwrap_err(),
            view.remove_marker("a").unwrap_err(),
            view.remove_map().unwrap_err(),
        ] {
            assert!(matches!(
                err.downcast_ref::<MapError>(),
                Some(MapError::NotInitialized)
            ));
        }
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_load_seeds_state_from_store() {
        let seed = MapState::new(LatLng::new(48.85, 2.35), 12.0);
        let (store, rx) = ChannelStore::new(seed.clone());
        let provider = HeadlessProvider::new();
        let surface = provider.surface();
        let mut view = MapView::new(provider, Box::new(store));

        view.load_map("map").await.unwrap();
        assert!(view.is_initialized());
        assert_eq!(view.state(), &seed);
        assert_eq!(view.container_id(), Some("map"));
        assert_eq!(surface.center(), seed.center);

        match rx.try_recv().unwrap() {
            StoreMessage::NewLog(record) => {
                assert_eq!(record.level, LogLevel::Debug);
                assert_eq!(record.message, "Created map obj headless");
            }
            other => panic!("unexpected message {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_second_load_is_rejected() {
        let (store, _rx) = ChannelStore::new(MapState::default());
        let mut view = MapView::new(HeadlessProvider::new(), Box::new(store));
        view.load_map("map").await.unwrap();

        let err = view.load_map("map").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MapError>(),
            Some(MapError::AlreadyInitialized)
        ));
    }

    #[tokio::test]
    async fn test_failed_load_leaves_view_untouched() {
        let (store, rx) = ChannelStore::new(MapState::new(LatLng::new(5.0, 5.0), 9.0));
        let mut view = MapView::new(HeadlessProvider::unavailable("no tiles"), Box::new(store));

        let err = view.load_map("map").await.unwrap_err();
        assert!(err.downcast_ref::<HeadlessError>().is_some());
        assert!(!view.is_initialized());
        assert_eq!(view.state(), &MapState::default());
        assert_eq!(view.container_id(), None);

        let logs: Vec<_> = rx.try_iter().collect();
        assert_eq!(logs.len(), 1);
        assert!(matches!(
            &logs[0],
            StoreMessage::NewLog(LogRecord { level: LogLevel::Error, .. })
        ));
    }

    #[tokio::test]
    async fn test_quiet_config_keeps_logs_out_of_store() {
        let (store, rx) = ChannelStore::new(MapState::default());
        let config = crate::core::config::MapViewProfile::Quiet.resolve();
        let mut view = MapView::with_config(HeadlessProvider::new(), Box::new(store), config);

        view.load_map("map").await.unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_replace_destroys_previous_marker() {
        let (store, _rx) = ChannelStore::new(MapState::default());
        let provider = HeadlessProvider::new();
        let surface = provider.surface();
        let mut view = MapView::new(provider, Box::new(store));
        view.load_map("map").await.unwrap();

        view.add_marker("a", &spec("First", 1.0, 1.0)).unwrap();
        view.add_marker("a", &spec("Second", 2.0, 2.0)).unwrap();

        assert_eq!(view.marker_count(), 1);
        let markers = surface.markers();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].title, "Second");
    }

    #[tokio::test]
    async fn test_overwrite_policy_leaves_previous_marker_rendered() {
        let (store, _rx) = ChannelStore::new(MapState::default());
        let provider = HeadlessProvider::new();
        let surface = provider.surface();
        let config = MapViewConfig {
            replace_policy: ReplacePolicy::Overwrite,
            ..MapViewConfig::default()
        };
        let mut view = MapView::with_config(provider, Box::new(store), config);
        view.load_map("map").await.unwrap();

        view.add_marker("a", &spec("First", 1.0, 1.0)).unwrap();
        view.add_marker("a", &spec("Second", 2.0, 2.0)).unwrap();

        assert_eq!(view.marker_count(), 1);
        assert_eq!(surface.marker_count(), 2);
    }

    #[tokio::test]
    async fn test_drop_tears_down_map() {
        let (store, _rx) = ChannelStore::new(MapState::default());
        let provider = HeadlessProvider::new();
        let surface = provider.surface();
        {
            let mut view = MapView::new(provider, Box::new(store));
            view.load_map("map").await.unwrap();
            view.add_marker("a", &spec("A", 1.0, 1.0)).unwrap();
        }
        assert_eq!(surface.teardown_count(), 1);
        assert_eq!(surface.marker_count(), 0);
        assert!(!surface.is_loaded());
    }
}
