//! In-memory map backend
//!
//! Renders nothing. Markers, center and zoom are kept in a scene shared with
//! [`HeadlessSurface`], which lets callers inspect what the map shows and
//! simulate marker clicks. Useful for server-side processing, CLI tools and
//! tests.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::{
    core::{
        geo::{LatLng, LatLngBounds},
        state::MapState,
    },
    events::MarkerClickSink,
    host::Container,
    markers::MarkerSpec,
    prelude::HashMap,
    providers::MapProvider,
    Result,
};

#[derive(Debug, thiserror::Error)]
pub enum HeadlessError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("cannot load map at invalid center ({lat}, {lng})")]
    InvalidCenter { lat: f64, lng: f64 },
}

/// Marker as the headless backend displays it
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMarker {
    pub name: String,
    pub title: String,
    pub position: LatLng,
    pub color: String,
}

#[derive(Default)]
struct Scene {
    container: Option<String>,
    center: LatLng,
    zoom: f64,
    markers: HashMap<u64, RenderedMarker>,
    click_sink: Option<MarkerClickSink>,
    loads: usize,
    teardowns: usize,
}

/// Map object handed to the view on load
#[derive(Debug)]
pub struct HeadlessMap {
    container_id: String,
}

impl HeadlessMap {
    pub fn container_id(&self) -> &str {
        &self.container_id
    }
}

/// Handle of a headless marker
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct HeadlessMarker(u64);

pub struct HeadlessProvider {
    scene: Arc<Mutex<Scene>>,
    next_marker_id: u64,
    fail_load: Option<String>,
}

impl HeadlessProvider {
    pub fn new() -> Self {
        Self {
            scene: Arc::new(Mutex::new(Scene::default())),
            next_marker_id: 0,
            fail_load: None,
        }
    }

    /// A backend whose every load fails with [`HeadlessError::Unavailable`]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            fail_load: Some(reason.into()),
            ..Self::new()
        }
    }

    /// Read/click access to the scene, valid for the provider's lifetime
    pub fn surface(&self) -> HeadlessSurface {
        HeadlessSurface {
            scene: Arc::clone(&self.scene),
        }
    }

    fn scene(&self) -> MutexGuard<'_, Scene> {
        // The scene holds plain data; a poisoned lock still has a usable value.
        self.scene.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for HeadlessProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MapProvider for HeadlessProvider {
    type Map = HeadlessMap;
    type MarkerHandle = HeadlessMarker;

    fn name(&self) -> &str {
        "headless"
    }

    async fn load(&mut self, container: &Container, state: &MapState) -> Result<HeadlessMap> {
        if let Some(reason) = &self.fail_load {
            return Err(HeadlessError::Unavailable(reason.clone()).into());
        }
        if !state.center.is_valid() {
            return Err(HeadlessError::InvalidCenter {
                lat: state.center.lat,
                lng: state.center.lng,
            }
            .into());
        }

        let mut scene = self.scene();
        scene.container = Some(container.id.clone());
        scene.center = state.center;
        scene.zoom = state.zoom;
        scene.markers.clear();
        scene.loads += 1;
        log::debug!("headless map loaded into '{}'", container.id);

        Ok(HeadlessMap {
            container_id: container.id.clone(),
        })
    }

    fn on_marker_click(&mut self, _map: &mut HeadlessMap, sink: MarkerClickSink) {
        self.scene().click_sink = Some(sink);
    }

    fn add_marker(&mut self, _map: &mut HeadlessMap, name: &str, spec: &MarkerSpec) -> HeadlessMarker {
        let id = self.next_marker_id;
        self.next_marker_id += 1;
        self.scene().markers.insert(
            id,
            RenderedMarker {
                name: name.to_string(),
                title: spec.title.clone(),
                position: spec.position,
                color: spec.color_or_default().to_string(),
            },
        );
        HeadlessMarker(id)
    }

    fn remove_marker(&mut self, _map: &mut HeadlessMap, handle: HeadlessMarker) {
        self.scene().markers.remove(&handle.0);
    }

    fn set_center(&mut self, _map: &mut HeadlessMap, position: LatLng) {
        self.scene().center = position;
    }

    fn set_zoom(&mut self, _map: &mut HeadlessMap, zoom: f64) {
        self.scene().zoom = zoom;
    }

    fn remove_map(&mut self, map: HeadlessMap) {
        let mut scene = self.scene();
        scene.markers.clear();
        scene.click_sink = None;
        scene.container = None;
        scene.teardowns += 1;
        log::debug!("headless map in '{}' removed", map.container_id);
    }

    fn refresh_state(&mut self, _map: &HeadlessMap, state: &mut MapState) {
        let scene = self.scene();
        state.bounds = LatLngBounds::from_points(scene.markers.values().map(|m| &m.position));
    }
}

/// Shared view of a headless scene
#[derive(Clone)]
pub struct HeadlessSurface {
    scene: Arc<Mutex<Scene>>,
}

impl HeadlessSurface {
    fn scene(&self) -> MutexGuard<'_, Scene> {
        self.scene.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Simulates a user clicking the marker rendered under `name`.
    ///
    /// Returns `false` if no such marker is displayed or no listener is attached.
    pub fn click(&self, name: &str) -> bool {
        let sink = {
            let scene = self.scene();
            if !scene.markers.values().any(|m| m.name == name) {
                return false;
            }
            match &scene.click_sink {
                Some(sink) => sink.clone(),
                None => return false,
            }
        };
        sink.emit(name);
        true
    }

    pub fn is_loaded(&self) -> bool {
        self.scene().container.is_some()
    }

    pub fn container_id(&self) -> Option<String> {
        self.scene().container.clone()
    }

    pub fn center(&self) -> LatLng {
        self.scene().center
    }

    pub fn zoom(&self) -> f64 {
        self.scene().zoom
    }

    /// Displayed markers, sorted by name
    pub fn markers(&self) -> Vec<RenderedMarker> {
        let mut markers: Vec<_> = self.scene().markers.values().cloned().collect();
        markers.sort_by(|a, b| a.name.cmp(&b.name));
        markers
    }

    pub fn marker_count(&self) -> usize {
        self.scene().markers.len()
    }

    pub fn load_count(&self) -> usize {
        self.scene().loads
    }

    pub fn teardown_count(&self) -> usize {
        self.scene().teardowns
    }
}
