//! Recording collaborators shared by the integration tests.
//!
//! Provider, store and host append to one journal so tests can assert the
//! relative order of provider calls and store dispatches.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mapview::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Load(String),
    ListenClicks,
    AddMarker(String),
    RemoveMarker(String),
    SetCenter(LatLng),
    SetZoom(f64),
    Refresh,
    RemoveMap,
    Dispatch(StoreMessage),
    Detach(String),
}

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
#[error("tile server rejected key: {0}")]
pub struct LoadRejected(pub String);

#[derive(Default)]
struct Shared {
    calls: Vec<Call>,
    live: Vec<(u64, String)>,
    sink: Option<MarkerClickSink>,
}

/// Journal and remote control over the recording collaborators
#[derive(Clone, Default)]
pub struct Journal {
    shared: Arc<Mutex<Shared>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, call: Call) {
        self.shared.lock().unwrap().calls.push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.shared.lock().unwrap().calls.clone()
    }

    pub fn clear(&self) {
        self.shared.lock().unwrap().calls.clear();
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    pub fn dispatched_states(&self) -> Vec<MapState> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Dispatch(StoreMessage::UpdateMapState(state)) => Some(state),
                _ => None,
            })
            .collect()
    }

    pub fn logs(&self) -> Vec<LogRecord> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Dispatch(StoreMessage::NewLog(record)) => Some(record),
                _ => None,
            })
            .collect()
    }

    /// Names of markers the provider currently renders, sorted
    pub fn live_markers(&self) -> Vec<String> {
        let mut names: Vec<_> = self
            .shared
            .lock()
            .unwrap()
            .live
            .iter()
            .map(|(_, name)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Simulates the backend reporting a click on the marker it rendered for `name`
    pub fn click(&self, name: &str) -> bool {
        let sink = {
            let shared = self.shared.lock().unwrap();
            if !shared.live.iter().any(|(_, n)| n == name) {
                return false;
            }
            match &shared.sink {
                Some(sink) => sink.clone(),
                None => return false,
            }
        };
        sink.emit(name);
        true
    }
}

pub struct RecordedMap;

#[derive(Debug)]
pub struct RecordedHandle {
    id: u64,
    name: String,
}

pub struct RecordingProvider {
    journal: Journal,
    next_id: u64,
    reject_with: Option<LoadRejected>,
}

impl RecordingProvider {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            next_id: 0,
            reject_with: None,
        }
    }

    pub fn rejecting(journal: &Journal, error: LoadRejected) -> Self {
        Self {
            reject_with: Some(error),
            ..Self::new(journal)
        }
    }
}

#[async_trait]
impl MapProvider for RecordingProvider {
    type Map = RecordedMap;
    type MarkerHandle = RecordedHandle;

    fn name(&self) -> &str {
        "recording"
    }

    async fn load(&mut self, container: &Container, _state: &MapState) -> Result<RecordedMap> {
        self.journal.record(Call::Load(container.id.clone()));
        tokio::task::yield_now().await;
        match &self.reject_with {
            Some(err) => Err(err.clone().into()),
            None => Ok(RecordedMap),
        }
    }

    fn on_marker_click(&mut self, _map: &mut RecordedMap, sink: MarkerClickSink) {
        self.journal.record(Call::ListenClicks);
        self.journal.shared.lock().unwrap().sink = Some(sink);
    }

    fn add_marker(&mut self, _map: &mut RecordedMap, name: &str, _spec: &MarkerSpec) -> RecordedHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.journal.record(Call::AddMarker(name.to_string()));
        self.journal
            .shared
            .lock()
            .unwrap()
            .live
            .push((id, name.to_string()));
        RecordedHandle {
            id,
            name: name.to_string(),
        }
    }

    fn remove_marker(&mut self, _map: &mut RecordedMap, handle: RecordedHandle) {
        self.journal.record(Call::RemoveMarker(handle.name.clone()));
        let mut shared = self.journal.shared.lock().unwrap();
        let before = shared.live.len();
        shared.live.retain(|(id, _)| *id != handle.id);
        assert_eq!(before, shared.live.len() + 1, "handle {:?} removed twice", handle);
    }

    fn set_center(&mut self, _map: &mut RecordedMap, position: LatLng) {
        self.journal.record(Call::SetCenter(position));
    }

    fn set_zoom(&mut self, _map: &mut RecordedMap, zoom: f64) {
        self.journal.record(Call::SetZoom(zoom));
    }

    fn remove_map(&mut self, _map: RecordedMap) {
        self.journal.record(Call::RemoveMap);
        self.journal.shared.lock().unwrap().sink = None;
    }

    fn refresh_state(&mut self, _map: &RecordedMap, _state: &mut MapState) {
        self.journal.record(Call::Refresh);
    }
}

pub struct RecordingStore {
    journal: Journal,
    seed: MapState,
}

impl RecordingStore {
    pub fn new(journal: &Journal, seed: MapState) -> Self {
        Self {
            journal: journal.clone(),
            seed,
        }
    }
}

impl MapStore for RecordingStore {
    fn current_map_state(&self) -> MapState {
        self.seed.clone()
    }

    fn dispatch(&self, message: StoreMessage) {
        self.journal.record(Call::Dispatch(message));
    }
}

pub struct RecordingHost {
    journal: Journal,
    containers: Vec<String>,
}

impl RecordingHost {
    pub fn new(journal: &Journal, containers: &[&str]) -> Self {
        Self {
            journal: journal.clone(),
            containers: containers.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl ViewHost for RecordingHost {
    fn container(&mut self, id: &str, size: ContainerSize) -> Option<Container> {
        self.containers
            .iter()
            .any(|c| c == id)
            .then(|| Container::new(id, size))
    }

    fn detach(&mut self, id: &str) {
        self.journal.record(Call::Detach(id.to_string()));
    }
}

pub fn spec(title: &str, lat: f64, lng: f64) -> MarkerSpec {
    MarkerSpec::new(title, LatLng::new(lat, lng))
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A loaded view over the recording collaborators, with the load traffic cleared
pub async fn loaded_view(journal: &Journal) -> MapView<RecordingProvider> {
    init_logging();
    let mut view = MapViewBuilder::new(RecordingProvider::new(journal))
        .with_store(RecordingStore::new(journal, MapState::default()))
        .build()
        .unwrap();
    view.load_map("map").await.unwrap();
    journal.clear();
    view
}
