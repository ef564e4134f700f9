//! Application store port
//!
//! The view never shares its state with the store. It reads the store's map
//! state once when a map loads and afterwards only pushes one-way messages.

use crossbeam_channel::{Receiver, Sender};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

use crate::core::state::MapState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }
}

/// Structured log entry forwarded to the store's log sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl LogRecord {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Messages the view dispatches to the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum StoreMessage {
    UpdateMapState(MapState),
    NewLog(LogRecord),
}

/// External store the view synchronizes with
pub trait MapStore: Send {
    /// The store's current map state, consulted when a map loads
    fn current_map_state(&self) -> MapState;

    /// Fire-and-forget push of a message
    fn dispatch(&self, message: StoreMessage);
}

/// Store that forwards every message over a channel
///
/// The seed state is shared with whoever owns the receiving end, which may
/// replace it between loads through [`ChannelStore::set_map_state`].
#[derive(Clone)]
pub struct ChannelStore {
    map_state: Arc<Mutex<MapState>>,
    tx: Sender<StoreMessage>,
}

impl ChannelStore {
    /// Creates a store over an unbounded channel and returns its receiver
    pub fn new(initial: MapState) -> (Self, Receiver<StoreMessage>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self::with_sender(initial, tx), rx)
    }

    pub fn with_sender(initial: MapState, tx: Sender<StoreMessage>) -> Self {
        Self {
            map_state: Arc::new(Mutex::new(initial)),
            tx,
        }
    }

    pub fn set_map_state(&self, state: MapState) {
        if let Ok(mut current) = self.map_state.lock() {
            *current = state;
        }
    }
}

impl MapStore for ChannelStore {
    fn current_map_state(&self) -> MapState {
        self.map_state
            .lock()
            .map(|state| state.clone())
            .unwrap_or_default()
    }

    fn dispatch(&self, message: StoreMessage) {
        if self.tx.send(message).is_err() {
            log::warn!("store receiver dropped; message discarded");
        }
    }
}
