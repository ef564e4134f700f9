//! Marker click events
//!
//! Clicks travel from the provider to subscribers through a hot emitter owned
//! by the view. A provider receives a [`MarkerClickSink`] when its map loads;
//! application code holds [`MarkerClickStream`]s. Events are never buffered
//! for subscribers that attach later, and every stream ends when the view is
//! removed.

use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::task::{Context, Poll};

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::{Stream, StreamExt};

#[derive(Default)]
struct Subscribers {
    senders: Vec<UnboundedSender<String>>,
    open: bool,
}

// Subscribers is plain data, so a panic while it was held leaves it usable
fn lock(shared: &Mutex<Subscribers>) -> MutexGuard<'_, Subscribers> {
    shared.lock().unwrap_or_else(|e| e.into_inner())
}

/// Handle a provider uses to report marker clicks by reference name
#[derive(Clone)]
pub struct MarkerClickSink {
    shared: Arc<Mutex<Subscribers>>,
}

impl MarkerClickSink {
    /// Publishes a click to every live subscriber.
    ///
    /// Returns how many subscribers received it. Clicks reported after the
    /// view was removed are dropped.
    pub fn emit(&self, name: &str) -> usize {
        let mut subscribers = lock(&self.shared);
        if !subscribers.open {
            log::trace!("dropping click on '{}': view not live", name);
            return 0;
        }
        subscribers
            .senders
            .retain(|tx| tx.unbounded_send(name.to_string()).is_ok());
        subscribers.senders.len()
    }

    pub fn is_open(&self) -> bool {
        lock(&self.shared).open
    }
}

impl std::fmt::Debug for MarkerClickSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkerClickSink")
            .field("open", &self.is_open())
            .finish()
    }
}

/// Stream of clicked marker reference names
pub struct MarkerClickStream {
    rx: UnboundedReceiver<String>,
}

impl Stream for MarkerClickStream {
    type Item = String;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_next_unpin(cx)
    }
}

impl MarkerClickStream {
    /// Takes the next click if one is already queued, without waiting
    pub fn try_next_click(&mut self) -> Option<String> {
        self.rx.try_recv().ok()
    }
}

/// View-owned side of the click channel
pub(crate) struct ClickEmitter {
    shared: Arc<Mutex<Subscribers>>,
}

impl ClickEmitter {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Mutex::new(Subscribers::default())),
        }
    }

    pub fn subscribe(&self) -> MarkerClickStream {
        let (tx, rx) = mpsc::unbounded();
        lock(&self.shared).senders.push(tx);
        MarkerClickStream { rx }
    }

    /// Starts accepting clicks and hands out the provider's sink
    pub fn open(&self) -> MarkerClickSink {
        lock(&self.shared).open = true;
        MarkerClickSink {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Ends every current stream and detaches previously issued sinks.
    pub fn close(&mut self) {
        {
            let mut subscribers = lock(&self.shared);
            subscribers.open = false;
            subscribers.senders.clear();
        }
        self.shared = Arc::new(Mutex::new(Subscribers::default()));
    }
}
