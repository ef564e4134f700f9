//! Host surface port
//!
//! Layout is the host's business. The view only asks for the container it
//! renders into and tells the host when it goes away.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::config::ContainerSize;

static NEXT_CONTAINER_ID: AtomicU64 = AtomicU64::new(1);

/// Generates a process-unique container id
pub fn unique_container_id() -> String {
    let n = NEXT_CONTAINER_ID.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}", crate::constants::CONTAINER_ID_PREFIX, n)
}

/// Rectangular surface a provider renders into
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    pub id: String,
    pub size: ContainerSize,
}

impl Container {
    pub fn new(id: impl Into<String>, size: ContainerSize) -> Self {
        Self {
            id: id.into(),
            size,
        }
    }
}

/// UI host owning the containers a view is placed in
pub trait ViewHost: Send {
    /// Looks up the container `id`, sized as requested. `None` if it does not exist.
    fn container(&mut self, id: &str, size: ContainerSize) -> Option<Container>;

    /// Removes the view rendered into `id` from the host
    fn detach(&mut self, id: &str);
}
