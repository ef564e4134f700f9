pub mod marker;
pub(crate) mod registry;

pub use marker::{MarkerEntry, MarkerSpec};
