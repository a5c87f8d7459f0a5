//! High-level services that tie the core components together.

pub mod tracking;

pub use tracking::{TrackingError, TrackingRunner, TrackingSummary};
