//! Polling memory monitors
//!
//! Six variants are built from one engine: a region, a single value or an
//! array, each addressed directly or through a pointer re-read every cycle.

pub mod cancel;
pub mod engine;
pub mod event;
pub mod shape;

pub use cancel::CancellationToken;
pub use engine::{
    Addressing, ArrayMonitor, Monitor, RegionMonitor, ValueMonitor, DEFAULT_POLLING_INTERVAL,
};
pub use event::{ArrayChange, MemoryChange, SubscriberRegistry, SubscriptionId};
pub use shape::{Array, ElementShape, Region, Value};
