//! Find My device tracking: the init/refresh protocol, periodic polling, and alerts.

mod poll_loop;
mod tracker;

pub use tracker::{DeviceTracker, TrackerPhase};
