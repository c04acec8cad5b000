//! Event system: observer trait, dispatcher, and a channel adapter.

pub mod dispatcher;
pub mod handler;
pub mod types;

pub use dispatcher::EventDispatcher;
pub use handler::{ChannelHandler, ClientEventHandler};
pub use types::{ClientEvent, PollingStopReason};
