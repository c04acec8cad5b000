//! Client configuration: `#[serde(default)]` sub-configs, one defaults module,
//! TOML loading with environment overrides.

mod client_config;
mod contacts_config;
pub mod defaults;
mod device_config;
mod session_config;
mod transport_config;

pub use client_config::ClientConfig;
pub use contacts_config::ContactsConfig;
pub use device_config::{ClientContextConfig, DeviceConfig, PollFailurePolicy};
pub use session_config::{EndpointConfig, SessionConfig};
pub use transport_config::TransportConfig;
