//! Session layer: authentication, liveness, and the keep-alive loop.

mod manager;
mod observer;
mod state;
pub mod urls;

pub use manager::SessionManager;
pub use observer::SessionObserver;
pub use state::{AccountSummary, Session};
pub use urls::ServiceUrls;
