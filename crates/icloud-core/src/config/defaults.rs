// Single source of truth for all default values.

// --- Endpoints ---
pub const DEFAULT_LOGIN_URL: &str = "https://setup.icloud.com/setup/ws/1/login";
pub const DEFAULT_HOME_URL: &str = "https://www.icloud.com";
pub const DEFAULT_FIND_REFERER_URL: &str = "https://www.icloud.com/applications/find/current/en-us/";

// --- Session ---
pub const DEFAULT_KEEP_ALIVE_INTERVAL_MS: u64 = 120_000; // 2 minutes

// --- Devices ---
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 10_000;
pub const DEFAULT_POLL_ON_CONNECT: bool = true;
pub const DEFAULT_API_VERSION: &str = "3.0";
pub const DEFAULT_APP_NAME: &str = "iCloud Find (Web)";
pub const DEFAULT_APP_VERSION: &str = "2.0";
pub const DEFAULT_INACTIVE_TIME: u64 = 0;
pub const DEFAULT_TIMEZONE: &str = "Canada/Eastern";
pub const DEFAULT_WEB_STATS: &str = "0:16";

// --- Poll retry policy ---
pub const DEFAULT_RETRY_INITIAL_BACKOFF_MS: u64 = 500;
pub const DEFAULT_RETRY_MAX_BACKOFF_MS: u64 = 30_000;
pub const DEFAULT_RETRY_MAX_ATTEMPTS: u32 = 5;

// --- Contacts ---
pub const DEFAULT_LOCALE: &str = "en_US";
pub const DEFAULT_FETCH_ON_CONNECT: bool = true;

// --- Transport ---
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!("icloud-client/", env!("CARGO_PKG_VERSION"));

// --- Logging ---
pub const DEFAULT_LOG_FILTER: &str = "icloud_core=info,icloud_client=info";
