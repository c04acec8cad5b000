//! Protocol constants dictated by the service.

/// `dsInfo.statusCode` value of an active, usable account.
pub const ACTIVE_ACCOUNT_STATUS: i64 = 2;

/// `statusCode` returned by the Find My endpoints on success.
pub const FIND_MY_STATUS_OK: &str = "200";

/// Value written into the server context's `server_ctx` field before it is echoed back.
pub const SERVER_CONTEXT_ID: &str = "server_ctx";

// Find My paths, relative to the `findme` service URL.
pub const FIND_MY_INIT_PATH: &str = "/fmipservice/client/web/initClient";
pub const FIND_MY_REFRESH_PATH: &str = "/fmipservice/client/web/refreshClient";
pub const FIND_MY_PLAY_SOUND_PATH: &str = "/fmipservice/client/web/playSound";

// Contacts paths, relative to the `contacts` service URL.
pub const CONTACTS_ME_CARD_PATH: &str = "/co/mecard/";
pub const CONTACTS_STARTUP_PATH: &str = "/co/startup";
pub const CONTACTS_CHANGESET_PATH: &str = "/co/changeset";
pub const CONTACTS_CARD_PATH: &str = "/co/contacts/card/";

/// Session refresh path, relative to the `push` service URL.
pub const REFRESH_WEB_AUTH_PATH: &str = "/refreshWebAuth";

pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";
pub const CONTENT_TYPE_PLAIN: &str = "text/plain";
