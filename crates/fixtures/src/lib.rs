//! Recorded iCloud wire payloads for tests.
//!
//! Paths are relative to `test-fixtures/` at the workspace root, e.g.
//! `wire/login_active.json`. The loaders panic on a missing or malformed
//! payload, which fails the calling test with the offending path.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

const FIXTURE_DIR: &str = "test-fixtures";

fn payload_path(relative_path: &str) -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let root = manifest_dir
        .ancestors()
        .map(|dir| dir.join(FIXTURE_DIR))
        .find(|candidate| candidate.is_dir())
        .unwrap_or_else(|| panic!("no {FIXTURE_DIR}/ above {}", manifest_dir.display()));
    root.join(relative_path)
}

/// Raw payload text, byte for byte what the server would send.
pub fn load_fixture_text(relative_path: &str) -> String {
    let path = payload_path(relative_path);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("reading payload {}: {e}", path.display()))
}

/// Payload decoded into `T`.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    serde_json::from_str(&load_fixture_text(relative_path))
        .unwrap_or_else(|e| panic!("decoding payload {relative_path}: {e}"))
}
