//! JSON codec. Field remapping and omission rules live on the model types;
//! this module only maps serde failures into [`ClientError`]s that name the
//! endpoint involved.

use icloud_core::errors::{ClientError, ClientResult};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub fn encode<T: Serialize + ?Sized>(endpoint: &str, value: &T) -> ClientResult<String> {
    serde_json::to_string(value).map_err(|e| ClientError::Encode {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })
}

pub fn decode<T: DeserializeOwned>(endpoint: &str, body: &str) -> ClientResult<T> {
    serde_json::from_str(body).map_err(|e| ClientError::Decode {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })
}
