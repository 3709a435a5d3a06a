//! JSON snapshots of config and session state on top of [`StoragePort`].

use serde::{de::DeserializeOwned, Serialize};
use dialogue_types::Result;

use crate::ports::StoragePort;

pub const CONFIG_STORAGE_KEY: &str = "dialogue:config";
pub const SESSION_STORAGE_KEY: &str = "dialogue:session";

pub async fn save_json<T: Serialize>(storage: &dyn StoragePort, key: &str, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec(value)?;
    storage.set(key, &bytes).await
}

/// `Ok(None)` when the key is absent; `Err` when the stored bytes do not parse
pub async fn load_json<T: DeserializeOwned>(storage: &dyn StoragePort, key: &str) -> Result<Option<T>> {
    match storage.get(key).await? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}
