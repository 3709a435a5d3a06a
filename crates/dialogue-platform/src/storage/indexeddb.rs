//! IndexedDB storage backend.
//! Keeps the config and the last session across page reloads.
//! Uses web-sys bindings with wasm-bindgen-futures for async operations.

use async_trait::async_trait;
use js_sys::{Array, Promise, Uint8Array};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{IdbDatabase, IdbObjectStore, IdbRequest, IdbTransactionMode};

use dialogue_core::ports::StoragePort;
use dialogue_types::{DialogueError, Result};

const DB_NAME: &str = "persona_dialogue";
const STORE_NAME: &str = "kv";
const DB_VERSION: u32 = 1;

pub struct IndexedDbStorage {
    db: IdbDatabase,
}

impl IndexedDbStorage {
    /// Open (or create) the database and its single key/value store.
    pub async fn open() -> Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| DialogueError::Storage("No window object".to_string()))?;

        let factory = window
            .indexed_db()
            .map_err(storage_err)?
            .ok_or_else(|| DialogueError::Storage("IndexedDB not available".to_string()))?;

        let open_req = factory.open_with_u32(DB_NAME, DB_VERSION).map_err(storage_err)?;

        let upgrade_req = open_req.clone();
        let onupgrade = Closure::once(move |_event: web_sys::Event| {
            let db = match upgrade_req.result().map(|r| r.dyn_into::<IdbDatabase>()) {
                Ok(Ok(db)) => db,
                _ => {
                    log::error!("IndexedDB upgrade: no database handle");
                    return;
                }
            };
            if !db.object_store_names().contains(STORE_NAME) {
                if let Err(e) = db.create_object_store(STORE_NAME) {
                    log::error!("IndexedDB upgrade: {:?}", e);
                }
            }
        });
        open_req.set_onupgradeneeded(Some(onupgrade.as_ref().unchecked_ref()));
        onupgrade.forget();

        let db = settle(&open_req).await?.dyn_into::<IdbDatabase>().map_err(storage_err)?;
        Ok(Self { db })
    }

    fn store(&self, mode: IdbTransactionMode) -> Result<IdbObjectStore> {
        self.db
            .transaction_with_str_and_mode(STORE_NAME, mode)
            .and_then(|tx| tx.object_store(STORE_NAME))
            .map_err(storage_err)
    }
}

#[async_trait(?Send)]
impl StoragePort for IndexedDbStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let req = self
            .store(IdbTransactionMode::Readonly)?
            .get(&JsValue::from_str(key))
            .map_err(storage_err)?;
        let value = settle(&req).await?;

        if value.is_undefined() || value.is_null() {
            return Ok(None);
        }
        Ok(Some(Uint8Array::new(&value).to_vec()))
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let req = self
            .store(IdbTransactionMode::Readwrite)?
            .put_with_key(&Uint8Array::from(value), &JsValue::from_str(key))
            .map_err(storage_err)?;
        settle(&req).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let req = self
            .store(IdbTransactionMode::Readwrite)?
            .delete(&JsValue::from_str(key))
            .map_err(storage_err)?;
        settle(&req).await?;
        Ok(())
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>> {
        let req = self
            .store(IdbTransactionMode::Readonly)?
            .get_all_keys()
            .map_err(storage_err)?;
        let keys: Array = settle(&req).await?.dyn_into().map_err(storage_err)?;

        Ok(keys
            .iter()
            .filter_map(|k| k.as_string())
            .filter(|k| k.starts_with(prefix))
            .collect())
    }

    fn backend_name(&self) -> &str {
        "indexeddb"
    }
}

fn storage_err(e: impl std::fmt::Debug) -> DialogueError {
    DialogueError::Storage(format!("{:?}", e))
}

/// Wait for a callback-style IDB request by bridging it through a Promise.
async fn settle(req: &IdbRequest) -> Result<JsValue> {
    let success_req = req.clone();
    let callback_req = req.clone();

    let promise = Promise::new(&mut move |resolve, reject| {
        let done_req = success_req.clone();
        let onsuccess = Closure::once(move |_: web_sys::Event| {
            let _ = resolve.call1(&JsValue::NULL, &done_req.result().unwrap_or(JsValue::UNDEFINED));
        });
        let onerror = Closure::once(move |_: web_sys::Event| {
            let _ = reject.call1(&JsValue::NULL, &JsValue::from_str("IDB request failed"));
        });
        callback_req.set_onsuccess(Some(onsuccess.as_ref().unchecked_ref()));
        callback_req.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onsuccess.forget();
        onerror.forget();
    });

    JsFuture::from(promise).await.map_err(storage_err)
}
