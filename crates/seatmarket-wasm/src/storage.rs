use seatmarket_store::{KeyValueStore, StorageError};

/// `window.localStorage` as a key-value backend.
///
/// Outside a browser (or when storage is disabled) every read misses and
/// every write is dropped, so the board still works for the session.
pub struct BrowserStorage {
    inner: Option<web_sys::Storage>,
}

impl BrowserStorage {
    pub fn local() -> Self {
        Self {
            inner: local_storage(),
        }
    }

    /// Backend with no storage behind it
    pub fn detached() -> Self {
        Self { inner: None }
    }

    pub fn is_available(&self) -> bool {
        self.inner.is_some()
    }
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

#[cfg(not(target_arch = "wasm32"))]
fn local_storage() -> Option<web_sys::Storage> {
    None
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match &self.inner {
            Some(storage) => storage
                .get_item(key)
                .map_err(|err| StorageError::Unavailable(format!("{:?}", err))),
            None => Ok(None),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        match &self.inner {
            Some(storage) => storage
                .set_item(key, value)
                .map_err(|err| StorageError::Unavailable(format!("{:?}", err))),
            None => Ok(()),
        }
    }
}
