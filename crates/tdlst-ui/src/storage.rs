use tdlst_core::storage::{
  KeyValueStore,
  MemoryStorage,
  StorageError
};

/// `window.localStorage`. Reads from an
/// unavailable store come back empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

fn local_storage() -> Option<web_sys::Storage>
{
  web_sys::window().and_then(|window| {
    window
      .local_storage()
      .ok()
      .flatten()
  })
}

impl KeyValueStore for BrowserStorage {
  fn get(
    &self,
    key: &str
  ) -> Option<String> {
    local_storage().and_then(|storage| {
      storage
        .get_item(key)
        .ok()
        .flatten()
    })
  }

  fn set(
    &mut self,
    key: &str,
    value: &str
  ) -> Result<(), StorageError> {
    let storage = local_storage()
      .ok_or(StorageError::Unavailable)?;
    storage.set_item(key, value).map_err(
      |err| {
        StorageError::Write {
          key:    key.to_string(),
          reason: format!("{err:?}")
        }
      }
    )
  }

  fn remove(
    &mut self,
    key: &str
  ) -> Result<(), StorageError> {
    let storage = local_storage()
      .ok_or(StorageError::Unavailable)?;
    storage.remove_item(key).map_err(
      |err| {
        StorageError::Write {
          key:    key.to_string(),
          reason: format!("{err:?}")
        }
      }
    )
  }
}

/// Backend picked once at start-up. With
/// `localStorage` missing (private mode,
/// sandboxed frames) the session runs on
/// an in-memory map and is lost on
/// reload.
#[derive(Debug, Clone)]
pub enum AppStorage {
  Browser(BrowserStorage),
  Memory(MemoryStorage)
}

impl AppStorage {
  pub fn detect() -> Self {
    if local_storage().is_some() {
      AppStorage::Browser(BrowserStorage)
    } else {
      tracing::warn!(
        "localStorage unavailable; \
         session will not persist"
      );
      AppStorage::Memory(MemoryStorage::new())
    }
  }
}

impl KeyValueStore for AppStorage {
  fn get(
    &self,
    key: &str
  ) -> Option<String> {
    match self {
      | AppStorage::Browser(store) => {
        store.get(key)
      }
      | AppStorage::Memory(store) => {
        store.get(key)
      }
    }
  }

  fn set(
    &mut self,
    key: &str,
    value: &str
  ) -> Result<(), StorageError> {
    match self {
      | AppStorage::Browser(store) => {
        store.set(key, value)
      }
      | AppStorage::Memory(store) => {
        store.set(key, value)
      }
    }
  }

  fn remove(
    &mut self,
    key: &str
  ) -> Result<(), StorageError> {
    match self {
      | AppStorage::Browser(store) => {
        store.remove(key)
      }
      | AppStorage::Memory(store) => {
        store.remove(key)
      }
    }
  }
}
