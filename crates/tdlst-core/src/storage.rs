//! Persisted session state on top of a
//! string-keyed store with JSON values.

use std::collections::BTreeMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tdlst_shared::{Task, User};
use tracing::{debug, error};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("persistent storage is unavailable")]
    Unavailable,

    #[error("failed writing {key}: {reason}")]
    Write { key: String, reason: String },

    #[error("failed encoding value: {0}")]
    Encode(#[from] serde_json::Error),
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub current_user: String,
    pub users: String,
    pub tasks: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            current_user: "team:user".to_string(),
            users: "team:users".to_string(),
            tasks: "team:todos".to_string(),
        }
    }
}

/// Typed view over the three persisted values: the signed-in email, the
/// registered users and the task cache.
#[derive(Debug, Clone)]
pub struct PersistedStore<S> {
    backend: S,
    keys: StorageKeys,
}

impl<S: KeyValueStore> PersistedStore<S> {
    pub fn new(backend: S, keys: StorageKeys) -> Self {
        Self { backend, keys }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// A stored JSON `null` and a missing key both read as signed out.
    pub fn load_current_user(&self) -> Option<String> {
        self.load_json::<Option<String>>(&self.keys.current_user)
            .flatten()
    }

    #[tracing::instrument(skip(self))]
    pub fn save_current_user(&mut self, email: Option<&str>) -> Result<(), StorageError> {
        match email {
            Some(email) => {
                let key = self.keys.current_user.clone();
                self.save_json(&key, &email)
            }
            None => {
                debug!(key = %self.keys.current_user, "clearing current user");
                self.backend.remove(&self.keys.current_user)
            }
        }
    }

    pub fn load_users(&self) -> Vec<User> {
        self.load_json(&self.keys.users).unwrap_or_default()
    }

    #[tracing::instrument(skip(self, users), fields(count = users.len()))]
    pub fn save_users(&mut self, users: &[User]) -> Result<(), StorageError> {
        let key = self.keys.users.clone();
        self.save_json(&key, &users)
    }

    pub fn load_tasks(&self) -> Vec<Task> {
        self.load_json(&self.keys.tasks).unwrap_or_default()
    }

    #[tracing::instrument(skip(self, tasks), fields(count = tasks.len()))]
    pub fn save_tasks(&mut self, tasks: &[Task]) -> Result<(), StorageError> {
        let key = self.keys.tasks.clone();
        self.save_json(&key, &tasks)
    }

    fn load_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.backend.get(key)?;
        match serde_json::from_str::<T>(&raw) {
            Ok(value) => Some(value),
            Err(error) => {
                error!(
                    %error,
                    key,
                    "failed parsing persisted value; using default"
                );
                None
            }
        }
    }

    fn save_json<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value)?;
        self.backend.set(key, &json)
    }
}

#[cfg(test)]
mod tests {
    use tdlst_shared::{Task, User};

    use super::{KeyValueStore, MemoryStorage, PersistedStore, StorageKeys};

    fn store() -> PersistedStore<MemoryStorage> {
        PersistedStore::new(MemoryStorage::new(), StorageKeys::default())
    }

    #[test]
    fn empty_backend_reads_defaults() {
        let store = store();
        assert_eq!(store.load_current_user(), None);
        assert!(store.load_users().is_empty());
        assert!(store.load_tasks().is_empty());
    }

    #[test]
    fn values_are_json_under_configured_keys() {
        let mut store = store();
        store.save_current_user(Some("a@x.com")).expect("save user");
        store
            .save_users(&[User::new("a@x.com", "p")])
            .expect("save users");
        store
            .save_tasks(&[Task::new(42, "buy milk", "a@x.com")])
            .expect("save tasks");

        let backend = store.backend();
        assert_eq!(backend.get("team:user").as_deref(), Some("\"a@x.com\""));
        assert_eq!(
            backend.get("team:users").as_deref(),
            Some(r#"[{"email":"a@x.com","password":"p"}]"#)
        );
        assert_eq!(
            backend.get("team:todos").as_deref(),
            Some(r#"[{"id":42,"text":"buy milk","author":"a@x.com","completed":false}]"#)
        );

        assert_eq!(store.load_current_user().as_deref(), Some("a@x.com"));
        assert_eq!(store.load_users(), vec![User::new("a@x.com", "p")]);
        assert_eq!(store.load_tasks()[0].text, "buy milk");
    }

    #[test]
    fn clearing_current_user_removes_key() {
        let mut store = store();
        store.save_current_user(Some("a@x.com")).expect("save user");
        store.save_current_user(None).expect("clear user");
        assert_eq!(store.backend().get("team:user"), None);
        assert_eq!(store.load_current_user(), None);
    }

    #[test]
    fn corrupt_values_fall_back_to_defaults() {
        let mut backend = MemoryStorage::new();
        backend.set("team:todos", "{not json").expect("set");
        backend.set("team:users", "42").expect("set");
        backend.set("team:user", "null").expect("set");

        let store = PersistedStore::new(backend, StorageKeys::default());
        assert!(store.load_tasks().is_empty());
        assert!(store.load_users().is_empty());
        assert_eq!(store.load_current_user(), None);
    }
}
