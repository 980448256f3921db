pub mod json_store;
pub mod memory;
pub mod schema;

use std::rc::Rc;

use thiserror::Error;

use crate::config::Settings;
use crate::store::schema::UserProfile;

pub use json_store::JsonStore;
pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid profile data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid settings file: {0}")]
    TomlDecode(#[from] toml::de::Error),
    #[error("could not encode settings: {0}")]
    TomlEncode(#[from] toml::ser::Error),
    #[error("unsupported schema version {found} (expected {expected})")]
    SchemaMismatch { found: u32, expected: u32 },
    #[error("store is unavailable")]
    Unavailable,
}

/// Keyed home for the single profile record and the single settings record.
///
/// `load_*` returns `Ok(None)` when nothing has been written yet. `save_*`
/// replaces the whole record.
pub trait Store {
    fn load_profile(&self) -> Result<Option<UserProfile>, StoreError>;
    fn save_profile(&self, profile: &UserProfile) -> Result<(), StoreError>;
    fn load_settings(&self) -> Result<Option<Settings>, StoreError>;
    fn save_settings(&self, settings: &Settings) -> Result<(), StoreError>;
}

impl<S: Store + ?Sized> Store for Rc<S> {
    fn load_profile(&self) -> Result<Option<UserProfile>, StoreError> {
        (**self).load_profile()
    }

    fn save_profile(&self, profile: &UserProfile) -> Result<(), StoreError> {
        (**self).save_profile(profile)
    }

    fn load_settings(&self) -> Result<Option<Settings>, StoreError> {
        (**self).load_settings()
    }

    fn save_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        (**self).save_settings(settings)
    }
}
