use std::cell::{Cell, RefCell};

use crate::config::Settings;
use crate::store::schema::UserProfile;
use crate::store::{Store, StoreError};

/// Store that keeps records in memory only. Used for `--no-save` runs and
/// in tests; can be told to fail writes to stand in for an unreachable store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    profile: RefCell<Option<UserProfile>>,
    settings: RefCell<Option<Settings>>,
    fail_writes: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(profile: UserProfile) -> Self {
        let store = Self::default();
        *store.profile.borrow_mut() = Some(profile);
        store
    }

    /// Copy of the records `source` can currently read. Unreadable records
    /// start out empty; nothing is written back to `source`.
    pub fn snapshot_of(source: &dyn Store) -> Self {
        let store = Self::default();
        *store.profile.borrow_mut() = source.load_profile().ok().flatten();
        *store.settings.borrow_mut() = source.load_settings().ok().flatten();
        store
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    pub fn stored_profile(&self) -> Option<UserProfile> {
        self.profile.borrow().clone()
    }

    pub fn stored_settings(&self) -> Option<Settings> {
        self.settings.borrow().clone()
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.get() {
            return Err(StoreError::Unavailable);
        }
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

impl Store for MemoryStore {
    fn load_profile(&self) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.profile.borrow().clone())
    }

    fn save_profile(&self, profile: &UserProfile) -> Result<(), StoreError> {
        self.check_writable()?;
        *self.profile.borrow_mut() = Some(profile.clone());
        Ok(())
    }

    fn load_settings(&self) -> Result<Option<Settings>, StoreError> {
        Ok(self.settings.borrow().clone())
    }

    fn save_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        self.check_writable()?;
        *self.settings.borrow_mut() = Some(settings.clone());
        Ok(())
    }
}
