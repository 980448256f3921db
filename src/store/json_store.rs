use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::{Settings, default_data_dir};
use crate::store::schema::{SCHEMA_VERSION, UserProfile};
use crate::store::{Store, StoreError};

const PROFILE_FILE: &str = "profile.json";
const SETTINGS_FILE: &str = "settings.toml";

/// File-backed store: the profile as pretty JSON, settings as TOML.
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self, StoreError> {
        Self::with_base_dir(default_data_dir())
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self, StoreError> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    /// Store over `base_dir` only if that directory is already there.
    pub fn open_existing(base_dir: PathBuf) -> Option<Self> {
        base_dir.is_dir().then_some(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn read(&self, name: &str) -> Result<Option<String>, StoreError> {
        let path = self.file_path(name);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    /// Write through a temp file and rename so readers never see half a record.
    fn write_atomic(&self, name: &str, content: &str) -> Result<(), StoreError> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }
}

impl Store for JsonStore {
    fn load_profile(&self) -> Result<Option<UserProfile>, StoreError> {
        let Some(content) = self.read(PROFILE_FILE)? else {
            return Ok(None);
        };
        let profile: UserProfile = serde_json::from_str(&content)?;
        if profile.needs_reset() {
            return Err(StoreError::SchemaMismatch {
                found: profile.schema_version,
                expected: SCHEMA_VERSION,
            });
        }
        Ok(Some(profile))
    }

    fn save_profile(&self, profile: &UserProfile) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(profile)?;
        self.write_atomic(PROFILE_FILE, &json)
    }

    fn load_settings(&self) -> Result<Option<Settings>, StoreError> {
        let Some(content) = self.read(SETTINGS_FILE)? else {
            return Ok(None);
        };
        let mut settings: Settings = toml::from_str(&content)?;
        settings.validate();
        Ok(Some(settings))
    }

    fn save_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        let content = toml::to_string_pretty(settings)?;
        self.write_atomic(SETTINGS_FILE, &content)
    }
}
