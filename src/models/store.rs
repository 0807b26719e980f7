use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SuitterError;
use crate::models::profile::{MetadataPatch, ProfileMetadata};

/// Local Preference Store: a per-address overlay of display name, website
/// and location, kept in one JSON file on this client. It is merged into
/// profile views but is never authoritative for username or bio.
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    /// Store under `$XDG_CACHE_HOME/suitter/` (or `~/.cache/suitter/`).
    pub fn open_default() -> Result<Self, SuitterError> {
        let base_cache_dir = env::var_os("XDG_CACHE_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".cache")))
            .ok_or_else(|| {
                SuitterError::Store("Could not resolve a cache directory".to_string())
            })?;

        let app_cache_dir = base_cache_dir.join("suitter");
        fs::create_dir_all(&app_cache_dir)
            .map_err(|e| SuitterError::Store(format!("Failed to create cache directory: {}", e)))?;

        Ok(Self {
            path: app_cache_dir.join("profile_metadata.json"),
        })
    }

    pub fn at(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn get(&self, address: &str) -> Result<ProfileMetadata, SuitterError> {
        let records = self.load()?;
        Ok(records.get(address).cloned().unwrap_or_default())
    }

    /// Read-modify-write: untouched fields keep their stored values.
    pub fn merge(&self, address: &str, patch: MetadataPatch) -> Result<ProfileMetadata, SuitterError> {
        let mut records = self.load()?;
        let record = records.entry(address.to_string()).or_default();
        record.apply(patch);
        let merged = record.clone();
        self.save(&records)?;
        Ok(merged)
    }

    pub fn clear(&self, address: &str) -> Result<(), SuitterError> {
        let mut records = self.load()?;
        if records.remove(address).is_some() {
            self.save(&records)?;
        }
        Ok(())
    }

    fn load(&self) -> Result<BTreeMap<String, ProfileMetadata>, SuitterError> {
        match fs::read_to_string(&self.path) {
            Ok(data) => serde_json::from_str(&data)
                .map_err(|e| SuitterError::Store(format!("Failed to parse preference data: {}", e))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(SuitterError::Store(format!(
                "Failed to read preference file: {}",
                e
            ))),
        }
    }

    fn save(&self, records: &BTreeMap<String, ProfileMetadata>) -> Result<(), SuitterError> {
        let json = serde_json::to_string(records)
            .map_err(|e| SuitterError::Store(format!("Failed to serialize preferences: {}", e)))?;
        fs::write(&self.path, json)
            .map_err(|e| SuitterError::Store(format!("Failed to write preference file: {}", e)))?;
        Ok(())
    }
}
