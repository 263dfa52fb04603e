use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use super::config::DisplayOverrides;
use super::config::Theme;

pub const PREFERENCES_VERSION: u8 = 1;

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("preferences io: {0}")]
    Io(#[from] std::io::Error),
    #[error("preferences parse: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unsupported preferences version {0}")]
    Version(u8),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedPreferences {
    pub version: u8,
    pub saved_at_ms: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_view_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

impl PersistedPreferences {
    pub fn overrides(&self) -> DisplayOverrides {
        DisplayOverrides {
            relative_view_enabled: self.relative_view_enabled,
            theme: self.theme,
        }
    }
}

/// Display overrides kept on disk across sessions.
#[derive(Debug)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<PersistedPreferences>, PersistenceError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let bytes = std::fs::read(&self.path)?;
        let prefs = serde_json::from_slice::<PersistedPreferences>(&bytes)?;
        if prefs.version != PREFERENCES_VERSION {
            return Err(PersistenceError::Version(prefs.version));
        }
        Ok(Some(prefs))
    }

    /// Missing or unreadable files fall back to no overrides.
    pub fn load_overrides(&self) -> DisplayOverrides {
        match self.load() {
            Ok(prefs) => prefs.map(|prefs| prefs.overrides()).unwrap_or_default(),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "ignoring stored preferences");
                DisplayOverrides::default()
            }
        }
    }

    pub fn save(&self, overrides: &DisplayOverrides) -> Result<PersistedPreferences, PersistenceError> {
        let prefs = PersistedPreferences {
            version: PREFERENCES_VERSION,
            saved_at_ms: chrono::Utc::now().timestamp_millis(),
            relative_view_enabled: overrides.relative_view_enabled,
            theme: overrides.theme,
        };
        let encoded = serde_json::to_vec_pretty(&prefs)?;
        std::fs::write(&self.path, encoded)?;
        Ok(prefs)
    }

    pub fn clear(&self) -> Result<(), PersistenceError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::DisplayOverrides;
    use super::PersistenceError;
    use super::PreferenceStore;
    use super::Theme;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempdir().expect("tmpdir");
        let store = PreferenceStore::open(dir.path().join("nested/prefs.json")).expect("open");
        assert!(store.load().expect("load").is_none());
        assert_eq!(store.load_overrides(), DisplayOverrides::default());
    }

    #[test]
    fn saved_overrides_are_restored() {
        let dir = tempdir().expect("tmpdir");
        let store = PreferenceStore::open(dir.path().join("prefs.json")).expect("open");
        let overrides = DisplayOverrides {
            relative_view_enabled: Some(true),
            theme: Some(Theme::Dark),
        };

        store.save(&overrides).expect("save");

        let reopened = PreferenceStore::open(store.path()).expect("reopen");
        assert_eq!(reopened.load_overrides(), overrides);
        reopened.clear().expect("clear");
        assert!(reopened.load().expect("load").is_none());
    }

    #[test]
    fn corrupt_file_is_reported_and_ignored_on_restore() {
        let dir = tempdir().expect("tmpdir");
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, b"{not json").expect("write");
        let store = PreferenceStore::open(&path).expect("open");

        assert!(matches!(store.load(), Err(PersistenceError::Parse(_))));
        assert_eq!(store.load_overrides(), DisplayOverrides::default());
    }

    #[test]
    fn future_version_is_rejected() {
        let dir = tempdir().expect("tmpdir");
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, br#"{"version":9,"saved_at_ms":0}"#).expect("write");
        let store = PreferenceStore::open(&path).expect("open");

        assert!(matches!(store.load(), Err(PersistenceError::Version(9))));
    }
}
