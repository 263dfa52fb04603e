use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use super::actions::FetchFailure;
use super::state::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
    #[default]
    System,
}

impl Theme {
    pub fn label(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
            Self::System => "system",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            "system" | "auto" => Some(Self::System),
            _ => None,
        }
    }
}

/// Config payload as served by the backend. Unknown keys are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub tabs: BTreeMap<String, bool>,
    pub disabled_tabs: Vec<String>,
    pub relative_view_enabled: bool,
    pub theme: Theme,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabsConfig {
    enabled: BTreeMap<Mode, bool>,
    disabled: BTreeSet<Mode>,
}

impl TabsConfig {
    /// Nothing available. Used when no config could ever be fetched.
    pub fn all_disabled() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (Mode, bool)>) -> Self {
        let mut tabs = Self::default();
        for (mode, enabled) in entries {
            tabs.set(mode, enabled);
        }
        tabs
    }

    pub fn from_raw(raw: &RawConfig) -> Self {
        let mut tabs = Self::default();
        for (key, enabled) in &raw.tabs {
            match Mode::from_key(key) {
                Some(mode) => tabs.set(mode, *enabled),
                None => tracing::debug!(key = %key, "ignoring unknown tab key"),
            }
        }
        for key in &raw.disabled_tabs {
            match Mode::from_key(key) {
                Some(mode) => tabs.disable(mode),
                None => tracing::debug!(key = %key, "ignoring unknown disabled tab"),
            }
        }
        tabs
    }

    pub fn set(&mut self, mode: Mode, enabled: bool) {
        self.enabled.insert(mode, enabled);
        if !enabled {
            self.disabled.insert(mode);
        }
    }

    pub fn disable(&mut self, mode: Mode) {
        self.disabled.insert(mode);
    }

    pub fn is_available(&self, mode: Mode) -> bool {
        self.enabled.get(&mode).copied().unwrap_or(false) && !self.disabled.contains(&mode)
    }

    pub fn disabled_tabs(&self) -> &BTreeSet<Mode> {
        &self.disabled
    }

    /// Available modes in fallback-priority order.
    pub fn available_modes(&self) -> impl Iterator<Item = Mode> + '_ {
        Mode::ALL
            .into_iter()
            .filter(move |mode| self.is_available(*mode))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySettings {
    pub relative_view_enabled: bool,
    pub theme: Theme,
}

/// Locally persisted preferences layered over the remote config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisplayOverrides {
    pub relative_view_enabled: Option<bool>,
    pub theme: Option<Theme>,
}

impl DisplayOverrides {
    pub fn is_empty(self) -> bool {
        self.relative_view_enabled.is_none() && self.theme.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigStatus {
    Pending,
    Loaded,
    Refreshing,
    /// Last fetch failed; the previous snapshot is still in use.
    Stale,
    /// No fetch ever succeeded; every tab is treated as disabled.
    Failed,
}

impl ConfigStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Loaded => "loaded",
            Self::Refreshing => "refreshing",
            Self::Stale => "stale",
            Self::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigChange {
    pub tabs_changed: bool,
    pub display_changed: bool,
}

#[derive(Debug, Clone)]
pub struct ConfigStore {
    status: ConfigStatus,
    /// Last successfully fetched payload.
    snapshot: Option<RawConfig>,
    effective: Option<TabsConfig>,
    overrides: DisplayOverrides,
    last_error: Option<String>,
    revision: u64,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore {
    pub fn new() -> Self {
        Self {
            status: ConfigStatus::Pending,
            snapshot: None,
            effective: None,
            overrides: DisplayOverrides::default(),
            last_error: None,
            revision: 0,
        }
    }

    pub fn with_overrides(mut self, overrides: DisplayOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Store seeded with an already known payload (tests, fixtures).
    pub fn loaded(raw: RawConfig) -> Self {
        let mut store = Self::new();
        store.receive(Ok(raw));
        store
    }

    pub fn status(&self) -> ConfigStatus {
        self.status
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// `None` while the first fetch is still outstanding.
    pub fn effective_tabs(&self) -> Option<&TabsConfig> {
        self.effective.as_ref()
    }

    pub fn begin_refresh(&mut self) {
        if self.snapshot.is_some() {
            self.status = ConfigStatus::Refreshing;
        }
    }

    pub fn receive(&mut self, result: Result<RawConfig, FetchFailure>) -> ConfigChange {
        let before_tabs = self.effective.clone();
        let before_display = self.display();
        match result {
            Ok(raw) => {
                self.effective = Some(TabsConfig::from_raw(&raw));
                self.snapshot = Some(raw);
                self.status = ConfigStatus::Loaded;
                self.last_error = None;
                self.revision += 1;
            }
            Err(err) => {
                tracing::warn!(error = %err, "config fetch failed");
                self.last_error = Some(err.to_string());
                if self.snapshot.is_some() {
                    self.status = ConfigStatus::Stale;
                } else {
                    self.status = ConfigStatus::Failed;
                    self.effective = Some(TabsConfig::all_disabled());
                }
            }
        }
        ConfigChange {
            tabs_changed: before_tabs != self.effective,
            display_changed: before_display != self.display(),
        }
    }

    pub fn overrides(&self) -> DisplayOverrides {
        self.overrides
    }

    /// Returns true when the effective display settings changed.
    pub fn set_overrides(&mut self, overrides: DisplayOverrides) -> bool {
        let before = self.display();
        self.overrides = overrides;
        before != self.display()
    }

    pub fn display(&self) -> DisplaySettings {
        let (relative, theme) = match &self.snapshot {
            Some(raw) => (raw.relative_view_enabled, raw.theme),
            None => (false, Theme::System),
        };
        DisplaySettings {
            relative_view_enabled: self.overrides.relative_view_enabled.unwrap_or(relative),
            theme: self.overrides.theme.unwrap_or(theme),
        }
    }

    /// Keys of the payload the engine does not interpret.
    pub fn passthrough(&self) -> Option<&BTreeMap<String, serde_json::Value>> {
        self.snapshot.as_ref().map(|raw| &raw.extra)
    }
}
