use std::path::Path;
use std::path::PathBuf;

use folio_core::GroupSummary;
use folio_core::OwnerSummary;
use folio_core::RawConfig;
use serde::de::DeserializeOwned;

use crate::contracts::BackendError;
use crate::contracts::PortfolioBackend;

pub const OWNERS_FILE: &str = "owners.json";
pub const GROUPS_FILE: &str = "groups.json";
pub const CONFIG_FILE: &str = "config.json";

/// In-memory backend. Any resource can be switched to a failure.
#[derive(Debug, Clone)]
pub struct StaticBackend {
    owners: Result<Vec<OwnerSummary>, String>,
    groups: Result<Vec<GroupSummary>, String>,
    config: Result<RawConfig, String>,
}

impl StaticBackend {
    pub fn new(owners: Vec<OwnerSummary>, groups: Vec<GroupSummary>, config: RawConfig) -> Self {
        Self {
            owners: Ok(owners),
            groups: Ok(groups),
            config: Ok(config),
        }
    }

    pub fn fail_owners(mut self, reason: impl Into<String>) -> Self {
        self.owners = Err(reason.into());
        self
    }

    pub fn fail_groups(mut self, reason: impl Into<String>) -> Self {
        self.groups = Err(reason.into());
        self
    }

    pub fn fail_config(mut self, reason: impl Into<String>) -> Self {
        self.config = Err(reason.into());
        self
    }

    pub fn set_config(&mut self, config: RawConfig) {
        self.config = Ok(config);
    }
}

fn unavailable(resource: &'static str, reason: &str) -> BackendError {
    BackendError::Unavailable {
        resource,
        reason: reason.to_string(),
    }
}

impl PortfolioBackend for StaticBackend {
    fn name(&self) -> &'static str {
        "static"
    }

    fn fetch_owners(&self) -> Result<Vec<OwnerSummary>, BackendError> {
        self.owners
            .clone()
            .map_err(|reason| unavailable("owners", &reason))
    }

    fn fetch_groups(&self) -> Result<Vec<GroupSummary>, BackendError> {
        self.groups
            .clone()
            .map_err(|reason| unavailable("groups", &reason))
    }

    fn fetch_config(&self) -> Result<RawConfig, BackendError> {
        self.config
            .clone()
            .map_err(|reason| unavailable("config", &reason))
    }
}

/// Reads `owners.json`, `groups.json` and `config.json` from a directory,
/// re-reading on every fetch.
#[derive(Debug, Clone)]
pub struct FixtureBackend {
    root: PathBuf,
}

impl FixtureBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read<T: DeserializeOwned>(&self, resource: &'static str, file: &str) -> Result<T, BackendError> {
        let path = self.root.join(file);
        if !path.exists() {
            return Err(unavailable(resource, &format!("{} not found", path.display())));
        }
        let bytes = std::fs::read(&path).map_err(|source| BackendError::Io { resource, source })?;
        serde_json::from_slice(&bytes).map_err(|source| BackendError::Decode { resource, source })
    }
}

impl PortfolioBackend for FixtureBackend {
    fn name(&self) -> &'static str {
        "fixture"
    }

    fn fetch_owners(&self) -> Result<Vec<OwnerSummary>, BackendError> {
        self.read("owners", OWNERS_FILE)
    }

    fn fetch_groups(&self) -> Result<Vec<GroupSummary>, BackendError> {
        self.read("groups", GROUPS_FILE)
    }

    fn fetch_config(&self) -> Result<RawConfig, BackendError> {
        self.read("config", CONFIG_FILE)
    }
}
