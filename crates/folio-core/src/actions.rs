use super::config::DisplayOverrides;
use super::config::RawConfig;
use super::state::GroupSummary;
use super::state::Location;
use super::state::OwnerSummary;

#[derive(Debug, Clone)]
pub enum RouteAction {
    User(UserIntent),
    Runtime(RuntimeEvent),
}

/// What views may ask for. None of these write route state directly.
#[derive(Debug, Clone)]
pub enum UserIntent {
    Navigate { path: String },
    SelectOwner(String),
    SelectGroup(String),
    RefreshConfig,
    RefreshLists,
    SetDisplayOverrides(DisplayOverrides),
}

#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    Mounted,
    LocationChanged(Location),
    ConfigReceived(Result<RawConfig, FetchFailure>),
    OwnersReceived(Result<Vec<OwnerSummary>, FetchFailure>),
    GroupsReceived(Result<Vec<GroupSummary>, FetchFailure>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchTarget {
    Config,
    Owners,
    Groups,
}

impl FetchTarget {
    pub fn label(self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::Owners => "owners",
            Self::Groups => "groups",
        }
    }
}

/// A collaborator fetch that rejected. Treated as "not yet available".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct FetchFailure {
    pub message: String,
}

impl FetchFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
