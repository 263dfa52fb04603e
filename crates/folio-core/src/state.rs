use serde::Deserialize;
use serde::Serialize;

use super::config::ConfigStore;
use super::route::resolve_location;

/// Top-level view identifier. Declaration order is the fallback priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Group,
    Owner,
    Instrument,
    Performance,
    Transactions,
    Trading,
    Screener,
    Timeseries,
    Watchlist,
    Movers,
    Allocation,
    Rebalance,
    Reports,
    Scenario,
    DataAdmin,
    Support,
    Settings,
}

/// Which selection slug a mode embeds in its URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Carried {
    Nothing,
    Owner,
    Group,
}

impl Mode {
    pub const ALL: [Mode; 17] = [
        Mode::Group,
        Mode::Owner,
        Mode::Instrument,
        Mode::Performance,
        Mode::Transactions,
        Mode::Trading,
        Mode::Screener,
        Mode::Timeseries,
        Mode::Watchlist,
        Mode::Movers,
        Mode::Allocation,
        Mode::Rebalance,
        Mode::Reports,
        Mode::Scenario,
        Mode::DataAdmin,
        Mode::Support,
        Mode::Settings,
    ];

    /// Mode for the empty path.
    pub const DEFAULT: Mode = Mode::Group;

    /// Mode for any unrecognized first path segment.
    pub const CATCH_ALL: Mode = Mode::Movers;

    pub fn key(self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Owner => "owner",
            Self::Instrument => "instrument",
            Self::Performance => "performance",
            Self::Transactions => "transactions",
            Self::Trading => "trading",
            Self::Screener => "screener",
            Self::Timeseries => "timeseries",
            Self::Watchlist => "watchlist",
            Self::Movers => "movers",
            Self::Allocation => "allocation",
            Self::Rebalance => "rebalance",
            Self::Reports => "reports",
            Self::Scenario => "scenario",
            Self::DataAdmin => "dataadmin",
            Self::Support => "support",
            Self::Settings => "settings",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ALL
            .into_iter()
            .find(|mode| mode.key().eq_ignore_ascii_case(key))
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Group => "Group",
            Self::Owner => "Owner",
            Self::Instrument => "Instrument",
            Self::Performance => "Performance",
            Self::Transactions => "Transactions",
            Self::Trading => "Trading",
            Self::Screener => "Screener",
            Self::Timeseries => "Timeseries",
            Self::Watchlist => "Watchlist",
            Self::Movers => "Movers",
            Self::Allocation => "Allocation",
            Self::Rebalance => "Rebalance",
            Self::Reports => "Reports",
            Self::Scenario => "Scenario",
            Self::DataAdmin => "Data admin",
            Self::Support => "Support",
            Self::Settings => "Settings",
        }
    }

    /// Canonical first path segment.
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Group => "",
            Self::Owner => "member",
            other => other.key(),
        }
    }

    /// Inverse of [`Mode::path_segment`], including path aliases.
    pub fn from_path_segment(segment: &str) -> Option<Self> {
        if segment.is_empty() {
            return Some(Self::DEFAULT);
        }
        if segment.eq_ignore_ascii_case("member") || segment.eq_ignore_ascii_case("portfolio") {
            return Some(Self::Owner);
        }
        // "group" and "owner" are config keys, not path tokens.
        match Self::from_key(segment)? {
            Self::Group | Self::Owner => None,
            mode => Some(mode),
        }
    }

    pub fn carries(self) -> Carried {
        match self {
            Self::Owner | Self::Performance => Carried::Owner,
            Self::Group | Self::Instrument => Carried::Group,
            _ => Carried::Nothing,
        }
    }

    pub fn priority(self) -> usize {
        Self::ALL
            .iter()
            .position(|mode| *mode == self)
            .unwrap_or(Self::ALL.len())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub owner: String,
    pub group: String,
}

impl Selection {
    pub fn new(owner: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            group: group.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteState {
    pub mode: Mode,
    pub selection: Selection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutePhase {
    Uninitialized,
    Resolving,
    Stable,
    NoViewsAvailable,
}

impl RoutePhase {
    pub fn label(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Resolving => "resolving",
            Self::Stable => "stable",
            Self::NoViewsAvailable => "no-views-available",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerSummary {
    pub owner: String,
    #[serde(default)]
    pub accounts: Vec<String>,
}

impl OwnerSummary {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            accounts: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub slug: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
}

impl GroupSummary {
    pub fn new(slug: impl Into<String>) -> Self {
        let slug = slug.into();
        Self {
            name: slug.clone(),
            slug,
            members: Vec::new(),
        }
    }
}

/// Asynchronously arriving list; `loaded` flips on the first successful fetch.
#[derive(Debug, Clone)]
pub struct ListSlot<T> {
    pub items: Vec<T>,
    pub loaded: bool,
    pub error: Option<String>,
}

impl<T> Default for ListSlot<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loaded: false,
            error: None,
        }
    }
}

impl<T: PartialEq> ListSlot<T> {
    /// Returns true when the content or the loaded flag changed.
    pub fn receive(&mut self, items: Vec<T>) -> bool {
        let changed = !self.loaded || self.items != items;
        self.items = items;
        self.loaded = true;
        self.error = None;
        changed
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Items usable for defaulting; `None` until the first successful load.
    pub fn known(&self) -> Option<&[T]> {
        self.loaded.then_some(self.items.as_slice())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub pathname: String,
    pub search: String,
}

impl Location {
    pub fn new(pathname: impl Into<String>, search: impl Into<String>) -> Self {
        let mut pathname = pathname.into();
        if !pathname.starts_with('/') {
            pathname.insert(0, '/');
        }
        let mut search = search.into();
        if search == "?" {
            search.clear();
        } else if !search.is_empty() && !search.starts_with('?') {
            search.insert(0, '?');
        }
        Self { pathname, search }
    }

    pub fn parse(url: &str) -> Self {
        let url = match url.split_once('#') {
            Some((head, _)) => head,
            None => url,
        };
        match url.split_once('?') {
            Some((path, query)) => Self::new(path, query),
            None => Self::new(url, ""),
        }
    }

    pub fn to_url(&self) -> String {
        format!("{}{}", self.pathname, self.search)
    }
}

/// Navigation handed out but not yet observed as a location change.
/// `replace` is false for user pushes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingNavigation {
    pub pass: u64,
    pub path: String,
    pub replace: bool,
}

impl PendingNavigation {
    pub fn is_user_push(&self) -> bool {
        !self.replace
    }
}

/// The single route model. Only the reducer mutates it.
#[derive(Debug, Clone)]
pub struct RouteModel {
    pub phase: RoutePhase,
    pub route: RouteState,
    pub location: Location,
    pub config: ConfigStore,
    pub owners: ListSlot<OwnerSummary>,
    pub groups: ListSlot<GroupSummary>,
    pub pass: u64,
    pub pending: Option<PendingNavigation>,
}

impl RouteModel {
    /// Seeds the route from the first observed URL without waiting for data.
    pub fn new(location: Location, config: ConfigStore) -> Self {
        let resolved = resolve_location(&location);
        Self {
            phase: RoutePhase::Uninitialized,
            route: RouteState {
                mode: resolved.mode,
                selection: Selection::new(resolved.owner, resolved.group),
            },
            location,
            config,
            owners: ListSlot::default(),
            groups: ListSlot::default(),
            pass: 0,
            pending: None,
        }
    }

    pub fn is_current(&self, pass: u64) -> bool {
        self.pass == pass
    }

    pub fn view(&self) -> RouteView {
        RouteView {
            mode: self.route.mode,
            selected_owner: self.route.selection.owner.clone(),
            selected_group: self.route.selection.group.clone(),
            phase: self.phase,
        }
    }
}

/// Read-only projection handed to views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteView {
    pub mode: Mode,
    pub selected_owner: String,
    pub selected_group: String,
    pub phase: RoutePhase,
}

impl RouteView {
    pub fn is_blocked(&self) -> bool {
        self.phase == RoutePhase::NoViewsAvailable
    }
}
