use std::fmt::Write as _;
use std::path::Path;

use folio_core::actions::FetchFailure;
use folio_core::actions::RouteAction;
use folio_core::actions::RuntimeEvent;
use folio_core::actions::UserIntent;
use folio_core::config::ConfigStore;
use folio_core::config::DisplayOverrides;
use folio_core::config::RawConfig;
use folio_core::controller::RouteController;
use folio_core::navigation::MemoryHistory;
use folio_core::persistence::PreferenceStore;
use folio_core::reducer::RouteEffect;
use folio_core::state::GroupSummary;
use folio_core::state::OwnerSummary;
use folio_exec::contracts::PortfolioBackend;
use folio_exec::executor::drain_effects;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub url: String,
    #[serde(default)]
    pub preferences: DisplayOverrides,
    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Visit(String),
    Back,
    Forward,
    SelectOwner(String),
    SelectGroup(String),
    Config(RawConfig),
    ConfigError(String),
    Owners(Vec<String>),
    Groups(Vec<String>),
    ListsError(String),
    RefreshConfig,
    RefreshLists,
    Display(DisplayOverrides),
}

impl Step {
    fn label(&self) -> String {
        match self {
            Self::Visit(path) => format!("visit {path}"),
            Self::Back => "back".to_string(),
            Self::Forward => "forward".to_string(),
            Self::SelectOwner(owner) => format!("select_owner {owner}"),
            Self::SelectGroup(group) => format!("select_group {group}"),
            Self::Config(_) => "config".to_string(),
            Self::ConfigError(reason) => format!("config_error {reason}"),
            Self::Owners(owners) => format!("owners [{}]", owners.join(", ")),
            Self::Groups(groups) => format!("groups [{}]", groups.join(", ")),
            Self::ListsError(reason) => format!("lists_error {reason}"),
            Self::RefreshConfig => "refresh_config".to_string(),
            Self::RefreshLists => "refresh_lists".to_string(),
            Self::Display(_) => "display".to_string(),
        }
    }
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&text)?)
    }
}

pub struct Replay<'a> {
    controller: RouteController<MemoryHistory>,
    backend: Option<&'a dyn PortfolioBackend>,
    prefs: Option<&'a PreferenceStore>,
    trace: String,
}

impl<'a> Replay<'a> {
    pub fn new(
        scenario: &Scenario,
        backend: Option<&'a dyn PortfolioBackend>,
        prefs: Option<&'a PreferenceStore>,
    ) -> Self {
        let mut overrides = scenario.preferences;
        if overrides.is_empty() {
            if let Some(store) = prefs {
                overrides = store.load_overrides();
            }
        }
        let config = ConfigStore::new().with_overrides(overrides);
        Self {
            controller: RouteController::new(MemoryHistory::new(scenario.url.as_str()), config),
            backend,
            prefs,
            trace: String::new(),
        }
    }

    /// Mounts, applies every step and returns the printed trace.
    pub fn run(mut self, steps: &[Step]) -> Result<String, Box<dyn std::error::Error>> {
        let effects = self.controller.mount();
        self.settle(effects)?;
        self.record("mount")?;
        for step in steps {
            let effects = self.apply(step);
            self.settle(effects)?;
            self.record(&step.label())?;
        }
        writeln!(self.trace, "navigations: {}", self.controller.emitted())?;
        Ok(self.trace)
    }

    fn apply(&mut self, step: &Step) -> Vec<RouteEffect> {
        let ctl = &mut self.controller;
        match step {
            Step::Visit(path) => ctl.navigate(path.as_str()),
            Step::Back => ctl.back(),
            Step::Forward => ctl.forward(),
            Step::SelectOwner(owner) => ctl.set_selected_owner(owner.as_str()),
            Step::SelectGroup(group) => ctl.set_selected_group(group.as_str()),
            Step::Config(raw) => runtime(ctl, RuntimeEvent::ConfigReceived(Ok(raw.clone()))),
            Step::ConfigError(reason) => runtime(
                ctl,
                RuntimeEvent::ConfigReceived(Err(FetchFailure::new(reason.as_str()))),
            ),
            Step::Owners(names) => runtime(
                ctl,
                RuntimeEvent::OwnersReceived(Ok(names
                    .iter()
                    .map(|name| OwnerSummary::new(name.as_str()))
                    .collect())),
            ),
            Step::Groups(slugs) => runtime(
                ctl,
                RuntimeEvent::GroupsReceived(Ok(slugs
                    .iter()
                    .map(|slug| GroupSummary::new(slug.as_str()))
                    .collect())),
            ),
            Step::ListsError(reason) => {
                let mut effects = runtime(
                    ctl,
                    RuntimeEvent::OwnersReceived(Err(FetchFailure::new(reason.as_str()))),
                );
                effects.extend(runtime(
                    ctl,
                    RuntimeEvent::GroupsReceived(Err(FetchFailure::new(reason.as_str()))),
                ));
                effects
            }
            Step::RefreshConfig => ctl.dispatch(RouteAction::User(UserIntent::RefreshConfig)),
            Step::RefreshLists => ctl.dispatch(RouteAction::User(UserIntent::RefreshLists)),
            Step::Display(overrides) => {
                ctl.dispatch(RouteAction::User(UserIntent::SetDisplayOverrides(*overrides)))
            }
        }
    }

    /// Fetches go to the backend when one is attached; without one the
    /// scenario is expected to deliver the data itself.
    fn settle(&mut self, effects: Vec<RouteEffect>) -> Result<(), Box<dyn std::error::Error>> {
        let persist = match self.backend {
            Some(backend) => drain_effects(&mut self.controller, backend, effects).persist,
            None => effects
                .into_iter()
                .filter_map(|effect| match effect {
                    RouteEffect::PersistPreferences(overrides) => Some(overrides),
                    _ => None,
                })
                .collect(),
        };
        for overrides in persist {
            match self.prefs {
                Some(store) => {
                    store.save(&overrides)?;
                    tracing::info!(path = %store.path().display(), "saved preferences");
                }
                None => tracing::debug!(?overrides, "no preference file; skipping save"),
            }
        }
        Ok(())
    }

    fn record(&mut self, label: &str) -> std::fmt::Result {
        let view = self.controller.view();
        let display = self.controller.display();
        writeln!(
            self.trace,
            "{label:<24} {url:<24} mode={mode} owner={owner} group={group} phase={phase} config={config} theme={theme} relative={relative}",
            url = self.controller.model().location.to_url(),
            mode = view.mode.key(),
            owner = dash(&view.selected_owner),
            group = dash(&view.selected_group),
            phase = view.phase.label(),
            config = self.controller.model().config.status().label(),
            theme = display.theme.label(),
            relative = display.relative_view_enabled,
        )
    }
}

fn runtime(ctl: &mut RouteController<MemoryHistory>, event: RuntimeEvent) -> Vec<RouteEffect> {
    ctl.dispatch(RouteAction::Runtime(event))
}

fn dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}

#[cfg(test)]
mod tests {
    use folio_exec::backends::StaticBackend;
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(yaml: &str) -> Scenario {
        serde_yaml::from_str(yaml).expect("scenario")
    }

    fn last_lines(trace: &str) -> Vec<&str> {
        trace.lines().collect()
    }

    #[test]
    fn parses_unit_and_valued_steps() {
        let scenario = parse(
            r#"
url: /movers
steps:
  - config:
      tabs: { screener: true, support: true }
  - visit: /support
  - back
  - owners: [alice, bob]
  - refresh_config
"#,
        );

        assert_eq!(scenario.steps.len(), 5);
        assert!(matches!(scenario.steps[2], Step::Back));
        let Step::Config(raw) = &scenario.steps[0] else {
            panic!("expected config step");
        };
        assert_eq!(raw.tabs.get("support"), Some(&true));
    }

    #[test]
    fn replay_without_backend_follows_delivered_events() {
        let scenario = parse(
            r#"
url: /movers
steps:
  - config:
      tabs: { screener: true, support: true }
  - visit: /support
"#,
        );

        let trace = Replay::new(&scenario, None, None)
            .run(&scenario.steps)
            .expect("replay");
        let lines = last_lines(&trace);

        assert!(lines[0].contains("mode=movers"), "{trace}");
        assert!(lines[0].contains("config=pending"), "{trace}");
        assert!(lines[1].contains("/screener"), "{trace}");
        assert!(lines[1].contains("config=loaded"), "{trace}");
        assert!(lines[2].contains("mode=support"), "{trace}");
        assert!(lines[2].contains("phase=stable"), "{trace}");
        assert_eq!(lines[3], "navigations: 2");
    }

    #[test]
    fn replay_with_backend_fetches_on_mount() {
        let backend = StaticBackend::new(
            vec![OwnerSummary::new("alice")],
            vec![GroupSummary::new("kids")],
            serde_json::from_value(serde_json::json!({"tabs": {"owner": true}})).expect("raw"),
        );
        let scenario = parse("url: /\n");

        let trace = Replay::new(&scenario, Some(&backend), None)
            .run(&scenario.steps)
            .expect("replay");

        assert!(trace.contains("/member/alice"), "{trace}");
        assert!(trace.contains("mode=owner owner=alice"), "{trace}");
    }

    #[test]
    fn display_step_saves_preferences() {
        let dir = tempfile::tempdir().expect("tmpdir");
        let store = PreferenceStore::open(dir.path().join("prefs.json")).expect("store");
        let scenario = parse(
            r#"
url: /
steps:
  - display: { theme: dark }
"#,
        );

        let trace = Replay::new(&scenario, None, Some(&store))
            .run(&scenario.steps)
            .expect("replay");

        assert!(trace.contains("theme=dark"), "{trace}");
        let saved = store.load().expect("load").expect("saved preferences");
        assert_eq!(saved.theme, Some(folio_core::config::Theme::Dark));
    }
}
