use pretty_assertions::assert_eq;

pub(super) use super::reduce;
pub(super) use super::RouteEffect;
pub(super) use crate::actions::FetchFailure;
pub(super) use crate::actions::FetchTarget;
pub(super) use crate::actions::RouteAction;
pub(super) use crate::actions::RuntimeEvent;
pub(super) use crate::actions::UserIntent;
pub(super) use crate::config::ConfigStore;
pub(super) use crate::config::DisplayOverrides;
pub(super) use crate::config::RawConfig;
pub(super) use crate::config::Theme;
pub(super) use crate::navigation::NavigationIntent;
pub(super) use crate::state::GroupSummary;
pub(super) use crate::state::Location;
pub(super) use crate::state::Mode;
pub(super) use crate::state::OwnerSummary;
pub(super) use crate::state::RouteModel;
pub(super) use crate::state::RoutePhase;

mod arrival_order;

fn model(url: &str) -> RouteModel {
    RouteModel::new(Location::parse(url), ConfigStore::new())
}

/// Mounted model, effects of the mount discarded.
fn mounted(url: &str) -> RouteModel {
    let mut model = model(url);
    reduce(&mut model, RouteAction::Runtime(RuntimeEvent::Mounted));
    model
}

fn raw(json: serde_json::Value) -> RawConfig {
    serde_json::from_value(json).expect("raw config")
}

fn owners(names: &[&str]) -> Vec<OwnerSummary> {
    names.iter().map(|name| OwnerSummary::new(*name)).collect()
}

fn groups(slugs: &[&str]) -> Vec<GroupSummary> {
    slugs.iter().map(|slug| GroupSummary::new(*slug)).collect()
}

fn run_runtime(model: &mut RouteModel, event: RuntimeEvent) -> Vec<RouteEffect> {
    reduce(model, RouteAction::Runtime(event))
}

fn config_received(model: &mut RouteModel, json: serde_json::Value) -> Vec<RouteEffect> {
    run_runtime(model, RuntimeEvent::ConfigReceived(Ok(raw(json))))
}

fn navigations(effects: &[RouteEffect]) -> Vec<NavigationIntent> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            RouteEffect::Navigate { intent, .. } => Some(intent.clone()),
            _ => None,
        })
        .collect()
}

/// Applies every navigation in `effects` the way a router would and keeps
/// feeding location changes back until none are emitted. Returns the number
/// of navigations applied.
fn settle(model: &mut RouteModel, effects: Vec<RouteEffect>) -> usize {
    let mut pending = navigations(&effects);
    let mut applied = 0;
    while let Some(intent) = pending.pop() {
        applied += 1;
        assert!(applied <= 2, "route did not settle: {:?}", model.location);
        let effects = run_runtime(
            model,
            RuntimeEvent::LocationChanged(Location::parse(&intent.path)),
        );
        pending.extend(navigations(&effects));
    }
    applied
}

fn assert_route(model: &RouteModel, mode: Mode, owner: &str, group: &str) {
    assert_eq!(model.route.mode, mode);
    assert_eq!(model.route.selection.owner, owner);
    assert_eq!(model.route.selection.group, group);
}
