use super::actions::FetchTarget;
use super::actions::RouteAction;
use super::actions::RuntimeEvent;
use super::actions::UserIntent;
use super::config::ConfigStatus;
use super::config::DisplayOverrides;
use super::gate::authorize;
use super::navigation::NavigationIntent;
use super::route::path_for;
use super::route::resolve_location;
use super::route::ResolvedRoute;
use super::selection::default_group;
use super::selection::default_owner;
use super::selection::rewrite_needed;
use super::state::Carried;
use super::state::Location;
use super::state::Mode;
use super::state::PendingNavigation;
use super::state::RouteModel;
use super::state::RoutePhase;
use super::state::RouteState;
use super::state::Selection;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteEffect {
    /// Write a URL. Only valid while `pass` is still the model's current pass.
    Navigate {
        intent: NavigationIntent,
        pass: u64,
    },
    Fetch(FetchTarget),
    PersistPreferences(DisplayOverrides),
    RequestFrame,
}

pub fn reduce(model: &mut RouteModel, action: RouteAction) -> Vec<RouteEffect> {
    match action {
        RouteAction::User(intent) => reduce_user(model, intent),
        RouteAction::Runtime(event) => reduce_runtime(model, event),
    }
}

fn reduce_user(model: &mut RouteModel, intent: UserIntent) -> Vec<RouteEffect> {
    match intent {
        UserIntent::Navigate { path } => push_navigation(model, &path),
        UserIntent::SelectOwner(owner) => {
            let mode = match model.route.mode.carries() {
                Carried::Owner => model.route.mode,
                _ => Mode::Owner,
            };
            let selection = Selection {
                owner,
                group: model.route.selection.group.clone(),
            };
            push_navigation(model, &path_for(mode, &selection))
        }
        UserIntent::SelectGroup(group) => {
            let mode = match model.route.mode.carries() {
                Carried::Group => model.route.mode,
                _ => Mode::Group,
            };
            let selection = Selection {
                owner: model.route.selection.owner.clone(),
                group,
            };
            push_navigation(model, &path_for(mode, &selection))
        }
        UserIntent::RefreshConfig => {
            model.config.begin_refresh();
            vec![RouteEffect::Fetch(FetchTarget::Config)]
        }
        UserIntent::RefreshLists => vec![
            RouteEffect::Fetch(FetchTarget::Owners),
            RouteEffect::Fetch(FetchTarget::Groups),
        ],
        UserIntent::SetDisplayOverrides(overrides) => {
            let changed = model.config.set_overrides(overrides);
            let mut effects = vec![RouteEffect::PersistPreferences(overrides)];
            if changed {
                effects.push(RouteEffect::RequestFrame);
            }
            effects
        }
    }
}

fn reduce_runtime(model: &mut RouteModel, event: RuntimeEvent) -> Vec<RouteEffect> {
    match event {
        RuntimeEvent::Mounted => {
            if model.phase != RoutePhase::Uninitialized {
                return Vec::new();
            }
            let mut effects = resolve_pass(model);
            if model.config.status() == ConfigStatus::Pending {
                effects.push(RouteEffect::Fetch(FetchTarget::Config));
            }
            if !model.owners.loaded {
                effects.push(RouteEffect::Fetch(FetchTarget::Owners));
            }
            if !model.groups.loaded {
                effects.push(RouteEffect::Fetch(FetchTarget::Groups));
            }
            effects
        }
        RuntimeEvent::LocationChanged(location) => {
            model.location = location;
            if model.phase == RoutePhase::Uninitialized {
                return Vec::new();
            }
            resolve_pass(model)
        }
        RuntimeEvent::ConfigReceived(result) => {
            let change = model.config.receive(result);
            if model.phase == RoutePhase::Uninitialized {
                return Vec::new();
            }
            if change.tabs_changed {
                rerun_for_data(model)
            } else if change.display_changed {
                vec![RouteEffect::RequestFrame]
            } else {
                Vec::new()
            }
        }
        RuntimeEvent::OwnersReceived(result) => {
            let changed = match result {
                Ok(owners) => model.owners.receive(owners),
                Err(err) => {
                    tracing::warn!(error = %err, "owner list unavailable");
                    model.owners.fail(err.message);
                    false
                }
            };
            rerun_if(model, changed)
        }
        RuntimeEvent::GroupsReceived(result) => {
            let changed = match result {
                Ok(groups) => model.groups.receive(groups),
                Err(err) => {
                    tracing::warn!(error = %err, "group list unavailable");
                    model.groups.fail(err.message);
                    false
                }
            };
            rerun_if(model, changed)
        }
    }
}

fn rerun_if(model: &mut RouteModel, changed: bool) -> Vec<RouteEffect> {
    if changed && model.phase != RoutePhase::Uninitialized {
        rerun_for_data(model)
    } else {
        Vec::new()
    }
}

/// Only a location change supersedes a queued user push. Data arriving in
/// between is picked up by the pass that push's location change starts.
fn rerun_for_data(model: &mut RouteModel) -> Vec<RouteEffect> {
    if let Some(pending) = model.pending.as_ref().filter(|pending| pending.is_user_push()) {
        tracing::debug!(
            pass = pending.pass,
            path = %pending.path,
            "data changed under a queued navigation; deferring"
        );
        return vec![RouteEffect::RequestFrame];
    }
    resolve_pass(model)
}

fn push_navigation(model: &mut RouteModel, path: &str) -> Vec<RouteEffect> {
    let path = Location::parse(path).to_url();
    if path == model.location.to_url() {
        return Vec::new();
    }
    model.pass += 1;
    model.pending = Some(PendingNavigation {
        pass: model.pass,
        path: path.clone(),
        replace: false,
    });
    vec![RouteEffect::Navigate {
        intent: NavigationIntent::push(path),
        pass: model.pass,
    }]
}

/// One re-entry into `Resolving`. Emits at most one corrective navigation;
/// a second pass over its target with the same config and lists is stable.
fn resolve_pass(model: &mut RouteModel) -> Vec<RouteEffect> {
    model.pass += 1;
    model.phase = RoutePhase::Resolving;
    model.pending = None;
    let pass = model.pass;

    let candidate = resolve_location(&model.location);
    let mode = match model.config.effective_tabs() {
        // First paint: trust the URL until a config exists.
        None => candidate.mode,
        Some(tabs) => match authorize(candidate.mode, tabs) {
            Ok(mode) => mode,
            Err(err) => {
                tracing::warn!(
                    pass,
                    url = %model.location.to_url(),
                    error = %err,
                    "route blocked"
                );
                model.phase = RoutePhase::NoViewsAvailable;
                return vec![RouteEffect::RequestFrame];
            }
        },
    };

    let carried = carry_selection(&model.route.selection, &candidate);
    let selection = default_selection(model, carried);
    let redirect = mode != candidate.mode || rewrite_needed(mode, &candidate, &selection);
    let path = path_for(mode, &selection);
    tracing::debug!(
        pass,
        candidate = candidate.mode.key(),
        authorized = mode.key(),
        redirect,
        "resolved route"
    );
    model.route = RouteState { mode, selection };

    if !redirect || path == model.location.to_url() {
        model.phase = RoutePhase::Stable;
        return vec![RouteEffect::RequestFrame];
    }

    model.pending = Some(PendingNavigation {
        pass,
        path: path.clone(),
        replace: true,
    });
    vec![
        RouteEffect::Navigate {
            intent: NavigationIntent::replace(path),
            pass,
        },
        RouteEffect::RequestFrame,
    ]
}

/// URL slugs win for the slug the candidate carries; the rest is kept.
fn carry_selection(previous: &Selection, candidate: &ResolvedRoute) -> Selection {
    let mut selection = previous.clone();
    match candidate.mode.carries() {
        Carried::Owner => selection.owner = candidate.owner.clone(),
        Carried::Group => selection.group = candidate.group.clone(),
        Carried::Nothing => {}
    }
    selection
}

/// Lists that never loaded leave the selection alone.
fn default_selection(model: &RouteModel, carried: Selection) -> Selection {
    Selection {
        owner: match model.owners.known() {
            Some(owners) => default_owner(&carried.owner, owners),
            None => carried.owner,
        },
        group: match model.groups.known() {
            Some(groups) => default_group(&carried.group, groups),
            None => carried.group,
        },
    }
}

#[cfg(test)]
mod tests;
