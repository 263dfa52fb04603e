use folio_core::DisplayOverrides;
use folio_core::FetchFailure;
use folio_core::FetchTarget;
use folio_core::History;
use folio_core::RouteAction;
use folio_core::RouteController;
use folio_core::RouteEffect;
use folio_core::RuntimeEvent;

use crate::contracts::PortfolioBackend;

/// Runs one fetch and wraps the outcome as the runtime event the reducer
/// expects for it.
pub fn execute_fetch(backend: &dyn PortfolioBackend, target: FetchTarget) -> RouteAction {
    tracing::debug!(backend = backend.name(), target = target.label(), "fetching");
    let event = match target {
        FetchTarget::Config => RuntimeEvent::ConfigReceived(backend.fetch_config().map_err(failure)),
        FetchTarget::Owners => RuntimeEvent::OwnersReceived(backend.fetch_owners().map_err(failure)),
        FetchTarget::Groups => RuntimeEvent::GroupsReceived(backend.fetch_groups().map_err(failure)),
    };
    RouteAction::Runtime(event)
}

fn failure(err: crate::contracts::BackendError) -> FetchFailure {
    tracing::warn!(error = %err, "backend fetch failed");
    FetchFailure::from(err)
}

/// What was left for the host after fetches were fulfilled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrainReport {
    pub fetches: usize,
    pub frames: usize,
    pub persist: Vec<DisplayOverrides>,
}

/// Fulfils every fetch in `effects` against `backend`, feeding the results
/// back into the controller until no fetch remains.
pub fn drain_effects<H: History>(
    controller: &mut RouteController<H>,
    backend: &dyn PortfolioBackend,
    effects: Vec<RouteEffect>,
) -> DrainReport {
    let mut report = DrainReport::default();
    let mut pending = effects;
    while !pending.is_empty() {
        let mut next = Vec::new();
        for effect in pending {
            match effect {
                RouteEffect::Fetch(target) => {
                    report.fetches += 1;
                    next.extend(controller.dispatch(execute_fetch(backend, target)));
                }
                RouteEffect::PersistPreferences(overrides) => report.persist.push(overrides),
                RouteEffect::RequestFrame => report.frames += 1,
                RouteEffect::Navigate { .. } => {}
            }
        }
        pending = next;
    }
    report
}

#[cfg(test)]
mod tests {
    use folio_core::ConfigStore;
    use folio_core::GroupSummary;
    use folio_core::MemoryHistory;
    use folio_core::Mode;
    use folio_core::OwnerSummary;
    use folio_core::RawConfig;
    use folio_core::RoutePhase;
    use folio_core::UserIntent;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::backends::StaticBackend;

    fn config(json: serde_json::Value) -> RawConfig {
        serde_json::from_value(json).expect("raw config")
    }

    fn backend() -> StaticBackend {
        StaticBackend::new(
            vec![OwnerSummary::new("alice"), OwnerSummary::new("bob")],
            vec![GroupSummary::new("kids"), GroupSummary::new("all")],
            config(serde_json::json!({"tabs": {"group": true, "owner": true}})),
        )
    }

    #[test]
    fn execute_fetch_maps_failures_to_runtime_errors() {
        let backend = backend().fail_config("timeout");

        let action = execute_fetch(&backend, FetchTarget::Config);

        let RouteAction::Runtime(RuntimeEvent::ConfigReceived(Err(failure))) = action else {
            panic!("expected failed config receipt, got {action:?}");
        };
        assert_eq!(failure.message, "config unavailable: timeout");
    }

    #[test]
    fn mount_and_drain_settles_on_defaulted_route() {
        let backend = backend();
        let mut ctl = RouteController::new(MemoryHistory::new("/member"), ConfigStore::new());

        let effects = ctl.mount();
        let report = drain_effects(&mut ctl, &backend, effects);

        assert_eq!(report.fetches, 3);
        let view = ctl.view();
        assert_eq!(view.mode, Mode::Owner);
        assert_eq!(view.selected_owner, "alice");
        assert_eq!(view.phase, RoutePhase::Stable);
        assert_eq!(ctl.model().location.to_url(), "/member/alice");
    }

    #[test]
    fn failed_config_without_fallback_blocks_every_view() {
        let backend = backend().fail_config("down");
        let mut ctl = RouteController::new(MemoryHistory::new("/"), ConfigStore::new());

        let effects = ctl.mount();
        drain_effects(&mut ctl, &backend, effects);

        assert_eq!(ctl.view().phase, RoutePhase::NoViewsAvailable);
    }

    #[test]
    fn refresh_picks_up_new_config() {
        let mut backend = backend();
        let mut ctl = RouteController::new(MemoryHistory::new("/member/bob"), ConfigStore::new());
        let effects = ctl.mount();
        drain_effects(&mut ctl, &backend, effects);

        backend.set_config(config(serde_json::json!({"tabs": {"group": true}})));
        let effects = ctl.dispatch(RouteAction::User(UserIntent::RefreshConfig));
        let report = drain_effects(&mut ctl, &backend, effects);

        assert_eq!(report.fetches, 1);
        assert_eq!(ctl.view().mode, Mode::Group);
        assert_eq!(ctl.view().selected_owner, "bob");
        assert_eq!(ctl.model().location.to_url(), "/?group=kids");
    }
}
