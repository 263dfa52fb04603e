use std::collections::VecDeque;

use super::actions::RouteAction;
use super::actions::RuntimeEvent;
use super::actions::UserIntent;
use super::config::ConfigStore;
use super::config::DisplaySettings;
use super::navigation::History;
use super::navigation::NavigationEmitter;
use super::reducer::reduce;
use super::reducer::RouteEffect;
use super::state::RouteModel;
use super::state::RouteView;

/// Upper bound on navigations applied for a single dispatch.
pub const SETTLE_LIMIT: usize = 8;

/// Sole writer of the route model. Hosts feed it actions and fulfil the
/// non-navigation effects it hands back.
#[derive(Debug)]
pub struct RouteController<H> {
    model: RouteModel,
    emitter: NavigationEmitter<H>,
    queue: VecDeque<RouteEffect>,
}

impl<H: History> RouteController<H> {
    pub fn new(history: H, config: ConfigStore) -> Self {
        let location = history.current();
        Self {
            model: RouteModel::new(location, config),
            emitter: NavigationEmitter::new(history),
            queue: VecDeque::new(),
        }
    }

    pub fn mount(&mut self) -> Vec<RouteEffect> {
        self.dispatch(RouteAction::Runtime(RuntimeEvent::Mounted))
    }

    pub fn dispatch(&mut self, action: RouteAction) -> Vec<RouteEffect> {
        let mut outbound = self.enqueue(action);
        outbound.extend(self.flush());
        outbound
    }

    /// Reduces `action` but leaves its navigations queued until [`flush`].
    ///
    /// [`flush`]: RouteController::flush
    pub fn enqueue(&mut self, action: RouteAction) -> Vec<RouteEffect> {
        let effects = reduce(&mut self.model, action);
        self.route_effects(effects)
    }

    /// Applies queued navigations. Intents from superseded passes are dropped.
    pub fn flush(&mut self) -> Vec<RouteEffect> {
        let mut outbound = Vec::new();
        let mut applied = 0;
        while let Some(effect) = self.queue.pop_front() {
            let RouteEffect::Navigate { intent, pass } = effect else {
                continue;
            };
            if !self.model.is_current(pass) {
                tracing::debug!(
                    pass,
                    current = self.model.pass,
                    path = %intent.path,
                    "dropping superseded navigation"
                );
                continue;
            }
            if intent.path == self.model.location.to_url() {
                continue;
            }
            if applied == SETTLE_LIMIT {
                tracing::warn!(limit = SETTLE_LIMIT, path = %intent.path, "route did not settle");
                self.queue.clear();
                self.model.pending = None;
                break;
            }
            applied += 1;
            let location = self.emitter.emit(&intent);
            let effects = reduce(
                &mut self.model,
                RouteAction::Runtime(RuntimeEvent::LocationChanged(location)),
            );
            outbound.extend(self.route_effects(effects));
        }
        outbound
    }

    fn route_effects(&mut self, effects: Vec<RouteEffect>) -> Vec<RouteEffect> {
        let mut outbound = Vec::new();
        for effect in effects {
            match effect {
                RouteEffect::Navigate { .. } => self.queue.push_back(effect),
                other => outbound.push(other),
            }
        }
        outbound
    }

    pub fn navigate(&mut self, path: impl Into<String>) -> Vec<RouteEffect> {
        self.dispatch(RouteAction::User(UserIntent::Navigate { path: path.into() }))
    }

    pub fn set_selected_owner(&mut self, owner: impl Into<String>) -> Vec<RouteEffect> {
        self.dispatch(RouteAction::User(UserIntent::SelectOwner(owner.into())))
    }

    pub fn set_selected_group(&mut self, group: impl Into<String>) -> Vec<RouteEffect> {
        self.dispatch(RouteAction::User(UserIntent::SelectGroup(group.into())))
    }

    pub fn back(&mut self) -> Vec<RouteEffect> {
        match self.emitter.history_mut().back() {
            Some(location) => {
                self.dispatch(RouteAction::Runtime(RuntimeEvent::LocationChanged(location)))
            }
            None => Vec::new(),
        }
    }

    pub fn forward(&mut self) -> Vec<RouteEffect> {
        match self.emitter.history_mut().forward() {
            Some(location) => {
                self.dispatch(RouteAction::Runtime(RuntimeEvent::LocationChanged(location)))
            }
            None => Vec::new(),
        }
    }

    pub fn view(&self) -> RouteView {
        self.model.view()
    }

    pub fn display(&self) -> DisplaySettings {
        self.model.config.display()
    }

    pub fn model(&self) -> &RouteModel {
        &self.model
    }

    pub fn history(&self) -> &H {
        self.emitter.history()
    }

    /// Navigations written to history so far.
    pub fn emitted(&self) -> u64 {
        self.emitter.emitted()
    }

    pub fn has_queued_navigation(&self) -> bool {
        !self.queue.is_empty()
    }
}
