use super::config::TabsConfig;
use super::state::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    #[error("no views are available in the current configuration")]
    NoViewsAvailable,
}

/// Returns `candidate` when available, otherwise the fallback.
pub fn authorize(candidate: Mode, tabs: &TabsConfig) -> Result<Mode, GateError> {
    if tabs.is_available(candidate) {
        return Ok(candidate);
    }
    fallback(tabs)
}

/// Available mode with the lowest priority rank.
pub fn fallback(tabs: &TabsConfig) -> Result<Mode, GateError> {
    tabs.available_modes()
        .min_by_key(|mode| mode.priority())
        .ok_or(GateError::NoViewsAvailable)
}
