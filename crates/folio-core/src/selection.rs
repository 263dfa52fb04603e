use super::route::ResolvedRoute;
use super::state::Carried;
use super::state::GroupSummary;
use super::state::Mode;
use super::state::OwnerSummary;
use super::state::Selection;

pub fn default_owner(current: &str, owners: &[OwnerSummary]) -> String {
    default_from(current, owners.iter().map(|owner| owner.owner.as_str()))
}

pub fn default_group(current: &str, groups: &[GroupSummary]) -> String {
    default_from(current, groups.iter().map(|group| group.slug.as_str()))
}

fn default_from<'a>(current: &str, mut keys: impl Iterator<Item = &'a str> + Clone) -> String {
    if !current.is_empty() && keys.clone().any(|key| key == current) {
        return current.to_string();
    }
    keys.next().unwrap_or_default().to_string()
}

/// Whether `selection` differs from the slug `mode` encodes in the observed URL.
pub fn rewrite_needed(mode: Mode, observed: &ResolvedRoute, selection: &Selection) -> bool {
    match mode.carries() {
        Carried::Owner => observed.owner != selection.owner,
        Carried::Group => observed.group != selection.group,
        Carried::Nothing => false,
    }
}
