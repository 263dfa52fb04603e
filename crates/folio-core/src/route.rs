//! URL ⇄ mode mapping. Everything here is pure and total: any input string
//! resolves to some mode, unknown first segments land on [`Mode::CATCH_ALL`].

use super::state::Carried;
use super::state::Location;
use super::state::Mode;
use super::state::Selection;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub mode: Mode,
    pub owner: String,
    pub group: String,
}

impl ResolvedRoute {
    fn bare(mode: Mode) -> Self {
        Self {
            mode,
            owner: String::new(),
            group: String::new(),
        }
    }

    /// The slug this route's mode encodes in the URL, if any.
    pub fn carried_slug(&self) -> Option<&str> {
        match self.mode.carries() {
            Carried::Owner => Some(&self.owner),
            Carried::Group => Some(&self.group),
            Carried::Nothing => None,
        }
    }
}

pub fn resolve_location(location: &Location) -> ResolvedRoute {
    resolve(&location.pathname, &location.search)
}

pub fn resolve(pathname: &str, search: &str) -> ResolvedRoute {
    let mut segments = pathname.split('/').filter(|segment| !segment.is_empty());
    let first = segments.next().unwrap_or("");
    let second = segments.next().map(decode_component).unwrap_or_default();

    let Some(mode) = Mode::from_path_segment(first) else {
        return ResolvedRoute::bare(Mode::CATCH_ALL);
    };

    let mut route = ResolvedRoute::bare(mode);
    match mode {
        Mode::Group => {
            route.group = query_param(search, "group").unwrap_or_default();
        }
        Mode::Instrument => route.group = second,
        Mode::Owner | Mode::Performance => route.owner = second,
        _ => {}
    }
    route
}

/// Canonical URL (path plus query) for a mode and selection.
pub fn path_for(mode: Mode, selection: &Selection) -> String {
    match mode.carries() {
        Carried::Group if mode == Mode::Group => {
            if selection.group.is_empty() {
                "/".to_string()
            } else {
                format!("/?group={}", urlencoding::encode(&selection.group))
            }
        }
        Carried::Group => with_slug(mode.path_segment(), &selection.group),
        Carried::Owner => with_slug(mode.path_segment(), &selection.owner),
        Carried::Nothing => format!("/{}", mode.path_segment()),
    }
}

fn with_slug(segment: &str, slug: &str) -> String {
    if slug.is_empty() {
        format!("/{segment}")
    } else {
        format!("/{segment}/{}", urlencoding::encode(slug))
    }
}

fn query_param(search: &str, name: &str) -> Option<String> {
    search.trim_start_matches('?').split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        (decode_component(&key.replace('+', " ")) == name)
            .then(|| decode_component(&value.replace('+', " ")))
    })
}

/// Percent-decodes one URL component. Escapes that do not form valid UTF-8
/// leave the component as written.
fn decode_component(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_string(),
    }
}
