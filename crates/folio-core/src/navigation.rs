use super::state::Location;

/// A requested URL change. `replace` is set for corrective navigations so
/// they do not add back-history entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationIntent {
    pub path: String,
    pub replace: bool,
}

impl NavigationIntent {
    pub fn push(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            replace: false,
        }
    }

    pub fn replace(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            replace: true,
        }
    }
}

/// Browser-history surface the emitter writes to.
pub trait History {
    fn current(&self) -> Location;
    fn push(&mut self, path: &str);
    fn replace(&mut self, path: &str);
    /// Moves back one entry; `None` at the start of history.
    fn back(&mut self) -> Option<Location>;
    fn forward(&mut self) -> Option<Location>;
}

#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<String>,
    cursor: usize,
}

impl MemoryHistory {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![initial.into()],
            cursor: 0,
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl History for MemoryHistory {
    fn current(&self) -> Location {
        self.entries
            .get(self.cursor)
            .map(|url| Location::parse(url))
            .unwrap_or_else(|| Location::new("/", ""))
    }

    fn push(&mut self, path: &str) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(path.to_string());
        self.cursor = self.entries.len() - 1;
    }

    fn replace(&mut self, path: &str) {
        match self.entries.get_mut(self.cursor) {
            Some(entry) => *entry = path.to_string(),
            None => self.push(path),
        }
    }

    fn back(&mut self) -> Option<Location> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.current())
    }

    fn forward(&mut self) -> Option<Location> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.current())
    }
}

#[derive(Debug)]
pub struct NavigationEmitter<H> {
    history: H,
    emitted: u64,
}

impl<H: History> NavigationEmitter<H> {
    pub fn new(history: H) -> Self {
        Self {
            history,
            emitted: 0,
        }
    }

    /// Writes the intent and returns the location the history now shows.
    pub fn emit(&mut self, intent: &NavigationIntent) -> Location {
        if intent.replace {
            self.history.replace(&intent.path);
        } else {
            self.history.push(&intent.path);
        }
        self.emitted += 1;
        tracing::debug!(path = %intent.path, replace = intent.replace, "navigation emitted");
        self.history.current()
    }

    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn push_truncates_forward_entries() {
        let mut history = MemoryHistory::new("/");
        history.push("/screener");
        history.push("/movers");
        assert_eq!(history.back().map(|loc| loc.to_url()), Some("/screener".to_string()));

        history.push("/support");

        assert_eq!(history.entries(), ["/", "/screener", "/support"]);
        assert!(history.forward().is_none());
    }

    #[test]
    fn replace_does_not_grow_history() {
        let mut emitter = NavigationEmitter::new(MemoryHistory::new("/movers"));

        let location = emitter.emit(&NavigationIntent::replace("/support"));

        assert_eq!(location, Location::new("/support", ""));
        assert_eq!(emitter.history().entries(), ["/support"]);
        assert_eq!(emitter.emitted(), 1);
    }

    #[test]
    fn back_stops_at_first_entry() {
        let mut history = MemoryHistory::new("/?group=kids");
        assert!(history.back().is_none());
        assert_eq!(history.current(), Location::new("/", "?group=kids"));
    }
}
