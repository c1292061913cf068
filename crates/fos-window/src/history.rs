//! History API
//!
//! Session history entries behind pushState, replaceState, back, forward, go.

/// History entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub url: String,
    pub title: String,
    pub state: Option<String>, // JSON-serialized state
}

/// History manager
#[derive(Debug)]
pub struct HistoryManager {
    entries: Vec<HistoryEntry>,
    current: usize,
}

impl HistoryManager {
    pub fn new(initial_url: &str) -> Self {
        Self {
            entries: vec![HistoryEntry {
                url: initial_url.to_string(),
                title: String::new(),
                state: None,
            }],
            current: 0,
        }
    }

    /// Push a new history entry
    pub fn push_state(&mut self, state: Option<String>, title: String, url: String) {
        // Remove forward history
        self.entries.truncate(self.current + 1);

        self.entries.push(HistoryEntry { url, title, state });
        self.current = self.entries.len() - 1;
    }

    /// Replace current entry
    pub fn replace_state(&mut self, state: Option<String>, title: String, url: String) {
        if let Some(entry) = self.entries.get_mut(self.current) {
            entry.url = url;
            entry.title = title;
            entry.state = state;
        }
    }

    /// Go back
    pub fn back(&mut self) -> Option<&HistoryEntry> {
        self.go(-1)
    }

    /// Go forward
    pub fn forward(&mut self) -> Option<&HistoryEntry> {
        self.go(1)
    }

    /// Go to specific offset. Out-of-range and zero offsets do nothing.
    pub fn go(&mut self, delta: i32) -> Option<&HistoryEntry> {
        if delta == 0 {
            return None;
        }
        let target = self.current.checked_add_signed(delta as isize)?;
        if target >= self.entries.len() {
            return None;
        }
        self.current = target;
        Some(&self.entries[self.current])
    }

    /// Get current entry
    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.current]
    }

    /// Get history length
    pub fn length(&self) -> usize {
        self.entries.len()
    }
}
