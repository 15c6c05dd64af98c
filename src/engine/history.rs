/// Back-navigation history: a stack of visited URLs, most recent last.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    entries: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    #[error("can't go back; already on last page")]
    AtFirstPage,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, url: impl Into<String>) {
        self.entries.push(url.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn current(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn can_go_back(&self) -> bool {
        self.entries.len() > 1
    }

    /// Drops the current entry and removes and returns the one before it.
    ///
    /// The returned URL is no longer in the history; navigating to it pushes
    /// it again.
    pub fn pop_back(&mut self) -> Result<String, HistoryError> {
        if !self.can_go_back() {
            return Err(HistoryError::AtFirstPage);
        }
        self.entries.pop();
        self.entries.pop().ok_or(HistoryError::AtFirstPage)
    }
}
