//! Browser lifecycle events.
//!
//! Events are broadcast over a `tokio::sync::broadcast` channel; hosts obtain
//! a receiver with [`Browser::subscribe`](crate::engine::Browser::subscribe).
//! Every event carries the [`PageId`] of the page it concerns, so a host can
//! tell events of a superseded page from the current one.

use crate::engine::PageId;
use std::fmt::Display;
use url::Url;

#[derive(Debug, Clone, PartialEq)]
pub enum BrowserEvent {
    /// A navigation was requested (URL bar, link click, back or reload).
    NavigationRequested { page_id: PageId, url: String },
    /// Fetching has started.
    LoadStarted { page_id: PageId, url: Url },
    /// The document was fetched and parsed; its tree is staged for the next
    /// frame.
    LoadFinished { page_id: PageId, url: Url },
    /// Fetching or parsing failed.
    LoadFailed { page_id: PageId, url: Url, error: String },
    /// The load was canceled or superseded before it could commit.
    LoadCanceled { page_id: PageId, url: Url },
}

impl BrowserEvent {
    pub fn page_id(&self) -> PageId {
        match self {
            BrowserEvent::NavigationRequested { page_id, .. }
            | BrowserEvent::LoadStarted { page_id, .. }
            | BrowserEvent::LoadFinished { page_id, .. }
            | BrowserEvent::LoadFailed { page_id, .. }
            | BrowserEvent::LoadCanceled { page_id, .. } => *page_id,
        }
    }
}

impl Display for BrowserEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BrowserEvent::NavigationRequested { url, .. } => write!(f, "navigation requested: {url}"),
            BrowserEvent::LoadStarted { url, .. } => write!(f, "load started: {url}"),
            BrowserEvent::LoadFinished { url, .. } => write!(f, "load finished: {url}"),
            BrowserEvent::LoadFailed { url, error, .. } => write!(f, "load failed: {url}: {error}"),
            BrowserEvent::LoadCanceled { url, .. } => write!(f, "load canceled: {url}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_page_id() {
        let page_id = PageId::new();
        let url = Url::parse("http://localhost/a.svg").unwrap();
        let ev = BrowserEvent::LoadFailed {
            page_id,
            url,
            error: "status 404".into(),
        };
        assert_eq!(ev.page_id(), page_id);
        assert_eq!(ev.to_string(), "load failed: http://localhost/a.svg: status 404");
    }
}
