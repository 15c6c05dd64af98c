mod browser;
mod content_renderer;
mod devtools;
mod events;
mod history;
mod page;

#[cfg(test)]
mod test_server;

pub use browser::Browser;
pub use content_renderer::{ContentRenderer, Interaction, NodeCallback};
pub use devtools::Devtools;
pub use events::BrowserEvent;
pub use history::{History, HistoryError};
pub use page::{BrowserPage, LoadError, PageId, PageState};
