//! A single document and its asynchronous load.
//!
//! Loading runs as a task on a tokio runtime: fetch, status check and parse
//! happen off the frame loop, and the parsed tree is staged in a shared slot
//! under a `RwLock`. The frame loop adopts the staged tree with
//! [`BrowserPage::sync`], so the tree itself is only ever touched from the
//! frame loop.
//!
//! Every load bumps a generation counter and gets its own cancellation token.
//! Starting another load on the same page, or dropping the page, cancels the
//! previous one, and a load whose generation is no longer current is dropped
//! before it can commit.

use crate::dom::{format, parse, Element, Node, ParseError};
use crate::engine::{BrowserEvent, ContentRenderer};
use crate::input::PointerState;
use crate::net::fetch;
use crate::render::backend::DrawTarget;
use crate::render::FontHandle;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use url::Url;
use uuid::Uuid;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(Uuid);

impl PageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PageId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for PageId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum PageState {
    #[default]
    Init,
    Loading,
    Loaded,
    Error,
}

impl PageState {
    pub fn name(&self) -> &'static str {
        match self {
            PageState::Init => "INIT",
            PageState::Loading => "LOADING",
            PageState::Loaded => "LOADED",
            PageState::Error => "ERROR",
        }
    }
}

impl Display for PageState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error(transparent)]
    Net(#[from] reqwest::Error),
    #[error("non-200 status code: {0}")]
    Status(u16),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("navigation canceled")]
    Canceled,
}

/// State shared between a page and its load task.
#[derive(Debug, Default)]
struct LoadSlot {
    state: PageState,
    error: Option<String>,
    /// Parsed tree waiting for the frame loop to adopt it.
    staged: Option<Node>,
    generation: u64,
}

fn read(slot: &RwLock<LoadSlot>) -> RwLockReadGuard<'_, LoadSlot> {
    slot.read().unwrap_or_else(PoisonError::into_inner)
}

fn write(slot: &RwLock<LoadSlot>) -> RwLockWriteGuard<'_, LoadSlot> {
    slot.write().unwrap_or_else(PoisonError::into_inner)
}

pub struct BrowserPage {
    id: PageId,
    url: String,
    fonts: FontHandle,
    slot: Arc<RwLock<LoadSlot>>,
    /// Adopted tree; present once a load has been synced.
    renderer: Option<ContentRenderer>,
    /// Bumped every time a new tree is adopted.
    epoch: u64,
    cancel: Option<CancellationToken>,
}

impl std::fmt::Debug for BrowserPage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserPage")
            .field("id", &self.id)
            .field("url", &self.url)
            .field("state", &self.state())
            .field("epoch", &self.epoch)
            .finish()
    }
}

impl BrowserPage {
    pub fn new(url: impl Into<String>, fonts: FontHandle) -> Self {
        Self {
            id: PageId::new(),
            url: url.into(),
            fonts,
            slot: Arc::new(RwLock::new(LoadSlot::default())),
            renderer: None,
            epoch: 0,
            cancel: None,
        }
    }

    /// A page that is already loaded with `root`.
    pub fn with_document(url: impl Into<String>, root: Node, fonts: FontHandle) -> Self {
        let mut page = Self::new(url, fonts);
        write(&page.slot).state = PageState::Loaded;
        page.adopt(root);
        page
    }

    pub fn id(&self) -> PageId {
        self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn state(&self) -> PageState {
        read(&self.slot).state
    }

    /// Human-readable reason the last load failed, when in [`PageState::Error`].
    pub fn load_error(&self) -> Option<String> {
        let slot = read(&self.slot);
        match slot.state {
            PageState::Error => slot.error.clone(),
            _ => None,
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn renderer(&self) -> Option<&ContentRenderer> {
        self.renderer.as_ref()
    }

    pub fn renderer_mut(&mut self) -> Option<&mut ContentRenderer> {
        self.renderer.as_mut()
    }

    pub fn root(&self) -> Option<&Node> {
        self.renderer.as_ref().map(ContentRenderer::root)
    }

    /// Starts loading the page URL on `runtime`, superseding any load in
    /// flight. Returns the load task; an unparsable URL puts the page in the
    /// error state without spawning anything.
    pub fn load(
        &mut self,
        runtime: &Handle,
        client: reqwest::Client,
        events: broadcast::Sender<BrowserEvent>,
    ) -> Result<JoinHandle<()>, LoadError> {
        if let Some(previous) = self.cancel.take() {
            previous.cancel();
        }

        let mut slot = write(&self.slot);
        slot.generation = slot.generation.wrapping_add(1);
        slot.staged = None;
        let generation = slot.generation;

        let url = match Url::parse(&self.url) {
            Ok(url) => url,
            Err(e) => {
                let err = LoadError::InvalidUrl(e);
                log::warn!("cannot load {:?}: {err}", self.url);
                slot.state = PageState::Error;
                slot.error = Some(err.to_string());
                return Err(err);
            }
        };
        slot.state = PageState::Loading;
        slot.error = None;
        drop(slot);

        let cancel = CancellationToken::new();
        self.cancel = Some(cancel.clone());

        let shared = self.slot.clone();
        let page_id = self.id;
        log::info!("loading {url}");

        Ok(runtime.spawn(async move {
            let _ = events.send(BrowserEvent::LoadStarted {
                page_id,
                url: url.clone(),
            });

            let result = tokio::select! {
                _ = cancel.cancelled() => Err(LoadError::Canceled),
                r = fetch_document(&client, url.clone()) => r,
            };

            if let Some(event) = commit(&shared, generation, page_id, url, result) {
                let _ = events.send(event);
            }
        }))
    }

    /// Adopts a freshly loaded tree, if one is staged. Returns whether the
    /// tree changed.
    pub fn sync(&mut self) -> bool {
        let staged = write(&self.slot).staged.take();
        match staged {
            Some(root) => {
                self.adopt(root);
                true
            }
            None => false,
        }
    }

    fn adopt(&mut self, root: Node) {
        self.renderer = Some(ContentRenderer::new(root, self.fonts.clone()));
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Draws the document when loaded. Other states draw nothing.
    pub fn draw(&mut self, target: &mut dyn DrawTarget) {
        if self.state() != PageState::Loaded {
            return;
        }
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.draw(target);
        }
    }

    /// Steps the interaction machine and returns the href to follow, if a
    /// link was clicked. With nested links the outermost one wins.
    pub fn process_mouse_events(&mut self, pointer: &PointerState) -> Option<String> {
        if self.state() != PageState::Loaded {
            return None;
        }
        let renderer = self.renderer.as_mut()?;
        let interaction = renderer.process_click_state(pointer);

        let mut navigate_to = None;
        for id in interaction.clicked {
            let href = renderer
                .find(id)
                .and_then(Node::as_group)
                .and_then(|g| g.link());
            if let Some(href) = href {
                navigate_to = Some(href.to_string());
            }
        }
        navigate_to
    }
}

impl Drop for BrowserPage {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
    }
}

async fn fetch_document(client: &reqwest::Client, url: Url) -> Result<Node, LoadError> {
    let response = fetch(client, url).await?;
    if response.status != 200 {
        return Err(LoadError::Status(response.status));
    }

    let root = parse(&response.body)?;
    log::debug!("parsed DOM tree of {}:\n{}", response.url, format(&root));
    Ok(root)
}

/// Records the outcome of a load, unless a newer load superseded it.
fn commit(
    slot: &RwLock<LoadSlot>,
    generation: u64,
    page_id: PageId,
    url: Url,
    result: Result<Node, LoadError>,
) -> Option<BrowserEvent> {
    let mut slot = write(slot);
    if slot.generation != generation {
        log::info!("dropping superseded load of {url}");
        return Some(BrowserEvent::LoadCanceled { page_id, url });
    }

    match result {
        Ok(root) => {
            log::info!("loaded {url} ({})", root.id());
            slot.state = PageState::Loaded;
            slot.error = None;
            slot.staged = Some(root);
            Some(BrowserEvent::LoadFinished { page_id, url })
        }
        Err(LoadError::Canceled) => {
            log::info!("load of {url} canceled");
            Some(BrowserEvent::LoadCanceled { page_id, url })
        }
        Err(e) => {
            log::error!("load of {url} failed: {e}");
            let error = e.to_string();
            slot.state = PageState::Error;
            slot.error = Some(error.clone());
            Some(BrowserEvent::LoadFailed { page_id, url, error })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{GroupNode, RectNode, TextNode};
    use crate::engine::test_server::{client, route, serve, slow_route};
    use crate::render::{FontMetrics, RenderList};

    const DOC: &str = r#"<g><g href="/next.svg"><text value="next" x="10" y="20" /></g><rect x="0" y="100" width="10" height="10" fill="red" /></g>"#;

    fn fonts() -> FontHandle {
        FontMetrics::default().into_handle()
    }

    fn drain(rx: &mut broadcast::Receiver<BrowserEvent>) -> Vec<BrowserEvent> {
        let mut out = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            out.push(ev);
        }
        out
    }

    #[test]
    fn state_names() {
        assert_eq!(PageState::Init.to_string(), "INIT");
        assert_eq!(PageState::Loading.name(), "LOADING");
        assert_eq!(PageState::Loaded.name(), "LOADED");
        assert_eq!(PageState::Error.name(), "ERROR");
        assert_eq!(PageState::default(), PageState::Init);
    }

    #[tokio::test]
    async fn loads_and_adopts_on_sync() {
        let addr = serve(vec![("/doc.svg", route(200, DOC))]).await;
        let (tx, mut rx) = broadcast::channel(16);
        let mut page = BrowserPage::new(format!("http://{addr}/doc.svg"), fonts());
        assert_eq!(page.state(), PageState::Init);

        let task = page.load(&Handle::current(), client(), tx).unwrap();
        assert_eq!(page.state(), PageState::Loading);
        task.await.unwrap();

        assert_eq!(page.state(), PageState::Loaded);
        assert!(page.root().is_none());
        assert!(page.sync());
        assert!(!page.sync());
        assert_eq!(page.epoch(), 1);
        assert_eq!(page.root().map(|r| r.children().len()), Some(2));

        let events = drain(&mut rx);
        assert!(matches!(events[0], BrowserEvent::LoadStarted { .. }));
        assert!(matches!(events[1], BrowserEvent::LoadFinished { .. }));
        assert!(events.iter().all(|e| e.page_id() == page.id()));
    }

    #[tokio::test]
    async fn non_200_is_an_error() {
        let addr = serve(vec![]).await;
        let (tx, mut rx) = broadcast::channel(16);
        let mut page = BrowserPage::new(format!("http://{addr}/missing.svg"), fonts());

        page.load(&Handle::current(), client(), tx).unwrap().await.unwrap();

        assert_eq!(page.state(), PageState::Error);
        assert_eq!(page.load_error().as_deref(), Some("non-200 status code: 404"));
        assert!(!page.sync());
        assert!(drain(&mut rx)
            .iter()
            .any(|e| matches!(e, BrowserEvent::LoadFailed { error, .. } if error == "non-200 status code: 404")));
    }

    #[tokio::test]
    async fn parse_failure_is_an_error() {
        let addr = serve(vec![("/bad.svg", route(200, "<g>"))]).await;
        let (tx, _rx) = broadcast::channel(16);
        let mut page = BrowserPage::new(format!("http://{addr}/bad.svg"), fonts());

        page.load(&Handle::current(), client(), tx).unwrap().await.unwrap();

        assert_eq!(page.state(), PageState::Error);
        assert!(page.load_error().unwrap().starts_with("parse error:"));
    }

    #[tokio::test]
    async fn invalid_url_fails_without_spawning() {
        let (tx, _rx) = broadcast::channel(16);
        let mut page = BrowserPage::new("not a url", fonts());
        let err = page.load(&Handle::current(), client(), tx).unwrap_err();
        assert!(matches!(err, LoadError::InvalidUrl(_)));
        assert_eq!(page.state(), PageState::Error);
        assert!(page.load_error().unwrap().starts_with("invalid url"));
    }

    #[tokio::test]
    async fn superseded_load_never_commits() {
        let addr = serve(vec![("/slow.svg", slow_route(200, DOC, 200))]).await;
        let (tx, mut rx) = broadcast::channel(16);
        let mut page = BrowserPage::new(format!("http://{addr}/slow.svg"), fonts());

        let first = page.load(&Handle::current(), client(), tx.clone()).unwrap();
        let second = page.load(&Handle::current(), client(), tx).unwrap();
        first.await.unwrap();
        assert_eq!(page.state(), PageState::Loading);
        second.await.unwrap();

        assert_eq!(page.state(), PageState::Loaded);
        assert!(page.sync());
        assert_eq!(page.epoch(), 1);

        let events = drain(&mut rx);
        let canceled = events.iter().filter(|e| matches!(e, BrowserEvent::LoadCanceled { .. })).count();
        let finished = events.iter().filter(|e| matches!(e, BrowserEvent::LoadFinished { .. })).count();
        assert_eq!((canceled, finished), (1, 1));
    }

    #[tokio::test]
    async fn dropping_the_page_cancels_its_load() {
        let addr = serve(vec![("/slow.svg", slow_route(200, DOC, 5_000))]).await;
        let (tx, mut rx) = broadcast::channel(16);
        let mut page = BrowserPage::new(format!("http://{addr}/slow.svg"), fonts());

        let task = page.load(&Handle::current(), client(), tx).unwrap();
        drop(page);
        task.await.unwrap();

        let events = drain(&mut rx);
        assert!(matches!(events.last(), Some(BrowserEvent::LoadCanceled { .. })));
    }

    #[test]
    fn link_click_returns_outermost_href() {
        let inner: Node = GroupNode::new(vec![RectNode::new(0.0, 0.0, 10.0, 10.0).into()])
            .with_href("/inner")
            .into();
        let outer: Node = GroupNode::new(vec![inner]).with_href("/outer").into();
        let mut page = BrowserPage::with_document("http://localhost/", outer, fonts());

        assert_eq!(page.process_mouse_events(&PointerState::pressed(5.0, 5.0)), None);
        assert_eq!(
            page.process_mouse_events(&PointerState::at(5.0, 5.0)).as_deref(),
            Some("/outer")
        );
    }

    #[test]
    fn draws_only_when_loaded() {
        let root: Node = TextNode::new(0.0, 20.0, "hi").into();
        let mut page = BrowserPage::with_document("http://localhost/", root, fonts());
        let mut list = RenderList::new(fonts());
        page.draw(&mut list);
        assert_eq!(list.texts(), vec!["hi"]);

        let mut empty = BrowserPage::new("http://localhost/", fonts());
        let mut list = RenderList::new(fonts());
        empty.draw(&mut list);
        assert!(list.items.is_empty());
    }
}
