//! Top-level browser: chrome, navigation and history.
//!
//! The chrome (BACK button, page state, error text and the URL bar) is an
//! ordinary node tree owned by its own [`ContentRenderer`], drawn above the
//! current page. Each frame the host feeds pointer and key input through
//! [`Browser::process_mouse_events`] and [`Browser::process_key`], then calls
//! [`Browser::draw`].

use crate::config::EngineConfig;
use crate::dom::{Element, GroupNode, Node, NodeId, TextInputNode, TextNode};
use crate::engine::{BrowserEvent, BrowserPage, ContentRenderer, History, PageState};
use crate::errors::EngineError;
use crate::input::{Key, KeyInput, PointerState};
use crate::net::build_client;
use crate::render::backend::DrawTarget;
use crate::render::{FontHandle, Viewport};
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use url::Url;

const BACK_POS: (f64, f64) = (10.0, 30.0);
const STATE_POS: (f64, f64) = (80.0, 30.0);
const ERROR_POS: (f64, f64) = (10.0, 80.0);
const URL_BAR_X: f64 = 170.0;
const URL_BAR_Y: f64 = 10.0;
const URL_BAR_MARGIN: f64 = 5.0;

/// Ids of the chrome nodes inside the chrome renderer's tree.
#[derive(Debug, Clone, Copy)]
struct Chrome {
    back: NodeId,
    state: NodeId,
    error: NodeId,
    url_input: NodeId,
}

pub struct Browser {
    config: EngineConfig,
    runtime: Handle,
    client: reqwest::Client,
    fonts: FontHandle,
    viewport: Viewport,
    page: BrowserPage,
    history: History,
    events: broadcast::Sender<BrowserEvent>,
    chrome_renderer: ContentRenderer,
    chrome: Chrome,
    load_task: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for Browser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Browser")
            .field("page", &self.page)
            .field("history", &self.history)
            .field("viewport", &self.viewport)
            .finish()
    }
}

impl Browser {
    /// Creates a browser and starts loading the configured initial URL.
    ///
    /// Loads are spawned on `runtime`; the browser itself is driven from the
    /// caller's frame loop.
    pub fn new(config: EngineConfig, runtime: Handle) -> Result<Self, EngineError> {
        config.validate()?;
        let client = build_client(&config)?;
        let fonts = config.font_handle();
        let (events, _) = broadcast::channel(config.channel_capacity);

        let back = TextNode::new(BACK_POS.0, BACK_POS.1, "BACK");
        let state = TextNode::new(STATE_POS.0, STATE_POS.1, PageState::Init.name());
        let error = TextNode::new(ERROR_POS.0, ERROR_POS.1, "").fill("red");
        let url_input = TextInputNode::new(URL_BAR_X, URL_BAR_Y, 0.0);
        let chrome = Chrome {
            back: back.id(),
            state: state.id(),
            error: error.id(),
            url_input: url_input.id(),
        };
        let root = GroupNode::new(vec![state.into(), error.into(), back.into(), url_input.into()]);

        let mut browser = Self {
            runtime,
            client,
            viewport: config.viewport,
            page: BrowserPage::new(config.initial_url.clone(), fonts.clone()),
            history: History::new(),
            events,
            chrome_renderer: ContentRenderer::new(root.into(), fonts.clone()),
            chrome,
            fonts,
            load_task: None,
            config,
        };

        let initial = browser.config.initial_url.clone();
        browser.navigate_to(&initial);
        Ok(browser)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn fonts(&self) -> &FontHandle {
        &self.fonts
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn page(&self) -> &BrowserPage {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut BrowserPage {
        &mut self.page
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn url_input(&self) -> Option<&TextInputNode> {
        self.chrome_renderer
            .find(self.chrome.url_input)
            .and_then(Node::as_text_input)
    }

    fn url_input_mut(&mut self) -> Option<&mut TextInputNode> {
        self.chrome_renderer
            .find_mut(self.chrome.url_input)
            .and_then(Node::as_text_input_mut)
    }

    fn chrome_text_mut(&mut self, id: NodeId) -> Option<&mut TextNode> {
        self.chrome_renderer.find_mut(id).and_then(Node::as_text_mut)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BrowserEvent> {
        self.events.subscribe()
    }

    /// Waits for the load started by the most recent navigation to settle.
    pub async fn wait_for_load(&mut self) {
        if let Some(task) = self.load_task.take() {
            if let Err(e) = task.await {
                log::warn!("load task ended abnormally: {e}");
            }
        }
    }

    /// Opens `url` in a new page and records it in the history.
    pub fn navigate_to(&mut self, url: &str) {
        log::info!("navigate to {url}");
        self.page = BrowserPage::new(url, self.fonts.clone());
        let _ = self.events.send(BrowserEvent::NavigationRequested {
            page_id: self.page.id(),
            url: url.to_string(),
        });
        self.start_load();

        if let Some(input) = self.url_input_mut() {
            input.set_value(url);
        }
        self.history.push(url);
    }

    pub fn navigate_back(&mut self) -> Result<(), EngineError> {
        let url = self.history.pop_back()?;
        self.navigate_to(&url);
        Ok(())
    }

    /// Loads the current page again, in place.
    pub fn reload(&mut self) {
        log::info!("reload {}", self.page.url());
        let _ = self.events.send(BrowserEvent::NavigationRequested {
            page_id: self.page.id(),
            url: self.page.url().to_string(),
        });
        self.start_load();
    }

    fn start_load(&mut self) {
        self.load_task = self
            .page
            .load(&self.runtime, self.client.clone(), self.events.clone())
            .ok();
    }

    /// Resolves `href` against the current page URL. Returns `href` unchanged
    /// when either side does not parse.
    pub fn resolve_url(&self, href: &str) -> String {
        match Url::parse(self.page.url()).and_then(|base| base.join(href)) {
            Ok(url) => url.to_string(),
            Err(_) => href.to_string(),
        }
    }

    /// Routes one frame of pointer input to the chrome, then to the page.
    pub fn process_mouse_events(&mut self, pointer: &PointerState) {
        let chrome = self.chrome_renderer.process_click_state(pointer);

        if chrome.clicked.first() == Some(&self.chrome.back)
            && self.history.can_go_back()
            && self.page.state() != PageState::Loading
        {
            if let Err(e) = self.navigate_back() {
                log::warn!("{e}");
            }
            return;
        }

        if chrome.clicked.contains(&self.chrome.url_input) {
            if let Some(input) = self.url_input_mut() {
                if !input.is_focused() {
                    input.focus();
                }
            }
        } else if !chrome.clicked.is_empty() || pointer.button_just_pressed {
            if let Some(input) = self.url_input_mut() {
                if input.is_focused() && !input.contains(pointer.position) {
                    input.unfocus();
                }
            }
        }

        if let Some(href) = self.page.process_mouse_events(pointer) {
            let url = self.resolve_url(&href);
            self.navigate_to(&url);
        }
    }

    /// Routes a key edge to the URL bar.
    pub fn process_key(&mut self, input: &KeyInput) {
        let shift = input.shift();
        let super_down = input.super_key();

        if super_down {
            if let Key::Text(t) = &input.key {
                match t.as_str() {
                    "l" | "L" => {
                        if let Some(field) = self.url_input_mut() {
                            field.focus();
                        }
                        return;
                    }
                    "a" | "A" => {
                        if let Some(field) = self.url_input_mut() {
                            field.select_all();
                        }
                        return;
                    }
                    _ => {}
                }
            }
        }

        let Some(field) = self.url_input_mut() else {
            return;
        };
        if !field.is_focused() {
            return;
        }

        let submitted = match &input.key {
            Key::Text(t) => {
                field.process_typing(t);
                None
            }
            Key::Backspace => {
                field.process_backspace();
                None
            }
            Key::Left => {
                field.process_left_key(shift, super_down);
                None
            }
            Key::Right => {
                field.process_right_key(shift, super_down);
                None
            }
            Key::Enter => {
                let value = field.process_enter();
                field.unfocus();
                value
            }
            Key::Escape | Key::Tab => {
                field.unfocus();
                None
            }
        };

        if let Some(url) = submitted {
            self.navigate_to(&url);
        }
    }

    /// Adopts any freshly loaded document, refreshes the chrome and draws
    /// chrome then page.
    pub fn draw(&mut self, target: &mut dyn DrawTarget) {
        self.page.sync();
        self.update_chrome();
        self.chrome_renderer.draw(target);
        self.page.draw(target);
    }

    fn update_chrome(&mut self) {
        let page_url = self.page.url().to_string();
        let state = self.page.state();
        let error = self.page.load_error().unwrap_or_default();
        let back_fill = if self.history.can_go_back() { "blue" } else { "grey" };
        let width = (self.viewport.width as f64 - URL_BAR_X - URL_BAR_MARGIN).max(0.0);

        if let Some(input) = self.url_input_mut() {
            input.text_color = if input.value() == page_url { "black" } else { "blue" }.to_string();
            input.x = URL_BAR_X;
            input.y = URL_BAR_Y;
            input.width = width;
        }
        if let Some(text) = self.chrome_text_mut(self.chrome.state) {
            text.value = state.name().to_string();
        }
        if let Some(text) = self.chrome_text_mut(self.chrome.back) {
            text.fill = back_fill.to_string();
        }
        if let Some(text) = self.chrome_text_mut(self.chrome.error) {
            text.value = error;
        }
    }
}
