use std::time::Duration;
use tokio::runtime::Handle;
use vgbrowse::config::EngineConfig;
use vgbrowse::input::PointerState;
use vgbrowse::render::backend::RenderBackend;
use vgbrowse::render::backends::null::{NullBackend, NullSurface};
use vgbrowse::render::{Color, DisplayItem, RenderList};
use vgbrowse::{Browser, BrowserEvent, Devtools, EngineError};

const FRAMES: u64 = 120;

#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // Config from an optional JSON file, initial URL from an optional second
    // argument.
    let mut args = std::env::args().skip(1);
    let mut config = match args.next() {
        Some(path) if path.ends_with(".json") => EngineConfig::from_json_file(path)?,
        Some(url) => EngineConfig::builder().initial_url(url).build()?,
        None => EngineConfig::default(),
    };
    if let Some(url) = args.next() {
        config.initial_url = url;
    }

    env_logger::Builder::new()
        .filter_level(config.log_level.to_level_filter())
        .parse_default_env()
        .init();

    let mut backend = NullBackend::new()?;
    let mut surface = backend.create_surface(config.viewport.into())?;
    let mut devtools_surface = backend.create_surface(config.viewport.into())?;

    let mut browser = Browser::new(config, Handle::current())?;
    let mut devtools = Devtools::new(browser.fonts().clone());
    let mut events = browser.subscribe();

    let mut list = RenderList::new(browser.fonts().clone());
    let mut devtools_list = RenderList::new(browser.fonts().clone());

    for frame in 0..FRAMES {
        while let Ok(event) = events.try_recv() {
            log::info!("event: {event}");
            if let BrowserEvent::LoadFailed { error, .. } = &event {
                log::warn!("page failed to load: {error}");
            }
        }

        // Sweep the pointer down the page and the devtools listing.
        let y = (frame as f64 * 5.0) % browser.viewport().height as f64;
        let pointer = PointerState::at(20.0, y);
        browser.process_mouse_events(&pointer);
        devtools.process_mouse_events(&pointer, browser.page_mut());

        list.clear();
        list.add_command(DisplayItem::Clear { color: Color::WHITE });
        browser.draw(&mut list);
        backend.render(&list, surface.as_mut())?;

        devtools_list.clear();
        devtools_list.add_command(DisplayItem::Clear { color: Color::WHITE });
        devtools.draw(browser.page(), &mut devtools_list);
        backend.render(&devtools_list, devtools_surface.as_mut())?;

        tokio::time::sleep(Duration::from_millis(16)).await;
    }

    if let Some(s) = surface.as_any().downcast_ref::<NullSurface>() {
        log::info!(
            "{} rendered {} frames; last frame had {} items; page {} is {}",
            backend.name(),
            s.frame_id(),
            s.last_item_count(),
            browser.page().url(),
            browser.page().state(),
        );
    }
    log::info!("devtools listing has {} lines", devtools.lines().len());

    Ok(())
}
