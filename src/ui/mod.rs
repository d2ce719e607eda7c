//! Browser layer
//!
//! Widgets own their DOM and listeners and release both on drop. Game logic
//! comes from `sim`; this layer only measures, draws and forwards input.

pub mod app;
pub mod dom;
pub mod emoji_game;
pub mod scratch_card;

use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::error::Error;
use crate::tuning::Tuning;
use app::App;

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

fn mount_root() -> Result<Element, Error> {
    let doc = dom::document()?;
    if let Some(root) = doc.get_element_by_id("app") {
        return Ok(root);
    }
    log::debug!("No #app element, mounting on <body>");
    doc.body()
        .map(Element::from)
        .ok_or(Error::MissingElement("body"))
}

/// Mount the page, replacing any previous mount
#[wasm_bindgen]
pub fn start() -> Result<(), JsValue> {
    stop();
    let root = mount_root()?;
    let tuning = Tuning::load(&root);
    log::info!("Mounting with {} pace", tuning.pace.as_str());
    let app = App::mount(&root, tuning)?;
    APP.with(|slot| *slot.borrow_mut() = Some(app));
    Ok(())
}

/// Tear the page down
#[wasm_bindgen]
pub fn stop() {
    let app = APP.with(|slot| slot.borrow_mut().take());
    if let Some(app) = app {
        app.teardown();
        log::info!("Page torn down");
    }
}
