//! Pointer extraction for mouse and touch events
//!
//! Only the first touch point is read; multi-touch is ignored.

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, MouseEvent, TouchEvent};

/// Client-space position of the pointer behind `event`
pub fn client_pos(event: &Event) -> Option<Vec2> {
    if let Some(touch_event) = event.dyn_ref::<TouchEvent>() {
        let touch = touch_event.touches().get(0)?;
        return Some(Vec2::new(touch.client_x() as f32, touch.client_y() as f32));
    }
    event
        .dyn_ref::<MouseEvent>()
        .map(|mouse| Vec2::new(mouse.client_x() as f32, mouse.client_y() as f32))
}

/// Pointer position relative to the top-left corner of `element`
pub fn local_pos(event: &Event, element: &Element) -> Option<Vec2> {
    let pos = client_pos(event)?;
    let rect = element.get_bounding_client_rect();
    Some(pos - Vec2::new(rect.left() as f32, rect.top() as f32))
}
