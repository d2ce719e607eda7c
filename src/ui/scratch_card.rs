//! Scratch-off photo card
//!
//! A canvas overlay sits on top of the photo. Every paint after setup uses
//! `destination-out`, so dragging erases. Once enough of the sampled overlay
//! is clear, the card reveals, reports its id and stops listening.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::events::{EventListener, EventListenerOptions};
use gloo::render::{AnimationFrame, request_animation_frame};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, Element, Event, HtmlCanvasElement, HtmlElement, HtmlImageElement,
};

use super::dom;
use crate::consts::FALLBACK_ASPECT;
use crate::deck::{self, Card};
use crate::error::{Error, Result};
use crate::platform::input;
use crate::sim::{ScratchState, coverage_ratio};
use crate::tuning::Tuning;

/// Called with the card id when a card reveals
pub type RevealCallback = Rc<dyn Fn(&'static str)>;

struct Inner {
    card: &'static Card,
    article: HtmlElement,
    stack: HtmlElement,
    image: HtmlImageElement,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    caption: HtmlElement,
    state: RefCell<ScratchState>,
    brush_radius: f64,
    threshold: f64,
    sample_step: u32,
    on_reveal: RevealCallback,
    listeners: RefCell<Vec<EventListener>>,
    frame: RefCell<Option<AnimationFrame>>,
}

/// Mounted card; dropping it detaches every listener and the element
pub struct ScratchCard {
    inner: Rc<Inner>,
}

impl ScratchCard {
    /// Build the card for deck index `index` and append it to `parent`
    pub fn mount(
        parent: &Element,
        index: usize,
        tuning: &Tuning,
        on_reveal: RevealCallback,
    ) -> Result<Self> {
        let doc = dom::document()?;
        let card = deck::card(index);

        let article: HtmlElement = dom::create(&doc, "article", "scratch-card")?;
        article.set_attribute("data-id", card.id)?;
        let stack: HtmlElement = dom::create(&doc, "div", "scratch-stack")?;
        let image: HtmlImageElement = dom::create(&doc, "img", "scratch-image")?;
        image.set_src(card.image);
        image.set_alt("her");
        let canvas: HtmlCanvasElement = dom::create(&doc, "canvas", "scratch-canvas")?;
        stack.append_child(&image)?;
        stack.append_child(&canvas)?;

        let caption = dom::create_text(&doc, "p", "scratch-caption", card.caption)?;
        let emoji = dom::create_text(
            &doc,
            "span",
            &format!("scratch-emoji {}", card.emoji_class),
            card.emoji,
        )?;
        caption.append_child(&emoji)?;
        dom::set_visible(&caption, false, "block");

        article.append_child(&stack)?;
        article.append_child(&caption)?;
        parent.append_child(&article)?;

        let ctx = canvas
            .get_context("2d")?
            .ok_or(Error::NoCanvasContext)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| Error::NoCanvasContext)?;

        let inner = Rc::new(Inner {
            card,
            article,
            stack,
            image,
            canvas,
            ctx,
            caption,
            state: RefCell::new(ScratchState::new()),
            brush_radius: tuning.brush_radius,
            threshold: tuning.reveal_threshold,
            sample_step: tuning.sample_step,
            on_reveal,
            listeners: RefCell::new(Vec::new()),
            frame: RefCell::new(None),
        });
        Inner::attach_listeners(&inner)?;
        Inner::paint_when_ready(&inner);

        Ok(Self { inner })
    }

    /// Release listeners, cancel pending paints and remove the card
    pub fn teardown(self) {
        // Drop does the work
    }
}

impl Drop for ScratchCard {
    fn drop(&mut self) {
        self.inner.release();
        dom::detach(&self.inner.article);
    }
}

impl Inner {
    fn attach_listeners(this: &Rc<Self>) -> Result<()> {
        let window = web_sys::window().ok_or(Error::MissingElement("window"))?;
        let mut listeners = this.listeners.borrow_mut();

        for (event, touch) in [("mousedown", false), ("touchstart", true)] {
            let weak = Rc::downgrade(this);
            listeners.push(listen(&this.canvas, event, touch, move |event| {
                with(&weak, |inner| inner.on_start(event));
            }));
        }
        for (event, touch) in [("mousemove", false), ("touchmove", true)] {
            let weak = Rc::downgrade(this);
            listeners.push(listen(&this.canvas, event, touch, move |event| {
                with(&weak, |inner| inner.on_move(event));
            }));
        }
        for event in ["mouseup", "touchend"] {
            let weak = Rc::downgrade(this);
            listeners.push(EventListener::new(&window, event, move |_| {
                with(&weak, |inner| inner.state.borrow_mut().pointer_up());
            }));
        }

        let weak = Rc::downgrade(this);
        listeners.push(EventListener::new(&window, "resize", move |_| {
            with(&weak, |inner| inner.paint());
        }));
        Ok(())
    }

    /// Paint once the photo has decoded and laid out
    fn paint_when_ready(this: &Rc<Self>) {
        let weak = Rc::downgrade(this);
        let decode = this.image.decode();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(decode).await {
                log::debug!("Photo decode failed, painting anyway: {:?}", e);
            }
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let frame_weak = Rc::downgrade(&inner);
            let handle = request_animation_frame(move |_| {
                with(&frame_weak, |inner| {
                    inner.frame.borrow_mut().take();
                    inner.paint();
                });
            });
            *inner.frame.borrow_mut() = Some(handle);
        });
    }

    /// (Re)initialize the overlay at the current layout size
    ///
    /// Any erase progress is lost.
    fn paint(&self) {
        if self.state.borrow().is_revealed() {
            return;
        }
        let rect = self.stack.get_bounding_client_rect();
        let image_height = self.image.get_bounding_client_rect().height();
        let width = rect.width();
        let height = if image_height > 0.0 {
            image_height
        } else {
            width * FALLBACK_ASPECT
        };
        self.canvas.set_width(width as u32);
        self.canvas.set_height(height as u32);

        match self.paint_overlay(width, height) {
            Ok(()) => self.state.borrow_mut().arm(),
            Err(e) => log::warn!("Overlay paint failed for {}: {}", self.card.id, e),
        }
    }

    fn paint_overlay(&self, width: f64, height: f64) -> Result<()> {
        let ctx = &self.ctx;
        ctx.set_global_composite_operation("source-over")?;

        let gradient = ctx.create_linear_gradient(0.0, 0.0, 0.0, height);
        gradient.add_color_stop(0.0, "#ffd6ec")?;
        gradient.add_color_stop(1.0, "#fecaca")?;
        ctx.set_fill_style_canvas_gradient(&gradient);
        ctx.fill_rect(0.0, 0.0, width, height);

        ctx.set_fill_style_str("#db2777");
        ctx.set_font("16px system-ui");
        ctx.set_text_align("center");
        ctx.fill_text("drag to reveal \u{2764}\u{fe0f}", width / 2.0, height / 2.0)?;

        // Everything painted from here on erases
        ctx.set_global_composite_operation("destination-out")?;
        Ok(())
    }

    fn on_start(&self, event: &Event) {
        event.prevent_default();
        if self.state.borrow_mut().pointer_down() {
            self.stamp(event);
        }
    }

    fn on_move(&self, event: &Event) {
        if self.state.borrow_mut().pointer_move() {
            self.stamp(event);
        }
    }

    /// Erase a brush-sized circle under the pointer, then re-check coverage
    fn stamp(&self, event: &Event) {
        let Some(pos) = input::local_pos(event, &self.canvas) else {
            return;
        };
        self.ctx.begin_path();
        if self
            .ctx
            .arc(
                pos.x as f64,
                pos.y as f64,
                self.brush_radius,
                0.0,
                std::f64::consts::TAU,
            )
            .is_err()
        {
            return;
        }
        self.ctx.fill();
        self.check_revealed();
    }

    fn check_revealed(&self) {
        let (width, height) = (self.canvas.width(), self.canvas.height());
        if width == 0 || height == 0 {
            return;
        }
        let ratio = match self
            .ctx
            .get_image_data(0.0, 0.0, width as f64, height as f64)
        {
            Ok(pixels) => coverage_ratio(&pixels.data(), width, height, self.sample_step),
            Err(e) => {
                log::debug!("Could not read overlay pixels: {:?}", e);
                return;
            }
        };

        let fired = self.state.borrow_mut().check(ratio, self.threshold);
        if fired {
            self.reveal();
        }
    }

    fn reveal(&self) {
        dom::set_style(&self.canvas, "opacity", "0");
        dom::set_style(&self.canvas, "pointer-events", "none");
        dom::set_visible(&self.caption, true, "block");
        (self.on_reveal)(self.card.id);
        self.release();
    }

    /// Detach listeners and cancel any pending paint; safe to repeat
    fn release(&self) {
        self.listeners.borrow_mut().clear();
        self.frame.borrow_mut().take();
    }
}

/// Run `f` if the widget is still alive
fn with(weak: &Weak<Inner>, f: impl FnOnce(&Inner)) {
    if let Some(inner) = weak.upgrade() {
        f(&inner);
    }
}

/// Attach a listener; touch listeners are non-passive so they can block scrolling
fn listen<F>(
    target: &HtmlCanvasElement,
    event: &'static str,
    touch: bool,
    callback: F,
) -> EventListener
where
    F: FnMut(&Event) + 'static,
{
    if touch {
        EventListener::new_with_options(
            target,
            event,
            EventListenerOptions::enable_prevent_default(),
            callback,
        )
    } else {
        EventListener::new(target, event, callback)
    }
}
