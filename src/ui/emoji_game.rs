//! Falling-emoji mini-game widget
//!
//! The session in `sim` decides everything; this widget measures the board,
//! feeds pointer input in, ticks once per animation frame and mirrors the
//! model into DOM elements keyed by token id.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use gloo::events::{EventListener, EventListenerOptions};
use gloo::render::{AnimationFrame, request_animation_frame};
use web_sys::{Element, Event, HtmlElement, HtmlImageElement};

use super::dom;
use crate::consts::{HERO_SIZE, TOKEN_SIZE};
use crate::deck;
use crate::error::{Error, Result};
use crate::platform::{self, input};
use crate::sim::{Board, GameEvent, GameState, Step, tick};
use crate::tuning::Tuning;

/// Called whenever the target emoji changes
pub type TargetCallback = Rc<dyn Fn(usize)>;
/// Called with the final score when the run ends
pub type GameOverCallback = Rc<dyn Fn(u32)>;

/// The hero element and its photo
struct HeroView {
    root: HtmlElement,
    image: HtmlImageElement,
}

struct Inner {
    state: RefCell<GameState>,
    section: HtmlElement,
    board: HtmlElement,
    score_label: HtmlElement,
    flash: HtmlElement,
    flash_emoji: HtmlElement,
    overlay: HtmlElement,
    hero: RefCell<Option<HeroView>>,
    /// Token elements by id, including popping ones
    tokens: RefCell<HashMap<u32, HtmlElement>>,
    frame: RefCell<Option<AnimationFrame>>,
    /// Listeners that live for one run (hero drag, resize)
    session_listeners: RefCell<Vec<EventListener>>,
    restart_listener: RefCell<Option<EventListener>>,
    on_target_change: TargetCallback,
    on_game_over: GameOverCallback,
    torn_down: Cell<bool>,
}

/// Mounted game; dropping it stops the loop and removes every element
pub struct EmojiGame {
    inner: Rc<Inner>,
}

impl EmojiGame {
    /// Build the game inside `parent` and start playing immediately
    pub fn mount(
        parent: &Element,
        tuning: Tuning,
        hero_card: usize,
        on_target_change: TargetCallback,
        on_game_over: GameOverCallback,
    ) -> Result<Self> {
        let doc = dom::document()?;

        let section: HtmlElement = dom::create(&doc, "section", "game-wrapper")?;
        let header: HtmlElement = dom::create(&doc, "div", "game-header")?;
        let score_label = dom::create_text(&doc, "span", "", "")?;
        score_label.set_id("score-label");
        header.append_child(&score_label)?;

        let board: HtmlElement = dom::create(&doc, "div", "game-board")?;
        for _ in 0..2 {
            let divider: HtmlElement = dom::create(&doc, "div", "lane-divider")?;
            board.append_child(&divider)?;
        }

        let flash = dom::create_text(&doc, "div", "target-flash", "collect")?;
        let flash_emoji = dom::create_text(&doc, "span", "flash-emoji", "")?;
        flash.append_child(&flash_emoji)?;
        dom::set_visible(&flash, false, "flex");
        board.append_child(&flash)?;

        let overlay: HtmlElement = dom::create(&doc, "div", "game-over-overlay")?;
        let overlay_card: HtmlElement = dom::create(&doc, "div", "game-over-card")?;
        let title = dom::create_text(&doc, "div", "game-over-title", "game over")?;
        let restart = dom::create_text(
            &doc,
            "button",
            "btn btn-secondary",
            &format!("restart with {} lives", tuning.start_lives),
        )?;
        restart.set_attribute("type", "button")?;
        overlay_card.append_child(&title)?;
        overlay_card.append_child(&restart)?;
        overlay.append_child(&overlay_card)?;
        dom::set_visible(&overlay, false, "flex");
        board.append_child(&overlay)?;

        let footer = dom::create_text(
            &doc,
            "p",
            "game-footer",
            "emojis fall from the sky. match her lane with the ones that belong to her.",
        )?;

        section.append_child(&header)?;
        section.append_child(&board)?;
        section.append_child(&footer)?;
        parent.append_child(&section)?;

        let state = GameState::new(platform::seed(), tuning, hero_card, platform::now_ms());
        log::info!("Game session started with seed {}", state.seed);

        let inner = Rc::new(Inner {
            state: RefCell::new(state),
            section,
            board,
            score_label,
            flash,
            flash_emoji,
            overlay,
            hero: RefCell::new(None),
            tokens: RefCell::new(HashMap::new()),
            frame: RefCell::new(None),
            session_listeners: RefCell::new(Vec::new()),
            restart_listener: RefCell::new(None),
            on_target_change,
            on_game_over,
            torn_down: Cell::new(false),
        });

        let weak = Rc::downgrade(&inner);
        *inner.restart_listener.borrow_mut() = Some(EventListener::new(&restart, "click", move |_| {
            if let Some(inner) = weak.upgrade() {
                Inner::restart(&inner);
            }
        }));

        Inner::start_session(&inner)?;
        Ok(Self { inner })
    }

    /// Swap the hero's character without touching score or lives
    pub fn select_character(&self, card: usize) {
        let changed = self.inner.state.borrow_mut().select_character(card);
        if changed {
            self.inner.flush(platform::now_ms());
        }
    }

    /// Stop the loop, detach listeners and remove the game from the page
    pub fn teardown(self) {
        // Drop does the work
    }
}

impl Drop for EmojiGame {
    fn drop(&mut self) {
        self.inner.teardown();
    }
}

impl Inner {
    /// Create the hero, hook up input and start the frame loop
    fn start_session(this: &Rc<Self>) -> Result<()> {
        let doc = dom::document()?;
        let window = web_sys::window().ok_or(Error::MissingElement("window"))?;

        let root: HtmlElement = dom::create(&doc, "div", "hero")?;
        let image: HtmlImageElement = dom::create(&doc, "img", "")?;
        image.set_src(deck::card(this.state.borrow().hero.card).image);
        root.append_child(&image)?;
        dom::set_px(&root, "width", HERO_SIZE);
        dom::set_px(&root, "height", HERO_SIZE);
        this.board.append_child(&root)?;

        let mut listeners = this.session_listeners.borrow_mut();
        for event in ["mousedown", "touchstart"] {
            let weak = Rc::downgrade(this);
            listeners.push(EventListener::new_with_options(
                &root,
                event,
                EventListenerOptions::enable_prevent_default(),
                move |event| with(&weak, |inner| inner.on_grab(event)),
            ));
        }
        for event in ["mousemove", "touchmove"] {
            let weak = Rc::downgrade(this);
            listeners.push(EventListener::new_with_options(
                &window,
                event,
                EventListenerOptions::enable_prevent_default(),
                move |event| with(&weak, |inner| inner.on_drag(event)),
            ));
        }
        for event in ["mouseup", "touchend"] {
            let weak = Rc::downgrade(this);
            listeners.push(EventListener::new(&window, event, move |_| {
                with(&weak, |inner| inner.state.borrow_mut().end_drag());
            }));
        }
        let weak = Rc::downgrade(this);
        listeners.push(EventListener::new(&window, "resize", move |_| {
            with(&weak, |inner| inner.place_hero(&inner.measure()));
        }));
        drop(listeners);

        *this.hero.borrow_mut() = Some(HeroView { root, image });
        this.place_hero(&this.measure());
        this.flush(platform::now_ms());
        Inner::schedule(this);
        Ok(())
    }

    fn schedule(this: &Rc<Self>) {
        let weak = Rc::downgrade(this);
        let handle = request_animation_frame(move |now| {
            if let Some(inner) = weak.upgrade() {
                Inner::on_frame(&inner, now);
            }
        });
        *this.frame.borrow_mut() = Some(handle);
    }

    fn on_frame(this: &Rc<Self>, now: f64) {
        this.frame.borrow_mut().take();
        let board = this.measure();
        let step = tick(&mut this.state.borrow_mut(), &board, now);
        this.flush(now);
        this.render(&board);

        match step {
            Step::Continue => Inner::schedule(this),
            Step::Halt => this.end_session(),
        }
    }

    /// Board size as laid out right now
    fn measure(&self) -> Board {
        let rect = self.board.get_bounding_client_rect();
        Board::new(rect.width() as f32, rect.height() as f32)
    }

    fn on_grab(&self, event: &Event) {
        event.prevent_default();
        if let Some(pos) = input::local_pos(event, &self.board) {
            let board = self.measure();
            self.state.borrow_mut().begin_drag(&board, pos.x);
        }
    }

    fn on_drag(&self, event: &Event) {
        if self.state.borrow().drag.is_none() {
            return;
        }
        let Some(pos) = input::local_pos(event, &self.board) else {
            return;
        };
        let board = self.measure();
        self.state.borrow_mut().drag_to(&board, pos.x);
        self.flush(platform::now_ms());
    }

    fn place_hero(&self, board: &Board) {
        let lane = self.state.borrow().hero.lane;
        if let Some(hero) = self.hero.borrow().as_ref() {
            let rect = board.hero_rect(lane);
            dom::set_px(&hero.root, "left", rect.left());
            dom::set_px(&hero.root, "top", rect.top());
        }
    }

    /// Apply queued model events to the DOM
    fn flush(&self, now: f64) {
        let events = self.state.borrow_mut().drain_events();
        for event in events {
            match event {
                GameEvent::Spawned { id } => self.add_token(id),
                GameEvent::Scored { id } => {
                    if let Some(el) = self.tokens.borrow().get(&id) {
                        dom::toggle_class(el, "pop", true);
                    }
                }
                GameEvent::LifeLost { id }
                | GameEvent::Missed { id }
                | GameEvent::PopFinished { id } => {
                    if let Some(el) = self.tokens.borrow_mut().remove(&id) {
                        dom::detach(&el);
                    }
                }
                GameEvent::TargetChanged { card } => {
                    self.flash_emoji
                        .set_text_content(Some(deck::card(card).emoji));
                    (self.on_target_change)(card);
                }
                GameEvent::HeroChanged { card } => {
                    if let Some(hero) = self.hero.borrow().as_ref() {
                        hero.image.set_src(deck::card(card).image);
                    }
                }
                GameEvent::HeroMoved { .. } => self.place_hero(&self.measure()),
                GameEvent::Restarted => dom::set_visible(&self.overlay, false, "flex"),
                GameEvent::GameOver { .. } => {}
            }
        }

        let state = self.state.borrow();
        self.score_label.set_text_content(Some(&format!(
            "score: {} \u{b7} lives: {}",
            state.score,
            state.lives()
        )));
        dom::set_visible(&self.flash, state.flash_visible(now), "flex");
    }

    fn add_token(&self, id: u32) {
        let state = self.state.borrow();
        let Some(token) = state.tokens.iter().find(|t| t.id == id) else {
            return;
        };
        let Ok(doc) = dom::document() else {
            return;
        };
        let el = match dom::create_text(&doc, "div", "enemy", deck::card(token.card).lane_emoji) {
            Ok(el) => el,
            Err(e) => {
                log::warn!("Could not create token {}: {}", id, e);
                return;
            }
        };
        dom::set_px(&el, "width", TOKEN_SIZE);
        dom::set_px(&el, "height", TOKEN_SIZE);
        dom::set_px(&el, "top", token.y);
        if self.board.append_child(&el).is_ok() {
            self.tokens.borrow_mut().insert(id, el);
        }
    }

    /// Position everything from the model
    fn render(&self, board: &Board) {
        let state = self.state.borrow();
        let elements = self.tokens.borrow();
        for token in &state.tokens {
            if let Some(el) = elements.get(&token.id) {
                let rect = board.token_rect(token.lane, token.y);
                dom::set_px(el, "left", rect.left());
                dom::set_px(el, "top", rect.top());
            }
        }
        drop(elements);
        drop(state);
        self.place_hero(board);
    }

    /// Stop the loop and clear the board after the run ends
    fn end_session(&self) {
        self.clear_session();
        let score = self.state.borrow().score;
        dom::set_visible(&self.flash, false, "flex");
        dom::set_visible(&self.overlay, true, "flex");
        (self.on_game_over)(score);
    }

    fn restart(this: &Rc<Self>) {
        let restarted = this.state.borrow_mut().restart(platform::now_ms());
        if !restarted {
            return;
        }
        if let Err(e) = Inner::start_session(this) {
            log::warn!("Could not restart game: {}", e);
        }
    }

    /// Cancel the frame, drop run listeners and remove hero/token elements
    fn clear_session(&self) {
        self.frame.borrow_mut().take();
        self.session_listeners.borrow_mut().clear();
        if let Some(hero) = self.hero.borrow_mut().take() {
            dom::detach(&hero.root);
        }
        for (_, el) in self.tokens.borrow_mut().drain() {
            dom::detach(&el);
        }
    }

    fn teardown(&self) {
        if self.torn_down.replace(true) {
            return;
        }
        self.clear_session();
        self.restart_listener.borrow_mut().take();
        dom::detach(&self.section);
        log::info!("Game unmounted");
    }
}

/// Run `f` if the widget is still alive
fn with(weak: &Weak<Inner>, f: impl FnOnce(&Inner)) {
    if let Some(inner) = weak.upgrade() {
        f(&inner);
    }
}
