//! Page controller: scratch screen, then the game screen
//!
//! Owns the widgets and the `AppState`. Widgets talk back only through the
//! callbacks handed to them at mount time.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::events::EventListener;
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement, HtmlImageElement};

use super::dom;
use super::emoji_game::EmojiGame;
use super::scratch_card::ScratchCard;
use crate::deck::{self, CARDS};
use crate::error::Result;
use crate::sim::AppState;
use crate::tuning::Tuning;

/// Widgets and elements of the scratch screen
struct ScratchScreen {
    section: HtmlElement,
    cards: Vec<ScratchCard>,
    dots: Vec<HtmlElement>,
    start_button: HtmlButtonElement,
    _start_listener: EventListener,
}

/// Widgets and elements of the game screen
struct GameScreen {
    section: HtmlElement,
    game: Option<EmojiGame>,
    collect_label: HtmlElement,
    selectors: Vec<HtmlElement>,
    _selector_listeners: Vec<EventListener>,
}

struct Controller {
    state: RefCell<AppState>,
    tuning: Tuning,
    main: HtmlElement,
    scratch: RefCell<Option<ScratchScreen>>,
    game: RefCell<Option<GameScreen>>,
}

/// The mounted page; dropping it tears every widget down
pub struct App {
    controller: Rc<Controller>,
}

impl App {
    /// Build the page inside `root`
    pub fn mount(root: &Element, tuning: Tuning) -> Result<Self> {
        let doc = dom::document()?;

        let main: HtmlElement = dom::create(&doc, "main", "card")?;
        let header: HtmlElement = dom::create(&doc, "header", "card-header")?;
        let badge: HtmlElement = dom::create(&doc, "span", "chip-badge")?;
        let heart = dom::create_text(&doc, "span", "heart", "\u{2665}")?;
        badge.append_child(&heart)?;
        let title = dom::create_text(&doc, "span", "", "pls manjao game")?;
        badge.append_child(&title)?;
        header.append_child(&badge)?;
        main.append_child(&header)?;
        root.append_child(&main)?;

        let controller = Rc::new(Controller {
            state: RefCell::new(AppState::new()),
            tuning,
            main,
            scratch: RefCell::new(None),
            game: RefCell::new(None),
        });
        Controller::show_scratch(&controller, &doc)?;
        log::info!("Page mounted");

        Ok(Self { controller })
    }

    /// Tear everything down and remove the page
    pub fn teardown(self) {
        // Drop does the work
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Some(scratch) = self.controller.scratch.borrow_mut().take() {
            scratch.close();
        }
        if let Some(game) = self.controller.game.borrow_mut().take() {
            game.close();
        }
        dom::detach(&self.controller.main);
    }
}

impl ScratchScreen {
    fn close(self) {
        let ScratchScreen { section, cards, .. } = self;
        drop(cards);
        dom::detach(&section);
    }
}

impl GameScreen {
    fn close(mut self) {
        self.game.take();
        dom::detach(&self.section);
    }
}

impl Controller {
    fn show_scratch(this: &Rc<Self>, doc: &Document) -> Result<()> {
        let section: HtmlElement = dom::create(doc, "section", "screen active")?;
        section.set_id("scratch-screen");
        this.main.append_child(&section)?;

        let mut cards = Vec::with_capacity(CARDS.len());
        for index in 0..CARDS.len() {
            let weak = Rc::downgrade(this);
            let on_reveal = Rc::new(move |id: &'static str| {
                with(&weak, |controller| controller.on_reveal(id));
            });
            match ScratchCard::mount(&section, index, &this.tuning, on_reveal) {
                Ok(card) => cards.push(card),
                Err(e) => log::warn!("Skipping card {}: {}", deck::card(index).id, e),
            }
        }

        let nav: HtmlElement = dom::create(doc, "div", "nav-dots")?;
        let mut dots = Vec::with_capacity(CARDS.len());
        for _ in 0..CARDS.len() {
            let dot: HtmlElement = dom::create(doc, "span", "nav-dot")?;
            nav.append_child(&dot)?;
            dots.push(dot);
        }
        section.append_child(&nav)?;

        let center: HtmlElement = dom::create(doc, "div", "center-btn")?;
        let start_button: HtmlButtonElement = dom::create(doc, "button", "btn btn-secondary btn-small")?;
        start_button.set_type("button");
        start_button.set_text_content(Some("\u{1f3ae} start our tiny game"));
        center.append_child(&start_button)?;
        section.append_child(&center)?;

        let weak = Rc::downgrade(this);
        let start_listener = EventListener::new(&start_button, "click", move |_| {
            if let Some(controller) = weak.upgrade() {
                Controller::start_game(&controller);
            }
        });

        *this.scratch.borrow_mut() = Some(ScratchScreen {
            section,
            cards,
            dots,
            start_button,
            _start_listener: start_listener,
        });
        this.update_scratch();
        Ok(())
    }

    fn on_reveal(&self, id: &'static str) {
        if self.state.borrow_mut().on_reveal(id) {
            self.update_scratch();
        }
    }

    /// Sync nav dots and the start button with the reveal count
    fn update_scratch(&self) {
        let state = self.state.borrow();
        let scratch = self.scratch.borrow();
        let Some(scratch) = scratch.as_ref() else {
            return;
        };
        for (i, dot) in scratch.dots.iter().enumerate() {
            dom::toggle_class(dot, "active", state.dot_active(i));
        }
        let ready = state.all_revealed();
        scratch.start_button.set_disabled(!ready);
        dom::set_style(&scratch.start_button, "opacity", if ready { "1" } else { "0.5" });
        dom::set_style(
            &scratch.start_button,
            "cursor",
            if ready { "pointer" } else { "not-allowed" },
        );
    }

    fn start_game(this: &Rc<Self>) {
        if !this.state.borrow_mut().start_game() {
            return;
        }
        if let Some(scratch) = this.scratch.borrow_mut().take() {
            scratch.close();
        }
        let result = dom::document().and_then(|doc| Controller::show_game(this, &doc));
        if let Err(e) = result {
            log::warn!("Could not start game: {}", e);
        }
    }

    fn show_game(this: &Rc<Self>, doc: &Document) -> Result<()> {
        let section: HtmlElement = dom::create(doc, "section", "screen active")?;
        section.set_id("game-screen");
        this.main.append_child(&section)?;

        // Built before the game so the first target report has somewhere to go
        let collect_row: HtmlElement = dom::create(doc, "div", "collect-row")?;
        let collect_badge = dom::create_text(doc, "span", "collect-badge", "collect: ")?;
        let collect_label = dom::create_text(doc, "strong", "", "")?;
        collect_badge.append_child(&collect_label)?;
        collect_row.append_child(&collect_badge)?;

        let selector_row: HtmlElement = dom::create(doc, "div", "selector-row")?;
        let mut selectors = Vec::with_capacity(CARDS.len());
        let mut listeners = Vec::with_capacity(CARDS.len());
        for (index, card) in CARDS.iter().enumerate() {
            let button: HtmlElement = dom::create(doc, "button", "circle-btn")?;
            button.set_attribute("type", "button")?;
            button.set_attribute("aria-label", card.aria_label)?;
            let image: HtmlImageElement = dom::create(doc, "img", "")?;
            image.set_src(card.image);
            image.set_alt("character");
            button.append_child(&image)?;
            selector_row.append_child(&button)?;

            let weak = Rc::downgrade(this);
            listeners.push(EventListener::new(&button, "click", move |_| {
                with(&weak, |controller| controller.select(index));
            }));
            selectors.push(button);
        }

        *this.game.borrow_mut() = Some(GameScreen {
            section: section.clone(),
            game: None,
            collect_label,
            selectors,
            _selector_listeners: listeners,
        });

        let on_target = {
            let weak = Rc::downgrade(this);
            Rc::new(move |card: usize| {
                with(&weak, |controller| controller.on_target_change(card));
            })
        };
        let on_game_over = Rc::new(|score: u32| {
            log::info!("Run finished with score {}", score);
        });
        let selected = this.state.borrow().selected();
        let game = EmojiGame::mount(&section, this.tuning.clone(), selected, on_target, on_game_over)?;

        section.append_child(&collect_row)?;
        section.append_child(&selector_row)?;
        if let Some(screen) = this.game.borrow_mut().as_mut() {
            screen.game = Some(game);
        }
        this.update_selectors();
        Ok(())
    }

    fn on_target_change(&self, card: usize) {
        self.state.borrow_mut().on_target_change(card);
        let label = self.state.borrow().collect_label();
        if let Some(screen) = self.game.borrow().as_ref() {
            screen.collect_label.set_text_content(Some(label));
        }
    }

    fn select(&self, index: usize) {
        if !self.state.borrow_mut().select(index) {
            return;
        }
        if let Some(game) = self.game.borrow().as_ref().and_then(|s| s.game.as_ref()) {
            game.select_character(index);
        }
        self.update_selectors();
    }

    fn update_selectors(&self) {
        let selected = self.state.borrow().selected();
        if let Some(screen) = self.game.borrow().as_ref() {
            for (i, button) in screen.selectors.iter().enumerate() {
                dom::toggle_class(button, "active", i == selected);
            }
        }
    }
}

/// Run `f` if the controller is still alive
fn with(weak: &Weak<Controller>, f: impl FnOnce(&Controller)) {
    if let Some(controller) = weak.upgrade() {
        f(&controller);
    }
}
