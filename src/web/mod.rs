//! Browser binding: one deck per page, driven by DOM events and
//! `requestAnimationFrame`.

mod dom;

pub use dom::DomSurface;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Document, Element, EventTarget, window};

use crate::config::DeckConfig;
use crate::content;
use crate::deck::{Deck, Input, SwipeTracker};

struct Runtime {
    deck: Deck,
    surface: DomSurface,
    swipe: SwipeTracker,
}

thread_local! {
    static RUNTIME: RefCell<Option<Runtime>> = const { RefCell::new(None) };
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn now_ms() -> u64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0) as u64
}

fn seed() -> u64 {
    #[cfg(feature = "rng")]
    {
        let mut buf = [0u8; 8];
        if getrandom::getrandom(&mut buf).is_ok() {
            return u64::from_le_bytes(buf);
        }
    }
    (js_sys::Math::random() * u64::MAX as f64) as u64
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Start the deck with the built-in timings.
#[wasm_bindgen]
pub fn start_deck() -> Result<(), JsValue> {
    launch(DeckConfig::default())
}

/// Start the deck with a partial JSON config; missing fields keep their defaults.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_deck_with_config(json: &str) -> Result<(), JsValue> {
    launch(DeckConfig::from_json(json).map_err(js_err)?)
}

#[wasm_bindgen]
pub fn restart_deck() {
    with_runtime(|rt, now| rt.deck.restart(now, &mut rt.surface));
}

/// Current section ordinal, or 0 before `start_deck`.
#[wasm_bindgen]
pub fn current_section() -> u8 {
    RUNTIME.with(|cell| cell.borrow().as_ref().map_or(0, |rt| rt.deck.current_section()))
}

fn launch(config: DeckConfig) -> Result<(), JsValue> {
    if RUNTIME.with(|cell| cell.borrow().is_some()) {
        log::warn!("deck already running; restarting instead");
        restart_deck();
        return Ok(());
    }
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win.document().ok_or_else(|| JsValue::from_str("no document"))?;

    let mut deck = Deck::new(config, &content::BIRTHDAY, seed()).map_err(js_err)?;
    let mut surface = DomSurface::new(doc.clone());
    let total = deck.total_sections();
    let balloons = surface.balloon_count();
    if balloons != deck.content().wishes.len() {
        log::warn!(
            "page has {} balloons but {} wishes are configured",
            balloons,
            deck.content().wishes.len()
        );
    }
    surface.build_progress_dots(total);
    deck.boot(now_ms(), &mut surface);
    let swipe = SwipeTracker::new(deck.config().navigation.swipe_threshold_px);
    RUNTIME.with(|cell| cell.replace(Some(Runtime { deck, surface, swipe })));

    install_listeners(&doc, total, balloons)?;
    start_frame_loop();
    Ok(())
}

fn with_runtime(f: impl FnOnce(&mut Runtime, u64)) {
    let now = now_ms();
    RUNTIME.with(|cell| {
        if let Some(rt) = cell.borrow_mut().as_mut() {
            f(rt, now);
        }
    });
}

fn dispatch(input: Input) {
    with_runtime(|rt, now| rt.deck.handle(input, now, &mut rt.surface));
}

fn click_point(evt: &web_sys::MouseEvent) -> Option<(f64, f64)> {
    Some((evt.client_x() as f64, evt.client_y() as f64))
}

fn on_click(target: &EventTarget, make: impl Fn(&web_sys::MouseEvent) -> Option<Input> + 'static) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
        if let Some(input) = make(&evt) {
            dispatch(input);
        }
    }) as Box<dyn FnMut(_)>);
    target.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn on_click_id(doc: &Document, id: &str, input: Input) -> Result<(), JsValue> {
    match doc.get_element_by_id(id) {
        Some(el) => on_click(&el, move |_| Some(input)),
        None => {
            log::debug!("listener: #{} not found", id);
            Ok(())
        }
    }
}

fn install_listeners(doc: &Document, total: u8, balloons: usize) -> Result<(), JsValue> {
    for section in 1..total {
        if let Some(el) = doc.get_element_by_id(&format!("btn-next-{section}")) {
            on_click(&el, move |evt| {
                Some(Input::NextButton {
                    section,
                    click: click_point(evt),
                })
            })?;
        }
    }
    if let Some(el) = doc.get_element_by_id("btn-restart") {
        on_click(&el, |evt| Some(Input::Restart { click: click_point(evt) }))?;
    }
    on_click_id(doc, "btn-run-code", Input::RunCode)?;
    on_click_id(doc, "fortune-cookie", Input::FortuneCookie)?;
    on_click_id(doc, "big-candle", Input::Candle)?;

    // options are rebuilt per question, so listen on the container
    if let Some(el) = doc.get_element_by_id("quiz-options") {
        on_click(&el, |evt| {
            let target: Element = evt.target()?.dyn_into().ok()?;
            let option = target.closest(".quiz-option").ok()??;
            let index = option.get_attribute("data-index")?.parse().ok()?;
            Some(Input::QuizOption(index))
        })?;
    }

    let list = doc.query_selector_all("#balloon-game .game-balloon")?;
    for i in 0..balloons {
        if let Some(node) = list.item(i as u32) {
            on_click(&node, move |_| Some(Input::Balloon(i)))?;
        }
    }

    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            if let Some(input) = Input::from_key(&evt.key()) {
                dispatch(input);
            }
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    let passive = AddEventListenerOptions::new();
    passive.set_passive(true);
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::TouchEvent| {
            if let Some(touch) = evt.touches().item(0) {
                let y = touch.client_y() as f64;
                with_runtime(|rt, _| rt.swipe.begin(y));
            }
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback_and_add_event_listener_options(
            "touchstart",
            closure.as_ref().unchecked_ref(),
            &passive,
        )?;
        closure.forget();
    }
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::TouchEvent| {
            if let Some(touch) = evt.changed_touches().item(0) {
                let y = touch.client_y() as f64;
                with_runtime(|rt, now| {
                    if let Some(input) = rt.swipe.end(y) {
                        rt.deck.handle(input, now, &mut rt.surface);
                    }
                });
            }
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback_and_add_event_listener_options(
            "touchend",
            closure.as_ref().unchecked_ref(),
            &passive,
        )?;
        closure.forget();
    }
    Ok(())
}

fn start_frame_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        RUNTIME.with(|cell| {
            if let Some(rt) = cell.borrow_mut().as_mut() {
                rt.deck.tick(ts as u64, &mut rt.surface);
            }
        });
        if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
            w.request_animation_frame(cb.as_ref().unchecked_ref()).ok();
        }
    }) as Box<dyn FnMut(f64)>));
    if let (Some(w), Some(cb)) = (window(), g.borrow().as_ref()) {
        w.request_animation_frame(cb.as_ref().unchecked_ref()).ok();
    }
}
