// `Surface` over the live document.

use std::collections::HashMap;

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use crate::effects::Ephemeral;
use crate::surface::{Anchor, DotState, Group, Layer, Mark, NodeId, Surface, Target};

const STYLE_ID: &str = "deck-injected-style";

// Smoke puffs are positioned in the overlay; their look lives here so the page
// stylesheet does not need to know about them.
const INJECTED_CSS: &str = "
@keyframes smokeRise {
    0% { transform: translateY(0) scale(1); opacity: 0.5; }
    100% { transform: translateY(-50px) scale(2); opacity: 0; }
}
.smoke-puff {
    position: fixed; width: 10px; height: 10px; border-radius: 50%;
    background: rgba(200, 200, 200, 0.5); pointer-events: none;
    animation: smokeRise 1s ease-out forwards;
}
";

/// How a target shows and hides.
enum Visibility {
    /// `hidden` class removed to show.
    HiddenClass,
    /// `visible` class added to show.
    VisibleClass,
    /// Inline opacity.
    Opacity,
}

fn visibility_of(target: Target) -> Visibility {
    match target {
        Target::QuizResult | Target::Signature => Visibility::VisibleClass,
        Target::BlowInstruction => Visibility::Opacity,
        _ => Visibility::HiddenClass,
    }
}

fn group_selector(group: Group) -> &'static str {
    match group {
        Group::WishLines => ".wish-line",
        Group::Timeline => ".timeline-item",
        Group::Compliments => ".compliment-card",
        Group::ClosingLines => ".closing-line",
        Group::ClosingDividers => ".closing-divider",
    }
}

fn mark_class(mark: Mark) -> Option<&'static str> {
    match mark {
        Mark::Correct => Some("correct"),
        Mark::Incorrect => Some("incorrect"),
        Mark::Popped => Some("popped"),
        Mark::Cracked => Some("cracked"),
        Mark::BlownOut => Some("blown-out"),
        Mark::Disabled | Mark::Gone => None,
    }
}

pub struct DomSurface {
    document: Document,
    nodes: HashMap<NodeId, Element>,
}

impl DomSurface {
    pub fn new(document: Document) -> Self {
        let surface = Self {
            document,
            nodes: HashMap::new(),
        };
        surface.inject_style();
        surface
    }

    fn inject_style(&self) {
        if self.document.get_element_by_id(STYLE_ID).is_some() {
            return;
        }
        let (Some(head), Ok(style)) = (self.document.head(), self.document.create_element("style")) else {
            return;
        };
        style.set_id(STYLE_ID);
        style.set_text_content(Some(INJECTED_CSS));
        head.append_child(&style).ok();
    }

    /// Rebuild the progress dot row with `total` dots.
    pub fn build_progress_dots(&self, total: u8) {
        let Some(container) = self.by_id("progress-dots") else {
            return;
        };
        container.set_inner_html("");
        for _ in 0..total {
            if let Ok(dot) = self.document.create_element("span") {
                dot.set_class_name("progress-dot");
                container.append_child(&dot).ok();
            }
        }
    }

    /// Number of balloons on the page, in document order.
    pub fn balloon_count(&self) -> usize {
        self.balloons().len()
    }

    fn by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn within(&self, id: &str, selector: &str) -> Option<Element> {
        self.by_id(id)?.query_selector(selector).ok().flatten()
    }

    fn all(&self, selector: &str) -> Vec<Element> {
        let Ok(list) = self.document.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn balloons(&self) -> Vec<Element> {
        self.all("#balloon-game .game-balloon")
    }

    fn element(&self, target: Target) -> Option<Element> {
        match target {
            Target::NextButton(n) => self.by_id(&format!("btn-next-{n}")),
            Target::RunCodeButton => self.by_id("btn-run-code"),
            Target::RestartButton => self.by_id("btn-restart"),
            Target::IntroText => self.by_id("intro-text"),
            Target::MysteryText => self.by_id("mystery-text"),
            Target::QuizQuestion => self.by_id("quiz-question"),
            Target::QuizOption(i) => self.within("quiz-options", &format!(".quiz-option[data-index=\"{i}\"]")),
            Target::QuizResult => self.by_id("quiz-result"),
            Target::FortuneCookie => self.by_id("fortune-cookie"),
            Target::CookieHint => self.within("fortune-cookie", ".cookie-hint"),
            Target::FortuneMessage => self.by_id("fortune-message"),
            Target::FortuneText => self.within("fortune-message", ".fortune-text"),
            Target::CodeContent => self.by_id("code-content"),
            Target::TerminalOutput => self.by_id("terminal-output"),
            Target::TerminalText => self.by_id("terminal-text"),
            Target::Balloon(i) => self.balloons().into_iter().nth(i),
            Target::WishDisplay => self.by_id("wish-display"),
            Target::RevealedWish => self.by_id("revealed-wish"),
            Target::PopCounter => self.by_id("balloons-popped"),
            Target::Candle => self.by_id("big-candle"),
            Target::CandleFlame => self.by_id("candle-flame"),
            Target::BlowInstruction => self.by_id("blow-instruction"),
            Target::WishMade => self.by_id("wish-made"),
            Target::Signature => self.document.query_selector(".signature").ok().flatten(),
        }
    }

    fn layer(&self, layer: Layer) -> Option<Element> {
        match layer {
            Layer::Particles => self.by_id("particles"),
            Layer::Confetti => self.by_id("confetti"),
            Layer::Hearts => self.by_id("floating-hearts"),
            Layer::EmojiBurst => self.by_id("final-emoji-burst"),
            Layer::Overlay => self.document.body().map(Into::into),
            Layer::Inside(target) => self.element(target),
        }
    }

    fn set_style(el: &Element, prop: &str, value: &str) {
        if let Some(html) = el.dyn_ref::<HtmlElement>() {
            html.style().set_property(prop, value).ok();
        }
    }

    fn set_class(el: &Element, class: &str, on: bool) {
        let list = el.class_list();
        if on {
            list.add_1(class).ok();
        } else {
            list.remove_1(class).ok();
        }
    }

    fn set_visible(&self, target: Target, visible: bool) {
        let Some(el) = self.element(target) else {
            return;
        };
        match visibility_of(target) {
            Visibility::HiddenClass => Self::set_class(&el, "hidden", !visible),
            Visibility::VisibleClass => Self::set_class(&el, "visible", visible),
            Visibility::Opacity => Self::set_style(&el, "opacity", if visible { "1" } else { "0" }),
        }
    }
}

impl Surface for DomSurface {
    fn set_section_active(&mut self, ordinal: u8, active: bool) {
        if let Some(el) = self.by_id(&format!("section-{ordinal}")) {
            Self::set_class(&el, "active", active);
        }
    }

    fn reveal(&mut self, target: Target) {
        self.set_visible(target, true);
    }

    fn hide(&mut self, target: Target) {
        self.set_visible(target, false);
    }

    fn set_text(&mut self, target: Target, text: &str) {
        if let Some(el) = self.element(target) {
            el.set_text_content(Some(text));
        }
    }

    fn set_markup(&mut self, target: Target, markup: &str, cursor: bool) {
        let Some(el) = self.element(target) else {
            return;
        };
        if cursor {
            el.set_inner_html(&format!("{markup}<span class=\"typewriter-cursor\"></span>"));
        } else {
            el.set_inner_html(markup);
        }
    }

    fn set_mark(&mut self, target: Target, mark: Mark, on: bool) {
        let Some(el) = self.element(target) else {
            return;
        };
        match mark {
            Mark::Disabled => {
                if on {
                    el.set_attribute("disabled", "").ok();
                } else {
                    el.remove_attribute("disabled").ok();
                }
            }
            Mark::Gone => Self::set_style(&el, "visibility", if on { "hidden" } else { "visible" }),
            _ => {
                if let Some(class) = mark_class(mark) {
                    Self::set_class(&el, class, on);
                }
            }
        }
    }

    fn set_progress(&mut self, percent: f64, dots: &[DotState]) {
        if let Some(bar) = self.by_id("progress-bar") {
            Self::set_style(&bar, "width", &format!("{percent}%"));
        }
        for (dot, state) in self.all("#progress-dots .progress-dot").iter().zip(dots) {
            Self::set_class(dot, "active", *state == DotState::Active);
            Self::set_class(dot, "completed", *state == DotState::Completed);
        }
    }

    fn fill_options(&mut self, options: &[&str]) {
        let Some(container) = self.by_id("quiz-options") else {
            return;
        };
        container.set_inner_html("");
        for (i, text) in options.iter().enumerate() {
            let Ok(button) = self.document.create_element("button") else {
                continue;
            };
            button.set_class_name("quiz-option");
            button.set_attribute("data-index", &i.to_string()).ok();
            button.set_text_content(Some(text));
            container.append_child(&button).ok();
        }
    }

    fn group_len(&self, group: Group) -> usize {
        self.all(group_selector(group)).len()
    }

    fn reveal_item(&mut self, group: Group, index: usize) {
        if let Some(el) = self.all(group_selector(group)).get(index) {
            Self::set_class(el, "visible", true);
        }
    }

    fn reset_group(&mut self, group: Group) {
        for el in self.all(group_selector(group)) {
            Self::set_class(&el, "visible", false);
        }
    }

    fn anchor_of(&self, target: Target) -> Option<Anchor> {
        let rect = self.element(target)?.get_bounding_client_rect();
        Some(Anchor {
            left: rect.left(),
            top: rect.top(),
            width: rect.width(),
            height: rect.height(),
        })
    }

    fn append_ephemeral(&mut self, id: NodeId, node: &Ephemeral) {
        let Some(parent) = self.layer(node.layer) else {
            return;
        };
        let tag = if node.glyph.is_some() || matches!(node.layer, Layer::Inside(_)) { "span" } else { "div" };
        let Ok(el) = self.document.create_element(tag) else {
            return;
        };
        el.set_class_name(node.kind.class_name());
        if let Some(glyph) = node.glyph {
            el.set_text_content(Some(glyph));
        }
        for (prop, value) in &node.style {
            Self::set_style(&el, prop, value);
        }
        if parent.append_child(&el).is_ok() {
            self.nodes.insert(id, el);
        }
    }

    fn remove_ephemeral(&mut self, id: NodeId) {
        if let Some(el) = self.nodes.remove(&id) {
            el.remove();
        }
    }
}
