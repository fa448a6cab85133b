//! The deck: one context object owning every piece of presentation state.
//!
//! Inputs and due timers are the only things that move it. Both arrive through
//! `&mut self` with a `Surface` to draw on; follow-up work is pushed into the
//! scheduler as plain `Task` values, so a restart can discard all of it by
//! bumping the scheduler generation.

mod input;
mod sections;

pub use input::{Input, SwipeTracker};
pub use sections::{LOCKED, SECTIONS, SectionKind, kind_of, ordinal_of};

use std::collections::BTreeSet;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::DeckConfig;
use crate::content::Content;
use crate::effects::{self, Ephemeral};
use crate::error::DeckError;
use crate::games::{BalloonGame, Candle, CodeRunner, FortuneCookie, OptionMark, Quiz, QuizPhase, QuizStep};
use crate::navigator::{Navigator, OneShot};
use crate::scheduler::Scheduler;
use crate::surface::{Mark, NodeId, Surface, Target};
use crate::typewriter::{FrameContent, Next, TypeMode, Typewriter};

/// Regions driven by a typewriter. Each holds at most one live run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeSlot {
    Intro,
    Mystery,
    Code,
    Terminal,
}

impl TypeSlot {
    fn index(self) -> usize {
        self as usize
    }

    fn target(self) -> Target {
        match self {
            TypeSlot::Intro => Target::IntroText,
            TypeSlot::Mystery => Target::MysteryText,
            TypeSlot::Code => Target::CodeContent,
            TypeSlot::Terminal => Target::TerminalText,
        }
    }
}

/// Deferred work. Everything the deck does "later" is one of these.
#[derive(Debug)]
enum Task {
    Navigate(u8),
    Enter(u8),
    Settle,
    Restart,
    StartTyping(TypeSlot),
    Type { slot: TypeSlot, token: u32 },
    RevealItem(crate::surface::Group, usize),
    Reveal(Target),
    Spawn(Box<Ephemeral>),
    Despawn(NodeId),
    Confetti,
    QuizAdvance,
    ClearBalloon(usize),
    Unlock(u8),
    ShowFortune,
    CandleAftermath,
    Heart,
    EmojiBurst,
}

/// Live typewriter runs. A run is addressed by slot plus token; starting a new
/// run in a slot invalidates the token of the previous one.
struct TypeSlots {
    runs: [Option<(u32, Typewriter)>; 4],
    serial: u32,
}

impl TypeSlots {
    fn new() -> Self {
        Self {
            runs: [None, None, None, None],
            serial: 0,
        }
    }

    fn install(&mut self, slot: TypeSlot, writer: Typewriter) -> u32 {
        self.serial = self.serial.wrapping_add(1);
        self.runs[slot.index()] = Some((self.serial, writer));
        self.serial
    }

    fn is_active(&self, slot: TypeSlot) -> bool {
        self.runs[slot.index()].is_some()
    }

    fn next_frame(&mut self, slot: TypeSlot, token: u32) -> Option<crate::typewriter::TypeFrame> {
        match &mut self.runs[slot.index()] {
            Some((t, writer)) if *t == token => writer.next(),
            _ => None,
        }
    }

    fn clear(&mut self, slot: TypeSlot) {
        self.runs[slot.index()] = None;
    }

    fn clear_all(&mut self) {
        self.runs = [None, None, None, None];
    }
}

/// Observable deck state, for tests and debugging.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Snapshot {
    pub current: u8,
    pub transitioning: bool,
    pub one_shots: u8,
    pub open_gates: Vec<u8>,
    pub quiz: QuizPhase,
    pub balloons_popped: u32,
    pub candle: Candle,
    pub fortune: FortuneCookie,
    pub code: CodeRunner,
    pub live_nodes: usize,
}

pub struct Deck {
    config: DeckConfig,
    content: &'static Content,
    rng: SmallRng,
    scheduler: Scheduler<Task>,
    nav: Navigator,
    quiz: Quiz,
    balloons: BalloonGame,
    candle: Candle,
    fortune: FortuneCookie,
    code: CodeRunner,
    typing: TypeSlots,
    next_node: u64,
    live: BTreeSet<NodeId>,
}

impl Deck {
    pub fn new(config: DeckConfig, content: &'static Content, seed: u64) -> Result<Self, DeckError> {
        config.validate()?;
        content.validate()?;
        if config.balloon_threshold as usize > content.wishes.len() {
            return Err(DeckError::ThresholdUnreachable {
                threshold: config.balloon_threshold,
                balloons: content.wishes.len(),
            });
        }
        let nav = Navigator::new(SECTIONS.len() as u8, &LOCKED)?;
        Ok(Self {
            quiz: Quiz::new(content.quiz),
            balloons: BalloonGame::new(content.wishes, config.balloon_threshold),
            config,
            content,
            rng: SmallRng::seed_from_u64(seed),
            scheduler: Scheduler::new(),
            nav,
            candle: Candle::default(),
            fortune: FortuneCookie::default(),
            code: CodeRunner::default(),
            typing: TypeSlots::new(),
            next_node: 0,
            live: BTreeSet::new(),
        })
    }

    pub fn config(&self) -> &DeckConfig {
        &self.config
    }

    pub fn content(&self) -> &'static Content {
        self.content
    }

    pub fn current_section(&self) -> u8 {
        self.nav.current()
    }

    pub fn total_sections(&self) -> u8 {
        self.nav.total()
    }

    pub fn is_transitioning(&self) -> bool {
        self.nav.is_transitioning()
    }

    pub fn is_open(&self, ordinal: u8) -> bool {
        self.nav.is_open(ordinal)
    }

    pub fn one_shots(&self) -> OneShot {
        self.nav.flags()
    }

    pub fn generation(&self) -> u32 {
        self.scheduler.generation()
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn is_typing(&self, slot: TypeSlot) -> bool {
        self.typing.is_active(slot)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            current: self.nav.current(),
            transitioning: self.nav.is_transitioning(),
            one_shots: self.nav.flags().bits(),
            open_gates: (1..self.nav.total()).filter(|n| self.nav.is_open(*n)).collect(),
            quiz: self.quiz.phase(),
            balloons_popped: self.balloons.popped(),
            candle: self.candle,
            fortune: self.fortune,
            code: self.code,
            live_nodes: self.live.len(),
        }
    }

    /// Initial load: ambient particles, section 1 active, its entry effects.
    pub fn boot(&mut self, now_ms: u64, surface: &mut dyn Surface) {
        self.scheduler.advance_to(now_ms);
        if self.nav.claim(OneShot::PARTICLES) {
            let nodes = effects::ambient_particles(&self.config.particles, &mut self.rng);
            self.spawn_all(nodes, surface);
        }
        surface.set_section_active(self.nav.current(), true);
        self.draw_progress(surface);
        self.run_entry(self.nav.current(), surface);
        log::info!("deck: booted at section {}", self.nav.current());
    }

    /// Run every task due at `now_ms`, in order.
    pub fn tick(&mut self, now_ms: u64, surface: &mut dyn Surface) {
        while let Some(task) = self.scheduler.pop_due(now_ms) {
            self.dispatch(task, surface);
        }
    }

    /// Apply one input at `now_ms`. Tasks already due run first, so their
    /// follow-ups keep their own timing.
    pub fn handle(&mut self, input: Input, now_ms: u64, surface: &mut dyn Surface) {
        self.tick(now_ms, surface);
        match input {
            Input::NextButton { section, click } => {
                if section != self.nav.current() || !self.nav.is_open(section) {
                    log::trace!("input: next button {} ignored", section);
                    return;
                }
                self.ripple(Target::NextButton(section), click, surface);
                self.scheduler
                    .schedule(self.config.navigation.button_ms, Task::Navigate(section + 1));
            }
            Input::Advance => {
                if self.nav.can_advance() {
                    self.go_to(self.nav.current() + 1, surface);
                }
            }
            Input::QuizOption(index) => self.answer_quiz(index, surface),
            Input::Balloon(index) => self.pop_balloon(index, surface),
            Input::Candle => self.blow_candle(surface),
            Input::FortuneCookie => self.crack_fortune(surface),
            Input::RunCode => self.run_code(surface),
            Input::Restart { click } => {
                if !self.nav.is_last() {
                    return;
                }
                self.ripple(Target::RestartButton, click, surface);
                self.scheduler
                    .schedule(self.config.navigation.restart_ms, Task::Restart);
            }
        }
    }

    /// Request navigation to `target`. `false` if the request was ignored.
    pub fn go_to(&mut self, target: u8, surface: &mut dyn Surface) -> bool {
        let Some(t) = self.nav.begin(target) else {
            return false;
        };
        log::debug!("nav: {} -> {}", t.from, t.to);
        surface.set_section_active(t.from, false);
        self.scheduler
            .schedule(self.config.navigation.exit_ms, Task::Enter(t.to));
        true
    }

    /// Return to the state of a fresh load. Everything scheduled before this
    /// call is discarded.
    pub fn restart(&mut self, now_ms: u64, surface: &mut dyn Surface) {
        log::info!("deck: restart (generation {})", self.scheduler.generation());
        self.scheduler.reset();
        self.scheduler.advance_to(now_ms);
        self.typing.clear_all();
        for id in std::mem::take(&mut self.live) {
            surface.remove_ephemeral(id);
        }
        self.nav.reset();
        self.quiz.reset();
        self.balloons.reset();
        self.candle = Candle::default();
        self.fortune = FortuneCookie::default();
        self.code = CodeRunner::default();
        self.reset_surface(surface);
        self.boot(now_ms, surface);
    }

    fn reset_surface(&self, surface: &mut dyn Surface) {
        for n in 1..=self.nav.total() {
            surface.set_section_active(n, false);
        }
        for group in crate::surface::Group::ALL {
            surface.reset_group(group);
        }
        for n in LOCKED {
            surface.hide(Target::NextButton(n));
        }
        for target in [
            Target::RunCodeButton,
            Target::TerminalOutput,
            Target::FortuneMessage,
            Target::WishMade,
            Target::WishDisplay,
            Target::QuizResult,
            Target::Signature,
        ] {
            surface.hide(target);
        }
        surface.reveal(Target::CookieHint);
        surface.reveal(Target::BlowInstruction);
        surface.set_mark(Target::FortuneCookie, Mark::Cracked, false);
        surface.set_mark(Target::CandleFlame, Mark::BlownOut, false);
        for i in 0..self.balloons.len() {
            surface.set_mark(Target::Balloon(i), Mark::Popped, false);
            surface.set_mark(Target::Balloon(i), Mark::Gone, false);
        }
        for slot in [TypeSlot::Intro, TypeSlot::Mystery] {
            surface.set_markup(slot.target(), "", false);
        }
        for target in [
            Target::CodeContent,
            Target::TerminalText,
            Target::QuizQuestion,
            Target::QuizResult,
            Target::RevealedWish,
            Target::FortuneText,
        ] {
            surface.set_text(target, "");
        }
        surface.set_text(Target::PopCounter, "0");
        surface.fill_options(&[]);
    }

    fn dispatch(&mut self, task: Task, surface: &mut dyn Surface) {
        match task {
            Task::Navigate(target) => {
                self.go_to(target, surface);
            }
            Task::Enter(target) => {
                if self.nav.enter(target) {
                    surface.set_section_active(target, true);
                    self.draw_progress(surface);
                    self.run_entry(target, surface);
                    self.scheduler
                        .schedule(self.config.navigation.settle_ms, Task::Settle);
                }
            }
            Task::Settle => self.nav.settle(),
            Task::Restart => self.restart(self.scheduler.now(), surface),
            Task::StartTyping(slot) => self.start_typing(slot, surface),
            Task::Type { slot, token } => self.type_step(slot, token, surface),
            Task::RevealItem(group, index) => surface.reveal_item(group, index),
            Task::Reveal(target) => surface.reveal(target),
            Task::Spawn(node) => self.spawn(*node, surface),
            Task::Despawn(id) => {
                if self.live.remove(&id) {
                    surface.remove_ephemeral(id);
                }
            }
            Task::Confetti => {
                let nodes = effects::confetti_burst(&self.config.confetti, &mut self.rng);
                self.spawn_all(nodes, surface);
            }
            Task::QuizAdvance => match self.quiz.advance() {
                Some(QuizStep::Ask(q)) => self.show_question(q, surface),
                Some(QuizStep::Completed) => self.unlock(ordinal_of(SectionKind::Quiz), surface),
                None => {}
            },
            Task::ClearBalloon(index) => {
                if self.balloons.clear(index) {
                    surface.set_mark(Target::Balloon(index), Mark::Gone, true);
                }
            }
            Task::Unlock(ordinal) => self.unlock(ordinal, surface),
            Task::ShowFortune => {
                let Some(m) = self.fortune.message() else {
                    return;
                };
                if let Some(text) = self.content.fortunes.get(m) {
                    surface.set_text(Target::FortuneText, text);
                }
                surface.hide(Target::CookieHint);
                surface.reveal(Target::FortuneMessage);
                self.unlock(ordinal_of(SectionKind::Fortune), surface);
            }
            Task::CandleAftermath => {
                if self.candle != Candle::Blown {
                    return;
                }
                surface.reveal(Target::WishMade);
                self.unlock(ordinal_of(SectionKind::Candle), surface);
                let nodes = effects::confetti_burst(&self.config.confetti, &mut self.rng);
                self.spawn_all(nodes, surface);
            }
            Task::Heart => self.heart(surface),
            Task::EmojiBurst => {
                let nodes = effects::emoji_burst(self.content.burst_glyphs, self.config.delays.emoji_step_ms);
                self.spawn_all(nodes, surface);
            }
        }
    }

    fn draw_progress(&self, surface: &mut dyn Surface) {
        surface.set_progress(self.nav.progress_percent(), &self.nav.dots());
    }

    fn unlock(&mut self, ordinal: u8, surface: &mut dyn Surface) {
        if self.nav.unlock(ordinal) {
            log::info!("gate: section {} unlocked", ordinal);
            surface.reveal(Target::NextButton(ordinal));
        }
    }

    fn spawn_all(&mut self, nodes: Vec<Ephemeral>, surface: &mut dyn Surface) {
        for node in nodes {
            let delay = node.spawn_delay_ms;
            if delay == 0 {
                self.spawn(node, surface);
            } else {
                self.scheduler.schedule(delay, Task::Spawn(Box::new(node)));
            }
        }
    }

    fn spawn(&mut self, node: Ephemeral, surface: &mut dyn Surface) {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        surface.append_ephemeral(id, &node);
        if let Some(lifetime) = node.lifetime_ms {
            self.scheduler.schedule(lifetime, Task::Despawn(id));
        }
        self.live.insert(id);
    }

    fn ripple(&mut self, target: Target, click: Option<(f64, f64)>, surface: &mut dyn Surface) {
        if let Some(rect) = surface.anchor_of(target) {
            let node = effects::ripple(target, rect, click, self.config.delays.ripple_ms);
            self.spawn(node, surface);
        }
    }

    /// One floating heart, then re-arm. The chain ends once the closing
    /// section is no longer current.
    fn heart(&mut self, surface: &mut dyn Surface) {
        if !self.nav.is_last() {
            self.nav.release(OneShot::HEARTS);
            return;
        }
        let d = &self.config.delays;
        match effects::floating_heart(self.content.heart_glyphs, d.heart_ms, d.heart_jitter_ms, &mut self.rng) {
            Some((node, next_ms)) => {
                self.spawn(node, surface);
                self.scheduler.schedule(next_ms, Task::Heart);
            }
            None => self.nav.release(OneShot::HEARTS),
        }
    }

    fn start_typing(&mut self, slot: TypeSlot, surface: &mut dyn Surface) {
        let t = &self.config.typewriter;
        let (source, mode) = match slot {
            TypeSlot::Intro => (self.content.intro, lines_mode(t)),
            TypeSlot::Mystery => (self.content.mystery, lines_mode(t)),
            TypeSlot::Code => (
                self.content.code,
                TypeMode::Code {
                    char_ms: t.code_char_ms,
                    rules: self.content.highlight,
                },
            ),
            TypeSlot::Terminal => (
                self.content.terminal,
                TypeMode::Terminal {
                    char_ms: t.terminal_char_ms,
                },
            ),
        };
        match mode {
            TypeMode::Lines { .. } => surface.set_markup(slot.target(), "", false),
            _ => surface.set_text(slot.target(), ""),
        }
        let token = self.typing.install(slot, Typewriter::new(source, mode));
        log::debug!("typewriter: {:?} started", slot);
        self.type_step(slot, token, surface);
    }

    fn type_step(&mut self, slot: TypeSlot, token: u32, surface: &mut dyn Surface) {
        let Some(frame) = self.typing.next_frame(slot, token) else {
            return;
        };
        match frame.content {
            Some(FrameContent::Markup(markup)) => surface.set_markup(slot.target(), &markup, frame.cursor),
            Some(FrameContent::Text(text)) => surface.set_text(slot.target(), &text),
            None => {}
        }
        match frame.next {
            Next::After(ms) => self.scheduler.schedule(ms, Task::Type { slot, token }),
            Next::Finished => {
                self.typing.clear(slot);
                self.typing_finished(slot, surface);
            }
        }
    }

    fn typing_finished(&mut self, slot: TypeSlot, surface: &mut dyn Surface) {
        log::debug!("typewriter: {:?} finished", slot);
        match slot {
            TypeSlot::Intro | TypeSlot::Mystery => {}
            TypeSlot::Code => {
                if self.code.ready() {
                    surface.reveal(Target::RunCodeButton);
                }
            }
            TypeSlot::Terminal => {
                if self.code.finish() {
                    self.scheduler.schedule(
                        self.config.delays.terminal_unlock_ms,
                        Task::Unlock(ordinal_of(SectionKind::Code)),
                    );
                }
            }
        }
    }

    fn on_section(&self, kind: SectionKind) -> bool {
        kind_of(self.nav.current()) == Some(kind)
    }

    fn show_question(&mut self, index: usize, surface: &mut dyn Surface) {
        let Some(question) = self.quiz.question(index) else {
            return;
        };
        surface.set_text(Target::QuizQuestion, question.prompt);
        surface.fill_options(question.options);
        surface.hide(Target::QuizResult);
        surface.set_text(Target::QuizResult, "");
    }

    fn answer_quiz(&mut self, selected: usize, surface: &mut dyn Surface) {
        let Some(answered) = self.quiz.answer(selected) else {
            log::trace!("quiz: answer {} ignored", selected);
            return;
        };
        for (i, mark) in answered.marks.iter().enumerate() {
            let option = Target::QuizOption(i);
            surface.set_mark(option, Mark::Disabled, true);
            match mark {
                OptionMark::Correct => surface.set_mark(option, Mark::Correct, true),
                OptionMark::Incorrect => surface.set_mark(option, Mark::Incorrect, true),
                OptionMark::Plain => {}
            }
        }
        surface.set_text(Target::QuizResult, answered.feedback);
        surface.reveal(Target::QuizResult);
        self.scheduler
            .schedule(self.config.delays.quiz_feedback_ms, Task::QuizAdvance);
    }

    fn pop_balloon(&mut self, index: usize, surface: &mut dyn Surface) {
        let Some(popped) = self.balloons.pop(index) else {
            return;
        };
        let balloon = Target::Balloon(index);
        surface.set_mark(balloon, Mark::Popped, true);
        surface.set_text(Target::PopCounter, &popped.count.to_string());
        surface.set_text(Target::RevealedWish, popped.wish);
        surface.reveal(Target::WishDisplay);
        if let Some(anchor) = surface.anchor_of(balloon) {
            let nodes = effects::mini_burst(anchor, &self.config.confetti, &mut self.rng);
            self.spawn_all(nodes, surface);
        }
        self.scheduler
            .schedule(self.config.delays.balloon_hide_ms, Task::ClearBalloon(index));
        if popped.unlocks {
            self.scheduler.schedule(
                self.config.delays.balloon_unlock_ms,
                Task::Unlock(ordinal_of(SectionKind::Balloons)),
            );
        }
    }

    fn blow_candle(&mut self, surface: &mut dyn Surface) {
        if !self.on_section(SectionKind::Candle) || !self.candle.blow() {
            return;
        }
        surface.set_mark(Target::CandleFlame, Mark::BlownOut, true);
        surface.hide(Target::BlowInstruction);
        if let Some(anchor) = surface.anchor_of(Target::Candle) {
            let nodes = effects::smoke(anchor, self.config.confetti.smoke_puffs);
            self.spawn_all(nodes, surface);
        }
        self.scheduler
            .schedule(self.config.delays.candle_reveal_ms, Task::CandleAftermath);
    }

    fn crack_fortune(&mut self, surface: &mut dyn Surface) {
        if !self.on_section(SectionKind::Fortune) {
            return;
        }
        if self.fortune.crack(self.content.fortunes.len(), &mut self.rng).is_none() {
            return;
        }
        surface.set_mark(Target::FortuneCookie, Mark::Cracked, true);
        self.scheduler
            .schedule(self.config.delays.fortune_reveal_ms, Task::ShowFortune);
    }

    fn run_code(&mut self, surface: &mut dyn Surface) {
        if !self.code.run() {
            return;
        }
        surface.hide(Target::RunCodeButton);
        surface.reveal(Target::TerminalOutput);
        self.start_typing(TypeSlot::Terminal, surface);
    }
}

fn lines_mode(t: &crate::config::TypewriterTiming) -> TypeMode {
    TypeMode::Lines {
        char_ms: t.char_ms,
        line_pause_ms: t.line_pause_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::BIRTHDAY;
    use crate::surface::RecordingSurface;

    fn deck() -> (Deck, RecordingSurface) {
        let mut deck = Deck::new(DeckConfig::default(), &BIRTHDAY, 7).unwrap();
        let mut surface = RecordingSurface::new();
        deck.boot(0, &mut surface);
        (deck, surface)
    }

    #[test]
    fn boot_activates_first_section_and_particles() {
        let (deck, surface) = deck();
        assert_eq!(deck.current_section(), 1);
        assert_eq!(surface.active_sections(), vec![1]);
        assert_eq!(surface.live_nodes(), 20);
        assert!(deck.one_shots().contains(OneShot::PARTICLES));
    }

    #[test]
    fn intro_types_after_delay() {
        let (mut deck, mut surface) = deck();
        deck.tick(799, &mut surface);
        assert!(!deck.is_typing(TypeSlot::Intro));
        deck.tick(800, &mut surface);
        assert!(deck.is_typing(TypeSlot::Intro));
        deck.tick(60_000, &mut surface);
        assert!(!deck.is_typing(TypeSlot::Intro));
        let (markup, cursor) = surface.markup(Target::IntroText).unwrap();
        assert!(!cursor);
        assert!(markup.contains("<br>"));
        assert!(markup.starts_with("Hi there!"));
    }

    #[test]
    fn navigation_is_guarded_while_transitioning() {
        let (mut deck, mut surface) = deck();
        assert!(deck.go_to(2, &mut surface));
        assert!(!deck.go_to(3, &mut surface));
        deck.tick(400, &mut surface);
        assert_eq!(deck.current_section(), 2);
        assert!(deck.is_transitioning());
        deck.tick(1_000, &mut surface);
        assert!(!deck.is_transitioning());
        assert!(deck.go_to(3, &mut surface));
    }

    #[test]
    fn locked_next_button_is_ignored() {
        let (mut deck, mut surface) = deck();
        for target in [2, 3, 4] {
            deck.go_to(target, &mut surface);
            deck.tick(deck.scheduler.now() + 1_000, &mut surface);
        }
        assert_eq!(deck.current_section(), 4);
        let now = deck.scheduler.now();
        deck.handle(Input::Advance, now, &mut surface);
        deck.handle(Input::NextButton { section: 4, click: None }, now, &mut surface);
        deck.tick(now + 5_000, &mut surface);
        assert_eq!(deck.current_section(), 4);
    }

    #[test]
    fn rejects_unreachable_threshold() {
        let config = DeckConfig {
            balloon_threshold: 7,
            ..DeckConfig::default()
        };
        assert!(matches!(
            Deck::new(config, &BIRTHDAY, 0),
            Err(DeckError::ThresholdUnreachable { threshold: 7, balloons: 6 })
        ));
    }
}
