// End-to-end runs of the deck against the recording surface. Time is virtual:
// the harness owns the clock and ticks the deck forward explicitly.

use birthday_deck::content::BIRTHDAY;
use birthday_deck::deck::TypeSlot;
use birthday_deck::effects::EffectKind;
use birthday_deck::navigator::OneShot;
use birthday_deck::surface::{Group, Mark, Target};
use birthday_deck::{Deck, DeckConfig, Input, RecordingSurface};

struct Harness {
    deck: Deck,
    surface: RecordingSurface,
    now: u64,
}

impl Harness {
    fn new() -> Self {
        Self::with_config(DeckConfig::default())
    }

    fn with_config(config: DeckConfig) -> Self {
        let mut deck = Deck::new(config, &BIRTHDAY, 11).unwrap();
        let mut surface = RecordingSurface::new();
        deck.boot(0, &mut surface);
        Self { deck, surface, now: 0 }
    }

    fn advance(&mut self, ms: u64) {
        self.now += ms;
        self.deck.tick(self.now, &mut self.surface);
    }

    fn press(&mut self, input: Input) {
        self.deck.handle(input, self.now, &mut self.surface);
    }

    /// Press the current section's next button and wait for the transition to settle.
    fn next(&mut self) {
        let section = self.deck.current_section();
        self.press(Input::NextButton { section, click: None });
        self.advance(1_500);
    }

    fn current(&self) -> u8 {
        self.deck.current_section()
    }

    /// Walk from section 1 to the end, completing every interaction.
    fn traverse(&mut self) {
        assert_eq!(self.current(), 1);
        self.advance(10_000);
        self.next();
        self.next();
        assert_eq!(self.current(), 3);
        self.next();

        assert_eq!(self.current(), 4);
        for _ in BIRTHDAY.quiz {
            self.press(Input::QuizOption(0));
            self.advance(2_500);
        }
        self.next();

        assert_eq!(self.current(), 5);
        self.press(Input::FortuneCookie);
        self.advance(1_000);
        self.next();
        self.next();

        assert_eq!(self.current(), 7);
        self.advance(10_000);
        self.press(Input::RunCode);
        self.advance(10_000);
        self.next();

        assert_eq!(self.current(), 8);
        for i in 0..6 {
            self.press(Input::Balloon(i));
        }
        self.advance(1_000);
        self.next();

        assert_eq!(self.current(), 9);
        self.press(Input::Candle);
        self.advance(1_000);
        self.next();
        self.next();
        assert_eq!(self.current(), 11);
    }
}

#[test]
fn full_traversal_unlocks_every_gate_in_order() {
    let mut h = Harness::new();
    h.traverse();
    assert_eq!(h.surface.unlocks(), vec![4, 5, 7, 8, 9]);
    assert_eq!(h.surface.progress(), 100.0);
    assert_eq!(h.surface.max_active(), 1);
    assert_eq!(h.surface.active_sections(), vec![11]);
}

#[test]
fn restart_reproduces_first_traversal() {
    let mut h = Harness::new();
    let fresh = h.deck.snapshot();
    h.traverse();
    let first = h.surface.unlocks();

    h.press(Input::Restart { click: None });
    h.advance(500);
    assert_eq!(h.current(), 1);
    assert_eq!(h.deck.snapshot(), fresh);
    assert_eq!(h.surface.text(Target::PopCounter), Some("0"));
    assert!(!h.surface.has_mark(Target::CandleFlame, Mark::BlownOut));
    assert!(h.surface.revealed_items(Group::WishLines).is_empty());

    h.surface.clear_log();
    h.traverse();
    assert_eq!(h.surface.unlocks(), first);
    assert_eq!(h.surface.max_active(), 1);
}

#[test]
fn rapid_next_presses_make_one_transition() {
    let mut h = Harness::new();
    h.press(Input::NextButton { section: 1, click: Some((10.0, 10.0)) });
    h.press(Input::NextButton { section: 1, click: None });
    h.press(Input::Advance);
    h.advance(5_000);
    assert_eq!(h.current(), 2);
}

#[test]
fn next_button_of_another_section_is_ignored() {
    let mut h = Harness::new();
    h.press(Input::NextButton { section: 6, click: None });
    h.advance(5_000);
    assert_eq!(h.current(), 1);
}

#[test]
fn keyboard_and_swipe_advance_only_open_gates() {
    let mut h = Harness::new();
    let mut swipe = birthday_deck::deck::SwipeTracker::new(50.0);
    swipe.begin(500.0);
    let input = swipe.end(300.0).unwrap();
    h.press(input);
    h.advance(1_500);
    assert_eq!(h.current(), 2);
    h.press(Input::from_key("Enter").unwrap());
    h.advance(1_500);
    h.press(Input::Advance);
    h.advance(1_500);
    assert_eq!(h.current(), 4);
    h.press(Input::Advance);
    h.advance(1_500);
    assert_eq!(h.current(), 4, "quiz gate should hold");
}

#[test]
fn quiz_feedback_then_next_question() {
    let mut h = Harness::new();
    for _ in 0..3 {
        h.next();
    }
    assert_eq!(h.surface.text(Target::QuizQuestion), Some(BIRTHDAY.quiz[0].prompt));
    h.press(Input::QuizOption(1));
    assert!(h.surface.has_mark(Target::QuizOption(1), Mark::Incorrect));
    assert!(h.surface.has_mark(Target::QuizOption(3), Mark::Correct));
    assert!(h.surface.has_mark(Target::QuizOption(0), Mark::Disabled));
    assert!(h.surface.is_visible(Target::QuizResult));
    // locked while feedback shows
    h.press(Input::QuizOption(3));
    assert!(!h.surface.has_mark(Target::QuizOption(3), Mark::Incorrect));
    h.advance(1_999);
    assert_eq!(h.surface.text(Target::QuizQuestion), Some(BIRTHDAY.quiz[0].prompt));
    h.advance(1);
    assert_eq!(h.surface.text(Target::QuizQuestion), Some(BIRTHDAY.quiz[1].prompt));
    assert!(!h.surface.is_visible(Target::QuizResult));
    assert!(!h.deck.is_open(4));
}

#[test]
fn stale_unlock_never_lands_after_restart() {
    let mut h = Harness::new();
    h.traverse();
    h.deck.restart(h.now, &mut h.surface);
    // walk to balloons again, pop them all, then restart before the unlock fires
    h.advance(10_000);
    for _ in 0..3 {
        h.next();
    }
    for _ in BIRTHDAY.quiz {
        h.press(Input::QuizOption(3));
        h.advance(2_500);
    }
    h.next();
    h.press(Input::FortuneCookie);
    h.advance(1_000);
    h.next();
    h.next();
    h.advance(10_000);
    h.press(Input::RunCode);
    h.advance(10_000);
    h.next();
    assert_eq!(h.current(), 8);
    for i in 0..6 {
        h.press(Input::Balloon(i));
    }
    h.deck.restart(h.now, &mut h.surface);
    h.surface.clear_log();
    h.advance(5_000);
    assert!(h.surface.unlocks().is_empty());
    assert!(!h.deck.is_open(8));
    assert!(!h.surface.has_mark(Target::Balloon(0), Mark::Gone));
}

#[test]
fn restart_mid_typing_does_not_interleave() {
    let mut h = Harness::new();
    h.advance(10_000);
    let (full, _) = h.surface.markup(Target::IntroText).unwrap();
    let full = full.to_string();

    let mut h = Harness::new();
    h.advance(1_500);
    assert!(h.deck.is_typing(TypeSlot::Intro));
    h.deck.restart(h.now, &mut h.surface);
    assert!(!h.deck.is_typing(TypeSlot::Intro));
    h.advance(10_000);
    assert_eq!(h.surface.markup(Target::IntroText), Some((full.as_str(), false)));
}

#[test]
fn closing_section_hearts_and_burst() {
    let mut h = Harness::new();
    h.traverse();
    assert!(h.deck.one_shots().contains(OneShot::HEARTS));
    h.advance(7_000);
    assert!(h.surface.nodes_of(EffectKind::Heart) > 0);
    assert_eq!(h.surface.nodes_of(EffectKind::BurstEmoji), BIRTHDAY.burst_glyphs.len());
    assert_eq!(h.surface.revealed_items(Group::ClosingLines).len(), 6);
    assert_eq!(h.surface.revealed_items(Group::ClosingDividers).len(), 2);
    assert!(h.surface.is_visible(Target::Signature));

    h.press(Input::Restart { click: None });
    h.advance(300);
    assert_eq!(h.surface.nodes_of(EffectKind::Heart), 0);
    assert_eq!(h.surface.nodes_of(EffectKind::BurstEmoji), 0);
    h.advance(20_000);
    assert_eq!(h.surface.nodes_of(EffectKind::Heart), 0);
    assert!(!h.deck.one_shots().contains(OneShot::HEARTS));
}

#[test]
fn hearts_stop_after_leaving_the_closing_section() {
    let mut h = Harness::new();
    h.traverse();
    h.advance(2_000);
    assert!(h.surface.nodes_of(EffectKind::Heart) > 0);

    assert!(h.deck.go_to(10, &mut h.surface));
    h.advance(20_000);
    assert_eq!(h.current(), 10);
    assert!(!h.deck.one_shots().contains(OneShot::HEARTS));
    assert_eq!(h.surface.nodes_of(EffectKind::Heart), 0);
}

#[test]
fn oversized_delays_land_late_without_wrapping() {
    let mut config = DeckConfig::default();
    config.delays.closing_line_ms = 500_000_000;
    config.delays.signature_extra_ms = u32::MAX;
    config.delays.heart_ms = u32::MAX;
    config.delays.heart_jitter_ms = u32::MAX;
    config.confetti.stagger_ms = u32::MAX;
    config.validate().unwrap();

    let mut h = Harness::with_config(config);
    h.traverse();
    h.advance(60_000);
    assert_eq!(h.current(), 11);
    // only the first closing line is due immediately
    assert_eq!(h.surface.revealed_items(Group::ClosingLines), vec![0]);
    assert!(h.surface.revealed_items(Group::ClosingDividers).is_empty());
    assert!(!h.surface.is_visible(Target::Signature));
    assert_eq!(h.surface.nodes_of(EffectKind::BurstEmoji), 0);
}

#[test]
fn restart_starts_a_fresh_generation() {
    let fresh = Harness::new().deck.pending_tasks();
    let mut h = Harness::new();
    h.traverse();
    let generation = h.deck.generation();
    h.deck.restart(h.now, &mut h.surface);
    assert_eq!(h.deck.generation(), generation + 1);
    assert_eq!(h.deck.pending_tasks(), fresh);
}

#[test]
fn overdue_tasks_run_before_input() {
    let mut h = Harness::new();
    h.press(Input::NextButton { section: 1, click: None });
    // no tick in between: the navigation due at 200ms lands before the key press
    h.now = 1_000;
    h.press(Input::Advance);
    assert_eq!(h.current(), 2);
    assert!(h.deck.is_transitioning());
    h.advance(5_000);
    assert_eq!(h.current(), 2);
}

#[test]
fn confetti_fires_once_per_run() {
    let mut h = Harness::new();
    h.advance(10_000);
    h.next();
    h.next();
    // the full shower is staggered over 80 * 80ms and every piece expires
    h.advance(20_000);
    assert!(h.deck.one_shots().contains(OneShot::CONFETTI));
    assert_eq!(h.surface.nodes_of(EffectKind::Confetti), 0);
    assert_eq!(h.surface.revealed_items(Group::WishLines), vec![0, 1, 2, 3]);
    let appended = h
        .surface
        .ops
        .iter()
        .filter(|op| matches!(op, birthday_deck::surface::Op::Append(_, EffectKind::Confetti)))
        .count();
    assert_eq!(appended, 80);
}

#[test]
fn missing_targets_are_skipped() {
    let mut deck = Deck::new(DeckConfig::default(), &BIRTHDAY, 3).unwrap();
    let mut surface = RecordingSurface::new()
        .without(Target::IntroText)
        .without(Target::NextButton(1))
        .with_group_len(Group::WishLines, 0);
    deck.boot(0, &mut surface);
    deck.tick(10_000, &mut surface);
    assert_eq!(surface.markup(Target::IntroText), None);
    deck.handle(Input::NextButton { section: 1, click: Some((1.0, 1.0)) }, 10_000, &mut surface);
    deck.tick(20_000, &mut surface);
    assert_eq!(deck.current_section(), 2);
}
