// Section table and per-section entry triggers.

use super::{Deck, Task, TypeSlot};
use crate::navigator::OneShot;
use crate::surface::{Group, Surface, Target};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectionKind {
    Intro,
    Mystery,
    Wishes,
    Quiz,
    Fortune,
    Timeline,
    Code,
    Balloons,
    Candle,
    Compliments,
    Closing,
}

/// Presentation order; ordinal `n` is `SECTIONS[n - 1]`.
pub const SECTIONS: [SectionKind; 11] = [
    SectionKind::Intro,
    SectionKind::Mystery,
    SectionKind::Wishes,
    SectionKind::Quiz,
    SectionKind::Fortune,
    SectionKind::Timeline,
    SectionKind::Code,
    SectionKind::Balloons,
    SectionKind::Candle,
    SectionKind::Compliments,
    SectionKind::Closing,
];

/// Sections whose next button stays hidden until their interaction completes.
pub const LOCKED: [u8; 5] = [4, 5, 7, 8, 9];

pub fn kind_of(ordinal: u8) -> Option<SectionKind> {
    SECTIONS.get((ordinal as usize).checked_sub(1)?).copied()
}

pub fn ordinal_of(kind: SectionKind) -> u8 {
    SECTIONS.iter().position(|k| *k == kind).map_or(0, |i| i as u8 + 1)
}

impl Deck {
    /// Fire the entry effects of `ordinal`. Runs on every entry; effects that
    /// must not repeat are guarded by one-shot flags or game state.
    pub(super) fn run_entry(&mut self, ordinal: u8, surface: &mut dyn Surface) {
        let Some(kind) = kind_of(ordinal) else {
            return;
        };
        log::debug!("entry: section {} ({:?})", ordinal, kind);
        let d = self.config.delays.clone();
        match kind {
            SectionKind::Intro => self.scheduler.schedule(d.intro_ms, Task::StartTyping(TypeSlot::Intro)),
            SectionKind::Mystery => self.scheduler.schedule(d.mystery_ms, Task::StartTyping(TypeSlot::Mystery)),
            SectionKind::Wishes => {
                if self.nav.claim(OneShot::CONFETTI) {
                    self.scheduler.schedule(d.confetti_ms, Task::Confetti);
                }
                self.stagger(Group::WishLines, d.wish_line_ms, 1, surface);
            }
            SectionKind::Quiz => {
                if let Some(q) = self.quiz.start() {
                    self.show_question(q, surface);
                }
            }
            SectionKind::Fortune | SectionKind::Candle => {}
            SectionKind::Timeline => self.stagger(Group::Timeline, d.timeline_ms, 1, surface),
            SectionKind::Code => {
                if self.nav.claim(OneShot::CODE_TYPED) {
                    self.scheduler.schedule(d.code_ms, Task::StartTyping(TypeSlot::Code));
                }
            }
            SectionKind::Balloons => {
                if self.balloons.start() {
                    surface.set_text(Target::PopCounter, "0");
                }
            }
            SectionKind::Compliments => self.stagger(Group::Compliments, d.compliment_ms, 1, surface),
            SectionKind::Closing => {
                let step = d.closing_line_ms;
                let lines = surface.group_len(Group::ClosingLines);
                self.stagger(Group::ClosingLines, step, 0, surface);
                for i in 0..surface.group_len(Group::ClosingDividers) {
                    let at = (3 + 3 * i as u32).saturating_mul(step);
                    self.scheduler.schedule(at, Task::RevealItem(Group::ClosingDividers, i));
                }
                let signature_at = (lines as u32).saturating_mul(step).saturating_add(d.signature_extra_ms);
                self.scheduler.schedule(signature_at, Task::Reveal(Target::Signature));
                if self.nav.claim(OneShot::HEARTS) {
                    self.heart(surface);
                }
                if self.nav.claim(OneShot::EMOJI_BURST) {
                    self.scheduler.schedule(step.saturating_mul(10), Task::EmojiBurst);
                }
            }
        }
    }

    /// Reveal every item of `group`, item `i` after `(i + offset) * step_ms`.
    /// Delays saturate at `u32::MAX`.
    fn stagger(&mut self, group: Group, step_ms: u32, offset: u32, surface: &dyn Surface) {
        for i in 0..surface.group_len(group) {
            self.scheduler
                .schedule((i as u32 + offset).saturating_mul(step_ms), Task::RevealItem(group, i));
        }
    }
}
