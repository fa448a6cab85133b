//! Section progression state machine.
//!
//! Exactly one section is current. A transition is two-phase: `begin` accepts
//! a request and raises the transitioning guard, `enter` makes the pending
//! target current once the exit fade is over, and `settle` lowers the guard.
//! While the guard is up every other request is ignored.

use bitflags::bitflags;

use crate::error::DeckError;
use crate::surface::DotState;

bitflags! {
    /// Section-entry effects that fire at most once until restart.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct OneShot: u8 {
        const PARTICLES   = 1 << 0;
        const CONFETTI    = 1 << 1;
        const CODE_TYPED  = 1 << 2;
        const HEARTS      = 1 << 3;
        const EMOJI_BURST = 1 << 4;
    }
}

/// An accepted navigation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: u8,
    pub to: u8,
}

#[derive(Clone, Debug)]
pub struct Navigator {
    total: u8,
    current: u8,
    transitioning: bool,
    pending: Option<u8>,
    flags: OneShot,
    /// Bit `n` set when section `n` may be advanced from.
    open: u32,
    initial_open: u32,
}

impl Navigator {
    /// `locked` lists the sections whose forward affordance starts hidden.
    pub fn new(total: u8, locked: &[u8]) -> Result<Self, DeckError> {
        if !(2..=31).contains(&total) {
            return Err(DeckError::SectionCount(total));
        }
        let mut open = 0u32;
        for n in 1..total {
            if !locked.contains(&n) {
                open |= 1 << n;
            }
        }
        Ok(Self {
            total,
            current: 1,
            transitioning: false,
            pending: None,
            flags: OneShot::empty(),
            open,
            initial_open: open,
        })
    }

    pub fn current(&self) -> u8 {
        self.current
    }

    pub fn total(&self) -> u8 {
        self.total
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    pub fn is_last(&self) -> bool {
        self.current == self.total
    }

    /// Validate a request; on success the guard is raised until `settle`.
    pub fn begin(&mut self, target: u8) -> Option<Transition> {
        if self.transitioning || target == self.current || target < 1 || target > self.total {
            log::trace!(
                "nav: ignored request {} (current {}, transitioning {})",
                target,
                self.current,
                self.transitioning
            );
            return None;
        }
        self.transitioning = true;
        self.pending = Some(target);
        Some(Transition {
            from: self.current,
            to: target,
        })
    }

    /// Make the pending target current. Returns `false` when `target` is not
    /// the accepted request (a stale enter).
    pub fn enter(&mut self, target: u8) -> bool {
        if self.pending != Some(target) {
            return false;
        }
        self.pending = None;
        self.current = target;
        true
    }

    pub fn settle(&mut self) {
        if self.pending.is_none() {
            self.transitioning = false;
        }
    }

    pub fn is_open(&self, ordinal: u8) -> bool {
        ordinal < self.total && self.open & (1 << ordinal) != 0
    }

    /// Open the gate of `ordinal`. `true` only the first time.
    pub fn unlock(&mut self, ordinal: u8) -> bool {
        if ordinal == 0 || ordinal >= self.total || self.is_open(ordinal) {
            return false;
        }
        self.open |= 1 << ordinal;
        true
    }

    pub fn can_advance(&self) -> bool {
        self.current < self.total && self.is_open(self.current)
    }

    pub fn flags(&self) -> OneShot {
        self.flags
    }

    /// Set `flag`; `true` if it was not set before.
    pub fn claim(&mut self, flag: OneShot) -> bool {
        let fresh = !self.flags.contains(flag);
        self.flags.insert(flag);
        fresh
    }

    pub fn release(&mut self, flag: OneShot) {
        self.flags.remove(flag);
    }

    pub fn progress_percent(&self) -> f64 {
        (self.current - 1) as f64 / (self.total - 1) as f64 * 100.0
    }

    pub fn dots(&self) -> Vec<DotState> {
        (1..=self.total)
            .map(|n| {
                if n == self.current {
                    DotState::Active
                } else if n < self.current {
                    DotState::Completed
                } else {
                    DotState::Upcoming
                }
            })
            .collect()
    }

    pub fn reset(&mut self) {
        self.current = 1;
        self.transitioning = false;
        self.pending = None;
        self.flags = OneShot::empty();
        self.open = self.initial_open;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nav() -> Navigator {
        Navigator::new(11, &[4, 5, 7, 8, 9]).unwrap()
    }

    #[test]
    fn out_of_range_targets_change_nothing() {
        let mut n = nav();
        for target in [0u8, 12, 200] {
            assert!(n.begin(target).is_none());
            assert_eq!(n.current(), 1);
            assert!(!n.is_transitioning());
        }
        assert!(n.begin(1).is_none());
    }

    #[test]
    fn second_request_while_transitioning_is_ignored() {
        let mut n = nav();
        assert_eq!(n.begin(2), Some(Transition { from: 1, to: 2 }));
        assert!(n.begin(3).is_none());
        assert!(n.enter(2));
        assert!(n.begin(3).is_none());
        n.settle();
        assert_eq!(n.current(), 2);
        assert!(n.begin(3).is_some());
    }

    #[test]
    fn stale_enter_is_rejected() {
        let mut n = nav();
        n.begin(2);
        assert!(!n.enter(5));
        assert_eq!(n.current(), 1);
        // settle before the real enter keeps the guard up
        n.settle();
        assert!(n.is_transitioning());
    }

    #[test]
    fn gates_unlock_once() {
        let mut n = nav();
        assert!(n.is_open(1));
        assert!(!n.is_open(4));
        assert!(n.unlock(4));
        assert!(!n.unlock(4));
        assert!(!n.unlock(11));
        assert!(!n.unlock(1));
    }

    #[test]
    fn claim_is_one_shot_until_reset() {
        let mut n = nav();
        assert!(n.claim(OneShot::CONFETTI));
        assert!(!n.claim(OneShot::CONFETTI));
        n.unlock(4);
        n.reset();
        assert_eq!(n.flags(), OneShot::empty());
        assert!(!n.is_open(4));
        assert!(n.claim(OneShot::CONFETTI));
    }

    #[test]
    fn progress_and_dots() {
        let mut n = Navigator::new(3, &[]).unwrap();
        assert_eq!(n.progress_percent(), 0.0);
        n.begin(3);
        n.enter(3);
        assert_eq!(n.progress_percent(), 100.0);
        assert_eq!(n.dots(), vec![DotState::Completed, DotState::Completed, DotState::Active]);
        assert!(!n.can_advance());
    }

    #[test]
    fn tiny_decks_are_rejected() {
        assert!(matches!(Navigator::new(1, &[]), Err(DeckError::SectionCount(1))));
    }
}
