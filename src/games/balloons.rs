#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Balloon {
    Intact,
    Popped,
    /// Pop animation over; no longer drawn.
    Gone,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Popped {
    pub index: usize,
    pub wish: &'static str,
    pub count: u32,
    /// Set only by the pop that first reaches the threshold.
    pub unlocks: bool,
}

/// Pop-the-balloons game: each balloon hides one wish.
#[derive(Clone, Debug)]
pub struct BalloonGame {
    wishes: &'static [&'static str],
    balloons: Vec<Balloon>,
    popped: u32,
    threshold: u32,
    playing: bool,
    unlocked: bool,
}

impl BalloonGame {
    pub fn new(wishes: &'static [&'static str], threshold: u32) -> Self {
        Self {
            wishes,
            balloons: vec![Balloon::Intact; wishes.len()],
            popped: 0,
            threshold,
            playing: false,
            unlocked: false,
        }
    }

    pub fn len(&self) -> usize {
        self.balloons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balloons.is_empty()
    }

    pub fn popped(&self) -> u32 {
        self.popped
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    pub fn balloon(&self, index: usize) -> Option<Balloon> {
        self.balloons.get(index).copied()
    }

    /// Accept pops from now on. `false` if already playing.
    pub fn start(&mut self) -> bool {
        !std::mem::replace(&mut self.playing, true)
    }

    pub fn pop(&mut self, index: usize) -> Option<Popped> {
        if !self.playing {
            return None;
        }
        let slot = self.balloons.get_mut(index)?;
        if *slot != Balloon::Intact {
            return None;
        }
        *slot = Balloon::Popped;
        self.popped += 1;
        let unlocks = !self.unlocked && self.popped >= self.threshold;
        if unlocks {
            self.unlocked = true;
        }
        Some(Popped {
            index,
            wish: self.wishes[index],
            count: self.popped,
            unlocks,
        })
    }

    /// Finish the pop animation of `index`.
    pub fn clear(&mut self, index: usize) -> bool {
        match self.balloons.get_mut(index) {
            Some(slot) if *slot == Balloon::Popped => {
                *slot = Balloon::Gone;
                true
            }
            _ => false,
        }
    }

    pub fn reset(&mut self) {
        self.balloons.fill(Balloon::Intact);
        self.popped = 0;
        self.playing = false;
        self.unlocked = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::WISHES;

    fn game() -> BalloonGame {
        let mut g = BalloonGame::new(WISHES, 6);
        g.start();
        g
    }

    #[test]
    fn double_pop_counts_once() {
        let mut g = game();
        let first = g.pop(2).unwrap();
        assert_eq!(first.count, 1);
        assert_eq!(first.wish, WISHES[2]);
        assert!(g.pop(2).is_none());
        g.clear(2);
        assert!(g.pop(2).is_none());
        assert_eq!(g.popped(), 1);
    }

    #[test]
    fn threshold_unlocks_exactly_once() {
        let mut g = game();
        let unlocks: Vec<bool> = (0..6).map(|i| g.pop(i).unwrap().unlocks).collect();
        assert_eq!(unlocks, vec![false, false, false, false, false, true]);
        assert!(g.is_unlocked());
        assert!(g.pop(0).is_none());
    }

    #[test]
    fn lower_threshold_does_not_retrigger() {
        let mut g = BalloonGame::new(WISHES, 2);
        g.start();
        g.pop(0);
        assert!(g.pop(1).unwrap().unlocks);
        assert!(!g.pop(2).unwrap().unlocks);
    }

    #[test]
    fn pops_before_start_are_ignored() {
        let mut g = BalloonGame::new(WISHES, 6);
        assert!(g.pop(0).is_none());
        assert!(g.start());
        assert!(!g.start());
        assert!(g.pop(0).is_some());
        assert!(g.pop(42).is_none());
    }

    #[test]
    fn reset_restores_every_balloon() {
        let mut g = game();
        g.pop(0);
        g.clear(0);
        g.reset();
        assert_eq!(g.popped(), 0);
        assert_eq!(g.balloon(0), Some(Balloon::Intact));
        assert!(g.pop(0).is_none());
    }
}
