// One-shot interactions: each moves forward once and ignores repeats.

use rand::Rng;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Candle {
    #[default]
    Lit,
    Blown,
}

impl Candle {
    /// `true` the first time only.
    pub fn blow(&mut self) -> bool {
        if *self == Candle::Blown {
            return false;
        }
        *self = Candle::Blown;
        true
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FortuneCookie {
    #[default]
    Sealed,
    Cracked { message: usize },
}

impl FortuneCookie {
    /// Crack the cookie and pick a message index uniformly from `0..pool`.
    pub fn crack<R: Rng>(&mut self, pool: usize, rng: &mut R) -> Option<usize> {
        if *self != FortuneCookie::Sealed || pool == 0 {
            return None;
        }
        let message = rng.random_range(0..pool);
        *self = FortuneCookie::Cracked { message };
        Some(message)
    }

    pub fn message(&self) -> Option<usize> {
        match *self {
            FortuneCookie::Cracked { message } => Some(message),
            FortuneCookie::Sealed => None,
        }
    }
}

/// Code section: typing → run button → terminal output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum CodeRunner {
    #[default]
    Hidden,
    Ready,
    Running,
    Done,
}

impl CodeRunner {
    pub fn ready(&mut self) -> bool {
        self.step(CodeRunner::Hidden, CodeRunner::Ready)
    }

    pub fn run(&mut self) -> bool {
        self.step(CodeRunner::Ready, CodeRunner::Running)
    }

    pub fn finish(&mut self) -> bool {
        self.step(CodeRunner::Running, CodeRunner::Done)
    }

    fn step(&mut self, from: CodeRunner, to: CodeRunner) -> bool {
        if *self != from {
            return false;
        }
        *self = to;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn candle_blows_once() {
        let mut c = Candle::default();
        assert!(c.blow());
        assert!(!c.blow());
    }

    #[test]
    fn fortune_picks_from_pool_once() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut cookie = FortuneCookie::default();
        assert!(cookie.crack(0, &mut rng).is_none());
        let m = cookie.crack(5, &mut rng).unwrap();
        assert!(m < 5);
        assert_eq!(cookie.message(), Some(m));
        assert!(cookie.crack(5, &mut rng).is_none());
    }

    #[test]
    fn fortune_choice_covers_pool() {
        let mut rng = SmallRng::seed_from_u64(9);
        let mut seen = [false; 5];
        for _ in 0..200 {
            let mut cookie = FortuneCookie::default();
            seen[cookie.crack(5, &mut rng).unwrap()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn runner_moves_strictly_forward() {
        let mut r = CodeRunner::default();
        assert!(!r.run());
        assert!(r.ready());
        assert!(!r.ready());
        assert!(r.run());
        assert!(!r.run());
        assert!(r.finish());
        assert_eq!(r, CodeRunner::Done);
    }
}
