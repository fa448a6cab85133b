//! Mini-game controllers. Each is a small state machine that reports, through
//! its return values, when the section's forward affordance should unlock.

pub mod balloons;
pub mod latch;
pub mod quiz;

pub use balloons::{Balloon, BalloonGame, Popped};
pub use latch::{Candle, CodeRunner, FortuneCookie};
pub use quiz::{Answered, OptionMark, Quiz, QuizPhase, QuizStep};
