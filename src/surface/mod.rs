//! Abstract rendering surface.
//!
//! The deck never touches the document directly; it names regions with
//! `Target` / `Group` / `Layer` and asks a `Surface` to reveal, hide, write or
//! decorate them. Implementations must treat a missing region as a no-op.

mod recording;

pub use recording::{Op, RecordingSurface};

use crate::effects::Ephemeral;

/// Named single regions of the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Target {
    NextButton(u8),
    RunCodeButton,
    RestartButton,
    IntroText,
    MysteryText,
    QuizQuestion,
    QuizOption(usize),
    QuizResult,
    FortuneCookie,
    CookieHint,
    FortuneMessage,
    FortuneText,
    CodeContent,
    TerminalOutput,
    TerminalText,
    Balloon(usize),
    WishDisplay,
    RevealedWish,
    PopCounter,
    Candle,
    CandleFlame,
    BlowInstruction,
    WishMade,
    Signature,
}

/// Static lists whose items are revealed one after another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Group {
    WishLines,
    Timeline,
    Compliments,
    ClosingLines,
    ClosingDividers,
}

impl Group {
    pub const ALL: [Group; 5] = [
        Group::WishLines,
        Group::Timeline,
        Group::Compliments,
        Group::ClosingLines,
        Group::ClosingDividers,
    ];
}

/// Containers for ephemeral decorative nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    Particles,
    Confetti,
    Hearts,
    EmojiBurst,
    /// Fixed-position overlay above everything (smoke).
    Overlay,
    /// Nested inside a specific region (button ripples).
    Inside(Target),
}

/// Visual state toggles on a region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mark {
    Correct,
    Incorrect,
    Disabled,
    Popped,
    /// Popped balloon after its pop animation: no longer drawn.
    Gone,
    Cracked,
    BlownOut,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DotState {
    Active,
    Completed,
    Upcoming,
}

/// Viewport rectangle of a region, used to position localized effects.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Anchor {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Deck-assigned identity of an ephemeral node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

pub trait Surface {
    fn set_section_active(&mut self, ordinal: u8, active: bool);
    fn reveal(&mut self, target: Target);
    fn hide(&mut self, target: Target);
    fn set_text(&mut self, target: Target, text: &str);
    /// Replace the region's markup, optionally followed by a typing cursor.
    fn set_markup(&mut self, target: Target, markup: &str, cursor: bool);
    fn set_mark(&mut self, target: Target, mark: Mark, on: bool);
    fn set_progress(&mut self, percent: f64, dots: &[DotState]);
    /// Rebuild the quiz option list; option `i` is addressed as `Target::QuizOption(i)`.
    fn fill_options(&mut self, options: &[&str]);
    fn group_len(&self, group: Group) -> usize;
    fn reveal_item(&mut self, group: Group, index: usize);
    fn reset_group(&mut self, group: Group);
    fn anchor_of(&self, target: Target) -> Option<Anchor>;
    fn append_ephemeral(&mut self, id: NodeId, node: &Ephemeral);
    fn remove_ephemeral(&mut self, id: NodeId);
}
