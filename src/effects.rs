//! Decorative effect generators.
//!
//! Each generator is a pure function of a count, a palette/glyph pool and a
//! random source. It returns node descriptions; the deck appends them to the
//! surface (after `spawn_delay_ms`) and removes them after `lifetime_ms`.

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::config::{ConfettiConfig, ParticleConfig};
use crate::surface::{Anchor, Layer, Target};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Particle,
    Confetti,
    MiniConfetti,
    Smoke,
    Heart,
    Ripple,
    BurstEmoji,
}

impl EffectKind {
    pub fn class_name(self) -> &'static str {
        match self {
            EffectKind::Particle => "particle",
            EffectKind::Confetti | EffectKind::MiniConfetti => "confetti",
            EffectKind::Smoke => "smoke-puff",
            EffectKind::Heart => "heart",
            EffectKind::Ripple => "ripple",
            EffectKind::BurstEmoji => "burst-emoji",
        }
    }
}

/// Description of one short-lived decorative node.
#[derive(Clone, Debug, PartialEq)]
pub struct Ephemeral {
    pub kind: EffectKind,
    pub layer: Layer,
    pub glyph: Option<&'static str>,
    /// Inline CSS properties.
    pub style: Vec<(&'static str, String)>,
    pub spawn_delay_ms: u32,
    /// `None` keeps the node until the deck restarts.
    pub lifetime_ms: Option<u32>,
}

impl Ephemeral {
    fn new(kind: EffectKind, layer: Layer) -> Self {
        Self {
            kind,
            layer,
            glyph: None,
            style: Vec::new(),
            spawn_delay_ms: 0,
            lifetime_ms: None,
        }
    }

    fn with(mut self, prop: &'static str, value: String) -> Self {
        self.style.push((prop, value));
        self
    }

    pub fn style_value(&self, prop: &str) -> Option<&str> {
        self.style.iter().find(|(p, _)| *p == prop).map(|(_, v)| v.as_str())
    }
}

fn pick_color<R: Rng>(palette: &[String], rng: &mut R) -> String {
    palette.choose(rng).cloned().unwrap_or_else(|| "#ffffff".to_string())
}

/// Slow background drift, created once per load.
pub fn ambient_particles<R: Rng>(cfg: &ParticleConfig, rng: &mut R) -> Vec<Ephemeral> {
    (0..cfg.count)
        .map(|_| {
            let color = pick_color(&cfg.colors, rng);
            let size: f64 = rng.random_range(5.0..20.0);
            let left: f64 = rng.random_range(0.0..100.0);
            let duration: f64 = rng.random_range(15.0..25.0);
            let delay: f64 = rng.random_range(0.0..10.0);
            Ephemeral::new(EffectKind::Particle, Layer::Particles)
                .with("left", format!("{left:.2}%"))
                .with("width", format!("{size:.1}px"))
                .with("height", format!("{size:.1}px"))
                .with("background", color)
                .with("animation-duration", format!("{duration:.2}s"))
                .with("animation-delay", format!("{delay:.2}s"))
        })
        .collect()
}

/// Full-screen confetti shower, one piece every `stagger_ms`.
pub fn confetti_burst<R: Rng>(cfg: &ConfettiConfig, rng: &mut R) -> Vec<Ephemeral> {
    (0..cfg.count)
        .map(|i| {
            let color = pick_color(&cfg.colors, rng);
            let left: f64 = rng.random_range(0.0..100.0);
            let size: f64 = rng.random_range(5.0..15.0);
            let duration_ms: u32 = rng.random_range(3_000..5_000);
            let radius = if rng.random_bool(0.5) { "50%" } else { "0" };
            let mut piece = Ephemeral::new(EffectKind::Confetti, Layer::Confetti)
                .with("left", format!("{left:.2}%"))
                .with("width", format!("{size:.1}px"))
                .with("height", format!("{size:.1}px"))
                .with("background", color)
                .with("border-radius", radius.to_string())
                .with("animation-duration", format!("{}ms", duration_ms));
            piece.spawn_delay_ms = (i as u32).saturating_mul(cfg.stagger_ms);
            piece.lifetime_ms = Some(duration_ms);
            piece
        })
        .collect()
}

/// Small burst from the top centre of `anchor` (popped balloon).
pub fn mini_burst<R: Rng>(anchor: Anchor, cfg: &ConfettiConfig, rng: &mut R) -> Vec<Ephemeral> {
    let x = anchor.left + anchor.width / 2.0;
    (0..cfg.mini_count)
        .map(|_| {
            let mut piece = Ephemeral::new(EffectKind::MiniConfetti, Layer::Confetti)
                .with("left", format!("{x:.1}px"))
                .with("top", format!("{:.1}px", anchor.top))
                .with("width", "8px".to_string())
                .with("height", "8px".to_string())
                .with("background", pick_color(&cfg.colors, rng))
                .with("animation-duration", "1.5s".to_string());
            piece.lifetime_ms = Some(1_500);
            piece
        })
        .collect()
}

/// Puffs rising from just above `anchor` (blown candle).
pub fn smoke(anchor: Anchor, puffs: usize) -> Vec<Ephemeral> {
    let x = anchor.left + anchor.width / 2.0;
    let y = anchor.top - 40.0;
    (0..puffs)
        .map(|i| {
            let mut puff = Ephemeral::new(EffectKind::Smoke, Layer::Overlay)
                .with("left", format!("{x:.1}px"))
                .with("top", format!("{y:.1}px"))
                .with("animation-delay", format!("{:.1}s", i as f64 * 0.1));
            puff.lifetime_ms = Some(1_000);
            puff
        })
        .collect()
}

/// One floating heart plus the wait before the next one.
pub fn floating_heart<R: Rng>(
    glyphs: &'static [&'static str],
    base_ms: u32,
    jitter_ms: u32,
    rng: &mut R,
) -> Option<(Ephemeral, u32)> {
    let glyph = *glyphs.choose(rng)?;
    let left: f64 = rng.random_range(0.0..100.0);
    let duration_ms: u32 = rng.random_range(3_000..5_000);
    let size: f64 = rng.random_range(0.8..1.8);
    let mut heart = Ephemeral::new(EffectKind::Heart, Layer::Hearts)
        .with("left", format!("{left:.2}%"))
        .with("font-size", format!("{size:.2}rem"))
        .with("animation-duration", format!("{}ms", duration_ms));
    heart.glyph = Some(glyph);
    heart.lifetime_ms = Some(duration_ms);
    let next = base_ms.saturating_add(rng.random_range(0..=jitter_ms));
    Some((heart, next))
}

/// Press ripple inside `target`, centred on the click (or the middle for keyboard presses).
pub fn ripple(target: Target, rect: Anchor, click: Option<(f64, f64)>, lifetime_ms: u32) -> Ephemeral {
    let size = rect.width.max(rect.height);
    let (cx, cy) = click.unwrap_or((rect.left + rect.width / 2.0, rect.top + rect.height / 2.0));
    let x = cx - rect.left - size / 2.0;
    let y = cy - rect.top - size / 2.0;
    let mut ripple = Ephemeral::new(EffectKind::Ripple, Layer::Inside(target))
        .with("width", format!("{size:.1}px"))
        .with("height", format!("{size:.1}px"))
        .with("left", format!("{x:.1}px"))
        .with("top", format!("{y:.1}px"));
    ripple.lifetime_ms = Some(lifetime_ms);
    ripple
}

/// Closing celebration glyphs, one every `step_ms`, kept until restart.
pub fn emoji_burst(glyphs: &'static [&'static str], step_ms: u32) -> Vec<Ephemeral> {
    glyphs
        .iter()
        .enumerate()
        .map(|(i, glyph)| {
            let mut e = Ephemeral::new(EffectKind::BurstEmoji, Layer::EmojiBurst)
                .with("animation-delay", format!("{:.1}s", i as f64 * 0.1));
            e.glyph = Some(*glyph);
            e.spawn_delay_ms = (i as u32).saturating_mul(step_ms);
            e
        })
        .collect()
}
