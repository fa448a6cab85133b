// In-memory surface: keeps a model of what the document would show plus an
// ordered log of every operation. Used for headless runs and tests.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use super::{Anchor, DotState, Group, Layer, Mark, NodeId, Surface, Target};
use crate::effects::{EffectKind, Ephemeral};

/// One recorded surface operation.
#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    Active(u8, bool),
    Reveal(Target),
    Hide(Target),
    Text(Target, String),
    Markup(Target, String, bool),
    Mark(Target, Mark, bool),
    Progress(f64),
    Options(Vec<String>),
    RevealItem(Group, usize),
    ResetGroup(Group),
    Append(NodeId, EffectKind),
    Remove(NodeId),
}

pub struct RecordingSurface {
    pub ops: Vec<Op>,
    active: BTreeSet<u8>,
    visible: HashSet<Target>,
    texts: HashMap<Target, String>,
    markup: HashMap<Target, (String, bool)>,
    marks: HashSet<(Target, Mark)>,
    progress: f64,
    dots: Vec<DotState>,
    options: Vec<String>,
    group_lens: HashMap<Group, usize>,
    revealed: HashMap<Group, BTreeSet<usize>>,
    nodes: BTreeMap<NodeId, Ephemeral>,
    missing: HashSet<Target>,
    max_active: usize,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSurface {
    pub fn new() -> Self {
        let group_lens = HashMap::from([
            (Group::WishLines, 4),
            (Group::Timeline, 4),
            (Group::Compliments, 4),
            (Group::ClosingLines, 6),
            (Group::ClosingDividers, 2),
        ]);
        Self {
            ops: Vec::new(),
            active: BTreeSet::new(),
            visible: HashSet::new(),
            texts: HashMap::new(),
            markup: HashMap::new(),
            marks: HashSet::new(),
            progress: 0.0,
            dots: Vec::new(),
            options: Vec::new(),
            group_lens,
            revealed: HashMap::new(),
            nodes: BTreeMap::new(),
            missing: HashSet::new(),
            max_active: 0,
        }
    }

    /// Pretend `target` does not exist in the document.
    pub fn without(mut self, target: Target) -> Self {
        self.missing.insert(target);
        self
    }

    pub fn with_group_len(mut self, group: Group, len: usize) -> Self {
        self.group_lens.insert(group, len);
        self
    }

    fn present(&self, target: Target) -> bool {
        !self.missing.contains(&target)
    }

    pub fn active_sections(&self) -> Vec<u8> {
        self.active.iter().copied().collect()
    }

    /// Largest number of simultaneously active sections ever observed.
    pub fn max_active(&self) -> usize {
        self.max_active
    }

    pub fn is_visible(&self, target: Target) -> bool {
        self.visible.contains(&target)
    }

    pub fn text(&self, target: Target) -> Option<&str> {
        self.texts.get(&target).map(String::as_str)
    }

    pub fn markup(&self, target: Target) -> Option<(&str, bool)> {
        self.markup.get(&target).map(|(m, c)| (m.as_str(), *c))
    }

    pub fn has_mark(&self, target: Target, mark: Mark) -> bool {
        self.marks.contains(&(target, mark))
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn dots(&self) -> &[DotState] {
        &self.dots
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn revealed_items(&self, group: Group) -> Vec<usize> {
        self.revealed.get(&group).map(|s| s.iter().copied().collect()).unwrap_or_default()
    }

    pub fn live_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes_of(&self, kind: EffectKind) -> usize {
        self.nodes.values().filter(|n| n.kind == kind).count()
    }

    /// Next-button sections in the order they were revealed.
    pub fn unlocks(&self) -> Vec<u8> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Reveal(Target::NextButton(n)) => Some(*n),
                _ => None,
            })
            .collect()
    }

    pub fn clear_log(&mut self) {
        self.ops.clear();
    }
}

impl Surface for RecordingSurface {
    fn set_section_active(&mut self, ordinal: u8, active: bool) {
        if active {
            self.active.insert(ordinal);
        } else {
            self.active.remove(&ordinal);
        }
        self.max_active = self.max_active.max(self.active.len());
        self.ops.push(Op::Active(ordinal, active));
    }

    fn reveal(&mut self, target: Target) {
        if !self.present(target) {
            return;
        }
        self.visible.insert(target);
        self.ops.push(Op::Reveal(target));
    }

    fn hide(&mut self, target: Target) {
        if !self.present(target) {
            return;
        }
        self.visible.remove(&target);
        self.ops.push(Op::Hide(target));
    }

    fn set_text(&mut self, target: Target, text: &str) {
        if !self.present(target) {
            return;
        }
        self.markup.remove(&target);
        self.texts.insert(target, text.to_string());
        self.ops.push(Op::Text(target, text.to_string()));
    }

    fn set_markup(&mut self, target: Target, markup: &str, cursor: bool) {
        if !self.present(target) {
            return;
        }
        self.texts.remove(&target);
        self.markup.insert(target, (markup.to_string(), cursor));
        self.ops.push(Op::Markup(target, markup.to_string(), cursor));
    }

    fn set_mark(&mut self, target: Target, mark: Mark, on: bool) {
        if !self.present(target) {
            return;
        }
        if on {
            self.marks.insert((target, mark));
        } else {
            self.marks.remove(&(target, mark));
        }
        self.ops.push(Op::Mark(target, mark, on));
    }

    fn set_progress(&mut self, percent: f64, dots: &[DotState]) {
        self.progress = percent;
        self.dots = dots.to_vec();
        self.ops.push(Op::Progress(percent));
    }

    fn fill_options(&mut self, options: &[&str]) {
        self.options = options.iter().map(|o| o.to_string()).collect();
        self.marks.retain(|(t, _)| !matches!(t, Target::QuizOption(_)));
        self.ops.push(Op::Options(self.options.clone()));
    }

    fn group_len(&self, group: Group) -> usize {
        self.group_lens.get(&group).copied().unwrap_or(0)
    }

    fn reveal_item(&mut self, group: Group, index: usize) {
        if index >= self.group_len(group) {
            return;
        }
        self.revealed.entry(group).or_default().insert(index);
        self.ops.push(Op::RevealItem(group, index));
    }

    fn reset_group(&mut self, group: Group) {
        self.revealed.remove(&group);
        self.ops.push(Op::ResetGroup(group));
    }

    fn anchor_of(&self, target: Target) -> Option<Anchor> {
        self.present(target).then_some(Anchor {
            left: 100.0,
            top: 200.0,
            width: 80.0,
            height: 40.0,
        })
    }

    fn append_ephemeral(&mut self, id: NodeId, node: &Ephemeral) {
        if let Layer::Inside(target) = node.layer {
            if !self.present(target) {
                return;
            }
        }
        self.nodes.insert(id, node.clone());
        self.ops.push(Op::Append(id, node.kind));
    }

    fn remove_ephemeral(&mut self, id: NodeId) {
        if self.nodes.remove(&id).is_some() {
            self.ops.push(Op::Remove(id));
        }
    }
}
