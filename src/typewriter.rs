//! Typewriter text reveal as a lazy frame generator.
//!
//! A `Typewriter` never touches timers itself. Each call to `next()` yields one
//! `TypeFrame`: what to draw (if anything) and how long to wait before asking
//! for the following frame. The deck feeds those waits into the scheduler.
//! The final frame carries `Next::Finished` and is yielded exactly once.

use crate::highlight::{self, HighlightRules};

/// How a text is revealed.
#[derive(Clone, Copy, Debug)]
pub enum TypeMode {
    /// Line-by-line prose with a cursor, rendered as markup joined by `<br>`.
    Lines { char_ms: u32, line_pause_ms: u32 },
    /// Character stream rendered as plain text, highlighted once finished.
    Code { char_ms: u32, rules: HighlightRules },
    /// Character stream rendered as plain text.
    Terminal { char_ms: u32 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrameContent {
    Markup(String),
    Text(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Next {
    After(u32),
    Finished,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeFrame {
    /// `None` for pure pauses that leave the surface untouched.
    pub content: Option<FrameContent>,
    pub cursor: bool,
    pub next: Next,
}

pub struct Typewriter {
    mode: TypeMode,
    source: &'static str,
    lines: Vec<Vec<char>>,
    line: usize,
    col: usize,
    buffer: String,
    done: bool,
}

impl Typewriter {
    pub fn new(source: &'static str, mode: TypeMode) -> Self {
        let lines = match mode {
            TypeMode::Lines { .. } => source.split('\n').map(|l| l.chars().collect()).collect(),
            // character modes stream the whole text, newlines included
            TypeMode::Code { .. } | TypeMode::Terminal { .. } => vec![source.chars().collect()],
        };
        Self {
            mode,
            source,
            lines,
            line: 0,
            col: 0,
            buffer: String::with_capacity(source.len() * 2),
            done: false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.done
    }

    fn finish(&mut self) -> TypeFrame {
        self.done = true;
        let content = match self.mode {
            TypeMode::Lines { .. } => Some(FrameContent::Markup(self.buffer.clone())),
            TypeMode::Code { rules, .. } => Some(FrameContent::Markup(highlight::highlight(self.source, &rules))),
            TypeMode::Terminal { .. } => None,
        };
        TypeFrame { content, cursor: false, next: Next::Finished }
    }

    fn next_line_frame(&mut self, char_ms: u32, line_pause_ms: u32) -> TypeFrame {
        let len = self.lines.get(self.line).map_or(0, Vec::len);
        if self.col < len {
            let c = self.lines[self.line][self.col];
            highlight::push_escaped(&mut self.buffer, c);
            self.col += 1;
            return TypeFrame {
                content: Some(FrameContent::Markup(self.buffer.clone())),
                cursor: true,
                next: Next::After(char_ms),
            };
        }
        self.line += 1;
        if self.line < self.lines.len() {
            self.buffer.push_str("<br>");
            self.col = 0;
            return TypeFrame { content: None, cursor: true, next: Next::After(line_pause_ms) };
        }
        self.finish()
    }

    fn next_char_frame(&mut self, char_ms: u32) -> TypeFrame {
        let stream = &self.lines[0];
        if self.col < stream.len() {
            self.buffer.push(stream[self.col]);
            self.col += 1;
            return TypeFrame {
                content: Some(FrameContent::Text(self.buffer.clone())),
                cursor: false,
                next: Next::After(char_ms),
            };
        }
        self.finish()
    }
}

impl Iterator for Typewriter {
    type Item = TypeFrame;

    fn next(&mut self) -> Option<TypeFrame> {
        if self.done {
            return None;
        }
        Some(match self.mode {
            TypeMode::Lines { char_ms, line_pause_ms } => self.next_line_frame(char_ms, line_pause_ms),
            TypeMode::Code { char_ms, .. } | TypeMode::Terminal { char_ms } => self.next_char_frame(char_ms),
        })
    }
}
