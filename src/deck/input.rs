/// Discrete user intents, already stripped of DOM details.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Input {
    /// Next button of `section`; `click` is the pointer position for the ripple.
    NextButton { section: u8, click: Option<(f64, f64)> },
    /// Keyboard advance or upward swipe.
    Advance,
    QuizOption(usize),
    Balloon(usize),
    Candle,
    FortuneCookie,
    RunCode,
    Restart { click: Option<(f64, f64)> },
}

impl Input {
    pub fn from_key(key: &str) -> Option<Input> {
        match key {
            "Enter" | " " => Some(Input::Advance),
            _ => None,
        }
    }
}

/// Turns a touch start/end pair into an advance when the finger moved up far enough.
#[derive(Clone, Copy, Debug)]
pub struct SwipeTracker {
    start_y: Option<f64>,
    threshold_px: f64,
}

impl SwipeTracker {
    pub fn new(threshold_px: f64) -> Self {
        Self { start_y: None, threshold_px }
    }

    pub fn begin(&mut self, y: f64) {
        self.start_y = Some(y);
    }

    pub fn end(&mut self, y: f64) -> Option<Input> {
        let start = self.start_y.take()?;
        (start - y > self.threshold_px).then_some(Input::Advance)
    }
}
