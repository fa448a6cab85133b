use thiserror::Error;

/// Reasons a deck refuses to start. Runtime operations never fail; these only
/// come out of construction and config parsing.
#[derive(Debug, Error)]
pub enum DeckError {
    #[error("a deck needs between 2 and 31 sections, got {0}")]
    SectionCount(u8),

    #[error("quiz has no questions")]
    EmptyQuiz,

    #[error("quiz question {question} marks option {correct} correct but has {options} options")]
    CorrectOutOfRange {
        question: usize,
        correct: usize,
        options: usize,
    },

    #[error("balloon threshold {threshold} exceeds the {balloons} balloons available")]
    ThresholdUnreachable { threshold: u32, balloons: usize },

    #[error("{0} must not be empty")]
    EmptyPool(&'static str),

    #[error("config: {0}")]
    Config(String),
}

#[cfg(feature = "serde_json")]
impl From<serde_json::Error> for DeckError {
    fn from(e: serde_json::Error) -> Self {
        DeckError::Config(e.to_string())
    }
}
