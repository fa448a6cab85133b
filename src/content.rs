// Presentation content: typed texts, quiz, fortunes, balloon wishes and the
// glyph pools used by the decorative effects. Everything is `'static` so the
// deck can hand out `&'static str` without cloning.

use crate::error::DeckError;
use crate::highlight::HighlightRules;

/// One quiz question.
#[derive(Clone, Copy, Debug)]
pub struct Question {
    pub prompt: &'static str,
    pub options: &'static [&'static str],
    /// Index into `options`.
    pub correct: usize,
    pub feedback: &'static str,
}

/// All content consumed by a deck.
#[derive(Clone, Copy, Debug)]
pub struct Content {
    pub intro: &'static str,
    pub mystery: &'static str,
    pub code: &'static str,
    pub terminal: &'static str,
    pub quiz: &'static [Question],
    pub fortunes: &'static [&'static str],
    /// One wish per balloon, in balloon order.
    pub wishes: &'static [&'static str],
    pub heart_glyphs: &'static [&'static str],
    pub burst_glyphs: &'static [&'static str],
    pub highlight: HighlightRules,
}

impl Content {
    /// Reject content a deck could not present: an empty quiz, an answer
    /// index past its options, or an empty pool.
    pub fn validate(&self) -> Result<(), DeckError> {
        if self.quiz.is_empty() {
            return Err(DeckError::EmptyQuiz);
        }
        for (question, q) in self.quiz.iter().enumerate() {
            if q.correct >= q.options.len() {
                return Err(DeckError::CorrectOutOfRange {
                    question,
                    correct: q.correct,
                    options: q.options.len(),
                });
            }
        }
        for (name, pool) in [
            ("fortunes", self.fortunes),
            ("wishes", self.wishes),
            ("heart_glyphs", self.heart_glyphs),
            ("burst_glyphs", self.burst_glyphs),
        ] {
            if pool.is_empty() {
                return Err(DeckError::EmptyPool(name));
            }
        }
        Ok(())
    }
}

pub const INTRO_TEXT: &str = "Hi there! 🙂\nToday feels a little special…\nI made something for you.";

pub const MYSTERY_TEXT: &str = "I've been working on a little surprise...\nReady to see what it is?";

pub const CODE_TEXT: &str = r#"# birthday_wish.py
# A special program just for you

def calculate_birthday_joy():
    bugs = 0
    happiness = float('inf')
    coffee_level = "optimal"

    return {
        "status": "bug_free",
        "happiness": happiness,
        "message": "Have an amazing day! 🎉"
    }

# Running birthday protocol...
result = calculate_birthday_joy()
print(result["message"])"#;

pub const TERMINAL_TEXT: &str = ">>> Running birthday_wish.py...\n>>> Compiling happiness...\n>>> Optimizing joy levels...\n>>> \n>>> Have an amazing day! 🎉\n>>> \n>>> Process completed with 0 bugs! ✓";

pub const QUIZ: &[Question] = &[
    Question {
        prompt: "What's the most important thing on a birthday?",
        options: &["Cake 🍰", "Gifts 🎁", "Being happy 😊", "All of the above! 🎉"],
        correct: 3,
        feedback: "Correct! All of these make birthdays special! 🎉",
    },
    Question {
        prompt: "What do software engineers wish for on their birthday?",
        options: &[
            "No bugs in production",
            "Infinite coffee",
            "Meetings that could've been emails",
            "All of the above (obviously)",
        ],
        correct: 3,
        feedback: "You know us too well! 😄",
    },
];

pub const FORTUNES: &[&str] = &[
    "A beautiful adventure awaits you in the coming year. ✨",
    "The best conversations are yet to come. 💬",
    "Your code will compile on the first try this week. 💻",
    "Something wonderful is about to happen. 🌟",
    "The universe is conspiring to make you smile. 😊",
];

pub const WISHES: &[&str] = &[
    "May your year be full of laughter 😂",
    "May every deploy go green ✅",
    "May your coffee always be warm ☕",
    "May you find time for the things you love 💖",
    "May your adventures be many 🗺️",
    "May all your wishes come true ✨",
];

pub const HEART_GLYPHS: &[&str] = &["💕", "💗", "💖", "✨", "🌸", "💫", "🌟"];

pub const BURST_GLYPHS: &[&str] = &["🎉", "✨", "🎂", "💖", "🌟", "🎈", "🥳", "💫"];

pub const CODE_RULES: HighlightRules = HighlightRules {
    keywords: &["def", "return", "float", "print"],
    functions: &["calculate_birthday_joy", "result"],
};

/// The birthday presentation.
pub const BIRTHDAY: Content = Content {
    intro: INTRO_TEXT,
    mystery: MYSTERY_TEXT,
    code: CODE_TEXT,
    terminal: TERMINAL_TEXT,
    quiz: QUIZ,
    fortunes: FORTUNES,
    wishes: WISHES,
    heart_glyphs: HEART_GLYPHS,
    burst_glyphs: BURST_GLYPHS,
    highlight: CODE_RULES,
};
