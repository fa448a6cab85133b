use crate::content::Question;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum QuizPhase {
    NotStarted,
    Asking(usize),
    Feedback(usize),
    Completed,
}

/// How an option should be drawn after an answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionMark {
    Correct,
    Incorrect,
    Plain,
}

/// Result of answering the current question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Answered {
    pub question: usize,
    /// One entry per option; every option is locked regardless of its mark.
    pub marks: Vec<OptionMark>,
    pub feedback: &'static str,
    pub was_correct: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizStep {
    Ask(usize),
    Completed,
}

/// Question/feedback loop. The cursor only moves forward.
#[derive(Clone, Debug)]
pub struct Quiz {
    questions: &'static [Question],
    phase: QuizPhase,
}

impl Quiz {
    pub fn new(questions: &'static [Question]) -> Self {
        Self { questions, phase: QuizPhase::NotStarted }
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn is_completed(&self) -> bool {
        self.phase == QuizPhase::Completed
    }

    pub fn question(&self, index: usize) -> Option<&'static Question> {
        self.questions.get(index)
    }

    /// Begin with the first question. Only valid once per reset.
    pub fn start(&mut self) -> Option<usize> {
        if self.phase != QuizPhase::NotStarted || self.questions.is_empty() {
            return None;
        }
        self.phase = QuizPhase::Asking(0);
        Some(0)
    }

    pub fn answer(&mut self, selected: usize) -> Option<Answered> {
        let QuizPhase::Asking(q) = self.phase else {
            return None;
        };
        let question = self.questions.get(q)?;
        if selected >= question.options.len() {
            return None;
        }
        self.phase = QuizPhase::Feedback(q);
        let marks = (0..question.options.len())
            .map(|i| {
                if i == question.correct {
                    OptionMark::Correct
                } else if i == selected {
                    OptionMark::Incorrect
                } else {
                    OptionMark::Plain
                }
            })
            .collect();
        Some(Answered {
            question: q,
            marks,
            feedback: question.feedback,
            was_correct: selected == question.correct,
        })
    }

    /// Leave the feedback state. `None` unless feedback is showing.
    pub fn advance(&mut self) -> Option<QuizStep> {
        let QuizPhase::Feedback(q) = self.phase else {
            return None;
        };
        if q + 1 < self.questions.len() {
            self.phase = QuizPhase::Asking(q + 1);
            Some(QuizStep::Ask(q + 1))
        } else {
            self.phase = QuizPhase::Completed;
            Some(QuizStep::Completed)
        }
    }

    pub fn reset(&mut self) {
        self.phase = QuizPhase::NotStarted;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::QUIZ;

    #[test]
    fn correct_answer_marks_only_correct() {
        let mut quiz = Quiz::new(QUIZ);
        quiz.start();
        let a = quiz.answer(3).unwrap();
        assert!(a.was_correct);
        assert_eq!(a.marks, vec![OptionMark::Plain, OptionMark::Plain, OptionMark::Plain, OptionMark::Correct]);
        assert!(!a.marks.contains(&OptionMark::Incorrect));
    }

    #[test]
    fn wrong_answer_marks_both() {
        let mut quiz = Quiz::new(QUIZ);
        quiz.start();
        let a = quiz.answer(1).unwrap();
        assert!(!a.was_correct);
        assert_eq!(a.marks[1], OptionMark::Incorrect);
        assert_eq!(a.marks[3], OptionMark::Correct);
        assert_eq!(a.feedback, QUIZ[0].feedback);
    }

    #[test]
    fn options_lock_after_first_answer() {
        let mut quiz = Quiz::new(QUIZ);
        quiz.start();
        assert!(quiz.answer(0).is_some());
        assert!(quiz.answer(3).is_none());
        assert_eq!(quiz.phase(), QuizPhase::Feedback(0));
    }

    #[test]
    fn runs_to_completion_once() {
        let mut quiz = Quiz::new(QUIZ);
        assert!(quiz.answer(0).is_none());
        assert_eq!(quiz.start(), Some(0));
        assert_eq!(quiz.start(), None);
        quiz.answer(0);
        assert_eq!(quiz.advance(), Some(QuizStep::Ask(1)));
        assert_eq!(quiz.advance(), None);
        quiz.answer(3);
        assert_eq!(quiz.advance(), Some(QuizStep::Completed));
        assert_eq!(quiz.advance(), None);
        assert!(quiz.is_completed());
        assert!(quiz.answer(0).is_none());
    }

    #[test]
    fn out_of_range_answer_is_ignored() {
        let mut quiz = Quiz::new(QUIZ);
        quiz.start();
        assert!(quiz.answer(9).is_none());
        assert_eq!(quiz.phase(), QuizPhase::Asking(0));
    }
}
