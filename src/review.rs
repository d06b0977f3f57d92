//! Read-only replay of an already-completed quest.
//!
//! Loaded with the same question set plus the known correct answers. Answer
//! checks happen locally against those answers, never against the submission
//! gateway, and no score is kept anywhere: nothing here can earn points.
//! Unlike the linear play-through, navigation is free in both directions.

use tracing::{debug, info};

use crate::domain::{QuestionResult, QuizQuestion};
use crate::error::QuizError;

/// Output of [`ReviewSession::check_answer`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReviewOutcome {
    /// Question already resolved, or the choice index was out of range.
    Ignored,
    /// The question is now resolved; the correct option text is revealed so
    /// the host can highlight it.
    Checked { correct: bool, correct_choice: String },
}

pub struct ReviewSession {
    quest_id: String,
    questions: Vec<QuizQuestion>,
    current_index: usize,
    per_question_result: Vec<QuestionResult>,
}

impl ReviewSession {
    /// Build a review session. Every question must carry its correct answer;
    /// a set without them cannot be replayed.
    pub fn new(quest_id: String, questions: Vec<QuizQuestion>) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::Load("quest returned no questions".into()));
        }
        if let Some(q) = questions.iter().find(|q| q.correct_choice.is_none()) {
            return Err(QuizError::Load(format!(
                "question {} has no recorded answer; review unavailable",
                q.id
            )));
        }
        let n = questions.len();
        info!(target: "quiz", %quest_id, questions = n, "Review session started");
        Ok(Self {
            quest_id,
            questions,
            current_index: 0,
            per_question_result: vec![QuestionResult::Pending; n],
        })
    }

    pub fn quest_id(&self) -> &str {
        &self.quest_id
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> &QuizQuestion {
        &self.questions[self.current_index]
    }

    pub fn results(&self) -> &[QuestionResult] {
        &self.per_question_result
    }

    pub fn hint(&self) -> &str {
        &self.questions[self.current_index].hint
    }

    /// Compare a choice against the known answer and mark the question
    /// resolved. Resolved questions stay resolved; repeat checks are no-ops.
    pub fn check_answer(&mut self, choice: usize) -> ReviewOutcome {
        let index = self.current_index;
        if self.per_question_result[index] != QuestionResult::Pending {
            return ReviewOutcome::Ignored;
        }
        let question = &self.questions[index];
        let Some(chosen) = question.choices.get(choice) else {
            return ReviewOutcome::Ignored;
        };
        // new() guarantees the answer is present
        let correct_choice = question.correct_choice.clone().unwrap_or_default();
        let correct = *chosen == correct_choice;
        self.per_question_result[index] = if correct {
            QuestionResult::Correct
        } else {
            QuestionResult::Wrong
        };
        debug!(target: "quiz", quest_id = %self.quest_id, index, correct, "Review answer checked");
        ReviewOutcome::Checked { correct, correct_choice }
    }

    /// Free bidirectional navigation, including to already-resolved
    /// questions. Returns false for an out-of-range index.
    pub fn jump_to(&mut self, index: usize) -> bool {
        if index >= self.questions.len() {
            return false;
        }
        self.current_index = index;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions() -> Vec<QuizQuestion> {
        (0..3)
            .map(|i| QuizQuestion {
                id: format!("q{i}"),
                prompt: format!("prompt {i}"),
                choices: vec!["a".into(), "b".into(), "c".into()],
                correct_choice: Some("b".into()),
                hint: format!("hint {i}"),
                difficulty: Some("easy".into()),
            })
            .collect()
    }

    #[test]
    fn rejects_sets_without_recorded_answers() {
        let mut qs = questions();
        qs[1].correct_choice = None;
        assert!(matches!(
            ReviewSession::new("quest-1".into(), qs),
            Err(QuizError::Load(_))
        ));
    }

    #[test]
    fn checks_answers_locally_and_reveals_the_correct_option() {
        let mut r = ReviewSession::new("quest-1".into(), questions()).unwrap();
        assert_eq!(
            r.check_answer(1),
            ReviewOutcome::Checked { correct: true, correct_choice: "b".into() }
        );
        r.jump_to(1);
        assert_eq!(
            r.check_answer(0),
            ReviewOutcome::Checked { correct: false, correct_choice: "b".into() }
        );
        assert_eq!(
            r.results(),
            &[
                QuestionResult::Correct,
                QuestionResult::Wrong,
                QuestionResult::Pending
            ]
        );
    }

    #[test]
    fn resolved_questions_stay_resolved() {
        let mut r = ReviewSession::new("quest-1".into(), questions()).unwrap();
        r.check_answer(0);
        assert_eq!(r.check_answer(1), ReviewOutcome::Ignored);
        assert_eq!(r.results()[0], QuestionResult::Wrong);
    }

    #[test]
    fn navigation_is_bidirectional_even_onto_resolved_questions() {
        let mut r = ReviewSession::new("quest-1".into(), questions()).unwrap();
        r.check_answer(1);
        assert!(r.jump_to(2));
        assert!(r.jump_to(0), "jumping back onto a resolved question is fine");
        assert_eq!(r.current_index(), 0);
        assert!(!r.jump_to(7));
    }

    #[test]
    fn out_of_range_choice_is_ignored() {
        let mut r = ReviewSession::new("quest-1".into(), questions()).unwrap();
        assert_eq!(r.check_answer(42), ReviewOutcome::Ignored);
        assert_eq!(r.results()[0], QuestionResult::Pending);
    }
}
