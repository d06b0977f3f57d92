//! Wire DTOs for the two backend endpoints the engine consumes (serde ready).
//! Keep this small and stable so backend and client can evolve independently.

use serde::{Deserialize, Serialize};

use crate::domain::QuizQuestion;

//
// Quest quiz set fetch
//

/// Summary block returned alongside the question list.
#[derive(Clone, Debug, Deserialize)]
pub struct QuestSummaryOut {
    pub id: String,
    pub name: String,
    #[serde(default, rename = "rewardPoints")]
    pub reward_points: u32,
    /// True when the backend already recorded this quest as finished in a
    /// prior session.
    #[serde(default)]
    pub completed: bool,
}

/// One question as delivered by the backend.
#[derive(Clone, Debug, Deserialize)]
pub struct QuestionOut {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    #[serde(default)]
    pub hint: String,
    #[serde(default)]
    pub difficulty: Option<String>,
    /// Present only for review-mode use. Never trusted for live scoring.
    #[serde(default, rename = "correctIndex")]
    pub correct_index: Option<usize>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct QuestQuizSetOut {
    pub quest: QuestSummaryOut,
    pub questions: Vec<QuestionOut>,
}

impl QuestionOut {
    /// Convert to the domain model. `with_answer` resolves `correctIndex`
    /// into the correct option's text; live quest sessions pass `false` so
    /// the answer never exists client-side.
    pub fn into_question(self, with_answer: bool) -> QuizQuestion {
        let correct_choice = if with_answer {
            self.correct_index
                .and_then(|i| self.options.get(i).cloned())
        } else {
            None
        };
        QuizQuestion {
            id: self.id,
            prompt: self.question,
            choices: self.options,
            correct_choice,
            hint: self.hint,
            difficulty: self.difficulty,
        }
    }
}

//
// Answer submission
//

#[derive(Clone, Debug, Serialize)]
pub struct SubmitAnswerIn {
    #[serde(rename = "questId")]
    pub quest_id: String,
    #[serde(rename = "questionId")]
    pub question_id: String,
    #[serde(rename = "optionIndex")]
    pub option_index: usize,
    #[serde(rename = "isLastQuestion")]
    pub is_last_question: bool,
}

/// Fields the engine consumes from the submission response. Everything is
/// defaulted so a lean backend payload still decodes.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SubmitAnswerOut {
    #[serde(default, rename = "isCorrect")]
    pub is_correct: bool,
    /// Points the backend attributed to this attempt.
    #[serde(default)]
    pub earned: u32,
    /// Backend's running total, used for display reconciliation only.
    #[serde(default, rename = "totalScore")]
    pub total_score: u32,
    #[serde(default, rename = "retryAllowed")]
    pub retry_allowed: bool,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, rename = "pointsAwarded")]
    pub points_awarded: u32,
    #[serde(default, rename = "alreadyCompleted")]
    pub already_completed: bool,
    #[serde(default, rename = "newBalance")]
    pub new_balance: Option<u64>,
}

//
// Generic (non-quest) question fetch
//

/// One generated question for a free topic. The correct index is authoritative
/// here because general mode scores locally.
#[derive(Clone, Debug, Deserialize)]
pub struct GeneralQuestionOut {
    pub question: String,
    pub options: Vec<String>,
    #[serde(rename = "correctIndex")]
    pub correct_index: usize,
    #[serde(default)]
    pub explanation: Option<String>,
}
