//! Domain models for the quest quiz engine: questions, modes, per-question
//! outcomes, and the final tally handed back to the caller.

use serde::{Deserialize, Serialize};

/// Which scoring variant a session runs under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizMode {
  /// Backend-authoritative per answer, with a single hint-gated retry.
  Quest,
  /// Fully local scoring, no retry.
  General,
}

/// Per-question outcome. Drives progress-dot rendering and, in review mode,
/// which questions may be jumped to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionResult {
  Pending,
  Correct,
  Wrong,
}

/// Lifecycle of the question currently presented. `Resolved` is terminal for
/// that question until the session is reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuestionPhase {
  Unanswered,
  ForcedRetryPending,
  Resolved,
}

/// Immutable question supplied at session start. Option order is significant
/// and is never reordered by the engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuizQuestion {
  pub id: String,
  pub prompt: String,
  pub choices: Vec<String>,
  /// Correct option text. Present in general mode and review mode; `None` in
  /// live quest mode, where correctness comes only from the backend.
  #[serde(default)]
  pub correct_choice: Option<String>,
  pub hint: String,
  /// Display-only label, e.g. "easy" / "hard".
  #[serde(default)]
  pub difficulty: Option<String>,
}

/// One row of the per-question breakdown in a [`QuizResult`].
#[derive(Clone, Copy, Debug, Serialize)]
pub struct QuestionScore {
  pub result: QuestionResult,
  pub points: u32,
}

/// Final tally produced when the session finishes, for the caller to persist
/// or display.
#[derive(Clone, Debug, Serialize)]
pub struct QuizResult {
  pub mode: QuizMode,
  pub question_count: usize,
  /// Locally tallied score across the play-through.
  pub total_score: u32,
  /// Points actually awarded. Backend-reconciled in quest mode, and forced to
  /// zero when the quest was already completed in a prior session.
  pub points_awarded: u32,
  pub breakdown: Vec<QuestionScore>,
  pub already_completed: bool,
  /// Currency balance after the award, when the backend reports one.
  pub new_balance: Option<u64>,
}
