//! Scoring rules: pure functions, no session state, no side effects.
//!
//! Quest mode rewards first-try mastery over hint-assisted success and never
//! scores below zero. General mode has no retry concept, so a wrong answer
//! earns a small consolation instead of nothing.

use crate::config::ScoreTable;
use crate::domain::QuizMode;

/// Points for one attempt. `hint_or_retry_active` is true when the hint has
/// been opened for the current question (pre-emptively or forced) or the
/// attempt is the retry itself; availability of the hint, not when it was
/// viewed, is what caps the score.
pub fn points_for_attempt(
  mode: QuizMode,
  correct: bool,
  hint_or_retry_active: bool,
  table: &ScoreTable,
) -> u32 {
  match (mode, correct) {
    (QuizMode::Quest, true) => {
      if hint_or_retry_active {
        table.quest_hint_correct
      } else {
        table.quest_first_try
      }
    }
    (QuizMode::Quest, false) => 0,
    (QuizMode::General, true) => table.general_correct,
    (QuizMode::General, false) => table.general_consolation,
  }
}

/// The sole condition under which a wrong answer does not finalize the
/// question: quest mode, hint still unused, and not already a retry attempt.
pub fn retry_triggered(mode: QuizMode, correct: bool, hint_used: bool, is_retry: bool) -> bool {
  mode == QuizMode::Quest && !correct && !hint_used && !is_retry
}
