//! Error taxonomy for the quiz engine.
//!
//! Nothing here is fatal to the host process: a load failure means no session
//! was created, a submission failure leaves the current question unresolved and
//! resubmittable. Invalid transitions (duplicate taps, advancing too early) are
//! not errors at all; the state machine absorbs them as no-ops.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuizError {
  /// Question set or quest status could not be fetched. No partial session is
  /// ever created from a failed load.
  #[error("failed to load question set: {0}")]
  Load(String),

  /// The answer submission failed in transit or on the server. The current
  /// question stays unresolved, no score is recorded, and the same choice may
  /// be resubmitted.
  #[error("answer submission failed: {0}")]
  Submission(String),
}
