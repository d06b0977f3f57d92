//! Session orchestration shared by the quiz screens.
//!
//! This includes:
//!   - Starting quest-scoped, generic-topic, and review sessions
//!   - Submitting answers (gateway round-trip in quest mode, local in general)
//!
//! The screens own a `Session`/`ReviewSession` value and call through here;
//! all state transitions happen inside the session types.

use tracing::{error, instrument};
use uuid::Uuid;

use crate::config::ScoreTable;
use crate::domain::{QuizMode, QuizQuestion};
use crate::error::QuizError;
use crate::gateway::{QuestionSetProvider, SubmissionGateway};
use crate::protocol::SubmitAnswerIn;
use crate::review::ReviewSession;
use crate::session::{Session, SubmitOutcome};

/// Load a quest's question set and start a fresh play-through. The backend's
/// prior-completion status carries into the session so a replayed quest still
/// plays normally but awards nothing at the end.
#[instrument(level = "info", skip(provider, table), fields(%quest_id))]
pub async fn start_quest_session<P: QuestionSetProvider>(
  provider: &P,
  table: ScoreTable,
  quest_id: &str,
) -> Result<Session, QuizError> {
  let set = provider.fetch_quest_set(quest_id).await?;
  if set.questions.is_empty() {
    return Err(QuizError::Load(format!("quest {} returned no questions", quest_id)));
  }
  let questions: Vec<QuizQuestion> = set
    .questions
    .into_iter()
    // live quest scoring never sees the answer client-side
    .map(|q| q.into_question(false))
    .collect();
  Ok(Session::new(
    QuizMode::Quest,
    Some(set.quest.id),
    questions,
    set.quest.completed,
    table,
  ))
}

/// Build a general-mode session by requesting `count` questions for a topic.
/// Any failed fetch aborts the whole load; no partial session is created.
#[instrument(level = "info", skip(provider, table), fields(%topic, count))]
pub async fn start_general_session<P: QuestionSetProvider>(
  provider: &P,
  table: ScoreTable,
  topic: &str,
  count: usize,
) -> Result<Session, QuizError> {
  if count == 0 {
    return Err(QuizError::Load("general session needs at least one question".into()));
  }
  let mut questions = Vec::with_capacity(count);
  for _ in 0..count {
    let q = provider.fetch_general_question(topic).await?;
    let correct_choice = q.options.get(q.correct_index).cloned().ok_or_else(|| {
      QuizError::Load(format!(
        "correct index {} out of range for generated question",
        q.correct_index
      ))
    })?;
    questions.push(QuizQuestion {
      id: Uuid::new_v4().to_string(),
      prompt: q.question,
      choices: q.options,
      correct_choice: Some(correct_choice),
      hint: q.explanation.unwrap_or_default(),
      difficulty: None,
    });
  }
  Ok(Session::new(QuizMode::General, None, questions, false, table))
}

/// Load a completed quest for read-only replay. The set must carry the
/// recorded correct answers; the gateway is never contacted afterwards.
#[instrument(level = "info", skip(provider), fields(%quest_id))]
pub async fn start_review_session<P: QuestionSetProvider>(
  provider: &P,
  quest_id: &str,
) -> Result<ReviewSession, QuizError> {
  let set = provider.fetch_quest_set(quest_id).await?;
  let questions: Vec<QuizQuestion> = set
    .questions
    .into_iter()
    .map(|q| q.into_question(true))
    .collect();
  ReviewSession::new(set.quest.id, questions)
}

/// Submit the chosen option for the current question.
///
/// Quest mode delegates correctness to the gateway; general mode resolves
/// locally. Returns `Ok(SubmitOutcome::Ignored)` for duplicate taps and
/// submissions on resolved questions; a gateway failure leaves the question
/// unresolved with the guard released, so the same choice can be resubmitted.
#[instrument(level = "info", skip(gateway, session), fields(index = session.current_index(), choice))]
pub async fn submit_answer<G: SubmissionGateway>(
  gateway: &G,
  session: &mut Session,
  choice: usize,
) -> Result<SubmitOutcome, QuizError> {
  if session.mode() == QuizMode::General {
    return Ok(session.answer_general(choice));
  }
  if choice >= session.current_question().choices.len() {
    return Ok(SubmitOutcome::Ignored);
  }
  if !session.begin_submission() {
    return Ok(SubmitOutcome::Ignored);
  }

  let req = SubmitAnswerIn {
    quest_id: session.quest_id().unwrap_or_default().to_string(),
    question_id: session.current_question().id.clone(),
    option_index: choice,
    is_last_question: session.is_last_question(),
  };
  match gateway.submit_answer(&req).await {
    Ok(resp) => Ok(session.apply_quest_answer(&resp)),
    Err(e) => {
      error!(target: "quiz", question_id = %req.question_id, error = %e, "Submission failed; question stays open");
      session.fail_submission();
      Err(e)
    }
  }
}
