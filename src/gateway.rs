//! REST gateway to the quest backend.
//!
//! Two concerns live behind traits so the state machine logic can be exercised
//! against scripted fakes:
//!   - `QuestionSetProvider`: quest quiz set + generic topic question fetches
//!   - `SubmissionGateway`: the authoritative per-answer submission
//!
//! `QuestClient` implements both over HTTP. Calls are instrumented and log
//! endpoints and latencies, never auth tokens.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::config::BackendConfig;
use crate::error::QuizError;
use crate::protocol::{GeneralQuestionOut, QuestQuizSetOut, SubmitAnswerIn, SubmitAnswerOut};

/// Supplies ordered question sets for a quest, or single questions for a
/// generic landmark topic.
#[async_trait]
pub trait QuestionSetProvider {
  async fn fetch_quest_set(&self, quest_id: &str) -> Result<QuestQuizSetOut, QuizError>;
  async fn fetch_general_question(&self, topic: &str) -> Result<GeneralQuestionOut, QuizError>;
}

/// Authoritatively records one answer and returns score/award/completion data.
#[async_trait]
pub trait SubmissionGateway {
  async fn submit_answer(&self, req: &SubmitAnswerIn) -> Result<SubmitAnswerOut, QuizError>;
}

#[derive(Clone)]
pub struct QuestClient {
  client: reqwest::Client,
  base_url: String,
  api_token: Option<String>,
}

impl QuestClient {
  pub fn new(cfg: &BackendConfig) -> Result<Self, QuizError> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(cfg.timeout_secs))
      .build()
      .map_err(|e| QuizError::Load(format!("HTTP client build failed: {e}")))?;
    Ok(Self {
      client,
      base_url: cfg.base_url.trim_end_matches('/').to_string(),
      api_token: cfg.api_token.clone(),
    })
  }

  /// Construct the client if QUEST_API_BASE_URL is set; otherwise return None.
  /// QUEST_API_TOKEN is attached as a bearer token when present.
  pub fn from_env() -> Option<Self> {
    let base_url = std::env::var("QUEST_API_BASE_URL").ok()?;
    let cfg = BackendConfig {
      base_url,
      api_token: std::env::var("QUEST_API_TOKEN").ok(),
      ..BackendConfig::default()
    };
    Self::new(&cfg).ok()
  }

  fn request(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    let req = req
      .header(USER_AGENT, "trailquest-quiz/0.1")
      .header(CONTENT_TYPE, "application/json");
    match &self.api_token {
      Some(t) => req.header(AUTHORIZATION, format!("Bearer {}", t)),
      None => req,
    }
  }

  async fn read_json<T: for<'a> Deserialize<'a>>(
    &self,
    res: reqwest::Response,
  ) -> Result<T, String> {
    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let msg = extract_backend_error(&body).unwrap_or(body);
      return Err(format!("backend HTTP {}: {}", status, msg));
    }
    res.json::<T>().await.map_err(|e| e.to_string())
  }
}

#[async_trait]
impl QuestionSetProvider for QuestClient {
  #[instrument(level = "info", skip(self), fields(%quest_id))]
  async fn fetch_quest_set(&self, quest_id: &str) -> Result<QuestQuizSetOut, QuizError> {
    let url = format!("{}/quests/{}/quiz", self.base_url, quest_id);
    let start = std::time::Instant::now();
    let res = self
      .request(self.client.get(&url))
      .send()
      .await
      .map_err(|e| QuizError::Load(e.to_string()))?;
    let out: QuestQuizSetOut = self.read_json(res).await.map_err(QuizError::Load)?;
    info!(target: "quiz", %quest_id, questions = out.questions.len(), elapsed = ?start.elapsed(), "Fetched quest quiz set");
    Ok(out)
  }

  #[instrument(level = "info", skip(self), fields(%topic))]
  async fn fetch_general_question(&self, topic: &str) -> Result<GeneralQuestionOut, QuizError> {
    let url = format!("{}/quiz/general", self.base_url);
    let res = self
      .request(self.client.get(&url).query(&[("topic", topic)]))
      .send()
      .await
      .map_err(|e| QuizError::Load(e.to_string()))?;
    self.read_json(res).await.map_err(QuizError::Load)
  }
}

#[async_trait]
impl SubmissionGateway for QuestClient {
  #[instrument(level = "info", skip(self, req), fields(quest_id = %req.quest_id, question_id = %req.question_id))]
  async fn submit_answer(&self, req: &SubmitAnswerIn) -> Result<SubmitAnswerOut, QuizError> {
    let url = format!("{}/quiz/answers", self.base_url);
    let start = std::time::Instant::now();
    let res = self
      .request(self.client.post(&url))
      .json(req)
      .send()
      .await
      .map_err(|e| QuizError::Submission(e.to_string()))?;
    let out: SubmitAnswerOut = self.read_json(res).await.map_err(QuizError::Submission)?;
    info!(
      target: "quiz",
      question_id = %req.question_id,
      correct = out.is_correct,
      earned = out.earned,
      completed = out.completed,
      elapsed = ?start.elapsed(),
      "Answer submission acknowledged"
    );
    Ok(out)
  }
}

/// Try to extract a clean error message from a backend error body.
fn extract_backend_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap {
    error: EObj,
  }
  #[derive(Deserialize)]
  struct EObj {
    message: String,
  }
  match serde_json::from_str::<EWrap>(body) {
    Ok(w) => Some(w.error.message),
    Err(_) => None,
  }
}
