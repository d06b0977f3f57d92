//! Trailquest · Quest Quiz Scoring Engine
//!
//! In-process engine behind the quest quiz screens: drives a multi-question
//! quiz one question at a time, decides how many points each answer is worth,
//! enforces the single hint-gated retry per question, and reconciles the local
//! tally against the backend's authoritative awards. A read-only review
//! variant replays completed quests without contacting the backend.
//!
//! The engine holds only the state of one active session in memory; screens
//! construct a [`session::Session`] per quiz attempt via [`logic`] and drive
//! it with discrete user actions.
//!
//! Important env variables:
//!   QUEST_API_BASE_URL : enables the HTTP gateway client via `from_env`
//!   QUEST_API_TOKEN    : optional bearer token for gateway requests
//!   QUIZ_CONFIG_PATH   : path to TOML config (backend + score table)
//!   LOG_LEVEL          : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT         : "pretty" (default) or "json"

pub mod config;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod logic;
pub mod protocol;
pub mod review;
pub mod scoring;
pub mod session;
pub mod telemetry;

pub use config::{load_engine_config_from_env, EngineConfig, ScoreTable};
pub use domain::{QuestionPhase, QuestionResult, QuizMode, QuizQuestion, QuizResult};
pub use error::QuizError;
pub use gateway::{QuestClient, QuestionSetProvider, SubmissionGateway};
pub use review::{ReviewOutcome, ReviewSession};
pub use session::{AdvanceOutcome, Session, SubmitOutcome};
