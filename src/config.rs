//! Engine configuration (backend endpoint + score table) loaded from TOML.
//!
//! See `EngineConfig` for the expected schema. Everything has a default, so a
//! missing or broken config file degrades to built-in values rather than
//! preventing startup.

use serde::Deserialize;
use tracing::{error, info};

/// Point values used by the scoring rules. Defaults match the production
/// backend; override them in TOML only if the backend's table changes too.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ScoreTable {
  /// Quest mode, correct with no hint and no retry.
  pub quest_first_try: u32,
  /// Quest mode, correct after the hint was opened or on the retry attempt.
  pub quest_hint_correct: u32,
  /// General mode, correct.
  pub general_correct: u32,
  /// General mode, wrong. Keeps the running total monotonic.
  pub general_consolation: u32,
  /// General mode sessions start from this baseline rather than zero.
  pub general_baseline: u32,
}

impl Default for ScoreTable {
  fn default() -> Self {
    Self {
      quest_first_try: 20,
      quest_hint_correct: 10,
      general_correct: 60,
      general_consolation: 5,
      general_baseline: 25,
    }
  }
}

/// Where the quest backend lives and how patient we are with it.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
  pub base_url: String,
  pub timeout_secs: u64,
  /// Bearer token attached to every request when present. Usually injected by
  /// the host app's auth layer rather than written into the file.
  pub api_token: Option<String>,
}

impl Default for BackendConfig {
  fn default() -> Self {
    Self {
      base_url: "http://localhost:3000/api/v1".into(),
      timeout_secs: 20,
      api_token: None,
    }
  }
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct EngineConfig {
  #[serde(default)]
  pub backend: BackendConfig,
  #[serde(default)]
  pub scoring: ScoreTable,
}

/// Attempt to load `EngineConfig` from QUIZ_CONFIG_PATH. On any parsing/IO
/// error, returns None and the caller falls back to defaults.
pub fn load_engine_config_from_env() -> Option<EngineConfig> {
  let path = std::env::var("QUIZ_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<EngineConfig>(&s) {
      Ok(cfg) => {
        info!(target: "quest_engine", %path, "Loaded engine config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "quest_engine", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "quest_engine", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
