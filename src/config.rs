//! Loading an optional catalog bank (extra quizzes) from TOML.
//!
//! See `CatalogConfig` and `QuizCfg` for the expected schema.

use serde::Deserialize;
use tracing::{error, info};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct CatalogConfig {
  #[serde(default)]
  pub quizzes: Vec<QuizCfg>,
}

/// Quiz entry accepted in TOML configuration.
/// `id` defaults to a fresh UUID; display metadata falls back to blanks.
#[derive(Clone, Debug, Deserialize)]
pub struct QuizCfg {
  #[serde(default)] pub id: Option<String>,
  pub title: String,
  #[serde(default)] pub description: String,
  pub category: String,
  #[serde(default)] pub question_count: Option<u32>,
  #[serde(default)] pub duration: Option<String>,
  #[serde(default)] pub is_popular: bool,
  #[serde(default)] pub questions: Vec<QuestionCfg>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct QuestionCfg {
  #[serde(default)] pub id: Option<String>,
  pub text: String,
  pub options: Vec<String>,
  pub correct_answer_index: usize,
  #[serde(default)] pub explanation: Option<String>,
}

/// Attempt to load `CatalogConfig` from CATALOG_CONFIG_PATH. On any
/// parsing/IO error, returns None and the catalog falls back to seeds only.
pub fn load_catalog_config_from_env() -> Option<CatalogConfig> {
  let path = std::env::var("CATALOG_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<CatalogConfig>(&s) {
      Ok(cfg) => {
        info!(target: "ltquiz_backend", %path, "Loaded catalog config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "ltquiz_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "ltquiz_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_a_minimal_bank_entry() {
    let cfg: CatalogConfig = toml::from_str(
      r#"
      [[quizzes]]
      title = "Geography Quiz"
      category = "Geography"

      [[quizzes.questions]]
      text = "Capital of France?"
      options = ["Paris", "Lyon"]
      correct_answer_index = 0
      "#,
    )
    .unwrap();
    assert_eq!(cfg.quizzes.len(), 1);
    let q = &cfg.quizzes[0];
    assert!(q.id.is_none());
    assert_eq!(q.category, "Geography");
    assert!(!q.is_popular);
    assert_eq!(q.questions[0].options.len(), 2);
  }

  #[test]
  fn empty_document_is_an_empty_bank() {
    let cfg: CatalogConfig = toml::from_str("").unwrap();
    assert!(cfg.quizzes.is_empty());
  }
}
