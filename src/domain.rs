//! Domain models: quizzes, questions, submitted results, and the user profile.

use serde::{Deserialize, Serialize};

use crate::util::now_millis;

/// A quiz as stored in the catalog. Immutable once the catalog is built.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Quiz {
  pub id: String,
  pub title: String,
  pub description: String,
  /// Free-text category label (e.g., "Science", "History").
  pub category: String,
  /// Advisory display metadata. Intentionally NOT required to equal
  /// `questions.len()`; the seed data advertises more questions than it ships.
  pub question_count: u32,
  /// Human-readable duration label (e.g., "5 minutes").
  pub duration: String,
  #[serde(default)] pub questions: Vec<Question>,
  #[serde(default)] pub is_popular: bool,
  #[serde(default = "now_millis")] pub created_at: i64,
}

/// One question inside a quiz. `id` is unique within its owning quiz.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Question {
  pub id: String,
  pub text: String,
  pub options: Vec<String>,
  /// Zero-based index into `options`. Checked at catalog-load time.
  pub correct_answer_index: usize,
  #[serde(default)] pub explanation: Option<String>,
}

/// Why a quiz was rejected at catalog-load time.
#[derive(Debug, PartialEq, Eq)]
pub enum CatalogError {
  /// A question's correct-answer index falls outside its options.
  InvalidIndex {
    quiz_id: String,
    question_id: String,
    index: usize,
    options: usize,
  },
}

impl std::fmt::Display for CatalogError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      CatalogError::InvalidIndex { quiz_id, question_id, index, options } => write!(
        f,
        "quiz '{}' question '{}': correct_answer_index {} out of bounds for {} options",
        quiz_id, question_id, index, options
      ),
    }
  }
}

impl std::error::Error for CatalogError {}

impl Quiz {
  /// Check every question's answer index against its options.
  /// Runs once when the catalog is assembled, never at query time.
  pub fn validate(&self) -> Result<(), CatalogError> {
    for q in &self.questions {
      if q.correct_answer_index >= q.options.len() {
        return Err(CatalogError::InvalidIndex {
          quiz_id: self.id.clone(),
          question_id: q.id.clone(),
          index: q.correct_answer_index,
          options: q.options.len(),
        });
      }
    }
    Ok(())
  }
}

/// One completed attempt. Append-only; never mutated after submission.
/// `quiz_id` is a weak reference: the quiz may no longer be in the catalog.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuizResult {
  pub quiz_id: String,
  /// Count of correctly answered questions.
  pub score: u32,
  /// Question count at the time of the attempt.
  pub total_questions: u32,
  /// Elapsed time in milliseconds.
  pub time_spent: u64,
  /// Completion timestamp, unix millis.
  pub completed_at: i64,
}

impl QuizResult {
  /// Truncating integer percentage; 0 when the attempt had no questions.
  pub fn percentage(&self) -> u32 {
    if self.total_questions > 0 {
      self.score * 100 / self.total_questions
    } else {
      0
    }
  }
}

/// Aggregate statistics for the single implicit user. A cached reduction of
/// the result history, recomputed on every submission.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserProfile {
  pub id: String,
  pub name: String,
  pub email: String,
  pub completed_quizzes: u32,
  /// Best percentage achieved across all attempts, 0..=100.
  pub best_score: u32,
  /// Sum of raw scores across all attempts.
  pub total_score: u64,
  pub created_at: i64,
}

impl Default for UserProfile {
  fn default() -> Self {
    Self {
      id: "test_user".into(),
      name: "Test User".into(),
      email: "test@ltquiz.com".into(),
      completed_quizzes: 0,
      best_score: 0,
      total_score: 0,
      created_at: now_millis(),
    }
  }
}
