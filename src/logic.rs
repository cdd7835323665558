//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Listing quizzes with combinable filters (popularity, category, search)
//!   - Resolving a deep link or explicit parameter to a catalog quiz
//!   - Turning a submitted attempt into a ledger entry

use tracing::{info, instrument};

use crate::deeplink::extract_quiz_id;
use crate::domain::{Quiz, QuizResult, UserProfile};
use crate::protocol::ResultIn;
use crate::state::AppState;
use crate::util::now_millis;

/// Recent-results default when the client doesn't say how many it wants.
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Filtered catalog listing. Filters compose and each one preserves
/// catalog insertion order, so the result is always in catalog order.
#[instrument(level = "debug", skip(state))]
pub fn list_quizzes(
  state: &AppState,
  q: Option<&str>,
  category: Option<&str>,
  popular: Option<bool>,
) -> Vec<Quiz> {
  let mut quizzes = match q {
    // Empty query is plain substring semantics: matches everything.
    Some(query) => state.catalog.search(query),
    None => state.catalog.all(),
  };
  if let Some(category) = category {
    quizzes.retain(|quiz| quiz.category.eq_ignore_ascii_case(category));
  }
  if let Some(popular) = popular {
    quizzes.retain(|quiz| quiz.is_popular == popular);
  }
  quizzes
}

/// Deep-link entry point: extract an id, then look it up. Either step can
/// come up empty; both misses are normal outcomes for the caller to render
/// as a not-found state.
#[instrument(level = "info", skip(state))]
pub fn resolve_quiz(
  state: &AppState,
  link: Option<&str>,
  quiz_id: Option<&str>,
) -> (Option<String>, Option<Quiz>) {
  let id = extract_quiz_id(link, quiz_id);
  let quiz = id.as_deref().and_then(|id| state.catalog.get_by_id(id));
  info!(
    target: "quiz",
    quiz_id = %id.as_deref().unwrap_or("<none>"),
    found = quiz.is_some(),
    "Deep link resolved"
  );
  (id, quiz)
}

/// Record one completed attempt. The quiz id is taken on faith (the quiz
/// may have left the catalog since the attempt started).
#[instrument(level = "info", skip(state, body), fields(quiz_id = %body.quiz_id))]
pub async fn submit_result(state: &AppState, body: ResultIn) -> (UserProfile, QuizResult) {
  let result = QuizResult {
    quiz_id: body.quiz_id,
    score: body.score,
    total_questions: body.total_questions,
    time_spent: body.time_spent,
    completed_at: body.completed_at.unwrap_or_else(now_millis),
  };
  let profile = state.ledger.submit(result.clone()).await;
  (profile, result)
}
