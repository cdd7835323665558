//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented; not-found is a JSON outcome, not a failure.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::{info, instrument};

use crate::logic::*;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse {
    Json(HealthOut { ok: true })
}

#[instrument(level = "info", skip(state))]
pub async fn http_list_quizzes(
    State(state): State<Arc<AppState>>,
    Query(q): Query<QuizzesQuery>,
) -> impl IntoResponse {
    let quizzes = list_quizzes(&state, q.q.as_deref(), q.category.as_deref(), q.popular);
    info!(target: "quiz", matched = quizzes.len(), "HTTP quiz list served");
    Json(QuizzesOut {
        quizzes: quizzes.iter().map(to_summary).collect(),
    })
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_get_quiz(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.catalog.get_by_id(&id) {
        Some(quiz) => Json(to_out(&quiz)).into_response(),
        None => {
            info!(target: "quiz", %id, "HTTP quiz lookup missed");
            (
                StatusCode::NOT_FOUND,
                Json(NotFoundOut {
                    message: format!("No quiz with id '{}'", id),
                }),
            )
                .into_response()
        }
    }
}

#[instrument(level = "info", skip(state))]
pub async fn http_categories(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(CategoriesOut {
        categories: state.catalog.categories(),
    })
}

#[instrument(level = "info", skip(state))]
pub async fn http_resolve(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ResolveQuery>,
) -> impl IntoResponse {
    let (quiz_id, quiz) = resolve_quiz(&state, q.link.as_deref(), q.quiz_id.as_deref());
    Json(ResolveOut {
        quiz_id,
        quiz: quiz.as_ref().map(to_out),
    })
}

#[instrument(level = "info", skip(state, body), fields(quiz_id = %body.quiz_id))]
pub async fn http_submit_result(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ResultIn>,
) -> impl IntoResponse {
    let (profile, result) = submit_result(&state, body).await;
    info!(
        target: "quiz",
        quiz_id = %result.quiz_id,
        percentage = result.percentage(),
        completed = profile.completed_quizzes,
        "HTTP result submitted"
    );
    Json(profile_to_out(&profile))
}

#[instrument(level = "info", skip(state))]
pub async fn http_recent_results(
    State(state): State<Arc<AppState>>,
    Query(q): Query<RecentQuery>,
) -> impl IntoResponse {
    let limit = q.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
    let results = state.ledger.recent_results(limit).await;
    Json(RecentResultsOut {
        results: results.iter().map(result_to_out).collect(),
    })
}

#[instrument(level = "info", skip(state))]
pub async fn http_profile(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let profile = state.ledger.profile().await;
    Json(profile_to_out(&profile))
}
