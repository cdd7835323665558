//! WebSocket upgrade + message loop. Each client message is parsed as JSON
//! and answered with a single JSON reply. A client that subscribes to the
//! profile also gets a push after every submission, in submission order.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, error, info, instrument, warn};

use crate::logic::*;
use crate::protocol::*;
use crate::state::{AppState, ProfileUpdate};

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    info!(target: "ltquiz_backend", "WebSocket upgrade requested");
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    info!(target: "ltquiz_backend", "WebSocket connected");
    let mut subscription: Option<broadcast::Receiver<ProfileUpdate>> = None;

    loop {
        tokio::select! {
            incoming = socket.recv() => {
                let Some(Ok(msg)) = incoming else { break };
                match msg {
                    Message::Text(txt) => {
                        // Parse, dispatch, serialize response.
                        let reply = match serde_json::from_str::<ClientWsMessage>(&txt) {
                            Ok(incoming) => {
                                debug!(target: "ltquiz_backend", "WS received: {:?}", &incoming);
                                handle_client_ws(incoming, &state, &mut subscription).await
                            }
                            Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
                        };
                        if !send_msg(&mut socket, &reply).await {
                            break;
                        }
                    }
                    Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            update = next_update(&mut subscription) => {
                match update {
                    Ok(u) => {
                        let push = ServerWsMessage::ProfileUpdate {
                            profile: profile_to_out(&u.profile),
                            result: result_to_out(&u.result),
                        };
                        if !send_msg(&mut socket, &push).await {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        // Too slow; resync from a fresh snapshot.
                        warn!(target: "ltquiz_backend", skipped, "WS subscriber lagged; resyncing profile");
                        let profile = state.ledger.profile().await;
                        let resync = ServerWsMessage::Profile { profile: profile_to_out(&profile) };
                        if !send_msg(&mut socket, &resync).await {
                            break;
                        }
                    }
                    Err(RecvError::Closed) => {
                        subscription = None;
                    }
                }
            }
        }
    }
    info!(target: "ltquiz_backend", "WebSocket disconnected");
}

/// Resolves to the next profile update, or never when unsubscribed.
async fn next_update(
    subscription: &mut Option<broadcast::Receiver<ProfileUpdate>>,
) -> Result<ProfileUpdate, RecvError> {
    match subscription {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

async fn send_msg(socket: &mut WebSocket, msg: &ServerWsMessage) -> bool {
    let out = serde_json::to_string(msg).unwrap_or_else(|e| {
        serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
    });
    if let Err(e) = socket.send(Message::Text(out)).await {
        error!(target: "ltquiz_backend", error = %e, "WS send error");
        return false;
    }
    true
}

#[instrument(level = "info", skip(state, subscription))]
async fn handle_client_ws(
    msg: ClientWsMessage,
    state: &Arc<AppState>,
    subscription: &mut Option<broadcast::Receiver<ProfileUpdate>>,
) -> ServerWsMessage {
    match msg {
        ClientWsMessage::Ping => ServerWsMessage::Pong,

        ClientWsMessage::GetQuiz { quiz_id } => match state.catalog.get_by_id(&quiz_id) {
            Some(quiz) => {
                tracing::info!(target: "quiz", id = %quiz_id, "WS quiz served");
                ServerWsMessage::Quiz { quiz: to_out(&quiz) }
            }
            None => ServerWsMessage::QuizNotFound { quiz_id },
        },

        ClientWsMessage::ListQuizzes { q, category, popular } => {
            let quizzes = list_quizzes(state, q.as_deref(), category.as_deref(), popular);
            tracing::info!(target: "quiz", matched = quizzes.len(), "WS quiz list served");
            ServerWsMessage::Quizzes {
                quizzes: quizzes.iter().map(to_summary).collect(),
            }
        }

        ClientWsMessage::ResolveLink { link, quiz_id } => {
            let (quiz_id, quiz) = resolve_quiz(state, link.as_deref(), quiz_id.as_deref());
            ServerWsMessage::Resolved {
                quiz_id,
                quiz: quiz.as_ref().map(to_out),
            }
        }

        ClientWsMessage::SubmitResult { result } => {
            let (profile, result) = submit_result(state, result).await;
            tracing::info!(target: "quiz", quiz_id = %result.quiz_id, percentage = result.percentage(), "WS result submitted");
            ServerWsMessage::ResultRecorded {
                profile: profile_to_out(&profile),
                result: result_to_out(&result),
            }
        }

        ClientWsMessage::RecentResults { limit } => {
            let results = state
                .ledger
                .recent_results(limit.unwrap_or(DEFAULT_RECENT_LIMIT))
                .await;
            ServerWsMessage::RecentResults {
                results: results.iter().map(result_to_out).collect(),
            }
        }

        ClientWsMessage::GetProfile => {
            let profile = state.ledger.profile().await;
            ServerWsMessage::Profile { profile: profile_to_out(&profile) }
        }

        ClientWsMessage::SubscribeProfile => {
            // Subscribe before snapshotting so no update between the two is lost.
            *subscription = Some(state.ledger.subscribe());
            let profile = state.ledger.profile().await;
            tracing::info!(target: "quiz", "WS profile subscription started");
            ServerWsMessage::Profile { profile: profile_to_out(&profile) }
        }
    }
}
