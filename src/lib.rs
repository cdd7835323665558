//! LTQuiz · Quiz App Backend
//!
//! In-memory quiz catalog + session ledger behind an Axum HTTP/WebSocket
//! API. The catalog is read-only after startup; the ledger records quiz
//! results and derives the user profile from them.

pub mod config;
pub mod deeplink;
pub mod domain;
pub mod logic;
pub mod protocol;
pub mod routes;
pub mod seeds;
pub mod state;
pub mod telemetry;
pub mod util;

pub use routes::build_router;
pub use state::AppState;
