//! HTTP host for MindQuest sessions.
//!
//! Each player drives a [`QuestSession`](crate::session::QuestSession) through
//! JSON endpoints; minting goes through the host's configured chain gateway.
//!
//! # Endpoints
//!
//! - `GET  /health`          : Liveness check
//! - `/sessions/...`         : Create, play, mint, reset and delete sessions
//! - `/tokens/...`           : Read minted personality records

pub mod routes;

pub use routes::{app_router, AppState};
