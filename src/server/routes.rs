//! Axum route handlers for the MindQuest HTTP host.
//!
//! # Routes
//!
//! - `GET  /health`              : Returns `{"status": "ok", "version": ..., "service": "mindquest"}`
//! - `POST /sessions`            : Create a session and connect the host wallet
//! - `GET  /sessions/:id`        : Session snapshot
//! - `DELETE /sessions/:id`      : Drop the session (204)
//! - `POST /sessions/:id/start`  : Begin the quest
//! - `POST /sessions/:id/answer` : `{ "answer": "..." }`
//! - `POST /sessions/:id/mint`   : Mint the completed profile
//! - `POST /sessions/:id/reset`  : Back to the welcome screen
//! - `GET  /tokens/total`        : `{ "total": n }`
//! - `GET  /tokens/:id`          : Stored record, token URI and explorer link

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use dashmap::DashMap;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::chain::{ChainError, ChainGateway, ContractError, TokenId};
use crate::config::{ConfigError, QuestConfig};
use crate::narrative::Narrator;
use crate::questions::QuestionBank;
use crate::scoring::{Scorer, ScoringMode};
use crate::session::{QuestSession, SessionError, SessionSnapshot};

type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(serde_json::json!({ "error": message.into() })))
}

fn session_error(e: SessionError) -> ApiError {
    let status = match &e {
        SessionError::InvalidTransition { .. } => StatusCode::CONFLICT,
        SessionError::UnknownOption { .. } => StatusCode::BAD_REQUEST,
        SessionError::Chain(_) => StatusCode::BAD_GATEWAY,
    };
    api_error(status, e.to_string())
}

fn chain_error(e: ChainError) -> ApiError {
    let status = match &e {
        ChainError::Contract(ContractError::UnknownToken(_)) => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_GATEWAY,
    };
    api_error(status, e.to_string())
}

/// Shared application state for the HTTP host.
#[derive(Clone)]
pub struct AppState {
    /// Live sessions, each behind its own lock.
    pub sessions: Arc<DashMap<Uuid, Arc<Mutex<QuestSession>>>>,
    pub narrator: Arc<Narrator>,
    pub gateway: Arc<ChainGateway>,
    pub bank: Arc<QuestionBank>,
    pub scorer: Arc<dyn Scorer>,
    pub scoring: ScoringMode,
}

impl AppState {
    pub fn new(
        narrator: Narrator,
        gateway: ChainGateway,
        bank: QuestionBank,
        scoring: ScoringMode,
    ) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            narrator: Arc::new(narrator),
            gateway: Arc::new(gateway),
            bank: Arc::new(bank),
            scorer: Arc::from(scoring.scorer()),
            scoring,
        }
    }

    pub fn from_config(config: &QuestConfig) -> Result<Self, ConfigError> {
        let (_, gateway) = config.local_chain();
        Ok(Self::new(
            config.narrator()?,
            gateway,
            config.question_bank()?,
            config.scoring,
        ))
    }

    fn session(&self, id: Uuid) -> Result<Arc<Mutex<QuestSession>>, ApiError> {
        self.sessions
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("Session not found: {}", id)))
    }
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/sessions", post(create_session_handler))
        .route(
            "/sessions/:id",
            get(get_session_handler).delete(delete_session_handler),
        )
        .route("/sessions/:id/start", post(start_handler))
        .route("/sessions/:id/answer", post(answer_handler))
        .route("/sessions/:id/mint", post(mint_handler))
        .route("/sessions/:id/reset", post(reset_handler))
        .route("/tokens/total", get(total_minted_handler))
        .route("/tokens/:id", get(token_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// GET /health: liveness check.
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
        "service": "mindquest",
    }))
}

/// POST /sessions: create a session owned by the host wallet.
///
/// A wallet that cannot connect leaves the new session in `error`; the
/// snapshot still comes back with 201.
async fn create_session_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionSnapshot>) {
    let mut session = QuestSession::new(state.bank.clone(), state.scorer.clone());
    if let Err(e) = session
        .connect_wallet(state.gateway.wallet().as_ref(), state.gateway.target_chain())
        .await
    {
        tracing::warn!(session = %session.id(), error = %e, "wallet connection failed");
    }

    let snapshot = session.snapshot();
    tracing::info!(session = %snapshot.id, mode = %state.scoring, "session created");
    state
        .sessions
        .insert(snapshot.id, Arc::new(Mutex::new(session)));
    (StatusCode::CREATED, Json(snapshot))
}

/// GET /sessions/:id
async fn get_session_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let handle = state.session(id)?;
    let session = handle.lock().await;
    Ok(Json(session.snapshot()))
}

/// DELETE /sessions/:id
///
/// A mint still in flight keeps its own handle and completes on chain.
async fn delete_session_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.sessions.remove(&id).is_none() {
        return Err(api_error(StatusCode::NOT_FOUND, format!("Session not found: {}", id)));
    }
    tracing::info!(session = %id, "session deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /sessions/:id/start
async fn start_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let handle = state.session(id)?;
    let mut session = handle.lock().await;
    let mut rng = StdRng::from_entropy();
    session.start(&mut rng).map_err(session_error)?;
    Ok(Json(session.snapshot()))
}

#[derive(Debug, Deserialize)]
struct AnswerBody {
    answer: String,
}

/// POST /sessions/:id/answer
///
/// The final answer waits for the story before responding.
async fn answer_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<AnswerBody>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let handle = state.session(id)?;
    let mut session = handle.lock().await;
    session
        .answer(&body.answer, state.narrator.as_ref())
        .await
        .map_err(session_error)?;
    Ok(Json(session.snapshot()))
}

/// POST /sessions/:id/mint
///
/// The session lock is released while the transaction is pending so that
/// readers see `minting`.
async fn mint_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let handle = state.session(id)?;
    let request = handle.lock().await.begin_mint().map_err(session_error)?;

    let outcome = state
        .gateway
        .mint(&request.traits, &request.story, &request.personality_type)
        .await;
    match &outcome {
        Ok(token_id) => tracing::info!(session = %id, token = %token_id, "minted"),
        Err(e) => tracing::warn!(session = %id, error = %e, "mint failed"),
    }

    // Reset and start are refused in `minting`, so the phase is unchanged here.
    let mut session = handle.lock().await;
    session.finish_mint(outcome).map_err(session_error)?;
    Ok(Json(session.snapshot()))
}

/// POST /sessions/:id/reset
///
/// 409 while a mint is pending.
async fn reset_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let handle = state.session(id)?;
    let mut session = handle.lock().await;
    session.reset().map_err(session_error)?;
    Ok(Json(session.snapshot()))
}

/// GET /tokens/total
async fn total_minted_handler(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let total = state.gateway.total_minted().await.map_err(chain_error)?;
    Ok(Json(serde_json::json!({ "total": total })))
}

/// GET /tokens/:id
async fn token_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, ApiError> {
    let token_id = TokenId(id);
    let record = state
        .gateway
        .personality_data(token_id)
        .await
        .map_err(chain_error)?;
    let token_uri = state.gateway.token_uri(token_id).await.map_err(chain_error)?;

    Ok(Json(serde_json::json!({
        "token_id": token_id,
        "record": record,
        "token_uri": token_uri,
        "explorer_url": state.gateway.token_link(token_id),
    })))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn app() -> Router {
        let state = AppState::from_config(&QuestConfig::default()).unwrap();
        app_router(state)
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json");
        let request = match body {
            Some(json) => builder.body(Body::from(json.to_string())).unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn create(app: &Router) -> String {
        let (status, json) = call(app, "POST", "/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);
        json["id"].as_str().unwrap().to_string()
    }

    async fn play(app: &Router, id: &str) -> Value {
        let (status, mut snap) = call(app, "POST", &format!("/sessions/{}/start", id), None).await;
        assert_eq!(status, StatusCode::OK);
        while snap["phase"] == "playing" {
            let answer = snap["question"]["options"][0].clone();
            let (status, next) = call(
                app,
                "POST",
                &format!("/sessions/{}/answer", id),
                Some(serde_json::json!({ "answer": answer })),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            snap = next;
        }
        snap
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (status, json) = call(&app(), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], crate::VERSION);
        assert_eq!(json["service"], "mindquest");
    }

    #[tokio::test]
    async fn test_create_session_connects_wallet() {
        let app = app();
        let (status, json) = call(&app, "POST", "/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["phase"], "welcome");
        assert_eq!(
            json["owner"],
            crate::config::DEFAULT_PLAYER_ADDRESS.to_lowercase()
        );

        let id = json["id"].as_str().unwrap();
        let (status, json) = call(&app, "GET", &format!("/sessions/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["phase"], "welcome");
    }

    #[tokio::test]
    async fn test_full_quest_and_mint() {
        let app = app();
        let id = create(&app).await;

        let snap = play(&app, &id).await;
        assert_eq!(snap["phase"], "completed");
        assert_eq!(snap["result"]["responses"].as_array().unwrap().len(), 5);

        let (status, snap) = call(&app, "POST", &format!("/sessions/{}/mint", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(snap["phase"], "minted");
        assert_eq!(snap["token_id"], 1);

        let (_, total) = call(&app, "GET", "/tokens/total", None).await;
        assert_eq!(total["total"], 1);

        let (status, token) = call(&app, "GET", "/tokens/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(token["record"]["traits"], snap["result"]["traits"]);
        assert_eq!(token["record"]["ai_generated_story"], snap["result"]["story"]);
        assert!(token["token_uri"]
            .as_str()
            .unwrap()
            .starts_with("data:application/json;base64,"));
        assert!(token["explorer_url"]
            .as_str()
            .unwrap()
            .ends_with("?a=1"));
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let uri = format!("/sessions/{}", Uuid::new_v4());
        let (status, json) = call(&app(), "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["error"].as_str().unwrap().contains("Session not found"));
    }

    #[tokio::test]
    async fn test_answer_before_start_is_409() {
        let app = app();
        let id = create(&app).await;
        let (status, json) = call(
            &app,
            "POST",
            &format!("/sessions/{}/answer", id),
            Some(serde_json::json!({ "answer": "anything" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(json["error"].as_str().unwrap().contains("welcome"));
    }

    #[tokio::test]
    async fn test_unknown_option_is_400() {
        let app = app();
        let id = create(&app).await;
        call(&app, "POST", &format!("/sessions/{}/start", id), None).await;
        let (status, _) = call(
            &app,
            "POST",
            &format!("/sessions/{}/answer", id),
            Some(serde_json::json!({ "answer": "Not an option" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, snap) = call(&app, "GET", &format!("/sessions/{}", id), None).await;
        assert_eq!(snap["progress"]["current"], 1);
    }

    #[tokio::test]
    async fn test_mint_before_completion_is_409() {
        let app = app();
        let id = create(&app).await;
        call(&app, "POST", &format!("/sessions/{}/start", id), None).await;
        let (status, _) = call(&app, "POST", &format!("/sessions/{}/mint", id), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_reset_returns_to_welcome() {
        let app = app();
        let id = create(&app).await;
        play(&app, &id).await;
        let (status, snap) = call(&app, "POST", &format!("/sessions/{}/reset", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(snap["phase"], "welcome");
        assert!(snap["result"].is_null());
        assert!(!snap["owner"].is_null());
    }

    #[tokio::test]
    async fn test_reset_while_minting_is_409() {
        let state = AppState::from_config(&QuestConfig::default()).unwrap();
        let app = app_router(state.clone());
        let id = create(&app).await;
        play(&app, &id).await;

        let uuid: Uuid = id.parse().unwrap();
        let handle = state.session(uuid).unwrap();
        let request = handle.lock().await.begin_mint().unwrap();

        let (status, json) = call(&app, "POST", &format!("/sessions/{}/reset", id), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(json["error"].as_str().unwrap().contains("minting"));
        let (status, _) = call(&app, "POST", &format!("/sessions/{}/start", id), None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        handle.lock().await.finish_mint(Ok(TokenId(7))).unwrap();
        let (_, snap) = call(&app, "GET", &format!("/sessions/{}", id), None).await;
        assert_eq!(snap["phase"], "minted");
        assert_eq!(snap["token_id"], 7);
        assert_eq!(snap["result"]["traits"], serde_json::to_value(request.traits).unwrap());
    }

    #[tokio::test]
    async fn test_delete_session() {
        let app = app();
        let id = create(&app).await;
        let uri = format!("/sessions/{}", id);

        let (status, body) = call(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_null());

        let (status, _) = call(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = call(&app, "POST", &format!("{}/start", uri), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, json) = call(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["error"].as_str().unwrap().contains("Session not found"));
    }

    #[tokio::test]
    async fn test_unknown_token_is_404() {
        let (status, json) = call(&app(), "GET", "/tokens/99", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["error"].as_str().unwrap().contains("Token does not exist"));
    }
}
