//! Web front-end for the advisor.
//!
//! Each browser gets its own conversation, keyed by the `advisor_session`
//! cookie. Conversations live in memory only.
//!
//! Endpoints:
//! - GET / - Chat page (resets the caller's conversation)
//! - POST /chat - Send a message, get the reply
//! - POST /reset - Clear the caller's conversation
//! - POST /api/chat - Stateless chat with client-held history
//! - GET /health - Liveness probe

use std::convert::Infallible;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{FromRequestParts, State},
    http::{request::Parts, StatusCode},
    response::{Html, IntoResponseParts, ResponseParts},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::models::{Message, SessionId};
use crate::session::{detect_session_id, set_session_cookie, SessionStore};
use crate::turn::{Advisor, TurnOutcome, CONNECT_FALLBACK_REPLY};

/// Shared server state.
pub struct ServerState {
    /// Conversations per browser session.
    pub(crate) store: SessionStore,
    /// Turn logic and provider client.
    advisor: Advisor,
}

impl ServerState {
    pub fn new(advisor: Advisor) -> Self {
        Self {
            store: SessionStore::new(),
            advisor,
        }
    }
}

// === Session Cookie ===

/// The caller's session, from its cookie or freshly issued.
///
/// Returning it as a response part sets the cookie when it was issued by this request.
#[derive(Debug, Clone, Copy)]
pub struct ClientSession {
    pub id: SessionId,
    issued: bool,
}

impl<S: Send + Sync> FromRequestParts<S> for ClientSession {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(detect_session_id(&parts.headers).map_or_else(
            || Self {
                id: SessionId::generate(),
                issued: true,
            },
            |id| Self { id, issued: false },
        ))
    }
}

impl IntoResponseParts for ClientSession {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        if self.issued {
            set_session_cookie(res.headers_mut(), self.id);
        }
        Ok(res)
    }
}

// === Request/Response Types ===

/// Message from the chat page. An empty message on a fresh conversation asks for the greeting.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<TurnOutcome> for ChatResponse {
    fn from(outcome: TurnOutcome) -> Self {
        Self {
            response: outcome.reply,
            error: outcome.error,
        }
    }
}

/// Stateless request: the client sends the history it holds.
#[derive(Debug, Deserialize)]
pub struct StatelessChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub history: Vec<Message>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub sessions: usize,
}

// === Server Lifecycle ===

/// Build the application router.
pub fn router(state: Arc<ServerState>) -> Router {
    let api = Router::new()
        .route("/api/chat", post(stateless_chat))
        .layer(CorsLayer::permissive());

    Router::new()
        .route("/", get(index_handler))
        .route("/chat", post(chat))
        .route("/reset", post(reset))
        .route("/health", get(health))
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server and run until Ctrl-C.
pub async fn start_server(addr: SocketAddr, advisor: Advisor, open_browser: bool) -> Result<()> {
    let state = Arc::new(ServerState::new(advisor));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    let local = listener.local_addr()?;
    info!(addr = %local, "Watch advisor listening on http://{local}");

    if open_browser {
        let url = format!("http://{}", browse_addr(local));
        if let Err(e) = open::that(&url) {
            warn!(error = %e, url = %url, "Could not open browser");
        }
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

/// Address a local browser can reach when bound to all interfaces.
fn browse_addr(local: SocketAddr) -> SocketAddr {
    if local.ip().is_unspecified() {
        SocketAddr::from((Ipv4Addr::LOCALHOST, local.port()))
    } else {
        local
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
    }
}

// === Handlers ===

async fn index_handler(
    State(state): State<Arc<ServerState>>,
    session: ClientSession,
) -> (ClientSession, Html<&'static str>) {
    state.store.reset(session.id).await;
    (session, Html(include_str!("ui.html")))
}

async fn chat(
    State(state): State<Arc<ServerState>>,
    session: ClientSession,
    Json(req): Json<ChatRequest>,
) -> (ClientSession, Json<ChatResponse>) {
    let outcome = state
        .advisor
        .take_session_turn(&state.store, session.id, &req.message)
        .await;
    (session, Json(outcome.into()))
}

async fn reset(
    State(state): State<Arc<ServerState>>,
    session: ClientSession,
) -> (ClientSession, Json<StatusResponse>) {
    state.store.reset(session.id).await;
    (session, Json(StatusResponse { status: "ok" }))
}

async fn stateless_chat(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<StatelessChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ChatResponse>)> {
    match state
        .advisor
        .reply_to_history(req.history, req.message.as_deref())
        .await
    {
        Ok(response) => Ok(Json(ChatResponse {
            response,
            error: None,
        })),
        Err(e) => {
            warn!(error = %e, "Stateless completion failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ChatResponse {
                    response: CONNECT_FALLBACK_REPLY.to_string(),
                    error: Some("Failed to process request".to_string()),
                }),
            ))
        }
    }
}

async fn health(State(state): State<Arc<ServerState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        sessions: state.store.len().await,
    })
}
