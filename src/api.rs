use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::bot::Dispatcher;

#[derive(Deserialize)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
}

pub fn router(dispatcher: Arc<Dispatcher>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ask", post(ask))
        .with_state(dispatcher)
}

pub async fn serve(listener: TcpListener, dispatcher: Arc<Dispatcher>) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("API Server listening on {}", addr);
    }
    axum::serve(listener, router(dispatcher)).await
}

async fn health(State(dispatcher): State<Arc<Dispatcher>>) -> impl IntoResponse {
    let llm = if dispatcher.composer().llm_state().is_ready() {
        "ready"
    } else {
        "unavailable"
    };
    Json(json!({"status": "ok", "llm": llm}))
}

/// Same fetch and compose path as a chat message
async fn ask(
    State(dispatcher): State<Arc<Dispatcher>>,
    Json(req): Json<AskRequest>,
) -> impl IntoResponse {
    if req.question.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, "question must not be empty").into_response();
    }

    let span = info_span!("ask", request_id = %Uuid::new_v4());
    let answer = async {
        info!("💬 [API] Question received: {}", req.question);
        dispatcher.answer_question(&req.question).await
    }
    .instrument(span)
    .await;

    Json(AskResponse { answer }).into_response()
}
