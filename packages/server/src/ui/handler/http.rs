//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Form, Json,
    extract::{State, rejection::FormRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::{
    ui::state::AppState,
    usecase::{SendMessageError, SetNicknameError},
};

use super::session::resolve_session;

/// Form body of `/send`
#[derive(Debug, Default, Deserialize)]
pub struct SendForm {
    #[serde(default)]
    pub message: String,
}

/// Form body of `/set-nickname`
#[derive(Debug, Default, Deserialize)]
pub struct NicknameForm {
    #[serde(default)]
    pub nickname: String,
}

/// A missing or unreadable form counts as one with every field empty
fn form_or_default<T: Default>(form: Result<Form<T>, FormRejection>) -> T {
    match form {
        Ok(Form(form)) => form,
        Err(e) => {
            tracing::debug!("Treating unreadable form as empty: {}", e);
            T::default()
        }
    }
}

/// Post a chat message or a `;command`
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    form: Result<Form<SendForm>, FormRejection>,
) -> Response {
    let (jar, session_id) = resolve_session(&state, jar).await;
    let form = form_or_default(form);

    match state
        .send_message_usecase
        .execute(&session_id, &form.message)
        .await
    {
        Ok(_) => (jar, "Message sent").into_response(),
        Err(e @ SendMessageError::EmptyMessage) => {
            (StatusCode::BAD_REQUEST, jar, e.to_string()).into_response()
        }
        Err(e @ SendMessageError::Throttled) => {
            (StatusCode::TOO_MANY_REQUESTS, jar, e.to_string()).into_response()
        }
    }
}

/// Set the caller's nickname
pub async fn set_nickname(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    form: Result<Form<NicknameForm>, FormRejection>,
) -> Response {
    let (jar, session_id) = resolve_session(&state, jar).await;
    let form = form_or_default(form);

    match state
        .set_nickname_usecase
        .execute(&session_id, &form.nickname)
        .await
    {
        Ok(change) => (jar, format!("Nickname set to {}", change.current)).into_response(),
        Err(SetNicknameError::Invalid(e)) => {
            tracing::debug!("Rejected nickname for '{}': {}", session_id, e);
            (StatusCode::BAD_REQUEST, jar, e.to_string()).into_response()
        }
    }
}

/// Announce that the caller joined
pub async fn join(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let (jar, session_id) = resolve_session(&state, jar).await;
    state.presence_usecase.join(&session_id).await;
    (jar, StatusCode::OK).into_response()
}

/// Announce that the caller left
pub async fn leave(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let (jar, session_id) = resolve_session(&state, jar).await;
    state.presence_usecase.leave(&session_id).await;
    (jar, StatusCode::OK).into_response()
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}
