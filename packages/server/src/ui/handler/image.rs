//! Image upload and retrieval handlers.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State, multipart::MultipartRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::{ui::state::AppState, usecase::UploadImageError};

use super::session::resolve_session;

/// Name of the multipart field holding the file
const IMAGE_FIELD: &str = "image";

/// Upload an image and broadcast it to the room
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(e) => {
            tracing::debug!("Rejected upload: {}", e);
            return (StatusCode::BAD_REQUEST, "Could not parse multipart form").into_response();
        }
    };

    let bytes = loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some(IMAGE_FIELD) => match field.bytes().await {
                Ok(bytes) => break bytes,
                Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                    tracing::debug!("Rejected oversized upload: {}", e);
                    return (StatusCode::BAD_REQUEST, "Image too large").into_response();
                }
                Err(e) => {
                    tracing::warn!("Failed to read uploaded image: {}", e);
                    return (StatusCode::INTERNAL_SERVER_ERROR, "Error reading image")
                        .into_response();
                }
            },
            Ok(Some(_)) => continue,
            Ok(None) => return (StatusCode::BAD_REQUEST, "Invalid image").into_response(),
            Err(e) => {
                tracing::debug!("Malformed multipart body: {}", e);
                return (StatusCode::BAD_REQUEST, "Could not parse multipart form")
                    .into_response();
            }
        }
    };

    let (jar, session_id) = resolve_session(&state, jar).await;
    match state
        .upload_image_usecase
        .execute(&session_id, bytes)
        .await
    {
        Ok(_) => (jar, "Image uploaded").into_response(),
        Err(e @ (UploadImageError::EmptyImage | UploadImageError::TooLarge { .. })) => {
            (StatusCode::BAD_REQUEST, jar, e.to_string()).into_response()
        }
    }
}

/// Serve a stored image
pub async fn get_image(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    match state.get_image_usecase.execute(&id).await {
        Some(bytes) => {
            let content_type = sniff_content_type(&bytes);
            ([(header::CONTENT_TYPE, content_type)], bytes).into_response()
        }
        None => (StatusCode::NOT_FOUND, "404 page not found").into_response(),
    }
}

/// Guess the media type of an uploaded image from its leading bytes.
fn sniff_content_type(bytes: &[u8]) -> &'static str {
    const SIGNATURES: &[(&[u8], &str)] = &[
        (b"\x89PNG\r\n\x1a\n", "image/png"),
        (b"\xff\xd8\xff", "image/jpeg"),
        (b"GIF87a", "image/gif"),
        (b"GIF89a", "image/gif"),
        (b"BM", "image/bmp"),
        (b"\x00\x00\x01\x00", "image/x-icon"),
    ];

    if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && bytes[8..12] == *b"WEBP" {
        return "image/webp";
    }
    SIGNATURES
        .iter()
        .find(|(magic, _)| bytes.starts_with(magic))
        .map(|(_, mime)| *mime)
        .unwrap_or("application/octet-stream")
}
