//! Browser-facing upload and view handlers.

use axum::{
    body::Body,
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use std::sync::Arc;

use super::AppState;
use crate::notify::Notice;
use crate::slot::format_file_size;
use crate::web::pages;
use crate::DropError;

/// Multipart field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "filename";

const TOO_LARGE_MESSAGE: &str = "File too large!";

/// Build the Content-Disposition header value for serving a file inline.
///
/// Control characters are dropped and quotes or backslashes replaced in the
/// plain `filename` parameter. Non-ASCII names also get an RFC 5987
/// `filename*` parameter.
fn content_disposition_header(filename: &str) -> String {
    let needs_encoding = !filename.is_ascii()
        || filename
            .chars()
            .any(|c| c.is_control() || c == '"' || c == '\\');

    if !needs_encoding {
        return format!("inline; filename=\"{}\"", filename);
    }

    let sanitized: String = filename
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '"' | '\\' => '_',
            _ => c,
        })
        .collect();

    format!(
        "inline; filename=\"{}\"; filename*=UTF-8''{}",
        sanitized,
        urlencoding::encode(filename)
    )
}

/// Strip any directory part a client sent along with the file name.
fn client_file_name(raw: &str) -> &str {
    raw.rsplit(['/', '\\']).next().unwrap_or(raw)
}

fn too_large() -> Response {
    (StatusCode::PAYLOAD_TOO_LARGE, TOO_LARGE_MESSAGE).into_response()
}

/// Map a multipart read failure to a response.
fn multipart_error(e: MultipartError) -> Response {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return too_large();
    }
    tracing::debug!(error = %e, "Failed to read multipart body");
    (StatusCode::BAD_REQUEST, "Invalid multipart data").into_response()
}

/// GET / - Landing page.
pub async fn index() -> Html<String> {
    pages::index()
}

/// GET /storage-full
pub async fn storage_full() -> Html<String> {
    pages::storage_full()
}

/// GET /upload-success
pub async fn upload_success() -> Html<String> {
    pages::upload_success()
}

/// Fallback for unknown routes.
pub async fn not_found() -> Response {
    pages::not_found()
}

/// GET /request/:token/:username/:room - Upload form for a usable slot.
pub async fn request_page(
    State(state): State<Arc<AppState>>,
    Path((token, username, room)): Path<(String, String, String)>,
) -> Response {
    if !state.slots.is_usable(&token) {
        return pages::not_found();
    }

    let action = format!(
        "/upload/{}/{}/{}",
        urlencoding::encode(&token),
        urlencoding::encode(&username),
        urlencoding::encode(&room)
    );
    let max_size = format_file_size(state.slots.max_file_bytes());

    pages::upload_form(&action, &username, &room, &max_size).into_response()
}

/// POST /upload/:token/:username/:room - Store the file and post it to the room.
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    Path((token, username, room)): Path<(String, String, String)>,
    mut multipart: Multipart,
) -> Response {
    // Skip reading the body for links that cannot be used anyway.
    if !state.slots.is_usable(&token) {
        return pages::not_found();
    }

    let mut upload: Option<(String, Vec<u8>)> = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return multipart_error(e),
        };

        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = client_file_name(field.file_name().unwrap_or("")).to_string();
        match field.bytes().await {
            Ok(content) => upload = Some((file_name, content.to_vec())),
            Err(e) => return multipart_error(e),
        }
        break;
    }

    let Some((file_name, content)) = upload else {
        return (StatusCode::BAD_REQUEST, "No file provided").into_response();
    };

    match state.slots.store_upload(&token, &file_name, &content).await {
        Ok(()) => {}
        Err(DropError::NotFound(_)) => return pages::not_found(),
        Err(DropError::QuotaExceeded { .. }) => {
            return Redirect::to("/storage-full").into_response();
        }
        Err(DropError::FileTooLarge { .. }) => return too_large(),
        Err(e @ DropError::InvalidFileName(_)) => {
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
        Err(e) => {
            tracing::error!(token = %token, error = %e, "Failed to store upload");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to store file").into_response();
        }
    }

    let view_url = state.links.view_url(&token, &file_name);
    if let Err(e) = state
        .notifier
        .notify(Notice::uploaded(&room, &username, &view_url))
        .await
    {
        tracing::warn!(room = %room, error = %e, "Failed to post upload to chat");
    }

    Redirect::to("/upload-success").into_response()
}

/// GET /view/:token/:filename - Serve a stored file.
///
/// Only the token selects the file; the name segment is cosmetic.
pub async fn view_file(
    State(state): State<Arc<AppState>>,
    Path((token, _display_name)): Path<(String, String)>,
) -> Response {
    let file = match state.slots.describe_for_retrieval(&token) {
        Ok(file) => file,
        Err(_) => return pages::not_found(),
    };

    let content = match state
        .slots
        .storage()
        .read_file(&token, &file.file_name)
        .await
    {
        Ok(content) => content,
        Err(DropError::NotFound(_)) => {
            tracing::warn!(token = %token, "Stored file missing on disk");
            return pages::not_found();
        }
        Err(e) => {
            tracing::error!(token = %token, error = %e, "Failed to read stored file");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to read file").into_response();
        }
    };

    let content_type = mime_guess::from_path(&file.file_name)
        .first_or_octet_stream()
        .to_string();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_header(&file.file_name),
        )
        .header(header::CONTENT_LENGTH, content.len())
        .body(Body::from(content))
        .unwrap_or_else(|e| {
            tracing::error!("Failed to build response: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        })
}
