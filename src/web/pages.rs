//! HTML pages served to uploaders.
//!
//! The pages are small and self-contained, so they live here as strings
//! instead of a template directory.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

const STYLE: &str = "body{font-family:sans-serif;max-width:36em;margin:4em auto;padding:0 1em}";

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\">\
         <title>{title}</title><style>{STYLE}</style></head>\
         <body>{body}</body></html>\n",
        title = escape_html(title),
    )
}

/// Escape text for inclusion in HTML content or attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Landing page.
pub fn index() -> Html<String> {
    Html(layout(
        "dropslot",
        "<h1>dropslot</h1><p>Ask for an upload link in the chat to share a picture.</p>",
    ))
}

/// Upload form for a usable slot.
pub fn upload_form(action: &str, username: &str, room: &str, max_file_size: &str) -> Html<String> {
    Html(layout(
        "Upload a file",
        &format!(
            "<h1>Upload a file</h1>\
             <p>Uploading as <b>{username}</b> to <b>#{room}</b>. Maximum size: {max}.</p>\
             <form method=\"post\" action=\"{action}\" enctype=\"multipart/form-data\">\
             <input type=\"file\" name=\"filename\" required> \
             <button type=\"submit\">Upload</button></form>",
            username = escape_html(username),
            room = escape_html(room),
            max = escape_html(max_file_size),
            action = escape_html(action),
        ),
    ))
}

/// 404 page. Used for unknown, used and expired tokens alike.
pub fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(layout(
            "Not found",
            "<h1>Not found</h1><p>This link does not exist or has already been used.</p>",
        )),
    )
        .into_response()
}

/// Shown when the storage quota is exhausted.
pub fn storage_full() -> Html<String> {
    Html(layout(
        "Storage full",
        "<h1>Storage full</h1><p>The server is out of space. Try again in a few minutes.</p>",
    ))
}

/// Shown after a successful upload.
pub fn upload_success() -> Html<String> {
    Html(layout(
        "Uploaded",
        "<h1>Uploaded</h1><p>Your file has been posted to the chat.</p>",
    ))
}
