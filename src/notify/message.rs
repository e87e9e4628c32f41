//! Links and chat message texts.

use url::Url;

use crate::{DropError, Result};

/// Maximum number of trailing file name characters shown in a view link.
pub const DISPLAY_NAME_CHARS: usize = 20;

/// Builds the public upload and view URLs.
#[derive(Debug, Clone)]
pub struct LinkBuilder {
    base: Url,
}

impl LinkBuilder {
    /// Create a builder for the given public base URL.
    pub fn new(public_url: &str) -> Result<Self> {
        let base = Url::parse(public_url)
            .map_err(|e| DropError::Config(format!("invalid public URL {public_url:?}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(DropError::Config(format!(
                "public URL {public_url:?} cannot have paths"
            )));
        }
        Ok(Self { base })
    }

    fn with_segments(&self, segments: &[&str]) -> String {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.to_string()
    }

    /// Page where `requester` uploads into slot `token`.
    ///
    /// The room is given without its leading `#`.
    pub fn upload_url(&self, token: &str, requester: &str, room: &str) -> String {
        self.with_segments(&["request", token, requester, strip_room_prefix(room)])
    }

    /// Link serving the file stored in slot `token`.
    ///
    /// Only the last `DISPLAY_NAME_CHARS` characters of the name are used;
    /// the server ignores this segment anyway.
    pub fn view_url(&self, token: &str, file_name: &str) -> String {
        self.with_segments(&["view", token, display_file_name(file_name)])
    }
}

/// Room name as used in URLs, without the leading `#`.
pub fn strip_room_prefix(room: &str) -> &str {
    room.strip_prefix('#').unwrap_or(room)
}

/// Room name as used by the chat, with a leading `#`.
pub fn chat_room(room: &str) -> String {
    format!("#{}", strip_room_prefix(room))
}

/// The last `DISPLAY_NAME_CHARS` characters of `file_name`.
pub fn display_file_name(file_name: &str) -> &str {
    let count = file_name.chars().count();
    if count <= DISPLAY_NAME_CHARS {
        return file_name;
    }
    let skip = count - DISPLAY_NAME_CHARS;
    match file_name.char_indices().nth(skip) {
        Some((idx, _)) => &file_name[idx..],
        None => file_name,
    }
}

/// Direct message carrying a fresh upload link.
pub fn upload_link_text(upload_url: &str) -> String {
    format!("Use this link to upload a picture: {upload_url}")
}

/// Markdown image posted to the room after an upload.
pub fn markdown_image(view_url: &str) -> String {
    format!("![{view_url} ]({view_url})")
}
