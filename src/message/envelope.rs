//! # Addressed message payload.
//!
//! A [`Message`] is an immutable addressed payload: the raw target
//! identifier (validated into an [`Address`](crate::Address) at the routing
//! boundary) plus the full textual rendering of the carried URI. The arrival
//! timestamp is not part of the message itself — it is stamped by the
//! retention store when a message is buffered.

use std::fmt;
use std::sync::Arc;

/// Renderings longer than this are truncated for confirmation prompts.
const PREVIEW_LIMIT: usize = 40;
/// Leading characters kept by [`Message::preview`].
const PREVIEW_HEAD: usize = 30;
/// Trailing characters kept by [`Message::preview`].
const PREVIEW_TAIL: usize = 5;

/// Immutable addressed payload.
///
/// Cheap to clone; both fields are shared `Arc<str>` slices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    target: Arc<str>,
    uri: Arc<str>,
}

impl Message {
    /// Creates a message from its raw target identifier and textual rendering.
    pub fn new(target: impl Into<Arc<str>>, uri: impl Into<Arc<str>>) -> Self {
        Self {
            target: target.into(),
            uri: uri.into(),
        }
    }

    /// Returns the raw (unvalidated, case-preserving) target identifier.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns the full textual rendering of the message.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Returns a rendering bounded for confirmation prompts.
    ///
    /// Renderings of at most 40 characters pass through unchanged; longer
    /// ones keep the first 30 and last 5 characters joined by an ellipsis.
    /// Operates on characters, never splitting a multi-byte sequence.
    pub fn preview(&self) -> String {
        let chars: Vec<char> = self.uri.chars().collect();
        if chars.len() <= PREVIEW_LIMIT {
            return self.uri.to_string();
        }
        let head: String = chars[..PREVIEW_HEAD].iter().collect();
        let tail: String = chars[chars.len() - PREVIEW_TAIL..].iter().collect();
        format!("{head}…{tail}")
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}
