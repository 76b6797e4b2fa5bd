//! Lenient decoding of the backend's reply text
//!
//! The backend is asked for a bare JSON object but small local models often
//! wrap it in prose or trail garbage after it. Decoding tries, in order:
//! the whole text, the span from the first `{` to the last `}`, and finally
//! gives up and speaks the first characters of the raw text.

use super::Reply;
use serde::Deserialize;

/// Characters of raw text kept when the reply cannot be decoded
pub(crate) const TRUNCATED_REPLY_CHARS: usize = 150;

/// How the reply was recovered from the raw text
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ParsedReply {
    /// The whole text was a reply object
    Strict(Reply),
    /// A reply object was found between the outermost braces
    Extracted(Reply),
    /// Nothing decodable; the text itself is spoken with neutral affect
    Truncated(Reply),
}

impl ParsedReply {
    pub(crate) fn into_reply(self) -> Reply {
        match self {
            ParsedReply::Strict(reply)
            | ParsedReply::Extracted(reply)
            | ParsedReply::Truncated(reply) => reply,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReplyObject {
    response_text: String,
    #[serde(default)]
    delta_valence: Option<f64>,
    #[serde(default)]
    delta_arousal: Option<f64>,
}

impl From<ReplyObject> for Reply {
    fn from(obj: ReplyObject) -> Self {
        Reply::new(
            obj.response_text,
            obj.delta_valence.unwrap_or(0.0),
            obj.delta_arousal.unwrap_or(0.0),
        )
    }
}

pub(crate) fn parse_reply(content: &str) -> ParsedReply {
    if let Some(reply) = decode_object(content) {
        return ParsedReply::Strict(reply);
    }

    if let Some(reply) = braced_span(content).and_then(decode_object) {
        return ParsedReply::Extracted(reply);
    }

    ParsedReply::Truncated(Reply::neutral(truncate_chars(
        content,
        TRUNCATED_REPLY_CHARS,
    )))
}

fn decode_object(text: &str) -> Option<Reply> {
    serde_json::from_str::<ReplyObject>(text.trim())
        .ok()
        .map(Reply::from)
}

/// Span from the first `{` through the last `}`, inclusive
fn braced_span(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    if end < start {
        return None;
    }
    content.get(start..=end)
}

pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
