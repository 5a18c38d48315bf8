//! Per-turn decision logic.

use super::script::{ELLIPSIS, HANGUP_KEYWORDS, MAX_REPLY_CHARS};

/// What the agent does with one caller utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnAction<'a> {
    /// Nothing was said (or only whitespace).
    Silent,
    /// The caller asked to end the call.
    Decline,
    /// Forward the trimmed utterance to the reply composer.
    Respond(&'a str),
}

/// Decide how to handle `speech`.
pub fn classify_turn(speech: &str) -> TurnAction<'_> {
    let speech = speech.trim();
    if speech.is_empty() {
        TurnAction::Silent
    } else if contains_hangup_keyword(speech) {
        TurnAction::Decline
    } else {
        TurnAction::Respond(speech)
    }
}

/// Whether `speech` contains any hang-up keyword, ignoring case.
///
/// This is a plain substring test, so "know" or "nobody" also match "no".
pub fn contains_hangup_keyword(speech: &str) -> bool {
    let lowered = speech.to_lowercase();
    HANGUP_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
}

/// Cap `reply` at [`MAX_REPLY_CHARS`] characters, marking the cut with "...".
pub fn truncate_reply(reply: &str) -> String {
    match reply.char_indices().nth(MAX_REPLY_CHARS) {
        Some((cut, _)) => {
            let mut truncated = String::with_capacity(cut + ELLIPSIS.len());
            truncated.push_str(&reply[..cut]);
            truncated.push_str(ELLIPSIS);
            truncated
        }
        None => reply.to_string(),
    }
}
