//! Per-method interpreters.
//!
//! Each handler owns one method and turns the matching `DecodedMessage`
//! variant into a `LiveEvent`. Handlers are pure: no shared state, no I/O.
//! Optional sub-messages are normalized here (missing user -> "anonymous").

pub mod chat;
pub mod gift;
pub mod like;
pub mod member;
pub mod rank_entrance;
pub mod room_stats;

use imtap_core::error::ImTapError;
use imtap_core::protocol::webcast::User;
use imtap_core::protocol::DecodedMessage;

use crate::dispatch::Handler;

/// Identity reported when a message carries no usable user.
pub const ANONYMOUS: &str = "anonymous";

/// Built-in handlers, in registration order.
pub fn builtin() -> Vec<Handler> {
    vec![
        chat::HANDLER,
        gift::HANDLER,
        member::HANDLER,
        like::HANDLER,
        room_stats::HANDLER,
        rank_entrance::HANDLER,
    ]
}

/// Display name for an optional user: nickname, then display id, then
/// [`ANONYMOUS`].
pub fn display_name(user: Option<&User>) -> String {
    user.and_then(|u| {
        [u.nick_name.as_str(), u.display_id.as_str()]
            .into_iter()
            .find(|s| !s.trim().is_empty())
    })
    .unwrap_or(ANONYMOUS)
    .to_string()
}

/// Error for a variant routed to the wrong handler.
pub(crate) fn unexpected(expected: &'static str, got: &DecodedMessage) -> ImTapError {
    ImTapError::handler(
        expected,
        format!("expected {expected} payload, got {}", got.method()),
    )
}
