use serde::Serialize;

use imtap_core::protocol::method;
use imtap_core::FailureKind;

/// Interpreted semantics of one decoded message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LiveEvent {
    Chat {
        user: String,
        content: String,
    },
    Gift {
        user: String,
        gift_id: u64,
        /// First nonzero of combo/repeat/group.
        count: u64,
        combo_count: u64,
        repeat_count: u64,
        group_count: u64,
        fan_ticket_count: u64,
    },
    Member {
        user: String,
        member_count: u64,
    },
    Like {
        user: String,
        count: u64,
        total: u64,
    },
    RoomStats {
        display: String,
        total: i64,
        display_value: i64,
    },
    RankEntrance {
        room_id: u64,
        info_len: usize,
    },
}

impl LiveEvent {
    /// Method of the message this event was derived from.
    pub fn method(&self) -> &'static str {
        match self {
            LiveEvent::Chat { .. } => method::CHAT,
            LiveEvent::Gift { .. } => method::GIFT,
            LiveEvent::Member { .. } => method::MEMBER,
            LiveEvent::Like { .. } => method::LIKE,
            LiveEvent::RoomStats { .. } => method::ROOM_STATS,
            LiveEvent::RankEntrance { .. } => method::RANK_ENTRANCE,
        }
    }
}

/// A dropped envelope, with enough context to diagnose it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub method: String,
    pub detail: String,
}

impl Failure {
    pub fn new(kind: FailureKind, method: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind,
            method: method.into(),
            detail: detail.into(),
        }
    }
}

/// Everything the pipeline reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    Event(LiveEvent),
    Failure(Failure),
}
