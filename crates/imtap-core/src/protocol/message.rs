//! Decoded message variants and the method names that select them.

use super::webcast::{
    ChatMessage, GiftMessage, LikeMessage, MemberMessage, RanklistHourEntranceMessage,
    RoomStatsMessage, User,
};

/// Method names as emitted by the producer (`envelope.method`).
pub mod method {
    pub const CHAT: &str = "WebcastChatMessage";
    pub const GIFT: &str = "WebcastGiftMessage";
    pub const MEMBER: &str = "WebcastMemberMessage";
    pub const LIKE: &str = "WebcastLikeMessage";
    pub const ROOM_STATS: &str = "WebcastRoomStatsMessage";
    pub const RANK_ENTRANCE: &str = "WebcastRanklistHourEntranceMessage";

    /// Every method with a built-in schema, in registration order.
    pub const ALL: [&str; 6] = [CHAT, GIFT, MEMBER, LIKE, ROOM_STATS, RANK_ENTRANCE];
}

/// Closed set of payloads the pipeline understands.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedMessage {
    Chat(ChatMessage),
    Gift(GiftMessage),
    Member(MemberMessage),
    Like(LikeMessage),
    RoomStats(RoomStatsMessage),
    RankEntrance(RanklistHourEntranceMessage),
}

impl DecodedMessage {
    /// Method name of the schema this variant was decoded with.
    pub fn method(&self) -> &'static str {
        match self {
            DecodedMessage::Chat(_) => method::CHAT,
            DecodedMessage::Gift(_) => method::GIFT,
            DecodedMessage::Member(_) => method::MEMBER,
            DecodedMessage::Like(_) => method::LIKE,
            DecodedMessage::RoomStats(_) => method::ROOM_STATS,
            DecodedMessage::RankEntrance(_) => method::RANK_ENTRANCE,
        }
    }

    /// Sender, when the variant carries one and it was present on the wire.
    pub fn user(&self) -> Option<&User> {
        match self {
            DecodedMessage::Chat(m) => m.user.as_ref(),
            DecodedMessage::Gift(m) => m.user.as_ref(),
            DecodedMessage::Member(m) => m.user.as_ref(),
            DecodedMessage::Like(m) => m.user.as_ref(),
            DecodedMessage::RoomStats(_) | DecodedMessage::RankEntrance(_) => None,
        }
    }
}
