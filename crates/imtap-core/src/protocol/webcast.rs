//! Webcast IM payload schemas (protobuf).
//!
//! Only the fields the handlers read are declared. prost skips every other
//! tag on decode, so newer producer revisions that add fields keep decoding,
//! and absent fields fall back to their proto3 defaults.

/// Sender / subject of a message.
#[derive(Clone, PartialEq, prost::Message)]
pub struct User {
    #[prost(uint64, tag = "1")]
    pub id: u64,
    #[prost(uint64, tag = "2")]
    pub short_id: u64,
    #[prost(string, tag = "3")]
    pub nick_name: String,
    #[prost(string, tag = "38")]
    pub display_id: String,
    #[prost(string, tag = "46")]
    pub sec_uid: String,
}

/// Header shared by every webcast message.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Common {
    #[prost(string, tag = "1")]
    pub method: String,
    #[prost(uint64, tag = "2")]
    pub msg_id: u64,
    #[prost(uint64, tag = "3")]
    pub room_id: u64,
    #[prost(uint64, tag = "4")]
    pub create_time: u64,
}

/// `WebcastChatMessage`: a chat line (danmaku).
#[derive(Clone, PartialEq, prost::Message)]
pub struct ChatMessage {
    #[prost(message, optional, tag = "1")]
    pub common: Option<Common>,
    #[prost(message, optional, tag = "2")]
    pub user: Option<User>,
    #[prost(string, tag = "3")]
    pub content: String,
    #[prost(uint64, tag = "15")]
    pub event_time: u64,
}

/// `WebcastGiftMessage`.
#[derive(Clone, PartialEq, prost::Message)]
pub struct GiftMessage {
    #[prost(message, optional, tag = "1")]
    pub common: Option<Common>,
    #[prost(uint64, tag = "2")]
    pub gift_id: u64,
    #[prost(uint64, tag = "3")]
    pub fan_ticket_count: u64,
    #[prost(uint64, tag = "4")]
    pub group_count: u64,
    #[prost(uint64, tag = "5")]
    pub repeat_count: u64,
    #[prost(uint64, tag = "6")]
    pub combo_count: u64,
    #[prost(message, optional, tag = "7")]
    pub user: Option<User>,
    #[prost(message, optional, tag = "8")]
    pub to_user: Option<User>,
    #[prost(uint32, tag = "9")]
    pub repeat_end: u32,
    #[prost(uint64, tag = "29")]
    pub total_count: u64,
}

/// `WebcastMemberMessage`: a viewer entered the room.
#[derive(Clone, PartialEq, prost::Message)]
pub struct MemberMessage {
    #[prost(message, optional, tag = "1")]
    pub common: Option<Common>,
    #[prost(message, optional, tag = "2")]
    pub user: Option<User>,
    #[prost(uint64, tag = "3")]
    pub member_count: u64,
    #[prost(uint64, tag = "10")]
    pub action: u64,
}

/// `WebcastLikeMessage`.
#[derive(Clone, PartialEq, prost::Message)]
pub struct LikeMessage {
    #[prost(message, optional, tag = "1")]
    pub common: Option<Common>,
    #[prost(uint64, tag = "2")]
    pub count: u64,
    #[prost(uint64, tag = "3")]
    pub total: u64,
    #[prost(message, optional, tag = "5")]
    pub user: Option<User>,
}

/// `WebcastRoomStatsMessage`: audience counters as pre-rendered strings.
#[derive(Clone, PartialEq, prost::Message)]
pub struct RoomStatsMessage {
    #[prost(message, optional, tag = "1")]
    pub common: Option<Common>,
    #[prost(string, tag = "2")]
    pub display_short: String,
    #[prost(string, tag = "3")]
    pub display_middle: String,
    #[prost(string, tag = "4")]
    pub display_long: String,
    #[prost(int64, tag = "5")]
    pub display_value: i64,
    #[prost(int64, tag = "6")]
    pub display_version: i64,
    #[prost(bool, tag = "7")]
    pub incremental: bool,
    #[prost(bool, tag = "8")]
    pub is_hidden: bool,
    #[prost(int64, tag = "9")]
    pub total: i64,
    #[prost(int64, tag = "10")]
    pub display_type: i64,
}

/// `WebcastRanklistHourEntranceMessage`. The entrance body is kept as raw
/// bytes; nothing downstream interprets it.
#[derive(Clone, PartialEq, prost::Message)]
pub struct RanklistHourEntranceMessage {
    #[prost(message, optional, tag = "1")]
    pub common: Option<Common>,
    #[prost(bytes = "vec", tag = "2")]
    pub info: Vec<u8>,
}
