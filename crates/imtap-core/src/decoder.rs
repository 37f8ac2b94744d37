//! Decoder registry: method name -> payload decode function.
//!
//! Decoding is pure. Lookup is exact string equality on the method name; an
//! unknown method is `Ok(None)` (producers forward kinds we do not interpret),
//! while malformed bytes for a known method are `ImTapError::Decode`.

use std::collections::HashMap;

use prost::{DecodeError, Message};

use crate::error::{ImTapError, Result};
use crate::protocol::message::{method, DecodedMessage};
use crate::protocol::webcast::{
    ChatMessage, GiftMessage, LikeMessage, MemberMessage, RanklistHourEntranceMessage,
    RoomStatsMessage,
};

/// Parses one payload into its variant.
pub type DecodeFn = fn(&[u8]) -> std::result::Result<DecodedMessage, DecodeError>;

fn decode_chat(buf: &[u8]) -> std::result::Result<DecodedMessage, DecodeError> {
    ChatMessage::decode(buf).map(DecodedMessage::Chat)
}

fn decode_gift(buf: &[u8]) -> std::result::Result<DecodedMessage, DecodeError> {
    GiftMessage::decode(buf).map(DecodedMessage::Gift)
}

fn decode_member(buf: &[u8]) -> std::result::Result<DecodedMessage, DecodeError> {
    MemberMessage::decode(buf).map(DecodedMessage::Member)
}

fn decode_like(buf: &[u8]) -> std::result::Result<DecodedMessage, DecodeError> {
    LikeMessage::decode(buf).map(DecodedMessage::Like)
}

fn decode_room_stats(buf: &[u8]) -> std::result::Result<DecodedMessage, DecodeError> {
    RoomStatsMessage::decode(buf).map(DecodedMessage::RoomStats)
}

fn decode_rank_entrance(buf: &[u8]) -> std::result::Result<DecodedMessage, DecodeError> {
    RanklistHourEntranceMessage::decode(buf).map(DecodedMessage::RankEntrance)
}

/// Method -> decoder table. Read-only once handed to the engine (shared via `Arc`).
#[derive(Debug, Clone, Default)]
pub struct DecoderRegistry {
    table: HashMap<&'static str, DecodeFn>,
}

impl DecoderRegistry {
    /// Empty table (for custom pipelines and tests).
    pub fn new() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    /// Table with every built-in webcast schema.
    pub fn webcast() -> Self {
        let entries: [(&'static str, DecodeFn); 6] = [
            (method::CHAT, decode_chat),
            (method::GIFT, decode_gift),
            (method::MEMBER, decode_member),
            (method::LIKE, decode_like),
            (method::ROOM_STATS, decode_room_stats),
            (method::RANK_ENTRANCE, decode_rank_entrance),
        ];
        Self {
            table: entries.into_iter().collect(),
        }
    }

    /// Append a decoder. Registering the same method twice is a config error.
    pub fn register(&mut self, method: &'static str, decode: DecodeFn) -> Result<()> {
        if self.table.contains_key(method) {
            return Err(ImTapError::DuplicateRegistration(method.to_string()));
        }
        self.table.insert(method, decode);
        Ok(())
    }

    pub fn contains(&self, method: &str) -> bool {
        self.table.contains_key(method)
    }

    /// Registered methods, sorted.
    pub fn methods(&self) -> Vec<&'static str> {
        let mut v: Vec<&'static str> = self.table.keys().copied().collect();
        v.sort_unstable();
        v
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Decode `payload` with the schema registered for `method`.
    ///
    /// Returns `Ok(None)` when no schema is registered.
    pub fn decode(&self, method: &str, payload: &[u8]) -> Result<Option<DecodedMessage>> {
        let Some(decode) = self.table.get(method) else {
            tracing::trace!(%method, "no decoder registered");
            return Ok(None);
        };
        decode(payload).map(Some).map_err(|e| ImTapError::Decode {
            method: method.to_string(),
            len: payload.len(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::expect_used)]
    #![allow(clippy::panic)]

    use super::*;
    use crate::error::FailureKind;
    use crate::protocol::webcast::User;

    #[test]
    fn every_builtin_method_has_a_decoder() {
        let reg = DecoderRegistry::webcast();
        assert_eq!(reg.len(), method::ALL.len());
        for m in method::ALL {
            assert!(reg.contains(m), "missing decoder for {m}");
        }
    }

    #[test]
    fn decoded_variant_matches_method() {
        let reg = DecoderRegistry::webcast();
        // An empty payload is a valid proto3 message with every field defaulted.
        for m in method::ALL {
            let msg = reg.decode(m, &[]).unwrap().expect("known method");
            assert_eq!(msg.method(), m);
        }
    }

    #[test]
    fn unknown_method_is_no_match_not_error() {
        let reg = DecoderRegistry::webcast();
        let out = reg.decode("WebcastSocialMessage", &[0x08, 0x01]).unwrap();
        assert!(out.is_none());
        // Lookup is exact: case differences do not match.
        assert!(reg.decode("webcastchatmessage", &[]).unwrap().is_none());
    }

    #[test]
    fn truncated_payload_is_decode_error() {
        let reg = DecoderRegistry::webcast();
        // field 3 (content), length 5, only one byte follows
        let err = reg.decode(method::CHAT, &[0x1a, 0x05, 0x61]).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Decode);
        match err {
            ImTapError::Decode { method, len, .. } => {
                assert_eq!(method, "WebcastChatMessage");
                assert_eq!(len, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_fields_are_skipped() {
        let like = LikeMessage {
            count: 3,
            total: 120,
            ..Default::default()
        };
        let mut buf = like.encode_to_vec();
        // field 99, varint 7: not part of our schema
        buf.extend_from_slice(&[0x98, 0x06, 0x07]);

        let reg = DecoderRegistry::webcast();
        match reg.decode(method::LIKE, &buf).unwrap() {
            Some(DecodedMessage::Like(m)) => {
                assert_eq!(m.count, 3);
                assert_eq!(m.total, 120);
                assert!(m.user.is_none());
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn nested_user_is_decoded() {
        let chat = ChatMessage {
            user: Some(User {
                nick_name: "alice".into(),
                ..Default::default()
            }),
            content: "hi".into(),
            ..Default::default()
        };
        let msg = DecoderRegistry::webcast()
            .decode(method::CHAT, &chat.encode_to_vec())
            .unwrap()
            .unwrap();
        assert_eq!(msg.user().map(|u| u.nick_name.as_str()), Some("alice"));
    }

    #[test]
    fn duplicate_register_is_rejected() {
        let mut reg = DecoderRegistry::new();
        reg.register(method::CHAT, decode_chat).unwrap();
        let err = reg.register(method::CHAT, decode_chat).unwrap_err();
        assert!(matches!(err, ImTapError::DuplicateRegistration(m) if m == method::CHAT));
        assert_eq!(reg.methods(), vec![method::CHAT]);
    }
}
