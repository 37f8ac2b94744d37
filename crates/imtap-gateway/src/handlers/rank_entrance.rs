use imtap_core::error::Result;
use imtap_core::protocol::{method, DecodedMessage};

use super::unexpected;
use crate::dispatch::Handler;
use crate::report::LiveEvent;

pub const HANDLER: Handler = Handler::new(method::RANK_ENTRANCE, handle);

/// The entrance body is opaque; only its presence and size are reported.
pub fn handle(msg: &DecodedMessage) -> Result<LiveEvent> {
    let DecodedMessage::RankEntrance(rank) = msg else {
        return Err(unexpected(method::RANK_ENTRANCE, msg));
    };
    Ok(LiveEvent::RankEntrance {
        room_id: rank.common.as_ref().map(|c| c.room_id).unwrap_or_default(),
        info_len: rank.info.len(),
    })
}
