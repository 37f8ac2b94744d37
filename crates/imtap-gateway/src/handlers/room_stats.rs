use imtap_core::error::Result;
use imtap_core::protocol::{method, DecodedMessage};

use super::unexpected;
use crate::dispatch::Handler;
use crate::report::LiveEvent;

pub const HANDLER: Handler = Handler::new(method::ROOM_STATS, handle);

pub fn handle(msg: &DecodedMessage) -> Result<LiveEvent> {
    let DecodedMessage::RoomStats(stats) = msg else {
        return Err(unexpected(method::ROOM_STATS, msg));
    };
    // longest rendering available
    let display = [
        stats.display_long.as_str(),
        stats.display_middle.as_str(),
        stats.display_short.as_str(),
    ]
    .into_iter()
    .find(|s| !s.is_empty())
    .unwrap_or_default()
    .to_string();

    Ok(LiveEvent::RoomStats {
        display,
        total: stats.total,
        display_value: stats.display_value,
    })
}
