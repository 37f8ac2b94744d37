use imtap_core::error::Result;
use imtap_core::protocol::{method, DecodedMessage};

use super::{display_name, unexpected};
use crate::dispatch::Handler;
use crate::report::LiveEvent;

pub const HANDLER: Handler = Handler::new(method::LIKE, handle);

pub fn handle(msg: &DecodedMessage) -> Result<LiveEvent> {
    let DecodedMessage::Like(like) = msg else {
        return Err(unexpected(method::LIKE, msg));
    };
    Ok(LiveEvent::Like {
        user: display_name(like.user.as_ref()),
        count: like.count,
        total: like.total,
    })
}
