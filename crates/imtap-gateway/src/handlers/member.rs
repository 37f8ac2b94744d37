use imtap_core::error::Result;
use imtap_core::protocol::{method, DecodedMessage};

use super::{display_name, unexpected};
use crate::dispatch::Handler;
use crate::report::LiveEvent;

pub const HANDLER: Handler = Handler::new(method::MEMBER, handle);

pub fn handle(msg: &DecodedMessage) -> Result<LiveEvent> {
    let DecodedMessage::Member(member) = msg else {
        return Err(unexpected(method::MEMBER, msg));
    };
    Ok(LiveEvent::Member {
        user: display_name(member.user.as_ref()),
        member_count: member.member_count,
    })
}
