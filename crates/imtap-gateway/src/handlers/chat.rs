use imtap_core::error::Result;
use imtap_core::protocol::{method, DecodedMessage};

use super::{display_name, unexpected};
use crate::dispatch::Handler;
use crate::report::LiveEvent;

pub const HANDLER: Handler = Handler::new(method::CHAT, handle);

pub fn handle(msg: &DecodedMessage) -> Result<LiveEvent> {
    let DecodedMessage::Chat(chat) = msg else {
        return Err(unexpected(method::CHAT, msg));
    };
    Ok(LiveEvent::Chat {
        user: display_name(chat.user.as_ref()),
        content: chat.content.clone(),
    })
}
