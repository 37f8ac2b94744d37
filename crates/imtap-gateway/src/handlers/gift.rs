use imtap_core::error::Result;
use imtap_core::protocol::webcast::GiftMessage;
use imtap_core::protocol::{method, DecodedMessage};

use super::{display_name, unexpected};
use crate::dispatch::Handler;
use crate::report::LiveEvent;

pub const HANDLER: Handler = Handler::new(method::GIFT, handle);

/// Gift multiplicity: combo count, else repeat count, else group count.
/// Zero when all three are zero.
pub fn effective_count(gift: &GiftMessage) -> u64 {
    [gift.combo_count, gift.repeat_count, gift.group_count]
        .into_iter()
        .find(|&c| c != 0)
        .unwrap_or(0)
}

pub fn handle(msg: &DecodedMessage) -> Result<LiveEvent> {
    let DecodedMessage::Gift(gift) = msg else {
        return Err(unexpected(method::GIFT, msg));
    };
    Ok(LiveEvent::Gift {
        user: display_name(gift.user.as_ref()),
        gift_id: gift.gift_id,
        count: effective_count(gift),
        combo_count: gift.combo_count,
        repeat_count: gift.repeat_count,
        group_count: gift.group_count,
        fan_ticket_count: gift.fan_ticket_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gift(combo: u64, repeat: u64, group: u64) -> GiftMessage {
        GiftMessage {
            gift_id: 685,
            combo_count: combo,
            repeat_count: repeat,
            group_count: group,
            ..Default::default()
        }
    }

    #[test]
    fn falls_back_to_repeat_count() {
        assert_eq!(effective_count(&gift(0, 5, 9)), 5);
    }

    #[test]
    fn falls_back_to_group_count() {
        assert_eq!(effective_count(&gift(0, 0, 9)), 9);
    }

    #[test]
    fn all_zero_is_zero() {
        assert_eq!(effective_count(&gift(0, 0, 0)), 0);
    }

    #[test]
    fn combo_count_wins() {
        assert_eq!(effective_count(&gift(3, 5, 9)), 3);
        assert_eq!(effective_count(&gift(3, 0, 0)), 3);
    }

    #[test]
    fn raw_fields_are_reported() {
        let mut g = gift(0, 5, 9);
        g.fan_ticket_count = 1;
        let ev = handle(&DecodedMessage::Gift(g)).unwrap();
        assert_eq!(
            ev,
            LiveEvent::Gift {
                user: "anonymous".into(),
                gift_id: 685,
                count: 5,
                combo_count: 0,
                repeat_count: 5,
                group_count: 9,
                fan_ticket_count: 1,
            }
        );
    }
}
