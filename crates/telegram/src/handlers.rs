use {teloxide::types::Message, tracing::debug};

use ytbot_channels::InboundMessage;

/// Convert a Telegram message into an [`InboundMessage`].
///
/// Returns `None` for messages without text and for commands explicitly
/// addressed to a different bot (`/ping@otherbot`).
pub fn to_inbound(msg: &Message, bot_username: Option<&str>) -> Option<InboundMessage> {
    let Some(text) = msg.text() else {
        debug!(chat_id = msg.chat.id.0, "ignoring non-text message");
        return None;
    };

    if addressed_to_other_bot(text, bot_username) {
        debug!(chat_id = msg.chat.id.0, "ignoring command for another bot");
        return None;
    }

    Some(InboundMessage::new(
        msg.chat.id.0.to_string(),
        msg.id.0.to_string(),
        text,
    ))
}

fn addressed_to_other_bot(text: &str, bot_username: Option<&str>) -> bool {
    let Some(rest) = text.strip_prefix('/') else {
        return false;
    };
    let head = rest.split_whitespace().next().unwrap_or_default();
    match (head.split_once('@'), bot_username) {
        (Some((_, target)), Some(me)) => !target.eq_ignore_ascii_case(me),
        _ => false,
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {rstest::rstest, serde_json::json};

    use super::*;

    fn text_message(chat_id: i64, message_id: i32, text: &str) -> Message {
        serde_json::from_value(json!({
            "message_id": message_id,
            "date": 1,
            "chat": { "id": chat_id, "type": "private", "first_name": "Alice" },
            "from": {
                "id": 1001,
                "is_bot": false,
                "first_name": "Alice",
                "username": "alice"
            },
            "text": text
        }))
        .expect("deserialize text message")
    }

    #[test]
    fn command_message_converted() {
        let msg = text_message(42, 7, "/channelid Veritasium");
        let inbound = to_inbound(&msg, Some("ytbot")).unwrap();
        assert_eq!(inbound.chat_id, "42");
        assert_eq!(inbound.message_id, "7");
        let cmd = inbound.command.unwrap();
        assert_eq!(cmd.name, "channelid");
        assert_eq!(cmd.args, "Veritasium");
    }

    #[test]
    fn plain_text_converted_without_command() {
        let inbound = to_inbound(&text_message(-100, 1, "hi"), None).unwrap();
        assert!(!inbound.is_command());
        assert_eq!(inbound.text, "hi");
    }

    #[test]
    fn non_text_message_ignored() {
        let msg: Message = serde_json::from_value(json!({
            "message_id": 1,
            "date": 1,
            "chat": { "id": 42, "type": "private", "first_name": "Alice" },
            "location": { "latitude": 48.8566, "longitude": 2.3522 }
        }))
        .expect("deserialize location message");
        assert!(to_inbound(&msg, None).is_none());
    }

    #[rstest]
    #[case("/ping@otherbot", Some("ytbot"), true)]
    #[case("/ping@YTBot", Some("ytbot"), false)]
    #[case("/ping", Some("ytbot"), false)]
    #[case("/ping@otherbot", None, false)]
    #[case("hello @otherbot", Some("ytbot"), false)]
    fn other_bot_detection(
        #[case] text: &str,
        #[case] me: Option<&str>,
        #[case] expected: bool,
    ) {
        assert_eq!(addressed_to_other_bot(text, me), expected);
    }
}
