//! Message grouping: runs of consecutive messages from the same sender.

use serde::{Deserialize, Serialize};

use super::message::ChatMessage;

/// Position of a message inside a visually grouped run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageGroupPosition {
    First,
    Inside,
    Last,
    #[default]
    Single,
}

impl MessageGroupPosition {
    /// Whether this message opens a group (and so carries the sender header).
    pub fn starts_group(self) -> bool {
        matches!(self, Self::First | Self::Single)
    }

    /// Whether this message closes a group (and so is followed by a gap).
    pub fn ends_group(self) -> bool {
        matches!(self, Self::Last | Self::Single)
    }
}

/// Compute the group position of every message in transcript order.
///
/// Two neighbours belong to the same group when they were sent by the same
/// user.
pub fn group_positions(messages: &[ChatMessage]) -> Vec<MessageGroupPosition> {
    let same_sender = |a: usize, b: usize| messages[a].user.id == messages[b].user.id;

    (0..messages.len())
        .map(|i| {
            let joins_prev = i > 0 && same_sender(i - 1, i);
            let joins_next = i + 1 < messages.len() && same_sender(i, i + 1);
            match (joins_prev, joins_next) {
                (false, false) => MessageGroupPosition::Single,
                (false, true) => MessageGroupPosition::First,
                (true, true) => MessageGroupPosition::Inside,
                (true, false) => MessageGroupPosition::Last,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChatUser, ContentItem};
    use chrono::Utc;

    fn msg(user: &ChatUser) -> ChatMessage {
        ChatMessage::new(
            user.clone(),
            Utc::now(),
            vec![ContentItem::Text("x".to_string())],
        )
    }

    #[test]
    fn test_group_positions_runs() {
        let agent = ChatUser::agent("a", "Agent");
        let customer = ChatUser::customer("c", "Customer");
        let messages = vec![
            msg(&agent),
            msg(&agent),
            msg(&agent),
            msg(&customer),
            msg(&agent),
            msg(&agent),
        ];

        use MessageGroupPosition::*;
        assert_eq!(
            group_positions(&messages),
            vec![First, Inside, Last, Single, First, Last]
        );
    }

    #[test]
    fn test_group_positions_empty_and_single() {
        assert!(group_positions(&[]).is_empty());
        let agent = ChatUser::agent("a", "Agent");
        assert_eq!(
            group_positions(&[msg(&agent)]),
            vec![MessageGroupPosition::Single]
        );
    }

    #[test]
    fn test_group_boundaries() {
        assert!(MessageGroupPosition::First.starts_group());
        assert!(!MessageGroupPosition::First.ends_group());
        assert!(MessageGroupPosition::Single.starts_group());
        assert!(MessageGroupPosition::Single.ends_group());
        assert!(!MessageGroupPosition::Inside.starts_group());
        assert!(MessageGroupPosition::Last.ends_group());
    }
}
