// SPDX-FileCopyrightText: 2026 Bdaybot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the birthday bot.
//!
//! This crate provides the trait definitions, error types, and common types
//! shared across the workspace. The conversation engine consumes the
//! [`UserStore`] and [`ReplyFormatter`] traits; adapters implement them.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::BotError;
pub use types::{
    AdapterType, ConversationState, HealthStatus, InboundMessage, MessageId, OutboundMessage,
    ReplyPayload, User, UserId,
};

pub use traits::{ChannelAdapter, PluginAdapter, ReplyFormatter, UserStore};

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn conversation_state_persists_as_snake_case() {
        let cases = [
            (ConversationState::Initial, "initial"),
            (ConversationState::Greeted, "greeted"),
            (ConversationState::NameKnown, "name_known"),
            (ConversationState::BirthDateKnown, "birth_date_known"),
        ];

        for (state, text) in cases {
            assert_eq!(state.to_string(), text);
            assert_eq!(ConversationState::from_str(text).unwrap(), state);
        }
        assert!(ConversationState::from_str("finished").is_err());
    }

    #[test]
    fn absent_state_defaults_to_initial() {
        assert_eq!(ConversationState::default(), ConversationState::Initial);
        assert_eq!(User::new(UserId::from("u1")).state, ConversationState::Initial);
    }

    #[test]
    fn states_advance_linearly_and_reset() {
        use ConversationState::*;

        assert_eq!(Initial.next(), Greeted);
        assert_eq!(Greeted.next(), NameKnown);
        assert_eq!(NameKnown.next(), BirthDateKnown);
        assert_eq!(BirthDateKnown.next(), Initial);

        assert!(Greeted.can_transition_to(NameKnown));
        assert!(NameKnown.can_transition_to(Initial));
        assert!(!Initial.can_transition_to(NameKnown));
        assert!(!BirthDateKnown.can_transition_to(Greeted));
        assert!(!NameKnown.can_transition_to(Greeted));
    }

    #[test]
    fn reply_payload_accessors() {
        let text = ReplyPayload::Text {
            text: "hello".into(),
        };
        assert_eq!(text.text(), "hello");
        assert!(text.labels().is_empty());

        let quick = ReplyPayload::QuickReply {
            text: "pick one".into(),
            labels: vec!["Yes".into(), "No".into()],
        };
        assert_eq!(quick.text(), "pick one");
        assert_eq!(quick.labels(), ["Yes", "No"]);
    }

    #[test]
    fn reply_payload_serializes_with_type_tag() {
        let quick = ReplyPayload::QuickReply {
            text: "pick one".into(),
            labels: vec!["Yes".into()],
        };
        let json = serde_json::to_value(&quick).unwrap();
        assert_eq!(json["type"], "quick_reply");
        assert_eq!(json["labels"][0], "Yes");
    }

    #[test]
    fn bot_error_messages() {
        let err = BotError::InvalidBirthDate {
            value: "1990-13-01".into(),
        };
        assert_eq!(err.to_string(), "invalid birth date `1990-13-01`");

        let err = BotError::UserNotFound {
            user_id: "U123".into(),
        };
        assert_eq!(err.to_string(), "user not found: U123");

        let err = BotError::storage(std::io::Error::other("disk full"));
        assert_eq!(err.to_string(), "storage error: disk full");
    }

    #[test]
    fn all_adapter_traits_are_exported() {
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_user_store<T: UserStore>() {}
        fn _assert_reply_formatter<T: ReplyFormatter>() {}
        fn _assert_channel_adapter<T: ChannelAdapter>() {}
    }
}
