// SPDX-FileCopyrightText: 2026 Bdaybot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The conversation state machine.
//!
//! One call to [`ConversationEngine::receive_message_and_reply`] is one turn:
//! the user record is read once, the turn is dispatched on its persisted
//! state, at most one state transition is written, and the reply is returned.

use std::collections::HashSet;
use std::sync::Arc;

use bdaybot_config::model::{BdaybotConfig, ReplyTemplates};
use bdaybot_core::{BotError, ConversationState, ReplyFormatter, ReplyPayload, UserId, UserStore};
use bdaybot_dates::Clock;
use chrono::NaiveDate;
use tracing::{debug, warn};

/// Classification of a yes/no answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    Unrecognized,
}

/// Affirmative and negative phrase sets.
#[derive(Debug, Clone)]
pub struct AnswerMatcher {
    yes: HashSet<String>,
    no: HashSet<String>,
}

impl AnswerMatcher {
    pub fn new(yes: &[String], no: &[String]) -> Self {
        let normalize = |list: &[String]| list.iter().map(|p| p.trim().to_lowercase()).collect();
        Self {
            yes: normalize(yes),
            no: normalize(no),
        }
    }

    /// Trims and lower-cases `text`, then checks set membership.
    pub fn classify(&self, text: &str) -> Answer {
        let text = text.trim().to_lowercase();
        if self.yes.contains(&text) {
            Answer::Yes
        } else if self.no.contains(&text) {
            Answer::No
        } else {
            Answer::Unrecognized
        }
    }
}

/// Drives one user's conversation one message at a time.
///
/// The engine does not serialize turns itself. Hosts either feed each user
/// from a single queue, as [`BotLoop`](crate::BotLoop) does, or hold a
/// [`UserLocks`](crate::UserLocks) guard for the user around each call.
pub struct ConversationEngine {
    store: Arc<dyn UserStore>,
    formatter: Arc<dyn ReplyFormatter>,
    clock: Arc<dyn Clock>,
    answers: AnswerMatcher,
    quick_reply_labels: Vec<String>,
    replies: ReplyTemplates,
}

impl ConversationEngine {
    pub fn new(
        store: Arc<dyn UserStore>,
        formatter: Arc<dyn ReplyFormatter>,
        clock: Arc<dyn Clock>,
        config: &BdaybotConfig,
    ) -> Self {
        Self {
            store,
            formatter,
            clock,
            answers: AnswerMatcher::new(
                &config.conversation.yes_responses,
                &config.conversation.no_responses,
            ),
            quick_reply_labels: config.conversation.quick_reply_labels.clone(),
            replies: config.replies.clone(),
        }
    }

    /// The store this engine reads and mutates.
    pub fn store(&self) -> &Arc<dyn UserStore> {
        &self.store
    }

    /// Handles one inbound text and returns the reply for it.
    pub async fn receive_message_and_reply(
        &self,
        user_id: &UserId,
        text: &str,
    ) -> Result<ReplyPayload, BotError> {
        let user = self.store.get_user_by_id(user_id).await?;
        let state = user.as_ref().map(|u| u.state).unwrap_or_default();
        debug!(user_id = %user_id, %state, "handling turn");

        match state {
            ConversationState::Initial => self.receive_greetings(user_id).await,
            ConversationState::Greeted => self.receive_name(user_id, text).await,
            ConversationState::NameKnown => self.receive_birth_date(user_id, text).await,
            ConversationState::BirthDateKnown => {
                let birth_date = user.and_then(|u| u.birth_date).ok_or_else(|| {
                    BotError::Internal(format!(
                        "user {user_id} is in state {state} without a birth date"
                    ))
                })?;
                self.receive_answer(user_id, text, birth_date).await
            }
        }
    }

    async fn receive_greetings(&self, user_id: &UserId) -> Result<ReplyPayload, BotError> {
        self.store.set_greetings_received_state(user_id).await?;
        self.formatter
            .get_reply_text_object(&self.replies.ask_name)
            .await
    }

    async fn receive_name(&self, user_id: &UserId, text: &str) -> Result<ReplyPayload, BotError> {
        let name = text.trim();
        self.store
            .set_user_name_and_upgrade_state(user_id, name)
            .await?;
        self.formatter
            .get_reply_text_object(&format!("{name}, {}", self.replies.ask_birth_date))
            .await
    }

    async fn receive_birth_date(
        &self,
        user_id: &UserId,
        text: &str,
    ) -> Result<ReplyPayload, BotError> {
        if !bdaybot_dates::is_date_valid(text) {
            debug!(user_id = %user_id, "unrecognized birth date");
            return self.unrecognized_date().await;
        }

        if let Err(e) = self
            .store
            .set_birth_date_and_upgrade_state(user_id, text.trim())
            .await
        {
            warn!(user_id = %user_id, error = %e, "failed to store birth date");
            return self.unrecognized_date().await;
        }

        self.formatter
            .get_quick_reply_object(&self.replies.ask_remaining_days, &self.quick_reply_labels)
            .await
    }

    async fn receive_answer(
        &self,
        user_id: &UserId,
        text: &str,
        birth_date: NaiveDate,
    ) -> Result<ReplyPayload, BotError> {
        let reply = match self.answers.classify(text) {
            Answer::Yes => {
                self.store.reset_user_state(user_id).await?;
                let days = bdaybot_dates::remaining_days(birth_date, self.clock.today());
                format!("There are {days} {}", self.replies.say_remaining_days)
            }
            Answer::No => {
                self.store.reset_user_state(user_id).await?;
                self.replies.say_goodbye.clone()
            }
            Answer::Unrecognized => self.replies.say_dont_understand.clone(),
        };
        self.formatter.get_reply_text_object(&reply).await
    }

    async fn unrecognized_date(&self) -> Result<ReplyPayload, BotError> {
        self.formatter
            .get_reply_text_object(&self.replies.say_unrecognized_date_format)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bdaybot_dates::FixedClock;
    use bdaybot_line::LineFormatter;
    use bdaybot_test_utils::InMemoryUserStore;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn engine_with(store: Arc<InMemoryUserStore>) -> ConversationEngine {
        ConversationEngine::new(
            store,
            Arc::new(LineFormatter::new()),
            Arc::new(FixedClock(today())),
            &BdaybotConfig::default(),
        )
    }

    async fn state_of(store: &InMemoryUserStore, id: &UserId) -> ConversationState {
        store
            .get_user_by_id(id)
            .await
            .unwrap()
            .map(|u| u.state)
            .unwrap_or_default()
    }

    #[test]
    fn matcher_trims_and_ignores_case() {
        let m = AnswerMatcher::new(&["yes".into()], &["no thanks".into()]);
        assert_eq!(m.classify("YES"), Answer::Yes);
        assert_eq!(m.classify(" Yes "), Answer::Yes);
        assert_eq!(m.classify("No Thanks"), Answer::No);
        assert_eq!(m.classify("yes please"), Answer::Unrecognized);
    }

    #[tokio::test]
    async fn first_message_greets_regardless_of_text() {
        let store = Arc::new(InMemoryUserStore::new());
        let engine = engine_with(store.clone());
        let id = UserId::from("U1");

        let reply = engine.receive_message_and_reply(&id, "1990-05-20").await.unwrap();
        assert_eq!(reply.text(), ReplyTemplates::default().ask_name);
        assert_eq!(state_of(&store, &id).await, ConversationState::Greeted);
    }

    #[tokio::test]
    async fn name_is_echoed_before_birth_date_prompt() {
        let store = Arc::new(InMemoryUserStore::new());
        let engine = engine_with(store.clone());
        let id = UserId::from("U1");

        engine.receive_message_and_reply(&id, "hi").await.unwrap();
        let reply = engine.receive_message_and_reply(&id, "Alex").await.unwrap();
        assert_eq!(
            reply.text(),
            format!("Alex, {}", ReplyTemplates::default().ask_birth_date)
        );
        let user = store.get_user_by_id(&id).await.unwrap().unwrap();
        assert_eq!(user.state, ConversationState::NameKnown);
        assert_eq!(user.name.as_deref(), Some("Alex"));
    }

    #[tokio::test]
    async fn invalid_date_keeps_asking() {
        let store = Arc::new(InMemoryUserStore::new());
        let engine = engine_with(store.clone());
        let id = UserId::from("U1");
        engine.receive_message_and_reply(&id, "hi").await.unwrap();
        engine.receive_message_and_reply(&id, "Alex").await.unwrap();

        for bad in ["banana", "2023-04-31", "2023-13-01"] {
            let reply = engine.receive_message_and_reply(&id, bad).await.unwrap();
            assert_eq!(
                reply.text(),
                ReplyTemplates::default().say_unrecognized_date_format
            );
            assert_eq!(state_of(&store, &id).await, ConversationState::NameKnown);
        }
    }

    #[tokio::test]
    async fn store_rejection_is_folded_into_unrecognized_format() {
        let store = Arc::new(InMemoryUserStore::new());
        let engine = engine_with(store.clone());
        let id = UserId::from("U1");
        engine.receive_message_and_reply(&id, "hi").await.unwrap();
        engine.receive_message_and_reply(&id, "Alex").await.unwrap();

        store.fail_next_birth_date_write();
        let reply = engine
            .receive_message_and_reply(&id, "1990-05-20")
            .await
            .unwrap();
        assert_eq!(
            reply.text(),
            ReplyTemplates::default().say_unrecognized_date_format
        );
        assert_eq!(state_of(&store, &id).await, ConversationState::NameKnown);

        let reply = engine
            .receive_message_and_reply(&id, "1990-05-20")
            .await
            .unwrap();
        assert_eq!(reply.labels(), ["Yes".to_string(), "No".to_string()]);
        assert_eq!(state_of(&store, &id).await, ConversationState::BirthDateKnown);
    }

    #[tokio::test]
    async fn yes_answer_reports_days_and_resets() {
        let store = Arc::new(InMemoryUserStore::new());
        let engine = engine_with(store.clone());
        let id = UserId::from("U1");
        for text in ["hi", "Alex", "1990-05-20"] {
            engine.receive_message_and_reply(&id, text).await.unwrap();
        }

        let reply = engine.receive_message_and_reply(&id, "Yes").await.unwrap();
        assert_eq!(
            reply.text(),
            "There are 214 days left until your next birthday!"
        );
        let user = store.get_user_by_id(&id).await.unwrap().unwrap();
        assert_eq!(user.state, ConversationState::Initial);
        assert_eq!(user.name.as_deref(), Some("Alex"));
        assert!(user.birth_date.is_some());
    }

    #[tokio::test]
    async fn birthday_today_is_zero_days() {
        let store = Arc::new(InMemoryUserStore::new());
        let engine = engine_with(store.clone());
        let id = UserId::from("U1");
        for text in ["hi", "Sam", "2000-10-18"] {
            engine.receive_message_and_reply(&id, text).await.unwrap();
        }
        let reply = engine.receive_message_and_reply(&id, "y").await.unwrap();
        assert!(reply.text().starts_with("There are 0 "));
    }

    #[tokio::test]
    async fn no_answer_says_goodbye_and_unknown_answer_is_retriable() {
        let store = Arc::new(InMemoryUserStore::new());
        let engine = engine_with(store.clone());
        let id = UserId::from("U1");
        for text in ["hi", "Alex", "1990-05-20"] {
            engine.receive_message_and_reply(&id, text).await.unwrap();
        }

        let reply = engine.receive_message_and_reply(&id, "maybe").await.unwrap();
        assert_eq!(reply.text(), ReplyTemplates::default().say_dont_understand);
        assert_eq!(state_of(&store, &id).await, ConversationState::BirthDateKnown);

        let reply = engine.receive_message_and_reply(&id, "NOPE").await.unwrap();
        assert_eq!(reply.text(), ReplyTemplates::default().say_goodbye);
        assert_eq!(state_of(&store, &id).await, ConversationState::Initial);
    }

    #[tokio::test]
    async fn missing_birth_date_is_internal_error() {
        let store = Arc::new(InMemoryUserStore::new());
        let id = UserId::from("U1");
        store.insert_raw(bdaybot_core::User {
            state: ConversationState::BirthDateKnown,
            ..bdaybot_core::User::new(id.clone())
        });
        let engine = engine_with(store);

        let err = engine.receive_message_and_reply(&id, "yes").await.unwrap_err();
        assert!(matches!(err, BotError::Internal(_)));
    }

    #[tokio::test]
    async fn other_store_failures_propagate() {
        let store = Arc::new(InMemoryUserStore::new());
        let engine = engine_with(store.clone());
        let id = UserId::from("U1");

        store.fail_reads(true);
        assert!(matches!(
            engine.receive_message_and_reply(&id, "hi").await,
            Err(BotError::Storage { .. })
        ));
    }
}
