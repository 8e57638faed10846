//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::ChatId;
use tracing::{debug, error, info, warn};

use crate::dialogue::{ConversationKey, DialogueStore, FoodDialogueState, Transition};
use crate::localization::t;
use crate::search::{recommendable, RestaurantSearch, SearchQuery};

use super::context::{BotIdentity, IncomingMessage};
use super::transport::{ChatTransport, Reply};
use super::triggers::{match_trigger, Trigger};
use super::ui_builder::{fallback_greeting, greeting_reply, recommendation_reply};

/// The greeting responder and the food dialogue, bound to a transport and a search backend
pub struct FoodBot {
    transport: Arc<dyn ChatTransport>,
    search: Arc<dyn RestaurantSearch>,
    dialogues: DialogueStore,
}

impl FoodBot {
    pub fn new(transport: Arc<dyn ChatTransport>, search: Arc<dyn RestaurantSearch>) -> Self {
        Self {
            transport,
            search,
            dialogues: DialogueStore::new(),
        }
    }

    pub fn dialogues(&self) -> &DialogueStore {
        &self.dialogues
    }

    /// Route one inbound message. An open dialogue claims the sender's
    /// messages before any keyword handler sees them.
    pub async fn handle_message(&self, msg: &IncomingMessage) -> Result<()> {
        let key = ConversationKey::new(msg.chat_id, msg.sender);

        if let Some(state) = self.dialogues.get(&key).await {
            return self.continue_dialogue(key, state, &msg.text).await;
        }

        if !msg.context.is_addressed() {
            return Ok(());
        }

        match match_trigger(&msg.text) {
            Some(Trigger::Greeting) => self.greet(msg).await,
            Some(Trigger::Hungry) => {
                info!(user_id = %msg.sender, chat_id = %msg.chat_id, "Starting food dialogue");
                self.continue_dialogue(key, FoodDialogueState::Start, &msg.text).await
            }
            None => Ok(()),
        }
    }

    async fn greet(&self, msg: &IncomingMessage) -> Result<()> {
        let reply = match self.transport.lookup_user(msg.chat_id, msg.sender).await {
            Ok(user) => greeting_reply(&user.name),
            Err(e) => {
                warn!(user_id = %msg.sender, error = %e, "User lookup failed, sending fallback greeting");
                fallback_greeting()
            }
        };
        self.transport.send_reply(msg.chat_id, reply).await
    }

    async fn continue_dialogue(&self, key: ConversationKey, state: FoodDialogueState, answer: &str) -> Result<()> {
        debug!(user_id = %key.user_id, state = ?state, "Advancing food dialogue");
        let Transition { replies, next } = state.advance(answer);

        // The store moves to the next state before any prompt goes out, so a
        // failed send never leaves the user answering a stale question.
        match next {
            FoodDialogueState::Search { query } => {
                self.dialogues
                    .update(key, FoodDialogueState::Search { query: query.clone() })
                    .await;
                let outcome = match self.send_all(key.chat_id, replies).await {
                    Ok(()) => self.run_search(key, &query).await,
                    Err(e) => Err(e),
                };
                // The dialogue ends only after every result has been delivered.
                self.dialogues.exit(&key).await;
                info!(user_id = %key.user_id, "Food dialogue finished");
                outcome
            }
            FoodDialogueState::Done => {
                self.dialogues.exit(&key).await;
                info!(user_id = %key.user_id, "Food dialogue cancelled");
                self.send_all(key.chat_id, replies).await
            }
            next => {
                self.dialogues.update(key, next).await;
                self.send_all(key.chat_id, replies).await
            }
        }
    }

    async fn send_all(&self, chat_id: ChatId, replies: Vec<Reply>) -> Result<()> {
        for reply in replies {
            self.transport.send_reply(chat_id, reply).await?;
        }
        Ok(())
    }

    async fn run_search(&self, key: ConversationKey, query: &SearchQuery) -> Result<()> {
        match self.search.search(query).await {
            Ok(businesses) => {
                let mut sent = 0;
                for business in recommendable(&businesses) {
                    self.transport
                        .send_reply(key.chat_id, recommendation_reply(business))
                        .await?;
                    sent += 1;
                }
                info!(
                    user_id = %key.user_id,
                    found = businesses.len(),
                    recommended = sent,
                    "Search results delivered"
                );
                Ok(())
            }
            Err(e) => {
                error!(user_id = %key.user_id, error = %e, "Restaurant search failed");
                self.transport
                    .send_reply(key.chat_id, Reply::text(t("food-search-failed")))
                    .await
            }
        }
    }
}

/// Dispatcher endpoint for Telegram messages
pub async fn message_handler(msg: Message, food_bot: Arc<FoodBot>, identity: BotIdentity) -> Result<()> {
    let Some(incoming) = identity.classify(&msg) else {
        return Ok(());
    };

    debug!(
        user_id = %incoming.sender,
        chat_id = %incoming.chat_id,
        context = ?incoming.context,
        "Received text message"
    );

    food_bot.handle_message(&incoming).await
}
