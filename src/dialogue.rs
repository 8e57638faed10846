//! Food recommendation dialogue: conversation state and its transition table.
//!
//! Each conversation owns its own [`FoodDialogueState`]; the collected search
//! term and location travel inside the state, never in shared globals.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use teloxide::types::{ChatId, UserId};
use tokio::sync::Mutex;

use crate::bot::transport::Reply;
use crate::localization::t;
use crate::search::SearchQuery;

/// The only Confirm answer that cancels the dialogue. Exact match.
pub const DECLINE_ANSWER: &str = "no";

/// Represents the conversation state of the food recommendation dialogue
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FoodDialogueState {
    #[default]
    Start,
    Confirm,
    AskFood,
    AskLocation {
        term: String,
    },
    Search {
        query: SearchQuery,
    },
    Done,
}

/// Result of feeding one answer to a state: the replies to send, then the next state
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub replies: Vec<Reply>,
    pub next: FoodDialogueState,
}

impl Transition {
    fn to(next: FoodDialogueState, reply: Option<Reply>) -> Self {
        Self {
            replies: reply.into_iter().collect(),
            next,
        }
    }
}

impl FoodDialogueState {
    /// Advance the dialogue with the user's answer.
    ///
    /// `Search` is left to the caller: it runs the query, and the dialogue is
    /// over once the results (or the apology) have been sent.
    pub fn advance(self, answer: &str) -> Transition {
        match self {
            Self::Start => Transition::to(Self::Confirm, Some(Reply::text(t("food-confirm")))),
            Self::Confirm if answer == DECLINE_ANSWER => {
                Transition::to(Self::Done, Some(Reply::text(t("food-nevermind"))))
            }
            Self::Confirm => Transition::to(Self::AskFood, Some(Reply::text(t("food-ask-term")))),
            Self::AskFood => Transition::to(
                Self::AskLocation {
                    term: answer.to_string(),
                },
                Some(Reply::text(t("food-ask-location"))),
            ),
            Self::AskLocation { term } => Transition::to(
                Self::Search {
                    query: SearchQuery {
                        term,
                        location: answer.to_string(),
                    },
                },
                Some(Reply::text(t("food-searching"))),
            ),
            // Answers arriving while the search is in flight are dropped.
            state @ (Self::Search { .. } | Self::Done) => Transition::to(state, None),
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// Identifies one conversation: a user inside a chat
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConversationKey {
    pub chat_id: ChatId,
    pub user_id: UserId,
}

impl ConversationKey {
    pub fn new(chat_id: ChatId, user_id: UserId) -> Self {
        Self { chat_id, user_id }
    }
}

/// Per-conversation session map.
///
/// teloxide's `Dialogue<_, InMemStorage<_>>` keys state by `ChatId` alone,
/// which would give every member of a group chat the same dialogue. Sessions
/// here are keyed by [`ConversationKey`] (chat and user) instead.
#[derive(Clone, Debug, Default)]
pub struct DialogueStore {
    sessions: Arc<Mutex<HashMap<ConversationKey, FoodDialogueState>>>,
}

impl DialogueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &ConversationKey) -> Option<FoodDialogueState> {
        self.sessions.lock().await.get(key).cloned()
    }

    pub async fn update(&self, key: ConversationKey, state: FoodDialogueState) {
        self.sessions.lock().await.insert(key, state);
    }

    pub async fn exit(&self, key: &ConversationKey) {
        self.sessions.lock().await.remove(key);
    }

    pub async fn active_count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(transition: &Transition) -> Vec<&str> {
        transition.replies.iter().map(|r| r.text.as_str()).collect()
    }

    #[test]
    fn test_happy_path_collects_term_and_location() {
        let step = FoodDialogueState::Start.advance("I'm hungry");
        assert_eq!(texts(&step), vec!["Would you like food recommendations near you?"]);

        let step = step.next.advance("yes");
        assert_eq!(step.next, FoodDialogueState::AskFood);

        let step = step.next.advance("pizza");
        assert_eq!(texts(&step), vec!["Where are you?"]);

        let step = step.next.advance("downtown");
        assert_eq!(texts(&step), vec!["Finding restaurants rated > 3.5"]);
        assert_eq!(
            step.next,
            FoodDialogueState::Search {
                query: SearchQuery {
                    term: "pizza".to_string(),
                    location: "downtown".to_string(),
                }
            }
        );
    }

    #[test]
    fn test_decline_is_exact_match() {
        let step = FoodDialogueState::Confirm.advance("no");
        assert!(step.next.is_finished());

        for answer in ["No", "no ", "nope"] {
            let step = FoodDialogueState::Confirm.advance(answer);
            assert_eq!(step.next, FoodDialogueState::AskFood, "answer {answer:?}");
        }
    }

    #[test]
    fn test_empty_answers_are_not_validated() {
        let step = FoodDialogueState::AskFood.advance("");
        assert_eq!(step.next, FoodDialogueState::AskLocation { term: String::new() });
    }
}
