//! Inbound side of the chat connection: turning Telegram messages into
//! [`IncomingMessage`]s with the context they were addressed in.

use teloxide::types::{ChatId, Message, UserId};

/// How a message reached the bot
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageContext {
    /// Private chat with the bot
    DirectMessage,
    /// Group message that starts with the bot's @username, or replies to the bot
    DirectMention,
    /// Group message mentioning the bot somewhere else
    Mention,
    /// Group message not addressed to the bot
    Ambient,
}

impl MessageContext {
    /// Whether keyword handlers may fire in this context
    pub fn is_addressed(self) -> bool {
        !matches!(self, MessageContext::Ambient)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IncomingMessage {
    pub chat_id: ChatId,
    pub sender: UserId,
    /// Message text with the bot's mention removed
    pub text: String,
    pub context: MessageContext,
}

/// Name the bot is addressed by in group chats
#[derive(Clone, Debug)]
pub struct BotIdentity {
    pub username: String,
}

impl BotIdentity {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }

    /// Build an [`IncomingMessage`] from a Telegram message. Returns `None` for
    /// messages without text or without a sender.
    pub fn classify(&self, msg: &Message) -> Option<IncomingMessage> {
        let text = msg.text()?;
        let sender = msg.from.as_ref()?;

        let replying_to_bot = msg
            .reply_to_message()
            .and_then(|replied| replied.from.as_ref())
            .and_then(|user| user.username.as_deref())
            .is_some_and(|name| name.eq_ignore_ascii_case(&self.username));

        let (context, text) = self.classify_text(text, msg.chat.is_private(), replying_to_bot);

        Some(IncomingMessage {
            chat_id: msg.chat.id,
            sender: sender.id,
            text,
            context,
        })
    }

    /// Classify raw text and strip every `@username` mention of the bot from it
    pub fn classify_text(&self, text: &str, is_private: bool, replying_to_bot: bool) -> (MessageContext, String) {
        let mention = format!("@{}", self.username.to_ascii_lowercase());
        let lowered = text.to_ascii_lowercase();
        let spans = mention_spans(&lowered, &mention);
        let leading = lowered.len() - lowered.trim_start().len();

        let context = if is_private {
            MessageContext::DirectMessage
        } else if spans.first().is_some_and(|&start| start == leading) || replying_to_bot {
            MessageContext::DirectMention
        } else if !spans.is_empty() {
            MessageContext::Mention
        } else {
            MessageContext::Ambient
        };

        (context, strip_mentions(text, &spans, mention.len()))
    }
}

/// Telegram usernames are made of ASCII letters, digits and underscores
fn is_username_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Byte offsets of standalone `mention` tokens in `lowered`. A match glued to
/// a longer username (`@foodbotfan`) or to an email local part
/// (`hi@foodbot.com`) does not count.
fn mention_spans(lowered: &str, mention: &str) -> Vec<usize> {
    lowered
        .match_indices(mention)
        .map(|(start, _)| start)
        .filter(|&start| {
            let before_ok = lowered[..start]
                .chars()
                .next_back()
                .map_or(true, |c| !is_username_char(c) && c != '.' && c != '@');
            let after_ok = lowered[start + mention.len()..]
                .chars()
                .next()
                .map_or(true, |c| !is_username_char(c) && c != '@');
            before_ok && after_ok
        })
        .collect()
}

/// Remove the mentions at `spans` from `text`. ASCII lowering keeps byte
/// offsets aligned between `text` and the string the spans were found in.
fn strip_mentions(text: &str, spans: &[usize], len: usize) -> String {
    if spans.is_empty() {
        return text.trim().to_string();
    }

    let mut result = String::with_capacity(text.len());
    let mut cursor = 0;
    for &start in spans {
        result.push_str(&text[cursor..start]);
        cursor = start + len;
    }
    result.push_str(&text[cursor..]);

    // "@bot: pizza" and "@bot, pizza" leave punctuation behind.
    result
        .trim()
        .trim_start_matches([':', ','])
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> BotIdentity {
        BotIdentity::new("FoodBot")
    }

    #[test]
    fn test_private_chat_is_direct_message() {
        let (context, text) = identity().classify_text("I'm hungry", true, false);
        assert_eq!(context, MessageContext::DirectMessage);
        assert_eq!(text, "I'm hungry");
    }

    #[test]
    fn test_leading_mention_is_direct_mention() {
        let (context, text) = identity().classify_text("@foodbot: I'm hungry", false, false);
        assert_eq!(context, MessageContext::DirectMention);
        assert_eq!(text, "I'm hungry");
    }

    #[test]
    fn test_reply_to_bot_is_direct_mention() {
        let (context, text) = identity().classify_text("pizza", false, true);
        assert_eq!(context, MessageContext::DirectMention);
        assert_eq!(text, "pizza");
    }

    #[test]
    fn test_inner_mention_is_mention() {
        let (context, text) = identity().classify_text("hey @FoodBot hi", false, false);
        assert_eq!(context, MessageContext::Mention);
        assert_eq!(text, "hey  hi");
    }

    #[test]
    fn test_unaddressed_group_message_is_ambient() {
        let (context, _) = identity().classify_text("hi everyone", false, false);
        assert_eq!(context, MessageContext::Ambient);
        assert!(!context.is_addressed());
    }

    #[test]
    fn test_longer_username_is_not_a_mention() {
        let (context, text) = identity().classify_text("@FoodBotFan hi", false, false);
        assert_eq!(context, MessageContext::Ambient);
        assert_eq!(text, "@FoodBotFan hi");

        let (context, _) = identity().classify_text("hi @foodbot_2", false, false);
        assert_eq!(context, MessageContext::Ambient);
    }

    #[test]
    fn test_email_address_is_not_a_mention() {
        let (context, text) = identity().classify_text("mail me at hi@foodbot.com", false, false);
        assert_eq!(context, MessageContext::Ambient);
        assert_eq!(text, "mail me at hi@foodbot.com");
    }

    #[test]
    fn test_mention_followed_by_punctuation() {
        let (context, text) = identity().classify_text("hello @foodbot!", false, false);
        assert_eq!(context, MessageContext::Mention);
        assert_eq!(text, "hello !");

        let (context, text) = identity().classify_text("  @FoodBot, Im hungry", false, false);
        assert_eq!(context, MessageContext::DirectMention);
        assert_eq!(text, "Im hungry");
    }

    #[test]
    fn test_real_mention_next_to_lookalike() {
        let (context, text) = identity().classify_text("@foodbotfan @foodbot hi", false, false);
        assert_eq!(context, MessageContext::Mention);
        assert_eq!(text, "@foodbotfan  hi");
    }
}
