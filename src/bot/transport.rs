//! Outbound side of the chat connection: replies and user lookups

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use teloxide::prelude::*;
use teloxide::types::{ChatId, InputFile, ParseMode, User, UserId};

use super::ui_builder::attachment_caption;

/// Rich block shown under a reply
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    pub title: String,
    pub title_link: String,
    pub text: String,
    pub image_url: String,
}

/// One outbound message
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub attachment: Option<Attachment>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attachment: None,
        }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserInfo {
    pub id: UserId,
    pub name: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        let name = user
            .username
            .clone()
            .unwrap_or_else(|| user.full_name());
        Self { id: user.id, name }
    }
}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_reply(&self, chat_id: ChatId, reply: Reply) -> Result<()>;

    async fn lookup_user(&self, chat_id: ChatId, user_id: UserId) -> Result<UserInfo>;
}

/// [`ChatTransport`] backed by the Telegram Bot API
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn send_reply(&self, chat_id: ChatId, reply: Reply) -> Result<()> {
        match &reply.attachment {
            None => {
                self.bot.send_message(chat_id, reply.text).await?;
            }
            Some(attachment) => {
                let image = Url::parse(&attachment.image_url)
                    .with_context(|| format!("invalid attachment image URL {}", attachment.image_url))?;
                self.bot
                    .send_animation(chat_id, InputFile::url(image))
                    .caption(attachment_caption(&reply.text, attachment))
                    .parse_mode(ParseMode::Html)
                    .await?;
            }
        }
        Ok(())
    }

    async fn lookup_user(&self, chat_id: ChatId, user_id: UserId) -> Result<UserInfo> {
        let member = self.bot.get_chat_member(chat_id, user_id).await?;
        Ok(UserInfo::from(&member.user))
    }
}
