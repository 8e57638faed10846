//! UI Builder module for composing replies and formatting them for Telegram

use teloxide::utils::html::escape;

use super::transport::{Attachment, Reply};
use crate::localization::{t, t_args};
use crate::search::Business;

pub const GREETING_TITLE_LINK: &str = "http://corndog.io/";
pub const GREETING_IMAGE_URL: &str = "https://media.giphy.com/media/d1FL4zXfIQZMWFQQ/giphy.gif";

/// Greeting for a user whose name was resolved
pub fn greeting_reply(name: &str) -> Reply {
    Reply::text(t_args("greeting", &[("name", name)])).with_attachment(Attachment {
        title: t("greeting-attachment-title"),
        title_link: GREETING_TITLE_LINK.to_string(),
        text: t("greeting-attachment-text"),
        image_url: GREETING_IMAGE_URL.to_string(),
    })
}

/// Greeting used when the user lookup fails
pub fn fallback_greeting() -> Reply {
    Reply::text(t("greeting-fallback"))
}

pub fn recommendation_reply(business: &Business) -> Reply {
    Reply::text(business.format_recommendation())
}

/// HTML caption carrying the reply text and the attachment's title link and text
pub fn attachment_caption(text: &str, attachment: &Attachment) -> String {
    format!(
        "{}\n\n<a href=\"{}\">{}</a>\n{}",
        escape(text),
        escape(&attachment.title_link),
        escape(&attachment.title),
        escape(&attachment.text)
    )
}
