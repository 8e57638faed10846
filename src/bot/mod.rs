//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `context`: Classifies incoming messages by how they address the bot
//! - `triggers`: Keyword matching for the greeting and the food dialogue
//! - `message_handler`: Routes messages to the greeting or the dialogue
//! - `transport`: Sends replies and looks up users
//! - `ui_builder`: Composes replies and formats them for Telegram

pub mod context;
pub mod message_handler;
pub mod transport;
pub mod triggers;
pub mod ui_builder;

// Re-export main handler types for use in main.rs
pub use context::{BotIdentity, IncomingMessage, MessageContext};
pub use message_handler::{message_handler, FoodBot};
pub use transport::{Attachment, ChatTransport, Reply, TelegramTransport, UserInfo};
