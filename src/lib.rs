//! # Hungrybot
//!
//! A Telegram bot that greets people and recommends restaurants through the
//! Yelp Fusion search API, served next to a tiny HTTP site.

pub mod bot;
pub mod config;
pub mod dialogue;
pub mod localization;
pub mod search;
pub mod server;
