//! Keyword triggers for the greeting and the food dialogue

use lazy_static::lazy_static;
use regex::Regex;

pub const GREETING_KEYWORDS: &[&str] = &["hello", "hi", "howdy"];
pub const HUNGRY_KEYWORDS: &[&str] = &["I'm hungry", "i'm hungry", "Im hungry"];

/// Whole-word, case-sensitive match on any of the keywords
fn keyword_pattern(keywords: &[&str]) -> String {
    let alternatives: Vec<String> = keywords.iter().map(|k| regex::escape(k)).collect();
    format!(r"\b(?:{})\b", alternatives.join("|"))
}

lazy_static! {
    static ref GREETING_REGEX: Regex =
        Regex::new(&keyword_pattern(GREETING_KEYWORDS)).expect("Greeting pattern should be valid");
    static ref HUNGRY_REGEX: Regex =
        Regex::new(&keyword_pattern(HUNGRY_KEYWORDS)).expect("Hungry pattern should be valid");
}

/// Which handler a message triggers, if any
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    Greeting,
    Hungry,
}

/// Greetings take precedence over the dialogue trigger
pub fn match_trigger(text: &str) -> Option<Trigger> {
    if GREETING_REGEX.is_match(text) {
        Some(Trigger::Greeting)
    } else if HUNGRY_REGEX.is_match(text) {
        Some(Trigger::Hungry)
    } else {
        None
    }
}
