//! Message catalog for the bot's replies.
//!
//! Replies are kept in `locales/en/main.ftl` and embedded at compile time, so
//! the binary does not depend on the working directory it is started from.

use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use std::sync::LazyLock;
use tracing::warn;
use unic_langid::langid;

const EN_MAIN: &str = include_str!("../locales/en/main.ftl");

/// Localization manager for the bot
pub struct LocalizationManager {
    bundle: FluentBundle<FluentResource>,
}

impl LocalizationManager {
    /// Create a manager holding the English catalog
    pub fn new() -> Self {
        let mut bundle = FluentBundle::new_concurrent(vec![langid!("en")]);
        // Replies must be byte-exact; no FSI/PDI marks around placeables.
        bundle.set_use_isolating(false);

        let resource = match FluentResource::try_new(EN_MAIN.to_string()) {
            Ok(resource) => resource,
            Err((resource, errors)) => {
                warn!(errors = ?errors, "Message catalog parsed with errors");
                resource
            }
        };
        if let Err(errors) = bundle.add_resource(resource) {
            warn!(errors = ?errors, "Message catalog contains duplicate keys");
        }

        Self { bundle }
    }

    /// Get a localized message
    pub fn get_message(&self, key: &str, args: Option<&FluentArgs>) -> String {
        let msg = match self.bundle.get_message(key) {
            Some(msg) => msg,
            None => return format!("Missing translation: {}", key),
        };

        let pattern = match msg.value() {
            Some(pattern) => pattern,
            None => return format!("Missing value for key: {}", key),
        };

        let mut errors = vec![];
        let value = self.bundle.format_pattern(pattern, args, &mut errors);
        if !errors.is_empty() {
            warn!(key, errors = ?errors, "Message formatted with errors");
        }
        value.into_owned()
    }

    /// Get a localized message with simple string arguments
    pub fn get_message_with_args(&self, key: &str, args: &[(&str, &str)]) -> String {
        let fluent_args = FluentArgs::from_iter(
            args.iter()
                .map(|(k, v)| (*k, FluentValue::from(*v))),
        );
        self.get_message(key, Some(&fluent_args))
    }
}

impl Default for LocalizationManager {
    fn default() -> Self {
        Self::new()
    }
}

static LOCALIZATION_MANAGER: LazyLock<LocalizationManager> = LazyLock::new(LocalizationManager::new);

/// Get the global localization manager
pub fn get_localization_manager() -> &'static LocalizationManager {
    &LOCALIZATION_MANAGER
}

/// Convenience function to get a localized message
pub fn t(key: &str) -> String {
    get_localization_manager().get_message(key, None)
}

/// Convenience function to get a localized message with arguments
pub fn t_args(key: &str, args: &[(&str, &str)]) -> String {
    get_localization_manager().get_message_with_args(key, args)
}
