use hungrybot::localization::{t, t_args};

/// Every key the bot sends must exist in the catalog
#[test]
fn test_all_reply_keys_are_translated() {
    let keys = [
        "greeting-fallback",
        "greeting-attachment-title",
        "greeting-attachment-text",
        "food-confirm",
        "food-nevermind",
        "food-ask-term",
        "food-ask-location",
        "food-searching",
        "food-search-failed",
    ];

    for key in keys {
        let value = t(key);
        assert!(!value.starts_with("Missing"), "{key} is missing");
        assert!(!value.is_empty(), "{key} is empty");
    }
}

#[test]
fn test_prompts_match_expected_wording() {
    assert_eq!(t("food-confirm"), "Would you like food recommendations near you?");
    assert_eq!(t("food-ask-term"), "What type of food are you interested in?");
    assert_eq!(t("food-ask-location"), "Where are you?");
    assert_eq!(t("greeting-fallback"), "Hello there!");
}

#[test]
fn test_recommendation_block_layout() {
    let text = t_args(
        "food-recommendation",
        &[
            ("name", "Blue Plate"),
            ("address1", "3 Oak Ave"),
            ("address2", "Floor 2"),
            ("rating", "4.5"),
            ("price", "$$$"),
            ("phone", "(555) 222-3333"),
        ],
    );
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Blue Plate:",
            "Location: 3 Oak Ave, Floor 2",
            "Rating: 4.5",
            "Price: $$$",
            "Phone number: (555) 222-3333",
        ]
    );
}

