//! Default rule set seeded for every tenant

use once_cell::sync::Lazy;

use crate::rules::model::Rule;

pub const DEFAULT_MODULE_NAME: &str = "mod-password-validator";

static DEFAULT_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        Rule::pattern("password_length", "^.{8,}$", 0, "password.length.invalid")
            .with_id("5105b55a-b9a3-4f76-9402-a5243ea63c95")
            .with_description("The password length must be minimum 8 digits"),
        Rule::pattern(
            "alphabetical_letters",
            "(?=.*[a-z])(?=.*[A-Z]).+",
            1,
            "password.alphabetical.invalid",
        )
        .with_id("dc653de8-f0df-48ab-9630-13aacfe8e8f4")
        .with_description("The password must contain both upper and lower case letters"),
        Rule::pattern("numeric_symbol", r"(?=.*\d).+", 2, "password.number.invalid")
            .with_id("3e3c53ae-73c2-4eba-9f09-f2c9a892c7a2")
            .with_description("The password must contain at least one numeric character"),
        Rule::pattern(
            "special_character",
            r##"(?=.*[!"#$%&'()*+,-./:;<=>?@\[\]^_`{|}~]).+"##,
            3,
            "password.specialCharacter.invalid",
        )
        .with_id("2e82f890-49e8-46fc-923d-644f33dc5c3f")
        .with_description("The password must contain at least one special character"),
        Rule::pattern(
            "no_user_name",
            "^(?:(?!<USER_NAME>).)+$",
            4,
            "password.usernameDuplicate.invalid",
        )
        .with_id("2f390fa6-a2f8-4027-abaf-ee61952668bc")
        .with_description("The password must not contain your username"),
        Rule::pattern(
            "no_consecutive_whitespaces",
            r"^(?:(?!\s{2,}).)+$",
            9,
            "password.consecutiveWhitespaces.invalid",
        )
        .with_id("093f090f-543e-4a04-8b0f-9bde947a390d")
        .with_description("The password must not contain multiple consecutive whitespaces"),
    ]
    .into_iter()
    .map(|rule| rule.with_module_name(DEFAULT_MODULE_NAME))
    .collect()
});

/// The rules a new tenant starts with
pub fn default_rules() -> Vec<Rule> {
    DEFAULT_RULES.clone()
}
