// Built-in rules

use crate::{Rule, ValidationError};
use once_cell::sync::Lazy;
use regex::Regex;

/// Pattern accepted by `LettersOnlyRule`
pub const LETTERS_ONLY_PATTERN: &str = "^[a-zA-Z]*$";

static LETTERS_ONLY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(LETTERS_ONLY_PATTERN).expect("letters-only pattern compiles"));

/// Accepts strings made only of ASCII letters; the empty string passes
#[derive(Debug, Clone, Copy, Default)]
pub struct LettersOnlyRule;

impl LettersOnlyRule {
    pub fn is_match(value: &str) -> bool {
        LETTERS_ONLY_REGEX.is_match(value)
    }
}

impl Rule<str> for LettersOnlyRule {
    fn name(&self) -> &'static str {
        "lettersOnly"
    }

    fn evaluate(&self, field: &str, value: Option<&str>) -> Result<(), ValidationError> {
        let Some(value) = value else {
            return Err(ValidationError::missing(
                field,
                format!(
                    "The field {} is required and must match the regular expression '{}'.",
                    field, LETTERS_ONLY_PATTERN
                ),
            )
            .with_constraint(Rule::<str>::name(self)));
        };

        if Self::is_match(value) {
            return Ok(());
        }

        Err(ValidationError::new(
            field,
            format!(
                "The field {} with value \"{}\" must match the regular expression '{}'.",
                field, value, LETTERS_ONLY_PATTERN
            ),
        )
        .with_constraint(Rule::<str>::name(self))
        .with_value(value))
    }
}

impl Rule<String> for LettersOnlyRule {
    fn name(&self) -> &'static str {
        Rule::<str>::name(self)
    }

    fn evaluate(&self, field: &str, value: Option<&String>) -> Result<(), ValidationError> {
        Rule::<str>::evaluate(self, field, value.map(String::as_str))
    }
}

/// Accepts integers at or above a threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinimumAgeRule {
    minimum: i32,
}

impl MinimumAgeRule {
    /// Default threshold
    pub const LEGAL_AGE: i32 = 18;

    pub fn new(minimum: i32) -> Self {
        Self { minimum }
    }

    pub fn minimum(&self) -> i32 {
        self.minimum
    }
}

impl Default for MinimumAgeRule {
    fn default() -> Self {
        Self::new(Self::LEGAL_AGE)
    }
}

impl Rule<i32> for MinimumAgeRule {
    fn name(&self) -> &'static str {
        "minimumAge"
    }

    fn evaluate(&self, field: &str, value: Option<&i32>) -> Result<(), ValidationError> {
        let Some(&value) = value else {
            return Err(ValidationError::missing(
                field,
                format!(
                    "The field {} is required and must be at least {}.",
                    field, self.minimum
                ),
            )
            .with_constraint(self.name()));
        };

        if value >= self.minimum {
            return Ok(());
        }

        Err(ValidationError::new(
            field,
            format!(
                "The field {} with value {} must be at least {}.",
                field, value, self.minimum
            ),
        )
        .with_constraint(self.name())
        .with_value(value.to_string()))
    }
}
