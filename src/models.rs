//! Data model of the sign-up form

use std::collections::BTreeSet;

use derive_more::Display;
use serde::{Deserialize, Deserializer, Serialize};

/// A field of the sign-up form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub enum Field {
    Username,
    Password,
    Email,
    Age,
}

/// A single validation rule that a candidate failed
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    #[display("Username must be at least 4 characters long")]
    UsernameTooShort,
    #[display("Username may only contain letters, digits and '-'")]
    UsernameInvalidCharacter,

    #[display("Password must be at least 8 characters long")]
    PasswordTooShort,
    #[display("Password must contain a letter")]
    PasswordMissingLetter,
    #[display("Password must contain a digit")]
    PasswordMissingDigit,
    #[display("Password must contain one of ! @ # $ % ^ & * - _ ( )")]
    PasswordMissingSymbol,
    #[display("Password cannot contain line breaks")]
    PasswordLineBreak,

    #[display("Email cannot contain '..'")]
    EmailDoubleDot,
    #[display("Email is not a valid address")]
    EmailMalformed,

    #[display("Age must be a number")]
    AgeNotANumber,
    #[display("Age must be between 10 and 120")]
    AgeOutOfRange,
}

impl Rule {
    /// The form field this rule applies to
    pub fn field(self) -> Field {
        match self {
            Rule::UsernameTooShort | Rule::UsernameInvalidCharacter => Field::Username,
            Rule::PasswordTooShort
            | Rule::PasswordMissingLetter
            | Rule::PasswordMissingDigit
            | Rule::PasswordMissingSymbol
            | Rule::PasswordLineBreak => Field::Password,
            Rule::EmailDoubleDot | Rule::EmailMalformed => Field::Email,
            Rule::AgeNotANumber | Rule::AgeOutOfRange => Field::Age,
        }
    }
}

/// Raw values of a form submission, as read from the page or a JSON file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormFields {
    pub username: String,
    pub password: String,
    pub email: String,
    #[serde(deserialize_with = "age_from_text_or_number")]
    pub age: String,
}

/// JSON forms may carry the age as a string or as a number
fn age_from_text_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAge {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawAge::deserialize(deserializer)? {
        RawAge::Text(text) => text,
        RawAge::Number(number) => number.to_string(),
    })
}

/// Outcome of a form validation.
///
/// Keeps every failed rule, and the aggregate verdict for callers
/// that only care whether the form as a whole is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormReport {
    valid: bool,
    failures: BTreeSet<Rule>,
}

impl FormReport {
    pub fn from_failures(failures: impl IntoIterator<Item = Rule>) -> Self {
        let failures: BTreeSet<Rule> = failures.into_iter().collect();
        Self {
            valid: failures.is_empty(),
            failures,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn failures(&self) -> impl Iterator<Item = Rule> + '_ {
        self.failures.iter().copied()
    }

    pub fn has_failed(&self, rule: Rule) -> bool {
        self.failures.contains(&rule)
    }

    /// Fields with at least one failed rule
    pub fn invalid_fields(&self) -> BTreeSet<Field> {
        self.failures.iter().map(|rule| rule.field()).collect()
    }
}
