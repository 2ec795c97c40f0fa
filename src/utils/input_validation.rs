use derive_more::derive::Display;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::consts::{MAX_AGE, MIN_AGE, MIN_PASSWORD_LENGTH, MIN_USERNAME_LENGTH, PASSWORD_SYMBOLS};
use crate::models::{FormFields, FormReport, Rule};

// Email structure, without the double-dot rule which is checked on its own
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9_](?:[a-zA-Z0-9_.-]+[A-Za-z0-9_]+)*@(?:[a-zA-Z0-9_-]+\.)+[a-zA-Z_]{2,}$",
    )
    .expect("Failed to compile email regex")
});

/// Line terminators, which `.` never matches in the password pattern
const LINE_TERMINATORS: &[char] = &['\n', '\r', '\u{2028}', '\u{2029}'];

/// Length as the browser measures it, in UTF-16 code units
fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

fn is_username_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

/// Rules failed by a username. Stops at the first failure.
pub fn username_violations(username: &str) -> Vec<Rule> {
    if utf16_len(username) < MIN_USERNAME_LENGTH {
        return vec![Rule::UsernameTooShort];
    }

    if !username.chars().all(is_username_char) {
        return vec![Rule::UsernameInvalidCharacter];
    }

    Vec::new()
}

/// Rules failed by a password. Every rule is checked independently.
pub fn password_violations(password: &str) -> Vec<Rule> {
    let checks = [
        (
            utf16_len(password) >= MIN_PASSWORD_LENGTH,
            Rule::PasswordTooShort,
        ),
        (
            !password.contains(LINE_TERMINATORS),
            Rule::PasswordLineBreak,
        ),
        (
            password.chars().any(|c| c.is_ascii_alphabetic()),
            Rule::PasswordMissingLetter,
        ),
        (
            password.chars().any(|c| c.is_ascii_digit()),
            Rule::PasswordMissingDigit,
        ),
        (
            password.contains(PASSWORD_SYMBOLS),
            Rule::PasswordMissingSymbol,
        ),
    ];

    checks
        .into_iter()
        .filter(|(passed, _)| !passed)
        .map(|(_, rule)| rule)
        .collect()
}

/// Rules failed by an email address.
///
/// The double-dot rule applies to the whole string, domain included.
pub fn email_violations(email: &str) -> Vec<Rule> {
    let mut rules = Vec::new();
    if email.contains("..") {
        rules.push(Rule::EmailDoubleDot);
    }
    if !EMAIL_REGEX.is_match(email) {
        rules.push(Rule::EmailMalformed);
    }
    rules
}

/// Parses a raw age field. Anything that is not a plain number is rejected.
pub fn parse_age(age: &str) -> Option<f64> {
    age.trim().parse::<f64>().ok().filter(|n| !n.is_nan())
}

pub fn age_value_violations(age: f64) -> Vec<Rule> {
    if age.is_nan() {
        vec![Rule::AgeNotANumber]
    } else if !(MIN_AGE..=MAX_AGE).contains(&age) {
        vec![Rule::AgeOutOfRange]
    } else {
        Vec::new()
    }
}

/// Rules failed by a raw age field
pub fn age_violations(age: &str) -> Vec<Rule> {
    match parse_age(age) {
        Some(value) => age_value_violations(value),
        None => vec![Rule::AgeNotANumber],
    }
}

pub fn is_valid_username(username: &str) -> bool {
    username_violations(username).is_empty()
}

pub fn is_valid_password(password: &str) -> bool {
    password_violations(password).is_empty()
}

pub fn is_valid_email(email: &str) -> bool {
    email_violations(email).is_empty()
}

pub fn is_valid_age(age: &str) -> bool {
    age_violations(age).is_empty()
}

pub fn is_valid_age_value(age: f64) -> bool {
    age_value_violations(age).is_empty()
}

/// Checks every field of the form and collects all failed rules
pub fn validate_form(fields: &FormFields) -> FormReport {
    let failures = username_violations(&fields.username)
        .into_iter()
        .chain(password_violations(&fields.password))
        .chain(email_violations(&fields.email))
        .chain(age_violations(&fields.age));

    FormReport::from_failures(failures)
}

/// Error returned when building a validated wrapper from an invalid candidate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid input: {}", describe(.rules))]
pub struct InvalidInput {
    pub rules: Vec<Rule>,
}

fn describe(rules: &[Rule]) -> String {
    rules
        .iter()
        .map(Rule::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn check(rules: Vec<Rule>) -> Result<(), InvalidInput> {
    if rules.is_empty() {
        Ok(())
    } else {
        Err(InvalidInput { rules })
    }
}

/// Wrapper type for a username that has been validated
#[derive(Debug, Clone, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub struct Username(String);

impl TryFrom<String> for Username {
    type Error = InvalidInput;

    fn try_from(username: String) -> Result<Self, Self::Error> {
        check(username_violations(&username))?;
        Ok(Self(username))
    }
}

impl TryFrom<&str> for Username {
    type Error = InvalidInput;

    fn try_from(username: &str) -> Result<Self, Self::Error> {
        Self::try_from(username.to_owned())
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Wrapper type for a password that satisfies the strength rules.
/// Never displayed.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}

impl TryFrom<String> for Password {
    type Error = InvalidInput;

    fn try_from(password: String) -> Result<Self, Self::Error> {
        check(password_violations(&password))?;
        Ok(Self(password))
    }
}

impl TryFrom<&str> for Password {
    type Error = InvalidInput;

    fn try_from(password: &str) -> Result<Self, Self::Error> {
        Self::try_from(password.to_owned())
    }
}

impl AsRef<str> for Password {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Wrapper type for a validated email address
#[derive(Debug, Clone, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub struct Email(String);

impl TryFrom<String> for Email {
    type Error = InvalidInput;

    fn try_from(email: String) -> Result<Self, Self::Error> {
        check(email_violations(&email))?;
        Ok(Self(email))
    }
}

impl TryFrom<&str> for Email {
    type Error = InvalidInput;

    fn try_from(email: &str) -> Result<Self, Self::Error> {
        Self::try_from(email.to_owned())
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Wrapper type for an age within the accepted bounds
#[derive(Debug, Clone, Copy, Serialize, PartialEq, PartialOrd, Display)]
pub struct Age(f64);

impl Age {
    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Age {
    type Error = InvalidInput;

    fn try_from(age: f64) -> Result<Self, Self::Error> {
        check(age_value_violations(age))?;
        Ok(Self(age))
    }
}

impl TryFrom<&str> for Age {
    type Error = InvalidInput;

    fn try_from(age: &str) -> Result<Self, Self::Error> {
        let value = parse_age(age).ok_or(InvalidInput {
            rules: vec![Rule::AgeNotANumber],
        })?;
        Self::try_from(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod username_tests {
        use super::*;

        #[test]
        fn test_valid_usernames() {
            let valid_cases = vec!["abcd", "ABC-123", "ab-1", "----", "user-Name-42"];

            for username in valid_cases {
                assert!(is_valid_username(username), "Valid username {} was rejected !", username);
            }
        }

        #[test]
        fn test_invalid_usernames() {
            let invalid_cases = vec![
                "abc",        // Too short
                "",           // Empty
                "ab_cd",      // Underscore
                "has space",  // Space
                "user@name",  // Symbol
                "héllo",      // Non ASCII letter
                "abcd\n",     // Line break
            ];

            for username in invalid_cases {
                assert!(!is_valid_username(username), "Invalid username {:?} was approved !", username);
            }
        }

        #[test]
        fn test_every_short_username_is_rejected() {
            for username in ["", "a", "ab", "abc", "A-1", "999"] {
                assert_eq!(username_violations(username), vec![Rule::UsernameTooShort]);
            }
        }

        #[test]
        fn test_length_is_counted_in_utf16_units() {
            // Four units but more than four bytes: the charset rule fails, not the length
            assert_eq!(username_violations("ééé1"), vec![Rule::UsernameInvalidCharacter]);
            // Two characters, four units
            assert_eq!(username_violations("\u{1F600}\u{1F600}"), vec![Rule::UsernameInvalidCharacter]);
        }

        #[test]
        fn test_username_wrapper() {
            let username = Username::try_from("ABC-123").unwrap();
            assert_eq!(username.as_ref(), "ABC-123");
            assert_eq!(username.to_string(), "ABC-123");

            let error = Username::try_from("ab_cd").unwrap_err();
            assert_eq!(error.rules, vec![Rule::UsernameInvalidCharacter]);
        }
    }

    mod password_tests {
        use super::*;

        #[test]
        fn test_password_cases() {
            let test_cases = vec![
                // (password, expected_valid)
                ("Passw0rd!", true),
                ("password", false),     // No digit, no symbol
                ("Pass123", false),      // Too short, no symbol
                ("12345678!", false),    // No letter
                ("abcdefg_1", true),     // Underscore is a symbol
                ("(a1)(a1)", true),
                ("Passw0rd~", false),    // Tilde is not in the symbol set
                ("Pässw0rd!", true),     // Other characters count toward the length
                ("Pa1!\u{1F600}\u{1F600}", true),  // Each emoji counts as two units
                ("Pa1!\u{1F600}x", false),          // Seven units
            ];

            for (password, expected_valid) in test_cases {
                assert_eq!(is_valid_password(password), expected_valid,
                           "Password '{}' validation result was unexpected", password);
            }
        }

        #[test]
        fn test_each_rule_is_reported() {
            assert_eq!(
                password_violations("password"),
                vec![Rule::PasswordMissingDigit, Rule::PasswordMissingSymbol]
            );
            assert_eq!(
                password_violations("Pass123"),
                vec![Rule::PasswordTooShort, Rule::PasswordMissingSymbol]
            );
            assert_eq!(
                password_violations(""),
                vec![
                    Rule::PasswordTooShort,
                    Rule::PasswordMissingLetter,
                    Rule::PasswordMissingDigit,
                    Rule::PasswordMissingSymbol,
                ]
            );
        }

        #[test]
        fn test_line_breaks_are_rejected() {
            assert_eq!(password_violations("Passw0rd!\n"), vec![Rule::PasswordLineBreak]);
            assert!(!is_valid_password("Pass\u{2028}w0rd!"));
        }

        #[test]
        fn test_password_wrapper_hides_value() {
            let password = Password::try_from("Passw0rd!").unwrap();
            assert_eq!(format!("{:?}", password), "Password(***)");
            assert_eq!(password.as_ref(), "Passw0rd!");
            assert!(Password::try_from("short").is_err());
        }
    }

    mod email_tests {
        use super::*;

        #[test]
        fn test_valid_emails() {
            let valid_emails = vec![
                "user.name@example.com",
                "a@b.cd",
                "first-last_2@sub.domain.org",
                "user@my-host.example.co_uk",
                "x@example.c_",
            ];

            for email in valid_emails {
                assert!(is_valid_email(email), "Should accept valid email: {}", email);
            }
        }

        #[test]
        fn test_invalid_emails() {
            let invalid_emails = vec![
                "user..name@example.com",
                "user@example.c",      // Top-level label too short
                "user@example.c0m",    // Digit in top-level label
                "",
                "not-an-email",
                "@example.com",
                "user@",
                "user@.com",
                ".user@example.com",
                "user.@example.com",
                "user@example",
                "user name@example.com",
                "user+tag@example.com",
                "usér@example.com",
            ];

            for email in invalid_emails {
                assert!(!is_valid_email(email), "Should reject invalid email: {}", email);
            }
        }

        #[test]
        fn test_double_dot_rule_covers_the_whole_address() {
            // The structure alone would accept this one
            assert_eq!(email_violations("user..name@example.com"), vec![Rule::EmailDoubleDot]);
            assert!(email_violations("user@example..com").contains(&Rule::EmailDoubleDot));
        }

        #[test]
        fn test_email_wrapper() {
            let email = Email::try_from("user.name@example.com").unwrap();
            assert_eq!(format!("{}", email), "user.name@example.com");
            assert!(Email::try_from("user@example.c").is_err());
        }
    }

    mod age_tests {
        use super::*;

        #[test]
        fn test_age_bounds() {
            assert!(is_valid_age_value(10.0));
            assert!(is_valid_age_value(120.0));
            assert!(is_valid_age_value(64.5));
            assert!(!is_valid_age_value(9.0));
            assert!(!is_valid_age_value(121.0));
            assert!(!is_valid_age_value(9.9));
            assert!(!is_valid_age_value(f64::NAN));
            assert!(!is_valid_age_value(f64::INFINITY));
        }

        #[test]
        fn test_raw_age_is_parsed_first() {
            assert!(is_valid_age("10"));
            assert!(is_valid_age(" 120 "));
            assert!(!is_valid_age("9.9"));

            for raw in ["", "   ", "abc", "twenty", "NaN", "12 years"] {
                assert_eq!(age_violations(raw), vec![Rule::AgeNotANumber], "Age {:?} should not parse", raw);
            }
            assert_eq!(age_violations("121"), vec![Rule::AgeOutOfRange]);
        }

        #[test]
        fn test_age_wrapper() {
            assert_eq!(Age::try_from("42").unwrap().value(), 42.0);
            assert_eq!(Age::try_from(10.0).unwrap().value(), 10.0);
            assert!(Age::try_from("9").is_err());
            assert!(Age::try_from(f64::NAN).is_err());
        }
    }

    mod form_tests {
        use super::*;

        fn valid_fields() -> FormFields {
            FormFields {
                username: "ABC-123".into(),
                password: "Passw0rd!".into(),
                email: "user.name@example.com".into(),
                age: "30".into(),
            }
        }

        #[test]
        fn test_valid_form() {
            let report = validate_form(&valid_fields());
            assert!(report.is_valid());
            assert_eq!(report.failures().count(), 0);
        }

        #[test]
        fn test_all_fields_are_checked() {
            let fields = FormFields {
                username: "ab_cd".into(),
                password: "password".into(),
                email: "user@example.c".into(),
                age: "9".into(),
            };

            let report = validate_form(&fields);
            assert!(!report.is_valid());
            assert_eq!(
                report.failures().collect::<Vec<_>>(),
                vec![
                    Rule::UsernameInvalidCharacter,
                    Rule::PasswordMissingDigit,
                    Rule::PasswordMissingSymbol,
                    Rule::EmailMalformed,
                    Rule::AgeOutOfRange,
                ]
            );
        }

        #[test]
        fn test_single_bad_field_fails_the_form() {
            let mut fields = valid_fields();
            fields.age = String::new();

            let report = validate_form(&fields);
            assert!(!report.is_valid());
            assert_eq!(report.failures().collect::<Vec<_>>(), vec![Rule::AgeNotANumber]);
        }

        #[test]
        fn test_validation_is_idempotent() {
            let fields = FormFields {
                username: "abc".into(),
                ..valid_fields()
            };
            assert_eq!(validate_form(&fields), validate_form(&fields));
            assert_eq!(is_valid_email("a@b.cd"), is_valid_email("a@b.cd"));
        }

        #[test]
        fn test_invalid_input_message() {
            let error = Password::try_from("password").unwrap_err();
            assert_eq!(
                error.to_string(),
                "Invalid input: Password must contain a digit, Password must contain one of ! @ # $ % ^ & * - _ ( )"
            );
        }
    }
}
