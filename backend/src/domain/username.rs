//! Network-free username syntax validation.
//!
//! Rules are evaluated in a fixed order and every failing rule is reported,
//! so callers can show the full list of problems at once. A blank input is
//! the one exception: it is reported as [`UsernameViolation::Empty`] alone,
//! since the remaining rules are meaningless for it.

use std::fmt;

/// Minimum username length in characters.
pub const USERNAME_MIN_LEN: usize = 3;
/// Maximum username length in characters.
pub const USERNAME_MAX_LEN: usize = 20;

/// One failed syntax rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UsernameViolation {
    /// Nothing remained after trimming whitespace.
    Empty,
    /// Fewer than [`USERNAME_MIN_LEN`] characters.
    TooShort,
    /// More than [`USERNAME_MAX_LEN`] characters.
    TooLong,
    /// Contains characters outside `[A-Za-z0-9_]`.
    InvalidCharacters,
    /// Starts or ends with `_`.
    LeadingOrTrailingUnderscore,
    /// Contains `__`.
    ConsecutiveUnderscores,
}

impl UsernameViolation {
    /// Stable snake_case code for clients.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::TooShort => "too_short",
            Self::TooLong => "too_long",
            Self::InvalidCharacters => "invalid_characters",
            Self::LeadingOrTrailingUnderscore => "leading_or_trailing_underscore",
            Self::ConsecutiveUnderscores => "consecutive_underscores",
        }
    }

    /// Human-readable description of the rule.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Empty => "username must not be empty",
            Self::TooShort => "username must be at least 3 characters long",
            Self::TooLong => "username must be at most 20 characters long",
            Self::InvalidCharacters => {
                "username may only contain letters, digits, and underscores"
            }
            Self::LeadingOrTrailingUnderscore => {
                "username must not start or end with an underscore"
            }
            Self::ConsecutiveUnderscores => {
                "username must not contain consecutive underscores"
            }
        }
    }
}

impl fmt::Display for UsernameViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Result of running every syntax rule against one raw candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    normalized: String,
    violations: Vec<UsernameViolation>,
}

impl ValidationOutcome {
    /// Whether every rule passed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// The candidate with surrounding whitespace removed.
    #[must_use]
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Failed rules in evaluation order.
    #[must_use]
    pub fn violations(&self) -> &[UsernameViolation] {
        &self.violations
    }

    /// Convert into a [`Username`] when valid.
    ///
    /// # Errors
    /// Returns [`InvalidUsername`] carrying the violations otherwise.
    pub fn into_username(self) -> Result<Username, InvalidUsername> {
        if self.violations.is_empty() {
            Ok(Username(self.normalized))
        } else {
            Err(InvalidUsername {
                value: self.normalized,
                violations: self.violations,
            })
        }
    }
}

/// Validate a raw candidate.
///
/// # Examples
/// ```
/// use namecheck::domain::{UsernameViolation, validate_username};
///
/// assert!(validate_username("  abc_123 ").is_valid());
/// assert_eq!(
///     validate_username("ab__c").violations(),
///     &[UsernameViolation::ConsecutiveUnderscores]
/// );
/// ```
#[must_use]
pub fn validate_username(raw: &str) -> ValidationOutcome {
    let normalized = raw.trim().to_owned();
    let mut violations = Vec::new();

    if normalized.is_empty() {
        violations.push(UsernameViolation::Empty);
        return ValidationOutcome {
            normalized,
            violations,
        };
    }

    let length = normalized.chars().count();
    if length < USERNAME_MIN_LEN {
        violations.push(UsernameViolation::TooShort);
    } else if length > USERNAME_MAX_LEN {
        violations.push(UsernameViolation::TooLong);
    }
    if !normalized
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        violations.push(UsernameViolation::InvalidCharacters);
    }
    if normalized.starts_with('_') || normalized.ends_with('_') {
        violations.push(UsernameViolation::LeadingOrTrailingUnderscore);
    }
    if normalized.contains("__") {
        violations.push(UsernameViolation::ConsecutiveUnderscores);
    }

    ValidationOutcome {
        normalized,
        violations,
    }
}

/// A username that passed every syntax rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Validate and wrap a raw candidate.
    ///
    /// # Errors
    /// Returns [`InvalidUsername`] when any rule fails.
    pub fn parse(raw: &str) -> Result<Self, InvalidUsername> {
        validate_username(raw).into_username()
    }

    /// Borrow the normalized value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A candidate rejected by the syntax rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid username format")]
pub struct InvalidUsername {
    value: String,
    violations: Vec<UsernameViolation>,
}

impl InvalidUsername {
    /// The trimmed candidate.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Failed rules in evaluation order.
    #[must_use]
    pub fn violations(&self) -> &[UsernameViolation] {
        &self.violations
    }
}

#[cfg(test)]
mod tests {
    //! Syntax rule coverage.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("abc")]
    #[case("abc_123")]
    #[case("A1_b2_C3")]
    #[case("abcdefghijklmnopqrst")]
    #[case("  padded_name\t")]
    fn accepts_well_formed_names(#[case] raw: &str) {
        let outcome = validate_username(raw);
        assert!(outcome.is_valid(), "{raw:?}: {:?}", outcome.violations());
    }

    #[rstest]
    #[case("", &[UsernameViolation::Empty])]
    #[case("   ", &[UsernameViolation::Empty])]
    #[case("ab", &[UsernameViolation::TooShort])]
    #[case("abcdefghijklmnopqrstu", &[UsernameViolation::TooLong])]
    #[case("bad-name", &[UsernameViolation::InvalidCharacters])]
    #[case("héllo", &[UsernameViolation::InvalidCharacters])]
    #[case("_abc", &[UsernameViolation::LeadingOrTrailingUnderscore])]
    #[case("abc_", &[UsernameViolation::LeadingOrTrailingUnderscore])]
    #[case("ab__c", &[UsernameViolation::ConsecutiveUnderscores])]
    #[case(
        "_a",
        &[UsernameViolation::TooShort, UsernameViolation::LeadingOrTrailingUnderscore]
    )]
    #[case(
        "__bad name__",
        &[
            UsernameViolation::InvalidCharacters,
            UsernameViolation::LeadingOrTrailingUnderscore,
            UsernameViolation::ConsecutiveUnderscores,
        ]
    )]
    fn reports_every_failed_rule(#[case] raw: &str, #[case] expected: &[UsernameViolation]) {
        let outcome = validate_username(raw);
        assert!(!outcome.is_valid());
        assert_eq!(outcome.violations(), expected);
    }

    #[rstest]
    fn length_counts_characters_not_bytes() {
        let outcome = validate_username("ééé");
        assert!(!outcome.violations().contains(&UsernameViolation::TooShort));
        assert!(outcome.violations().contains(&UsernameViolation::InvalidCharacters));
    }

    #[rstest]
    fn parse_trims_and_wraps() {
        let username = Username::parse("  good_name ").expect("valid username");
        assert_eq!(username.as_str(), "good_name");
    }

    #[rstest]
    fn parse_reports_trimmed_value_on_failure() {
        let err = Username::parse(" ab ").expect_err("too short");
        assert_eq!(err.value(), "ab");
        assert_eq!(err.violations(), &[UsernameViolation::TooShort]);
        assert_eq!(err.to_string(), "invalid username format");
    }
}
