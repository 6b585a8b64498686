//! Availability verdicts produced by the resolver.

use serde::{Deserialize, Serialize};

/// Message attached to verdicts when neither upstream tier answered.
pub const UNVERIFIED_MESSAGE: &str = "could not verify at this time";

/// Classified outcome of checking one username upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    /// Nobody holds the name.
    Available,
    /// Another account holds the name.
    Taken,
    /// The platform refuses the name on moderation grounds.
    Censored,
    /// The platform considers the name too short.
    TooShort,
    /// The platform considers the name too long.
    TooLong,
    /// The platform rejects characters in the name.
    InvalidCharacters,
    /// The platform answered with an unrecognised code.
    Unknown,
    /// Neither upstream tier produced an answer.
    Error,
}

impl AvailabilityStatus {
    /// Map the primary endpoint's numeric discriminant.
    ///
    /// # Examples
    /// ```
    /// use namecheck::domain::AvailabilityStatus;
    ///
    /// assert_eq!(AvailabilityStatus::from_validation_code(0), AvailabilityStatus::Available);
    /// assert_eq!(AvailabilityStatus::from_validation_code(7), AvailabilityStatus::Unknown);
    /// ```
    #[must_use]
    pub const fn from_validation_code(code: i64) -> Self {
        match code {
            0 => Self::Available,
            1 => Self::Taken,
            2 => Self::Censored,
            10 => Self::TooShort,
            11 => Self::TooLong,
            12 => Self::InvalidCharacters,
            _ => Self::Unknown,
        }
    }

    /// Only [`AvailabilityStatus::Available`] means the name can be claimed.
    #[must_use]
    pub const fn is_available(self) -> bool {
        matches!(self, Self::Available)
    }

    /// Stable snake_case label, as serialised.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Taken => "taken",
            Self::Censored => "censored",
            Self::TooShort => "too_short",
            Self::TooLong => "too_long",
            Self::InvalidCharacters => "invalid_characters",
            Self::Unknown => "unknown",
            Self::Error => "error",
        }
    }
}

/// Immutable result of resolving one username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityVerdict {
    username: String,
    status: AvailabilityStatus,
    message: Option<String>,
}

impl AvailabilityVerdict {
    /// Build a verdict; availability is derived from `status`.
    pub fn new(username: impl Into<String>, status: AvailabilityStatus) -> Self {
        Self {
            username: username.into(),
            status,
            message: None,
        }
    }

    /// Terminal verdict used when both upstream tiers failed.
    pub fn unverified(username: impl Into<String>) -> Self {
        Self::new(username, AvailabilityStatus::Error).with_message(UNVERIFIED_MESSAGE)
    }

    /// Attach a human-readable detail.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// The username the verdict applies to.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Whether the name can be claimed.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.status.is_available()
    }

    /// Classified status.
    #[must_use]
    pub fn status(&self) -> AvailabilityStatus {
        self.status
    }

    /// Optional detail from upstream.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, AvailabilityStatus::Available, true)]
    #[case(1, AvailabilityStatus::Taken, false)]
    #[case(2, AvailabilityStatus::Censored, false)]
    #[case(10, AvailabilityStatus::TooShort, false)]
    #[case(11, AvailabilityStatus::TooLong, false)]
    #[case(12, AvailabilityStatus::InvalidCharacters, false)]
    #[case(3, AvailabilityStatus::Unknown, false)]
    #[case(-1, AvailabilityStatus::Unknown, false)]
    fn maps_validation_codes(
        #[case] code: i64,
        #[case] expected: AvailabilityStatus,
        #[case] available: bool,
    ) {
        let status = AvailabilityStatus::from_validation_code(code);
        assert_eq!(status, expected);
        assert_eq!(status.is_available(), available);
    }

    #[rstest]
    fn unverified_verdict_is_not_available() {
        let verdict = AvailabilityVerdict::unverified("good_name");
        assert!(!verdict.is_available());
        assert_eq!(verdict.status(), AvailabilityStatus::Error);
        assert_eq!(verdict.message(), Some(UNVERIFIED_MESSAGE));
    }

    #[rstest]
    fn status_serialises_as_snake_case() {
        let value = serde_json::to_value(AvailabilityStatus::InvalidCharacters).expect("serialise");
        assert_eq!(value, serde_json::json!("invalid_characters"));
        assert_eq!(AvailabilityStatus::InvalidCharacters.as_str(), "invalid_characters");
    }
}
