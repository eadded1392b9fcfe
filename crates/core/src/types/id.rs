//! Caller-supplied order identifiers.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`TransactionId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionIdError {
    /// The input string is empty.
    #[error("transaction id cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("transaction id must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input starts with a dot.
    #[error("transaction id cannot start with '.'")]
    LeadingDot,
    /// The input contains a character outside the allowed set.
    #[error("transaction id contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// A purchase transaction identifier chosen by the client.
///
/// The id names the ticket file handed to the Discord bot, so it is limited
/// to characters that are safe in a file name on every platform.
///
/// ## Constraints
///
/// - Length: 1-128 characters
/// - ASCII letters, digits, `-`, `_` and `.` only
/// - Must not start with `.`
///
/// ## Examples
///
/// ```
/// use donut_market_core::TransactionId;
///
/// assert!(TransactionId::parse("TXN_1700000000000").is_ok());
/// assert!(TransactionId::parse("pp-9f2.a").is_ok());
///
/// assert!(TransactionId::parse("").is_err());
/// assert!(TransactionId::parse("../escape").is_err());
/// assert!(TransactionId::parse("a/b").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TransactionId(String);

impl TransactionId {
    /// Maximum length of a transaction id.
    pub const MAX_LENGTH: usize = 128;

    /// Parse a `TransactionId` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, too long, starts with `.`, or
    /// contains anything other than ASCII alphanumerics, `-`, `_` and `.`.
    pub fn parse(s: &str) -> Result<Self, TransactionIdError> {
        if s.is_empty() {
            return Err(TransactionIdError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(TransactionIdError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if s.starts_with('.') {
            return Err(TransactionIdError::LeadingDot);
        }

        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        {
            return Err(TransactionIdError::InvalidCharacter(c));
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for TransactionId {
    type Err = TransactionIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TransactionId {
    type Error = TransactionIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TransactionId> for String {
    fn from(id: TransactionId) -> Self {
        id.0
    }
}

impl AsRef<str> for TransactionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
