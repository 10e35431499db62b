//! # Card Number Newtype
//!
//! Wraps the raw card number string as received from a client. Construction
//! never fails: a number that does not pass the checksum is still a card
//! number, just not a valid one. That mirrors how records are stored, where
//! validity is a separate flag.
//!
//! `Debug` and [`CardNumber::masked`] only reveal the last four characters,
//! so a `CardNumber` can be passed to `tracing` fields without leaking the
//! full number.

use serde::{Deserialize, Serialize};

use crate::luhn::{self, CheckOutcome};

/// Number of trailing characters left visible by [`CardNumber::masked`].
const VISIBLE_SUFFIX: usize = 4;

/// A payment card number as submitted by a client.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardNumber(String);

impl CardNumber {
    /// Wrap a raw card number.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Access the raw card number.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Run the checksum, distinguishing malformed input.
    pub fn check(&self) -> CheckOutcome {
        luhn::check(&self.0)
    }

    /// Whether the number passes the checksum.
    pub fn is_valid(&self) -> bool {
        luhn::validate(&self.0)
    }

    /// Render with every character but the last four replaced by `*`.
    ///
    /// Numbers of four characters or fewer are masked entirely.
    pub fn masked(&self) -> String {
        let len = self.0.chars().count();
        if len <= VISIBLE_SUFFIX {
            return "*".repeat(len);
        }
        let hidden = len - VISIBLE_SUFFIX;
        self.0
            .chars()
            .enumerate()
            .map(|(i, c)| if i < hidden { '*' } else { c })
            .collect()
    }
}

impl std::fmt::Debug for CardNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("CardNumber").field(&self.masked()).finish()
    }
}
