//! # Luhn Checksum
//!
//! Digits are processed right to left. The rightmost digit is taken as is,
//! the one to its left is doubled, and so on alternating. A doubled value
//! above 9 is reduced to the sum of its two decimal digits, which for
//! values in `10..=18` is `(value % 10) + 1`. The number is valid when the
//! total is a multiple of 10.
//!
//! The empty string sums to zero and is therefore valid. That is the
//! arithmetic identity of the algorithm and callers rely on it, so it is
//! kept as is.

use serde::Serialize;

/// Result of running the checksum over a candidate card number.
///
/// [`CheckOutcome::is_valid`] collapses this to the two-valued contract
/// exposed by [`validate`]: both `InvalidChecksum` and `Malformed` map to
/// `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CheckOutcome {
    /// Every character is a digit and the checksum holds.
    Valid,
    /// Every character is a digit but the checksum does not hold.
    InvalidChecksum,
    /// A non-digit character was found. Scanning runs right to left, so this
    /// is the rightmost offending character.
    Malformed {
        /// Byte offset of the offending character.
        position: usize,
        /// The offending character.
        found: char,
    },
}

impl CheckOutcome {
    /// Whether the number passed the checksum.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Short label used for logging and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::InvalidChecksum => "invalid_checksum",
            Self::Malformed { .. } => "malformed",
        }
    }
}

impl std::fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed { position, found } => {
                write!(f, "malformed: {found:?} at byte {position}")
            }
            other => f.write_str(other.as_str()),
        }
    }
}

/// Run the Luhn checksum over `number`, distinguishing malformed input from
/// a failed checksum.
pub fn check(number: &str) -> CheckOutcome {
    // Kept reduced mod 10 so arbitrarily long inputs cannot overflow.
    let mut sum = 0u32;
    let mut double = false;

    for (position, c) in number.char_indices().rev() {
        let Some(mut digit) = c.to_digit(10) else {
            return CheckOutcome::Malformed { position, found: c };
        };

        if double {
            digit *= 2;
            if digit > 9 {
                digit = (digit % 10) + 1;
            }
        }

        sum = (sum + digit) % 10;
        double = !double;
    }

    if sum == 0 {
        CheckOutcome::Valid
    } else {
        CheckOutcome::InvalidChecksum
    }
}

/// Whether `number` passes the Luhn checksum.
///
/// Returns `false` for any input containing a character other than an ASCII
/// decimal digit. Returns `true` for the empty string.
pub fn validate(number: &str) -> bool {
    check(number).is_valid()
}

/// Compute the check digit that makes `payload` followed by the digit pass
/// the checksum.
///
/// Returns `None` if `payload` contains a non-digit.
pub fn check_digit(payload: &str) -> Option<u32> {
    // With the check digit appended, the payload's rightmost digit becomes a
    // doubled position.
    let mut sum = 0u32;
    let mut double = true;

    for c in payload.chars().rev() {
        let mut digit = c.to_digit(10)?;
        if double {
            digit *= 2;
            if digit > 9 {
                digit = (digit % 10) + 1;
            }
        }
        sum = (sum + digit) % 10;
        double = !double;
    }

    Some((10 - sum) % 10)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// The checksum is a pure function of its input.
        #[test]
        fn validate_is_deterministic(s in ".{0,40}") {
            prop_assert_eq!(validate(&s), validate(&s));
            prop_assert_eq!(check(&s), check(&s));
        }

        /// The boolean contract is exactly the collapsed three-way outcome.
        #[test]
        fn validate_collapses_check(s in ".{0,40}") {
            prop_assert_eq!(validate(&s), check(&s) == CheckOutcome::Valid);
        }

        /// Appending the computed check digit always yields a valid number.
        #[test]
        fn appended_check_digit_is_valid(payload in "[0-9]{0,30}") {
            let digit = check_digit(&payload).unwrap();
            let full = format!("{payload}{digit}");
            prop_assert!(validate(&full), "{} should be valid", full);
        }

        /// Exactly one of the ten possible final digits completes a payload.
        #[test]
        fn exactly_one_check_digit_fits(payload in "[0-9]{0,30}") {
            let fits = (0..10)
                .filter(|d| validate(&format!("{payload}{d}")))
                .count();
            prop_assert_eq!(fits, 1);
        }

        /// Prepending zeros never changes validity.
        #[test]
        fn leading_zeros_are_neutral(digits in "[0-9]{0,30}", zeros in 0usize..8) {
            let padded = format!("{}{digits}", "0".repeat(zeros));
            prop_assert_eq!(validate(&padded), validate(&digits));
        }

        /// Any non-digit anywhere makes the whole input invalid.
        #[test]
        fn any_non_digit_invalidates(
            prefix in "[0-9]{0,15}",
            bad in "[^0-9]",
            suffix in "[0-9]{0,15}",
        ) {
            let s = format!("{prefix}{bad}{suffix}");
            prop_assert!(!validate(&s));
            let is_malformed = matches!(check(&s), CheckOutcome::Malformed { .. });
            prop_assert!(is_malformed);
        }
    }
}
