//! # cardvault-core — Card Number Validation
//!
//! The deterministic heart of CardVault. Everything else in the workspace
//! (HTTP handlers, the MySQL record store) is plumbing around the two items
//! defined here:
//!
//! - [`luhn`]: the Luhn checksum used by every major card-numbering scheme,
//!   exposed both as the two-valued [`validate`] and the three-way [`check`].
//! - [`card`]: the [`CardNumber`] newtype, which carries a card number
//!   through the service and renders it masked in logs.
//!
//! ## Crate Policy
//!
//! - No I/O, no shared state, no async. Safe to call from any thread.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Malformed input is never an error: it is a [`CheckOutcome::Malformed`]
//!   that collapses to `false` at the boolean boundary.

pub mod card;
pub mod luhn;

pub use card::CardNumber;
pub use luhn::{check, check_digit, validate, CheckOutcome};
