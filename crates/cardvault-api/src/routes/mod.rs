//! # API Route Modules
//!
//! - `validate` — Luhn checksum over a submitted card number.
//! - `cards` — Card record creation, listing and deletion.

pub mod cards;
pub mod validate;
