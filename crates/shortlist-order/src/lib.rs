//! Fractional order-key generation for manually ordered sequences.
//!
//! This crate produces string *order keys* whose plain lexicographic
//! comparison reflects sequence position. Between any two distinct keys a new
//! key can always be generated (density), so inserting an item anywhere in a
//! sequence never requires rewriting the keys of its neighbours.
//!
//! Keys are digit strings over a base-62 alphabet with an integer part and an
//! optional fraction. Appending to the end of a sequence increments the
//! integer part and keeps keys short; inserting repeatedly between the same
//! two keys bisects the fraction and grows key length instead of ever
//! failing on precision.
//!
//! # Example
//!
//! ```ignore
//! use shortlist_order::KeyGenerator;
//!
//! let keys = KeyGenerator::new();
//! let first = keys.initial();                   // "a0"
//! let second = keys.after(Some(&first))?;       // "a1"
//! let wedge = keys.between(Some(&first), Some(&second))?;
//! assert!(first < wedge && wedge < second);
//! ```

#![warn(missing_docs)]

mod error;
mod fractional;
mod generator;
mod key;

pub use error::OrderKeyError;
pub use error::Result;
pub use generator::KeyGenerator;
pub use generator::DEFAULT_CACHE_SIZE;
pub use key::OrderKey;
