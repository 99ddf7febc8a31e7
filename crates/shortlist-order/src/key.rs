//! The order-key string type.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::error::Result;
use crate::fractional;

/// A comparable string token encoding an item's position in a manually
/// ordered sequence.
///
/// Ordering is plain lexicographic comparison of the underlying string, which
/// by construction matches sequence position. Keys are immutable; new
/// positions are expressed by generating new keys, never by mutating one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderKey(String);

impl OrderKey {
    /// Validate `key` and wrap it as an [`OrderKey`].
    ///
    /// Rejects strings that are not well-formed fractional order keys, such
    /// as keys with a malformed integer part or a trailing-zero fraction.
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        fractional::validate_key(&key)?;
        Ok(Self(key))
    }

    /// Wrap a string the generator itself produced.
    ///
    /// Callers outside this crate go through [`OrderKey::new`].
    pub(crate) fn from_generated(key: String) -> Self {
        Self(key)
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for OrderKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
