//! Error types for order-key generation.

use snafu::Snafu;

/// Result type for order-key operations.
pub type Result<T, E = OrderKeyError> = std::result::Result<T, E>;

/// Errors that can occur while generating order keys.
///
/// Running out of digit precision between two keys is *not* an error: the
/// algorithm extends key length instead. These variants only report caller
/// contract violations and the (practically unreachable) exhaustion of the
/// negative integer range.
#[derive(Debug, Snafu, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
pub enum OrderKeyError {
    /// A supplied key is not a well-formed order key.
    #[snafu(display("invalid order key '{key}': {reason}"))]
    InvalidKey {
        /// The offending key.
        key: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The boundary keys are not strictly ordered.
    #[snafu(display("order key boundaries out of order: '{prev}' >= '{next}'"))]
    BoundaryOrder {
        /// Lower boundary as supplied.
        prev: String,
        /// Upper boundary as supplied.
        next: String,
    },

    /// The integer key range has no room left in the requested direction.
    #[snafu(display("order key integer range exhausted before '{next}'"))]
    RangeExhausted {
        /// Boundary that could not be preceded.
        next: String,
    },
}
