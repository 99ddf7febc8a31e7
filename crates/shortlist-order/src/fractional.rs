//! Fractional indexing over a base-62 digit alphabet.
//!
//! A key is an integer part followed by an optional fraction. The integer
//! part's leading character encodes its sign and digit count: `a`..=`z` for
//! positive parts of growing length, `A`..=`Z` for negative parts. Fractions
//! never end in the zero digit, so every key has a single canonical spelling
//! and lexicographic comparison matches numeric order.
//!
//! Generation walks the digit strings position by position: where the gap
//! between two digits allows, a single mid digit is picked; where the shorter
//! string is a true prefix of the other, the key is extended by one digit.
//! Appends at either end of the sequence increment or decrement the integer
//! part instead, which keeps sequential keys short.

use crate::error::BoundaryOrderSnafu;
use crate::error::InvalidKeySnafu;
use crate::error::RangeExhaustedSnafu;
use crate::error::Result;

/// Ordered digit alphabet. ASCII order: `0-9` < `A-Z` < `a-z`.
const DIGITS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Base of the digit alphabet.
const BASE: usize = DIGITS.len();

/// The most negative representable integer part: `A` followed by 26 zeros.
/// No key may sort at or below it.
const SMALLEST_INTEGER: &str = "A00000000000000000000000000";

/// The fixed key used when no ordering context exists.
pub(crate) const INITIAL_KEY: &str = "a0";

/// Map an alphabet byte to its digit value.
fn digit_index(digit: u8, key: &str) -> Result<usize> {
    match digit {
        b'0'..=b'9' => Ok((digit - b'0') as usize),
        b'A'..=b'Z' => Ok((digit - b'A') as usize + 10),
        b'a'..=b'z' => Ok((digit - b'a') as usize + 36),
        _ => InvalidKeySnafu {
            key,
            reason: format!("'{}' is not a base-62 digit", digit as char),
        }
        .fail(),
    }
}

/// Total length of an integer part given its head character.
fn integer_length(head: u8, key: &str) -> Result<usize> {
    match head {
        b'a'..=b'z' => Ok((head - b'a') as usize + 2),
        b'A'..=b'Z' => Ok((b'Z' - head) as usize + 2),
        _ => InvalidKeySnafu {
            key,
            reason: format!("invalid integer head '{}'", head as char),
        }
        .fail(),
    }
}

/// Split off the integer part of `key`, validating its digits.
fn integer_part(key: &str) -> Result<&str> {
    let bytes = key.as_bytes();
    let head = match bytes.first() {
        Some(&head) => head,
        None => {
            return InvalidKeySnafu {
                key,
                reason: "key is empty".to_string(),
            }
            .fail()
        }
    };
    let len = integer_length(head, key)?;
    if bytes.len() < len {
        return InvalidKeySnafu {
            key,
            reason: format!("integer part needs {len} characters"),
        }
        .fail();
    }
    for &digit in &bytes[1..len] {
        digit_index(digit, key)?;
    }
    Ok(&key[..len])
}

/// Check that `key` is a well-formed order key.
pub(crate) fn validate_key(key: &str) -> Result<()> {
    if key == SMALLEST_INTEGER {
        return InvalidKeySnafu {
            key,
            reason: "key is below the representable range".to_string(),
        }
        .fail();
    }
    let integer = integer_part(key)?;
    let fraction = &key[integer.len()..];
    for &digit in fraction.as_bytes() {
        digit_index(digit, key)?;
    }
    if fraction.ends_with('0') {
        return InvalidKeySnafu {
            key,
            reason: "fraction has a trailing zero".to_string(),
        }
        .fail();
    }
    Ok(())
}

/// Increment an integer part by one.
///
/// Returns `None` when the positive range is exhausted (head `z`, all digits
/// at the maximum); the caller extends the fraction instead.
fn increment_integer(integer: &str) -> Result<Option<String>> {
    let bytes = integer.as_bytes();
    let head = bytes[0];
    let mut digits = bytes[1..].to_vec();
    let mut carry = true;
    for i in (0..digits.len()).rev() {
        let value = digit_index(digits[i], integer)? + 1;
        if value == BASE {
            digits[i] = b'0';
        } else {
            digits[i] = DIGITS[value];
            carry = false;
            break;
        }
    }
    if carry {
        if head == b'Z' {
            return Ok(Some(INITIAL_KEY.to_string()));
        }
        if head == b'z' {
            return Ok(None);
        }
        let next_head = head + 1;
        if next_head > b'a' {
            // moving up within the positive range grows the digit count
            digits.push(b'0');
        } else {
            // moving toward zero within the negative range shrinks it
            digits.pop();
        }
        return Ok(Some(assemble(next_head, &digits)));
    }
    Ok(Some(assemble(head, &digits)))
}

/// Decrement an integer part by one.
///
/// Returns `None` when the negative range is exhausted.
fn decrement_integer(integer: &str) -> Result<Option<String>> {
    let bytes = integer.as_bytes();
    let head = bytes[0];
    let mut digits = bytes[1..].to_vec();
    let mut borrow = true;
    for i in (0..digits.len()).rev() {
        let value = digit_index(digits[i], integer)?;
        if value == 0 {
            digits[i] = b'z';
        } else {
            digits[i] = DIGITS[value - 1];
            borrow = false;
            break;
        }
    }
    if borrow {
        if head == b'a' {
            return Ok(Some("Zz".to_string()));
        }
        if head == b'A' {
            return Ok(None);
        }
        let next_head = head - 1;
        if next_head < b'Z' {
            // moving down within the negative range grows the digit count
            digits.push(b'z');
        } else {
            // moving toward zero within the positive range shrinks it
            digits.pop();
        }
        return Ok(Some(assemble(next_head, &digits)));
    }
    Ok(Some(assemble(head, &digits)))
}

fn assemble(head: u8, digits: &[u8]) -> String {
    let mut out = String::with_capacity(1 + digits.len());
    out.push(head as char);
    for &digit in digits {
        out.push(digit as char);
    }
    out
}

/// Midpoint of two fractions, `a < b`, where `None` for `b` is the open
/// upper bound. Extends by one digit wherever no single digit fits between.
fn midpoint(a: &str, b: Option<&str>) -> Result<String> {
    if let Some(b) = b {
        // shared prefix carries over unchanged; bisect the divergent tails
        let a_bytes = a.as_bytes();
        let b_bytes = b.as_bytes();
        let mut n = 0;
        while n < b_bytes.len() && a_bytes.get(n).copied().unwrap_or(b'0') == b_bytes[n] {
            n += 1;
        }
        if n > 0 {
            let tail = midpoint(a.get(n..).unwrap_or(""), Some(&b[n..]))?;
            return Ok(format!("{}{}", &b[..n], tail));
        }
    }
    let digit_a = match a.as_bytes().first() {
        Some(&digit) => digit_index(digit, a)?,
        None => 0,
    };
    let digit_b = match b {
        Some(b) => match b.as_bytes().first() {
            Some(&digit) => digit_index(digit, b)?,
            None => BASE,
        },
        None => BASE,
    };
    if digit_b - digit_a > 1 {
        let mid = (digit_a + digit_b + 1) / 2;
        return Ok((DIGITS[mid] as char).to_string());
    }
    // consecutive digits: reuse b's head if b has more digits, otherwise
    // keep a's head and recurse into a's tail against the open bound
    match b {
        Some(b) if b.len() > 1 => Ok(b[..1].to_string()),
        _ => {
            let tail = midpoint(a.get(1..).unwrap_or(""), None)?;
            Ok(format!("{}{}", DIGITS[digit_a] as char, tail))
        }
    }
}

/// Generate a key strictly between `prev` and `next`.
///
/// `None` boundaries are open: `(None, None)` yields the initial key,
/// `(Some(k), None)` a key after `k`, `(None, Some(k))` a key before `k`.
pub(crate) fn key_between(prev: Option<&str>, next: Option<&str>) -> Result<String> {
    if let Some(prev) = prev {
        validate_key(prev)?;
    }
    if let Some(next) = next {
        validate_key(next)?;
    }
    if let (Some(prev), Some(next)) = (prev, next) {
        if prev >= next {
            return BoundaryOrderSnafu { prev, next }.fail();
        }
    }
    match (prev, next) {
        (None, None) => Ok(INITIAL_KEY.to_string()),
        (None, Some(next)) => {
            let integer = integer_part(next)?;
            let fraction = &next[integer.len()..];
            if integer == SMALLEST_INTEGER {
                let tail = midpoint("", Some(fraction))?;
                return Ok(format!("{integer}{tail}"));
            }
            if integer < next {
                // next has a fraction; its bare integer part sorts before it
                return Ok(integer.to_string());
            }
            match decrement_integer(integer)? {
                Some(result) => Ok(result),
                None => RangeExhaustedSnafu { next }.fail(),
            }
        }
        (Some(prev), None) => {
            let integer = integer_part(prev)?;
            let fraction = &prev[integer.len()..];
            match increment_integer(integer)? {
                Some(result) => Ok(result),
                None => {
                    let tail = midpoint(fraction, None)?;
                    Ok(format!("{integer}{tail}"))
                }
            }
        }
        (Some(prev), Some(next)) => {
            let prev_integer = integer_part(prev)?;
            let prev_fraction = &prev[prev_integer.len()..];
            let next_integer = integer_part(next)?;
            let next_fraction = &next[next_integer.len()..];
            if prev_integer == next_integer {
                let tail = midpoint(prev_fraction, Some(next_fraction))?;
                return Ok(format!("{prev_integer}{tail}"));
            }
            match increment_integer(prev_integer)? {
                Some(incremented) if incremented.as_str() < next => Ok(incremented),
                _ => {
                    let tail = midpoint(prev_fraction, None)?;
                    Ok(format!("{prev_integer}{tail}"))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn between(prev: Option<&str>, next: Option<&str>) -> String {
        key_between(prev, next).expect("key generation should succeed")
    }

    #[test]
    fn no_context_yields_initial_key() {
        assert_eq!(between(None, None), "a0");
    }

    #[test]
    fn append_increments_integer_part() {
        assert_eq!(between(Some("a0"), None), "a1");
        assert_eq!(between(Some("a1"), None), "a2");
        assert_eq!(between(Some("a9"), None), "aA");
        assert_eq!(between(Some("az"), None), "b00");
        assert_eq!(between(Some("b0z"), None), "b10");
    }

    #[test]
    fn prepend_decrements_integer_part() {
        assert_eq!(between(None, Some("a0")), "Zz");
        assert_eq!(between(None, Some("Zz")), "Zy");
        assert_eq!(between(None, Some("Z0")), "Yzz");
    }

    #[test]
    fn prepend_before_fractional_key_uses_integer_part() {
        // the bare integer part of "a0V" sorts before it
        assert_eq!(between(None, Some("a0V")), "a0");
    }

    #[test]
    fn between_distinct_integer_parts() {
        // "a1" + 1 = "a2" which is not < "a2", so bisect above "a1"
        let key = between(Some("a1"), Some("a2"));
        assert_eq!(key, "a1V");
        // room between integer parts: take the incremented integer
        assert_eq!(between(Some("a1"), Some("a5")), "a2");
    }

    #[test]
    fn between_same_integer_part_bisects_fraction() {
        let key = between(Some("a0"), Some("a0V"));
        assert!("a0" < key.as_str() && key.as_str() < "a0V", "got {key}");
    }

    #[test]
    fn prefix_boundary_extends_key_length() {
        // no single digit fits between "a0" and "a01": extend instead
        let key = between(Some("a0"), Some("a01"));
        assert!("a0" < key.as_str() && key.as_str() < "a01", "got {key}");
        assert!(key.len() > 3);
    }

    #[test]
    fn result_is_strictly_inside_bounds() {
        let pairs = [
            ("a0", "a1"),
            ("a0", "a0V"),
            ("a1V", "a2"),
            ("Zz", "a0"),
            ("a0V", "a0t"),
            ("b00", "b01"),
        ];
        for (prev, next) in pairs {
            let key = between(Some(prev), Some(next));
            assert!(
                prev < key.as_str() && key.as_str() < next,
                "{prev} < {key} < {next} violated"
            );
            validate_key(&key).expect("generated key must be well formed");
        }
    }

    #[test]
    fn chained_appends_are_strictly_increasing() {
        let mut prev = between(None, None);
        for _ in 0..500 {
            let next = between(Some(&prev), None);
            assert!(prev < next, "{prev} !< {next}");
            prev = next;
        }
    }

    #[test]
    fn chained_prepends_are_strictly_decreasing() {
        let mut next = between(None, None);
        for _ in 0..200 {
            let prev = between(None, Some(&next));
            assert!(prev < next, "{prev} !< {next}");
            next = prev;
        }
    }

    #[test]
    fn repeated_bisection_never_errors() {
        // adversarial midpoint insertion at the same pair grows length
        let mut low = between(None, None);
        let high = between(Some(&low), None);
        for _ in 0..100 {
            let mid = between(Some(&low), Some(&high));
            assert!(low < mid && mid < high);
            low = mid;
        }
        assert!(low.len() > 10);
    }

    #[test]
    fn misordered_bounds_are_rejected() {
        assert!(key_between(Some("a1"), Some("a1")).is_err());
        assert!(key_between(Some("a2"), Some("a1")).is_err());
    }

    #[test]
    fn malformed_keys_are_rejected() {
        assert!(key_between(Some("!!"), None).is_err());
        assert!(key_between(None, Some("a10")).is_err());
        assert!(key_between(Some(SMALLEST_INTEGER), None).is_err());
    }

    #[test]
    fn generated_keys_never_equal_a_boundary() {
        let key = between(Some("a0"), Some("a01"));
        assert_ne!(key, "a0");
        assert_ne!(key, "a01");
    }
}
