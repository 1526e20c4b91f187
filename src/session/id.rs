//! Session identifier generation

use chrono::Utc;
use rand::Rng;

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of the random part of a session id
const RANDOM_SUFFIX_LEN: usize = 11;

/// Encode `value` in lowercase base 36
pub fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

/// Generate a new session identifier
///
/// The id is the current Unix time in milliseconds in base 36 followed by a
/// random base-36 suffix. No check against existing keys is made.
///
/// # Examples
///
/// ```
/// use solace::session::generate_id;
///
/// let id = generate_id();
/// assert!(id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
/// assert_ne!(id, generate_id());
/// ```
pub fn generate_id() -> String {
    let millis = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
    let mut rng = rand::rng();
    let suffix: String = (0..RANDOM_SUFFIX_LEN)
        .map(|_| BASE36_DIGITS[rng.random_range(0..36)] as char)
        .collect();

    format!("{}{}", to_base36(millis), suffix)
}
