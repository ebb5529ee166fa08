use std::time::{SystemTime, UNIX_EPOCH};

use ulid::Ulid;

/// Returns current unix epoch milliseconds (0 if the clock is before the epoch).
pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|dur| dur.as_millis() as i64)
        .unwrap_or(0)
}

/// Generates a new ULID.
pub fn new_ulid() -> Ulid {
    Ulid::new()
}

/// Rounds half away from zero and converts to an integer.
///
/// The cast saturates, so NaN becomes 0 and infinities clamp to the i64 range.
pub(crate) fn round_i64(value: f64) -> i64 {
    value.round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_i64(2.5), 3);
        assert_eq!(round_i64(2.4999), 2);
        assert_eq!(round_i64(-2.5), -3);
    }

    #[test]
    fn non_finite_values_saturate() {
        assert_eq!(round_i64(f64::NAN), 0);
        assert_eq!(round_i64(f64::INFINITY), i64::MAX);
        assert_eq!(round_i64(f64::NEG_INFINITY), i64::MIN);
    }

    #[test]
    fn ulids_are_unique() {
        assert_ne!(new_ulid(), new_ulid());
        assert!(now_ms() > 0);
    }
}
