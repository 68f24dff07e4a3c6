use super::types::PTS_HZ;
use crate::error::{DemuxError, Result};
use std::num::NonZeroU64;

const I32_MAX: u64 = i32::MAX as u64;

/// Computes `a * b / c` rounded half up, exact over the whole `u64` range.
///
/// Results that do not fit into 64 bits saturate at `u64::MAX`.
///
/// ```
/// use std::num::NonZeroU64;
/// use tsdemux::format::ts::rescale;
///
/// let c = NonZeroU64::new(90_000).unwrap();
/// assert_eq!(rescale(90_000, 1_000_000, c), 1_000_000);
/// assert_eq!(rescale(0, 1_000_000, c), 0);
/// ```
pub fn rescale(a: u64, b: u64, c: NonZeroU64) -> u64 {
    let c = c.get();
    let r = c / 2;

    if b <= I32_MAX && c <= I32_MAX {
        if a <= I32_MAX {
            // a * b < 2^62, no overflow possible
            return (a * b + r) / c;
        }
        // split so that only the remainder part is rounded
        let split = (a / c)
            .checked_mul(b)
            .and_then(|whole| whole.checked_add((a % c * b + r) / c));
        if let Some(value) = split {
            return value;
        }
    }

    let wide = (a as u128 * b as u128 + r as u128) / c as u128;
    u64::try_from(wide).unwrap_or(u64::MAX)
}

/// Converts timestamps between two clock rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rescaler {
    from: NonZeroU64,
    to: u64,
}

impl Rescaler {
    /// Converts from `from` ticks per second to `to` ticks per second.
    pub fn new(from: u64, to: u64) -> Result<Self> {
        let from = NonZeroU64::new(from)
            .ok_or_else(|| DemuxError::Config("source clock rate must be non-zero".into()))?;
        if to == 0 {
            return Err(DemuxError::Config(
                "target clock rate must be non-zero".into(),
            ));
        }
        Ok(Self { from, to })
    }

    /// Converts 90 kHz PTS/DTS values to `time_base` ticks per second.
    pub fn from_pts(time_base: u64) -> Result<Self> {
        Self::new(PTS_HZ, time_base)
    }

    /// The reverse conversion.
    pub fn inverse(&self) -> Self {
        Self {
            // `to` was checked non-zero in `new`
            from: NonZeroU64::new(self.to).unwrap_or(NonZeroU64::MIN),
            to: self.from.get(),
        }
    }

    /// Converts `value`, rounding half up.
    pub fn rescale(&self, value: u64) -> u64 {
        rescale(value, self.to, self.from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quickcheck_macros::quickcheck;

    fn nz(v: u64) -> NonZeroU64 {
        NonZeroU64::new(v).unwrap()
    }

    #[test]
    fn test_small_values() {
        let rescaler = Rescaler::from_pts(1_000_000).unwrap();
        assert_eq!(rescaler.rescale(0), 0);
        assert_eq!(rescaler.rescale(90_000), 1_000_000);
        assert_eq!(rescaler.rescale(1), 11); // 11.11 rounds down
        assert_eq!(rescaler.rescale(9), 100);
        // 0.5 rounds up
        assert_eq!(rescale(1, 1, nz(2)), 1);
        assert_eq!(rescale(3, 1, nz(2)), 2);
    }

    #[test]
    fn test_full_33_bit_range() {
        let rescaler = Rescaler::from_pts(1_000_000).unwrap();
        let max = (1u64 << 33) - 1;
        let expected = ((max as u128 * 1_000_000 + 45_000) / 90_000) as u64;
        assert_eq!(rescaler.rescale(max), expected);
    }

    #[test]
    fn test_large_inputs_use_wide_path() {
        assert_eq!(rescale(u64::MAX, 1, nz(1)), u64::MAX);
        assert_eq!(rescale(u64::MAX, 90_000, nz(1_000_000)), {
            ((u64::MAX as u128 * 90_000 + 500_000) / 1_000_000) as u64
        });
        // saturates instead of wrapping
        assert_eq!(rescale(u64::MAX, 1_000_000, nz(90_000)), u64::MAX);
        // divisor beyond 32 bits
        assert_eq!(rescale(1 << 40, 1 << 40, nz(1 << 41)), 1 << 39);
    }

    #[test]
    fn test_rejects_zero_rates() {
        assert!(Rescaler::new(0, 1).is_err());
        assert!(Rescaler::new(1, 0).is_err());
    }

    #[quickcheck]
    fn prop_round_trip_within_one_tick(value: u64) -> bool {
        let value = value & ((1u64 << 33) - 1);
        let forward = Rescaler::from_pts(1_000_000).unwrap();
        let back = forward.inverse();
        let restored = back.rescale(forward.rescale(value));
        restored.abs_diff(value) <= 1
    }

    #[quickcheck]
    fn prop_monotonic(a: u64, b: u64) -> bool {
        let rescaler = Rescaler::from_pts(1_000_000).unwrap();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        rescaler.rescale(lo) <= rescaler.rescale(hi)
    }

    #[quickcheck]
    fn prop_matches_wide_arithmetic(a: u64, b: u32, c: u32) -> bool {
        let c = c.max(1) as u64;
        let b = b as u64;
        let expected = (a as u128 * b as u128 + (c / 2) as u128) / c as u128;
        let expected = u64::try_from(expected).unwrap_or(u64::MAX);
        rescale(a, b, nz(c)) == expected
    }
}
