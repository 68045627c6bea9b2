//! Seeded coordinate hashing.

/// Largest `f64` strictly below 1.0.
pub(crate) const UNIT_MAX: f64 = 1.0 - f64::EPSILON / 2.0;

#[inline]
fn mix64(mut h: u64) -> u64 {
    h ^= h >> 30;
    h = h.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    h ^= h >> 27;
    h = h.wrapping_mul(0x94D0_49BB_1331_11EB);
    h ^ (h >> 31)
}

/// Scrambles an integer lattice coordinate into a uniform value in `[0, 1)`.
///
/// Pure function of `(seed, x, z)`; not suitable for anything cryptographic.
#[inline]
pub fn hash(seed: u64, x: i64, z: i64) -> f64 {
    let mut h = mix64(seed ^ 0x9E37_79B9_7F4A_7C15);
    h = mix64(h ^ (x as u64).wrapping_mul(0xD6E8_FEB8_6659_FD93));
    h = mix64(h ^ (z as u64).wrapping_mul(0xA076_1D64_78BD_642F));
    // Top 53 bits map exactly onto the f64 mantissa.
    (h >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_pure() {
        assert_eq!(hash(7, 3, -4), hash(7, 3, -4));
        assert_ne!(hash(7, 3, -4), hash(8, 3, -4));
        assert_ne!(hash(7, 3, -4), hash(7, -4, 3));
    }

    #[test]
    fn test_hash_range() {
        for seed in [0u64, 1, 42, u64::MAX] {
            for x in -20..20 {
                for z in -20..20 {
                    let v = hash(seed, x, z);
                    assert!((0.0..1.0).contains(&v), "hash({seed}, {x}, {z}) = {v}");
                }
            }
        }
        assert!(UNIT_MAX < 1.0);
    }

    #[test]
    fn test_hash_roughly_uniform() {
        let n = 10_000;
        let mean: f64 = (0..n).map(|i| hash(99, i, i * 7 + 1)).sum::<f64>() / n as f64;
        assert!((mean - 0.5).abs() < 0.02, "mean {mean} too far from 0.5");
    }
}
