//! Size-class arithmetic.
//!
//! A class `k` denotes a block of `2^k` bytes total, `2^k - HEADER_SIZE`
//! bytes of which are usable payload. Grounded on `my_mem.c`'s inline
//! `pow2` search in `alloc_block`, rewritten here as a closed-form
//! computation via [`ceil_log2`](buddyalloc_support::ceil_log2) rather than
//! a linear scan.

use buddyalloc_support::ceil_log2;

use crate::header::HEADER_SIZE;

/// Largest class index a region of any size can need on this target.
pub const MAX_CLASSES: usize = usize::BITS as usize;

/// Smallest class `k` whose payload capacity (`2^k - HEADER_SIZE`) can hold
/// `n` bytes.
///
/// Precondition: `n >= 1`.
#[inline]
pub fn class_for(n: usize) -> usize {
    debug_assert!(n >= 1, "class_for: zero-size request must be handled by the caller");
    let required = n + HEADER_SIZE;
    ceil_log2(required) as usize
}

/// Total size in bytes of a block of class `k` (header + payload).
#[inline]
pub const fn class_size(k: usize) -> usize {
    1usize << k
}

/// Usable payload capacity of a block of class `k`.
#[inline]
pub const fn payload_capacity(k: usize) -> usize {
    class_size(k) - HEADER_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_for_matches_capacity() {
        for n in 1..=4096usize {
            let k = class_for(n);
            assert!(payload_capacity(k) >= n, "class {k} too small for {n} bytes");
            if k > 0 {
                assert!(
                    payload_capacity(k - 1) < n,
                    "class {} should not have sufficed for {n} bytes",
                    k - 1
                );
            }
        }
    }

    #[test]
    fn class_size_is_power_of_two() {
        for k in 0..16 {
            assert_eq!(class_size(k), 1 << k);
            assert_eq!(payload_capacity(k) + HEADER_SIZE, class_size(k));
        }
    }
}
