//! Buddy coalescing.
//!
//! Grounded on `my_mem.c`'s `try_merge`/`try_defrag`: after a block of
//! class `k` is freed, walk free class `k`'s list looking for its buddy —
//! the block at the same address with the low bit of its class-`k` index
//! flipped, i.e. `2^k` bytes away and aligned to `2^(k+1)`. If found, unlink
//! both, push the merged block onto class `k + 1`, and recurse upward. Stop
//! at the first successful merge per level, same as the original.

use core::ptr::NonNull;

use crate::header::BlockHeader;
use crate::registry;

/// Address-ordered buddy test: `lo` and `hi` (in address order) are buddies
/// of class `k` iff they are exactly `2^k` bytes apart and `lo`'s offset
/// from `region_base` is a multiple of `2^(k+1)`.
fn are_buddies(region_base: *mut u8, lo: NonNull<BlockHeader>, hi: NonNull<BlockHeader>, k: usize) -> bool {
    let block_size = 1usize << k;
    let lo_addr = lo.as_ptr() as usize;
    let hi_addr = hi.as_ptr() as usize;
    if hi_addr.wrapping_sub(lo_addr) != block_size {
        return false;
    }
    let lo_offset = lo_addr - region_base as usize;
    lo_offset % (block_size * 2) == 0
}

/// Attempt one merge at class `k`. Returns `true` if a pair was merged into
/// class `k + 1`.
fn try_merge(
    free_heads: &mut [Option<NonNull<BlockHeader>>],
    num_free: &mut [usize],
    region_base: *mut u8,
    k: usize,
) -> bool {
    let Some(head) = free_heads[k] else { return false };
    let mut candidate = unsafe { head.as_ref().next };
    while let Some(other) = candidate {
        let (lo, hi) = if (head.as_ptr() as usize) < (other.as_ptr() as usize) {
            (head, other)
        } else {
            (other, head)
        };
        if are_buddies(region_base, lo, hi, k) {
            unsafe {
                registry::unlink(&mut free_heads[k], &mut num_free[k], head);
                registry::unlink(&mut free_heads[k], &mut num_free[k], other);
                registry::push(&mut free_heads[k + 1], &mut num_free[k + 1], lo, (k + 1) as u8);
            }
            return true;
        }
        candidate = unsafe { other.as_ref().next };
    }
    false
}

/// Recursively coalesce starting at class `k`, stopping as soon as a level
/// produces no merge (or `k` reaches the top class).
pub fn coalesce(
    free_heads: &mut [Option<NonNull<BlockHeader>>],
    num_free: &mut [usize],
    region_base: *mut u8,
    max_class: usize,
    k: usize,
) {
    if k >= max_class || num_free[k] < 2 {
        return;
    }
    if try_merge(free_heads, num_free, region_base, k) {
        coalesce(free_heads, num_free, region_base, max_class, k + 1);
    }
}
