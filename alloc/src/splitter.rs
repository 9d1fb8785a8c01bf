//! Splitting a block down into two buddies of the next smaller class.
//!
//! Grounded on `my_mem.c`'s `split_free_block`: pop one block of class `k`,
//! carve it into two class-`(k-1)` halves at `block` and `block + 2^(k-1)`,
//! and push both onto the `k-1` free list.

use core::ptr::NonNull;

use crate::header::BlockHeader;
use crate::registry;

/// Split the head of free class `k` into two free blocks of class `k - 1`.
///
/// # Safety
/// `k >= 1` and free class `k` must be non-empty.
pub unsafe fn split(
    free_heads: &mut [Option<NonNull<BlockHeader>>],
    num_free: &mut [usize],
    k: usize,
) {
    debug_assert!(k >= 1, "split: class 0 cannot be split further");
    debug_assert!(num_free[k] >= 1, "split: class {k} has no free block to split");

    let block = registry::pop(&mut free_heads[k], &mut num_free[k])
        .expect("split: precondition violated, free class was empty");

    let half = 1usize << (k - 1);
    let second = unsafe {
        NonNull::new_unchecked((block.as_ptr() as *mut u8).add(half) as *mut BlockHeader)
    };

    unsafe {
        registry::push(&mut free_heads[k - 1], &mut num_free[k - 1], block, (k - 1) as u8);
        registry::push(&mut free_heads[k - 1], &mut num_free[k - 1], second, (k - 1) as u8);
    }
}
