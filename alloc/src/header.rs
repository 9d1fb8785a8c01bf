//! In-band block header.
//!
//! Every block — free or used — begins with one of these. It is the only
//! metadata the allocator keeps about a block; there is no side table. This
//! mirrors the original `my_mem.c` `Block` struct (`next`, `prev`,
//! `size_pow2`) exactly, with `size_pow2` narrowed from `size_t` to `u8`
//! since a class index never exceeds [`MAX_CLASSES`](crate::MAX_CLASSES).

use core::ptr::NonNull;

/// Header placed at the base of every block.
///
/// `prev`/`next` link the block into whichever list — free or used, both
/// indexed by `size_class` — currently owns it. A block is never on both
/// lists at once and never on neither.
#[repr(C)]
pub struct BlockHeader {
    pub prev: Option<NonNull<BlockHeader>>,
    pub next: Option<NonNull<BlockHeader>>,
    pub size_class: u8,
}

/// Size, in bytes, of the in-band header. Every block of class `k` has
/// `2^k - HEADER_SIZE` bytes of usable payload.
pub const HEADER_SIZE: usize = core::mem::size_of::<BlockHeader>();

/// Recover the header of the block that owns `payload`.
///
/// # Safety
/// `payload` must have been returned by `allocate` on this allocator and
/// must not have already been freed.
#[inline]
pub unsafe fn header_of(payload: *mut u8) -> NonNull<BlockHeader> {
    unsafe { NonNull::new_unchecked(payload.sub(HEADER_SIZE) as *mut BlockHeader) }
}

/// Compute the payload pointer handed to callers for a block at `header`.
#[inline]
pub fn payload_of(header: NonNull<BlockHeader>) -> *mut u8 {
    unsafe { (header.as_ptr() as *mut u8).add(HEADER_SIZE) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_and_header_round_trip() {
        let mut buf = [0u8; 64];
        let header = unsafe { NonNull::new_unchecked(buf.as_mut_ptr() as *mut BlockHeader) };
        let payload = payload_of(header);
        let recovered = unsafe { header_of(payload) };
        assert_eq!(recovered, header);
    }
}
