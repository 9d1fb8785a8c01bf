//! The buddy allocator front end.
//!
//! Grounded on `my_mem.c`'s `mem_init`/`mem_reset`/`mem_max_alloc`/
//! `my_malloc`/`my_free`, with the global-state design replaced by an
//! explicit instance: `BuddyAllocator<'a>` borrows its backing region for
//! `'a` rather than reaching into a process-wide singleton the way
//! `kernel_heap`'s `KERNEL_HEAP` does. Concurrent access across threads is
//! out of scope, so there is no lock here — adding one would manufacture a
//! thread-safety guarantee this type does not make.

use core::marker::PhantomData;
use core::ptr::{self, NonNull};

use buddyalloc_support::{klog_debug, klog_trace};

use crate::classes::{MAX_CLASSES, class_for, payload_capacity};
use crate::coalescer;
use crate::header::{BlockHeader, HEADER_SIZE, header_of, payload_of};
use crate::registry;
use crate::splitter;
use crate::stats::{ClassStats, Stats};

pub(crate) type Heads = [Option<NonNull<BlockHeader>>; MAX_CLASSES];
pub(crate) type Counts = [usize; MAX_CLASSES];

/// A buddy allocator over a caller-owned region of memory.
///
/// `n == 0` requests and freeing a null pointer are both no-ops that return
/// cleanly rather than errors, matching `my_malloc(0)` and `my_free(NULL)`
/// in the original. Passing a pointer that was not returned by `allocate`
/// (or was already freed) to `free` is undefined behavior, same as the
/// original's unchecked pointer arithmetic — there is no side table to
/// validate against.
pub struct BuddyAllocator<'a> {
    region: *mut u8,
    region_len: usize,
    max_class: usize,
    free_heads: Heads,
    num_free: Counts,
    used_heads: Heads,
    num_used: Counts,
    _region: PhantomData<&'a mut [u8]>,
}

impl<'a> BuddyAllocator<'a> {
    /// Build an allocator over `region`, splitting it into the largest
    /// power-of-two blocks that fit (one block for each set bit of
    /// `region.len()` down to the smallest class that still has payload
    /// room for the header).
    pub fn new(region: &'a mut [u8]) -> Self {
        let len = region.len();
        debug_assert!(len > HEADER_SIZE, "new: region too small to hold a single block");
        let base = region.as_mut_ptr();
        Self::new_raw(base, len)
    }

    /// Re-decompose the same backing region from scratch, discarding every
    /// outstanding allocation. Matches `mem_reset`.
    pub fn reset(&mut self) {
        *self = Self::new_raw(self.region, self.region_len);
    }

    fn new_raw(base: *mut u8, len: usize) -> Self {
        let max_class = buddyalloc_support::floor_log2(len) as usize;
        let mut this = Self {
            region: base,
            region_len: len,
            max_class,
            free_heads: [None; MAX_CLASSES],
            num_free: [0; MAX_CLASSES],
            used_heads: [None; MAX_CLASSES],
            num_used: [0; MAX_CLASSES],
            _region: PhantomData,
        };
        this.decompose();
        klog_debug!("init: region of {} bytes, max class {}", len, max_class);
        this
    }

    /// Carve the region into free blocks, one per set bit of `region_len`
    /// from `max_class` down to the smallest class whose size still exceeds
    /// the header. Mirrors `split_initial_memory`.
    fn decompose(&mut self) {
        let mut cursor = 0usize;
        let mut k = self.max_class;
        loop {
            let block_size = 1usize << k;
            if block_size <= HEADER_SIZE {
                break;
            }
            if self.region_len & block_size != 0 {
                let block = unsafe { NonNull::new_unchecked(self.region.add(cursor) as *mut BlockHeader) };
                unsafe { registry::push(&mut self.free_heads[k], &mut self.num_free[k], block, k as u8) };
                cursor += block_size;
            }
            if k == 0 {
                break;
            }
            k -= 1;
        }
    }

    /// Largest request `allocate` can ever satisfy: `region_len - HEADER_SIZE`.
    /// Achievable only when `region_len` is itself a power of two.
    pub fn max_alloc(&self) -> usize {
        self.region_len.saturating_sub(HEADER_SIZE)
    }

    /// Allocate `n` bytes, returning a payload pointer or null.
    ///
    /// `n == 0` and requests larger than [`max_alloc`](Self::max_alloc)
    /// both return null without side effects. Otherwise, find the smallest
    /// free class at or above the class required for `n`, split it down one
    /// level at a time until a block of the required class is free, and
    /// hand that block to the caller's used list.
    pub fn allocate(&mut self, n: usize) -> *mut u8 {
        if n == 0 {
            return ptr::null_mut();
        }
        let required = class_for(n);
        if required > self.max_class {
            klog_debug!("allocate: {} bytes exceeds max class {}", n, self.max_class);
            return ptr::null_mut();
        }

        let mut k = required;
        while self.num_free[k] == 0 {
            if k == self.max_class {
                klog_debug!("allocate: out of memory for {} bytes", n);
                return ptr::null_mut();
            }
            k += 1;
        }

        while k > required {
            unsafe { splitter::split(&mut self.free_heads, &mut self.num_free, k) };
            k -= 1;
            klog_trace!("allocate: split down to class {k}");
        }

        let block = registry::pop(&mut self.free_heads[required], &mut self.num_free[required])
            .expect("allocate: class must be non-empty after search/split");
        unsafe {
            registry::push(&mut self.used_heads[required], &mut self.num_used[required], block, required as u8);
        }
        payload_of(block)
    }

    /// Return `ptr` to the allocator, coalescing it with its buddy (and
    /// that merge's buddy, and so on) as far as possible.
    ///
    /// `ptr == null` is a no-op, matching `my_free(NULL)`.
    ///
    /// # Safety
    /// `ptr` must have been returned by a prior call to `allocate` on this
    /// same allocator and must not already have been freed.
    pub unsafe fn free(&mut self, ptr: *mut u8) {
        if ptr.is_null() {
            return;
        }
        let block = unsafe { header_of(ptr) };
        let k = unsafe { block.as_ref().size_class } as usize;
        debug_assert!(k <= self.max_class, "free: corrupt size_class in header");

        unsafe { registry::unlink(&mut self.used_heads[k], &mut self.num_used[k], block) };
        unsafe { registry::push(&mut self.free_heads[k], &mut self.num_free[k], block, k as u8) };
        coalescer::coalesce(&mut self.free_heads, &mut self.num_free, self.region, self.max_class, k);
    }

    /// Snapshot block counts, size extremes, and the per-class breakdown
    /// across every class. `Stats`'s `Display` impl renders this as the
    /// table `kernel_heap::print_heap_stats` logs.
    pub fn stats(&self) -> Stats {
        let mut s = Stats::default();
        s.max_class = self.max_class;
        for k in 0..=self.max_class {
            s.num_blocks_free += self.num_free[k];
            s.num_blocks_used += self.num_used[k];
            s.classes[k] = ClassStats {
                class: k as u8,
                payload_capacity: payload_capacity(k),
                num_free: self.num_free[k],
                num_used: self.num_used[k],
            };
        }
        if let Some(k) = (0..=self.max_class).find(|&k| self.num_free[k] > 0) {
            s.smallest_block_free = payload_capacity(k);
        }
        if let Some(k) = (0..=self.max_class).rev().find(|&k| self.num_free[k] > 0) {
            s.largest_block_free = payload_capacity(k);
        }
        if let Some(k) = (0..=self.max_class).find(|&k| self.num_used[k] > 0) {
            s.smallest_block_used = payload_capacity(k);
        }
        if let Some(k) = (0..=self.max_class).rev().find(|&k| self.num_used[k] > 0) {
            s.largest_block_used = payload_capacity(k);
        }
        s
    }

    /// Log the stats table at info level, mirroring
    /// `kernel_heap::print_heap_stats`'s logging (minus the original
    /// `mem_print`'s payload-as-string dump, which belonged to its
    /// demonstration driver).
    pub fn log_stats(&self) {
        buddyalloc_support::klog::log_args(
            buddyalloc_support::KlogLevel::Info,
            format_args!("buddy allocator stats:\n{}", self.stats()),
        );
    }
}

#[cfg(test)]
impl<'a> BuddyAllocator<'a> {
    pub(crate) fn debug_region_base(&self) -> *mut u8 {
        self.region
    }

    pub(crate) fn debug_free_lists(&self) -> (&Heads, &Counts) {
        (&self.free_heads, &self.num_free)
    }

    pub(crate) fn debug_used_lists(&self) -> (&Heads, &Counts) {
        (&self.used_heads, &self.num_used)
    }
}
