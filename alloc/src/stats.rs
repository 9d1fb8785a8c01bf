//! Allocator-wide statistics snapshot.
//!
//! Grounded on `kernel_heap::HeapStats`/`print_heap_stats` for the shape
//! (counts plus smallest/largest block, plus a per-class breakdown table)
//! and on `my_mem.c`'s `mem_get_stats` for which numbers are tracked —
//! smallest and largest are reported separately for the free and used
//! pools rather than the teacher's single combined smallest/largest. The
//! payload-as-string dump in the original's `mem_print` is a
//! demonstration-driver concern and has no counterpart here.

use core::fmt;

use crate::classes::{MAX_CLASSES, payload_capacity};

/// Free/used counts for a single size class, one row of the table
/// [`Stats`]'s `Display` impl renders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassStats {
    pub class: u8,
    pub payload_capacity: usize,
    pub num_free: usize,
    pub num_used: usize,
}

impl fmt::Display for ClassStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "  class {:>2} (payload {:>8}): free {:>4} used {:>4}",
            self.class, self.payload_capacity, self.num_free, self.num_used
        )
    }
}

/// Snapshot of block counts and size extremes across every class, plus the
/// per-class breakdown itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub num_blocks_free: usize,
    pub num_blocks_used: usize,
    /// Payload capacity of the smallest free block, or `0` if none is free.
    pub smallest_block_free: usize,
    /// Payload capacity of the largest free block, or `0` if none is free.
    pub largest_block_free: usize,
    /// Payload capacity of the smallest used block, or `0` if none is used.
    pub smallest_block_used: usize,
    /// Payload capacity of the largest used block, or `0` if none is used.
    pub largest_block_used: usize,
    /// Highest populated index of `classes` (the allocator's `max_class`).
    pub max_class: usize,
    /// Free/used counts indexed by class; only `0..=max_class` is meaningful.
    pub classes: [ClassStats; MAX_CLASSES],
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            num_blocks_free: 0,
            num_blocks_used: 0,
            smallest_block_free: 0,
            largest_block_free: 0,
            smallest_block_used: 0,
            largest_block_used: 0,
            max_class: 0,
            classes: [ClassStats::default(); MAX_CLASSES],
        }
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "blocks free: {} (smallest {}, largest {})",
            self.num_blocks_free, self.smallest_block_free, self.largest_block_free)?;
        writeln!(f, "blocks used: {} (smallest {}, largest {})",
            self.num_blocks_used, self.smallest_block_used, self.largest_block_used)?;
        for row in &self.classes[..=self.max_class] {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_stats_are_all_zero() {
        let s = Stats::default();
        assert_eq!(s.num_blocks_free, 0);
        assert_eq!(s.num_blocks_used, 0);
    }

    #[test]
    fn display_renders_summary_and_per_class_table() {
        let mut s = Stats { num_blocks_free: 2, num_blocks_used: 1, smallest_block_free: 8,
            largest_block_free: 64, smallest_block_used: 32, largest_block_used: 32,
            max_class: 6, classes: [ClassStats::default(); MAX_CLASSES] };
        s.classes[5] = ClassStats { class: 5, payload_capacity: payload_capacity(5), num_free: 2, num_used: 0 };
        s.classes[6] = ClassStats { class: 6, payload_capacity: payload_capacity(6), num_free: 0, num_used: 1 };

        let rendered = format!("{s}");
        assert!(rendered.contains("blocks free: 2"));
        assert!(rendered.contains("class  5"));
        assert!(rendered.contains("class  6"));
    }
}
