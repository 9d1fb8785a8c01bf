#![cfg_attr(not(test), no_std)]

//! Ambient utility crate for [`buddyalloc-core`](../buddyalloc_core/index.html):
//! a logging façade and alignment/bit helpers, split out the same way
//! `slopos-lib` is split out from `slopos-mm` in the teacher crate.

pub mod alignment;
pub mod klog;

#[doc(hidden)]
pub use paste;

pub use alignment::{align_down_usize, align_up_usize, ceil_log2, floor_log2};
pub use klog::{KlogLevel, klog_get_level, klog_is_enabled, klog_register_backend, klog_set_level};
