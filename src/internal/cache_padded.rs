// src/internal/cache_padded.rs

//! Utility for cache line padding.
//!
//! The hot fields of the ring core (the occupancy count, the two gates and
//! the parking state) are written from different threads; padding each to its
//! own cache line keeps one side's writes from invalidating the other side's
//! lines.

use core::fmt;
use core::ops::{Deref, DerefMut};

// 128 bytes covers the architectures that prefetch line pairs (recent
// aarch64, powerpc64); 64 is the common line size everywhere else.
#[cfg(any(target_arch = "aarch64", target_arch = "powerpc64"))]
const CACHE_LINE_SIZE: usize = 128;
#[cfg(not(any(target_arch = "aarch64", target_arch = "powerpc64")))]
const CACHE_LINE_SIZE: usize = 64;

/// A type `T` padded to the length of a cache line.
#[derive(Clone, Copy, Default, Hash, PartialEq, Eq)]
#[cfg_attr(any(target_arch = "aarch64", target_arch = "powerpc64"), repr(align(128)))]
#[cfg_attr(not(any(target_arch = "aarch64", target_arch = "powerpc64")), repr(align(64)))]
pub(crate) struct CachePadded<T> {
  value: T,
}

impl<T> CachePadded<T> {
  /// Creates a new cache-padded value.
  #[inline]
  pub(crate) const fn new(value: T) -> Self {
    CachePadded { value }
  }

  /// Returns the alignment used for padding on the current architecture.
  #[inline]
  pub(crate) const fn alignment_value() -> usize {
    CACHE_LINE_SIZE
  }
}

impl<T> Deref for CachePadded<T> {
  type Target = T;
  #[inline]
  fn deref(&self) -> &T {
    &self.value
  }
}

impl<T> DerefMut for CachePadded<T> {
  #[inline]
  fn deref_mut(&mut self) -> &mut T {
    &mut self.value
  }
}

impl<T: fmt::Debug> fmt::Debug for CachePadded<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("CachePadded")
      .field("value", &self.value)
      .field("alignment", &Self::alignment_value())
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use core::mem;

  #[test]
  fn alignment_check() {
    let padded = CachePadded::new(0u64);
    let expected = CachePadded::<u64>::alignment_value();
    assert_eq!(mem::align_of_val(&padded), expected);
    assert_eq!(&padded as *const _ as usize % expected, 0);
    assert_eq!(mem::size_of_val(&padded), expected);
  }

  #[test]
  fn const_constructor() {
    static PADDED: CachePadded<u32> = CachePadded::new(42);
    assert_eq!(*PADDED, 42);
  }

  #[test]
  fn deref_mut_works() {
    let mut p = CachePadded::new(String::from("hello"));
    p.push_str(" world");
    assert_eq!(*p, "hello world");
  }
}
