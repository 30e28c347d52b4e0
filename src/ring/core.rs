use crate::internal::cache_padded::CachePadded;
use crate::sync_util;

use parking_lot::Mutex;
use std::cell::UnsafeCell;
use std::fmt;
use std::sync::atomic::{self, AtomicBool, AtomicUsize, Ordering};
use std::thread::Thread;

/// Shared state of a bounded ring channel.
///
/// Ownership of the mutable state is split by side: each gate mutex guards
/// its side's cursor, so only the thread holding `producer_gate` can advance
/// the write cursor (and write slots), and only the holder of `consumer_gate`
/// can advance the read cursor (and take slots). `occupied` is the single
/// piece of state read and written across sides, and is therefore the only
/// atomic; its acquire-release updates are what publish a slot write to the
/// consumer that observes the incremented count.
pub(crate) struct RingCore<T> {
  pub(crate) slots: Box<[UnsafeCell<T>]>,
  pub(crate) capacity: usize,

  /// Number of enqueued, not-yet-dequeued items. Always in `0..=capacity`.
  pub(crate) occupied: CachePadded<AtomicUsize>,

  /// Serializes producers. The guarded value is the write cursor: a
  /// monotonically increasing logical position, wrapping at usize::MAX;
  /// the physical slot is `cursor % capacity`.
  pub(crate) producer_gate: CachePadded<Mutex<usize>>,
  /// Serializes consumers. The guarded value is the read cursor.
  pub(crate) consumer_gate: CachePadded<Mutex<usize>>,

  // --- Producer waiting state (armed only by the producer gate holder) ---
  pub(crate) producer_parked: CachePadded<AtomicBool>,
  pub(crate) producer_thread: CachePadded<UnsafeCell<Option<Thread>>>,

  // --- Consumer waiting state (armed only by the consumer gate holder) ---
  pub(crate) consumer_parked: CachePadded<AtomicBool>,
  pub(crate) consumer_thread: CachePadded<UnsafeCell<Option<Thread>>>,
}

// The gate/count protocol synchronizes all access to `slots` and the thread
// stashes; T only ever moves across threads whole.
unsafe impl<T: Send> Send for RingCore<T> {}
unsafe impl<T: Send> Sync for RingCore<T> {}

impl<T: Default> RingCore<T> {
  /// Builds the shared core with `capacity` default-initialized slots.
  pub(crate) fn new_internal(capacity: usize) -> Self {
    assert!(capacity > 0, "ring channel capacity must be greater than 0");
    let mut slots = Vec::with_capacity(capacity);
    for _ in 0..capacity {
      slots.push(UnsafeCell::new(T::default()));
    }
    RingCore {
      slots: slots.into_boxed_slice(),
      capacity,
      occupied: CachePadded::new(AtomicUsize::new(0)),
      producer_gate: CachePadded::new(Mutex::new(0)),
      consumer_gate: CachePadded::new(Mutex::new(0)),
      producer_parked: CachePadded::new(AtomicBool::new(false)),
      producer_thread: CachePadded::new(UnsafeCell::new(None)),
      consumer_parked: CachePadded::new(AtomicBool::new(false)),
      consumer_thread: CachePadded::new(UnsafeCell::new(None)),
    }
  }
}

impl<T> RingCore<T> {
  #[inline]
  pub(crate) fn len_relaxed(&self) -> usize {
    self.occupied.load(Ordering::Relaxed)
  }

  #[inline]
  pub(crate) fn has_space(&self) -> bool {
    self.occupied.load(Ordering::Acquire) < self.capacity
  }

  #[inline]
  pub(crate) fn has_items(&self) -> bool {
    self.occupied.load(Ordering::Acquire) > 0
  }

  /// Writes `value` into the slot for `cursor`, dropping the vacated
  /// placeholder that was left there by the matching take (or by
  /// construction).
  ///
  /// # Safety
  ///
  /// Caller must hold `producer_gate` and have verified `occupied < capacity`
  /// since acquiring it.
  #[inline]
  pub(crate) unsafe fn write_slot(&self, cursor: usize, value: T) {
    *self.slots[cursor % self.capacity].get() = value;
  }

  /// Moves the value out of the slot for `cursor`, leaving `T::default()`
  /// in its place so the slot can be reused without deallocation.
  ///
  /// # Safety
  ///
  /// Caller must hold `consumer_gate` and have verified `occupied > 0` since
  /// acquiring it.
  #[inline]
  pub(crate) unsafe fn take_slot(&self, cursor: usize) -> T
  where
    T: Default,
  {
    std::mem::take(&mut *self.slots[cursor % self.capacity].get())
  }

  /// Wakes the consumer-side waiter, if one is parked.
  ///
  /// Whoever wins the true-to-false CAS on the parked flag owns the stashed
  /// thread handle and is responsible for the unpark; a lost CAS means the
  /// waiter was already woken (or disarmed itself).
  #[inline]
  pub(crate) fn wake_consumer(&self) {
    if self.consumer_parked.load(Ordering::Relaxed) {
      atomic::fence(Ordering::Acquire);
      if self
        .consumer_parked
        .compare_exchange(true, false, Ordering::AcqRel, Ordering::Relaxed)
        .is_ok()
      {
        if let Some(thread_handle) = unsafe { (*self.consumer_thread.get()).take() } {
          sync_util::unpark_thread(&thread_handle);
        }
      }
    }
  }

  /// Wakes the producer-side waiter, if one is parked.
  #[inline]
  pub(crate) fn wake_producer(&self) {
    if self.producer_parked.load(Ordering::Relaxed) {
      atomic::fence(Ordering::Acquire);
      if self
        .producer_parked
        .compare_exchange(true, false, Ordering::AcqRel, Ordering::Relaxed)
        .is_ok()
      {
        if let Some(thread_handle) = unsafe { (*self.producer_thread.get()).take() } {
          sync_util::unpark_thread(&thread_handle);
        }
      }
    }
  }

  /// Clears the producer parked flag and thread stash if no waker claimed
  /// them first. Only the producer gate holder may call this.
  #[inline]
  pub(crate) fn disarm_producer(&self) {
    if self
      .producer_parked
      .compare_exchange(true, false, Ordering::AcqRel, Ordering::Relaxed)
      .is_ok()
    {
      unsafe {
        *self.producer_thread.get() = None;
      }
    }
  }

  /// Consumer-side counterpart of [`disarm_producer`](Self::disarm_producer).
  #[inline]
  pub(crate) fn disarm_consumer(&self) {
    if self
      .consumer_parked
      .compare_exchange(true, false, Ordering::AcqRel, Ordering::Relaxed)
      .is_ok()
    {
      unsafe {
        *self.consumer_thread.get() = None;
      }
    }
  }
}

impl<T> fmt::Debug for RingCore<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("RingCore")
      .field("capacity", &self.capacity)
      .field("occupied", &self.occupied.load(Ordering::Relaxed))
      .field(
        "producer_parked",
        &self.producer_parked.load(Ordering::Relaxed),
      )
      .field(
        "consumer_parked",
        &self.consumer_parked.load(Ordering::Relaxed),
      )
      .finish_non_exhaustive()
  }
}
