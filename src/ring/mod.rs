// src/ring/mod.rs

//! A bounded MPMC ring channel gated by two independent mutexes.
//!
//! The ring holds a fixed number of pre-initialized slots. All producers
//! serialize through the producer gate and all consumers through the consumer
//! gate, so at most one thread per side is ever mid-operation, while the two
//! sides stay off each other's lock. The only cross-side state is an atomic
//! occupancy count whose acquire-release updates publish slot writes to the
//! opposite side.
//!
//! Elements must be `Default`: slots are created with `T::default()` and a
//! dequeue extracts by `mem::take`, leaving the slot in the default state
//! until the next enqueue overwrites it in place. No slot is ever
//! deallocated or reallocated over the life of the channel.
//!
//! ### Waiting
//!
//! A blocking operation that finds the ring full (push) or empty (pop) spins
//! briefly, yields a few times, then parks its thread until the opposite side
//! makes progress. Blocking calls cannot be interrupted, cancelled, or given
//! a deadline; a push against a ring nobody drains blocks forever. Size the
//! ring and balance throughput accordingly, or use the non-blocking variants
//! and retry at the call site.

use crate::error::TryPushError;

mod backoff;
mod core;

use self::core::RingCore;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;

/// A handle to a fixed-capacity MPMC ring channel.
///
/// Handles are cheap to clone; every clone refers to the same ring. A thread
/// may use its handle to produce, consume, or both. There is no
/// close/disconnect state: the ring and its slots live until the last handle
/// is dropped.
#[derive(Debug)]
pub struct BoundedChannel<T: Send> {
  core: Arc<RingCore<T>>,
}

impl<T: Send> Clone for BoundedChannel<T> {
  fn clone(&self) -> Self {
    BoundedChannel {
      core: Arc::clone(&self.core),
    }
  }
}

/// Creates a new bounded ring channel with the given capacity.
///
/// `capacity` must be greater than 0. Panics if capacity is 0.
pub fn bounded<T: Default + Send>(capacity: usize) -> BoundedChannel<T> {
  BoundedChannel {
    core: Arc::new(RingCore::new_internal(capacity)),
  }
}

impl<T: Default + Send> BoundedChannel<T> {
  /// Adds `value` to the tail of the ring, blocking the current thread while
  /// the ring is at capacity.
  ///
  /// The wait is uninterruptible: if no consumer ever frees a slot, this
  /// call never returns.
  pub fn push(&self, value: T) {
    let mut cursor = self.core.producer_gate.lock();
    loop {
      if self.core.has_space() {
        break;
      }
      if backoff::spin_then_yield(|| self.core.has_space()) {
        break;
      }

      // Arm the parker, then re-check: a consumer that freed a slot before
      // seeing the flag would otherwise leave us parked with space available.
      unsafe {
        *self.core.producer_thread.get() = Some(thread::current());
      }
      self.core.producer_parked.store(true, Ordering::Release);

      if self.core.has_space() {
        self.core.disarm_producer();
        continue;
      }

      crate::sync_util::park_thread();

      // Spurious wakeups leave the flag armed; disarm before looping.
      if self.core.producer_parked.load(Ordering::Relaxed) {
        self.core.disarm_producer();
      }
    }

    unsafe { self.core.write_slot(*cursor, value) };
    *cursor = cursor.wrapping_add(1);
    self.core.occupied.fetch_add(1, Ordering::AcqRel);
    drop(cursor);

    self.core.wake_consumer();
  }

  /// Attempts to add `value` to the tail of the ring without blocking.
  ///
  /// # Errors
  ///
  /// - `Err(TryPushError::Busy(value))` if another producer holds the gate.
  /// - `Err(TryPushError::Full(value))` if the ring is at capacity.
  pub fn try_push(&self, value: T) -> Result<(), TryPushError<T>> {
    let Some(mut cursor) = self.core.producer_gate.try_lock() else {
      return Err(TryPushError::Busy(value));
    };
    if !self.core.has_space() {
      return Err(TryPushError::Full(value));
    }

    unsafe { self.core.write_slot(*cursor, value) };
    *cursor = cursor.wrapping_add(1);
    self.core.occupied.fetch_add(1, Ordering::AcqRel);
    drop(cursor);

    self.core.wake_consumer();
    Ok(())
  }

  /// Removes and returns the oldest value in the ring, blocking the current
  /// thread while the ring is empty.
  ///
  /// The vacated slot is left holding `T::default()`.
  ///
  /// The wait is uninterruptible: if no producer ever delivers, this call
  /// never returns.
  pub fn pop(&self) -> T {
    let mut cursor = self.core.consumer_gate.lock();
    loop {
      if self.core.has_items() {
        break;
      }
      if backoff::spin_then_yield(|| self.core.has_items()) {
        break;
      }

      unsafe {
        *self.core.consumer_thread.get() = Some(thread::current());
      }
      self.core.consumer_parked.store(true, Ordering::Release);

      if self.core.has_items() {
        self.core.disarm_consumer();
        continue;
      }

      crate::sync_util::park_thread();

      if self.core.consumer_parked.load(Ordering::Relaxed) {
        self.core.disarm_consumer();
      }
    }

    let value = unsafe { self.core.take_slot(*cursor) };
    *cursor = cursor.wrapping_add(1);
    self.core.occupied.fetch_sub(1, Ordering::AcqRel);
    drop(cursor);

    self.core.wake_producer();
    value
  }

  /// Attempts to remove the oldest value in the ring without blocking.
  ///
  /// Returns `None` if the ring is empty or another consumer holds the gate.
  /// The emptiness snapshot taken before the gate is re-verified after the
  /// gate is won: another consumer may have drained the last item between
  /// the two, and reading a slot on the stale snapshot would hand out a
  /// placeholder value.
  pub fn try_pop(&self) -> Option<T> {
    // Fast path: stay off the gate entirely when the ring looks empty.
    if self.core.len_relaxed() == 0 {
      return None;
    }
    let mut cursor = self.core.consumer_gate.try_lock()?;
    if !self.core.has_items() {
      return None;
    }

    let value = unsafe { self.core.take_slot(*cursor) };
    *cursor = cursor.wrapping_add(1);
    self.core.occupied.fetch_sub(1, Ordering::AcqRel);
    drop(cursor);

    self.core.wake_producer();
    Some(value)
  }
}

impl<T: Send> BoundedChannel<T> {
  /// Returns the number of items currently in the ring.
  ///
  /// This is a relaxed snapshot; under concurrent traffic it may be stale by
  /// the time the caller acts on it.
  #[inline]
  pub fn len(&self) -> usize {
    self.core.len_relaxed()
  }

  /// Returns `true` if the ring currently holds no items.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Returns `true` if the ring is currently at capacity.
  #[inline]
  pub fn is_full(&self) -> bool {
    self.len() == self.core.capacity
  }

  /// Returns the fixed capacity of the ring.
  #[inline]
  pub fn capacity(&self) -> usize {
    self.core.capacity
  }
}
