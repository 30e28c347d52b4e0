// src/error.rs

use core::fmt;

/// Error returned by [`try_push`](crate::BoundedChannel::try_push) when the
/// item could not be enqueued immediately. The rejected item is handed back
/// to the caller in either case.
///
/// Neither variant is a fault: both are normal outcomes of a non-blocking
/// attempt, and the caller decides whether to retry, drop, or apply
/// backpressure upstream.
#[derive(PartialEq, Eq, Clone)]
pub enum TryPushError<T> {
  /// The ring is at capacity; no slot is free for the item.
  Full(T),
  /// Another producer currently holds the producer gate. Says nothing about
  /// how full the ring is.
  Busy(T),
}

impl<T> TryPushError<T> {
  /// Consumes the error, returning the rejected item.
  #[inline]
  pub fn into_inner(self) -> T {
    match self {
      TryPushError::Full(v) => v,
      TryPushError::Busy(v) => v,
    }
  }

  /// Returns `true` if the attempt failed because the ring was at capacity.
  #[inline]
  pub fn is_full(&self) -> bool {
    matches!(self, TryPushError::Full(_))
  }

  /// Returns `true` if the attempt failed because the producer gate was held.
  #[inline]
  pub fn is_busy(&self) -> bool {
    matches!(self, TryPushError::Busy(_))
  }
}

impl<T> fmt::Debug for TryPushError<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TryPushError::Full(_) => write!(f, "TryPushError::Full(..)"),
      TryPushError::Busy(_) => write!(f, "TryPushError::Busy(..)"),
    }
  }
}

impl<T> fmt::Display for TryPushError<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TryPushError::Full(_) => f.write_str("ring full"),
      TryPushError::Busy(_) => f.write_str("producer gate contended"),
    }
  }
}

impl<T: fmt::Debug> std::error::Error for TryPushError<T> {}
