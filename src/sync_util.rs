//! Minimal helpers around std::thread::park/unpark.
//! The channel core manages all of the parked/armed state itself.

use std::thread;

/// Parks the current thread.
#[inline]
pub(crate) fn park_thread() {
  thread::park();
}

/// Unparks the given thread.
#[inline]
pub(crate) fn unpark_thread(thread: &thread::Thread) {
  thread.unpark();
}
