use std::thread;

/// Emits a CPU instruction that signals the processor that it is in a spin loop.
#[inline(always)]
fn spin_hint() {
  std::hint::spin_loop();
}

/// The cheap phases of an adaptive wait: spin briefly, then yield the
/// timeslice a few times. Returns `true` as soon as `cond` holds, `false`
/// once both phases are exhausted, at which point the caller should arm the
/// parker and block for real.
///
/// Parking itself is not done here: the gate loops own the armed flag and
/// thread stash, and the re-check between arming and parking has to happen
/// against that state.
pub(crate) fn spin_then_yield<F>(cond: F) -> bool
where
  F: Fn() -> bool,
{
  // 1. Spinning Phase
  for _ in 0..10 {
    if cond() {
      return true;
    }
    spin_hint();
  }

  // 2. Yielding Phase
  for _ in 0..20 {
    if cond() {
      return true;
    }
    thread::yield_now();
  }

  false
}
