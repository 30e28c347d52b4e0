//! A fixed-capacity MPMC ring channel with independent producer and consumer gates.
//!
//! Gatering provides a single channel type, [`BoundedChannel`], backed by a
//! circular buffer of pre-initialized slots. Any number of producer and
//! consumer threads may share a channel; all producers serialize through one
//! mutex (the producer gate) and all consumers through another, so the two
//! sides never contend with each other on the fast path. A single atomic
//! occupancy count is the only state visible across sides.
//!
//! Both blocking ([`BoundedChannel::push`], [`BoundedChannel::pop`]) and
//! non-blocking ([`BoundedChannel::try_push`], [`BoundedChannel::try_pop`])
//! variants are offered. Blocking calls are uninterruptible: there is no
//! timeout, cancellation, or close/disconnect state in this design.

pub mod error;
pub mod ring;

// Internal utilities - not part of public API but exposed for crate use
mod internal;
mod sync_util;

pub use error::TryPushError;
pub use ring::{bounded, BoundedChannel};
