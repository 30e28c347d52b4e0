mod common;

use common::{BLOCK_DELAY, ITEMS_HIGH, ITEMS_MEDIUM};
use gatering::{bounded, TryPushError};
use serial_test::serial;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

#[test]
fn capacity_bound_holds() {
  const CAP: usize = 16;
  let ch = bounded::<usize>(CAP);

  let mut accepted = 0;
  for i in 0.. {
    match ch.try_push(i) {
      Ok(()) => accepted += 1,
      Err(TryPushError::Full(_)) => break,
      Err(e) => panic!("unexpected failure with no contention: {:?}", e),
    }
  }
  assert_eq!(accepted, CAP);
  assert_eq!(ch.len(), CAP);
  assert!(ch.is_full());
}

#[test]
fn spsc_fifo_order() {
  let ch = bounded::<usize>(64);
  let tx = ch.clone();

  let producer = thread::spawn(move || {
    for i in 0..ITEMS_HIGH {
      tx.push(i);
    }
  });

  for expected in 0..ITEMS_HIGH {
    assert_eq!(ch.pop(), expected);
  }
  producer.join().unwrap();
  assert!(ch.is_empty());
}

#[test]
fn exhaustion_leaves_len_unchanged() {
  const CAP: usize = 4;
  let ch = bounded::<u32>(CAP);

  for i in 0..CAP as u32 {
    ch.try_push(i).unwrap();
  }
  assert!(matches!(ch.try_push(99), Err(TryPushError::Full(99))));
  assert_eq!(ch.len(), CAP);

  for i in 0..CAP as u32 {
    assert_eq!(ch.try_pop(), Some(i));
  }
  assert_eq!(ch.try_pop(), None);
  assert_eq!(ch.try_pop(), None);
  assert_eq!(ch.len(), 0);
  assert_eq!(ch.capacity(), CAP);
}

/// P producers, C consumers, blocking variants on both sides. Every item
/// must come out exactly once, and each consumer must see any one producer's
/// items in that producer's own push order.
#[test]
fn mpmc_stress_no_loss_no_duplication() {
  const PRODUCERS: usize = 4;
  const CONSUMERS: usize = 4;
  let per_producer = ITEMS_MEDIUM;
  let per_consumer = PRODUCERS * per_producer / CONSUMERS;

  let ch = bounded::<(usize, usize)>(32);

  let mut producers = Vec::new();
  for id in 1..=PRODUCERS {
    let tx = ch.clone();
    producers.push(thread::spawn(move || {
      for seq in 1..=per_producer {
        tx.push((id, seq));
      }
    }));
  }

  let mut consumers = Vec::new();
  for _ in 0..CONSUMERS {
    let rx = ch.clone();
    consumers.push(thread::spawn(move || {
      let mut seen = Vec::with_capacity(per_consumer);
      for _ in 0..per_consumer {
        seen.push(rx.pop());
      }
      seen
    }));
  }

  for handle in producers {
    handle.join().unwrap();
  }

  let mut counts: HashMap<(usize, usize), usize> = HashMap::new();
  for handle in consumers {
    let seen = handle.join().unwrap();
    // FIFO means one producer's items never reorder within a consumer's
    // stream.
    let mut last_seq: HashMap<usize, usize> = HashMap::new();
    for &(id, seq) in &seen {
      if let Some(&prev) = last_seq.get(&id) {
        assert!(prev < seq, "producer {} reordered: {} after {}", id, seq, prev);
      }
      last_seq.insert(id, seq);
      *counts.entry((id, seq)).or_insert(0) += 1;
    }
  }

  assert_eq!(counts.len(), PRODUCERS * per_producer);
  for ((id, seq), n) in counts {
    assert_eq!(n, 1, "item ({}, {}) seen {} times", id, seq, n);
  }
  assert!(ch.is_empty());
}

/// Two consumers race `try_pop` against a known item set. If the emptiness
/// check were not repeated after winning the consumer gate, a consumer could
/// read a vacated slot and hand out a placeholder zero.
#[test]
fn try_pop_drain_race_yields_no_phantom_items() {
  let total = ITEMS_HIGH * 10;
  let ch = bounded::<u64>(8);
  let popped = Arc::new(AtomicUsize::new(0));

  let mut consumers = Vec::new();
  for _ in 0..2 {
    let rx = ch.clone();
    let popped = popped.clone();
    consumers.push(thread::spawn(move || {
      let mut sum = 0u64;
      while popped.load(Ordering::Relaxed) < total {
        if let Some(v) = rx.try_pop() {
          assert_ne!(v, 0, "popped a default placeholder");
          sum += v;
          popped.fetch_add(1, Ordering::Relaxed);
        } else {
          thread::yield_now();
        }
      }
      sum
    }));
  }

  for v in 1..=total as u64 {
    ch.push(v);
  }

  let sum: u64 = consumers.into_iter().map(|h| h.join().unwrap()).sum();
  let n = total as u64;
  assert_eq!(sum, n * (n + 1) / 2);
  assert_eq!(popped.load(Ordering::Relaxed), total);
  assert!(ch.is_empty());
}

#[test]
#[serial]
fn push_blocks_until_slot_freed() {
  let ch = bounded::<i32>(1);
  ch.push(1);

  let tx = ch.clone();
  let producer = thread::spawn(move || {
    tx.push(2); // Blocks until the main thread pops.
  });

  thread::sleep(BLOCK_DELAY);
  assert_eq!(ch.len(), 1); // Second push still waiting

  assert_eq!(ch.pop(), 1);
  producer.join().unwrap();
  assert_eq!(ch.pop(), 2);
  assert!(ch.is_empty());
}

#[test]
#[serial]
fn pop_blocks_until_item_arrives() {
  let ch = bounded::<i32>(1);

  let rx = ch.clone();
  let consumer = thread::spawn(move || rx.pop());

  thread::sleep(BLOCK_DELAY);
  ch.push(100);
  assert_eq!(consumer.join().unwrap(), 100);
}

/// A parked producer still holds the producer gate, so a concurrent
/// `try_push` reports contention rather than fullness.
#[test]
#[serial]
fn try_push_reports_busy_while_gate_held() {
  let ch = bounded::<i32>(1);
  ch.push(1);

  let tx = ch.clone();
  let producer = thread::spawn(move || {
    tx.push(2); // Blocks holding the gate.
  });

  thread::sleep(BLOCK_DELAY);
  match ch.try_push(3) {
    Err(TryPushError::Busy(val)) => assert_eq!(val, 3),
    res => panic!("Expected Busy error, got {:?}", res),
  }

  assert_eq!(ch.pop(), 1);
  producer.join().unwrap();
  assert_eq!(ch.pop(), 2);

  ch.try_push(3).unwrap();
  assert_eq!(ch.pop(), 3);
}
