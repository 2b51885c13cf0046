use std::{
  panic::{self, AssertUnwindSafe},
  sync::Arc,
  thread,
  time::{Duration, Instant},
};

use aok::{OK, Void};
use jdb_wah::{Bitvec, Chunk, Chunks, DEFAULT_IDS_BUF, Iter};
use log::info;

#[static_init::constructor(0)]
extern "C" fn _log_init() {
  log_init::init();
}

fn sample() -> (Bitvec, Vec<usize>) {
  let mut rng = fastrand::Rng::with_seed(42);
  let mut expect: Vec<usize> = (0..2000).map(|_| rng.usize(..200_000)).collect();
  expect.sort_unstable();
  expect.dedup();
  let mut bv: Bitvec = Bitvec::new();
  // out of order on purpose
  for &id in expect.iter().rev() {
    bv.set(id, true);
  }
  (bv, expect)
}

#[test]
fn test_ids_ascending() -> Void {
  let (bv, expect) = sample();
  bv.validate()?;
  assert_eq!(bv.ids().collect::<Vec<_>>(), expect);
  assert_eq!(bv.ids().count(), bv.ones());
  // lazy, take stops early
  assert_eq!(bv.ids().take(3).collect::<Vec<_>>(), &expect[..3]);
  OK
}

#[test]
fn test_spawn_ids() -> Void {
  let (bv, expect) = sample();

  let got: Vec<usize> = bv.clone().into_chunks().spawn_ids(DEFAULT_IDS_BUF).collect();
  assert_eq!(got, expect);

  // shared between threads
  let shared = Arc::new(bv);
  let a = Iter::new(Arc::clone(&shared)).spawn_ids(16);
  let b = Iter::new(Arc::clone(&shared)).not().spawn_ids(16);
  let (ones, zeros) = (a.count(), b.count());
  assert_eq!(ones, expect.len());
  assert_eq!(ones + zeros, shared.len());
  OK
}

#[test]
fn test_spawn_combined() -> Void {
  let (a, expect) = sample();
  let b: Bitvec = (0..100_000).map(|i| i % 2 == 0).collect();
  let even: Vec<usize> = expect
    .iter()
    .copied()
    .filter(|&id| id < 100_000 && id % 2 == 0)
    .collect();

  let rx = a.into_chunks().and(b.into_chunks()).spawn_ids(4);
  let handle = thread::spawn(move || rx.collect::<Vec<_>>());
  let got = handle.join().unwrap();
  assert_eq!(got, even);
  OK
}

/// Dropping the receiver stops a producer blocked on a full queue
/// 丢弃接收端会停止阻塞在满队列上的生产者
#[test]
fn test_cancel() -> Void {
  let bv: Bitvec = (0..10_000_000).map(|_| true).collect();
  assert_eq!(bv.words().len(), 1);

  let mut rx = bv.clone().into_chunks().spawn_ids(1);
  assert_eq!(rx.next(), Some(0));
  assert_eq!(rx.next(), Some(1));
  assert!(!rx.is_cancelled());
  rx.cancel();
  assert!(rx.is_cancelled());
  assert_eq!(rx.next(), None);

  let mut rx = bv.into_chunks().spawn_ids(1);
  let first: Vec<usize> = rx.by_ref().take(100).collect();
  assert_eq!(first, (0..100).collect::<Vec<_>>());
  drop(rx);
  info!("producer joined on drop");
  OK
}

/// Cancel while the producer walks a zero run of 2^40 literals
/// 生产者遍历 2^40 个字面字的 0 游程时取消
#[test]
fn test_cancel_inside_long_run() -> Void {
  let mut bv: Bitvec = Bitvec::new();
  bv.set(0, true);
  bv.set(63 << 40, true);
  assert_eq!(bv.words().len(), 2);

  let mut rx = bv.into_chunks().spawn_ids(1);
  assert_eq!(rx.next(), Some(0));
  let start = Instant::now();
  rx.cancel();
  let took = start.elapsed();
  info!("cancel took {took:?}");
  assert!(took < Duration::from_secs(2), "cancel took {took:?}");
  assert_eq!(rx.next(), None);
  OK
}

/// Source that panics after a few chunks
/// 若干块之后 panic 的数据源
struct Broken(usize);

impl Chunks<u64> for Broken {
  fn next_chunk(&mut self) -> Chunk<u64> {
    if self.0 == 0 {
      panic!("broken source");
    }
    self.0 -= 1;
    Chunk::full(1)
  }
}

#[test]
fn test_producer_panic() -> Void {
  let mut rx = Broken(3).spawn_ids(16);
  let got = panic::catch_unwind(AssertUnwindSafe(|| rx.by_ref().collect::<Vec<_>>()));
  let payload = got.expect_err("panic must reach the consumer");
  assert_eq!(payload.downcast_ref::<&str>(), Some(&"broken source"));
  assert_eq!(rx.next(), None);

  // cancel after a panic only logs
  let mut rx = Broken(0).spawn_ids(1);
  thread::sleep(Duration::from_millis(20));
  rx.cancel();
  assert_eq!(rx.next(), None);
  OK
}
