//! Enumerate positions of set bits.
//! 枚举置 1 位的位置。

use std::{
  iter::FusedIterator,
  panic,
  sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
    mpsc::{Receiver, sync_channel},
  },
  thread::{self, JoinHandle},
};

use log::{debug, error};

use super::{Chunk, Chunks};
use crate::Word;

/// Lazy ascending positions of set bits, pulled one chunk at a time.
/// 逐块拉取的惰性升序置 1 位置。
pub struct Ids<W: Word, I> {
  src: I,
  // Position of bit 0 of `cur`
  // `cur` 第 0 位对应的位置
  base: usize,
  next_base: usize,
  // Unreported set bits of the current chunk
  // 当前块中尚未输出的置 1 位
  cur: W,
  done: bool,
}

impl<W: Word, I: Chunks<W>> Ids<W, I> {
  pub fn new(src: I) -> Self {
    Self {
      src,
      base: 0,
      next_base: 0,
      cur: W::ZERO,
      done: false,
    }
  }
}

impl<W: Word, I: Chunks<W>> Iterator for Ids<W, I> {
  type Item = usize;

  fn next(&mut self) -> Option<usize> {
    while self.cur == W::ZERO {
      if self.done {
        return None;
      }
      let chunk = self.src.next_chunk();
      if chunk.is_end() {
        self.done = true;
        return None;
      }
      // Base advances a full literal width even for a partial chunk
      // 即使是不完整块，基址也前进一个完整字面宽度
      self.base = self.next_base;
      self.next_base += W::LIT_BITS;
      self.cur = chunk.masked();
    }
    let bit = self.cur.lowest() as usize;
    self.cur = self.cur.clear_lowest();
    Some(self.base + bit)
  }
}

impl<W: Word, I: Chunks<W>> FusedIterator for Ids<W, I> {}

/// Chunk source that ends as soon as `stop` is raised, so a long run
/// without set bits cannot delay cancellation.
/// `stop` 置位后立即结束的分块源，长段无置 1 位的游程不会拖延取消。
struct Until<I> {
  src: I,
  stop: Arc<AtomicBool>,
}

impl<W: Word, I: Chunks<W>> Chunks<W> for Until<I> {
  #[inline]
  fn next_chunk(&mut self) -> Chunk<W> {
    if self.stop.load(Ordering::Acquire) {
      return Chunk::END;
    }
    self.src.next_chunk()
  }
}

/// Receiving end of a background id scan.
/// 后台 id 扫描的接收端。
///
/// The producer thread blocks when the bounded queue is full. Dropping the
/// receiver (or [`IdsRx::cancel`]) stops and joins the producer.
/// 有界队列满时生产线程阻塞。丢弃接收端（或调用 [`IdsRx::cancel`]）会停止并回收生产线程。
///
/// A panic in the source surfaces on the consumer: `next()` re-raises it
/// once the queue is drained.
/// 数据源中的 panic 会在消费端重新抛出：队列取空后 `next()` 继续 panic。
pub struct IdsRx {
  rx: Option<Receiver<usize>>,
  stop: Arc<AtomicBool>,
  handle: Option<JoinHandle<()>>,
}

impl IdsRx {
  pub(crate) fn spawn<W, I>(src: I, buf: usize) -> Self
  where
    W: Word,
    I: Chunks<W> + Send + 'static,
  {
    let (tx, rx) = sync_channel(buf);
    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);

    let handle = thread::spawn(move || {
      debug!("ids producer start, buf {buf}");
      let src = Until {
        src,
        stop: Arc::clone(&flag),
      };
      for id in Ids::<W, _>::new(src) {
        if tx.send(id).is_err() {
          debug!("ids producer disconnected at {id}");
          return;
        }
      }
      if flag.load(Ordering::Acquire) {
        debug!("ids producer cancelled");
      } else {
        debug!("ids producer done");
      }
    });

    Self {
      rx: Some(rx),
      stop,
      handle: Some(handle),
    }
  }

  /// Stop the producer and wait for it to exit. Later `next()` returns `None`.
  /// 停止生产者并等待其退出，之后 `next()` 返回 `None`。
  pub fn cancel(&mut self) {
    self.stop.store(true, Ordering::Release);
    // Disconnect so a producer blocked on a full queue wakes up
    // 断开通道，唤醒阻塞在满队列上的生产者
    self.rx.take();
    if let Some(handle) = self.handle.take()
      && handle.join().is_err()
    {
      error!("ids producer panicked");
    }
  }

  pub fn is_cancelled(&self) -> bool {
    self.stop.load(Ordering::Acquire)
  }
}

impl Iterator for IdsRx {
  type Item = usize;

  fn next(&mut self) -> Option<usize> {
    if let Ok(id) = self.rx.as_ref()?.recv() {
      return Some(id);
    }
    // Producer gone: finished or panicked
    // 生产者已退出：正常结束或 panic
    self.rx.take();
    if let Some(handle) = self.handle.take()
      && let Err(payload) = handle.join()
    {
      panic::resume_unwind(payload);
    }
    None
  }
}

impl Drop for IdsRx {
  fn drop(&mut self) {
    self.cancel();
  }
}
