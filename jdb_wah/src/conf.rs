//! Default configuration for Bitvec and id producers.
//! Bitvec 与 id 生产者的默认配置。

/// Initial capacity (in words) of the encoded buffer.
/// 编码缓冲区的初始容量（字数）。
pub const DEFAULT_CAP: usize = 64;

/// Bounded queue length between a background id producer and its consumer.
/// 后台 id 生产者与消费者之间的有界队列长度。
/// Producer blocks when the queue is full.
/// 队列满时生产者阻塞。
pub const DEFAULT_IDS_BUF: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conf {
  /// Initial capacity of the word buffer.
  pub cap: usize,
}

impl Default for Conf {
  fn default() -> Self {
    Self { cap: DEFAULT_CAP }
  }
}
