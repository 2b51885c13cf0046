//! Pull-based chunk iteration over compressed bitmaps.
//! 压缩位图上的拉取式分块迭代。
//!
//! Every source yields `(word, len)` chunks of `LIT_BITS` bits, aligned on
//! the same boundaries, so combinators work chunk by chunk without knowing
//! whether a chunk came from a literal or an expanded fill.
//! 所有数据源都按相同边界产出 `LIT_BITS` 位的 `(word, len)` 块，
//! 组合器逐块计算，无需关心块来自字面字还是展开的填充字。

pub mod ids;
pub mod ops;

pub use ids::{Ids, IdsRx};
pub use ops::{And, Not, Or, Xor};

use crate::{Bitvec, Word};

/// One unit of lazy evaluation.
/// 惰性计算的单元。
///
/// `len` is `LIT_BITS` except for a trailing partial chunk, and `0` once the
/// stream has ended. Bits at or above `len` are zero.
/// 除末尾不完整块外 `len` 等于 `LIT_BITS`，流结束后为 `0`。`len` 及以上的位为 0。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<W> {
  pub word: W,
  pub len: usize,
}

impl<W: Word> Chunk<W> {
  /// End of stream.
  /// 流结束。
  pub const END: Self = Self {
    word: W::ZERO,
    len: 0,
  };

  #[inline(always)]
  pub fn full(word: W) -> Self {
    Self {
      word,
      len: W::LIT_BITS,
    }
  }

  #[inline(always)]
  pub fn is_end(&self) -> bool {
    self.len == 0
  }

  /// Word with bits past `len` cleared.
  /// 清除 `len` 之后位的字。
  #[inline(always)]
  pub fn masked(&self) -> W {
    if self.len >= W::LIT_BITS {
      self.word
    } else {
      self.word & W::low_mask(self.len)
    }
  }
}

/// Source of chunks.
/// 分块数据源。
///
/// After the first [`Chunk::END`] every call must return [`Chunk::END`].
/// 首次返回 [`Chunk::END`] 后，之后每次调用都必须返回 [`Chunk::END`]。
pub trait Chunks<W: Word> {
  fn next_chunk(&mut self) -> Chunk<W>;

  /// Bitwise NOT.
  /// 按位取反。
  fn not(self) -> Not<Self>
  where
    Self: Sized,
  {
    Not::new(self)
  }

  /// Bitwise AND, ends with the shorter operand.
  /// 按位与，随较短操作数结束。
  fn and<Y: Chunks<W>>(self, y: Y) -> And<Self, Y>
  where
    Self: Sized,
  {
    And::new(self, y)
  }

  /// Bitwise OR, ends with the longer operand.
  /// 按位或，随较长操作数结束。
  fn or<Y: Chunks<W>>(self, y: Y) -> Or<Self, Y>
  where
    Self: Sized,
  {
    Or::new(self, y)
  }

  /// Bitwise XOR, ends with the longer operand.
  /// 按位异或，随较长操作数结束。
  fn xor<Y: Chunks<W>>(self, y: Y) -> Xor<Self, Y>
  where
    Self: Sized,
  {
    Xor::new(self, y)
  }

  /// Drain and count set bits.
  /// 耗尽并统计置 1 的位数。
  fn count_ones(mut self) -> usize
  where
    Self: Sized,
  {
    let mut n = 0;
    loop {
      let chunk = self.next_chunk();
      if chunk.is_end() {
        return n;
      }
      n += chunk.masked().ones() as usize;
    }
  }

  /// Lazy ascending positions of set bits.
  /// 惰性的升序置 1 位置。
  fn ids(self) -> Ids<W, Self>
  where
    Self: Sized,
  {
    Ids::new(self)
  }

  /// Scan on a background thread into a bounded queue of `buf` positions.
  /// 在后台线程扫描，结果写入容量为 `buf` 的有界队列。
  fn spawn_ids(self, buf: usize) -> IdsRx
  where
    Self: Sized + Send + 'static,
  {
    IdsRx::spawn::<W, Self>(self, buf)
  }
}

impl<W: Word, I: Chunks<W> + ?Sized> Chunks<W> for &mut I {
  #[inline]
  fn next_chunk(&mut self) -> Chunk<W> {
    (**self).next_chunk()
  }
}

impl<W: Word, I: Chunks<W> + ?Sized> Chunks<W> for Box<I> {
  #[inline]
  fn next_chunk(&mut self) -> Chunk<W> {
    (**self).next_chunk()
  }
}

/// Chunk cursor over a [`Bitvec`].
/// [`Bitvec`] 上的分块游标。
///
/// `B` is anything that derefs to the vector: `&Bitvec`, `Bitvec`,
/// `Arc<Bitvec>`.
/// `B` 可以是 `&Bitvec`、`Bitvec` 或 `Arc<Bitvec>`。
#[derive(Debug, Clone)]
pub struct Iter<W: Word, B> {
  bv: B,
  // Next word to decode
  // 下一个待解码的字
  i: usize,
  // Repeats of `fill` still owed
  // 尚未产出的 `fill` 重复次数
  rest: usize,
  fill: W,
}

impl<W: Word, B: AsRef<Bitvec<W>>> Iter<W, B> {
  pub fn new(bv: B) -> Self {
    Self {
      bv,
      i: 0,
      rest: 0,
      fill: W::ZERO,
    }
  }
}

impl<W: Word, B: AsRef<Bitvec<W>>> Chunks<W> for Iter<W, B> {
  fn next_chunk(&mut self) -> Chunk<W> {
    if self.rest > 0 {
      self.rest -= 1;
      return Chunk::full(self.fill);
    }
    let bv = self.bv.as_ref();
    let n = bv.words.len();
    if self.i < n {
      let w = bv.words[self.i];
      self.i += 1;
      if !w.is_fill() {
        return Chunk::full(w);
      }
      self.rest = w.count();
      self.fill = W::uniform(w.polarity());
      return Chunk::full(self.fill);
    }
    if self.i == n {
      // Active tail, empty tail reads as end
      // 活动尾部，空尾部即结束
      self.i += 1;
      return Chunk {
        word: bv.active,
        len: bv.offset,
      };
    }
    Chunk::END
  }
}
