//! Bitwise combinators over chunk streams.
//! 分块流上的按位组合器。

use super::{Chunk, Chunks};
use crate::Word;

/// Bitwise NOT.
/// 按位取反。
///
/// Bits past the chunk length stay zero, so a negated stream still reads as
/// zero beyond its end when combined with a longer one. On a partial chunk
/// this clears more than the reserved top bit: `!0` over a 3-bit tail is
/// `0b111`, not a full literal of ones.
/// 块长度之后的位保持为 0，与更长的流组合时，取反后的流在结尾之后仍视为 0。
/// 对不完整块清除的不只是保留的最高位：3 位尾部的 `!0` 为 `0b111`，而非全 1 字面字。
#[derive(Debug, Clone)]
pub struct Not<X>(X);

impl<X> Not<X> {
  pub fn new(x: X) -> Self {
    Self(x)
  }
}

impl<W: Word, X: Chunks<W>> Chunks<W> for Not<X> {
  #[inline]
  fn next_chunk(&mut self) -> Chunk<W> {
    let c = self.0.next_chunk();
    Chunk {
      word: !c.word & W::low_mask(c.len),
      len: c.len,
    }
  }
}

/// Define a two-operand combinator
/// 定义双操作数组合器
macro_rules! def_bin_op {
  ($(#[$doc:meta])* $name:ident, $op:tt, $len:ident) => {
    $(#[$doc])*
    #[derive(Debug, Clone)]
    pub struct $name<X, Y> {
      x: X,
      y: Y,
    }

    impl<X, Y> $name<X, Y> {
      pub fn new(x: X, y: Y) -> Self {
        Self { x, y }
      }
    }

    impl<W: Word, X: Chunks<W>, Y: Chunks<W>> Chunks<W> for $name<X, Y> {
      #[inline]
      fn next_chunk(&mut self) -> Chunk<W> {
        let a = self.x.next_chunk();
        let b = self.y.next_chunk();
        Chunk {
          word: a.word $op b.word,
          len: a.len.$len(b.len),
        }
      }
    }
  };
}

def_bin_op!(
  /// Bitwise AND. Past the shorter operand every bit is zero, so the length
  /// is the minimum.
  /// 按位与。较短操作数之后全为 0，长度取最小值。
  And, &, min
);

def_bin_op!(
  /// Bitwise OR. The longer operand passes through, so the length is the
  /// maximum.
  /// 按位或。较长操作数直接透传，长度取最大值。
  Or, |, max
);

def_bin_op!(
  /// Bitwise XOR, length is the maximum.
  /// 按位异或，长度取最大值。
  Xor, ^, max
);
