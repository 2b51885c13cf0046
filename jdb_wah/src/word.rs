//! Word layout of the WAH encoding.
//! WAH 编码的字布局。
//!
//! Literal (top bit 0): the low `BITS - 1` bits are raw bit values.
//! Fill (top bit 1): bit `BITS - 2` is the polarity, the rest is the run
//! counter `C`, covering `(C + 1) * (BITS - 1)` bits.
//!
//! 字面字（最高位 0）：低 `BITS - 1` 位为原始位值。
//! 填充字（最高位 1）：第 `BITS - 2` 位为极性，其余为游程计数 `C`，
//! 覆盖 `(C + 1) * (BITS - 1)` 位。

use std::{
  fmt::Debug,
  ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, Not},
};

/// Fixed-width unsigned word usable as a WAH code unit.
/// 可作为 WAH 编码单元的定宽无符号字。
pub trait Word:
  Copy
  + Eq
  + Default
  + Debug
  + Send
  + Sync
  + 'static
  + BitAnd<Output = Self>
  + BitOr<Output = Self>
  + BitXor<Output = Self>
  + Not<Output = Self>
  + BitAndAssign
  + BitOrAssign
{
  /// Width in bits.
  /// 位宽。
  const BITS: u32;
  /// Literal bits per word (`BITS - 1`).
  /// 每字的字面位数（`BITS - 1`）。
  const LIT_BITS: usize;
  const ZERO: Self;
  /// Fill flag.
  /// 填充标志。
  const FILL_BIT: Self;
  /// Polarity flag of a fill.
  /// 填充极性标志。
  const ONES_BIT: Self;
  /// Run counter mask.
  /// 游程计数掩码。
  const COUNT_BITS: Self;
  /// Largest run counter.
  /// 最大游程计数。
  const FILL_MAX: usize;
  /// Literal with every bit set.
  /// 全 1 字面字。
  const ONES_LITERAL: Self;

  /// Literal with only `offset` set.
  fn bit(offset: usize) -> Self;

  /// Low `n` bits set, `n <= LIT_BITS`.
  /// 低 `n` 位置 1，`n <= LIT_BITS`。
  fn low_mask(n: usize) -> Self;

  /// Population count.
  fn ones(self) -> u32;

  /// Index of the lowest set bit.
  /// 最低置 1 位的下标。
  fn lowest(self) -> u32;

  /// Clear the lowest set bit.
  fn clear_lowest(self) -> Self;

  /// Run counter of a fill.
  /// 填充字的游程计数。
  fn count(self) -> usize;

  /// Build a fill word. `count` must not exceed `FILL_MAX`.
  /// 构造填充字，`count` 不得超过 `FILL_MAX`。
  fn fill(ones: bool, count: usize) -> Self;

  fn to_u64(self) -> u64;

  /// `None` if `v` does not fit.
  fn from_u64(v: u64) -> Option<Self>;

  #[inline(always)]
  fn is_fill(self) -> bool {
    self & Self::FILL_BIT != Self::ZERO
  }

  #[inline(always)]
  fn is_zeros_fill(self) -> bool {
    self & !Self::COUNT_BITS == Self::FILL_BIT
  }

  #[inline(always)]
  fn is_ones_fill(self) -> bool {
    self & !Self::COUNT_BITS == !Self::COUNT_BITS
  }

  /// Fill polarity.
  /// 填充极性。
  #[inline(always)]
  fn polarity(self) -> bool {
    self & Self::ONES_BIT != Self::ZERO
  }

  /// Counter below `FILL_MAX`.
  /// 计数未达 `FILL_MAX`，仍可递增。
  #[inline(always)]
  fn has_space(self) -> bool {
    self.count() < Self::FILL_MAX
  }

  /// Literal-word equivalents covered.
  /// 覆盖的字面字数量。
  #[inline(always)]
  fn span(self) -> usize {
    if self.is_fill() { self.count() + 1 } else { 1 }
  }

  /// Literal expansion of one fill unit.
  /// 填充单元展开后的字面字。
  #[inline(always)]
  fn uniform(ones: bool) -> Self {
    if ones { Self::ONES_LITERAL } else { Self::ZERO }
  }
}

macro_rules! impl_word {
  ($($t:ty),*) => {$(
    impl Word for $t {
      const BITS: u32 = <$t>::BITS;
      const LIT_BITS: usize = <$t>::BITS as usize - 1;
      const ZERO: Self = 0;
      const FILL_BIT: Self = 1 << (<$t>::BITS - 1);
      const ONES_BIT: Self = 1 << (<$t>::BITS - 2);
      const COUNT_BITS: Self = !(Self::FILL_BIT | Self::ONES_BIT);
      const FILL_MAX: usize = Self::COUNT_BITS as usize;
      const ONES_LITERAL: Self = !Self::FILL_BIT;

      #[inline(always)]
      fn bit(offset: usize) -> Self {
        1 << offset
      }

      #[inline(always)]
      fn low_mask(n: usize) -> Self {
        ((1 as $t) << n).wrapping_sub(1)
      }

      #[inline(always)]
      fn ones(self) -> u32 {
        self.count_ones()
      }

      #[inline(always)]
      fn lowest(self) -> u32 {
        self.trailing_zeros()
      }

      #[inline(always)]
      fn clear_lowest(self) -> Self {
        self & self.wrapping_sub(1)
      }

      #[inline(always)]
      fn count(self) -> usize {
        (self & Self::COUNT_BITS) as usize
      }

      #[inline(always)]
      fn fill(ones: bool, count: usize) -> Self {
        debug_assert!(count <= Self::FILL_MAX, "fill counter overflow");
        let head = if ones { Self::FILL_BIT | Self::ONES_BIT } else { Self::FILL_BIT };
        head | (count as $t & Self::COUNT_BITS)
      }

      #[inline(always)]
      fn to_u64(self) -> u64 {
        self as u64
      }

      #[inline(always)]
      fn from_u64(v: u64) -> Option<Self> {
        <$t>::try_from(v).ok()
      }
    }
  )*};
}

impl_word!(u8, u16, u32, u64);
