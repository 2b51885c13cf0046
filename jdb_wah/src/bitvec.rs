//! Mutable WAH compressed bit vector.
//! 可变的 WAH 压缩位向量。

mod raw;

use log::trace;

pub use raw::Parts;

use crate::{
  Conf, Error, Result, Word,
  iter::{Chunks, Ids, Iter},
};

/// Largest bit length, ids stay below it.
/// 最大位长度，id 必须小于它。
pub const MAX_LEN: usize = usize::MAX;

/// Compressed growable bit sequence.
/// 可增长的压缩位序列。
///
/// Committed bits live in `words` (literals and fills); the tail is buffered
/// in `active` until a full literal is gathered.
/// 已提交的位保存在 `words`（字面字与填充字）中，尾部在凑满一个字面字前缓存在 `active`。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitvec<W: Word = u64> {
  pub(crate) size: usize,
  pub(crate) active: W,
  pub(crate) offset: usize,
  pub(crate) words: Vec<W>,
}

/// Location of a bit inside the encoded words.
/// 位在编码字中的位置。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Loc {
  /// Literal-word index ignoring compression
  /// 不考虑压缩时的字面字下标
  pub index: usize,
  /// Bit offset inside that literal
  /// 字面字内的位偏移
  pub offset: usize,
  /// Index into `words`, `words.len()` means `active`
  /// `words` 下标，等于 `words.len()` 表示位于 `active`
  pub i: usize,
  /// Literal-word equivalents before `words[i]`
  /// `words[i]` 之前的字面字数量
  pub j: usize,
}

impl<W: Word> Default for Bitvec<W> {
  fn default() -> Self {
    Self::new()
  }
}

impl<W: Word> AsRef<Bitvec<W>> for Bitvec<W> {
  fn as_ref(&self) -> &Bitvec<W> {
    self
  }
}

impl<W: Word> Bitvec<W> {
  /// Create an empty bit vector.
  /// 创建空位向量。
  pub fn new() -> Self {
    Self::with_conf(Conf::default())
  }

  pub fn with_conf(conf: Conf) -> Self {
    Self {
      size: 0,
      active: W::ZERO,
      offset: 0,
      words: Vec::with_capacity(conf.cap),
    }
  }

  /// Number of bits.
  /// 位数。
  #[inline]
  pub fn len(&self) -> usize {
    self.size
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.size == 0
  }

  /// Committed encoded words.
  /// 已提交的编码字。
  #[inline]
  pub fn words(&self) -> &[W] {
    &self.words
  }

  /// Uncommitted tail: active word and its bit count.
  /// 未提交的尾部：活动字及其位数。
  #[inline]
  pub fn tail(&self) -> (W, usize) {
    (self.active, self.offset)
  }

  /// Heap bytes held by the word buffer.
  /// 字缓冲区占用的堆字节数。
  pub fn size_in_bytes(&self) -> usize {
    self.words.capacity() * size_of::<W>()
  }

  /// Read the bit at `id`.
  /// 读取 `id` 处的位。
  pub fn get(&self, id: usize) -> Result<bool> {
    if id >= self.size {
      return Err(Error::OutOfRange { id, len: self.size });
    }
    let loc = self.find_word(id);
    Ok(match self.words.get(loc.i) {
      None => self.active & W::bit(loc.offset) != W::ZERO,
      Some(&w) if w.is_fill() => w.polarity(),
      Some(&w) => w & W::bit(loc.offset) != W::ZERO,
    })
  }

  /// Write `val` at `id`, growing with `false` bits when `id >= len()`.
  /// Returns whether the stored bit changed.
  ///
  /// 在 `id` 处写入 `val`，`id >= len()` 时以 `false` 补齐。
  /// 返回存储的位是否改变。
  ///
  /// # Panics
  /// If `id == usize::MAX`, the length would not fit in `usize`. Use
  /// [`Bitvec::try_set`] to get an error instead.
  /// `id == usize::MAX` 时长度无法用 `usize` 表示而 panic，需要错误返回时用 [`Bitvec::try_set`]。
  pub fn set(&mut self, id: usize, val: bool) -> bool {
    assert!(id < MAX_LEN, "bit id {id} past the largest length");
    self.set_unchecked(id, val)
  }

  /// [`Bitvec::set`] returning `Err(Error::OutOfRange)` for `id == usize::MAX`.
  /// `id == usize::MAX` 时返回 `Err(Error::OutOfRange)` 的 [`Bitvec::set`]。
  pub fn try_set(&mut self, id: usize, val: bool) -> Result<bool> {
    if id >= MAX_LEN {
      return Err(Error::OutOfRange { id, len: MAX_LEN });
    }
    Ok(self.set_unchecked(id, val))
  }

  fn set_unchecked(&mut self, id: usize, val: bool) -> bool {
    if id > self.size {
      self.grow(id - self.size);
    }
    if id == self.size {
      self.push(val);
      return val;
    }
    self.update(id, val)
  }

  /// Append one bit.
  /// 追加一位。
  ///
  /// # Panics
  /// If `len() == usize::MAX`.
  #[inline]
  pub fn push(&mut self, val: bool) {
    assert!(self.size < MAX_LEN, "bit length overflow");
    if val {
      self.active |= W::bit(self.offset);
    }
    self.offset += 1;
    self.size += 1;
    if self.offset == W::LIT_BITS {
      self.flush();
    }
  }

  /// Chunk cursor borrowing this vector.
  /// 借用本向量的分块游标。
  #[inline]
  pub fn iter(&self) -> Iter<W, &Self> {
    Iter::new(self)
  }

  /// Chunk cursor owning this vector.
  /// 持有本向量的分块游标。
  #[inline]
  pub fn into_chunks(self) -> Iter<W, Self> {
    Iter::new(self)
  }

  /// Number of set bits.
  /// 置 1 的位数。
  pub fn ones(&self) -> usize {
    self.iter().count_ones()
  }

  /// Ascending positions of set bits.
  /// 升序的置 1 位置。
  pub fn ids(&self) -> Ids<W, Iter<W, &Self>> {
    self.iter().ids()
  }

  /// Check the canonical form and length bookkeeping.
  /// 校验规范形式与长度记录。
  pub fn validate(&self) -> Result<()> {
    if self.offset >= W::LIT_BITS {
      return Err(Error::Corrupt("offset past literal width"));
    }
    if self.active & !W::low_mask(self.offset) != W::ZERO {
      return Err(Error::Corrupt("active bits past offset"));
    }
    let mut prev: Option<W> = None;
    let mut span = 0usize;
    for &w in &self.words {
      if w.is_fill() {
        // Same-polarity neighbours only when the left one is full
        // 同极性相邻填充仅在左侧已满时允许
        if let Some(p) = prev
          && p.is_fill()
          && p.polarity() == w.polarity()
          && p.has_space()
        {
          return Err(Error::Corrupt("mergeable adjacent fills"));
        }
      } else if w == W::ZERO || w == W::ONES_LITERAL {
        return Err(Error::Corrupt("uniform literal"));
      }
      span += w.span();
      prev = Some(w);
    }
    if span * W::LIT_BITS + self.offset != self.size {
      return Err(Error::Corrupt("size mismatch"));
    }
    Ok(())
  }

  /// Map a global bit position to its encoded word.
  /// 将全局位位置映射到编码字。
  pub(crate) fn find_word(&self, id: usize) -> Loc {
    let index = id / W::LIT_BITS;
    let offset = id % W::LIT_BITS;
    let mut i = 0;
    let mut j = 0;
    for &w in &self.words {
      let nj = w.span();
      if j + nj > index {
        break;
      }
      j += nj;
      i += 1;
    }
    Loc { index, offset, i, j }
  }

  /// Commit the full active word.
  /// 提交已满的活动字。
  fn flush(&mut self) {
    let w = self.active;
    if w == W::ZERO {
      self.push_fill(false, 1);
    } else if w == W::ONES_LITERAL {
      self.push_fill(true, 1);
    } else {
      self.words.push(w);
    }
    self.active = W::ZERO;
    self.offset = 0;
  }

  /// Append `n` uniform literal equivalents, topping up the trailing fill first.
  /// 追加 `n` 个同值字面字，优先填满末尾的填充字。
  fn push_fill(&mut self, ones: bool, mut n: usize) {
    while n > 0 {
      if let Some(last) = self.words.last_mut()
        && last.is_fill()
        && last.polarity() == ones
        && last.has_space()
      {
        let count = last.count();
        let add = n.min(W::FILL_MAX - count);
        *last = W::fill(ones, count + add);
        n -= add;
      } else {
        let count = (n - 1).min(W::FILL_MAX);
        self.words.push(W::fill(ones, count));
        n -= count + 1;
      }
    }
  }

  /// Extend with `gap` zero bits.
  /// 以 `gap` 个 0 位扩展。
  fn grow(&mut self, mut gap: usize) {
    trace!("grow {} -> {}", self.size, self.size + gap);
    if self.offset > 0 {
      let room = W::LIT_BITS - self.offset;
      if gap < room {
        self.offset += gap;
        self.size += gap;
        return;
      }
      self.size += room;
      gap -= room;
      self.flush();
    }
    let n = gap / W::LIT_BITS;
    if n > 0 {
      self.push_fill(false, n);
    }
    self.offset = gap % W::LIT_BITS;
    self.size += gap;
  }

  fn update(&mut self, id: usize, val: bool) -> bool {
    let Loc { index, offset, i, j } = self.find_word(id);
    let Some(&w) = self.words.get(i) else {
      let old = self.active;
      if val {
        self.active |= W::bit(offset);
      } else {
        self.active &= !W::bit(offset);
      }
      return old != self.active;
    };
    if w.is_fill() {
      if w.polarity() == val {
        return false;
      }
      self.split_fill(i, index - j, offset, val);
      return true;
    }
    self.update_literal(i, offset, val)
  }

  /// Break `words[i]` around literal equivalent `target`:
  /// `[fill(target - 1)] literal [fill(count - target - 1)]`.
  /// 在第 `target` 个字面字处拆分 `words[i]`。
  fn split_fill(&mut self, i: usize, target: usize, offset: usize, val: bool) {
    let w = self.words[i];
    let ones = w.polarity();
    let count = w.count();
    let lit = if val {
      W::bit(offset)
    } else {
      W::ONES_LITERAL ^ W::bit(offset)
    };
    trace!("split fill #{i} count {count} at {target}:{offset}");

    let mut at = i;
    if target > 0 {
      self.words[at] = W::fill(ones, target - 1);
      at += 1;
      self.words.insert(at, lit);
    } else {
      self.words[at] = lit;
    }
    if count > target {
      self.words.insert(at + 1, W::fill(ones, count - target - 1));
      self.merge_next(at + 1);
    }
  }

  fn update_literal(&mut self, i: usize, offset: usize, val: bool) -> bool {
    let old = self.words[i];
    let w = if val {
      old | W::bit(offset)
    } else {
      old & !W::bit(offset)
    };
    if w == old {
      return false;
    }
    if w == W::uniform(val) {
      self.literal_to_fill(i, val);
    } else {
      self.words[i] = w;
    }
    true
  }

  /// Turn the uniform literal at `i` into a fill and merge it with its
  /// neighbours.
  /// 将 `i` 处的同值字面字转为填充字并与相邻填充合并。
  fn literal_to_fill(&mut self, mut i: usize, ones: bool) {
    if let Some(&prev) = i.checked_sub(1).and_then(|k| self.words.get(k))
      && prev.is_fill()
      && prev.polarity() == ones
      && prev.has_space()
    {
      self.words[i - 1] = W::fill(ones, prev.count() + 1);
      self.words.remove(i);
      i -= 1;
      trace!("literal merged into fill #{i}");
    } else {
      self.words[i] = W::fill(ones, 0);
      trace!("literal #{i} became fill");
    }

    self.merge_next(i);
  }

  /// Fold same-polarity fills following the fill at `i` into it. On overflow
  /// the left fill is topped up to `FILL_MAX` and the rest carried right.
  /// 将 `i` 处填充字之后的同极性填充并入。溢出时左侧补满至 `FILL_MAX`，余量向右传递。
  fn merge_next(&mut self, mut i: usize) {
    let w = self.words[i];
    let ones = w.polarity();
    while let Some(&next) = self.words.get(i + 1)
      && next.is_fill()
      && next.polarity() == ones
    {
      // counter of the joined run, one unit per word
      let total = self.words[i].count() + next.count() + 1;
      if total <= W::FILL_MAX {
        self.words[i] = W::fill(ones, total);
        self.words.remove(i + 1);
        return;
      }
      self.words[i] = W::fill(ones, W::FILL_MAX);
      self.words[i + 1] = W::fill(ones, total - W::FILL_MAX - 1);
      i += 1;
    }
  }
}

impl<W: Word> Extend<bool> for Bitvec<W> {
  fn extend<T: IntoIterator<Item = bool>>(&mut self, iter: T) {
    for val in iter {
      self.push(val);
    }
  }
}

impl<W: Word> FromIterator<bool> for Bitvec<W> {
  fn from_iter<T: IntoIterator<Item = bool>>(iter: T) -> Self {
    let mut bv = Self::new();
    bv.extend(iter);
    bv
  }
}
