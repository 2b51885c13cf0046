//! Raw word parts and bitcode snapshot.
//! 原始字组成与 bitcode 快照。

use super::Bitvec;
use crate::{Error, Result, Word};

/// Encoded state of a [`Bitvec`] without the derived length.
/// [`Bitvec`] 的编码状态（不含推导出的长度）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parts<W> {
  pub words: Vec<W>,
  pub active: W,
  pub offset: usize,
}

impl<W: Word> Bitvec<W> {
  pub fn into_parts(self) -> Parts<W> {
    Parts {
      words: self.words,
      active: self.active,
      offset: self.offset,
    }
  }

  /// Rebuild from parts, rejecting non-canonical encodings.
  /// 由组成部分重建，拒绝非规范编码。
  pub fn from_parts(parts: Parts<W>) -> Result<Self> {
    let Parts {
      words,
      active,
      offset,
    } = parts;
    if offset >= W::LIT_BITS {
      return Err(Error::Corrupt("offset past literal width"));
    }
    let size = words
      .iter()
      .try_fold(0usize, |acc, w| acc.checked_add(w.span()))
      .and_then(|span| span.checked_mul(W::LIT_BITS))
      .and_then(|bits| bits.checked_add(offset))
      .ok_or(Error::Corrupt("length overflow"))?;
    let bv = Self {
      size,
      active,
      offset,
      words,
    };
    bv.validate()?;
    Ok(bv)
  }
}

#[cfg(feature = "bitcode")]
#[derive(bitcode::Encode, bitcode::Decode)]
struct Snapshot {
  width: u32,
  offset: u32,
  active: u64,
  words: Vec<u64>,
}

#[cfg(feature = "bitcode")]
impl<W: Word> Bitvec<W> {
  /// Serialize the word stream with bitcode.
  /// 用 bitcode 序列化字流。
  pub fn encode(&self) -> Vec<u8> {
    bitcode::encode(&Snapshot {
      width: W::BITS,
      offset: self.offset as u32,
      active: self.active.to_u64(),
      words: self.words.iter().map(|w| w.to_u64()).collect(),
    })
  }

  pub fn decode(bytes: &[u8]) -> Result<Self> {
    let snap: Snapshot = bitcode::decode(bytes)?;
    if snap.width != W::BITS {
      return Err(Error::Width {
        expect: W::BITS,
        got: snap.width,
      });
    }
    let narrow = |v: u64| W::from_u64(v).ok_or(Error::Corrupt("word wider than width"));
    let words = snap
      .words
      .into_iter()
      .map(narrow)
      .collect::<Result<Vec<_>>>()?;
    Self::from_parts(Parts {
      words,
      active: narrow(snap.active)?,
      offset: snap.offset as usize,
    })
  }
}
