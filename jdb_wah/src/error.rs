//! 位图错误 Bitmap errors

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
  /// Read at or past the logical end
  /// 读取位置超出逻辑长度
  #[error("bit {id} out of range (len {len})")]
  OutOfRange { id: usize, len: usize },

  /// Encoded words break the canonical form
  /// 编码字违反规范形式
  #[error("corrupt encoding: {0}")]
  Corrupt(&'static str),

  #[error("word width mismatch: expect {expect}, got {got}")]
  Width { expect: u32, got: u32 },

  #[cfg(feature = "bitcode")]
  #[error("decode: {0}")]
  Decode(#[from] bitcode::Error),
}
