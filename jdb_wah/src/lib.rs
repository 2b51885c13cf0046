#![cfg_attr(docsrs, feature(doc_cfg))]

//! # jdb_wah: mutable WAH compressed bitmap
//! 可变的 WAH 压缩位图
//!
//! Word-aligned hybrid encoding: runs of identical bits fold into one fill
//! word, mixed regions stay literal. Point `set`/`get` work on the
//! compressed form; NOT/AND/OR/XOR, counting and id enumeration stream over
//! it chunk by chunk without decompressing.
//!
//! 字对齐混合编码：相同位的游程折叠为一个填充字，混合区域保持字面字。
//! 单点 `set`/`get` 直接作用于压缩形式；NOT/AND/OR/XOR、计数与 id 枚举逐块流式计算，无需解压。
//!
//! ```rust
//! use jdb_wah::{Bitvec, Chunks};
//!
//! let mut a: Bitvec = Bitvec::new();
//! let mut b: Bitvec = Bitvec::new();
//! a.set(0, true);
//! a.set(1000, true);
//! b.set(1000, true);
//!
//! assert!(a.get(1000).unwrap());
//! assert_eq!(a.iter().and(b.iter()).count_ones(), 1);
//! assert_eq!(a.ids().collect::<Vec<_>>(), vec![0, 1000]);
//! ```

mod bitvec;
pub mod conf;
pub mod error;
pub mod iter;
mod word;

pub use bitvec::{Bitvec, MAX_LEN, Parts};
pub use conf::{Conf, DEFAULT_CAP, DEFAULT_IDS_BUF};
pub use error::{Error, Result};
pub use iter::{And, Chunk, Chunks, Ids, IdsRx, Iter, Not, Or, Xor};
pub use word::Word;
