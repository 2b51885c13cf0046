#![cfg(feature = "bitcode")]

use aok::{OK, Void};
use jdb_wah::{Bitvec, Error};

#[static_init::constructor(0)]
extern "C" fn _log_init() {
  log_init::init();
}

#[test]
fn test_bitcode_round_trip() -> Void {
  let mut bv: Bitvec = Bitvec::new();
  for id in [0, 1000, 1001, 70_000, 70_063] {
    bv.set(id, true);
  }
  let bytes = bv.encode();
  let back = Bitvec::<u64>::decode(&bytes)?;
  assert_eq!(back, bv);
  assert_eq!(back.ids().collect::<Vec<_>>(), vec![0, 1000, 1001, 70_000, 70_063]);

  let narrow: Bitvec<u16> = (0..5000).map(|i| i % 7 == 0 || i > 3000).collect();
  let back = Bitvec::<u16>::decode(&narrow.encode())?;
  assert_eq!(back, narrow);
  OK
}

#[test]
fn test_bitcode_reject() -> Void {
  let bv: Bitvec<u32> = (0..100).map(|i| i % 3 == 0).collect();
  let bytes = bv.encode();
  assert!(matches!(
    Bitvec::<u64>::decode(&bytes),
    Err(Error::Width { expect: 64, got: 32 })
  ));
  assert!(matches!(
    Bitvec::<u32>::decode(&bytes[..bytes.len() / 2]),
    Err(Error::Decode(_))
  ));
  OK
}
