//! Random writes against a `Vec<bool>` model
//! 随机写入与 `Vec<bool>` 模型对照

use aok::{OK, Void};
use jdb_wah::{Bitvec, Chunks, Word};
use proptest::prelude::*;

#[static_init::constructor(0)]
extern "C" fn _log_init() {
  log_init::init();
}

#[derive(Debug, Clone)]
enum Op {
  Set(usize, bool),
  /// Write `val` over `[start, start + len)`
  Run(usize, usize, bool),
}

fn op(max: usize) -> impl Strategy<Value = Op> {
  prop_oneof![
    3 => (0..max, any::<bool>()).prop_map(|(id, val)| Op::Set(id, val)),
    1 => (0..max, 1..max / 2, any::<bool>()).prop_map(|(start, len, val)| Op::Run(start, len, val)),
  ]
}

fn write<W: Word>(bv: &mut Bitvec<W>, model: &mut Vec<bool>, id: usize, val: bool) -> bool {
  if id >= model.len() {
    model.resize(id + 1, false);
  }
  let changed = model[id] != val;
  model[id] = val;
  bv.set(id, val) == changed
}

fn check<W: Word>(ops: &[Op]) -> std::result::Result<(), TestCaseError> {
  let mut bv = Bitvec::<W>::new();
  let mut model = Vec::new();
  for op in ops {
    match *op {
      Op::Set(id, val) => {
        prop_assert!(write(&mut bv, &mut model, id, val), "set {id} {val}");
      }
      Op::Run(start, len, val) => {
        for id in start..start + len {
          prop_assert!(write(&mut bv, &mut model, id, val), "run {id} {val}");
        }
      }
    }
    prop_assert!(bv.validate().is_ok(), "{op:?} -> {:?}", bv.words());
    prop_assert_eq!(bv.len(), model.len());
  }

  for (id, &b) in model.iter().enumerate() {
    prop_assert_eq!(bv.get(id).ok(), Some(b));
  }
  prop_assert!(bv.get(model.len()).is_err());
  let ids: Vec<usize> = model
    .iter()
    .enumerate()
    .filter_map(|(i, &b)| b.then_some(i))
    .collect();
  prop_assert_eq!(bv.iter().count_ones(), ids.len());
  prop_assert_eq!(bv.ids().collect::<Vec<_>>(), ids);

  // rebuilding by appends gives the same canonical words
  let again: Bitvec<W> = model.iter().copied().collect();
  prop_assert_eq!(again.words(), bv.words());
  Ok(())
}

proptest! {
  #![proptest_config(ProptestConfig::with_cases(200))]

  /// u8 words hit FILL_MAX quickly
  /// u8 字很快触及 FILL_MAX
  #[test]
  fn prop_set_u8(ops in prop::collection::vec(op(3000), 1..60)) {
    check::<u8>(&ops)?;
  }

  #[test]
  fn prop_set_u16(ops in prop::collection::vec(op(2000), 1..60)) {
    check::<u16>(&ops)?;
  }

  #[test]
  fn prop_set_u64(ops in prop::collection::vec(op(5000), 1..60)) {
    check::<u64>(&ops)?;
  }
}

/// Long random update stream on u32
/// u32 上的长随机更新序列
#[test]
fn test_stress_u32() -> Void {
  let mut rng = fastrand::Rng::with_seed(42);
  let mut bv = Bitvec::<u32>::new();
  let mut model = Vec::new();
  for round in 0..20_000 {
    // dense region early, sparse far writes later
    let id = if round % 50 == 0 {
      rng.usize(..100_000)
    } else {
      rng.usize(..5_000)
    };
    // bias toward the current run so fills keep forming
    let val = if rng.u8(..10) < 7 { id % 1000 < 500 } else { rng.bool() };
    assert!(write(&mut bv, &mut model, id, val), "round {round}");
    if round % 997 == 0 {
      bv.validate()?;
    }
  }
  bv.validate()?;
  for (id, &b) in model.iter().enumerate() {
    assert_eq!(bv.get(id)?, b, "id {id}");
  }
  let again: Bitvec<u32> = model.iter().copied().collect();
  assert_eq!(again.words(), bv.words());
  OK
}
