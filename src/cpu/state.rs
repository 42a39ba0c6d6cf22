/// The micro-operation the engine performs on the next cycle.
///
/// Only the first four values are reachable through the default advance;
/// the rest are entered when a handler or the engine writes the state
/// directly.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[repr(u8)]
pub enum ExecutionState {
  Fetch = 0,
  Decode = 1,
  Execute = 2,
  MemoryLoad = 3,
  MemoryStore = 4,
  ReadPc = 5,
  MemoryMoveIndexLoad = 6,
  MemoryMoveIndexStore = 7,
  ReadPcStall = 8,
  Stall = 9,
}

impl ExecutionState {
  /// The state that follows `self` when nothing overrides it: the tag is
  /// incremented and masked to its low two bits.
  pub fn advance(self) -> ExecutionState {
    match (self as u8).wrapping_add(1) & 3 {
      0 => ExecutionState::Fetch,
      1 => ExecutionState::Decode,
      2 => ExecutionState::Execute,
      _ => ExecutionState::MemoryLoad,
    }
  }
}

impl Default for ExecutionState {
  fn default() -> ExecutionState {
    ExecutionState::Fetch
  }
}
