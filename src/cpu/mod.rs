#[allow(clippy::module_inception)]
mod cpu;
pub mod reg;
pub mod state;

#[cfg(test)]
mod ticktest;

use std::fmt;
use std::sync::Arc;

use crate::component::{Component, Slot};
use crate::dispatch::{Handler, InstructionTable};

pub use self::reg::{Reg16, Registers};
pub use self::state::ExecutionState;

/// Register and micro-execution state of one core.
///
/// This is what memory ports, interrupt ports, instruction handlers and
/// components get to see. Fields are public: handlers drive the engine by
/// writing `execution_state`, `index` and `bus` directly.
#[derive(Clone)]
pub struct Core {
  pub regs: Registers,

  /// Last byte moved across the memory port.
  pub bus: u8,
  /// Address used by the MEMORY_LOAD/MEMORY_STORE phases.
  pub index: u16,
  /// Handler latched by the last DECODE.
  pub instruction: Option<Handler>,

  /// Elapsed machine cycles. Wraps.
  pub cycles: u32,
  /// Event processing runs once `cycles >= next_event`.
  pub next_event: u32,
  /// Micro-state for the next tick. A handler's write wins over the
  /// default advance.
  pub execution_state: ExecutionState,
  pub halted: bool,

  pub irq_pending: bool,
  pub irq_vector: u8,
}

impl Core {
  pub fn new() -> Core {
    Core {
      regs: Registers::new(),
      bus: 0,
      index: 0,
      instruction: None,
      cycles: 0,
      next_event: 0,
      execution_state: ExecutionState::Fetch,
      halted: false,
      irq_pending: false,
      irq_vector: 0,
    }
  }

  /// Latch an interrupt for the next FETCH. A vector raised before the
  /// previous one was taken replaces it.
  pub fn raise_irq(&mut self, vector: u8) {
    self.irq_pending = true;
    self.irq_vector = vector;
  }

  pub fn register(&self, id: Reg16) -> u16 {
    self.regs.get(id)
  }

  pub fn set_register(&mut self, id: Reg16, value: u16) {
    self.regs.set(id, value);
  }
}

impl Default for Core {
  fn default() -> Core {
    Core::new()
  }
}

impl fmt::Debug for Core {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.debug_struct("Core")
      .field("regs", &self.regs)
      .field("bus", &self.bus)
      .field("index", &self.index)
      .field("latched", &self.instruction.is_some())
      .field("cycles", &self.cycles)
      .field("next_event", &self.next_event)
      .field("execution_state", &self.execution_state)
      .field("halted", &self.halted)
      .field("irq_pending", &self.irq_pending)
      .field("irq_vector", &self.irq_vector)
      .finish()
  }
}

impl fmt::Display for Core {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(
      f,
      "{} cycles={} state={:?}{}{}",
      self.regs,
      self.cycles,
      self.execution_state,
      if self.halted { " halted" } else { "" },
      if self.irq_pending { " irq" } else { "" },
    )
  }
}

/// The micro-step engine together with its collaborators and the
/// peripheral bus.
pub struct CPU<M, I> {
  pub core: Core,
  pub memory: M,
  pub irq: I,

  table: Arc<InstructionTable>,

  /// Always present; brackets the slotted components.
  master: Box<dyn Component>,
  components: Vec<Slot>,
}
