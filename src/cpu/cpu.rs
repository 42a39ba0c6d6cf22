use std::sync::Arc;

use crate::component::{Component, Slot};
use crate::cpu::{Core, ExecutionState, CPU};
use crate::dispatch::InstructionTable;
use crate::port::{InterruptPort, MemoryPort};

impl<M: MemoryPort, I: InterruptPort> CPU<M, I> {
  /// The table is shared by reference so several cores can run from the
  /// same one. No lifecycle hook runs until `init`.
  pub fn new(
    memory: M,
    irq: I,
    table: Arc<InstructionTable>,
    master: Box<dyn Component>,
  ) -> CPU<M, I> {
    CPU {
      core: Core::new(),
      memory,
      irq,
      table,
      master,
      components: Vec::new(),
    }
  }

  pub fn table(&self) -> &Arc<InstructionTable> {
    &self.table
  }

  pub fn num_components(&self) -> usize {
    self.components.len()
  }

  /// Run the master's init hook, then every populated slot in order.
  pub fn init(&mut self) {
    debug!("init {}", self.master.name());
    self.master.init(&mut self.core);
    for component in self.components.iter_mut().flatten() {
      debug!("init {}", component.name());
      component.init(&mut self.core);
    }
  }

  /// Run the master's deinit hook, then every populated slot in order.
  pub fn deinit(&mut self) {
    debug!("deinit {}", self.master.name());
    self.master.deinit();
    for component in self.components.iter_mut().flatten() {
      debug!("deinit {}", component.name());
      component.deinit();
    }
  }

  /// Replace the master and the whole slot list. No hook runs.
  pub fn set_components(
    &mut self,
    master: Box<dyn Component>,
    components: Vec<Slot>,
  ) {
    self.master = master;
    self.components = components;
  }

  /// Initialize a single slot. Out-of-range and empty slots are ignored.
  pub fn hotplug_attach(&mut self, slot: usize) {
    if let Some(Some(component)) = self.components.get_mut(slot) {
      debug!("hotplug attach {} in slot {}", component.name(), slot);
      component.init(&mut self.core);
    }
  }

  /// Deinitialize a single slot. Out-of-range and empty slots are ignored.
  pub fn hotplug_detach(&mut self, slot: usize) {
    if let Some(Some(component)) = self.components.get_mut(slot) {
      debug!("hotplug detach {} in slot {}", component.name(), slot);
      component.deinit();
    }
  }

  /// Zero the register file and the clock, return to FETCH and let the
  /// interrupt controller reset its own state. The peripheral bus and the
  /// interrupt latch are left as they are.
  pub fn reset(&mut self) {
    let core = &mut self.core;
    core.regs = Default::default();
    core.instruction = None;
    core.cycles = 0;
    core.next_event = 0;
    core.execution_state = ExecutionState::Fetch;
    core.halted = false;

    self.irq.reset(core);
  }

  pub fn raise_irq(&mut self, vector: u8) {
    self.core.raise_irq(vector);
  }

  /// Advance exactly one machine cycle.
  pub fn tick(&mut self) {
    let core = &mut self.core;
    core.cycles = core.cycles.wrapping_add(1);
    let state = core.execution_state;
    core.execution_state = state.advance();
    trace!("{:>10} {:?} {}", core.cycles, state, core.regs);

    match state {
      ExecutionState::Fetch => {
        if core.irq_pending {
          core.regs.pc = u16::from(core.irq_vector);
          core.irq_pending = false;
          debug!("irq taken, vector 0x{:02x}", core.irq_vector);
          self.irq.set_interrupts(core, false);
          // TODO: stall for the interrupt dispatch cycles.
        }
        let pc = core.regs.pc;
        core.bus = self.memory.rb(core, pc);
      }
      ExecutionState::Decode => {
        core.instruction = Some(self.table.get(core.bus));
        core.regs.pc = core.regs.pc.wrapping_add(1);
      }
      ExecutionState::Execute => match core.instruction {
        Some(handler) => handler(core),
        None => panic!("execute with no instruction latched"),
      },
      ExecutionState::MemoryLoad => {
        let index = core.index;
        core.bus = self.memory.rb(core, index);
      }
      ExecutionState::MemoryStore => {
        let (index, bus) = (core.index, core.bus);
        self.memory.wb(core, index, bus);
      }
      ExecutionState::ReadPc => {
        let pc = core.regs.pc;
        core.bus = self.memory.rb(core, pc);
        core.regs.pc = pc.wrapping_add(1);
        core.execution_state = ExecutionState::ReadPcStall;
      }
      ExecutionState::MemoryMoveIndexLoad => {
        core.execution_state = ExecutionState::MemoryLoad;
      }
      ExecutionState::MemoryMoveIndexStore => {
        core.execution_state = ExecutionState::MemoryStore;
      }
      ExecutionState::ReadPcStall | ExecutionState::Stall => (),
    }

    if core.cycles >= core.next_event {
      self.irq.process_events(core);
    }
  }

  /// Tick `cycles` times.
  pub fn run(&mut self, cycles: u32) {
    for _ in 0..cycles {
      self.tick();
    }
  }
}
