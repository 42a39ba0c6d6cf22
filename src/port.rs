//! Collaborator interfaces the core is driven through.

use crate::cpu::Core;

/// Byte-wide access to the memory map.
///
/// The core never owns memory; it only asks for a byte or hands one over.
/// Implementations may have side effects on their own I/O state but must
/// leave the core's registers alone, which is why they only see `&Core`.
pub trait MemoryPort {
  /// Read a byte at address `addr`.
  fn rb(&mut self, core: &Core, addr: u16) -> u8;

  /// Write `value` at address `addr`.
  fn wb(&mut self, core: &Core, addr: u16, value: u8);
}

/// The interrupt controller side of the core.
pub trait InterruptPort {
  /// Reinitialize controller-owned state. Called at the end of `CPU::reset`.
  fn reset(&mut self, core: &mut Core);

  /// Set the master interrupt enable.
  fn set_interrupts(&mut self, core: &mut Core, enabled: bool);

  /// Called after a tick once `core.cycles` reaches `core.next_event`.
  ///
  /// Peripherals catch up on elapsed cycles here, may call
  /// `Core::raise_irq`, and should move `core.next_event` forward.
  fn process_events(&mut self, core: &mut Core);
}

impl<T: MemoryPort + ?Sized> MemoryPort for Box<T> {
  fn rb(&mut self, core: &Core, addr: u16) -> u8 {
    (**self).rb(core, addr)
  }

  fn wb(&mut self, core: &Core, addr: u16, value: u8) {
    (**self).wb(core, addr, value)
  }
}

impl<T: InterruptPort + ?Sized> InterruptPort for Box<T> {
  fn reset(&mut self, core: &mut Core) {
    (**self).reset(core)
  }

  fn set_interrupts(&mut self, core: &mut Core, enabled: bool) {
    (**self).set_interrupts(core, enabled)
  }

  fn process_events(&mut self, core: &mut Core) {
    (**self).process_events(core)
  }
}
