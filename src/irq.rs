use crate::cpu::Core;
use crate::mem::Timer;
use crate::port::InterruptPort;

pub const VBLANK: u8 = 0b00001;
pub const LCD_STAT: u8 = 0b00010;
pub const TIMER: u8 = 0b00100;
pub const SERIAL: u8 = 0b01000;
pub const JOYPAD: u8 = 0b10000;

/// Request bits in priority order with their vectors.
const VECTORS: [(u8, u8); 5] = [
  (VBLANK, 0x40),
  (LCD_STAT, 0x48),
  (TIMER, 0x50),
  (SERIAL, 0x58),
  (JOYPAD, 0x60),
];

/// Interrupt controller: IME, IE and IF, plus the timer it services.
///
/// Every event catches the timer up on the cycles elapsed since the last
/// one, delivers the highest-priority enabled request, and schedules the
/// next event `quantum` cycles ahead.
#[derive(Debug)]
pub struct InterruptController {
  pub ime: bool,
  pub interrupt_enable: u8,
  pub interrupt_flags: u8,
  pub timer: Timer,

  quantum: u32,
  last_sync: u32,
}

impl InterruptController {
  pub fn new(quantum: u32) -> InterruptController {
    InterruptController {
      ime: false,
      interrupt_enable: 0,
      interrupt_flags: 0,
      timer: Timer::new(),
      quantum: quantum.max(1),
      last_sync: 0,
    }
  }

  pub fn quantum(&self) -> u32 {
    self.quantum
  }

  /// Set request bits in IF.
  pub fn request(&mut self, mask: u8) {
    self.interrupt_flags |= mask & 0x1f;
  }

  /// The highest-priority request that is both enabled and flagged.
  fn pending(&self) -> Option<(u8, u8)> {
    let mask = self.interrupt_enable & self.interrupt_flags;
    VECTORS.iter().copied().find(|&(bit, _)| mask & bit != 0)
  }
}

impl InterruptPort for InterruptController {
  fn reset(&mut self, core: &mut Core) {
    self.ime = false;
    self.interrupt_enable = 0;
    self.interrupt_flags = 0;
    self.timer = Timer::new();
    self.last_sync = core.cycles;
  }

  fn set_interrupts(&mut self, _: &mut Core, enabled: bool) {
    debug!("ime={}", enabled);
    self.ime = enabled;
  }

  fn process_events(&mut self, core: &mut Core) {
    let elapsed = core.cycles.wrapping_sub(self.last_sync);
    self.last_sync = core.cycles;
    if self.timer.advance(elapsed) {
      self.request(TIMER);
    }

    if let Some((bit, vector)) = self.pending() {
      // Any enabled request wakes a halted core, even with IME clear.
      core.halted = false;
      if self.ime && !core.irq_pending {
        info!(
          "INTERRUPT! 0b{:05b} 0b{:05b} -> 0x{:02x}",
          self.interrupt_enable, self.interrupt_flags, vector
        );
        self.interrupt_flags &= !bit;
        core.raise_irq(vector);
      }
    }

    core.next_event = core.cycles.wrapping_add(self.quantum);
  }
}
