/// DIV ticks every 256 cycles.
const DIV_PERIOD: u32 = 256;

#[derive(Debug, Default)]
struct Clock {
  main: u32,
  div: u32,
}

#[derive(Debug, Default)]
pub struct Registers {
  pub div: u8,
  pub tima: u8,
  pub tma: u8,
  pub tac: u8,
}

/// DIV/TIMA timer clocked by elapsed machine cycles.
#[derive(Debug, Default)]
pub struct Timer {
  pub reg: Registers,
  clock: Clock,
}

impl Timer {
  pub fn new() -> Timer {
    Timer::default()
  }

  pub fn enabled(&self) -> bool {
    self.reg.tac & 0x4 != 0
  }

  /// Cycles per TIMA increment for the selected input clock.
  pub fn period(&self) -> u32 {
    match self.reg.tac & 3 {
      0 => 1024,
      1 => 16,
      2 => 64,
      _ => 256,
    }
  }

  /// Catch up by `cycles`.
  /// Returns true if TIMA overflowed at least once.
  pub fn advance(&mut self, cycles: u32) -> bool {
    self.clock.div += cycles;
    while self.clock.div >= DIV_PERIOD {
      self.clock.div -= DIV_PERIOD;
      self.reg.div = self.reg.div.wrapping_add(1);
    }

    if !self.enabled() {
      return false;
    }

    let period = self.period();
    let mut overflow = false;
    self.clock.main += cycles;
    while self.clock.main >= period {
      self.clock.main -= period;
      overflow |= self.step();
    }
    overflow
  }

  /// Step TIMA and return true on overflow.
  fn step(&mut self) -> bool {
    let (tima, overflow) = self.reg.tima.overflowing_add(1);
    self.reg.tima = if overflow { self.reg.tma } else { tima };
    overflow
  }
}
