use std::sync::Arc;

use crate::component::Board;
use crate::cpu::reg::Reg16;
use crate::cpu::CPU;
use crate::error::Result;
use crate::irq::InterruptController;
use crate::isa;
use crate::mem::Memory;

/// Session settings applied on every reset.
#[derive(Debug, Clone)]
pub struct Config {
  /// Cycles between interrupt controller events.
  pub quantum: u32,
  pub tac: u8,
  pub interrupt_enable: u8,
  pub ime: bool,
  /// Register presets, applied in order after the core is zeroed.
  pub registers: Vec<(Reg16, u16)>,
}

impl Default for Config {
  fn default() -> Config {
    Config {
      quantum: 4,
      tac: 0,
      interrupt_enable: 0,
      ime: false,
      registers: Vec::new(),
    }
  }
}

/// One emulated session: a flat memory image, the interrupt controller and
/// the demonstration instruction table wired into a core.
pub struct GameBoy {
  cpu: CPU<Memory, InterruptController>,
  config: Config,
}

impl GameBoy {
  pub fn new(program: &[u8], config: Config) -> Result<GameBoy> {
    let mut mem = Memory::new();
    let loaded = mem.write(0, program);
    if loaded < program.len() {
      warn!("program truncated to {} of {} bytes", loaded, program.len());
    }

    let irq = InterruptController::new(config.quantum);
    let table = Arc::new(isa::table()?);
    let mut cpu = CPU::new(mem, irq, table, Box::new(Board));
    cpu.init();

    let mut gameboy = GameBoy { cpu, config };
    gameboy.reset();
    Ok(gameboy)
  }

  pub fn reset(&mut self) {
    self.cpu.reset();

    let irq = &mut self.cpu.irq;
    irq.timer.reg.tac = self.config.tac;
    irq.interrupt_enable = self.config.interrupt_enable;
    irq.ime = self.config.ime;
    for &(id, value) in &self.config.registers {
      self.cpu.core.set_register(id, value);
    }
    debug!("reset: {}", self.cpu.core);
  }

  /// Tick up to `cycles` times, stopping after the tick that halts the
  /// core. Returns the number of cycles run.
  pub fn run(&mut self, cycles: u32) -> u32 {
    for n in 0..cycles {
      self.cpu.tick();
      if self.cpu.core.halted {
        info!("halted after {} cycles", n + 1);
        return n + 1;
      }
    }
    cycles
  }

  pub fn cpu(&self) -> &CPU<Memory, InterruptController> {
    &self.cpu
  }

  pub fn cpu_mut(&mut self) -> &mut CPU<Memory, InterruptController> {
    &mut self.cpu
  }
}

impl Drop for GameBoy {
  fn drop(&mut self) {
    self.cpu.deinit();
  }
}
