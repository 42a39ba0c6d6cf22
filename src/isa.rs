//! A small demonstration instruction table.
//!
//! Only NOP and HALT do anything. The eleven opcodes the LR35902 leaves
//! undefined report themselves and halt; everything else is logged and
//! treated as a NOP.

use crate::cpu::Core;
use crate::dispatch::{InstructionTable, TableBuilder};
use crate::error::Result;

pub const ILLEGAL: [u8; 11] = [
  0xd3, 0xdb, 0xdd, 0xe3, 0xe4, 0xeb, 0xec, 0xed, 0xf4, 0xfc, 0xfd,
];

/// Address the handler's opcode was fetched from.
fn opcode_addr(core: &Core) -> u16 {
  core.regs.pc.wrapping_sub(1)
}

fn nop(_: &mut Core) {}

fn halt(core: &mut Core) {
  debug!("halt at 0x{:04x}", opcode_addr(core));
  core.halted = true;
}

fn illegal(core: &mut Core) {
  warn!(
    "illegal opcode 0x{:02x} at 0x{:04x}",
    core.bus,
    opcode_addr(core)
  );
  core.halted = true;
}

fn unimplemented(core: &mut Core) {
  warn!(
    "unimplemented opcode 0x{:02x} at 0x{:04x}",
    core.bus,
    opcode_addr(core)
  );
}

pub fn table() -> Result<InstructionTable> {
  TableBuilder::new()
    .set(0x00, nop)
    .set(0x76, halt)
    .set_range(ILLEGAL.iter().copied(), illegal)
    .fallback(unimplemented)
    .build()
}
