pub mod timer;

pub use self::timer::Timer;

use crate::cpu::Core;
use crate::port::MemoryPort;

const ADDRESS_SPACE: usize = 0x10000;

/// A flat 64 KiB address space with no banking or I/O mapping.
pub struct Memory {
  data: Vec<u8>,
}

impl Memory {
  pub fn new() -> Memory {
    Memory {
      data: vec![0; ADDRESS_SPACE],
    }
  }

  /// Read a byte at address `addr`.
  pub fn rb(&self, addr: u16) -> u8 {
    self.data[addr as usize]
  }

  /// Read a 2-byte little-endian word from `addr`.
  pub fn rw(&self, addr: u16) -> u16 {
    let a = u16::from(self.rb(addr));
    let b = u16::from(self.rb(addr.wrapping_add(1)));
    (b << 8) | a
  }

  /// Write `value` at address `addr`.
  pub fn wb(&mut self, addr: u16, value: u8) {
    self.data[addr as usize] = value;
  }

  /// Write a 2-byte little-endian word to `addr`.
  pub fn ww(&mut self, addr: u16, value: u16) {
    self.wb(addr, (value & 0xff) as u8);
    self.wb(addr.wrapping_add(1), ((value >> 8) & 0xff) as u8);
  }

  /// Copy `values` in starting at `addr`. Bytes past the end of the address
  /// space are dropped. Returns how many were written.
  pub fn write(&mut self, addr: u16, values: &[u8]) -> usize {
    let start = addr as usize;
    let len = values.len().min(ADDRESS_SPACE - start);
    self.data[start..start + len].copy_from_slice(&values[..len]);
    len
  }
}

impl Default for Memory {
  fn default() -> Memory {
    Memory::new()
  }
}

impl MemoryPort for Memory {
  fn rb(&mut self, _: &Core, addr: u16) -> u8 {
    Memory::rb(self, addr)
  }

  fn wb(&mut self, _: &Core, addr: u16, value: u8) {
    Memory::wb(self, addr, value)
  }
}
