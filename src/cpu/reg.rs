use std::fmt;
use std::str::FromStr;

use crate::error::Error;

pub const Z: u8 = 0x80;
pub const N: u8 = 0x40;
pub const H: u8 = 0x20;
pub const C: u8 = 0x10;

/// Only the top nibble of F holds flags.
const FLAG_MASK: u16 = 0xfff0;

/// Architectural registers, stored as the four 16-bit pairs.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct Registers {
  /// Accumulator and flags.
  pub af: u16,
  pub bc: u16,
  pub de: u16,
  pub hl: u16,

  /// Stack pointer.
  pub sp: u16,

  /// Program counter.
  pub pc: u16,
}

macro_rules! byte_regs {
  ($pair:ident, $hi:ident, $set_hi:ident, $lo:ident, $set_lo:ident) => {
    pub fn $hi(&self) -> u8 {
      (self.$pair >> 8) as u8
    }
    pub fn $lo(&self) -> u8 {
      self.$pair as u8
    }
    pub fn $set_hi(&mut self, value: u8) {
      self.$pair = (self.$pair & 0x00ff) | (u16::from(value) << 8);
    }
    pub fn $set_lo(&mut self, value: u8) {
      self.$pair = (self.$pair & 0xff00) | u16::from(value);
    }
  };
}

impl Registers {
  pub fn new() -> Registers {
    Registers::default()
  }

  byte_regs!(bc, b, set_b, c_reg, set_c);
  byte_regs!(de, d, set_d, e, set_e);
  byte_regs!(hl, h_reg, set_h, l, set_l);

  pub fn a(&self) -> u8 {
    (self.af >> 8) as u8
  }
  pub fn f(&self) -> u8 {
    self.af as u8
  }
  pub fn set_a(&mut self, value: u8) {
    self.af = (self.af & 0x00ff) | (u16::from(value) << 8);
  }

  /// Sets F. The low nibble always reads back as zero.
  pub fn set_f(&mut self, value: u8) {
    self.af = (self.af & 0xff00) | u16::from(value & 0xf0);
  }

  pub fn set_af(&mut self, value: u16) {
    self.af = value & FLAG_MASK;
  }

  pub fn z(&self) -> bool {
    //! Zero flag
    self.f() & Z != 0
  }
  pub fn n(&self) -> bool {
    //! Subtract flag
    self.f() & N != 0
  }
  pub fn h(&self) -> bool {
    //! Half carry flag
    self.f() & H != 0
  }
  pub fn c(&self) -> bool {
    //! Carry flag
    self.f() & C != 0
  }

  pub fn set_flags(&mut self, z: bool, n: bool, h: bool, c: bool) {
    let mut f = 0;
    if z {
      f |= Z;
    }
    if n {
      f |= N;
    }
    if h {
      f |= H;
    }
    if c {
      f |= C;
    }
    self.set_f(f);
  }

  pub fn get(&self, id: Reg16) -> u16 {
    match id {
      Reg16::AF => self.af,
      Reg16::BC => self.bc,
      Reg16::DE => self.de,
      Reg16::HL => self.hl,
      Reg16::SP => self.sp,
      Reg16::PC => self.pc,
    }
  }

  pub fn set(&mut self, id: Reg16, value: u16) {
    match id {
      Reg16::AF => self.set_af(value),
      Reg16::BC => self.bc = value,
      Reg16::DE => self.de = value,
      Reg16::HL => self.hl = value,
      Reg16::SP => self.sp = value,
      Reg16::PC => self.pc = value,
    }
  }
}

impl fmt::Display for Registers {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(
      f,
      "AF={:04x} BC={:04x} DE={:04x} HL={:04x} SP={:04x} PC={:04x} [{}{}{}{}]",
      self.af,
      self.bc,
      self.de,
      self.hl,
      self.sp,
      self.pc,
      if self.z() { 'Z' } else { '-' },
      if self.n() { 'N' } else { '-' },
      if self.h() { 'H' } else { '-' },
      if self.c() { 'C' } else { '-' },
    )
  }
}

/// A 16-bit register that can be inspected or edited by name.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Reg16 {
  AF,
  BC,
  DE,
  HL,
  SP,
  PC,
}

impl Reg16 {
  pub const ALL: [Reg16; 6] =
    [Reg16::AF, Reg16::BC, Reg16::DE, Reg16::HL, Reg16::SP, Reg16::PC];

  pub fn name(self) -> &'static str {
    match self {
      Reg16::AF => "af",
      Reg16::BC => "bc",
      Reg16::DE => "de",
      Reg16::HL => "hl",
      Reg16::SP => "sp",
      Reg16::PC => "pc",
    }
  }
}

impl FromStr for Reg16 {
  type Err = Error;

  fn from_str(s: &str) -> Result<Reg16, Error> {
    let lower = s.trim().to_ascii_lowercase();
    Reg16::ALL
      .iter()
      .copied()
      .find(|r| r.name() == lower)
      .ok_or_else(|| Error::UnknownRegister(s.to_string()))
  }
}

/// Parses `NAME=VALUE`, where VALUE is decimal or `0x`-prefixed hex.
pub fn parse_assignment(s: &str) -> Result<(Reg16, u16), Error> {
  let mut parts = s.splitn(2, '=');
  let name = parts.next().unwrap_or("");
  let value = parts
    .next()
    .ok_or_else(|| Error::RegisterValue(s.to_string()))?
    .trim();
  let id = name.parse::<Reg16>()?;
  let parsed = if let Some(hex) =
    value.strip_prefix("0x").or_else(|| value.strip_prefix("0X"))
  {
    u16::from_str_radix(hex, 16)
  } else {
    value.parse::<u16>()
  };
  parsed
    .map(|v| (id, v))
    .map_err(|_| Error::RegisterValue(value.to_string()))
}
