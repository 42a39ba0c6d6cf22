use std::fmt;

use crate::cpu::Core;
use crate::error::{Error, Result};

/// An instruction handler. It runs during the EXECUTE cycle and may write
/// `core.execution_state` to request a memory phase instead of the default
/// next state.
pub type Handler = fn(&mut Core);

const OPCODES: usize = 256;

/// A complete opcode table. Every one of the 256 entries holds a handler;
/// incomplete tables are rejected when they are built.
#[derive(Clone)]
pub struct InstructionTable {
  handlers: [Handler; OPCODES],
}

impl InstructionTable {
  /// Build a table by asking `f` for the handler of each opcode.
  pub fn from_fn<F>(f: F) -> InstructionTable
  where
    F: Fn(u8) -> Handler,
  {
    let mut handlers = [f(0); OPCODES];
    for (op, slot) in handlers.iter_mut().enumerate().skip(1) {
      *slot = f(op as u8);
    }
    InstructionTable { handlers }
  }

  /// A table mapping every opcode to `handler`.
  pub fn filled(handler: Handler) -> InstructionTable {
    InstructionTable {
      handlers: [handler; OPCODES],
    }
  }

  pub fn from_slice(handlers: &[Handler]) -> Result<InstructionTable> {
    if handlers.len() != OPCODES {
      return Err(Error::TableLength(handlers.len()));
    }
    Ok(InstructionTable::from_fn(|op| handlers[op as usize]))
  }

  pub fn get(&self, opcode: u8) -> Handler {
    self.handlers[opcode as usize]
  }
}

impl fmt::Debug for InstructionTable {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.debug_struct("InstructionTable").finish_non_exhaustive()
  }
}

/// Collects handlers opcode by opcode.
///
/// Unset opcodes take the fallback handler if one was given; otherwise
/// `build` fails with the first opcode that has no handler.
pub struct TableBuilder {
  entries: [Option<Handler>; OPCODES],
  fallback: Option<Handler>,
}

impl TableBuilder {
  pub fn new() -> TableBuilder {
    TableBuilder {
      entries: [None; OPCODES],
      fallback: None,
    }
  }

  pub fn set(mut self, opcode: u8, handler: Handler) -> TableBuilder {
    self.entries[opcode as usize] = Some(handler);
    self
  }

  pub fn set_range<I>(mut self, opcodes: I, handler: Handler) -> TableBuilder
  where
    I: IntoIterator<Item = u8>,
  {
    for op in opcodes {
      self.entries[op as usize] = Some(handler);
    }
    self
  }

  /// Handler for every opcode left unset, typically one that reports an
  /// illegal instruction.
  pub fn fallback(mut self, handler: Handler) -> TableBuilder {
    self.fallback = Some(handler);
    self
  }

  pub fn build(self) -> Result<InstructionTable> {
    let mut handlers: Vec<Handler> = Vec::with_capacity(OPCODES);
    for (op, entry) in self.entries.iter().enumerate() {
      match entry.or(self.fallback) {
        Some(h) => handlers.push(h),
        None => return Err(Error::MissingOpcode(op as u8)),
      }
    }
    InstructionTable::from_slice(&handlers)
  }
}

impl Default for TableBuilder {
  fn default() -> TableBuilder {
    TableBuilder::new()
  }
}
