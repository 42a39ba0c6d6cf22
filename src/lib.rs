//! Cycle-stepped LR35902 core.
//!
//! The core advances one machine cycle per `CPU::tick` and leaves memory,
//! interrupt handling and instruction semantics to the collaborators it is
//! constructed with.

#[macro_use]
extern crate log;

pub mod component;
pub mod cpu;
pub mod dispatch;
pub mod error;
pub mod gameboy;
pub mod irq;
pub mod isa;
pub mod mem;
pub mod port;

pub use crate::component::{Component, Slot};
pub use crate::cpu::reg::Reg16;
pub use crate::cpu::state::ExecutionState;
pub use crate::cpu::{Core, CPU};
pub use crate::dispatch::{Handler, InstructionTable, TableBuilder};
pub use crate::error::Error;
pub use crate::port::{InterruptPort, MemoryPort};
