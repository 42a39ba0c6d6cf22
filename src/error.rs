use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  #[error("no handler for opcode 0x{0:02x}")]
  MissingOpcode(u8),

  #[error("instruction table needs 256 entries, got {0}")]
  TableLength(usize),

  #[error("unknown register `{0}`")]
  UnknownRegister(String),

  #[error("invalid value `{0}` for register")]
  RegisterValue(String),
}

pub type Result<T> = std::result::Result<T, Error>;
