pub mod mnemonic;
pub mod mode;
pub mod opcode;

pub use mnemonic::Mnemonic;
pub use mode::AddrMode;
pub use opcode::{template, width, Cell, Template, OPCODES};
