use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Operand encoding scheme of a 6502 instruction. `Invalid` marks operand
/// text that matched no grammar; `Relative` is never produced by operand
/// parsing, only selected from the opcode table for branch mnemonics.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum AddrMode {
    Invalid,
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Indirect,
    IndirectX,
    IndirectY,
    Relative,
}

impl AddrMode {
    /// Operand bytes following the opcode byte. Instruction width is always
    /// `1 + operand_width()`, independent of operand value.
    pub fn operand_width(self) -> usize {
        match self {
            AddrMode::Invalid | AddrMode::Implied | AddrMode::Accumulator => 0,
            AddrMode::Immediate
            | AddrMode::ZeroPage
            | AddrMode::ZeroPageX
            | AddrMode::ZeroPageY
            | AddrMode::IndirectX
            | AddrMode::IndirectY
            | AddrMode::Relative => 1,
            AddrMode::Absolute | AddrMode::AbsoluteX | AddrMode::AbsoluteY | AddrMode::Indirect => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operand_widths() {
        assert_eq!(AddrMode::Implied.operand_width(), 0);
        assert_eq!(AddrMode::Immediate.operand_width(), 1);
        assert_eq!(AddrMode::Absolute.operand_width(), 2);
        assert_eq!(AddrMode::Relative.operand_width(), 1);
    }
}
