use once_cell::sync::Lazy;
use std::collections::HashMap;
use strum::IntoEnumIterator;

use crate::mnemonic::Mnemonic;
use crate::mode::AddrMode;

/// One cell of an encoding template. Literal bytes are emitted as-is;
/// placeholders are substituted by the code generator once the operand
/// value is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// Opcode or fixed operand byte.
    Lit(u8),
    /// Low byte of the resolved 16-bit operand.
    Lo,
    /// High byte of the resolved 16-bit operand.
    Hi,
    /// Signed 8-bit displacement from the instruction following the branch.
    Rel,
}

pub type Template = &'static [Cell];

impl Mnemonic {
    /// Every legal (addressing mode, encoding template) pair for this
    /// mnemonic. Multi-byte operands are little-endian: `Lo` before `Hi`.
    pub fn encodings(self) -> &'static [(AddrMode, Template)] {
        use AddrMode::*;
        use Cell::*;
        use Mnemonic::*;
        match self {
            ADC => &[
                (Immediate, &[Lit(0x69), Lo]),
                (ZeroPage, &[Lit(0x65), Lo]),
                (ZeroPageX, &[Lit(0x75), Lo]),
                (Absolute, &[Lit(0x6D), Lo, Hi]),
                (AbsoluteX, &[Lit(0x7D), Lo, Hi]),
                (AbsoluteY, &[Lit(0x79), Lo, Hi]),
                (IndirectX, &[Lit(0x61), Lo]),
                (IndirectY, &[Lit(0x71), Lo]),
            ],
            AND => &[
                (Immediate, &[Lit(0x29), Lo]),
                (ZeroPage, &[Lit(0x25), Lo]),
                (ZeroPageX, &[Lit(0x35), Lo]),
                (Absolute, &[Lit(0x2D), Lo, Hi]),
                (AbsoluteX, &[Lit(0x3D), Lo, Hi]),
                (AbsoluteY, &[Lit(0x39), Lo, Hi]),
                (IndirectX, &[Lit(0x21), Lo]),
                (IndirectY, &[Lit(0x31), Lo]),
            ],
            ASL => &[
                (Accumulator, &[Lit(0x0A)]),
                (ZeroPage, &[Lit(0x06), Lo]),
                (ZeroPageX, &[Lit(0x16), Lo]),
                (Absolute, &[Lit(0x0E), Lo, Hi]),
                (AbsoluteX, &[Lit(0x1E), Lo, Hi]),
            ],
            BCC => &[(Relative, &[Lit(0x90), Rel])],
            BCS => &[(Relative, &[Lit(0xB0), Rel])],
            BEQ => &[(Relative, &[Lit(0xF0), Rel])],
            BIT => &[
                (ZeroPage, &[Lit(0x24), Lo]),
                (Absolute, &[Lit(0x2C), Lo, Hi]),
            ],
            BMI => &[(Relative, &[Lit(0x30), Rel])],
            BNE => &[(Relative, &[Lit(0xD0), Rel])],
            BPL => &[(Relative, &[Lit(0x10), Rel])],
            BRK => &[(Implied, &[Lit(0x00)])],
            BVC => &[(Relative, &[Lit(0x50), Rel])],
            BVS => &[(Relative, &[Lit(0x70), Rel])],
            CLC => &[(Implied, &[Lit(0x18)])],
            CLD => &[(Implied, &[Lit(0xD8)])],
            CLI => &[(Implied, &[Lit(0x58)])],
            CLV => &[(Implied, &[Lit(0xB8)])],
            CMP => &[
                (Immediate, &[Lit(0xC9), Lo]),
                (ZeroPage, &[Lit(0xC5), Lo]),
                (ZeroPageX, &[Lit(0xD5), Lo]),
                (Absolute, &[Lit(0xCD), Lo, Hi]),
                (AbsoluteX, &[Lit(0xDD), Lo, Hi]),
                (AbsoluteY, &[Lit(0xD9), Lo, Hi]),
                (IndirectX, &[Lit(0xC1), Lo]),
                (IndirectY, &[Lit(0xD1), Lo]),
            ],
            CPX => &[
                (Immediate, &[Lit(0xE0), Lo]),
                (ZeroPage, &[Lit(0xE4), Lo]),
                (Absolute, &[Lit(0xEC), Lo, Hi]),
            ],
            CPY => &[
                (Immediate, &[Lit(0xC0), Lo]),
                (ZeroPage, &[Lit(0xC4), Lo]),
                (Absolute, &[Lit(0xCC), Lo, Hi]),
            ],
            DEC => &[
                (ZeroPage, &[Lit(0xC6), Lo]),
                (ZeroPageX, &[Lit(0xD6), Lo]),
                (Absolute, &[Lit(0xCE), Lo, Hi]),
                (AbsoluteX, &[Lit(0xDE), Lo, Hi]),
            ],
            DEX => &[(Implied, &[Lit(0xCA)])],
            DEY => &[(Implied, &[Lit(0x88)])],
            EOR => &[
                (Immediate, &[Lit(0x49), Lo]),
                (ZeroPage, &[Lit(0x45), Lo]),
                (ZeroPageX, &[Lit(0x55), Lo]),
                (Absolute, &[Lit(0x4D), Lo, Hi]),
                (AbsoluteX, &[Lit(0x5D), Lo, Hi]),
                (AbsoluteY, &[Lit(0x59), Lo, Hi]),
                (IndirectX, &[Lit(0x41), Lo]),
                (IndirectY, &[Lit(0x51), Lo]),
            ],
            INC => &[
                (ZeroPage, &[Lit(0xE6), Lo]),
                (ZeroPageX, &[Lit(0xF6), Lo]),
                (Absolute, &[Lit(0xEE), Lo, Hi]),
                (AbsoluteX, &[Lit(0xFE), Lo, Hi]),
            ],
            INX => &[(Implied, &[Lit(0xE8)])],
            INY => &[(Implied, &[Lit(0xC8)])],
            JMP => &[
                (Absolute, &[Lit(0x4C), Lo, Hi]),
                (Indirect, &[Lit(0x6C), Lo, Hi]),
            ],
            JSR => &[(Absolute, &[Lit(0x20), Lo, Hi])],
            LDA => &[
                (Immediate, &[Lit(0xA9), Lo]),
                (ZeroPage, &[Lit(0xA5), Lo]),
                (ZeroPageX, &[Lit(0xB5), Lo]),
                (Absolute, &[Lit(0xAD), Lo, Hi]),
                (AbsoluteX, &[Lit(0xBD), Lo, Hi]),
                (AbsoluteY, &[Lit(0xB9), Lo, Hi]),
                (IndirectX, &[Lit(0xA1), Lo]),
                (IndirectY, &[Lit(0xB1), Lo]),
            ],
            LDX => &[
                (Immediate, &[Lit(0xA2), Lo]),
                (ZeroPage, &[Lit(0xA6), Lo]),
                (ZeroPageY, &[Lit(0xB6), Lo]),
                (Absolute, &[Lit(0xAE), Lo, Hi]),
                (AbsoluteY, &[Lit(0xBE), Lo, Hi]),
            ],
            LDY => &[
                (Immediate, &[Lit(0xA0), Lo]),
                (ZeroPage, &[Lit(0xA4), Lo]),
                (ZeroPageX, &[Lit(0xB4), Lo]),
                (Absolute, &[Lit(0xAC), Lo, Hi]),
                (AbsoluteX, &[Lit(0xBC), Lo, Hi]),
            ],
            LSR => &[
                (Accumulator, &[Lit(0x4A)]),
                (ZeroPage, &[Lit(0x46), Lo]),
                (ZeroPageX, &[Lit(0x56), Lo]),
                (Absolute, &[Lit(0x4E), Lo, Hi]),
                (AbsoluteX, &[Lit(0x5E), Lo, Hi]),
            ],
            NOP => &[(Implied, &[Lit(0xEA)])],
            ORA => &[
                (Immediate, &[Lit(0x09), Lo]),
                (ZeroPage, &[Lit(0x05), Lo]),
                (ZeroPageX, &[Lit(0x15), Lo]),
                (Absolute, &[Lit(0x0D), Lo, Hi]),
                (AbsoluteX, &[Lit(0x1D), Lo, Hi]),
                (AbsoluteY, &[Lit(0x19), Lo, Hi]),
                (IndirectX, &[Lit(0x01), Lo]),
                (IndirectY, &[Lit(0x11), Lo]),
            ],
            PHA => &[(Implied, &[Lit(0x48)])],
            PHP => &[(Implied, &[Lit(0x08)])],
            PLA => &[(Implied, &[Lit(0x68)])],
            PLP => &[(Implied, &[Lit(0x28)])],
            ROL => &[
                (Accumulator, &[Lit(0x2A)]),
                (ZeroPage, &[Lit(0x26), Lo]),
                (ZeroPageX, &[Lit(0x36), Lo]),
                (Absolute, &[Lit(0x2E), Lo, Hi]),
                (AbsoluteX, &[Lit(0x3E), Lo, Hi]),
            ],
            ROR => &[
                (Accumulator, &[Lit(0x6A)]),
                (ZeroPage, &[Lit(0x66), Lo]),
                (ZeroPageX, &[Lit(0x76), Lo]),
                (Absolute, &[Lit(0x6E), Lo, Hi]),
                (AbsoluteX, &[Lit(0x7E), Lo, Hi]),
            ],
            RTI => &[(Implied, &[Lit(0x40)])],
            RTS => &[(Implied, &[Lit(0x60)])],
            SBC => &[
                (Immediate, &[Lit(0xE9), Lo]),
                (ZeroPage, &[Lit(0xE5), Lo]),
                (ZeroPageX, &[Lit(0xF5), Lo]),
                (Absolute, &[Lit(0xED), Lo, Hi]),
                (AbsoluteX, &[Lit(0xFD), Lo, Hi]),
                (AbsoluteY, &[Lit(0xF9), Lo, Hi]),
                (IndirectX, &[Lit(0xE1), Lo]),
                (IndirectY, &[Lit(0xF1), Lo]),
            ],
            SEC => &[(Implied, &[Lit(0x38)])],
            SED => &[(Implied, &[Lit(0xF8)])],
            SEI => &[(Implied, &[Lit(0x78)])],
            STA => &[
                (ZeroPage, &[Lit(0x85), Lo]),
                (ZeroPageX, &[Lit(0x95), Lo]),
                (Absolute, &[Lit(0x8D), Lo, Hi]),
                (AbsoluteX, &[Lit(0x9D), Lo, Hi]),
                (AbsoluteY, &[Lit(0x99), Lo, Hi]),
                (IndirectX, &[Lit(0x81), Lo]),
                (IndirectY, &[Lit(0x91), Lo]),
            ],
            STX => &[
                (ZeroPage, &[Lit(0x86), Lo]),
                (ZeroPageY, &[Lit(0x96), Lo]),
                (Absolute, &[Lit(0x8E), Lo, Hi]),
            ],
            STY => &[
                (ZeroPage, &[Lit(0x84), Lo]),
                (ZeroPageX, &[Lit(0x94), Lo]),
                (Absolute, &[Lit(0x8C), Lo, Hi]),
            ],
            TAX => &[(Implied, &[Lit(0xAA)])],
            TAY => &[(Implied, &[Lit(0xA8)])],
            TSX => &[(Implied, &[Lit(0xBA)])],
            TXA => &[(Implied, &[Lit(0x8A)])],
            TXS => &[(Implied, &[Lit(0x9A)])],
            TYA => &[(Implied, &[Lit(0x98)])],
        }
    }
}

/// Full mnemonic -> mode -> template map, built once.
pub static OPCODES: Lazy<HashMap<Mnemonic, HashMap<AddrMode, Template>>> = Lazy::new(|| {
    Mnemonic::iter()
        .map(|mn| (mn, mn.encodings().iter().copied().collect()))
        .collect()
});

/// Template for an exact (mnemonic, mode) pair.
pub fn template(mn: Mnemonic, mode: AddrMode) -> Option<Template> {
    OPCODES.get(&mn).and_then(|modes| modes.get(&mode)).copied()
}

/// Maps the mode recovered from operand syntax to the mode actually encoded
/// for `mn`. Branch targets parse as zero-page/absolute values but encode as
/// relative displacements; `JMP $12` has no zero-page form and widens to
/// absolute; a bare `ASL` is the accumulator form.
pub fn normalize(mn: Mnemonic, mode: AddrMode) -> Option<AddrMode> {
    let chain: &[AddrMode] = match mode {
        AddrMode::Implied => &[AddrMode::Implied, AddrMode::Accumulator],
        AddrMode::ZeroPage => &[AddrMode::ZeroPage, AddrMode::Absolute, AddrMode::Relative],
        AddrMode::Absolute => &[AddrMode::Absolute, AddrMode::Relative],
        AddrMode::ZeroPageX => &[AddrMode::ZeroPageX, AddrMode::AbsoluteX],
        AddrMode::ZeroPageY => &[AddrMode::ZeroPageY, AddrMode::AbsoluteY],
        other => &[other],
    };
    let mut chain = chain.iter().copied();
    chain.find(|&m| template(mn, m).is_some())
}

/// Instruction byte width for a (mnemonic, parsed mode) pair. Shared by the
/// pass-1 length accounting and the pass-2 code generator so the two passes
/// cannot disagree on size.
pub fn width(mn: Mnemonic, mode: AddrMode) -> Option<usize> {
    normalize(mn, mode).and_then(|m| template(mn, m)).map(|t| t.len())
}
