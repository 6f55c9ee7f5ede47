use arch::{opcode, AddrMode, Cell, Mnemonic};

use crate::error::ErrorKind;
use crate::label::Labels;
use crate::parser::Instruction;

/// Output of the code generator for one instruction. `bytes.len()` always
/// equals the table template's length for the encoded mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledInstruction {
    pub orig: Instruction,
    pub bytes: Vec<u8>,
}

/// Encodes one parsed instruction at `pc` against the complete label table.
/// Fails on an unknown mnemonic, a mode with no table entry, an
/// unresolvable label, or a relative displacement outside i8 range.
pub fn assemble_instruction(
    inst: &Instruction,
    pc: u16,
    labels: &Labels,
) -> Result<AssembledInstruction, ErrorKind> {
    let mn = Mnemonic::parse(&inst.mnemonic)
        .ok_or_else(|| ErrorKind::UnknownMnemonic(inst.mnemonic.clone()))?;
    if inst.addr.mode == AddrMode::Invalid {
        return Err(ErrorKind::InvalidAddressingMode(inst.mnemonic.clone()));
    }
    let tmpl = opcode::normalize(mn, inst.addr.mode)
        .and_then(|mode| opcode::template(mn, mode))
        .ok_or_else(|| ErrorKind::InvalidAddressingMode(inst.mnemonic.clone()))?;

    let value = inst.addr.value.resolve(labels)?;

    let mut bytes = Vec::with_capacity(tmpl.len());
    for cell in tmpl {
        bytes.push(match cell {
            Cell::Lit(b) => *b,
            Cell::Lo => (value & 0x00FF) as u8,
            Cell::Hi => (value >> 8) as u8,
            Cell::Rel => {
                let disp = value as i32 - (pc as i32 + tmpl.len() as i32);
                if !(-128..=127).contains(&disp) {
                    return Err(ErrorKind::BranchOutOfRange(disp));
                }
                disp as i8 as u8
            }
        });
    }
    Ok(AssembledInstruction {
        orig: inst.clone(),
        bytes,
    })
}

/// Pass-1 byte width of an instruction, from the same table lookup the code
/// generator uses. `None` when the mnemonic or mode has no entry: such lines
/// contribute no bytes and are reported in pass 2.
pub fn instruction_width(inst: &Instruction) -> Option<usize> {
    let mn = Mnemonic::parse(&inst.mnemonic)?;
    opcode::width(mn, inst.addr.mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_instruction;

    fn encode(line: &str, pc: u16, labels: &Labels) -> Result<Vec<u8>, ErrorKind> {
        assemble_instruction(&parse_instruction(line), pc, labels).map(|a| a.bytes)
    }

    #[test]
    fn immediate_literal() {
        let labels = Labels::new();
        assert_eq!(encode("LDA #$01", 0x8000, &labels), Ok(vec![0xA9, 0x01]));
    }

    #[test]
    fn absolute_is_little_endian() {
        let labels = Labels::new();
        assert_eq!(
            encode("STA $0200", 0x8000, &labels),
            Ok(vec![0x8D, 0x00, 0x02])
        );
        assert_eq!(encode("JMP ($1234)", 0x8000, &labels), Ok(vec![0x6C, 0x34, 0x12]));
    }

    #[test]
    fn label_resolution() {
        let mut labels = Labels::new();
        labels.insert("TARGET", 0x8003);
        assert_eq!(
            encode("JMP TARGET", 0x8000, &labels),
            Ok(vec![0x4C, 0x03, 0x80])
        );
        assert_eq!(
            encode("JMP NOWHERE", 0x8000, &labels),
            Err(ErrorKind::UndefinedLabel("NOWHERE".into()))
        );
    }

    #[test]
    fn branch_displacement() {
        let mut labels = Labels::new();
        labels.insert("BACK", 0x8000);
        // displacement = target - (pc + 2)
        assert_eq!(encode("BNE BACK", 0x8004, &labels), Ok(vec![0xD0, 0xFA]));
        // Exactly -128 still fits.
        assert_eq!(encode("BNE BACK", 0x807E, &labels), Ok(vec![0xD0, 0x80]));
        assert_eq!(
            encode("BNE BACK", 0x807F, &labels),
            Err(ErrorKind::BranchOutOfRange(-129))
        );
        // Forward limit.
        labels.insert("FWD", 0x8081);
        assert_eq!(encode("BEQ FWD", 0x8000, &labels), Ok(vec![0xF0, 0x7F]));
    }

    #[test]
    fn unknown_mnemonic_and_bad_mode() {
        let labels = Labels::new();
        assert_eq!(
            encode("FOO #$01", 0x8000, &labels),
            Err(ErrorKind::UnknownMnemonic("FOO".into()))
        );
        // STA has no immediate form.
        assert_eq!(
            encode("STA #$01", 0x8000, &labels),
            Err(ErrorKind::InvalidAddressingMode("STA".into()))
        );
        // Operand matched no grammar.
        assert_eq!(
            encode("LDA $GG", 0x8000, &labels),
            Err(ErrorKind::InvalidAddressingMode("LDA".into()))
        );
    }

    #[test]
    fn width_matches_emitted_length() {
        let labels = Labels::new();
        for line in ["NOP", "LDA #$01", "LDA $10", "LDA $1234", "ASL", "JMP $1234"] {
            let inst = parse_instruction(line);
            let bytes = assemble_instruction(&inst, 0x8000, &labels).unwrap().bytes;
            assert_eq!(instruction_width(&inst), Some(bytes.len()), "{line}");
        }
    }

    #[test]
    fn branch_width_is_two_in_pass_one() {
        // Label operands parse as absolute; the width lookup must still
        // settle on the 2-byte relative form before the label resolves.
        let inst = parse_instruction("BNE SOMEWHERE");
        assert_eq!(instruction_width(&inst), Some(2));
    }
}
