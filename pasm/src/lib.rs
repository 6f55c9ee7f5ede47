//! Two-pass symbolic assembler for the MOS 6502.
//!
//! Pass 1 walks the source collecting labels, macros and instruction widths;
//! pass 2 re-walks it with the complete label table, encoding instructions
//! through the opcode templates into an address-indexed output image.
//! Diagnostics are collected across the whole run instead of aborting on the
//! first problem, so an interactive caller (an editor front end) can show
//! everything at once.
//!
//! ```
//! use pasm::Assembler;
//!
//! let mut asm = Assembler::new();
//! let (image, msgs) = asm.assemble(".org $8000\nLDA #$01\nSTA $0200\n");
//! assert!(msgs.is_empty());
//! assert_eq!(image, [0xA9, 0x01, 0x8D, 0x00, 0x02]);
//! ```

pub mod addr;
pub mod codegen;
pub mod error;
pub mod label;
pub mod msg;
pub mod output;
pub mod parser;

use log::debug;

pub use crate::error::ErrorKind;
pub use crate::msg::{Diagnostic, Msgs};

use crate::label::{Labels, Macros};
use crate::output::OutputBuffer;
use crate::parser::{Directive, Line, LineType};

/// Program counter start when no `.org` directive appears.
pub const DEFAULT_ORIGIN: u16 = 0x8000;

/// Driver states. `Error` absorbs a run once a fatal diagnostic occurred;
/// the image is then provisional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    Pass1,
    Pass2,
    Done,
    Error,
}

/// Owns the label table, macro table and output image of one assembly run.
/// All three are reset at the start of every [`Assembler::assemble`] call,
/// so re-running identical source reproduces identical results. Not
/// reentrant: concurrent runs need separate instances.
#[derive(Debug)]
pub struct Assembler {
    origin: u16,
    state: State,
    labels: Labels,
    macros: Macros,
    output: OutputBuffer,
    msgs: Msgs,
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

impl Assembler {
    pub fn new() -> Self {
        Self {
            origin: DEFAULT_ORIGIN,
            state: State::Idle,
            labels: Labels::new(),
            macros: Macros::new(),
            output: OutputBuffer::new(),
            msgs: Msgs::new(),
        }
    }

    pub fn set_origin(&mut self, origin: u16) {
        self.origin = origin;
    }

    /// Runs both passes to completion and returns the emitted image with the
    /// full diagnostic list. A non-empty list means the image must not be
    /// treated as valid machine code.
    pub fn assemble(&mut self, src: &str) -> (&[u8], &Msgs) {
        self.reset();

        let mut lines: Vec<Line> = src
            .lines()
            .enumerate()
            .map(|(idx, raw)| Line::new(idx, raw))
            .collect();

        self.state = State::Pass1;
        self.pass1(&mut lines);
        self.state = State::Pass2;
        self.pass2(&lines);

        self.state = if self.msgs.has_fatal() {
            State::Error
        } else {
            State::Done
        };
        debug!(
            "assembled {} bytes, {} diagnostics",
            self.output.len(),
            self.msgs.len()
        );
        (self.output.image(), &self.msgs)
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Resolved label table of the last run, in definition order.
    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn macros(&self) -> &Macros {
        &self.macros
    }

    pub fn diagnostics(&self) -> &Msgs {
        &self.msgs
    }

    pub fn image(&self) -> &[u8] {
        self.output.image()
    }

    /// Address of the first emitted byte of the last run.
    pub fn image_base(&self) -> Option<u16> {
        self.output.base()
    }

    fn reset(&mut self) {
        self.labels.clear();
        self.macros.clear();
        self.output.clear();
        self.msgs.clear();
        self.state = State::Idle;
    }

    /// Collects labels and macros and accounts instruction widths. Lines are
    /// macro-expanded here, once, so pass 2 re-reads the same text.
    fn pass1(&mut self, lines: &mut [Line]) {
        debug!("pass 1 over {} lines", lines.len());
        let mut pc = self.origin;
        for line in lines.iter_mut() {
            line.expand(&self.macros);
            match parser::classify(line.code()) {
                LineType::Empty => {}
                LineType::Label => {
                    if let Some(name) = parser::parse_label(line.code()) {
                        if !self.labels.insert(name, pc) {
                            self.msgs
                                .error(ErrorKind::DuplicateLabel(name.to_string()), line.no());
                        }
                    }
                }
                LineType::Directive => match parser::parse_directive(line.code()) {
                    Ok(Directive::Org(addr)) => pc = addr,
                    Ok(Directive::Macro { name, text }) => self.macros.insert(&name, &text),
                    Ok(data) => pc = pc.wrapping_add(data.width() as u16),
                    Err(kind) => self.msgs.error(kind, line.no()),
                },
                LineType::Instruction => {
                    let inst = parser::parse_instruction(line.code());
                    // Unknown mnemonics and modes contribute no bytes; they
                    // are reported once, in pass 2.
                    let width = codegen::instruction_width(&inst).unwrap_or(0);
                    pc = pc.wrapping_add(width as u16);
                }
                LineType::Unknown => self.msgs.error(ErrorKind::Syntax, line.no()),
            }
        }
        debug!("pass 1 found {} labels", self.labels.len());
    }

    /// Encodes instructions and emits directive payloads with the complete
    /// label table. PC accounting must mirror pass 1 exactly even on error
    /// paths, or later labels would drift.
    fn pass2(&mut self, lines: &[Line]) {
        let mut pc = self.origin;
        for line in lines {
            match parser::classify(line.code()) {
                LineType::Instruction => {
                    let inst = parser::parse_instruction(line.code());
                    match codegen::assemble_instruction(&inst, pc, &self.labels) {
                        Ok(asm) => {
                            self.output.insert(&asm.bytes, pc);
                            pc = pc.wrapping_add(asm.bytes.len() as u16);
                        }
                        Err(kind) => {
                            self.msgs.error(kind, line.no());
                            let width = codegen::instruction_width(&inst).unwrap_or(0);
                            pc = pc.wrapping_add(width as u16);
                        }
                    }
                }
                // Malformed directives were already reported in pass 1.
                LineType::Directive => {
                    if let Ok(directive) = parser::parse_directive(line.code()) {
                        pc = self.emit_directive(&directive, pc, line.no());
                    }
                }
                // Labels were recorded in pass 1, syntax errors reported there.
                LineType::Empty | LineType::Label | LineType::Unknown => {}
            }
        }
    }

    fn emit_directive(&mut self, directive: &Directive, pc: u16, line_no: usize) -> u16 {
        match directive {
            Directive::Org(addr) => *addr,
            Directive::Macro { .. } => pc,
            Directive::Byte(values) => {
                let mut bytes = Vec::with_capacity(values.len());
                for value in values {
                    // On resolution failure a zero placeholder keeps the
                    // width pass 1 accounted for.
                    match value.resolve(&self.labels) {
                        Ok(v) => bytes.push((v & 0x00FF) as u8),
                        Err(kind) => {
                            self.msgs.error(kind, line_no);
                            bytes.push(0);
                        }
                    }
                }
                self.output.insert(&bytes, pc);
                pc.wrapping_add(bytes.len() as u16)
            }
            Directive::Word(values) => {
                let mut bytes = Vec::with_capacity(2 * values.len());
                for value in values {
                    match value.resolve(&self.labels) {
                        Ok(v) => bytes.extend_from_slice(&v.to_le_bytes()),
                        Err(kind) => {
                            self.msgs.error(kind, line_no);
                            bytes.extend_from_slice(&[0, 0]);
                        }
                    }
                }
                self.output.insert(&bytes, pc);
                pc.wrapping_add(bytes.len() as u16)
            }
        }
    }
}
