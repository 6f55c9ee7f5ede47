use thiserror::Error;

/// Everything the assembler reports. Each kind is attached to its source
/// line number by [`crate::msg::Diagnostic`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("Syntax error: cannot parse line")]
    Syntax,

    #[error("Invalid addressing mode for `{0}`")]
    InvalidAddressingMode(String),

    #[error("Unknown mnemonic: `{0}`")]
    UnknownMnemonic(String),

    #[error("Undefined label: `{0}`")]
    UndefinedLabel(String),

    #[error("Re-defined label: `{0}`")]
    DuplicateLabel(String),

    #[error("Branch out of range: displacement {0} does not fit in a signed byte")]
    BranchOutOfRange(i32),
}

impl ErrorKind {
    /// Fatal kinds put the run in the `Error` state; the output image is
    /// then provisional and must not be used as machine code.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ErrorKind::UndefinedLabel(_) | ErrorKind::DuplicateLabel(_)
        )
    }
}
