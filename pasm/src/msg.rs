use color_print::cprintln;

use crate::error::ErrorKind;

/// One collected problem: the error kind and the 1-based source line it
/// originated from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub kind: ErrorKind,
}

impl Diagnostic {
    /// Prints a rustc-style diagnostic block with the offending source line.
    pub fn print(&self, path: &str, raw: &str) {
        cprintln!("<red,bold>error</>: {}", self.kind);
        cprintln!("     <blue>--></> <underline>{}:{}</>", path, self.line);
        cprintln!("      <blue>|</>");
        cprintln!(" <blue>{:>4} |</> {}", self.line, raw);
        cprintln!("      <blue>|</>");
    }
}

/// Diagnostics are collected across the whole run, never aborting a pass,
/// so an interactive caller can show every problem at once.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Msgs(Vec<Diagnostic>);

impl Msgs {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn error(&mut self, kind: ErrorKind, line: usize) {
        self.0.push(Diagnostic { line, kind });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has_fatal(&self) -> bool {
        self.0.iter().any(|d| d.kind.is_fatal())
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}
