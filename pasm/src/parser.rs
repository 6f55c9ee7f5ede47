use crate::addr::{is_ident, parse_address, parse_literal, Address, Value};
use crate::error::ErrorKind;
use crate::label::Macros;

/// One source line: comment stripped off at construction, `code` possibly
/// rewritten by macro expansion in pass 1 so both passes see the same text.
#[derive(Debug, Clone)]
pub struct Line {
    idx: usize,
    raw: String,
    code: String,
    comment: Option<String>,
}

impl Line {
    pub fn new(idx: usize, raw: &str) -> Self {
        let (code, comment) = match raw.split_once(';') {
            Some((code, comment)) => (code.trim().to_string(), Some(comment.to_string())),
            None => (raw.trim().to_string(), None),
        };
        Self {
            idx,
            raw: raw.to_string(),
            code,
            comment,
        }
    }

    /// 1-based source line number.
    pub fn no(&self) -> usize {
        self.idx + 1
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Single-level, non-recursive macro substitution: a line whose first
    /// word names a macro is replaced by the macro text verbatim.
    pub fn expand(&mut self, macros: &Macros) {
        if let Some(first) = self.code.split_whitespace().next() {
            if let Some(text) = macros.get(first) {
                self.code = text.to_string();
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    Empty,
    Label,
    Instruction,
    Directive,
    Unknown,
}

/// Classifies a comment-stripped line. Precedence: label grammar first, then
/// directive, then instruction; anything left is `Unknown` and becomes a
/// collected syntax error.
pub fn classify(code: &str) -> LineType {
    let code = code.trim();
    if code.is_empty() {
        return LineType::Empty;
    }
    if label_name(code).is_some() {
        return LineType::Label;
    }
    if code.starts_with('.') {
        return LineType::Directive;
    }
    match code.split_whitespace().next() {
        Some(w) if w.bytes().all(|b| b.is_ascii_alphabetic()) => LineType::Instruction,
        _ => LineType::Unknown,
    }
}

fn label_name(code: &str) -> Option<&str> {
    code.split_whitespace()
        .next()?
        .strip_suffix(':')
        .filter(|name| is_ident(name))
}

/// Extracts the defined name from a line already classified as `Label`.
pub fn parse_label(code: &str) -> Option<&str> {
    label_name(code.trim())
}

/// One assembly-language statement. The mnemonic is kept as text: bad
/// mnemonics are detected at code-generation time, keeping parsing total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub mnemonic: String,
    pub addr: Address,
}

/// Splits on the first whitespace run into mnemonic and operand text. The
/// operand keeps no internal whitespace, so `$10, X` and `$10,X` read alike.
pub fn parse_instruction(code: &str) -> Instruction {
    let code = code.trim();
    let (mnemonic, operand) = match code.split_once(char::is_whitespace) {
        Some((m, rest)) => (m, rest.split_whitespace().collect::<String>()),
        None => (code, String::new()),
    };
    Instruction {
        mnemonic: mnemonic.to_ascii_uppercase(),
        addr: parse_address(&operand),
    }
}

/// The minimum directive set: origin, literal bytes, literal words, macro
/// definition. All start with the distinguishing `.` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Org(u16),
    Byte(Vec<Value>),
    Word(Vec<Value>),
    Macro { name: String, text: String },
}

impl Directive {
    /// Byte width contributed to the program counter. Shared by both passes.
    pub fn width(&self) -> usize {
        match self {
            Directive::Org(_) | Directive::Macro { .. } => 0,
            Directive::Byte(values) => values.len(),
            Directive::Word(values) => 2 * values.len(),
        }
    }
}

pub fn parse_directive(code: &str) -> Result<Directive, ErrorKind> {
    let code = code.trim();
    let (head, rest) = match code.split_once(char::is_whitespace) {
        Some((h, r)) => (h, r.trim()),
        None => (code, ""),
    };
    match head.to_ascii_lowercase().as_str() {
        ".org" => parse_literal(rest).map(Directive::Org).ok_or(ErrorKind::Syntax),
        ".byte" => value_list(rest).map(Directive::Byte),
        ".word" => value_list(rest).map(Directive::Word),
        ".macro" => {
            let (name, text) = rest.split_once(char::is_whitespace).ok_or(ErrorKind::Syntax)?;
            if !is_ident(name) || text.trim().is_empty() {
                return Err(ErrorKind::Syntax);
            }
            Ok(Directive::Macro {
                name: name.to_string(),
                text: text.trim().to_string(),
            })
        }
        _ => Err(ErrorKind::Syntax),
    }
}

/// Comma-separated literals or label references.
fn value_list(rest: &str) -> Result<Vec<Value>, ErrorKind> {
    if rest.is_empty() {
        return Err(ErrorKind::Syntax);
    }
    rest.split(',')
        .map(|item| {
            let item = item.trim();
            if let Some(v) = parse_literal(item) {
                Ok(Value::Resolved(v))
            } else if is_ident(item) {
                Ok(Value::Pending {
                    label: item.to_string(),
                    sel: crate::addr::ByteSel::Full,
                })
            } else {
                Err(ErrorKind::Syntax)
            }
        })
        .collect()
}
