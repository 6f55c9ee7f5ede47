use arch::AddrMode;

use crate::error::ErrorKind;
use crate::label::Labels;

/// Which byte of a label's 16-bit location an operand selects. `Low`/`High`
/// come from the `<`/`>` extraction prefixes on immediate operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteSel {
    Full,
    Low,
    High,
}

/// Operand value: a literal known at parse time, or a label reference
/// settled against the label table in pass 2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Resolved(u16),
    Pending { label: String, sel: ByteSel },
}

impl Value {
    pub fn resolve(&self, labels: &Labels) -> Result<u16, ErrorKind> {
        match self {
            Value::Resolved(v) => Ok(*v),
            Value::Pending { label, sel } => {
                let addr = labels
                    .get(label)
                    .ok_or_else(|| ErrorKind::UndefinedLabel(label.clone()))?;
                Ok(match sel {
                    ByteSel::Full => addr,
                    ByteSel::Low => addr & 0x00FF,
                    ByteSel::High => addr >> 8,
                })
            }
        }
    }
}

/// A parsed operand. `mode` is never `Invalid` once parsing succeeds; an
/// `Invalid` mode marks operand text that matched no grammar and is turned
/// into a line-scoped error by the code generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub mode: AddrMode,
    pub value: Value,
}

impl Address {
    fn new(mode: AddrMode, value: Value) -> Self {
        Self { mode, value }
    }

    fn invalid() -> Self {
        Self::new(AddrMode::Invalid, Value::Resolved(0))
    }
}

/// Turns operand text into an [`Address`]. Total over all input: malformed
/// operands come back with `AddrMode::Invalid`, never as an error.
pub fn parse_address(text: &str) -> Address {
    let text = text.trim();

    if text.is_empty() {
        return Address::new(AddrMode::Implied, Value::Resolved(0));
    }
    if text.eq_ignore_ascii_case("A") {
        return Address::new(AddrMode::Accumulator, Value::Resolved(0));
    }
    if let Some(rest) = text.strip_prefix('#') {
        return parse_immediate(rest);
    }

    // Parenthesized forms come before the plain `,X`/`,Y` suffixes: the
    // indirect-Y operand `($nn),Y` would otherwise match the suffix rule.
    if text.starts_with('(') {
        if let Some(inner) = strip_wrap_ci(text, "(", "),Y") {
            return indirect(AddrMode::IndirectY, inner);
        }
        if let Some(inner) = strip_wrap_ci(text, "(", ",X)") {
            return indirect(AddrMode::IndirectX, inner);
        }
        if let Some(inner) = strip_wrap_ci(text, "(", ")") {
            return indirect(AddrMode::Indirect, inner);
        }
        return Address::invalid();
    }

    if let Some(base) = strip_suffix_ci(text, ",X") {
        return direct(base, AddrMode::ZeroPageX, AddrMode::AbsoluteX);
    }
    if let Some(base) = strip_suffix_ci(text, ",Y") {
        return direct(base, AddrMode::ZeroPageY, AddrMode::AbsoluteY);
    }
    direct(text, AddrMode::ZeroPage, AddrMode::Absolute)
}

/// `#` operand: numeric literal or label reference, optionally behind a
/// low/high byte extraction prefix.
fn parse_immediate(rest: &str) -> Address {
    let (rest, sel) = if let Some(r) = rest.strip_prefix('<') {
        (r, ByteSel::Low)
    } else if let Some(r) = rest.strip_prefix('>') {
        (r, ByteSel::High)
    } else {
        (rest, ByteSel::Full)
    };
    if let Some(v) = parse_literal(rest) {
        let v = match sel {
            ByteSel::Full => v,
            ByteSel::Low => v & 0x00FF,
            ByteSel::High => v >> 8,
        };
        return Address::new(AddrMode::Immediate, Value::Resolved(v));
    }
    if is_ident(rest) {
        return Address::new(
            AddrMode::Immediate,
            Value::Pending { label: rest.to_string(), sel },
        );
    }
    Address::invalid()
}

fn indirect(mode: AddrMode, inner: &str) -> Address {
    match parse_value(inner.trim()) {
        Some(value) => Address::new(mode, value),
        None => Address::invalid(),
    }
}

/// Bare value or label, zero-page when the literal fits in one byte. Labels
/// are assumed absolute: their value is unknown until pass 2, and width must
/// not depend on it.
fn direct(base: &str, zp: AddrMode, abs: AddrMode) -> Address {
    match parse_value(base.trim()) {
        Some(Value::Resolved(v)) if v <= 0x00FF => Address::new(zp, Value::Resolved(v)),
        Some(value @ Value::Resolved(_)) => Address::new(abs, value),
        Some(pending) => Address::new(abs, pending),
        None => Address::invalid(),
    }
}

fn parse_value(s: &str) -> Option<Value> {
    if let Some(v) = parse_literal(s) {
        return Some(Value::Resolved(v));
    }
    if is_ident(s) {
        return Some(Value::Pending {
            label: s.to_string(),
            sel: ByteSel::Full,
        });
    }
    None
}

/// `$` hex, `%` binary, bare decimal.
pub fn parse_literal(s: &str) -> Option<u16> {
    if let Some(hex) = s.strip_prefix('$') {
        return u16::from_str_radix(hex, 16).ok();
    }
    if let Some(bin) = s.strip_prefix('%') {
        return u16::from_str_radix(bin, 2).ok();
    }
    if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
        return s.parse().ok();
    }
    None
}

pub fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn strip_suffix_ci<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    let cut = s.len().checked_sub(suffix.len())?;
    if s.is_char_boundary(cut) && s[cut..].eq_ignore_ascii_case(suffix) {
        Some(&s[..cut])
    } else {
        None
    }
}

fn strip_wrap_ci<'a>(s: &'a str, prefix: &str, suffix: &str) -> Option<&'a str> {
    let s = s.strip_prefix(prefix)?;
    strip_suffix_ci(s, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(mode: AddrMode, v: u16) -> Address {
        Address::new(mode, Value::Resolved(v))
    }

    #[test]
    fn implied_and_accumulator() {
        assert_eq!(parse_address(""), resolved(AddrMode::Implied, 0));
        assert_eq!(parse_address("  "), resolved(AddrMode::Implied, 0));
        assert_eq!(parse_address("A"), resolved(AddrMode::Accumulator, 0));
        assert_eq!(parse_address("a"), resolved(AddrMode::Accumulator, 0));
    }

    #[test]
    fn immediate_literals() {
        assert_eq!(parse_address("#$01"), resolved(AddrMode::Immediate, 0x01));
        assert_eq!(parse_address("#%1010"), resolved(AddrMode::Immediate, 0b1010));
        assert_eq!(parse_address("#42"), resolved(AddrMode::Immediate, 42));
    }

    #[test]
    fn immediate_byte_extraction() {
        assert_eq!(
            parse_address("#<START"),
            Address::new(
                AddrMode::Immediate,
                Value::Pending { label: "START".into(), sel: ByteSel::Low }
            )
        );
        assert_eq!(
            parse_address("#>START"),
            Address::new(
                AddrMode::Immediate,
                Value::Pending { label: "START".into(), sel: ByteSel::High }
            )
        );
        // Extraction applies immediately to literals.
        assert_eq!(parse_address("#<$1234"), resolved(AddrMode::Immediate, 0x34));
        assert_eq!(parse_address("#>$1234"), resolved(AddrMode::Immediate, 0x12));
    }

    #[test]
    fn indirect_forms() {
        assert_eq!(parse_address("($10),Y"), resolved(AddrMode::IndirectY, 0x10));
        assert_eq!(parse_address("($10,X)"), resolved(AddrMode::IndirectX, 0x10));
        assert_eq!(parse_address("($1234)"), resolved(AddrMode::Indirect, 0x1234));
        assert_eq!(parse_address("($10),y"), resolved(AddrMode::IndirectY, 0x10));
    }

    #[test]
    fn zero_page_vs_absolute() {
        assert_eq!(parse_address("$10"), resolved(AddrMode::ZeroPage, 0x10));
        assert_eq!(parse_address("$FF"), resolved(AddrMode::ZeroPage, 0xFF));
        assert_eq!(parse_address("$100"), resolved(AddrMode::Absolute, 0x100));
        assert_eq!(parse_address("$10,X"), resolved(AddrMode::ZeroPageX, 0x10));
        assert_eq!(parse_address("$10,y"), resolved(AddrMode::ZeroPageY, 0x10));
        assert_eq!(parse_address("$1234,X"), resolved(AddrMode::AbsoluteX, 0x1234));
        assert_eq!(parse_address("255"), resolved(AddrMode::ZeroPage, 255));
        assert_eq!(parse_address("256"), resolved(AddrMode::Absolute, 256));
    }

    #[test]
    fn labels_default_to_absolute() {
        assert_eq!(
            parse_address("TARGET"),
            Address::new(
                AddrMode::Absolute,
                Value::Pending { label: "TARGET".into(), sel: ByteSel::Full }
            )
        );
        assert_eq!(parse_address("TARGET,X").mode, AddrMode::AbsoluteX);
    }

    #[test]
    fn totality_over_garbage() {
        for bad in ["$GG", "%", "#", "((", "($10", "1,Z", "$10,", "+5", "a b"] {
            assert_eq!(parse_address(bad).mode, AddrMode::Invalid, "{bad}");
        }
    }

    #[test]
    fn resolve_pending() {
        let mut labels = Labels::new();
        labels.insert("START", 0x8042);
        let v = Value::Pending { label: "START".into(), sel: ByteSel::High };
        assert_eq!(v.resolve(&labels), Ok(0x80));
        let missing = Value::Pending { label: "NOPE".into(), sel: ByteSel::Full };
        assert_eq!(
            missing.resolve(&labels),
            Err(ErrorKind::UndefinedLabel("NOPE".into()))
        );
    }
}
