//! Character classes used by the lexer. Non-ASCII characters other than whitespace and line
//! terminators are accepted as identifier characters without consulting Unicode tables.

pub fn is_line_terminator(c: char) -> bool {
  matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Whitespace that is not a line terminator.
pub fn is_whitespace(c: char) -> bool {
  matches!(c, '\t' | '\u{b}' | '\u{c}' | ' ' | '\u{a0}' | '\u{feff}') || (!c.is_ascii() && c.is_whitespace() && !is_line_terminator(c))
}

pub fn is_id_start(c: char) -> bool {
  c.is_ascii_alphabetic() || c == '_' || c == '$' || (!c.is_ascii() && !c.is_whitespace())
}

pub fn is_id_continue(c: char) -> bool {
  is_id_start(c) || c.is_ascii_digit()
}

/// Whether `c` is a digit in `radix` (2, 8, 10 or 16).
pub fn is_radix_digit(c: char, radix: u32) -> bool {
  c.to_digit(radix).is_some()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn classes() {
    assert!(is_id_start('$') && is_id_start('é') && !is_id_start('1'));
    assert!(is_id_continue('1'));
    assert!(is_whitespace('\u{3000}') && !is_whitespace('\u{2028}'));
    assert!(is_line_terminator('\u{2029}'));
    assert!(is_radix_digit('f', 16) && !is_radix_digit('8', 8));
  }
}
