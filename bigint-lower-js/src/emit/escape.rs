use std::fmt::Write;

/// Writes `value` as a double-quoted JS string literal. Unescaped runs are copied as slices.
/// Non-ASCII text stays UTF-8, except U+2028 and U+2029, which older engines treat as line
/// terminators.
pub fn emit_string_literal_double_quoted(out: &mut String, value: &str) {
  out.push('"');
  let mut run_start = 0;
  for (i, c) in value.char_indices() {
    let escape = match c {
      '"' => Some("\\\""),
      '\\' => Some("\\\\"),
      '\n' => Some("\\n"),
      '\r' => Some("\\r"),
      '\t' => Some("\\t"),
      // `\0` followed by a digit would read as a legacy octal escape.
      '\0' if value[i + 1..].starts_with(|d: char| d.is_ascii_digit()) => Some("\\x00"),
      '\0' => Some("\\0"),
      '\u{2028}' => Some("\\u2028"),
      '\u{2029}' => Some("\\u2029"),
      c if c < ' ' => None,
      _ => continue,
    };
    out.push_str(&value[run_start..i]);
    match escape {
      Some(escape) => out.push_str(escape),
      // Writing to a String cannot fail.
      None => {
        let _ = write!(out, "\\x{:02X}", c as u32);
      }
    };
    run_start = i + c.len_utf8();
  }
  out.push_str(&value[run_start..]);
  out.push('"');
}

#[cfg(test)]
mod tests {
  use super::emit_string_literal_double_quoted;

  #[track_caller]
  fn check(value: &str, expected: &str) {
    let mut out = String::new();
    emit_string_literal_double_quoted(&mut out, value);
    assert_eq!(out, expected);
  }

  #[test]
  fn plain_text_is_copied() {
    check("", r#""""#);
    check("jsbi ünïcode", "\"jsbi ünïcode\"");
  }

  #[test]
  fn quotes_and_control_characters() {
    check("a\"b\\c", r#""a\"b\\c""#);
    check("a\nb\tc\r", r#""a\nb\tc\r""#);
    check("\u{7}\u{1b}", r#""\x07\x1B""#);
  }

  #[test]
  fn nul_before_digit_avoids_octal() {
    check("\u{0}9", r#""\x009""#);
    check("\u{0}a", r#""\0a""#);
    check("\u{0}", r#""\0""#);
  }

  #[test]
  fn line_separators() {
    check("a\u{2028}b\u{2029}", r#""a\u2028b\u2029""#);
  }
}
