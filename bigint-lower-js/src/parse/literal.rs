use crate::error::SyntaxErrorKind;
use crate::error::SyntaxResult;
use crate::loc::Loc;
use num_bigint::BigUint;

fn decode_escape(raw: &str, i: &mut usize, out: &mut String) {
  let rest = &raw[*i..];
  let mut chars = rest.chars();
  let Some(c) = chars.next() else {
    return;
  };
  *i += c.len_utf8();
  let hex = |digits: &str| u32::from_str_radix(digits, 16).ok().and_then(char::from_u32);
  match c {
    'n' => out.push('\n'),
    'r' => out.push('\r'),
    't' => out.push('\t'),
    'b' => out.push('\u{8}'),
    'f' => out.push('\u{c}'),
    'v' => out.push('\u{b}'),
    '0' if !rest[1..].starts_with(|d: char| d.is_ascii_digit()) => out.push('\0'),
    // Line continuation.
    '\r' => {
      if raw[*i..].starts_with('\n') {
        *i += 1;
      }
    }
    '\n' | '\u{2028}' | '\u{2029}' => {}
    'x' => match raw.get(*i..*i + 2).and_then(hex) {
      Some(ch) => {
        out.push(ch);
        *i += 2;
      }
      None => out.push('x'),
    },
    'u' if raw[*i..].starts_with('{') => {
      let end = raw[*i..].find('}').map(|p| *i + p);
      match end.and_then(|end| raw.get(*i + 1..end).and_then(hex).map(|ch| (ch, end))) {
        Some((ch, end)) => {
          out.push(ch);
          *i = end + 1;
        }
        None => out.push('u'),
      }
    }
    'u' => match raw.get(*i..*i + 4).and_then(hex) {
      Some(ch) => {
        out.push(ch);
        *i += 4;
      }
      // Lone surrogates cannot be represented; keep the escape text.
      None => {
        out.push_str("\\u");
      }
    },
    other => out.push(other),
  };
}

fn decode(raw: &str) -> String {
  let mut out = String::with_capacity(raw.len());
  let mut i = 0;
  while let Some(pos) = raw[i..].find('\\') {
    out.push_str(&raw[i..i + pos]);
    i += pos + 1;
    decode_escape(raw, &mut i, &mut out);
  }
  out.push_str(&raw[i..]);
  out
}

/// Decodes a quoted string literal's source text, including the quotes.
pub fn normalise_literal_string(raw: &str) -> String {
  decode(&raw[1..raw.len() - 1])
}

pub fn normalise_identifier(raw: &str) -> String {
  if raw.contains('\\') {
    decode(raw)
  } else {
    raw.to_string()
  }
}

/// Whether every `_` in a numeric literal sits between two digits. `digits` is the literal
/// without its radix prefix or `n` suffix.
fn separators_well_placed(digits: &str, radix: u32) -> bool {
  let chars: Vec<char> = digits.chars().collect();
  chars.iter().enumerate().all(|(i, &c)| {
    c != '_'
      || (i > 0
        && chars[i - 1].is_digit(radix)
        && chars.get(i + 1).is_some_and(|next| next.is_digit(radix)))
  })
}

fn radix_of(raw: &str) -> (u32, &str) {
  match raw.get(..2).map(|p| p.to_ascii_lowercase()).as_deref() {
    Some("0x") => (16, &raw[2..]),
    Some("0o") => (8, &raw[2..]),
    Some("0b") => (2, &raw[2..]),
    _ => (10, raw),
  }
}

/// Checks separator placement in a number literal and returns its source text unchanged.
pub fn normalise_literal_number(loc: Loc, raw: &str) -> SyntaxResult<String> {
  let (radix, digits) = radix_of(raw);
  if !separators_well_placed(digits, radix) {
    return Err(loc.error(SyntaxErrorKind::MalformedNumber, None));
  }
  Ok(raw.to_string())
}

/// Returns the digits of a BigInt literal (source text ending in `n`) with separators removed.
pub fn normalise_literal_bigint(loc: Loc, raw: &str) -> SyntaxResult<String> {
  let malformed = || loc.error(SyntaxErrorKind::MalformedNumber, None);
  let literal = raw.strip_suffix('n').ok_or_else(malformed)?;
  let (radix, body) = radix_of(literal);
  if !separators_well_placed(body, radix) {
    return Err(malformed());
  }
  let digits: String = literal.chars().filter(|&c| c != '_').collect();
  // Legacy octal and leading zeros are not allowed on BigInt literals.
  if digits.len() > 1 && digits.starts_with('0') && digits[1..].starts_with(|c: char| c.is_ascii_digit()) {
    return Err(malformed());
  }
  if bigint_value(&digits).is_none() {
    return Err(malformed());
  }
  Ok(digits)
}

/// The exact value of BigInt literal digits (decimal, `0x`, `0o` or `0b`).
pub fn bigint_value(digits: &str) -> Option<BigUint> {
  let lower = digits.to_ascii_lowercase();
  let (radix, body) = match lower.get(..2) {
    Some("0x") => (16, &lower[2..]),
    Some("0o") => (8, &lower[2..]),
    Some("0b") => (2, &lower[2..]),
    _ => (10, lower.as_str()),
  };
  if body.is_empty() {
    return None;
  }
  BigUint::parse_bytes(body.as_bytes(), radix)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn decodes_string_escapes() {
    assert_eq!(normalise_literal_string(r#""bigint""#), "bigint");
    assert_eq!(normalise_literal_string(r#"'a\'b'"#), "a'b");
    assert_eq!(normalise_literal_string(r#""\x62i\u{67}int""#), "bigint");
    assert_eq!(normalise_literal_string("\"a\\\nb\""), "ab");
    assert_eq!(normalise_literal_string(r#""\n\t\\""#), "\n\t\\");
  }

  #[test]
  fn bigint_digits_and_values() {
    let loc = Loc(0, 0);
    assert_eq!(normalise_literal_bigint(loc, "1_000n").unwrap(), "1000");
    assert_eq!(normalise_literal_bigint(loc, "0x1Fn").unwrap(), "0x1F");
    assert!(normalise_literal_bigint(loc, "01n").is_err());
    assert_eq!(normalise_literal_bigint(loc, "0xF_Fn").unwrap(), "0xFF");
  }

  #[test]
  fn misplaced_separators_are_rejected() {
    let loc = Loc(0, 0);
    for raw in ["1_n", "1__0n", "0x_1n", "0b1_n"] {
      assert!(normalise_literal_bigint(loc, raw).is_err(), "{}", raw);
    }
    for raw in ["1_", "1__0", "1_.5", "1._5", "1_e3", "0x_1"] {
      assert!(normalise_literal_number(loc, raw).is_err(), "{}", raw);
    }
    for raw in ["1_000.000_1", "1e1_0", "0x1_e", ".5"] {
      assert!(normalise_literal_number(loc, raw).is_ok(), "{}", raw);
    }
    assert_eq!(bigint_value("0x1F").unwrap(), BigUint::from(31u32));
    assert_eq!(bigint_value("0o17").unwrap(), BigUint::from(15u32));
    assert_eq!(bigint_value("0b101").unwrap(), BigUint::from(5u32));
    assert_eq!(
      bigint_value("123456789012345678901234567890").unwrap().to_string(),
      "123456789012345678901234567890"
    );
  }
}
