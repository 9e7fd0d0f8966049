//! Decoding of quoted literals: `"interpreted"`, `` `raw` `` and `'c'`.

/// Decode a double-quoted or back-quoted string token into its value.
pub fn unquote(text: &str) -> Result<String, String> {
    if let Some(body) = text
        .strip_prefix('`')
        .and_then(|rest| rest.strip_suffix('`'))
    {
        if body.contains('`') {
            return Err(format!("invalid syntax: {text}"));
        }
        return Ok(body.replace('\r', ""));
    }

    let Some(mut body) = text
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return Err(format!("invalid syntax: {text}"));
    };

    let mut bytes = Vec::with_capacity(body.len());
    while !body.is_empty() {
        if body.starts_with('"') || body.starts_with('\n') {
            return Err(format!("invalid syntax: {text}"));
        }
        let (value, tail) = unquote_char(body, '"')?;
        match value {
            Unquoted::Char(c) => {
                let mut buf = [0u8; 4];
                bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
            Unquoted::Byte(b) => bytes.push(b),
        }
        body = tail;
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Decode a character constant such as `'a'` or `'\n'` to its code point.
pub fn unquote_char_constant(text: &str) -> Result<char, String> {
    let malformed = || format!("malformed character constant: {text}");
    let body = text.strip_prefix('\'').ok_or_else(malformed)?;
    let (value, tail) = unquote_char(body, '\'').map_err(|_| malformed())?;
    if tail != "'" {
        return Err(malformed());
    }
    match value {
        Unquoted::Char(c) => Ok(c),
        Unquoted::Byte(b) => Ok(char::from(b)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unquoted {
    Char(char),
    /// `\x` and octal escapes denote raw bytes.
    Byte(u8),
}

/// Decode the first character or escape sequence of `s`, returning the
/// value and the remaining input.
fn unquote_char(s: &str, quote: char) -> Result<(Unquoted, &str), String> {
    let mut chars = s.chars();
    let c = chars.next().ok_or_else(|| "invalid syntax".to_string())?;
    if c == quote {
        return Err("invalid syntax".to_string());
    }
    if c != '\\' {
        return Ok((Unquoted::Char(c), chars.as_str()));
    }

    let escape = chars.next().ok_or_else(|| "invalid syntax".to_string())?;
    let rest = chars.as_str();
    let simple = match escape {
        'a' => Some('\u{07}'),
        'b' => Some('\u{08}'),
        'f' => Some('\u{0C}'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        'v' => Some('\u{0B}'),
        '\\' => Some('\\'),
        '\'' | '"' if escape == quote => Some(escape),
        _ => None,
    };
    if let Some(c) = simple {
        return Ok((Unquoted::Char(c), rest));
    }

    match escape {
        'x' | 'u' | 'U' => {
            let width = match escape {
                'x' => 2,
                'u' => 4,
                _ => 8,
            };
            let digits = rest
                .get(..width)
                .filter(|d| d.bytes().all(|b| b.is_ascii_hexdigit()))
                .ok_or_else(|| "invalid syntax".to_string())?;
            let value =
                u32::from_str_radix(digits, 16).map_err(|_| "invalid syntax".to_string())?;
            let tail = &rest[width..];
            if escape == 'x' {
                return Ok((Unquoted::Byte(value as u8), tail));
            }
            let c = char::from_u32(value).ok_or_else(|| "invalid syntax".to_string())?;
            Ok((Unquoted::Char(c), tail))
        }
        '0'..='7' => {
            let digits = s
                .get(1..4)
                .filter(|d| d.bytes().all(|b| matches!(b, b'0'..=b'7')))
                .ok_or_else(|| "invalid syntax".to_string())?;
            let value =
                u32::from_str_radix(digits, 8).map_err(|_| "invalid syntax".to_string())?;
            if value > 0xFF {
                return Err("invalid syntax".to_string());
            }
            Ok((Unquoted::Byte(value as u8), &s[4..]))
        }
        _ => Err("invalid syntax".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_string() {
        assert_eq!(unquote(r#""bar""#).unwrap(), "bar");
        assert_eq!(unquote(r#""""#).unwrap(), "");
    }

    #[test]
    fn test_escapes() {
        assert_eq!(unquote(r#""a\tb\n""#).unwrap(), "a\tb\n");
        assert_eq!(unquote(r#""say \"hi\"""#).unwrap(), "say \"hi\"");
        assert_eq!(unquote(r#""é\U0001F600""#).unwrap(), "é😀");
        assert_eq!(unquote(r#""\xe4\xbd\xa0""#).unwrap(), "你");
        assert_eq!(unquote(r#""\101""#).unwrap(), "A");
    }

    #[test]
    fn test_invalid_escapes() {
        assert!(unquote(r#""\q""#).is_err());
        assert!(unquote(r#""\'""#).is_err());
        assert!(unquote(r#""\x4""#).is_err());
        assert!(unquote(r#""\x+1""#).is_err());
        assert!(unquote(r#""\u+041""#).is_err());
        assert!(unquote(r#""\1+2""#).is_err());
        assert!(unquote_char_constant(r"'\u+041'").is_err());
        assert!(unquote_char_constant(r"'\x+1'").is_err());
    }

    #[test]
    fn test_invalid_utf8_bytes_are_replaced() {
        assert_eq!(unquote(r#""a\xffb""#).unwrap(), "a\u{FFFD}b");
    }

    #[test]
    fn test_raw_string() {
        assert_eq!(unquote("`a\\n\r\nb`").unwrap(), "a\\n\nb");
    }

    #[test]
    fn test_char_constants() {
        assert_eq!(unquote_char_constant("'a'").unwrap(), 'a');
        assert_eq!(unquote_char_constant(r"'\n'").unwrap(), '\n');
        assert_eq!(unquote_char_constant(r"'\''").unwrap(), '\'');
        assert_eq!(unquote_char_constant("'日'").unwrap(), '日');
        assert!(unquote_char_constant("'ab'").is_err());
        assert!(unquote_char_constant("''").is_err());
    }
}
