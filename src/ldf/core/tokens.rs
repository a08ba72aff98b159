// Number and token helpers shared by the LDF statement decoders.
//
// Numbers are decimal or `0x`-prefixed hexadecimal. Integer fields also accept
// a decimal fraction (`10.0`), truncated toward zero.

/// Parses an unsigned integer: `0x1F`, `31` or `31.0`.
pub(crate) fn parse_u64(s: &str) -> Option<u64> {
    let s: &str = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16).ok();
    }
    if let Ok(v) = s.parse::<u64>() {
        return Some(v);
    }
    let v: f64 = s.parse::<f64>().ok()?;
    if v.is_finite() && v >= 0.0 && v < u64::MAX as f64 {
        Some(v.trunc() as u64)
    } else {
        None
    }
}

pub(crate) fn parse_u8(s: &str) -> Option<u8> {
    parse_u64(s).and_then(|v| u8::try_from(v).ok())
}

pub(crate) fn parse_u16(s: &str) -> Option<u16> {
    parse_u64(s).and_then(|v| u16::try_from(v).ok())
}

/// Parses a real number; hexadecimal integers are accepted too.
pub(crate) fn parse_f64(s: &str) -> Option<f64> {
    let s: &str = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16).ok().map(|v| v as f64);
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Strips a trailing unit (`10 ms` → `10`, `19.2kbps` → `19.2`).
pub(crate) fn strip_unit<'a>(s: &'a str, unit: &str) -> &'a str {
    let s: &str = s.trim();
    s.strip_suffix(unit).unwrap_or(s).trim_end()
}

/// Removes one pair of surrounding double quotes, if present.
pub(crate) fn unquote(s: &str) -> &str {
    let s: &str = s.trim();
    s.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(s)
}

/// Splits on `delim` outside double quotes and trims every part.
/// Empty parts are kept so positional fields stay aligned.
pub(crate) fn split_outside_quotes(s: &str, delim: char) -> Vec<&str> {
    let mut out: Vec<&str> = Vec::new();
    let mut in_quotes: bool = false;
    let mut start: usize = 0;
    for (idx, ch) in s.char_indices() {
        if ch == '"' {
            in_quotes = !in_quotes;
        } else if ch == delim && !in_quotes {
            out.push(s[start..idx].trim());
            start = idx + ch.len_utf8();
        }
    }
    out.push(s[start..].trim());
    out
}

/// Splits `name: rest` at the first colon, returning trimmed halves.
pub(crate) fn split_name(line: &str) -> Option<(&str, &str)> {
    let (name, rest) = line.split_once(':')?;
    let name: &str = name.trim();
    if !is_identifier(name) {
        return None;
    }
    Some((name, rest.trim()))
}

/// LDF identifiers: letters, digits and underscores, not starting with a digit.
pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Comma separated list of identifiers; empty entries are skipped.
pub(crate) fn identifier_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers() {
        assert_eq!(parse_u64("0x3C"), Some(60));
        assert_eq!(parse_u64(" 42 "), Some(42));
        assert_eq!(parse_u64("10.7"), Some(10));
        assert_eq!(parse_u64("-1"), None);
        assert_eq!(parse_u64("abc"), None);
        assert_eq!(parse_u8("0x100"), None);
        assert_eq!(parse_u16("0x1E"), Some(30));
        assert_eq!(parse_f64("0.1"), Some(0.1));
        assert_eq!(parse_f64("0x10"), Some(16.0));
    }

    #[test]
    fn test_strings() {
        assert_eq!(strip_unit("10 ms", "ms"), "10");
        assert_eq!(strip_unit("19.2kbps", "kbps"), "19.2");
        assert_eq!(unquote("\"2.1\""), "2.1");
        assert_eq!(unquote("plain"), "plain");
        assert_eq!(
            split_outside_quotes("logical_value, 0, \"a, b\"", ','),
            vec!["logical_value", "0", "\"a, b\""]
        );
        assert_eq!(split_name("Door: 1, 2"), Some(("Door", "1, 2")));
        assert_eq!(split_name("1Door: 1"), None);
        assert_eq!(identifier_list("A, B,, C"), vec!["A", "B", "C"]);
    }
}
