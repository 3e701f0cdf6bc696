/// Appends `s` as a quoted JSON string.
///
/// Escapes only what RFC 8259 requires: `"`, `\` and control characters.
/// `\b \t \n \f \r` use their short forms, other controls `\u00xx` with
/// lowercase hex, which is also what `JSON.stringify` produces.
pub(crate) fn write_quoted(out: &mut String, s: &str) {
    out.reserve(s.len() + 2);
    out.push('"');
    write_escaped(out, s);
    out.push('"');
}

/// String body escaping without the surrounding quotes.
pub(crate) fn write_escaped(out: &mut String, s: &str) {
    let mut last = 0;
    for (i, b) in s.bytes().enumerate() {
        let short = match b {
            b'"' => "\\\"",
            b'\\' => "\\\\",
            0x08 => "\\b",
            b'\t' => "\\t",
            b'\n' => "\\n",
            0x0c => "\\f",
            b'\r' => "\\r",
            0x00..=0x1f => "",
            _ => continue,
        };
        // Escaped bytes are all ASCII, so `i` is always a char boundary.
        out.push_str(&s[last..i]);
        if short.is_empty() {
            out.push_str(&format!("\\u{b:04x}"));
        } else {
            out.push_str(short);
        }
        last = i + 1;
    }
    out.push_str(&s[last..]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quoted(s: &str) -> String {
        let mut out = String::new();
        write_quoted(&mut out, s);
        out
    }

    #[test]
    fn plain_text_is_untouched() {
        assert_eq!(quoted("hello"), "\"hello\"");
        assert_eq!(quoted("😱 ünïcode"), "\"😱 ünïcode\"");
    }

    #[test]
    fn escapes_quotes_backslashes_and_controls() {
        assert_eq!(quoted("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(quoted("a\\b"), "\"a\\\\b\"");
        assert_eq!(quoted("l1\nl2\tx\r"), "\"l1\\nl2\\tx\\r\"");
        assert_eq!(quoted("\u{0}\u{1f}\u{8}\u{c}"), "\"\\u0000\\u001f\\b\\f\"");
    }

    #[test]
    fn does_not_escape_slash_or_del() {
        assert_eq!(quoted("a/b\u{7f}"), "\"a/b\u{7f}\"");
    }
}
