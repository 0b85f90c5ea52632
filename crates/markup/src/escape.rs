//! Entity escaping for serialized markup.
//!
//! Scanning uses `memchr3`, so text without special characters is copied in one slice.

use std::fmt::{self, Write};

use memchr::memchr3;

/// Escapes `&`, `<` and `>` in character data.
pub fn escape_text(text: &str, out: &mut dyn Write) -> fmt::Result {
    escape_with(text, [b'&', b'<', b'>'], out)
}

/// Escapes `&`, `<` and `"` for a double-quoted attribute value.
pub fn escape_attribute(value: &str, out: &mut dyn Write) -> fmt::Result {
    escape_with(value, [b'&', b'<', b'"'], out)
}

fn escape_with(s: &str, needles: [u8; 3], out: &mut dyn Write) -> fmt::Result {
    let bytes = s.as_bytes();
    let mut start = 0;
    while let Some(rel) = memchr3(needles[0], needles[1], needles[2], &bytes[start..]) {
        let pos = start + rel;
        out.write_str(&s[start..pos])?;
        out.write_str(entity_for(bytes[pos]))?;
        start = pos + 1;
    }
    out.write_str(&s[start..])
}

fn entity_for(byte: u8) -> &'static str {
    match byte {
        b'&' => "&amp;",
        b'<' => "&lt;",
        b'>' => "&gt;",
        b'"' => "&quot;",
        _ => unreachable!("escape needles are ASCII markup characters"),
    }
}
