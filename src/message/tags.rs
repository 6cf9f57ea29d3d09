//! Tags segment handling: `@key=value;key2=value2` splitting and
//! IRCv3 tag value unescaping.

use std::collections::HashMap;

/// Unescape a tag value from wire format.
///
/// Twitch escapes tag values per IRCv3 message-tags: `\:` -> `;`,
/// `\s` -> space, `\\` -> `\`, `\r` -> CR, `\n` -> LF. A trailing lone
/// backslash is dropped; an unknown escape keeps the escaped character.
pub(crate) fn unescape_tag_value(value: &str) -> String {
    let mut unescaped = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }
        match chars.next() {
            Some(':') => unescaped.push(';'),
            Some('s') => unescaped.push(' '),
            Some('\\') => unescaped.push('\\'),
            Some('r') => unescaped.push('\r'),
            Some('n') => unescaped.push('\n'),
            Some(other) => unescaped.push(other),
            None => break,
        }
    }
    unescaped
}

/// Split a raw tags segment (without the leading `@`) into key/value pairs.
///
/// Keys are unique; when the wire repeats a key the last occurrence wins,
/// matching server behavior. A key without `=` (or with an empty value,
/// like Twitch's `badge-info=;`) maps to the empty string.
pub(crate) fn split_tags(raw: &str) -> HashMap<&str, String> {
    let mut tags = HashMap::new();
    for pair in raw.split(';') {
        if pair.is_empty() {
            continue;
        }
        match pair.split_once('=') {
            Some((key, value)) => tags.insert(key, unescape_tag_value(value)),
            None => tags.insert(pair, String::new()),
        };
    }
    tags
}
