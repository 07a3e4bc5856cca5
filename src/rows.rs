//! Quote-aware row splitting and free-text field protection.
//!
//! One configured column may legitimately contain the row delimiter, line
//! breaks, and the attribute separator. Rows are therefore handled in three
//! phases: [`protect_special_field()`] locates that column with a two-state
//! quote scan and swaps its hazardous characters for placeholder tokens, the
//! whole line is then parsed as an ordinary delimited record, and
//! [`restore_placeholders()`] swaps the tokens back afterwards.

// Placeholder tokens are C0 control characters, which never occur in
// catalog exports. One distinct token per protected character class.
pub const PLACEHOLDER_COMMA: &str = "\u{11}";
pub const PLACEHOLDER_NEWLINE: &str = "\u{12}";
pub const PLACEHOLDER_SECTION: &str = "\u{13}";

/// Splits one line on `delimiter`, treating delimiters between matching
/// quote characters (`"` or `'`) as literal text.
///
/// Quotes do not nest: the scanner is either outside quotes, or inside and
/// waiting for the same character that opened them. Quote characters are
/// kept in the returned field values.
pub fn split_delimited(line: &str, delimiter: u8) -> Vec<String> {
    let delimiter = delimiter as char;
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quote_char = '"';

    for ch in line.chars() {
        if ch == '"' || ch == '\'' {
            if !in_quotes {
                in_quotes = true;
                quote_char = ch;
            } else if quote_char == ch {
                in_quotes = false;
            }
            current.push(ch);
        } else if ch == delimiter && !in_quotes {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    parts.push(current);
    parts
}

/// Removes one layer of surrounding quotes when the value starts and ends
/// with the same quote character.
pub fn strip_matching_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        if first == bytes[bytes.len() - 1] && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Rewrites `line` so the free-text column at `special_idx` survives a
/// generic delimited parse: its surrounding quotes are stripped and every
/// literal comma, CR, LF, and `section_marker` occurrence is replaced with a
/// placeholder token. With `special_idx` of `None` the line passes through
/// unchanged.
pub fn protect_special_field(
    line: &str,
    delimiter: u8,
    special_idx: Option<usize>,
    section_marker: &str,
) -> String {
    let Some(idx) = special_idx else {
        return line.to_string();
    };
    let mut parts = split_delimited(line, delimiter);
    if let Some(value) = parts.get_mut(idx) {
        let mut protected = strip_matching_quotes(value)
            .replace(',', PLACEHOLDER_COMMA)
            .replace('\n', PLACEHOLDER_NEWLINE)
            .replace('\r', PLACEHOLDER_NEWLINE);
        if !section_marker.is_empty() {
            protected = protected.replace(section_marker, PLACEHOLDER_SECTION);
        }
        *value = protected;
    }
    parts.join(&(delimiter as char).to_string())
}

/// Inverse of [`protect_special_field()`] for the field value itself. CR and
/// LF share one placeholder, so both restore as `\n`.
pub fn restore_placeholders(value: &str, section_marker: &str) -> String {
    value
        .replace(PLACEHOLDER_COMMA, ",")
        .replace(PLACEHOLDER_NEWLINE, "\n")
        .replace(PLACEHOLDER_SECTION, section_marker)
}
