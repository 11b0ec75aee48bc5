// UTF-16 offset helpers.
//
// Issue offsets are UTF-16 code units, the unit LanguageTool reports and
// browsers use for strings. Rust strings are indexed by byte, so every slice
// goes through `byte_index`.
//
// Slicing follows JavaScript `String.prototype.slice`: offsets past the end
// clamp to the end and a start at or after the end yields "". An offset that
// falls between the two halves of a surrogate pair snaps back to the start of
// that character.

/// Length of `text` in UTF-16 code units.
pub fn utf16_len(text: &str) -> usize {
    if text.is_ascii() {
        return text.len();
    }
    text.encode_utf16().count()
}

/// Byte index in `text` corresponding to the UTF-16 `offset`.
pub fn byte_index(text: &str, offset: usize) -> usize {
    if text.is_ascii() {
        return offset.min(text.len());
    }
    let mut units = 0;
    for (idx, ch) in text.char_indices() {
        if offset < units + ch.len_utf16() {
            return idx;
        }
        units += ch.len_utf16();
    }
    text.len()
}

/// `text[start..end]` in UTF-16 offsets, with JavaScript `slice` semantics.
pub fn slice(text: &str, start: usize, end: usize) -> &str {
    if start >= end {
        return "";
    }
    &text[byte_index(text, start)..byte_index(text, end)]
}

/// `text[start..]` in UTF-16 offsets.
pub fn slice_from(text: &str, start: usize) -> &str {
    &text[byte_index(text, start)..]
}

/// `text[..end]` in UTF-16 offsets.
pub fn slice_to(text: &str, end: usize) -> &str {
    &text[..byte_index(text, end)]
}
