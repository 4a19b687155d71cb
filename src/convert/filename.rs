//! Filesystem-safe file names.

/// Default maximum length (in characters) of a sanitized file name.
pub const DEFAULT_MAX_FILENAME_LENGTH: usize = 100;

/// Substituted when nothing usable is left.
const FALLBACK_NAME: &str = "unnamed_file";

const RESERVED_CHARACTERS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Windows device names (`CON`, `COM1`, ...), compared case-insensitively.
fn is_reserved_name(name: &str) -> bool {
    let upper = name.to_ascii_uppercase();
    if matches!(upper.as_str(), "CON" | "PRN" | "AUX" | "NUL") {
        return true;
    }
    let Some(number) = upper.strip_prefix("COM").or_else(|| upper.strip_prefix("LPT")) else {
        return false;
    };
    number.len() == 1 && number.chars().all(|c| ('1'..='9').contains(&c))
}

/// Maps an arbitrary string to a name that is safe on every common filesystem.
///
/// Reserved and control characters are removed, runs of underscores and
/// whitespace collapse to one `_`, device names get a `_` prefix and the result
/// is cut to `max_length` characters.
#[must_use]
pub fn sanitize_filename(input: &str, max_length: usize) -> String {
    let mut collapsed = String::with_capacity(input.len());
    let mut in_run = false;
    for c in input.chars() {
        if c <= '\u{1f}' || RESERVED_CHARACTERS.contains(&c) {
            continue;
        }
        if c == '_' || c.is_whitespace() {
            if !in_run {
                collapsed.push('_');
            }
            in_run = true;
        } else {
            collapsed.push(c);
            in_run = false;
        }
    }

    let mut name =
        if is_reserved_name(&collapsed) { format!("_{collapsed}") } else { collapsed };

    if name.chars().count() > max_length {
        name = name.chars().take(max_length).collect();
    }

    if name.is_empty() { FALLBACK_NAME.to_string() } else { name }
}
