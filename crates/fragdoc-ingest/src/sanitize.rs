//! Plain-text sanitization

use once_cell::sync::Lazy;
use regex::Regex;

/// C0 and C1 control characters except line feed
static CONTROL_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x00-\x09\x0B-\x1F\x7F-\x9F]").expect("control-char pattern is valid"));

/// Remove one leading byte-order mark
#[inline]
#[must_use]
pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{FEFF}').unwrap_or(text)
}

/// Strip a leading BOM, then every control character other than `\n`
///
/// Tab and carriage return are removed along with the rest.
#[must_use]
pub fn sanitize_text(text: &str) -> String {
    CONTROL_CHARS.replace_all(strip_bom(text), "").into_owned()
}
