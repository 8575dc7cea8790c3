use crate::error::InspectError;
use crate::value::{signed_field_or_zero, ValueHandle};

/// How string content is wrapped for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    /// Wrapped in literal quote characters (debug-display rendering).
    Quoted,
    /// Raw text, no quoting.
    Plain,
}

/// Summarize a length-prefixed string value (`data` pointer + signed
/// `count`) as display text.
///
/// Invalid lengths never touch target memory: a negative count or one past
/// the bridge's transfer limit renders as a diagnostic embedding the
/// literal value. UTF-8 decode failures propagate so the host surfaces
/// them instead of showing a placeholder.
pub fn string_summary<V: ValueHandle>(value: &V, style: TextStyle) -> Result<String, InspectError> {
    let count = signed_field_or_zero(value, "count");
    if count == 0 {
        return Ok(match style {
            TextStyle::Quoted => "\"\"".to_string(),
            TextStyle::Plain => String::new(),
        });
    }
    if count < 0 {
        return Ok(format!("invalid length ({})", count));
    }
    if count as u64 > value.max_transfer() {
        return Ok(format!("length is too big for the host bridge ({})", count));
    }

    let data = value.field("data")?;
    let bytes = data.read_bytes(0, count as u64)?;
    let text = String::from_utf8(bytes)?;
    Ok(match style {
        TextStyle::Quoted => format!("\"{}\"", text),
        TextStyle::Plain => text,
    })
}

/// `string_summary` in the debug-display style, shaped for registry entries.
pub fn quoted_string_summary<V: ValueHandle>(value: &V) -> Result<String, InspectError> {
    string_summary(value, TextStyle::Quoted)
}
