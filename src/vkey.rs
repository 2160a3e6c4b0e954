//! Virtual-key translation.
//!
//! The scripting engine addresses keyboard input by numeric VKey codes.
//! Callers may pass either the code itself or a human-readable key
//! combination such as `Ctrl + Shift + F1`; combinations are normalized
//! and looked up in the fixed table below.

use crate::error::{Result, SapError};

/// VKey combinations indexed by their engine code. `None` marks codes the
/// engine reserves without a defined combination; those positions are
/// still valid as raw numeric input but can never be reached through a
/// combination string.
pub const VKEY_TABLE: [Option<&str>; 98] = [
    Some("ENTER"),
    Some("F1"),
    Some("F2"),
    Some("F3"),
    Some("F4"),
    Some("F5"),
    Some("F6"),
    Some("F7"),
    Some("F8"),
    Some("F9"),
    Some("F10"),
    Some("F11"),
    Some("F12"),
    None,
    Some("SHIFT+F2"),
    Some("SHIFT+F3"),
    Some("SHIFT+F4"),
    Some("SHIFT+F5"),
    Some("SHIFT+F6"),
    Some("SHIFT+F7"),
    Some("SHIFT+F8"),
    Some("SHIFT+F9"),
    Some("CTRL+SHIFT+0"),
    Some("SHIFT+F11"),
    Some("SHIFT+F12"),
    Some("CTRL+F1"),
    Some("CTRL+F2"),
    Some("CTRL+F3"),
    Some("CTRL+F4"),
    Some("CTRL+F5"),
    Some("CTRL+F6"),
    Some("CTRL+F7"),
    Some("CTRL+F8"),
    Some("CTRL+F9"),
    Some("CTRL+F10"),
    Some("CTRL+F11"),
    Some("CTRL+F12"),
    Some("CTRL+SHIFT+F1"),
    Some("CTRL+SHIFT+F2"),
    Some("CTRL+SHIFT+F3"),
    Some("CTRL+SHIFT+F4"),
    Some("CTRL+SHIFT+F5"),
    Some("CTRL+SHIFT+F6"),
    Some("CTRL+SHIFT+F7"),
    Some("CTRL+SHIFT+F8"),
    Some("CTRL+SHIFT+F9"),
    Some("CTRL+SHIFT+F10"),
    Some("CTRL+SHIFT+F11"),
    Some("CTRL+SHIFT+F12"),
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    None,
    Some("CTRL+E"),
    Some("CTRL+F"),
    Some("CTRL+A"),
    Some("CTRL+D"),
    Some("CTRL+N"),
    Some("CTRL+O"),
    Some("SHIFT+DEL"),
    Some("CTRL+INS"),
    Some("SHIFT+INS"),
    Some("ALT+BACKSPACE"),
    Some("CTRL+PAGEUP"),
    Some("PAGEUP"),
    Some("PAGEDOWN"),
    Some("CTRL+PAGEDOWN"),
    Some("CTRL+G"),
    Some("CTRL+R"),
    Some("CTRL+P"),
    Some("CTRL+B"),
    Some("CTRL+K"),
    Some("CTRL+T"),
    Some("CTRL+Y"),
    Some("CTRL+X"),
    Some("CTRL+C"),
    Some("CTRL+V"),
    Some("SHIFT+F10"),
    None,
    None,
    Some("CTRL+#"),
];

/// Strips spacing, upper-cases, and canonicalizes modifier synonyms so
/// that `ctrl + shift + f1` and `CTRL+SHIFT+F1` compare equal.
fn normalize(combination: &str) -> String {
    combination
        .to_uppercase()
        .replace(' ', "")
        .replace("CONTROL", "CTRL")
        .replace("DELETE", "DEL")
        .replace("INSERT", "INS")
}

/// Translates a VKey given either as a numeric code or as a combination
/// string into the code to send.
///
/// Numeric input is accepted for every code within the table range,
/// including the reserved gaps; combination lookup only ever matches the
/// defined entries. `CTRL+S` and `ESC` are legacy aliases for codes 11
/// and 12, whose primary combinations are `F11` and `F12`.
pub fn resolve_vkey(key: &str) -> Result<u16> {
    let key = key.trim();
    if !key.is_empty() && key.chars().all(|c| c.is_ascii_digit()) {
        let code: u16 = key
            .parse()
            .map_err(|_| SapError::UnknownVirtualKey(key.to_string()))?;
        if (code as usize) < VKEY_TABLE.len() {
            return Ok(code);
        }
        return Err(SapError::UnknownVirtualKey(key.to_string()));
    }

    let combination = normalize(key);
    if let Some(code) = VKEY_TABLE
        .iter()
        .position(|entry| *entry == Some(combination.as_str()))
    {
        return Ok(code as u16);
    }

    match combination.as_str() {
        "CTRL+S" => Ok(11),
        "ESC" => Ok(12),
        _ => Err(SapError::UnknownVirtualKey(key.to_string())),
    }
}
