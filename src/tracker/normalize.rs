use crate::types::PlayerIdentity;

const NO_BREAK_SPACE: char = '\u{00A0}';

/// Characters the game client can render in chat and names
pub fn is_printable(c: char) -> bool {
    matches!(c as u32, 32..=126 | 128 | 160..=255)
}

/// Canonicalize a raw display name into a registry key.
///
/// Drops anything outside the printable set, turns no-break spaces into
/// plain spaces and lowercases. Never fails; degenerate input yields an
/// empty identity.
pub fn normalize(raw_name: &str) -> PlayerIdentity {
    let cleaned: String = raw_name
        .chars()
        .filter(|c| is_printable(*c))
        .map(|c| if c == NO_BREAK_SPACE { ' ' } else { c })
        .collect();

    PlayerIdentity::from_normalized(cleaned.to_lowercase())
}
