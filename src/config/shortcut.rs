//! Keyboard shortcut value type — `Ctrl+Alt+K` style.
//!
//! Invariant: one or more modifiers in canonical order (Ctrl, Alt,
//! Shift), no duplicates, followed by exactly one non-modifier key.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Modifier {
    Ctrl,
    Alt,
    Shift,
}

impl Modifier {
    fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "ctrl" | "control" | "cmd" | "command" | "meta" => Some(Modifier::Ctrl),
            "alt" | "option" => Some(Modifier::Alt),
            "shift" => Some(Modifier::Shift),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Modifier::Ctrl => "Ctrl",
            Modifier::Alt => "Alt",
            Modifier::Shift => "Shift",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShortcutError {
    #[error("Shortcut is empty")]
    Empty,
    #[error("Shortcut needs at least one modifier")]
    NoModifier,
    #[error("Shortcut needs exactly one non-modifier key")]
    KeyCount,
    #[error("Duplicate modifier: {0}")]
    DuplicateModifier(String),
    #[error("Modifiers must come before the key")]
    Misordered,
}

/// A validated modifier+key combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Shortcut {
    modifiers: Vec<Modifier>,
    key: String,
}

impl Shortcut {
    pub fn new(mut modifiers: Vec<Modifier>, key: &str) -> Result<Self, ShortcutError> {
        if modifiers.is_empty() {
            return Err(ShortcutError::NoModifier);
        }
        modifiers.sort();
        for pair in modifiers.windows(2) {
            if pair[0] == pair[1] {
                return Err(ShortcutError::DuplicateModifier(pair[0].as_str().to_string()));
            }
        }
        let key = normalize_key(key).ok_or(ShortcutError::KeyCount)?;
        Ok(Self { modifiers, key })
    }

    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Build a shortcut from a recorded key press.
    ///
    /// Meta counts as Ctrl. Returns `None` while only modifiers are held,
    /// for Escape (cancels recording) and when no modifier is held.
    pub fn from_key_event(ctrl: bool, alt: bool, shift: bool, meta: bool, key: &str) -> Option<Self> {
        if key == "Escape" || matches!(key, "Control" | "Alt" | "Shift" | "Meta") {
            return None;
        }
        let mut modifiers = Vec::new();
        if ctrl || meta {
            modifiers.push(Modifier::Ctrl);
        }
        if alt {
            modifiers.push(Modifier::Alt);
        }
        if shift {
            modifiers.push(Modifier::Shift);
        }
        Shortcut::new(modifiers, key).ok()
    }
}

/// " " becomes "Space", single characters are upper-cased.
fn normalize_key(key: &str) -> Option<String> {
    if key == " " {
        return Some("Space".to_string());
    }
    let key = key.trim();
    if key.is_empty() || key.contains('+') || Modifier::parse(key).is_some() {
        return None;
    }
    if key.chars().count() == 1 {
        return Some(key.to_uppercase());
    }
    Some(key.to_string())
}

/// `Alt+Tab`, the first-run shortcut.
impl Default for Shortcut {
    fn default() -> Self {
        Self {
            modifiers: vec![Modifier::Alt],
            key: "Tab".to_string(),
        }
    }
}

impl FromStr for Shortcut {
    type Err = ShortcutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(ShortcutError::Empty);
        }
        let tokens: Vec<&str> = s.split('+').map(str::trim).collect();
        let (key, modifier_tokens) = tokens.split_last().ok_or(ShortcutError::Empty)?;

        let mut modifiers = Vec::with_capacity(modifier_tokens.len());
        for token in modifier_tokens {
            match Modifier::parse(token) {
                Some(m) => modifiers.push(m),
                None => return Err(ShortcutError::KeyCount),
            }
        }
        if Modifier::parse(key).is_some() {
            return Err(if modifiers.is_empty() {
                ShortcutError::NoModifier
            } else {
                ShortcutError::Misordered
            });
        }
        Shortcut::new(modifiers, key)
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for m in &self.modifiers {
            write!(f, "{}+", m.as_str())?;
        }
        f.write_str(&self.key)
    }
}

impl TryFrom<String> for Shortcut {
    type Error = ShortcutError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Shortcut> for String {
    fn from(value: Shortcut) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_canonicalizes() {
        let s: Shortcut = "shift+ctrl+k".parse().unwrap();
        assert_eq!(s.to_string(), "Ctrl+Shift+K");
        assert_eq!(s.modifiers(), &[Modifier::Ctrl, Modifier::Shift]);
        assert_eq!(s.key(), "K");

        let s: Shortcut = "Cmd+Alt+ArrowUp".parse().unwrap();
        assert_eq!(s.to_string(), "Ctrl+Alt+ArrowUp");
    }

    #[test]
    fn rejects_invalid_combinations() {
        assert_eq!("".parse::<Shortcut>(), Err(ShortcutError::Empty));
        assert_eq!("K".parse::<Shortcut>(), Err(ShortcutError::NoModifier));
        assert_eq!("Ctrl".parse::<Shortcut>(), Err(ShortcutError::NoModifier));
        assert_eq!("Ctrl+Alt".parse::<Shortcut>(), Err(ShortcutError::Misordered));
        assert_eq!("Ctrl+K+J".parse::<Shortcut>(), Err(ShortcutError::KeyCount));
        assert_eq!("Ctrl+".parse::<Shortcut>(), Err(ShortcutError::KeyCount));
        assert_eq!(
            "Ctrl+Meta+K".parse::<Shortcut>(),
            Err(ShortcutError::DuplicateModifier("Ctrl".to_string()))
        );
    }

    #[test]
    fn serde_uses_string_form() {
        let s: Shortcut = serde_json::from_str("\"Alt+Tab\"").unwrap();
        assert_eq!(serde_json::to_string(&s).unwrap(), "\"Alt+Tab\"");
        assert!(serde_json::from_str::<Shortcut>("\"Tab\"").is_err());
    }

    #[test]
    fn recorder_follows_key_events() {
        assert_eq!(
            Shortcut::from_key_event(false, true, false, true, "k").map(|s| s.to_string()),
            Some("Ctrl+Alt+K".to_string())
        );
        assert_eq!(
            Shortcut::from_key_event(true, false, false, false, " ").map(|s| s.to_string()),
            Some("Ctrl+Space".to_string())
        );
        assert!(Shortcut::from_key_event(true, false, false, false, "Control").is_none());
        assert!(Shortcut::from_key_event(true, false, false, false, "Escape").is_none());
        assert!(Shortcut::from_key_event(false, false, false, false, "k").is_none());
    }
}
