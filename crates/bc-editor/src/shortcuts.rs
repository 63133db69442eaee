//! Keyboard chords and bindings.
//!
//! A binding is declared as a string (`"ctrl+z"`, `"backspace|delete"`)
//! and parsed once into structured chords: a modifier bitset plus a key.
//! Key events from the host are converted to a chord and matched by
//! equality, so `"ctrl+shift+z"` and a Shift+Ctrl+Z press always agree
//! regardless of how the host spells them.

use crate::input::Modifiers;
use smallvec::SmallVec;
use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

// ─── Modifier set ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModifierSet(u8);

impl ModifierSet {
    pub const EMPTY: Self = Self(0);
    pub const CTRL: Self = Self(1);
    pub const SHIFT: Self = Self(1 << 1);
    pub const ALT: Self = Self(1 << 2);
    pub const META: Self = Self(1 << 3);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "ctrl" | "control" => Some(Self::CTRL),
            "shift" => Some(Self::SHIFT),
            "alt" | "option" => Some(Self::ALT),
            "meta" | "cmd" | "super" => Some(Self::META),
            _ => None,
        }
    }
}

impl BitOr for ModifierSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl From<Modifiers> for ModifierSet {
    fn from(m: Modifiers) -> Self {
        let mut set = Self::EMPTY;
        if m.ctrl {
            set = set | Self::CTRL;
        }
        if m.shift {
            set = set | Self::SHIFT;
        }
        if m.alt {
            set = set | Self::ALT;
        }
        if m.meta {
            set = set | Self::META;
        }
        set
    }
}

// ─── Key ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable key, stored lowercase.
    Char(char),
    Backspace,
    Delete,
    Escape,
    Enter,
    Tab,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

impl Key {
    /// Map a key name (either a `KeyboardEvent.key` value or a binding
    /// token) to a key. Named keys are case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Some(Key::Char(c.to_ascii_lowercase()));
        }
        match name.to_ascii_lowercase().as_str() {
            "backspace" => Some(Key::Backspace),
            "delete" | "del" => Some(Key::Delete),
            "escape" | "esc" => Some(Key::Escape),
            "enter" | "return" => Some(Key::Enter),
            "tab" => Some(Key::Tab),
            "arrowup" | "up" => Some(Key::ArrowUp),
            "arrowdown" | "down" => Some(Key::ArrowDown),
            "arrowleft" | "left" => Some(Key::ArrowLeft),
            "arrowright" | "right" => Some(Key::ArrowRight),
            "space" => Some(Key::Char(' ')),
            "plus" => Some(Key::Char('+')),
            _ => None,
        }
    }

    fn name(&self) -> String {
        match self {
            Key::Char(' ') => "space".to_string(),
            Key::Char('+') => "plus".to_string(),
            Key::Char(c) => c.to_string(),
            Key::Backspace => "backspace".to_string(),
            Key::Delete => "delete".to_string(),
            Key::Escape => "escape".to_string(),
            Key::Enter => "enter".to_string(),
            Key::Tab => "tab".to_string(),
            Key::ArrowUp => "arrowup".to_string(),
            Key::ArrowDown => "arrowdown".to_string(),
            Key::ArrowLeft => "arrowleft".to_string(),
            Key::ArrowRight => "arrowright".to_string(),
        }
    }
}

// ─── Chord ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub modifiers: ModifierSet,
    pub key: Key,
}

impl KeyChord {
    pub fn new(modifiers: ModifierSet, key: Key) -> Self {
        Self { modifiers, key }
    }

    /// Build the chord for a host key event. Returns `None` for keys the
    /// editor has no name for (bare modifier presses, function keys).
    pub fn from_event(key: &str, modifiers: Modifiers) -> Option<Self> {
        Some(Self::new(modifiers.into(), Key::from_name(key)?))
    }
}

impl FromStr for KeyChord {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if s.is_empty() {
            return Err("empty key chord".to_string());
        }
        let mut tokens: Vec<&str> = s.split('+').map(str::trim).collect();
        let key_token = tokens.pop().unwrap_or_default();
        let key = Key::from_name(key_token)
            .ok_or_else(|| format!("unknown key `{key_token}` in `{s}`"))?;

        let mut modifiers = ModifierSet::EMPTY;
        for token in tokens {
            let m = ModifierSet::from_name(&token.to_ascii_lowercase())
                .ok_or_else(|| format!("unknown modifier `{token}` in `{s}`"))?;
            modifiers = modifiers | m;
        }
        Ok(Self::new(modifiers, key))
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Fixed order: ctrl, shift, alt, meta.
        for (flag, name) in [
            (ModifierSet::CTRL, "ctrl"),
            (ModifierSet::SHIFT, "shift"),
            (ModifierSet::ALT, "alt"),
            (ModifierSet::META, "meta"),
        ] {
            if self.modifiers.contains(flag) {
                write!(f, "{name}+")?;
            }
        }
        f.write_str(&self.key.name())
    }
}

// ─── Bindings ────────────────────────────────────────────────────────────

/// Alternative chords bound to one command, parsed from `"a|b|c"`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyBindings(SmallVec<[KeyChord; 2]>);

impl KeyBindings {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn matches(&self, chord: &KeyChord) -> bool {
        self.0.contains(chord)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn chords(&self) -> &[KeyChord] {
        &self.0
    }
}

impl FromStr for KeyBindings {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        if s.trim().is_empty() {
            return Ok(Self::none());
        }
        s.split('|')
            .map(KeyChord::from_str)
            .collect::<Result<SmallVec<_>, _>>()
            .map(Self)
    }
}

impl fmt::Display for KeyBindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, chord) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            write!(f, "{chord}")?;
        }
        Ok(())
    }
}
