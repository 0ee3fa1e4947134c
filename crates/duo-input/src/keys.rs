//! On-Screen Keyboard
//!
//! Key transitions drained from the host's keyboard queue each tick. The
//! host owns composition and layout switching; this crate only carries the
//! resulting transitions to the event layer.

use serde::{Deserialize, Serialize};

/// The on-screen keyboard layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyboardLayout {
    AlphaNumeric,
    LatinAccented,
    Kana,
    Symbol,
    Pictogram,
}

impl KeyboardLayout {
    /// Layout name as exposed to scripts.
    pub fn as_str(self) -> &'static str {
        match self {
            KeyboardLayout::AlphaNumeric => "AlphaNumeric",
            KeyboardLayout::LatinAccented => "LatinAccented",
            KeyboardLayout::Kana => "Kana",
            KeyboardLayout::Symbol => "Symbol",
            KeyboardLayout::Pictogram => "Pictogram",
        }
    }
}

/// One key going down or up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyTransition {
    pub down: bool,
    /// Value input by the key, or the name of its action for special keys.
    pub key: String,
    /// Stable name of the physical key.
    pub code: String,
    pub layout: KeyboardLayout,
    /// True when generated by holding the key down continually.
    pub repeat: bool,
    /// True while the keyboard is in the shifted state.
    pub shifted: bool,
}

impl KeyTransition {
    pub fn down(key: &str, code: &str, layout: KeyboardLayout) -> Self {
        Self {
            down: true,
            key: key.to_string(),
            code: code.to_string(),
            layout,
            repeat: false,
            shifted: false,
        }
    }

    pub fn up(key: &str, code: &str, layout: KeyboardLayout) -> Self {
        Self {
            down: false,
            ..Self::down(key, code, layout)
        }
    }

    pub fn repeated(mut self) -> Self {
        self.repeat = true;
        self
    }

    pub fn shifted(mut self) -> Self {
        self.shifted = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_names() {
        assert_eq!(KeyboardLayout::AlphaNumeric.as_str(), "AlphaNumeric");
        assert_eq!(KeyboardLayout::Kana.as_str(), "Kana");
    }

    #[test]
    fn test_builders() {
        let transition = KeyTransition::down("a", "a", KeyboardLayout::AlphaNumeric)
            .repeated()
            .shifted();
        assert!(transition.down && transition.repeat && transition.shifted);

        let transition = KeyTransition::up("Enter", "Enter", KeyboardLayout::AlphaNumeric);
        assert!(!transition.down);
    }
}
