//! Buttons
//!
//! The twelve hardware buttons and a bitmask over them, mirroring the
//! console's keypad register layout.

use serde::{Deserialize, Serialize};

/// A hardware button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    A,
    B,
    X,
    Y,
    L,
    R,
    Up,
    Down,
    Left,
    Right,
    Start,
    Select,
}

impl Button {
    /// Every button, in keypad bit order.
    pub const ALL: [Button; 12] = [
        Button::A,
        Button::B,
        Button::Select,
        Button::Start,
        Button::Right,
        Button::Left,
        Button::Up,
        Button::Down,
        Button::R,
        Button::L,
        Button::X,
        Button::Y,
    ];

    /// Name as exposed to scripts.
    pub fn name(self) -> &'static str {
        match self {
            Button::A => "A",
            Button::B => "B",
            Button::X => "X",
            Button::Y => "Y",
            Button::L => "L",
            Button::R => "R",
            Button::Up => "Up",
            Button::Down => "Down",
            Button::Left => "Left",
            Button::Right => "Right",
            Button::Start => "START",
            Button::Select => "SELECT",
        }
    }

    fn bit(self) -> u16 {
        match self {
            Button::A => 1 << 0,
            Button::B => 1 << 1,
            Button::Select => 1 << 2,
            Button::Start => 1 << 3,
            Button::Right => 1 << 4,
            Button::Left => 1 << 5,
            Button::Up => 1 << 6,
            Button::Down => 1 << 7,
            Button::R => 1 << 8,
            Button::L => 1 << 9,
            Button::X => 1 << 10,
            Button::Y => 1 << 11,
        }
    }
}

/// A set of buttons, stored as a keypad-style bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ButtonSet(u16);

impl ButtonSet {
    pub const EMPTY: ButtonSet = ButtonSet(0);

    pub fn contains(self, button: Button) -> bool {
        self.0 & button.bit() != 0
    }

    #[must_use]
    pub fn with(self, button: Button) -> ButtonSet {
        ButtonSet(self.0 | button.bit())
    }

    #[must_use]
    pub fn without(self, button: Button) -> ButtonSet {
        ButtonSet(self.0 & !button.bit())
    }

    /// Buttons in `self` but not in `other` (edge derivation).
    #[must_use]
    pub fn minus(self, other: ButtonSet) -> ButtonSet {
        ButtonSet(self.0 & !other.0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate contained buttons in keypad bit order.
    pub fn iter(self) -> impl Iterator<Item = Button> {
        Button::ALL.into_iter().filter(move |b| self.contains(*b))
    }
}

impl FromIterator<Button> for ButtonSet {
    fn from_iter<I: IntoIterator<Item = Button>>(iter: I) -> Self {
        iter.into_iter().fold(ButtonSet::EMPTY, ButtonSet::with)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_membership() {
        let set = ButtonSet::EMPTY.with(Button::A).with(Button::Start);
        assert!(set.contains(Button::A));
        assert!(set.contains(Button::Start));
        assert!(!set.contains(Button::B));
        assert!(set.without(Button::A).contains(Button::Start));
    }

    #[test]
    fn test_minus_is_edge_mask() {
        let previous = ButtonSet::EMPTY.with(Button::A).with(Button::B);
        let current = ButtonSet::EMPTY.with(Button::B).with(Button::X);
        let pressed = current.minus(previous);
        let released = previous.minus(current);
        assert_eq!(pressed, ButtonSet::EMPTY.with(Button::X));
        assert_eq!(released, ButtonSet::EMPTY.with(Button::A));
    }

    #[test]
    fn test_iter_in_bit_order() {
        let set = ButtonSet::EMPTY.with(Button::Y).with(Button::A).with(Button::Select);
        let collected: Vec<Button> = set.iter().collect();
        assert_eq!(collected, vec![Button::A, Button::Select, Button::Y]);
    }

    #[test]
    fn test_script_names() {
        assert_eq!(Button::Start.name(), "START");
        assert_eq!(Button::Select.name(), "SELECT");
        assert_eq!(Button::Up.name(), "Up");
    }
}
