//! Keyboard input state
//!
//! Platform code updates this on key events; the tick reads it once per
//! step. Boost is a toggle, so the Shift keys feed an edge latch instead of
//! being read as "held".

use serde::{Deserialize, Serialize};

/// Logical keys the simulation understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Forward,
    Back,
    Left,
    Right,
    /// Either Shift key; the variant records which one
    Boost(BoostSide),
    Reset,
    /// Closes the info panel
    Escape,
}

/// The two physical boost modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoostSide {
    Left,
    Right,
}

impl Key {
    /// Map a `KeyboardEvent.code` to a logical key
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "KeyW" | "ArrowUp" => Some(Key::Forward),
            "KeyS" | "ArrowDown" => Some(Key::Back),
            "KeyA" | "ArrowLeft" => Some(Key::Left),
            "KeyD" | "ArrowRight" => Some(Key::Right),
            "ShiftLeft" => Some(Key::Boost(BoostSide::Left)),
            "ShiftRight" => Some(Key::Boost(BoostSide::Right)),
            "KeyR" => Some(Key::Reset),
            "Escape" => Some(Key::Escape),
            _ => None,
        }
    }

    /// Keys whose default browser action (scrolling) should be suppressed
    pub fn is_movement(&self) -> bool {
        matches!(self, Key::Forward | Key::Back | Key::Left | Key::Right)
    }
}

/// Currently held keys plus the boost edge latch
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputState {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub boost_left: bool,
    pub boost_right: bool,
    pub reset: bool,
    /// Set once a held boost key has produced its toggle
    boost_latched: bool,
    /// Set once a held reset key has fired
    reset_latched: bool,
}

impl InputState {
    /// Record a key-down or key-up
    pub fn set(&mut self, key: Key, pressed: bool) {
        match key {
            Key::Forward => self.forward = pressed,
            Key::Back => self.back = pressed,
            Key::Left => self.left = pressed,
            Key::Right => self.right = pressed,
            Key::Boost(BoostSide::Left) => self.boost_left = pressed,
            Key::Boost(BoostSide::Right) => self.boost_right = pressed,
            Key::Reset => self.reset = pressed,
            // Escape is a command, not a held key
            Key::Escape => {}
        }
    }

    /// Either Shift key is down
    pub fn boost_held(&self) -> bool {
        self.boost_left || self.boost_right
    }

    /// Sample the boost latch once per tick.
    ///
    /// Returns true exactly once per press: on the first tick the modifier
    /// is seen held after having been released.
    pub fn take_boost_toggle(&mut self) -> bool {
        if self.boost_held() {
            if !self.boost_latched {
                self.boost_latched = true;
                return true;
            }
        } else {
            self.boost_latched = false;
        }
        false
    }

    /// Sample the reset key once per tick; fires once per press like boost
    pub fn take_reset_press(&mut self) -> bool {
        if self.reset {
            if !self.reset_latched {
                self.reset_latched = true;
                return true;
            }
        } else {
            self.reset_latched = false;
        }
        false
    }

    /// Release everything (window blur)
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_mapping() {
        assert_eq!(Key::from_code("KeyW"), Some(Key::Forward));
        assert_eq!(Key::from_code("ArrowLeft"), Some(Key::Left));
        assert_eq!(Key::from_code("ShiftRight"), Some(Key::Boost(BoostSide::Right)));
        assert_eq!(Key::from_code("KeyQ"), None);
    }

    #[test]
    fn test_boost_toggles_once_per_press() {
        let mut input = InputState::default();
        input.set(Key::Boost(BoostSide::Left), true);
        assert!(input.take_boost_toggle());
        for _ in 0..30 {
            assert!(!input.take_boost_toggle());
        }
        input.set(Key::Boost(BoostSide::Left), false);
        assert!(!input.take_boost_toggle());
        input.set(Key::Boost(BoostSide::Left), true);
        assert!(input.take_boost_toggle());
    }

    #[test]
    fn test_reset_fires_once_per_press() {
        let mut input = InputState::default();
        input.set(Key::Reset, true);
        assert!(input.take_reset_press());
        assert!(!input.take_reset_press());
        input.set(Key::Reset, false);
        assert!(!input.take_reset_press());
    }

    #[test]
    fn test_switching_shift_keys_does_not_retoggle() {
        let mut input = InputState::default();
        input.set(Key::Boost(BoostSide::Left), true);
        assert!(input.take_boost_toggle());
        input.set(Key::Boost(BoostSide::Right), true);
        input.set(Key::Boost(BoostSide::Left), false);
        assert!(!input.take_boost_toggle());
    }
}
