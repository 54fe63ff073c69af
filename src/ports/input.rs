//! Input query interface
//!
//! Key handling stays in the harness; the sim only sees per-action states
//! with the timestamp of the most recent press. Timestamps break ties when
//! opposing directions are held at once (the newer press wins).

use serde::{Deserialize, Serialize};

/// State of one logical control for the current tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InputState {
    #[default]
    Up,
    Down,
    /// Went down this tick
    Pressed,
    /// Went up this tick
    Released,
}

impl InputState {
    /// True while the control is held (down or pressed this tick)
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, InputState::Down | InputState::Pressed)
    }
}

/// Logical controls the sim understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Left,
    Right,
    Jump,
    Tongue,
}

/// State plus press timestamp for one action
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ActionState {
    pub state: InputState,
    /// Press time in harness units; zero while inactive
    pub timestamp: f64,
}

impl ActionState {
    pub fn up() -> Self {
        Self::default()
    }

    pub fn pressed(timestamp: f64) -> Self {
        Self {
            state: InputState::Pressed,
            timestamp,
        }
    }

    pub fn down(timestamp: f64) -> Self {
        Self {
            state: InputState::Down,
            timestamp,
        }
    }

    pub fn released() -> Self {
        Self {
            state: InputState::Released,
            timestamp: 0.0,
        }
    }
}

/// Host-side input source (keyboard, touch, gamepad)
pub trait InputPort {
    fn action(&self, action: Action) -> ActionState;
    /// Any control activated this tick (used by menus outside the core)
    fn any_pressed(&self) -> bool;
}

/// Immutable per-tick input consumed by the simulation
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    pub left: ActionState,
    pub right: ActionState,
    pub jump: ActionState,
    pub tongue: ActionState,
    pub any_pressed: bool,
}

impl InputSnapshot {
    /// Capture the current state of every action from a port
    pub fn from_port(port: &dyn InputPort) -> Self {
        Self {
            left: port.action(Action::Left),
            right: port.action(Action::Right),
            jump: port.action(Action::Jump),
            tongue: port.action(Action::Tongue),
            any_pressed: port.any_pressed(),
        }
    }

    pub fn action(&self, action: Action) -> ActionState {
        match action {
            Action::Left => self.left,
            Action::Right => self.right,
            Action::Jump => self.jump,
            Action::Tongue => self.tongue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_active() {
        assert!(InputState::Down.is_active());
        assert!(InputState::Pressed.is_active());
        assert!(!InputState::Up.is_active());
        assert!(!InputState::Released.is_active());
    }

    #[test]
    fn test_snapshot_lookup() {
        let snapshot = InputSnapshot {
            jump: ActionState::pressed(12.0),
            ..Default::default()
        };
        assert_eq!(snapshot.action(Action::Jump).state, InputState::Pressed);
        assert_eq!(snapshot.action(Action::Left).state, InputState::Up);
    }
}
