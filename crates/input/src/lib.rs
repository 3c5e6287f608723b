//! Per-frame input snapshot for keyboard and mouse.
//!
//! The host feeds raw events in between frames; gameplay reads an immutable
//! `&InputState` during the tick. There is no global key map.

use glam::Vec2;
use std::collections::HashSet;

/// Manages input state for the current frame.
#[derive(Debug, Default, Clone)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Keys pressed this frame.
    keys_pressed: HashSet<KeyCode>,

    /// Mouse buttons currently held.
    mouse_held: HashSet<MouseButton>,
    /// Mouse buttons pressed this frame.
    mouse_pressed: HashSet<MouseButton>,

    /// Pointer movement delta for this frame.
    mouse_delta: Vec2,
    /// Pointer movement accumulated since the last `begin_frame`.
    accumulated_delta: Vec2,

    /// Whether the pointer is captured (pointer lock).
    cursor_locked: bool,
}

/// Directional movement keys held this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementKeys {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state. Call at the start of each frame.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.mouse_pressed.clear();
        self.mouse_delta = self.accumulated_delta;
        self.accumulated_delta = Vec2::ZERO;
    }

    /// Process a keyboard event.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.keys_held.contains(&key) {
                    self.keys_pressed.insert(key);
                }
                self.keys_held.insert(key);
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
            }
        }
    }

    /// Process a mouse button event.
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.mouse_held.contains(&button) {
                    self.mouse_pressed.insert(button);
                }
                self.mouse_held.insert(button);
            }
            ElementState::Released => {
                self.mouse_held.remove(&button);
            }
        }
    }

    /// Process raw pointer movement. Ignored while the pointer is not captured.
    pub fn process_mouse_motion(&mut self, delta: (f64, f64)) {
        if !self.cursor_locked {
            return;
        }
        self.accumulated_delta.x += delta.0 as f32;
        self.accumulated_delta.y += delta.1 as f32;
    }

    // Query methods

    /// Check if a key is currently held.
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Check if a key was pressed this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if a mouse button is held.
    pub fn is_mouse_held(&self, button: MouseButton) -> bool {
        self.mouse_held.contains(&button)
    }

    /// Check if a mouse button was pressed this frame.
    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool {
        self.mouse_pressed.contains(&button)
    }

    /// Get the pointer movement delta for this frame.
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    /// Check if the cursor is locked.
    pub fn is_cursor_locked(&self) -> bool {
        self.cursor_locked
    }

    /// Set cursor lock state. Releasing the lock drops any pending motion.
    pub fn set_cursor_locked(&mut self, locked: bool) {
        self.cursor_locked = locked;
        if !locked {
            self.accumulated_delta = Vec2::ZERO;
            self.mouse_delta = Vec2::ZERO;
        }
    }

    /// WASD keys held this frame.
    pub fn movement_keys(&self) -> MovementKeys {
        MovementKeys {
            forward: self.is_key_held(KeyCode::KeyW),
            back: self.is_key_held(KeyCode::KeyS),
            left: self.is_key_held(KeyCode::KeyA),
            right: self.is_key_held(KeyCode::KeyD),
        }
    }

    /// Check if sprint is held (Shift).
    pub fn is_sprinting(&self) -> bool {
        self.is_key_held(KeyCode::ShiftLeft) || self.is_key_held(KeyCode::ShiftRight)
    }

    /// Fire was clicked this frame (left mouse, only while the pointer is captured).
    pub fn is_fire_pressed(&self) -> bool {
        self.cursor_locked && self.is_mouse_pressed(MouseButton::Left)
    }

    /// Fire is being held (left mouse, only while the pointer is captured).
    pub fn is_fire_held(&self) -> bool {
        self.cursor_locked && self.is_mouse_held(MouseButton::Left)
    }

    /// Number key pressed this frame, as a raw weapon slot (1-9).
    pub fn weapon_slot_pressed(&self) -> Option<u8> {
        const DIGITS: [KeyCode; 9] = [
            KeyCode::Digit1,
            KeyCode::Digit2,
            KeyCode::Digit3,
            KeyCode::Digit4,
            KeyCode::Digit5,
            KeyCode::Digit6,
            KeyCode::Digit7,
            KeyCode::Digit8,
            KeyCode::Digit9,
        ];
        DIGITS
            .iter()
            .position(|key| self.is_key_pressed(*key))
            .map(|idx| idx as u8 + 1)
    }
}

// Re-export for convenience
pub use winit::event::{ElementState, MouseButton};
pub use winit::keyboard::KeyCode;
