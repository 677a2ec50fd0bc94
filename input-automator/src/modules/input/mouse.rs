//! 鼠标模拟

use super::keyboard::EnigoInjector;
use automator_core::{AutomatorError, MouseButton, Result};
use enigo::{Axis, Button, Coordinate, Direction, Mouse};

impl EnigoInjector {
    pub(super) fn mouse_move(&mut self, x: i32, y: i32) -> Result<()> {
        self.enigo
            .move_mouse(x, y, Coordinate::Abs)
            .map_err(|e| AutomatorError::InjectionFailed(format!("move to ({}, {}): {}", x, y, e)))
    }

    pub(super) fn mouse_button(&mut self, button: MouseButton, direction: Direction) -> Result<()> {
        self.enigo
            .button(to_enigo_button(button), direction)
            .map_err(|e| {
                AutomatorError::InjectionFailed(format!(
                    "{:?} {:?} button: {}",
                    direction, button, e
                ))
            })
    }

    /// 垂直滚动，正数向下
    pub(super) fn mouse_scroll(&mut self, notches: i32) -> Result<()> {
        self.enigo
            .scroll(notches, Axis::Vertical)
            .map_err(|e| AutomatorError::InjectionFailed(format!("scroll {}: {}", notches, e)))
    }
}

pub fn to_enigo_button(button: MouseButton) -> Button {
    match button {
        MouseButton::Left => Button::Left,
        MouseButton::Right => Button::Right,
        MouseButton::Middle => Button::Middle,
    }
}
