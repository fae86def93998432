//! Input abstraction layer.
//!
//! Normalizes mouse and touch events into one `InputEvent` enum consumed
//! by the interaction state machine. Positions are pixels relative to the
//! canvas bounding box as currently displayed.

/// A normalized input event from any pointing device.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed (mouse down, touch start).
    PointerDown { x: f32, y: f32 },

    /// Pointer moved.
    PointerMove { x: f32, y: f32 },

    /// Pointer released.
    PointerUp { x: f32, y: f32 },

    /// Pointer left the canvas box.
    PointerLeave,

    /// A completed click (down and up on the same target).
    Click { x: f32, y: f32 },
}

impl InputEvent {
    /// Extract position if the event carries one.
    pub fn position(&self) -> Option<(f32, f32)> {
        match self {
            Self::PointerDown { x, y }
            | Self::PointerMove { x, y }
            | Self::PointerUp { x, y }
            | Self::Click { x, y } => Some((*x, *y)),
            Self::PointerLeave => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leave_has_no_position() {
        assert_eq!(InputEvent::Click { x: 1.0, y: 2.0 }.position(), Some((1.0, 2.0)));
        assert_eq!(InputEvent::PointerUp { x: 3.0, y: 4.0 }.position(), Some((3.0, 4.0)));
        assert_eq!(InputEvent::PointerLeave.position(), None);
    }
}
