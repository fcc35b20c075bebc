use glam::Vec2;

use crate::canvas::Canvas;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Other,
}

/// Pointer input in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Pressed { button: PointerButton, at: Vec2 },
    Moved { at: Vec2 },
    Released,
}

/// A frame-driven animation. The host calls `frame` once per redraw, after
/// forwarding any input and size changes.
pub trait Effect {
    fn name(&self) -> &'static str;

    fn frame(&mut self, canvas: &mut Canvas);

    fn resize(&mut self, _width: u32, _height: u32) {}

    fn pointer(&mut self, _event: PointerEvent) {}
}
