use super::geometry::position_from_x;
use super::pointer::PointerEvent;
use eframe::egui::Rect;

pub const DEFAULT_POSITION: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Dragging,
}

/// Divider position in percent of the widget width plus drag state.
#[derive(Debug, Clone, PartialEq)]
pub struct SliderState {
    position: f32,
    phase: DragPhase,
}

impl Default for SliderState {
    fn default() -> Self {
        Self {
            position: DEFAULT_POSITION,
            phase: DragPhase::Idle,
        }
    }
}

impl SliderState {
    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == DragPhase::Dragging
    }

    pub fn set_position(&mut self, percent: f32) {
        if percent.is_finite() {
            self.position = percent.clamp(0.0, 100.0);
        }
    }

    /// Primary button pressed on the handle.
    pub fn press(&mut self) {
        self.phase = DragPhase::Dragging;
    }

    /// Touch started on the handle. Jumps to the touch point right away.
    pub fn touch_start(&mut self, x: f32, bounds: Rect) {
        self.phase = DragPhase::Dragging;
        self.track(x, bounds);
    }

    /// Apply a window-wide pointer event. Moves only count while dragging;
    /// a release anywhere ends the drag.
    pub fn handle(&mut self, event: &PointerEvent, bounds: Rect) {
        match *event {
            PointerEvent::Moved { x } | PointerEvent::TouchMoved { x } => {
                if self.is_dragging() {
                    self.track(x, bounds);
                }
            }
            PointerEvent::Released | PointerEvent::TouchEnded => {
                self.phase = DragPhase::Idle;
            }
            // Whether a press grabs the handle is decided by the widget.
            PointerEvent::Pressed { .. } | PointerEvent::TouchStarted { .. } => {}
        }
    }

    fn track(&mut self, x: f32, bounds: Rect) {
        if let Some(position) = position_from_x(x, bounds) {
            self.position = position;
        }
    }
}
