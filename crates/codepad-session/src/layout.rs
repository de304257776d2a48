//! Output panel layout: drag-to-resize and fullscreen.

use serde::Serialize;

pub const MIN_PANEL_HEIGHT: u32 = 200;
pub const MAX_PANEL_HEIGHT: u32 = 800;
pub const DEFAULT_PANEL_HEIGHT: u32 = 400;

/// Height after dragging `delta` pixels from `start`, kept in bounds.
pub fn clamp_height(start: u32, delta: i64) -> u32 {
    let raw = i64::from(start) + delta;
    raw.clamp(i64::from(MIN_PANEL_HEIGHT), i64::from(MAX_PANEL_HEIGHT)) as u32
}

/// Resize handle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    AtRest,
    /// Pointer is held on the handle.
    Dragging { start_y: i32, start_height: u32 },
}

/// Snapshot of the layout for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LayoutState {
    pub panel_height: u32,
    pub is_fullscreen: bool,
    pub is_dragging: bool,
}

#[derive(Debug, Clone)]
pub struct LayoutController {
    initial_height: u32,
    panel_height: u32,
    fullscreen: bool,
    drag: DragState,
}

impl Default for LayoutController {
    fn default() -> Self {
        Self::new(DEFAULT_PANEL_HEIGHT)
    }
}

impl LayoutController {
    /// Controller starting at `initial_height` (clamped).
    pub fn new(initial_height: u32) -> Self {
        let initial_height = clamp_height(initial_height, 0);
        Self {
            initial_height,
            panel_height: initial_height,
            fullscreen: false,
            drag: DragState::AtRest,
        }
    }

    #[inline]
    pub fn panel_height(&self) -> u32 {
        self.panel_height
    }

    #[inline]
    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    pub fn snapshot(&self) -> LayoutState {
        LayoutState {
            panel_height: self.panel_height,
            is_fullscreen: self.fullscreen,
            is_dragging: self.is_dragging(),
        }
    }

    /// Pointer pressed on the resize handle.
    pub fn pointer_down(&mut self, y: i32) {
        self.drag = DragState::Dragging {
            start_y: y,
            start_height: self.panel_height,
        };
    }

    /// Pointer moved. Returns the new height while dragging.
    pub fn pointer_move(&mut self, y: i32) -> Option<u32> {
        let DragState::Dragging {
            start_y,
            start_height,
        } = self.drag
        else {
            return None;
        };
        self.panel_height = clamp_height(start_height, i64::from(y) - i64::from(start_y));
        Some(self.panel_height)
    }

    /// Pointer released. Returns `true` if a drag ended.
    pub fn pointer_up(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        self.drag = DragState::AtRest;
        was_dragging
    }

    /// Flip fullscreen. Returns the new value.
    pub fn toggle_fullscreen(&mut self) -> bool {
        self.fullscreen = !self.fullscreen;
        self.fullscreen
    }

    /// Back to the initial height, windowed, not dragging.
    pub fn reset(&mut self) {
        *self = Self::new(self.initial_height);
    }
}
