use cubelab_common::MovementDirection;

/// A high-level action produced from a key binding.
///
/// The app consumes actions, never raw key codes, so the window backend can
/// change without touching camera or scene logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move the camera along one of the six basis directions while held.
    Move(MovementDirection),
    /// Close the window and leave the frame loop.
    Quit,
    /// Grab or release the cursor for mouse look.
    ToggleCursorCapture,
    /// No-op (used for keys that are not bound).
    Noop,
}

impl Action {
    /// Whether the action fires once per press rather than every frame.
    pub fn is_edge_triggered(self) -> bool {
        matches!(self, Action::Quit | Action::ToggleCursorCapture)
    }
}
