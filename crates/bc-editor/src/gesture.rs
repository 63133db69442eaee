//! Gesture boundaries.
//!
//! Drag, resize and palette-drop interactions each report where a gesture
//! begins and ends. Whoever records history implements `GestureListener`
//! and is handed to the engine on every call, so the engines never reach
//! for shared global state.

use bc_core::Document;

pub trait GestureListener {
    /// Called before the first geometry change of a gesture.
    fn gesture_start(&mut self, doc: &Document);

    /// Called once the gesture has finished changing the document.
    fn gesture_end(&mut self, doc: &mut Document);

    /// Called instead of `gesture_end` when a started gesture is abandoned.
    /// The listener puts back the blocks seen at `gesture_start`.
    fn gesture_cancel(&mut self, doc: &mut Document);
}

/// Discards gesture boundaries. For hosts that do not keep history.
impl GestureListener for () {
    fn gesture_start(&mut self, _doc: &Document) {}

    fn gesture_end(&mut self, _doc: &mut Document) {}

    fn gesture_cancel(&mut self, _doc: &mut Document) {}
}
