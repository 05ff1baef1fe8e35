use std::collections::HashSet;

use crate::coords::Vec2;

/// Keys the engine cares to name. Anything else arrives as `Unknown` with the
/// platform keycode, so apps can still react to it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Space,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Unknown(u32),
}

/// Current input state for the window: held keys and pointer position.
///
/// Per-frame transitions live in [`InputFrame`]; this type only answers
/// "is it down right now".
#[derive(Debug, Default)]
pub struct InputState {
    focused: bool,
    pointer: Option<Vec2>,
    keys_down: HashSet<Key>,
}

impl InputState {
    pub fn is_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    /// Pointer position in logical pixels, `None` while outside the window.
    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub(crate) fn on_key(&mut self, frame: &mut InputFrame, key: Key, pressed: bool) {
        if pressed {
            if self.keys_down.insert(key) {
                frame.pressed.insert(key);
            }
        } else if self.keys_down.remove(&key) {
            frame.released.insert(key);
        }
    }

    pub(crate) fn on_pointer_moved(&mut self, position: Vec2) {
        self.pointer = Some(position);
    }

    pub(crate) fn on_pointer_left(&mut self) {
        self.pointer = None;
    }

    pub(crate) fn on_focus_changed(&mut self, focused: bool) {
        self.focused = focused;
        if !focused {
            // Key releases delivered to another window would otherwise leave
            // keys stuck down here.
            self.keys_down.clear();
        }
    }
}

/// Edge-triggered key transitions for one frame.
#[derive(Debug, Default)]
pub struct InputFrame {
    pressed: HashSet<Key>,
    released: HashSet<Key>,
}

impl InputFrame {
    /// True when `key` went down this frame. Key repeats do not re-trigger.
    pub fn pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    pub fn released(&self, key: Key) -> bool {
        self.released.contains(&key)
    }

    pub(crate) fn clear(&mut self) {
        self.pressed.clear();
        self.released.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_sets_down_and_edge() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.on_key(&mut frame, Key::Space, true);
        assert!(state.is_down(Key::Space));
        assert!(frame.pressed(Key::Space));
        assert!(!frame.released(Key::Space));
    }

    #[test]
    fn repeat_does_not_retrigger_edge() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.on_key(&mut frame, Key::Space, true);
        frame.clear();
        // OS key repeat shows up as another press while already down.
        state.on_key(&mut frame, Key::Space, true);
        assert!(state.is_down(Key::Space));
        assert!(!frame.pressed(Key::Space));
    }

    #[test]
    fn release_clears_down_and_records_edge() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.on_key(&mut frame, Key::Escape, true);
        state.on_key(&mut frame, Key::Escape, false);
        assert!(!state.is_down(Key::Escape));
        assert!(frame.released(Key::Escape));
    }

    #[test]
    fn focus_loss_drops_held_keys() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.on_key(&mut frame, Key::ArrowLeft, true);
        state.on_focus_changed(false);
        assert!(!state.is_down(Key::ArrowLeft));
    }

    #[test]
    fn pointer_round_trip() {
        let mut state = InputState::default();
        state.on_pointer_moved(Vec2::new(12.0, 8.0));
        assert_eq!(state.pointer(), Some(Vec2::new(12.0, 8.0)));
        state.on_pointer_left();
        assert_eq!(state.pointer(), None);
    }
}
