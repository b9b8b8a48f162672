use egui::{InputState, Key};

use crate::hotkeys::{HotkeyEvent, HotkeyId};
use crate::scene::MoveInput;

/// What the keyboard asked for this frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    pub events: Vec<HotkeyEvent>,
    pub movement: MoveInput,
}

/// Maps window key state to room actions.
pub struct HotkeyManager {
    bindings: Vec<(HotkeyId, Key)>,
}

impl Default for HotkeyManager {
    fn default() -> Self {
        Self::new()
    }
}

impl HotkeyManager {
    pub fn new() -> Self {
        let bindings = HotkeyId::ALL.iter().map(|id| (*id, id.default_key())).collect();
        Self { bindings }
    }

    pub fn key_for(&self, id: HotkeyId) -> Option<Key> {
        self.bindings.iter().find(|(bound, _)| *bound == id).map(|(_, key)| *key)
    }

    /// Reads this frame's keys. `typing` is true while a text field has focus.
    pub fn process(&self, input: &InputState, panel_open: bool, looking_at_tv: bool, typing: bool) -> FrameInput {
        let mut pressed = Vec::new();
        let mut held = Vec::new();
        for (id, key) in &self.bindings {
            if id.is_movement() {
                if input.key_down(*key) {
                    held.push(*id);
                }
            } else if input.key_pressed(*key) {
                pressed.push(*id);
            }
        }
        resolve(&pressed, &held, panel_open, looking_at_tv, typing)
    }
}

/// Enter opens the panel only while looking at the TV; Escape closes it.
/// Walking stops while the panel is open or a text field has focus.
pub fn resolve(
    pressed: &[HotkeyId],
    held: &[HotkeyId],
    panel_open: bool,
    looking_at_tv: bool,
    typing: bool,
) -> FrameInput {
    let mut frame = FrameInput::default();

    if panel_open {
        if pressed.contains(&HotkeyId::Cancel) {
            frame.events.push(HotkeyEvent::ClosePanel);
        }
        return frame;
    }

    if pressed.contains(&HotkeyId::Confirm) && looking_at_tv && !typing {
        log::debug!("Opening control panel");
        frame.events.push(HotkeyEvent::OpenPanel);
    }

    if !typing {
        frame.movement = MoveInput {
            forward: held.contains(&HotkeyId::MoveForward),
            back: held.contains(&HotkeyId::MoveBack),
            left: held.contains(&HotkeyId::MoveLeft),
            right: held.contains(&HotkeyId::MoveRight),
        };
    }
    frame
}
