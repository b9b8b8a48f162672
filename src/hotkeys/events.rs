use egui::Key;

/// One-shot actions produced from key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyEvent {
    OpenPanel,
    ClosePanel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HotkeyId {
    MoveForward,
    MoveBack,
    MoveLeft,
    MoveRight,
    Confirm,
    Cancel,
}

impl HotkeyId {
    pub const ALL: [HotkeyId; 6] = [
        HotkeyId::MoveForward,
        HotkeyId::MoveBack,
        HotkeyId::MoveLeft,
        HotkeyId::MoveRight,
        HotkeyId::Confirm,
        HotkeyId::Cancel,
    ];

    pub fn default_key(self) -> Key {
        match self {
            HotkeyId::MoveForward => Key::W,
            HotkeyId::MoveBack => Key::S,
            HotkeyId::MoveLeft => Key::A,
            HotkeyId::MoveRight => Key::D,
            HotkeyId::Confirm => Key::Enter,
            HotkeyId::Cancel => Key::Escape,
        }
    }

    /// Movement keys act while held, the rest on press.
    pub fn is_movement(self) -> bool {
        matches!(
            self,
            HotkeyId::MoveForward | HotkeyId::MoveBack | HotkeyId::MoveLeft | HotkeyId::MoveRight
        )
    }
}
