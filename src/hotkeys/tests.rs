#[cfg(test)]
mod tests {
    use super::super::manager::resolve;
    use super::super::{HotkeyEvent, HotkeyId, HotkeyManager};
    use egui::Key;

    #[test]
    fn test_default_bindings() {
        let manager = HotkeyManager::new();
        assert_eq!(manager.key_for(HotkeyId::MoveForward), Some(Key::W));
        assert_eq!(manager.key_for(HotkeyId::Confirm), Some(Key::Enter));
        assert_eq!(manager.key_for(HotkeyId::Cancel), Some(Key::Escape));
        assert!(HotkeyId::MoveLeft.is_movement());
        assert!(!HotkeyId::Cancel.is_movement());
    }

    #[test]
    fn test_enter_opens_panel_only_when_looking_at_tv() {
        let frame = resolve(&[HotkeyId::Confirm], &[], false, true, false);
        assert_eq!(frame.events, vec![HotkeyEvent::OpenPanel]);

        let frame = resolve(&[HotkeyId::Confirm], &[], false, false, false);
        assert!(frame.events.is_empty());
    }

    #[test]
    fn test_escape_closes_open_panel() {
        let frame = resolve(&[HotkeyId::Cancel], &[HotkeyId::MoveForward], true, false, false);
        assert_eq!(frame.events, vec![HotkeyEvent::ClosePanel]);
        assert!(frame.movement.is_idle());

        let frame = resolve(&[HotkeyId::Cancel], &[], false, true, false);
        assert!(frame.events.is_empty());
    }

    #[test]
    fn test_movement_follows_held_keys() {
        let frame = resolve(&[], &[HotkeyId::MoveForward, HotkeyId::MoveLeft], false, false, false);
        assert!(frame.movement.forward && frame.movement.left);
        assert!(!frame.movement.back && !frame.movement.right);
    }

    #[test]
    fn test_typing_suppresses_movement_and_enter() {
        let frame = resolve(&[HotkeyId::Confirm], &[HotkeyId::MoveBack], false, true, true);
        assert!(frame.events.is_empty());
        assert!(frame.movement.is_idle());
    }
}
