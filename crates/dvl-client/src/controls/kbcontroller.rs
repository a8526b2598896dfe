// kbcontroller.rs — keyboard keys acting like gamepad buttons
//
// Handhelds expose their buttons as keyboard keys. The default table matches
// the common layout of those devices; hosts can supply their own.

use dvl_common::keys::*;

use super::controller_buttons::ControllerButton;
use crate::compat::event_key;
use crate::event::NormalizedEvent;
use crate::platform::Platform;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KbCtrlMapping {
    entries: Vec<(Keycode, ControllerButton)>,
}

impl Default for KbCtrlMapping {
    fn default() -> Self {
        Self::new(&[
            (K_LCTRL, ControllerButton::ButtonA),
            (K_LALT, ControllerButton::ButtonB),
            (K_LSHIFT, ControllerButton::ButtonX),
            (K_SPACE, ControllerButton::ButtonY),
            (K_RETURN, ControllerButton::ButtonStart),
            (K_ESCAPE, ControllerButton::ButtonBack),
            (K_TAB, ControllerButton::ButtonLeftShoulder),
            (K_BACKSPACE, ControllerButton::ButtonRightShoulder),
            (K_PAGEUP, ControllerButton::AxisTriggerLeft),
            (K_PAGEDOWN, ControllerButton::AxisTriggerRight),
            (K_UP, ControllerButton::ButtonDpadUp),
            (K_DOWN, ControllerButton::ButtonDpadDown),
            (K_LEFT, ControllerButton::ButtonDpadLeft),
            (K_RIGHT, ControllerButton::ButtonDpadRight),
        ])
    }
}

impl KbCtrlMapping {
    pub fn new(entries: &[(Keycode, ControllerButton)]) -> Self {
        Self {
            entries: entries.to_vec(),
        }
    }

    pub fn button_for(&self, key: Keycode) -> ControllerButton {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map_or(ControllerButton::None, |&(_, b)| b)
    }

    pub fn key_for(&self, button: ControllerButton) -> Option<Keycode> {
        self.entries.iter().find(|(_, b)| *b == button).map(|&(k, _)| k)
    }

    /// ControllerButton for a key event, None for anything else.
    pub fn to_controller_button(&self, event: &NormalizedEvent) -> ControllerButton {
        match event {
            NormalizedEvent::KeyDown(_) | NormalizedEvent::KeyUp(_) => self.button_for(event_key(event)),
            _ => ControllerButton::None,
        }
    }

    pub fn is_pressed<P: Platform + ?Sized>(&self, platform: &P, button: ControllerButton) -> bool {
        self.key_for(button).is_some_and(|key| platform.is_key_down(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripted::ScriptedPlatform;

    #[test]
    fn test_default_table() {
        let m = KbCtrlMapping::default();
        assert_eq!(m.button_for(K_LCTRL), ControllerButton::ButtonA);
        assert_eq!(m.button_for(K_RETURN), ControllerButton::ButtonStart);
        assert_eq!(m.button_for(K_A), ControllerButton::None);
        assert_eq!(m.key_for(ControllerButton::ButtonDpadLeft), Some(K_LEFT));
        assert_eq!(m.key_for(ControllerButton::ButtonLeftStick), None);
    }

    #[test]
    fn test_event_mapping() {
        let m = KbCtrlMapping::default();
        assert_eq!(m.to_controller_button(&NormalizedEvent::key_up(K_ESCAPE)), ControllerButton::ButtonBack);
        assert_eq!(m.to_controller_button(&NormalizedEvent::Quit), ControllerButton::None);
    }

    #[test]
    fn test_pressed_uses_key_state() {
        let m = KbCtrlMapping::default();
        let mut p = ScriptedPlatform::new();
        assert!(!m.is_pressed(&p, ControllerButton::ButtonY));
        p.press_key(K_SPACE);
        assert!(m.is_pressed(&p, ControllerButton::ButtonY));
    }
}
