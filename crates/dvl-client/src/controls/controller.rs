// controller.rs — InputContext: every controller source behind one entry point
//
// Gamepads, raw joysticks and keyboard-as-gamepad all report
// ControllerButton values. The context owns the device registries and is
// passed explicitly to everything that needs controller state.

use super::controller_buttons::{ControllerButton, ControllerButtonCombo, ControllerButtonEvent, ControllerButtonEvents};
use super::game_controller::ControllerRegistry;
use super::joystick::JoystickRegistry;
use super::kbcontroller::KbCtrlMapping;
use crate::event::NormalizedEvent;
use crate::platform::Platform;

#[derive(Debug)]
pub struct InputContext {
    pub controllers: ControllerRegistry,
    pub joysticks: JoystickRegistry,
    kbctrl: Option<KbCtrlMapping>,
    demo_running: bool,
}

impl Default for InputContext {
    fn default() -> Self {
        Self::new()
    }
}

impl InputContext {
    /// Keyboard-as-gamepad starts enabled when built with the `kbctrl` feature.
    pub fn new() -> Self {
        let kbctrl = if cfg!(feature = "kbctrl") {
            Some(KbCtrlMapping::default())
        } else {
            None
        };
        Self {
            controllers: ControllerRegistry::new(),
            joysticks: JoystickRegistry::new(),
            kbctrl,
            demo_running: false,
        }
    }

    pub fn set_kbctrl(&mut self, mapping: Option<KbCtrlMapping>) {
        self.kbctrl = mapping;
    }

    pub fn kbctrl(&self) -> Option<&KbCtrlMapping> {
        self.kbctrl.as_ref()
    }

    /// While a demo replays, keyboard-as-gamepad is ignored and movies are skipped.
    pub fn set_demo_running(&mut self, running: bool) {
        self.demo_running = running;
    }

    pub fn demo_running(&self) -> bool {
        self.demo_running
    }

    fn active_kbctrl(&self) -> Option<&KbCtrlMapping> {
        if self.demo_running {
            return None;
        }
        self.kbctrl.as_ref()
    }

    /// Reset per-event trigger state of the controller the event addresses.
    pub fn unlock_controller_state(&mut self, event: &NormalizedEvent) {
        if let Some(controller) = self.controllers.get_for_event_mut(event) {
            controller.unlock_trigger_state();
        }
    }

    /// Cache analog stick values. Returns true when the event moved a stick.
    pub fn process_controller_motion(&mut self, event: &NormalizedEvent) -> bool {
        if let Some(controller) = self.controllers.get_for_event_mut(event) {
            if controller.process_axis_motion(event) {
                return true;
            }
        }
        if let Some(joystick) = self.joysticks.get_for_event_mut(event) {
            return joystick.process_axis_motion(event);
        }
        false
    }

    /// Normalize one event into controller buttons. Keyboard-as-gamepad
    /// wins, then mapped gamepads, then raw joysticks. Unrecognized events
    /// yield a single None carrying the release flag.
    pub fn to_controller_button_events(&mut self, event: &NormalizedEvent) -> ControllerButtonEvents {
        let mut result = ControllerButtonEvent::new(ControllerButton::None, event.is_release());

        if let Some(kbctrl) = self.active_kbctrl() {
            result.button = kbctrl.to_controller_button(event);
            if result.button != ControllerButton::None {
                return smallvec::smallvec![result];
            }
        }

        if let Some(controller) = self.controllers.get_for_event_mut(event) {
            result.button = controller.to_controller_button(event);
            if result.button != ControllerButton::None {
                if result.button.is_trigger() {
                    result.up = !match result.button {
                        ControllerButton::AxisTriggerLeft => controller.trigger_left().is_down(),
                        _ => controller.trigger_right().is_down(),
                    };
                }
                return smallvec::smallvec![result];
            }
        }

        if let Some(joystick) = self.joysticks.get_for_event_mut(event) {
            return joystick.to_controller_button_events(event);
        }

        smallvec::smallvec![result]
    }

    pub fn is_controller_button_pressed<P: Platform + ?Sized>(&self, platform: &P, button: ControllerButton) -> bool {
        if self.controllers.is_pressed_on_any_controller(platform, button).is_some() {
            return true;
        }
        if let Some(kbctrl) = self.active_kbctrl() {
            if kbctrl.is_pressed(platform, button) {
                return true;
            }
        }
        self.joysticks.is_pressed_on_any_joystick(platform, button)
    }

    pub fn is_controller_button_combo_pressed<P: Platform + ?Sized>(
        &self,
        platform: &P,
        combo: ControllerButtonCombo,
    ) -> bool {
        self.is_controller_button_pressed(platform, combo.button)
            && (combo.modifier == ControllerButton::None
                || self.is_controller_button_pressed(platform, combo.modifier))
    }

    /// Device hot-plug. Returns true when the event was a device lifecycle event.
    pub fn handle_controller_added_or_removed_event<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
        event: &NormalizedEvent,
    ) -> bool {
        match event {
            NormalizedEvent::GamepadAdded(d) => {
                self.controllers.add(platform, d.which);
            }
            NormalizedEvent::GamepadRemoved(d) => {
                self.controllers.remove(platform, d.which);
            }
            NormalizedEvent::JoystickAdded(d) => {
                self.joysticks.add(platform, d.which);
            }
            NormalizedEvent::JoystickRemoved(d) => {
                self.joysticks.remove(platform, d.which);
            }
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{
        DeviceEvent, GamepadAxis, GamepadAxisEvent, GamepadButton, GamepadButtonEvent, JoyHatEvent,
        MouseButton, MouseButtonEvent, HAT_UP,
    };
    use crate::platform::GamepadType;
    use crate::scripted::ScriptedPlatform;
    use dvl_common::keys::{K_A, K_LCTRL, K_SPACE};

    fn ctx_with_pad(p: &mut ScriptedPlatform) -> InputContext {
        p.add_fake_gamepad(0, 10, GamepadType::XboxOne);
        let mut ctx = InputContext::new();
        ctx.set_kbctrl(None);
        assert!(ctx.handle_controller_added_or_removed_event(p, &NormalizedEvent::GamepadAdded(DeviceEvent { which: 0 })));
        ctx
    }

    fn trigger(value: i16) -> NormalizedEvent {
        NormalizedEvent::GamepadAxisMotion(GamepadAxisEvent { which: 10, axis: GamepadAxis::RightTrigger, value })
    }

    // ---- fallbacks ----

    #[test]
    fn test_unrecognized_event_single_none() {
        let mut ctx = InputContext::new();
        ctx.set_kbctrl(None);
        let up = NormalizedEvent::key_up(K_A);
        assert_eq!(ctx.to_controller_button_events(&up).as_slice(), &[ControllerButtonEvent::new(ControllerButton::None, true)]);
        let down = NormalizedEvent::MouseButtonDown(MouseButtonEvent { button: MouseButton::Left, x: 0, y: 0 });
        assert_eq!(ctx.to_controller_button_events(&down).as_slice(), &[ControllerButtonEvent::new(ControllerButton::None, false)]);
        // A button event for a controller that was never added.
        let stray = NormalizedEvent::GamepadButtonUp(GamepadButtonEvent { which: 99, button: GamepadButton::South });
        assert_eq!(ctx.to_controller_button_events(&stray).as_slice(), &[ControllerButtonEvent::new(ControllerButton::None, true)]);
    }

    // ---- gamepads ----

    #[test]
    fn test_gamepad_buttons() {
        let mut p = ScriptedPlatform::new();
        let mut ctx = ctx_with_pad(&mut p);
        let down = NormalizedEvent::GamepadButtonDown(GamepadButtonEvent { which: 10, button: GamepadButton::South });
        assert_eq!(ctx.to_controller_button_events(&down).as_slice(), &[ControllerButtonEvent::new(ControllerButton::ButtonA, false)]);
        let up = NormalizedEvent::GamepadButtonUp(GamepadButtonEvent { which: 10, button: GamepadButton::Start });
        assert_eq!(ctx.to_controller_button_events(&up).as_slice(), &[ControllerButtonEvent::new(ControllerButton::ButtonStart, true)]);
    }

    #[test]
    fn test_trigger_up_flag_follows_latch() {
        let mut p = ScriptedPlatform::new();
        let mut ctx = ctx_with_pad(&mut p);
        let press = ctx.to_controller_button_events(&trigger(20000));
        assert_eq!(press.as_slice(), &[ControllerButtonEvent::new(ControllerButton::AxisTriggerRight, false)]);
        let release = ctx.to_controller_button_events(&trigger(5000));
        assert_eq!(release.as_slice(), &[ControllerButtonEvent::new(ControllerButton::AxisTriggerRight, true)]);
    }

    #[test]
    fn test_trigger_band_after_unlock_emits_nothing_new() {
        let mut p = ScriptedPlatform::new();
        let mut ctx = ctx_with_pad(&mut p);
        for (value, expected) in [
            (20000, ControllerButtonEvent::new(ControllerButton::AxisTriggerRight, false)),
            (5000, ControllerButtonEvent::new(ControllerButton::AxisTriggerRight, true)),
            (10000, ControllerButtonEvent::new(ControllerButton::None, false)),
        ] {
            let event = trigger(value);
            ctx.unlock_controller_state(&event);
            assert_eq!(ctx.to_controller_button_events(&event).as_slice(), &[expected]);
        }
    }

    #[test]
    fn test_remove_absent_gamepad() {
        let mut p = ScriptedPlatform::new();
        let mut ctx = ctx_with_pad(&mut p);
        assert!(ctx.handle_controller_added_or_removed_event(&mut p, &NormalizedEvent::GamepadRemoved(DeviceEvent { which: 77 })));
        assert_eq!(ctx.controllers.len(), 1);
        assert!(!ctx.handle_controller_added_or_removed_event(&mut p, &NormalizedEvent::Quit));
    }

    #[test]
    fn test_stick_motion() {
        let mut p = ScriptedPlatform::new();
        let mut ctx = ctx_with_pad(&mut p);
        let ly = NormalizedEvent::GamepadAxisMotion(GamepadAxisEvent { which: 10, axis: GamepadAxis::LeftY, value: -32767 });
        assert!(ctx.process_controller_motion(&ly));
        assert!(!ctx.process_controller_motion(&trigger(100)));
        let stick = &mut ctx.controllers.get_mut(10).unwrap().left_stick;
        let (x, y) = stick.scaled(0.07);
        assert_eq!(x, 0.0);
        assert!((y - 1.0).abs() < 1e-4);
    }

    // ---- keyboard-as-gamepad ----

    #[test]
    fn test_kbctrl_precedence_and_demo() {
        let mut ctx = InputContext::new();
        ctx.set_kbctrl(Some(KbCtrlMapping::default()));
        let ev = NormalizedEvent::key_down(K_LCTRL);
        assert_eq!(ctx.to_controller_button_events(&ev)[0].button, ControllerButton::ButtonA);
        ctx.set_demo_running(true);
        assert_eq!(ctx.to_controller_button_events(&ev)[0].button, ControllerButton::None);
    }

    #[test]
    fn test_pressed_and_combo() {
        let mut p = ScriptedPlatform::new();
        let mut ctx = ctx_with_pad(&mut p);
        ctx.set_kbctrl(Some(KbCtrlMapping::default()));
        let combo = ControllerButtonCombo::with_modifier(ControllerButton::ButtonBack, ControllerButton::ButtonY);
        assert!(!ctx.is_controller_button_combo_pressed(&p, combo));
        p.press_key(K_SPACE);
        assert!(ctx.is_controller_button_pressed(&p, ControllerButton::ButtonY));
        assert!(!ctx.is_controller_button_combo_pressed(&p, combo));
        p.press_gamepad_button(10, GamepadButton::Back);
        assert!(ctx.is_controller_button_combo_pressed(&p, combo));
        assert!(ctx.is_controller_button_combo_pressed(&p, ControllerButtonCombo::new(ControllerButton::ButtonY)));
    }

    // ---- joysticks ----

    #[test]
    fn test_joystick_hat_through_context() {
        let mut p = ScriptedPlatform::new();
        p.add_fake_joystick(0, 20);
        let mut ctx = InputContext::new();
        ctx.set_kbctrl(None);
        assert!(ctx.handle_controller_added_or_removed_event(&mut p, &NormalizedEvent::JoystickAdded(DeviceEvent { which: 0 })));
        let ev = NormalizedEvent::JoystickHatMotion(JoyHatEvent { which: 20, hat: 0, value: HAT_UP });
        assert_eq!(ctx.to_controller_button_events(&ev).as_slice(), &[ControllerButtonEvent::new(ControllerButton::ButtonDpadUp, false)]);
        assert!(ctx.is_controller_button_pressed(&p, ControllerButton::ButtonDpadUp));
        assert!(ctx.handle_controller_added_or_removed_event(&mut p, &NormalizedEvent::JoystickRemoved(DeviceEvent { which: 20 })));
        assert!(ctx.joysticks.is_empty());
    }
}
