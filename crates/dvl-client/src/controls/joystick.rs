// joystick.rs — raw joysticks without a controller database mapping
//
// Buttons map through a fixed table in the common XInput ordering. Hats are
// diffed against the previous mask: directions no longer held release,
// newly held directions press.

use dvl_common::common::com_printf;

use super::controller_buttons::{ControllerButton, ControllerButtonEvent, ControllerButtonEvents};
use super::controller_motion::StickState;
use crate::event::{InstanceId, NormalizedEvent, HAT_DOWN, HAT_LEFT, HAT_RIGHT, HAT_UP};
use crate::platform::{NativeHandle, Platform};

/// Button index -> ControllerButton.
pub const DEFAULT_BUTTON_MAP: [ControllerButton; 10] = [
    ControllerButton::ButtonA,
    ControllerButton::ButtonB,
    ControllerButton::ButtonX,
    ControllerButton::ButtonY,
    ControllerButton::ButtonLeftShoulder,
    ControllerButton::ButtonRightShoulder,
    ControllerButton::ButtonBack,
    ControllerButton::ButtonStart,
    ControllerButton::ButtonLeftStick,
    ControllerButton::ButtonRightStick,
];

const HAT_DIRECTIONS: [(u8, ControllerButton); 4] = [
    (HAT_UP, ControllerButton::ButtonDpadUp),
    (HAT_DOWN, ControllerButton::ButtonDpadDown),
    (HAT_LEFT, ControllerButton::ButtonDpadLeft),
    (HAT_RIGHT, ControllerButton::ButtonDpadRight),
];

fn button_index(button: ControllerButton) -> Option<u8> {
    DEFAULT_BUTTON_MAP
        .iter()
        .position(|&b| b == button)
        .and_then(|i| u8::try_from(i).ok())
}

#[derive(Debug, Clone)]
pub struct Joystick {
    handle: NativeHandle,
    instance_id: InstanceId,
    hat_state: u8,
    pub left_stick: StickState,
    pub right_stick: StickState,
}

impl Joystick {
    pub fn new(handle: NativeHandle, instance_id: InstanceId) -> Self {
        Self {
            handle,
            instance_id,
            hat_state: 0,
            left_stick: StickState::default(),
            right_stick: StickState::default(),
        }
    }

    pub fn instance_id(&self) -> InstanceId {
        self.instance_id
    }

    pub fn hat_state(&self) -> u8 {
        self.hat_state
    }

    /// Map a joystick event addressed to this device.
    pub fn to_controller_button_events(&mut self, event: &NormalizedEvent) -> ControllerButtonEvents {
        let mut out = ControllerButtonEvents::new();
        match event {
            NormalizedEvent::JoystickButtonDown(b) | NormalizedEvent::JoystickButtonUp(b) => {
                let button = DEFAULT_BUTTON_MAP
                    .get(usize::from(b.button))
                    .copied()
                    .unwrap_or(ControllerButton::None);
                out.push(ControllerButtonEvent::new(button, event.is_release()));
            }
            NormalizedEvent::JoystickHatMotion(h) => {
                // Only the first hat drives the d-pad.
                if h.hat != 0 {
                    out.push(ControllerButtonEvent::new(ControllerButton::Ignore, false));
                    return out;
                }
                let old = self.hat_state;
                self.hat_state = h.value;
                for (bit, button) in HAT_DIRECTIONS {
                    if old & bit != 0 && h.value & bit == 0 {
                        out.push(ControllerButtonEvent::new(button, true));
                    }
                }
                for (bit, button) in HAT_DIRECTIONS {
                    if old & bit == 0 && h.value & bit != 0 {
                        out.push(ControllerButtonEvent::new(button, false));
                    }
                }
                if out.is_empty() {
                    out.push(ControllerButtonEvent::new(ControllerButton::Ignore, false));
                }
            }
            NormalizedEvent::JoystickAxisMotion(_) => {
                out.push(ControllerButtonEvent::new(ControllerButton::Ignore, false));
            }
            _ => {}
        }
        out
    }

    pub fn is_pressed<P: Platform + ?Sized>(&self, platform: &P, button: ControllerButton) -> bool {
        if let Some(&(bit, _)) = HAT_DIRECTIONS.iter().find(|(_, b)| *b == button) {
            return self.hat_state & bit != 0;
        }
        match button_index(button) {
            Some(index) => platform.joystick_button_down(self.handle, index),
            None => false,
        }
    }

    /// Axes 0..=3 are treated as left X/Y and right X/Y.
    pub fn process_axis_motion(&mut self, event: &NormalizedEvent) -> bool {
        let NormalizedEvent::JoystickAxisMotion(a) = event else {
            return false;
        };
        match a.axis {
            0 => self.left_stick.set_x(a.value),
            1 => self.left_stick.set_y(a.value),
            2 => self.right_stick.set_x(a.value),
            3 => self.right_stick.set_y(a.value),
            _ => return false,
        }
        true
    }
}

#[derive(Debug, Default)]
pub struct JoystickRegistry {
    joysticks: Vec<Joystick>,
}

impl JoystickRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.joysticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joysticks.is_empty()
    }

    pub fn add<P: Platform + ?Sized>(&mut self, platform: &mut P, device_index: u32) -> bool {
        com_printf(&format!("Adding joystick {}\n", device_index));
        match platform.open_joystick(device_index) {
            Ok(info) => {
                com_printf(&format!("Opened joystick \"{}\"\n", info.name));
                self.joysticks.push(Joystick::new(info.handle, info.instance_id));
                true
            }
            Err(e) => {
                com_printf(&format!("{}\n", e));
                platform.clear_error();
                false
            }
        }
    }

    pub fn remove<P: Platform + ?Sized>(&mut self, platform: &mut P, instance_id: InstanceId) -> bool {
        com_printf(&format!("Removing joystick (instance id: {})\n", instance_id));
        match self.joysticks.iter().position(|j| j.instance_id == instance_id) {
            Some(i) => {
                let joystick = self.joysticks.remove(i);
                platform.close_joystick(joystick.handle);
                true
            }
            None => {
                com_printf(&format!("Joystick not found with instance id: {}\n", instance_id));
                false
            }
        }
    }

    pub fn get(&self, instance_id: InstanceId) -> Option<&Joystick> {
        self.joysticks.iter().find(|j| j.instance_id == instance_id)
    }

    pub fn get_mut(&mut self, instance_id: InstanceId) -> Option<&mut Joystick> {
        self.joysticks.iter_mut().find(|j| j.instance_id == instance_id)
    }

    /// Joystick addressed by a joystick input event.
    pub fn get_for_event_mut(&mut self, event: &NormalizedEvent) -> Option<&mut Joystick> {
        let which = match event {
            NormalizedEvent::JoystickButtonDown(b) | NormalizedEvent::JoystickButtonUp(b) => b.which,
            NormalizedEvent::JoystickHatMotion(h) => h.which,
            NormalizedEvent::JoystickAxisMotion(a) => a.which,
            _ => return None,
        };
        self.get_mut(which)
    }

    pub fn is_pressed_on_any_joystick<P: Platform + ?Sized>(&self, platform: &P, button: ControllerButton) -> bool {
        self.joysticks.iter().any(|j| j.is_pressed(platform, button))
    }
}
