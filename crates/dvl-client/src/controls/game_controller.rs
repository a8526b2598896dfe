// game_controller.rs — mapped gamepads and their registry
//
// Registry order is connection order. Each controller keeps a two-threshold
// latch per analog trigger so a trigger resting near one threshold does not
// flicker between press and release.

use dvl_common::common::com_printf;

use super::controller_buttons::{ControllerButton, GamepadLayout};
use super::controller_motion::StickState;
use crate::compat::event_gamepad_device;
use crate::event::{GamepadAxis, GamepadButton, InstanceId, NormalizedEvent};
use crate::platform::{GamepadType, NativeHandle, Platform};

/// Below this a latched trigger releases (25% of full scale).
pub const TRIGGER_RELEASE_THRESHOLD: i16 = 8192;
/// Above this an unlatched trigger presses (50% of full scale).
pub const TRIGGER_PRESS_THRESHOLD: i16 = 16384;

// ============================================================
// Trigger hysteresis
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerLatch {
    #[default]
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerTransition {
    Pressed,
    Released,
}

/// Latch plus the identity last reported for one trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerState {
    identity: ControllerButton,
    latch: TriggerLatch,
    last_emitted: ControllerButton,
}

impl TriggerState {
    pub fn new(identity: ControllerButton) -> Self {
        Self {
            identity,
            latch: TriggerLatch::Up,
            last_emitted: ControllerButton::None,
        }
    }

    pub fn latch(&self) -> TriggerLatch {
        self.latch
    }

    pub fn is_down(&self) -> bool {
        self.latch == TriggerLatch::Down
    }

    pub fn last_emitted(&self) -> ControllerButton {
        self.last_emitted
    }

    /// Feed a new analog reading. Returns the transition, if any.
    pub fn update(&mut self, value: i16) -> Option<TriggerTransition> {
        match self.latch {
            TriggerLatch::Down if value < TRIGGER_RELEASE_THRESHOLD => {
                self.latch = TriggerLatch::Up;
                self.last_emitted = self.identity;
                Some(TriggerTransition::Released)
            }
            TriggerLatch::Up if value > TRIGGER_PRESS_THRESHOLD => {
                self.latch = TriggerLatch::Down;
                self.last_emitted = self.identity;
                Some(TriggerTransition::Pressed)
            }
            _ => None,
        }
    }

    /// Forget the last reported identity; the latch itself is kept.
    pub fn unlock(&mut self) {
        self.last_emitted = ControllerButton::None;
    }
}

// ============================================================
// GameController
// ============================================================

#[derive(Debug, Clone)]
pub struct GameController {
    handle: NativeHandle,
    instance_id: InstanceId,
    pub left_stick: StickState,
    pub right_stick: StickState,
    trigger_left: TriggerState,
    trigger_right: TriggerState,
}

fn to_gamepad_button(button: ControllerButton) -> Option<GamepadButton> {
    Some(match button {
        ControllerButton::ButtonA => GamepadButton::South,
        ControllerButton::ButtonB => GamepadButton::East,
        ControllerButton::ButtonX => GamepadButton::West,
        ControllerButton::ButtonY => GamepadButton::North,
        ControllerButton::ButtonBack => GamepadButton::Back,
        ControllerButton::ButtonStart => GamepadButton::Start,
        ControllerButton::ButtonLeftStick => GamepadButton::LeftStick,
        ControllerButton::ButtonRightStick => GamepadButton::RightStick,
        ControllerButton::ButtonLeftShoulder => GamepadButton::LeftShoulder,
        ControllerButton::ButtonRightShoulder => GamepadButton::RightShoulder,
        ControllerButton::ButtonDpadUp => GamepadButton::DpadUp,
        ControllerButton::ButtonDpadDown => GamepadButton::DpadDown,
        ControllerButton::ButtonDpadLeft => GamepadButton::DpadLeft,
        ControllerButton::ButtonDpadRight => GamepadButton::DpadRight,
        _ => return None,
    })
}

fn from_gamepad_button(button: GamepadButton) -> ControllerButton {
    match button {
        GamepadButton::South => ControllerButton::ButtonA,
        GamepadButton::East => ControllerButton::ButtonB,
        GamepadButton::West => ControllerButton::ButtonX,
        GamepadButton::North => ControllerButton::ButtonY,
        GamepadButton::LeftStick => ControllerButton::ButtonLeftStick,
        GamepadButton::RightStick => ControllerButton::ButtonRightStick,
        GamepadButton::LeftShoulder => ControllerButton::ButtonLeftShoulder,
        GamepadButton::RightShoulder => ControllerButton::ButtonRightShoulder,
        GamepadButton::Start => ControllerButton::ButtonStart,
        GamepadButton::Back => ControllerButton::ButtonBack,
        GamepadButton::DpadUp => ControllerButton::ButtonDpadUp,
        GamepadButton::DpadDown => ControllerButton::ButtonDpadDown,
        GamepadButton::DpadLeft => ControllerButton::ButtonDpadLeft,
        GamepadButton::DpadRight => ControllerButton::ButtonDpadRight,
        _ => ControllerButton::None,
    }
}

impl GameController {
    pub fn new(handle: NativeHandle, instance_id: InstanceId) -> Self {
        Self {
            handle,
            instance_id,
            left_stick: StickState::default(),
            right_stick: StickState::default(),
            trigger_left: TriggerState::new(ControllerButton::AxisTriggerLeft),
            trigger_right: TriggerState::new(ControllerButton::AxisTriggerRight),
        }
    }

    pub fn instance_id(&self) -> InstanceId {
        self.instance_id
    }

    pub fn handle(&self) -> NativeHandle {
        self.handle
    }

    pub fn trigger_left(&self) -> &TriggerState {
        &self.trigger_left
    }

    pub fn trigger_right(&self) -> &TriggerState {
        &self.trigger_right
    }

    pub fn scaled_left_stick(&mut self, deadzone: f32) -> (f32, f32) {
        self.left_stick.scaled(deadzone)
    }

    pub fn scaled_right_stick(&mut self, deadzone: f32) -> (f32, f32) {
        self.right_stick.scaled(deadzone)
    }

    pub fn unlock_trigger_state(&mut self) {
        self.trigger_left.unlock();
        self.trigger_right.unlock();
    }

    /// Map a gamepad event addressed to this controller. Trigger axes go
    /// through the latch and report the last emitted identity.
    pub fn to_controller_button(&mut self, event: &NormalizedEvent) -> ControllerButton {
        match event {
            NormalizedEvent::GamepadAxisMotion(a) => match a.axis {
                GamepadAxis::LeftTrigger => {
                    self.trigger_left.update(a.value);
                    self.trigger_left.last_emitted()
                }
                GamepadAxis::RightTrigger => {
                    self.trigger_right.update(a.value);
                    self.trigger_right.last_emitted()
                }
                _ => ControllerButton::None,
            },
            NormalizedEvent::GamepadButtonDown(b) | NormalizedEvent::GamepadButtonUp(b) => {
                from_gamepad_button(b.button)
            }
            _ => ControllerButton::None,
        }
    }

    pub fn is_pressed<P: Platform + ?Sized>(&self, platform: &P, button: ControllerButton) -> bool {
        match button {
            ControllerButton::AxisTriggerLeft => self.trigger_left.is_down(),
            ControllerButton::AxisTriggerRight => self.trigger_right.is_down(),
            _ => match to_gamepad_button(button) {
                Some(b) => platform.gamepad_button_down(self.handle, b),
                None => false,
            },
        }
    }

    /// Cache stick axes. Returns false for anything that is not a stick axis.
    pub fn process_axis_motion(&mut self, event: &NormalizedEvent) -> bool {
        let NormalizedEvent::GamepadAxisMotion(a) = event else {
            return false;
        };
        match a.axis {
            GamepadAxis::LeftX => self.left_stick.set_x(a.value),
            GamepadAxis::LeftY => self.left_stick.set_y(a.value),
            GamepadAxis::RightX => self.right_stick.set_x(a.value),
            GamepadAxis::RightY => self.right_stick.set_y(a.value),
            GamepadAxis::LeftTrigger | GamepadAxis::RightTrigger => return false,
        }
        true
    }
}

// ============================================================
// Registry
// ============================================================

#[derive(Debug, Default)]
pub struct ControllerRegistry {
    controllers: Vec<GameController>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    pub fn all(&self) -> &[GameController] {
        &self.controllers
    }

    /// Open the device and append it. Failures are logged and leave the
    /// registry untouched.
    pub fn add<P: Platform + ?Sized>(&mut self, platform: &mut P, device_index: u32) -> bool {
        com_printf(&format!("Opening game controller for joystick at index {}\n", device_index));
        let info = match platform.open_gamepad(device_index) {
            Ok(info) => info,
            Err(e) => {
                com_printf(&format!("{}\n", e));
                platform.clear_error();
                return false;
            }
        };
        self.controllers.push(GameController::new(info.handle, info.instance_id));
        if let Some(mapping) = info.mapping {
            com_printf(&format!("Opened game controller with mapping:\n{}\n", mapping));
        }
        true
    }

    /// Remove the first controller with `instance_id`. Absent ids are only logged.
    pub fn remove<P: Platform + ?Sized>(&mut self, platform: &mut P, instance_id: InstanceId) -> bool {
        com_printf(&format!("Removing game controller with instance id {}\n", instance_id));
        match self.controllers.iter().position(|c| c.instance_id == instance_id) {
            Some(i) => {
                let controller = self.controllers.remove(i);
                platform.close_gamepad(controller.handle);
                true
            }
            None => {
                com_printf(&format!("Game controller not found with instance id: {}\n", instance_id));
                false
            }
        }
    }

    pub fn get(&self, instance_id: InstanceId) -> Option<&GameController> {
        self.controllers.iter().find(|c| c.instance_id == instance_id)
    }

    pub fn get_mut(&mut self, instance_id: InstanceId) -> Option<&mut GameController> {
        self.controllers.iter_mut().find(|c| c.instance_id == instance_id)
    }

    /// Controller addressed by a gamepad axis or button event.
    pub fn get_for_event_mut(&mut self, event: &NormalizedEvent) -> Option<&mut GameController> {
        let which = match event {
            NormalizedEvent::GamepadAxisMotion(a) => a.which,
            NormalizedEvent::GamepadButtonDown(b) | NormalizedEvent::GamepadButtonUp(b) => b.which,
            _ => return None,
        };
        self.get_mut(which)
    }

    /// Instance id of the first controller holding `button`.
    pub fn is_pressed_on_any_controller<P: Platform + ?Sized>(
        &self,
        platform: &P,
        button: ControllerButton,
    ) -> Option<InstanceId> {
        self.controllers
            .iter()
            .find(|c| c.is_pressed(platform, button))
            .map(|c| c.instance_id)
    }
}

// ============================================================
// Layout
// ============================================================

/// Layout forced at build time through DVL_GAMEPAD_TYPE, if any.
pub fn forced_layout() -> Option<GamepadLayout> {
    option_env!("DVL_GAMEPAD_TYPE").and_then(GamepadLayout::from_name)
}

pub fn layout_for_type(kind: GamepadType) -> GamepadLayout {
    match kind {
        GamepadType::NintendoSwitchPro
        | GamepadType::NintendoSwitchJoyconLeft
        | GamepadType::NintendoSwitchJoyconRight
        | GamepadType::NintendoSwitchJoyconPair => GamepadLayout::Nintendo,
        GamepadType::Ps3 | GamepadType::Ps4 | GamepadType::Ps5 => GamepadLayout::PlayStation,
        GamepadType::XboxOne
        | GamepadType::Xbox360
        | GamepadType::GoogleStadia
        | GamepadType::AmazonLuna
        | GamepadType::NvidiaShield => GamepadLayout::Xbox,
        GamepadType::Unknown | GamepadType::Standard | GamepadType::Virtual => GamepadLayout::Generic,
    }
}

/// Visual layout of the gamepad referenced by a device event.
pub fn get_layout<P: Platform + ?Sized>(platform: &P, event: &NormalizedEvent) -> GamepadLayout {
    if let Some(layout) = forced_layout() {
        return layout;
    }
    match event_gamepad_device(event) {
        Some(device) => layout_for_type(platform.gamepad_type(device.which)),
        None => GamepadLayout::Generic,
    }
}
