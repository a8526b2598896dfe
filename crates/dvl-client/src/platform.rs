// platform.rs — the seam between the input core and a windowing backend
//
// The client crate cannot depend on dvl-sys (that would be circular), so the
// backend implements this trait and hands itself to the input core. Every
// method speaks the normalized vocabulary; backend specific types never
// cross this boundary.

use std::time::Duration;

use thiserror::Error;

use dvl_common::keys::{KeyMod, Keycode};

use crate::event::{GamepadButton, InstanceId, NormalizedEvent};

/// Opaque backend handle for an opened device.
pub type NativeHandle = u64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    #[error("clipboard unavailable: {0}")]
    ClipboardUnavailable(String),
    #[error("could not open device {index}: {reason}")]
    DeviceOpen { index: u32, reason: String },
    #[error("{0} is not supported by this backend")]
    Unsupported(&'static str),
    #[error("{0}")]
    Backend(String),
}

/// Controller model as reported by the backend's controller database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamepadType {
    #[default]
    Unknown,
    Standard,
    Xbox360,
    XboxOne,
    Ps3,
    Ps4,
    Ps5,
    NintendoSwitchPro,
    NintendoSwitchJoyconLeft,
    NintendoSwitchJoyconRight,
    NintendoSwitchJoyconPair,
    AmazonLuna,
    GoogleStadia,
    NvidiaShield,
    Virtual,
}

/// Result of opening a gamepad.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GamepadInfo {
    pub handle: NativeHandle,
    pub instance_id: InstanceId,
    /// Controller database mapping string, when the backend has one.
    pub mapping: Option<String>,
}

/// Result of opening a raw joystick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoystickInfo {
    pub handle: NativeHandle,
    pub instance_id: InstanceId,
    pub name: String,
}

pub trait Platform {
    /// Next pending event, without blocking.
    fn poll_event(&mut self) -> Option<NormalizedEvent>;

    /// Block until an event arrives or `timeout` elapses.
    fn wait_event_timeout(&mut self, timeout: Duration) -> Option<NormalizedEvent>;

    /// Live modifier state, sampled at call time.
    fn mod_state(&self) -> KeyMod;

    /// Live key state, used by keyboard-as-gamepad pressed queries.
    fn is_key_down(&self, key: Keycode) -> bool;

    fn set_clipboard_text(&mut self, text: &str) -> Result<(), PlatformError>;
    fn has_clipboard_text(&mut self) -> bool;
    fn get_clipboard_text(&mut self) -> Result<String, PlatformError>;

    /// Reset the backend's last-error state after it has been reported.
    fn clear_error(&mut self);

    fn open_gamepad(&mut self, device_index: u32) -> Result<GamepadInfo, PlatformError>;
    fn close_gamepad(&mut self, handle: NativeHandle);
    fn gamepad_button_down(&self, handle: NativeHandle, button: GamepadButton) -> bool;

    /// Controller model for the device referenced by a gamepad-added event.
    fn gamepad_type(&self, which: u32) -> GamepadType;

    fn open_joystick(&mut self, device_index: u32) -> Result<JoystickInfo, PlatformError>;
    fn close_joystick(&mut self, handle: NativeHandle);
    fn joystick_button_down(&self, handle: NativeHandle, button: u8) -> bool;

    /// Pointer position in window coordinates.
    fn mouse_position(&self) -> (i32, i32);
    fn set_cursor_visible(&mut self, visible: bool);

    /// True where committed text replaces the whole widget buffer instead of
    /// being inserted (on-screen keyboards that edit the full string).
    fn text_input_replaces_buffer(&self) -> bool {
        false
    }
}
