// gen2.rs — 2.x backend events
//
// Key codes already use the internal numbering. Text arrives in fixed
// NUL-terminated buffers, controllers use the caxis/cbutton/cdevice payloads
// (the added event's `which` is a device index, not an instance id) and focus
// is a WINDOWEVENT sub-kind. Native calls return 0 on success.

use smallvec::smallvec;

use dvl_common::keys::{KeyMod, Keycode};

use super::{ApiGeneration, EventTranslator, TranslatedEvents};
use crate::event::{
    DeviceEvent, GamepadAxis, GamepadAxisEvent, GamepadButton, GamepadButtonEvent, JoyAxisEvent,
    JoyButtonEvent, JoyHatEvent, KeyEvent, MouseButton, MouseButtonEvent as MouseButtonPayload,
    NormalizedEvent,
};

pub const TEXTINPUTEVENT_TEXT_SIZE: usize = 32;
pub const TEXTEDITINGEVENT_TEXT_SIZE: usize = 32;

pub const WINDOWEVENT_SHOWN: u8 = 1;
pub const WINDOWEVENT_EXPOSED: u8 = 3;
pub const WINDOWEVENT_RESIZED: u8 = 5;
pub const WINDOWEVENT_FOCUS_GAINED: u8 = 12;
pub const WINDOWEVENT_FOCUS_LOST: u8 = 13;
pub const WINDOWEVENT_CLOSE: u8 = 14;

pub const BUTTON_LEFT: u8 = 1;
pub const BUTTON_MIDDLE: u8 = 2;
pub const BUTTON_RIGHT: u8 = 3;
pub const BUTTON_X1: u8 = 4;
pub const BUTTON_X2: u8 = 5;

// ============================================================
// Raw layout
// ============================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct Keysym {
    pub scancode: u32,
    pub sym: Keycode,
    pub mod_: u16,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct KeyboardEvent {
    pub window_id: u32,
    pub state: u8,
    pub repeat: u8,
    pub keysym: Keysym,
}

#[derive(Debug, Clone, Copy)]
pub struct TextInputEvent {
    pub window_id: u32,
    pub text: [u8; TEXTINPUTEVENT_TEXT_SIZE],
}

#[derive(Debug, Clone, Copy)]
pub struct TextEditingEvent {
    pub window_id: u32,
    pub text: [u8; TEXTEDITINGEVENT_TEXT_SIZE],
    pub start: i32,
    pub length: i32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MouseMotionEvent {
    pub window_id: u32,
    pub which: u32,
    pub state: u32,
    pub x: i32,
    pub y: i32,
    pub xrel: i32,
    pub yrel: i32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MouseButtonEvent {
    pub window_id: u32,
    pub which: u32,
    pub button: u8,
    pub state: u8,
    pub clicks: u8,
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MouseWheelEvent {
    pub window_id: u32,
    pub which: u32,
    pub x: i32,
    pub y: i32,
    pub direction: u32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ControllerAxisEvent {
    pub which: i32,
    pub axis: u8,
    pub value: i16,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ControllerButtonEvent {
    pub which: i32,
    pub button: u8,
    pub state: u8,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ControllerDeviceEvent {
    pub which: i32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JoyAxisEvent2 {
    pub which: i32,
    pub axis: u8,
    pub value: i16,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JoyHatEvent2 {
    pub which: i32,
    pub hat: u8,
    pub value: u8,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JoyButtonEvent2 {
    pub which: i32,
    pub button: u8,
    pub state: u8,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JoyDeviceEvent {
    pub which: i32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WindowEvent {
    pub window_id: u32,
    pub event: u8,
    pub data1: i32,
    pub data2: i32,
}

#[derive(Debug, Clone, Copy)]
pub enum RawEvent {
    Quit,
    Window(WindowEvent),
    KeyDown(KeyboardEvent),
    KeyUp(KeyboardEvent),
    TextEditing(TextEditingEvent),
    TextInput(TextInputEvent),
    MouseMotion(MouseMotionEvent),
    MouseButtonDown(MouseButtonEvent),
    MouseButtonUp(MouseButtonEvent),
    MouseWheel(MouseWheelEvent),
    JoyAxisMotion(JoyAxisEvent2),
    JoyHatMotion(JoyHatEvent2),
    JoyButtonDown(JoyButtonEvent2),
    JoyButtonUp(JoyButtonEvent2),
    JoyDeviceAdded(JoyDeviceEvent),
    JoyDeviceRemoved(JoyDeviceEvent),
    ControllerAxisMotion(ControllerAxisEvent),
    ControllerButtonDown(ControllerButtonEvent),
    ControllerButtonUp(ControllerButtonEvent),
    ControllerDeviceAdded(ControllerDeviceEvent),
    ControllerDeviceRemoved(ControllerDeviceEvent),
    ControllerDeviceRemapped(ControllerDeviceEvent),
    Unknown(u32),
}

// ============================================================
// Helpers
// ============================================================

/// Text up to the first NUL. Invalid UTF-8 is replaced, never dropped.
pub fn c_text(buf: &[u8]) -> String {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    String::from_utf8_lossy(&buf[..end]).into_owned()
}

/// Pack a string into a fixed text buffer, truncating on a char boundary.
pub fn text_buffer<const N: usize>(text: &str) -> [u8; N] {
    let mut buf = [0u8; N];
    let mut end = text.len().min(N - 1);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    buf[..end].copy_from_slice(&text.as_bytes()[..end]);
    buf
}

fn device_id(which: i32) -> u32 {
    u32::try_from(which).unwrap_or(u32::MAX)
}

fn key_event(raw: &KeyboardEvent) -> KeyEvent {
    KeyEvent {
        key: raw.keysym.sym,
        scancode: raw.keysym.scancode,
        modifiers: KeyMod::from_bits_truncate(raw.keysym.mod_),
        repeat: raw.repeat != 0,
    }
}

fn mouse_button(button: u8) -> MouseButton {
    match button {
        BUTTON_LEFT => MouseButton::Left,
        BUTTON_MIDDLE => MouseButton::Middle,
        BUTTON_RIGHT => MouseButton::Right,
        BUTTON_X1 => MouseButton::X1,
        BUTTON_X2 => MouseButton::X2,
        other => MouseButton::Other(other),
    }
}

fn pad_button(c: &ControllerButtonEvent) -> Option<GamepadButtonEvent> {
    GamepadButton::from_index(c.button).map(|button| GamepadButtonEvent { which: device_id(c.which), button })
}

// ============================================================
// Translator
// ============================================================

#[derive(Debug, Default, Clone, Copy)]
pub struct Gen2Translator;

impl EventTranslator for Gen2Translator {
    type Raw = RawEvent;

    const GENERATION: ApiGeneration = ApiGeneration::Gen2;

    fn translate(&self, raw: &RawEvent) -> TranslatedEvents {
        let event = match raw {
            RawEvent::Quit => NormalizedEvent::Quit,
            RawEvent::Window(w) => match w.event {
                WINDOWEVENT_FOCUS_GAINED => NormalizedEvent::WindowFocusChanged { gained: true },
                WINDOWEVENT_FOCUS_LOST => NormalizedEvent::WindowFocusChanged { gained: false },
                _ => return TranslatedEvents::new(),
            },
            RawEvent::KeyDown(k) => NormalizedEvent::KeyDown(key_event(k)),
            RawEvent::KeyUp(k) => NormalizedEvent::KeyUp(key_event(k)),
            RawEvent::TextEditing(t) => NormalizedEvent::TextEditing { text: c_text(&t.text) },
            RawEvent::TextInput(t) => NormalizedEvent::TextInput { text: c_text(&t.text) },
            RawEvent::MouseMotion(m) => NormalizedEvent::MouseMotion { x: m.x, y: m.y },
            RawEvent::MouseButtonDown(b) => NormalizedEvent::MouseButtonDown(MouseButtonPayload {
                button: mouse_button(b.button),
                x: b.x,
                y: b.y,
            }),
            RawEvent::MouseButtonUp(b) => NormalizedEvent::MouseButtonUp(MouseButtonPayload {
                button: mouse_button(b.button),
                x: b.x,
                y: b.y,
            }),
            RawEvent::MouseWheel(w) => NormalizedEvent::MouseWheel { x: w.x, y: w.y },
            RawEvent::JoyAxisMotion(j) => NormalizedEvent::JoystickAxisMotion(JoyAxisEvent {
                which: device_id(j.which),
                axis: j.axis,
                value: j.value,
            }),
            RawEvent::JoyHatMotion(j) => NormalizedEvent::JoystickHatMotion(JoyHatEvent {
                which: device_id(j.which),
                hat: j.hat,
                value: j.value,
            }),
            RawEvent::JoyButtonDown(j) => NormalizedEvent::JoystickButtonDown(JoyButtonEvent {
                which: device_id(j.which),
                button: j.button,
            }),
            RawEvent::JoyButtonUp(j) => NormalizedEvent::JoystickButtonUp(JoyButtonEvent {
                which: device_id(j.which),
                button: j.button,
            }),
            RawEvent::JoyDeviceAdded(d) => NormalizedEvent::JoystickAdded(DeviceEvent { which: device_id(d.which) }),
            RawEvent::JoyDeviceRemoved(d) => NormalizedEvent::JoystickRemoved(DeviceEvent { which: device_id(d.which) }),
            RawEvent::ControllerAxisMotion(c) => match GamepadAxis::from_index(c.axis) {
                Some(axis) => NormalizedEvent::GamepadAxisMotion(GamepadAxisEvent {
                    which: device_id(c.which),
                    axis,
                    value: c.value,
                }),
                None => return TranslatedEvents::new(),
            },
            RawEvent::ControllerButtonDown(c) => match pad_button(c) {
                Some(b) => NormalizedEvent::GamepadButtonDown(b),
                None => return TranslatedEvents::new(),
            },
            RawEvent::ControllerButtonUp(c) => match pad_button(c) {
                Some(b) => NormalizedEvent::GamepadButtonUp(b),
                None => return TranslatedEvents::new(),
            },
            RawEvent::ControllerDeviceAdded(d) => NormalizedEvent::GamepadAdded(DeviceEvent { which: device_id(d.which) }),
            RawEvent::ControllerDeviceRemoved(d) => NormalizedEvent::GamepadRemoved(DeviceEvent { which: device_id(d.which) }),
            RawEvent::ControllerDeviceRemapped(_) | RawEvent::Unknown(_) => return TranslatedEvents::new(),
        };
        smallvec![event]
    }

    /// 0 is success, negative is failure.
    fn status_ok(code: i32) -> bool {
        code == 0
    }
}
