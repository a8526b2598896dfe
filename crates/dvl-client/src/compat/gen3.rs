// gen3.rs — 3.x backend events
//
// Key events carry `key`/`scancode` directly, pointer coordinates are floats
// (truncated here), the wheel reports accumulated integer steps, gamepads use
// the gaxis/gbutton/gdevice payloads with instance ids everywhere, and focus
// changes are top-level events. Native calls return a bool.

use smallvec::smallvec;

use dvl_common::keys::{KeyMod, Keycode, K_UNKNOWN};

use super::{ApiGeneration, EventTranslator, TranslatedEvents};
use crate::event::{
    DeviceEvent, GamepadAxis, GamepadAxisEvent, GamepadButton, GamepadButtonEvent as PadButtonPayload,
    JoyAxisEvent, JoyButtonEvent, JoyHatEvent, KeyEvent, MouseButton,
    MouseButtonEvent as MouseButtonPayload, NormalizedEvent,
};

pub const BUTTON_LEFT: u8 = 1;
pub const BUTTON_MIDDLE: u8 = 2;
pub const BUTTON_RIGHT: u8 = 3;
pub const BUTTON_X1: u8 = 4;
pub const BUTTON_X2: u8 = 5;

// ============================================================
// Raw layout
// ============================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct KeyboardEvent {
    pub window_id: u32,
    pub which: u32,
    pub scancode: u32,
    pub key: u32,
    pub mod_: u16,
    pub raw: u16,
    pub down: bool,
    pub repeat: bool,
}

#[derive(Debug, Clone, Default)]
pub struct TextInputEvent {
    pub window_id: u32,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct TextEditingEvent {
    pub window_id: u32,
    pub text: String,
    pub start: i32,
    pub length: i32,
}

#[derive(Debug, Clone, Default)]
pub struct TextEditingCandidatesEvent {
    pub window_id: u32,
    pub candidates: Vec<String>,
    pub selected_candidate: i32,
    pub horizontal: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MouseMotionEvent {
    pub window_id: u32,
    pub which: u32,
    pub state: u32,
    pub x: f32,
    pub y: f32,
    pub xrel: f32,
    pub yrel: f32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MouseButtonEvent {
    pub window_id: u32,
    pub which: u32,
    pub button: u8,
    pub down: bool,
    pub clicks: u8,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MouseWheelEvent {
    pub window_id: u32,
    pub which: u32,
    pub x: f32,
    pub y: f32,
    pub direction: u32,
    pub mouse_x: f32,
    pub mouse_y: f32,
    pub integer_x: i32,
    pub integer_y: i32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GamepadAxisEvent3 {
    pub which: u32,
    pub axis: u8,
    pub value: i16,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GamepadButtonEvent {
    pub which: u32,
    pub button: u8,
    pub down: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GamepadDeviceEvent {
    pub which: u32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JoyAxisEvent3 {
    pub which: u32,
    pub axis: u8,
    pub value: i16,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JoyHatEvent3 {
    pub which: u32,
    pub hat: u8,
    pub value: u8,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JoyButtonEvent3 {
    pub which: u32,
    pub button: u8,
    pub down: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JoyDeviceEvent {
    pub which: u32,
}

#[derive(Debug, Clone)]
pub enum RawEvent {
    Quit,
    WindowFocusGained { window_id: u32 },
    WindowFocusLost { window_id: u32 },
    WindowResized { window_id: u32, w: i32, h: i32 },
    KeyDown(KeyboardEvent),
    KeyUp(KeyboardEvent),
    TextEditing(TextEditingEvent),
    TextEditingCandidates(TextEditingCandidatesEvent),
    TextInput(TextInputEvent),
    MouseMotion(MouseMotionEvent),
    MouseButtonDown(MouseButtonEvent),
    MouseButtonUp(MouseButtonEvent),
    MouseWheel(MouseWheelEvent),
    JoystickAxisMotion(JoyAxisEvent3),
    JoystickHatMotion(JoyHatEvent3),
    JoystickButtonDown(JoyButtonEvent3),
    JoystickButtonUp(JoyButtonEvent3),
    JoystickAdded(JoyDeviceEvent),
    JoystickRemoved(JoyDeviceEvent),
    GamepadAxisMotion(GamepadAxisEvent3),
    GamepadButtonDown(GamepadButtonEvent),
    GamepadButtonUp(GamepadButtonEvent),
    GamepadAdded(GamepadDeviceEvent),
    GamepadRemoved(GamepadDeviceEvent),
    GamepadRemapped(GamepadDeviceEvent),
    Unknown(u32),
}

// ============================================================
// Helpers
// ============================================================

fn key_event(raw: &KeyboardEvent) -> KeyEvent {
    KeyEvent {
        key: Keycode::try_from(raw.key).unwrap_or(K_UNKNOWN),
        scancode: raw.scancode,
        modifiers: KeyMod::from_bits_truncate(raw.mod_),
        repeat: raw.repeat,
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

fn mouse_payload(b: &MouseButtonEvent) -> MouseButtonPayload {
    MouseButtonPayload {
        button: mouse_button(b.button),
        x: b.x as i32,
        y: b.y as i32,
    }
}

fn pad_button(g: &GamepadButtonEvent) -> Option<PadButtonPayload> {
    GamepadButton::from_index(g.button).map(|button| PadButtonPayload { which: g.which, button })
}

// ============================================================
// Translator
// ============================================================

#[derive(Debug, Default, Clone, Copy)]
pub struct Gen3Translator;

impl EventTranslator for Gen3Translator {
    type Raw = RawEvent;

    const GENERATION: ApiGeneration = ApiGeneration::Gen3;

    fn translate(&self, raw: &RawEvent) -> TranslatedEvents {
        let event = match raw {
            RawEvent::Quit => NormalizedEvent::Quit,
            RawEvent::WindowFocusGained { .. } => NormalizedEvent::WindowFocusChanged { gained: true },
            RawEvent::WindowFocusLost { .. } => NormalizedEvent::WindowFocusChanged { gained: false },
            RawEvent::KeyDown(k) => NormalizedEvent::KeyDown(key_event(k)),
            RawEvent::KeyUp(k) => NormalizedEvent::KeyUp(key_event(k)),
            RawEvent::TextEditing(t) => NormalizedEvent::TextEditing { text: t.text.clone() },
            RawEvent::TextEditingCandidates(_) => NormalizedEvent::TextEditing { text: String::new() },
            RawEvent::TextInput(t) => NormalizedEvent::TextInput { text: t.text.clone() },
            RawEvent::MouseMotion(m) => NormalizedEvent::MouseMotion { x: m.x as i32, y: m.y as i32 },
            RawEvent::MouseButtonDown(b) => NormalizedEvent::MouseButtonDown(mouse_payload(b)),
            RawEvent::MouseButtonUp(b) => NormalizedEvent::MouseButtonUp(mouse_payload(b)),
            RawEvent::MouseWheel(w) => NormalizedEvent::MouseWheel { x: w.integer_x, y: w.integer_y },
            RawEvent::JoystickAxisMotion(j) => NormalizedEvent::JoystickAxisMotion(JoyAxisEvent {
                which: j.which,
                axis: j.axis,
                value: j.value,
            }),
            RawEvent::JoystickHatMotion(j) => NormalizedEvent::JoystickHatMotion(JoyHatEvent {
                which: j.which,
                hat: j.hat,
                value: j.value,
            }),
            RawEvent::JoystickButtonDown(j) => NormalizedEvent::JoystickButtonDown(JoyButtonEvent {
                which: j.which,
                button: j.button,
            }),
            RawEvent::JoystickButtonUp(j) => NormalizedEvent::JoystickButtonUp(JoyButtonEvent {
                which: j.which,
                button: j.button,
            }),
            RawEvent::JoystickAdded(d) => NormalizedEvent::JoystickAdded(DeviceEvent { which: d.which }),
            RawEvent::JoystickRemoved(d) => NormalizedEvent::JoystickRemoved(DeviceEvent { which: d.which }),
            RawEvent::GamepadAxisMotion(g) => match GamepadAxis::from_index(g.axis) {
                Some(axis) => NormalizedEvent::GamepadAxisMotion(GamepadAxisEvent {
                    which: g.which,
                    axis,
                    value: g.value,
                }),
                None => return TranslatedEvents::new(),
            },
            RawEvent::GamepadButtonDown(g) => match pad_button(g) {
                Some(b) => NormalizedEvent::GamepadButtonDown(b),
                None => return TranslatedEvents::new(),
            },
            RawEvent::GamepadButtonUp(g) => match pad_button(g) {
                Some(b) => NormalizedEvent::GamepadButtonUp(b),
                None => return TranslatedEvents::new(),
            },
            RawEvent::GamepadAdded(d) => NormalizedEvent::GamepadAdded(DeviceEvent { which: d.which }),
            RawEvent::GamepadRemoved(d) => NormalizedEvent::GamepadRemoved(DeviceEvent { which: d.which }),
            RawEvent::WindowResized { .. } | RawEvent::GamepadRemapped(_) | RawEvent::Unknown(_) => {
                return TranslatedEvents::new()
            }
        };
        smallvec![event]
    }

    /// Native calls report success as `true`.
    fn status_ok(code: i32) -> bool {
        code != 0
    }
}
