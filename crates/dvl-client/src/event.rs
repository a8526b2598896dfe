// event.rs — the normalized event vocabulary
//
// Every backend generation is translated into NormalizedEvent at the
// platform boundary. Nothing past this point knows which backend produced it.

use dvl_common::keys::{KeyMod, Keycode, Scancode};

/// Platform id for a connected device, stable for the duration of the connection.
pub type InstanceId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Keycode,
    pub scancode: Scancode,
    /// Modifier state captured when the event was posted. The input core
    /// reads the live state instead (see compat::event_modifiers).
    pub modifiers: KeyMod,
    pub repeat: bool,
}

impl KeyEvent {
    pub fn new(key: Keycode) -> Self {
        Self {
            key,
            scancode: 0,
            modifiers: KeyMod::empty(),
            repeat: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    X1,
    X2,
    Other(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseButtonEvent {
    pub button: MouseButton,
    pub x: i32,
    pub y: i32,
}

/// Gamepad buttons by physical position. Indices match the controller
/// database numbering used by every generation that has a gamepad API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamepadButton {
    South,
    East,
    West,
    North,
    Back,
    Guide,
    Start,
    LeftStick,
    RightStick,
    LeftShoulder,
    RightShoulder,
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
    Misc1,
    RightPaddle1,
    LeftPaddle1,
    RightPaddle2,
    LeftPaddle2,
    Touchpad,
}

impl GamepadButton {
    pub fn from_index(index: u8) -> Option<Self> {
        use GamepadButton::*;
        Some(match index {
            0 => South,
            1 => East,
            2 => West,
            3 => North,
            4 => Back,
            5 => Guide,
            6 => Start,
            7 => LeftStick,
            8 => RightStick,
            9 => LeftShoulder,
            10 => RightShoulder,
            11 => DpadUp,
            12 => DpadDown,
            13 => DpadLeft,
            14 => DpadRight,
            15 => Misc1,
            16 => RightPaddle1,
            17 => LeftPaddle1,
            18 => RightPaddle2,
            19 => LeftPaddle2,
            20 => Touchpad,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamepadAxis {
    LeftX,
    LeftY,
    RightX,
    RightY,
    LeftTrigger,
    RightTrigger,
}

impl GamepadAxis {
    pub fn from_index(index: u8) -> Option<Self> {
        Some(match index {
            0 => GamepadAxis::LeftX,
            1 => GamepadAxis::LeftY,
            2 => GamepadAxis::RightX,
            3 => GamepadAxis::RightY,
            4 => GamepadAxis::LeftTrigger,
            5 => GamepadAxis::RightTrigger,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GamepadButtonEvent {
    pub which: InstanceId,
    pub button: GamepadButton,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GamepadAxisEvent {
    pub which: InstanceId,
    pub axis: GamepadAxis,
    pub value: i16,
}

/// Device lifecycle payload. For added events `which` is the device index
/// to open; for removed events it is the instance id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceEvent {
    pub which: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoyButtonEvent {
    pub which: InstanceId,
    pub button: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoyHatEvent {
    pub which: InstanceId,
    pub hat: u8,
    /// Bitmask of HAT_UP / HAT_RIGHT / HAT_DOWN / HAT_LEFT.
    pub value: u8,
}

pub const HAT_CENTERED: u8 = 0x00;
pub const HAT_UP: u8 = 0x01;
pub const HAT_RIGHT: u8 = 0x02;
pub const HAT_DOWN: u8 = 0x04;
pub const HAT_LEFT: u8 = 0x08;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoyAxisEvent {
    pub which: InstanceId,
    pub axis: u8,
    pub value: i16,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedEvent {
    KeyDown(KeyEvent),
    KeyUp(KeyEvent),
    TextInput { text: String },
    /// Composition in progress. Swallowed by text widgets.
    TextEditing { text: String },
    MouseMotion { x: i32, y: i32 },
    MouseButtonDown(MouseButtonEvent),
    MouseButtonUp(MouseButtonEvent),
    MouseWheel { x: i32, y: i32 },
    GamepadButtonDown(GamepadButtonEvent),
    GamepadButtonUp(GamepadButtonEvent),
    GamepadAxisMotion(GamepadAxisEvent),
    GamepadAdded(DeviceEvent),
    GamepadRemoved(DeviceEvent),
    JoystickButtonDown(JoyButtonEvent),
    JoystickButtonUp(JoyButtonEvent),
    JoystickHatMotion(JoyHatEvent),
    JoystickAxisMotion(JoyAxisEvent),
    JoystickAdded(DeviceEvent),
    JoystickRemoved(DeviceEvent),
    WindowFocusChanged { gained: bool },
    Quit,
}

impl NormalizedEvent {
    pub fn key_down(key: Keycode) -> Self {
        NormalizedEvent::KeyDown(KeyEvent::new(key))
    }

    pub fn key_up(key: Keycode) -> Self {
        NormalizedEvent::KeyUp(KeyEvent::new(key))
    }

    pub fn text_input(text: &str) -> Self {
        NormalizedEvent::TextInput { text: text.to_string() }
    }

    /// Release-class events: the button-ish events that report `up`.
    pub fn is_release(&self) -> bool {
        matches!(
            self,
            NormalizedEvent::GamepadButtonUp(_)
                | NormalizedEvent::JoystickButtonUp(_)
                | NormalizedEvent::KeyUp(_)
        )
    }

    /// Short kind name for log lines.
    pub fn kind_name(&self) -> &'static str {
        match self {
            NormalizedEvent::KeyDown(_) => "KeyDown",
            NormalizedEvent::KeyUp(_) => "KeyUp",
            NormalizedEvent::TextInput { .. } => "TextInput",
            NormalizedEvent::TextEditing { .. } => "TextEditing",
            NormalizedEvent::MouseMotion { .. } => "MouseMotion",
            NormalizedEvent::MouseButtonDown(_) => "MouseButtonDown",
            NormalizedEvent::MouseButtonUp(_) => "MouseButtonUp",
            NormalizedEvent::MouseWheel { .. } => "MouseWheel",
            NormalizedEvent::GamepadButtonDown(_) => "GamepadButtonDown",
            NormalizedEvent::GamepadButtonUp(_) => "GamepadButtonUp",
            NormalizedEvent::GamepadAxisMotion(_) => "GamepadAxisMotion",
            NormalizedEvent::GamepadAdded(_) => "GamepadAdded",
            NormalizedEvent::GamepadRemoved(_) => "GamepadRemoved",
            NormalizedEvent::JoystickButtonDown(_) => "JoystickButtonDown",
            NormalizedEvent::JoystickButtonUp(_) => "JoystickButtonUp",
            NormalizedEvent::JoystickHatMotion(_) => "JoystickHatMotion",
            NormalizedEvent::JoystickAxisMotion(_) => "JoystickAxisMotion",
            NormalizedEvent::JoystickAdded(_) => "JoystickAdded",
            NormalizedEvent::JoystickRemoved(_) => "JoystickRemoved",
            NormalizedEvent::WindowFocusChanged { .. } => "WindowFocusChanged",
            NormalizedEvent::Quit => "Quit",
        }
    }
}
