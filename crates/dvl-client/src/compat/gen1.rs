// gen1.rs — 1.2-era backend events
//
// Differences from later generations:
//   - navigation and function keys live in the 256..=312 keysym range
//   - key-down carries a `unicode` value; there is no separate text event
//   - the mouse wheel is reported as buttons 4 and 5
//   - coordinates are unsigned 16-bit
//   - focus arrives as an ActiveEvent with a gain flag and a state mask
//   - joysticks only, no gamepad API and no hot-plug events

use smallvec::smallvec;

use dvl_common::keys::*;

use super::{ApiGeneration, EventTranslator, TranslatedEvents};
use crate::event::{
    JoyAxisEvent, JoyButtonEvent, JoyHatEvent, KeyEvent, MouseButton,
    MouseButtonEvent as MouseButtonPayload, NormalizedEvent,
};

pub const APPMOUSEFOCUS: u8 = 0x01;
pub const APPINPUTFOCUS: u8 = 0x02;
pub const APPACTIVE: u8 = 0x04;

pub const BUTTON_LEFT: u8 = 1;
pub const BUTTON_MIDDLE: u8 = 2;
pub const BUTTON_RIGHT: u8 = 3;
pub const BUTTON_WHEELUP: u8 = 4;
pub const BUTTON_WHEELDOWN: u8 = 5;
pub const BUTTON_X1: u8 = 6;
pub const BUTTON_X2: u8 = 7;

// ============================================================
// Raw layout
// ============================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct Keysym {
    pub scancode: u8,
    pub sym: i32,
    pub mod_: u16,
    pub unicode: u16,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct KeyboardEvent {
    pub which: u8,
    pub state: u8,
    pub keysym: Keysym,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MouseMotionEvent {
    pub state: u8,
    pub x: u16,
    pub y: u16,
    pub xrel: i16,
    pub yrel: i16,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MouseButtonEvent {
    pub which: u8,
    pub button: u8,
    pub state: u8,
    pub x: u16,
    pub y: u16,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JoyAxisEvent1 {
    pub which: u8,
    pub axis: u8,
    pub value: i16,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JoyHatEvent1 {
    pub which: u8,
    pub hat: u8,
    pub value: u8,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JoyButtonEvent1 {
    pub which: u8,
    pub button: u8,
    pub state: u8,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ActiveEvent {
    pub gain: u8,
    pub state: u8,
}

#[derive(Debug, Clone, Copy)]
pub enum RawEvent {
    Active(ActiveEvent),
    KeyDown(KeyboardEvent),
    KeyUp(KeyboardEvent),
    MouseMotion(MouseMotionEvent),
    MouseButtonDown(MouseButtonEvent),
    MouseButtonUp(MouseButtonEvent),
    JoyAxisMotion(JoyAxisEvent1),
    JoyHatMotion(JoyHatEvent1),
    JoyButtonDown(JoyButtonEvent1),
    JoyButtonUp(JoyButtonEvent1),
    Quit,
    VideoResize { w: i32, h: i32 },
    VideoExpose,
    User(i32),
}

// ============================================================
// Key translation
// ============================================================

const fn sc(n: Keycode) -> Keycode {
    n | SCANCODE_MASK
}

/// Map a 1.2 keysym onto the internal key codes.
pub fn translate_keysym(sym: i32) -> Keycode {
    match sym {
        19 => K_PAUSE,
        0..=127 => sym,
        // keypad 0..9
        256 => sc(98),
        257..=265 => sc(89 + (sym - 257)),
        266 => sc(99),  // period
        267 => sc(84),  // divide
        268 => sc(85),  // multiply
        269 => sc(86),  // minus
        270 => sc(87),  // plus
        271 => K_KP_ENTER,
        272 => sc(103), // equals
        273 => K_UP,
        274 => K_DOWN,
        275 => K_RIGHT,
        276 => K_LEFT,
        277 => K_INSERT,
        278 => K_HOME,
        279 => K_END,
        280 => K_PAGEUP,
        281 => K_PAGEDOWN,
        282..=293 => K_F1 + (sym - 282),
        300 => sc(83), // numlock
        301 => K_CAPSLOCK,
        302 => sc(71), // scrollock
        303 => K_RSHIFT,
        304 => K_LSHIFT,
        305 => K_RCTRL,
        306 => K_LCTRL,
        307 => K_RALT,
        308 => K_LALT,
        309 | 312 => K_RGUI,
        310 | 311 => K_LGUI,
        _ => K_UNKNOWN,
    }
}

fn key_event(raw: &KeyboardEvent) -> KeyEvent {
    KeyEvent {
        key: translate_keysym(raw.keysym.sym),
        scancode: u32::from(raw.keysym.scancode),
        modifiers: KeyMod::from_bits_truncate(raw.keysym.mod_),
        repeat: false,
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

/// Unicode payload of a key-down, if it is printable text.
fn typed_text(unicode: u16) -> Option<String> {
    if unicode < 0x20 || unicode == 0x7f {
        return None;
    }
    char::from_u32(u32::from(unicode)).map(String::from)
}

// ============================================================
// Translator
// ============================================================

#[derive(Debug, Default, Clone, Copy)]
pub struct Gen1Translator;

impl EventTranslator for Gen1Translator {
    type Raw = RawEvent;

    const GENERATION: ApiGeneration = ApiGeneration::Gen1;

    fn translate(&self, raw: &RawEvent) -> TranslatedEvents {
        match raw {
            RawEvent::Active(a) => {
                if a.state & APPINPUTFOCUS == 0 {
                    return TranslatedEvents::new();
                }
                smallvec![NormalizedEvent::WindowFocusChanged { gained: a.gain != 0 }]
            }
            RawEvent::KeyDown(k) => {
                let mut out: TranslatedEvents = smallvec![NormalizedEvent::KeyDown(key_event(k))];
                // Ctrl chords are commands, never text.
                let ctrl = KeyMod::from_bits_truncate(k.keysym.mod_).intersects(KeyMod::CTRL);
                if let Some(text) = typed_text(k.keysym.unicode).filter(|_| !ctrl) {
                    out.push(NormalizedEvent::TextInput { text });
                }
                out
            }
            RawEvent::KeyUp(k) => smallvec![NormalizedEvent::KeyUp(key_event(k))],
            RawEvent::MouseMotion(m) => smallvec![NormalizedEvent::MouseMotion {
                x: i32::from(m.x),
                y: i32::from(m.y),
            }],
            RawEvent::MouseButtonDown(b) => match b.button {
                BUTTON_WHEELUP => smallvec![NormalizedEvent::MouseWheel { x: 0, y: 1 }],
                BUTTON_WHEELDOWN => smallvec![NormalizedEvent::MouseWheel { x: 0, y: -1 }],
                button => smallvec![NormalizedEvent::MouseButtonDown(MouseButtonPayload {
                    button: mouse_button(button),
                    x: i32::from(b.x),
                    y: i32::from(b.y),
                })],
            },
            RawEvent::MouseButtonUp(b) => match b.button {
                BUTTON_WHEELUP | BUTTON_WHEELDOWN => TranslatedEvents::new(),
                button => smallvec![NormalizedEvent::MouseButtonUp(MouseButtonPayload {
                    button: mouse_button(button),
                    x: i32::from(b.x),
                    y: i32::from(b.y),
                })],
            },
            RawEvent::JoyAxisMotion(j) => smallvec![NormalizedEvent::JoystickAxisMotion(JoyAxisEvent {
                which: u32::from(j.which),
                axis: j.axis,
                value: j.value,
            })],
            RawEvent::JoyHatMotion(j) => smallvec![NormalizedEvent::JoystickHatMotion(JoyHatEvent {
                which: u32::from(j.which),
                hat: j.hat,
                value: j.value,
            })],
            RawEvent::JoyButtonDown(j) => smallvec![NormalizedEvent::JoystickButtonDown(JoyButtonEvent {
                which: u32::from(j.which),
                button: j.button,
            })],
            RawEvent::JoyButtonUp(j) => smallvec![NormalizedEvent::JoystickButtonUp(JoyButtonEvent {
                which: u32::from(j.which),
                button: j.button,
            })],
            RawEvent::Quit => smallvec![NormalizedEvent::Quit],
            RawEvent::VideoResize { .. } | RawEvent::VideoExpose | RawEvent::User(_) => {
                TranslatedEvents::new()
            }
        }
    }

    /// 0 is success, negative is failure.
    fn status_ok(code: i32) -> bool {
        code == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(sym: i32, unicode: u16, mod_: u16) -> KeyboardEvent {
        KeyboardEvent {
            which: 0,
            state: 1,
            keysym: Keysym { scancode: 30, sym, mod_, unicode },
        }
    }

    #[test]
    fn test_navigation_keys() {
        assert_eq!(translate_keysym(276), K_LEFT);
        assert_eq!(translate_keysym(275), K_RIGHT);
        assert_eq!(translate_keysym(278), K_HOME);
        assert_eq!(translate_keysym(279), K_END);
        assert_eq!(translate_keysym(282), K_F1);
        assert_eq!(translate_keysym(293), K_F12);
        assert_eq!(translate_keysym(306), K_LCTRL);
        assert_eq!(translate_keysym(b'a' as i32), K_A);
        assert_eq!(translate_keysym(8), K_BACKSPACE);
        assert_eq!(translate_keysym(999), K_UNKNOWN);
    }

    #[test]
    fn test_keydown_with_unicode_synthesizes_text() {
        let out = Gen1Translator.translate(&RawEvent::KeyDown(key(b'a' as i32, u16::from(b'A'), 0x0001)));
        assert_eq!(out.len(), 2);
        match &out[0] {
            NormalizedEvent::KeyDown(k) => {
                assert_eq!(k.key, K_A);
                assert_eq!(k.scancode, 30);
                assert!(k.modifiers.shift());
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(out[1], NormalizedEvent::text_input("A"));
    }

    #[test]
    fn test_control_keys_have_no_text() {
        let out = Gen1Translator.translate(&RawEvent::KeyDown(key(8, 8, 0)));
        assert_eq!(out.len(), 1);
        let out = Gen1Translator.translate(&RawEvent::KeyDown(key(276, 0, 0)));
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_ctrl_digit_has_no_text() {
        let out = Gen1Translator.translate(&RawEvent::KeyDown(key(b'1' as i32, u16::from(b'1'), 0x0040)));
        assert_eq!(out.len(), 1);
        assert!(matches!(&out[0], NormalizedEvent::KeyDown(k) if k.key == Keycode::from(b'1') && k.modifiers.ctrl()));

        let out = Gen1Translator.translate(&RawEvent::KeyDown(key(b'v' as i32, u16::from(b'v'), 0x0080)));
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_ctrl_digit_leaves_text_field_empty() {
        use crate::scripted::ScriptedPlatform;
        use crate::text_input::{handle_text_input_event, TextInputState};

        let mut platform = ScriptedPlatform::new();
        platform.set_mod_state(KeyMod::LCTRL);
        let mut state = TextInputState::new();
        for event in Gen1Translator.translate(&RawEvent::KeyDown(key(b'1' as i32, u16::from(b'1'), 0x0040))) {
            handle_text_input_event(&event, &mut state, &mut platform);
        }
        assert_eq!(state.value(), "");
    }

    #[test]
    fn test_wheel_buttons() {
        let down = |button| RawEvent::MouseButtonDown(MouseButtonEvent { which: 0, button, state: 1, x: 5, y: 6 });
        let up = |button| RawEvent::MouseButtonUp(MouseButtonEvent { which: 0, button, state: 0, x: 5, y: 6 });
        assert_eq!(Gen1Translator.translate(&down(BUTTON_WHEELUP))[0], NormalizedEvent::MouseWheel { x: 0, y: 1 });
        assert_eq!(Gen1Translator.translate(&down(BUTTON_WHEELDOWN))[0], NormalizedEvent::MouseWheel { x: 0, y: -1 });
        assert!(Gen1Translator.translate(&up(BUTTON_WHEELUP)).is_empty());
        assert_eq!(
            Gen1Translator.translate(&up(BUTTON_LEFT))[0],
            NormalizedEvent::MouseButtonUp(crate::event::MouseButtonEvent { button: MouseButton::Left, x: 5, y: 6 })
        );
    }

    #[test]
    fn test_active_event_focus() {
        let lost = RawEvent::Active(ActiveEvent { gain: 0, state: APPINPUTFOCUS | APPMOUSEFOCUS });
        assert_eq!(Gen1Translator.translate(&lost)[0], NormalizedEvent::WindowFocusChanged { gained: false });
        let mouse_only = RawEvent::Active(ActiveEvent { gain: 1, state: APPMOUSEFOCUS });
        assert!(Gen1Translator.translate(&mouse_only).is_empty());
    }

    #[test]
    fn test_status_convention() {
        assert!(Gen1Translator::status_ok(0));
        assert!(!Gen1Translator::status_ok(-1));
    }
}
