// sys_win.rs — winit key/mouse translation, system clipboard, process exit

use std::process;
use std::sync::OnceLock;
use std::time::Instant;

use copypasta_ext::{copypasta::ClipboardProvider, x11_fork::ClipboardContext};
use winit::event::{MouseButton as WinitMouseButton, MouseScrollDelta};
use winit::keyboard::{KeyCode, ModifiersState};

use dvl_client::event::MouseButton;
use dvl_client::platform::PlatformError;
use dvl_common::common::com_printf;
use dvl_common::cvar::cvar_shutdown;
use dvl_common::keys::{self, KeyMod, Keycode, Scancode};

static START: OnceLock<Instant> = OnceLock::new();

/// Milliseconds since the first call.
pub fn sys_milliseconds() -> u64 {
    let start = START.get_or_init(Instant::now);
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Answer to a Quit event: release global state and leave.
pub fn sys_quit(code: i32) -> ! {
    com_printf("Shutting down\n");
    cvar_shutdown();
    process::exit(code);
}

// ============================================================
// Clipboard
// ============================================================

/// System clipboard. A fresh context is opened per call, so a clipboard
/// owner disappearing between calls is not an error.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn set_text(&mut self, text: &str) -> Result<(), PlatformError> {
        let mut ctx = ClipboardContext::new().map_err(|e| PlatformError::ClipboardUnavailable(e.to_string()))?;
        ctx.set_contents(text.to_string())
            .map_err(|e| PlatformError::ClipboardUnavailable(e.to_string()))
    }

    pub fn get_text(&mut self) -> Result<String, PlatformError> {
        let mut ctx = ClipboardContext::new().map_err(|e| PlatformError::ClipboardUnavailable(e.to_string()))?;
        ctx.get_contents()
            .map_err(|e| PlatformError::ClipboardUnavailable(e.to_string()))
    }
}

// ============================================================
// Key translation
// ============================================================

/// winit modifier state to KeyMod. winit does not tell sides apart here,
/// so the left-hand bit is reported.
pub fn winit_mods_to_keymod(state: ModifiersState) -> KeyMod {
    let mut mods = KeyMod::empty();
    if state.shift_key() {
        mods |= KeyMod::LSHIFT;
    }
    if state.control_key() {
        mods |= KeyMod::LCTRL;
    }
    if state.alt_key() {
        mods |= KeyMod::LALT;
    }
    if state.super_key() {
        mods |= KeyMod::LGUI;
    }
    mods
}

pub fn winit_keycode_to_dvl(kc: KeyCode) -> Option<Keycode> {
    let ascii = |c: u8| Some(Keycode::from(c));
    match kc {
        KeyCode::Tab => Some(keys::K_TAB),
        KeyCode::Enter => Some(keys::K_RETURN),
        KeyCode::Escape => Some(keys::K_ESCAPE),
        KeyCode::Space => Some(keys::K_SPACE),
        KeyCode::Backspace => Some(keys::K_BACKSPACE),
        KeyCode::Delete => Some(keys::K_DELETE),
        KeyCode::ArrowUp => Some(keys::K_UP),
        KeyCode::ArrowDown => Some(keys::K_DOWN),
        KeyCode::ArrowLeft => Some(keys::K_LEFT),
        KeyCode::ArrowRight => Some(keys::K_RIGHT),
        KeyCode::Home => Some(keys::K_HOME),
        KeyCode::End => Some(keys::K_END),
        KeyCode::PageUp => Some(keys::K_PAGEUP),
        KeyCode::PageDown => Some(keys::K_PAGEDOWN),
        KeyCode::Insert => Some(keys::K_INSERT),
        KeyCode::Pause => Some(keys::K_PAUSE),
        KeyCode::CapsLock => Some(keys::K_CAPSLOCK),
        KeyCode::NumpadEnter => Some(keys::K_KP_ENTER),

        KeyCode::ControlLeft => Some(keys::K_LCTRL),
        KeyCode::ControlRight => Some(keys::K_RCTRL),
        KeyCode::ShiftLeft => Some(keys::K_LSHIFT),
        KeyCode::ShiftRight => Some(keys::K_RSHIFT),
        KeyCode::AltLeft => Some(keys::K_LALT),
        KeyCode::AltRight => Some(keys::K_RALT),
        KeyCode::SuperLeft => Some(keys::K_LGUI),
        KeyCode::SuperRight => Some(keys::K_RGUI),

        KeyCode::F1 => Some(keys::K_F1),
        KeyCode::F2 => Some(keys::K_F2),
        KeyCode::F3 => Some(keys::K_F3),
        KeyCode::F4 => Some(keys::K_F4),
        KeyCode::F5 => Some(keys::K_F5),
        KeyCode::F6 => Some(keys::K_F6),
        KeyCode::F7 => Some(keys::K_F7),
        KeyCode::F8 => Some(keys::K_F8),
        KeyCode::F9 => Some(keys::K_F9),
        KeyCode::F10 => Some(keys::K_F10),
        KeyCode::F11 => Some(keys::K_F11),
        KeyCode::F12 => Some(keys::K_F12),

        KeyCode::KeyA => ascii(b'a'),
        KeyCode::KeyB => ascii(b'b'),
        KeyCode::KeyC => ascii(b'c'),
        KeyCode::KeyD => ascii(b'd'),
        KeyCode::KeyE => ascii(b'e'),
        KeyCode::KeyF => ascii(b'f'),
        KeyCode::KeyG => ascii(b'g'),
        KeyCode::KeyH => ascii(b'h'),
        KeyCode::KeyI => ascii(b'i'),
        KeyCode::KeyJ => ascii(b'j'),
        KeyCode::KeyK => ascii(b'k'),
        KeyCode::KeyL => ascii(b'l'),
        KeyCode::KeyM => ascii(b'm'),
        KeyCode::KeyN => ascii(b'n'),
        KeyCode::KeyO => ascii(b'o'),
        KeyCode::KeyP => ascii(b'p'),
        KeyCode::KeyQ => ascii(b'q'),
        KeyCode::KeyR => ascii(b'r'),
        KeyCode::KeyS => ascii(b's'),
        KeyCode::KeyT => ascii(b't'),
        KeyCode::KeyU => ascii(b'u'),
        KeyCode::KeyV => ascii(b'v'),
        KeyCode::KeyW => ascii(b'w'),
        KeyCode::KeyX => ascii(b'x'),
        KeyCode::KeyY => ascii(b'y'),
        KeyCode::KeyZ => ascii(b'z'),

        KeyCode::Digit0 => ascii(b'0'),
        KeyCode::Digit1 => ascii(b'1'),
        KeyCode::Digit2 => ascii(b'2'),
        KeyCode::Digit3 => ascii(b'3'),
        KeyCode::Digit4 => ascii(b'4'),
        KeyCode::Digit5 => ascii(b'5'),
        KeyCode::Digit6 => ascii(b'6'),
        KeyCode::Digit7 => ascii(b'7'),
        KeyCode::Digit8 => ascii(b'8'),
        KeyCode::Digit9 => ascii(b'9'),

        KeyCode::Minus => ascii(b'-'),
        KeyCode::Equal => ascii(b'='),
        KeyCode::BracketLeft => ascii(b'['),
        KeyCode::BracketRight => ascii(b']'),
        KeyCode::Backslash => ascii(b'\\'),
        KeyCode::Semicolon => ascii(b';'),
        KeyCode::Quote => ascii(b'\''),
        KeyCode::Backquote => ascii(b'`'),
        KeyCode::Comma => ascii(b','),
        KeyCode::Period => ascii(b'.'),
        KeyCode::Slash => ascii(b'/'),

        _ => None,
    }
}

/// Physical key position as a USB-HID usage id, the numbering the
/// scancode-tagged keycodes are built on. Unlisted keys are 0.
pub fn winit_keycode_to_scancode(kc: KeyCode) -> Scancode {
    match kc {
        KeyCode::KeyA => 4,
        KeyCode::KeyB => 5,
        KeyCode::KeyC => 6,
        KeyCode::KeyD => 7,
        KeyCode::KeyE => 8,
        KeyCode::KeyF => 9,
        KeyCode::KeyG => 10,
        KeyCode::KeyH => 11,
        KeyCode::KeyI => 12,
        KeyCode::KeyJ => 13,
        KeyCode::KeyK => 14,
        KeyCode::KeyL => 15,
        KeyCode::KeyM => 16,
        KeyCode::KeyN => 17,
        KeyCode::KeyO => 18,
        KeyCode::KeyP => 19,
        KeyCode::KeyQ => 20,
        KeyCode::KeyR => 21,
        KeyCode::KeyS => 22,
        KeyCode::KeyT => 23,
        KeyCode::KeyU => 24,
        KeyCode::KeyV => 25,
        KeyCode::KeyW => 26,
        KeyCode::KeyX => 27,
        KeyCode::KeyY => 28,
        KeyCode::KeyZ => 29,

        KeyCode::Digit1 => 30,
        KeyCode::Digit2 => 31,
        KeyCode::Digit3 => 32,
        KeyCode::Digit4 => 33,
        KeyCode::Digit5 => 34,
        KeyCode::Digit6 => 35,
        KeyCode::Digit7 => 36,
        KeyCode::Digit8 => 37,
        KeyCode::Digit9 => 38,
        KeyCode::Digit0 => 39,

        KeyCode::Enter => 40,
        KeyCode::Escape => 41,
        KeyCode::Backspace => 42,
        KeyCode::Tab => 43,
        KeyCode::Space => 44,
        KeyCode::Minus => 45,
        KeyCode::Equal => 46,
        KeyCode::BracketLeft => 47,
        KeyCode::BracketRight => 48,
        KeyCode::Backslash => 49,
        KeyCode::Semicolon => 51,
        KeyCode::Quote => 52,
        KeyCode::Backquote => 53,
        KeyCode::Comma => 54,
        KeyCode::Period => 55,
        KeyCode::Slash => 56,
        KeyCode::CapsLock => 57,

        KeyCode::F1 => 58,
        KeyCode::F2 => 59,
        KeyCode::F3 => 60,
        KeyCode::F4 => 61,
        KeyCode::F5 => 62,
        KeyCode::F6 => 63,
        KeyCode::F7 => 64,
        KeyCode::F8 => 65,
        KeyCode::F9 => 66,
        KeyCode::F10 => 67,
        KeyCode::F11 => 68,
        KeyCode::F12 => 69,

        KeyCode::Pause => 72,
        KeyCode::Insert => 73,
        KeyCode::Home => 74,
        KeyCode::PageUp => 75,
        KeyCode::Delete => 76,
        KeyCode::End => 77,
        KeyCode::PageDown => 78,
        KeyCode::ArrowRight => 79,
        KeyCode::ArrowLeft => 80,
        KeyCode::ArrowDown => 81,
        KeyCode::ArrowUp => 82,
        KeyCode::NumpadEnter => 88,

        KeyCode::ControlLeft => 224,
        KeyCode::ShiftLeft => 225,
        KeyCode::AltLeft => 226,
        KeyCode::SuperLeft => 227,
        KeyCode::ControlRight => 228,
        KeyCode::ShiftRight => 229,
        KeyCode::AltRight => 230,
        KeyCode::SuperRight => 231,

        _ => 0,
    }
}

/// Text a key press should type. Ctrl chords and control characters never
/// type; while an IME is active its commits are the only text source.
pub fn key_press_text(text: Option<&str>, mods: KeyMod, ime_active: bool) -> Option<&str> {
    if ime_active || mods.ctrl() {
        return None;
    }
    text.filter(|t| !t.is_empty() && !t.chars().any(char::is_control))
}

pub fn winit_mouse_button_to_dvl(button: WinitMouseButton) -> MouseButton {
    match button {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Back => MouseButton::X1,
        WinitMouseButton::Forward => MouseButton::X2,
        WinitMouseButton::Other(n) => MouseButton::Other(u8::try_from(n).unwrap_or(u8::MAX)),
    }
}

/// Wheel movement in whole steps. Pixel deltas are approximated.
pub fn wheel_steps(delta: MouseScrollDelta) -> (i32, i32) {
    match delta {
        MouseScrollDelta::LineDelta(x, y) => (x as i32, y as i32),
        MouseScrollDelta::PixelDelta(pos) => ((pos.x / 10.0) as i32, (pos.y / 10.0) as i32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keycode_translation() {
        assert_eq!(winit_keycode_to_dvl(KeyCode::KeyA), Some(keys::K_A));
        assert_eq!(winit_keycode_to_dvl(KeyCode::Escape), Some(keys::K_ESCAPE));
        assert_eq!(winit_keycode_to_dvl(KeyCode::ArrowLeft), Some(keys::K_LEFT));
        assert_eq!(winit_keycode_to_dvl(KeyCode::ControlRight), Some(keys::K_RCTRL));
        assert_eq!(winit_keycode_to_dvl(KeyCode::MediaPlayPause), None);
    }

    #[test]
    fn test_scancode_matches_tagged_keycodes() {
        let tagged = |kc| (winit_keycode_to_scancode(kc) as Keycode) | keys::SCANCODE_MASK;
        assert_eq!(tagged(KeyCode::ArrowLeft), keys::K_LEFT);
        assert_eq!(tagged(KeyCode::ArrowUp), keys::K_UP);
        assert_eq!(tagged(KeyCode::Home), keys::K_HOME);
        assert_eq!(tagged(KeyCode::F1), keys::K_F1);
        assert_eq!(tagged(KeyCode::F12), keys::K_F12);
        assert_eq!(tagged(KeyCode::ControlLeft), keys::K_LCTRL);
        assert_eq!(tagged(KeyCode::SuperRight), keys::K_RGUI);
        assert_eq!(tagged(KeyCode::NumpadEnter), keys::K_KP_ENTER);
    }

    #[test]
    fn test_scancode_character_keys() {
        assert_eq!(winit_keycode_to_scancode(KeyCode::KeyA), 4);
        assert_eq!(winit_keycode_to_scancode(KeyCode::KeyZ), 29);
        assert_eq!(winit_keycode_to_scancode(KeyCode::Digit1), 30);
        assert_eq!(winit_keycode_to_scancode(KeyCode::Digit0), 39);
        assert_eq!(winit_keycode_to_scancode(KeyCode::Enter), 40);
        assert_eq!(winit_keycode_to_scancode(KeyCode::MediaPlayPause), 0);
    }

    // ---- key press text ----

    #[test]
    fn test_key_press_text_plain() {
        assert_eq!(key_press_text(Some("a"), KeyMod::empty(), false), Some("a"));
        assert_eq!(key_press_text(Some("A"), KeyMod::LSHIFT, false), Some("A"));
        assert_eq!(key_press_text(None, KeyMod::empty(), false), None);
    }

    #[test]
    fn test_key_press_text_ctrl_and_control_chars() {
        assert_eq!(key_press_text(Some("1"), KeyMod::LCTRL, false), None);
        assert_eq!(key_press_text(Some("\u{8}"), KeyMod::empty(), false), None);
        assert_eq!(key_press_text(Some("\r"), KeyMod::empty(), false), None);
    }

    #[test]
    fn test_key_press_text_defers_to_ime() {
        assert_eq!(key_press_text(Some("a"), KeyMod::empty(), true), None);
    }

    #[test]
    fn test_modifier_translation() {
        let mods = winit_mods_to_keymod(ModifiersState::CONTROL | ModifiersState::SHIFT);
        assert!(mods.ctrl());
        assert!(mods.shift());
        assert!(!mods.alt());
    }

    #[test]
    fn test_mouse_and_wheel() {
        assert_eq!(winit_mouse_button_to_dvl(WinitMouseButton::Back), MouseButton::X1);
        assert_eq!(winit_mouse_button_to_dvl(WinitMouseButton::Other(300)), MouseButton::Other(255));
        assert_eq!(wheel_steps(MouseScrollDelta::LineDelta(0.0, -2.0)), (0, -2));
    }

    #[test]
    fn test_milliseconds_monotonic() {
        let a = sys_milliseconds();
        let b = sys_milliseconds();
        assert!(b >= a);
    }
}
