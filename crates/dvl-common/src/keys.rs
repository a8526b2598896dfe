// keys.rs — internal key code, scan code and modifier vocabulary
//
// Key codes follow the 2.x numbering: printable keys are their lowercase
// ASCII value, everything else is a scan code tagged with SCANCODE_MASK.
// Backends whose native numbering differs translate into these values.

use bitflags::bitflags;

pub type Keycode = i32;
pub type Scancode = u32;

pub const SCANCODE_MASK: Keycode = 1 << 30;

const fn scancode_to_keycode(sc: Keycode) -> Keycode {
    sc | SCANCODE_MASK
}

pub const K_UNKNOWN: Keycode = 0;
pub const K_BACKSPACE: Keycode = 8;
pub const K_TAB: Keycode = 9;
pub const K_RETURN: Keycode = 13;
pub const K_ESCAPE: Keycode = 27;
pub const K_SPACE: Keycode = 32;
pub const K_QUOTE: Keycode = b'\'' as Keycode;
pub const K_COMMA: Keycode = b',' as Keycode;
pub const K_MINUS: Keycode = b'-' as Keycode;
pub const K_PERIOD: Keycode = b'.' as Keycode;
pub const K_SLASH: Keycode = b'/' as Keycode;
pub const K_0: Keycode = b'0' as Keycode;
pub const K_9: Keycode = b'9' as Keycode;
pub const K_A: Keycode = b'a' as Keycode;
pub const K_C: Keycode = b'c' as Keycode;
pub const K_V: Keycode = b'v' as Keycode;
pub const K_X: Keycode = b'x' as Keycode;
pub const K_Z: Keycode = b'z' as Keycode;
pub const K_DELETE: Keycode = 127;

pub const K_CAPSLOCK: Keycode = scancode_to_keycode(57);
pub const K_F1: Keycode = scancode_to_keycode(58);
pub const K_F2: Keycode = scancode_to_keycode(59);
pub const K_F3: Keycode = scancode_to_keycode(60);
pub const K_F4: Keycode = scancode_to_keycode(61);
pub const K_F5: Keycode = scancode_to_keycode(62);
pub const K_F6: Keycode = scancode_to_keycode(63);
pub const K_F7: Keycode = scancode_to_keycode(64);
pub const K_F8: Keycode = scancode_to_keycode(65);
pub const K_F9: Keycode = scancode_to_keycode(66);
pub const K_F10: Keycode = scancode_to_keycode(67);
pub const K_F11: Keycode = scancode_to_keycode(68);
pub const K_F12: Keycode = scancode_to_keycode(69);
pub const K_PAUSE: Keycode = scancode_to_keycode(72);
pub const K_INSERT: Keycode = scancode_to_keycode(73);
pub const K_HOME: Keycode = scancode_to_keycode(74);
pub const K_PAGEUP: Keycode = scancode_to_keycode(75);
pub const K_END: Keycode = scancode_to_keycode(77);
pub const K_PAGEDOWN: Keycode = scancode_to_keycode(78);
pub const K_RIGHT: Keycode = scancode_to_keycode(79);
pub const K_LEFT: Keycode = scancode_to_keycode(80);
pub const K_DOWN: Keycode = scancode_to_keycode(81);
pub const K_UP: Keycode = scancode_to_keycode(82);
pub const K_KP_ENTER: Keycode = scancode_to_keycode(88);
pub const K_LCTRL: Keycode = scancode_to_keycode(224);
pub const K_LSHIFT: Keycode = scancode_to_keycode(225);
pub const K_LALT: Keycode = scancode_to_keycode(226);
pub const K_LGUI: Keycode = scancode_to_keycode(227);
pub const K_RCTRL: Keycode = scancode_to_keycode(228);
pub const K_RSHIFT: Keycode = scancode_to_keycode(229);
pub const K_RALT: Keycode = scancode_to_keycode(230);
pub const K_RGUI: Keycode = scancode_to_keycode(231);

/// Key codes that produce a text-input event when typed without ctrl/alt.
pub fn is_printable_key(key: Keycode) -> bool {
    key >= K_SPACE && key <= K_Z
}

bitflags! {
    /// Modifier key state, same bit layout in every backend generation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct KeyMod: u16 {
        const LSHIFT = 0x0001;
        const RSHIFT = 0x0002;
        const LCTRL = 0x0040;
        const RCTRL = 0x0080;
        const LALT = 0x0100;
        const RALT = 0x0200;
        const LGUI = 0x0400;
        const RGUI = 0x0800;
        const NUM = 0x1000;
        const CAPS = 0x2000;
        const MODE = 0x4000;
        const SCROLL = 0x8000;

        const SHIFT = Self::LSHIFT.bits() | Self::RSHIFT.bits();
        const CTRL = Self::LCTRL.bits() | Self::RCTRL.bits();
        const ALT = Self::LALT.bits() | Self::RALT.bits();
        const GUI = Self::LGUI.bits() | Self::RGUI.bits();
    }
}

impl KeyMod {
    pub fn ctrl(self) -> bool {
        self.intersects(KeyMod::CTRL)
    }

    pub fn alt(self) -> bool {
        self.intersects(KeyMod::ALT)
    }

    pub fn shift(self) -> bool {
        self.intersects(KeyMod::SHIFT)
    }
}

/// The three modifier flags the input core actually looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl From<KeyMod> for Modifiers {
    fn from(m: KeyMod) -> Self {
        Self {
            ctrl: m.ctrl(),
            alt: m.alt(),
            shift: m.shift(),
        }
    }
}

impl Modifiers {
    /// Word-wise editing is requested by either ctrl or alt.
    pub fn word(self) -> bool {
        self.ctrl || self.alt
    }
}

/// Human readable key name, used in log lines and bindings.
pub fn key_name(key: Keycode) -> String {
    match key {
        K_BACKSPACE => "Backspace".to_string(),
        K_TAB => "Tab".to_string(),
        K_RETURN => "Return".to_string(),
        K_ESCAPE => "Escape".to_string(),
        K_SPACE => "Space".to_string(),
        K_DELETE => "Delete".to_string(),
        K_INSERT => "Insert".to_string(),
        K_HOME => "Home".to_string(),
        K_END => "End".to_string(),
        K_PAGEUP => "PageUp".to_string(),
        K_PAGEDOWN => "PageDown".to_string(),
        K_LEFT => "Left".to_string(),
        K_RIGHT => "Right".to_string(),
        K_UP => "Up".to_string(),
        K_DOWN => "Down".to_string(),
        K_LCTRL => "Left Ctrl".to_string(),
        K_RCTRL => "Right Ctrl".to_string(),
        K_LSHIFT => "Left Shift".to_string(),
        K_RSHIFT => "Right Shift".to_string(),
        K_LALT => "Left Alt".to_string(),
        K_RALT => "Right Alt".to_string(),
        K_F1..=K_F12 => format!("F{}", key - K_F1 + 1),
        k if k > K_SPACE && k < K_DELETE => {
            ((k as u8) as char).to_ascii_uppercase().to_string()
        }
        _ => format!("Key 0x{:x}", key),
    }
}
