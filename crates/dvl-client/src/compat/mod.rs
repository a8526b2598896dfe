// compat — one stable accessor set over every backend generation
//
// Raw backend events are translated once, at the platform boundary, by a
// generation specific EventTranslator. Everything else in the crate reads
// events through the accessors below and never sees a raw layout.

pub mod gen1;
pub mod gen2;
pub mod gen3;

use smallvec::SmallVec;

use dvl_common::common::com_log_error;
use dvl_common::keys::{Keycode, Modifiers, Scancode, K_UNKNOWN};

use crate::event::{DeviceEvent, GamepadAxisEvent, GamepadButtonEvent, NormalizedEvent};
use crate::platform::Platform;

/// Events produced from one raw event. Most raw events map to one; a 1.x
/// key press with a unicode value maps to a key-down and a text event.
pub type TranslatedEvents = SmallVec<[NormalizedEvent; 2]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiGeneration {
    Gen1,
    Gen2,
    Gen3,
}

impl ApiGeneration {
    pub fn name(self) -> &'static str {
        match self {
            ApiGeneration::Gen1 => "1.2",
            ApiGeneration::Gen2 => "2.x",
            ApiGeneration::Gen3 => "3.x",
        }
    }

    /// Whether this generation has a gamepad (mapped controller) API at all.
    pub fn has_gamepad_api(self) -> bool {
        !matches!(self, ApiGeneration::Gen1)
    }
}

/// Translation from one backend generation's raw events.
pub trait EventTranslator {
    type Raw;

    const GENERATION: ApiGeneration;

    fn translate(&self, raw: &Self::Raw) -> TranslatedEvents;

    /// Interpret a native return value under this generation's convention.
    fn status_ok(code: i32) -> bool;
}

// ============================================================
// Event field accessors
// ============================================================

/// Key code of a key event, K_UNKNOWN for anything else.
pub fn event_key(event: &NormalizedEvent) -> Keycode {
    match event {
        NormalizedEvent::KeyDown(k) | NormalizedEvent::KeyUp(k) => k.key,
        _ => K_UNKNOWN,
    }
}

pub fn event_scancode(event: &NormalizedEvent) -> Scancode {
    match event {
        NormalizedEvent::KeyDown(k) | NormalizedEvent::KeyUp(k) => k.scancode,
        _ => 0,
    }
}

/// Modifier state sampled now, not when the event was posted. A key event
/// drained after the user released ctrl reads as a plain key.
pub fn event_modifiers<P: Platform + ?Sized>(platform: &P) -> Modifiers {
    Modifiers::from(platform.mod_state())
}

pub fn event_motion_coords(event: &NormalizedEvent) -> Option<(i32, i32)> {
    match event {
        NormalizedEvent::MouseMotion { x, y } => Some((*x, *y)),
        _ => None,
    }
}

pub fn event_button_coords(event: &NormalizedEvent) -> Option<(i32, i32)> {
    match event {
        NormalizedEvent::MouseButtonDown(b) | NormalizedEvent::MouseButtonUp(b) => Some((b.x, b.y)),
        _ => None,
    }
}

pub fn wheel_delta(event: &NormalizedEvent) -> Option<(i32, i32)> {
    match event {
        NormalizedEvent::MouseWheel { x, y } => Some((*x, *y)),
        _ => None,
    }
}

pub fn event_gamepad_axis(event: &NormalizedEvent) -> Option<GamepadAxisEvent> {
    match event {
        NormalizedEvent::GamepadAxisMotion(a) => Some(*a),
        _ => None,
    }
}

pub fn event_gamepad_button(event: &NormalizedEvent) -> Option<GamepadButtonEvent> {
    match event {
        NormalizedEvent::GamepadButtonDown(b) | NormalizedEvent::GamepadButtonUp(b) => Some(*b),
        _ => None,
    }
}

pub fn event_gamepad_device(event: &NormalizedEvent) -> Option<DeviceEvent> {
    match event {
        NormalizedEvent::GamepadAdded(d) | NormalizedEvent::GamepadRemoved(d) => Some(*d),
        _ => None,
    }
}

// ============================================================
// Clipboard bridge
// ============================================================

/// Returns true on success. Failures are logged and the platform error cleared.
pub fn set_clipboard_text<P: Platform + ?Sized>(platform: &mut P, text: &str) -> bool {
    match platform.set_clipboard_text(text) {
        Ok(()) => true,
        Err(e) => {
            com_log_error(&format!("Failed to set clipboard text: {}\n", e));
            platform.clear_error();
            false
        }
    }
}

pub fn has_clipboard_text<P: Platform + ?Sized>(platform: &mut P) -> bool {
    platform.has_clipboard_text()
}

/// Clipboard contents, or None when the read failed (logged).
pub fn get_clipboard_text<P: Platform + ?Sized>(platform: &mut P) -> Option<String> {
    match platform.get_clipboard_text() {
        Ok(text) => Some(text),
        Err(e) => {
            com_log_error(&format!("Failed to get clipboard text: {}\n", e));
            platform.clear_error();
            None
        }
    }
}

// ============================================================
// Tests
// ============================================================
