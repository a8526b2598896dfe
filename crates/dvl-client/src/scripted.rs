// scripted.rs — a Platform driven entirely by queued events
//
// Used by the tests of every module in this crate and by the demo binary's
// replay mode. Events come from an EventQueue; modifiers, keys, clipboard
// and devices are plain fields the caller sets up.

use std::collections::HashSet;
use std::time::Duration;

use dvl_common::keys::{KeyMod, Keycode};

use crate::event::{GamepadButton, InstanceId, NormalizedEvent};
use crate::event_queue::{EventQueue, EventQueueSender, DEFAULT_QUEUE_CAPACITY};
use crate::platform::{
    GamepadInfo, GamepadType, JoystickInfo, NativeHandle, Platform, PlatformError,
};

struct FakeGamepad {
    device_index: u32,
    instance_id: InstanceId,
    kind: GamepadType,
    mapping: Option<String>,
    fail_open: bool,
    open: bool,
    pressed: HashSet<GamepadButton>,
}

struct FakeJoystick {
    device_index: u32,
    instance_id: InstanceId,
    fail_open: bool,
    open: bool,
    pressed: HashSet<u8>,
}

pub struct ScriptedPlatform {
    queue: EventQueue,
    feeder: EventQueueSender,
    mods: KeyMod,
    keys_down: HashSet<Keycode>,
    clipboard: Option<String>,
    clipboard_fails: bool,
    error: Option<String>,
    gamepads: Vec<FakeGamepad>,
    joysticks: Vec<FakeJoystick>,
    mouse: (i32, i32),
    cursor_visible: bool,
    replaces_buffer: bool,
    /// Number of blocking waits performed, so loops can be checked for pacing.
    pub waits: usize,
}

impl ScriptedPlatform {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let queue = EventQueue::new(capacity);
        let feeder = queue.sender();
        Self {
            queue,
            feeder,
            mods: KeyMod::empty(),
            keys_down: HashSet::new(),
            clipboard: None,
            clipboard_fails: false,
            error: None,
            gamepads: Vec::new(),
            joysticks: Vec::new(),
            mouse: (0, 0),
            cursor_visible: true,
            replaces_buffer: false,
            waits: 0,
        }
    }

    /// Sender for a producer on another thread.
    pub fn sender(&self) -> EventQueueSender {
        self.queue.sender()
    }

    pub fn push(&self, event: NormalizedEvent) -> bool {
        self.feeder.try_send(event)
    }

    pub fn push_all<I: IntoIterator<Item = NormalizedEvent>>(&self, events: I) {
        for event in events {
            self.push(event);
        }
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    // ---- keyboard / modifiers ----

    pub fn set_mod_state(&mut self, mods: KeyMod) {
        self.mods = mods;
    }

    pub fn press_key(&mut self, key: Keycode) {
        self.keys_down.insert(key);
    }

    pub fn release_key(&mut self, key: Keycode) {
        self.keys_down.remove(&key);
    }

    // ---- clipboard ----

    pub fn set_clipboard_failure(&mut self, fail: bool) {
        self.clipboard_fails = fail;
    }

    pub fn clipboard_contents(&self) -> Option<&str> {
        self.clipboard.as_deref()
    }

    pub fn set_clipboard_contents(&mut self, text: &str) {
        self.clipboard = Some(text.to_string());
    }

    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    // ---- devices ----

    pub fn add_fake_gamepad(&mut self, device_index: u32, instance_id: InstanceId, kind: GamepadType) {
        self.gamepads.push(FakeGamepad {
            device_index,
            instance_id,
            kind,
            mapping: Some(format!("{:032x},Scripted Pad {},a:b0,b:b1,x:b2,y:b3", instance_id, instance_id)),
            fail_open: false,
            open: false,
            pressed: HashSet::new(),
        });
    }

    pub fn fail_gamepad_open(&mut self, device_index: u32) {
        if let Some(pad) = self.gamepads.iter_mut().find(|p| p.device_index == device_index) {
            pad.fail_open = true;
        }
    }

    pub fn is_gamepad_open(&self, instance_id: InstanceId) -> bool {
        self.gamepads.iter().any(|p| p.instance_id == instance_id && p.open)
    }

    pub fn press_gamepad_button(&mut self, instance_id: InstanceId, button: GamepadButton) {
        if let Some(pad) = self.gamepads.iter_mut().find(|p| p.instance_id == instance_id) {
            pad.pressed.insert(button);
        }
    }

    pub fn release_gamepad_button(&mut self, instance_id: InstanceId, button: GamepadButton) {
        if let Some(pad) = self.gamepads.iter_mut().find(|p| p.instance_id == instance_id) {
            pad.pressed.remove(&button);
        }
    }

    pub fn add_fake_joystick(&mut self, device_index: u32, instance_id: InstanceId) {
        self.joysticks.push(FakeJoystick {
            device_index,
            instance_id,
            fail_open: false,
            open: false,
            pressed: HashSet::new(),
        });
    }

    pub fn fail_joystick_open(&mut self, device_index: u32) {
        if let Some(joy) = self.joysticks.iter_mut().find(|j| j.device_index == device_index) {
            joy.fail_open = true;
        }
    }

    pub fn press_joystick_button(&mut self, instance_id: InstanceId, button: u8) {
        if let Some(joy) = self.joysticks.iter_mut().find(|j| j.instance_id == instance_id) {
            joy.pressed.insert(button);
        }
    }

    // ---- pointer / text ----

    pub fn set_mouse_position(&mut self, x: i32, y: i32) {
        self.mouse = (x, y);
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    pub fn set_text_input_replaces_buffer(&mut self, replaces: bool) {
        self.replaces_buffer = replaces;
    }
}

impl Default for ScriptedPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for ScriptedPlatform {
    fn poll_event(&mut self) -> Option<NormalizedEvent> {
        self.queue.try_recv()
    }

    fn wait_event_timeout(&mut self, timeout: Duration) -> Option<NormalizedEvent> {
        self.waits += 1;
        self.queue.recv_timeout(timeout)
    }

    fn mod_state(&self) -> KeyMod {
        self.mods
    }

    fn is_key_down(&self, key: Keycode) -> bool {
        self.keys_down.contains(&key)
    }

    fn set_clipboard_text(&mut self, text: &str) -> Result<(), PlatformError> {
        if self.clipboard_fails {
            let err = PlatformError::ClipboardUnavailable("scripted failure".to_string());
            self.error = Some(err.to_string());
            return Err(err);
        }
        self.clipboard = Some(text.to_string());
        Ok(())
    }

    fn has_clipboard_text(&mut self) -> bool {
        !self.clipboard_fails && self.clipboard.as_deref().is_some_and(|s| !s.is_empty())
    }

    fn get_clipboard_text(&mut self) -> Result<String, PlatformError> {
        if self.clipboard_fails {
            let err = PlatformError::ClipboardUnavailable("scripted failure".to_string());
            self.error = Some(err.to_string());
            return Err(err);
        }
        Ok(self.clipboard.clone().unwrap_or_default())
    }

    fn clear_error(&mut self) {
        self.error = None;
    }

    fn open_gamepad(&mut self, device_index: u32) -> Result<GamepadInfo, PlatformError> {
        let Some(pad) = self.gamepads.iter_mut().find(|p| p.device_index == device_index) else {
            let err = PlatformError::DeviceOpen { index: device_index, reason: "no such device".to_string() };
            self.error = Some(err.to_string());
            return Err(err);
        };
        if pad.fail_open {
            let err = PlatformError::DeviceOpen { index: device_index, reason: "scripted failure".to_string() };
            self.error = Some(err.to_string());
            return Err(err);
        }
        pad.open = true;
        Ok(GamepadInfo {
            handle: NativeHandle::from(pad.instance_id),
            instance_id: pad.instance_id,
            mapping: pad.mapping.clone(),
        })
    }

    fn close_gamepad(&mut self, handle: NativeHandle) {
        if let Some(pad) = self.gamepads.iter_mut().find(|p| NativeHandle::from(p.instance_id) == handle) {
            pad.open = false;
        }
    }

    fn gamepad_button_down(&self, handle: NativeHandle, button: GamepadButton) -> bool {
        self.gamepads
            .iter()
            .any(|p| p.open && NativeHandle::from(p.instance_id) == handle && p.pressed.contains(&button))
    }

    fn gamepad_type(&self, which: u32) -> GamepadType {
        self.gamepads
            .iter()
            .find(|p| p.device_index == which || p.instance_id == which)
            .map_or(GamepadType::Unknown, |p| p.kind)
    }

    fn open_joystick(&mut self, device_index: u32) -> Result<JoystickInfo, PlatformError> {
        let Some(joy) = self.joysticks.iter_mut().find(|j| j.device_index == device_index) else {
            let err = PlatformError::DeviceOpen { index: device_index, reason: "no such device".to_string() };
            self.error = Some(err.to_string());
            return Err(err);
        };
        if joy.fail_open {
            let err = PlatformError::DeviceOpen { index: device_index, reason: "scripted failure".to_string() };
            self.error = Some(err.to_string());
            return Err(err);
        }
        joy.open = true;
        Ok(JoystickInfo {
            handle: NativeHandle::from(joy.instance_id),
            instance_id: joy.instance_id,
            name: format!("Scripted Joystick {}", joy.instance_id),
        })
    }

    fn close_joystick(&mut self, handle: NativeHandle) {
        if let Some(joy) = self.joysticks.iter_mut().find(|j| NativeHandle::from(j.instance_id) == handle) {
            joy.open = false;
        }
    }

    fn joystick_button_down(&self, handle: NativeHandle, button: u8) -> bool {
        self.joysticks
            .iter()
            .any(|j| j.open && NativeHandle::from(j.instance_id) == handle && j.pressed.contains(&button))
    }

    fn mouse_position(&self) -> (i32, i32) {
        self.mouse
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        self.cursor_visible = visible;
    }

    fn text_input_replaces_buffer(&self) -> bool {
        self.replaces_buffer
    }
}
