// in_win.rs -- winit backend for the input core
//
// The winit event loop is pumped on demand from poll_event / wait_event_timeout.
// Window events are translated into NormalizedEvent and queued; keyboard,
// modifier and mouse state are tracked as the events pass through.
// winit has no gamepad support, so device calls report Unsupported.

use std::collections::HashSet;
use std::time::Duration;

use winit::application::ApplicationHandler;
use winit::event::{ElementState, Ime, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use dvl_client::event::{GamepadButton, KeyEvent, MouseButtonEvent, NormalizedEvent};
use dvl_client::event_queue::{EventQueue, EventQueueSender};
use dvl_client::platform::{GamepadInfo, GamepadType, JoystickInfo, NativeHandle, Platform, PlatformError};
use dvl_common::common::{com_dprintf, com_log_error};
use dvl_common::keys::{KeyMod, Keycode, Scancode};

use crate::sys_win::{
    key_press_text, wheel_steps, winit_keycode_to_dvl, winit_keycode_to_scancode, winit_mods_to_keymod,
    winit_mouse_button_to_dvl, SystemClipboard,
};

/// Event loop side: owns the window and feeds the queue.
struct WindowState {
    title: String,
    window: Option<Window>,
    sender: EventQueueSender,
    mods: KeyMod,
    ime_active: bool,
    keys_down: HashSet<Keycode>,
    mouse: (i32, i32),
    cursor_visible: bool,
    exited: bool,
}

impl WindowState {
    fn post(&self, event: NormalizedEvent) {
        if !self.sender.try_send(event) {
            com_dprintf("in_win: event queue full, event dropped\n");
        }
    }

    fn key_event(&self, key: Keycode, scancode: Scancode, repeat: bool) -> KeyEvent {
        KeyEvent {
            key,
            scancode,
            modifiers: self.mods,
            repeat,
        }
    }
}

impl ApplicationHandler for WindowState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attrs = Window::default_attributes().with_title(self.title.clone());
        match event_loop.create_window(attrs) {
            Ok(window) => {
                window.set_ime_allowed(true);
                window.set_cursor_visible(self.cursor_visible);
                self.window = Some(window);
            }
            Err(e) => {
                com_log_error(&format!("Failed to create window: {}", e));
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.post(NormalizedEvent::Quit);
                event_loop.exit();
            }

            WindowEvent::ModifiersChanged(new_modifiers) => {
                self.mods = winit_mods_to_keymod(new_modifiers.state());
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                let Some(key) = winit_keycode_to_dvl(code) else {
                    return;
                };
                let scancode = winit_keycode_to_scancode(code);
                match event.state {
                    ElementState::Pressed => {
                        self.keys_down.insert(key);
                        self.post(NormalizedEvent::KeyDown(self.key_event(key, scancode, event.repeat)));
                        if let Some(text) = key_press_text(event.text.as_deref(), self.mods, self.ime_active) {
                            self.post(NormalizedEvent::text_input(text));
                        }
                    }
                    ElementState::Released => {
                        self.keys_down.remove(&key);
                        self.post(NormalizedEvent::KeyUp(self.key_event(key, scancode, false)));
                    }
                }
            }

            WindowEvent::Ime(Ime::Enabled) => self.ime_active = true,

            WindowEvent::Ime(Ime::Disabled) => self.ime_active = false,

            WindowEvent::Ime(Ime::Commit(text)) => {
                self.post(NormalizedEvent::TextInput { text });
            }

            WindowEvent::Ime(Ime::Preedit(text, _)) => {
                self.post(NormalizedEvent::TextEditing { text });
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.mouse = (position.x as i32, position.y as i32);
                self.post(NormalizedEvent::MouseMotion {
                    x: self.mouse.0,
                    y: self.mouse.1,
                });
            }

            WindowEvent::MouseInput { button, state, .. } => {
                let payload = MouseButtonEvent {
                    button: winit_mouse_button_to_dvl(button),
                    x: self.mouse.0,
                    y: self.mouse.1,
                };
                self.post(match state {
                    ElementState::Pressed => NormalizedEvent::MouseButtonDown(payload),
                    ElementState::Released => NormalizedEvent::MouseButtonUp(payload),
                });
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let (x, y) = wheel_steps(delta);
                if x != 0 || y != 0 {
                    self.post(NormalizedEvent::MouseWheel { x, y });
                }
            }

            WindowEvent::Focused(gained) => {
                if !gained {
                    self.keys_down.clear();
                }
                self.post(NormalizedEvent::WindowFocusChanged { gained });
            }

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.exited = true;
    }
}

// ============================================================
// WinitPlatform
// ============================================================

pub struct WinitPlatform {
    event_loop: EventLoop<()>,
    state: WindowState,
    queue: EventQueue,
    clipboard: SystemClipboard,
    error: Option<String>,
}

impl WinitPlatform {
    pub fn new(title: &str) -> Result<Self, PlatformError> {
        let event_loop = EventLoop::new().map_err(|e| PlatformError::Backend(e.to_string()))?;
        let queue = EventQueue::default();
        let state = WindowState {
            title: title.to_string(),
            window: None,
            sender: queue.sender(),
            mods: KeyMod::empty(),
            ime_active: false,
            keys_down: HashSet::new(),
            mouse: (0, 0),
            cursor_visible: true,
            exited: false,
        };
        Ok(Self {
            event_loop,
            state,
            queue,
            clipboard: SystemClipboard,
            error: None,
        })
    }

    /// Sender for injecting events from another thread.
    pub fn sender(&self) -> EventQueueSender {
        self.queue.sender()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn pump(&mut self, timeout: Duration) {
        if self.state.exited {
            return;
        }
        if let PumpStatus::Exit(code) = self.event_loop.pump_app_events(Some(timeout), &mut self.state) {
            com_dprintf(&format!("in_win: event loop exited with {}\n", code));
            self.state.exited = true;
            self.state.post(NormalizedEvent::Quit);
        }
    }

    fn record<T>(&mut self, result: Result<T, PlatformError>) -> Result<T, PlatformError> {
        if let Err(e) = &result {
            self.error = Some(e.to_string());
        }
        result
    }
}

impl Platform for WinitPlatform {
    fn poll_event(&mut self) -> Option<NormalizedEvent> {
        if self.queue.is_empty() {
            self.pump(Duration::ZERO);
        }
        self.queue.try_recv()
    }

    fn wait_event_timeout(&mut self, timeout: Duration) -> Option<NormalizedEvent> {
        if self.queue.is_empty() {
            self.pump(timeout);
        }
        self.queue.try_recv()
    }

    fn mod_state(&self) -> KeyMod {
        self.state.mods
    }

    fn is_key_down(&self, key: Keycode) -> bool {
        self.state.keys_down.contains(&key)
    }

    fn set_clipboard_text(&mut self, text: &str) -> Result<(), PlatformError> {
        let result = self.clipboard.set_text(text);
        self.record(result)
    }

    fn has_clipboard_text(&mut self) -> bool {
        self.clipboard.get_text().is_ok_and(|s| !s.is_empty())
    }

    fn get_clipboard_text(&mut self) -> Result<String, PlatformError> {
        let result = self.clipboard.get_text();
        self.record(result)
    }

    fn clear_error(&mut self) {
        self.error = None;
    }

    fn open_gamepad(&mut self, _device_index: u32) -> Result<GamepadInfo, PlatformError> {
        self.record(Err(PlatformError::Unsupported("gamepad")))
    }

    fn close_gamepad(&mut self, _handle: NativeHandle) {}

    fn gamepad_button_down(&self, _handle: NativeHandle, _button: GamepadButton) -> bool {
        false
    }

    fn gamepad_type(&self, _which: u32) -> GamepadType {
        GamepadType::Unknown
    }

    fn open_joystick(&mut self, _device_index: u32) -> Result<JoystickInfo, PlatformError> {
        self.record(Err(PlatformError::Unsupported("joystick")))
    }

    fn close_joystick(&mut self, _handle: NativeHandle) {}

    fn joystick_button_down(&self, _handle: NativeHandle, _button: u8) -> bool {
        false
    }

    fn mouse_position(&self) -> (i32, i32) {
        self.state.mouse
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        self.state.cursor_visible = visible;
        if let Some(window) = &self.state.window {
            window.set_cursor_visible(visible);
        }
    }
}
