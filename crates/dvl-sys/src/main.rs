// Entry point — dvl-input-demo
//
// Drives the input core from a real window, or from a scripted replay fed
// by a second thread when started with --replay:
//   1. Logging and cvars (dvl.cfg is executed if present)
//   2. Event loop: device hot-plug, text entry, controller buttons
//   3. F1 plays a placeholder movie through the blocking movie loop

use std::thread;
use std::time::{Duration, Instant};

use dvl_client::controls::controller_buttons::button_label;
use dvl_client::controls::game_controller::get_layout;
use dvl_client::controls::{ControllerButton, GamepadLayout, InputContext};
use dvl_client::event::{DeviceEvent, GamepadButton, GamepadButtonEvent, NormalizedEvent};
use dvl_client::event_queue::EventQueueSender;
use dvl_client::input::wait_message;
use dvl_client::movie::{MovieHost, MovieOutcome, MoviePlayer, VideoPlayer};
use dvl_client::platform::{GamepadType, Platform};
use dvl_client::scripted::ScriptedPlatform;
use dvl_client::text_input::{handle_text_input_event, TextInputState};
use dvl_common::common::{com_dprintf, com_init_logging, com_log_error, com_printf};
use dvl_common::cvar::{cvar_init, cvar_set, with_cvar_ctx};
use dvl_common::keys::{key_name, K_F1, K_RETURN};

use dvl_sys::in_win::WinitPlatform;
use dvl_sys::sys_win;

const FRAME_TIME: Duration = Duration::from_millis(16);

/// Paces frames for a fixed duration. Stands in for a real decoder.
struct PacedVideo {
    frames_left: u32,
    next_frame: Instant,
}

impl PacedVideo {
    fn new(frames: u32) -> Self {
        Self {
            frames_left: frames,
            next_frame: Instant::now(),
        }
    }
}

impl VideoPlayer for PacedVideo {
    fn begin(&mut self, name: &str, looping: bool) -> bool {
        com_printf(&format!("Playing {} (loop: {})\n", name, looping));
        self.next_frame = Instant::now() + FRAME_TIME;
        true
    }

    fn play_continue(&mut self) -> bool {
        if Instant::now() < self.next_frame {
            return true;
        }
        if self.frames_left == 0 {
            return false;
        }
        self.frames_left -= 1;
        self.next_frame += FRAME_TIME;
        true
    }

    fn end(&mut self) {
        com_printf("Movie ended\n");
    }
}

/// Host side effects are logged only.
struct DemoHost;

impl MovieHost for DemoHost {
    fn disable_music(&mut self, disable: bool) {
        com_dprintf(&format!("music {}\n", if disable { "off" } else { "on" }));
    }
    fn stream_stop(&mut self) {
        com_dprintf("stream stopped\n");
    }
    fn uses_keyboard_and_mouse(&self) -> bool {
        true
    }
    fn focus_pause(&mut self) {
        com_printf("Paused (focus lost)\n");
    }
    fn focus_unpause(&mut self) {
        com_printf("Unpaused\n");
    }
    fn set_mouse_position(&mut self, x: i32, y: i32) {
        com_dprintf(&format!("mouse at {},{}\n", x, y));
    }
    fn init_backbuffer_state(&mut self) {}
    fn palette_fade_out(&mut self, _steps: u32) {}
    fn palette_fade_in(&mut self, _steps: u32) {}
    fn clear_screen_buffer(&mut self) {}
    fn redraw_everything(&mut self) {}
    fn draw_game_screen(&mut self) {}
}

/// Scripted session: a gamepad, some typing, a skipped movie, then quit.
fn replay_script(sender: EventQueueSender) {
    let pad = |button| GamepadButtonEvent { which: 7, button };
    let script = [
        NormalizedEvent::GamepadAdded(DeviceEvent { which: 0 }),
        NormalizedEvent::key_down(b'h'.into()),
        NormalizedEvent::text_input("h"),
        NormalizedEvent::key_down(b'i'.into()),
        NormalizedEvent::text_input("i"),
        NormalizedEvent::key_down(K_RETURN),
        NormalizedEvent::GamepadButtonDown(pad(GamepadButton::South)),
        NormalizedEvent::GamepadButtonUp(pad(GamepadButton::South)),
        NormalizedEvent::key_down(K_F1),
        NormalizedEvent::GamepadButtonDown(pad(GamepadButton::Start)),
        NormalizedEvent::Quit,
    ];
    for event in script {
        thread::sleep(Duration::from_millis(50));
        if !sender.try_send(event) {
            com_log_error("replay: queue full\n");
        }
    }
}

fn run<P: Platform + ?Sized>(platform: &mut P) -> i32 {
    let mut input = InputContext::new();
    let mut entry = TextInputState::with_max_length(64);
    let mut movies = MoviePlayer::new();
    let mut host = DemoHost;
    let mut layout = GamepadLayout::Generic;

    loop {
        let Some(event) = wait_message(platform, &mut input, FRAME_TIME) else {
            continue;
        };

        if input.handle_controller_added_or_removed_event(platform, &event) {
            if matches!(event, NormalizedEvent::GamepadAdded(_)) {
                layout = get_layout(&*platform, &event);
            }
            continue;
        }

        match &event {
            NormalizedEvent::Quit => return 0,
            NormalizedEvent::KeyDown(k) if k.key == K_RETURN => {
                com_printf(&format!("Entered: \"{}\"\n", entry.value()));
                entry.clear();
                continue;
            }
            NormalizedEvent::KeyDown(k) if k.key == K_F1 => {
                let mut video = PacedVideo::new(120);
                let played = with_cvar_ctx(|cvars| {
                    movies.play_movie("gendata\\logo.smk", true, platform, &mut input, &mut video, &mut host, cvars)
                });
                let Some(outcome) = played else {
                    com_log_error("cvars not initialized\n");
                    continue;
                };
                com_printf(&format!("Movie outcome: {:?}\n", outcome));
                if outcome == MovieOutcome::QuitRequested {
                    return 0;
                }
                continue;
            }
            NormalizedEvent::KeyDown(k) => com_dprintf(&format!("key down: {}\n", key_name(k.key))),
            _ => {}
        }

        if handle_text_input_event(&event, &mut entry, platform) {
            continue;
        }

        for ev in input.to_controller_button_events(&event) {
            if matches!(ev.button, ControllerButton::None | ControllerButton::Ignore) {
                continue;
            }
            com_printf(&format!(
                "Controller {:?} ({}) {}\n",
                ev.button,
                button_label(layout, ev.button),
                if ev.up { "up" } else { "down" }
            ));
        }
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "-v");
    let replay = args.iter().any(|a| a == "--replay");

    com_init_logging(verbose);
    cvar_init();
    if verbose {
        cvar_set("developer", "1");
    }
    if let Ok(text) = std::fs::read_to_string("dvl.cfg") {
        with_cvar_ctx(|c| c.exec_config(&text));
    }

    let code = if replay {
        let mut platform = ScriptedPlatform::new();
        platform.add_fake_gamepad(0, 7, GamepadType::Ps5);
        let sender = platform.sender();
        let feeder = thread::spawn(move || replay_script(sender));
        let code = run(&mut platform);
        if feeder.join().is_err() {
            com_log_error("replay thread panicked\n");
        }
        code
    } else {
        match WinitPlatform::new("dvl input demo") {
            Ok(mut platform) => run(&mut platform),
            Err(e) => {
                com_log_error(&format!("{}\n", e));
                1
            }
        }
    };

    sys_win::sys_quit(code);
}
