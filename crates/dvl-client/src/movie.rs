// movie.rs — blocking video playback
//
// play_movie owns the event loop while a video runs. Decoding and drawing
// belong to the VideoPlayer; music, palette and focus handling belong to the
// game through MovieHost.

use std::time::Duration;

use dvl_common::common::{com_dprintf, com_printf};
use dvl_common::cvar::CvarContext;
use dvl_common::keys::K_ESCAPE;

use crate::controls::{ControllerButton, ControllerButtonEvent, InputContext};
use crate::event::NormalizedEvent;
use crate::input::{fetch_message, wait_message};
use crate::platform::Platform;

/// Palette fade steps around in-game movies.
const FADE_STEPS: u32 = 8;

/// Default upper bound on a single event wait.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

// ============================================================
// Types
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovieState {
    #[default]
    Idle,
    Playing,
    Stopping,
}

/// How a play_movie call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieOutcome {
    /// Demo replay active or the video could not be opened.
    NotPlayed,
    Finished,
    Skipped,
    /// The platform asked to quit. The host should terminate.
    QuitRequested,
}

pub trait VideoPlayer {
    /// Open `name` and start playing. Returns false if the video can't play.
    fn begin(&mut self, name: &str, looping: bool) -> bool;
    /// Present the next frame if due. Returns false once the video is over.
    fn play_continue(&mut self) -> bool;
    fn end(&mut self);
}

pub trait MovieHost {
    fn disable_music(&mut self, disable: bool);
    fn stream_stop(&mut self);
    /// True when the player is driving the game with keyboard and mouse.
    fn uses_keyboard_and_mouse(&self) -> bool;
    fn focus_pause(&mut self);
    fn focus_unpause(&mut self);
    /// Window coordinates to logical game coordinates.
    fn output_to_logical(&self, x: i32, y: i32) -> (i32, i32) {
        (x, y)
    }
    fn set_mouse_position(&mut self, x: i32, y: i32);
    fn init_backbuffer_state(&mut self);

    fn palette_fade_out(&mut self, steps: u32);
    fn palette_fade_in(&mut self, steps: u32);
    fn clear_screen_buffer(&mut self);
    fn redraw_everything(&mut self);
    fn draw_game_screen(&mut self);
}

fn skips_movie(event: &ControllerButtonEvent) -> bool {
    !event.up
        && matches!(
            event.button,
            ControllerButton::ButtonA
                | ControllerButton::ButtonB
                | ControllerButton::ButtonStart
                | ControllerButton::ButtonBack
        )
}

// ============================================================
// MoviePlayer
// ============================================================

#[derive(Debug, Clone)]
pub struct MoviePlayer {
    state: MovieState,
    looping: bool,
    poll_interval: Duration,
    outcome: MovieOutcome,
}

impl Default for MoviePlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl MoviePlayer {
    pub fn new() -> Self {
        Self::with_poll_interval(DEFAULT_POLL_INTERVAL)
    }

    pub fn with_poll_interval(poll_interval: Duration) -> Self {
        Self {
            state: MovieState::Idle,
            looping: false,
            poll_interval,
            outcome: MovieOutcome::NotPlayed,
        }
    }

    pub fn state(&self) -> MovieState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == MovieState::Playing
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn looping(&self) -> bool {
        self.looping
    }

    fn stop(&mut self, outcome: MovieOutcome) {
        self.state = MovieState::Stopping;
        self.outcome = outcome;
    }

    fn handle_event<H: MovieHost + ?Sized>(
        &mut self,
        event: &NormalizedEvent,
        user_can_close: bool,
        input: &mut InputContext,
        host: &mut H,
        cvars: &CvarContext,
    ) {
        if user_can_close && input.to_controller_button_events(event).iter().any(skips_movie) {
            self.stop(MovieOutcome::Skipped);
        }

        match event {
            NormalizedEvent::KeyDown(k) => {
                if user_can_close || k.key == K_ESCAPE {
                    self.stop(MovieOutcome::Skipped);
                }
            }
            NormalizedEvent::MouseButtonUp(_) => {
                if user_can_close {
                    self.stop(MovieOutcome::Skipped);
                }
            }
            NormalizedEvent::WindowFocusChanged { gained } => {
                if cvars.is_enabled("pause_on_focus_loss") {
                    if *gained {
                        host.focus_unpause();
                    } else {
                        host.focus_pause();
                    }
                }
            }
            NormalizedEvent::Quit => self.stop(MovieOutcome::QuitRequested),
            _ => {}
        }
    }

    /// Play `name`, blocking until it ends, is skipped, or the platform quits.
    pub fn play_movie<P, V, H>(
        &mut self,
        name: &str,
        user_can_close: bool,
        platform: &mut P,
        input: &mut InputContext,
        video: &mut V,
        host: &mut H,
        cvars: &CvarContext,
    ) -> MovieOutcome
    where
        P: Platform + ?Sized,
        V: VideoPlayer + ?Sized,
        H: MovieHost + ?Sized,
    {
        if input.demo_running() {
            com_dprintf(&format!("play_movie: {} skipped during demo\n", name));
            return MovieOutcome::NotPlayed;
        }

        self.state = MovieState::Playing;
        self.outcome = MovieOutcome::Finished;

        host.disable_music(true);
        host.stream_stop();

        if cvars.is_enabled("hardware_cursor") && host.uses_keyboard_and_mouse() {
            platform.set_cursor_visible(false);
        }

        if video.begin(name, self.looping) {
            com_dprintf(&format!("play_movie: {}\n", name));
            while self.state == MovieState::Playing {
                let mut next = wait_message(platform, input, self.poll_interval);
                while let Some(event) = next.take() {
                    self.handle_event(&event, user_can_close, input, host, cvars);
                    if self.state != MovieState::Playing {
                        break;
                    }
                    next = fetch_message(platform, input);
                }
                if self.state == MovieState::Playing && !video.play_continue() {
                    break;
                }
            }
            video.end();
        } else {
            com_printf(&format!("Unable to play movie {}\n", name));
            self.outcome = MovieOutcome::NotPlayed;
        }

        host.disable_music(false);
        self.state = MovieState::Idle;

        let (x, y) = platform.mouse_position();
        let (x, y) = host.output_to_logical(x, y);
        host.set_mouse_position(x, y);
        host.init_backbuffer_state();

        self.outcome
    }

    /// Cut-scene inside a running game: faded in and out, never skippable.
    pub fn play_in_game_movie<P, V, H>(
        &mut self,
        name: &str,
        platform: &mut P,
        input: &mut InputContext,
        video: &mut V,
        host: &mut H,
        cvars: &CvarContext,
    ) -> MovieOutcome
    where
        P: Platform + ?Sized,
        V: VideoPlayer + ?Sized,
        H: MovieHost + ?Sized,
    {
        host.palette_fade_out(FADE_STEPS);
        let outcome = self.play_movie(name, false, platform, input, video, host, cvars);
        host.clear_screen_buffer();
        host.redraw_everything();
        host.draw_game_screen();
        host.palette_fade_in(FADE_STEPS);
        host.redraw_everything();
        outcome
    }
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{DeviceEvent, GamepadButton, GamepadButtonEvent, MouseButton, MouseButtonEvent};
    use crate::platform::GamepadType;
    use crate::scripted::ScriptedPlatform;
    use dvl_common::keys::K_SPACE;

    #[derive(Default)]
    struct FakeVideo {
        frames: usize,
        fail_begin: bool,
        begun: Option<(String, bool)>,
        ended: usize,
    }

    impl FakeVideo {
        fn with_frames(frames: usize) -> Self {
            Self { frames, ..Self::default() }
        }
    }

    impl VideoPlayer for FakeVideo {
        fn begin(&mut self, name: &str, looping: bool) -> bool {
            self.begun = Some((name.to_string(), looping));
            !self.fail_begin
        }

        fn play_continue(&mut self) -> bool {
            if self.frames == 0 {
                return false;
            }
            self.frames -= 1;
            true
        }

        fn end(&mut self) {
            self.ended += 1;
        }
    }

    #[derive(Default)]
    struct RecordingHost {
        calls: Vec<String>,
        keyboard_and_mouse: bool,
    }

    impl MovieHost for RecordingHost {
        fn disable_music(&mut self, disable: bool) {
            self.calls.push(format!("music_off={}", disable));
        }
        fn stream_stop(&mut self) {
            self.calls.push("stream_stop".into());
        }
        fn uses_keyboard_and_mouse(&self) -> bool {
            self.keyboard_and_mouse
        }
        fn focus_pause(&mut self) {
            self.calls.push("pause".into());
        }
        fn focus_unpause(&mut self) {
            self.calls.push("unpause".into());
        }
        fn output_to_logical(&self, x: i32, y: i32) -> (i32, i32) {
            (x / 2, y / 2)
        }
        fn set_mouse_position(&mut self, x: i32, y: i32) {
            self.calls.push(format!("mouse={},{}", x, y));
        }
        fn init_backbuffer_state(&mut self) {
            self.calls.push("backbuffer".into());
        }
        fn palette_fade_out(&mut self, steps: u32) {
            self.calls.push(format!("fade_out={}", steps));
        }
        fn palette_fade_in(&mut self, steps: u32) {
            self.calls.push(format!("fade_in={}", steps));
        }
        fn clear_screen_buffer(&mut self) {
            self.calls.push("clear".into());
        }
        fn redraw_everything(&mut self) {
            self.calls.push("redraw".into());
        }
        fn draw_game_screen(&mut self) {
            self.calls.push("draw".into());
        }
    }

    struct Rig {
        platform: ScriptedPlatform,
        input: InputContext,
        video: FakeVideo,
        host: RecordingHost,
        cvars: CvarContext,
        player: MoviePlayer,
    }

    impl Rig {
        fn new(frames: usize) -> Self {
            let mut input = InputContext::new();
            input.set_kbctrl(None);
            Self {
                platform: ScriptedPlatform::new(),
                input,
                video: FakeVideo::with_frames(frames),
                host: RecordingHost::default(),
                cvars: CvarContext::with_input_defaults(),
                player: MoviePlayer::with_poll_interval(Duration::from_millis(1)),
            }
        }

        fn play(&mut self, user_can_close: bool) -> MovieOutcome {
            self.player.play_movie(
                "gendata\\diabvic1.smk",
                user_can_close,
                &mut self.platform,
                &mut self.input,
                &mut self.video,
                &mut self.host,
                &self.cvars,
            )
        }
    }

    // ---- lifecycle ----

    #[test]
    fn test_plays_to_the_end() {
        let mut rig = Rig::new(3);
        rig.platform.set_mouse_position(100, 60);
        assert_eq!(rig.play(true), MovieOutcome::Finished);
        assert_eq!(rig.video.frames, 0);
        assert_eq!(rig.video.ended, 1);
        assert_eq!(rig.video.begun, Some(("gendata\\diabvic1.smk".to_string(), false)));
        assert_eq!(
            rig.host.calls,
            vec!["music_off=true", "stream_stop", "music_off=false", "mouse=50,30", "backbuffer"]
        );
        assert_eq!(rig.player.state(), MovieState::Idle);
        assert!(rig.platform.waits >= 3);
    }

    #[test]
    fn test_skipped_during_demo() {
        let mut rig = Rig::new(3);
        rig.input.set_demo_running(true);
        assert_eq!(rig.play(true), MovieOutcome::NotPlayed);
        assert!(rig.video.begun.is_none());
        assert!(rig.host.calls.is_empty());
    }

    #[test]
    fn test_begin_failure_still_restores() {
        let mut rig = Rig::new(3);
        rig.video.fail_begin = true;
        assert_eq!(rig.play(true), MovieOutcome::NotPlayed);
        assert_eq!(rig.video.ended, 0);
        assert!(rig.host.calls.contains(&"music_off=false".to_string()));
        assert!(rig.host.calls.contains(&"backbuffer".to_string()));
    }

    #[test]
    fn test_hardware_cursor_hidden_for_keyboard_and_mouse() {
        let mut rig = Rig::new(0);
        rig.host.keyboard_and_mouse = true;
        rig.play(true);
        assert!(!rig.platform.cursor_visible());

        let mut rig = Rig::new(0);
        rig.host.keyboard_and_mouse = true;
        rig.cvars.set("hardware_cursor", "0");
        rig.play(true);
        assert!(rig.platform.cursor_visible());
    }

    #[test]
    fn test_looping_flag_reaches_video() {
        let mut rig = Rig::new(0);
        rig.player.set_looping(true);
        rig.play(true);
        assert_eq!(rig.video.begun.as_ref().map(|(_, l)| *l), Some(true));
    }

    // ---- skipping ----

    #[test]
    fn test_key_skips_when_closable() {
        let mut rig = Rig::new(100);
        rig.platform.push(NormalizedEvent::key_down(K_SPACE));
        assert_eq!(rig.play(true), MovieOutcome::Skipped);
        assert_eq!(rig.video.frames, 100);
        assert_eq!(rig.video.ended, 1);
    }

    #[test]
    fn test_only_escape_skips_when_not_closable() {
        let mut rig = Rig::new(2);
        rig.platform.push(NormalizedEvent::key_down(K_SPACE));
        rig.platform.push(NormalizedEvent::MouseButtonUp(MouseButtonEvent { button: MouseButton::Left, x: 0, y: 0 }));
        assert_eq!(rig.play(false), MovieOutcome::Finished);

        let mut rig = Rig::new(100);
        rig.platform.push(NormalizedEvent::key_down(K_ESCAPE));
        assert_eq!(rig.play(false), MovieOutcome::Skipped);
    }

    #[test]
    fn test_mouse_up_skips() {
        let mut rig = Rig::new(100);
        rig.platform.push(NormalizedEvent::MouseButtonUp(MouseButtonEvent { button: MouseButton::Right, x: 4, y: 4 }));
        assert_eq!(rig.play(true), MovieOutcome::Skipped);
    }

    #[test]
    fn test_controller_skip_buttons() {
        let mut rig = Rig::new(100);
        rig.platform.add_fake_gamepad(0, 1, GamepadType::XboxOne);
        rig.input
            .handle_controller_added_or_removed_event(&mut rig.platform, &NormalizedEvent::GamepadAdded(DeviceEvent { which: 0 }));
        let pad = |button| GamepadButtonEvent { which: 1, button };
        // Releases and non-skip buttons keep playing.
        rig.platform.push(NormalizedEvent::GamepadButtonUp(pad(GamepadButton::South)));
        rig.platform.push(NormalizedEvent::GamepadButtonDown(pad(GamepadButton::North)));
        rig.platform.push(NormalizedEvent::GamepadButtonDown(pad(GamepadButton::Back)));
        assert_eq!(rig.play(true), MovieOutcome::Skipped);

        let mut rig2 = Rig::new(2);
        rig2.platform.add_fake_gamepad(0, 1, GamepadType::XboxOne);
        rig2.input
            .handle_controller_added_or_removed_event(&mut rig2.platform, &NormalizedEvent::GamepadAdded(DeviceEvent { which: 0 }));
        rig2.platform.push(NormalizedEvent::GamepadButtonDown(pad(GamepadButton::Start)));
        assert_eq!(rig2.play(false), MovieOutcome::Finished);
    }

    // ---- focus and quit ----

    #[test]
    fn test_focus_pause_follows_option() {
        let mut rig = Rig::new(1);
        rig.platform.push(NormalizedEvent::WindowFocusChanged { gained: false });
        rig.platform.push(NormalizedEvent::WindowFocusChanged { gained: true });
        rig.play(true);
        assert!(rig.host.calls.contains(&"pause".to_string()));
        assert!(rig.host.calls.contains(&"unpause".to_string()));

        let mut rig = Rig::new(1);
        rig.cvars.set("pause_on_focus_loss", "0");
        rig.platform.push(NormalizedEvent::WindowFocusChanged { gained: false });
        rig.play(true);
        assert!(!rig.host.calls.contains(&"pause".to_string()));
    }

    #[test]
    fn test_quit_requests_termination() {
        let mut rig = Rig::new(100);
        rig.platform.push(NormalizedEvent::Quit);
        rig.platform.push(NormalizedEvent::key_down(K_SPACE));
        assert_eq!(rig.play(false), MovieOutcome::QuitRequested);
        assert_eq!(rig.video.ended, 1);
        assert_eq!(rig.platform.pending(), 1);
        assert!(rig.host.calls.contains(&"backbuffer".to_string()));
    }

    // ---- in-game ----

    #[test]
    fn test_in_game_movie_fades() {
        let mut rig = Rig::new(0);
        rig.platform.push(NormalizedEvent::key_down(K_SPACE));
        let outcome = rig.player.play_in_game_movie(
            "gendata\\fightpit.smk",
            &mut rig.platform,
            &mut rig.input,
            &mut rig.video,
            &mut rig.host,
            &rig.cvars,
        );
        assert_eq!(outcome, MovieOutcome::Finished);
        assert_eq!(rig.host.calls.first().map(String::as_str), Some("fade_out=8"));
        let tail: Vec<&str> = rig.host.calls.iter().rev().take(5).rev().map(String::as_str).collect();
        assert_eq!(tail, vec!["clear", "redraw", "draw", "fade_in=8", "redraw"]);
    }
}
