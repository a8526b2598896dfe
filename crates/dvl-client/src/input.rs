// input.rs — event fetching shared by the game loop and the movie loop
//
// Every event leaving here has already been run through the controller
// bookkeeping: trigger state unlocked, stick positions cached.

use std::time::Duration;

use dvl_common::cvar::CvarContext;

use crate::controls::InputContext;
use crate::event::NormalizedEvent;
use crate::platform::Platform;

fn prepare_event(ctx: &mut InputContext, event: &NormalizedEvent) {
    ctx.unlock_controller_state(event);
    ctx.process_controller_motion(event);
}

/// Next pending event, or None when the queue is empty.
pub fn fetch_message<P: Platform + ?Sized>(platform: &mut P, ctx: &mut InputContext) -> Option<NormalizedEvent> {
    let event = platform.poll_event()?;
    prepare_event(ctx, &event);
    Some(event)
}

/// Like fetch_message but blocks up to `timeout` for the first event.
pub fn wait_message<P: Platform + ?Sized>(
    platform: &mut P,
    ctx: &mut InputContext,
    timeout: Duration,
) -> Option<NormalizedEvent> {
    let event = platform.wait_event_timeout(timeout)?;
    prepare_event(ctx, &event);
    Some(event)
}

/// Stick dead zone from the joy_deadzone option.
pub fn joy_deadzone(cvars: &CvarContext) -> f32 {
    cvars.variable_value("joy_deadzone").clamp(0.0, 0.99)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::{ControllerButton, ControllerButtonEvent};
    use crate::event::{DeviceEvent, GamepadAxis, GamepadAxisEvent};
    use crate::platform::GamepadType;
    use crate::scripted::ScriptedPlatform;
    use dvl_common::keys::K_A;

    #[test]
    fn test_fetch_empty() {
        let mut p = ScriptedPlatform::new();
        let mut ctx = InputContext::new();
        assert_eq!(fetch_message(&mut p, &mut ctx), None);
        p.push(NormalizedEvent::key_down(K_A));
        assert_eq!(fetch_message(&mut p, &mut ctx), Some(NormalizedEvent::key_down(K_A)));
    }

    #[test]
    fn test_fetch_runs_trigger_and_stick_bookkeeping() {
        let mut p = ScriptedPlatform::new();
        p.add_fake_gamepad(0, 5, GamepadType::Ps4);
        let mut ctx = InputContext::new();
        ctx.set_kbctrl(None);
        ctx.handle_controller_added_or_removed_event(&mut p, &NormalizedEvent::GamepadAdded(DeviceEvent { which: 0 }));

        let axis = |axis, value| NormalizedEvent::GamepadAxisMotion(GamepadAxisEvent { which: 5, axis, value });
        p.push_all([
            axis(GamepadAxis::LeftTrigger, 20000),
            axis(GamepadAxis::LeftTrigger, 10000),
            axis(GamepadAxis::RightX, 32767),
        ]);

        let ev = fetch_message(&mut p, &mut ctx).unwrap();
        assert_eq!(ctx.to_controller_button_events(&ev).as_slice(), &[ControllerButtonEvent::new(ControllerButton::AxisTriggerLeft, false)]);
        // Mid band: unlocked on fetch, so no trigger identity is reported again.
        let ev = fetch_message(&mut p, &mut ctx).unwrap();
        assert_eq!(ctx.to_controller_button_events(&ev)[0].button, ControllerButton::None);

        fetch_message(&mut p, &mut ctx).unwrap();
        let pad = ctx.controllers.get_mut(5).unwrap();
        assert!(pad.right_stick.needs_scaling);
        let (x, _) = pad.scaled_right_stick(0.07);
        assert!((x - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_wait_times_out() {
        let mut p = ScriptedPlatform::new();
        let mut ctx = InputContext::new();
        assert_eq!(wait_message(&mut p, &mut ctx, Duration::from_millis(1)), None);
        assert_eq!(p.waits, 1);
    }

    #[test]
    fn test_joy_deadzone_option() {
        let mut cvars = CvarContext::with_input_defaults();
        assert!((joy_deadzone(&cvars) - 0.07).abs() < 1e-6);
        cvars.set("joy_deadzone", "5");
        assert_eq!(joy_deadzone(&cvars), 0.99);
    }
}
