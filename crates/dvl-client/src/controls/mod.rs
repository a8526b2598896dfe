// controls — controller sources normalized to ControllerButton values

pub mod controller;
pub mod controller_buttons;
pub mod controller_motion;
pub mod game_controller;
pub mod joystick;
pub mod kbcontroller;

pub use controller::InputContext;
pub use controller_buttons::{
    ControllerButton, ControllerButtonCombo, ControllerButtonEvent, ControllerButtonEvents, GamepadLayout,
};
