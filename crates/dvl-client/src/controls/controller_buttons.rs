// controller_buttons.rs — the one button vocabulary every input device maps into

use smallvec::SmallVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ControllerButton {
    #[default]
    None,
    Ignore,
    AxisTriggerLeft,
    AxisTriggerRight,
    ButtonA,
    ButtonB,
    ButtonX,
    ButtonY,
    ButtonLeftStick,
    ButtonRightStick,
    ButtonLeftShoulder,
    ButtonRightShoulder,
    ButtonStart,
    ButtonBack,
    ButtonDpadUp,
    ButtonDpadDown,
    ButtonDpadLeft,
    ButtonDpadRight,
}

impl ControllerButton {
    pub fn is_dpad(self) -> bool {
        matches!(
            self,
            ControllerButton::ButtonDpadUp
                | ControllerButton::ButtonDpadDown
                | ControllerButton::ButtonDpadLeft
                | ControllerButton::ButtonDpadRight
        )
    }

    pub fn is_trigger(self) -> bool {
        matches!(self, ControllerButton::AxisTriggerLeft | ControllerButton::AxisTriggerRight)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControllerButtonEvent {
    pub button: ControllerButton,
    /// true for a release, false for a press or repeat.
    pub up: bool,
}

impl ControllerButtonEvent {
    pub fn new(button: ControllerButton, up: bool) -> Self {
        Self { button, up }
    }
}

/// At most four button events come out of one input event (a hat moving
/// between diagonals releases two directions and presses two).
pub type ControllerButtonEvents = SmallVec<[ControllerButtonEvent; 4]>;

/// A button that only counts while an optional modifier button is also held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControllerButtonCombo {
    pub modifier: ControllerButton,
    pub button: ControllerButton,
}

impl ControllerButtonCombo {
    pub fn new(button: ControllerButton) -> Self {
        Self {
            modifier: ControllerButton::None,
            button,
        }
    }

    pub fn with_modifier(modifier: ControllerButton, button: ControllerButton) -> Self {
        Self { modifier, button }
    }
}

/// Printed layout of the face and shoulder buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamepadLayout {
    #[default]
    Generic,
    Nintendo,
    PlayStation,
    Xbox,
}

impl GamepadLayout {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "generic" => Some(GamepadLayout::Generic),
            "nintendo" => Some(GamepadLayout::Nintendo),
            "playstation" => Some(GamepadLayout::PlayStation),
            "xbox" => Some(GamepadLayout::Xbox),
            _ => None,
        }
    }
}

/// Label printed on `button` for a given layout. Nintendo pads swap the
/// face letters relative to position.
pub fn button_label(layout: GamepadLayout, button: ControllerButton) -> &'static str {
    use ControllerButton::*;
    match button {
        None | Ignore => return "",
        ButtonDpadUp => return "Up",
        ButtonDpadDown => return "Down",
        ButtonDpadLeft => return "Left",
        ButtonDpadRight => return "Right",
        _ => {}
    }
    match layout {
        GamepadLayout::Generic => match button {
            ButtonA => "A",
            ButtonB => "B",
            ButtonX => "X",
            ButtonY => "Y",
            ButtonBack => "Select",
            ButtonStart => "Start",
            ButtonLeftShoulder => "L1",
            ButtonRightShoulder => "R1",
            AxisTriggerLeft => "L2",
            AxisTriggerRight => "R2",
            ButtonLeftStick => "L3",
            ButtonRightStick => "R3",
            _ => "",
        },
        GamepadLayout::Nintendo => match button {
            ButtonA => "B",
            ButtonB => "A",
            ButtonX => "Y",
            ButtonY => "X",
            ButtonBack => "-",
            ButtonStart => "+",
            ButtonLeftShoulder => "L",
            ButtonRightShoulder => "R",
            AxisTriggerLeft => "ZL",
            AxisTriggerRight => "ZR",
            ButtonLeftStick => "LS",
            ButtonRightStick => "RS",
            _ => "",
        },
        GamepadLayout::PlayStation => match button {
            ButtonA => "Cross",
            ButtonB => "Circle",
            ButtonX => "Square",
            ButtonY => "Triangle",
            ButtonBack => "Select",
            ButtonStart => "Start",
            ButtonLeftShoulder => "L1",
            ButtonRightShoulder => "R1",
            AxisTriggerLeft => "L2",
            AxisTriggerRight => "R2",
            ButtonLeftStick => "L3",
            ButtonRightStick => "R3",
            _ => "",
        },
        GamepadLayout::Xbox => match button {
            ButtonA => "A",
            ButtonB => "B",
            ButtonX => "X",
            ButtonY => "Y",
            ButtonBack => "Back",
            ButtonStart => "Start",
            ButtonLeftShoulder => "LB",
            ButtonRightShoulder => "RB",
            AxisTriggerLeft => "LT",
            AxisTriggerRight => "RT",
            ButtonLeftStick => "LS",
            ButtonRightStick => "RS",
            _ => "",
        },
    }
}
