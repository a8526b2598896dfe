// controller_motion.rs — analog stick caching and dead-zone scaling
//
// Axis events only record the raw value and mark the stick dirty. Scaling
// happens lazily when somebody reads the stick.

const AXIS_MAX: f32 = 32767.0;

/// One analog stick: raw values as last reported plus the cached scaled pair.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StickState {
    pub x_unscaled: f32,
    pub y_unscaled: f32,
    pub needs_scaling: bool,
    scaled: (f32, f32),
}

impl StickState {
    pub fn set_x(&mut self, value: i16) {
        self.x_unscaled = f32::from(value);
        self.needs_scaling = true;
    }

    /// Y is stored inverted so that up is positive.
    pub fn set_y(&mut self, value: i16) {
        self.y_unscaled = -f32::from(value);
        self.needs_scaling = true;
    }

    /// Stick position in [-1, 1] after applying a radial dead zone.
    pub fn scaled(&mut self, deadzone: f32) -> (f32, f32) {
        if self.needs_scaling {
            self.scaled = scale_radial(self.x_unscaled, self.y_unscaled, deadzone);
            self.needs_scaling = false;
        }
        self.scaled
    }
}

/// Radial scaled dead zone: inside `deadzone` reads as centered, the rest of
/// the range is stretched back over [0, 1].
pub fn scale_radial(x: f32, y: f32, deadzone: f32) -> (f32, f32) {
    let deadzone = deadzone.clamp(0.0, 0.99);
    let nx = (x / AXIS_MAX).clamp(-1.0, 1.0);
    let ny = (y / AXIS_MAX).clamp(-1.0, 1.0);
    let magnitude = (nx * nx + ny * ny).sqrt();
    if magnitude <= deadzone {
        return (0.0, 0.0);
    }
    let scaled_magnitude = ((magnitude - deadzone) / (1.0 - deadzone)).min(1.0);
    let factor = scaled_magnitude / magnitude;
    (nx * factor, ny * factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inside_deadzone_is_centered() {
        assert_eq!(scale_radial(1000.0, -1000.0, 0.07), (0.0, 0.0));
    }

    #[test]
    fn test_full_deflection() {
        let (x, y) = scale_radial(32767.0, 0.0, 0.07);
        assert!((x - 1.0).abs() < 1e-4);
        assert_eq!(y, 0.0);
    }

    #[test]
    fn test_diagonal_clamped_to_unit_circle() {
        let (x, y) = scale_radial(32767.0, 32767.0, 0.1);
        assert!(((x * x + y * y).sqrt() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_lazy_scaling_and_y_inversion() {
        let mut s = StickState::default();
        s.set_y(-32768);
        assert!(s.needs_scaling);
        assert_eq!(s.y_unscaled, 32768.0);
        let (_, y) = s.scaled(0.0);
        assert!((y - 1.0).abs() < 1e-4);
        assert!(!s.needs_scaling);
        s.set_x(0);
        s.set_y(0);
        assert_eq!(s.scaled(0.2), (0.0, 0.0));
    }
}
