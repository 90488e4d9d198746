use std::ops::RangeInclusive;

use crate::model::{LightKind, Lights};

pub const INTENSITY_RANGE: RangeInclusive<f32> = 0.0..=2.0;
pub const INTENSITY_STEP: f64 = 0.01;

/// Values bound to the parameter panel's sliders. The panel edits these;
/// a committed change is pushed into the light through [`set_intensity`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightSettings {
    pub dir_intensity: f32,
    pub spot_intensity: f32,
    pub point_intensity: f32,
}

impl LightSettings {
    /// Snapshot the current light intensities.
    pub fn from_lights(lights: &Lights) -> Self {
        Self {
            dir_intensity: lights.intensity(LightKind::Directional),
            spot_intensity: lights.intensity(LightKind::Spot),
            point_intensity: lights.intensity(LightKind::Point),
        }
    }

    pub fn value_mut(&mut self, kind: LightKind) -> &mut f32 {
        match kind {
            LightKind::Directional => &mut self.dir_intensity,
            LightKind::Spot => &mut self.spot_intensity,
            LightKind::Point => &mut self.point_intensity,
        }
    }
}

/// Assign `value` to one light's intensity, leaving the others untouched.
pub fn set_intensity(lights: &mut Lights, kind: LightKind, value: f32) {
    let value = if value.is_nan() { *INTENSITY_RANGE.start() } else { value };
    let value = value.clamp(*INTENSITY_RANGE.start(), *INTENSITY_RANGE.end());
    *lights.intensity_mut(kind) = value;
    tracing::debug!(light = kind.label(), intensity = value, "light intensity changed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_mirror_lights() {
        let lights = Lights::default();
        let settings = LightSettings::from_lights(&lights);
        assert_eq!(settings.dir_intensity, 0.4);
        assert_eq!(settings.spot_intensity, 0.4);
        assert_eq!(settings.point_intensity, 0.3);
    }

    #[test]
    fn test_each_setter_touches_only_its_light() {
        for kind in LightKind::ALL {
            let mut lights = Lights::default();
            let before = LightSettings::from_lights(&lights);
            set_intensity(&mut lights, kind, 1.37);
            assert_eq!(lights.intensity(kind), 1.37);
            for other in LightKind::ALL.into_iter().filter(|k| *k != kind) {
                let mut expected = before;
                assert_eq!(lights.intensity(other), *expected.value_mut(other));
            }
        }
    }

    #[test]
    fn test_range_endpoints_and_clamping() {
        let mut lights = Lights::default();
        set_intensity(&mut lights, LightKind::Point, 0.0);
        assert_eq!(lights.point.intensity, 0.0);
        set_intensity(&mut lights, LightKind::Point, 2.0);
        assert_eq!(lights.point.intensity, 2.0);
        set_intensity(&mut lights, LightKind::Point, 5.0);
        assert_eq!(lights.point.intensity, 2.0);
        set_intensity(&mut lights, LightKind::Point, -1.0);
        assert_eq!(lights.point.intensity, 0.0);
        set_intensity(&mut lights, LightKind::Point, f32::NAN);
        assert_eq!(lights.point.intensity, 0.0);
    }
}
