//! Light definitions for the scene, including the cameras their shadow maps
//! are rendered from.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Mat4, Vec3};

/// Number of shadow map layers: directional, spot, then six point faces.
pub const SHADOW_LAYERS: usize = 8;
pub const DIRECTIONAL_LAYER: usize = 0;
pub const SPOT_LAYER: usize = 1;
pub const POINT_LAYER_BASE: usize = 2;

const SHADOW_NEAR: f32 = 0.5;
const SHADOW_FAR: f32 = 500.0;

/// The three lights the parameter panel controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LightKind {
    Directional,
    Spot,
    Point,
}

impl LightKind {
    pub const ALL: [LightKind; 3] = [LightKind::Directional, LightKind::Spot, LightKind::Point];

    pub fn label(self) -> &'static str {
        match self {
            LightKind::Directional => "Directional Light",
            LightKind::Spot => "Spot Light",
            LightKind::Point => "Point Light",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct AmbientLight {
    pub color: Vec3,
    pub intensity: f32,
}

/// Sun-like light shining from `position` towards `target`.
#[derive(Clone, Copy, Debug)]
pub struct DirectionalLight {
    pub color: Vec3,
    pub intensity: f32,
    pub position: Vec3,
    pub target: Vec3,
    pub cast_shadow: bool,
    /// Half size of the orthographic shadow frustum.
    pub shadow_extent: f32,
}

impl DirectionalLight {
    /// Unit vector pointing from the surface towards the light.
    pub fn direction(&self) -> Vec3 {
        (self.position - self.target).try_normalize().unwrap_or(Vec3::Y)
    }

    pub fn shadow_view_proj(&self) -> Mat4 {
        let e = self.shadow_extent;
        let proj = Mat4::orthographic_rh(-e, e, -e, e, SHADOW_NEAR, SHADOW_FAR);
        proj * look_at(self.position, self.target)
    }
}

/// Cone light with a hard edge (no penumbra) and a distance cutoff.
#[derive(Clone, Copy, Debug)]
pub struct SpotLight {
    pub color: Vec3,
    pub intensity: f32,
    pub position: Vec3,
    pub target: Vec3,
    /// Range after which the light contributes nothing; 0 means unbounded.
    pub distance: f32,
    /// Half angle of the cone in radians.
    pub angle: f32,
    pub penumbra: f32,
    pub decay: f32,
    pub cast_shadow: bool,
}

impl SpotLight {
    pub fn direction(&self) -> Vec3 {
        (self.target - self.position).try_normalize().unwrap_or(Vec3::NEG_Y)
    }

    pub fn shadow_view_proj(&self) -> Mat4 {
        let far = if self.distance > 0.0 { self.distance } else { SHADOW_FAR };
        let fov = (self.angle * 2.0).min(PI - 0.01);
        Mat4::perspective_rh(fov, 1.0, SHADOW_NEAR, far) * look_at(self.position, self.target)
    }
}

/// Omnidirectional light. Its shadow is six 90 degree faces, ordered
/// +X, -X, +Y, -Y, +Z, -Z.
#[derive(Clone, Copy, Debug)]
pub struct PointLight {
    pub color: Vec3,
    pub intensity: f32,
    pub position: Vec3,
    pub distance: f32,
    pub decay: f32,
    pub cast_shadow: bool,
}

const CUBE_FACE_DIRS: [Vec3; 6] = [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z];

impl PointLight {
    pub fn shadow_view_projs(&self) -> [Mat4; 6] {
        let proj = Mat4::perspective_rh(FRAC_PI_2, 1.0, SHADOW_NEAR, SHADOW_FAR);
        CUBE_FACE_DIRS.map(|dir| proj * look_at(self.position, self.position + dir))
    }

    /// Index of the cube face that sees `to_fragment`, by dominant axis.
    pub fn face_for(to_fragment: Vec3) -> usize {
        let a = to_fragment.abs();
        if a.x >= a.y && a.x >= a.z {
            if to_fragment.x >= 0.0 { 0 } else { 1 }
        } else if a.y >= a.z {
            if to_fragment.y >= 0.0 { 2 } else { 3 }
        } else if to_fragment.z >= 0.0 {
            4
        } else {
            5
        }
    }
}

/// All lights in the scene.
#[derive(Clone, Copy, Debug)]
pub struct Lights {
    pub ambient: AmbientLight,
    pub directional: DirectionalLight,
    pub spot: SpotLight,
    pub point: PointLight,
}

impl Default for Lights {
    fn default() -> Self {
        Self {
            ambient: AmbientLight { color: Vec3::ONE, intensity: 0.3 },
            directional: DirectionalLight {
                color: Vec3::ONE,
                intensity: 0.4,
                position: Vec3::new(2.0, 2.0, -1.0),
                target: Vec3::ZERO,
                cast_shadow: true,
                shadow_extent: 5.0,
            },
            spot: SpotLight {
                color: Vec3::ONE,
                intensity: 0.4,
                position: Vec3::new(0.0, 2.0, 2.0),
                target: Vec3::ZERO,
                distance: 10.0,
                angle: PI * 0.3,
                penumbra: 0.0,
                decay: 2.0,
                cast_shadow: true,
            },
            point: PointLight {
                color: Vec3::ONE,
                intensity: 0.3,
                position: Vec3::new(-1.0, 1.0, 0.0),
                distance: 0.0,
                decay: 2.0,
                cast_shadow: true,
            },
        }
    }
}

impl Lights {
    pub fn intensity(&self, kind: LightKind) -> f32 {
        match kind {
            LightKind::Directional => self.directional.intensity,
            LightKind::Spot => self.spot.intensity,
            LightKind::Point => self.point.intensity,
        }
    }

    pub fn intensity_mut(&mut self, kind: LightKind) -> &mut f32 {
        match kind {
            LightKind::Directional => &mut self.directional.intensity,
            LightKind::Spot => &mut self.spot.intensity,
            LightKind::Point => &mut self.point.intensity,
        }
    }

    /// Light-space matrices for every shadow layer.
    pub fn shadow_view_projs(&self) -> [Mat4; SHADOW_LAYERS] {
        let mut out = [Mat4::IDENTITY; SHADOW_LAYERS];
        out[DIRECTIONAL_LAYER] = self.directional.shadow_view_proj();
        out[SPOT_LAYER] = self.spot.shadow_view_proj();
        for (i, m) in self.point.shadow_view_projs().into_iter().enumerate() {
            out[POINT_LAYER_BASE + i] = m;
        }
        out
    }
}

/// `look_at_rh` with an up vector that is never parallel to the view axis.
fn look_at(eye: Vec3, target: Vec3) -> Mat4 {
    let dir = (target - eye).try_normalize().unwrap_or(Vec3::NEG_Z);
    let up = if dir.dot(Vec3::Y).abs() > 0.99 { Vec3::Z } else { Vec3::Y };
    Mat4::look_at_rh(eye, target, up)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_ndc(m: Mat4, p: Vec3) -> Vec3 {
        let clip = m * p.extend(1.0);
        clip.truncate() / clip.w
    }

    fn inside(ndc: Vec3) -> bool {
        ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0 && (0.0..=1.0).contains(&ndc.z)
    }

    #[test]
    fn test_directional_shadow_covers_ground() {
        let lights = Lights::default();
        let m = lights.directional.shadow_view_proj();
        assert!(inside(to_ndc(m, Vec3::ZERO)));
        assert!(inside(to_ndc(m, Vec3::new(1.5, 0.5, 0.0))));
        assert!(inside(to_ndc(m, Vec3::new(-1.5, 1.5, 1.5))));
    }

    #[test]
    fn test_spot_shadow_sees_target() {
        let lights = Lights::default();
        let ndc = to_ndc(lights.spot.shadow_view_proj(), lights.spot.target);
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
        assert!(inside(ndc));
    }

    #[test]
    fn test_point_face_selection_matches_frustum() {
        let light = Lights::default().point;
        let faces = light.shadow_view_projs();
        let probes = [
            Vec3::new(2.0, 0.3, -0.4),
            Vec3::new(-3.0, 1.0, 0.5),
            Vec3::new(0.2, 4.0, 0.1),
            Vec3::new(0.3, -0.9, 0.2),
            Vec3::new(0.1, 0.2, 1.0),
            Vec3::new(-0.5, 0.4, -2.0),
        ];
        for (expected, offset) in probes.into_iter().enumerate() {
            let face = PointLight::face_for(offset);
            assert_eq!(face, expected);
            assert!(inside(to_ndc(faces[face], light.position + offset)), "face {face}");
        }
    }

    #[test]
    fn test_intensity_accessors() {
        let mut lights = Lights::default();
        *lights.intensity_mut(LightKind::Spot) = 1.25;
        assert_eq!(lights.intensity(LightKind::Spot), 1.25);
        assert_eq!(lights.intensity(LightKind::Directional), 0.4);
        assert_eq!(lights.intensity(LightKind::Point), 0.3);
    }
}
