//! Decomposed 2-D transform: position, rotation (radians), non-uniform scale.

use glam::{Affine2, Vec2};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    pub position: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
}

impl Transform2D {
    pub const IDENTITY: Self = Self {
        position: Vec2::ZERO,
        rotation: 0.0,
        scale: Vec2::ONE,
    };

    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    pub fn to_affine(&self) -> Affine2 {
        Affine2::from_scale_angle_translation(self.scale, self.rotation, self.position)
    }

    /// Split an affine back into components. Rotation comes from the
    /// transformed x axis and scale from the axis lengths. A mirrored basis
    /// (negative determinant) is expressed as a negative y scale. Shear, which
    /// can appear when a non-uniformly scaled parent has a rotated child, is
    /// not representable and is dropped.
    pub fn from_affine(affine: Affine2) -> Self {
        let x_axis = affine.matrix2.x_axis;
        let y_axis = affine.matrix2.y_axis;
        let rotation = x_axis.y.atan2(x_axis.x);
        let mut scale = Vec2::new(x_axis.length(), y_axis.length());
        if affine.matrix2.determinant() < 0.0 {
            scale.y = -scale.y;
        }
        Self {
            position: affine.translation,
            rotation,
            scale,
        }
    }

    /// `self` is the parent space, `child` is expressed relative to it.
    pub fn compose(&self, child: &Transform2D) -> Transform2D {
        Self::from_affine(self.to_affine() * child.to_affine())
    }

    pub fn transform_point(&self, point: Vec2) -> Vec2 {
        self.to_affine().transform_point2(point)
    }

    /// Largest absolute scale factor; used for uniformly scaled shapes.
    pub fn max_scale(&self) -> f32 {
        self.scale.x.abs().max(self.scale.y.abs())
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::FRAC_PI_2;

    fn assert_close(a: Transform2D, b: Transform2D) {
        assert_abs_diff_eq!(a.position.x, b.position.x, epsilon = 1e-4);
        assert_abs_diff_eq!(a.position.y, b.position.y, epsilon = 1e-4);
        assert_abs_diff_eq!(a.rotation, b.rotation, epsilon = 1e-4);
        assert_abs_diff_eq!(a.scale.x, b.scale.x, epsilon = 1e-4);
        assert_abs_diff_eq!(a.scale.y, b.scale.y, epsilon = 1e-4);
    }

    #[test]
    fn identity_parent_is_neutral() {
        let child = Transform2D {
            position: Vec2::new(3.0, -2.0),
            rotation: 0.5,
            scale: Vec2::new(2.0, 1.5),
        };
        assert_close(Transform2D::IDENTITY.compose(&child), child);
    }

    #[test]
    fn rotated_parent_rotates_child_offset() {
        let parent = Transform2D {
            position: Vec2::new(10.0, 0.0),
            rotation: FRAC_PI_2,
            scale: Vec2::ONE,
        };
        let child = Transform2D::from_position(Vec2::new(5.0, 0.0));
        let global = parent.compose(&child);
        assert_abs_diff_eq!(global.position.x, 10.0, epsilon = 1e-4);
        assert_abs_diff_eq!(global.position.y, 5.0, epsilon = 1e-4);
        assert_abs_diff_eq!(global.rotation, FRAC_PI_2, epsilon = 1e-4);
    }

    #[test]
    fn scaled_parent_scales_child_offset_and_size() {
        let parent = Transform2D {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::new(2.0, 3.0),
        };
        let child = Transform2D {
            position: Vec2::new(1.0, 1.0),
            rotation: 0.0,
            scale: Vec2::new(0.5, 2.0),
        };
        let global = parent.compose(&child);
        assert_abs_diff_eq!(global.position.x, 2.0, epsilon = 1e-4);
        assert_abs_diff_eq!(global.position.y, 3.0, epsilon = 1e-4);
        assert_abs_diff_eq!(global.scale.x, 1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(global.scale.y, 6.0, epsilon = 1e-4);
    }

    #[test]
    fn decomposition_round_trips_rotation_and_scale() {
        let t = Transform2D {
            position: Vec2::new(-4.0, 7.0),
            rotation: 1.2,
            scale: Vec2::new(3.0, 0.5),
        };
        assert_close(Transform2D::from_affine(t.to_affine()), t);
    }

    #[test]
    fn mirrored_basis_keeps_its_orientation() {
        let flipped = Transform2D {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::new(-2.0, 2.0),
        };
        let decomposed = Transform2D::from_affine(flipped.to_affine());
        let point = Vec2::new(1.0, 1.0);
        let expected = flipped.transform_point(point);
        let actual = decomposed.transform_point(point);
        assert_abs_diff_eq!(actual.x, expected.x, epsilon = 1e-4);
        assert_abs_diff_eq!(actual.y, expected.y, epsilon = 1e-4);
        assert_abs_diff_eq!(decomposed.max_scale(), 2.0, epsilon = 1e-4);
    }
}
