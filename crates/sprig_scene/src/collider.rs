//! Collider shapes and the pairwise overlap test.
//!
//! A node carrying a [`Shape`] is a collider. For testing, the shape is
//! resolved against the node's global transform into a [`WorldShape`], and
//! the pair is matched in one place so every (circle, rectangle) combination
//! is handled symmetrically.
//!
//! Rectangles are always axis-aligned in world space: rotation on the node or
//! any ancestor is ignored. Circles scale by the larger of the two global
//! scale factors. Touching counts as overlapping.

use glam::Vec2;

use crate::transform::Transform2D;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Circle { radius: f32 },
    Rectangle { half_extents: Vec2 },
}

impl Shape {
    pub fn circle(radius: f32) -> Self {
        Shape::Circle { radius }
    }

    /// Rectangle from its full size.
    pub fn rectangle(size: Vec2) -> Self {
        Shape::Rectangle {
            half_extents: size * 0.5,
        }
    }

    pub fn to_world(&self, global: &Transform2D) -> WorldShape {
        match *self {
            Shape::Circle { radius } => WorldShape::Circle {
                center: global.position,
                radius: radius * global.max_scale(),
            },
            Shape::Rectangle { half_extents } => WorldShape::Rectangle {
                center: global.position,
                half_extents: half_extents * global.scale.abs(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldShape {
    Circle { center: Vec2, radius: f32 },
    Rectangle { center: Vec2, half_extents: Vec2 },
}

impl WorldShape {
    pub fn intersects(&self, other: &WorldShape) -> bool {
        match (*self, *other) {
            (
                WorldShape::Circle { center: a, radius: ra },
                WorldShape::Circle { center: b, radius: rb },
            ) => {
                let combined = ra + rb;
                a.distance_squared(b) <= combined * combined
            }
            (
                WorldShape::Circle { center, radius },
                WorldShape::Rectangle {
                    center: rect_center,
                    half_extents,
                },
            )
            | (
                WorldShape::Rectangle {
                    center: rect_center,
                    half_extents,
                },
                WorldShape::Circle { center, radius },
            ) => circle_rect(center, radius, rect_center, half_extents),
            (
                WorldShape::Rectangle {
                    center: a,
                    half_extents: ha,
                },
                WorldShape::Rectangle {
                    center: b,
                    half_extents: hb,
                },
            ) => {
                let delta = (a - b).abs();
                let reach = ha + hb;
                delta.x <= reach.x && delta.y <= reach.y
            }
        }
    }
}

fn circle_rect(center: Vec2, radius: f32, rect_center: Vec2, half_extents: Vec2) -> bool {
    let closest = center.clamp(rect_center - half_extents, rect_center + half_extents);
    center.distance_squared(closest) <= radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f32, y: f32) -> Transform2D {
        Transform2D::from_position(Vec2::new(x, y))
    }

    fn world(shape: Shape, x: f32, y: f32) -> WorldShape {
        shape.to_world(&at(x, y))
    }

    #[test]
    fn circles_overlap_within_combined_radius() {
        let a = world(Shape::circle(10.0), 0.0, 0.0);
        assert!(a.intersects(&world(Shape::circle(5.0), 14.0, 0.0)));
        assert!(a.intersects(&world(Shape::circle(5.0), 15.0, 0.0)));
        assert!(!a.intersects(&world(Shape::circle(5.0), 16.0, 0.0)));
    }

    #[test]
    fn rectangles_overlap_until_separated() {
        let size = Vec2::new(32.0, 32.0);
        let a = world(Shape::rectangle(size), 0.0, 0.0);
        assert!(a.intersects(&world(Shape::rectangle(size), 31.0, 0.0)));
        assert!(!a.intersects(&world(Shape::rectangle(size), 33.0, 0.0)));
        assert!(!a.intersects(&world(Shape::rectangle(size), 0.0, -40.0)));
    }

    #[test]
    fn circle_rectangle_is_symmetric() {
        let rect = world(Shape::rectangle(Vec2::new(20.0, 10.0)), 0.0, 0.0);
        let near_corner = world(Shape::circle(3.0), 12.0, 7.0);
        let far_corner = world(Shape::circle(3.0), 13.0, 8.0);
        assert!(rect.intersects(&near_corner));
        assert!(near_corner.intersects(&rect));
        assert!(!rect.intersects(&far_corner));
        assert!(!far_corner.intersects(&rect));
    }

    #[test]
    fn circle_inside_rectangle_overlaps() {
        let rect = world(Shape::rectangle(Vec2::new(100.0, 100.0)), 0.0, 0.0);
        let circle = world(Shape::circle(1.0), 5.0, 5.0);
        assert!(circle.intersects(&rect));
    }

    #[test]
    fn circle_radius_uses_larger_scale_factor() {
        let global = Transform2D {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::new(1.0, 3.0),
        };
        match Shape::circle(2.0).to_world(&global) {
            WorldShape::Circle { radius, .. } => assert_eq!(radius, 6.0),
            other => panic!("unexpected shape {other:?}"),
        }
    }

    #[test]
    fn rectangle_ignores_rotation_and_uses_absolute_scale() {
        let global = Transform2D {
            position: Vec2::new(1.0, 2.0),
            rotation: 0.7,
            scale: Vec2::new(-2.0, 1.0),
        };
        match Shape::rectangle(Vec2::new(10.0, 4.0)).to_world(&global) {
            WorldShape::Rectangle {
                center,
                half_extents,
            } => {
                assert_eq!(center, Vec2::new(1.0, 2.0));
                assert_eq!(half_extents, Vec2::new(10.0, 2.0));
            }
            other => panic!("unexpected shape {other:?}"),
        }
    }
}
