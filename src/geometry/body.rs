use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::geometry::polygon::CollisionPolygon;

/// Smallest vertex count a polygonized circle may carry.
pub const MIN_CIRCLE_SEGMENTS: u32 = 3;
/// Largest vertex count a polygonized circle may carry. Matches the vertex
/// budget the compute kernels reserve per part polygon.
pub const MAX_CIRCLE_SEGMENTS: u32 = 16;

/// One convex primitive in a body's local space.
///
/// Parts are built through the shape factories, which normalize inputs:
/// radii and extents are stored absolute, circle vertex counts are clamped
/// to [`MIN_CIRCLE_SEGMENTS`, `MAX_CIRCLE_SEGMENTS`], and triangle vertices
/// are reordered into a counter-clockwise loop. A part is immutable once
/// constructed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BodyPart {
    /// Circle approximated by a regular polygon with `segments` vertices.
    Circle {
        center: Vec2,
        radius: f32,
        segments: u32,
    },
    /// Rectangle with half extents, rotated by `rotation` radians about its
    /// center.
    Rect {
        center: Vec2,
        half_width: f32,
        half_height: f32,
        rotation: f32,
    },
    /// Triangle with vertices `center`, `center + b`, `center + c`.
    Triangle { center: Vec2, b: Vec2, c: Vec2 },
}

impl BodyPart {
    pub fn circle(center: Vec2, radius: f32, segments: u32) -> Self {
        Self::Circle {
            center,
            radius: radius.abs(),
            segments: segments.clamp(MIN_CIRCLE_SEGMENTS, MAX_CIRCLE_SEGMENTS),
        }
    }

    pub fn rect(center: Vec2, width: f32, height: f32, rotation: f32) -> Self {
        Self::Rect {
            center,
            half_width: width.abs() / 2.0,
            half_height: height.abs() / 2.0,
            rotation,
        }
    }

    /// Build a triangle from three absolute vertices. `a` becomes the part
    /// center; the other two are stored relative to it, swapped when needed
    /// so the loop winds counter-clockwise.
    pub fn triangle(a: Vec2, b: Vec2, c: Vec2) -> Self {
        let b = b - a;
        let c = c - a;
        if b.perp_dot(c) < 0.0 {
            Self::Triangle { center: a, b: c, c: b }
        } else {
            Self::Triangle { center: a, b, c }
        }
    }

    pub fn center(&self) -> Vec2 {
        match *self {
            Self::Circle { center, .. } => center,
            Self::Rect { center, .. } => center,
            Self::Triangle { center, .. } => center,
        }
    }

    /// Expand the part into its collision polygon in body-local space.
    ///
    /// The compute kernels rebuild the same vertex loops from the part
    /// records, so the construction order here is load-bearing.
    pub fn polygonize(&self) -> CollisionPolygon {
        match *self {
            Self::Circle {
                center,
                radius,
                segments,
            } => {
                let vertices = (0..segments)
                    .map(|i| {
                        let angle = i as f32 * std::f32::consts::TAU / segments as f32;
                        center + radius * Vec2::from_angle(angle)
                    })
                    .collect();
                CollisionPolygon::new(vertices)
            }
            Self::Rect {
                center,
                half_width,
                half_height,
                rotation,
            } => {
                let rotor = Vec2::from_angle(rotation);
                let vertices = [
                    Vec2::new(-half_width, -half_height),
                    Vec2::new(half_width, -half_height),
                    Vec2::new(half_width, half_height),
                    Vec2::new(-half_width, half_height),
                ]
                .iter()
                .map(|&corner| center + rotor.rotate(corner))
                .collect();
                CollisionPolygon::new(vertices)
            }
            Self::Triangle { center, b, c } => {
                CollisionPolygon::new(vec![center, center + b, center + c])
            }
        }
    }
}

/// A rigid body: an ordered union of convex parts under one world offset.
///
/// The collision polygon for each part is derived once when the part is
/// pushed. `broad_radius` tracks the farthest vertex from the body origin;
/// it only grows as parts are added and is reset by [`Body::clear`].
#[derive(Debug, Clone, Default)]
pub struct Body {
    parts: Vec<BodyPart>,
    polygons: Vec<CollisionPolygon>,
    offset: Vec2,
    broad_radius: f32,
}

impl Body {
    pub fn new(offset: Vec2) -> Self {
        Self {
            offset,
            ..Default::default()
        }
    }

    pub fn push_part(&mut self, part: BodyPart) {
        let polygon = part.polygonize();
        self.broad_radius = self.broad_radius.max(polygon.max_radius());
        self.parts.push(part);
        self.polygons.push(polygon);
    }

    pub fn clear(&mut self) {
        self.parts.clear();
        self.polygons.clear();
        self.broad_radius = 0.0;
    }

    pub fn parts(&self) -> &[BodyPart] {
        &self.parts
    }

    /// Cached collision polygons, index-aligned with [`Body::parts`].
    pub fn polygons(&self) -> &[CollisionPolygon] {
        &self.polygons
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn set_offset(&mut self, offset: Vec2) {
        self.offset = offset;
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    pub fn broad_radius(&self) -> f32 {
        self.broad_radius
    }

    /// Broad-phase pre-check: true when the bounding circles of the two
    /// bodies overlap.
    pub fn is_within_narrow_range(&self, other: &Body) -> bool {
        let combined = self.broad_radius + other.broad_radius;
        self.offset.distance_squared(other.offset) < combined * combined
    }
}
