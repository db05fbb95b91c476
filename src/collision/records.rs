//! GPU Wire Records
//!
//! Plain-old-data structs shared between the CPU staging path and the WGSL
//! kernels. Field order, widths and padding must match the shader struct
//! declarations byte for byte; the layout tests below pin the sizes.

use glam::Vec2;

use crate::geometry::body::{Body, BodyPart};
use crate::geometry::line::{Line, LineCollection};

/// Shape tag for a circle part: `decimals[0]` = radius, `ints[0]` = segments.
pub const SHAPE_CIRCLE: i32 = 0;
/// Shape tag for a rectangle part: `decimals` = [half_width, half_height, rotation, 0].
pub const SHAPE_RECT: i32 = 1;
/// Shape tag for a triangle part: `decimals` = [b.x, b.y, c.x, c.y] relative to center.
pub const SHAPE_TRIANGLE: i32 = 2;

/// Line flag bit: the line participates in restriction.
pub const LINE_FLAG_RESTRICTABLE: u32 = 1;
/// Line flag bit: `arbitrary_vector` is an absolute world anchor.
pub const LINE_FLAG_FIXED_POINT: u32 = 2;

/// One shape part, flattened for the part storage buffer (48 bytes)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BodyPartRecord {
    /// Slot of the owning body in the body buffer
    pub body_index: i32,
    /// One of the SHAPE_* tags
    pub shape_type: i32,
    /// Part center relative to the body origin
    pub center: [f32; 2],
    /// Shape-specific float payload, meaning keyed by `shape_type`
    pub decimals: [f32; 4],
    /// Shape-specific integer payload
    pub ints: [i32; 2],
    pub _pad: [i32; 2],
}

impl BodyPartRecord {
    pub fn encode(part: &BodyPart, body_slot: usize) -> Self {
        let body_index = body_slot as i32;
        match *part {
            BodyPart::Circle {
                center,
                radius,
                segments,
            } => Self {
                body_index,
                shape_type: SHAPE_CIRCLE,
                center: center.to_array(),
                decimals: [radius, 0.0, 0.0, 0.0],
                ints: [segments as i32, 0],
                _pad: [0; 2],
            },
            BodyPart::Rect {
                center,
                half_width,
                half_height,
                rotation,
            } => Self {
                body_index,
                shape_type: SHAPE_RECT,
                center: center.to_array(),
                decimals: [half_width, half_height, rotation, 0.0],
                ints: [0; 2],
                _pad: [0; 2],
            },
            BodyPart::Triangle { center, b, c } => Self {
                body_index,
                shape_type: SHAPE_TRIANGLE,
                center: center.to_array(),
                decimals: [b.x, b.y, c.x, c.y],
                ints: [0; 2],
                _pad: [0; 2],
            },
        }
    }
}

/// One body in the body storage buffer (16 bytes)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BodyRecord {
    /// First part slot in the part buffer
    pub part_start: i32,
    /// Number of consecutive parts
    pub part_len: i32,
    /// World offset applied to every part
    pub offset: [f32; 2],
}

impl BodyRecord {
    pub fn encode(body: &Body, part_start: usize, part_len: usize) -> Self {
        Self {
            part_start: part_start as i32,
            part_len: part_len as i32,
            offset: body.offset().to_array(),
        }
    }

    pub fn offset_vec(&self) -> Vec2 {
        Vec2::from_array(self.offset)
    }
}

/// One line in the line storage buffer (24 bytes)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineRecord {
    /// Origin relative to the collection offset
    pub origin: [f32; 2],
    /// Direction for directed lines, absolute anchor for fixed-point lines
    pub arbitrary_vector: [f32; 2],
    /// Nominal length; ignored when the fixed-point flag is set
    pub length: f32,
    /// LINE_FLAG_* bits
    pub flags: u32,
}

impl LineRecord {
    pub fn encode(line: &Line) -> Self {
        let mut flags = 0;
        if line.can_be_restricted {
            flags |= LINE_FLAG_RESTRICTABLE;
        }
        if line.is_fixed_point {
            flags |= LINE_FLAG_FIXED_POINT;
        }
        Self {
            origin: line.origin.to_array(),
            arbitrary_vector: line.arbitrary_vector.to_array(),
            length: line.length,
            flags,
        }
    }

    pub fn is_restrictable(&self) -> bool {
        self.flags & LINE_FLAG_RESTRICTABLE != 0
    }

    pub fn is_fixed_point(&self) -> bool {
        self.flags & LINE_FLAG_FIXED_POINT != 0
    }
}

/// One line collection in the collection storage buffer (24 bytes)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineCollectionRecord {
    /// First line slot in the line buffer
    pub line_start: i32,
    /// Number of consecutive lines
    pub line_len: i32,
    /// World offset applied to every line origin
    pub offset: [f32; 2],
    /// Absolute slot of the velocity line, -1 when unset
    pub velocity_line: i32,
    pub _pad: i32,
}

impl LineCollectionRecord {
    pub fn encode(collection: &LineCollection, line_start: usize, line_len: usize) -> Self {
        // Out-of-range indices encode as "no velocity line", matching the
        // scalar path's lookup semantics.
        let velocity_line = match collection.velocity_line {
            Some(index) if index < line_len => (line_start + index) as i32,
            _ => -1,
        };
        Self {
            line_start: line_start as i32,
            line_len: line_len as i32,
            offset: collection.offset.to_array(),
            velocity_line,
            _pad: 0,
        }
    }

    pub fn offset_vec(&self) -> Vec2 {
        Vec2::from_array(self.offset)
    }
}

/// One surviving combination appended by a detection kernel (8 bytes)
///
/// Indices are relative to the dispatched ranges, not buffer slots.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct HitRecord {
    pub index_a: i32,
    pub index_b: i32,
}

/// One resolved translation written by the resolve kernel (16 bytes)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ResolutionRecord {
    /// Absolute slot of the movable body
    pub body_index: i32,
    pub _pad: i32,
    pub translation: [f32; 2],
}

impl ResolutionRecord {
    pub fn translation_vec(&self) -> Vec2 {
        Vec2::from_array(self.translation)
    }
}

/// One exempted (body, collection) combination in the pair table (8 bytes)
///
/// Indices are relative to the dispatched ranges.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PairRecord {
    pub body_index: i32,
    pub collection_index: i32,
}

/// Per-dispatch uniform parameters (32 bytes)
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DispatchParams {
    /// First slot and length of group A (bodies or collections)
    pub a_start: u32,
    pub a_len: u32,
    /// First slot and length of group B (always bodies)
    pub b_start: u32,
    pub b_len: u32,
    /// Hit capacity of the result buffer, in records
    pub result_capacity: u32,
    /// Number of live entries in the pair table
    pub pair_count: u32,
    /// Resolve iteration cap
    pub resolve_iterations: u32,
    /// Penetrations at or below this depth are left alone
    pub penetration_epsilon: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_record_sizes_match_the_shader_layouts() {
        assert_eq!(std::mem::size_of::<BodyPartRecord>(), 48);
        assert_eq!(std::mem::size_of::<BodyRecord>(), 16);
        assert_eq!(std::mem::size_of::<LineRecord>(), 24);
        assert_eq!(std::mem::size_of::<LineCollectionRecord>(), 24);
        assert_eq!(std::mem::size_of::<HitRecord>(), 8);
        assert_eq!(std::mem::size_of::<ResolutionRecord>(), 16);
        assert_eq!(std::mem::size_of::<PairRecord>(), 8);
        assert_eq!(std::mem::size_of::<DispatchParams>(), 32);
    }

    #[test]
    fn test_circle_parts_carry_radius_and_segments() {
        let part = BodyPart::circle(Vec2::new(1.0, 2.0), 3.0, 8);
        let record = BodyPartRecord::encode(&part, 5);
        assert_eq!(record.body_index, 5);
        assert_eq!(record.shape_type, SHAPE_CIRCLE);
        assert_eq!(record.center, [1.0, 2.0]);
        assert_eq!(record.decimals[0], 3.0);
        assert_eq!(record.ints[0], 8);
    }

    #[test]
    fn test_rect_parts_carry_half_extents_and_rotation() {
        let part = BodyPart::rect(Vec2::ZERO, 4.0, 2.0, 0.5);
        let record = BodyPartRecord::encode(&part, 0);
        assert_eq!(record.shape_type, SHAPE_RECT);
        assert_eq!(record.decimals, [2.0, 1.0, 0.5, 0.0]);
    }

    #[test]
    fn test_triangle_parts_carry_relative_legs() {
        let part = BodyPart::triangle(
            Vec2::new(1.0, 1.0),
            Vec2::new(3.0, 1.0),
            Vec2::new(1.0, 4.0),
        );
        let record = BodyPartRecord::encode(&part, 0);
        assert_eq!(record.shape_type, SHAPE_TRIANGLE);
        assert_eq!(record.decimals, [2.0, 0.0, 0.0, 3.0]);
    }

    #[test]
    fn test_line_flags_round_trip() {
        let directed = LineRecord::encode(&Line::directed(Vec2::ZERO, Vec2::X, 5.0));
        assert!(directed.is_restrictable());
        assert!(!directed.is_fixed_point());

        let fixed = LineRecord::encode(&Line::fixed(Vec2::ZERO, Vec2::new(3.0, 4.0)));
        assert!(fixed.is_restrictable());
        assert!(fixed.is_fixed_point());
        assert_eq!(fixed.arbitrary_vector, [3.0, 4.0]);

        let mut frozen = Line::directed(Vec2::ZERO, Vec2::X, 5.0);
        frozen.can_be_restricted = false;
        assert!(!LineRecord::encode(&frozen).is_restrictable());
    }

    #[test]
    fn test_velocity_line_rebases_to_the_absolute_slot() {
        let mut collection = LineCollection::new(Vec2::ZERO);
        collection.push_line(Line::directed(Vec2::ZERO, Vec2::X, 1.0));
        let index = collection.push_line(Line::directed(Vec2::ZERO, Vec2::Y, 1.0));
        collection.velocity_line = Some(index);

        let record = LineCollectionRecord::encode(&collection, 10, collection.lines.len());
        assert_eq!(record.velocity_line, 11);
    }

    #[test]
    fn test_missing_or_stale_velocity_lines_encode_as_none() {
        let mut collection = LineCollection::new(Vec2::ZERO);
        collection.push_line(Line::directed(Vec2::ZERO, Vec2::X, 1.0));

        let unset = LineCollectionRecord::encode(&collection, 0, 1);
        assert_eq!(unset.velocity_line, -1);

        collection.velocity_line = Some(7);
        let stale = LineCollectionRecord::encode(&collection, 0, 1);
        assert_eq!(stale.velocity_line, -1);
    }
}
