use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A segment or ray in a line collection's local space.
///
/// When `is_fixed_point` is false, `arbitrary_vector` is a direction and the
/// endpoint lies `length` units along it from the origin. When true,
/// `arbitrary_vector` is an absolute world-space endpoint that does not move
/// with the collection offset (the origin still does).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub origin: Vec2,
    pub arbitrary_vector: Vec2,
    pub length: f32,
    pub can_be_restricted: bool,
    pub is_fixed_point: bool,
}

impl Line {
    /// Directed line: the endpoint is `length` units along `direction` from
    /// the origin.
    pub fn directed(origin: Vec2, direction: Vec2, length: f32) -> Self {
        Self {
            origin,
            arbitrary_vector: direction,
            length,
            can_be_restricted: true,
            is_fixed_point: false,
        }
    }

    /// Line anchored to an absolute world endpoint.
    pub fn fixed(origin: Vec2, endpoint: Vec2) -> Self {
        Self {
            origin,
            arbitrary_vector: endpoint,
            length: (endpoint - origin).length(),
            can_be_restricted: true,
            is_fixed_point: true,
        }
    }

    pub fn world_origin(&self, offset: Vec2) -> Vec2 {
        self.origin + offset
    }

    /// Resolved world-space endpoint under the given collection offset.
    pub fn endpoint(&self, offset: Vec2) -> Vec2 {
        if self.is_fixed_point {
            self.arbitrary_vector
        } else {
            self.world_origin(offset) + self.arbitrary_vector.normalize_or_zero() * self.length
        }
    }

    /// Length from the world origin to the resolved endpoint.
    pub fn effective_length(&self, offset: Vec2) -> f32 {
        if self.is_fixed_point {
            (self.arbitrary_vector - self.world_origin(offset)).length()
        } else {
            self.length
        }
    }

    /// Vector from the world origin to the resolved endpoint.
    pub fn displacement(&self, offset: Vec2) -> Vec2 {
        self.endpoint(offset) - self.world_origin(offset)
    }
}

/// Lines grouped under a shared world offset.
///
/// One line may be designated the velocity line; [`LineCollection::apply_velocity`]
/// folds its displacement into the collection offset so the next tick starts
/// from the moved position without any per-line recomputation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineCollection {
    pub lines: Vec<Line>,
    pub offset: Vec2,
    pub velocity_line: Option<usize>,
}

impl LineCollection {
    pub fn new(offset: Vec2) -> Self {
        Self {
            offset,
            ..Default::default()
        }
    }

    /// Append a line, returning its index within the collection.
    pub fn push_line(&mut self, line: Line) -> usize {
        self.lines.push(line);
        self.lines.len() - 1
    }

    /// Displacement of the velocity line, or zero when none is set or the
    /// index is out of range.
    pub fn velocity_displacement(&self) -> Vec2 {
        self.velocity_line
            .and_then(|index| self.lines.get(index))
            .map(|line| line.displacement(self.offset))
            .unwrap_or(Vec2::ZERO)
    }

    /// Fold the velocity line's displacement into the collection offset.
    pub fn apply_velocity(&mut self) {
        self.offset += self.velocity_displacement();
    }
}
