use glam::Vec2;

/// Derived, read-only collision geometry for one body part.
///
/// Vertices are stored counter-clockwise in body-local space with the part
/// center already folded in. Edge `i` runs from vertex `i` to vertex
/// `(i + 1) % len`, and each edge carries an outward unit normal.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionPolygon {
    vertices: Vec<Vec2>,
    normals: Vec<Vec2>,
}

impl CollisionPolygon {
    /// Build a polygon from a vertex loop.
    ///
    /// Clockwise input is reversed so the stored loop always winds
    /// counter-clockwise and every normal points outward.
    pub fn new(mut vertices: Vec<Vec2>) -> Self {
        if signed_area_doubled(&vertices) < 0.0 {
            vertices.reverse();
        }
        let normals = vertices
            .iter()
            .enumerate()
            .map(|(i, &vertex)| {
                let next = vertices[(i + 1) % vertices.len()];
                edge_normal(vertex, next)
            })
            .collect();
        Self { vertices, normals }
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// Outward unit normals, one per edge, in edge order.
    pub fn normals(&self) -> &[Vec2] {
        &self.normals
    }

    /// Edge `i` as a (start, end) vertex pair.
    pub fn edge(&self, i: usize) -> (Vec2, Vec2) {
        (self.vertices[i], self.vertices[(i + 1) % self.vertices.len()])
    }

    pub fn edge_count(&self) -> usize {
        self.vertices.len()
    }

    /// Distance from the body origin to the farthest vertex.
    pub fn max_radius(&self) -> f32 {
        self.vertices
            .iter()
            .map(|vertex| vertex.length())
            .fold(0.0, f32::max)
    }
}

/// Outward unit normal of the counter-clockwise edge from `a` to `b`.
pub fn edge_normal(a: Vec2, b: Vec2) -> Vec2 {
    let edge = b - a;
    Vec2::new(edge.y, -edge.x).normalize_or_zero()
}

/// Twice the signed area of the loop (positive when counter-clockwise).
fn signed_area_doubled(vertices: &[Vec2]) -> f32 {
    let mut area = 0.0;
    for (i, &vertex) in vertices.iter().enumerate() {
        let next = vertices[(i + 1) % vertices.len()];
        area += vertex.perp_dot(next);
    }
    area
}
