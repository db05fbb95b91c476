use glam::Vec2;

/// Segments closer to parallel than this are treated as non-intersecting.
pub const PARALLEL_EPSILON: f32 = 1e-6;

/// Intersection point of segments `p0..p1` and `q0..q1`, if any.
///
/// Uses the parametric cross-product form: both progress parameters must
/// land in `[0, 1]`, endpoint contact included. Parallel segments never
/// intersect, and collinear segments are also reported as non-intersecting
/// even when they overlap; callers that need a degenerate overlap range
/// must test for it separately.
pub fn segment_intersection(p0: Vec2, p1: Vec2, q0: Vec2, q1: Vec2) -> Option<Vec2> {
    let dp = p1 - p0;
    let dq = q1 - q0;
    let diff = q0 - p0;

    let denominator = dp.perp_dot(dq);
    if denominator.abs() < PARALLEL_EPSILON {
        // Covers both the parallel case and the collinear case (where the
        // t_q numerator is also near zero).
        return None;
    }

    let t_p = diff.perp_dot(dq) / denominator;
    let t_q = diff.perp_dot(dp) / denominator;
    if !(0.0..=1.0).contains(&t_p) || !(0.0..=1.0).contains(&t_q) {
        return None;
    }

    Some(q0 + dq * t_q)
}
