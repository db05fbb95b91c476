// Scalar reference collision engine
// The compute kernels mirror these functions one for one; this path anchors
// correctness and serves as the oracle for the dispatch tests.

use glam::Vec2;

use crate::collision::config::CollisionConfig;
use crate::collision::records::PairRecord;
use crate::geometry::body::Body;
use crate::geometry::intersect::segment_intersection;
use crate::geometry::line::{Line, LineCollection};
use crate::geometry::polygon::CollisionPolygon;

// ============================================================================
// SAT Primitives
// ============================================================================

/// Projection interval of a polygon onto a unit axis, world offset applied.
fn project_polygon(polygon: &CollisionPolygon, offset: Vec2, axis: Vec2) -> (f32, f32) {
    let mut lo = f32::INFINITY;
    let mut hi = f32::NEG_INFINITY;
    for &vertex in polygon.vertices() {
        let d = (vertex + offset).dot(axis);
        lo = lo.min(d);
        hi = hi.max(d);
    }
    (lo, hi)
}

/// True when the two projection intervals share no point. Touching bounds
/// count as shared.
fn intervals_separated(a: (f32, f32), b: (f32, f32)) -> bool {
    a.1 < b.0 || b.1 < a.0
}

/// True when none of `first`'s edge normals separates the two polygons.
fn no_separating_axis(
    first: &CollisionPolygon,
    first_offset: Vec2,
    second: &CollisionPolygon,
    second_offset: Vec2,
) -> bool {
    for &axis in first.normals() {
        let a = project_polygon(first, first_offset, axis);
        let b = project_polygon(second, second_offset, axis);
        if intervals_separated(a, b) {
            return false;
        }
    }
    true
}

/// Convex-convex SAT overlap test over both polygons' normal sets.
pub fn polygons_overlap(
    a: &CollisionPolygon,
    a_offset: Vec2,
    b: &CollisionPolygon,
    b_offset: Vec2,
) -> bool {
    no_separating_axis(a, a_offset, b, b_offset) && no_separating_axis(b, b_offset, a, a_offset)
}

/// Minimum translation vector that moves `a` out of `b`, or `None` when the
/// polygons are separated.
///
/// The magnitude is the penetration depth on the least-overlapping axis
/// drawn from either polygon's normal set; the direction pushes `a` toward
/// its own side of that axis.
pub fn polygon_mtv(
    a: &CollisionPolygon,
    a_offset: Vec2,
    b: &CollisionPolygon,
    b_offset: Vec2,
) -> Option<Vec2> {
    let mut best: Option<Vec2> = None;
    let mut best_depth = f32::INFINITY;

    for &axis in a.normals().iter().chain(b.normals().iter()) {
        let ia = project_polygon(a, a_offset, axis);
        let ib = project_polygon(b, b_offset, axis);
        if intervals_separated(ia, ib) {
            return None;
        }

        let push_down = ia.1 - ib.0; // separate by moving `a` along -axis
        let push_up = ib.1 - ia.0; // separate by moving `a` along +axis
        let (depth, push) = if push_down < push_up {
            (push_down, -axis * push_down)
        } else {
            (push_up, axis * push_up)
        };
        if depth < best_depth {
            best_depth = depth;
            best = Some(push);
        }
    }

    best
}

// ============================================================================
// Body Overlap
// ============================================================================

/// Full body-body overlap test: broad-phase radius reject, then SAT across
/// every part pair. Touching counts as overlapping.
pub fn bodies_overlap(a: &Body, b: &Body) -> bool {
    if !a.is_within_narrow_range(b) {
        return false;
    }
    for pa in a.polygons() {
        for pb in b.polygons() {
            if polygons_overlap(pa, a.offset(), pb, b.offset()) {
                return true;
            }
        }
    }
    false
}

// ============================================================================
// MTV Resolution
// ============================================================================

/// Smallest-depth MTV across every part pair of the movable body (tested at
/// `offset`) versus one obstacle, ignoring penetrations at or below
/// `epsilon`.
fn smallest_body_mtv(movable: &Body, offset: Vec2, obstacle: &Body, epsilon: f32) -> Option<Vec2> {
    let combined = movable.broad_radius() + obstacle.broad_radius();
    if offset.distance_squared(obstacle.offset()) >= combined * combined {
        return None;
    }

    let mut best: Option<Vec2> = None;
    let mut best_depth = f32::INFINITY;
    for pa in movable.polygons() {
        for pb in obstacle.polygons() {
            if let Some(push) = polygon_mtv(pa, offset, pb, obstacle.offset()) {
                let depth = push.length();
                if depth > epsilon && depth < best_depth {
                    best_depth = depth;
                    best = Some(push);
                }
            }
        }
    }
    best
}

fn resolve_body_against(
    movable: &Body,
    own_index: Option<usize>,
    obstacles: &[Body],
    config: &CollisionConfig,
) -> Vec2 {
    let mut offset = movable.offset();
    let mut total = Vec2::ZERO;

    for _ in 0..config.resolve_iterations {
        let mut step: Option<Vec2> = None;
        let mut step_depth = f32::INFINITY;
        for (index, obstacle) in obstacles.iter().enumerate() {
            if own_index == Some(index) {
                continue;
            }
            if let Some(push) =
                smallest_body_mtv(movable, offset, obstacle, config.penetration_epsilon)
            {
                let depth = push.length();
                if depth < step_depth {
                    step_depth = depth;
                    step = Some(push);
                }
            }
        }

        match step {
            Some(push) => {
                offset += push;
                total += push;
            }
            None => break,
        }
    }

    total
}

/// Accumulated translation that separates `movable` from all `obstacles`.
///
/// Each iteration applies the single smallest-depth MTV found across every
/// movable-part x obstacle-part pair, up to `config.resolve_iterations`
/// iterations or until nothing penetrates deeper than
/// `config.penetration_epsilon`. The movable body is not mutated; the caller
/// applies the returned translation.
pub fn resolve_body(movable: &Body, obstacles: &[Body], config: &CollisionConfig) -> Vec2 {
    resolve_body_against(movable, None, obstacles, config)
}

// ============================================================================
// Line Restriction
// ============================================================================

/// True when segment `p0..p1` crosses any edge of any part of `body`.
fn line_hits_body(p0: Vec2, p1: Vec2, body: &Body) -> bool {
    for polygon in body.polygons() {
        for i in 0..polygon.edge_count() {
            let (e0, e1) = polygon.edge(i);
            if segment_intersection(p0, p1, e0 + body.offset(), e1 + body.offset()).is_some() {
                return true;
            }
        }
    }
    false
}

/// Distance from `p0` to the nearest intersection of segment `p0..p1` with
/// any edge of `body`, or `None` when no edge crosses it.
fn body_clip_distance(p0: Vec2, p1: Vec2, body: &Body) -> Option<f32> {
    let mut best: Option<f32> = None;
    for polygon in body.polygons() {
        for i in 0..polygon.edge_count() {
            let (e0, e1) = polygon.edge(i);
            if let Some(point) =
                segment_intersection(p0, p1, e0 + body.offset(), e1 + body.offset())
            {
                let distance = p0.distance(point);
                if best.map_or(true, |b| distance < b) {
                    best = Some(distance);
                }
            }
        }
    }
    best
}

/// Clip one line against obstacle edges.
///
/// Returns the distance from the line's world origin to the nearest
/// intersected edge, or the line's effective length when nothing intersects
/// or the line opted out of restriction. Never exceeds the effective length.
pub fn restrict_line(line: &Line, offset: Vec2, obstacles: &[Body]) -> f32 {
    let effective = line.effective_length(offset);
    if !line.can_be_restricted {
        return effective;
    }

    let p0 = line.world_origin(offset);
    let p1 = line.endpoint(offset);
    let mut best = effective;
    for obstacle in obstacles {
        if let Some(distance) = body_clip_distance(p0, p1, obstacle) {
            best = best.min(distance);
        }
    }
    best
}

/// True when any line of `collection` crosses any edge of `body`.
pub fn collection_hits_body(collection: &LineCollection, body: &Body) -> bool {
    collection.lines.iter().any(|line| {
        line_hits_body(
            line.world_origin(collection.offset),
            line.endpoint(collection.offset),
            body,
        )
    })
}

// ============================================================================
// Velocity Offsets
// ============================================================================

/// Fold every collection's velocity-line displacement into its offset.
pub fn apply_velocities(collections: &mut [LineCollection]) {
    for collection in collections {
        collection.apply_velocity();
    }
}

// ============================================================================
// Batch Helpers
// ============================================================================

/// One surviving combination between two dispatched groups, as
/// group-relative indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct HitPair {
    pub index_a: usize,
    pub index_b: usize,
}

fn aliased<T>(a: &[T], b: &[T]) -> bool {
    a.as_ptr() == b.as_ptr() && a.len() == b.len()
}

fn pair_skipped(pairs: &[PairRecord], collection_index: usize, body_index: usize) -> bool {
    pairs.iter().any(|pair| {
        pair.collection_index == collection_index as i32 && pair.body_index == body_index as i32
    })
}

/// Every ordered (a, b) combination whose bodies overlap - single-threaded.
///
/// When both slices are the same group, a body is never tested against
/// itself. Results are sorted for deterministic ordering.
pub fn detect_body_hits_st(group_a: &[Body], group_b: &[Body]) -> Vec<HitPair> {
    let skip_same = aliased(group_a, group_b);
    let mut hits = Vec::new();

    for (index_a, a) in group_a.iter().enumerate() {
        for (index_b, b) in group_b.iter().enumerate() {
            if skip_same && index_a == index_b {
                continue;
            }
            if bodies_overlap(a, b) {
                hits.push(HitPair { index_a, index_b });
            }
        }
    }

    hits.sort_unstable();
    hits
}

/// Multithreaded variant of [`detect_body_hits_st`].
pub fn detect_body_hits_parallel(group_a: &[Body], group_b: &[Body]) -> Vec<HitPair> {
    use rayon::prelude::*;

    let skip_same = aliased(group_a, group_b);
    let mut hits: Vec<HitPair> = group_a
        .par_iter()
        .enumerate()
        .flat_map(|(index_a, a)| {
            let mut local_hits = Vec::new();
            for (index_b, b) in group_b.iter().enumerate() {
                if skip_same && index_a == index_b {
                    continue;
                }
                if bodies_overlap(a, b) {
                    local_hits.push(HitPair { index_a, index_b });
                }
            }
            local_hits
        })
        .collect();

    // Sort for deterministic ordering
    hits.sort_unstable();
    hits
}

/// Resolve each movable body against the obstacle group - single-threaded.
///
/// When both slices are the same group, a body is never resolved against
/// itself. Output is indexed by position in `movables`.
pub fn resolve_bodies_st(
    movables: &[Body],
    obstacles: &[Body],
    config: &CollisionConfig,
) -> Vec<Vec2> {
    let skip_same = aliased(movables, obstacles);
    movables
        .iter()
        .enumerate()
        .map(|(index, movable)| {
            resolve_body_against(movable, skip_same.then_some(index), obstacles, config)
        })
        .collect()
}

/// Multithreaded variant of [`resolve_bodies_st`].
pub fn resolve_bodies_parallel(
    movables: &[Body],
    obstacles: &[Body],
    config: &CollisionConfig,
) -> Vec<Vec2> {
    use rayon::prelude::*;

    let skip_same = aliased(movables, obstacles);
    movables
        .par_iter()
        .enumerate()
        .map(|(index, movable)| {
            resolve_body_against(movable, skip_same.then_some(index), obstacles, config)
        })
        .collect()
}

/// Every (collection, body) combination where a line crosses the body,
/// skipping combinations listed in the pair table - single-threaded.
pub fn detect_line_hits_st(
    collections: &[LineCollection],
    bodies: &[Body],
    pairs: &[PairRecord],
) -> Vec<HitPair> {
    let mut hits = Vec::new();

    for (index_a, collection) in collections.iter().enumerate() {
        for (index_b, body) in bodies.iter().enumerate() {
            if pair_skipped(pairs, index_a, index_b) {
                continue;
            }
            if collection_hits_body(collection, body) {
                hits.push(HitPair { index_a, index_b });
            }
        }
    }

    hits.sort_unstable();
    hits
}

/// Multithreaded variant of [`detect_line_hits_st`].
pub fn detect_line_hits_parallel(
    collections: &[LineCollection],
    bodies: &[Body],
    pairs: &[PairRecord],
) -> Vec<HitPair> {
    use rayon::prelude::*;

    let mut hits: Vec<HitPair> = collections
        .par_iter()
        .enumerate()
        .flat_map(|(index_a, collection)| {
            let mut local_hits = Vec::new();
            for (index_b, body) in bodies.iter().enumerate() {
                if pair_skipped(pairs, index_a, index_b) {
                    continue;
                }
                if collection_hits_body(collection, body) {
                    local_hits.push(HitPair { index_a, index_b });
                }
            }
            local_hits
        })
        .collect();

    hits.sort_unstable();
    hits
}

fn restrict_collection_filtered(
    collection_index: usize,
    collection: &LineCollection,
    obstacles: &[Body],
    pairs: &[PairRecord],
) -> Vec<f32> {
    collection
        .lines
        .iter()
        .map(|line| {
            let effective = line.effective_length(collection.offset);
            if !line.can_be_restricted {
                return effective;
            }

            let p0 = line.world_origin(collection.offset);
            let p1 = line.endpoint(collection.offset);
            let mut best = effective;
            for (body_index, obstacle) in obstacles.iter().enumerate() {
                if pair_skipped(pairs, collection_index, body_index) {
                    continue;
                }
                if let Some(distance) = body_clip_distance(p0, p1, obstacle) {
                    best = best.min(distance);
                }
            }
            best
        })
        .collect()
}

/// Restricted length for every line of every collection - single-threaded.
///
/// `result[c][l]` is the clipped length of line `l` in collection `c`.
/// Bodies paired with a collection do not restrict its lines.
pub fn restrict_collections_st(
    collections: &[LineCollection],
    obstacles: &[Body],
    pairs: &[PairRecord],
) -> Vec<Vec<f32>> {
    collections
        .iter()
        .enumerate()
        .map(|(index, collection)| {
            restrict_collection_filtered(index, collection, obstacles, pairs)
        })
        .collect()
}

/// Multithreaded variant of [`restrict_collections_st`].
pub fn restrict_collections_parallel(
    collections: &[LineCollection],
    obstacles: &[Body],
    pairs: &[PairRecord],
) -> Vec<Vec<f32>> {
    use rayon::prelude::*;

    collections
        .par_iter()
        .enumerate()
        .map(|(index, collection)| {
            restrict_collection_filtered(index, collection, obstacles, pairs)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::body::BodyPart;
    use glam::Vec2;

    fn square_body(x: f32, y: f32, size: f32) -> Body {
        let mut body = Body::new(Vec2::new(x, y));
        body.push_part(BodyPart::rect(Vec2::ZERO, size, size, 0.0));
        body
    }

    fn circle_body(x: f32, y: f32, radius: f32) -> Body {
        let mut body = Body::new(Vec2::new(x, y));
        body.push_part(BodyPart::circle(Vec2::ZERO, radius, 16));
        body
    }

    #[test]
    fn test_separated_rectangles_do_not_overlap() {
        let a = square_body(0.0, 0.0, 2.0);
        let b = square_body(3.0, 0.0, 2.0);
        assert!(!bodies_overlap(&a, &b));
    }

    #[test]
    fn test_close_rectangles_overlap() {
        let a = square_body(0.0, 0.0, 2.0);
        let b = square_body(1.0, 0.0, 2.0);
        assert!(bodies_overlap(&a, &b));
    }

    #[test]
    fn test_touching_rectangles_count_as_overlapping() {
        // Edges meet exactly at x = 1; interval bounds are equal, which is
        // overlap under the closed-interval convention.
        let a = square_body(0.0, 0.0, 2.0);
        let b = square_body(2.0, 0.0, 2.0);
        assert!(bodies_overlap(&a, &b));
    }

    #[test]
    fn test_rotated_rectangles_need_both_normal_sets() {
        // A diamond tucked into the corner gap of an axis-aligned square:
        // only the diamond's diagonal axes separate them.
        let a = square_body(0.0, 0.0, 2.0);
        let mut b = Body::new(Vec2::new(2.2, 2.2));
        b.push_part(BodyPart::rect(
            Vec2::ZERO,
            2.0,
            2.0,
            std::f32::consts::FRAC_PI_4,
        ));
        assert!(!bodies_overlap(&a, &b));
    }

    #[test]
    fn test_multi_part_bodies_overlap_through_any_part() {
        let mut a = Body::new(Vec2::ZERO);
        a.push_part(BodyPart::circle(Vec2::ZERO, 1.0, 12));
        a.push_part(BodyPart::circle(Vec2::new(6.0, 0.0), 1.0, 12));

        let b = circle_body(6.5, 0.0, 1.0);
        assert!(bodies_overlap(&a, &b));
        assert!(bodies_overlap(&b, &a));
    }

    #[test]
    fn test_resolve_without_contact_returns_zero() {
        let movable = square_body(0.0, 0.0, 2.0);
        let obstacles = vec![square_body(10.0, 0.0, 2.0), circle_body(-8.0, 3.0, 2.0)];
        let translation = resolve_body(&movable, &obstacles, &CollisionConfig::default());
        assert_eq!(translation, Vec2::ZERO);
    }

    #[test]
    fn test_resolve_picks_the_shallowest_axis() {
        // Overlap is 1.5 deep in x but only 0.5 deep in y, so the body is
        // pushed up and out in a single step.
        let movable = square_body(0.5, 1.5, 2.0);
        let obstacles = vec![square_body(0.0, 0.0, 2.0)];
        let translation = resolve_body(&movable, &obstacles, &CollisionConfig::default());
        assert!((translation - Vec2::new(0.0, 0.5)).length() < 1e-5);
    }

    #[test]
    fn test_resolve_separates_overlapping_circles() {
        // Radius-5 circles with centers 6 apart: roughly 4 units of
        // penetration along the center axis. Polygonized circles make the
        // exact depth slightly smaller and tilt the axis a little.
        let movable = circle_body(0.0, 0.0, 5.0);
        let obstacles = vec![circle_body(6.0, 0.0, 5.0)];
        let config = CollisionConfig::default();
        let translation = resolve_body(&movable, &obstacles, &config);

        assert!(translation.length() > 3.5 && translation.length() < 4.5);
        assert!(translation.x < -3.5);
        assert!(translation.y.abs() < 1.0);

        let mut moved = movable.clone();
        moved.translate(translation);
        assert!(!bodies_overlap(&moved, &obstacles[0]));
    }

    #[test]
    fn test_resolve_does_not_mutate_the_movable_body() {
        let movable = square_body(0.5, 0.0, 2.0);
        let obstacles = vec![square_body(0.0, 0.0, 2.0)];
        let _ = resolve_body(&movable, &obstacles, &CollisionConfig::default());
        assert_eq!(movable.offset(), Vec2::new(0.5, 0.0));
    }

    #[test]
    fn test_resolve_escapes_a_pocket_of_obstacles() {
        // Squeezed between two walls with the smaller escape upward.
        let movable = square_body(0.0, 0.6, 2.0);
        let obstacles = vec![square_body(-1.5, 0.0, 2.0), square_body(1.5, 0.0, 2.0)];
        let config = CollisionConfig::default();
        let translation = resolve_body(&movable, &obstacles, &config);

        let mut moved = movable.clone();
        moved.translate(translation);
        assert!(!bodies_overlap(&moved, &obstacles[0]));
        assert!(!bodies_overlap(&moved, &obstacles[1]));
    }

    #[test]
    fn test_restriction_clips_to_the_first_edge() {
        let line = Line::directed(Vec2::new(-5.0, 0.0), Vec2::X, 10.0);
        let obstacles = vec![square_body(0.0, 0.0, 2.0)];
        let restricted = restrict_line(&line, Vec2::ZERO, &obstacles);
        assert!((restricted - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_restriction_never_exceeds_the_length() {
        let line = Line::directed(Vec2::new(-5.0, 0.0), Vec2::X, 10.0);
        let near = vec![square_body(0.0, 0.0, 2.0)];
        let far = vec![square_body(100.0, 0.0, 2.0)];

        assert!(restrict_line(&line, Vec2::ZERO, &near) <= 10.0);
        assert_eq!(restrict_line(&line, Vec2::ZERO, &far), 10.0);
        assert_eq!(restrict_line(&line, Vec2::ZERO, &[]), 10.0);
    }

    #[test]
    fn test_unrestrictable_lines_keep_their_length() {
        let mut line = Line::directed(Vec2::new(-5.0, 0.0), Vec2::X, 10.0);
        line.can_be_restricted = false;
        let obstacles = vec![square_body(0.0, 0.0, 2.0)];
        assert_eq!(restrict_line(&line, Vec2::ZERO, &obstacles), 10.0);
    }

    #[test]
    fn test_fixed_lines_restrict_against_their_anchor_span() {
        let line = Line::fixed(Vec2::new(-5.0, 0.0), Vec2::new(5.0, 0.0));
        let obstacles = vec![square_body(0.0, 0.0, 2.0)];
        let restricted = restrict_line(&line, Vec2::ZERO, &obstacles);
        assert!((restricted - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_restriction_respects_the_collection_offset() {
        // Shifting the collection up carries the line over the obstacle.
        let line = Line::directed(Vec2::new(-5.0, 0.0), Vec2::X, 10.0);
        let obstacles = vec![square_body(0.0, 0.0, 2.0)];
        assert_eq!(restrict_line(&line, Vec2::new(0.0, 5.0), &obstacles), 10.0);
    }

    #[test]
    fn test_body_hit_batches_match_between_st_and_parallel() {
        let group = vec![
            circle_body(0.0, 0.0, 2.0),
            circle_body(3.0, 0.0, 2.0),
            circle_body(20.0, 0.0, 1.0),
            square_body(21.0, 0.0, 2.0),
            square_body(-9.0, -9.0, 1.0),
        ];

        let st = detect_body_hits_st(&group, &group);
        let parallel = detect_body_hits_parallel(&group, &group);
        assert_eq!(st, parallel);

        // Overlaps reported in both orders, never against themselves.
        assert!(st.contains(&HitPair { index_a: 0, index_b: 1 }));
        assert!(st.contains(&HitPair { index_a: 1, index_b: 0 }));
        assert!(st.iter().all(|hit| hit.index_a != hit.index_b));
    }

    #[test]
    fn test_distinct_groups_may_share_indices() {
        let group_a = vec![circle_body(0.0, 0.0, 2.0)];
        let group_b = vec![circle_body(1.0, 0.0, 2.0)];
        let hits = detect_body_hits_st(&group_a, &group_b);
        assert_eq!(hits, vec![HitPair { index_a: 0, index_b: 0 }]);
    }

    #[test]
    fn test_resolve_batches_match_the_single_body_path() {
        let movables = vec![square_body(0.5, 1.5, 2.0), square_body(40.0, 0.0, 2.0)];
        let obstacles = vec![square_body(0.0, 0.0, 2.0)];
        let config = CollisionConfig::default();

        let st = resolve_bodies_st(&movables, &obstacles, &config);
        let parallel = resolve_bodies_parallel(&movables, &obstacles, &config);
        assert_eq!(st, parallel);
        assert_eq!(st[0], resolve_body(&movables[0], &obstacles, &config));
        assert_eq!(st[1], Vec2::ZERO);
    }

    #[test]
    fn test_line_hits_skip_paired_combinations() {
        let mut collection = LineCollection::new(Vec2::ZERO);
        collection.push_line(Line::directed(Vec2::new(-5.0, 0.0), Vec2::X, 10.0));
        let collections = vec![collection];
        let bodies = vec![square_body(0.0, 0.0, 2.0)];

        let unpaired = detect_line_hits_st(&collections, &bodies, &[]);
        assert_eq!(unpaired, vec![HitPair { index_a: 0, index_b: 0 }]);

        let pairs = [PairRecord {
            body_index: 0,
            collection_index: 0,
        }];
        let paired = detect_line_hits_st(&collections, &bodies, &pairs);
        assert!(paired.is_empty());

        assert_eq!(
            detect_line_hits_parallel(&collections, &bodies, &[]),
            unpaired
        );
    }

    #[test]
    fn test_restrict_batches_mirror_the_scalar_restriction() {
        let mut collection = LineCollection::new(Vec2::new(0.0, 0.0));
        collection.push_line(Line::directed(Vec2::new(-5.0, 0.0), Vec2::X, 10.0));
        let mut frozen = Line::directed(Vec2::new(-5.0, 0.5), Vec2::X, 10.0);
        frozen.can_be_restricted = false;
        collection.push_line(frozen);
        let collections = vec![collection];
        let obstacles = vec![square_body(0.0, 0.0, 2.0)];

        let st = restrict_collections_st(&collections, &obstacles, &[]);
        let parallel = restrict_collections_parallel(&collections, &obstacles, &[]);
        assert_eq!(st, parallel);
        assert!((st[0][0] - 4.0).abs() < 1e-5);
        assert_eq!(st[0][1], 10.0);

        // Pairing the only obstacle with the collection lifts the clip.
        let pairs = [PairRecord {
            body_index: 0,
            collection_index: 0,
        }];
        let skipped = restrict_collections_st(&collections, &obstacles, &pairs);
        assert_eq!(skipped[0][0], 10.0);
    }

    #[test]
    fn test_apply_velocities_moves_every_collection() {
        let mut mover = LineCollection::new(Vec2::ZERO);
        let index = mover.push_line(Line::directed(Vec2::ZERO, Vec2::new(0.0, 1.0), 2.5));
        mover.velocity_line = Some(index);
        let mut still = LineCollection::new(Vec2::new(3.0, 3.0));
        still.push_line(Line::directed(Vec2::ZERO, Vec2::X, 1.0));

        let mut collections = vec![mover, still];
        apply_velocities(&mut collections);
        assert_eq!(collections[0].offset, Vec2::new(0.0, 2.5));
        assert_eq!(collections[1].offset, Vec2::new(3.0, 3.0));
    }
}
