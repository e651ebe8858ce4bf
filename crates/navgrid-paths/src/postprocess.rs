//! Turning a finished search into a usable path.
//!
//! [`post_process`] runs three stages in order: it reconstructs the path
//! from the end back to the start, smooths it, and reverses it into
//! start-to-end order.

use std::collections::HashMap;

use navgrid_core::{Cell, NavGrid, Point};

use crate::neighbors::can_step;
use crate::node::SearchNode;
use crate::scratch::SearchScratch;

/// How a raw search path is reduced to waypoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PathSmoothing {
    /// Keep every cell of the search path.
    None,
    /// Drop intermediate cells of straight runs.
    #[default]
    Collinear,
    /// Greedily skip ahead to the farthest cell still in plain view.
    LineOfSight,
}

/// Follow predecessor links from `end` back to the start, appending cells
/// to `out` in end-to-start order.
///
/// Appends nothing when `end` was never reached.
pub fn reconstruct(
    grid: &NavGrid,
    visited: &HashMap<usize, SearchNode>,
    end: usize,
    out: &mut Vec<Cell>,
) {
    let mut next = visited.contains_key(&end).then_some(end);
    while let Some(ci) = next {
        let Some(cell) = grid.cell(ci) else {
            break;
        };
        out.push(*cell);
        next = visited.get(&ci).and_then(SearchNode::parent);
    }
}

/// Reduced direction of the step from `a` to `b`.
fn direction(a: Point, b: Point) -> Point {
    let d = b - a;
    let k = gcd(d.x.abs(), d.y.abs()).max(1);
    Point::new(d.x / k, d.y / k)
}

fn gcd(mut a: i32, mut b: i32) -> i32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Append to `out` the cells of `path` where its direction changes, plus
/// both endpoints.
///
/// Paths of two cells or fewer are copied unchanged. Applying the function
/// to its own output changes nothing.
pub fn simplify_collinear(path: &[Cell], out: &mut Vec<Cell>) {
    let [first, .., last] = path else {
        out.extend_from_slice(path);
        return;
    };
    out.push(*first);
    for w in path.windows(3) {
        if direction(w[0].pos, w[1].pos) != direction(w[1].pos, w[2].pos) {
            out.push(w[1]);
        }
    }
    out.push(*last);
}

/// Whether the straight raster line between `a` and `b` crosses only
/// walkable cells, both endpoints included.
///
/// Diagonal raster steps follow the same corner rule as search moves. The
/// line is always traced from the smaller of the two points, so the answer
/// does not depend on argument order.
pub fn has_line_of_sight(grid: &NavGrid, a: Point, b: Point) -> bool {
    let (from, to) = if (a.x, a.y) <= (b.x, b.y) { (a, b) } else { (b, a) };
    if !grid.is_walkable(from) {
        return false;
    }

    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let step = (to - from).signum();
    let mut err = dx + dy;
    let mut cur = from;
    while cur != to {
        let e2 = 2 * err;
        let mut next = cur;
        if e2 >= dy {
            err += dy;
            next.x += step.x;
        }
        if e2 <= dx {
            err += dx;
            next.y += step.y;
        }
        if !can_step(grid, cur, next) {
            return false;
        }
        cur = next;
    }
    true
}

/// Append to `out` a subsequence of `path` in which each waypoint is in
/// plain view of the next. Both endpoints are kept.
///
/// Greedy passes skip as far ahead as possible from each anchor and are
/// repeated until none drops a waypoint, since a waypoint kept by one pass
/// may be skippable in the next. No waypoint of the result can be removed
/// with its neighbours still in view of each other, so applying the
/// function to its own output, in either direction, changes nothing.
pub fn simplify_line_of_sight(grid: &NavGrid, path: &[Cell], out: &mut Vec<Cell>) {
    let base = out.len();
    out.extend_from_slice(path);
    loop {
        let len = out.len() - base;
        let kept = shortcut_pass(grid, &mut out[base..]);
        if kept == len {
            break;
        }
        out.truncate(base + kept);
    }
}

/// One greedy pass over `path`, compacting the kept waypoints to its front.
/// Returns how many were kept.
fn shortcut_pass(grid: &NavGrid, path: &mut [Cell]) -> usize {
    let len = path.len();
    if len <= 2 {
        return len;
    }
    let mut kept = 1;
    let mut anchor = path[0];
    for i in 2..len {
        if !has_line_of_sight(grid, anchor.pos, path[i].pos) {
            anchor = path[i - 1];
            path[kept] = anchor;
            kept += 1;
        }
    }
    path[kept] = path[len - 1];
    kept + 1
}

/// Build the final path of a finished search into `scratch.path`.
///
/// The raw path is reconstructed into `scratch.raw` (end to start), reduced
/// by `smoothing` into `scratch.path`, and `scratch.path` is reversed to run
/// from start to end. Both buffers are emptied first; if `end` was never
/// reached they stay empty.
pub fn post_process(grid: &NavGrid, scratch: &mut SearchScratch, end: usize, smoothing: PathSmoothing) {
    scratch.raw.clear();
    scratch.path.clear();
    reconstruct(grid, &scratch.visited, end, &mut scratch.raw);
    match smoothing {
        PathSmoothing::None => scratch.path.extend_from_slice(&scratch.raw),
        PathSmoothing::Collinear => simplify_collinear(&scratch.raw, &mut scratch.path),
        PathSmoothing::LineOfSight => simplify_line_of_sight(grid, &scratch.raw, &mut scratch.path),
    }
    scratch.path.reverse();
}

#[cfg(test)]
mod tests {
    use navgrid_core::GridConfig;
    use proptest::prelude::*;

    use super::*;
    use crate::distance::path_cost;
    use crate::search::{SearchOutcome, astar};

    fn pts(path: &[Cell]) -> Vec<(i32, i32)> {
        path.iter().map(|c| (c.x(), c.y())).collect()
    }

    fn solve(g: &NavGrid, from: (i32, i32), to: (i32, i32), smoothing: PathSmoothing) -> Vec<Cell> {
        let start = g.index_of(Point::new(from.0, from.1)).unwrap();
        let end = g.index_of(Point::new(to.0, to.1)).unwrap();
        let mut s = SearchScratch::new(g.cell_count());
        if astar(g, start, end, &mut s).unwrap() == SearchOutcome::Found {
            post_process(g, &mut s, end, smoothing);
        }
        s.path
    }

    #[test]
    fn open_diagonal_collapses_to_endpoints() {
        let g = NavGrid::new(GridConfig::with_size(5, 5)).unwrap();
        let raw = solve(&g, (0, 0), (4, 4), PathSmoothing::None);
        assert_eq!(raw.len(), 5);
        assert_eq!(path_cost(&raw), 56);
        let simple = solve(&g, (0, 0), (4, 4), PathSmoothing::Collinear);
        assert_eq!(pts(&simple), vec![(0, 0), (4, 4)]);
    }

    #[test]
    fn raw_path_around_blocked_centre() {
        let g = NavGrid::parse(
            "
            ...
            .#.
            ...
            ",
        )
        .unwrap();
        let raw = solve(&g, (0, 0), (2, 2), PathSmoothing::None);
        assert_eq!(raw.len(), 5);
        assert_eq!(path_cost(&raw), 40);
        assert_eq!((raw[0].x(), raw[0].y()), (0, 0));
        assert_eq!((raw[4].x(), raw[4].y()), (2, 2));
        assert!(raw.iter().all(|c| c.walkable));
        let simple = solve(&g, (0, 0), (2, 2), PathSmoothing::Collinear);
        assert_eq!(simple.len(), 3);
    }

    #[test]
    fn start_equals_end_gives_single_cell() {
        let g = NavGrid::new(GridConfig::with_size(3, 3)).unwrap();
        for smoothing in [PathSmoothing::None, PathSmoothing::Collinear, PathSmoothing::LineOfSight] {
            assert_eq!(pts(&solve(&g, (1, 2), (1, 2), smoothing)), vec![(1, 2)]);
        }
    }

    #[test]
    fn unreached_end_gives_empty_path() {
        let g = NavGrid::parse(".#.").unwrap();
        let mut s = SearchScratch::new(g.cell_count());
        assert_eq!(astar(&g, 0, 2, &mut s).unwrap(), SearchOutcome::Unreachable);
        post_process(&g, &mut s, 2, PathSmoothing::Collinear);
        assert!(s.path.is_empty());
        assert!(s.raw.is_empty());
    }

    #[test]
    fn collinear_keeps_turns() {
        let g = NavGrid::new(GridConfig::with_size(6, 6)).unwrap();
        let cells: Vec<Cell> = [(0, 0), (1, 0), (2, 0), (3, 1), (4, 2), (4, 3)]
            .iter()
            .map(|&(x, y)| *g.cell_at(Point::new(x, y)).unwrap())
            .collect();
        let mut out = Vec::new();
        simplify_collinear(&cells, &mut out);
        assert_eq!(pts(&out), vec![(0, 0), (2, 0), (4, 2), (4, 3)]);

        let mut again = Vec::new();
        simplify_collinear(&out, &mut again);
        assert_eq!(again, out);
    }

    #[test]
    fn line_of_sight_rules() {
        let g = NavGrid::parse(
            "
            .....
            .....
            ..#..
            .....
            ",
        )
        .unwrap();
        let p = Point::new;
        assert!(has_line_of_sight(&g, p(0, 0), p(4, 0)));
        assert!(has_line_of_sight(&g, p(0, 0), p(1, 1)));
        assert!(!has_line_of_sight(&g, p(0, 2), p(4, 2)));
        assert!(!has_line_of_sight(&g, p(2, 0), p(2, 3)));
        assert!(!has_line_of_sight(&g, p(0, 0), p(2, 2)));
        // Diagonal steps may not clip the obstacle's corner.
        assert!(!has_line_of_sight(&g, p(1, 1), p(3, 3)));
        assert!(!has_line_of_sight(&g, p(3, 1), p(1, 3)));
        assert!(has_line_of_sight(&g, p(0, 3), p(1, 2)));
        assert_eq!(
            has_line_of_sight(&g, p(0, 1), p(4, 3)),
            has_line_of_sight(&g, p(4, 3), p(0, 1))
        );
    }

    #[test]
    fn line_of_sight_skips_corners_it_can_see_past() {
        let g = NavGrid::parse(
            "
            ......
            .####.
            ......
            ",
        )
        .unwrap();
        let raw = solve(&g, (0, 0), (5, 2), PathSmoothing::None);
        let smooth = solve(&g, (0, 0), (5, 2), PathSmoothing::LineOfSight);
        assert!(smooth.len() < raw.len());
        assert_eq!(smooth.first().map(|c| c.pos), Some(Point::new(0, 0)));
        assert_eq!(smooth.last().map(|c| c.pos), Some(Point::new(5, 2)));
        for w in smooth.windows(2) {
            assert!(has_line_of_sight(&g, w[0].pos, w[1].pos));
        }
    }

    #[test]
    fn line_of_sight_drops_waypoints_exposed_by_an_earlier_shortcut() {
        let g = NavGrid::parse(
            "
            ..#
            ..#
            #..
            ",
        )
        .unwrap();
        let cells: Vec<Cell> = [(1, 2), (1, 1), (0, 1), (0, 0), (1, 0)]
            .iter()
            .map(|&(x, y)| *g.cell_at(Point::new(x, y)).unwrap())
            .collect();
        // A single greedy pass keeps (1, 1): (0, 1) is hidden from (1, 2) by
        // the corner rule. From (1, 2), (1, 0) is in plain view.
        let mut out = Vec::new();
        simplify_line_of_sight(&g, &cells, &mut out);
        assert_eq!(pts(&out), vec![(1, 2), (1, 0)]);

        let mut again = Vec::new();
        simplify_line_of_sight(&g, &out, &mut again);
        assert_eq!(again, out);
    }

    #[test]
    fn line_of_sight_appends_after_existing_output() {
        let g = NavGrid::new(GridConfig::with_size(4, 1)).unwrap();
        let cells: Vec<Cell> = g.cells().to_vec();
        let mut out = vec![cells[3]];
        simplify_line_of_sight(&g, &cells, &mut out);
        assert_eq!(pts(&out), vec![(3, 0), (0, 0), (3, 0)]);
    }

    fn arb_grid() -> impl Strategy<Value = (NavGrid, (i32, i32), (i32, i32))> {
        (2i32..10, 2i32..10)
            .prop_flat_map(|(w, h)| {
                (
                    Just((w, h)),
                    prop::collection::vec(prop::bool::weighted(0.75), (w * h) as usize),
                    (0..w, 0..h),
                    (0..w, 0..h),
                )
            })
            .prop_map(|((w, h), open, a, b)| {
                let g = NavGrid::from_fn(GridConfig::with_size(w, h), |p| {
                    open[(p.y * w + p.x) as usize] || (p.x, p.y) == a || (p.x, p.y) == b
                })
                .unwrap();
                (g, a, b)
            })
    }

    proptest! {
        #[test]
        fn raw_paths_are_chains_of_legal_steps((g, a, b) in arb_grid()) {
            let raw = solve(&g, a, b, PathSmoothing::None);
            if let (Some(first), Some(last)) = (raw.first(), raw.last()) {
                prop_assert_eq!((first.x(), first.y()), a);
                prop_assert_eq!((last.x(), last.y()), b);
                for w in raw.windows(2) {
                    prop_assert!(w[0].pos.is_adjacent_8(w[1].pos));
                    prop_assert!(can_step(&g, w[0].pos, w[1].pos));
                }
            }
        }

        #[test]
        fn smoothed_paths_keep_endpoints_and_sight((g, a, b) in arb_grid()) {
            let raw = solve(&g, a, b, PathSmoothing::None);
            let simple = solve(&g, a, b, PathSmoothing::Collinear);
            let smooth = solve(&g, a, b, PathSmoothing::LineOfSight);
            prop_assert_eq!(raw.is_empty(), simple.is_empty());
            prop_assert_eq!(raw.is_empty(), smooth.is_empty());
            prop_assert!(simple.len() <= raw.len());
            prop_assert!(smooth.len() <= raw.len());
            prop_assert_eq!(simple.first(), raw.first());
            prop_assert_eq!(simple.last(), raw.last());
            prop_assert_eq!(smooth.first(), raw.first());
            prop_assert_eq!(smooth.last(), raw.last());
            for w in smooth.windows(2) {
                prop_assert!(has_line_of_sight(&g, w[0].pos, w[1].pos));
            }

            let mut again = Vec::new();
            simplify_collinear(&simple, &mut again);
            prop_assert_eq!(again, simple);
        }

        #[test]
        fn line_of_sight_smoothing_is_idempotent((g, a, b) in arb_grid()) {
            let smooth = solve(&g, a, b, PathSmoothing::LineOfSight);
            let mut again = Vec::new();
            simplify_line_of_sight(&g, &smooth, &mut again);
            prop_assert_eq!(&again, &smooth);

            let backwards: Vec<Cell> = smooth.iter().rev().copied().collect();
            let mut reversed = Vec::new();
            simplify_line_of_sight(&g, &backwards, &mut reversed);
            prop_assert_eq!(reversed, backwards);
        }
    }
}
