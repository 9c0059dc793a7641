/*
 * Quadtree Module
 *
 * This module defines the QuadTree spatial index used for neighbor lookups.
 * Each node covers an axis-aligned region and either stores points directly
 * (leaf) or delegates to exactly four quadrant children (internal node).
 *
 * Nodes split once they hold `capacity` points, up to MAX_DEPTH. A node at
 * MAX_DEPTH never splits and keeps accumulating points, which bounds the
 * recursion even when many points coincide.
 *
 * Children are owned through a boxed array, so cloning a tree is a deep copy
 * and dropping a node releases its whole subtree.
 */

use glam::Vec2;

use crate::geometry::AxisAlignedRect;

/// Points a leaf may hold before it splits.
pub const DEFAULT_CAPACITY: usize = 4;
/// Largest node capacity a configuration may ask for.
pub const MAX_CAPACITY: usize = 1024;

/// Nodes at this depth never subdivide.
pub const MAX_DEPTH: u32 = 8;

/// A point stored in the index. Agents also record their velocity so that
/// neighbor queries can feed the alignment rule.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub position: Vec2,
    pub velocity: Vec2,
}

impl Point {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
        }
    }

    pub fn with_velocity(position: Vec2, velocity: Vec2) -> Self {
        Self { position, velocity }
    }
}

#[derive(Clone, Debug)]
pub struct QuadTree {
    boundary: AxisAlignedRect,
    depth: u32,
    capacity: usize,
    points: Vec<Point>,
    // NW, NE, SW, SE
    children: Option<Box<[QuadTree; 4]>>,
}

impl QuadTree {
    pub fn new(boundary: AxisAlignedRect, capacity: usize) -> Self {
        Self::with_depth(boundary, 0, capacity)
    }

    /// Create a node that starts at `depth` instead of the root level.
    pub fn with_depth(boundary: AxisAlignedRect, depth: u32, capacity: usize) -> Self {
        Self {
            boundary,
            depth,
            capacity,
            points: Vec::new(),
            children: None,
        }
    }

    pub fn boundary(&self) -> &AxisAlignedRect {
        &self.boundary
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_divided(&self) -> bool {
        self.children.is_some()
    }

    /// Points held directly by this node (always empty on internal nodes).
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn children(&self) -> Option<&[QuadTree; 4]> {
        self.children.as_deref()
    }

    /// Total number of points stored in this subtree.
    pub fn len(&self) -> usize {
        self.points.len()
            + self
                .children
                .as_ref()
                .map_or(0, |children| children.iter().map(QuadTree::len).sum())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .as_ref()
            .map_or(0, |children| children.iter().map(QuadTree::node_count).sum())
    }

    /// Insert a point, returning whether any node in this subtree kept it.
    ///
    /// Points outside the boundary are ignored. When a full leaf splits, the
    /// new point and every point it held are offered to all four children and
    /// each child's own containment test decides who keeps them. A point that
    /// lies exactly on a split line belongs to no child and is discarded.
    pub fn insert(&mut self, point: Point) -> bool {
        if !self.boundary.contains(point.position) {
            return false;
        }

        if let Some(children) = self.children.as_mut() {
            return insert_into_all(children, point);
        }

        if self.points.len() < self.capacity || self.depth >= MAX_DEPTH {
            self.points.push(point);
            return true;
        }

        self.subdivide();
        let Some(children) = self.children.as_mut() else {
            return false;
        };

        let accepted = insert_into_all(children, point);
        for old in self.points.drain(..) {
            insert_into_all(children, old);
        }

        accepted
    }

    fn subdivide(&mut self) {
        let depth = self.depth + 1;
        let capacity = self.capacity;
        let [nw, ne, sw, se] = self.boundary.quadrants();

        self.children = Some(Box::new([
            QuadTree::with_depth(nw, depth, capacity),
            QuadTree::with_depth(ne, depth, capacity),
            QuadTree::with_depth(sw, depth, capacity),
            QuadTree::with_depth(se, depth, capacity),
        ]));
    }

    /// Collect every point strictly inside `range`. Order is unspecified.
    pub fn query(&self, range: &AxisAlignedRect) -> Vec<Point> {
        let mut found = Vec::new();
        self.query_into(range, &mut found);
        found
    }

    /// Same as [`QuadTree::query`] but appends into a caller-owned buffer.
    pub fn query_into(&self, range: &AxisAlignedRect, found: &mut Vec<Point>) {
        if !self.boundary.intersects(range) {
            return;
        }

        found.extend(
            self.points
                .iter()
                .filter(|point| range.contains(point.position)),
        );

        if let Some(children) = self.children.as_ref() {
            for child in children.iter() {
                child.query_into(range, found);
            }
        }
    }

    /// Drop every point and the whole subtree, leaving an empty leaf.
    pub fn clear(&mut self) {
        self.points.clear();
        self.children = None;
    }

    /// Boundaries of every node, internal and leaf, in pre-order.
    pub fn boundaries(&self) -> Vec<AxisAlignedRect> {
        let mut rects = Vec::with_capacity(self.node_count());
        self.collect_boundaries(&mut rects);
        rects
    }

    fn collect_boundaries(&self, rects: &mut Vec<AxisAlignedRect>) {
        rects.push(self.boundary);
        if let Some(children) = self.children.as_ref() {
            for child in children.iter() {
                child.collect_boundaries(rects);
            }
        }
    }
}

fn insert_into_all(children: &mut [QuadTree; 4], point: Point) -> bool {
    let mut accepted = false;
    for child in children.iter_mut() {
        accepted |= child.insert(point);
    }
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn world() -> AxisAlignedRect {
        AxisAlignedRect::square(Vec2::ZERO, 100.0)
    }

    fn sorted(points: &[Point]) -> Vec<(f32, f32)> {
        let mut out: Vec<(f32, f32)> = points
            .iter()
            .map(|p| (p.position.x, p.position.y))
            .collect();
        out.sort_by(|a, b| a.partial_cmp(b).unwrap());
        out
    }

    #[test]
    fn large_capacity_does_not_reserve_up_front() {
        let mut tree = QuadTree::new(world(), usize::MAX / 8);
        assert!(tree.points().is_empty());

        assert!(tree.insert(Point::new(Vec2::new(1.0, 2.0))));
        assert_eq!(tree.len(), 1);
        assert!(!tree.is_divided());
    }

    #[test]
    fn insert_then_query_whole_region_returns_everything() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut tree = QuadTree::new(world(), DEFAULT_CAPACITY);

        let inserted: Vec<Point> = (0..500)
            .map(|_| {
                Point::new(Vec2::new(
                    rng.gen_range(-99.0..99.0),
                    rng.gen_range(-99.0..99.0),
                ))
            })
            .collect();
        for point in &inserted {
            assert!(tree.insert(*point));
        }

        let found = tree.query(&world());
        assert_eq!(found.len(), inserted.len());
        assert_eq!(sorted(&found), sorted(&inserted));
        assert_eq!(tree.len(), inserted.len());
    }

    #[test]
    fn query_only_returns_points_inside_range() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut tree = QuadTree::new(world(), DEFAULT_CAPACITY);
        let mut all = Vec::new();
        for _ in 0..300 {
            let p = Point::new(Vec2::new(
                rng.gen_range(-99.0..99.0),
                rng.gen_range(-99.0..99.0),
            ));
            tree.insert(p);
            all.push(p);
        }

        let range = AxisAlignedRect::new(Vec2::new(20.0, -15.0), 17.0, 9.0);
        let expected: Vec<Point> = all
            .iter()
            .copied()
            .filter(|p| range.contains(p.position))
            .collect();

        assert_eq!(sorted(&tree.query(&range)), sorted(&expected));
    }

    #[test]
    fn outside_points_are_ignored() {
        let mut tree = QuadTree::new(world(), DEFAULT_CAPACITY);

        assert!(!tree.insert(Point::new(Vec2::new(150.0, 0.0))));
        assert!(!tree.insert(Point::new(Vec2::new(100.0, 0.0))));
        assert!(tree.is_empty());
    }

    #[test]
    fn overflowing_leaf_subdivides_and_empties_itself() {
        let mut tree = QuadTree::new(world(), 4);
        for i in 0..5 {
            let offset = i as f32;
            tree.insert(Point::new(Vec2::new(40.0 + offset, 40.0 + offset)));
        }

        assert!(tree.is_divided());
        assert!(tree.points().is_empty());
        assert_eq!(tree.len(), 5);

        let children = tree.children().unwrap();
        for child in children.iter() {
            assert_eq!(child.depth(), 1);
        }
        // All five sit in the north-east quadrant, which has split again
        assert_eq!(children[1].len(), 5);
        assert!(children[1].is_divided());
    }

    #[test]
    fn divided_node_routes_new_points_to_children() {
        let mut tree = QuadTree::new(world(), 2);
        tree.insert(Point::new(Vec2::new(10.0, 10.0)));
        tree.insert(Point::new(Vec2::new(-10.0, 10.0)));
        tree.insert(Point::new(Vec2::new(10.0, -10.0)));
        assert!(tree.is_divided());

        tree.insert(Point::new(Vec2::new(-10.0, -10.0)));

        assert!(tree.points().is_empty());
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn point_on_split_line_is_dropped_when_node_splits() {
        let mut tree = QuadTree::new(world(), 4);
        for pos in [(10.0, 10.0), (-10.0, 10.0), (10.0, -10.0), (-10.0, -10.0)] {
            tree.insert(Point::new(Vec2::new(pos.0, pos.1)));
        }

        assert!(!tree.insert(Point::new(Vec2::ZERO)));
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn depth_cap_keeps_coincident_points_in_one_node() {
        let rect = AxisAlignedRect::square(Vec2::new(1.0, 1.0), 0.5);
        let mut node = QuadTree::with_depth(rect, MAX_DEPTH, DEFAULT_CAPACITY);

        for _ in 0..1000 {
            assert!(node.insert(Point::new(Vec2::new(1.1, 1.2))));
        }

        assert!(!node.is_divided());
        assert_eq!(node.points().len(), 1000);
    }

    #[test]
    fn coincident_points_from_root_stop_at_max_depth() {
        let mut tree = QuadTree::new(world(), DEFAULT_CAPACITY);
        for _ in 0..1000 {
            tree.insert(Point::new(Vec2::new(33.3, 12.7)));
        }

        assert_eq!(tree.len(), 1000);

        let mut node = &tree;
        while let Some(children) = node.children() {
            node = children
                .iter()
                .find(|child| !child.is_empty())
                .unwrap();
        }
        assert_eq!(node.depth(), MAX_DEPTH);
        assert_eq!(node.points().len(), 1000);
    }

    #[test]
    fn clear_is_total_and_idempotent() {
        let mut tree = QuadTree::new(world(), DEFAULT_CAPACITY);
        for i in 0..50 {
            let t = i as f32;
            tree.insert(Point::new(Vec2::new(t - 25.0, 25.0 - t * 0.5)));
        }
        assert!(tree.is_divided());

        tree.clear();
        assert!(tree.query(&world()).is_empty());
        assert!(!tree.is_divided());
        assert_eq!(tree.node_count(), 1);

        tree.clear();
        assert!(tree.is_empty());
    }

    #[test]
    fn clone_is_a_deep_copy() {
        let mut tree = QuadTree::new(world(), 1);
        tree.insert(Point::new(Vec2::new(5.0, 5.0)));
        tree.insert(Point::new(Vec2::new(-5.0, -5.0)));

        let copy = tree.clone();
        tree.clear();

        assert!(tree.is_empty());
        assert_eq!(copy.len(), 2);
        assert!(copy.is_divided());
    }

    #[test]
    fn clone_from_replaces_existing_subtree() {
        let mut source = QuadTree::new(world(), 1);
        source.insert(Point::new(Vec2::new(1.0, 1.0)));

        let mut dest = QuadTree::new(world(), 1);
        for i in 0..20 {
            dest.insert(Point::new(Vec2::new(i as f32 - 10.5, 3.0)));
        }

        dest.clone_from(&source);

        assert_eq!(dest.len(), 1);
        assert!(!dest.is_divided());
        assert_eq!(dest.node_count(), source.node_count());
    }

    #[test]
    fn boundaries_cover_every_node() {
        let mut tree = QuadTree::new(world(), 1);
        tree.insert(Point::new(Vec2::new(50.0, 50.0)));
        tree.insert(Point::new(Vec2::new(-50.0, -50.0)));

        let rects = tree.boundaries();
        assert_eq!(rects.len(), 5);
        assert_eq!(rects[0], world());
        assert_eq!(rects.len(), tree.node_count());
    }
}
