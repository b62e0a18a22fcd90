//! Force-directed placement.
//!
//! Pairwise repulsion, spring attraction along edges and a weak pull towards
//! the origin. Each iteration moves a node by at most `MAX_STEP * temperature`,
//! where the temperature cools linearly from `alpha` to zero.

use std::collections::HashMap;

/// Drawn radius of every node.
pub const NODE_RADIUS: f64 = 25.0;

const REPULSION: f64 = 5000.0;
const SPRING_LENGTH: f64 = 120.0;
const SPRING_STRENGTH: f64 = 0.05;
const GRAVITY: f64 = 0.01;
const MAX_STEP: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceLayout {
    pub alpha: f64,
    pub iterations: usize,
}

impl ForceLayout {
    /// First layout of a graph.
    pub fn full() -> Self {
        Self { alpha: 1.0, iterations: 100 }
    }

    /// New nodes joining an already laid-out graph.
    pub fn incremental() -> Self {
        Self { alpha: 0.3, iterations: 10 }
    }

    /// User-requested rearrangement of everything.
    pub fn refresh() -> Self {
        Self { alpha: 0.8, iterations: 30 }
    }

    /// Move the nodes accepted by `movable`; every other node stays put but
    /// still exerts forces.
    ///
    /// `order` fixes the iteration order so results are deterministic. Ids in
    /// `order` without a position are ignored, as are edges to them.
    pub fn run<F>(&self, positions: &mut HashMap<String, Point>, order: &[String], edges: &[(String, String)], movable: F)
    where
        F: Fn(&str) -> bool,
    {
        let ids: Vec<&String> = order.iter().filter(|id| positions.contains_key(*id)).collect();
        if ids.is_empty() || self.iterations == 0 {
            return;
        }
        let index: HashMap<&str, usize> = ids.iter().enumerate().map(|(i, id)| (id.as_str(), i)).collect();
        let mut points: Vec<Point> = ids.iter().map(|id| positions[*id]).collect();
        let moves: Vec<bool> = ids.iter().map(|id| movable(id)).collect();
        let springs: Vec<(usize, usize)> = edges
            .iter()
            .filter_map(|(s, t)| Some((*index.get(s.as_str())?, *index.get(t.as_str())?)))
            .filter(|(s, t)| s != t)
            .collect();

        for step in 0..self.iterations {
            let temperature = self.alpha * (1.0 - step as f64 / self.iterations as f64);
            let mut forces = vec![Point::default(); points.len()];

            for i in 0..points.len() {
                for j in (i + 1)..points.len() {
                    let mut dx = points[i].x - points[j].x;
                    let mut dy = points[i].y - points[j].y;
                    if dx == 0.0 && dy == 0.0 {
                        // Coincident nodes get pushed apart along a fixed axis.
                        dx = (j - i) as f64 * 0.01;
                        dy = 0.01;
                    }
                    let dist_sq = dx * dx + dy * dy + 0.1;
                    let force = REPULSION / dist_sq;
                    forces[i].x += dx * force;
                    forces[i].y += dy * force;
                    forces[j].x -= dx * force;
                    forces[j].y -= dy * force;
                }
            }

            for &(s, t) in &springs {
                let dx = points[t].x - points[s].x;
                let dy = points[t].y - points[s].y;
                let dist = (dx * dx + dy * dy).sqrt().max(0.01);
                let force = (dist - SPRING_LENGTH) * SPRING_STRENGTH;
                let (fx, fy) = (dx / dist * force, dy / dist * force);
                forces[s].x += fx;
                forces[s].y += fy;
                forces[t].x -= fx;
                forces[t].y -= fy;
            }

            let limit = MAX_STEP * temperature;
            for (i, point) in points.iter_mut().enumerate() {
                if !moves[i] {
                    continue;
                }
                point.x += (forces[i].x - point.x * GRAVITY).clamp(-limit, limit);
                point.y += (forces[i].y - point.y * GRAVITY).clamp(-limit, limit);
            }
        }

        for (id, point) in ids.into_iter().zip(points) {
            positions.insert(id.clone(), point);
        }
    }
}

/// Starting positions on a circle, in `order`.
pub fn circle_positions(order: &[String]) -> HashMap<String, Point> {
    let n = order.len().max(1) as f64;
    let radius = SPRING_LENGTH * n.sqrt();
    order
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let angle = std::f64::consts::TAU * i as f64 / n;
            (id.clone(), Point::new(radius * angle.cos(), radius * angle.sin()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn presets() {
        assert_eq!(ForceLayout::incremental(), ForceLayout { alpha: 0.3, iterations: 10 });
        assert_eq!(ForceLayout::refresh(), ForceLayout { alpha: 0.8, iterations: 30 });
        assert_eq!(ForceLayout::full().iterations, 100);
    }

    #[test]
    fn pinned_nodes_do_not_move() {
        let order = ids(&["a", "b", "c"]);
        let mut positions = circle_positions(&order);
        let before = positions.clone();
        let edges = vec![("a".to_string(), "c".to_string())];

        ForceLayout::full().run(&mut positions, &order, &edges, |id| id == "c");

        assert_eq!(positions["a"], before["a"]);
        assert_eq!(positions["b"], before["b"]);
        assert_ne!(positions["c"], before["c"]);
    }

    #[test]
    fn coincident_nodes_are_separated() {
        let order = ids(&["a", "b"]);
        let mut positions: HashMap<String, Point> =
            order.iter().map(|id| (id.clone(), Point::default())).collect();

        ForceLayout::full().run(&mut positions, &order, &[], |_| true);

        assert!(positions["a"].distance(&positions["b"]) > 1.0);
        assert!(positions.values().all(|p| p.x.is_finite() && p.y.is_finite()));
    }

    #[test]
    fn layout_is_deterministic() {
        let order = ids(&["a", "b", "c", "d"]);
        let edges = vec![("a".to_string(), "b".to_string()), ("c".to_string(), "d".to_string())];
        let run = || {
            let mut positions = circle_positions(&order);
            ForceLayout::full().run(&mut positions, &order, &edges, |_| true);
            positions
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let order = ids(&["a", "ghost"]);
        let mut positions: HashMap<String, Point> = [("a".to_string(), Point::new(5.0, 5.0))].into();
        let edges = vec![("a".to_string(), "ghost".to_string())];

        ForceLayout::incremental().run(&mut positions, &order, &edges, |_| true);
        assert_eq!(positions.len(), 1);
    }
}
