//! Human-aware lattice A* planner.

use super::frontier::Frontier;
use super::node::{step_offset, NeighborRef, Node, NodeKey, SocialType};
use crate::core::{GridIndex, Point2D};
use crate::geometry::Segment;
use crate::map::VectorMap;
use crate::social::Human;
use crate::viz::Canvas;
use serde::Deserialize;
use std::collections::HashMap;
use std::f32::consts::{PI, SQRT_2};
use std::rc::Rc;

/// Pedestrian displacement that triggers a social replan (meters).
const SOCIAL_MOVE_THRESHOLD: f32 = 0.5;
/// Pedestrian turn that triggers a social replan (radians).
const SOCIAL_TURN_THRESHOLD: f32 = 0.5;

/// Planner tuning knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct PlannerConfig {
    /// Lattice resolution in meters.
    #[serde(default = "default_resolution")]
    pub resolution: f32,

    /// Half-width of the collision cushion around each edge (meters).
    /// This is the robot half-width and is part of the planning contract.
    #[serde(default = "default_cushion_half_width")]
    pub cushion_half_width: f32,

    /// Pedestrians farther than this contribute no social cost (meters).
    #[serde(default = "default_social_radius")]
    pub social_radius: f32,

    /// Goal acceptance radius as a fraction of the resolution.
    #[serde(default = "default_goal_radius_factor")]
    pub goal_radius_factor: f32,

    /// Radius of the target-node selection circle (meters).
    #[serde(default = "default_replan_radius")]
    pub replan_radius: f32,

    /// Dead-end radius around failed locations, in resolutions.
    #[serde(default = "default_dead_end_radius_factor")]
    pub dead_end_radius_factor: f32,

    /// Expansion cap before the search is declared infeasible.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

fn default_resolution() -> f32 {
    0.5
}
fn default_cushion_half_width() -> f32 {
    0.5
}
fn default_social_radius() -> f32 {
    10.0
}
fn default_goal_radius_factor() -> f32 {
    0.71
}
fn default_replan_radius() -> f32 {
    2.0
}
fn default_dead_end_radius_factor() -> f32 {
    3.0
}
fn default_max_iterations() -> usize {
    1_000_000
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            resolution: default_resolution(),
            cushion_half_width: default_cushion_half_width(),
            social_radius: default_social_radius(),
            goal_radius_factor: default_goal_radius_factor(),
            replan_radius: default_replan_radius(),
            dead_end_radius_factor: default_dead_end_radius_factor(),
            max_iterations: default_max_iterations(),
        }
    }
}

/// Global path planner over a lazily expanded 8-connected lattice.
///
/// Owns the search state (nav map, frontier, failed-location blacklist) and
/// the registered pedestrian population. All operations are synchronous;
/// callers serialize access.
pub struct GlobalPlanner {
    config: PlannerConfig,
    map: VectorMap,
    nav_map: HashMap<NodeKey, Node>,
    frontier: Frontier,
    nav_goal: Point2D,
    global_path: Vec<NodeKey>,
    failed_locs: Vec<Point2D>,
    population: Vec<Rc<dyn Human>>,
    population_locs: Vec<Point2D>,
    population_angles: Vec<f32>,
    need_replan: bool,
    need_social_replan: bool,
}

impl GlobalPlanner {
    /// Create a planner over a loaded map.
    pub fn new(map: VectorMap, config: PlannerConfig) -> Self {
        Self {
            config,
            map,
            nav_map: HashMap::new(),
            frontier: Frontier::new(),
            nav_goal: Point2D::ZERO,
            global_path: Vec::new(),
            failed_locs: Vec::new(),
            population: Vec::new(),
            population_locs: Vec::new(),
            population_angles: Vec::new(),
            need_replan: false,
            need_social_replan: false,
        }
    }

    /// Change the lattice resolution.
    pub fn set_resolution(&mut self, resolution: f32) {
        self.config.resolution = resolution;
        log::info!("lattice resolution set to {:.3} m", resolution);
    }

    /// The vector map the planner checks collisions against.
    pub fn map(&self) -> &VectorMap {
        &self.map
    }

    /// The most recent global path (start to goal). A singleton
    /// `[NodeKey::START]` means the last search failed.
    pub fn global_path(&self) -> &[NodeKey] {
        &self.global_path
    }

    /// Look up an explored node.
    pub fn node(&self, key: NodeKey) -> Option<&Node> {
        self.nav_map.get(&key)
    }

    /// All explored nodes.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nav_map.values()
    }

    /// Sum of edge lengths along the current global path.
    pub fn path_length(&self) -> f32 {
        self.global_path
            .windows(2)
            .map(|w| self.nav_map[&w[0]].loc.distance(&self.nav_map[&w[1]].loc))
            .sum()
    }

    //====================== population management ======================//

    /// Register a pedestrian handle. The handle must stay valid until the
    /// population is cleared.
    pub fn add_human(&mut self, human: Rc<dyn Human>) {
        // A path planned without this pedestrian is stale.
        if !self.global_path.is_empty() {
            self.need_social_replan = true;
        }
        self.population_locs.push(human.loc());
        self.population_angles.push(human.angle());
        self.population.push(human);
    }

    /// Drop all registered pedestrians and their pose snapshots.
    pub fn clear_population(&mut self) {
        self.population.clear();
        self.population_locs.clear();
        self.population_angles.clear();
    }

    /// Whether a pedestrian visible from `robot_loc` has moved or turned
    /// enough since its last snapshot to invalidate the current path.
    /// Snapshots are refreshed as thresholds are crossed.
    pub fn needs_social_replan(&mut self, robot_loc: Point2D) -> bool {
        if self.need_social_replan {
            return true;
        }
        for (i, human) in self.population.iter().enumerate() {
            // An unseen pedestrian cannot invalidate the path.
            if human.is_hidden(robot_loc, &self.map) {
                continue;
            }
            let moved = human.loc().distance(&self.population_locs[i]) > SOCIAL_MOVE_THRESHOLD;
            let turned = crate::core::math::angle_diff(self.population_angles[i], human.angle())
                .abs()
                > SOCIAL_TURN_THRESHOLD;
            self.need_social_replan = self.need_social_replan || moved || turned;

            if moved {
                self.population_locs[i] = human.loc();
            }
            if turned {
                self.population_angles[i] = human.angle();
            }
        }
        self.need_social_replan
    }

    //========================= lattice expansion =======================//

    /// Collision test for a single lattice step starting at `loc`.
    ///
    /// The step edge is wrapped in a cushion box (edge extended past its far
    /// end and flanked at the cushion half-width); the step is valid only if
    /// neither the edge nor any cushion side touches a map wall.
    fn is_valid_step(&self, loc: Point2D, dx: i32, dy: i32) -> bool {
        if dx.abs() != 1 && dy.abs() != 1 {
            return false;
        }
        let offset = Point2D::new(dx as f32, dy as f32) * self.config.resolution;
        let edge = Segment::new(loc, loc + offset);
        if self.map.intersects_segment(&edge) {
            return false;
        }
        let cushions = cushion_box(&edge, self.config.cushion_half_width);
        !cushions.iter().any(|c| self.map.intersects_segment(c))
    }

    /// Enumerate the valid 8-connected neighbors of a node at `loc`.
    fn neighbors(&self, loc: Point2D, index: GridIndex) -> Vec<NeighborRef> {
        let straight = self.config.resolution;
        let diagonal = SQRT_2 * self.config.resolution;
        let mut neighbors = Vec::with_capacity(8);
        for direction in [0u8, 1, 2, 3, 5, 6, 7, 8] {
            let (dx, dy) = step_offset(direction);
            if !self.is_valid_step(loc, dx, dy) {
                continue;
            }
            let step_length = if dx != 0 && dy != 0 { diagonal } else { straight };
            let neighbor_index = index.offset(dx, dy);
            neighbors.push(NeighborRef {
                index: neighbor_index,
                key: NodeKey::from_index(neighbor_index),
                step_length,
                direction,
            });
        }
        neighbors
    }

    /// Materialize the neighbor of `parent` in the given direction and
    /// insert it into the nav map.
    fn new_node(&mut self, parent: &Node, direction: u8) -> NodeKey {
        let (dx, dy) = step_offset(direction);
        let offset = Point2D::new(dx as f32, dy as f32) * self.config.resolution;
        let loc = parent.loc + offset;
        let index = parent.index.offset(dx, dy);
        let key = NodeKey::from_index(index);

        let (social_cost, social_type) = self.social_cost(loc);
        let mut neighbors = self.neighbors(loc, index);

        // Dead-end any node near a location the controller failed to reach.
        let dead_end_radius = self.config.dead_end_radius_factor * self.config.resolution;
        if self
            .failed_locs
            .iter()
            .any(|bad| loc.distance(bad) < dead_end_radius)
        {
            neighbors.clear();
        }

        let node = Node {
            key,
            index,
            loc,
            cost: parent.cost + offset.length(),
            social_cost,
            social_type,
            parent: parent.key,
            neighbors,
            visited: false,
        };
        self.nav_map.insert(key, node);
        key
    }

    /// Dominant pedestrian cost at `loc` and the kind of cost that won.
    fn social_cost(&self, loc: Point2D) -> (f32, SocialType) {
        let mut max_cost = 0.0f32;
        let mut social_type = SocialType::None;

        for human in &self.population {
            if loc.distance(&human.loc()) > self.config.social_radius {
                continue;
            }
            if human.is_hidden(loc, &self.map) {
                // Surprise factor, evaluated at every wall the sight line crosses.
                let view = Segment::new(human.loc(), loc);
                for wall in self.map.segments() {
                    if let Some(hit) = wall.intersection(&view) {
                        let hidden = human.hidden_cost(loc, hit);
                        if hidden > max_cost {
                            max_cost = hidden;
                            social_type = SocialType::Hidden;
                        }
                    }
                }
            } else {
                let safety = human.safety_cost(loc);
                let visibility = human.visibility_cost(loc);
                let cost = safety.max(visibility);
                if cost > max_cost {
                    max_cost = cost;
                    social_type = if safety > visibility {
                        SocialType::Safety
                    } else {
                        SocialType::Visibility
                    };
                }
            }
        }
        (max_cost, social_type)
    }

    //=========================== search ================================//

    /// Reset the search lattice around a start location.
    ///
    /// The start node takes the reserved START key; its lattice index is the
    /// start location snapped to the grid (truncating division).
    pub fn initialize_map(&mut self, loc: Point2D) {
        self.nav_map.clear();
        self.frontier.clear();

        let res = self.config.resolution;
        let index = GridIndex::new((loc.x / res) as i32, (loc.y / res) as i32);
        let neighbors = self.neighbors(loc, index);
        let start = Node {
            key: NodeKey::START,
            index,
            loc,
            cost: 0.0,
            social_cost: 0.0,
            social_type: SocialType::None,
            parent: NodeKey::START,
            neighbors,
            visited: false,
        };
        self.nav_map.insert(NodeKey::START, start);
        self.frontier.push(NodeKey::START, 0.0);
    }

    /// Run A* from the initialized start toward `nav_goal`.
    ///
    /// On success the stored path runs start to goal, START key included.
    /// An infeasible search (frontier drained or iteration cap reached)
    /// leaves the singleton `[START]` path, which callers read as "no
    /// route".
    pub fn plan(&mut self, nav_goal: Point2D) -> &[NodeKey] {
        self.nav_goal = nav_goal;
        let goal_radius = self.config.goal_radius_factor * self.config.resolution;

        let mut success = false;
        let mut iterations: usize = 0;
        let mut current_key = NodeKey::START;

        while iterations < self.config.max_iterations {
            let Some(key) = self.frontier.pop() else { break };
            current_key = key;
            let current = match self.nav_map.get(&current_key) {
                Some(node) => node.clone(),
                None => continue,
            };

            if nav_goal.distance(&current.loc) < goal_radius {
                success = true;
                break;
            }

            for neighbor in &current.neighbors {
                let step_cost = current.cost + neighbor.step_length;

                if !self.nav_map.contains_key(&neighbor.key) {
                    let new_key = self.new_node(&current, neighbor.direction);
                    let (social, loc) = {
                        let node = &self.nav_map[&new_key];
                        (node.social_cost, node.loc)
                    };
                    self.frontier
                        .push(new_key, step_cost + social + octile_heuristic(nav_goal, loc));
                } else if let Some(node) = self.nav_map.get_mut(&neighbor.key) {
                    // Lazy relaxation: lower the cost, reparent, re-push.
                    if step_cost < node.cost {
                        node.cost = step_cost;
                        node.parent = current_key;
                        let priority =
                            step_cost + node.social_cost + octile_heuristic(nav_goal, node.loc);
                        self.frontier.push(neighbor.key, priority);
                    }
                }
            }
            iterations += 1;
        }

        let mut path = Vec::new();
        if success {
            let mut key = current_key;
            let mut travelled = 0.0f32;
            while !key.is_start() {
                path.push(key);
                let node = &self.nav_map[&key];
                let parent_loc = self.nav_map[&node.parent].loc;
                travelled += node.loc.distance(&parent_loc);
                key = node.parent;
            }
            path.push(NodeKey::START);
            path.reverse();
            log::info!(
                "global path found after {} iterations, {:.2} m travelled",
                iterations,
                travelled
            );
        } else {
            log::warn!("global path failure after {} iterations", iterations);
            path.push(NodeKey::START);
        }

        self.global_path = path;
        &self.global_path
    }

    //========================= replanning ==============================//

    /// Whether target-node selection decided the current path is no longer
    /// followable.
    pub fn needs_replan(&self) -> bool {
        self.need_replan
    }

    /// Rebuild the lattice from the robot location and re-run the search
    /// toward the stored goal, blacklisting the failed target when it is
    /// not simply the cell the robot already occupies.
    pub fn replan(&mut self, robot_loc: Point2D, failed_target_loc: Point2D) {
        if robot_loc.distance(&failed_target_loc) > SQRT_2 * self.config.resolution {
            self.failed_locs.push(failed_target_loc);
        }

        self.initialize_map(robot_loc);
        let goal = self.nav_goal;
        self.plan(goal);

        log::info!(
            "replanned around {} failed location(s)",
            self.failed_locs.len()
        );
        for bad in &self.failed_locs {
            log::debug!("avoiding ({:.2}, {:.2})", bad.x, bad.y);
        }

        self.need_replan = false;
        self.need_social_replan = false;
    }

    //===================== target-node selection =======================//

    /// Pick the path node the local controller should drive toward.
    ///
    /// Finds the path node closest to the robot, then the first node past
    /// the selection radius, and walks back toward the robot until the line
    /// of sight is wall-free. Coming within 4 indices of the closest node
    /// without a clear line flags a replan. Returns `None` when no path is
    /// stored.
    pub fn closest_path_node(&mut self, robot_loc: Point2D, canvas: &mut dyn Canvas) -> Option<Node> {
        if self.global_path.is_empty() {
            return None;
        }
        let radius = self.config.replan_radius;
        canvas.draw_arc(robot_loc, radius, 0.0, 2.0 * PI, 0x909090);

        let mut min_distance = f32::MAX;
        let mut closest_index = 0usize;
        for (i, key) in self.global_path.iter().enumerate() {
            let d = robot_loc.distance(&self.nav_map[key].loc);
            if d < min_distance {
                min_distance = d;
                closest_index = i;
            }
        }
        let closest_key = self.global_path[closest_index];
        if let Some(node) = self.nav_map.get_mut(&closest_key) {
            node.visited = true;
        }

        // Off the path entirely: hand back the closest node and ask for a
        // fresh plan.
        self.need_replan = min_distance > radius;
        if self.need_replan {
            return self.nav_map.get(&closest_key).cloned();
        }

        // First path node beyond the selection radius; the path end if the
        // remainder is all inside.
        let mut target_index = self.global_path.len() - 1;
        for i in closest_index..self.global_path.len() {
            let d = robot_loc.distance(&self.nav_map[&self.global_path[i]].loc);
            if d > radius {
                target_index = i;
                break;
            }
        }

        for i in (closest_index + 1..=target_index).rev() {
            let key = self.global_path[i];
            let loc = self.nav_map[&key].loc;
            canvas.draw_line(robot_loc, loc, 0x000000);

            if !self.map.intersects(robot_loc, loc) {
                return self.nav_map.get(&key).cloned();
            }
            if i < closest_index + 4 {
                self.need_replan = true;
                break;
            }
        }
        self.nav_map.get(&self.global_path[target_index]).cloned()
    }

    //========================= visualization ===========================//

    /// Draw the current global path and its endpoints.
    pub fn plot_global_path(&self, canvas: &mut dyn Canvas) {
        let (Some(first), Some(last)) = (self.global_path.first(), self.global_path.last()) else {
            return;
        };
        canvas.draw_cross(self.nav_map[first].loc, 0.5, 0xff0000);
        canvas.draw_cross(self.nav_map[last].loc, 0.5, 0xff0000);

        for key in &self.global_path {
            let node = &self.nav_map[key];
            let parent_loc = self.nav_map[&node.parent].loc;
            canvas.draw_line(node.loc, parent_loc, 0x009c08);
        }
    }

    /// Shade every explored node by its dominant social cost.
    ///
    /// The cost is clamped to [0.5, 1.0] for shading only; search costs are
    /// unclamped.
    pub fn plot_social_costs(&self, canvas: &mut dyn Canvas) {
        for node in self.nav_map.values() {
            let clamped = node.social_cost.clamp(0.5, 1.0);
            let shade = (255.0 * (1.0 - clamped)) as u32;
            let color = match node.social_type {
                SocialType::Safety => 0xff0000 + shade * 0x000101,
                SocialType::Visibility => 0x00ff00 + shade * 0x010001,
                SocialType::Hidden => 0x0000ff + shade * 0x010100,
                SocialType::None => 0xcccccc,
            };
            canvas.draw_point(node.loc, color);
        }
    }

    /// Draw the queued frontier nodes.
    pub fn plot_frontier(&self, canvas: &mut dyn Canvas) {
        for key in self.frontier.keys() {
            if let Some(node) = self.nav_map.get(&key) {
                canvas.draw_point(node.loc, 0x0000ff);
            }
        }
    }

    /// Draw a node and its immediate neighbors.
    pub fn plot_node_neighbors(&self, node: &Node, canvas: &mut dyn Canvas) {
        canvas.draw_cross(node.loc, 2.0, 0xff0000);
        for neighbor in &node.neighbors {
            let (dx, dy) = step_offset(neighbor.direction);
            let neighbor_loc =
                node.loc + Point2D::new(dx as f32, dy as f32) * self.config.resolution;
            canvas.draw_point(neighbor_loc, 0xff9900);
            canvas.draw_line(node.loc, neighbor_loc, 0x000dff);
        }
    }

    /// Mark the blacklisted failed locations.
    pub fn plot_invalid_nodes(&self, canvas: &mut dyn Canvas) {
        for loc in &self.failed_locs {
            canvas.draw_cross(*loc, 0.5, 0x000000);
        }
    }
}

/// Octile distance: the shortest path length on an obstacle-free
/// 8-connected lattice with unit cardinal steps.
#[inline]
fn octile_heuristic(goal: Point2D, loc: Point2D) -> f32 {
    let a = (goal.x - loc.x).abs();
    let b = (goal.y - loc.y).abs();
    let straight = (a - b).abs();
    let diagonal = SQRT_2 * (a + b - straight) * 0.5;
    straight + diagonal
}

/// Cushion box around a step edge: the edge extended by `offset` past its
/// far end, flanked at ±`offset` along the unit normal, with closing caps.
fn cushion_box(edge: &Segment, offset: f32) -> [Segment; 4] {
    let unit = edge.direction().normalized();
    let extended = edge.p1 + unit * offset;
    let normal = edge.unit_normal();

    let a0 = edge.p0 + normal * offset;
    let a1 = extended + normal * offset;
    let b0 = edge.p0 - normal * offset;
    let b1 = extended - normal * offset;

    [
        Segment::new(a0, a1),
        Segment::new(b0, b1),
        Segment::new(a0, b0),
        Segment::new(a1, b1),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Segment;
    use crate::social::Pedestrian;
    use crate::viz::NullCanvas;
    use approx::assert_relative_eq;

    fn empty_planner() -> GlobalPlanner {
        let config = PlannerConfig {
            resolution: 1.0,
            ..Default::default()
        };
        GlobalPlanner::new(VectorMap::from_segments(Vec::new()), config)
    }

    #[test]
    fn test_octile_heuristic_values() {
        let goal = Point2D::new(3.0, 0.0);
        assert_relative_eq!(octile_heuristic(goal, Point2D::ZERO), 3.0);
        assert_relative_eq!(
            octile_heuristic(Point2D::new(2.0, 2.0), Point2D::ZERO),
            2.0 * SQRT_2,
            epsilon = 1e-6
        );
        assert_relative_eq!(
            octile_heuristic(Point2D::new(3.0, 1.0), Point2D::ZERO),
            2.0 + SQRT_2,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_octile_heuristic_admissible() {
        // True obstacle-free cost: diagonal steps over the shorter span,
        // straight steps over the remainder.
        for (dx, dy) in [(5i32, 2i32), (1, 7), (4, 4), (0, 3), (6, 0)] {
            let goal = Point2D::new(dx as f32, dy as f32);
            let (a, b) = (dx.abs().min(dy.abs()), dx.abs().max(dy.abs()));
            let true_cost = a as f32 * SQRT_2 + (b - a) as f32;
            assert!(octile_heuristic(goal, Point2D::ZERO) <= true_cost + 1e-5);
        }
    }

    #[test]
    fn test_cushion_box_geometry() {
        let edge = Segment::from_coords(0.0, 0.0, 1.0, 0.0);
        let cushions = cushion_box(&edge, 0.5);
        // Flanks run from x=0 to x=1.5 at y=±0.5.
        assert_relative_eq!(cushions[0].p0.y, 0.5);
        assert_relative_eq!(cushions[0].p1.x, 1.5);
        assert_relative_eq!(cushions[1].p0.y, -0.5);
        // Caps close the rectangle.
        assert_relative_eq!(cushions[2].p0.x, 0.0);
        assert_relative_eq!(cushions[3].p0.x, 1.5);
    }

    #[test]
    fn test_step_rejected_by_cushion() {
        // Wall parallel to the step, inside the cushion band but clear of
        // the edge itself.
        let map = VectorMap::from_segments(vec![Segment::from_coords(0.4, 0.4, 0.6, 0.4)]);
        let planner = GlobalPlanner::new(
            map,
            PlannerConfig {
                resolution: 1.0,
                ..Default::default()
            },
        );
        assert!(!planner.is_valid_step(Point2D::ZERO, 1, 0));
        // The same wall moved past the cushion band no longer blocks.
        let map = VectorMap::from_segments(vec![Segment::from_coords(0.4, 0.6, 0.6, 0.6)]);
        let planner = GlobalPlanner::new(
            map,
            PlannerConfig {
                resolution: 1.0,
                ..Default::default()
            },
        );
        assert!(planner.is_valid_step(Point2D::ZERO, 1, 0));
    }

    #[test]
    fn test_initialize_map_snaps_start_index() {
        let mut planner = empty_planner();
        planner.initialize_map(Point2D::new(2.7, -1.2));
        let start = planner.node(NodeKey::START).unwrap();
        assert_eq!(start.index, GridIndex::new(2, -1));
        assert_eq!(start.parent, NodeKey::START);
        assert_relative_eq!(start.cost, 0.0);
        assert_eq!(start.neighbors.len(), 8);
    }

    #[test]
    fn test_social_cost_tags_dominant_type() {
        let mut planner = empty_planner();
        planner.add_human(Rc::new(Pedestrian::new(Point2D::new(2.0, 0.0), 0.0)));

        // In front of the pedestrian: visibility is free, safety dominates.
        let (cost, social_type) = planner.social_cost(Point2D::new(3.0, 0.0));
        assert!(cost > 0.0);
        assert_eq!(social_type, SocialType::Safety);

        // Beyond the social radius: no contribution.
        let (cost, social_type) = planner.social_cost(Point2D::new(40.0, 0.0));
        assert_eq!(cost, 0.0);
        assert_eq!(social_type, SocialType::None);
    }

    #[test]
    fn test_social_cost_hidden_behind_wall() {
        let map = VectorMap::from_segments(vec![Segment::from_coords(3.0, -2.0, 3.0, 2.0)]);
        let mut planner = GlobalPlanner::new(
            map,
            PlannerConfig {
                resolution: 1.0,
                ..Default::default()
            },
        );
        planner.add_human(Rc::new(Pedestrian::new(Point2D::ZERO, 0.0)));

        let (cost, social_type) = planner.social_cost(Point2D::new(4.0, 0.0));
        assert!(cost > 0.0);
        assert_eq!(social_type, SocialType::Hidden);
    }

    #[test]
    fn test_needs_social_replan_thresholds() {
        let mut planner = empty_planner();
        let ped = Rc::new(Pedestrian::new(Point2D::new(3.0, 0.0), 0.0));
        planner.add_human(ped.clone());
        let robot = Point2D::ZERO;

        assert!(!planner.needs_social_replan(robot));

        // Below thresholds: still quiet, snapshot untouched.
        ped.set_loc(Point2D::new(3.3, 0.0));
        assert!(!planner.needs_social_replan(robot));

        // Past the displacement threshold.
        ped.set_loc(Point2D::new(3.6, 0.0));
        assert!(planner.needs_social_replan(robot));
    }

    #[test]
    fn test_add_human_flags_existing_path() {
        let mut planner = empty_planner();
        planner.initialize_map(Point2D::ZERO);
        planner.plan(Point2D::new(2.0, 0.0));
        planner.add_human(Rc::new(Pedestrian::new(Point2D::new(10.0, 10.0), 0.0)));
        assert!(planner.needs_social_replan(Point2D::ZERO));
    }

    #[test]
    fn test_target_selection_within_radius() {
        let mut planner = empty_planner();
        planner.initialize_map(Point2D::ZERO);
        planner.plan(Point2D::new(5.0, 0.0));

        let target = planner
            .closest_path_node(Point2D::ZERO, &mut NullCanvas)
            .unwrap();
        // First node past the 2 m circle with a clear line of sight.
        assert!(target.loc.distance(&Point2D::ZERO) > 2.0);
        assert!(!planner.needs_replan());
    }

    #[test]
    fn test_target_selection_far_from_path() {
        let mut planner = empty_planner();
        planner.initialize_map(Point2D::ZERO);
        planner.plan(Point2D::new(5.0, 0.0));

        let target = planner
            .closest_path_node(Point2D::new(0.0, 30.0), &mut NullCanvas)
            .unwrap();
        assert!(planner.needs_replan());
        // Closest node is returned for reference.
        assert!(target.loc.y.abs() < 1.5);
    }

    #[test]
    fn test_closest_path_node_empty_path() {
        let mut planner = empty_planner();
        assert!(planner
            .closest_path_node(Point2D::ZERO, &mut NullCanvas)
            .is_none());
    }
}
