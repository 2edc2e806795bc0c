use std::collections::VecDeque;

use nalgebra::Vector3;

use crate::{
    constants::{
        FLIGHT_PRELOAD_NODES_AHEAD, MIN_SEGMENT_LENGTH, PLAYER_FLIGHT_SPEED,
        SKIP_SPLINE_POINT_DISTANCE_SQ,
    },
    event::EventId,
    move_spline::MoveSplineInit,
};

use super::{GeneratorFlag, GeneratorFlags, MotionContext, MotionKind, MovementGenerator};

/// One waypoint of a taxi path.
#[derive(Clone, Debug, PartialEq)]
pub struct TaxiPathNode {
    pub map_id: u32,
    pub position: Vector3<f32>,
    /// The rider is teleported from this node to the next one.
    pub teleport: bool,
    pub arrival_event: Option<EventId>,
    pub departure_event: Option<EventId>,
}

/// Nodes and fare between two adjacent taxi stops.
#[derive(Clone, Debug, PartialEq)]
pub struct TaxiLeg {
    pub nodes: Vec<TaxiPathNode>,
    pub cost: u32,
}

/// Where taxi route data comes from.
pub trait TaxiPathSource {
    fn leg(&self, from: u32, to: u32) -> Option<TaxiLeg>;
}

/// Boundary between two legs of the stitched path, with the fare of the leg it ends.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PathSwitch {
    pub path_index: usize,
    pub cost: u32,
}

/// Flies a rider along a multi-leg taxi route.
///
/// The whole route is stitched into one node list by [`load_path`]. Each launched
/// spline only covers the nodes up to the next map change or teleport; at that boundary
/// the rider is teleported and the next stretch is launched.
///
/// [`load_path`]: FlightPathMovementGenerator::load_path
#[derive(Clone, Debug, Default)]
pub struct FlightPathMovementGenerator {
    /// Taxi stops still ahead; the front is the stop the current leg started at.
    pub route: VecDeque<u32>,
    pub path: Vec<TaxiPathNode>,
    pub current_node: usize,
    pub path_switches: VecDeque<PathSwitch>,
    pub end_map_id: u32,
    pub end_grid_x: f32,
    pub end_grid_y: f32,
    pub preload_target_node: usize,
    pub flags: GeneratorFlags,
}

/// Whether `node` is far enough from `reference` to keep both when stitching legs.
fn is_node_included(reference: &TaxiPathNode, node: &TaxiPathNode) -> bool {
    if reference.map_id != node.map_id {
        return true;
    }
    let dx = reference.position.x - node.position.x;
    let dy = reference.position.y - node.position.y;
    dx * dx + dy * dy > SKIP_SPLINE_POINT_DISTANCE_SQ
}

impl FlightPathMovementGenerator {
    pub fn new(route: impl IntoIterator<Item = u32>) -> Self {
        let mut flags = GeneratorFlags::default();
        flags.add(GeneratorFlag::InitializationPending);
        Self {
            route: route.into_iter().collect(),
            flags,
            ..Default::default()
        }
    }

    /// Resolves every leg of the route into one node list.
    ///
    /// Nodes near a leg boundary are trimmed so the stitched path does not double back.
    /// `discount` scales every leg fare (rounded up).
    pub fn load_path(&mut self, source: &impl TaxiPathSource, discount: f32, start_node: usize) {
        self.path.clear();
        self.current_node = start_node;
        self.path_switches.clear();

        let stops: Vec<u32> = self.route.iter().copied().collect();
        let last_dst = stops.len().saturating_sub(1);
        for dst in 1..stops.len() {
            let src = dst - 1;
            let Some(leg) = source.leg(stops[src], stops[dst]) else {
                log::error!(
                    "FlightPathMovementGenerator::load_path: no taxi path from {} to {}",
                    stops[src],
                    stops[dst]
                );
                return;
            };

            if let (Some(start), Some(end)) = (leg.nodes.first(), leg.nodes.last()) {
                let leg_start_len = self.path.len();
                let mut passed_previous_leg_check = false;
                for (i, node) in leg.nodes.iter().enumerate() {
                    let clear_of_previous = passed_previous_leg_check
                        || src == 0
                        || self
                            .path
                            .last()
                            .is_none_or(|back| is_node_included(back, node));

                    if !clear_of_previous {
                        self.path.pop();
                        if let Some(switch) = self.path_switches.back_mut() {
                            switch.path_index = switch.path_index.saturating_sub(1);
                        }
                        continue;
                    }

                    let keep_start = src == 0 || (is_node_included(start, node) && i >= 2);
                    let keep_end = dst == last_dst
                        || (is_node_included(end, node) && i + 1 < leg.nodes.len());
                    if !(keep_start && keep_end) {
                        continue;
                    }

                    // Two legs never meet on a pair of teleport nodes.
                    let doubled_teleport = self.path.len() == leg_start_len
                        && node.teleport
                        && self.path.last().is_some_and(|back| back.teleport);
                    if doubled_teleport {
                        continue;
                    }

                    passed_previous_leg_check = true;
                    self.path.push(node.clone());
                }
            }

            self.path_switches.push_back(PathSwitch {
                path_index: self.path.len().saturating_sub(1),
                cost: (leg.cost as f32 * discount).ceil() as u32,
            });
        }
    }

    /// First node index past the current map stretch (a map change, or just after a
    /// teleport node).
    pub fn path_at_map_end(&self) -> usize {
        let Some(current) = self.path.get(self.current_node) else {
            return self.path.len();
        };
        for (index, node) in self.path.iter().enumerate().skip(self.current_node) {
            if node.map_id != current.map_id {
                return index;
            }
            if node.teleport {
                return index + 1;
            }
        }
        self.path.len()
    }

    /// Skips to the first node on the next map after an external teleport.
    pub fn set_current_node_after_teleport(&mut self) {
        let Some(current) = self.path.get(self.current_node) else {
            return;
        };
        let map_id = current.map_id;
        if let Some(offset) = self.path[self.current_node + 1..]
            .iter()
            .position(|node| node.map_id != map_id)
        {
            self.current_node += offset + 1;
        }
    }

    pub fn current_node(&self) -> usize {
        self.current_node
    }

    pub fn path(&self) -> &[TaxiPathNode] {
        &self.path
    }

    fn init_end_grid_info(&mut self) {
        let Some(last) = self.path.last() else {
            return;
        };
        self.end_map_id = last.map_id;
        self.end_grid_x = last.position.x;
        self.end_grid_y = last.position.y;

        let last_index = self.path.len() - 1;
        let mut target = self.path.len().saturating_sub(FLIGHT_PRELOAD_NODES_AHEAD);
        while target < last_index && self.path[target].map_id != self.end_map_id {
            target += 1;
        }
        self.preload_target_node = target;
    }

    fn preload_end_grid(&self, ctx: &mut MotionContext<'_>) {
        if self.preload_target_node < self.path.len() {
            log::debug!(
                "FlightPathMovementGenerator: mover {} preloading map {} at ({}, {})",
                ctx.mover.id,
                self.end_map_id,
                self.end_grid_x,
                self.end_grid_y
            );
            ctx.hooks.preload_grid(self.end_map_id, self.end_grid_x, self.end_grid_y);
        }
    }

    fn fire_node_event(&self, ctx: &mut MotionContext<'_>, index: usize, departure: bool) {
        let Some(node) = self.path.get(index) else {
            return;
        };
        let event = if departure {
            node.departure_event
        } else {
            node.arrival_event
        };
        if let Some(event) = event {
            ctx.hooks.fire_event(event, ctx.mover.id, ctx.mover.id);
        }
    }

    /// Pops every leg boundary at or behind the current node, charging the next leg.
    fn advance_path_switches(&mut self, ctx: &mut MotionContext<'_>) {
        while self
            .path_switches
            .front()
            .is_some_and(|switch| switch.path_index <= self.current_node)
        {
            self.path_switches.pop_front();
            self.route.pop_front();
            if let Some(next) = self.path_switches.front() {
                ctx.hooks.charge_fare(ctx.mover.id, next.cost);
            }
        }
    }

    /// The current stretch ended at a map change or teleport node: jump to the next one.
    fn continue_after_boundary(&mut self, ctx: &mut MotionContext<'_>) {
        self.fire_node_event(ctx, self.current_node, true);

        let next = self.current_node + 1;
        if self.path[next].map_id != self.path[self.current_node].map_id {
            self.set_current_node_after_teleport();
        } else {
            self.current_node = next;
        }

        let node = &self.path[self.current_node];
        log::debug!(
            "FlightPathMovementGenerator: mover {} teleported to node {} on map {}",
            ctx.mover.id,
            self.current_node,
            node.map_id
        );
        let orientation = ctx.mover.orientation;
        ctx.mover.teleport_to(node.map_id, node.position, orientation);

        self.fire_node_event(ctx, self.current_node, false);
        self.advance_path_switches(ctx);
        self.reset(ctx);
    }
}

impl MovementGenerator for FlightPathMovementGenerator {
    fn kind(&self) -> MotionKind {
        MotionKind::Flight
    }

    fn flags(&self) -> GeneratorFlags {
        self.flags
    }

    fn initialize(&mut self, ctx: &mut MotionContext<'_>) {
        let first_activation = self.flags.has(GeneratorFlag::InitializationPending);
        self.flags.remove_many(&[
            GeneratorFlag::InitializationPending,
            GeneratorFlag::Deactivated,
        ]);
        self.flags.add(GeneratorFlag::Initialized);

        // Later legs are charged as their boundaries are crossed.
        if first_activation && let Some(first_leg) = self.path_switches.front() {
            ctx.hooks.charge_fare(ctx.mover.id, first_leg.cost);
        }

        self.reset(ctx);
        self.init_end_grid_info();
    }

    fn reset(&mut self, ctx: &mut MotionContext<'_>) {
        self.flags.remove(GeneratorFlag::Deactivated);

        let end = self.path_at_map_end();
        let mut from = self.current_node;
        // The rider may already stand on the current node (start, or after a teleport).
        if let Some(node) = self.path.get(from)
            && (node.position - ctx.mover.real_location().position).norm() < MIN_SEGMENT_LENGTH
        {
            from += 1;
        }
        if from >= end {
            log::debug!(
                "FlightPathMovementGenerator: mover {} has no nodes left on this map (node {})",
                ctx.mover.id,
                self.current_node
            );
            return;
        }

        let controls: Vec<Vector3<f32>> =
            self.path[from..end].iter().map(|node| node.position).collect();
        let mut init = MoveSplineInit::new();
        init.move_by_path(&controls, from as i32)
            .set_fly()
            .set_smooth()
            .set_uncompressed()
            .set_walk(true)
            .set_velocity(PLAYER_FLIGHT_SPEED);
        init.launch(ctx.mover);
    }

    fn update(&mut self, ctx: &mut MotionContext<'_>, _diff: u32) -> bool {
        if self.flags.has(GeneratorFlag::Finalized) {
            return false;
        }

        // Spline point 0 is the rider's start, not a taxi node.
        let point_id = (ctx.mover.spline.current_path_idx() - 1).max(0) as usize;
        if point_id > self.current_node && self.current_node + 1 < self.path.len() {
            let mut departure = true;
            loop {
                self.fire_node_event(ctx, self.current_node, departure);
                self.advance_path_switches(ctx);
                if point_id == self.current_node {
                    break;
                }
                if departure {
                    if self.current_node == self.preload_target_node {
                        self.preload_end_grid(ctx);
                    }
                    self.current_node += 1;
                }
                departure = !departure;
                if self.current_node >= self.path.len() {
                    break;
                }
            }
        }

        if self.current_node + 1 >= self.path.len() {
            self.flags.add(GeneratorFlag::InformEnabled);
            return false;
        }

        if ctx.mover.spline.finalized() {
            self.continue_after_boundary(ctx);
        }
        true
    }

    fn deactivate(&mut self, _ctx: &mut MotionContext<'_>) {
        self.flags.add(GeneratorFlag::Deactivated);
    }

    fn finalize(&mut self, ctx: &mut MotionContext<'_>, active: bool, movement_inform: bool) {
        self.flags.add(GeneratorFlag::Finalized);
        if !active {
            return;
        }

        self.route.clear();

        // Correct any drift at landing, unless the route ends on a teleport.
        let count = self.path.len();
        let ends_on_teleport =
            count >= 2 && self.path[count - 2].teleport && self.path[count - 1].teleport;
        if let Some(last) = self.path.last()
            && !ends_on_teleport
        {
            let orientation = ctx.mover.orientation;
            ctx.mover.teleport_to(last.map_id, last.position, orientation);
        }

        if movement_inform && self.flags.has(GeneratorFlag::InformEnabled) {
            self.flags.remove(GeneratorFlag::InformEnabled);
            let point_id = count.saturating_sub(1) as u32;
            ctx.hooks.movement_inform(ctx.mover.id, MotionKind::Flight, point_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::{
        generators::recording::{HookCall, RecordingHooks},
        mover::Mover,
    };

    #[derive(Default)]
    struct Routes(HashMap<(u32, u32), TaxiLeg>);

    impl TaxiPathSource for Routes {
        fn leg(&self, from: u32, to: u32) -> Option<TaxiLeg> {
            self.0.get(&(from, to)).cloned()
        }
    }

    /// Nodes along +X on `map_id`; event ids encode `base + index`.
    fn nodes(map_id: u32, xs: &[f32], event_base: u32) -> Vec<TaxiPathNode> {
        xs.iter()
            .enumerate()
            .map(|(i, &x)| TaxiPathNode {
                map_id,
                position: Vector3::new(x, 0.0, 50.0),
                teleport: false,
                departure_event: Some(EventId::new(event_base + 100 + i as u32)),
                arrival_event: Some(EventId::new(event_base + 200 + i as u32)),
            })
            .collect()
    }

    fn two_leg_routes() -> Routes {
        let mut routes = Routes::default();
        routes.0.insert(
            (1, 2),
            TaxiLeg {
                nodes: nodes(0, &[0.0, 100.0, 200.0, 300.0], 0),
                cost: 100,
            },
        );
        routes.0.insert(
            (2, 3),
            TaxiLeg {
                nodes: nodes(0, &[300.0, 400.0, 500.0, 600.0], 10),
                cost: 51,
            },
        );
        routes
    }

    /// Ticks mover and generator until the generator is done.
    fn fly(
        generator: &mut FlightPathMovementGenerator,
        mover: &mut Mover,
        hooks: &mut RecordingHooks,
    ) {
        for _ in 0..10_000 {
            mover.update_movement(100, |_| None);
            if !generator.update(&mut MotionContext::new(mover, hooks), 100) {
                return;
            }
        }
        panic!("flight never ended");
    }

    #[test]
    fn stitching_trims_leg_boundaries() {
        let mut generator = FlightPathMovementGenerator::new([1, 2, 3]);
        generator.load_path(&two_leg_routes(), 0.9, 0);

        let xs: Vec<f32> = generator.path.iter().map(|node| node.position.x).collect();
        assert_eq!(xs, vec![0.0, 100.0, 200.0, 500.0, 600.0]);
        assert_eq!(
            generator.path_switches,
            VecDeque::from(vec![
                PathSwitch {
                    path_index: 2,
                    cost: 90
                },
                PathSwitch {
                    path_index: 4,
                    cost: 46
                },
            ])
        );
    }

    #[test]
    fn close_boundary_node_replaces_the_previous_one() {
        let mut routes = Routes::default();
        routes.0.insert(
            (1, 2),
            TaxiLeg {
                nodes: nodes(0, &[0.0, 100.0, 200.0, 300.0], 0),
                cost: 10,
            },
        );
        routes.0.insert(
            (2, 3),
            TaxiLeg {
                nodes: nodes(0, &[210.0, 400.0, 500.0, 600.0], 10),
                cost: 10,
            },
        );
        let mut generator = FlightPathMovementGenerator::new([1, 2, 3]);
        generator.load_path(&routes, 1.0, 0);

        let xs: Vec<f32> = generator.path.iter().map(|node| node.position.x).collect();
        assert_eq!(xs, vec![0.0, 100.0, 500.0, 600.0]);
        assert_eq!(generator.path_switches[0].path_index, 1);
    }

    #[test]
    fn fares_and_events_fire_once_in_order() {
        let mut generator = FlightPathMovementGenerator::new([1, 2, 3]);
        generator.load_path(&two_leg_routes(), 0.9, 0);
        let mut mover = Mover::new(5, 0, Vector3::new(0.0, 0.0, 50.0), 0.0);
        let mut hooks = RecordingHooks::default();

        generator.initialize(&mut MotionContext::new(&mut mover, &mut hooks));
        assert!(mover.is_moving());
        fly(&mut generator, &mut mover, &mut hooks);
        generator.finalize(&mut MotionContext::new(&mut mover, &mut hooks), true, true);

        assert_eq!(hooks.total_fares(), 90 + 46);
        assert_eq!(
            hooks.event_ids(),
            vec![100, 201, 101, 202, 102, 212, 112, 213]
        );
        assert_eq!(hooks.count(|call| matches!(call, HookCall::Preload { .. })), 1);
        assert!(generator.route.is_empty());
        assert_eq!(mover.position, Vector3::new(600.0, 0.0, 50.0));
        assert!(matches!(
            hooks.calls.last(),
            Some(HookCall::Inform {
                kind: MotionKind::Flight,
                point_id: 4,
                ..
            })
        ));
    }

    #[test]
    fn map_change_teleports_and_continues() {
        let mut path = nodes(0, &[0.0, 100.0], 0);
        path.extend(nodes(1, &[5000.0, 5100.0], 2));
        let mut routes = Routes::default();
        routes.0.insert((1, 2), TaxiLeg { nodes: path, cost: 7 });

        let mut generator = FlightPathMovementGenerator::new([1, 2]);
        generator.load_path(&routes, 1.0, 0);
        assert_eq!(generator.path_at_map_end(), 2);

        let mut mover = Mover::new(5, 0, Vector3::new(0.0, 0.0, 50.0), 0.0);
        let mut hooks = RecordingHooks::default();
        generator.initialize(&mut MotionContext::new(&mut mover, &mut hooks));
        assert_eq!(generator.preload_target_node, 2);

        fly(&mut generator, &mut mover, &mut hooks);
        assert_eq!(mover.map_id, 1);
        assert_eq!(hooks.event_ids(), vec![100, 201, 101, 202, 102, 203]);
        assert_eq!(
            hooks.count(|call| matches!(call, HookCall::Preload { map_id: 1, .. })),
            1
        );
        assert_eq!(hooks.total_fares(), 7);
    }

    #[test]
    fn teleport_pair_at_leg_join_is_not_doubled() {
        let mut first = nodes(0, &[0.0, 100.0, 200.0, 300.0], 0);
        first[2].teleport = true;
        let mut second = nodes(0, &[300.0, 400.0, 500.0, 600.0, 700.0], 10);
        second[2].teleport = true;
        let mut routes = Routes::default();
        routes.0.insert((1, 2), TaxiLeg { nodes: first, cost: 10 });
        routes.0.insert((2, 3), TaxiLeg { nodes: second, cost: 20 });

        let mut generator = FlightPathMovementGenerator::new([1, 2, 3]);
        generator.load_path(&routes, 1.0, 0);
        let xs: Vec<f32> = generator.path.iter().map(|node| node.position.x).collect();
        assert_eq!(xs, vec![0.0, 100.0, 200.0, 600.0, 700.0]);
        assert_eq!(
            generator.path.iter().filter(|node| node.teleport).count(),
            1
        );
        // The first stretch ends just past the teleport node.
        assert_eq!(generator.path_at_map_end(), 3);

        let mut mover = Mover::new(5, 0, Vector3::new(0.0, 0.0, 50.0), 0.0);
        let mut hooks = RecordingHooks::default();
        generator.initialize(&mut MotionContext::new(&mut mover, &mut hooks));
        assert_eq!(mover.spline.final_destination(), Vector3::new(200.0, 0.0, 50.0));

        fly(&mut generator, &mut mover, &mut hooks);
        generator.finalize(&mut MotionContext::new(&mut mover, &mut hooks), true, true);
        assert_eq!(hooks.event_ids(), vec![100, 201, 101, 202, 102, 213, 113, 214]);
        assert_eq!(hooks.total_fares(), 30);
        assert_eq!(mover.map_id, 0);
        assert_eq!(mover.position, Vector3::new(700.0, 0.0, 50.0));
    }

    #[test]
    fn route_ending_on_teleport_pair_skips_landing_correction() {
        let mut generator = FlightPathMovementGenerator::new([1, 2]);
        generator.path = nodes(0, &[0.0, 100.0, 200.0], 0);
        generator.path[1].teleport = true;
        generator.path[2].teleport = true;
        let mut mover = Mover::new(5, 0, Vector3::new(150.0, 0.0, 50.0), 0.0);
        let mut hooks = RecordingHooks::default();

        generator.finalize(&mut MotionContext::new(&mut mover, &mut hooks), true, false);
        assert_eq!(mover.position, Vector3::new(150.0, 0.0, 50.0));

        generator.path[1].teleport = false;
        generator.finalize(&mut MotionContext::new(&mut mover, &mut hooks), true, false);
        assert_eq!(mover.position, Vector3::new(200.0, 0.0, 50.0));
    }

    #[test]
    fn skip_to_next_map_after_external_teleport() {
        let mut generator = FlightPathMovementGenerator::new([1, 2]);
        generator.path = nodes(0, &[0.0, 100.0, 200.0], 0);
        generator.path.extend(nodes(3, &[0.0, 100.0], 0));

        generator.set_current_node_after_teleport();
        assert_eq!(generator.current_node(), 3);
        generator.set_current_node_after_teleport();
        assert_eq!(generator.current_node(), 3);
    }
}
