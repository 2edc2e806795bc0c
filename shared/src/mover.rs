//! Owner of a spline: an entity that can be moved along paths.

use nalgebra::Vector3;

use crate::{
    EntityId,
    constants::{DEFAULT_RUN_SPEED, DEFAULT_WALK_SPEED, PLAYER_FLIGHT_SPEED},
    move_spline::{Location, MoveSpline, MoveSplineInit, UpdateResult},
};

/// Movement speeds (meters per second) used when a launch sets no velocity.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MoveSpeeds {
    pub walk: f32,
    pub run: f32,
    pub flight: f32,
}

impl Default for MoveSpeeds {
    fn default() -> Self {
        Self {
            walk: DEFAULT_WALK_SPEED,
            run: DEFAULT_RUN_SPEED,
            flight: PLAYER_FLIGHT_SPEED,
        }
    }
}

impl MoveSpeeds {
    pub fn for_mode(&self, walk: bool, flying: bool) -> f32 {
        if flying {
            self.flight
        } else if walk {
            self.walk
        } else {
            self.run
        }
    }
}

#[derive(Clone, Debug)]
pub struct Mover {
    pub id: EntityId,
    pub map_id: u32,
    pub position: Vector3<f32>,
    /// Yaw in radians, `atan2(dy, dx)`.
    pub orientation: f32,
    pub speeds: MoveSpeeds,
    pub spline: MoveSpline,
    /// Id of the most recently launched spline.
    pub last_spline_id: u32,
}

impl Mover {
    pub fn new(id: EntityId, map_id: u32, position: Vector3<f32>, orientation: f32) -> Self {
        Self {
            id,
            map_id,
            position,
            orientation,
            speeds: MoveSpeeds::default(),
            spline: MoveSpline::default(),
            last_spline_id: 0,
        }
    }

    /// Where the mover is right now, even if `position` has not been refreshed since
    /// the spline last advanced.
    pub fn real_location(&self) -> Location {
        if self.spline.initialized() && !self.spline.finalized() {
            self.spline.compute_position(0)
        } else {
            Location {
                position: self.position,
                orientation: self.orientation,
            }
        }
    }

    pub fn next_spline_id(&mut self) -> u32 {
        self.last_spline_id = self.last_spline_id.wrapping_add(1);
        self.last_spline_id
    }

    pub fn is_moving(&self) -> bool {
        self.spline.initialized() && !self.spline.finalized()
    }

    /// Advances the spline by `diff` milliseconds and applies the sampled location.
    ///
    /// `resolve_target` maps an entity facing target to its position.
    pub fn update_movement(
        &mut self,
        diff: i32,
        resolve_target: impl FnOnce(EntityId) -> Option<Vector3<f32>>,
    ) -> UpdateResult {
        if !self.spline.initialized() {
            return UpdateResult::None;
        }

        let result = self.spline.update_state(diff);
        let location = self.spline.compute_position_facing(0, resolve_target);
        self.position = location.position;
        self.orientation = location.orientation;
        result
    }

    pub fn stop(&mut self) {
        MoveSplineInit::stop(self);
    }

    /// Moves instantly, cancelling any spline.
    pub fn teleport_to(&mut self, map_id: u32, position: Vector3<f32>, orientation: f32) {
        self.map_id = map_id;
        MoveSplineInit::stop_at(self, position, orientation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_for_mode_prefers_flight() {
        let speeds = MoveSpeeds::default();
        assert_eq!(speeds.for_mode(true, true), PLAYER_FLIGHT_SPEED);
        assert_eq!(speeds.for_mode(true, false), DEFAULT_WALK_SPEED);
        assert_eq!(speeds.for_mode(false, false), DEFAULT_RUN_SPEED);
    }

    #[test]
    fn teleport_cancels_movement() {
        let mut mover = Mover::new(1, 0, Vector3::zeros(), 0.0);
        MoveSplineInit::new()
            .move_to(Vector3::new(50.0, 0.0, 0.0))
            .launch(&mut mover);
        assert!(mover.is_moving());

        mover.teleport_to(2, Vector3::new(1.0, 2.0, 3.0), 1.5);
        assert!(!mover.is_moving());
        assert_eq!(mover.map_id, 2);

        mover.update_movement(500, |_| None);
        assert_eq!(mover.position, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(mover.orientation, 1.5);
    }

    #[test]
    fn teleport_after_arrival_sticks() {
        let mut mover = Mover::new(1, 0, Vector3::zeros(), 0.0);
        MoveSplineInit::new()
            .move_to(Vector3::new(10.0, 0.0, 0.0))
            .set_velocity(5.0)
            .launch(&mut mover);
        mover.update_movement(2000, |_| None);
        assert!(mover.spline.finalized());
        assert_eq!(mover.position, Vector3::new(10.0, 0.0, 0.0));

        let before = mover.last_spline_id;
        mover.teleport_to(2, Vector3::new(500.0, 500.0, 0.0), 0.5);
        assert_ne!(mover.last_spline_id, before);

        mover.update_movement(100, |_| None);
        assert_eq!(mover.map_id, 2);
        assert_eq!(mover.position, Vector3::new(500.0, 500.0, 0.0));
        assert_eq!(mover.real_location().position, Vector3::new(500.0, 500.0, 0.0));
    }
}
