use nalgebra::Vector3;

use crate::{move_spline::MoveSplineInit, mover::Mover};

use super::{GeneratorFlag, GeneratorFlags, MotionContext, MotionKind, MovementGenerator};

/// One pre-authored piece of a spline chain.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SplineChainLink {
    /// The first point is where the link was authored to start; the mover's real
    /// position replaces it at launch.
    pub points: Vec<Vector3<f32>>,
    /// Duration the timings below were authored against (milliseconds).
    pub expected_duration: u32,
    /// Delay before the next link is sent (milliseconds).
    pub time_to_next: u32,
    /// Meters per second; `0` uses the mover's speed.
    pub velocity: f32,
}

/// Enough state to continue a chain after a save and reload.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SplineChainResumeInfo {
    pub point_id: u32,
    pub is_walk_mode: bool,
    /// Link that was playing (or is next, when `point_index == 0`).
    pub spline_index: u32,
    /// Next waypoint of that link; `0` starts the link from the beginning.
    pub point_index: u32,
    pub time_to_next: u32,
}

/// Plays the links of a chain back to back on their authored schedule.
#[derive(Clone, Debug)]
pub struct SplineChainMovementGenerator {
    pub id: u32,
    pub chain: Vec<SplineChainLink>,
    pub walk: bool,
    pub next_index: usize,
    pub next_first_wp: usize,
    pub ms_to_next: u32,
    pub flags: GeneratorFlags,
}

impl SplineChainMovementGenerator {
    pub fn new(id: u32, chain: Vec<SplineChainLink>, walk: bool) -> Self {
        let mut flags = GeneratorFlags::default();
        flags.add(GeneratorFlag::InitializationPending);
        Self {
            id,
            chain,
            walk,
            next_index: 0,
            next_first_wp: 0,
            ms_to_next: 0,
            flags,
        }
    }

    pub fn from_resume(chain: Vec<SplineChainLink>, info: &SplineChainResumeInfo) -> Self {
        let mut generator = Self::new(info.point_id, chain, info.is_walk_mode);
        generator.next_index = info.spline_index as usize;
        generator.next_first_wp = info.point_index as usize;
        generator.ms_to_next = info.time_to_next;
        generator
    }

    fn send_path_spline(
        &self,
        ctx: &mut MotionContext<'_>,
        velocity: f32,
        points: &[Vector3<f32>],
        path_offset: i32,
    ) -> i32 {
        if points.len() < 2 {
            log::error!(
                "SplineChainMovementGenerator: chain {} has a link with {} points",
                self.id,
                points.len()
            );
            return 0;
        }

        let mut init = MoveSplineInit::new();
        init.move_by_path(&points[1..], path_offset).set_walk(self.walk);
        if velocity > 0.0 {
            init.set_velocity(velocity);
        }
        init.launch(ctx.mover)
    }

    /// Sends link `index` and stretches `duration` by how much slower (or faster) the
    /// link actually plays than authored.
    fn send_spline_for(&self, ctx: &mut MotionContext<'_>, index: usize, duration: &mut u32) {
        let link = &self.chain[index];
        let actual = self.send_path_spline(ctx, link.velocity, &link.points, 0).max(0) as u32;
        if actual != link.expected_duration && link.expected_duration > 0 {
            *duration = (f64::from(actual) / f64::from(link.expected_duration)
                * f64::from(*duration)) as u32;
        }
        log::debug!(
            "SplineChainMovementGenerator: mover {} sent link {index} of chain {} ({actual} ms)",
            ctx.mover.id,
            self.id
        );
    }

    /// Where to pick the chain up later, or `None` once every link has played out.
    pub fn resume_info(&self, mover: &Mover) -> Option<SplineChainResumeInfo> {
        let info = |spline_index: usize, point_index: u32, time_to_next: u32| {
            SplineChainResumeInfo {
                point_id: self.id,
                is_walk_mode: self.walk,
                spline_index: spline_index as u32,
                point_index,
                time_to_next,
            }
        };

        if self.next_index == 0 {
            return Some(info(0, 0, self.ms_to_next));
        }

        if mover.spline.finalized() {
            return (self.next_index < self.chain.len()).then(|| info(self.next_index, 0, 1));
        }

        let next_waypoint = (mover.spline.current_path_idx() + 1).max(1) as u32;
        Some(info(self.next_index - 1, next_waypoint, self.ms_to_next))
    }
}

impl MovementGenerator for SplineChainMovementGenerator {
    fn kind(&self) -> MotionKind {
        MotionKind::SplineChain
    }

    fn flags(&self) -> GeneratorFlags {
        self.flags
    }

    fn initialize(&mut self, ctx: &mut MotionContext<'_>) {
        self.flags.remove_many(&[
            GeneratorFlag::InitializationPending,
            GeneratorFlag::Deactivated,
        ]);
        self.flags.add(GeneratorFlag::Initialized);

        if self.chain.is_empty() {
            log::error!(
                "SplineChainMovementGenerator: mover {} started empty chain {}",
                ctx.mover.id,
                self.id
            );
            self.ms_to_next = 0;
            self.flags.add(GeneratorFlag::Finalized);
            return;
        }

        if self.next_index >= self.chain.len() {
            log::error!(
                "SplineChainMovementGenerator: mover {} resumed link {} of chain {} (only {} links), clamping",
                ctx.mover.id,
                self.next_index,
                self.id,
                self.chain.len()
            );
            self.next_index = self.chain.len() - 1;
            self.next_first_wp = 0;
        }

        if self.next_first_wp > 0 {
            if self.flags.has(GeneratorFlag::Finalized) {
                return;
            }

            let link = &self.chain[self.next_index];
            let last_wp = link.points.len().saturating_sub(1).max(1);
            if self.next_first_wp > last_wp {
                log::error!(
                    "SplineChainMovementGenerator: mover {} resumed link {} of chain {} at waypoint {} (only {} points), clamping",
                    ctx.mover.id,
                    self.next_index,
                    self.id,
                    self.next_first_wp,
                    link.points.len()
                );
                self.next_first_wp = last_wp;
            }

            let start = (self.next_first_wp - 1).min(link.points.len());
            self.send_path_spline(ctx, link.velocity, &link.points[start..], start as i32);
            log::debug!(
                "SplineChainMovementGenerator: mover {} resumed link {} of chain {} at waypoint {}",
                ctx.mover.id,
                self.next_index,
                self.id,
                self.next_first_wp
            );

            self.next_index += 1;
            if self.next_index >= self.chain.len() {
                self.ms_to_next = 0;
            } else if self.ms_to_next == 0 {
                self.ms_to_next = 1;
            }
            self.next_first_wp = 0;
        } else {
            let mut ms_to_next = self.chain[self.next_index].time_to_next.max(1);
            self.send_spline_for(ctx, self.next_index, &mut ms_to_next);
            self.ms_to_next = ms_to_next;
            self.next_index += 1;
            if self.next_index >= self.chain.len() {
                self.ms_to_next = 0;
            }
        }
    }

    fn reset(&mut self, ctx: &mut MotionContext<'_>) {
        self.flags.remove(GeneratorFlag::Deactivated);
        ctx.mover.stop();
        self.initialize(ctx);
    }

    fn update(&mut self, ctx: &mut MotionContext<'_>, diff: u32) -> bool {
        if self.flags.has(GeneratorFlag::Finalized) {
            return false;
        }

        // Zero means the final link is playing.
        if self.ms_to_next == 0 {
            if !ctx.mover.is_moving() {
                self.flags.add(GeneratorFlag::InformEnabled);
                return false;
            }
            return true;
        }

        if self.ms_to_next <= diff {
            let Some(link) = self.chain.get(self.next_index) else {
                log::error!(
                    "SplineChainMovementGenerator: mover {} has no link {} in chain {}",
                    ctx.mover.id,
                    self.next_index,
                    self.id
                );
                self.ms_to_next = 0;
                return ctx.mover.is_moving();
            };
            let mut ms_to_next = link.time_to_next.max(1);
            self.send_spline_for(ctx, self.next_index, &mut ms_to_next);
            self.ms_to_next = ms_to_next;
            self.next_index += 1;
            if self.next_index >= self.chain.len() {
                self.ms_to_next = 0;
            }
        } else {
            self.ms_to_next -= diff;
        }
        true
    }

    fn deactivate(&mut self, _ctx: &mut MotionContext<'_>) {
        self.flags.add(GeneratorFlag::Deactivated);
    }

    fn finalize(&mut self, ctx: &mut MotionContext<'_>, _active: bool, movement_inform: bool) {
        self.flags.add(GeneratorFlag::Finalized);
        if movement_inform && self.flags.has(GeneratorFlag::InformEnabled) {
            self.flags.remove(GeneratorFlag::InformEnabled);
            ctx.hooks.movement_inform(ctx.mover.id, MotionKind::SplineChain, self.id);
        }
    }
}
