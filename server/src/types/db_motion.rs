//! Stored forms of the movement generators.
//!
//! Generators live in `active_motion` between ticks and are rebuilt from these rows
//! every time a reducer touches them. Conversions are lossless for everything the
//! generators read back.

use shared::{
    CountdownTimer, FlightPathMovementGenerator, GeneratorFlags, GenericMovementGenerator,
    Motion, MotionKind, MoveSplineInit, PathSwitch, SplineChainLink,
    SplineChainMovementGenerator, SplineChainResumeInfo, TaxiPathNode,
};
use spacetimedb::SpacetimeType;

use super::{DbEventId, DbSplineArgs, DbVec3};

#[derive(SpacetimeType, Debug, Clone, PartialEq)]
pub struct DbGenericMotion {
    pub args: DbSplineArgs,
    pub walk: bool,
    pub fixed_duration: Option<i32>,
    /// `MotionKind` value.
    pub kind: u8,
    pub point_id: u32,
    pub arrival_spell_id: Option<u32>,
    pub arrival_spell_target: Option<u64>,
    pub duration_left: i32,
    pub flags: u16,
}

#[derive(SpacetimeType, Debug, Clone, PartialEq)]
pub struct DbTaxiPathNode {
    pub map_id: u32,
    pub position: DbVec3,
    pub teleport: bool,
    pub arrival_event: Option<DbEventId>,
    pub departure_event: Option<DbEventId>,
}

#[derive(SpacetimeType, Debug, Clone, Copy, PartialEq)]
pub struct DbPathSwitch {
    pub path_index: u32,
    pub cost: u32,
}

#[derive(SpacetimeType, Debug, Clone, PartialEq)]
pub struct DbFlightMotion {
    pub route: Vec<u32>,
    pub path: Vec<DbTaxiPathNode>,
    pub current_node: u32,
    pub path_switches: Vec<DbPathSwitch>,
    pub end_map_id: u32,
    pub end_grid_x: f32,
    pub end_grid_y: f32,
    pub preload_target_node: u32,
    pub flags: u16,
}

#[derive(SpacetimeType, Debug, Clone, PartialEq)]
pub struct DbSplineChainLink {
    pub points: Vec<DbVec3>,
    pub expected_duration: u32,
    pub time_to_next: u32,
    pub velocity: f32,
}

#[derive(SpacetimeType, Debug, Clone, PartialEq)]
pub struct DbChainMotion {
    pub chain_id: u32,
    pub links: Vec<DbSplineChainLink>,
    pub walk: bool,
    pub next_index: u32,
    pub next_first_wp: u32,
    pub ms_to_next: u32,
    pub flags: u16,
}

#[derive(SpacetimeType, Debug, Clone, Copy, PartialEq)]
pub struct DbChainResumeInfo {
    pub chain_id: u32,
    pub is_walk_mode: bool,
    pub spline_index: u32,
    pub point_index: u32,
    pub time_to_next: u32,
}

#[derive(SpacetimeType, Debug, Clone, PartialEq)]
pub enum DbMotion {
    Generic(DbGenericMotion),
    Flight(DbFlightMotion),
    SplineChain(DbChainMotion),
}

impl From<&TaxiPathNode> for DbTaxiPathNode {
    fn from(node: &TaxiPathNode) -> Self {
        Self {
            map_id: node.map_id,
            position: node.position.into(),
            teleport: node.teleport,
            arrival_event: node.arrival_event.map(Into::into),
            departure_event: node.departure_event.map(Into::into),
        }
    }
}

impl From<&DbTaxiPathNode> for TaxiPathNode {
    fn from(node: &DbTaxiPathNode) -> Self {
        Self {
            map_id: node.map_id,
            position: node.position.into(),
            teleport: node.teleport,
            arrival_event: node.arrival_event.map(Into::into),
            departure_event: node.departure_event.map(Into::into),
        }
    }
}

impl From<&SplineChainLink> for DbSplineChainLink {
    fn from(link: &SplineChainLink) -> Self {
        Self {
            points: link.points.iter().map(DbVec3::from).collect(),
            expected_duration: link.expected_duration,
            time_to_next: link.time_to_next,
            velocity: link.velocity,
        }
    }
}

impl From<&DbSplineChainLink> for SplineChainLink {
    fn from(link: &DbSplineChainLink) -> Self {
        Self {
            points: link.points.iter().map(Into::into).collect(),
            expected_duration: link.expected_duration,
            time_to_next: link.time_to_next,
            velocity: link.velocity,
        }
    }
}

impl From<SplineChainResumeInfo> for DbChainResumeInfo {
    fn from(info: SplineChainResumeInfo) -> Self {
        Self {
            chain_id: info.point_id,
            is_walk_mode: info.is_walk_mode,
            spline_index: info.spline_index,
            point_index: info.point_index,
            time_to_next: info.time_to_next,
        }
    }
}

impl From<DbChainResumeInfo> for SplineChainResumeInfo {
    fn from(info: DbChainResumeInfo) -> Self {
        Self {
            point_id: info.chain_id,
            is_walk_mode: info.is_walk_mode,
            spline_index: info.spline_index,
            point_index: info.point_index,
            time_to_next: info.time_to_next,
        }
    }
}

impl From<&Motion> for DbMotion {
    fn from(motion: &Motion) -> Self {
        match motion {
            Motion::Generic(g) => DbMotion::Generic(DbGenericMotion {
                args: g.spline_init.args().into(),
                walk: g.spline_init.is_walk(),
                fixed_duration: g.spline_init.fixed_duration(),
                kind: g.kind as u8,
                point_id: g.point_id,
                arrival_spell_id: g.arrival_spell_id,
                arrival_spell_target: g.arrival_spell_target,
                duration_left: g.duration.expiry(),
                flags: g.flags.bits(),
            }),
            Motion::Flight(f) => DbMotion::Flight(DbFlightMotion {
                route: f.route.iter().copied().collect(),
                path: f.path.iter().map(DbTaxiPathNode::from).collect(),
                current_node: f.current_node as u32,
                path_switches: f
                    .path_switches
                    .iter()
                    .map(|s| DbPathSwitch {
                        path_index: s.path_index as u32,
                        cost: s.cost,
                    })
                    .collect(),
                end_map_id: f.end_map_id,
                end_grid_x: f.end_grid_x,
                end_grid_y: f.end_grid_y,
                preload_target_node: f.preload_target_node as u32,
                flags: f.flags.bits(),
            }),
            Motion::SplineChain(c) => DbMotion::SplineChain(DbChainMotion {
                chain_id: c.id,
                links: c.chain.iter().map(DbSplineChainLink::from).collect(),
                walk: c.walk,
                next_index: c.next_index as u32,
                next_first_wp: c.next_first_wp as u32,
                ms_to_next: c.ms_to_next,
                flags: c.flags.bits(),
            }),
        }
    }
}

impl TryFrom<&DbMotion> for Motion {
    type Error = String;

    fn try_from(motion: &DbMotion) -> Result<Self, Self::Error> {
        Ok(match motion {
            DbMotion::Generic(g) => {
                let kind = MotionKind::from_u8(g.kind)
                    .ok_or_else(|| format!("Unknown motion kind {}", g.kind))?;
                let init = MoveSplineInit::from_parts((&g.args).into(), g.walk, g.fixed_duration);
                let mut generator = GenericMovementGenerator::new(init, kind, g.point_id);
                generator.arrival_spell_id = g.arrival_spell_id;
                generator.arrival_spell_target = g.arrival_spell_target;
                generator.duration = CountdownTimer::new(g.duration_left);
                generator.flags = GeneratorFlags::new(g.flags);
                Motion::Generic(generator)
            }
            DbMotion::Flight(f) => {
                let mut generator = FlightPathMovementGenerator::new(f.route.iter().copied());
                generator.path = f.path.iter().map(TaxiPathNode::from).collect();
                generator.current_node = f.current_node as usize;
                generator.path_switches = f
                    .path_switches
                    .iter()
                    .map(|s| PathSwitch {
                        path_index: s.path_index as usize,
                        cost: s.cost,
                    })
                    .collect();
                generator.end_map_id = f.end_map_id;
                generator.end_grid_x = f.end_grid_x;
                generator.end_grid_y = f.end_grid_y;
                generator.preload_target_node = f.preload_target_node as usize;
                generator.flags = GeneratorFlags::new(f.flags);
                Motion::Flight(generator)
            }
            DbMotion::SplineChain(c) => {
                let links = c.links.iter().map(SplineChainLink::from).collect();
                let mut generator = SplineChainMovementGenerator::new(c.chain_id, links, c.walk);
                generator.next_index = c.next_index as usize;
                generator.next_first_wp = c.next_first_wp as usize;
                generator.ms_to_next = c.ms_to_next;
                generator.flags = GeneratorFlags::new(c.flags);
                Motion::SplineChain(generator)
            }
        })
    }
}
