mod db_motion;
mod db_spline;
mod db_vec3;
mod movement_effect;
mod path_options;

pub use db_motion::{
    DbChainMotion, DbChainResumeInfo, DbFlightMotion, DbGenericMotion, DbMotion, DbPathSwitch,
    DbSplineChainLink, DbTaxiPathNode,
};
pub use db_spline::{DbCurvePoint, DbEventId, DbFacing, DbSplineArgs, DbSplineState};
pub use db_vec3::DbVec3;
pub use movement_effect::{
    DbGridPreload, DbMovementInform, DbSpellCast, DbWorldEvent, MovementEffect,
};
pub use path_options::PathOptions;
