use crate::types::*;
use spacetimedb::*;

/// A pre-authored sequence of timed spline links.
#[table(name = spline_chain, public)]
pub struct SplineChain {
    #[primary_key]
    #[auto_inc]
    pub id: u32,

    pub links: Vec<DbSplineChainLink>,
}

/// Where a suspended chain should pick up again.
#[table(name = spline_chain_resume)]
pub struct SplineChainResume {
    #[primary_key]
    pub mover_id: u64,

    pub info: DbChainResumeInfo,
}
